//! Document model, classifiers and resolvers. Nothing here performs I/O.

pub mod anchor;
pub mod document;
pub mod error;
pub mod format;
pub mod guards;
pub mod links;
pub mod media;
pub mod video;
