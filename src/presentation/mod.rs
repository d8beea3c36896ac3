//! Serialization of presentation trees.

pub mod html;
pub mod sanitize;
