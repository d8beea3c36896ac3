//! Rendering engine for structured rich-text editor documents.
//!
//! A serialized editor state is parsed into a [`domain::document::Document`],
//! walked by a registry of converters into a presentation tree, and
//! serialized as sanitized HTML together with a heading outline and content
//! metrics.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
