//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod media_library;
pub mod telemetry;
