use thiserror::Error;

/// Failure to accept a serialized document at the boundary.
///
/// Only the outer envelope is validated; nodes below the root degrade
/// instead of failing.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no `root` object")]
    MissingRoot,
}
