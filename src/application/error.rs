use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::render::RenderError, config::LoadError, domain::error::DocumentError,
    infra::error::InfraError,
};

/// Error chain flattened for logging.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn summary(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration")]
    Config(#[from] LoadError),
    #[error("document rejected")]
    Document(#[from] DocumentError),
    #[error("rendering failed")]
    Render(#[from] RenderError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit status: 2 for bad input, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Document(_) => 2,
            AppError::Render(_) | AppError::Infra(_) | AppError::Unexpected(_) => 1,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}
