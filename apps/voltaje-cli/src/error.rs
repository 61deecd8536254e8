//! # CLI Error Types
//!
//! What the operator sees when a run fails.
//!
//! ```text
//! CliError
//! ├── Usage         bad flags              → exit 2
//! ├── Input         unreadable/bad JSON    → exit 1
//! ├── Config        unreadable/bad TOML    → exit 1
//! └── Core          pricing rejected input → exit 1
//! ```

use std::path::PathBuf;
use thiserror::Error;
use voltaje_core::{CoreError, ValidationError};

#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or malformed command-line arguments.
    #[error("{0}\n\nRun with --help for usage.")]
    Usage(String),

    /// The quote document could not be read or parsed.
    #[error("Cannot read quote {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// The configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The engine rejected the quote.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Output could not be serialized.
    #[error("Cannot render output: {0}")]
    Render(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Core(CoreError::Validation(err))
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Render(err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage("missing input".into()).exit_code(), 2);
        assert_eq!(CliError::Config("bad".into()).exit_code(), 1);

        let err: CliError = ValidationError::Required {
            field: "line item id".into(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Validation error: line item id is required");
    }
}
