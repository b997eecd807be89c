//! Error handling for the shapegen CLI.
//!
//! Engine errors already carry miette diagnostics and are reported as they
//! are. Everything else is rendered with a hint when one is known.

use std::path::PathBuf;

use miette::Report;
use shapegen_config::ConfigError;
use shapegen_core::{BuildError, MetadataError};
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The unit failed to build or validate.
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("Declarations file not found: {}", .0.display())]
    DeclarationsNotFound(PathBuf),

    #[error("Invalid declarations in {}: {source}", .path.display())]
    InvalidDeclarations {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Suggested fix, when one is known.
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::Config(err) => err.hint().map(str::to_string),
            CliError::DeclarationsNotFound(_) => {
                Some("Pass the JSON file produced by the declaration extractor".to_string())
            }
            CliError::InvalidDeclarations { .. } => Some(
                "Expected { \"models\": [...], \"configs\": [...] }; check field names and types"
                    .to_string(),
            ),
            CliError::Write { .. } => Some("Check output directory permissions or pass --out-dir".to_string()),
            CliError::Build(_)
            | CliError::Metadata(_)
            | CliError::Io(_)
            | CliError::Json(_) => None,
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CLI error into a miette report.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(err) => Report::new(err),
        CliError::Metadata(err) => Report::new(err),
        other => match other.hint() {
            Some(hint) => miette::miette!("{other}\n\nHint: {hint}"),
            None => miette::miette!("{other}"),
        },
    }
}
