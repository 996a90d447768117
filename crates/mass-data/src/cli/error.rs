//! Error types for the mass-data CLI.

use thiserror::Error;

use crate::error::{DateFormatError, GenerationError, TemplateIoError};

/// Invalid or missing option values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `--input` was not supplied.
    #[error("Input-Path must not be empty: supply --input")]
    MissingInputPath,
    /// `--output` was not supplied.
    #[error("Output-Path must not be empty: supply --output")]
    MissingOutputPath,
    /// `--count` was not supplied.
    #[error("Count is required: supply --count")]
    MissingCount,
    /// `--count` was not an integer.
    #[error("Count must be a number, got '{value}'")]
    CountNotANumber {
        /// Raw value supplied for the flag.
        value: String,
    },
    /// `--count` was zero or negative.
    #[error("Count must be greater than 0, got '{value}'")]
    CountNotPositive {
        /// Raw value supplied for the flag.
        value: String,
    },
}

/// Errors surfaced by the CLI parsing and generation flow.
///
/// Every variant maps to exit status 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// The command line could not be parsed.
    #[error("{message}")]
    Arguments {
        /// Parser diagnostic.
        message: String,
    },
    /// An option value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The `--dateFormat` pattern is invalid.
    #[error("invalid date format: {0}")]
    DateFormat(#[from] DateFormatError),
    /// The template could not be read or the output could not be written.
    #[error(transparent)]
    Io(#[from] TemplateIoError),
    /// The generation run could not be configured.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl CliError {
    /// Returns `true` when the usage text should accompany the message.
    ///
    /// Parser diagnostics already carry a usage line, so only missing
    /// required flags ask for the full text.
    #[must_use]
    pub const fn shows_usage(&self) -> bool {
        matches!(
            self,
            Self::Validation(
                ValidationError::MissingInputPath
                    | ValidationError::MissingOutputPath
                    | ValidationError::MissingCount
            )
        )
    }
}
