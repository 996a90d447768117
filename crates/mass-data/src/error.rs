//! Error types for the mass-data crate.
//!
//! This module defines semantic error enums for date pattern compilation,
//! template and output file handling, and generation setup, following the
//! project's error handling conventions with `thiserror`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while compiling a date-format pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFormatError {
    /// The pattern uses a letter that has no date or time meaning.
    #[error("illegal pattern character '{character}' in date format '{pattern}'")]
    IllegalPatternCharacter {
        /// The offending pattern letter.
        character: char,
        /// The full pattern as supplied.
        pattern: String,
    },

    /// A quoted literal section was opened but never closed.
    #[error("unterminated quote in date format '{pattern}'")]
    UnterminatedQuote {
        /// The full pattern as supplied.
        pattern: String,
    },

    /// A pattern letter was repeated more often than the field allows.
    #[error("invalid field width {width} for '{character}' in date format '{pattern}'")]
    InvalidFieldWidth {
        /// The pattern letter.
        character: char,
        /// Number of consecutive repetitions.
        width: usize,
        /// The full pattern as supplied.
        pattern: String,
    },
}

/// Errors raised while reading the template or writing generated output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateIoError {
    /// The template file (or its directory) does not exist.
    #[error("Input-File \"{path}\" not found")]
    InputNotFound {
        /// Path supplied for the template file.
        path: Utf8PathBuf,
    },

    /// The template file exists but could not be read as text.
    #[error("failed to read input file at '{path}': {message}")]
    Read {
        /// Path supplied for the template file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The output file could not be created or written.
    #[error("Output-File \"{path}\" could not be written: {message}")]
    OutputWrite {
        /// Path supplied for the output file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

/// Errors raised while preparing a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A run must produce at least one record.
    #[error("Count must be greater than 0")]
    ZeroCount,
}
