//! Template-driven bulk test data generation.
//!
//! This crate expands a template containing placeholder tokens into many
//! records, one per line, for seeding databases and exercising pipelines
//! with realistic volumes of data.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - `#UUID#`: a fresh random UUID per record, shared by all markers in it
//! - `#SEQ#`: the 1-based record number
//! - `#DATE#`: the generation timestamp, formatted with a [`DatePattern`]
//! - Atomic output writes, so a failed run never leaves a partial file
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use mass_data::{DatePattern, GenerationConfig, Template, TemplateExpander};
//! use mockable::DefaultClock;
//!
//! let template = Template::from("INSERT INTO users VALUES (#SEQ#, '#UUID#');");
//! let config = GenerationConfig::new(3, DatePattern::default()).expect("valid count");
//! let expander = TemplateExpander::new(Arc::new(DefaultClock));
//!
//! let output = expander.expand(&template, &config);
//!
//! assert_eq!(output.lines().count(), 3);
//! assert!(output.starts_with("INSERT INTO users VALUES (1, '"));
//! ```

mod atomic_io;
pub mod cli;
mod date_pattern;
mod error;
mod expander;
mod report;
mod template;
mod template_io;
mod token;

pub use date_pattern::{DEFAULT_DATE_PATTERN, DatePattern};
pub use error::{DateFormatError, GenerationError, TemplateIoError};
pub use expander::{GenerationConfig, RECORD_TERMINATOR, TemplateExpander};
pub use report::{ErrorReporter, TracingErrorReporter};
pub use template::Template;
pub use template_io::{read_template, write_output};
pub use token::Token;
