//! Command-line front end for the generator.
//!
//! This module provides argument parsing, validation, and the generation run
//! itself. The binary delegates to these functions so they can be exercised in
//! tests without spawning a subprocess.

mod error;

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use mockable::Clock;
use tracing::{debug, info};

use crate::date_pattern::DatePattern;
use crate::error::TemplateIoError;
use crate::expander::{GenerationConfig, TemplateExpander};
use crate::report::ErrorReporter;
use crate::template_io::{read_template, write_output};

pub use error::{CliError, ValidationError};

const BINARY_NAME: &str = "mass-data";

const TOKEN_HELP: &str = concat!(
    "Following in your input file will be replaced:\n",
    "#UUID# - A random UUID\n",
    "#SEQ#  - A consecutive number (starting with 1)\n",
    "#DATE# - The current date (yyyy-MM-d H:m:s.S by default, see --dateFormat)",
);

#[derive(Debug, Parser)]
#[command(
    name = BINARY_NAME,
    about = "Expands a template file into bulk test data, one record per line",
    after_help = TOKEN_HELP,
    disable_version_flag = true
)]
struct Arguments {
    /// The input file
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    input: Option<Utf8PathBuf>,
    /// The output file
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<Utf8PathBuf>,
    /// The amount of generated data
    #[arg(
        short = 'c',
        long = "count",
        value_name = "N",
        allow_negative_numbers = true
    )]
    count: Option<String>,
    /// A custom date format
    #[arg(short = 'd', long = "dateFormat", value_name = "PATTERN")]
    date_format: Option<String>,
}

/// Validated options for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    input_path: Utf8PathBuf,
    output_path: Utf8PathBuf,
    count: u64,
    date_format: Option<String>,
}

impl Options {
    /// Returns the template path.
    #[must_use]
    pub fn input_path(&self) -> &Utf8Path {
        &self.input_path
    }

    /// Returns the output path.
    ///
    /// # Example
    ///
    /// ```
    /// use mass_data::cli::{ParseOutcome, parse_args};
    ///
    /// let args = ["-i", "in.txt", "-o", "out.txt", "-c", "3"].map(String::from);
    /// let ParseOutcome::Options(options) = parse_args(args.into_iter()).expect("parse") else {
    ///     panic!("expected options");
    /// };
    ///
    /// assert_eq!(options.output_path(), camino::Utf8Path::new("out.txt"));
    /// ```
    #[must_use]
    pub fn output_path(&self) -> &Utf8Path {
        &self.output_path
    }

    /// Returns the number of records requested.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Returns the raw `--dateFormat` value, if one was given.
    #[must_use]
    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    fn date_pattern(&self) -> Result<DatePattern, CliError> {
        let pattern = match self.date_format() {
            Some(raw) => DatePattern::compile(raw)?,
            None => DatePattern::default(),
        };
        Ok(pattern)
    }
}

/// Outcome of parsing CLI arguments.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// Show this help text and exit successfully.
    Help(String),
    /// Continue with the parsed options.
    Options(Options),
}

/// Result of a completed generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Number of records written.
    pub records: u64,
    /// Size of the output in bytes.
    pub bytes: usize,
    /// Where the output was written.
    pub output_path: Utf8PathBuf,
}

/// Parses and validates CLI arguments (without the program name).
///
/// # Errors
///
/// Returns [`CliError::Arguments`] for unparseable command lines and
/// [`CliError::Validation`] when a required option is missing or the count
/// is not a positive integer.
///
/// # Example
///
/// ```
/// use mass_data::cli::{ParseOutcome, parse_args};
///
/// let outcome = parse_args(vec!["--help".to_owned()].into_iter()).expect("parse args");
/// let ParseOutcome::Help(text) = outcome else {
///     panic!("expected help");
/// };
///
/// assert!(text.contains("#UUID#"));
/// ```
pub fn parse_args<I>(args: I) -> Result<ParseOutcome, CliError>
where
    I: Iterator<Item = String>,
{
    let argv = std::iter::once(BINARY_NAME.to_owned()).chain(args);
    let arguments = match Arguments::try_parse_from(argv) {
        Ok(arguments) => arguments,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            return Ok(ParseOutcome::Help(err.render().to_string()));
        }
        Err(err) => {
            return Err(CliError::Arguments {
                message: err.render().to_string().trim_end().to_owned(),
            });
        }
    };

    Ok(ParseOutcome::Options(validate(arguments)?))
}

/// Returns the full usage text, including the token descriptions.
#[must_use]
pub fn usage() -> String {
    Arguments::command().render_help().to_string()
}

/// Runs one generation: compiles the date pattern, reads the template,
/// expands it and writes the output.
///
/// Invalid date patterns and unreadable templates are passed to `reporter`
/// before being returned.
///
/// # Errors
///
/// Returns [`CliError`] if the date pattern is invalid, the template cannot be
/// read, or the output cannot be written. Nothing is written on failure.
pub fn run(
    options: &Options,
    clock: Arc<dyn Clock>,
    reporter: &dyn ErrorReporter,
) -> Result<Summary, CliError> {
    let date_pattern = options
        .date_pattern()
        .inspect_err(|err| reporter.report_error(err))?;
    let config = GenerationConfig::new(options.count, date_pattern)?;

    let template = read_template(&options.input_path).inspect_err(|err| {
        if matches!(err, TemplateIoError::Read { .. }) {
            reporter.report_error(err);
        }
    })?;
    debug!(path = %options.input_path, bytes = template.len(), "template loaded");

    let output = TemplateExpander::new(clock).expand(&template, &config);
    write_output(&options.output_path, &output, reporter)?;
    info!(
        path = %options.output_path,
        records = config.count(),
        bytes = output.len(),
        "output written"
    );

    Ok(Summary {
        records: config.count(),
        bytes: output.len(),
        output_path: options.output_path.clone(),
    })
}

/// Formats the success message emitted by the CLI.
///
/// # Example
///
/// ```
/// use mass_data::cli::{Summary, success_message};
///
/// let summary = Summary {
///     records: 3,
///     bytes: 42,
///     output_path: "out.txt".into(),
/// };
///
/// assert_eq!(success_message(&summary), "Generated 3 records to out.txt");
/// ```
#[must_use]
pub fn success_message(summary: &Summary) -> String {
    format!(
        "Generated {} records to {}",
        summary.records, summary.output_path
    )
}

fn validate(arguments: Arguments) -> Result<Options, ValidationError> {
    let input_path = arguments.input.ok_or(ValidationError::MissingInputPath)?;
    let output_path = arguments.output.ok_or(ValidationError::MissingOutputPath)?;
    let raw_count = arguments.count.ok_or(ValidationError::MissingCount)?;
    let count = parse_count(&raw_count)?;

    Ok(Options {
        input_path,
        output_path,
        count,
        date_format: arguments.date_format,
    })
}

fn parse_count(value: &str) -> Result<u64, ValidationError> {
    let parsed = value
        .parse::<i64>()
        .map_err(|_| ValidationError::CountNotANumber {
            value: value.to_owned(),
        })?;
    u64::try_from(parsed)
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| ValidationError::CountNotPositive {
            value: value.to_owned(),
        })
}
