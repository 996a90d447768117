//! Template expansion: the record generation loop.
//!
//! Every record starts from the untouched template text. Markers are
//! substituted in [`Token::ALL`] order and only when the working copy still
//! contains them, so a template without a given token never pays for
//! generating its value.

use std::sync::Arc;

use mockable::Clock;
use uuid::Uuid;

use crate::date_pattern::DatePattern;
use crate::error::GenerationError;
use crate::template::Template;
use crate::token::Token;

/// Terminator written after every record, including the last.
pub const RECORD_TERMINATOR: &str = "\r\n";

/// Upper bound on the bytes reserved before expansion starts.
const PRESIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    count: u64,
    date_pattern: DatePattern,
}

impl GenerationConfig {
    /// Creates a configuration producing `count` records.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ZeroCount`] when `count` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use mass_data::{DatePattern, GenerationConfig, GenerationError};
    ///
    /// let config = GenerationConfig::new(3, DatePattern::default()).expect("valid count");
    /// assert_eq!(config.count(), 3);
    ///
    /// let rejected = GenerationConfig::new(0, DatePattern::default());
    /// assert_eq!(rejected, Err(GenerationError::ZeroCount));
    /// ```
    pub fn new(count: u64, date_pattern: DatePattern) -> Result<Self, GenerationError> {
        if count == 0 {
            return Err(GenerationError::ZeroCount);
        }
        Ok(Self {
            count,
            date_pattern,
        })
    }

    /// Number of records to generate.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Pattern used for `#DATE#` values.
    #[must_use]
    pub const fn date_pattern(&self) -> &DatePattern {
        &self.date_pattern
    }
}

/// Expands templates into records.
///
/// The clock is injected so timestamps are reproducible under test.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mass_data::{DatePattern, GenerationConfig, Template, TemplateExpander};
/// use mockable::DefaultClock;
///
/// let expander = TemplateExpander::new(Arc::new(DefaultClock));
/// let template = Template::from("row #SEQ#");
/// let config = GenerationConfig::new(2, DatePattern::default()).expect("valid count");
///
/// assert_eq!(expander.expand(&template, &config), "row 1\r\nrow 2\r\n");
/// ```
#[derive(Clone)]
pub struct TemplateExpander {
    clock: Arc<dyn Clock>,
}

impl TemplateExpander {
    /// Creates an expander reading timestamps from `clock`.
    #[must_use]
    pub const fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Renders record number `sequence` without its terminator.
    ///
    /// All `#UUID#` markers in the record share one freshly generated UUID;
    /// the clock is read once per record, and only if `#DATE#` is present.
    #[must_use]
    pub fn render_record(
        &self,
        template: &Template,
        sequence: u64,
        date_pattern: &DatePattern,
    ) -> String {
        let mut record = template.as_str().to_owned();
        for token in Token::ALL {
            let marker = token.marker();
            if record.contains(marker) {
                let value = self.value_for(token, sequence, date_pattern);
                record = record.replace(marker, &value);
            }
        }
        record
    }

    /// Lazily yields records `1..=count`, without terminators.
    pub fn records<'a>(
        &'a self,
        template: &'a Template,
        config: &'a GenerationConfig,
    ) -> impl Iterator<Item = String> + 'a {
        (1..=config.count())
            .map(move |sequence| self.render_record(template, sequence, config.date_pattern()))
    }

    /// Produces the full output: every record followed by [`RECORD_TERMINATOR`].
    #[must_use]
    pub fn expand(&self, template: &Template, config: &GenerationConfig) -> String {
        let mut output = String::with_capacity(presize(template, config));
        for record in self.records(template, config) {
            output.push_str(&record);
            output.push_str(RECORD_TERMINATOR);
        }
        output
    }

    fn value_for(&self, token: Token, sequence: u64, date_pattern: &DatePattern) -> String {
        match token {
            Token::Uuid => Uuid::new_v4().to_string(),
            Token::Seq => sequence.to_string(),
            Token::Date => date_pattern.format(&self.clock.local()),
        }
    }
}

/// Estimated output size, capped so huge counts grow the buffer on demand.
fn presize(template: &Template, config: &GenerationConfig) -> usize {
    let per_record = template.len().saturating_add(RECORD_TERMINATOR.len());
    usize::try_from(config.count())
        .map_or(PRESIZE_LIMIT, |count| count.saturating_mul(per_record))
        .min(PRESIZE_LIMIT)
}
