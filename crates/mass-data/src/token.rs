//! Placeholder tokens recognised inside templates.

/// A placeholder marker that is replaced with generated data.
///
/// Markers are literal and case-sensitive. [`Token::ALL`] lists them in the
/// order the expander substitutes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `#UUID#`: a random UUID, shared by every marker in one record.
    Uuid,
    /// `#SEQ#`: the 1-based record number.
    Seq,
    /// `#DATE#`: the generation timestamp.
    Date,
}

impl Token {
    /// Every token, in substitution order.
    pub const ALL: [Self; 3] = [Self::Uuid, Self::Seq, Self::Date];

    /// Returns the literal marker searched for in templates.
    ///
    /// # Example
    ///
    /// ```
    /// use mass_data::Token;
    ///
    /// assert_eq!(Token::Seq.marker(), "#SEQ#");
    /// ```
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Uuid => "#UUID#",
            Self::Seq => "#SEQ#",
            Self::Date => "#DATE#",
        }
    }

    /// Returns the one-line description shown in the CLI help.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Uuid => "A random UUID",
            Self::Seq => "A consecutive number (starting with 1)",
            Self::Date => "The current date (yyyy-MM-d H:m:s.S by default, see --dateFormat)",
        }
    }
}
