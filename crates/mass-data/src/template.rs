//! The immutable template text records are expanded from.

use crate::token::Token;

/// Template text loaded once at startup.
///
/// The text is never mutated; every record starts from a fresh copy.
///
/// # Example
///
/// ```
/// use mass_data::{Template, Token};
///
/// let template = Template::new("id=#SEQ#".to_owned());
/// assert!(template.contains(Token::Seq));
/// assert!(!template.contains(Token::Uuid));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    /// Wraps template text.
    #[must_use]
    pub const fn new(text: String) -> Self {
        Self { text }
    }

    /// Returns the original template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the template contains at least one marker for `token`.
    #[must_use]
    pub fn contains(&self, token: Token) -> bool {
        self.text.contains(token.marker())
    }

    /// Returns `true` if the template has no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the template length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Self::new(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", false, false, false)]
    #[case("plain text", false, false, false)]
    #[case("#UUID#", true, false, false)]
    #[case("a=#SEQ#;b=#SEQ#", false, true, false)]
    #[case("#DATE##UUID##SEQ#", true, true, true)]
    #[case("#uuid# #Seq#", false, false, false)]
    fn detects_token_markers(
        #[case] text: &str,
        #[case] uuid: bool,
        #[case] seq: bool,
        #[case] date: bool,
    ) {
        let template = Template::from(text);

        assert_eq!(template.contains(Token::Uuid), uuid);
        assert_eq!(template.contains(Token::Seq), seq);
        assert_eq!(template.contains(Token::Date), date);
    }

    #[test]
    fn empty_template_reports_empty() {
        let template = Template::from("");
        assert!(template.is_empty());
        assert_eq!(template.len(), 0);
    }
}
