//! Token specifications fed to the generator.
//!
//! A [`TokenSpec`] pairs a lexeme (either a literal string or a regular
//! expression, distinguished by [`TokenType`]) with the semantic symbol the
//! scanner should produce, the grammar line it was defined on, and an
//! optional named lexer action. The symbol type is opaque to the generator;
//! it is cloned onto accepting states and otherwise never inspected.

use compact_str::CompactString;

/// The kind of lexeme a token specification carries, and its priority.
///
/// The ordering is the disambiguation priority: when two tokens accept in
/// the same DFA state, the one with the higher type wins. Literals outrank
/// regular expressions so that keywords beat identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenType {
    /// No lexeme. Never selected as an accepting symbol.
    Null,
    /// The lexeme is a regular expression.
    Regex,
    /// The lexeme is a literal character sequence.
    Literal,
}

/// A single token specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec<S> {
    token_type: TokenType,
    line: u32,
    symbol: S,
    lexeme: CompactString,
    action: Option<CompactString>,
}

impl<S> TokenSpec<S> {
    /// Create a token specification without an action.
    pub fn new(token_type: TokenType, line: u32, symbol: S, lexeme: impl Into<CompactString>) -> Self {
        Self {
            token_type,
            line,
            symbol,
            lexeme: lexeme.into(),
            action: None,
        }
    }

    /// Attach a named lexer action. An empty identifier means no action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<CompactString>) -> Self {
        let action = action.into();
        self.action = if action.is_empty() { None } else { Some(action) };
        self
    }

    /// The lexeme kind, which doubles as the disambiguation priority.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// The grammar line this token was defined on.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// The semantic symbol produced when this token is matched.
    #[must_use]
    pub const fn symbol(&self) -> &S {
        &self.symbol
    }

    /// The literal or regular expression source text.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub(crate) fn lexeme_compact(&self) -> &CompactString {
        &self.lexeme
    }

    /// The identifier of the lexer action attached to this token, if any.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_priority() {
        assert!(TokenType::Literal > TokenType::Regex);
        assert!(TokenType::Regex > TokenType::Null);
    }

    #[test]
    fn test_token_spec_accessors() {
        let spec = TokenSpec::new(TokenType::Regex, 12, "ident", "[a-z]+");
        assert_eq!(spec.token_type(), TokenType::Regex);
        assert_eq!(spec.line(), 12);
        assert_eq!(*spec.symbol(), "ident");
        assert_eq!(spec.lexeme(), "[a-z]+");
        assert_eq!(spec.action(), None);
    }

    #[test]
    fn test_token_spec_action() {
        let spec = TokenSpec::new(TokenType::Regex, 1, (), "[0-9]+").with_action("push_digit");
        assert_eq!(spec.action(), Some("push_digit"));

        let spec = TokenSpec::new(TokenType::Regex, 1, (), "[0-9]+").with_action("");
        assert_eq!(spec.action(), None);
    }
}
