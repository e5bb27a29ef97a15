//! # Error Types
//!
//! Error types and the error-sink interface for lexer generation.
//!
//! The generator never aborts and never returns `Result` from generation.
//! Every problem found while parsing regular expressions or selecting accept
//! symbols is reported through an [`ErrorSink`] supplied by the caller, and
//! generation degrades per the rules in the component contracts: parse errors
//! suppress state construction entirely, symbol conflicts leave a single
//! state's symbol unresolved but keep the rest of the automaton valid.
//!
//! [`ErrorBuffer`] is a ready-made sink that collects everything it is given.
//! The unit type `()` also implements [`ErrorSink`] and discards all reports,
//! for callers that only care about the final error count.

use compact_str::CompactString;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// An error found while generating a lexer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GeneratorError {
    /// A regular expression that does not match the supported grammar.
    #[error("syntax error in '{lexeme}': {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexigen::syntax_error)))]
    SyntaxError {
        lexeme: CompactString,
        message: String,
    },

    /// A malformed escape sequence, e.g. `\x` without two hex digits.
    #[error("unknown escape sequence '\\{escape}' in '{lexeme}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexigen::unknown_escape)))]
    UnknownEscape {
        lexeme: CompactString,
        escape: CompactString,
    },

    /// A bracket expression that matches no characters at all.
    #[error("empty character class in '{lexeme}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexigen::empty_character_class)))]
    EmptyCharacterClass { lexeme: CompactString },

    /// Two tokens of equal priority type, defined on the same line, accept in
    /// the same state. Neither can be preferred over the other.
    #[error("'{first}' and '{second}' conflict but are both defined on line {line}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexigen::symbol_conflict)))]
    SymbolConflict {
        first: CompactString,
        second: CompactString,
        line: u32,
    },
}

/// Receiver for errors and debug output fired during generation.
///
/// The generator holds the sink only for the duration of a generation call
/// and never stores it in its outputs. Both operations are notifications;
/// implementations must not call back into the generator.
///
/// All methods have empty default bodies so a sink can implement only what
/// it cares about.
pub trait ErrorSink {
    /// Called once for every error, with the line number of the token
    /// specification that produced it.
    fn error(&mut self, line: u32, error: &GeneratorError) {
        let _ = (line, error);
    }

    /// Called with pre-formatted debug output, e.g. the parse tree dump.
    fn print(&mut self, message: fmt::Arguments<'_>) {
        let _ = message;
    }
}

/// Discards every report.
impl ErrorSink for () {}

/// An [`ErrorSink`] that buffers everything it receives.
#[derive(Debug, Default)]
pub struct ErrorBuffer {
    /// Reported errors, paired with the originating line.
    pub errors: Vec<(u32, GeneratorError)>,
    /// Debug output, one entry per `print` call.
    pub messages: Vec<String>,
}

impl ErrorBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no errors have been reported. Debug output does not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ErrorSink for ErrorBuffer {
    fn error(&mut self, line: u32, error: &GeneratorError) {
        self.errors.push((line, error.clone()));
    }

    fn print(&mut self, message: fmt::Arguments<'_>) {
        self.messages.push(message.to_string());
    }
}
