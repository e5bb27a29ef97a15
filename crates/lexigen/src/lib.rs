//! # Lexigen
//!
//! A lexer generator: turns a list of token specifications (regular
//! expression, semantic symbol, source line, priority type) into a
//! deterministic finite automaton suitable for driving a table-based scanner.
//!
//! ## Overview
//!
//! Generation runs in two stages:
//!
//! - [`RegexParser`] parses every token's regular expression into a single
//!   annotated syntax tree and computes the nullable, firstpos, lastpos and
//!   followpos attributes used by the direct DFA construction.
//! - [`LexerGenerator`] performs subset construction over the distinct
//!   character ranges contributed by the tree's positions, selects the
//!   accepting symbol for each state by token priority, and numbers the
//!   states contiguously.
//!
//! The output is a set of states, each with an index, an optional accepting
//! symbol and a sorted list of half-open character-range transitions, plus a
//! registry of named lexer actions. Serializing the tables to a target
//! format is left to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use lexigen::{ErrorBuffer, LexerGenerator, TokenSpec, TokenType};
//!
//! // 1. Define the semantic symbols your scanner will produce.
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Sym {
//!     Identifier,
//!     If,
//! }
//!
//! // 2. Describe the tokens. Literal tokens outrank regular expressions,
//! //    which is how keywords beat identifiers.
//! let tokens = vec![
//!     TokenSpec::new(TokenType::Regex, 1, Sym::Identifier, "[a-z][a-z0-9]*"),
//!     TokenSpec::new(TokenType::Literal, 2, Sym::If, "if"),
//! ];
//!
//! // 3. Generate the automaton. Errors are reported through a pluggable
//! //    sink; `ErrorBuffer` simply collects them.
//! let mut errors = ErrorBuffer::default();
//! let generator = LexerGenerator::new(&tokens, &[], &mut errors);
//! assert!(errors.is_empty());
//!
//! // 4. Walk the emitted tables.
//! let start = generator.start_state().expect("non-empty token list");
//! for transition in start.transitions() {
//!     let target = generator.state(transition.target);
//!     println!(
//!         "[{:#x}, {:#x}) -> state {:?}",
//!         transition.begin,
//!         transition.end,
//!         target.index()
//!     );
//! }
//! ```
//!
//! ## Modules
//!
//! - [`token`] - token specifications and priority types
//! - [`regex`] - regular expression parsing and the annotated syntax tree
//! - [`generator`] - DFA construction, states, items and lexer actions
//! - [`ranges`] - partitioning of overlapping character ranges
//! - [`error`] - error types and the error-sink interface

pub mod error;
pub mod generator;
pub mod ranges;
pub mod regex;
pub mod token;

pub use error::{ErrorBuffer, ErrorSink, GeneratorError};
pub use generator::{
    ActionId, ActionRegistry, LexerAction, LexerGenerator, LexerItem, LexerState, StateId,
    Transition,
};
pub use ranges::RangeSet;
pub use regex::{NodeId, RegexNode, RegexNodeKind, RegexParser, RegexTree};
pub use token::{TokenSpec, TokenType};

/// Smallest code point in the transition alphabet.
pub const BEGIN_CHARACTER: u32 = 0;

/// One past the largest code point in the transition alphabet.
pub const END_CHARACTER: u32 = 0x0011_0000;

/// Sentinel marking an unset begin character. Never a valid transition bound.
pub const INVALID_BEGIN_CHARACTER: u32 = 0xFFFF_FFFE;

/// Sentinel marking an unset end character. Never a valid transition bound.
pub const INVALID_END_CHARACTER: u32 = 0xFFFF_FFFF;
