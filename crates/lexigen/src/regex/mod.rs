//! # Regular Expression Front-End
//!
//! Parsing of token lexemes into a single annotated syntax tree.
//!
//! Every token specification contributes one subtree terminated by an `End`
//! marker carrying the token; the subtrees are spliced under a shared root
//! of alternations. [`RegexParser`] then computes the nullable, firstpos,
//! lastpos and followpos attributes on the combined tree, which is all the
//! DFA construction in [`crate::generator`] needs.
//!
//! Supported syntax, highest to lowest precedence:
//!
//! ```text
//! expr     := alt
//! alt      := concat ('|' concat)*
//! concat   := repeat repeat*
//! repeat   := atom ('*' | '+' | '?')?
//! atom     := literal | '.' | '(' expr ')' | '[' class ']'
//! class    := '^'? classItem+
//! ```
//!
//! Bracket expressions accept single characters, inclusive ranges such as
//! `a-z`, POSIX-style named classes such as `[:digit:]`, and negation with a
//! leading `^`. Escapes decode `\n \r \t \0 \xHH` and pass any other escaped
//! character through literally.

pub mod charset;
pub mod node;
pub mod parser;

pub use charset::CharSet;
pub use node::{NodeId, PositionSet, RegexNode, RegexNodeKind, RegexTree};
pub use parser::RegexParser;
