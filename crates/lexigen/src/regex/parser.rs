//! Recursive-descent parsing of token lexemes into a combined annotated
//! syntax tree.
//!
//! Each token contributes `Cat(expr, End(token))`; the per-token trees are
//! spliced under left-leaning `Or` nodes so every accepting position carries
//! its originating token. Literal-type tokens are parsed as escape-decoded
//! character sequences, regex-type tokens through the full grammar.
//!
//! Errors are reported through the caller's [`ErrorSink`] with the line of
//! the offending token specification. Parsing continues with the next token
//! so that every broken lexeme is reported in one run, but any error makes
//! the generator skip state construction.

use crate::error::{ErrorSink, GeneratorError};
use crate::generator::ActionRegistry;
use crate::regex::charset::{self, CharSet};
use crate::regex::node::{NodeId, RegexNodeKind, RegexTree};
use crate::token::{TokenSpec, TokenType};
use crate::{BEGIN_CHARACTER, END_CHARACTER};

/// Parser for the lexemes of a list of token specifications.
///
/// Holds the combined tree, the parsed tokens and the error count. The
/// generator reads all three while constructing states.
#[derive(Debug)]
pub struct RegexParser<S> {
    tree: RegexTree,
    tokens: Vec<TokenSpec<S>>,
    root: Option<NodeId>,
    errors: usize,
}

impl<S: Clone> RegexParser<S> {
    /// Parse every token in `tokens`, interning named actions into
    /// `actions` on first mention and reporting problems to `sink`.
    pub fn new(
        tokens: &[TokenSpec<S>],
        actions: &mut ActionRegistry,
        sink: &mut dyn ErrorSink,
    ) -> Self {
        let mut tree = RegexTree::new();
        let mut errors = 0usize;
        let mut root: Option<NodeId> = None;

        for (index, token) in tokens.iter().enumerate() {
            if let Some(action) = token.action() {
                actions.add(action);
            }

            let expr = {
                let mut context = ParseContext {
                    tree: &mut tree,
                    token,
                    sink: &mut *sink,
                    errors: &mut errors,
                    cursor: Cursor::new(token.lexeme()),
                };
                match token.token_type() {
                    TokenType::Literal => context.literal(),
                    TokenType::Regex | TokenType::Null => context.regular_expression(),
                }
            };

            if let Some(expr) = expr {
                let end = tree.add(RegexNodeKind::End(index));
                let spliced = tree.add(RegexNodeKind::Cat(expr, end));
                root = Some(match root {
                    None => spliced,
                    Some(existing) => tree.add(RegexNodeKind::Or(existing, spliced)),
                });
            }
        }

        if root.is_some() {
            tree.compute_attributes();
        }

        Self {
            tree,
            tokens: tokens.to_vec(),
            root,
            errors,
        }
    }

    /// Parse a single token specification.
    pub fn from_token(
        token: &TokenSpec<S>,
        actions: &mut ActionRegistry,
        sink: &mut dyn ErrorSink,
    ) -> Self {
        Self::new(std::slice::from_ref(token), actions, sink)
    }
}

impl<S> RegexParser<S> {
    /// True when no token produced a tree.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of errors reported while parsing.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors
    }

    /// Root of the combined tree, if any token parsed.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The combined annotated tree.
    #[must_use]
    pub const fn tree(&self) -> &RegexTree {
        &self.tree
    }

    /// The parsed token specifications, in input order.
    #[must_use]
    pub fn tokens(&self) -> &[TokenSpec<S>] {
        &self.tokens
    }

    /// The token specification behind an `End` marker's token index.
    #[must_use]
    pub fn token(&self, index: usize) -> &TokenSpec<S> {
        &self.tokens[index]
    }

    /// Dump the combined tree through the sink's `print` operation.
    pub fn print(&self, sink: &mut dyn ErrorSink) {
        if let Some(root) = self.root {
            self.print_node(root, 0, sink);
        }
    }

    fn print_node(&self, id: NodeId, depth: usize, sink: &mut dyn ErrorSink) {
        let node = self.tree.node(id);
        let follow: Vec<u32> = node.followpos().iter().map(|position| position.0).collect();
        sink.print(format_args!(
            "{:indent$}{}: {:?} nullable={} follow={:?}",
            "",
            id.0,
            node.kind(),
            node.nullable(),
            follow,
            indent = depth * 2
        ));
        for child in node.kind().children() {
            self.print_node(child, depth + 1, sink);
        }
    }
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let character = self.peek();
        if character.is_some() {
            self.pos += 1;
        }
        character
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

/// Per-token parse state. Owns the cursor, borrows everything else.
struct ParseContext<'a, S> {
    tree: &'a mut RegexTree,
    token: &'a TokenSpec<S>,
    sink: &'a mut dyn ErrorSink,
    errors: &'a mut usize,
    cursor: Cursor,
}

impl<S> ParseContext<'_, S> {
    fn report(&mut self, error: GeneratorError) {
        *self.errors += 1;
        self.sink.error(self.token.line(), &error);
    }

    fn error_syntax(&mut self, message: &str) {
        self.report(GeneratorError::SyntaxError {
            lexeme: self.token.lexeme_compact().clone(),
            message: message.to_string(),
        });
    }

    /// Parse the whole lexeme as a regular expression.
    fn regular_expression(&mut self) -> Option<NodeId> {
        let expr = self.alt()?;
        if let Some(character) = self.cursor.peek() {
            self.error_syntax(&format!("unexpected '{character}'"));
            return None;
        }
        Some(expr)
    }

    /// Parse the whole lexeme as an escape-decoded literal.
    fn literal(&mut self) -> Option<NodeId> {
        let mut node: Option<NodeId> = None;
        while let Some(character) = self.cursor.bump() {
            let decoded = if character == '\\' {
                self.escape()?
            } else {
                u32::from(character)
            };
            let leaf = self.tree.add(RegexNodeKind::Literal(decoded));
            node = Some(match node {
                None => leaf,
                Some(left) => self.tree.add(RegexNodeKind::Cat(left, leaf)),
            });
        }
        if node.is_none() {
            self.error_syntax("empty literal");
        }
        node
    }

    fn alt(&mut self) -> Option<NodeId> {
        let mut node = self.concat()?;
        while self.cursor.eat('|') {
            let right = self.concat()?;
            node = self.tree.add(RegexNodeKind::Or(node, right));
        }
        Some(node)
    }

    fn concat(&mut self) -> Option<NodeId> {
        let mut node = self.repeat()?;
        while let Some(character) = self.cursor.peek() {
            if matches!(character, '|' | ')') {
                break;
            }
            let right = self.repeat()?;
            node = self.tree.add(RegexNodeKind::Cat(node, right));
        }
        Some(node)
    }

    fn repeat(&mut self) -> Option<NodeId> {
        let atom = self.atom()?;
        if self.cursor.eat('*') {
            return Some(self.tree.add(RegexNodeKind::Star(atom)));
        }
        if self.cursor.eat('+') {
            return Some(self.tree.add(RegexNodeKind::Plus(atom)));
        }
        if self.cursor.eat('?') {
            return Some(self.tree.add(RegexNodeKind::Optional(atom)));
        }
        Some(atom)
    }

    fn atom(&mut self) -> Option<NodeId> {
        match self.cursor.peek() {
            None => {
                self.error_syntax("unexpected end of expression");
                None
            }
            Some('(') => {
                self.cursor.bump();
                let expr = self.alt()?;
                if self.cursor.eat(')') {
                    Some(expr)
                } else {
                    self.error_syntax("unterminated group");
                    None
                }
            }
            Some('[') => {
                self.cursor.bump();
                self.bracket_expression()
            }
            Some('.') => {
                self.cursor.bump();
                // Any character but newline.
                let before = self.tree.add(RegexNodeKind::Range(BEGIN_CHARACTER, 0x0a));
                let after = self.tree.add(RegexNodeKind::Range(0x0b, END_CHARACTER));
                Some(self.tree.add(RegexNodeKind::Or(before, after)))
            }
            Some('\\') => {
                self.cursor.bump();
                let character = self.escape()?;
                Some(self.tree.add(RegexNodeKind::Literal(character)))
            }
            Some(character @ ('|' | ')' | '*' | '+' | '?' | ']')) => {
                self.error_syntax(&format!("unexpected '{character}'"));
                self.cursor.bump();
                None
            }
            Some(character) => {
                self.cursor.bump();
                Some(self.tree.add(RegexNodeKind::Literal(u32::from(character))))
            }
        }
    }

    /// Parse a bracket expression; the opening `[` is already consumed.
    fn bracket_expression(&mut self) -> Option<NodeId> {
        let negated = self.cursor.eat('^');
        let mut set = CharSet::new();
        if negated {
            set.insert(BEGIN_CHARACTER, END_CHARACTER);
        }

        let mut items = 0usize;
        loop {
            match self.cursor.peek() {
                None => {
                    self.error_syntax("unterminated character class");
                    return None;
                }
                Some(']') => {
                    self.cursor.bump();
                    break;
                }
                Some(_) => {
                    self.class_item(&mut set, negated)?;
                    items += 1;
                }
            }
        }

        if items == 0 || set.is_empty() {
            self.report(GeneratorError::EmptyCharacterClass {
                lexeme: self.token.lexeme_compact().clone(),
            });
            return None;
        }

        let mut node: Option<NodeId> = None;
        for &(begin, end) in set.ranges() {
            let leaf = if end == begin + 1 {
                self.tree.add(RegexNodeKind::Literal(begin))
            } else {
                self.tree.add(RegexNodeKind::Range(begin, end))
            };
            node = Some(match node {
                None => leaf,
                Some(left) => self.tree.add(RegexNodeKind::Or(left, leaf)),
            });
        }
        node
    }

    /// Parse one item of a bracket expression: a named class, a range, or a
    /// single character. In a negated expression items erase instead of
    /// inserting.
    fn class_item(&mut self, set: &mut CharSet, negated: bool) -> Option<()> {
        if self.cursor.peek() == Some('[') && self.cursor.peek2() == Some(':') {
            self.cursor.bump();
            self.cursor.bump();
            let mut name = String::new();
            loop {
                match self.cursor.bump() {
                    None => {
                        self.error_syntax("unterminated character class name");
                        return None;
                    }
                    Some(':') => break,
                    Some(character) => name.push(character),
                }
            }
            if !self.cursor.eat(']') {
                self.error_syntax("unterminated character class name");
                return None;
            }
            match charset::posix_class(&name) {
                Some(ranges) => {
                    for &(begin, end) in ranges {
                        if negated {
                            set.erase(begin, end);
                        } else {
                            set.insert(begin, end);
                        }
                    }
                }
                None => self.error_syntax(&format!("unknown character class name '{name}'")),
            }
            return Some(());
        }

        let begin = self.class_char()?;
        let end = if self.cursor.peek() == Some('-')
            && self.cursor.peek2().is_some()
            && self.cursor.peek2() != Some(']')
        {
            self.cursor.bump();
            let end = self.class_char()?;
            if end < begin {
                self.error_syntax("invalid range in character class");
                return Some(());
            }
            end
        } else {
            begin
        };

        if negated {
            set.erase(begin, end + 1);
        } else {
            set.insert(begin, end + 1);
        }
        Some(())
    }

    fn class_char(&mut self) -> Option<u32> {
        match self.cursor.bump() {
            None => None,
            Some('\\') => self.escape(),
            Some(character) => Some(u32::from(character)),
        }
    }

    /// Decode the character after a consumed backslash.
    fn escape(&mut self) -> Option<u32> {
        match self.cursor.bump() {
            None => {
                self.error_syntax("trailing '\\'");
                None
            }
            Some('n') => Some(0x0a),
            Some('r') => Some(0x0d),
            Some('t') => Some(0x09),
            Some('0') => Some(0x00),
            Some('x') => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match self.cursor.peek().and_then(|character| character.to_digit(16)) {
                        Some(digit) => {
                            self.cursor.bump();
                            value = value * 16 + digit;
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits < 2 {
                    let mut escape = compact_str::CompactString::new("x");
                    if let Some(character) = self.cursor.peek() {
                        escape.push(character);
                    }
                    self.report(GeneratorError::UnknownEscape {
                        lexeme: self.token.lexeme_compact().clone(),
                        escape,
                    });
                    return None;
                }
                Some(value)
            }
            Some(character) => Some(u32::from(character)),
        }
    }
}
