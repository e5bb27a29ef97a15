//! The lexer-action registry.
//!
//! Token specifications may name a semantic action, e.g. a hook that pushes
//! the matched lexeme somewhere. Identifiers are interned: the first mention
//! allocates an action with a fresh contiguous index, later mentions resolve
//! to the same action. The index is what ends up in the emitted table.

use lasso::{Key, Rodeo, Spur};

/// Handle to an interned lexer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(Spur);

impl ActionId {
    /// The action's contiguous index, assigned at first mention.
    #[must_use]
    pub fn index(self) -> usize {
        self.0.into_usize()
    }
}

/// A registered action, as exposed in the generator's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerAction<'a> {
    pub index: usize,
    pub identifier: &'a str,
}

/// Interning registry of named lexer actions.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    identifiers: Rodeo,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `identifier`, allocating an index on first mention.
    ///
    /// Returns `None` for the empty identifier, which means "no action".
    pub fn add(&mut self, identifier: &str) -> Option<ActionId> {
        if identifier.is_empty() {
            return None;
        }
        Some(ActionId(self.identifiers.get_or_intern(identifier)))
    }

    /// Look up an already-interned identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<ActionId> {
        self.identifiers.get(identifier).map(ActionId)
    }

    /// Resolve an action id back to its identifier.
    #[must_use]
    pub fn identifier(&self, id: ActionId) -> &str {
        self.identifiers.resolve(&id.0)
    }

    /// Number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// True when no action has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// All actions in index order.
    pub fn iter(&self) -> impl Iterator<Item = LexerAction<'_>> {
        self.identifiers.iter().map(|(key, identifier)| LexerAction {
            index: key.into_usize(),
            identifier,
        })
    }
}
