//! DFA states and transitions.

use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::generator::item::LexerItem;
use crate::regex::PositionSet;

/// Identifier of a state in a [`LexerGenerator`](crate::LexerGenerator).
///
/// Stable across the generator's lifetime. The emitted contiguous state
/// number is [`LexerState::index`], not this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateId(pub(crate) u32);

impl StateId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A transition on the half-open character range `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub begin: u32,
    pub end: u32,
    pub target: StateId,
}

/// A DFA state: an ordered set of items, its outgoing transitions, and the
/// accepting symbol selected for it, if any.
///
/// Identity is the item set. Transitions are appended in ascending range
/// order during construction and never overlap. `symbol` and `index` are
/// each written exactly once.
#[derive(Debug)]
pub struct LexerState<S> {
    items: BTreeSet<LexerItem>,
    transitions: SmallVec<[Transition; 4]>,
    symbol: Option<S>,
    index: Option<u32>,
    processed: bool,
}

impl<S> LexerState<S> {
    pub(crate) fn new() -> Self {
        Self {
            items: BTreeSet::new(),
            transitions: SmallVec::new(),
            symbol: None,
            index: None,
            processed: false,
        }
    }

    /// Add an item for `positions`. Duplicate items collapse, preserving
    /// set identity.
    pub(crate) fn add_item(&mut self, positions: PositionSet) {
        debug_assert!(!self.processed);
        self.items.insert(LexerItem::new(positions));
    }

    pub(crate) fn add_transition(&mut self, begin: u32, end: u32, target: StateId) {
        debug_assert!(begin < end);
        debug_assert!(
            self.transitions
                .last()
                .is_none_or(|last| last.end <= begin)
        );
        self.transitions.push(Transition { begin, end, target });
    }

    pub(crate) fn set_symbol(&mut self, symbol: Option<S>) {
        debug_assert!(self.symbol.is_none());
        self.symbol = symbol;
    }

    pub(crate) fn set_index(&mut self, index: u32) {
        debug_assert!(self.index.is_none());
        self.index = Some(index);
    }

    pub(crate) const fn is_processed(&self) -> bool {
        self.processed
    }

    pub(crate) fn set_processed(&mut self) {
        self.processed = true;
    }

    /// The items identifying this state.
    #[must_use]
    pub const fn items(&self) -> &BTreeSet<LexerItem> {
        &self.items
    }

    /// Outgoing transitions, sorted by range and pairwise disjoint.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The accepting symbol, or `None` for non-accepting states and for
    /// states whose symbol selection conflicted.
    #[must_use]
    pub const fn symbol(&self) -> Option<&S> {
        self.symbol.as_ref()
    }

    /// The contiguous state number assigned after construction.
    #[must_use]
    pub const fn index(&self) -> Option<u32> {
        self.index
    }
}
