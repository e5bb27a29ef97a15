//! # DFA Construction
//!
//! Direct construction of the scanner automaton from the annotated regex
//! tree, per the classic firstpos/followpos method.
//!
//! ## Overview
//!
//! [`LexerGenerator`] seeds a start state from the combined tree's firstpos
//! and runs to closure: for every unprocessed state it partitions the
//! character ranges contributed by the state's positions into distinct
//! intervals ([`RangeSet`]), computes the goto item set for each interval,
//! interns the resulting state by item-set identity, and records a
//! transition. Accepting symbols are selected per state as states are
//! created, and every state receives a contiguous index once construction
//! finishes.
//!
//! Two automatons can be generated side by side: the token DFA and the
//! whitespace DFA. They share the action registry, and whitespace state
//! indices continue where the token state indices stop, so downstream
//! consumers see one contiguous index range.
//!
//! ## Determinism
//!
//! States are canonically ordered by their item sets. Given identical
//! inputs, the generator produces identical states, transitions, symbols
//! and indices on every run.

pub mod actions;
pub mod item;
pub mod state;

pub use actions::{ActionId, ActionRegistry, LexerAction};
pub use item::LexerItem;
pub use state::{LexerState, StateId, Transition};

use hashbrown::HashMap;
use std::collections::{BTreeSet, VecDeque};

use crate::error::{ErrorSink, GeneratorError};
use crate::ranges::RangeSet;
use crate::regex::{RegexNodeKind, RegexParser, RegexTree};
use crate::token::TokenSpec;
use crate::{INVALID_BEGIN_CHARACTER, INVALID_END_CHARACTER};

/// Generator of table-driven lexer state machines.
///
/// Owns the regex trees' outputs for the duration of generation and the
/// resulting states, actions and start states afterwards. All errors are
/// reported through the sink passed to the constructor; the sink is not
/// retained.
#[derive(Debug)]
pub struct LexerGenerator<S> {
    actions: ActionRegistry,
    states: Vec<LexerState<S>>,
    state_ids: Vec<StateId>,
    whitespace_state_ids: Vec<StateId>,
    start_state: Option<StateId>,
    whitespace_start_state: Option<StateId>,
    ranges: RangeSet,
}

impl<S: Clone> LexerGenerator<S> {
    /// Generate the token DFA from `tokens` and the whitespace DFA from
    /// `whitespace_tokens`.
    ///
    /// Either list may be empty, in which case the corresponding DFA has no
    /// states and no start state. A list whose parsing reports errors also
    /// produces no states.
    pub fn new(
        tokens: &[TokenSpec<S>],
        whitespace_tokens: &[TokenSpec<S>],
        sink: &mut dyn ErrorSink,
    ) -> Self {
        let mut generator = Self {
            actions: ActionRegistry::new(),
            states: Vec::new(),
            state_ids: Vec::new(),
            whitespace_state_ids: Vec::new(),
            start_state: None,
            whitespace_start_state: None,
            ranges: RangeSet::new(),
        };

        let parser = RegexParser::new(tokens, &mut generator.actions, sink);
        let (ids, start) = generator.generate_states(&parser, sink);
        generator.state_ids = ids;
        generator.start_state = start;

        let parser = RegexParser::new(whitespace_tokens, &mut generator.actions, sink);
        let (ids, start) = generator.generate_states(&parser, sink);
        generator.whitespace_state_ids = ids;
        generator.whitespace_start_state = start;

        generator.generate_indices();
        generator
    }

    /// Generate a DFA recognizing a single token.
    pub fn from_token(token: &TokenSpec<S>, sink: &mut dyn ErrorSink) -> Self {
        Self::new(std::slice::from_ref(token), &[], sink)
    }

    /// Run the closure for one token list. Returns the canonically ordered
    /// state ids and the start state.
    #[allow(clippy::cast_possible_truncation)]
    fn generate_states(
        &mut self,
        parser: &RegexParser<S>,
        sink: &mut dyn ErrorSink,
    ) -> (Vec<StateId>, Option<StateId>) {
        if parser.is_empty() || parser.error_count() > 0 {
            return (Vec::new(), None);
        }
        let Some(root) = parser.root() else {
            return (Vec::new(), None);
        };
        let tree = parser.tree();

        let mut interned: HashMap<BTreeSet<LexerItem>, StateId, ahash::RandomState> =
            HashMap::default();
        let mut pending = VecDeque::new();

        let mut start = LexerState::new();
        start.add_item(tree.node(root).firstpos().clone());
        Self::select_symbol(parser, &mut start, sink);
        let start_id = StateId(self.states.len() as u32);
        interned.insert(start.items().clone(), start_id);
        self.states.push(start);
        pending.push_back(start_id);

        while let Some(id) = pending.pop_front() {
            if self.states[id.index()].is_processed() {
                continue;
            }
            self.states[id.index()].set_processed();

            // Distinct ranges this state can transition on.
            self.ranges.clear();
            for item in self.states[id.index()].items() {
                for &position in item.positions() {
                    if let Some((begin, end)) = tree.node(position).char_range() {
                        self.ranges.insert(begin, end);
                    }
                }
            }

            let intervals: Vec<(u32, u32)> = self.ranges.intervals().collect();
            let items = self.states[id.index()].items().clone();
            for (begin, end) in intervals {
                let mut goto = Self::goto_state(&items, tree, begin, end);
                if goto.items().is_empty() {
                    continue;
                }
                let existing = interned.get(goto.items()).copied();
                let target = match existing {
                    Some(target) => target,
                    None => {
                        Self::select_symbol(parser, &mut goto, sink);
                        let target = StateId(self.states.len() as u32);
                        interned.insert(goto.items().clone(), target);
                        self.states.push(goto);
                        pending.push_back(target);
                        target
                    }
                };
                self.states[id.index()].add_transition(begin, end, target);
            }
        }

        let mut ids: Vec<StateId> = interned.into_values().collect();
        ids.sort_by(|left, right| {
            self.states[left.index()]
                .items()
                .cmp(self.states[right.index()].items())
        });
        (ids, Some(start_id))
    }

    /// The state reached from `items` on any character in `[begin, end)`.
    ///
    /// The sentinel characters are never valid bounds here; the distinct
    /// ranges only ever contain code points contributed by positions.
    fn goto_state(
        items: &BTreeSet<LexerItem>,
        tree: &RegexTree,
        begin: u32,
        end: u32,
    ) -> LexerState<S> {
        debug_assert!(begin != INVALID_BEGIN_CHARACTER && begin != INVALID_END_CHARACTER);
        debug_assert!(end != INVALID_BEGIN_CHARACTER && end != INVALID_END_CHARACTER);
        debug_assert!(begin <= end);

        let mut state = LexerState::new();
        for item in items {
            let next = item.next_positions(tree, begin, end);
            if !next.is_empty() {
                state.add_item(next);
            }
        }
        state
    }

    /// Select the accepting symbol for `state`, if any.
    ///
    /// A pure reduction over the state's `End` positions: the highest token
    /// type wins, the earliest line breaks type ties, and two distinct
    /// tokens with equal type and line are a reported conflict. Candidates
    /// are visited in token order so the outcome never depends on item
    /// iteration order.
    fn select_symbol(parser: &RegexParser<S>, state: &mut LexerState<S>, sink: &mut dyn ErrorSink) {
        let mut accepting: BTreeSet<usize> = BTreeSet::new();
        for item in state.items() {
            for &position in item.positions() {
                if let RegexNodeKind::End(token) = parser.tree().node(position).kind() {
                    accepting.insert(token);
                }
            }
        }

        let mut best: Option<usize> = None;
        for candidate in accepting {
            let Some(current) = best else {
                best = Some(candidate);
                continue;
            };
            let current_token = parser.token(current);
            let candidate_token = parser.token(candidate);
            if candidate_token.token_type() > current_token.token_type() {
                best = Some(candidate);
            } else if candidate_token.token_type() == current_token.token_type() {
                if candidate_token.line() < current_token.line() {
                    best = Some(candidate);
                } else if candidate_token.line() == current_token.line() {
                    sink.error(
                        candidate_token.line(),
                        &GeneratorError::SymbolConflict {
                            first: current_token.lexeme_compact().clone(),
                            second: candidate_token.lexeme_compact().clone(),
                            line: candidate_token.line(),
                        },
                    );
                }
            }
        }

        state.set_symbol(best.map(|token| parser.token(token).symbol().clone()));
    }

    /// Assign contiguous indices: token states first, whitespace states
    /// continuing in the same index space.
    fn generate_indices(&mut self) {
        let ids: Vec<StateId> = self
            .state_ids
            .iter()
            .chain(&self.whitespace_state_ids)
            .copied()
            .collect();
        for (index, id) in ids.into_iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            self.states[id.index()].set_index(index as u32);
        }
    }

    /// Intern a named lexer action, allocating it on first mention.
    ///
    /// Returns `None` for the empty identifier.
    pub fn add_lexer_action(&mut self, identifier: &str) -> Option<ActionId> {
        self.actions.add(identifier)
    }
}

impl<S> LexerGenerator<S> {
    /// The action registry.
    #[must_use]
    pub const fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Look up a state by id, e.g. a transition target.
    #[must_use]
    pub fn state(&self, id: StateId) -> &LexerState<S> {
        &self.states[id.index()]
    }

    /// The token DFA's states, in index order.
    pub fn states(&self) -> impl Iterator<Item = &LexerState<S>> {
        self.state_ids.iter().map(|&id| &self.states[id.index()])
    }

    /// The whitespace DFA's states, in index order.
    pub fn whitespace_states(&self) -> impl Iterator<Item = &LexerState<S>> {
        self.whitespace_state_ids
            .iter()
            .map(|&id| &self.states[id.index()])
    }

    /// The token DFA's start state.
    #[must_use]
    pub fn start_state(&self) -> Option<&LexerState<S>> {
        self.start_state.map(|id| &self.states[id.index()])
    }

    /// The whitespace DFA's start state.
    #[must_use]
    pub fn whitespace_start_state(&self) -> Option<&LexerState<S>> {
        self.whitespace_start_state.map(|id| &self.states[id.index()])
    }

    /// Id of the token DFA's start state.
    #[must_use]
    pub const fn start_state_id(&self) -> Option<StateId> {
        self.start_state
    }

    /// Id of the whitespace DFA's start state.
    #[must_use]
    pub const fn whitespace_start_state_id(&self) -> Option<StateId> {
        self.whitespace_start_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn test_empty_token_lists_produce_no_states() {
        let generator: LexerGenerator<u32> = LexerGenerator::new(&[], &[], &mut ());
        assert!(generator.start_state().is_none());
        assert!(generator.whitespace_start_state().is_none());
        assert_eq!(generator.states().count(), 0);
    }

    #[test]
    fn test_parse_errors_suppress_construction() {
        let tokens = vec![TokenSpec::new(TokenType::Regex, 1, 0u32, "(broken")];
        let mut errors = crate::error::ErrorBuffer::new();
        let generator = LexerGenerator::new(&tokens, &[], &mut errors);

        assert!(!errors.is_empty());
        assert!(generator.start_state().is_none());
        assert_eq!(generator.states().count(), 0);
    }

    #[test]
    fn test_from_token_builds_a_dfa() {
        let token = TokenSpec::new(TokenType::Literal, 1, 42u32, "ab");
        let generator = LexerGenerator::from_token(&token, &mut ());

        assert_eq!(generator.states().count(), 3);
        let start = generator.start_state().unwrap();
        assert_eq!(start.transitions().len(), 1);
        assert_eq!(start.symbol(), None);
    }

    #[test]
    fn test_add_lexer_action_interns() {
        let mut generator: LexerGenerator<u32> = LexerGenerator::new(&[], &[], &mut ());
        let first = generator.add_lexer_action("record");
        let second = generator.add_lexer_action("record");
        assert_eq!(first, second);
        assert_eq!(generator.add_lexer_action(""), None);
        assert_eq!(generator.actions().len(), 1);
    }
}
