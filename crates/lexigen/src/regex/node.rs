//! The annotated regular expression syntax tree.
//!
//! Nodes live in a [`RegexTree`] arena and refer to each other by
//! [`NodeId`]. Children are always created before their parents, so the
//! arena order is a valid bottom-up evaluation order for the attribute pass.
//!
//! A *position* is a leaf node: a `Literal`, a `Range`, or an `End` marker.
//! Position sets (firstpos, lastpos, followpos) are ordered sets of node
//! ids, which keeps every downstream comparison deterministic and lets
//! followpos form cycles through `Star` and `Plus` without ownership cycles.

use std::collections::BTreeSet;

/// Identifier of a node in a [`RegexTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// An ordered set of positions (leaf node ids).
pub type PositionSet = BTreeSet<NodeId>;

/// The kind of a regex node, with child links for interior nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexNodeKind {
    /// A single code point.
    Literal(u32),
    /// Any code point in the half-open range.
    Range(u32, u32),
    /// Concatenation of two expressions.
    Cat(NodeId, NodeId),
    /// Alternation of two expressions.
    Or(NodeId, NodeId),
    /// Zero or more repetitions.
    Star(NodeId),
    /// One or more repetitions.
    Plus(NodeId),
    /// Zero or one occurrence.
    Optional(NodeId),
    /// Accepting marker for the token with the given index.
    End(usize),
}

impl RegexNodeKind {
    /// Child node ids, left to right.
    pub fn children(self) -> impl Iterator<Item = NodeId> {
        let pair = match self {
            Self::Cat(left, right) | Self::Or(left, right) => [Some(left), Some(right)],
            Self::Star(child) | Self::Plus(child) | Self::Optional(child) => [Some(child), None],
            Self::Literal(_) | Self::Range(..) | Self::End(_) => [None, None],
        };
        pair.into_iter().flatten()
    }
}

/// A node of the annotated syntax tree.
#[derive(Debug, Clone)]
pub struct RegexNode {
    kind: RegexNodeKind,
    nullable: bool,
    firstpos: PositionSet,
    lastpos: PositionSet,
    followpos: PositionSet,
}

impl RegexNode {
    fn new(kind: RegexNodeKind) -> Self {
        Self {
            kind,
            nullable: false,
            firstpos: PositionSet::new(),
            lastpos: PositionSet::new(),
            followpos: PositionSet::new(),
        }
    }

    /// The node kind.
    #[must_use]
    pub const fn kind(&self) -> RegexNodeKind {
        self.kind
    }

    /// True for `End` markers.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self.kind, RegexNodeKind::End(_))
    }

    /// The character range matched by this leaf, or `None` for `End`
    /// markers and interior nodes.
    #[must_use]
    pub const fn char_range(&self) -> Option<(u32, u32)> {
        match self.kind {
            RegexNodeKind::Literal(character) => Some((character, character + 1)),
            RegexNodeKind::Range(begin, end) => Some((begin, end)),
            _ => None,
        }
    }

    /// True when the expression rooted here matches the empty string.
    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }

    /// Positions that can begin a match of the expression rooted here.
    #[must_use]
    pub const fn firstpos(&self) -> &PositionSet {
        &self.firstpos
    }

    /// Positions that can end a match of the expression rooted here.
    #[must_use]
    pub const fn lastpos(&self) -> &PositionSet {
        &self.lastpos
    }

    /// Positions that can follow this position. Only meaningful on leaves.
    #[must_use]
    pub const fn followpos(&self) -> &PositionSet {
        &self.followpos
    }
}

/// Arena holding every node of the combined syntax tree.
#[derive(Debug, Default)]
pub struct RegexTree {
    nodes: Vec<RegexNode>,
}

impl RegexTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &RegexNode {
        &self.nodes[id.index()]
    }

    /// Append a node and return its id.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn add(&mut self, kind: RegexNodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(RegexNode::new(kind));
        id
    }

    /// Compute nullable, firstpos and lastpos for every node, then the
    /// followpos sets on the leaves.
    ///
    /// Children precede parents in the arena, so one forward scan is a
    /// complete bottom-up pass.
    pub(crate) fn compute_attributes(&mut self) {
        for index in 0..self.nodes.len() {
            let id = NodeId(index as u32);
            match self.nodes[index].kind {
                RegexNodeKind::Literal(_) | RegexNodeKind::Range(..) | RegexNodeKind::End(_) => {
                    let node = &mut self.nodes[index];
                    node.nullable = false;
                    node.firstpos.insert(id);
                    node.lastpos.insert(id);
                }
                RegexNodeKind::Cat(left, right) => {
                    let left = &self.nodes[left.index()];
                    let right_node = &self.nodes[right.index()];
                    let nullable = left.nullable && right_node.nullable;
                    let mut firstpos = left.firstpos.clone();
                    if left.nullable {
                        firstpos.extend(right_node.firstpos.iter().copied());
                    }
                    let mut lastpos = right_node.lastpos.clone();
                    if right_node.nullable {
                        lastpos.extend(left.lastpos.iter().copied());
                    }
                    let node = &mut self.nodes[index];
                    node.nullable = nullable;
                    node.firstpos = firstpos;
                    node.lastpos = lastpos;
                }
                RegexNodeKind::Or(left, right) => {
                    let left = &self.nodes[left.index()];
                    let right_node = &self.nodes[right.index()];
                    let nullable = left.nullable || right_node.nullable;
                    let mut firstpos = left.firstpos.clone();
                    firstpos.extend(right_node.firstpos.iter().copied());
                    let mut lastpos = left.lastpos.clone();
                    lastpos.extend(right_node.lastpos.iter().copied());
                    let node = &mut self.nodes[index];
                    node.nullable = nullable;
                    node.firstpos = firstpos;
                    node.lastpos = lastpos;
                }
                RegexNodeKind::Star(child) | RegexNodeKind::Optional(child) => {
                    let firstpos = self.nodes[child.index()].firstpos.clone();
                    let lastpos = self.nodes[child.index()].lastpos.clone();
                    let node = &mut self.nodes[index];
                    node.nullable = true;
                    node.firstpos = firstpos;
                    node.lastpos = lastpos;
                }
                RegexNodeKind::Plus(child) => {
                    let child_node = &self.nodes[child.index()];
                    let nullable = child_node.nullable;
                    let firstpos = child_node.firstpos.clone();
                    let lastpos = child_node.lastpos.clone();
                    let node = &mut self.nodes[index];
                    node.nullable = nullable;
                    node.firstpos = firstpos;
                    node.lastpos = lastpos;
                }
            }
        }

        for index in 0..self.nodes.len() {
            match self.nodes[index].kind {
                RegexNodeKind::Cat(left, right) => {
                    let sources = self.nodes[left.index()].lastpos.clone();
                    let targets = self.nodes[right.index()].firstpos.clone();
                    self.extend_followpos(&sources, &targets);
                }
                RegexNodeKind::Star(child) | RegexNodeKind::Plus(child) => {
                    let sources = self.nodes[child.index()].lastpos.clone();
                    let targets = self.nodes[child.index()].firstpos.clone();
                    self.extend_followpos(&sources, &targets);
                }
                _ => {}
            }
        }
    }

    fn extend_followpos(&mut self, sources: &PositionSet, targets: &PositionSet) {
        for &source in sources {
            self.nodes[source.index()]
                .followpos
                .extend(targets.iter().copied());
        }
    }
}
