//! The highlight state shared between the sequencers and whatever draws the tree.
//!
//! Sequencers never touch this state directly. They queue [`Instruction`]s, the owner drains them
//! and applies them here (or forwards them to a real renderer). Edge transitions that a sequencer
//! is waiting on are simulated with their durations so [`HighlightSet::tick`] can report when each
//! one ends.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::timeline::Generation;
use crate::tree::NodeId;

/// Kinds of highlight a node or edge can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mark {
    /// The node currently visited by traversal playback.
    Traversal,
    /// The node currently visited by search-path playback.
    SearchPath,
    /// A freshly inserted node.
    Highlighted,
}

impl Mark {
    /// Lowercase name, used when rendering marks as text.
    pub fn as_str(self) -> &'static str {
        match self {
            Mark::Traversal => "traversal",
            Mark::SearchPath => "search-path",
            Mark::Highlighted => "highlighted",
        }
    }
}

/// Handle for an edge transition a sequencer is waiting on. Hand it back through
/// [`Sequencer::transition_finished`](crate::sequencer::Sequencer::transition_finished) once the
/// transition ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeTicket {
    pub(crate) generation: Generation,
    pub(crate) step: usize,
}

/// One change to the highlight state.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// Remove every mark from every node and edge.
    ClearAll,
    /// Remove one kind of mark everywhere.
    ClearMarks(Mark),
    /// Add `mark` to `node`.
    MarkNode {
        /// Node to mark.
        node: NodeId,
        /// Kind of mark.
        mark: Mark,
    },
    /// Mark the edge from `parent` down to `child` and draw it in over `duration`. Edges are
    /// identified by their child.
    AnimateEdge {
        /// Upper end of the edge.
        parent: NodeId,
        /// Lower end of the edge, which names it.
        child: NodeId,
        /// Kind of mark.
        mark: Mark,
        /// How long the edge takes to draw in.
        duration: Duration,
        /// Present when a sequencer waits for this transition to end.
        ticket: Option<EdgeTicket>,
    },
}

#[derive(Debug)]
struct Transition {
    ticket: EdgeTicket,
    remaining: Duration,
}

/// Marks currently on screen, plus the edge transitions still running.
#[derive(Debug, Default)]
pub struct HighlightSet {
    nodes: BTreeSet<(NodeId, Mark)>,
    edges: BTreeSet<(NodeId, Mark)>,
    transitions: Vec<Transition>,
}

impl HighlightSet {
    /// An empty set with nothing marked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one instruction.
    pub fn apply(&mut self, instruction: &Instruction) {
        match *instruction {
            Instruction::ClearAll => {
                self.nodes.clear();
                self.edges.clear();
            }
            Instruction::ClearMarks(mark) => {
                self.nodes.retain(|&(_, m)| m != mark);
                self.edges.retain(|&(_, m)| m != mark);
            }
            Instruction::MarkNode { node, mark } => {
                self.nodes.insert((node, mark));
            }
            Instruction::AnimateEdge {
                child,
                mark,
                duration,
                ticket,
                ..
            } => {
                self.edges.insert((child, mark));
                if let Some(ticket) = ticket {
                    self.transitions.push(Transition {
                        ticket,
                        remaining: duration,
                    });
                }
            }
        }
    }

    /// Marks carried by `node`.
    pub fn node_marks(&self, node: NodeId) -> Vec<Mark> {
        self.nodes
            .iter()
            .filter(|&&(n, _)| n == node)
            .map(|&(_, m)| m)
            .collect()
    }

    /// Nodes carrying `mark`.
    pub fn marked_nodes(&self, mark: Mark) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|&&(_, m)| m == mark)
            .map(|&(n, _)| n)
            .collect()
    }

    /// Child ids of the edges carrying `mark`.
    pub fn marked_edges(&self, mark: Mark) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|&&(_, m)| m == mark)
            .map(|&(n, _)| n)
            .collect()
    }

    /// Whether no node or edge is marked. Running transitions don't count.
    pub fn is_clear(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Time until the next awaited edge transition ends.
    pub fn until_next_transition(&self) -> Option<Duration> {
        self.transitions.iter().map(|t| t.remaining).min()
    }

    /// Advances every in-flight transition by `dt` and returns the tickets of those that ended.
    /// Clearing marks doesn't stop a transition; stale tickets are for the sequencer to ignore.
    pub fn tick(&mut self, dt: Duration) -> Vec<EdgeTicket> {
        let mut finished = Vec::new();
        self.transitions.retain_mut(|t| {
            t.remaining = t.remaining.saturating_sub(dt);
            if t.remaining.is_zero() {
                finished.push(t.ticket);
                false
            } else {
                true
            }
        });
        finished
    }
}
