//! This crate is the engine behind an interactive Binary Search Tree (BST) visualization, mostly
//! for educational purposes: the tree itself, plus the sequencing that plays traversals and search
//! paths back one node at a time.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored values. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The tree here is deliberately left unbalanced so that the shape a sequence of inserts produces
//! is exactly the one a student would draw by hand. Visiting the left subtree, then the node, then
//! the right subtree yields the values in sorted order; visiting the node first (preorder) or last
//! (postorder) gives the other two classical traversals.
//!
//! ## Playback
//!
//! The [`sequencer`] and [`stepper`] modules turn a traversal or a search path into timed
//! [`Instruction`]s for a renderer. Nothing runs in the background: the owner advances a virtual
//! clock with `tick` and reports when edge transitions finish. [`Visualizer`] wires a tree and
//! both players together into one session.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod config;
pub mod display;
pub mod error;
pub mod highlight;
pub mod sequencer;
pub mod stepper;
pub mod timeline;
pub mod tree;
pub mod visualizer;

pub use config::{AnimationConfig, Config};
pub use display::DisplayNode;
pub use error::{ConfigError, InputError, TreeError};
pub use highlight::{EdgeTicket, HighlightSet, Instruction, Mark};
pub use sequencer::{Mode, Sequencer, Step};
pub use stepper::{Stepper, StepperState};
pub use timeline::Generation;
pub use tree::{NodeId, NodeRef, Order, SearchResult, Tree};
pub use visualizer::{SearchReport, Visualizer};
