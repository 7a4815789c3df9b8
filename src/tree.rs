//! The tree engine. An unbalanced BST whose nodes live in a table keyed by [`NodeId`], with child
//! and parent links stored as ids rather than pointers.
//!
//! Node ids are handed out once, at insertion, and never change. When a node with two children is
//! deleted its in-order successor is the node that actually leaves the tree: the successor's value
//! moves up into the targeted node, so the targeted node's id stays valid for anything that was
//! drawing it.
//!
//! # Examples
//!
//! ```
//! use bst_viz::tree::{Order, Tree};
//! use bst_viz::TreeError;
//!
//! let mut tree = Tree::new();
//! for value in [50, 25, 75, 15, 35] {
//!     tree.insert(value).unwrap();
//! }
//!
//! // Values are unique.
//! assert_eq!(tree.insert(35), Err(TreeError::DuplicateValue));
//!
//! let values = |order| -> Vec<i32> { tree.traverse(order).iter().map(|n| *n.value()).collect() };
//! assert_eq!(values(Order::In), [15, 25, 35, 50, 75]);
//! assert_eq!(values(Order::Pre), [50, 25, 15, 35, 75]);
//! assert_eq!(values(Order::Post), [15, 35, 25, 75, 50]);
//!
//! // Searching records every node visited on the way down.
//! let result = tree.search(&35);
//! assert!(result.found);
//! assert_eq!(result.values(), [&50, &25, &35]);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{InputError, TreeError};

/// Stable identity of a node. Ids come from a per-tree counter and are never reused, not even
/// after [`Tree::clear`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// The raw counter value behind this id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three depth-first visiting orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Left subtree, node, right subtree. Yields values in ascending order.
    In,
    /// Node, left subtree, right subtree.
    Pre,
    /// Left subtree, right subtree, node.
    Post,
}

impl Order {
    /// Every order, in the order the UI offers them.
    pub const ALL: [Order; 3] = [Order::In, Order::Pre, Order::Post];

    /// Heading used when printing a traversal, e.g. `INORDER`.
    pub fn label(self) -> &'static str {
        match self {
            Order::In => "INORDER",
            Order::Pre => "PREORDER",
            Order::Post => "POSTORDER",
        }
    }
}

impl FromStr for Order {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "inorder" => Ok(Order::In),
            "pre" | "preorder" => Ok(Order::Pre),
            "post" | "postorder" => Ok(Order::Post),
            other => Err(InputError::UnknownOrder(other.to_string())),
        }
    }
}

#[derive(Clone, Copy)]
enum Visit {
    /// Expand a subtree.
    Enter(NodeId),
    /// Output a node.
    Emit(NodeId),
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug)]
struct Node<T> {
    value: T,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> Node<T> {
    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// An unbalanced Binary Search Tree holding unique values.
#[derive(Clone, Debug)]
pub struct Tree<T> {
    nodes: HashMap<NodeId, Node<T>>,
    root: Option<NodeId>,
    size: usize,
    next_id: u64,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root: None,
            size: 0,
            next_id: 0,
        }
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The root node, or `None` when empty.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.map(|id| NodeRef { tree: self, id })
    }

    /// Looks up a node by id. Ids of deleted nodes return `None`.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.nodes
            .contains_key(&id)
            .then_some(NodeRef { tree: self, id })
    }

    /// Drops every node. Calling this on an empty tree does nothing.
    pub fn clear(&mut self) {
        if self.size > 0 {
            debug!("cleared tree of {} nodes", self.size);
        }
        self.nodes.clear();
        self.root = None;
        self.size = 0;
    }

    /// Visits every node exactly once in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_viz::tree::{Order, Tree};
    ///
    /// let tree: Tree<i32> = [2, 1, 3].into_iter().collect();
    /// let pre: Vec<_> = tree.traverse(Order::Pre).iter().map(|n| *n.value()).collect();
    ///
    /// assert_eq!(pre, [2, 1, 3]);
    /// assert!(Tree::<i32>::new().traverse(Order::In).is_empty());
    /// ```
    pub fn traverse(&self, order: Order) -> Vec<NodeRef<'_, T>> {
        let mut out = Vec::with_capacity(self.size);
        self.walk(self.root, order, &mut out);
        out
    }

    /// Shorthand for `traverse(Order::In)`.
    pub fn inorder(&self) -> Vec<NodeRef<'_, T>> {
        self.traverse(Order::In)
    }

    /// Shorthand for `traverse(Order::Pre)`.
    pub fn preorder(&self) -> Vec<NodeRef<'_, T>> {
        self.traverse(Order::Pre)
    }

    /// Shorthand for `traverse(Order::Post)`.
    pub fn postorder(&self) -> Vec<NodeRef<'_, T>> {
        self.traverse(Order::Post)
    }

    /// Depth-first walk with an explicit stack, so a degenerate chain of any length is fine.
    fn walk<'a>(&'a self, root: Option<NodeId>, order: Order, out: &mut Vec<NodeRef<'a, T>>) {
        let mut stack: Vec<Visit> = root.map(Visit::Enter).into_iter().collect();
        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Emit(id) => {
                    out.push(NodeRef { tree: self, id });
                    continue;
                }
                Visit::Enter(id) => id,
            };
            let node = self.link(id);
            let left = node.left.map(Visit::Enter);
            let right = node.right.map(Visit::Enter);
            // Pushed in reverse of the visiting order.
            let frames = match order {
                Order::In => [right, Some(Visit::Emit(id)), left],
                Order::Pre => [right, left, Some(Visit::Emit(id))],
                Order::Post => [Some(Visit::Emit(id)), right, left],
            };
            stack.extend(frames.into_iter().flatten());
        }
    }

    /// Follows a link the tree itself recorded. Those always point at live nodes.
    fn link(&self, id: NodeId) -> &Node<T> {
        self.nodes
            .get(&id)
            .expect("child and parent links only name live nodes")
    }

    fn link_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes
            .get_mut(&id)
            .expect("child and parent links only name live nodes")
    }

    fn allocate(&mut self, value: T, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                value,
                parent,
                left: None,
                right: None,
            },
        );
        id
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.link(id).left {
            id = left;
        }
        id
    }

    /// Puts `replacement` into the slot `old` occupies (its parent's child slot, or the root) and
    /// drops `old` from the table. The caller must have already moved `old`'s other children.
    fn detach(&mut self, old: NodeId, replacement: Option<NodeId>) -> Node<T> {
        let parent = self.link(old).parent;
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let parent = self.link_mut(parent);
                if parent.left == Some(old) {
                    parent.left = replacement;
                } else {
                    parent.right = replacement;
                }
            }
        }
        if let Some(replacement) = replacement {
            self.link_mut(replacement).parent = parent;
        }
        self.nodes
            .remove(&old)
            .expect("detached node was looked up above")
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Inserts `value` as a new leaf and returns the new node's id. Values already present are
    /// rejected and the tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_viz::tree::Tree;
    /// use bst_viz::TreeError;
    ///
    /// let mut tree = Tree::new();
    /// let id = tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.root().map(|n| n.id()), Some(id));
    /// assert_eq!(tree.insert(1), Err(TreeError::DuplicateValue));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<NodeId, TreeError> {
        let Some(mut current) = self.root else {
            let id = self.allocate(value, None);
            self.root = Some(id);
            self.size += 1;
            debug!("inserted {id} as root");
            return Ok(id);
        };

        let (parent, side) = loop {
            let node = self.link(current);
            let (next, side) = match value.cmp(&node.value) {
                Ordering::Less => (node.left, Side::Left),
                Ordering::Equal => return Err(TreeError::DuplicateValue),
                Ordering::Greater => (node.right, Side::Right),
            };
            match next {
                Some(child) => current = child,
                None => break (current, side),
            }
        };

        let id = self.allocate(value, Some(parent));
        *self.link_mut(parent).child_mut(side) = Some(id);
        self.size += 1;
        debug!("inserted {id} under {parent}");
        self.assert_invariants();
        Ok(id)
    }

    /// Removes `value` from the tree and returns the id of the node that left the tree.
    ///
    /// When the node holding `value` has two children its in-order successor is spliced out
    /// instead, and the successor's value moves into the targeted node, which keeps its id.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_viz::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let two = tree.insert(2).unwrap();
    /// tree.insert(1).unwrap();
    /// let three = tree.insert(3).unwrap();
    ///
    /// // 2 has two children so its successor (3) is the node that goes away.
    /// assert_eq!(tree.delete(&2), Ok(three));
    /// assert_eq!(tree.node(two).map(|n| *n.value()), Some(3));
    /// assert!(tree.node(three).is_none());
    /// ```
    pub fn delete(&mut self, value: &T) -> Result<NodeId, TreeError> {
        let target = self.find_id(value).ok_or(TreeError::ValueNotFound)?;
        let node = self.link(target);
        let removed = match (node.left, node.right) {
            (None, None) => {
                self.detach(target, None);
                debug!("deleted leaf {target}");
                target
            }
            (Some(child), None) | (None, Some(child)) => {
                self.detach(target, Some(child));
                debug!("deleted {target}, spliced {child} into its place");
                target
            }
            (Some(_), Some(right)) => {
                // The successor has no left child, so it is always removable by splicing in its
                // right child. This holds when it is `right` itself too.
                let successor = self.leftmost(right);
                let successor_right = self.link(successor).right;
                let successor_node = self.detach(successor, successor_right);
                self.link_mut(target).value = successor_node.value;
                debug!("deleted {target} by promoting successor {successor}'s value");
                successor
            }
        };
        self.size -= 1;
        self.assert_invariants();
        Ok(removed)
    }

    /// Walks from the root towards `value`, recording each node visited. The path ends at the
    /// matching node or at the last node before a missing child.
    pub fn search(&self, value: &T) -> SearchResult<'_, T> {
        let mut path = Vec::new();
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.link(id);
            path.push(NodeRef { tree: self, id });
            current = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Equal => {
                    trace!("search hit {id} after {} nodes", path.len());
                    return SearchResult { found: true, path };
                }
                Ordering::Greater => node.right,
            };
        }
        trace!("search missed after {} nodes", path.len());
        SearchResult { found: false, path }
    }

    /// The node holding `value`, if any.
    pub fn find(&self, value: &T) -> Option<NodeRef<'_, T>> {
        self.find_id(value).map(|id| NodeRef { tree: self, id })
    }

    /// Whether the tree holds `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find_id(value).is_some()
    }

    fn find_id(&self, value: &T) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.link(id);
            current = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// In debug builds, after every mutation, check the BST ordering, the parent/child links and
    /// the size.
    fn assert_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let ordered = self.inorder();
        assert_eq!(ordered.len(), self.size);
        assert_eq!(self.nodes.len(), self.size);
        assert!(ordered.windows(2).all(|w| w[0].value() < w[1].value()));

        for (&id, node) in &self.nodes {
            match node.parent {
                None => assert_eq!(self.root, Some(id)),
                Some(parent) => {
                    let parent = self.link(parent);
                    assert!(parent.left == Some(id) || parent.right == Some(id));
                }
            }
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.link(child).parent, Some(id));
            }
        }
    }
}

/// Collects values into a tree in iteration order. Repeated values are skipped.
impl<T: Ord> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for Tree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value).ok();
        }
    }
}

/// A borrowed view of one node.
pub struct NodeRef<'a, T> {
    tree: &'a Tree<T>,
    id: NodeId,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for NodeRef<'_, T> {}

impl<T> fmt::Debug for NodeRef<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("value", self.value())
            .finish()
    }
}

impl<'a, T> NodeRef<'a, T> {
    /// This node's stable id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The value stored here.
    pub fn value(&self) -> &'a T {
        &self.tree.link(self.id).value
    }

    /// The parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.neighbour(|n| n.parent)
    }

    /// Left child.
    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        self.neighbour(|n| n.left)
    }

    /// Right child.
    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        self.neighbour(|n| n.right)
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    fn neighbour(&self, pick: impl Fn(&Node<T>) -> Option<NodeId>) -> Option<NodeRef<'a, T>> {
        pick(self.tree.link(self.id)).map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }
}

/// Outcome of [`Tree::search`].
#[derive(Debug)]
pub struct SearchResult<'a, T> {
    /// Whether the value was found.
    pub found: bool,
    /// Nodes visited from the root down, including the last one whether or not it matched. Empty
    /// only when the tree is.
    pub path: Vec<NodeRef<'a, T>>,
}

impl<'a, T> SearchResult<'a, T> {
    /// Values along the path.
    pub fn values(&self) -> Vec<&'a T> {
        self.path.iter().map(|n| n.value()).collect()
    }

    /// Ids along the path.
    pub fn ids(&self) -> Vec<NodeId> {
        self.path.iter().map(|n| n.id()).collect()
    }
}
