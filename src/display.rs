//! Renderer-facing snapshots of a [`Tree`].
//!
//! [`DisplayNode`] is what a layout engine consumes: a plain owned hierarchy with the children of
//! every node ordered `[left, right]`, skipping empty slots. It is derived on demand and must be
//! rebuilt after each mutation. [`render_to_string`] draws the same tree as text.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::highlight::{HighlightSet, Mark};
use crate::tree::{NodeId, NodeRef, Tree};

/// One node of the renderer-facing hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayNode<T> {
    /// Id of the tree node this mirrors.
    pub id: NodeId,
    /// The value as text.
    pub label: String,
    /// The value itself.
    pub value: T,
    /// Left child then right child, each only when present.
    pub children: Vec<DisplayNode<T>>,
}

impl<T> DisplayNode<T> {
    /// Number of nodes in this hierarchy.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }

    /// A hierarchy always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Maps every non-root node to its parent. These are the edges a renderer draws.
    pub fn parent_map(&self) -> HashMap<NodeId, NodeId> {
        let mut parents = HashMap::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            for child in &node.children {
                parents.insert(child.id, node.id);
                stack.push(child);
            }
        }
        parents
    }
}

/// Tears the hierarchy down level by level instead of recursing once per depth.
impl<T> Drop for DisplayNode<T> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl<T> Tree<T>
where
    T: Clone + fmt::Display,
{
    /// Mirrors the tree into a [`DisplayNode`] hierarchy, or `None` when the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_viz::tree::Tree;
    ///
    /// let tree: Tree<i32> = [2, 3].into_iter().collect();
    /// let root = tree.to_display_hierarchy().unwrap();
    ///
    /// assert_eq!(root.label, "2");
    /// assert_eq!(root.children.len(), 1);
    /// assert_eq!(root.children[0].value, 3);
    /// assert!(Tree::<i32>::new().to_display_hierarchy().is_none());
    /// ```
    pub fn to_display_hierarchy(&self) -> Option<DisplayNode<T>> {
        // Postorder builds every child before its parent.
        let mut built: HashMap<NodeId, DisplayNode<T>> = HashMap::new();
        for node in self.postorder() {
            let children = [node.left(), node.right()]
                .into_iter()
                .flatten()
                .filter_map(|child| built.remove(&child.id()))
                .collect();
            built.insert(
                node.id(),
                DisplayNode {
                    id: node.id(),
                    label: node.value().to_string(),
                    value: node.value().clone(),
                    children,
                },
            );
        }
        self.root().and_then(|root| built.remove(&root.id()))
    }
}

const EMPTY: &str = "Tree is empty\n";

/// Draws the tree with box-drawing connectors. Children are tagged `L`/`R` since a lone child
/// could be either.
pub fn render_to_string<T: fmt::Display>(tree: &Tree<T>) -> String {
    render(tree, |_| Vec::new())
}

/// Like [`render_to_string`] but appends the marks each node currently carries.
pub fn render_highlighted<T: fmt::Display>(tree: &Tree<T>, highlights: &HighlightSet) -> String {
    render(tree, |id| highlights.node_marks(id))
}

fn render<T, F>(tree: &Tree<T>, marks: F) -> String
where
    T: fmt::Display,
    F: Fn(NodeId) -> Vec<Mark>,
{
    let Some(root) = tree.root() else {
        return EMPTY.to_string();
    };
    let mut output = String::new();
    push_line(&mut output, &root, &marks);

    let mut stack = Vec::new();
    push_children(&mut stack, &root, "");
    while let Some(row) = stack.pop() {
        let connector = if row.is_last { "└── " } else { "├── " };
        output.push_str(&row.prefix);
        output.push_str(connector);
        output.push_str(row.side);
        output.push(' ');
        push_line(&mut output, &row.node, &marks);

        let child_prefix = format!("{}{}", row.prefix, if row.is_last { "    " } else { "│   " });
        push_children(&mut stack, &row.node, &child_prefix);
    }
    output
}

/// A child line waiting to be drawn.
struct Row<'a, T> {
    node: NodeRef<'a, T>,
    side: &'static str,
    prefix: String,
    is_last: bool,
}

/// Queues `node`'s children so the left one pops first.
fn push_children<'a, T>(stack: &mut Vec<Row<'a, T>>, node: &NodeRef<'a, T>, prefix: &str) {
    let children: Vec<_> = [("L", node.left()), ("R", node.right())]
        .into_iter()
        .filter_map(|(side, child)| child.map(|c| (side, c)))
        .collect();
    let count = children.len();

    for (i, (side, child)) in children.into_iter().enumerate().rev() {
        stack.push(Row {
            node: child,
            side,
            prefix: prefix.to_string(),
            is_last: i + 1 == count,
        });
    }
}

fn push_line<T, F>(output: &mut String, node: &NodeRef<'_, T>, marks: &F)
where
    T: fmt::Display,
    F: Fn(NodeId) -> Vec<Mark>,
{
    output.push_str(&node.value().to_string());
    for mark in marks(node.id()) {
        output.push_str(" [");
        output.push_str(mark.as_str());
        output.push(']');
    }
    output.push('\n');
}
