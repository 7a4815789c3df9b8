use bst_viz::{NodeId, Order, Tree, TreeError};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeSet, HashSet};

use crate::Op;

fn inorder_values(tree: &Tree<i8>) -> Vec<i8> {
    tree.inorder().iter().map(|n| *n.value()).collect()
}

/// Applies a set of operations to a tree and a `BTreeSet`, checking after each one that both agree.
fn do_ops(ops: &[Op<i8>], tree: &mut Tree<i8>, model: &mut BTreeSet<i8>) -> bool {
    for op in ops {
        let agrees = match *op {
            Op::Insert(v) => tree.insert(v).is_ok() == model.insert(v),
            Op::Delete(v) => tree.delete(&v).is_ok() == model.remove(&v),
            Op::Search(v) => {
                let result = tree.search(&v);
                result.found == model.contains(&v)
                    && result.path.first().map(|n| n.id()) == tree.root().map(|n| n.id())
                    && (!result.found || result.path.last().map(|n| *n.value()) == Some(v))
            }
            Op::Iter => inorder_values(tree).into_iter().eq(model.iter().copied()),
            Op::Clear => {
                tree.clear();
                model.clear();
                true
            }
        };
        if !agrees || tree.len() != model.len() {
            return false;
        }
    }

    true
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut model) && inorder_values(&tree).into_iter().eq(model)
}

#[quickcheck]
fn inorder_is_strictly_ascending(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.into_iter().collect();

    inorder_values(&tree).windows(2).all(|w| w[0] < w[1])
}

#[quickcheck]
fn every_traversal_visits_each_node_once(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.into_iter().collect();
    for delete in &deletes {
        tree.delete(delete).ok();
    }

    let inorder: HashSet<NodeId> = tree.inorder().iter().map(|n| n.id()).collect();
    Order::ALL.into_iter().all(|order| {
        let visited = tree.traverse(order);
        let ids: HashSet<NodeId> = visited.iter().map(|n| n.id()).collect();
        visited.len() == tree.len() && ids.len() == tree.len() && ids == inorder
    })
}

#[quickcheck]
fn duplicate_insert_changes_nothing(xs: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    let snapshot = |tree: &Tree<i8>| -> Vec<(NodeId, i8)> {
        tree.preorder().iter().map(|n| (n.id(), *n.value())).collect()
    };
    let before = snapshot(&tree);

    xs.iter()
        .all(|x| tree.insert(*x) == Err(TreeError::DuplicateValue))
        && snapshot(&tree) == before
}

#[quickcheck]
fn delete_missing_changes_nothing(xs: Vec<i8>, missing: i8) -> bool {
    let mut tree: Tree<i8> = xs.into_iter().filter(|x| *x != missing).collect();
    let before = inorder_values(&tree);

    tree.delete(&missing) == Err(TreeError::ValueNotFound) && inorder_values(&tree) == before
}

#[quickcheck]
fn insert_then_delete_round_trips(xs: Vec<i8>, extra: i8) -> bool {
    let mut tree: Tree<i8> = xs.into_iter().filter(|x| *x != extra).collect();
    let before = inorder_values(&tree);
    let size = tree.len();

    let inserted = tree.insert(extra);
    let deleted = tree.delete(&extra);

    inserted.is_ok() && deleted == inserted && tree.len() == size && inorder_values(&tree) == before
}

#[quickcheck]
fn two_child_delete_keeps_target_id(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.into_iter().collect();
    let two_child: Vec<(NodeId, i8)> = tree
        .inorder()
        .iter()
        .filter(|n| n.left().is_some() && n.right().is_some())
        .map(|n| (n.id(), *n.value()))
        .collect();

    two_child.into_iter().all(|(target, value)| {
        let mut tree = tree.clone();
        let successor = tree.find(&value).unwrap().right().map(|right| {
            let mut node = right;
            while let Some(left) = node.left() {
                node = left;
            }
            (node.id(), *node.value())
        });
        let Some((successor_id, successor_value)) = successor else {
            return false;
        };
        let expected: Vec<i8> = inorder_values(&tree)
            .into_iter()
            .filter(|v| *v != value)
            .collect();

        tree.delete(&value) == Ok(successor_id)
            && tree.node(target).map(|n| *n.value()) == Some(successor_value)
            && tree.node(successor_id).is_none()
            && inorder_values(&tree) == expected
    })
}

#[quickcheck]
fn search_path_follows_child_links(xs: Vec<i8>, target: i8) -> bool {
    let tree: Tree<i8> = xs.into_iter().collect();
    let result = tree.search(&target);

    result.path.is_empty() == tree.is_empty()
        && result
            .path
            .windows(2)
            .all(|w| w[1].parent().map(|p| p.id()) == Some(w[0].id()))
}

#[quickcheck]
fn clear_is_idempotent(xs: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.into_iter().collect();
    tree.clear();
    tree.clear();

    tree.is_empty() && tree.root().is_none() && tree.inorder().is_empty()
}
