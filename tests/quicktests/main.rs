//! Property tests driving the tree with random operations and checking it against a model.

mod ops;
mod tree;

pub(crate) use ops::Op;
