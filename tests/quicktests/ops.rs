use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// binary search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<V> {
    /// Insert the V into the tree
    Insert(V),
    /// Delete the V from the tree
    Delete(V),
    /// Search for V and check the recorded path
    Search(V),
    /// Compare traversals
    Iter,
    /// Empty the tree
    Clear,
}

impl<V> Arbitrary for Op<V>
where
    V: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation. Clearing is rare so trees get a
    /// chance to grow.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 0, 1, 1, 2, 3, 0, 1, 2, 3, 4]).unwrap() {
            0 => Op::Insert(V::arbitrary(g)),
            1 => Op::Delete(V::arbitrary(g)),
            2 => Op::Search(V::arbitrary(g)),
            3 => Op::Iter,
            4 => Op::Clear,
            _ => unreachable!(),
        }
    }
}
