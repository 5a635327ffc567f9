//! Cached traversal sequences over a subtree.
//!
//! A [`Traversal`] walks the subtree below its bound node once, stores the
//! visited nodes as a flat sequence and then moves a cursor over that
//! sequence. The sequence is a snapshot: structural changes made to the tree
//! afterwards only show up after [`Traversal::update`]. Payload changes are
//! visible right away since the sequence holds node handles, not copies.
//!
//! The bound node itself never appears in its own sequence.

use std::marker::PhantomData;

use tracing::{debug, instrument};

use crate::arena::{Node, Tree};
use crate::error::{TreeError, TreeResult};
use crate::keyed::KeyedVec;

/// Strategy used to materialize a traversal sequence.
pub trait Order {
    /// Fills `seq` with the strict descendants of `root`.
    fn build<IdType: Copy + Eq, T>(t: &Tree<IdType, T>, root: Node<IdType>, seq: &mut KeyedVec<Node<IdType>>) -> TreeResult<()>;
}

/// Pre-order, left to right.
#[derive(Clone, Copy, Debug)]
pub enum DepthFirst {}

/// Level order: ascending depth below the bound node, ties in pre-order.
#[derive(Clone, Copy, Debug)]
pub enum BreadthFirst {}

/// Ascending key of the edge leading to each node, ties in pre-order.
#[derive(Clone, Copy, Debug)]
pub enum ValueFirst {}

impl Order for DepthFirst {
    fn build<IdType: Copy + Eq, T>(t: &Tree<IdType, T>, root: Node<IdType>, seq: &mut KeyedVec<Node<IdType>>) -> TreeResult<()> {
        root.walk_descendants(t, |n, _, _| seq.append(n))
    }
}

impl Order for BreadthFirst {
    fn build<IdType: Copy + Eq, T>(t: &Tree<IdType, T>, root: Node<IdType>, seq: &mut KeyedVec<Node<IdType>>) -> TreeResult<()> {
        let mut entries = Vec::new();
        root.walk_descendants(t, |n, depth, _| entries.push((n, depth as f64)))?;
        seq.extend_sorted(entries);
        Ok(())
    }
}

impl Order for ValueFirst {
    fn build<IdType: Copy + Eq, T>(t: &Tree<IdType, T>, root: Node<IdType>, seq: &mut KeyedVec<Node<IdType>>) -> TreeResult<()> {
        let mut entries = Vec::new();
        root.walk_descendants(t, |n, _, key| entries.push((n, key)))?;
        seq.extend_sorted(entries);
        Ok(())
    }
}

pub type DepthFirstTraversal<IdType> = Traversal<IdType, DepthFirst>;
pub type BreadthFirstTraversal<IdType> = Traversal<IdType, BreadthFirst>;
pub type ValueFirstTraversal<IdType> = Traversal<IdType, ValueFirst>;

/// Cursor over the cached traversal sequence of a subtree.
///
/// The traversal does not borrow the tree; operations that need to look at
/// nodes take it as an argument. Sequence entries that were freed since the
/// last rebuild report [`TreeError::NullArgument`] when dereferenced.
#[derive(Clone, Debug)]
pub struct Traversal<IdType: Copy + Eq, O: Order> {
    bound: Node<IdType>,
    seq: KeyedVec<Node<IdType>>,
    cursor: Option<usize>,
    _order: PhantomData<O>,
}

impl<IdType: Copy + Eq, O: Order> Traversal<IdType, O> {
    /// Binds a new traversal to `root` and positions it on the first entry.
    pub fn new<T>(t: &Tree<IdType, T>, root: Node<IdType>) -> TreeResult<Self> {
        let seq = Self::build(t, root)?;
        let mut iter = Traversal {
            bound: root,
            seq,
            cursor: None,
            _order: PhantomData,
        };
        iter.reset();
        Ok(iter)
    }

    #[instrument(level = "trace", skip_all)]
    fn build<T>(t: &Tree<IdType, T>, root: Node<IdType>) -> TreeResult<KeyedVec<Node<IdType>>> {
        let mut seq = KeyedVec::new();
        O::build(t, root, &mut seq)?;
        debug!(bound = ?root.index(), len = seq.len(), "built traversal sequence");
        Ok(seq)
    }

    /// Rebuilds the sequence from the current shape of the tree and resets
    /// the cursor. On error the previous sequence and cursor are kept.
    pub fn update<T>(&mut self, t: &Tree<IdType, T>) -> TreeResult<()> {
        self.seq = Self::build(t, self.bound)?;
        self.reset();
        Ok(())
    }

    /// Rebinds to `root`, rebuilding the sequence and resetting the cursor.
    pub fn set_bound<T>(&mut self, t: &Tree<IdType, T>, root: Node<IdType>) -> TreeResult<()> {
        self.seq = Self::build(t, root)?;
        self.bound = root;
        self.reset();
        Ok(())
    }

    pub fn bound(&self) -> Node<IdType> { self.bound }
    pub fn sequence(&self) -> &[Node<IdType>] { self.seq.as_slice() }
    pub fn len(&self) -> usize { self.seq.len() }
    pub fn is_empty(&self) -> bool { self.seq.is_empty() }
    pub fn position(&self) -> Option<usize> { self.cursor }

    fn head(&self) -> Option<usize> {
        if self.seq.is_empty() {
            None
        } else {
            Some(0)
        }
    }
    fn tail(&self) -> Option<usize> { self.seq.len().checked_sub(1) }

    /// Moves the cursor to the first entry, or leaves it unpositioned if the
    /// sequence is empty.
    pub fn reset(&mut self) { self.cursor = self.head(); }
    pub fn to_end(&mut self) { self.cursor = self.tail(); }

    /// Advances the cursor. Returns false and stays put on the last entry.
    pub fn step(&mut self) -> TreeResult<bool> {
        let pos = self.cursor.ok_or(TreeError::InvalidCursor)?;
        if pos + 1 < self.seq.len() {
            self.cursor = Some(pos + 1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Moves the cursor back. Returns false and stays put on the first entry.
    pub fn step_back(&mut self) -> TreeResult<bool> {
        let pos = self.cursor.ok_or(TreeError::InvalidCursor)?;
        if pos > 0 {
            self.cursor = Some(pos - 1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // On an empty sequence both of these hold, as head, tail and cursor are all unset.
    pub fn is_first(&self) -> bool { self.cursor == self.head() }
    pub fn is_last(&self) -> bool { self.cursor == self.tail() }

    /// Node under the cursor.
    pub fn node(&self) -> TreeResult<Node<IdType>> {
        self.cursor
            .and_then(|pos| self.seq.get(pos))
            .copied()
            .ok_or(TreeError::InvalidCursor)
    }

    /// Payload of the node under the cursor.
    pub fn data<'a, T>(&self, t: &'a Tree<IdType, T>) -> TreeResult<Option<&'a T>> { self.node()?.data(t) }
    pub fn data_mut<'a, T>(&self, t: &'a mut Tree<IdType, T>) -> TreeResult<Option<&'a mut T>> { self.node()?.data_mut(t) }

    /// Resets the cursor and calls `f` with the payload of every entry, in
    /// sequence order. The cursor is left on the last entry.
    pub fn apply<T, F>(&mut self, t: &Tree<IdType, T>, mut f: F) -> TreeResult<()>
    where
        F: FnMut(Option<&T>),
    {
        self.reset();
        if self.seq.is_empty() {
            return Ok(());
        }
        loop {
            f(self.data(t)?);
            if !self.step()? {
                return Ok(());
            }
        }
    }

    /// Like [`Traversal::apply`], but hands out mutable payloads. The shape of
    /// the tree cannot be changed from `f`.
    pub fn apply_mut<T, F>(&mut self, t: &mut Tree<IdType, T>, mut f: F) -> TreeResult<()>
    where
        F: FnMut(Option<&mut T>),
    {
        self.reset();
        if self.seq.is_empty() {
            return Ok(());
        }
        loop {
            f(self.data_mut(t)?);
            if !self.step()? {
                return Ok(());
            }
        }
    }
}
