use std::marker::PhantomData;
use std::slice;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::context_iter::ContextIterator;
use crate::error::{TreeError, TreeResult};
use crate::keyed::KeyedVec;

/// Backing store for any number of nodes. Nodes are created standalone and
/// linked together through the methods on [`Node`]; a node without a parent
/// is the root of its own tree.
#[derive(Clone)]
pub struct Tree<IdType: Copy + Eq, T> {
    id: IdType,
    nodes: Arena<NodeData<T>>,
}

impl<IdType: Copy + Eq, T> Tree<IdType, T> {
    pub fn new(id: IdType) -> Self {
        Tree {
            id,
            nodes: Arena::new(),
        }
    }

    pub fn id(&self) -> IdType { self.id }

    /// Creates a parentless, childless node carrying `data`.
    pub fn create_node(&mut self, data: T) -> Node<IdType> { self.insert(NodeData::new(Some(data))) }

    /// Creates a parentless, childless node without data.
    pub fn create_empty_node(&mut self) -> Node<IdType> { self.insert(NodeData::new(None)) }

    fn insert(&mut self, d: NodeData<T>) -> Node<IdType> {
        let idx = self.nodes.insert(d);
        Node { tree_id: self.id, idx }
    }

    /// Number of live nodes, across every root held by this store.
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns true if the handle was minted by this store and has not been freed.
    pub fn contains(&self, node: Node<IdType>) -> bool { node.tree_id == self.id && self.nodes.contains(node.idx) }
}

/// Handle to a node stored in a [`Tree`].
///
/// Handles are plain values: copying one does not copy the node. Once the
/// node is freed every handle to it reports [`TreeError::NullArgument`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Node<IdType: Copy + Eq> {
    tree_id: IdType,
    idx: Index,
}

enum Placement {
    Front,
    Back,
    At(usize),
    Sorted(f64),
}

impl<IdType: Copy + Eq> Node<IdType> {
    fn validate<T>(&self, t: &Tree<IdType, T>) -> TreeResult<()> {
        if self.tree_id != t.id {
            return Err(TreeError::ForeignNode);
        }
        Ok(())
    }
    fn get<'a, T>(&self, t: &'a Tree<IdType, T>) -> TreeResult<&'a NodeData<T>> {
        self.validate(t)?;
        t.nodes.get(self.idx).ok_or(TreeError::NullArgument)
    }
    fn get_mut<'a, T>(&self, t: &'a mut Tree<IdType, T>) -> TreeResult<&'a mut NodeData<T>> {
        self.validate(t)?;
        t.nodes.get_mut(self.idx).ok_or(TreeError::NullArgument)
    }

    /// Arena slot of this node, used to identify it in log output.
    pub(crate) fn index(&self) -> Index { self.idx }

    fn at(&self, idx: Index) -> Node<IdType> {
        Node {
            tree_id: self.tree_id,
            idx,
        }
    }

    pub fn parent<T>(&self, t: &Tree<IdType, T>) -> TreeResult<Option<Node<IdType>>> { Ok(self.get(t)?.parent.map(|p| self.at(p))) }
    pub fn is_root<T>(&self, t: &Tree<IdType, T>) -> TreeResult<bool> { Ok(self.get(t)?.parent.is_none()) }
    pub fn is_leaf<T>(&self, t: &Tree<IdType, T>) -> TreeResult<bool> { Ok(self.get(t)?.children.is_empty()) }
    pub fn child_count<T>(&self, t: &Tree<IdType, T>) -> TreeResult<usize> { Ok(self.get(t)?.children.len()) }
    pub fn child<T>(&self, t: &Tree<IdType, T>, pos: usize) -> TreeResult<Option<Node<IdType>>> { Ok(self.get(t)?.children.get(pos).map(|&c| self.at(c))) }
    pub fn first_child<T>(&self, t: &Tree<IdType, T>) -> TreeResult<Option<Node<IdType>>> { Ok(self.get(t)?.children.first().map(|&c| self.at(c))) }
    pub fn last_child<T>(&self, t: &Tree<IdType, T>) -> TreeResult<Option<Node<IdType>>> { Ok(self.get(t)?.children.last().map(|&c| self.at(c))) }
    pub fn data<'a, T>(&self, t: &'a Tree<IdType, T>) -> TreeResult<Option<&'a T>> { Ok(self.get(t)?.data.as_ref()) }
    pub fn data_mut<'a, T>(&self, t: &'a mut Tree<IdType, T>) -> TreeResult<Option<&'a mut T>> { Ok(self.get_mut(t)?.data.as_mut()) }

    /// Stores `data` in this node and returns whatever it held before.
    pub fn set_data<T>(&self, t: &mut Tree<IdType, T>, data: T) -> TreeResult<Option<T>> { Ok(self.get_mut(t)?.data.replace(data)) }
    pub fn take_data<T>(&self, t: &mut Tree<IdType, T>) -> TreeResult<Option<T>> { Ok(self.get_mut(t)?.data.take()) }

    /// Sort key of the edge from the parent to this node, `None` for a root.
    /// Children attached without an explicit key have `0.0`.
    pub fn edge_key<T>(&self, t: &Tree<IdType, T>) -> TreeResult<Option<f64>> {
        match self.get(t)?.parent {
            None => Ok(None),
            Some(p) => {
                let siblings = &self.at(p).get(t)?.children;
                Ok(siblings.position(&self.idx).and_then(|pos| siblings.key(pos)))
            }
        }
    }

    pub fn root<T>(&self, t: &Tree<IdType, T>) -> TreeResult<Node<IdType>> {
        let mut result = *self;
        while let Some(p) = result.parent(t)? {
            result = p;
        }
        Ok(result)
    }

    fn is_self_or_ancestor_of<T>(&self, t: &Tree<IdType, T>, other: Node<IdType>) -> TreeResult<bool> {
        let mut cur = Some(other.idx);
        while let Some(idx) = cur {
            if idx == self.idx {
                return Ok(true);
            }
            cur = t.nodes.get(idx).ok_or(TreeError::NullArgument)?.parent;
        }
        Ok(false)
    }

    /// Number of strict descendants of this node.
    pub fn size<T>(&self, t: &Tree<IdType, T>) -> TreeResult<usize> {
        let mut count = 0;
        let mut stack = vec![self.get(t)?];
        while let Some(d) = stack.pop() {
            count += d.children.len();
            for &c in d.children.iter() {
                stack.push(t.nodes.get(c).ok_or(TreeError::NullArgument)?);
            }
        }
        Ok(count)
    }

    /// Detaches this node from its parent. Its own subtree stays attached to
    /// it. Does nothing for a root.
    #[instrument(level = "trace", skip_all)]
    pub fn cut<T>(&self, t: &mut Tree<IdType, T>) -> TreeResult<()> {
        let parent = match self.get(t)?.parent {
            Some(p) => p,
            None => return Ok(()),
        };
        if let Some(p) = t.nodes.get_mut(parent) {
            p.children.remove_all(&self.idx);
        }
        self.get_mut(t)?.parent = None;
        trace!(node = ?self.idx, parent = ?parent, "cut node from parent");
        Ok(())
    }

    /// Cuts this node if needed, then releases it and all its descendants.
    ///
    /// The payloads of the released nodes are handed back in pre-order rather
    /// than dropped. Freeing a handle that no longer resolves does nothing.
    #[instrument(level = "trace", skip_all)]
    pub fn free<T>(&self, t: &mut Tree<IdType, T>) -> Vec<T> {
        if !t.contains(*self) || self.cut(t).is_err() {
            return Vec::new();
        }
        let mut released = Vec::new();
        let mut count = 0;
        let mut stack = vec![self.idx];
        while let Some(idx) = stack.pop() {
            if let Some(d) = t.nodes.remove(idx) {
                count += 1;
                stack.extend(d.children.iter().rev().copied());
                released.extend(d.data);
            }
        }
        trace!(node = ?self.idx, nodes = count, "freed subtree");
        released
    }

    #[instrument(level = "trace", skip_all)]
    fn attach<T>(&self, t: &mut Tree<IdType, T>, child: Node<IdType>, placement: Placement) -> TreeResult<Option<Node<IdType>>> {
        let len = self.get(t)?.children.len();
        child.validate(t)?;
        let child_parent = match t.nodes.get(child.idx) {
            Some(d) => d.parent,
            // Absent child: nothing to attach.
            None => return Ok(None),
        };
        if child.is_self_or_ancestor_of(t, *self)? {
            return Err(TreeError::WouldCycle);
        }
        if let Placement::At(pos) = placement {
            let len = if child_parent == Some(self.idx) { len - 1 } else { len };
            if pos > len {
                return Err(TreeError::PositionOutOfRange { pos, len });
            }
        }

        child.cut(t)?;
        let children = &mut self.get_mut(t)?.children;
        match placement {
            Placement::Front => children.push(child.idx),
            Placement::Back => children.append(child.idx),
            Placement::At(pos) => {
                let len = children.len();
                children.insert(pos, child.idx).map_err(|_| TreeError::PositionOutOfRange { pos, len })?;
            }
            Placement::Sorted(key) => {
                children.add_sorted(child.idx, key);
            }
        }
        child.get_mut(t)?.parent = Some(self.idx);
        trace!(parent = ?self.idx, child = ?child.idx, "attached child");
        Ok(Some(child))
    }

    fn attach_value<T>(&self, t: &mut Tree<IdType, T>, value: T, placement: Placement) -> TreeResult<Node<IdType>> {
        let len = self.get(t)?.children.len();
        if let Placement::At(pos) = placement {
            if pos > len {
                return Err(TreeError::PositionOutOfRange { pos, len });
            }
        }
        let child = t.create_node(value);
        match self.attach(t, child, placement) {
            Ok(_) => Ok(child),
            Err(e) => {
                t.nodes.remove(child.idx);
                Err(e)
            }
        }
    }

    /// Adds the specified child in front of the existing children.
    ///
    /// A child that already has a parent is cut from it first. Returns `None`
    /// (and changes nothing) if the child handle no longer resolves.
    pub fn push_child<T>(&self, t: &mut Tree<IdType, T>, child: Node<IdType>) -> TreeResult<Option<Node<IdType>>> { self.attach(t, child, Placement::Front) }
    pub fn push_child_value<T>(&self, t: &mut Tree<IdType, T>, value: T) -> TreeResult<Node<IdType>> { self.attach_value(t, value, Placement::Front) }

    /// Adds the specified child after the last existing child (if any).
    /// Same cut and absent-child rules as [`Node::push_child`].
    pub fn append_child<T>(&self, t: &mut Tree<IdType, T>, child: Node<IdType>) -> TreeResult<Option<Node<IdType>>> { self.attach(t, child, Placement::Back) }
    pub fn append_child_value<T>(&self, t: &mut Tree<IdType, T>, value: T) -> TreeResult<Node<IdType>> { self.attach_value(t, value, Placement::Back) }

    /// Inserts the specified child so that it ends up at position `pos` among
    /// the children. Fails with [`TreeError::PositionOutOfRange`] if `pos` is
    /// past the end of the children.
    pub fn insert_child<T>(&self, t: &mut Tree<IdType, T>, pos: usize, child: Node<IdType>) -> TreeResult<Option<Node<IdType>>> { self.attach(t, child, Placement::At(pos)) }
    pub fn insert_child_value<T>(&self, t: &mut Tree<IdType, T>, pos: usize, value: T) -> TreeResult<Node<IdType>> { self.attach_value(t, value, Placement::At(pos)) }

    /// Inserts the specified child in front of the first child whose edge key
    /// is greater than `key`. Children sharing a key keep their insertion order.
    pub fn add_sorted_child<T>(&self, t: &mut Tree<IdType, T>, child: Node<IdType>, key: f64) -> TreeResult<Option<Node<IdType>>> { self.attach(t, child, Placement::Sorted(key)) }
    pub fn add_sorted_child_value<T>(&self, t: &mut Tree<IdType, T>, value: T, key: f64) -> TreeResult<Node<IdType>> { self.attach_value(t, value, Placement::Sorted(key)) }

    fn detach_child_at<T>(&self, t: &mut Tree<IdType, T>, pos: usize) -> TreeResult<Option<Node<IdType>>> {
        let removed = self.get_mut(t)?.children.remove(pos);
        if let Some(idx) = removed {
            if let Some(d) = t.nodes.get_mut(idx) {
                d.parent = None;
            }
        }
        Ok(removed.map(|idx| self.at(idx)))
    }

    /// Detaches and returns the first child. The child becomes a root.
    pub fn pop_child<T>(&self, t: &mut Tree<IdType, T>) -> TreeResult<Option<Node<IdType>>> { self.detach_child_at(t, 0) }

    /// Detaches and returns the last child. The child becomes a root.
    pub fn drop_child<T>(&self, t: &mut Tree<IdType, T>) -> TreeResult<Option<Node<IdType>>> {
        match self.child_count(t)? {
            0 => Ok(None),
            len => self.detach_child_at(t, len - 1),
        }
    }

    /// Detaches and returns the child at `pos`, or `None` if there is none.
    pub fn remove_child_at<T>(&self, t: &mut Tree<IdType, T>, pos: usize) -> TreeResult<Option<Node<IdType>>> { self.detach_child_at(t, pos) }

    /// Detaches all child nodes from this node. They stay alive as roots.
    pub fn remove_children<T>(&self, t: &mut Tree<IdType, T>) -> TreeResult<()> {
        while self.pop_child(t)?.is_some() {}
        Ok(())
    }

    /// Returns a standard iterator for all children of this node. Holds a reference to the tree
    /// for the duration of the iterator.
    pub fn children<'a, T>(&self, t: &'a Tree<IdType, T>) -> TreeResult<Children<'a, IdType>> {
        let iter = self.get(t)?.children.iter();
        Ok(Children {
            tree_id: self.tree_id,
            iter,
        })
    }

    /// Returns a context iterator (requiring the tree reference) for all children of this node.
    /// This function can be used in situations where the tree (or its data) needs to be altered
    /// while iterating over the list of children.
    ///
    /// Internally the iterator keeps a position into the child list and re-reads it on every
    /// step. Removing or inserting children in front of that position shifts the iterator along
    /// with them. Memory safety is still upheld, but the results may skip or repeat children.
    ///
    /// Be sure to either import walktree::ContextIterator or use the next_value method.
    pub fn children_mut<T>(&self, t: &Tree<IdType, T>) -> TreeResult<SiblingIter<IdType, T>> {
        self.get(t)?;
        Ok(SiblingIter::new(*self))
    }

    /// Visits every strict descendant in pre-order, left to right, passing the node, its depth
    /// below this node (direct children are at depth 1) and the key of the edge leading to it.
    pub(crate) fn walk_descendants<T, F>(&self, t: &Tree<IdType, T>, mut visit: F) -> TreeResult<()>
    where
        F: FnMut(Node<IdType>, usize, f64),
    {
        let mut stack = Vec::new();
        push_edges(&mut stack, &self.get(t)?.children, 1);
        while let Some((idx, depth, key)) = stack.pop() {
            visit(self.at(idx), depth, key);
            let d = t.nodes.get(idx).ok_or(TreeError::NullArgument)?;
            push_edges(&mut stack, &d.children, depth + 1);
        }
        Ok(())
    }
}

// Reversed so that popping the stack yields the children left to right.
fn push_edges(stack: &mut Vec<(Index, usize, f64)>, children: &KeyedVec<Index>, depth: usize) {
    for pos in (0..children.len()).rev() {
        if let (Some(&idx), Some(key)) = (children.get(pos), children.key(pos)) {
            stack.push((idx, depth, key));
        }
    }
}

#[derive(Clone)]
struct NodeData<T> {
    data: Option<T>,
    parent: Option<Index>,
    children: KeyedVec<Index>,
}
impl<T> NodeData<T> {
    pub fn new(data: Option<T>) -> Self {
        Self {
            data,
            parent: None,
            children: KeyedVec::new(),
        }
    }
}

pub struct SiblingIter<IdType: Copy + Eq, T> {
    parent: Node<IdType>,
    pos: usize,
    _marker: PhantomData<T>,
}
impl<IdType: Copy + Eq, T> SiblingIter<IdType, T> {
    fn new(parent: Node<IdType>) -> Self {
        Self {
            parent,
            pos: 0,
            _marker: PhantomData,
        }
    }
    pub fn next_value(&mut self, t: &Tree<IdType, T>) -> Option<Node<IdType>> {
        let n = self.parent.child(t, self.pos).ok().flatten()?;
        self.pos += 1;
        Some(n)
    }
}
impl<IdType: Copy + Eq, T> ContextIterator<Tree<IdType, T>> for SiblingIter<IdType, T> {
    type Item = Node<IdType>;

    fn next(&mut self, t: &Tree<IdType, T>) -> Option<Self::Item> { self.next_value(t) }
}

pub struct Children<'a, IdType: Copy + Eq> {
    tree_id: IdType,
    iter: slice::Iter<'a, Index>,
}
impl<'a, IdType: Copy + Eq> Iterator for Children<'a, IdType> {
    type Item = Node<IdType>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|&idx| Node {
            tree_id: self.tree_id,
            idx,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.iter.size_hint() }
}
impl<'a, IdType: Copy + Eq> DoubleEndedIterator for Children<'a, IdType> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|&idx| Node {
            tree_id: self.tree_id,
            idx,
        })
    }
}
impl<'a, IdType: Copy + Eq> ExactSizeIterator for Children<'a, IdType> {}
