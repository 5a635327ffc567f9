use std::cmp::Ordering;
use std::slice;

/// Ordered sequence where every element carries an `f64` sort key.
///
/// Used both for a node's children (the key is the edge weight) and for the
/// materialized traversal sequences. Elements inserted without an explicit key
/// get `0.0`.
#[derive(Clone, Debug)]
pub struct KeyedVec<E> {
    elems: Vec<E>,
    keys: Vec<f64>,
}

impl<E> Default for KeyedVec<E> {
    fn default() -> Self { Self::new() }
}

impl<E> KeyedVec<E> {
    pub fn new() -> Self {
        KeyedVec {
            elems: Vec::new(),
            keys: Vec::new(),
        }
    }

    pub fn len(&self) -> usize { self.elems.len() }
    pub fn is_empty(&self) -> bool { self.elems.is_empty() }
    pub fn as_slice(&self) -> &[E] { &self.elems }
    pub fn iter(&self) -> slice::Iter<'_, E> { self.elems.iter() }
    pub fn get(&self, pos: usize) -> Option<&E> { self.elems.get(pos) }
    pub fn key(&self, pos: usize) -> Option<f64> { self.keys.get(pos).copied() }
    pub fn first(&self) -> Option<&E> { self.elems.first() }
    pub fn last(&self) -> Option<&E> { self.elems.last() }

    /// Iterates over `(element, key)` pairs in sequence order.
    pub fn entries(&self) -> impl Iterator<Item = (&E, f64)> + '_ { self.elems.iter().zip(self.keys.iter().copied()) }

    /// Adds the element at the head of the sequence.
    pub fn push(&mut self, elem: E) {
        self.elems.insert(0, elem);
        self.keys.insert(0, 0.0);
    }

    /// Adds the element at the tail of the sequence.
    pub fn append(&mut self, elem: E) {
        self.elems.push(elem);
        self.keys.push(0.0);
    }

    /// Inserts the element so that it ends up at `pos`. Hands the element back
    /// if `pos` is past the tail.
    pub fn insert(&mut self, pos: usize, elem: E) -> Result<(), E> {
        if pos > self.len() {
            return Err(elem);
        }
        self.elems.insert(pos, elem);
        self.keys.insert(pos, 0.0);
        Ok(())
    }

    /// Inserts the element in front of the first entry whose key is strictly
    /// greater than `key`, and returns the position it landed on.
    ///
    /// On a sequence built only through this method the keys stay
    /// non-decreasing and equal keys keep their insertion order. Keys compare
    /// with [`f64::total_cmp`]: a (positive) NaN sorts after every finite key
    /// and `-0.0` before `0.0`.
    ///
    /// Each call scans from the head. Use [`KeyedVec::extend_sorted`] to load
    /// many entries at once.
    pub fn add_sorted(&mut self, elem: E, key: f64) -> usize {
        let pos = self
            .keys
            .iter()
            .position(|k| k.total_cmp(&key) == Ordering::Greater)
            .unwrap_or(self.len());
        self.elems.insert(pos, elem);
        self.keys.insert(pos, key);
        pos
    }

    /// Adds every `(element, key)` pair, then stably sorts the whole sequence
    /// by key. On a sorted sequence this gives the same result as calling
    /// [`KeyedVec::add_sorted`] for each pair in turn, in O(n log n).
    pub fn extend_sorted<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (E, f64)>,
    {
        let mut all: Vec<(E, f64)> = self.elems.drain(..).zip(self.keys.drain(..)).collect();
        all.extend(entries);
        all.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (elem, key) in all {
            self.elems.push(elem);
            self.keys.push(key);
        }
    }

    /// Removes the head of the sequence.
    pub fn pop(&mut self) -> Option<E> {
        if self.is_empty() {
            None
        } else {
            self.remove(0)
        }
    }

    /// Removes the tail of the sequence.
    pub fn drop_last(&mut self) -> Option<E> {
        self.keys.pop();
        self.elems.pop()
    }

    pub fn remove(&mut self, pos: usize) -> Option<E> {
        if pos >= self.len() {
            return None;
        }
        self.keys.remove(pos);
        Some(self.elems.remove(pos))
    }

    pub fn flush(&mut self) {
        self.elems.clear();
        self.keys.clear();
    }
}

impl<E: PartialEq> KeyedVec<E> {
    pub fn position(&self, elem: &E) -> Option<usize> { self.elems.iter().position(|e| e == elem) }

    /// Removes every entry equal to `elem`; returns how many were removed.
    pub fn remove_all(&mut self, elem: &E) -> usize {
        let before = self.len();
        let mut pos = 0;
        while pos < self.elems.len() {
            if self.elems[pos] == *elem {
                self.elems.remove(pos);
                self.keys.remove(pos);
            } else {
                pos += 1;
            }
        }
        before - self.len()
    }
}
