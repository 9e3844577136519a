use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::compare::Comparator;
use crate::error::{Error, Result};

/// A key paired with its value. The key never changes once the entry exists.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Splits the entry into a shared key and a mutable value.
    #[inline]
    pub(crate) fn pair_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    /// Swaps in a new value and hands back the old one.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Result of searching for a key in a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted.
    NotFound(usize),
}

impl SearchResult {
    /// The matching position on a hit, the insertion point on a miss.
    ///
    /// In an internal node this is also the child to descend into on a miss.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            SearchResult::Found(index) | SearchResult::NotFound(index) => index,
        }
    }
}

/// The sorted, gap-free entry array of one node.
///
/// Capacity is fixed at construction (`2t - 1` for a tree of degree `t`) and the array
/// refuses to grow past it.
#[derive(Clone, Debug)]
pub(crate) struct Items<K, V> {
    entries: Vec<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> Items<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&Entry<K, V>> {
        self.entries.get(index)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(index)
    }

    pub(crate) fn first(&self) -> Option<&Entry<K, V>> {
        self.entries.first()
    }

    pub(crate) fn last(&self) -> Option<&Entry<K, V>> {
        self.entries.last()
    }

    pub(crate) fn as_slice(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Entry<K, V>] {
        &mut self.entries
    }

    pub(crate) fn into_vec(self) -> Vec<Entry<K, V>> {
        self.entries
    }

    /// Binary search for `key` under `cmp`.
    ///
    /// No allocation; `O(log n)` comparisons.
    pub(crate) fn search<C>(&self, key: &K, cmp: &C) -> SearchResult
    where
        C: Comparator<K> + ?Sized,
    {
        let mut low = 0;
        let mut high = self.entries.len();
        while low < high {
            let mid = low + (high - low) / 2;
            match cmp.compare(key, &self.entries[mid].key) {
                Ordering::Equal => return SearchResult::Found(mid),
                Ordering::Less => high = mid,
                Ordering::Greater => low = mid + 1,
            }
        }
        SearchResult::NotFound(low)
    }

    /// Inserts `entry` at `index`, shifting the tail right.
    pub(crate) fn insert_at(&mut self, index: usize, entry: Entry<K, V>) -> Result<()> {
        if self.is_full() {
            return Err(self.overflow());
        }
        if index > self.entries.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        self.entries.insert(index, entry);
        Ok(())
    }

    /// Appends `entry` after the current last entry.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) -> Result<()> {
        self.insert_at(self.entries.len(), entry)
    }

    /// Removes the entry at `index`, shifting the tail left.
    pub(crate) fn remove_at(&mut self, index: usize) -> Result<Entry<K, V>> {
        if index >= self.entries.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub(crate) fn remove_last(&mut self) -> Result<Entry<K, V>> {
        self.entries.pop().ok_or(Error::IndexOutOfBounds { index: 0, len: 0 })
    }

    /// Puts `entry` at `index` and returns the entry it displaced.
    pub(crate) fn replace(&mut self, index: usize, entry: Entry<K, V>) -> Result<Entry<K, V>> {
        let len = self.entries.len();
        let slot = self.entries.get_mut(index).ok_or(Error::IndexOutOfBounds { index, len })?;
        Ok(core::mem::replace(slot, entry))
    }

    /// Cuts the array at `index`, returning every entry from `index` onward in a new array
    /// of the same capacity. Used to donate the upper half of a node to a new sibling.
    pub(crate) fn truncate(&mut self, index: usize) -> Result<Self> {
        if index >= self.entries.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        let mut tail = Self::with_capacity(self.capacity);
        tail.entries.extend(self.entries.drain(index..));
        Ok(tail)
    }

    /// Moves all of `other`'s entries to the tail, leaving `other` empty.
    ///
    /// Nothing moves if the combined count would exceed capacity.
    pub(crate) fn append_range(&mut self, other: &mut Self) -> Result<()> {
        if self.entries.len() + other.entries.len() > self.capacity {
            return Err(self.overflow());
        }
        self.entries.append(&mut other.entries);
        Ok(())
    }

    const fn overflow(&self) -> Error {
        Error::CapacityViolation {
            array: "items",
            capacity: self.capacity,
        }
    }
}
