use alloc::boxed::Box;
use core::cmp::Ordering;

use tracing::trace;

use super::children::Children;
use super::items::{Entry, Items, SearchResult};
use crate::compare::Comparator;
use crate::degree::Degree;
use crate::error::{Error, Result};
use crate::policy::{DuplicatePolicy, InsertOutcome};

/// The three ways to take an entry out of a subtree.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Removal<'q, K> {
    /// The entry whose key compares equal to this one.
    Key(&'q K),
    /// The smallest entry.
    Min,
    /// The largest entry.
    Max,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Edge {
    First,
    Last,
}

/// One node of the tree: up to `2t - 1` sorted entries and, unless a leaf, one more child
/// than entries.
///
/// Child `i` holds only keys strictly between entry `i - 1` and entry `i`. Every node owns
/// its children outright; there are no parent or sibling links.
///
/// Mutating operations assume the node they are called on has room to act: insert is only
/// ever called on a node that is not full, remove only on a node above the minimum (the
/// root excepted). Each operation makes the same guarantee for the child it descends into
/// before descending, so one top-down pass suffices.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    items: Items<K, V>,
    children: Children<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates an empty leaf sized for `degree`.
    pub(crate) fn new(degree: Degree) -> Self {
        Self {
            items: Items::with_capacity(degree.max_items()),
            children: Children::with_capacity(degree.max_children()),
        }
    }

    /// Creates the first root of a tree, a leaf holding one entry.
    pub(crate) fn new_root(degree: Degree, key: K, value: V) -> Result<Self> {
        let mut root = Self::new(degree);
        root.push_entry(Entry::new(key, value))?;
        Ok(root)
    }

    /// Splits a full root and hangs both halves under a new root holding only the median.
    ///
    /// This and [`into_only_child`](Self::into_only_child) are the only places the height of
    /// a tree changes.
    pub(crate) fn grow_root(mut old_root: Box<Self>, degree: Degree) -> Result<Box<Self>> {
        let (median, sibling) = old_root.split(degree)?;
        let mut root = Self::new(degree);
        root.items.push(median)?;
        root.children.push(old_root)?;
        root.children.push(Box::new(sibling))?;
        trace!(target: "degree_btree::root", height = root.height(), "grew new root");
        Ok(Box::new(root))
    }

    /// Replaces an emptied internal root with its sole remaining child.
    pub(crate) fn into_only_child(mut self: Box<Self>) -> Result<Box<Self>> {
        if !self.items.is_empty() || self.children.len() != 1 {
            return Err(Error::IndexOutOfBounds {
                index: 1,
                len: self.children.len(),
            });
        }
        let child = self.children.remove_last()?;
        trace!(target: "degree_btree::root", height = child.height(), "collapsed root into its only child");
        Ok(child)
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.items.is_full()
    }

    /// Returns true if removing an entry would leave this node below the minimum.
    #[inline]
    fn is_at_minimum(&self, degree: Degree) -> bool {
        self.items.len() <= degree.min_items()
    }

    pub(crate) fn items(&self) -> &Items<K, V> {
        &self.items
    }

    pub(crate) fn children(&self) -> &Children<K, V> {
        &self.children
    }

    /// Mutable views of the entry and child arrays at once.
    pub(crate) fn parts_mut(&mut self) -> (&mut Items<K, V>, &mut Children<K, V>) {
        (&mut self.items, &mut self.children)
    }

    pub(crate) fn into_parts(self) -> (Items<K, V>, Children<K, V>) {
        (self.items, self.children)
    }

    pub(crate) fn push_entry(&mut self, entry: Entry<K, V>) -> Result<()> {
        self.items.push(entry)
    }

    /// Looks up `key` in this subtree.
    pub(crate) fn find<C>(&self, key: &K, cmp: &C) -> Option<&Entry<K, V>>
    where
        C: Comparator<K> + ?Sized,
    {
        match self.items.search(key, cmp) {
            SearchResult::Found(index) => self.items.get(index),
            SearchResult::NotFound(index) => self.children.get(index)?.find(key, cmp),
        }
    }

    pub(crate) fn find_mut<C>(&mut self, key: &K, cmp: &C) -> Option<&mut Entry<K, V>>
    where
        C: Comparator<K> + ?Sized,
    {
        match self.items.search(key, cmp) {
            SearchResult::Found(index) => self.items.get_mut(index),
            SearchResult::NotFound(index) => self.children.get_mut(index)?.find_mut(key, cmp),
        }
    }

    /// The smallest entry of this subtree.
    pub(crate) fn min(&self) -> Option<&Entry<K, V>> {
        match self.children.get(0) {
            Some(child) => child.min(),
            None => self.items.first(),
        }
    }

    /// The largest entry of this subtree.
    pub(crate) fn max(&self) -> Option<&Entry<K, V>> {
        match self.children.as_slice().last() {
            Some(child) => child.max(),
            None => self.items.last(),
        }
    }

    /// Number of edges from this node down to any leaf.
    pub(crate) fn height(&self) -> usize {
        self.children.get(0).map_or(0, |child| 1 + child.height())
    }

    /// Inserts `key` into this subtree, which must not be rooted at a full node.
    pub(crate) fn insert<C>(
        &mut self,
        degree: Degree,
        cmp: &C,
        key: K,
        value: V,
        policy: DuplicatePolicy,
    ) -> Result<InsertOutcome<V>>
    where
        C: Comparator<K> + ?Sized,
    {
        let mut index = match self.items.search(&key, cmp) {
            SearchResult::Found(index) => return resolve_duplicate(self.entry_mut(index)?, value, policy),
            SearchResult::NotFound(index) => index,
        };

        if self.is_leaf() {
            self.items.insert_at(index, Entry::new(key, value))?;
            return Ok(InsertOutcome::Added);
        }

        if self.split_child(index, degree)? {
            // The child's median now sits at `index` and decides which half to enter.
            let median = self.entry_mut(index)?;
            match cmp.compare(&key, median.key()) {
                Ordering::Less => {}
                Ordering::Greater => index += 1,
                Ordering::Equal => return resolve_duplicate(median, value, policy),
            }
        }

        self.children.at_mut(index)?.insert(degree, cmp, key, value, policy)
    }

    /// Splits a full node at its median.
    ///
    /// Returns the median entry and a new sibling holding everything above it. This node
    /// keeps the lower half. Both halves end up with exactly `t - 1` entries.
    pub(crate) fn split(&mut self, degree: Degree) -> Result<(Entry<K, V>, Self)> {
        if !self.is_full() {
            return Err(Error::IndexOutOfBounds {
                index: degree.max_items() - 1,
                len: self.items.len(),
            });
        }
        let upper = self.items.truncate(degree.median() + 1)?;
        let median = self.items.remove_last()?;
        let children = if self.is_leaf() {
            Children::with_capacity(degree.max_children())
        } else {
            self.children.truncate(degree.median() + 1)?
        };
        Ok((median, Self { items: upper, children }))
    }

    /// Splits child `index` if it is full, promoting its median into this node.
    ///
    /// Returns whether a split happened.
    fn split_child(&mut self, index: usize, degree: Degree) -> Result<bool> {
        if !self.children.at_mut(index)?.is_full() {
            return Ok(false);
        }
        if self.is_full() {
            return Err(Error::CapacityViolation {
                array: "items",
                capacity: self.items.capacity(),
            });
        }
        let (median, sibling) = self.children.at_mut(index)?.split(degree)?;
        self.items.insert_at(index, median)?;
        self.children.insert_at(index + 1, Box::new(sibling))?;
        trace!(target: "degree_btree::split", index, items = self.items.len(), "split full child");
        Ok(true)
    }

    /// Removes an entry from this subtree.
    ///
    /// Must be called on the root or on a node above the minimum.
    pub(crate) fn remove<C>(&mut self, degree: Degree, cmp: &C, removal: Removal<'_, K>) -> Result<Option<Entry<K, V>>>
    where
        C: Comparator<K> + ?Sized,
    {
        match removal {
            Removal::Key(key) => self.remove_key(degree, cmp, key),
            Removal::Min => self.remove_edge(degree, Edge::First).map(Some),
            Removal::Max => self.remove_edge(degree, Edge::Last).map(Some),
        }
    }

    fn remove_key<C>(&mut self, degree: Degree, cmp: &C, key: &K) -> Result<Option<Entry<K, V>>>
    where
        C: Comparator<K> + ?Sized,
    {
        loop {
            let search = self.items.search(key, cmp);
            if self.is_leaf() {
                return match search {
                    SearchResult::Found(index) => self.items.remove_at(index).map(Some),
                    SearchResult::NotFound(_) => Ok(None),
                };
            }

            let index = search.index();
            if self.children.at_mut(index)?.is_at_minimum(degree) {
                // Rebalancing may pull the key down into the child; search again.
                self.grow_child(index, degree)?;
                continue;
            }

            return match search {
                SearchResult::Found(index) => {
                    // Swap in the predecessor so the delete lands in a leaf.
                    let predecessor = self.children.at_mut(index)?.remove_edge(degree, Edge::Last)?;
                    self.items.replace(index, predecessor).map(Some)
                }
                SearchResult::NotFound(index) => self.children.at_mut(index)?.remove_key(degree, cmp, key),
            };
        }
    }

    fn remove_edge(&mut self, degree: Degree, edge: Edge) -> Result<Entry<K, V>> {
        loop {
            if self.is_leaf() {
                return match edge {
                    Edge::First => self.items.remove_at(0),
                    Edge::Last => self.items.remove_last(),
                };
            }

            let index = match edge {
                Edge::First => 0,
                Edge::Last => self.items.len(),
            };
            if self.children.at_mut(index)?.is_at_minimum(degree) {
                self.grow_child(index, degree)?;
                continue;
            }

            return self.children.at_mut(index)?.remove_edge(degree, edge);
        }
    }

    /// Brings child `index` above the minimum so a removal can descend into it.
    ///
    /// Borrows through this node from the left sibling, else from the right sibling, else
    /// merges with a sibling (the right one when there is one).
    fn grow_child(&mut self, index: usize, degree: Degree) -> Result<()> {
        let can_lend = |node: Option<&Self>| node.is_some_and(|node| !node.is_at_minimum(degree));

        if index > 0 && can_lend(self.children.get(index - 1)) {
            self.rotate_from_left(index)
        } else if can_lend(self.children.get(index + 1)) {
            self.rotate_from_right(index)
        } else if index + 1 < self.children.len() {
            self.merge_children(index)
        } else if index > 0 {
            self.merge_children(index - 1)
        } else {
            Err(Error::IndexOutOfBounds {
                index: index + 1,
                len: self.children.len(),
            })
        }
    }

    /// Moves the left sibling's largest entry up and the separator down into child `index`.
    fn rotate_from_left(&mut self, index: usize) -> Result<()> {
        let (left, child) = self.children.pair_mut(index - 1)?;
        if child.items.is_full() {
            return Err(child.items_overflow());
        }
        let borrowed = left.items.remove_last()?;
        let moved = if left.is_leaf() {
            None
        } else {
            Some(left.children.remove_last()?)
        };
        let separator = self.items.replace(index - 1, borrowed)?;
        child.items.insert_at(0, separator)?;
        if let Some(moved) = moved {
            child.children.insert_at(0, moved)?;
        }
        trace!(target: "degree_btree::rotate", index, direction = "left", "borrowed from sibling");
        Ok(())
    }

    /// Moves the right sibling's smallest entry up and the separator down into child `index`.
    fn rotate_from_right(&mut self, index: usize) -> Result<()> {
        let (child, right) = self.children.pair_mut(index)?;
        if child.items.is_full() {
            return Err(child.items_overflow());
        }
        let borrowed = right.items.remove_at(0)?;
        let moved = if right.is_leaf() {
            None
        } else {
            Some(right.children.remove_at(0)?)
        };
        let separator = self.items.replace(index, borrowed)?;
        child.items.push(separator)?;
        if let Some(moved) = moved {
            child.children.push(moved)?;
        }
        trace!(target: "degree_btree::rotate", index, direction = "right", "borrowed from sibling");
        Ok(())
    }

    /// Folds child `index + 1` and the separator between them into child `index`.
    fn merge_children(&mut self, index: usize) -> Result<()> {
        let (child, right) = self.children.pair_mut(index)?;
        let merged_items = child.items.len() + 1 + right.items.len();
        if merged_items > child.items.capacity() {
            return Err(child.items_overflow());
        }
        let merged_children = child.children.len() + right.children.len();
        if merged_children > child.children.capacity() {
            return Err(Error::CapacityViolation {
                array: "children",
                capacity: child.children.capacity(),
            });
        }

        let separator = self.items.remove_at(index)?;
        let mut right = self.children.remove_at(index + 1)?;
        let child = self.children.at_mut(index)?;
        child.items.push(separator)?;
        child.items.append_range(&mut right.items)?;
        child.children.append_range(&mut right.children)?;
        trace!(target: "degree_btree::merge", index, items = merged_items, "merged siblings");
        Ok(())
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut Entry<K, V>> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(Error::IndexOutOfBounds { index, len })
    }

    const fn items_overflow(&self) -> Error {
        Error::CapacityViolation {
            array: "items",
            capacity: self.items.capacity(),
        }
    }
}

fn resolve_duplicate<K, V>(entry: &mut Entry<K, V>, value: V, policy: DuplicatePolicy) -> Result<InsertOutcome<V>> {
    match policy {
        DuplicatePolicy::Reject => Ok(InsertOutcome::Rejected),
        DuplicatePolicy::Overwrite => Ok(InsertOutcome::Updated(entry.replace_value(value))),
        DuplicatePolicy::Error => Err(Error::DuplicateKey),
    }
}
