use alloc::boxed::Box;
use alloc::vec::Vec;

use super::node::Node;
use crate::error::{Error, Result};

/// The ordered child array of one internal node.
///
/// Same positional contract as [`Items`](super::items::Items), over owned sub-nodes.
/// Capacity is fixed at `2t`. There is no search: children are addressed by the index a
/// key search over the owning node's entries produced.
#[derive(Clone, Debug)]
pub(crate) struct Children<K, V> {
    nodes: Vec<Box<Node<K, V>>>,
    capacity: usize,
}

impl<K, V> Children<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            capacity,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&Node<K, V>> {
        self.nodes.get(index).map(|node| &**node)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(index).map(|node| &mut **node)
    }

    /// Like [`get_mut`](Self::get_mut), for callers that already know `index` is live.
    pub(crate) fn at_mut(&mut self, index: usize) -> Result<&mut Node<K, V>> {
        let len = self.nodes.len();
        self.get_mut(index).ok_or(Error::IndexOutOfBounds { index, len })
    }

    /// Mutable access to two adjacent children, `left` and `left + 1`.
    pub(crate) fn pair_mut(&mut self, left: usize) -> Result<(&mut Node<K, V>, &mut Node<K, V>)> {
        let len = self.nodes.len();
        if left + 1 >= len {
            return Err(Error::IndexOutOfBounds { index: left + 1, len });
        }
        let (head, tail) = self.nodes.split_at_mut(left + 1);
        Ok((&mut head[left], &mut tail[0]))
    }

    pub(crate) fn as_slice(&self) -> &[Box<Node<K, V>>] {
        &self.nodes
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Box<Node<K, V>>] {
        &mut self.nodes
    }

    pub(crate) fn into_vec(self) -> Vec<Box<Node<K, V>>> {
        self.nodes
    }

    pub(crate) fn insert_at(&mut self, index: usize, child: Box<Node<K, V>>) -> Result<()> {
        if self.nodes.len() == self.capacity {
            return Err(self.overflow());
        }
        if index > self.nodes.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.nodes.len(),
            });
        }
        if self.nodes.capacity() == 0 {
            self.nodes.reserve_exact(self.capacity);
        }
        self.nodes.insert(index, child);
        Ok(())
    }

    pub(crate) fn push(&mut self, child: Box<Node<K, V>>) -> Result<()> {
        self.insert_at(self.nodes.len(), child)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Result<Box<Node<K, V>>> {
        if index >= self.nodes.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.nodes.len(),
            });
        }
        Ok(self.nodes.remove(index))
    }

    pub(crate) fn remove_last(&mut self) -> Result<Box<Node<K, V>>> {
        self.nodes.pop().ok_or(Error::IndexOutOfBounds { index: 0, len: 0 })
    }

    /// Cuts the array at `index` and returns the removed suffix, same capacity.
    pub(crate) fn truncate(&mut self, index: usize) -> Result<Self> {
        if index >= self.nodes.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.nodes.len(),
            });
        }
        let mut tail = Self::with_capacity(self.capacity);
        tail.nodes.reserve_exact(self.capacity);
        tail.nodes.extend(self.nodes.drain(index..));
        Ok(tail)
    }

    /// Moves all of `other`'s children to the tail, leaving `other` empty.
    pub(crate) fn append_range(&mut self, other: &mut Self) -> Result<()> {
        if self.nodes.len() + other.nodes.len() > self.capacity {
            return Err(self.overflow());
        }
        self.nodes.append(&mut other.nodes);
        Ok(())
    }

    const fn overflow(&self) -> Error {
        Error::CapacityViolation {
            array: "children",
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::degree::Degree;
    use crate::raw::items::Entry;
    use alloc::vec::Vec;

    const DEGREE: Degree = Degree::DEFAULT;

    fn leaf(key: i32) -> Box<Node<i32, ()>> {
        let mut node = Node::new(DEGREE);
        node.push_entry(Entry::new(key, ())).unwrap();
        Box::new(node)
    }

    fn children(keys: &[i32], capacity: usize) -> Children<i32, ()> {
        let mut children = Children::with_capacity(capacity);
        for &key in keys {
            children.push(leaf(key)).unwrap();
        }
        children
    }

    fn first_keys(children: &Children<i32, ()>) -> Vec<i32> {
        children.as_slice().iter().filter_map(|child| child.min().map(|entry| *entry.key())).collect()
    }

    #[test]
    fn leaves_have_no_child_storage() {
        let children: Children<i32, ()> = Children::with_capacity(4);
        assert!(children.is_empty());
        assert_eq!(children.as_slice().len(), 0);
        assert_eq!(children.capacity(), 4);
    }

    #[test]
    fn insert_and_remove_by_position() {
        let mut children = children(&[1, 3], 4);
        children.insert_at(1, leaf(2)).unwrap();
        assert_eq!(first_keys(&children), [1, 2, 3]);

        let removed = children.remove_at(0).unwrap();
        assert_eq!(removed.min().map(|entry| *entry.key()), Some(1));
        let last = children.remove_last().unwrap();
        assert_eq!(last.min().map(|entry| *entry.key()), Some(3));
        assert_eq!(first_keys(&children), [2]);

        assert!(matches!(children.remove_at(1), Err(Error::IndexOutOfBounds { index: 1, len: 1 })));
    }

    #[test]
    fn full_array_refuses_insert() {
        let mut children = children(&[1, 2, 3, 4], 4);
        assert!(matches!(
            children.push(leaf(5)),
            Err(Error::CapacityViolation {
                array: "children",
                capacity: 4
            })
        ));
        assert_eq!(children.len(), 4);
    }

    #[test]
    fn pair_mut_borrows_adjacent_children() {
        let mut children = children(&[1, 2, 3], 4);
        let (left, right) = children.pair_mut(1).unwrap();
        assert_eq!(left.min().map(|entry| *entry.key()), Some(2));
        assert_eq!(right.min().map(|entry| *entry.key()), Some(3));
        assert!(children.pair_mut(2).is_err());
    }

    #[test]
    fn truncate_and_append_range() {
        let mut children = children(&[1, 2, 3, 4], 4);
        let mut tail = children.truncate(2).unwrap();
        assert_eq!(first_keys(&children), [1, 2]);
        assert_eq!(first_keys(&tail), [3, 4]);

        children.append_range(&mut tail).unwrap();
        assert_eq!(first_keys(&children), [1, 2, 3, 4]);
        assert!(tail.is_empty());

        let mut extra = Children::with_capacity(4);
        extra.push(leaf(5)).unwrap();
        assert!(children.append_range(&mut extra).is_err());
        assert_eq!(extra.len(), 1);
    }
}
