use alloc::boxed::Box;
use alloc::vec;
use core::slice;

use smallvec::SmallVec;

use super::items::Entry;
use super::node::Node;

// Inline frame count; covers the heights of typical trees. Deeper walks spill to the heap.
const INLINE_FRAMES: usize = 16;

/// One level of an in-order walk: the entries still to yield at this node and the
/// children still to enter. Child `i + 1` is entered right after entry `i` is yielded.
struct Frame<E, C> {
    entries: E,
    children: C,
}

type RefFrame<'a, K, V> = Frame<slice::Iter<'a, Entry<K, V>>, slice::Iter<'a, Box<Node<K, V>>>>;
type MutFrame<'a, K, V> = Frame<slice::IterMut<'a, Entry<K, V>>, slice::IterMut<'a, Box<Node<K, V>>>>;
type OwnedFrame<K, V> = Frame<vec::IntoIter<Entry<K, V>>, vec::IntoIter<Box<Node<K, V>>>>;

/// Lazy in-order cursor over shared entries.
///
/// Holds a stack of frames from the root down to the current leaf, so each step costs
/// amortized `O(1)` and the walk never touches the tree structure.
pub(crate) struct RawIter<'a, K, V> {
    stack: SmallVec<[RefFrame<'a, K, V>; INLINE_FRAMES]>,
}

impl<'a, K, V> RawIter<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>) -> Self {
        let mut iter = Self { stack: SmallVec::new() };
        if let Some(root) = root {
            iter.descend(root);
        }
        iter
    }

    /// Pushes `node` and its leftmost descendants.
    fn descend(&mut self, mut node: &'a Node<K, V>) {
        loop {
            let mut children = node.children().as_slice().iter();
            let first = children.next();
            self.stack.push(Frame {
                entries: node.items().as_slice().iter(),
                children,
            });
            match first {
                Some(child) => node = &**child,
                None => break,
            }
        }
    }
}

impl<'a, K, V> Iterator for RawIter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some(entry) = frame.entries.next() {
                if let Some(child) = frame.children.next() {
                    self.descend(child);
                }
                return Some(entry);
            }
            self.stack.pop();
        }
    }
}

impl<K, V> Clone for RawIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self
                .stack
                .iter()
                .map(|frame| Frame {
                    entries: frame.entries.clone(),
                    children: frame.children.clone(),
                })
                .collect(),
        }
    }
}

/// Lazy in-order cursor handing out shared keys and mutable values.
pub(crate) struct RawIterMut<'a, K, V> {
    stack: SmallVec<[MutFrame<'a, K, V>; INLINE_FRAMES]>,
}

impl<'a, K, V> RawIterMut<'a, K, V> {
    pub(crate) fn new(root: Option<&'a mut Node<K, V>>) -> Self {
        let mut iter = Self { stack: SmallVec::new() };
        if let Some(root) = root {
            iter.descend(root);
        }
        iter
    }

    fn descend(&mut self, mut node: &'a mut Node<K, V>) {
        loop {
            let (items, children) = node.parts_mut();
            let mut children = children.as_mut_slice().iter_mut();
            let first = children.next();
            self.stack.push(Frame {
                entries: items.as_mut_slice().iter_mut(),
                children,
            });
            match first {
                Some(child) => node = &mut **child,
                None => break,
            }
        }
    }
}

impl<'a, K, V> Iterator for RawIterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some(entry) = frame.entries.next() {
                if let Some(child) = frame.children.next() {
                    self.descend(child);
                }
                return Some(entry.pair_mut());
            }
            self.stack.pop();
        }
    }
}

/// Lazy in-order cursor that consumes the tree node by node.
///
/// Each node is taken apart when it is first entered; nothing is rebalanced.
pub(crate) struct RawIntoIter<K, V> {
    stack: SmallVec<[OwnedFrame<K, V>; INLINE_FRAMES]>,
}

impl<K, V> RawIntoIter<K, V> {
    pub(crate) fn new(root: Option<Box<Node<K, V>>>) -> Self {
        let mut iter = Self { stack: SmallVec::new() };
        if let Some(root) = root {
            iter.descend(root);
        }
        iter
    }

    fn descend(&mut self, mut node: Box<Node<K, V>>) {
        loop {
            let (items, children) = (*node).into_parts();
            let mut children = children.into_vec().into_iter();
            let first = children.next();
            self.stack.push(Frame {
                entries: items.into_vec().into_iter(),
                children,
            });
            match first {
                Some(child) => node = child,
                None => break,
            }
        }
    }
}

impl<K, V> Iterator for RawIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some(entry) = frame.entries.next() {
                if let Some(child) = frame.children.next() {
                    self.descend(child);
                }
                return Some(entry.into_pair());
            }
            self.stack.pop();
        }
    }
}
