use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use alloc::boxed::Box;

use tracing::debug;

use crate::compare::{Comparator, NaturalOrder};
use crate::degree::Degree;
use crate::error::{Error, Result};
use crate::policy::{DuplicatePolicy, InsertOutcome};
use crate::raw::{Entry, Node, RawIntoIter, RawIter, RawIterMut, Removal};

/// An ordered map backed by a B-tree of configurable minimum degree.
///
/// Every node holds between `t - 1` and `2t - 1` entries (the root may hold fewer) and every
/// leaf sits at the same depth, so lookups, inserts and removals touch `O(log_t n)` nodes.
/// Nodes are searched with a binary search under the tree's [`Comparator`].
///
/// Inserts split full nodes on the way down and removals top up thin nodes on the way down,
/// so each operation is a single pass from the root and never walks back up.
///
/// Iterators obtained from [`iter`](BTree::iter), [`keys`](BTree::keys),
/// [`values`](BTree::values) or [`into_iter`](IntoIterator::into_iter) yield entries in
/// ascending key order and cost amortized `O(1)` per item.
///
/// It is a logic error for a key to change how it compares to other keys while it is in the
/// tree, or for the comparator to change its answers. The behavior resulting from such a
/// logic error is not specified but is contained to the tree: lookups may miss, iteration
/// may yield keys out of order, and inserts or removals may panic.
///
/// # Examples
///
/// ```
/// use degree_btree::BTree;
///
/// let mut inventory = BTree::new(4).unwrap();
/// inventory.insert("apples", 3);
/// inventory.insert("pears", 7);
/// inventory.insert("figs", 0);
///
/// assert_eq!(inventory.get(&"pears"), Some(&7));
/// assert_eq!(inventory.len(), 3);
///
/// inventory.remove(&"figs");
/// for (fruit, count) in &inventory {
///     println!("{fruit}: {count}");
/// }
///
/// assert_eq!(inventory[&"apples"], 3);
/// ```
pub struct BTree<K, V, C = NaturalOrder> {
    root: Option<Box<Node<K, V>>>,
    len: usize,
    degree: Degree,
    comparator: C,
}

/// An iterator over the entries of a `BTree`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`BTree`].
///
/// ```
/// use degree_btree::BTree;
///
/// let tree: BTree<_, _> = [(2, "b"), (1, "a")].into_iter().collect();
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.len(), 1);
/// ```
///
/// [`iter`]: BTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    raw: RawIter<'a, K, V>,
    remaining: usize,
}

/// A mutable iterator over the entries of a `BTree`, in key order.
///
/// This `struct` is created by the [`iter_mut`] method on [`BTree`].
///
/// [`iter_mut`]: BTree::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    raw: RawIterMut<'a, K, V>,
    remaining: usize,
}

/// An owning iterator over the entries of a `BTree`, in key order.
///
/// This `struct` is created by the [`into_iter`] method on [`BTree`] (provided by the
/// [`IntoIterator`] trait). Nodes are taken apart as the walk reaches them; entries not yet
/// yielded are dropped with the iterator.
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    raw: RawIntoIter<K, V>,
    remaining: usize,
}

/// An iterator over the keys of a `BTree`.
///
/// This `struct` is created by the [`keys`] method on [`BTree`].
///
/// [`keys`]: BTree::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `BTree`.
///
/// This `struct` is created by the [`values`] method on [`BTree`].
///
/// [`values`]: BTree::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `BTree`.
///
/// This `struct` is created by the [`values_mut`] method on [`BTree`].
///
/// [`values_mut`]: BTree::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// Unwraps the result of an operation that can only fail if the tree's structure is broken.
#[track_caller]
fn assert_intact<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("B-tree structure corrupted: {error}"),
    }
}

impl<K, V> BTree<K, V> {
    /// Makes a new, empty `BTree` of minimum degree `degree`, ordered by [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDegree`] if `degree` is below [`Degree::MIN`].
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::{BTree, Error};
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// tree.insert(1, "a");
    ///
    /// assert_eq!(BTree::<i32, i32>::new(1).unwrap_err(), Error::InvalidDegree { degree: 1, min: 2 });
    /// ```
    pub fn new(degree: usize) -> Result<Self> {
        Self::with_comparator(degree, NaturalOrder)
    }
}

impl<K, V, C> BTree<K, V, C> {
    /// Makes a new, empty `BTree` of minimum degree `degree`, ordered by `comparator`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDegree`] if `degree` is below [`Degree::MIN`].
    pub fn with_comparator(degree: usize, comparator: C) -> Result<Self> {
        Ok(Self::with_degree(Degree::new(degree)?, comparator))
    }

    /// Makes a new, empty `BTree` from an already validated degree.
    pub fn with_degree(degree: Degree, comparator: C) -> Self {
        debug!(target: "degree_btree", degree = degree.get(), "created tree");
        BTree {
            root: None,
            len: 0,
            degree,
            comparator,
        }
    }

    /// Returns the number of entries in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the minimum degree the tree was built with.
    #[must_use]
    pub const fn degree(&self) -> Degree {
        self.degree
    }

    /// Returns the comparator that orders the tree's keys.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of edges from the root to any leaf.
    ///
    /// An empty tree and a tree whose root is a leaf both have height 0.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// assert_eq!(tree.height(), 0);
    /// tree.extend((0..4).map(|k| (k, ())));
    /// assert_eq!(tree.height(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.as_deref().map_or(0, Node::height)
    }

    /// Removes every entry, releasing all nodes.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::{BTree, Error};
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// assert_eq!(tree.min(), Err(Error::EmptyCollection));
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// assert_eq!(tree.min(), Ok((&1, &"a")));
    /// ```
    pub fn min(&self) -> Result<(&K, &V)> {
        self.first_key_value().ok_or(Error::EmptyCollection)
    }

    /// Returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the tree is empty.
    pub fn max(&self) -> Result<(&K, &V)> {
        self.last_key_value().ok_or(Error::EmptyCollection)
    }

    /// Returns the entry with the smallest key, or `None` if the tree is empty.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let entry = self.root.as_deref()?.min()?;
        Some((entry.key(), entry.value()))
    }

    /// Returns the entry with the largest key, or `None` if the tree is empty.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let entry = self.root.as_deref()?.max()?;
        Some((entry.key(), entry.value()))
    }

    /// Gets an iterator over the entries of the tree, sorted by key.
    ///
    /// Each call starts a fresh walk; the tree is not modified.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(3, "c");
    /// tree.insert(1, "a");
    /// tree.insert(2, "b");
    ///
    /// let (first_key, first_value) = tree.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// assert_eq!(tree.iter().count(), 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            raw: RawIter::new(self.root.as_deref()),
            remaining: self.len,
        }
    }

    /// Gets an iterator over the entries of the tree with mutable values, sorted by key.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree: BTree<_, _> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    /// for (key, value) in tree.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(tree.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            raw: RawIterMut::new(self.root.as_deref_mut()),
            remaining: self.len,
        }
    }

    /// Gets an iterator over the keys of the tree, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the tree, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the tree, in order by key.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(1, String::from("hello"));
    /// tree.insert(2, String::from("goodbye"));
    ///
    /// for value in tree.values_mut() {
    ///     value.push('!');
    /// }
    ///
    /// let values: Vec<String> = tree.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"), String::from("goodbye!")]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }
}

impl<K, V, C: Comparator<K>> BTree<K, V, C> {
    /// Inserts an entry, resolving an existing key according to `policy`.
    ///
    /// A full root is split before the descent starts, which is the only way the tree grows
    /// taller. Under [`DuplicatePolicy::Reject`] and [`DuplicatePolicy::Error`] an existing key
    /// is detected before any node is split, so a refused insert leaves the tree untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key is present and `policy` is
    /// [`DuplicatePolicy::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::{BTree, DuplicatePolicy, Error, InsertOutcome};
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// assert_eq!(tree.insert_with(7, "a", DuplicatePolicy::Reject), Ok(InsertOutcome::Added));
    /// assert_eq!(tree.insert_with(7, "b", DuplicatePolicy::Reject), Ok(InsertOutcome::Rejected));
    /// assert_eq!(tree.insert_with(7, "c", DuplicatePolicy::Overwrite), Ok(InsertOutcome::Updated("a")));
    /// assert_eq!(tree.insert_with(7, "d", DuplicatePolicy::Error), Err(Error::DuplicateKey));
    /// assert_eq!(tree[&7], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(t log_t n)
    pub fn insert_with(&mut self, key: K, value: V, policy: DuplicatePolicy) -> Result<InsertOutcome<V>> {
        match policy {
            DuplicatePolicy::Reject if self.contains_key(&key) => return Ok(InsertOutcome::Rejected),
            DuplicatePolicy::Error if self.contains_key(&key) => return Err(Error::DuplicateKey),
            DuplicatePolicy::Reject | DuplicatePolicy::Error | DuplicatePolicy::Overwrite => {}
        }

        let degree = self.degree;
        if let Some(root) = self.root.take_if(|root| root.is_full()) {
            self.root = Some(Node::grow_root(root, degree)?);
        }

        let outcome = match self.root.as_deref_mut() {
            Some(root) => root.insert(degree, &self.comparator, key, value, policy)?,
            None => {
                self.root = Some(Box::new(Node::new_root(degree, key, value)?));
                InsertOutcome::Added
            }
        };
        if outcome.is_added() {
            self.len += 1;
        }
        Ok(outcome)
    }

    /// Inserts a new entry, failing if the key is already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key is present; the stored value is kept.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        self.insert_with(key, value, DuplicatePolicy::Error).map(|_| ())
    }

    /// Inserts a new entry unless the key is already present.
    ///
    /// Returns whether the entry was added.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// assert!(tree.try_add(1, "a"));
    /// assert!(!tree.try_add(1, "b"));
    /// assert_eq!(tree[&1], "a");
    /// ```
    pub fn try_add(&mut self, key: K, value: V) -> bool {
        assert_intact(self.insert_with(key, value, DuplicatePolicy::Reject)).is_added()
    }

    /// Inserts an entry, replacing the value of an existing key.
    ///
    /// Returns the replaced value, or `None` if the key was new. The stored key is kept.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// assert_eq!(tree.insert(37, "a"), None);
    /// assert_eq!(tree.insert(37, "b"), Some("a"));
    /// assert_eq!(tree[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        assert_intact(self.insert_with(key, value, DuplicatePolicy::Overwrite)).into_replaced()
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_entry(key).map(Entry::value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(1, "a");
    /// if let Some(x) = tree.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(tree[&1], "b");
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.root
            .as_deref_mut()?
            .find_mut(key, &self.comparator)
            .map(Entry::value_mut)
    }

    /// Returns the stored key and its value.
    ///
    /// Useful when keys that compare equal are not identical.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.get_entry(key).map(|entry| (entry.key(), entry.value()))
    }

    /// Returns `true` if the tree holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_entry(key).is_some()
    }

    /// Removes `key` and returns its value, or `None` if it was absent.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(1, "a");
    /// assert_eq!(tree.remove(&1), Some("a"));
    /// assert_eq!(tree.remove(&1), None);
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(t log_t n)
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` and returns the stored key and value, or `None` if it was absent.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        assert_intact(self.remove_by(Removal::Key(key))).map(Entry::into_pair)
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::{BTree, Error};
    ///
    /// let mut tree: BTree<_, _> = [(2, "b"), (1, "a")].into_iter().collect();
    /// assert_eq!(tree.pop_min(), Ok((1, "a")));
    /// assert_eq!(tree.pop_min(), Ok((2, "b")));
    /// assert_eq!(tree.pop_min(), Err(Error::EmptyCollection));
    /// ```
    pub fn pop_min(&mut self) -> Result<(K, V)> {
        self.pop_first().ok_or(Error::EmptyCollection)
    }

    /// Removes and returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCollection`] if the tree is empty.
    pub fn pop_max(&mut self) -> Result<(K, V)> {
        self.pop_last().ok_or(Error::EmptyCollection)
    }

    /// Removes and returns the entry with the smallest key, or `None` if the tree is empty.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        assert_intact(self.remove_by(Removal::Min)).map(Entry::into_pair)
    }

    /// Removes and returns the entry with the largest key, or `None` if the tree is empty.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        assert_intact(self.remove_by(Removal::Max)).map(Entry::into_pair)
    }

    fn get_entry(&self, key: &K) -> Option<&Entry<K, V>> {
        self.root.as_deref()?.find(key, &self.comparator)
    }

    /// Runs one removal from the root, then shrinks the root if it was left empty.
    fn remove_by(&mut self, removal: Removal<'_, K>) -> Result<Option<Entry<K, V>>> {
        let Some(root) = self.root.as_deref_mut() else {
            return Ok(None);
        };
        let removed = root.remove(self.degree, &self.comparator, removal)?;
        if removed.is_some() {
            self.len -= 1;
        }

        if let Some(root) = self.root.take_if(|root| root.is_empty()) {
            self.root = if root.is_leaf() {
                None
            } else {
                Some(root.into_only_child()?)
            };
        }
        Ok(removed)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for BTree<K, V, C> {
    fn clone(&self) -> Self {
        BTree {
            root: self.root.clone(),
            len: self.len,
            degree: self.degree,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for BTree<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

/// Two trees are equal when they hold equal entries in the same order. Degree and
/// comparator do not take part.
impl<K: PartialEq, V: PartialEq, C> PartialEq for BTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for BTree<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for BTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for BTree<K, V, C> {
    /// Creates an empty tree of [`Degree::DEFAULT`].
    fn default() -> Self {
        BTree::with_degree(Degree::DEFAULT, C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for BTree<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = BTree::default();
        tree.extend(iter);
        tree
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for BTree<K, V, C> {
    /// Inserts every pair, later values overwriting earlier ones for equal keys.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for BTree<K, V, C> {
    type Output = V;

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the tree.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a BTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut BTree<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for BTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the tree, sorted by key.
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let tree: BTree<_, _> = [(2, "b"), (1, "a")].into_iter().collect();
    /// let pairs: Vec<_> = tree.into_iter().collect();
    /// assert_eq!(pairs, [(1, "a"), (2, "b")]);
    /// ```
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            raw: RawIntoIter::new(self.root),
            remaining: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.raw.next()?;
        self.remaining -= 1;
        Some((entry.key(), entry.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `Iter`.
    ///
    /// ```
    /// # use degree_btree::Iter;
    /// let iter: Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            raw: RawIter::new(None),
            remaining: 0,
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.raw.next()?;
        self.remaining -= 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.raw.next()?;
        self.remaining -= 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys").field("remaining", &self.inner.remaining).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values").field("remaining", &self.inner.remaining).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}
