use core::cmp::Ordering;

/// A total order over keys, supplied to a [`BTree`](crate::BTree) at construction.
///
/// The order must be consistent for the whole life of the tree: changing how two stored
/// keys compare is a logic error. The tree stays memory safe, but lookups may miss and
/// iteration may yield keys out of order.
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator:
///
/// ```
/// use degree_btree::BTree;
///
/// let mut by_abs = BTree::with_comparator(3, |a: &i32, b: &i32| a.abs().cmp(&b.abs())).unwrap();
/// by_abs.insert(-3, "c");
/// by_abs.insert(1, "a");
/// by_abs.insert(-2, "b");
///
/// let keys: Vec<_> = by_abs.keys().copied().collect();
/// assert_eq!(keys, [1, -2, -3]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<K: ?Sized + Ord> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the order of the wrapped comparator.
///
/// ```
/// use degree_btree::{BTree, NaturalOrder, Reverse};
///
/// let mut tree = BTree::with_comparator(2, Reverse(NaturalOrder)).unwrap();
/// tree.extend([(1, "a"), (3, "c"), (2, "b")]);
/// assert_eq!(tree.min().unwrap(), (&3, &"c"));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn natural_order_matches_ord(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(NaturalOrder.compare(&a, &b), a.cmp(&b));
        }

        #[test]
        fn reverse_inverts(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(Reverse(NaturalOrder).compare(&a, &b), b.cmp(&a));
        }
    }

    #[test]
    fn closures_are_comparators() {
        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        assert_eq!(by_abs.compare(&-3, &2), Ordering::Greater);
        assert_eq!(by_abs.compare(&-2, &2), Ordering::Equal);
    }
}
