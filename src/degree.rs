use core::fmt;
use core::num::NonZero;

use crate::error::{Error, Result};

/// The minimum degree `t` of a B-tree.
///
/// Every node holds at most `2t - 1` entries and `2t` children, and every node except the
/// root holds at least `t - 1` entries. The degree is fixed for the lifetime of a tree.
///
/// # Examples
///
/// ```
/// use degree_btree::Degree;
///
/// let degree = Degree::new(3).unwrap();
/// assert_eq!(degree.min_items(), 2);
/// assert_eq!(degree.max_items(), 5);
/// assert_eq!(degree.max_children(), 6);
///
/// assert!(Degree::new(1).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Degree(NonZero<usize>);

impl Degree {
    /// The smallest degree a B-tree can have (a 2-3-4 tree).
    pub const MIN: usize = 2;

    /// The degree used by [`BTree::default`](crate::BTree::default).
    pub const DEFAULT: Self = Self::new_const(6);

    /// Validates `degree` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDegree`] if `degree < Degree::MIN`.
    pub const fn new(degree: usize) -> Result<Self> {
        if degree < Self::MIN {
            return Err(Error::InvalidDegree {
                degree,
                min: Self::MIN,
            });
        }
        Ok(Self::new_const(degree))
    }

    const fn new_const(degree: usize) -> Self {
        assert!(degree >= Self::MIN, "`Degree::new_const()` - `degree` < `Degree::MIN`!");
        match NonZero::new(degree) {
            Some(degree) => Self(degree),
            None => unreachable!(),
        }
    }

    /// Returns `t`.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Returns `t - 1`, the fewest entries a non-root node may hold.
    #[inline]
    #[must_use]
    pub const fn min_items(self) -> usize {
        self.get() - 1
    }

    /// Returns `2t - 1`, the most entries any node may hold.
    #[inline]
    #[must_use]
    pub const fn max_items(self) -> usize {
        2 * self.get() - 1
    }

    /// Returns `2t`, the most children any node may hold.
    #[inline]
    #[must_use]
    pub const fn max_children(self) -> usize {
        2 * self.get()
    }

    /// Index of the median entry of a full node.
    #[inline]
    pub(crate) const fn median(self) -> usize {
        self.get() - 1
    }
}

impl Default for Degree {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Degree {
    type Error = Error;

    fn try_from(degree: usize) -> Result<Self> {
        Self::new(degree)
    }
}

impl From<Degree> for usize {
    fn from(degree: Degree) -> Self {
        degree.get()
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}
