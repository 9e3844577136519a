use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by [`BTree`](crate::BTree) and its node engine.
///
/// A missing key is not an error: lookups and removals report it with `None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The requested degree is below the smallest degree a B-tree can have.
    #[error("degree must be at least {min}, got {degree}")]
    InvalidDegree {
        /// The rejected degree.
        degree: usize,
        /// The smallest accepted degree.
        min: usize,
    },

    /// An insert under [`DuplicatePolicy::Error`](crate::DuplicatePolicy::Error) found the key
    /// already present. The tree contents are unchanged.
    #[error("an entry with the same key has already been added")]
    DuplicateKey,

    /// Minimum or maximum requested from an empty tree.
    #[error("the tree is empty")]
    EmptyCollection,

    /// A node array was asked to hold more than its fixed capacity.
    ///
    /// This signals a broken balancing invariant and never happens in a correct tree.
    #[error("{array} array is full (capacity {capacity})")]
    CapacityViolation {
        /// Which array overflowed.
        array: &'static str,
        /// Its fixed capacity.
        capacity: usize,
    },

    /// A positional node-array operation addressed a slot past the live count.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The requested position.
        index: usize,
        /// The live count at the time of the request.
        len: usize,
    },
}

impl Error {
    /// Returns true for the variants that can only come from a broken tree invariant.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::CapacityViolation { .. } | Error::IndexOutOfBounds { .. })
    }
}
