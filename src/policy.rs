/// What an insert does when the key is already present.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum DuplicatePolicy {
    /// Keep the stored value and report [`InsertOutcome::Rejected`].
    #[default]
    Reject,
    /// Replace the stored value and report [`InsertOutcome::Updated`] with the old one.
    Overwrite,
    /// Fail with [`Error::DuplicateKey`](crate::Error::DuplicateKey).
    Error,
}

/// The result of a successful insert.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[must_use]
pub enum InsertOutcome<V> {
    /// A new entry was created; the tree grew by one.
    Added,
    /// The key existed and its value was replaced. Holds the previous value.
    Updated(V),
    /// The key existed and was left untouched.
    Rejected,
}

impl<V> InsertOutcome<V> {
    /// Returns true if a new entry was created.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self, InsertOutcome::Added)
    }

    /// Returns the replaced value, if any.
    pub fn into_replaced(self) -> Option<V> {
        match self {
            InsertOutcome::Updated(old) => Some(old),
            InsertOutcome::Added | InsertOutcome::Rejected => None,
        }
    }
}
