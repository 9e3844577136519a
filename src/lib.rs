//! An in-memory ordered map backed by a B-tree of configurable minimum degree.
//!
//! [`BTree`] keeps its entries sorted under a pluggable [`Comparator`] and lets the caller
//! pick the minimum degree `t` of the tree: every node other than the root holds between
//! `t - 1` and `2t - 1` entries, so `t` trades node width against tree height.
//!
//! # Example
//!
//! ```
//! use degree_btree::{BTree, DuplicatePolicy, Error};
//!
//! let mut scores = BTree::new(3).unwrap();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.min(), Ok((&"Alice", &100)));
//!
//! // Inserts can refuse to touch an existing key.
//! assert_eq!(scores.add("Bob", 0), Err(Error::DuplicateKey));
//! assert!(scores.insert_with("Dave", 71, DuplicatePolicy::Error).is_ok());
//!
//! // Iteration is in key order.
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol", "Dave"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Configurable degree** - Any `t >= 2`, validated once at construction
//! - **Custom ordering** - Closures, [`Reverse`], or any [`Comparator`] implementation
//! - **Single-pass updates** - Inserts split and removals rebalance on the way down
//!
//! # Logging
//!
//! Structural events (splits, merges, rotations, root changes) are emitted as `tracing`
//! events at `TRACE` level under the `degree_btree::*` targets. The crate installs no
//! subscriber.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod btree;
mod compare;
mod degree;
mod error;
mod policy;
mod raw;

pub use btree::{BTree, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use compare::{Comparator, NaturalOrder, Reverse};
pub use degree::Degree;
pub use error::{Error, Result};
pub use policy::{DuplicatePolicy, InsertOutcome};
