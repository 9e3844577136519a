mod children;
mod items;
mod iter;
mod node;

pub(crate) use items::Entry;
pub(crate) use iter::{RawIntoIter, RawIter, RawIterMut};
pub(crate) use node::{Node, Removal};
