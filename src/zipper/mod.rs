//! # Zippers for editing immutable trees
//!
//! A [`NodeZipper`] records a single edit of a tree: the node to put in place, the
//! [breadcrumbs](crate::traverse::Breadcrumb) leading from the edited position back up to the
//! root, and a [`ModificationType`]. Zipping an edit up rebuilds every ancestor of the edited
//! position via a [`NodeAdapter`](crate::traverse::NodeAdapter) while all unaffected subtrees are
//! shared with the original tree.
//!
//! Many edits of one tree are collected into a [`NodeMultiZipper`], which applies all of them at
//! once, including several edits below the same parent.

mod multi_zipper;
mod node_zipper;

pub use multi_zipper::NodeMultiZipper;
pub use node_zipper::NodeZipper;

/// The kind of edit a [`NodeZipper`] applies at its position.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum ModificationType {
    /// Puts the zipper's node in place of the node at the position.
    Replace,
    /// Removes the node at the position.
    Delete,
    /// Inserts the zipper's node in front of the node at the position.
    InsertBefore,
    /// Inserts the zipper's node behind the node at the position.
    InsertAfter,
}

impl ModificationType {
    /// The order in which edits of the same position are applied.
    #[inline]
    pub(crate) fn precedence(self) -> u8 {
        match self {
            ModificationType::Replace => 0,
            ModificationType::InsertBefore => 1,
            ModificationType::Delete => 2,
            ModificationType::InsertAfter => 3,
        }
    }
}
