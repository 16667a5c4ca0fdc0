use super::ModificationType;
use crate::error::{Error, Result};
use crate::traverse::{Breadcrumb, NamedChildren, NodeAdapter, NodeLocation, TreeNode};

/// A single pending edit: a node, the path from its position up to the root, and what to do at
/// that position.
///
/// Zippers are immutable. Every operation returns a new zipper and the tree a zipper points into
/// is never modified.
#[derive(Debug, Clone)]
pub struct NodeZipper<N> {
    cur_node: N,
    breadcrumbs: Vec<Breadcrumb<N>>,
    modification_type: ModificationType,
}

impl<N: TreeNode> NodeZipper<N> {
    /// Creates a zipper that replaces the node at the position described by `breadcrumbs`.
    #[inline]
    pub fn new(node: N, breadcrumbs: Vec<Breadcrumb<N>>) -> Self {
        Self::with_modification(node, breadcrumbs, ModificationType::Replace)
    }

    #[inline]
    pub fn with_modification(
        node: N,
        breadcrumbs: Vec<Breadcrumb<N>>,
        modification_type: ModificationType,
    ) -> Self {
        NodeZipper {
            cur_node: node,
            breadcrumbs,
            modification_type,
        }
    }

    #[inline]
    pub fn cur_node(&self) -> &N {
        &self.cur_node
    }

    /// Returns the path to the root, nearest breadcrumb first.
    #[inline]
    pub fn breadcrumbs(&self) -> &[Breadcrumb<N>] {
        &self.breadcrumbs
    }

    #[inline]
    pub fn modification_type(&self) -> ModificationType {
        self.modification_type
    }

    /// The number of ancestors above the edited position.
    #[inline]
    pub fn depth(&self) -> usize {
        self.breadcrumbs.len()
    }

    /// Returns the parent the edit is applied to, or `None` for an edit of the root.
    #[inline]
    pub fn parent(&self) -> Option<&N> {
        self.breadcrumbs.first().map(Breadcrumb::node)
    }

    /// Returns the edited position within the parent.
    #[inline]
    pub fn location(&self) -> Option<NodeLocation> {
        self.breadcrumbs.first().map(Breadcrumb::location)
    }

    /// Returns a copy of this zipper that carries `node` instead.
    pub fn with_new_node(&self, node: N) -> Self {
        Self::with_modification(node, self.breadcrumbs.clone(), self.modification_type)
    }

    /// Returns a zipper that deletes the node at this zipper's position.
    pub fn delete_node(&self) -> Self {
        Self::with_modification(
            self.cur_node.clone(),
            self.breadcrumbs.clone(),
            ModificationType::Delete,
        )
    }

    /// Returns a zipper that inserts `node` in front of this zipper's position.
    pub fn insert_before(&self, node: N) -> Self {
        Self::with_modification(node, self.breadcrumbs.clone(), ModificationType::InsertBefore)
    }

    /// Returns a zipper that inserts `node` behind this zipper's position.
    pub fn insert_after(&self, node: N) -> Self {
        Self::with_modification(node, self.breadcrumbs.clone(), ModificationType::InsertAfter)
    }

    /// Applies the edit to the parent and returns a zipper that replaces the parent with the
    /// rebuilt node one level up.
    pub fn move_up<A: NodeAdapter<N> + ?Sized>(&self, adapter: &A) -> Result<NodeZipper<N>> {
        let (parent, location) = match self.breadcrumbs.first() {
            Some(breadcrumb) => (breadcrumb.node(), breadcrumb.location()),
            None => return Err(Error::invariant("The root node has no parent to move up to")),
        };
        let mut children = adapter.named_children(parent);
        apply_modification(
            &mut children,
            location,
            0,
            self.cur_node.clone(),
            self.modification_type,
        )?;
        let parent = adapter.with_new_children(parent, children)?;
        Ok(NodeZipper::new(parent, self.breadcrumbs[1..].to_vec()))
    }

    /// Applies this edit on its own and rebuilds every ancestor up to a new root.
    ///
    /// Only the nearest ancestor receives this zipper's modification, every ancestor above it
    /// is replaced with its rebuilt child. Deleting the root itself yields `None`.
    pub fn to_root<A: NodeAdapter<N> + ?Sized>(&self, adapter: &A) -> Result<Option<N>> {
        if self.breadcrumbs.is_empty() {
            return match self.modification_type {
                ModificationType::Replace => Ok(Some(self.cur_node.clone())),
                ModificationType::Delete => Ok(None),
                ModificationType::InsertBefore | ModificationType::InsertAfter => Err(
                    Error::invariant("Nodes can't be inserted next to the root node"),
                ),
            };
        }
        let mut zipper = self.move_up(adapter)?;
        while !zipper.breadcrumbs.is_empty() {
            zipper = zipper.move_up(adapter)?;
        }
        Ok(Some(zipper.cur_node))
    }
}

/// Applies one edit to a parent's children at `location`, shifted by `correction` positions to
/// account for earlier edits in the same role.
pub(crate) fn apply_modification<N>(
    children: &mut NamedChildren<N>,
    location: NodeLocation,
    correction: isize,
    node: N,
    modification_type: ModificationType,
) -> Result<()> {
    let list = children.get_mut(location.role()).ok_or_else(|| {
        Error::invariant(format!(
            "The parent has no children under the role `{}`",
            location.role()
        ))
    })?;

    let offset = match modification_type {
        ModificationType::InsertAfter => 1,
        _ => 0,
    };
    let index = location.index() as isize + correction + offset;
    let inserting = matches!(
        modification_type,
        ModificationType::InsertBefore | ModificationType::InsertAfter
    );
    let in_range = index >= 0
        && (index as usize) < list.len() + if inserting { 1 } else { 0 };
    if !in_range {
        return Err(Error::invariant(format!(
            "The location {} is out of range for {} children",
            location,
            list.len()
        )));
    }

    let index = index as usize;
    match modification_type {
        ModificationType::Replace => list[index] = node,
        ModificationType::Delete => {
            list.remove(index);
        }
        ModificationType::InsertBefore | ModificationType::InsertAfter => {
            list.insert(index, node);
        }
    }
    Ok(())
}
