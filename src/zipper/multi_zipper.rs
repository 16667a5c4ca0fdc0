use super::node_zipper::{apply_modification, NodeZipper};
use super::ModificationType;
use crate::error::{Error, Result};
use crate::traverse::{Breadcrumb, NodeAdapter, NodeId, Role, TreeNode};
use hashbrown::HashMap;

/// A batch of edits to a single tree that are applied together.
///
/// Edits are made against the original tree, so the positions recorded in each zipper's
/// breadcrumbs stay valid no matter in which order the edits were collected.
/// [`to_root_node`](Self::to_root_node) reconciles all of them into one new root. Zippers are kept
/// in a list and equal zippers are never merged, since two distinct edits may carry equal data.
#[derive(Debug, Clone)]
pub struct NodeMultiZipper<N> {
    common_root: N,
    zippers: Vec<NodeZipper<N>>,
}

impl<N: TreeNode> NodeMultiZipper<N> {
    pub fn new(common_root: N, zippers: Vec<NodeZipper<N>>) -> Self {
        NodeMultiZipper {
            common_root,
            zippers,
        }
    }

    #[inline]
    pub fn common_root(&self) -> &N {
        &self.common_root
    }

    #[inline]
    pub fn zippers(&self) -> &[NodeZipper<N>] {
        &self.zippers
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.zippers.len()
    }

    /// Returns the first zipper that carries `node`.
    pub fn zipper_for_node(&self, node: &N) -> Option<&NodeZipper<N>> {
        let id = node.node_id();
        self.zippers
            .iter()
            .find(|zipper| zipper.cur_node().node_id() == id)
    }

    /// Returns the nodes carried by all zippers.
    pub fn modified_nodes(&self) -> Vec<&N> {
        self.zippers.iter().map(NodeZipper::cur_node).collect()
    }

    pub fn with_new_zipper(&self, zipper: NodeZipper<N>) -> Self {
        let mut zippers = self.zippers.clone();
        zippers.push(zipper);
        NodeMultiZipper::new(self.common_root.clone(), zippers)
    }

    pub fn with_replaced_zippers(&self, zippers: Vec<NodeZipper<N>>) -> Self {
        NodeMultiZipper::new(self.common_root.clone(), zippers)
    }

    /// Swaps the node of the zipper carrying `node` for `new_node`.
    pub fn with_replaced_zipper_for_node(&self, node: &N, new_node: N) -> Result<Self> {
        let id = node.node_id();
        let position = self
            .zippers
            .iter()
            .position(|zipper| zipper.cur_node().node_id() == id)
            .ok_or_else(|| Error::invariant("No current zipper found for provided node"))?;
        let mut zippers = self.zippers.clone();
        zippers[position] = zippers[position].with_new_node(new_node);
        Ok(NodeMultiZipper::new(self.common_root.clone(), zippers))
    }

    /// Applies all edits and returns the new root, or `None` if the root itself was deleted.
    ///
    /// The deepest edits are resolved first: edits that share a parent are applied to that
    /// parent's children in one pass, ordered by position, which produces a single replacement of
    /// the parent one level up. This repeats level by level until one edit of the root remains.
    pub fn to_root_node<A: NodeAdapter<N> + ?Sized>(&self, adapter: &A) -> Result<Option<N>> {
        if self.zippers.is_empty() {
            return Ok(Some(self.common_root.clone()));
        }

        let mut current = self.zippers.clone();
        let mut rounds = 0usize;
        while current.len() > 1 {
            let depth = current.iter().map(NodeZipper::depth).max().unwrap_or(0);
            if depth == 0 {
                return Err(Error::invariant(
                    "More than one edit was made to the root node",
                ));
            }

            let (deepest, mut rest): (Vec<_>, Vec<_>) = current
                .into_iter()
                .partition(|zipper| zipper.depth() == depth);

            let mut moved = Vec::new();
            for (parent, group) in group_by_parent(deepest) {
                let replacement = group.first().and_then(|first| {
                    let parent_crumbs = &first.breadcrumbs()[1..];
                    rest.iter().position(|zipper| replaces_position(zipper, parent_crumbs))
                });
                match replacement {
                    // the parent was replaced after its children were edited, so the
                    // replacement wins over the parent rebuilt from those edits
                    Some(position) if rest[position].cur_node().node_id() != parent => {}
                    Some(position) => {
                        rest.remove(position);
                        moved.push(move_up_group(adapter, group)?);
                    }
                    None => moved.push(move_up_group(adapter, group)?),
                }
            }

            rest.extend(moved);
            current = rest;
            rounds += 1;
        }

        tracing::trace!(edits = self.zippers.len(), rounds, "reconciled edits");
        match current.pop() {
            Some(zipper) => zipper.to_root(adapter),
            None => Ok(Some(self.common_root.clone())),
        }
    }
}

/// Whether `zipper` replaces the node at the position that `breadcrumbs` lead to.
fn replaces_position<N: TreeNode>(zipper: &NodeZipper<N>, breadcrumbs: &[Breadcrumb<N>]) -> bool {
    if zipper.modification_type() != ModificationType::Replace
        || zipper.depth() != breadcrumbs.len()
    {
        return false;
    }
    match (zipper.breadcrumbs().first(), breadcrumbs.first()) {
        (Some(own), Some(other)) => {
            own.location() == other.location() && own.node().node_id() == other.node().node_id()
        }
        (None, None) => true,
        _ => false,
    }
}

/// Groups zippers by the identity of their parent, in the order parents are first seen.
fn group_by_parent<N: TreeNode>(zippers: Vec<NodeZipper<N>>) -> Vec<(NodeId, Vec<NodeZipper<N>>)> {
    let mut groups: Vec<(NodeId, Vec<NodeZipper<N>>)> = Vec::new();
    for zipper in zippers {
        let parent = match zipper.parent() {
            Some(parent) => parent.node_id(),
            None => continue,
        };
        match groups.iter_mut().find(|(id, _)| *id == parent) {
            Some((_, group)) => group.push(zipper),
            None => groups.push((parent, vec![zipper])),
        }
    }
    groups
}

/// Applies all edits of one parent at once and returns the replacement of that parent.
fn move_up_group<N, A>(adapter: &A, mut group: Vec<NodeZipper<N>>) -> Result<NodeZipper<N>>
where
    N: TreeNode,
    A: NodeAdapter<N> + ?Sized,
{
    // sort_by_key is stable, so equal edits keep the order they were recorded in
    group.sort_by_key(|zipper| {
        let index = zipper.location().map_or(0, |location| location.index());
        (index, zipper.modification_type().precedence())
    });

    let first = match group.first() {
        Some(first) => first,
        None => return Err(Error::invariant("Can't move up an empty group of edits")),
    };
    let parent = match first.parent() {
        Some(parent) => parent,
        None => return Err(Error::invariant("The root node has no parent to move up to")),
    };

    let mut children = adapter.named_children(parent);
    let mut corrections: HashMap<Role, isize> = HashMap::new();
    for zipper in &group {
        let location = match zipper.location() {
            Some(location) => location,
            None => return Err(Error::invariant("The root node has no parent to move up to")),
        };
        let correction = corrections.entry(location.role()).or_insert(0);
        apply_modification(
            &mut children,
            location,
            *correction,
            zipper.cur_node().clone(),
            zipper.modification_type(),
        )?;
        match zipper.modification_type() {
            ModificationType::Replace => {}
            ModificationType::Delete => *correction -= 1,
            ModificationType::InsertBefore | ModificationType::InsertAfter => *correction += 1,
        }
    }

    let node = adapter.with_new_children(parent, children)?;
    Ok(NodeZipper::new(node, first.breadcrumbs()[1..].to_vec()))
}
