use crate::error::Result;
use crate::traverse::{TraversalControl, TraverserContext, TreeNode};
use crate::zipper::{ModificationType, NodeZipper};

/// Replaces the context's node in the transformed tree.
///
/// The traversal continues with the children of `node`. Changing a node a second time replaces
/// the edit that was recorded for it before.
pub fn change_node<N: TreeNode, A, S>(
    ctx: &mut TraverserContext<'_, N, A, S>,
    node: N,
) -> Result<TraversalControl> {
    ctx.ensure_recording_edits()?;
    let previous = ctx.this_node().node_id();
    let was_changed = ctx.is_changed();
    ctx.change_node(node.clone())?;
    if was_changed {
        ctx.replace_edit_for_node(previous, node)?;
    } else {
        let breadcrumbs = ctx.breadcrumbs();
        ctx.record_edit(NodeZipper::new(node, breadcrumbs))?;
    }
    Ok(TraversalControl::Continue)
}

/// Removes the context's node from the transformed tree. Its children aren't visited.
pub fn delete_node<N: TreeNode, A, S>(
    ctx: &mut TraverserContext<'_, N, A, S>,
) -> Result<TraversalControl> {
    ctx.ensure_recording_edits()?;
    ctx.delete_node()?;
    let zipper = NodeZipper::with_modification(
        ctx.this_node().clone(),
        ctx.breadcrumbs(),
        ModificationType::Delete,
    );
    ctx.record_edit(zipper)?;
    Ok(TraversalControl::Continue)
}

/// Inserts `node` in front of the context's node. Inserted nodes aren't visited.
pub fn insert_before<N: TreeNode, A, S>(
    ctx: &mut TraverserContext<'_, N, A, S>,
    node: N,
) -> Result<TraversalControl> {
    insert(ctx, node, ModificationType::InsertBefore)
}

/// Inserts `node` behind the context's node. Inserted nodes aren't visited.
pub fn insert_after<N: TreeNode, A, S>(
    ctx: &mut TraverserContext<'_, N, A, S>,
    node: N,
) -> Result<TraversalControl> {
    insert(ctx, node, ModificationType::InsertAfter)
}

fn insert<N: TreeNode, A, S>(
    ctx: &mut TraverserContext<'_, N, A, S>,
    node: N,
    modification_type: ModificationType,
) -> Result<TraversalControl> {
    ctx.ensure_recording_edits()?;
    if ctx.location().is_none() {
        return Err(ctx.invariant("Nodes can't be inserted next to the root node"));
    }
    let zipper = NodeZipper::with_modification(node, ctx.breadcrumbs(), modification_type);
    ctx.record_edit(zipper)?;
    Ok(TraversalControl::Continue)
}
