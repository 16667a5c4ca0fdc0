use super::context::TraverserContext;
use crate::error::Result;

/// A traversal signal that is returned from visitor callbacks to alter the flow of traversal.
///
/// The default callbacks all return `TraversalControl::Continue`, which descends into a node's
/// children. The other signals may be used to skip over a node's children in an `enter` callback
/// or to stop the traversal entirely without visiting any more nodes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TraversalControl {
    /// Continue visiting nodes as usual.
    Continue,
    /// Skip over the current node's children and proceed with its siblings.
    /// (Only applies to `enter` callbacks)
    Abort,
    /// Stop the traversal without performing any subsequent visits.
    Quit,
}

/// The callback a context is currently being visited with.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TraversalPhase {
    Enter,
    Leave,
    BackRef,
}

/// Trait for a visitor whose callbacks are called while a [`Traverser`](super::Traverser) walks
/// over nodes.
///
/// `enter` is called when a node is first reached and before its children are visited, `leave`
/// once all of its children have been processed. When a node that has already been entered is
/// reached again, for instance because a subtree is shared between two parents, `back_ref` is
/// called instead of `enter` and `leave`.
///
/// All callbacks default to returning `TraversalControl::Continue`. Errors returned from a
/// callback stop the traversal and are passed on to the caller unchanged.
pub trait TraverserVisitor<N, A = (), S = ()> {
    fn enter(&mut self, _ctx: &mut TraverserContext<'_, N, A, S>) -> Result<TraversalControl> {
        Ok(TraversalControl::Continue)
    }

    /// Called after a node's children were visited. May only return `Continue` or `Quit`.
    fn leave(&mut self, _ctx: &mut TraverserContext<'_, N, A, S>) -> Result<TraversalControl> {
        Ok(TraversalControl::Continue)
    }

    /// Called when an already visited node is reached again. May only return `Continue` or
    /// `Quit`.
    fn back_ref(&mut self, _ctx: &mut TraverserContext<'_, N, A, S>) -> Result<TraversalControl> {
        Ok(TraversalControl::Continue)
    }
}

impl<N, A, S, V: TraverserVisitor<N, A, S> + ?Sized> TraverserVisitor<N, A, S> for &mut V {
    #[inline]
    fn enter(&mut self, ctx: &mut TraverserContext<'_, N, A, S>) -> Result<TraversalControl> {
        (**self).enter(ctx)
    }

    #[inline]
    fn leave(&mut self, ctx: &mut TraverserContext<'_, N, A, S>) -> Result<TraversalControl> {
        (**self).leave(ctx)
    }

    #[inline]
    fn back_ref(&mut self, ctx: &mut TraverserContext<'_, N, A, S>) -> Result<TraversalControl> {
        (**self).back_ref(ctx)
    }
}
