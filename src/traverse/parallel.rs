use super::node::{Breadcrumb, NamedChildren, NodeId, NodeLocation, TreeNode};
use super::vars::SyncVarMap;
use super::visitor::{TraversalControl, TraversalPhase};
use super::TraverserResult;
use crate::error::{Error, ErrorType, Result};
use dashmap::DashSet;
use rayon::prelude::*;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// Trait for a visitor of a [`ParallelTraverser`].
///
/// Callbacks take `&self` since they may be invoked on several worker threads at once. State that
/// is specific to a subtree belongs into the context's variables and accumulates, while state
/// that's shared by all callbacks has to be synchronized by the visitor itself.
///
/// Parallel traversals can't be stopped early, so returning `Quit` from any callback fails the
/// traversal with an invariant violation. `Abort` may only be returned from `enter`.
pub trait ParallelVisitor<N, A = (), S = ()>: Sync {
    fn enter(&self, _ctx: &mut ParallelContext<'_, N, A, S>) -> Result<TraversalControl> {
        Ok(TraversalControl::Continue)
    }

    fn leave(&self, _ctx: &mut ParallelContext<'_, N, A, S>) -> Result<TraversalControl> {
        Ok(TraversalControl::Continue)
    }

    fn back_ref(&self, _ctx: &mut ParallelContext<'_, N, A, S>) -> Result<TraversalControl> {
        Ok(TraversalControl::Continue)
    }
}

impl<N, A, S, V: ParallelVisitor<N, A, S> + ?Sized> ParallelVisitor<N, A, S> for &V {
    #[inline]
    fn enter(&self, ctx: &mut ParallelContext<'_, N, A, S>) -> Result<TraversalControl> {
        (**self).enter(ctx)
    }

    #[inline]
    fn leave(&self, ctx: &mut ParallelContext<'_, N, A, S>) -> Result<TraversalControl> {
        (**self).leave(ctx)
    }

    #[inline]
    fn back_ref(&self, ctx: &mut ParallelContext<'_, N, A, S>) -> Result<TraversalControl> {
        (**self).back_ref(ctx)
    }
}

/// An entered node whose children are being visited.
struct Frame<N> {
    node: N,
    location: Option<NodeLocation>,
    vars: SyncVarMap,
    parent: Option<Arc<Frame<N>>>,
}

/// The context of a node during a parallel traversal.
///
/// Unlike a [`TraverserContext`](super::TraverserContext) it can't change or delete nodes, and
/// instead of a single running accumulate each node hands its accumulate down to its children
/// and receives their accumulates back when it's left.
pub struct ParallelContext<'c, N, A = (), S = ()> {
    node: N,
    location: Option<NodeLocation>,
    parent: Option<&'c Arc<Frame<N>>>,
    vars: SyncVarMap,
    root_vars: &'c SyncVarMap,
    current_accumulate: A,
    new_accumulate: Option<A>,
    children_accumulates: Option<NamedChildren<A>>,
    phase: TraversalPhase,
    shared: &'c S,
    visited: &'c DashSet<NodeId>,
}

impl<'c, N: TreeNode, A, S> ParallelContext<'c, N, A, S> {
    #[inline]
    pub fn this_node(&self) -> &N {
        &self.node
    }

    /// Returns the node the context was created for. Parallel traversals never change nodes,
    /// so this is always [`this_node`](Self::this_node).
    #[inline]
    pub fn original_this_node(&self) -> &N {
        &self.node
    }

    #[inline]
    pub fn location(&self) -> Option<NodeLocation> {
        self.location
    }

    #[inline]
    pub fn parent_node(&self) -> Option<&N> {
        self.parent.map(|frame| &frame.node)
    }

    /// Returns the parent's position in its own parent, or `None` for roots and their children.
    #[inline]
    pub fn parent_location(&self) -> Option<NodeLocation> {
        self.parent.and_then(|frame| frame.location)
    }

    /// Reads a variable that the parent stored on its own context.
    #[inline]
    pub fn parent_var<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.parent.and_then(|frame| frame.vars.get::<T>())
    }

    /// Returns all ancestors, nearest first.
    pub fn parent_nodes(&self) -> Vec<&N> {
        let mut nodes = Vec::new();
        let mut current = self.parent.map(|frame| &**frame);
        while let Some(frame) = current {
            nodes.push(&frame.node);
            current = frame.parent.as_deref();
        }
        nodes
    }

    /// Returns the path from this node to the root, nearest breadcrumb first.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb<N>> {
        let mut breadcrumbs = Vec::new();
        let mut location = self.location;
        let mut current = self.parent.map(|frame| &**frame);
        while let (Some(frame), Some(at)) = (current, location) {
            breadcrumbs.push(Breadcrumb::new(frame.node.clone(), at));
            location = frame.location;
            current = frame.parent.as_deref();
        }
        breadcrumbs
    }

    #[inline]
    pub fn var<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.vars.get::<T>()
    }

    /// Reads a variable from the nearest ancestor that has one stored for `T`, ending with the
    /// root vars.
    pub fn var_from_parents<T: Any + Send + Sync>(&self) -> Option<&T> {
        let mut current = self.parent.map(|frame| &**frame);
        while let Some(frame) = current {
            if let Some(value) = frame.vars.get::<T>() {
                return Some(value);
            }
            current = frame.parent.as_deref();
        }
        self.root_vars.get::<T>()
    }

    /// Stores a variable on this context. Variables set in `enter` are visible to all
    /// descendants.
    #[inline]
    pub fn set_var<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.vars.insert(value);
        self
    }

    #[inline]
    pub fn set_accumulate(&mut self, value: A) {
        self.new_accumulate = Some(value);
    }

    /// Returns the accumulate the node was entered with, or during `leave` the one it handed to
    /// its children.
    #[inline]
    pub fn current_accumulate(&self) -> &A {
        &self.current_accumulate
    }

    #[inline]
    pub fn new_accumulate(&self) -> &A {
        self.new_accumulate
            .as_ref()
            .unwrap_or(&self.current_accumulate)
    }

    /// Returns the accumulates the children returned, grouped by role. These are only available
    /// while leaving a node.
    #[inline]
    pub fn children_accumulates(&self) -> Option<&NamedChildren<A>> {
        self.children_accumulates.as_ref()
    }

    #[inline]
    pub fn shared_context_data(&self) -> &S {
        self.shared
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited.contains(&self.node.node_id())
    }

    #[inline]
    pub fn visited_nodes(&self) -> &DashSet<NodeId> {
        self.visited
    }

    #[inline]
    pub fn phase(&self) -> TraversalPhase {
        self.phase
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        true
    }

    #[inline]
    pub fn is_root_context(&self) -> bool {
        false
    }

    fn into_new_accumulate(self) -> A {
        match self.new_accumulate {
            Some(accumulate) => accumulate,
            None => self.current_accumulate,
        }
    }
}

/// A traverser that visits the children of every node in parallel on a rayon thread pool.
///
/// A node is entered before any of its children and left after all of them, so `leave` always
/// sees the complete [`children_accumulates`](ParallelContext::children_accumulates). Siblings
/// have no defined order relative to one another. When a node is reachable along several paths
/// it's entered on whichever path claims it first, and every other occurrence is a back
/// reference, which may run before the entered occurrence has been left.
pub struct ParallelTraverser<N, F, A = (), S = ()> {
    children: F,
    shared: S,
    initial_accumulate: A,
    root_vars: SyncVarMap,
    pool: Option<Arc<rayon::ThreadPool>>,
    _node: PhantomData<fn(&N)>,
}

impl<N, F> ParallelTraverser<N, F>
where
    N: TreeNode + Send + Sync,
    F: Fn(&N) -> NamedChildren<N> + Sync,
{
    pub fn new(children: F) -> Self {
        ParallelTraverser {
            children,
            shared: (),
            initial_accumulate: (),
            root_vars: SyncVarMap::new(),
            pool: None,
            _node: PhantomData,
        }
    }
}

impl<N, F, A, S> ParallelTraverser<N, F, A, S>
where
    N: TreeNode + Send + Sync,
    F: Fn(&N) -> NamedChildren<N> + Sync,
    A: Clone + Send + Sync,
    S: Sync,
{
    pub fn with_shared_data<S2: Sync>(self, shared: S2) -> ParallelTraverser<N, F, A, S2> {
        ParallelTraverser {
            children: self.children,
            shared,
            initial_accumulate: self.initial_accumulate,
            root_vars: self.root_vars,
            pool: self.pool,
            _node: PhantomData,
        }
    }

    /// Sets the accumulate that every root is entered with.
    pub fn with_initial_accumulate<A2: Clone + Send + Sync>(
        self,
        accumulate: A2,
    ) -> ParallelTraverser<N, F, A2, S> {
        ParallelTraverser {
            children: self.children,
            shared: self.shared,
            initial_accumulate: accumulate,
            root_vars: self.root_vars,
            pool: self.pool,
            _node: PhantomData,
        }
    }

    pub fn root_var<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.root_vars.insert(value);
        self
    }

    pub fn with_root_vars(mut self, root_vars: SyncVarMap) -> Self {
        self.root_vars = root_vars;
        self
    }

    /// Runs the traversal on the given pool instead of rayon's global pool.
    pub fn with_pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Traverses the tree below `root` and returns the root's final accumulate.
    pub fn traverse<V>(self, root: N, visitor: V) -> Result<TraverserResult<A>>
    where
        V: ParallelVisitor<N, A, S>,
    {
        let result = self.traverse_all(vec![root], visitor)?;
        match result.into_accumulated_result().pop() {
            Some(accumulate) => Ok(TraverserResult::new(accumulate)),
            None => Err(Error::invariant("The traversal of a root returned no result")),
        }
    }

    /// Traverses several trees in parallel and returns the final accumulate of each root, in the
    /// order of `roots`.
    pub fn traverse_all<V>(self, roots: Vec<N>, visitor: V) -> Result<TraverserResult<Vec<A>>>
    where
        V: ParallelVisitor<N, A, S>,
    {
        let visited = DashSet::new();
        let walk = Walk {
            children: &self.children,
            shared: &self.shared,
            root_vars: &self.root_vars,
            visited: &visited,
            visitor: &visitor,
        };
        let initial = &self.initial_accumulate;
        let run = || {
            tracing::debug!(
                roots = roots.len(),
                threads = rayon::current_num_threads(),
                "starting parallel traversal"
            );
            roots
                .into_par_iter()
                .map(|root| walk.visit(root, None, None, initial.clone()))
                .collect::<Result<Vec<A>>>()
        };
        let accumulates = match self.pool {
            Some(ref pool) => pool.install(run),
            None => run(),
        }?;
        tracing::debug!(visited = visited.len(), "finished parallel traversal");
        Ok(TraverserResult::new(accumulates))
    }
}

struct Walk<'t, F, S, V> {
    children: &'t F,
    shared: &'t S,
    root_vars: &'t SyncVarMap,
    visited: &'t DashSet<NodeId>,
    visitor: &'t V,
}

impl<'t, F, S: Sync, V> Walk<'t, F, S, V> {
    fn visit<N, A>(
        &self,
        node: N,
        location: Option<NodeLocation>,
        parent: Option<&Arc<Frame<N>>>,
        accumulate: A,
    ) -> Result<A>
    where
        N: TreeNode + Send + Sync,
        F: Fn(&N) -> NamedChildren<N> + Sync,
        A: Clone + Send + Sync,
        V: ParallelVisitor<N, A, S>,
    {
        let claimed = self.visited.insert(node.node_id());
        let mut ctx = ParallelContext {
            node,
            location,
            parent,
            vars: SyncVarMap::new(),
            root_vars: self.root_vars,
            current_accumulate: accumulate,
            new_accumulate: None,
            children_accumulates: None,
            phase: TraversalPhase::Enter,
            shared: self.shared,
            visited: self.visited,
        };

        if !claimed {
            ctx.phase = TraversalPhase::BackRef;
            let control = self.visitor.back_ref(&mut ctx)?;
            check_control(&ctx, control, TraversalPhase::BackRef)?;
            return Ok(ctx.into_new_accumulate());
        }

        match self.visitor.enter(&mut ctx)? {
            TraversalControl::Continue => {}
            TraversalControl::Abort => return Ok(ctx.into_new_accumulate()),
            quit => check_control(&ctx, quit, TraversalPhase::Enter)?,
        }

        let children = (self.children)(&ctx.node);
        let roles = children
            .iter()
            .map(|(role, list)| (role, list.len()))
            .collect::<Vec<_>>();
        let located = children
            .into_iter()
            .flat_map(|(role, list)| {
                list.into_iter()
                    .enumerate()
                    .map(move |(index, child)| (NodeLocation::new(role, index), child))
            })
            .collect::<Vec<_>>();

        let accumulate = ctx.new_accumulate().clone();
        let frame = Arc::new(Frame {
            node: ctx.node,
            location: ctx.location,
            vars: ctx.vars,
            parent: parent.cloned(),
        });

        let mut results = located
            .into_par_iter()
            .map(|(location, child)| {
                self.visit(child, Some(location), Some(&frame), accumulate.clone())
            })
            .collect::<Result<Vec<A>>>()?
            .into_iter();

        let mut children_accumulates = NamedChildren::new();
        for (role, len) in roles {
            children_accumulates.insert(role, results.by_ref().take(len).collect());
        }

        let frame = Arc::try_unwrap(frame).map_err(|_| {
            Error::invariant("A node's context was still in use after its children completed")
        })?;
        let mut ctx = ParallelContext {
            node: frame.node,
            location: frame.location,
            parent,
            vars: frame.vars,
            root_vars: self.root_vars,
            current_accumulate: accumulate,
            new_accumulate: None,
            children_accumulates: Some(children_accumulates),
            phase: TraversalPhase::Leave,
            shared: self.shared,
            visited: self.visited,
        };
        let control = self.visitor.leave(&mut ctx)?;
        check_control(&ctx, control, TraversalPhase::Leave)?;
        Ok(ctx.into_new_accumulate())
    }
}

fn check_control<N: TreeNode, A, S>(
    ctx: &ParallelContext<'_, N, A, S>,
    control: TraversalControl,
    phase: TraversalPhase,
) -> Result<()> {
    let message = match (control, phase) {
        (TraversalControl::Continue, _) => return Ok(()),
        (TraversalControl::Abort, TraversalPhase::Enter) => return Ok(()),
        (TraversalControl::Quit, _) => "Quit isn't supported in parallel traversals",
        (TraversalControl::Abort, _) => "Abort can only be returned when entering a node",
    };
    let path = ctx
        .breadcrumbs()
        .iter()
        .rev()
        .map(|breadcrumb| breadcrumb.location().to_string())
        .collect::<Vec<_>>();
    let context = if path.is_empty() {
        String::from("at root")
    } else {
        format!("at {}", path.join("."))
    };
    Err(Error::new_with_context(
        message.to_string(),
        context,
        Some(ErrorType::Invariant),
    ))
}
