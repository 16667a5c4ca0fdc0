use super::{
    node::{Breadcrumb, NamedChildren, NodeId, NodeLocation, TreeNode},
    vars::VarMap,
    visitor::TraversalPhase,
};
use crate::error::{Error, ErrorType, Result};
use crate::zipper::NodeZipper;
use hashbrown::HashSet;
use std::any::Any;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ContextId(usize);

pub(crate) struct ContextData<N, A> {
    node: N,
    original: N,
    changed: bool,
    deleted: bool,
    /// `None` when the parent is the synthetic root context.
    parent: Option<ContextId>,
    location: Option<NodeLocation>,
    vars: VarMap,
    current_accumulate: A,
    new_accumulate: Option<A>,
    children: Option<NamedChildren<ContextId>>,
    phase: Option<TraversalPhase>,
}

/// Storage for all contexts of one traversal run.
///
/// Contexts refer to their parents by id, which lets visitors walk up the parent chain while the
/// context they're visiting is borrowed mutably. The synthetic root context isn't stored as an
/// entry and only contributes the root vars.
pub(crate) struct ContextArena<N, A> {
    contexts: Vec<ContextData<N, A>>,
    root_vars: VarMap,
    /// Edits recorded by the transform helpers; `None` outside of a transformer run.
    edits: Option<Vec<NodeZipper<N>>>,
}

impl<N: TreeNode, A> ContextArena<N, A> {
    pub(crate) fn new(root_vars: VarMap, record_edits: bool) -> Self {
        ContextArena {
            contexts: Vec::new(),
            root_vars,
            edits: if record_edits { Some(Vec::new()) } else { None },
        }
    }

    pub(crate) fn push(
        &mut self,
        node: N,
        parent: Option<ContextId>,
        location: Option<NodeLocation>,
        accumulate: A,
    ) -> ContextId {
        let id = ContextId(self.contexts.len());
        self.contexts.push(ContextData {
            original: node.clone(),
            node,
            changed: false,
            deleted: false,
            parent,
            location,
            vars: VarMap::new(),
            current_accumulate: accumulate,
            new_accumulate: None,
            children: None,
            phase: None,
        });
        id
    }

    #[inline]
    fn data(&self, id: ContextId) -> &ContextData<N, A> {
        &self.contexts[id.0]
    }

    #[inline]
    fn data_mut(&mut self, id: ContextId) -> &mut ContextData<N, A> {
        &mut self.contexts[id.0]
    }

    /// Prepares a context for a callback: records the running accumulate and the phase.
    pub(crate) fn reach(&mut self, id: ContextId, accumulate: A, phase: TraversalPhase) {
        let data = self.data_mut(id);
        data.current_accumulate = accumulate;
        data.new_accumulate = None;
        data.phase = Some(phase);
    }

    pub(crate) fn set_children(&mut self, id: ContextId, children: NamedChildren<ContextId>) {
        self.data_mut(id).children = Some(children);
    }

    /// Takes the accumulate a context hands on to the next step in traversal order.
    pub(crate) fn take_new_accumulate(&mut self, id: ContextId) -> A
    where
        A: Clone,
    {
        let data = self.data_mut(id);
        match data.new_accumulate {
            Some(ref value) => value.clone(),
            None => data.current_accumulate.clone(),
        }
    }

    #[inline]
    pub(crate) fn this_node(&self, id: ContextId) -> &N {
        &self.data(id).node
    }

    #[inline]
    pub(crate) fn original_node(&self, id: ContextId) -> &N {
        &self.data(id).original
    }

    #[inline]
    pub(crate) fn is_deleted(&self, id: ContextId) -> bool {
        self.data(id).deleted
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.contexts.len()
    }

    pub(crate) fn into_edits(self) -> Vec<NodeZipper<N>> {
        self.edits.unwrap_or_default()
    }

    fn breadcrumbs(&self, id: ContextId) -> Vec<Breadcrumb<N>> {
        let mut breadcrumbs = Vec::new();
        let mut current = id;
        loop {
            let data = self.data(current);
            match (data.parent, data.location) {
                (Some(parent), Some(location)) => {
                    breadcrumbs.push(Breadcrumb::new(self.data(parent).node.clone(), location));
                    current = parent;
                }
                _ => return breadcrumbs,
            }
        }
    }

    /// Creates an invariant error that points at the node of the context `id`.
    pub(crate) fn invariant(&self, id: ContextId, message: &str) -> Error {
        Error::new_with_context(
            message.to_string(),
            self.path(id),
            Some(ErrorType::Invariant),
        )
    }

    fn path(&self, id: ContextId) -> String {
        let mut segments = self
            .breadcrumbs(id)
            .iter()
            .map(|breadcrumb| breadcrumb.location().to_string())
            .collect::<Vec<_>>();
        segments.reverse();
        if segments.is_empty() {
            String::from("at root")
        } else {
            format!("at {}", segments.join("."))
        }
    }

    /// Looks a variable up starting at `start` and walking up the parents, ending with the root
    /// vars.
    fn var_from<T: Any>(&self, start: Option<ContextId>) -> Option<&T> {
        let mut current = start;
        while let Some(id) = current {
            let data = self.data(id);
            if let Some(value) = data.vars.get::<T>() {
                return Some(value);
            }
            current = data.parent;
        }
        self.root_vars.get::<T>()
    }
}

/// The handle through which visitors inspect the node they're visiting, its position in the
/// tree, and through which they store variables, accumulate results and make edits.
///
/// A context is created for every node that's reached during traversal and stays alive until the
/// traversal completes, which allows a `leave` callback to inspect the contexts of its children.
pub struct TraverserContext<'c, N, A = (), S = ()> {
    pub(crate) arena: &'c mut ContextArena<N, A>,
    pub(crate) id: ContextId,
    pub(crate) shared: &'c S,
    pub(crate) visited: &'c HashSet<NodeId>,
}

impl<'c, N: TreeNode, A, S> TraverserContext<'c, N, A, S> {
    #[inline]
    fn data(&self) -> &ContextData<N, A> {
        self.arena.data(self.id)
    }

    #[inline]
    fn data_mut(&mut self) -> &mut ContextData<N, A> {
        self.arena.data_mut(self.id)
    }

    /// Returns the current node, which is the replacement if the node has been changed.
    #[inline]
    pub fn this_node(&self) -> &N {
        &self.data().node
    }

    /// Returns the node as it was first reached, before any change.
    #[inline]
    pub fn original_this_node(&self) -> &N {
        &self.data().original
    }

    /// Replaces the current node for the remainder of this traversal. Children of the new node
    /// are visited instead of the original's.
    ///
    /// This only affects the context. To rebuild a tree use
    /// [`change_node`](crate::transform::change_node) during a
    /// [`TreeTransformer`](crate::transform::TreeTransformer) run instead.
    pub fn change_node(&mut self, node: N) -> Result<()> {
        if self.data().deleted {
            return Err(self.invariant("A deleted node can't be changed"));
        }
        let data = self.data_mut();
        data.node = node;
        data.changed = true;
        Ok(())
    }

    /// Marks the current node as deleted. A deleted node's children aren't visited.
    pub fn delete_node(&mut self) -> Result<()> {
        if self.data().deleted {
            return Err(self.invariant("The node has already been deleted"));
        }
        if self.data().changed {
            return Err(self.invariant("A changed node can't be deleted"));
        }
        self.data_mut().deleted = true;
        Ok(())
    }

    #[inline]
    pub fn is_changed(&self) -> bool {
        self.data().changed
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.data().deleted
    }

    /// Returns the parent's context, which is the synthetic root context for traversal roots.
    #[inline]
    pub fn parent_context(&self) -> ContextRef<'_, N, A> {
        ContextRef {
            arena: &*self.arena,
            id: self.data().parent,
        }
    }

    /// Returns the parent node, or `None` for traversal roots.
    #[inline]
    pub fn parent_node(&self) -> Option<&N> {
        self.data().parent.map(|parent| self.arena.this_node(parent))
    }

    /// Returns all ancestors, nearest first.
    pub fn parent_nodes(&self) -> Vec<&N> {
        let mut nodes = Vec::new();
        let mut current = self.data().parent;
        while let Some(id) = current {
            nodes.push(self.arena.this_node(id));
            current = self.arena.data(id).parent;
        }
        nodes
    }

    /// Returns the path from this node to the root, nearest breadcrumb first.
    #[inline]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb<N>> {
        self.arena.breadcrumbs(self.id)
    }

    /// Returns this node's position in its parent, or `None` for traversal roots.
    #[inline]
    pub fn location(&self) -> Option<NodeLocation> {
        self.data().location
    }

    /// Reads a variable stored on this context.
    #[inline]
    pub fn var<T: Any>(&self) -> Option<&T> {
        self.data().vars.get::<T>()
    }

    /// Reads a variable from the nearest ancestor context that has one stored for `T`, ending
    /// with the root vars the traversal was started with.
    #[inline]
    pub fn var_from_parents<T: Any>(&self) -> Option<&T> {
        self.arena.var_from::<T>(self.data().parent)
    }

    /// Stores a variable on this context. Variables aren't inherited by children automatically
    /// but may be looked up using [`var_from_parents`](Self::var_from_parents).
    #[inline]
    pub fn set_var<T: Any>(&mut self, value: T) -> &mut Self {
        self.data_mut().vars.insert(value);
        self
    }

    /// Sets the accumulate that's passed on to the next node in traversal order.
    #[inline]
    pub fn set_accumulate(&mut self, value: A) {
        self.data_mut().new_accumulate = Some(value);
    }

    /// Returns the accumulate as it was when this context was reached.
    #[inline]
    pub fn current_accumulate(&self) -> &A {
        &self.data().current_accumulate
    }

    /// Returns the accumulate that's going to be passed on, which is the current one unless a new
    /// one has been set.
    #[inline]
    pub fn new_accumulate(&self) -> &A {
        let data = self.data();
        data.new_accumulate
            .as_ref()
            .unwrap_or(&data.current_accumulate)
    }

    #[inline]
    pub fn shared_context_data(&self) -> &S {
        self.shared
    }

    /// Checks whether this node has been visited before, which is the case during `back_ref` and
    /// `leave`.
    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited.contains(&self.data().original.node_id())
    }

    #[inline]
    pub fn visited_nodes(&self) -> &HashSet<NodeId> {
        self.visited
    }

    /// Returns the contexts of this node's children grouped by role. These are only available
    /// while leaving a node.
    pub fn children_contexts(&self) -> Option<NamedChildren<ContextRef<'_, N, A>>> {
        let data = self.data();
        if data.phase != Some(TraversalPhase::Leave) {
            return None;
        }
        let arena: &ContextArena<N, A> = &*self.arena;
        data.children.as_ref().map(|children| {
            children.clone().map(|id| ContextRef {
                arena,
                id: Some(id),
            })
        })
    }

    #[inline]
    pub fn phase(&self) -> TraversalPhase {
        self.data().phase.unwrap_or(TraversalPhase::Enter)
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        false
    }

    #[inline]
    pub fn is_root_context(&self) -> bool {
        false
    }

    /// Creates an invariant error that points at this context's node.
    #[inline]
    pub(crate) fn invariant(&self, message: &str) -> Error {
        self.arena.invariant(self.id, message)
    }

    pub(crate) fn ensure_recording_edits(&self) -> Result<()> {
        if self.arena.edits.is_some() {
            Ok(())
        } else {
            Err(self.invariant("Edits can only be recorded during a tree transformation"))
        }
    }

    pub(crate) fn record_edit(&mut self, zipper: NodeZipper<N>) -> Result<()> {
        self.ensure_recording_edits()?;
        if let Some(edits) = self.arena.edits.as_mut() {
            edits.push(zipper);
        }
        Ok(())
    }

    /// Swaps the node of the edit recorded for `current` instead of recording a second edit.
    pub(crate) fn replace_edit_for_node(&mut self, current: NodeId, node: N) -> Result<()> {
        let position = self.arena.edits.as_ref().and_then(|edits| {
            edits
                .iter()
                .position(|zipper| zipper.cur_node().node_id() == current)
        });
        if let (Some(position), Some(edits)) = (position, self.arena.edits.as_mut()) {
            let zipper = edits[position].with_new_node(node);
            edits[position] = zipper;
            return Ok(());
        }
        Err(self.invariant("No current zipper found for provided node"))
    }
}

/// A read-only view onto another context of the same traversal, e.g. a parent's or a child's.
///
/// The synthetic root context, which every traversal root is attached to, is represented as a
/// view without a node.
pub struct ContextRef<'c, N, A = ()> {
    arena: &'c ContextArena<N, A>,
    id: Option<ContextId>,
}

impl<'c, N, A> Clone for ContextRef<'c, N, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'c, N, A> Copy for ContextRef<'c, N, A> {}

impl<'c, N: TreeNode, A> ContextRef<'c, N, A> {
    #[inline]
    pub fn is_root_context(&self) -> bool {
        self.id.is_none()
    }

    #[inline]
    pub fn this_node(&self) -> Option<&'c N> {
        self.id.map(|id| self.arena.this_node(id))
    }

    #[inline]
    pub fn original_this_node(&self) -> Option<&'c N> {
        self.id.map(|id| self.arena.original_node(id))
    }

    #[inline]
    pub fn is_changed(&self) -> bool {
        self.id.map_or(false, |id| self.arena.data(id).changed)
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.id.map_or(false, |id| self.arena.is_deleted(id))
    }

    /// Returns the parent's context, or `None` when this is the root context.
    #[inline]
    pub fn parent_context(&self) -> Option<ContextRef<'c, N, A>> {
        self.id.map(|id| ContextRef {
            arena: self.arena,
            id: self.arena.data(id).parent,
        })
    }

    #[inline]
    pub fn location(&self) -> Option<NodeLocation> {
        self.id.and_then(|id| self.arena.data(id).location)
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb<N>> {
        self.id
            .map(|id| self.arena.breadcrumbs(id))
            .unwrap_or_default()
    }

    #[inline]
    pub fn var<T: Any>(&self) -> Option<&'c T> {
        match self.id {
            Some(id) => self.arena.data(id).vars.get::<T>(),
            None => self.arena.root_vars.get::<T>(),
        }
    }

    #[inline]
    pub fn var_from_parents<T: Any>(&self) -> Option<&'c T> {
        self.id
            .and_then(|id| self.arena.var_from::<T>(self.arena.data(id).parent))
    }

    /// Returns the accumulate as it was when the context was last reached.
    #[inline]
    pub fn current_accumulate(&self) -> Option<&'c A> {
        self.id.map(|id| &self.arena.data(id).current_accumulate)
    }

    /// Returns the accumulate the context last passed on.
    #[inline]
    pub fn new_accumulate(&self) -> Option<&'c A> {
        self.id.map(|id| {
            let data = self.arena.data(id);
            data.new_accumulate
                .as_ref()
                .unwrap_or(&data.current_accumulate)
        })
    }

    /// Returns the last phase the context was visited with, or `None` if it was never reached.
    #[inline]
    pub fn phase(&self) -> Option<TraversalPhase> {
        self.id.and_then(|id| self.arena.data(id).phase)
    }
}
