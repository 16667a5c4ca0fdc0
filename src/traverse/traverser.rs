use super::context::{ContextArena, ContextId, TraverserContext};
use super::node::{NamedChildren, NodeLocation, TreeNode};
use super::state::{Entry, TraversalMode, TraverserState};
use super::vars::VarMap;
use super::visitor::{TraversalControl, TraversalPhase, TraverserVisitor};
use crate::error::Result;
use crate::zipper::NodeZipper;
use hashbrown::HashSet;
use std::any::Any;
use std::marker::PhantomData;

/// The outcome of a traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct TraverserResult<A> {
    accumulated_result: A,
}

impl<A> TraverserResult<A> {
    #[inline]
    pub(crate) fn new(accumulated_result: A) -> Self {
        TraverserResult { accumulated_result }
    }

    /// Returns the accumulate as it was after the last callback.
    #[inline]
    pub fn accumulated_result(&self) -> &A {
        &self.accumulated_result
    }

    #[inline]
    pub fn into_accumulated_result(self) -> A {
        self.accumulated_result
    }
}

const ABORT_OUTSIDE_ENTER: &str = "Abort can only be returned when entering a node";

/// A sequential traverser over any tree whose children can be listed by a function.
///
/// The traverser is configured with a function that returns a node's [`NamedChildren`], a
/// [`TraversalMode`], and optionally shared data, an initial accumulate and root variables. It's
/// then run once per call to [`traverse`](Self::traverse), which consumes it.
///
/// ```
/// use graphql_traverse::error::Result;
/// use graphql_traverse::traverse::*;
/// use std::sync::Arc;
///
/// struct Node(&'static str, Vec<Arc<Node>>);
///
/// struct Names(Vec<&'static str>);
///
/// impl TraverserVisitor<Arc<Node>> for Names {
///     fn enter(&mut self, ctx: &mut TraverserContext<'_, Arc<Node>>) -> Result<TraversalControl> {
///         self.0.push(ctx.this_node().0);
///         Ok(TraversalControl::Continue)
///     }
/// }
///
/// let leaf = |name| Arc::new(Node(name, vec![]));
/// let tree = Arc::new(Node("a", vec![leaf("b"), leaf("c")]));
/// let mut names = Names(vec![]);
/// let children = |node: &Arc<Node>| NamedChildren::new().with(Role::Unnamed, node.1.clone());
/// Traverser::depth_first(children).traverse(tree, &mut names).unwrap();
/// assert_eq!(names.0, ["a", "b", "c"]);
/// ```
pub struct Traverser<N, F, A = (), S = ()> {
    mode: TraversalMode,
    children: F,
    shared: S,
    initial_accumulate: A,
    root_vars: VarMap,
    _node: PhantomData<fn(&N)>,
}

impl<N, F> Traverser<N, F>
where
    N: TreeNode,
    F: Fn(&N) -> NamedChildren<N>,
{
    /// Creates a traverser that visits nodes depth-first, with every node being left once its
    /// whole subtree has been visited.
    pub fn depth_first(children: F) -> Self {
        Self::new(TraversalMode::DepthFirst, children)
    }

    /// Creates a traverser that visits nodes level by level.
    ///
    /// A node is left once all of its children have been entered, which happens before any of
    /// its grandchildren are entered.
    pub fn breadth_first(children: F) -> Self {
        Self::new(TraversalMode::BreadthFirst, children)
    }

    pub fn new(mode: TraversalMode, children: F) -> Self {
        Traverser {
            mode,
            children,
            shared: (),
            initial_accumulate: (),
            root_vars: VarMap::new(),
            _node: PhantomData,
        }
    }
}

impl<N, F, A, S> Traverser<N, F, A, S>
where
    N: TreeNode,
    F: Fn(&N) -> NamedChildren<N>,
    A: Clone,
{
    /// Sets read-only data that every context exposes via
    /// [`shared_context_data`](TraverserContext::shared_context_data).
    pub fn with_shared_data<S2>(self, shared: S2) -> Traverser<N, F, A, S2> {
        Traverser {
            mode: self.mode,
            children: self.children,
            shared,
            initial_accumulate: self.initial_accumulate,
            root_vars: self.root_vars,
            _node: PhantomData,
        }
    }

    /// Sets the accumulate that the first node is reached with.
    pub fn with_initial_accumulate<A2: Clone>(self, accumulate: A2) -> Traverser<N, F, A2, S> {
        Traverser {
            mode: self.mode,
            children: self.children,
            shared: self.shared,
            initial_accumulate: accumulate,
            root_vars: self.root_vars,
            _node: PhantomData,
        }
    }

    /// Stores a variable on the root context, where every node can find it using
    /// [`var_from_parents`](TraverserContext::var_from_parents).
    pub fn root_var<T: Any>(mut self, value: T) -> Self {
        self.root_vars.insert(value);
        self
    }

    pub fn with_root_vars(mut self, root_vars: VarMap) -> Self {
        self.root_vars = root_vars;
        self
    }

    #[inline]
    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// Traverses the tree below `root`, calling back into the `visitor` for every node.
    pub fn traverse<V>(self, root: N, visitor: V) -> Result<TraverserResult<A>>
    where
        V: TraverserVisitor<N, A, S>,
    {
        self.traverse_all(std::iter::once(root), visitor)
    }

    /// Traverses several trees one after the other, which all share the same root context.
    pub fn traverse_all<V, I>(self, roots: I, visitor: V) -> Result<TraverserResult<A>>
    where
        V: TraverserVisitor<N, A, S>,
        I: IntoIterator<Item = N>,
    {
        let (accumulate, _) = self.run(roots, visitor, false)?;
        Ok(TraverserResult::new(accumulate))
    }

    /// Traverses the tree below `root` while recording the edits made by the transform helpers.
    pub(crate) fn traverse_recording<V>(
        self,
        root: N,
        visitor: V,
    ) -> Result<(TraverserResult<A>, Vec<NodeZipper<N>>)>
    where
        V: TraverserVisitor<N, A, S>,
    {
        let (accumulate, arena) = self.run(std::iter::once(root), visitor, true)?;
        Ok((TraverserResult::new(accumulate), arena.into_edits()))
    }

    fn run<V, I>(
        self,
        roots: I,
        mut visitor: V,
        record_edits: bool,
    ) -> Result<(A, ContextArena<N, A>)>
    where
        V: TraverserVisitor<N, A, S>,
        I: IntoIterator<Item = N>,
    {
        let Traverser {
            mode,
            children,
            shared,
            initial_accumulate,
            root_vars,
            ..
        } = self;

        let mut arena = ContextArena::new(root_vars, record_edits);
        let mut visited = HashSet::new();
        let mut state = TraverserState::new(mode);

        let root_ids = roots
            .into_iter()
            .map(|root| arena.push(root, None, None, initial_accumulate.clone()))
            .collect::<Vec<_>>();
        state.push_roots(&root_ids);
        tracing::debug!(?mode, roots = root_ids.len(), "starting traversal");

        let mut accumulate = initial_accumulate;
        while let Some(entry) = state.pop() {
            match entry {
                Entry::Leave(id) => {
                    arena.reach(id, accumulate, TraversalPhase::Leave);
                    let control = visitor.leave(&mut TraverserContext {
                        arena: &mut arena,
                        id,
                        shared: &shared,
                        visited: &visited,
                    })?;
                    accumulate = arena.take_new_accumulate(id);
                    match control {
                        TraversalControl::Continue => {}
                        TraversalControl::Quit => {
                            tracing::trace!("traversal quit while leaving a node");
                            break;
                        }
                        TraversalControl::Abort => {
                            return Err(arena.invariant(id, ABORT_OUTSIDE_ENTER));
                        }
                    }
                }

                Entry::Visit(id) => {
                    let node_id = arena.original_node(id).node_id();
                    if visited.contains(&node_id) {
                        arena.reach(id, accumulate, TraversalPhase::BackRef);
                        let control = visitor.back_ref(&mut TraverserContext {
                            arena: &mut arena,
                            id,
                            shared: &shared,
                            visited: &visited,
                        })?;
                        accumulate = arena.take_new_accumulate(id);
                        match control {
                            TraversalControl::Continue => continue,
                            TraversalControl::Quit => {
                                tracing::trace!("traversal quit on a back reference");
                                break;
                            }
                            TraversalControl::Abort => {
                                return Err(arena.invariant(id, ABORT_OUTSIDE_ENTER));
                            }
                        }
                    }

                    arena.reach(id, accumulate, TraversalPhase::Enter);
                    let control = visitor.enter(&mut TraverserContext {
                        arena: &mut arena,
                        id,
                        shared: &shared,
                        visited: &visited,
                    })?;
                    accumulate = arena.take_new_accumulate(id);
                    visited.insert(node_id);

                    match control {
                        TraversalControl::Continue => {
                            let child_ids = if arena.is_deleted(id) {
                                NamedChildren::new()
                            } else {
                                let node_children = children(arena.this_node(id));
                                push_children(&mut arena, id, node_children, &accumulate)
                            };
                            let order = child_ids
                                .iter()
                                .flat_map(|(_, ids)| ids.iter().copied())
                                .collect::<Vec<_>>();
                            arena.set_children(id, child_ids);
                            state.push_children(id, &order);
                        }
                        TraversalControl::Abort => {}
                        TraversalControl::Quit => {
                            tracing::trace!("traversal quit while entering a node");
                            break;
                        }
                    }
                }
            }
        }

        tracing::debug!(contexts = arena.len(), "finished traversal");
        Ok((accumulate, arena))
    }
}

fn push_children<N: TreeNode, A: Clone>(
    arena: &mut ContextArena<N, A>,
    parent: ContextId,
    children: NamedChildren<N>,
    accumulate: &A,
) -> NamedChildren<ContextId> {
    let mut ids = NamedChildren::new();
    for (role, list) in children {
        let mut role_ids = Vec::with_capacity(list.len());
        for (index, child) in list.into_iter().enumerate() {
            let location = NodeLocation::new(role, index);
            role_ids.push(arena.push(child, Some(parent), Some(location), accumulate.clone()));
        }
        ids.insert(role, role_ids);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::test_tree::*;
    use crate::traverse::Role;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl TraverserVisitor<Tree> for Recorder {
        fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
            self.events.push(format!("enter {}", ctx.this_node().name));
            Ok(TraversalControl::Continue)
        }

        fn leave(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
            self.events.push(format!("leave {}", ctx.this_node().name));
            Ok(TraversalControl::Continue)
        }

        fn back_ref(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
            self.events.push(format!("backref {}", ctx.this_node().name));
            Ok(TraversalControl::Continue)
        }
    }

    fn sample() -> Tree {
        node("A", vec![node("B", vec![leaf("D"), leaf("E")]), leaf("C")])
    }

    #[test]
    fn depth_first_order() {
        let mut recorder = Recorder::default();
        Traverser::depth_first(children_of)
            .traverse(sample(), &mut recorder)
            .unwrap();
        assert_eq!(
            recorder.events,
            [
                "enter A", "enter B", "enter D", "leave D", "enter E", "leave E", "leave B",
                "enter C", "leave C", "leave A"
            ]
        );
    }

    #[test]
    fn breadth_first_order() {
        let mut recorder = Recorder::default();
        Traverser::breadth_first(children_of)
            .traverse(sample(), &mut recorder)
            .unwrap();
        assert_eq!(
            recorder.events,
            [
                "enter A", "enter B", "enter C", "leave A", "enter D", "enter E", "leave B",
                "leave C", "leave D", "leave E"
            ]
        );
    }

    #[test]
    fn quit_stops_immediately() {
        struct QuitAt(&'static str, Vec<&'static str>);
        impl TraverserVisitor<Tree> for QuitAt {
            fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                self.1.push(ctx.this_node().name);
                if ctx.this_node().name == self.0 {
                    Ok(TraversalControl::Quit)
                } else {
                    Ok(TraversalControl::Continue)
                }
            }

            fn leave(&mut self, _ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                self.1.push("leave");
                Ok(TraversalControl::Continue)
            }
        }

        let mut visitor = QuitAt("B", vec![]);
        Traverser::depth_first(children_of)
            .traverse(sample(), &mut visitor)
            .unwrap();
        assert_eq!(visitor.1, ["A", "B"]);
    }

    #[test]
    fn abort_skips_children_and_leave() {
        struct AbortAt(&'static str, Vec<String>);
        impl TraverserVisitor<Tree> for AbortAt {
            fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                self.1.push(format!("enter {}", ctx.this_node().name));
                if ctx.this_node().name == self.0 {
                    Ok(TraversalControl::Abort)
                } else {
                    Ok(TraversalControl::Continue)
                }
            }

            fn leave(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                self.1.push(format!("leave {}", ctx.this_node().name));
                Ok(TraversalControl::Continue)
            }
        }

        let mut visitor = AbortAt("B", vec![]);
        Traverser::depth_first(children_of)
            .traverse(sample(), &mut visitor)
            .unwrap();
        assert_eq!(visitor.1, ["enter A", "enter B", "enter C", "leave C", "leave A"]);
    }

    #[test]
    fn abort_from_leave_is_an_invariant_violation() {
        struct AbortOnLeave;
        impl TraverserVisitor<Tree> for AbortOnLeave {
            fn leave(&mut self, _ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                Ok(TraversalControl::Abort)
            }
        }

        let error = Traverser::depth_first(children_of)
            .traverse(sample(), AbortOnLeave)
            .unwrap_err();
        assert_eq!(error.error_type(), ErrorType::Invariant);
        assert_eq!(error.context(), Some("at [0].[0]"));
    }

    #[test]
    fn accumulates_across_nodes() {
        struct Count;
        impl TraverserVisitor<Tree, usize> for Count {
            fn enter(
                &mut self,
                ctx: &mut TraverserContext<'_, Tree, usize>,
            ) -> Result<TraversalControl> {
                let count = *ctx.current_accumulate() + 1;
                ctx.set_accumulate(count);
                Ok(TraversalControl::Continue)
            }
        }

        let tree = node("A", vec![leaf("B"), leaf("C")]);
        let result = Traverser::depth_first(children_of)
            .with_initial_accumulate(0usize)
            .traverse(tree, Count)
            .unwrap();
        assert_eq!(*result.accumulated_result(), 3);
    }

    #[test]
    fn sums_child_accumulates_on_leave() {
        struct Size;
        impl TraverserVisitor<Tree, usize> for Size {
            fn leave(
                &mut self,
                ctx: &mut TraverserContext<'_, Tree, usize>,
            ) -> Result<TraversalControl> {
                let children = ctx.children_contexts().map_or(0, |children| {
                    children
                        .iter()
                        .flat_map(|(_, list)| list.iter())
                        .filter_map(|child| child.new_accumulate().copied())
                        .sum::<usize>()
                });
                ctx.set_accumulate(children + 1);
                Ok(TraversalControl::Continue)
            }
        }

        let tree = node("A", vec![leaf("B"), leaf("C")]);
        let result = Traverser::depth_first(children_of)
            .with_initial_accumulate(0usize)
            .traverse(tree, Size)
            .unwrap();
        assert_eq!(*result.accumulated_result(), 3);
    }

    #[test]
    fn shared_subtrees_are_back_references() {
        let shared = leaf("S");
        let tree = node(
            "A",
            vec![node("B", vec![shared.clone()]), node("C", vec![shared])],
        );
        let mut recorder = Recorder::default();
        Traverser::depth_first(children_of)
            .traverse(tree, &mut recorder)
            .unwrap();
        assert_eq!(
            recorder.events,
            [
                "enter A", "enter B", "enter S", "leave S", "leave B", "enter C", "backref S",
                "leave C", "leave A"
            ]
        );
    }

    #[test]
    fn variables_are_found_on_ancestors() {
        struct Depth(usize);
        struct Prefix(&'static str);

        #[derive(Default)]
        struct Paths(Vec<String>);

        impl TraverserVisitor<Tree> for Paths {
            fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                let depth = ctx.var_from_parents::<Depth>().map_or(0, |depth| depth.0 + 1);
                let prefix = ctx.var_from_parents::<Prefix>().map_or("", |prefix| prefix.0);
                self.0.push(format!("{}{}:{}", prefix, ctx.this_node().name, depth));
                ctx.set_var(Depth(depth));
                assert!(ctx.var::<Depth>().is_some());
                assert!(ctx.var::<Prefix>().is_none());
                Ok(TraversalControl::Continue)
            }
        }

        let mut paths = Paths::default();
        Traverser::depth_first(children_of)
            .root_var(Prefix("/"))
            .traverse(sample(), &mut paths)
            .unwrap();
        assert_eq!(paths.0, ["/A:0", "/B:1", "/D:2", "/E:2", "/C:1"]);
    }

    #[test]
    fn contexts_expose_parents_and_locations() {
        struct Check(Vec<String>);
        impl TraverserVisitor<Tree, (), &'static str> for Check {
            fn enter(
                &mut self,
                ctx: &mut TraverserContext<'_, Tree, (), &'static str>,
            ) -> Result<TraversalControl> {
                let parents = ctx
                    .parent_nodes()
                    .iter()
                    .map(|parent| parent.name)
                    .collect::<Vec<_>>()
                    .join(">");
                let location = ctx
                    .location()
                    .map(|location| location.to_string())
                    .unwrap_or_default();
                self.0.push(format!(
                    "{}{} {} {}",
                    ctx.shared_context_data(),
                    ctx.this_node().name,
                    parents,
                    location
                ));
                assert_eq!(ctx.breadcrumbs().len(), ctx.parent_nodes().len());
                assert_eq!(ctx.parent_context().is_root_context(), ctx.parent_node().is_none());
                Ok(TraversalControl::Continue)
            }
        }

        let tree = node_with(
            "Q",
            vec![("arguments", vec![leaf("x")]), ("selections", vec![leaf("a"), leaf("b")])],
        );
        let mut check = Check(vec![]);
        Traverser::depth_first(children_of)
            .with_shared_data("#")
            .traverse(tree, &mut check)
            .unwrap();
        assert_eq!(
            check.0,
            ["#Q  ", "#x Q arguments[0]", "#a Q selections[0]", "#b Q selections[1]"]
        );
    }

    #[test]
    fn leave_sees_children_contexts() {
        struct Sum;
        impl TraverserVisitor<Tree, usize> for Sum {
            fn enter(
                &mut self,
                ctx: &mut TraverserContext<'_, Tree, usize>,
            ) -> Result<TraversalControl> {
                assert!(ctx.children_contexts().is_none());
                Ok(TraversalControl::Continue)
            }

            fn leave(
                &mut self,
                ctx: &mut TraverserContext<'_, Tree, usize>,
            ) -> Result<TraversalControl> {
                let children = ctx.children_contexts().unwrap_or_default();
                let leaves = children
                    .iter()
                    .flat_map(|(_, contexts)| contexts.iter())
                    .filter(|child| child.phase() == Some(TraversalPhase::Leave))
                    .count();
                let roles = children.roles().collect::<Vec<_>>();
                if !children.is_empty() {
                    assert_eq!(roles, [Role::Unnamed]);
                }
                let total = *ctx.current_accumulate() + leaves;
                ctx.set_accumulate(total);
                Ok(TraversalControl::Continue)
            }
        }

        let result = Traverser::depth_first(children_of)
            .with_initial_accumulate(0usize)
            .traverse(sample(), Sum)
            .unwrap();
        assert_eq!(result.into_accumulated_result(), 4);
    }

    #[test]
    fn changed_nodes_are_descended_instead() {
        struct Swap(Vec<&'static str>);
        impl TraverserVisitor<Tree> for Swap {
            fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                self.0.push(ctx.this_node().name);
                if ctx.this_node().name == "B" {
                    ctx.change_node(node("X", vec![leaf("Y")]))?;
                    assert!(ctx.is_changed());
                    assert_eq!(ctx.original_this_node().name, "B");
                }
                Ok(TraversalControl::Continue)
            }
        }

        let mut swap = Swap(vec![]);
        Traverser::depth_first(children_of)
            .traverse(sample(), &mut swap)
            .unwrap();
        assert_eq!(swap.0, ["A", "B", "Y", "C"]);
    }

    #[test]
    fn deleted_nodes_are_left_without_descending() {
        struct Delete(Vec<String>);
        impl TraverserVisitor<Tree> for Delete {
            fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                self.0.push(format!("enter {}", ctx.this_node().name));
                if ctx.this_node().name == "B" {
                    ctx.delete_node()?;
                    assert!(ctx.delete_node().is_err());
                    assert!(ctx.change_node(leaf("Z")).is_err());
                }
                Ok(TraversalControl::Continue)
            }

            fn leave(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                self.0.push(format!("leave {} {}", ctx.this_node().name, ctx.is_deleted()));
                Ok(TraversalControl::Continue)
            }
        }

        let mut delete = Delete(vec![]);
        Traverser::depth_first(children_of)
            .traverse(sample(), &mut delete)
            .unwrap();
        assert_eq!(
            delete.0,
            [
                "enter A",
                "enter B",
                "leave B true",
                "enter C",
                "leave C false",
                "leave A false"
            ]
        );
    }

    #[test]
    fn multiple_roots_share_the_root_context() {
        let mut recorder = Recorder::default();
        Traverser::depth_first(children_of)
            .traverse_all(vec![leaf("A"), leaf("B")], &mut recorder)
            .unwrap();
        assert_eq!(recorder.events, ["enter A", "leave A", "enter B", "leave B"]);
    }

    #[test]
    fn visitor_errors_are_passed_on() {
        struct Fail;
        impl TraverserVisitor<Tree> for Fail {
            fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                if ctx.this_node().name == "D" {
                    Err(crate::error::Error::new("no D allowed", None))
                } else {
                    Ok(TraversalControl::Continue)
                }
            }
        }

        let error = Traverser::depth_first(children_of)
            .traverse(sample(), Fail)
            .unwrap_err();
        assert_eq!(error.message(), "no D allowed");
    }
}
