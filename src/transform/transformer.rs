use crate::error::Result;
use crate::traverse::{NodeAdapter, Traverser, TraverserVisitor, TreeNode, VarMap};
use crate::zipper::NodeMultiZipper;
use std::marker::PhantomData;

/// Rebuilds a tree from the edits a visitor makes while traversing it.
///
/// The tree is traversed depth-first. Visitors edit it using [`change_node`](super::change_node),
/// [`delete_node`](super::delete_node), [`insert_before`](super::insert_before) and
/// [`insert_after`](super::insert_after), and once the traversal has completed all edits are
/// applied together to produce a new root. The original tree is never modified and every subtree
/// that wasn't edited is shared between the original and the new tree.
pub struct TreeTransformer<N, A> {
    adapter: A,
    _node: PhantomData<fn(&N)>,
}

impl<N: TreeNode, A: NodeAdapter<N>> TreeTransformer<N, A> {
    pub fn new(adapter: A) -> Self {
        TreeTransformer {
            adapter,
            _node: PhantomData,
        }
    }

    #[inline]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Transforms the tree below `root`, returning `None` if the root itself was deleted.
    ///
    /// An error returned by the visitor stops the traversal and no tree is built.
    pub fn transform<V>(&self, root: N, visitor: V) -> Result<Option<N>>
    where
        V: TraverserVisitor<N>,
    {
        self.transform_with_root_vars(root, visitor, VarMap::new())
    }

    /// Transforms the tree below `root` with variables that every context can look up.
    pub fn transform_with_root_vars<V>(
        &self,
        root: N,
        visitor: V,
        root_vars: VarMap,
    ) -> Result<Option<N>>
    where
        V: TraverserVisitor<N>,
    {
        let adapter = &self.adapter;
        let (_, edits) = Traverser::depth_first(|node: &N| adapter.named_children(node))
            .with_root_vars(root_vars)
            .traverse_recording(root.clone(), visitor)?;
        tracing::debug!(edits = edits.len(), "collected edits");
        NodeMultiZipper::new(root, edits).to_root_node(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::test_tree::*;
    use crate::transform::{change_node, delete_node, insert_after, insert_before};
    use crate::traverse::{TraversalControl, TraverserContext};
    use std::sync::Arc;

    type Edit = fn(&mut TraverserContext<'_, Tree>) -> Result<TraversalControl>;

    /// Applies edits to every node with a given name.
    struct EditNamed(Vec<(&'static str, Edit)>);

    impl TraverserVisitor<Tree> for EditNamed {
        fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
            let name = ctx.this_node().name;
            for (target, edit) in &self.0 {
                if *target == name {
                    edit(ctx)?;
                }
            }
            Ok(TraversalControl::Continue)
        }
    }

    fn on(name: &'static str, edit: Edit) -> (&'static str, Edit) {
        (name, edit)
    }

    fn sample() -> Tree {
        node_with(
            "A",
            vec![
                ("x", vec![node_with("B", vec![("x", vec![leaf("D"), leaf("E")])]), leaf("C")]),
            ],
        )
    }

    #[test]
    fn untouched_trees_are_returned_as_is() {
        let root = sample();
        let visitor = EditNamed(vec![]);
        let result = TreeTransformer::new(TestAdapter)
            .transform(root.clone(), visitor)
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&result, &root));
    }

    #[test]
    fn replaces_a_single_node() {
        let root = sample();
        let visitor = EditNamed(vec![on("E", |ctx| change_node(ctx, leaf("F")))]);
        let result = TreeTransformer::new(TestAdapter)
            .transform(root.clone(), visitor)
            .unwrap()
            .unwrap();
        assert_eq!(render(&result), "A(B(D,F),C)");
        assert_eq!(render(&root), "A(B(D,E),C)");
        let old_c = find(&root, "C").unwrap();
        let new_c = find(&result, "C").unwrap();
        assert!(Arc::ptr_eq(&old_c, &new_c));
    }

    #[test]
    fn changing_a_node_twice_keeps_the_last_change() {
        let visitor = EditNamed(vec![
            on("D", |ctx| change_node(ctx, leaf("X"))),
            on("D", |ctx| change_node(ctx, leaf("Y"))),
        ]);
        let result = TreeTransformer::new(TestAdapter)
            .transform(sample(), visitor)
            .unwrap()
            .unwrap();
        assert_eq!(render(&result), "A(B(Y,E),C)");
    }

    #[test]
    fn combines_edits_of_the_same_parent() {
        let root = node_with(
            "P",
            vec![("x", vec![leaf("a"), leaf("b"), leaf("c"), leaf("d")])],
        );
        let visitor = EditNamed(vec![
            on("b", |ctx| delete_node(ctx)),
            on("c", |ctx| change_node(ctx, leaf("c'"))),
            on("a", |ctx| insert_after(ctx, leaf("z"))),
            on("d", |ctx| insert_before(ctx, leaf("y"))),
        ]);
        let result = TreeTransformer::new(TestAdapter)
            .transform(root, visitor)
            .unwrap()
            .unwrap();
        assert_eq!(render(&result), "P(a,z,c',y,d)");
    }

    #[test]
    fn edits_below_a_changed_parent() {
        let visitor = EditNamed(vec![
            on("B", |ctx| {
                let children = children_of(ctx.this_node()).with("x", vec![leaf("G"), leaf("H")]);
                let changed = TestAdapter.with_new_children(ctx.this_node(), children)?;
                change_node(ctx, changed)
            }),
            on("H", |ctx| delete_node(ctx)),
        ]);
        let result = TreeTransformer::new(TestAdapter)
            .transform(sample(), visitor)
            .unwrap()
            .unwrap();
        assert_eq!(render(&result), "A(B(G),C)");
    }

    /// Applies one set of edits when entering nodes and another when leaving them.
    struct EditOnLeave {
        enter: Vec<(&'static str, Edit)>,
        leave: Vec<(&'static str, Edit)>,
    }

    impl TraverserVisitor<Tree> for EditOnLeave {
        fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
            EditNamed(self.enter.clone()).enter(ctx)
        }

        fn leave(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
            EditNamed(self.leave.clone()).enter(ctx)
        }
    }

    #[test]
    fn changes_on_leave_replace_edited_children() {
        let visitor = EditOnLeave {
            enter: vec![on("D", |ctx| delete_node(ctx))],
            leave: vec![on("B", |ctx| change_node(ctx, leaf("Z")))],
        };
        let result = TreeTransformer::new(TestAdapter)
            .transform(sample(), visitor)
            .unwrap()
            .unwrap();
        assert_eq!(render(&result), "A(Z,C)");

        let visitor = EditOnLeave {
            enter: vec![
                on("B", |ctx| {
                    let children = children_of(ctx.this_node());
                    let copy = TestAdapter.with_new_children(ctx.this_node(), children)?;
                    change_node(ctx, copy)
                }),
                on("D", |ctx| delete_node(ctx)),
            ],
            leave: vec![on("B", |ctx| change_node(ctx, leaf("Z")))],
        };
        let result = TreeTransformer::new(TestAdapter)
            .transform(sample(), visitor)
            .unwrap()
            .unwrap();
        assert_eq!(render(&result), "A(Z,C)");
    }

    #[test]
    fn deleting_the_root() {
        let visitor = EditNamed(vec![on("A", |ctx| delete_node(ctx))]);
        let result = TreeTransformer::new(TestAdapter)
            .transform(sample(), visitor)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn root_vars_are_visible() {
        struct Replacement(&'static str);

        struct ReplaceLeaves;
        impl TraverserVisitor<Tree> for ReplaceLeaves {
            fn enter(&mut self, ctx: &mut TraverserContext<'_, Tree>) -> Result<TraversalControl> {
                if ctx.this_node().children.is_empty() {
                    let name = ctx.var_from_parents::<Replacement>().map_or("?", |r| r.0);
                    return change_node(ctx, leaf(name));
                }
                Ok(TraversalControl::Continue)
            }
        }

        let mut root_vars = VarMap::new();
        root_vars.insert(Replacement("L"));
        let result = TreeTransformer::new(TestAdapter)
            .transform_with_root_vars(sample(), ReplaceLeaves, root_vars)
            .unwrap()
            .unwrap();
        assert_eq!(render(&result), "A(B(L,L),L)");
    }

    #[test]
    fn helpers_require_a_transformation() {
        let visitor = EditNamed(vec![on("B", |ctx| delete_node(ctx))]);
        let error = Traverser::depth_first(children_of)
            .traverse(sample(), visitor)
            .unwrap_err();
        assert_eq!(error.error_type(), ErrorType::Invariant);

        let visitor = EditNamed(vec![on("A", |ctx| insert_before(ctx, leaf("Z")))]);
        let error = TreeTransformer::new(TestAdapter)
            .transform(sample(), visitor)
            .unwrap_err();
        assert_eq!(error.context(), Some("at root"));
    }

    #[test]
    fn visitor_errors_leave_no_result() {
        let visitor = EditNamed(vec![
            on("B", |ctx| delete_node(ctx)),
            on("C", |_| Err(crate::error::Error::new("rejected", None))),
        ]);
        let error = TreeTransformer::new(TestAdapter)
            .transform(sample(), visitor)
            .unwrap_err();
        assert_eq!(error.message(), "rejected");
    }
}
