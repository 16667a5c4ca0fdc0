#[macro_use]
extern crate bencher;

use bencher::Bencher;
use graphql_traverse::analysis::{QueryComplexity, QueryDepth};
use graphql_traverse::ast::*;
use graphql_traverse::error::Result;
use graphql_traverse::transform::{delete_node, TreeTransformer};
use graphql_traverse::traverse::*;

/// Builds a query with `width` fields per level, nested `depth` levels deep.
fn wide_query<'a>(ctx: &'a ASTContext, width: usize, depth: usize) -> Document<'a> {
    fn level<'a>(ctx: &'a ASTContext, width: usize, depth: usize) -> Field<'a> {
        let name = ctx.alloc_string(format!("field{depth}"));
        let field = Field::new_leaf(name);
        if depth == 0 {
            return field;
        }
        let mut selections = vec![Selection::from(Field::new_leaf("__typename"))];
        selections.extend((0..width).map(|_| Selection::from(level(ctx, width, depth - 1))));
        field.with_selections(ctx, selections)
    }
    let root = level(ctx, width, depth);
    let operation = OperationDefinition::new(ctx, OperationKind::Query, None, [root.into()]);
    Document::new(ctx, [operation.into()])
}

struct CountNodes(usize);

impl<'a> TraverserVisitor<QueryNode<'a>> for CountNodes {
    fn enter(
        &mut self,
        _ctx: &mut TraverserContext<'_, QueryNode<'a>>,
    ) -> Result<TraversalControl> {
        self.0 += 1;
        Ok(TraversalControl::Continue)
    }
}

struct CountParallel;

impl<'a> ParallelVisitor<QueryNode<'a>, usize> for CountParallel {
    fn leave(
        &self,
        ctx: &mut ParallelContext<'_, QueryNode<'a>, usize>,
    ) -> Result<TraversalControl> {
        let children = ctx.children_accumulates().map_or(0, |children| {
            children.iter().flat_map(|(_, list)| list.iter()).sum()
        });
        ctx.set_accumulate(children + 1);
        Ok(TraversalControl::Continue)
    }
}

struct RemoveTypenames;

impl<'a> TraverserVisitor<QueryNode<'a>> for RemoveTypenames {
    fn enter(
        &mut self,
        ctx: &mut TraverserContext<'_, QueryNode<'a>>,
    ) -> Result<TraversalControl> {
        match ctx.this_node().field() {
            Some(field) if field.name == "__typename" => delete_node(ctx),
            _ => Ok(TraversalControl::Continue),
        }
    }
}

fn traverse_depth_first(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let document = wide_query(&ctx, 4, 5);
    bench.iter(|| {
        let mut visitor = CountNodes(0);
        Traverser::depth_first(QueryNode::children)
            .traverse(QueryNode::Document(&document), &mut visitor)
            .unwrap();
        visitor.0
    });
}

fn traverse_breadth_first(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let document = wide_query(&ctx, 4, 5);
    bench.iter(|| {
        let mut visitor = CountNodes(0);
        Traverser::breadth_first(QueryNode::children)
            .traverse(QueryNode::Document(&document), &mut visitor)
            .unwrap();
        visitor.0
    });
}

fn traverse_parallel(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let document = wide_query(&ctx, 4, 5);
    bench.iter(|| {
        ParallelTraverser::new(QueryNode::children)
            .with_initial_accumulate(0usize)
            .traverse(QueryNode::Document(&document), CountParallel)
            .unwrap()
            .into_accumulated_result()
    });
}

fn transform_delete_fields(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let document = wide_query(&ctx, 4, 4);
    bench.iter(|| {
        let output_ctx = ASTContext::new();
        TreeTransformer::new(QueryNodeAdapter::new(&output_ctx))
            .transform(QueryNode::Document(&document), RemoveTypenames)
            .unwrap()
            .is_some()
    });
}

fn analysis_query_depth(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let document = wide_query(&ctx, 4, 5);
    bench.iter(|| QueryDepth::new().calculate(&document, None).unwrap());
}

fn analysis_query_complexity(bench: &mut Bencher) {
    let ctx = ASTContext::new();
    let document = wide_query(&ctx, 4, 5);
    bench.iter(|| QueryComplexity::new().calculate(&document, None).unwrap());
}

benchmark_group!(
    traverse,
    traverse_depth_first,
    traverse_breadth_first,
    traverse_parallel,
    transform_delete_fields,
    analysis_query_depth,
    analysis_query_complexity
);

benchmark_main!(traverse);
