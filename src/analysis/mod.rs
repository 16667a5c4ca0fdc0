//! # Query analyses
//!
//! Reductions over GraphQL operations that are built on top of the [traversal
//! engines](crate::traverse):
//!
//! - [`QueryDepth`] computes the longest path of nested fields on a sequential traversal
//! - [`QueryComplexity`] sums up per-field scores on a [parallel
//!   traversal](crate::traverse::ParallelTraverser)
//!
//! Both follow fragment spreads into their definitions and reject fragments that spread
//! themselves.

mod complexity;
mod depth;

pub use complexity::{
    DefaultFieldComplexity, FieldComplexityCalculator, FieldComplexityEnvironment,
    QueryComplexity,
};
pub use depth::QueryDepth;

use crate::ast::{FragmentDefinition, QueryNode, SELECTIONS};
use crate::error::{Error, ErrorType, Result};
use crate::traverse::{
    NamedChildren, TraversalControl, Traverser, TraverserContext, TraverserVisitor,
};
use hashbrown::HashMap;

pub(crate) type Fragments<'a> = HashMap<&'a str, &'a FragmentDefinition<'a>>;

/// Returns only the selections of a node, skipping over arguments and directives.
pub(crate) fn selection_children<'a>(node: &QueryNode<'a>) -> NamedChildren<QueryNode<'a>> {
    let selections = match *node {
        QueryNode::Operation(operation) => operation.selection_set.selections,
        QueryNode::Fragment(fragment) => fragment.selection_set.selections,
        QueryNode::Field(field) => field.selection_set.selections,
        QueryNode::InlineFragment(fragment) => fragment.selection_set.selections,
        _ => &[],
    };
    NamedChildren::new().with(SELECTIONS, selections.iter().map(QueryNode::from).collect())
}

pub(crate) fn unknown_fragment(name: &str) -> Error {
    Error::new(
        format!("Fragment {name} does not exist"),
        Some(ErrorType::GraphQL),
    )
}

pub(crate) fn fragment_cycle(name: &str) -> Error {
    Error::new_with_context(
        String::from("Cannot spread fragments within themselves"),
        format!("in fragment {name}"),
        Some(ErrorType::GraphQL),
    )
}

struct SpreadNames<'a>(Vec<&'a str>);

impl<'a> TraverserVisitor<QueryNode<'a>> for SpreadNames<'a> {
    fn enter(&mut self, ctx: &mut TraverserContext<'_, QueryNode<'a>>) -> Result<TraversalControl> {
        if let Some(spread) = ctx.this_node().fragment_spread() {
            self.0.push(spread.name.name);
        }
        Ok(TraversalControl::Continue)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Open,
    Done,
}

/// Orders fragment definitions so that every fragment comes after all fragments it spreads.
///
/// Spreads of fragments that don't exist are skipped here and reported when they're scored.
pub(crate) fn fragments_in_dependency_order<'a>(
    fragments: &Fragments<'a>,
) -> Result<Vec<&'a FragmentDefinition<'a>>> {
    fn visit<'a>(
        fragment: &'a FragmentDefinition<'a>,
        fragments: &Fragments<'a>,
        marks: &mut HashMap<&'a str, Mark>,
        order: &mut Vec<&'a FragmentDefinition<'a>>,
    ) -> Result<()> {
        let name = fragment.name.name;
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Open) => return Err(fragment_cycle(name)),
            None => {}
        }
        marks.insert(name, Mark::Open);
        let mut spreads = SpreadNames(Vec::new());
        Traverser::depth_first(selection_children)
            .traverse(QueryNode::Fragment(fragment), &mut spreads)?;
        for spread in spreads.0 {
            if let Some(dependency) = fragments.get(spread).copied() {
                visit(dependency, fragments, marks, order)?;
            }
        }
        marks.insert(name, Mark::Done);
        order.push(fragment);
        Ok(())
    }

    let mut names = fragments.keys().copied().collect::<Vec<_>>();
    names.sort_unstable();
    let mut marks = HashMap::new();
    let mut order = Vec::with_capacity(fragments.len());
    for name in names {
        visit(fragments[name], fragments, &mut marks, &mut order)?;
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    #[test]
    fn orders_fragments_by_dependencies() {
        let ctx = ASTContext::new();
        let document = Document::new(
            &ctx,
            [
                FragmentDefinition::new(&ctx, "A", "T", [FragmentSpread::new("B").into()]).into(),
                FragmentDefinition::new(&ctx, "B", "T", [FragmentSpread::new("C").into()]).into(),
                FragmentDefinition::new(&ctx, "C", "T", [Field::new_leaf("c").into()]).into(),
            ],
        );
        let order = fragments_in_dependency_order(&document.fragments()).unwrap();
        let names = order.iter().map(|fragment| fragment.name.name).collect::<Vec<_>>();
        assert_eq!(names, ["C", "B", "A"]);
    }

    #[test]
    fn rejects_cycles() {
        let ctx = ASTContext::new();
        let inline = InlineFragment::new(&ctx, None, [FragmentSpread::new("A").into()]);
        let document = Document::new(
            &ctx,
            [
                FragmentDefinition::new(&ctx, "A", "T", [FragmentSpread::new("B").into()]).into(),
                FragmentDefinition::new(&ctx, "B", "T", [inline.into()]).into(),
            ],
        );
        let error = fragments_in_dependency_order(&document.fragments()).unwrap_err();
        assert_eq!(error.message(), "Cannot spread fragments within themselves");
    }
}
