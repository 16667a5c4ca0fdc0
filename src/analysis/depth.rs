use super::{fragment_cycle, selection_children, unknown_fragment, Fragments};
use crate::ast::{Document, OperationDefinition, QueryNode, FRAGMENT};
use crate::error::{Error, ErrorType, Result};
use crate::traverse::{
    NamedChildren, TraversalControl, Traverser, TraverserContext, TraverserVisitor,
};
use hashbrown::HashMap;

/// Computes the depth of a GraphQL operation, which is the largest number of fields that are
/// nested inside one another.
///
/// Fragment spreads and inline fragments don't add to the depth themselves, but the fields they
/// contain count as if they were written in place of the spread.
///
/// ```
/// use graphql_traverse::analysis::QueryDepth;
/// use graphql_traverse::ast::*;
///
/// let ctx = ASTContext::new();
/// let user = Field::new_leaf("user").with_selections(&ctx, [Field::new_leaf("name").into()]);
/// let operation = OperationDefinition::new(&ctx, OperationKind::Query, None, [user.into()]);
/// let document = Document::new(&ctx, [operation.into()]);
///
/// let depth = QueryDepth::new().calculate(&document, None).unwrap();
/// assert_eq!(depth, 2);
/// assert!(QueryDepth::new().ensure_max_depth(&document, None, 1).is_err());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryDepth;

#[derive(Clone, Copy)]
struct Depth(usize);

impl QueryDepth {
    pub fn new() -> Self {
        QueryDepth
    }

    /// Computes the depth of the operation selected by `operation_name`.
    pub fn calculate<'a>(
        &self,
        document: &'a Document<'a>,
        operation_name: Option<&str>,
    ) -> Result<usize> {
        let operation = document.operation(operation_name)?;
        self.calculate_operation(document, operation)
    }

    pub fn calculate_operation<'a>(
        &self,
        document: &'a Document<'a>,
        operation: &'a OperationDefinition<'a>,
    ) -> Result<usize> {
        let fragments = document.fragments();
        let children = |node: &QueryNode<'a>| match node.fragment_spread() {
            Some(spread) => match fragments.get(spread.name.name).copied() {
                Some(fragment) => {
                    NamedChildren::new().with(FRAGMENT, vec![QueryNode::Fragment(fragment)])
                }
                None => NamedChildren::new(),
            },
            None => selection_children(node),
        };
        let mut visitor = DepthVisitor {
            fragment_depths: HashMap::new(),
        };
        let result = Traverser::depth_first(children)
            .with_shared_data(&fragments)
            .with_initial_accumulate(0usize)
            .traverse(QueryNode::Operation(operation), &mut visitor)?;
        let depth = *result.accumulated_result();
        tracing::debug!(depth, fragments = visitor.fragment_depths.len(), "computed query depth");
        Ok(depth)
    }

    /// Computes the depth of an operation and fails when it's larger than `max_depth`.
    pub fn ensure_max_depth<'a>(
        &self,
        document: &'a Document<'a>,
        operation_name: Option<&str>,
        max_depth: usize,
    ) -> Result<usize> {
        let depth = self.calculate(document, operation_name)?;
        if depth > max_depth {
            Err(Error::new(
                format!("Maximum query depth exceeded: {depth} > {max_depth}"),
                Some(ErrorType::GraphQL),
            ))
        } else {
            Ok(depth)
        }
    }
}

struct DepthVisitor<'a> {
    /// Depths of the fragment definitions that have been left already.
    fragment_depths: HashMap<&'a str, usize>,
}

impl<'a, 'f> TraverserVisitor<QueryNode<'a>, usize, &'f Fragments<'a>> for DepthVisitor<'a> {
    fn enter(
        &mut self,
        ctx: &mut TraverserContext<'_, QueryNode<'a>, usize, &'f Fragments<'a>>,
    ) -> Result<TraversalControl> {
        if let Some(spread) = ctx.this_node().fragment_spread() {
            if !ctx.shared_context_data().contains_key(spread.name.name) {
                return Err(unknown_fragment(spread.name.name));
            }
        }
        Ok(TraversalControl::Continue)
    }

    fn leave(
        &mut self,
        ctx: &mut TraverserContext<'_, QueryNode<'a>, usize, &'f Fragments<'a>>,
    ) -> Result<TraversalControl> {
        let nested = ctx
            .children_contexts()
            .and_then(|children| {
                children
                    .iter()
                    .flat_map(|(_, list)| list.iter())
                    .filter_map(|child| child.var::<Depth>().map(|depth| depth.0))
                    .max()
            })
            .unwrap_or(0);
        let depth = match *ctx.this_node() {
            QueryNode::Field(_) => nested + 1,
            QueryNode::Fragment(fragment) => {
                self.fragment_depths.insert(fragment.name.name, nested);
                nested
            }
            _ => nested,
        };
        ctx.set_var(Depth(depth));
        if ctx.parent_node().is_none() {
            ctx.set_accumulate(depth);
        }
        Ok(TraversalControl::Continue)
    }

    /// A fragment that's reached again has either been left and its depth is known, or it's
    /// still being visited and spreads itself.
    fn back_ref(
        &mut self,
        ctx: &mut TraverserContext<'_, QueryNode<'a>, usize, &'f Fragments<'a>>,
    ) -> Result<TraversalControl> {
        if let QueryNode::Fragment(fragment) = *ctx.this_node() {
            match self.fragment_depths.get(fragment.name.name) {
                Some(depth) => {
                    ctx.set_var(Depth(*depth));
                }
                None => return Err(fragment_cycle(fragment.name.name)),
            }
        }
        Ok(TraversalControl::Continue)
    }
}
