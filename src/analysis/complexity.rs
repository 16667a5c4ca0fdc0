use super::{fragments_in_dependency_order, selection_children, unknown_fragment};
use crate::ast::{Document, Field, OperationDefinition, QueryNode, Value, Variables};
use crate::error::{Error, ErrorType, Result};
use crate::traverse::{ParallelContext, ParallelTraverser, ParallelVisitor, TraversalControl};
use hashbrown::HashMap;
use std::sync::Arc;

/// The input of a [`FieldComplexityCalculator`] for a single field.
#[derive(Debug, Clone, Copy)]
pub struct FieldComplexityEnvironment<'a> {
    pub field: &'a Field<'a>,
    /// The summed up complexity of all of the field's sub-selections.
    pub child_complexity: usize,
    pub variables: Option<&'a Variables<'a>>,
}

impl<'a> FieldComplexityEnvironment<'a> {
    /// Returns the value of an argument of the field, with variables resolved.
    pub fn argument(&self, name: &str) -> Option<Value<'a>> {
        self.field
            .arguments
            .get(name)
            .map(|value| value.resolve(self.variables))
    }

    pub fn int_argument(&self, name: &str) -> Option<i64> {
        self.field
            .arguments
            .get(name)
            .and_then(|value| value.as_int(self.variables))
    }
}

/// Trait for scoring a single field, given the complexity of its sub-selections.
///
/// This is implemented for closures, so any `Fn(&FieldComplexityEnvironment) -> usize` may be
/// passed to [`QueryComplexity::with_calculator`].
pub trait FieldComplexityCalculator: Sync {
    fn field_complexity(&self, env: &FieldComplexityEnvironment<'_>) -> usize;
}

impl<F> FieldComplexityCalculator for F
where
    F: Fn(&FieldComplexityEnvironment<'_>) -> usize + Sync,
{
    #[inline]
    fn field_complexity(&self, env: &FieldComplexityEnvironment<'_>) -> usize {
        self(env)
    }
}

/// Scores every field as one plus the complexity of its sub-selections.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFieldComplexity;

impl FieldComplexityCalculator for DefaultFieldComplexity {
    #[inline]
    fn field_complexity(&self, env: &FieldComplexityEnvironment<'_>) -> usize {
        env.child_complexity.saturating_add(1)
    }
}

/// Computes the complexity of a GraphQL operation as the sum of the scores of all of its fields,
/// with the selections of every field being scored in parallel.
///
/// Fragments are scored once, before the operation, and every spread of a fragment adds the
/// fragment's score.
///
/// ```
/// use graphql_traverse::analysis::{FieldComplexityEnvironment, QueryComplexity};
/// use graphql_traverse::ast::*;
///
/// let ctx = ASTContext::new();
/// let users = Field::new_leaf("users")
///     .with_arguments(&ctx, [Argument::new("first", Value::Int(IntValue { value: "10" }))])
///     .with_selections(&ctx, [Field::new_leaf("name").into()]);
/// let operation = OperationDefinition::new(&ctx, OperationKind::Query, None, [users.into()]);
/// let document = Document::new(&ctx, [operation.into()]);
///
/// let complexity = QueryComplexity::new()
///     .with_calculator(|env: &FieldComplexityEnvironment<'_>| {
///         let multiplier = env.int_argument("first").unwrap_or(1) as usize;
///         1 + multiplier * env.child_complexity
///     })
///     .calculate(&document, None)
///     .unwrap();
/// assert_eq!(complexity, 11);
/// ```
pub struct QueryComplexity<'v, C = DefaultFieldComplexity> {
    calculator: C,
    variables: Option<&'v Variables<'v>>,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl<'v> QueryComplexity<'v> {
    pub fn new() -> Self {
        QueryComplexity {
            calculator: DefaultFieldComplexity,
            variables: None,
            pool: None,
        }
    }
}

impl<'v> Default for QueryComplexity<'v> {
    fn default() -> Self {
        Self::new()
    }
}

type FragmentScores<'a> = HashMap<&'a str, usize>;

impl<'v, C: FieldComplexityCalculator> QueryComplexity<'v, C> {
    pub fn with_calculator<C2>(self, calculator: C2) -> QueryComplexity<'v, C2>
    where
        C2: FieldComplexityCalculator,
    {
        QueryComplexity {
            calculator,
            variables: self.variables,
            pool: self.pool,
        }
    }

    /// Sets the variables that arguments referring to variables are resolved with.
    pub fn with_variables(mut self, variables: &'v Variables<'v>) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Runs the traversals on the given pool instead of rayon's global pool.
    pub fn with_pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Computes the complexity of the operation selected by `operation_name`.
    pub fn calculate<'a: 'v>(
        &self,
        document: &'a Document<'a>,
        operation_name: Option<&str>,
    ) -> Result<usize> {
        let operation = document.operation(operation_name)?;
        self.calculate_operation(document, operation)
    }

    pub fn calculate_operation<'a: 'v>(
        &self,
        document: &'a Document<'a>,
        operation: &'a OperationDefinition<'a>,
    ) -> Result<usize> {
        let fragments = document.fragments();
        let mut scores = FragmentScores::new();
        for fragment in fragments_in_dependency_order(&fragments)? {
            let score = self.score(QueryNode::Fragment(fragment), &scores)?;
            scores.insert(fragment.name.name, score);
        }
        let complexity = self.score(QueryNode::Operation(operation), &scores)?;
        tracing::debug!(complexity, fragments = scores.len(), "computed query complexity");
        Ok(complexity)
    }

    /// Computes the complexity of an operation and fails when it's larger than `max_complexity`.
    pub fn ensure_max_complexity<'a: 'v>(
        &self,
        document: &'a Document<'a>,
        operation_name: Option<&str>,
        max_complexity: usize,
    ) -> Result<usize> {
        let complexity = self.calculate(document, operation_name)?;
        if complexity > max_complexity {
            Err(Error::new(
                format!("Maximum query complexity exceeded: {complexity} > {max_complexity}"),
                Some(ErrorType::GraphQL),
            ))
        } else {
            Ok(complexity)
        }
    }

    fn score<'a: 'v>(&self, root: QueryNode<'a>, scores: &FragmentScores<'a>) -> Result<usize> {
        let visitor = ComplexityVisitor {
            calculator: &self.calculator,
            variables: self.variables,
        };
        let mut traverser = ParallelTraverser::new(selection_children)
            .with_shared_data(scores)
            .with_initial_accumulate(0usize);
        if let Some(pool) = &self.pool {
            traverser = traverser.with_pool(pool.clone());
        }
        let result = traverser.traverse(root, &visitor)?;
        Ok(result.into_accumulated_result())
    }
}

struct ComplexityVisitor<'c, 'v, C> {
    calculator: &'c C,
    variables: Option<&'v Variables<'v>>,
}

type ScoreContext<'x, 'a, 's> = ParallelContext<'x, QueryNode<'a>, usize, &'s FragmentScores<'a>>;

impl<'c, 'v, 'a: 'v, 's, C> ParallelVisitor<QueryNode<'a>, usize, &'s FragmentScores<'a>>
    for ComplexityVisitor<'c, 'v, C>
where
    C: FieldComplexityCalculator,
{
    /// A spread is a leaf that's scored as its fragment.
    fn enter(&self, ctx: &mut ScoreContext<'_, 'a, 's>) -> Result<TraversalControl> {
        if let Some(spread) = ctx.this_node().fragment_spread() {
            let name = spread.name.name;
            match ctx.shared_context_data().get(name) {
                Some(score) => ctx.set_accumulate(*score),
                None => return Err(unknown_fragment(name)),
            }
        }
        Ok(TraversalControl::Continue)
    }

    fn leave(&self, ctx: &mut ScoreContext<'_, 'a, 's>) -> Result<TraversalControl> {
        let child_complexity = ctx.children_accumulates().map_or(0, |children| {
            children
                .iter()
                .flat_map(|(_, list)| list.iter().copied())
                .fold(0, usize::saturating_add)
        });
        match *ctx.this_node() {
            QueryNode::FragmentSpread(_) => {}
            QueryNode::Field(field) => {
                let env = FieldComplexityEnvironment {
                    field,
                    child_complexity,
                    variables: self.variables,
                };
                ctx.set_accumulate(self.calculator.field_complexity(&env));
            }
            _ => ctx.set_accumulate(child_complexity),
        }
        Ok(TraversalControl::Continue)
    }
}
