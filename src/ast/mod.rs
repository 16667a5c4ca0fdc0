//! # GraphQL Query Language AST
//!
//! The `graphql_traverse::ast` module contains an arena-allocated AST of the client-side GraphQL
//! query language and the [`QueryNode`] handle through which the AST is traversed and transformed.
//! [Reference](https://spec.graphql.org/October2021/#sec-Language)
//!
//! Its main parts are:
//! - [`ASTContext`], a context containing an arena that defines the lifetime for an AST
//! - [`QueryNode`] and [`QueryNodeAdapter`], which plug the AST into the
//!   [traversal engines](crate::traverse) and the
//!   [`TreeTransformer`](crate::transform::TreeTransformer)
//! - [`PrintNode`], a trait using which AST Nodes are printed into source text
//!
//! ```
//! use graphql_traverse::ast::*;
//! use graphql_traverse::traverse::{TraversalControl, TraverserContext, TraverserVisitor};
//! use graphql_traverse::transform::{delete_node, TreeTransformer};
//! use graphql_traverse::error::Result;
//!
//! // Create an AST Context for a document
//! let ctx = ASTContext::new();
//! let user = Field::new_leaf("user").with_selections(
//!     &ctx,
//!     [Field::new_leaf("id").into(), Field::new_leaf("secret").into()],
//! );
//! let operation = OperationDefinition::new(&ctx, OperationKind::Query, None, [user.into()]);
//! let document = Document::new(&ctx, [operation.into()]);
//!
//! // Remove every field called `secret`
//! struct RemoveSecrets;
//!
//! impl<'a> TraverserVisitor<QueryNode<'a>> for RemoveSecrets {
//!     fn enter(
//!         &mut self,
//!         ctx: &mut TraverserContext<'_, QueryNode<'a>>,
//!     ) -> Result<TraversalControl> {
//!         match ctx.this_node().field() {
//!             Some(field) if field.name == "secret" => delete_node(ctx),
//!             _ => Ok(TraversalControl::Continue),
//!         }
//!     }
//! }
//!
//! let output = TreeTransformer::new(QueryNodeAdapter::new(&ctx))
//!     .transform(QueryNode::Document(&document), RemoveSecrets)
//!     .unwrap()
//!     .unwrap();
//!
//! // Print the new Document node to an output String
//! assert_eq!(output.print(), "{ user { id } }");
//! ```

#[allow(clippy::module_inception)]
mod ast;

mod ast_kind;
mod node;
mod printer;

pub use ast::*;
pub use ast_kind::ASTKind;
pub use node::*;
pub use printer::PrintNode;
