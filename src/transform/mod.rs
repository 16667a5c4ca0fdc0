//! # Tree transformation
//!
//! The [`TreeTransformer`] turns a visitor's edits into a new tree. While it traverses a tree,
//! visitors call the edit helpers in this module with the context they're given:
//!
//! ```
//! use graphql_traverse::error::Result;
//! use graphql_traverse::transform::{delete_node, TreeTransformer};
//! use graphql_traverse::traverse::*;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Node(u32, Vec<Arc<Node>>);
//!
//! struct Adapter;
//!
//! impl NodeAdapter<Arc<Node>> for Adapter {
//!     fn named_children(&self, node: &Arc<Node>) -> NamedChildren<Arc<Node>> {
//!         NamedChildren::new().with(Role::Unnamed, node.1.clone())
//!     }
//!
//!     fn with_new_children(
//!         &self,
//!         node: &Arc<Node>,
//!         children: NamedChildren<Arc<Node>>,
//!     ) -> Result<Arc<Node>> {
//!         let list = children
//!             .get(Role::Unnamed)
//!             .map_or_else(|| node.1.clone(), |list| list.to_vec());
//!         Ok(Arc::new(Node(node.0, list)))
//!     }
//! }
//!
//! struct DropOdd;
//!
//! impl TraverserVisitor<Arc<Node>> for DropOdd {
//!     fn enter(&mut self, ctx: &mut TraverserContext<'_, Arc<Node>>) -> Result<TraversalControl> {
//!         if ctx.this_node().0 % 2 == 1 {
//!             return delete_node(ctx);
//!         }
//!         Ok(TraversalControl::Continue)
//!     }
//! }
//!
//! let leaf = |value| Arc::new(Node(value, vec![]));
//! let root = Arc::new(Node(0, vec![leaf(1), leaf(2), leaf(3)]));
//! let result = TreeTransformer::new(Adapter).transform(root, DropOdd).unwrap().unwrap();
//! assert_eq!(result.1.iter().map(|node| node.0).collect::<Vec<_>>(), [2]);
//! ```

mod transformer;
mod util;

pub use transformer::TreeTransformer;
pub use util::{change_node, delete_node, insert_after, insert_before};
