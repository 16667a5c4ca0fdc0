//! `graphql_traverse`
//! =========
//!
//! _Generic tree traversal, zipper edits and tree transformation, with GraphQL ASTs on top._
//!
//! The **`graphql_traverse`** library follows two goals:
//!
//! - To traverse and rewrite any immutable tree without the tree knowing about it
//! - To be fast at analysing and rewriting GraphQL Query Language ASTs
//!
//! A tree only has to provide a way to list a node's children by role. From there on the
//! [`traverse`] module walks it sequentially in depth-first or breadth-first order, or in
//! parallel on a rayon thread pool, while visitors are handed contexts with typed variables and
//! accumulates. Edits that visitors make are recorded as [zippers](zipper) and applied together by
//! the [`TreeTransformer`](transform::TreeTransformer), which rebuilds only the ancestors of
//! edited nodes and shares every other subtree with the original tree.
//!
//! GraphQL documents are the main consumer of this. The [`ast`] module contains an arena-allocated
//! GraphQL AST that plugs into the traversers, and the [`analysis`] module computes the depth and
//! complexity of operations with them.
//!
//! [A good place to start learning more about this crate is the `traverse` module...](traverse)

pub mod analysis;
pub mod ast;
pub mod error;
pub mod transform;
pub mod traverse;
pub mod zipper;

pub use bumpalo;

#[cfg(feature = "json")]
pub mod json;

#[cfg(test)]
mod test_tree;
