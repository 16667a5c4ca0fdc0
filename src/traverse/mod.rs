//! # Generic tree traversal
//!
//! The `traverse` module walks any tree whose children can be listed by a function. The tree's
//! node type only has to implement [`TreeNode`], which provides the identity used to detect
//! shared subtrees, and which is implemented for references, `Rc` and `Arc` handles.
//!
//! Children are listed as [`NamedChildren`], an ordered mapping from a [`Role`] (the field a
//! child is stored under) to a list of children, which allows every node to be addressed by a
//! [`NodeLocation`] relative to its parent.
//!
//! Two traversers are available:
//!
//! - [`Traverser`] visits nodes sequentially in depth-first or breadth-first order, calling into a
//!   [`TraverserVisitor`] with a mutable [`TraverserContext`] per node. Contexts carry typed
//!   variables, a running accumulate, and can change or delete the node they belong to.
//! - [`ParallelTraverser`] visits the children of each node concurrently on a rayon thread pool,
//!   calling into a [`ParallelVisitor`] whose accumulates flow from parents down to children and
//!   back up again.
//!
//! Visitor callbacks return a [`TraversalControl`] that may skip a node's children or stop the
//! traversal altogether.

mod context;
mod node;
mod parallel;
mod state;
mod traverser;
mod vars;
mod visitor;

pub use context::{ContextRef, TraverserContext};
pub use node::{Breadcrumb, NamedChildren, NodeAdapter, NodeId, NodeLocation, Role, TreeNode};
pub use parallel::{ParallelContext, ParallelTraverser, ParallelVisitor};
pub use state::TraversalMode;
pub use traverser::{Traverser, TraverserResult};
pub use vars::{SyncVarMap, VarMap};
pub use visitor::{TraversalControl, TraversalPhase, TraverserVisitor};
