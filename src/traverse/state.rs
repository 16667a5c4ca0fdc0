use super::context::ContextId;
use std::collections::VecDeque;

/// The order in which a [`Traverser`](super::Traverser) visits nodes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TraversalMode {
    /// Visits a node's whole subtree before its next sibling.
    DepthFirst,
    /// Visits all children of a node before any of its grandchildren.
    BreadthFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    /// A context that hasn't been reached yet.
    Visit(ContextId),
    /// The end-of-children marker after which the context is left.
    Leave(ContextId),
}

/// The pending work of a traversal, a stack for depth-first and a queue for breadth-first mode.
pub(crate) enum TraverserState {
    Stack(Vec<Entry>),
    Queue(VecDeque<Entry>),
}

impl TraverserState {
    pub(crate) fn new(mode: TraversalMode) -> Self {
        match mode {
            TraversalMode::DepthFirst => TraverserState::Stack(Vec::new()),
            TraversalMode::BreadthFirst => TraverserState::Queue(VecDeque::new()),
        }
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Entry> {
        match self {
            TraverserState::Stack(stack) => stack.pop(),
            TraverserState::Queue(queue) => queue.pop_front(),
        }
    }

    pub(crate) fn push_roots(&mut self, roots: &[ContextId]) {
        match self {
            TraverserState::Stack(stack) => {
                stack.extend(roots.iter().rev().map(|id| Entry::Visit(*id)));
            }
            TraverserState::Queue(queue) => {
                queue.extend(roots.iter().map(|id| Entry::Visit(*id)));
            }
        }
    }

    /// Schedules the children of `parent` followed by the marker that leaves `parent`.
    pub(crate) fn push_children(&mut self, parent: ContextId, children: &[ContextId]) {
        match self {
            TraverserState::Stack(stack) => {
                stack.push(Entry::Leave(parent));
                // reversed so that the first child is popped first
                stack.extend(children.iter().rev().map(|id| Entry::Visit(*id)));
            }
            TraverserState::Queue(queue) => {
                queue.extend(children.iter().map(|id| Entry::Visit(*id)));
                queue.push_back(Entry::Leave(parent));
            }
        }
    }
}
