//! A minimal named tree used by the unit tests of the generic traversal and zipper modules.

use crate::error::{Error, ErrorType, Result};
use crate::traverse::{NamedChildren, NodeAdapter, Role};
use std::sync::Arc;

pub(crate) type Tree = Arc<TestNode>;

#[derive(Debug, PartialEq)]
pub(crate) struct TestNode {
    pub(crate) name: &'static str,
    pub(crate) children: Vec<(Role, Vec<Tree>)>,
}

pub(crate) fn leaf(name: &'static str) -> Tree {
    Arc::new(TestNode {
        name,
        children: Vec::new(),
    })
}

/// Creates a node whose children are all placed under the unnamed role.
pub(crate) fn node(name: &'static str, children: Vec<Tree>) -> Tree {
    Arc::new(TestNode {
        name,
        children: vec![(Role::Unnamed, children)],
    })
}

pub(crate) fn node_with(name: &'static str, groups: Vec<(&'static str, Vec<Tree>)>) -> Tree {
    Arc::new(TestNode {
        name,
        children: groups
            .into_iter()
            .map(|(role, children)| (Role::Named(role), children))
            .collect(),
    })
}

pub(crate) fn children_of(tree: &Tree) -> NamedChildren<Tree> {
    tree.children
        .iter()
        .map(|(role, children)| (*role, children.clone()))
        .collect()
}

/// Finds the first node named `name` in pre-order.
pub(crate) fn find(tree: &Tree, name: &str) -> Option<Tree> {
    if tree.name == name {
        return Some(tree.clone());
    }
    tree.children
        .iter()
        .flat_map(|(_, children)| children.iter())
        .find_map(|child| find(child, name))
}

/// Renders a tree as e.g. `A(B(D,E),C)`, listing the children of all roles in order.
pub(crate) fn render(tree: &Tree) -> String {
    let children = tree
        .children
        .iter()
        .flat_map(|(_, children)| children.iter())
        .map(render)
        .collect::<Vec<_>>();
    if children.is_empty() {
        tree.name.to_string()
    } else {
        format!("{}({})", tree.name, children.join(","))
    }
}

pub(crate) struct TestAdapter;

impl NodeAdapter<Tree> for TestAdapter {
    fn named_children(&self, node: &Tree) -> NamedChildren<Tree> {
        children_of(node)
    }

    fn with_new_children(&self, node: &Tree, children: NamedChildren<Tree>) -> Result<Tree> {
        let mut groups = node.children.clone();
        for (role, list) in children {
            match groups.iter_mut().find(|(group, _)| *group == role) {
                Some((_, existing)) => *existing = list,
                None => {
                    return Err(Error::new(
                        format!("{} has no children under role `{}`", node.name, role),
                        Some(ErrorType::Adapter),
                    ))
                }
            }
        }
        Ok(Arc::new(TestNode {
            name: node.name,
            children: groups,
        }))
    }
}
