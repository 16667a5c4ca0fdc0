use crate::error::Result;
use std::{fmt, rc::Rc, sync::Arc};

/// An opaque identity of a node, derived from the address of the node's allocation.
///
/// Two node handles refer to the same node when their `NodeId`s are equal. Structurally equal
/// nodes in separate allocations have distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the identity of the value that `node` points to.
    #[inline]
    pub fn of<T: ?Sized>(node: &T) -> Self {
        NodeId(node as *const T as *const () as usize)
    }
}

/// Trait for cheap node handles that can be traversed and carry an identity.
///
/// Handles are cloned freely during traversal (into contexts, breadcrumbs and zippers), so they
/// should be references or reference-counted pointers rather than owned trees.
pub trait TreeNode: Clone {
    /// Returns this node's identity.
    fn node_id(&self) -> NodeId;
}

impl<'a, T: ?Sized> TreeNode for &'a T {
    #[inline]
    fn node_id(&self) -> NodeId {
        NodeId::of(*self)
    }
}

impl<T: ?Sized> TreeNode for Rc<T> {
    #[inline]
    fn node_id(&self) -> NodeId {
        NodeId::of(&**self)
    }
}

impl<T: ?Sized> TreeNode for Arc<T> {
    #[inline]
    fn node_id(&self) -> NodeId {
        NodeId::of(&**self)
    }
}

/// The label under which a list of child nodes is grouped within a parent.
///
/// Nodes that only have a single, unlabeled list of children place them under `Role::Unnamed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum Role {
    Unnamed,
    Named(&'static str),
}

impl Role {
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Role::Unnamed => None,
            Role::Named(name) => Some(name),
        }
    }
}

impl From<&'static str> for Role {
    #[inline]
    fn from(name: &'static str) -> Self {
        Role::Named(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Unnamed => Ok(()),
            Role::Named(name) => f.write_str(name),
        }
    }
}

/// A child's position in its parent: the role it's grouped under and its index in that list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct NodeLocation {
    role: Role,
    index: usize,
}

impl NodeLocation {
    #[inline]
    pub fn new(role: impl Into<Role>, index: usize) -> Self {
        NodeLocation {
            role: role.into(),
            index,
        }
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.role, self.index)
    }
}

/// One step of the path from a node towards the root: the ancestor and where the descendant
/// sits beneath it.
#[derive(Debug, Clone)]
pub struct Breadcrumb<N> {
    node: N,
    location: NodeLocation,
}

impl<N> Breadcrumb<N> {
    #[inline]
    pub fn new(node: N, location: NodeLocation) -> Self {
        Breadcrumb { node, location }
    }

    #[inline]
    pub fn node(&self) -> &N {
        &self.node
    }

    #[inline]
    pub fn location(&self) -> NodeLocation {
        self.location
    }
}

/// An insertion-ordered mapping of roles to ordered lists of children.
///
/// Traversals visit roles in the order they were inserted and each role's children from left to
/// right. Inserting a role that's already present replaces its list in place.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedChildren<N> {
    groups: Vec<(Role, Vec<N>)>,
}

impl<N> Default for NamedChildren<N> {
    fn default() -> Self {
        NamedChildren { groups: Vec::new() }
    }
}

impl<N> NamedChildren<N> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a list of children under `role`, consuming and returning `self`.
    #[inline]
    pub fn with(mut self, role: impl Into<Role>, children: Vec<N>) -> Self {
        self.insert(role, children);
        self
    }

    /// Sets the children under `role`, returning the list previously stored there.
    pub fn insert(&mut self, role: impl Into<Role>, children: Vec<N>) -> Option<Vec<N>> {
        let role = role.into();
        match self.groups.iter_mut().find(|(group, _)| *group == role) {
            Some((_, list)) => Some(std::mem::replace(list, children)),
            None => {
                self.groups.push((role, children));
                None
            }
        }
    }

    pub fn get(&self, role: impl Into<Role>) -> Option<&[N]> {
        let role = role.into();
        self.groups
            .iter()
            .find(|(group, _)| *group == role)
            .map(|(_, list)| list.as_slice())
    }

    pub fn get_mut(&mut self, role: impl Into<Role>) -> Option<&mut Vec<N>> {
        let role = role.into();
        self.groups
            .iter_mut()
            .find(|(group, _)| *group == role)
            .map(|(_, list)| list)
    }

    /// Removes the list stored under `role` and returns it.
    pub fn remove(&mut self, role: impl Into<Role>) -> Option<Vec<N>> {
        let role = role.into();
        let index = self.groups.iter().position(|(group, _)| *group == role)?;
        Some(self.groups.remove(index).1)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.groups.iter().map(|(role, _)| *role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &[N])> {
        self.groups
            .iter()
            .map(|(role, list)| (*role, list.as_slice()))
    }

    /// Iterates over all children across all roles together with their locations.
    pub fn located(&self) -> impl Iterator<Item = (NodeLocation, &N)> {
        self.groups.iter().flat_map(|(role, list)| {
            list.iter()
                .enumerate()
                .map(move |(index, child)| (NodeLocation::new(*role, index), child))
        })
    }

    /// The number of roles, including roles with empty lists.
    #[inline]
    pub fn role_count(&self) -> usize {
        self.groups.len()
    }

    /// Checks whether there are no children at all under any role.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, list)| list.is_empty())
    }

    /// Maps every child while keeping roles and order intact.
    pub fn map<M>(self, mut f: impl FnMut(N) -> M) -> NamedChildren<M> {
        NamedChildren {
            groups: self
                .groups
                .into_iter()
                .map(|(role, list)| (role, list.into_iter().map(&mut f).collect()))
                .collect(),
        }
    }
}

impl<N> IntoIterator for NamedChildren<N> {
    type Item = (Role, Vec<N>);
    type IntoIter = std::vec::IntoIter<(Role, Vec<N>)>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<N> FromIterator<(Role, Vec<N>)> for NamedChildren<N> {
    fn from_iter<I: IntoIterator<Item = (Role, Vec<N>)>>(iter: I) -> Self {
        let mut children = NamedChildren::new();
        for (role, list) in iter {
            children.insert(role, list);
        }
        children
    }
}

/// Trait that a node type implements (via an adapter) to take part in zipper edits and
/// transformations.
///
/// Read-only traversals only need a function returning a node's children, while rebuilding trees
/// additionally requires creating a copy of a node with some of its children replaced.
pub trait NodeAdapter<N> {
    /// Returns the children of `node`, grouped by role.
    fn named_children(&self, node: &N) -> NamedChildren<N>;

    /// Creates a new node of the same kind as `node` whose children under the roles present in
    /// `children` are replaced. Roles that are missing keep their original children and `node`
    /// itself is never mutated.
    fn with_new_children(&self, node: &N, children: NamedChildren<N>) -> Result<N>;
}

impl<N, A: NodeAdapter<N> + ?Sized> NodeAdapter<N> for &A {
    #[inline]
    fn named_children(&self, node: &N) -> NamedChildren<N> {
        (**self).named_children(node)
    }

    #[inline]
    fn with_new_children(&self, node: &N, children: NamedChildren<N>) -> Result<N> {
        (**self).with_new_children(node, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_follows_allocations() {
        let a = Arc::new(String::from("node"));
        let b = Arc::new(String::from("node"));
        assert_eq!(a, b);
        assert_ne!(a.node_id(), b.node_id());
        assert_eq!(a.node_id(), a.clone().node_id());
        assert_eq!(NodeId::of(&*a), (&*a).node_id());
    }

    #[test]
    fn named_children_keep_insertion_order() {
        let mut children = NamedChildren::new()
            .with("arguments", vec![1, 2])
            .with(Role::Unnamed, vec![3])
            .with("selections", vec![4, 5]);

        assert_eq!(
            children.roles().collect::<Vec<_>>(),
            vec![Role::Named("arguments"), Role::Unnamed, Role::Named("selections")]
        );

        assert_eq!(children.insert("arguments", vec![9]), Some(vec![1, 2]));
        assert_eq!(children.get("arguments"), Some(&[9][..]));
        assert_eq!(children.roles().next(), Some(Role::Named("arguments")));

        let located = children
            .located()
            .map(|(location, child)| (location.to_string(), *child))
            .collect::<Vec<_>>();
        assert_eq!(
            located,
            vec![
                (String::from("arguments[0]"), 9),
                (String::from("[0]"), 3),
                (String::from("selections[0]"), 4),
                (String::from("selections[1]"), 5),
            ]
        );

        assert_eq!(children.remove(Role::Unnamed), Some(vec![3]));
        assert_eq!(children.role_count(), 2);
    }

    #[test]
    fn empty_lists_count_as_no_children() {
        let children: NamedChildren<u8> = NamedChildren::new().with("selections", vec![]);
        assert!(children.is_empty());
        assert_eq!(children.role_count(), 1);
    }
}
