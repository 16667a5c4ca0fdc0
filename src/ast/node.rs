use super::ast::*;
use super::ast_kind::ASTKind;
use crate::error::{Error, Result};
use crate::traverse::{NamedChildren, NodeAdapter, NodeId, Role, TreeNode};

/// Role of a document's definitions.
pub const DEFINITIONS: Role = Role::Named("definitions");
/// Role of an operation's variable definitions.
pub const VARIABLE_DEFINITIONS: Role = Role::Named("variableDefinitions");
pub const DIRECTIVES: Role = Role::Named("directives");
pub const ARGUMENTS: Role = Role::Named("arguments");
pub const SELECTIONS: Role = Role::Named("selections");
/// Role under which a fragment spread's definition may be placed by traversals that follow
/// spreads. [`QueryNode::children`] never returns it.
pub const FRAGMENT: Role = Role::Named("fragment");

/// A traversable handle to a node of a GraphQL query AST.
///
/// Handles are plain references into an [`ASTContext`]'s arena, so they're cheap to copy and can
/// be shared across threads. A node's identity is the address of the node it refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryNode<'a> {
    Document(&'a Document<'a>),
    Operation(&'a OperationDefinition<'a>),
    Fragment(&'a FragmentDefinition<'a>),
    VariableDefinition(&'a VariableDefinition<'a>),
    Field(&'a Field<'a>),
    FragmentSpread(&'a FragmentSpread<'a>),
    InlineFragment(&'a InlineFragment<'a>),
    Directive(&'a Directive<'a>),
    Argument(&'a Argument<'a>),
}

impl<'a> QueryNode<'a> {
    pub fn kind(&self) -> ASTKind {
        match self {
            QueryNode::Document(_) => ASTKind::Document,
            QueryNode::Operation(_) => ASTKind::OperationDefinition,
            QueryNode::Fragment(_) => ASTKind::FragmentDefinition,
            QueryNode::VariableDefinition(_) => ASTKind::VariableDefinition,
            QueryNode::Field(_) => ASTKind::Field,
            QueryNode::FragmentSpread(_) => ASTKind::FragmentSpread,
            QueryNode::InlineFragment(_) => ASTKind::InlineFragment,
            QueryNode::Directive(_) => ASTKind::Directive,
            QueryNode::Argument(_) => ASTKind::Argument,
        }
    }

    #[inline]
    pub fn field(&self) -> Option<&'a Field<'a>> {
        match self {
            QueryNode::Field(field) => Some(field),
            _ => None,
        }
    }

    #[inline]
    pub fn fragment_spread(&self) -> Option<&'a FragmentSpread<'a>> {
        match self {
            QueryNode::FragmentSpread(spread) => Some(spread),
            _ => None,
        }
    }

    /// Returns this node's children grouped by role. Every role a kind of node has is present,
    /// even when its list is empty.
    pub fn children(&self) -> NamedChildren<QueryNode<'a>> {
        fn list<'a, T: 'a>(
            items: &'a [T],
            to_node: impl Fn(&'a T) -> QueryNode<'a>,
        ) -> Vec<QueryNode<'a>> {
            items.iter().map(to_node).collect()
        }

        let children = NamedChildren::new();
        match *self {
            QueryNode::Document(document) => {
                children.with(DEFINITIONS, list(document.definitions, QueryNode::from))
            }
            QueryNode::Operation(operation) => children
                .with(
                    VARIABLE_DEFINITIONS,
                    list(operation.variable_definitions.children, QueryNode::VariableDefinition),
                )
                .with(DIRECTIVES, list(operation.directives.children, QueryNode::Directive))
                .with(SELECTIONS, list(operation.selection_set.selections, QueryNode::from)),
            QueryNode::Fragment(fragment) => children
                .with(DIRECTIVES, list(fragment.directives.children, QueryNode::Directive))
                .with(SELECTIONS, list(fragment.selection_set.selections, QueryNode::from)),
            QueryNode::VariableDefinition(definition) => {
                let directives = list(definition.directives.children, QueryNode::Directive);
                children.with(DIRECTIVES, directives)
            }
            QueryNode::Field(field) => children
                .with(ARGUMENTS, list(field.arguments.children, QueryNode::Argument))
                .with(DIRECTIVES, list(field.directives.children, QueryNode::Directive))
                .with(SELECTIONS, list(field.selection_set.selections, QueryNode::from)),
            QueryNode::FragmentSpread(spread) => {
                children.with(DIRECTIVES, list(spread.directives.children, QueryNode::Directive))
            }
            QueryNode::InlineFragment(fragment) => children
                .with(DIRECTIVES, list(fragment.directives.children, QueryNode::Directive))
                .with(SELECTIONS, list(fragment.selection_set.selections, QueryNode::from)),
            QueryNode::Directive(directive) => {
                children.with(ARGUMENTS, list(directive.arguments.children, QueryNode::Argument))
            }
            QueryNode::Argument(_) => children,
        }
    }

    fn to_definition(self) -> Result<Definition<'a>> {
        match self {
            QueryNode::Operation(operation) => Ok(Definition::Operation(*operation)),
            QueryNode::Fragment(fragment) => Ok(Definition::Fragment(*fragment)),
            node => Err(misplaced(node, DEFINITIONS)),
        }
    }

    fn to_selection(self) -> Result<Selection<'a>> {
        match self {
            QueryNode::Field(field) => Ok(Selection::Field(*field)),
            QueryNode::FragmentSpread(spread) => Ok(Selection::FragmentSpread(*spread)),
            QueryNode::InlineFragment(fragment) => Ok(Selection::InlineFragment(*fragment)),
            node => Err(misplaced(node, SELECTIONS)),
        }
    }

    fn to_variable_definition(self) -> Result<VariableDefinition<'a>> {
        match self {
            QueryNode::VariableDefinition(definition) => Ok(*definition),
            node => Err(misplaced(node, VARIABLE_DEFINITIONS)),
        }
    }

    fn to_directive(self) -> Result<Directive<'a>> {
        match self {
            QueryNode::Directive(directive) => Ok(*directive),
            node => Err(misplaced(node, DIRECTIVES)),
        }
    }

    fn to_argument(self) -> Result<Argument<'a>> {
        match self {
            QueryNode::Argument(argument) => Ok(*argument),
            node => Err(misplaced(node, ARGUMENTS)),
        }
    }
}

fn misplaced(node: QueryNode<'_>, role: Role) -> Error {
    Error::adapter(format!("{} can't be placed in {}", node.kind(), role))
}

impl<'a> TreeNode for QueryNode<'a> {
    fn node_id(&self) -> NodeId {
        match *self {
            QueryNode::Document(node) => NodeId::of(node),
            QueryNode::Operation(node) => NodeId::of(node),
            QueryNode::Fragment(node) => NodeId::of(node),
            QueryNode::VariableDefinition(node) => NodeId::of(node),
            QueryNode::Field(node) => NodeId::of(node),
            QueryNode::FragmentSpread(node) => NodeId::of(node),
            QueryNode::InlineFragment(node) => NodeId::of(node),
            QueryNode::Directive(node) => NodeId::of(node),
            QueryNode::Argument(node) => NodeId::of(node),
        }
    }
}

impl<'a> From<&'a Document<'a>> for QueryNode<'a> {
    #[inline]
    fn from(document: &'a Document<'a>) -> Self {
        QueryNode::Document(document)
    }
}

impl<'a> From<&'a OperationDefinition<'a>> for QueryNode<'a> {
    #[inline]
    fn from(operation: &'a OperationDefinition<'a>) -> Self {
        QueryNode::Operation(operation)
    }
}

impl<'a> From<&'a Definition<'a>> for QueryNode<'a> {
    #[inline]
    fn from(definition: &'a Definition<'a>) -> Self {
        match definition {
            Definition::Operation(operation) => QueryNode::Operation(operation),
            Definition::Fragment(fragment) => QueryNode::Fragment(fragment),
        }
    }
}

impl<'a> From<&'a Selection<'a>> for QueryNode<'a> {
    #[inline]
    fn from(selection: &'a Selection<'a>) -> Self {
        match selection {
            Selection::Field(field) => QueryNode::Field(field),
            Selection::FragmentSpread(spread) => QueryNode::FragmentSpread(spread),
            Selection::InlineFragment(fragment) => QueryNode::InlineFragment(fragment),
        }
    }
}

/// Rebuilds query AST nodes by allocating them into an [`ASTContext`].
///
/// Rebuilt nodes are shallow copies of the originals: every field that isn't a replaced child
/// list still points at the original allocation.
#[derive(Clone, Copy)]
pub struct QueryNodeAdapter<'a> {
    ctx: &'a ASTContext,
}

impl<'a> QueryNodeAdapter<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext) -> Self {
        QueryNodeAdapter { ctx }
    }

    fn alloc_list<T>(
        &self,
        list: Vec<QueryNode<'a>>,
        convert: fn(QueryNode<'a>) -> Result<T>,
    ) -> Result<&'a [T]> {
        let items = list.into_iter().map(convert).collect::<Result<Vec<T>>>()?;
        Ok(self.ctx.alloc_slice(items))
    }
}

impl<'a> NodeAdapter<QueryNode<'a>> for QueryNodeAdapter<'a> {
    #[inline]
    fn named_children(&self, node: &QueryNode<'a>) -> NamedChildren<QueryNode<'a>> {
        node.children()
    }

    fn with_new_children(
        &self,
        node: &QueryNode<'a>,
        children: NamedChildren<QueryNode<'a>>,
    ) -> Result<QueryNode<'a>> {
        let ctx = self.ctx;
        let unexpected = |role: Role| {
            Error::adapter(format!("A {} has no children under {}", node.kind(), role))
        };
        match *node {
            QueryNode::Document(document) => {
                let mut document = *document;
                for (role, list) in children {
                    match role {
                        DEFINITIONS => {
                            document.definitions = self.alloc_list(list, QueryNode::to_definition)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::Document(ctx.alloc(document)))
            }
            QueryNode::Operation(operation) => {
                let mut operation = *operation;
                for (role, list) in children {
                    match role {
                        VARIABLE_DEFINITIONS => {
                            operation.variable_definitions.children =
                                self.alloc_list(list, QueryNode::to_variable_definition)?
                        }
                        DIRECTIVES => {
                            operation.directives.children =
                                self.alloc_list(list, QueryNode::to_directive)?
                        }
                        SELECTIONS => {
                            operation.selection_set.selections =
                                self.alloc_list(list, QueryNode::to_selection)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::Operation(ctx.alloc(operation)))
            }
            QueryNode::Fragment(fragment) => {
                let mut fragment = *fragment;
                for (role, list) in children {
                    match role {
                        DIRECTIVES => {
                            fragment.directives.children =
                                self.alloc_list(list, QueryNode::to_directive)?
                        }
                        SELECTIONS => {
                            fragment.selection_set.selections =
                                self.alloc_list(list, QueryNode::to_selection)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::Fragment(ctx.alloc(fragment)))
            }
            QueryNode::VariableDefinition(definition) => {
                let mut definition = *definition;
                for (role, list) in children {
                    match role {
                        DIRECTIVES => {
                            definition.directives.children =
                                self.alloc_list(list, QueryNode::to_directive)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::VariableDefinition(ctx.alloc(definition)))
            }
            QueryNode::Field(field) => {
                let mut field = *field;
                for (role, list) in children {
                    match role {
                        ARGUMENTS => {
                            field.arguments.children =
                                self.alloc_list(list, QueryNode::to_argument)?
                        }
                        DIRECTIVES => {
                            field.directives.children =
                                self.alloc_list(list, QueryNode::to_directive)?
                        }
                        SELECTIONS => {
                            field.selection_set.selections =
                                self.alloc_list(list, QueryNode::to_selection)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::Field(ctx.alloc(field)))
            }
            QueryNode::FragmentSpread(spread) => {
                let mut spread = *spread;
                for (role, list) in children {
                    match role {
                        DIRECTIVES => {
                            spread.directives.children =
                                self.alloc_list(list, QueryNode::to_directive)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::FragmentSpread(ctx.alloc(spread)))
            }
            QueryNode::InlineFragment(fragment) => {
                let mut fragment = *fragment;
                for (role, list) in children {
                    match role {
                        DIRECTIVES => {
                            fragment.directives.children =
                                self.alloc_list(list, QueryNode::to_directive)?
                        }
                        SELECTIONS => {
                            fragment.selection_set.selections =
                                self.alloc_list(list, QueryNode::to_selection)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::InlineFragment(ctx.alloc(fragment)))
            }
            QueryNode::Directive(directive) => {
                let mut directive = *directive;
                for (role, list) in children {
                    match role {
                        ARGUMENTS => {
                            directive.arguments.children =
                                self.alloc_list(list, QueryNode::to_argument)?
                        }
                        role => return Err(unexpected(role)),
                    }
                }
                Ok(QueryNode::Directive(ctx.alloc(directive)))
            }
            QueryNode::Argument(argument) => match children.into_iter().next() {
                Some((role, _)) => Err(unexpected(role)),
                None => Ok(QueryNode::Argument(argument)),
            },
        }
    }
}
