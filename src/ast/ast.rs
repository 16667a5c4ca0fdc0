use crate::error::{Error, ErrorType, Result};
use bumpalo::collections::CollectIn;
use hashbrown::HashMap;

/// A context for a GraphQL document which holds an arena allocator.
///
/// All nodes of a document, as well as every node that a transformation creates, are allocated
/// into this arena and live exactly as long as the context. Once a request has been processed the
/// whole context is dropped at once, so it shouldn't be reused across requests.
pub struct ASTContext {
    /// An arena allocator that holds the memory allocated for the AST Context's lifetime
    pub arena: bumpalo::Bump,
}

impl ASTContext {
    pub fn new() -> Self {
        ASTContext {
            arena: bumpalo::Bump::new(),
        }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Allocate an `&str` slice onto the arena and return a reference to it.
    #[inline]
    pub fn alloc_str(&self, str: &str) -> &str {
        self.arena.alloc_str(str)
    }

    /// Puts a `String` onto the arena and returns a reference to it to tie the `String`'s lifetime
    /// to this AST context.
    #[inline]
    pub fn alloc_string(&self, str: String) -> &str {
        self.arena.alloc(str)
    }

    /// Collects `items` into a slice on the arena.
    ///
    /// Child lists of AST nodes are arena slices, which unlike growable arena vectors may be
    /// shared between threads.
    #[inline]
    pub fn alloc_slice<T, I: IntoIterator<Item = T>>(&self, items: I) -> &[T] {
        items
            .into_iter()
            .collect_in::<bumpalo::collections::Vec<T>>(&self.arena)
            .into_bump_slice()
    }
}

impl Default for ASTContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Map of AST Values for GraphQL Variables
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Coercing-Variable-Values)
pub type Variables<'a> = HashMap<&'a str, Value<'a>>;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct BooleanValue {
    pub value: bool,
}

impl From<bool> for BooleanValue {
    #[inline]
    fn from(value: bool) -> Self {
        BooleanValue { value }
    }
}

/// AST Node of a variable identifier value, written with a `$` prefix.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Variables)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Variable<'a> {
    pub name: &'a str,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct EnumValue<'a> {
    pub value: &'a str,
}

/// AST Node of an integer value. Values are kept as source text.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct IntValue<'a> {
    pub value: &'a str,
}

/// AST Node of a floating point value. Values are kept as source text and compared as such.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct FloatValue<'a> {
    pub value: &'a str,
}

/// AST Node of a string value, stored without escape sequences.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct StringValue<'a> {
    pub value: &'a str,
}

impl<'a> From<&'a str> for StringValue<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        StringValue { value }
    }
}

/// AST Node of possible input values in GraphQL.
///
/// Fields and Directives accept input values as arguments.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Values)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Value<'a> {
    Variable(Variable<'a>),
    String(StringValue<'a>),
    Float(FloatValue<'a>),
    Int(IntValue<'a>),
    Boolean(BooleanValue),
    Enum(EnumValue<'a>),
    List(ListValue<'a>),
    Object(ObjectValue<'a>),
    /// Representing JSON-like `null` values or the absence of a value
    Null,
}

impl<'a> Value<'a> {
    /// Returns the value itself, or the value of the variable it refers to.
    ///
    /// Missing variables resolve to `Value::Null`.
    pub fn resolve(&self, variables: Option<&Variables<'a>>) -> Value<'a> {
        match self {
            Value::Variable(var) => variables
                .and_then(|vars| vars.get(var.name))
                .copied()
                .unwrap_or(Value::Null),
            value => *value,
        }
    }

    /// Parses an `Int` value, resolving variables first.
    pub fn as_int(&self, variables: Option<&Variables<'a>>) -> Option<i64> {
        match self.resolve(variables) {
            Value::Int(IntValue { value }) => value.parse::<i64>().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct ListValue<'a> {
    pub children: &'a [Value<'a>],
}

impl<'a> ListValue<'a> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ObjectField<'a> {
    pub name: &'a str,
    pub value: Value<'a>,
}

/// AST Node for an Object value, an unordered list of keyed input values.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct ObjectValue<'a> {
    pub children: &'a [ObjectField<'a>],
}

impl<'a> ObjectValue<'a> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for an Argument, which carries a name and a value.
///
/// [Reference](https://spec.graphql.org/October2021/#Argument)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Argument<'a> {
    pub name: &'a str,
    pub value: Value<'a>,
}

impl<'a> Argument<'a> {
    #[inline]
    pub fn new(name: &'a str, value: Value<'a>) -> Self {
        Argument { name, value }
    }
}

/// AST Node for a list of Arguments of a field or a directive.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Arguments<'a> {
    pub children: &'a [Argument<'a>],
}

impl<'a> Arguments<'a> {
    pub fn new<I: IntoIterator<Item = Argument<'a>>>(ctx: &'a ASTContext, arguments: I) -> Self {
        Arguments {
            children: ctx.alloc_slice(arguments),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the value of the argument called `name`.
    pub fn get(&self, name: &str) -> Option<&'a Value<'a>> {
        self.children
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

/// AST Node for a GraphQL Directive, e.g. `@skip` or `@include`.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Directives)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Directive<'a> {
    pub name: &'a str,
    pub arguments: Arguments<'a>,
}

impl<'a> Directive<'a> {
    #[inline]
    pub fn new(name: &'a str, arguments: Arguments<'a>) -> Self {
        Directive { name, arguments }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Directives<'a> {
    pub children: &'a [Directive<'a>],
}

impl<'a> Directives<'a> {
    pub fn new<I: IntoIterator<Item = Directive<'a>>>(ctx: &'a ASTContext, directives: I) -> Self {
        Directives {
            children: ctx.alloc_slice(directives),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for Selection Sets, which select information on a parent.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Selection-Sets)
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct SelectionSet<'a> {
    pub selections: &'a [Selection<'a>],
}

impl<'a> SelectionSet<'a> {
    pub fn new<I: IntoIterator<Item = Selection<'a>>>(ctx: &'a ASTContext, selections: I) -> Self {
        SelectionSet {
            selections: ctx.alloc_slice(selections),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// AST Node for Fields, which can be likened to functions or properties on a parent object.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fields)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Field<'a> {
    /// A Field's `alias`, which is used to request information under a different name than the
    /// Field's `name`.
    pub alias: Option<&'a str>,
    pub name: &'a str,
    /// Arguments that are passed to a Field, which may be an empty list.
    pub arguments: Arguments<'a>,
    pub directives: Directives<'a>,
    /// The sub-selections of this field, which is empty for fields of scalar types.
    pub selection_set: SelectionSet<'a>,
}

impl<'a> Field<'a> {
    /// Get the alias of the field, if present, otherwise get the name.
    #[inline]
    pub fn alias_or_name(&self) -> &'a str {
        self.alias.unwrap_or(self.name)
    }

    /// Creates a new leaf field with the given `name` and without arguments or directives.
    #[inline]
    pub fn new_leaf(name: &'a str) -> Self {
        Field {
            alias: None,
            name,
            arguments: Arguments::default(),
            directives: Directives::default(),
            selection_set: SelectionSet::default(),
        }
    }

    #[inline]
    pub fn new_aliased_leaf(alias: &'a str, name: &'a str) -> Self {
        Field {
            alias: Some(alias),
            ..Field::new_leaf(name)
        }
    }

    /// Returns a copy of this field with the given sub-selections.
    pub fn with_selections<I>(self, ctx: &'a ASTContext, selections: I) -> Self
    where
        I: IntoIterator<Item = Selection<'a>>,
    {
        Field {
            selection_set: SelectionSet::new(ctx, selections),
            ..self
        }
    }

    pub fn with_arguments<I>(self, ctx: &'a ASTContext, arguments: I) -> Self
    where
        I: IntoIterator<Item = Argument<'a>>,
    {
        Field {
            arguments: Arguments::new(ctx, arguments),
            ..self
        }
    }
}

/// AST Node for a Fragment Spread, which refers to a [`FragmentDefinition`] by name.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FragmentSpread<'a> {
    pub name: NamedType<'a>,
    pub directives: Directives<'a>,
}

impl<'a> FragmentSpread<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        FragmentSpread {
            name: NamedType { name },
            directives: Directives::default(),
        }
    }
}

/// AST Node for an inline Fragment, which is applied when its optional type condition matches.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct InlineFragment<'a> {
    pub type_condition: Option<NamedType<'a>>,
    pub directives: Directives<'a>,
    pub selection_set: SelectionSet<'a>,
}

impl<'a> InlineFragment<'a> {
    pub fn new<I>(ctx: &'a ASTContext, type_condition: Option<&'a str>, selections: I) -> Self
    where
        I: IntoIterator<Item = Selection<'a>>,
    {
        InlineFragment {
            type_condition: type_condition.map(|name| NamedType { name }),
            directives: Directives::default(),
            selection_set: SelectionSet::new(ctx, selections),
        }
    }
}

/// AST Node of a selection as contained inside a [`SelectionSet`].
///
/// [Reference](https://spec.graphql.org/October2021/#Selection)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Selection<'a> {
    Field(Field<'a>),
    FragmentSpread(FragmentSpread<'a>),
    InlineFragment(InlineFragment<'a>),
}

impl<'a> Selection<'a> {
    #[inline]
    pub fn field(&self) -> Option<&Field<'a>> {
        match self {
            Selection::Field(field) => Some(field),
            _ => None,
        }
    }

    #[inline]
    pub fn fragment_spread(&self) -> Option<&FragmentSpread<'a>> {
        match self {
            Selection::FragmentSpread(spread) => Some(spread),
            _ => None,
        }
    }

    #[inline]
    pub fn inline_fragment(&self) -> Option<&InlineFragment<'a>> {
        match self {
            Selection::InlineFragment(fragment) => Some(fragment),
            _ => None,
        }
    }
}

impl<'a> From<Field<'a>> for Selection<'a> {
    #[inline]
    fn from(field: Field<'a>) -> Self {
        Selection::Field(field)
    }
}

impl<'a> From<FragmentSpread<'a>> for Selection<'a> {
    #[inline]
    fn from(spread: FragmentSpread<'a>) -> Self {
        Selection::FragmentSpread(spread)
    }
}

impl<'a> From<InlineFragment<'a>> for Selection<'a> {
    #[inline]
    fn from(fragment: InlineFragment<'a>) -> Self {
        Selection::InlineFragment(fragment)
    }
}

/// AST Node for a type name, used wherever the AST refers to an object type, input type,
/// fragment name, or operation name.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct NamedType<'a> {
    pub name: &'a str,
}

/// AST Node for a type reference of a [`VariableDefinition`].
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Type-References)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Type<'a> {
    NamedType(NamedType<'a>),
    ListType(&'a Type<'a>),
    NonNullType(&'a Type<'a>),
}

impl<'a> Type<'a> {
    #[inline]
    pub fn named(name: &'a str) -> Self {
        Type::NamedType(NamedType { name })
    }

    /// Wraps this type in a list type.
    #[inline]
    pub fn into_list(self, ctx: &'a ASTContext) -> Type<'a> {
        Type::ListType(ctx.alloc(self))
    }

    /// Wraps this type in a non-null type.
    #[inline]
    pub fn into_nonnull(self, ctx: &'a ASTContext) -> Type<'a> {
        Type::NonNullType(ctx.alloc(self))
    }

    /// Unwraps a Type recursively and returns the `NamedType` that is contained within its
    /// wrappers.
    pub fn of_type(&self) -> &NamedType<'a> {
        match self {
            Type::NamedType(of_type) => of_type,
            Type::ListType(inner) | Type::NonNullType(inner) => inner.of_type(),
        }
    }
}

/// AST Node for a variable definition of an operation.
///
/// [Reference](https://spec.graphql.org/October2021/#VariableDefinition)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct VariableDefinition<'a> {
    pub variable: Variable<'a>,
    pub of_type: Type<'a>,
    /// The value used when the variable isn't passed, which is `Value::Null` when there's no
    /// default value.
    pub default_value: Value<'a>,
    pub directives: Directives<'a>,
}

impl<'a> VariableDefinition<'a> {
    #[inline]
    pub fn new(name: &'a str, of_type: Type<'a>) -> Self {
        VariableDefinition {
            variable: Variable { name },
            of_type,
            default_value: Value::Null,
            directives: Directives::default(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct VariableDefinitions<'a> {
    pub children: &'a [VariableDefinition<'a>],
}

impl<'a> VariableDefinitions<'a> {
    pub fn new<I>(ctx: &'a ASTContext, definitions: I) -> Self
    where
        I: IntoIterator<Item = VariableDefinition<'a>>,
    {
        VariableDefinitions {
            children: ctx.alloc_slice(definitions),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for a Fragment definition, which is applied wherever a [`FragmentSpread`] refers to
/// it by name.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FragmentDefinition<'a> {
    pub name: NamedType<'a>,
    pub type_condition: NamedType<'a>,
    pub directives: Directives<'a>,
    pub selection_set: SelectionSet<'a>,
}

impl<'a> FragmentDefinition<'a> {
    pub fn new<I>(
        ctx: &'a ASTContext,
        name: &'a str,
        type_condition: &'a str,
        selections: I,
    ) -> Self
    where
        I: IntoIterator<Item = Selection<'a>>,
    {
        FragmentDefinition {
            name: NamedType { name },
            type_condition: NamedType {
                name: type_condition,
            },
            directives: Directives::default(),
            selection_set: SelectionSet::new(ctx, selections),
        }
    }
}

/// The kind of an [`OperationDefinition`].
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Operations)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// AST Node for an Operation Definition, which defines the entrypoint for GraphQL's execution.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Operations)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct OperationDefinition<'a> {
    pub operation: OperationKind,
    /// The operation's name, which may only be omitted when a document contains a single
    /// operation.
    pub name: Option<NamedType<'a>>,
    pub variable_definitions: VariableDefinitions<'a>,
    pub directives: Directives<'a>,
    pub selection_set: SelectionSet<'a>,
}

impl<'a> OperationDefinition<'a> {
    pub fn new<I>(
        ctx: &'a ASTContext,
        operation: OperationKind,
        name: Option<&'a str>,
        selections: I,
    ) -> Self
    where
        I: IntoIterator<Item = Selection<'a>>,
    {
        OperationDefinition {
            operation,
            name: name.map(|name| NamedType { name }),
            variable_definitions: VariableDefinitions::default(),
            directives: Directives::default(),
            selection_set: SelectionSet::new(ctx, selections),
        }
    }

    pub fn with_variable_definitions<I>(self, ctx: &'a ASTContext, definitions: I) -> Self
    where
        I: IntoIterator<Item = VariableDefinition<'a>>,
    {
        OperationDefinition {
            variable_definitions: VariableDefinitions::new(ctx, definitions),
            ..self
        }
    }
}

/// AST Node for a Definition inside a document.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Definition<'a> {
    Operation(OperationDefinition<'a>),
    Fragment(FragmentDefinition<'a>),
}

impl<'a> Definition<'a> {
    #[inline]
    pub fn operation(&self) -> Option<&OperationDefinition<'a>> {
        match self {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        }
    }

    #[inline]
    pub fn fragment(&self) -> Option<&FragmentDefinition<'a>> {
        match self {
            Definition::Fragment(fragment) => Some(fragment),
            Definition::Operation(_) => None,
        }
    }
}

impl<'a> From<OperationDefinition<'a>> for Definition<'a> {
    #[inline]
    fn from(operation: OperationDefinition<'a>) -> Self {
        Definition::Operation(operation)
    }
}

impl<'a> From<FragmentDefinition<'a>> for Definition<'a> {
    #[inline]
    fn from(fragment: FragmentDefinition<'a>) -> Self {
        Definition::Fragment(fragment)
    }
}

/// AST Root Node for a GraphQL query language document, which contains one or more definitions
/// of fragments or operations.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Document)
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Document<'a> {
    pub definitions: &'a [Definition<'a>],
}

impl<'a> Document<'a> {
    pub fn new<I>(ctx: &'a ASTContext, definitions: I) -> Self
    where
        I: IntoIterator<Item = Definition<'a>>,
    {
        Document {
            definitions: ctx.alloc_slice(definitions),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns all fragment definitions keyed by their names.
    pub fn fragments(&self) -> HashMap<&'a str, &'a FragmentDefinition<'a>> {
        let definitions: &'a [Definition<'a>] = self.definitions;
        definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::Fragment(fragment) => Some((fragment.name.name, fragment)),
                Definition::Operation(_) => None,
            })
            .collect()
    }

    /// Finds an operation definition by name or the single operation contained in the document
    /// when `None` is passed.
    ///
    /// [Reference](https://spec.graphql.org/October2021/#GetOperation())
    pub fn operation(&self, by_name: Option<&str>) -> Result<&'a OperationDefinition<'a>> {
        let definitions: &'a [Definition<'a>] = self.definitions;
        let mut operations = definitions.iter().filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        });
        match by_name {
            Some(by_name) => operations
                .find(|operation| operation.name.map(|name| name.name) == Some(by_name))
                .ok_or_else(|| {
                    Error::new(
                        format!("Operation with name {by_name} does not exist"),
                        Some(ErrorType::GraphQL),
                    )
                }),
            None => match (operations.next(), operations.next()) {
                (Some(operation), None) => Ok(operation),
                (None, _) => Err(Error::new(
                    "Document does not contain any operations",
                    Some(ErrorType::GraphQL),
                )),
                (Some(_), Some(_)) => Err(Error::new(
                    "Document contains more than one operation, missing operation name",
                    Some(ErrorType::GraphQL),
                )),
            },
        }
    }
}

/// Trait implemented by all AST nodes that can have directives attached.
pub trait WithDirectives<'a> {
    fn directives(&self) -> &Directives<'a>;

    /// Returns a copy of this node with the given directives.
    fn with_directives<I>(&self, ctx: &'a ASTContext, directives: I) -> Self
    where
        I: IntoIterator<Item = Directive<'a>>,
        Self: Sized;
}

macro_rules! with_directives {
    ($($for_type:ident),+) => {
        $(
            impl<'a> WithDirectives<'a> for $for_type<'a> {
                #[inline]
                fn directives(&self) -> &Directives<'a> {
                    &self.directives
                }

                fn with_directives<I>(&self, ctx: &'a ASTContext, directives: I) -> Self
                where
                    I: IntoIterator<Item = Directive<'a>>,
                {
                    $for_type {
                        directives: Directives::new(ctx, directives),
                        ..*self
                    }
                }
            }
        )+
    };
}

with_directives!(
    Field,
    FragmentSpread,
    InlineFragment,
    OperationDefinition,
    FragmentDefinition,
    VariableDefinition
);

#[cfg(test)]
mod tests {
    use super::*;

    fn document<'a>(ctx: &'a ASTContext, names: &[Option<&'a str>]) -> Document<'a> {
        Document::new(
            ctx,
            names.iter().map(|name| {
                Definition::from(OperationDefinition::new(
                    ctx,
                    OperationKind::Query,
                    *name,
                    [Field::new_leaf("hello").into()],
                ))
            }),
        )
    }

    #[test]
    fn operation_by_name() {
        let ctx = ASTContext::new();
        let ast = document(&ctx, &[Some("queryName"), Some("otherName")]);
        assert_eq!(
            ast.operation(Some("otherName")).unwrap().name,
            Some(NamedType { name: "otherName" })
        );
        assert_eq!(
            ast.operation(Some("badName")).unwrap_err().message(),
            "Operation with name badName does not exist"
        );
        assert_eq!(
            ast.operation(None).unwrap_err().message(),
            "Document contains more than one operation, missing operation name"
        );
    }

    #[test]
    fn single_anonymous_operation() {
        let ctx = ASTContext::new();
        let ast = document(&ctx, &[None]);
        assert!(ast.operation(None).unwrap().name.is_none());
        assert!(ast.operation(Some("queryName")).is_err());
    }

    #[test]
    fn no_operations() {
        let ctx = ASTContext::new();
        let ast = Document::new(
            &ctx,
            [FragmentDefinition::new(&ctx, "Foo", "Query", [Field::new_leaf("hello").into()])
                .into()],
        );
        assert_eq!(
            ast.operation(None).unwrap_err().message(),
            "Document does not contain any operations"
        );
        assert_eq!(ast.fragments().len(), 1);
        assert_eq!(ast.fragments()["Foo"].type_condition.name, "Query");
    }

    #[test]
    fn arguments_and_types() {
        let ctx = ASTContext::new();
        let field = Field::new_leaf("users").with_arguments(
            &ctx,
            [
                Argument::new("first", Value::Int(IntValue { value: "10" })),
                Argument::new("after", Value::Variable(Variable { name: "cursor" })),
            ],
        );
        assert_eq!(field.arguments.get("first").and_then(|v| v.as_int(None)), Some(10));

        let mut variables = Variables::new();
        variables.insert("cursor", Value::Int(IntValue { value: "3" }));
        assert_eq!(
            field.arguments.get("after").and_then(|v| v.as_int(Some(&variables))),
            Some(3)
        );
        assert!(field.arguments.get("last").is_none());

        let of_type = Type::named("ID").into_nonnull(&ctx).into_list(&ctx);
        assert_eq!(of_type.of_type().name, "ID");
    }
}
