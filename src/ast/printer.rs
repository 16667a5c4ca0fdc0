use super::ast::*;
use super::node::QueryNode;
use std::{fmt, fmt::Write};

/// Trait for printing AST Nodes to a new String allocated on the heap.
///
/// Nodes are printed compactly onto a single line, with selection sets written as
/// `{ a b { c } }`, which keeps printed documents easy to compare after a transformation.
pub trait PrintNode {
    /// Write an AST node to a buffer implementing the [Write] trait.
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result;

    /// Print an AST Node to source text as a String allocated on the heap.
    fn print(&self) -> String {
        let mut buf = String::new();
        match self.write_to_buffer(&mut buf) {
            Ok(()) => buf,
            _ => String::new(),
        }
    }
}

impl fmt::Display for dyn PrintNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to_buffer(f)
    }
}

fn write_joined<T: PrintNode>(items: &[T], separator: &str, buffer: &mut dyn Write) -> fmt::Result {
    let mut first = true;
    for item in items {
        if first {
            first = false;
        } else {
            buffer.write_str(separator)?;
        }
        item.write_to_buffer(buffer)?;
    }
    Ok(())
}

impl<'a> PrintNode for NamedType<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        buffer.write_str(self.name)
    }
}

impl<'a> PrintNode for Variable<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        write!(buffer, "${}", self.name)
    }
}

impl<'a> PrintNode for StringValue<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        buffer.write_char('"')?;
        for c in self.value.chars() {
            match c {
                '\r' => buffer.write_str(r"\r")?,
                '\n' => buffer.write_str(r"\n")?,
                '\t' => buffer.write_str(r"\t")?,
                '"' => buffer.write_str("\\\"")?,
                '\\' => buffer.write_str(r"\\")?,
                '\u{0020}'..='\u{FFFF}' => buffer.write_char(c)?,
                _ => write!(buffer, "\\u{:04x}", c as u32)?,
            };
        }
        buffer.write_char('"')
    }
}

impl<'a> PrintNode for Value<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        match self {
            Value::Boolean(BooleanValue { value: true }) => buffer.write_str("true"),
            Value::Boolean(BooleanValue { value: false }) => buffer.write_str("false"),
            Value::Enum(EnumValue { value })
            | Value::Float(FloatValue { value })
            | Value::Int(IntValue { value }) => buffer.write_str(value),
            Value::String(value) => value.write_to_buffer(buffer),
            Value::Variable(value) => value.write_to_buffer(buffer),
            Value::Object(value) => {
                buffer.write_char('{')?;
                write_joined(value.children, ", ", buffer)?;
                buffer.write_char('}')
            }
            Value::List(value) => {
                buffer.write_char('[')?;
                write_joined(value.children, ", ", buffer)?;
                buffer.write_char(']')
            }
            Value::Null => buffer.write_str("null"),
        }
    }
}

impl<'a> PrintNode for ObjectField<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        write!(buffer, "{}: ", self.name)?;
        self.value.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for Argument<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        write!(buffer, "{}: ", self.name)?;
        self.value.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for Arguments<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        buffer.write_char('(')?;
        write_joined(self.children, ", ", buffer)?;
        buffer.write_char(')')
    }
}

impl<'a> PrintNode for Directive<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        write!(buffer, "@{}", self.name)?;
        self.arguments.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for Directives<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        for directive in self.children {
            buffer.write_char(' ')?;
            directive.write_to_buffer(buffer)?;
        }
        Ok(())
    }
}

impl<'a> PrintNode for SelectionSet<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        buffer.write_str("{ ")?;
        write_joined(self.selections, " ", buffer)?;
        buffer.write_str(" }")
    }
}

impl<'a> PrintNode for Selection<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        match self {
            Selection::Field(field) => field.write_to_buffer(buffer),
            Selection::FragmentSpread(spread) => spread.write_to_buffer(buffer),
            Selection::InlineFragment(inline) => inline.write_to_buffer(buffer),
        }
    }
}

impl<'a> PrintNode for Field<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        if let Some(alias) = self.alias {
            write!(buffer, "{}: {}", alias, self.name)?;
        } else {
            buffer.write_str(self.name)?;
        };
        self.arguments.write_to_buffer(buffer)?;
        self.directives.write_to_buffer(buffer)?;
        if !self.selection_set.is_empty() {
            buffer.write_char(' ')?;
        };
        self.selection_set.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for FragmentSpread<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        buffer.write_str("...")?;
        self.name.write_to_buffer(buffer)?;
        self.directives.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for InlineFragment<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        buffer.write_str("...")?;
        if let Some(name) = &self.type_condition {
            buffer.write_str(" on ")?;
            name.write_to_buffer(buffer)?;
        };
        self.directives.write_to_buffer(buffer)?;
        buffer.write_char(' ')?;
        self.selection_set.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for Type<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        match self {
            Type::NamedType(name) => name.write_to_buffer(buffer),
            Type::ListType(inner) => {
                buffer.write_char('[')?;
                inner.write_to_buffer(buffer)?;
                buffer.write_char(']')
            }
            Type::NonNullType(inner) => {
                inner.write_to_buffer(buffer)?;
                buffer.write_char('!')
            }
        }
    }
}

impl<'a> PrintNode for VariableDefinition<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        self.variable.write_to_buffer(buffer)?;
        buffer.write_str(": ")?;
        self.of_type.write_to_buffer(buffer)?;
        if self.default_value != Value::Null {
            buffer.write_str(" = ")?;
            self.default_value.write_to_buffer(buffer)?;
        }
        self.directives.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for VariableDefinitions<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        buffer.write_char('(')?;
        write_joined(self.children, ", ", buffer)?;
        buffer.write_char(')')
    }
}

impl<'a> PrintNode for FragmentDefinition<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        buffer.write_str("fragment ")?;
        self.name.write_to_buffer(buffer)?;
        buffer.write_str(" on ")?;
        self.type_condition.write_to_buffer(buffer)?;
        self.directives.write_to_buffer(buffer)?;
        buffer.write_char(' ')?;
        self.selection_set.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for OperationDefinition<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        if self.operation == OperationKind::Query
            && self.name.is_none()
            && self.variable_definitions.is_empty()
            && self.directives.is_empty()
        {
            return self.selection_set.write_to_buffer(buffer);
        }
        match self.operation {
            OperationKind::Query => buffer.write_str("query")?,
            OperationKind::Mutation => buffer.write_str("mutation")?,
            OperationKind::Subscription => buffer.write_str("subscription")?,
        };
        if let Some(name) = &self.name {
            buffer.write_char(' ')?;
            name.write_to_buffer(buffer)?;
        } else if !self.variable_definitions.is_empty() {
            buffer.write_char(' ')?;
        }
        self.variable_definitions.write_to_buffer(buffer)?;
        self.directives.write_to_buffer(buffer)?;
        buffer.write_char(' ')?;
        self.selection_set.write_to_buffer(buffer)
    }
}

impl<'a> PrintNode for Definition<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        match self {
            Definition::Operation(operation) => operation.write_to_buffer(buffer),
            Definition::Fragment(fragment) => fragment.write_to_buffer(buffer),
        }
    }
}

impl<'a> PrintNode for Document<'a> {
    #[inline]
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        write_joined(self.definitions, " ", buffer)
    }
}

impl<'a> PrintNode for QueryNode<'a> {
    fn write_to_buffer(&self, buffer: &mut dyn Write) -> fmt::Result {
        match self {
            QueryNode::Document(node) => node.write_to_buffer(buffer),
            QueryNode::Operation(node) => node.write_to_buffer(buffer),
            QueryNode::Fragment(node) => node.write_to_buffer(buffer),
            QueryNode::VariableDefinition(node) => node.write_to_buffer(buffer),
            QueryNode::Field(node) => node.write_to_buffer(buffer),
            QueryNode::FragmentSpread(node) => node.write_to_buffer(buffer),
            QueryNode::InlineFragment(node) => node.write_to_buffer(buffer),
            QueryNode::Directive(node) => node.write_to_buffer(buffer),
            QueryNode::Argument(node) => node.write_to_buffer(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn values() {
        let ctx = ASTContext::new();
        let object = Value::Object(ObjectValue {
            children: ctx.alloc_slice([
                ObjectField {
                    name: "a",
                    value: Value::Boolean(true.into()),
                },
                ObjectField {
                    name: "b",
                    value: Value::List(ListValue {
                        children: ctx.alloc_slice([
                            Value::Int(IntValue { value: "1" }),
                            Value::Float(FloatValue { value: "2.5e3" }),
                        ]),
                    }),
                },
            ]),
        });
        assert_eq!(object.print(), "{a: true, b: [1, 2.5e3]}");
        assert_eq!(Value::Null.print(), "null");
        assert_eq!(Value::Variable(Variable { name: "x" }).print(), "$x");
    }

    #[test]
    fn strings() {
        assert_eq!(Value::String("\u{1}".into()).print(), "\"\\u0001\"");
        assert_eq!(Value::String("\0".into()).print(), "\"\\u0000\"");
        assert_eq!(Value::String("a\"b\n".into()).print(), "\"a\\\"b\\n\"");
    }

    #[test]
    fn fields() {
        let ctx = ASTContext::new();
        let field = Field::new_aliased_leaf("alias", "field")
            .with_arguments(&ctx, [Argument::new("test", Value::Boolean(true.into()))])
            .with_directives(&ctx, [Directive::new("test", Arguments::default())])
            .with_selections(&ctx, [Field::new_leaf("child").into()]);
        assert_eq!(field.print(), "alias: field(test: true) @test { child }");
    }

    #[test]
    fn fragments() {
        let ctx = ASTContext::new();
        let spread: Selection = FragmentSpread::new("Frag").into();
        let inline: Selection =
            InlineFragment::new(&ctx, Some("Type"), [Field::new_leaf("b").into()]).into();
        let fragment =
            FragmentDefinition::new(&ctx, "Frag", "Query", [Field::new_leaf("a").into()]);
        assert_eq!(spread.print(), "...Frag");
        assert_eq!(inline.print(), "... on Type { b }");
        assert_eq!(fragment.print(), "fragment Frag on Query { a }");
    }

    #[test]
    fn operations() {
        let ctx = ASTContext::new();
        let selections = [Field::new_leaf("a")
            .with_selections(&ctx, [Field::new_leaf("b").into()])
            .into()];
        let anonymous = OperationDefinition::new(&ctx, OperationKind::Query, None, selections);
        assert_eq!(anonymous.print(), "{ a { b } }");

        let of_type = Type::named("Int").into_nonnull(&ctx).into_list(&ctx);
        let named = OperationDefinition::new(&ctx, OperationKind::Mutation, Some("M"), selections)
            .with_variable_definitions(&ctx, [VariableDefinition::new("x", of_type)]);
        assert_eq!(named.print(), "mutation M($x: [Int!]) { a { b } }");

        let document = Document::new(&ctx, [anonymous.into(), named.into()]);
        assert_eq!(
            document.print(),
            "{ a { b } } mutation M($x: [Int!]) { a { b } }"
        );
    }
}
