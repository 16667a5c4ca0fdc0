use crate::ast::*;
use serde_json::{Map as JSMap, Value as JSValue};

/// Trait for converting AST Value Nodes of a GraphQL language document to [serde_json::Value]s.
pub trait ValueFromNode<'a> {
    /// Convert current AST Value Node to a [serde_json::Value] with given [Variables].
    fn to_json(&self, variables: Option<&Variables<'a>>) -> JSValue;
}

impl<'a> ValueFromNode<'a> for Value<'a> {
    fn to_json(&self, variables: Option<&Variables<'a>>) -> JSValue {
        match self {
            Value::Variable(var) => var.to_json(variables),
            Value::List(list) => list.to_json(variables),
            Value::Object(obj) => obj.to_json(variables),
            Value::Int(node) => node.to_json(variables),
            Value::Float(node) => node.to_json(variables),
            Value::Boolean(node) => node.to_json(variables),
            Value::String(node) => node.to_json(variables),
            Value::Enum(node) => node.to_json(variables),
            Value::Null => JSValue::Null,
        }
    }
}

impl<'a> ValueFromNode<'a> for IntValue<'a> {
    /// Integers that don't fit into an `i64` are kept as strings.
    #[inline]
    fn to_json(&self, _variables: Option<&Variables<'a>>) -> JSValue {
        match self.value.parse::<i64>() {
            Ok(value) => value.into(),
            Err(_) => self.value.into(),
        }
    }
}

impl<'a> ValueFromNode<'a> for FloatValue<'a> {
    #[inline]
    fn to_json(&self, _variables: Option<&Variables<'a>>) -> JSValue {
        match self.value.parse::<f64>() {
            Ok(value) => value.into(),
            Err(_) => self.value.into(),
        }
    }
}

impl<'a> ValueFromNode<'a> for BooleanValue {
    #[inline]
    fn to_json(&self, _variables: Option<&Variables<'a>>) -> JSValue {
        self.value.into()
    }
}

impl<'a> ValueFromNode<'a> for StringValue<'a> {
    #[inline]
    fn to_json(&self, _variables: Option<&Variables<'a>>) -> JSValue {
        self.value.into()
    }
}

impl<'a> ValueFromNode<'a> for EnumValue<'a> {
    #[inline]
    fn to_json(&self, _variables: Option<&Variables<'a>>) -> JSValue {
        self.value.into()
    }
}

impl<'a> ValueFromNode<'a> for Variable<'a> {
    /// Variables are replaced with their values, and missing variables become `null`.
    #[inline]
    fn to_json(&self, variables: Option<&Variables<'a>>) -> JSValue {
        variables
            .and_then(|vars| vars.get(self.name))
            .map(|value| value.to_json(None))
            .unwrap_or(JSValue::Null)
    }
}

impl<'a> ValueFromNode<'a> for ListValue<'a> {
    fn to_json(&self, variables: Option<&Variables<'a>>) -> JSValue {
        self.children
            .iter()
            .map(|value| value.to_json(variables))
            .collect::<Vec<JSValue>>()
            .into()
    }
}

impl<'a> ValueFromNode<'a> for ObjectValue<'a> {
    fn to_json(&self, variables: Option<&Variables<'a>>) -> JSValue {
        self.children
            .iter()
            .map(|field| (field.name.to_string(), field.value.to_json(variables)))
            .collect::<JSMap<String, JSValue>>()
            .into()
    }
}

/// Convert the arguments of a field or directive to a [serde_json::Value] object.
pub fn arguments_to_json<'a>(
    arguments: &Arguments<'a>,
    variables: Option<&Variables<'a>>,
) -> JSValue {
    arguments
        .children
        .iter()
        .map(|argument| (argument.name.to_string(), argument.value.to_json(variables)))
        .collect::<JSMap<String, JSValue>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_with_variables() {
        let ctx = ASTContext::new();
        let mut variables = Variables::new();
        variables.insert("id", Value::String("abc".into()));
        let arguments = Arguments::new(
            &ctx,
            [
                Argument::new("id", Value::Variable(Variable { name: "id" })),
                Argument::new("missing", Value::Variable(Variable { name: "nope" })),
                Argument::new("order", Value::Enum(EnumValue { value: "ASC" })),
                Argument::new(
                    "range",
                    Value::List(ListValue {
                        children: ctx.alloc_slice([
                            Value::Int(IntValue { value: "1" }),
                            Value::Float(FloatValue { value: "2.5" }),
                        ]),
                    }),
                ),
            ],
        );
        assert_eq!(
            arguments_to_json(&arguments, Some(&variables)),
            json!({ "id": "abc", "missing": null, "order": "ASC", "range": [1, 2.5] })
        );
    }

    #[test]
    fn large_integers_stay_strings() {
        let value = Value::Int(IntValue {
            value: "123456789012345678901234567890",
        });
        assert_eq!(value.to_json(None), json!("123456789012345678901234567890"));
    }
}
