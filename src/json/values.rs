use serde_json::{Map as JSMap, Value as JSValue};

use super::ValueFromNode;
use crate::ast::*;
use crate::error::{Error, ErrorType, Result};

fn non_object_variables() -> Error {
    Error::new(
        "Variables expected but received non-object value",
        Some(ErrorType::GraphQL),
    )
}

/// Convert a [serde_json::Value] object to [Variables] without casting its values.
///
/// `null` is accepted as an empty set of variables, while any other non-object value is rejected.
pub fn variables_from_json<'a>(ctx: &'a ASTContext, input: &JSValue) -> Result<Variables<'a>> {
    match input {
        JSValue::Object(obj) => Ok(obj
            .iter()
            .map(|(name, value)| (ctx.alloc_str(name), ast_from_value_untyped(ctx, value)))
            .collect()),
        JSValue::Null => Ok(Variables::new()),
        _ => Err(non_object_variables()),
    }
}

/// Convert [serde_json::Value] to [Variables] given [VariableDefinitions].
///
/// Every JSON value is cast to the type of its variable definition, and variables that are
/// missing from the input fall back to their default values.
pub fn ast_variables_from_value<'a>(
    ctx: &'a ASTContext,
    input: &JSValue,
    var_defs: &VariableDefinitions<'a>,
) -> Result<Variables<'a>> {
    let mut vars = Variables::new();
    if var_defs.is_empty() {
        return Ok(vars);
    }
    let JSValue::Object(obj) = input else {
        return Err(non_object_variables());
    };
    for var_def in var_defs.children {
        let value = match obj.get(var_def.variable.name) {
            Some(value) => ast_from_value(ctx, value, &var_def.of_type)?,
            None => match (var_def.default_value, var_def.of_type) {
                (Value::List(_) | Value::Null, Type::ListType(_)) => var_def.default_value,
                (default_value, Type::ListType(_)) => Value::List(ListValue {
                    children: ctx.alloc_slice([default_value]),
                }),
                (default_value, _) => default_value,
            },
        };
        vars.insert(var_def.variable.name, value);
    }
    Ok(vars)
}

/// Convert [serde_json::Value] to an AST Value Node given a [Type] definition.
pub fn ast_from_value<'a>(
    ctx: &'a ASTContext,
    value: &JSValue,
    of_type: &Type<'a>,
) -> Result<Value<'a>> {
    match (of_type, value) {
        (Type::ListType(of_type), JSValue::Array(list)) => {
            let children = list
                .iter()
                .map(|value| ast_from_value(ctx, value, of_type))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(ListValue {
                children: ctx.alloc_slice(children),
            }))
        }

        (Type::ListType(_), JSValue::Null) => Ok(Value::Null),

        (Type::ListType(of_type), value) => {
            let child = ast_from_value(ctx, value, of_type)?;
            Ok(Value::List(ListValue {
                children: ctx.alloc_slice([child]),
            }))
        }

        (Type::NonNullType(_), JSValue::Null) => Err(Error::new(
            "Received null for non-nullable type",
            Some(ErrorType::GraphQL),
        )),

        (_, JSValue::Null) => Ok(Value::Null),

        (Type::NonNullType(of_type), value) => ast_from_value(ctx, value, of_type),

        (Type::NamedType(NamedType { name: "Boolean" }), JSValue::Bool(x)) => {
            Ok(Value::Boolean((*x).into()))
        }

        (Type::NamedType(NamedType { name: "Boolean" }), JSValue::Number(num)) => {
            Ok(Value::Boolean((num.as_u64().unwrap_or(0) != 0).into()))
        }

        (Type::NamedType(NamedType { name: "Int" }), JSValue::Number(num)) => num
            .as_i64()
            .map(|x| {
                Value::Int(IntValue {
                    value: ctx.alloc_string(x.to_string()),
                })
            })
            .ok_or_else(|| Error::new("Received Float for Int type", Some(ErrorType::GraphQL))),

        (Type::NamedType(NamedType { name: "Float" }), JSValue::Number(num)) => {
            match num.as_f64().filter(|num| num.is_finite()) {
                Some(num) => Ok(Value::Float(FloatValue {
                    value: ctx.alloc_string(num.to_string()),
                })),
                None => Err(Error::new(
                    "Received non-finite Float for Float type",
                    Some(ErrorType::GraphQL),
                )),
            }
        }

        (
            Type::NamedType(NamedType {
                name: "ID" | "String",
            }),
            JSValue::String(str),
        ) => Ok(Value::String(ctx.alloc_str(str).into())),

        (
            Type::NamedType(NamedType {
                name: "ID" | "String",
            }),
            JSValue::Number(num),
        ) => Ok(Value::String(ctx.alloc_string(num.to_string()).into())),

        (Type::NamedType(_), value) => Ok(ast_from_value_untyped(ctx, value)),
    }
}

/// Convert [serde_json::Value] to an AST Value Node without casting the JSON value to a type.
pub fn ast_from_value_untyped<'a>(ctx: &'a ASTContext, value: &JSValue) -> Value<'a> {
    match value {
        JSValue::Array(list) => {
            let children = list.iter().map(|value| ast_from_value_untyped(ctx, value));
            Value::List(ListValue {
                children: ctx.alloc_slice(children),
            })
        }
        JSValue::Object(map) => Value::Object(ObjectValue {
            children: ctx.alloc_slice(map.iter().map(|(key, value)| ObjectField {
                name: ctx.alloc_str(key),
                value: ast_from_value_untyped(ctx, value),
            })),
        }),
        JSValue::Number(num) => match num.as_i64() {
            Some(int) => Value::Int(IntValue {
                value: ctx.alloc_string(int.to_string()),
            }),
            None => {
                let float = num.as_f64().filter(|x| x.is_finite()).unwrap_or(0.0);
                Value::Float(FloatValue {
                    value: ctx.alloc_string(float.to_string()),
                })
            }
        },
        JSValue::Bool(x) => Value::Boolean((*x).into()),
        JSValue::String(str) => Value::String(ctx.alloc_str(str).into()),
        JSValue::Null => Value::Null,
    }
}

/// Convert [Variables] back to a [serde_json::Value] object.
pub fn value_from_ast_variables(variables: &Variables<'_>) -> JSMap<String, JSValue> {
    variables
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_json(None)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untyped_variables() {
        let ctx = ASTContext::new();
        let input = json!({ "id": 1, "tags": ["a", "b"], "size": 2.5, "on": true });
        let variables = variables_from_json(&ctx, &input).unwrap();
        assert_eq!(variables["id"], Value::Int(IntValue { value: "1" }));
        assert_eq!(variables["size"], Value::Float(FloatValue { value: "2.5" }));
        assert_eq!(variables["on"], Value::Boolean(true.into()));
        assert_eq!(variables["tags"].print(), "[\"a\", \"b\"]");
        assert_eq!(value_from_ast_variables(&variables), input.as_object().cloned().unwrap());

        assert!(variables_from_json(&ctx, &JSValue::Null).unwrap().is_empty());
        let error = variables_from_json(&ctx, &json!([1])).unwrap_err();
        assert_eq!(error.message(), "Variables expected but received non-object value");
    }

    #[test]
    fn nullable_list() {
        let ctx = ASTContext::new();
        let input = json!({ "list": null });
        let of_type = Type::named("Int").into_nonnull(&ctx).into_list(&ctx);
        let var_defs = VariableDefinitions::new(&ctx, [VariableDefinition::new("list", of_type)]);
        let variables = ast_variables_from_value(&ctx, &input, &var_defs).unwrap();
        assert_eq!(variables["list"], Value::Null);
    }

    #[test]
    fn casts_to_types() {
        let ctx = ASTContext::new();
        let input = json!({ "ids": 5, "flag": 1, "name": 42 });
        let var_defs = VariableDefinitions::new(
            &ctx,
            [
                VariableDefinition::new("ids", Type::named("ID").into_list(&ctx)),
                VariableDefinition::new("flag", Type::named("Boolean")),
                VariableDefinition::new("name", Type::named("String")),
                VariableDefinition {
                    default_value: Value::Int(IntValue { value: "3" }),
                    ..VariableDefinition::new("limit", Type::named("Int"))
                },
            ],
        );
        let variables = ast_variables_from_value(&ctx, &input, &var_defs).unwrap();
        assert_eq!(variables["ids"].print(), "[\"5\"]");
        assert_eq!(variables["flag"], Value::Boolean(true.into()));
        assert_eq!(variables["name"], Value::String("42".into()));
        assert_eq!(variables["limit"], Value::Int(IntValue { value: "3" }));

        let non_null = Type::named("Int").into_nonnull(&ctx);
        let error = ast_from_value(&ctx, &JSValue::Null, &non_null).unwrap_err();
        assert_eq!(error.message(), "Received null for non-nullable type");
        let error = ast_from_value(&ctx, &json!(1.5), &Type::named("Int")).unwrap_err();
        assert_eq!(error.message(), "Received Float for Int type");
    }
}
