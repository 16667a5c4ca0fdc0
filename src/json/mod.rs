//! # JSON Conversion
//!
//! The `graphql_traverse::json` module converts between `serde_json` values and AST values. It's
//! typically used to turn a request's JSON variables into [`Variables`](crate::ast::Variables),
//! which the [analyses](crate::analysis) resolve arguments with.
//!
//! The [ValueFromNode] trait allows conversion to `serde_json` values using a `to_json` method on
//! any given value. This method converts without using any type information.
//!
//! The module otherwise only contains a handful of utility functions:
//!
//! - [variables_from_json] is used to create a `Variables` map from a JSON object as is.
//! - [ast_variables_from_value] is used to create a `Variables` map for an operation's variable
//!   definitions, casting each value to its type.
//! - [ast_from_value] is used to convert any given JSON value to AST values while casting it.
//! - [ast_from_value_untyped] is used to convert any given JSON value to AST values without
//!   casting.
//! - [value_from_ast_variables] is used to convert AST `Variables` back to a JSON value.

mod conversion;
mod values;

pub use conversion::*;
pub use values::*;
