//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's used across traversals, transformations
//! and analyses, or that visitors and node adapters convert their errors to.

use std::{error, fmt, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a general message and a context string. For invariant violations, for
/// instance, the context string is populated with the location of the offending node, while for
/// analyses the context describes the operation that failed.
///
/// The Error implements both the [`fmt::Display`] and [`fmt::Debug`] traits. It also implements
/// [`error::Error`] so that it can be used with existing patterns for error handling.
#[derive(PartialEq, Eq, Clone)]
pub struct Error {
    pub(crate) message: String,
    pub(crate) context: Option<String>,
    pub(crate) error_type: ErrorType,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorType {
    /// An error raised by a visitor or an analysis on a GraphQL document.
    GraphQL,
    /// A broken usage contract, e.g. deleting a node twice or returning `Quit` from a parallel
    /// visitor. These are never recoverable and abort the running operation.
    Invariant,
    /// A node adapter was asked to build a node from children it can't hold.
    Adapter,
}

impl Error {
    /// Create a new Error with only a main message from an input string.
    pub fn new<S: Into<String>>(message: S, error_type: Option<ErrorType>) -> Self {
        Self {
            message: message.into(),
            context: None,
            error_type: error_type.unwrap_or(ErrorType::GraphQL),
        }
    }

    /// Create a new Error with a main message and a context string from two input strings.
    pub fn new_with_context<S: Into<String>>(
        message: S,
        context: S,
        error_type: Option<ErrorType>,
    ) -> Self {
        Self {
            message: message.into(),
            context: Some(context.into()),
            error_type: error_type.unwrap_or(ErrorType::GraphQL),
        }
    }

    #[inline]
    pub(crate) fn invariant<S: Into<String>>(message: S) -> Self {
        Self::new(message, Some(ErrorType::Invariant))
    }

    #[inline]
    pub(crate) fn adapter<S: Into<String>>(message: S) -> Self {
        Self::new(message, Some(ErrorType::Adapter))
    }

    /// Returns the message of the current error. The context is discarded.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the context of the current error, if any was attached.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the kind of the current error.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Formats this error, with the option to include the context information as well,
    /// which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let formatted = match self.error_type {
            ErrorType::GraphQL => {
                format!("GraphQL Error: {}", self.message)
            }
            ErrorType::Invariant => {
                format!("Invariant Violation: {}", self.message)
            }
            ErrorType::Adapter => {
                format!("Adapter Error: {}", self.message)
            }
        };

        match self.context {
            Some(ref context) if include_ctx => format!("{}\n{}", formatted, context),
            _ => formatted,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}\n", self)
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_with_and_without_context() {
        let error = Error::new_with_context(
            "node is already deleted",
            "selections[2]",
            Some(ErrorType::Invariant),
        );
        assert_eq!(error.print(false), "Invariant Violation: node is already deleted");
        assert_eq!(
            error.print(true),
            "Invariant Violation: node is already deleted\nselections[2]"
        );
        assert_eq!(error.context(), Some("selections[2]"));
    }

    #[test]
    fn defaults_to_graphql_errors() {
        let error = Error::new("Maximum query depth exceeded: 4 > 3", None);
        assert_eq!(error.error_type(), ErrorType::GraphQL);
        assert_eq!(error.to_string(), "GraphQL Error: Maximum query depth exceeded: 4 > 3");
    }
}
