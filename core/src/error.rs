//! Error types for tree construction and dispatch.
//!
//! Two families, split by who has to fix them:
//!
//! - [`ConfigError`] is a wiring bug in the program's command tree. It is
//!   returned by the `register*` family so startup code can abort before any
//!   dispatch happens.
//! - [`DispatchError`] describes why a single invocation did not run, or
//!   carries the handler's own error when it did.

use thiserror::Error;

use crate::argv::ArgvError;
use crate::context::OutputError;

/// Opaque error returned by handlers and validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid command tree wiring.
///
/// # Examples
///
/// ```
/// use command_tree_core::{Command, ConfigError};
///
/// let root = Command::builder("app").build();
/// root.register(Command::builder("status").build()).unwrap();
///
/// let err = root.register(Command::builder("status").build()).unwrap_err();
/// assert!(matches!(err, ConfigError::DuplicateChild { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The child has an empty (or whitespace-only) name.
    #[error("command `{parent}` cannot register a command with an empty name")]
    EmptyName { parent: String },
    /// The child is already attached to another parent.
    #[error("command `{child}` is already a child of `{parent}`")]
    AlreadyRegistered { child: String, parent: String },
    /// The parent already has a child with the same name.
    #[error("command `{parent}` already has a child named `{child}`")]
    DuplicateChild { child: String, parent: String },
    /// The child is the parent itself or the root of the parent's tree.
    #[error("registering `{child}` would create a cycle")]
    Cycle { child: String },
}

/// Why a dispatch failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No command matches the requested path.
    ///
    /// `hint` is the rendered suggestion text (possibly styled), empty when
    /// there is nothing to suggest.
    #[error("command `{path}` not found{hint}")]
    CommandNotFound {
        path: String,
        suggestions: Vec<String>,
        hint: String,
    },
    /// The command matched but does not accept the requested method.
    #[error("method `{method}` not allowed for command `{path}`")]
    MethodNotAllowed {
        method: String,
        path: String,
        allowed: Vec<String>,
    },
    /// The residual arguments could not be parsed.
    #[error("{path}: {source}")]
    Argv {
        path: String,
        #[source]
        source: ArgvError,
    },
    /// The parsed argument object rejected itself.
    #[error("{path}: {source}")]
    Validation {
        path: String,
        #[source]
        source: BoxError,
    },
    /// The command matched but has nothing to run.
    #[error("command `{path}` has no handler")]
    MissingHandler { path: String },
    /// The handler's own error, unchanged.
    #[error("{0}")]
    Handler(BoxError),
    /// The handler succeeded but its output could not be flushed to the sink.
    #[error("failed to flush output: {0}")]
    Output(#[from] OutputError),
}

impl DispatchError {
    /// Returns `true` for errors produced before any handler ran.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, Self::Handler(_) | Self::Output(_))
    }

    /// Returns the handler's error, if this is one.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Returns the suggestion list of a [`CommandNotFound`](Self::CommandNotFound).
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::CommandNotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}
