//! The argument-object collaborator.
//!
//! A command may carry an argument factory producing a fresh [`Argv`] per
//! invocation. The dispatcher only relies on this contract:
//!
//! - [`Argv::parse`] fills the object from the residual tokens and reports
//!   the values it saw as [`FormValues`];
//! - [`Argv::usage`] describes the flags of an empty object, for the usage
//!   text of the command;
//! - [`Argv::validator`] optionally exposes a [`Validator`] that is run after
//!   a successful parse, unless the parse asked to skip it.
//!
//! [`ClapArgv`](crate::ClapArgv) implements the contract for any
//! `clap::Parser` type.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::BoxError;

/// Error reported by an [`Argv`] parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgvError {
    /// The tokens do not fit the argument object.
    #[error("{message}")]
    Invalid { message: String },
    /// The tokens asked for help instead of a run; `text` is what to show.
    #[error("help requested")]
    HelpRequested { text: String },
}

impl ArgvError {
    /// Shorthand for [`ArgvError::Invalid`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Self-check of a parsed argument object.
pub trait Validator {
    /// Returns an error if the parsed values are inconsistent.
    fn validate(&self) -> Result<(), BoxError>;
}

/// Values seen on the command line, keyed by option name.
///
/// Keys are kept sorted so that output built from them is deterministic.
///
/// # Examples
///
/// ```
/// use command_tree_core::FormValues;
///
/// let mut values = FormValues::new();
/// values.append("tag", "a");
/// values.append("tag", "b");
/// assert_eq!(values.get("tag"), Some("a"));
/// assert_eq!(values.get_all("tag"), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, Vec<String>>);

impl FormValues {
    /// Creates an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Returns the first value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.first().map(String::as_str)
    }

    /// Returns every value under `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `key` was given at least once.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a successful [`Argv::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Values given on the command line.
    pub values: FormValues,
    /// Set when the tokens ask to bypass [`Validator`] (e.g. a help flag).
    pub skip_validation: bool,
}

impl ParseOutcome {
    pub fn new(values: FormValues) -> Self {
        Self {
            values,
            skip_validation: false,
        }
    }

    /// Marks the outcome as not to be validated.
    pub fn skip_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }
}

/// A typed argument object bound to a command.
///
/// Implementors return themselves (or the value they wrap) from
/// [`as_any`](Argv::as_any) so handlers can read it back with
/// [`Context::argv`](crate::Context::argv).
pub trait Argv: fmt::Debug + Send + 'static {
    /// Fills the object from the residual tokens.
    fn parse(&mut self, args: &[String]) -> Result<ParseOutcome, ArgvError>;

    /// Flag-level usage text of an empty object, one line per flag.
    fn usage(&self) -> String;

    /// The self-check capability, if the object has one.
    fn validator(&self) -> Option<&dyn Validator> {
        None
    }

    /// The parsed value, for typed access by handlers.
    fn as_any(&self) -> &dyn Any;
}

/// Produces a fresh, empty argument object per invocation.
pub type ArgvFactory = dyn Fn() -> Box<dyn Argv> + Send + Sync;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_values_missing_key() {
        let values = FormValues::new();
        assert!(values.is_empty());
        assert_eq!(values.get("name"), None);
        assert!(values.get_all("name").is_empty());
    }

    #[test]
    fn test_form_values_serialize_as_map() {
        let mut values = FormValues::new();
        values.append("xyz", "1");
        values.append("alpha", "true");
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["alpha", "xyz"]);
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"{"alpha":["true"],"xyz":["1"]}"#
        );
    }

    #[test]
    fn test_parse_outcome_skip_validation() {
        let outcome = ParseOutcome::new(FormValues::new());
        assert!(!outcome.skip_validation);
        assert!(outcome.skip_validation().skip_validation);
    }

    #[test]
    fn test_argv_error_display() {
        assert_eq!(ArgvError::invalid("unknown flag -q").to_string(), "unknown flag -q");
    }
}
