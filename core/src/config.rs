//! Dispatch configuration.
//!
//! Controls the ambient behavior of a dispatch that is not part of the
//! command tree itself: whether output is styled, and whether failed routes
//! compute suggestions.
//!
//! The configuration can be deserialized (e.g. embedded in an application's
//! own settings) or read from the environment:
//!
//! | variable              | values                     | default |
//! |-----------------------|----------------------------|---------|
//! | `CMDTREE_COLOR`       | `auto`, `always`, `never`  | `auto`  |
//! | `CMDTREE_SUGGESTIONS` | `true`/`false`, `1`/`0`    | `true`  |

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::style::{Style, colors_disabled};

/// Environment variable selecting the [`ColorChoice`].
pub const COLOR_ENV: &str = "CMDTREE_COLOR";
/// Environment variable toggling suggestions.
pub const SUGGESTIONS_ENV: &str = "CMDTREE_SUGGESTIONS";

/// When to style output.
///
/// # Examples
///
/// ```
/// use command_tree_core::{ColorChoice, Style};
///
/// assert_eq!(ColorChoice::Always.resolve(false), Style::colored());
/// assert_eq!(ColorChoice::Never.resolve(true), Style::plain());
/// assert_eq!("never".parse::<ColorChoice>(), Ok(ColorChoice::Never));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ColorChoice {
    /// Style when the sink is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always style.
    Always,
    /// Never style.
    Never,
}

impl ColorChoice {
    /// Resolves the choice for a sink.
    pub fn resolve(self, is_terminal: bool) -> Style {
        match self {
            Self::Auto => Style::new(is_terminal && !colors_disabled()),
            Self::Always => Style::colored(),
            Self::Never => Style::plain(),
        }
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color choice: {other}")),
        }
    }
}

/// Ambient settings of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// When to style output written by handlers and error hints.
    pub color: ColorChoice,
    /// Compute near-miss suggestions when routing fails.
    pub suggestions: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            suggestions: true,
        }
    }
}

impl DispatchConfig {
    /// Reads [`COLOR_ENV`] and [`SUGGESTIONS_ENV`], falling back to the
    /// defaults for unset or invalid values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(COLOR_ENV) {
            match value.parse() {
                Ok(color) => config.color = color,
                Err(err) => warn!(variable = COLOR_ENV, %err, "ignoring invalid value"),
            }
        }

        if let Some(value) = lookup(SUGGESTIONS_ENV) {
            match parse_bool(&value) {
                Some(enabled) => config.suggestions = enabled,
                None => warn!(variable = SUGGESTIONS_ENV, value = %value, "ignoring invalid value"),
            }
        }

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
