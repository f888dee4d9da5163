//! Output color capability.
//!
//! A [`Style`] answers one question: should text written to the sink carry
//! ANSI styling. It is decided once per dispatch (see
//! [`ColorChoice`](crate::ColorChoice)) and handed to everything that renders
//! text for that dispatch.

const BOLD: &str = "\x1b[1m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Color capability of an output sink.
///
/// # Examples
///
/// ```
/// use command_tree_core::Style;
///
/// assert_eq!(Style::plain().bold("Usage"), "Usage");
/// assert_eq!(Style::colored().bold("Usage"), "\x1b[1mUsage\x1b[0m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    enabled: bool,
}

impl Style {
    /// A style that never emits escape sequences.
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// A style that always emits escape sequences.
    pub const fn colored() -> Self {
        Self { enabled: true }
    }

    /// Builds a style from a flag.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns `true` if styling is applied.
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Renders `text` in bold.
    pub fn bold(self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Renders `text` in yellow.
    pub fn yellow(self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn paint(self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Check if colors are disabled through `NO_COLOR` (https://no-color.org/).
pub(crate) fn colors_disabled() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}
