//! Usage text of a command.
//!
//! The text is assembled once per command and memoised on the node. What is
//! cached is the structure (paragraphs, the argument object's flag listing,
//! the child listing); section headers are styled when the text is rendered,
//! so callers with different color capabilities all get correct output from
//! the same cache entry.

use std::sync::Arc;

use tracing::debug;

use crate::command::Command;
use crate::style::Style;

const LIST_PREFIX: &str = "  ";
const LIST_INDENT: &str = "   ";

/// Cached, unstyled pieces of a command's usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UsageSections {
    description: String,
    text: String,
    argv: Option<String>,
    commands: Option<String>,
}

impl UsageSections {
    fn build(command: &Command) -> Self {
        let argv = command.new_argv().map(|argv| argv.usage());
        let commands = (!command.is_leaf()).then(|| command.list_children(LIST_PREFIX, LIST_INDENT));
        Self {
            description: command.description().to_string(),
            text: command.text().to_string(),
            argv,
            commands,
        }
    }

    fn render(&self, style: Style) -> String {
        let mut out = String::new();
        if !self.description.is_empty() {
            out.push_str(&self.description);
            out.push_str("\n\n");
        }
        if !self.text.is_empty() {
            out.push_str(&self.text);
            out.push_str("\n\n");
        }
        if let Some(argv) = &self.argv {
            out.push_str(&style.bold("Usage"));
            out.push_str(":\n");
            out.push_str(argv);
        }
        if let Some(commands) = &self.commands {
            if self.argv.is_some() {
                out.push('\n');
            }
            out.push_str(&style.bold("Commands"));
            out.push_str(":\n");
            out.push_str(commands);
        }
        out
    }
}

impl Command {
    /// Usage text of this command, styled with `style`.
    ///
    /// Built on the first call and cached on the node for the lifetime of
    /// the tree; concurrent first calls build it once.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::{Command, Style};
    ///
    /// let root = Command::builder("app").description("Demo application").build();
    /// root.register(Command::builder("run").description("Run it").build()).unwrap();
    ///
    /// assert_eq!(
    ///     root.usage(Style::plain()),
    ///     "Demo application\n\nCommands:\n  run   Run it\n"
    /// );
    /// ```
    pub fn usage(self: &Arc<Self>, style: Style) -> String {
        let mut built = false;
        let sections = self.usage.get_or_init(|| {
            built = true;
            UsageSections::build(self)
        });
        if built {
            debug!(command = %self.name(), "built usage");
        } else {
            debug!(command = %self.name(), "usage served from cache");
        }
        sections.render(style)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::argv::{Argv, ArgvError, ParseOutcome};

    #[derive(Debug, Default)]
    struct Flags;

    impl Argv for Flags {
        fn parse(&mut self, _args: &[String]) -> Result<ParseOutcome, ArgvError> {
            Ok(ParseOutcome::default())
        }

        fn usage(&self) -> String {
            "  -a, --alpha   enable alpha\n".to_string()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    static COUNTED_USAGE_CALLS: AtomicUsize = AtomicUsize::new(0);

    // Only used by `test_usage_is_memoised`, so the counter is not shared
    // with tests running in parallel.
    #[derive(Debug, Default)]
    struct Counted;

    impl Argv for Counted {
        fn parse(&mut self, _args: &[String]) -> Result<ParseOutcome, ArgvError> {
            Ok(ParseOutcome::default())
        }

        fn usage(&self) -> String {
            COUNTED_USAGE_CALLS.fetch_add(1, Ordering::SeqCst);
            "  -c, --count   count things\n".to_string()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn remote() -> Arc<Command> {
        let root = Command::builder("git").build();
        let remote = root
            .register(
                Command::builder("remote")
                    .description("Manage remotes")
                    .text("Add, list and rename tracked repositories.")
                    .argv(Flags::default)
                    .build(),
            )
            .unwrap();
        remote
            .register(Command::builder("add").description("Add a remote").build())
            .unwrap();
        remote
            .register(Command::builder("rename").description("Rename a remote").build())
            .unwrap();
        remote
    }

    #[test]
    fn test_usage_sections_in_order() {
        let remote = remote();
        assert_eq!(
            remote.usage(Style::plain()),
            "Manage remotes\n\n\
             Add, list and rename tracked repositories.\n\n\
             Usage:\n  -a, --alpha   enable alpha\n\
             \n\
             Commands:\n  add      Add a remote\n  rename   Rename a remote\n"
        );
    }

    #[test]
    fn test_usage_is_memoised() {
        let cmd = Command::builder("count").argv(Counted::default).build();

        let first = cmd.usage(Style::plain());
        let second = cmd.usage(Style::colored());
        let third = cmd.usage(Style::plain());

        assert_eq!(first, third);
        assert_ne!(first, second);
        assert_eq!(COUNTED_USAGE_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_usage_styling_applied_per_call() {
        let remote = remote();

        let colored = remote.usage(Style::colored());
        assert!(colored.contains("\x1b[1mUsage\x1b[0m:\n"));
        assert!(colored.contains("\x1b[1mCommands\x1b[0m:\n"));

        // The cache was filled by a colored caller; a plain caller still
        // gets plain text.
        let plain = remote.usage(Style::plain());
        assert!(!plain.contains('\x1b'));
        assert_eq!(colored.replace("\x1b[1m", "").replace("\x1b[0m", ""), plain);
    }

    #[test]
    fn test_usage_of_bare_leaf_is_empty() {
        let leaf = Command::builder("leaf").build();
        assert_eq!(leaf.usage(Style::plain()), "");
    }

    #[test]
    fn test_usage_argv_without_children() {
        let cmd = Command::builder("flags").argv(Flags::default).build();
        assert_eq!(
            cmd.usage(Style::plain()),
            "Usage:\n  -a, --alpha   enable alpha\n"
        );
    }
}
