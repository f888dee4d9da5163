//! Command nodes and tree registration.
//!
//! A command tree is a strict ownership tree: every node owns its children
//! through [`Arc`] and points back to its parent through a [`Weak`] that is
//! set exactly once, at registration. Registration rejects anything that
//! would break that shape (re-parenting, duplicate sibling names, empty names,
//! cycles), so a tree that finished registering can be shared freely across
//! threads and dispatched concurrently.
//!
//! # Example
//!
//! ```
//! use command_tree_core::{Command, tree};
//!
//! let root = Command::builder("git").build();
//! root.register_tree(vec![
//!     tree(Command::builder("status").description("Show the working tree status").build(), vec![]),
//!     tree(
//!         Command::builder("remote").build(),
//!         vec![
//!             tree(Command::builder("add").build(), vec![]),
//!             tree(Command::builder("remove").build(), vec![]),
//!         ],
//!     ),
//! ])
//! .unwrap();
//!
//! let add = root.route(&["remote", "add"]).unwrap();
//! assert_eq!(add.path(), "remote add");
//! assert!(std::sync::Arc::ptr_eq(&add.root(), &root));
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;

use crate::argv::{Argv, ArgvFactory};
use crate::context::Context;
use crate::error::{BoxError, ConfigError};
use crate::usage::UsageSections;

/// Handler bound to a command.
pub type HandlerFn = dyn Fn(&mut Context) -> Result<(), BoxError> + Send + Sync;

/// A node of the command tree.
///
/// Metadata is fixed at construction (see [`CommandBuilder`]); only the
/// parent link, the child list and the usage cache change afterwards.
pub struct Command {
    name: String,
    description: String,
    text: String,
    handler: Option<Arc<HandlerFn>>,
    argv: Option<Arc<ArgvFactory>>,
    can_sub_route: bool,
    methods: Vec<String>,

    parent: OnceLock<Weak<Command>>,
    children: RwLock<Vec<Arc<Command>>>,

    pub(crate) usage: OnceLock<UsageSections>,
}

/// A node together with the subtrees to register under it.
///
/// Built with [`tree`] and consumed by [`Command::register_tree`].
pub struct CommandTree {
    command: Arc<Command>,
    forest: Vec<CommandTree>,
}

/// Pairs a command with the subtrees to register below it.
pub fn tree(command: Arc<Command>, forest: Vec<CommandTree>) -> CommandTree {
    CommandTree { command, forest }
}

/// Builder for [`Command`].
///
/// # Examples
///
/// ```
/// use command_tree_core::Command;
///
/// let cmd = Command::builder("echo")
///     .description("Print the remaining arguments")
///     .sub_route(true)
///     .handler(|ctx| {
///         let line = ctx.args().join(" ");
///         ctx.string(format_args!("{line}\n"))?;
///         Ok(())
///     })
///     .build();
///
/// assert_eq!(cmd.name(), "echo");
/// assert!(cmd.can_sub_route());
/// assert!(cmd.has_handler());
/// ```
#[must_use]
pub struct CommandBuilder {
    name: String,
    description: String,
    text: String,
    handler: Option<Arc<HandlerFn>>,
    argv: Option<Arc<ArgvFactory>>,
    can_sub_route: bool,
    methods: Vec<String>,
}

impl CommandBuilder {
    /// Short description, shown in the parent's command listing.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Long description, shown in this command's usage.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Function run when the command is dispatched.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Factory of the argument object parsed from the residual tokens.
    pub fn argv<F, A>(mut self, factory: F) -> Self
    where
        F: Fn() -> A + Send + Sync + 'static,
        A: Argv,
    {
        self.argv = Some(Arc::new(move || Box::new(factory()) as Box<dyn Argv>));
        self
    }

    /// Allows dispatching this command when the path continues past it.
    pub fn sub_route(mut self, yes: bool) -> Self {
        self.can_sub_route = yes;
        self
    }

    /// Restricts the methods this command answers to. Empty means any.
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Finishes the node. It is detached until registered.
    pub fn build(self) -> Arc<Command> {
        Arc::new(Command {
            name: self.name,
            description: self.description,
            text: self.text,
            handler: self.handler,
            argv: self.argv,
            can_sub_route: self.can_sub_route,
            methods: self.methods,
            parent: OnceLock::new(),
            children: RwLock::new(Vec::new()),
            usage: OnceLock::new(),
        })
    }
}

impl Command {
    /// Starts building a command named `name`.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            description: String::new(),
            text: String::new(),
            handler: None,
            argv: None,
            can_sub_route: false,
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn can_sub_route(&self) -> bool {
        self.can_sub_route
    }

    /// Allowed methods; empty means the command is not method-gated.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn has_argv(&self) -> bool {
        self.argv.is_some()
    }

    pub(crate) fn handler_fn(&self) -> Option<&Arc<HandlerFn>> {
        self.handler.as_ref()
    }

    /// Creates a fresh argument object, if the command declares one.
    pub fn new_argv(&self) -> Option<Box<dyn Argv>> {
        self.argv.as_ref().map(|factory| factory())
    }

    /// Registers `child` under this command and returns it.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyName`] if the child's name is blank;
    /// - [`ConfigError::AlreadyRegistered`] if the child has a parent;
    /// - [`ConfigError::DuplicateChild`] if a sibling has the same name;
    /// - [`ConfigError::Cycle`] if the child is the root of this tree.
    pub fn register(self: &Arc<Self>, child: Arc<Command>) -> Result<Arc<Command>, ConfigError> {
        if child.name.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                parent: self.name.clone(),
            });
        }
        if let Some(parent) = child.parent() {
            return Err(ConfigError::AlreadyRegistered {
                child: child.name.clone(),
                parent: parent.name.clone(),
            });
        }
        if Arc::ptr_eq(&self.root(), &child) {
            return Err(ConfigError::Cycle {
                child: child.name.clone(),
            });
        }

        let mut children = self.children.write();
        if children.iter().any(|c| c.name == child.name) {
            return Err(ConfigError::DuplicateChild {
                child: child.name.clone(),
                parent: self.name.clone(),
            });
        }
        if child.parent.set(Arc::downgrade(self)).is_err() {
            return Err(ConfigError::AlreadyRegistered {
                child: child.name.clone(),
                parent: child
                    .parent()
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
            });
        }
        children.push(Arc::clone(&child));
        Ok(child)
    }

    /// Builds a command from a name, handler and optional argument factory,
    /// then registers it.
    pub fn register_fn<F>(
        self: &Arc<Self>,
        name: impl Into<String>,
        handler: F,
        argv: Option<Arc<ArgvFactory>>,
    ) -> Result<Arc<Command>, ConfigError>
    where
        F: Fn(&mut Context) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let mut builder = Command::builder(name).handler(handler);
        builder.argv = argv;
        self.register(builder.build())
    }

    /// Registers a forest recursively, preserving the declared order.
    ///
    /// Stops at the first [`ConfigError`].
    pub fn register_tree(self: &Arc<Self>, forest: Vec<CommandTree>) -> Result<(), ConfigError> {
        for CommandTree { command, forest } in forest {
            let command = self.register(command)?;
            if !forest.is_empty() {
                command.register_tree(forest)?;
            }
        }
        Ok(())
    }

    /// The parent command, `None` for a root or a detached node.
    pub fn parent(&self) -> Option<Arc<Command>> {
        self.parent.get().and_then(Weak::upgrade)
    }

    /// The root of the tree this command belongs to.
    pub fn root(self: &Arc<Self>) -> Arc<Command> {
        let mut current = Arc::clone(self);
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Snapshot of the children, in registration order.
    pub fn children(&self) -> Vec<Arc<Command>> {
        self.children.read().clone()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.read().is_empty()
    }

    /// Finds a direct child by exact name.
    pub fn find_child(&self, name: &str) -> Option<Arc<Command>> {
        self.children
            .read()
            .iter()
            .find(|child| child.name == name)
            .cloned()
    }

    /// Full path of the command: ancestor names joined by single spaces, the
    /// root's own name excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::Command;
    ///
    /// let root = Command::builder("app").build();
    /// let a = root.register(Command::builder("a").build()).unwrap();
    /// let b = a.register(Command::builder("b").build()).unwrap();
    /// assert_eq!(b.path(), "a b");
    /// assert_eq!(root.path(), "");
    /// ```
    pub fn path(&self) -> String {
        let mut names = Vec::new();
        let mut parent = self.parent();
        if parent.is_some() && !self.name.is_empty() {
            names.push(self.name.clone());
        }
        while let Some(node) = parent {
            parent = node.parent();
            if parent.is_some() && !node.name.is_empty() {
                names.push(node.name.clone());
            }
        }
        names.reverse();
        names.join(" ")
    }

    /// Lists the children as `prefix`, name padded to the longest sibling
    /// name, `indent`, description; one line each.
    pub fn list_children(&self, prefix: &str, indent: &str) -> String {
        let children = self.children.read();
        let width = children
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for child in children.iter() {
            out.push_str(&format!(
                "{prefix}{name:<width$}{indent}{desc}\n",
                name = child.name,
                desc = child.description,
            ));
        }
        out
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_handler", &self.handler.is_some())
            .field("has_argv", &self.argv.is_some())
            .field("can_sub_route", &self.can_sub_route)
            .field("methods", &self.methods)
            .field(
                "children",
                &self
                    .children
                    .read()
                    .iter()
                    .map(|c| c.name.clone())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
