//! The dispatch driver.
//!
//! One dispatch takes the raw tokens of an invocation through these steps,
//! stopping at the first failure:
//!
//! 1. split the tokens at the first flag;
//! 2. route the leading tokens to the deepest matching command, which must
//!    either consume all of them or accept sub-routing;
//! 3. check the requested method against the command's method gate;
//! 4. build a fresh argument object and parse the residual tokens into it;
//! 5. run the object's validator, unless the parse asked to skip it;
//! 6. build the [`Context`] and invoke the handler.
//!
//! Nothing here mutates the tree, so any number of dispatches may run against
//! the same tree at once.

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use tracing::debug;

use crate::argv::ParseOutcome;
use crate::command::Command;
use crate::config::{ColorChoice, DispatchConfig};
use crate::context::{Context, Writer};
use crate::error::DispatchError;
use crate::route::split_args;
use crate::style::Style;
use crate::suggest::render_suggestions;

/// A configured, not yet started dispatch against a command tree.
///
/// Created with [`Command::dispatch`]; consumed by [`Dispatch::run`].
///
/// # Examples
///
/// ```
/// use command_tree_core::{Command, Style};
///
/// let root = Command::builder("git").build();
/// root.register_fn(
///     "status",
///     |ctx| {
///         ctx.string(format_args!("nothing to commit\n"))?;
///         Ok(())
///     },
///     None,
/// )
/// .unwrap();
///
/// root.dispatch().writer(std::io::sink()).run(&["status"]).unwrap();
///
/// let err = root
///     .dispatch()
///     .writer(std::io::sink())
///     .style(Style::plain())
///     .run(&["stauts"])
///     .unwrap_err();
/// assert_eq!(err.to_string(), "command `stauts` not found\nDid you mean status?");
/// ```
#[must_use]
pub struct Dispatch<'a> {
    root: &'a Arc<Command>,
    writer: Option<Writer>,
    style: Option<Style>,
    method: Option<String>,
    config: DispatchConfig,
}

impl<'a> Dispatch<'a> {
    fn new(root: &'a Arc<Command>) -> Self {
        Self {
            root,
            writer: None,
            style: None,
            method: None,
            config: DispatchConfig::default(),
        }
    }

    /// Sends handler output to `writer` instead of stdout.
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Forces the color capability instead of resolving it from the config.
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Requests a method, checked against the command's method gate.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes `args` and runs the matched command's handler.
    ///
    /// `args` are the invocation's tokens without the program name.
    ///
    /// # Errors
    ///
    /// Every failure before the handler runs is a usage error (see
    /// [`DispatchError::is_usage_error`]); an error returned by the handler
    /// comes back unchanged as [`DispatchError::Handler`]. If the handler
    /// succeeded but the sink fails to flush, the result is
    /// [`DispatchError::Output`].
    pub fn run<S: AsRef<str>>(self, args: &[S]) -> Result<(), DispatchError> {
        let Dispatch {
            root,
            writer,
            style,
            method,
            config,
        } = self;
        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        let (writer, style) = resolve_sink(writer, style, config.color);

        let split = split_args(&args);
        let router = split.router;

        if router.is_empty() && !root.has_handler() {
            debug!(command = %root.name(), "no command requested and root has no handler");
            return Err(DispatchError::CommandNotFound {
                path: root.name().to_string(),
                suggestions: Vec::new(),
                hint: String::new(),
            });
        }

        let requested = router.join(" ");
        let (command, consumed) = root.sub_route(router);
        if consumed != router.len() && !command.can_sub_route() {
            let suggestions = if config.suggestions {
                root.suggestions(&requested)
            } else {
                Vec::new()
            };
            debug!(path = %requested, suggestions = ?suggestions, "command not found");
            return Err(DispatchError::CommandNotFound {
                hint: render_suggestions(&suggestions, style),
                path: requested,
                suggestions,
            });
        }

        let router = router[..consumed].to_vec();
        let label = if router.is_empty() {
            root.name().to_string()
        } else {
            router.join(" ")
        };

        if let Some(method) = method {
            if !command.allows_method(&method) {
                debug!(path = %label, method = %method, allowed = ?command.methods(), "method not allowed");
                return Err(DispatchError::MethodNotAllowed {
                    method,
                    path: label,
                    allowed: command.methods().to_vec(),
                });
            }
        }

        let Some(handler) = command.handler_fn().cloned() else {
            debug!(path = %label, "command has no handler");
            return Err(DispatchError::MissingHandler { path: label });
        };

        let residual = args[consumed..].to_vec();
        let mut argv = command.new_argv();
        let outcome = match argv.as_mut() {
            Some(argv) => argv
                .parse(&residual)
                .map_err(|source| DispatchError::Argv {
                    path: label.clone(),
                    source,
                })?,
            None => ParseOutcome::default(),
        };

        if !outcome.skip_validation {
            if let Some(validator) = argv.as_deref().and_then(|argv| argv.validator()) {
                validator
                    .validate()
                    .map_err(|source| DispatchError::Validation {
                        path: label.clone(),
                        source,
                    })?;
            }
        }

        let mut ctx = Context::new(
            command,
            router,
            residual,
            argv,
            outcome.values,
            writer,
            style,
        );
        debug!(
            command = %label,
            args = ?ctx.args(),
            argv = ?ctx.raw_argv(),
            "ready to execute"
        );

        let result = handler(&mut ctx).map_err(DispatchError::Handler);
        let flushed = ctx.flush();
        if let Err(err) = &flushed {
            debug!(command = %label, error = %err, "failed to flush output");
        }
        // The handler's own error wins over a flush failure.
        result?;
        flushed.map_err(DispatchError::from)
    }
}

/// Picks the sink and its style. A caller-supplied writer is never treated
/// as a terminal, so `auto` leaves it plain.
fn resolve_sink(writer: Option<Writer>, style: Option<Style>, color: ColorChoice) -> (Writer, Style) {
    match writer {
        Some(writer) => (writer, style.unwrap_or_else(|| color.resolve(false))),
        None => {
            let stdout = std::io::stdout();
            let style = style.unwrap_or_else(|| color.resolve(stdout.is_terminal()));
            (Box::new(stdout), style)
        }
    }
}

impl Command {
    /// Starts configuring a dispatch against this command's tree.
    ///
    /// Routing starts at `self`, normally the root.
    pub fn dispatch(self: &Arc<Self>) -> Dispatch<'_> {
        Dispatch::new(self)
    }

    /// Dispatches `args` with the defaults: stdout, color detected from the
    /// terminal, suggestions on.
    pub fn run<S: AsRef<str>>(self: &Arc<Self>, args: &[S]) -> Result<(), DispatchError> {
        self.dispatch().run(args)
    }
}
