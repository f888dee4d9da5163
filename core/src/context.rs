//! Per-invocation execution context.
//!
//! A [`Context`] is built by the dispatcher once the command is resolved and
//! the residual tokens are parsed; it is handed to the command's handler and
//! dropped when the handler returns. For `./app hello world -a --xyz=1`:
//!
//! | accessor   | value                   |
//! |------------|-------------------------|
//! | `path()`   | `"hello world"`         |
//! | `router()` | `["hello", "world"]`    |
//! | `args()`   | `["-a", "--xyz=1"]`     |

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::argv::{Argv, FormValues};
use crate::command::Command;
use crate::style::Style;

/// Failure of one of the context's output helpers.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output sink of a dispatch.
pub type Writer = Box<dyn Write + Send>;

/// Running context of a dispatched command.
pub struct Context {
    path: String,
    router: Vec<String>,
    args: Vec<String>,
    argv: Option<Box<dyn Argv>>,
    values: FormValues,
    command: Arc<Command>,
    writer: Writer,
    style: Style,
}

impl Context {
    pub(crate) fn new(
        command: Arc<Command>,
        router: Vec<String>,
        args: Vec<String>,
        argv: Option<Box<dyn Argv>>,
        values: FormValues,
        writer: Writer,
        style: Style,
    ) -> Self {
        Self {
            path: router.join(" "),
            router,
            args,
            argv,
            values,
            command,
            writer,
            style,
        }
    }

    /// Full command name, e.g. `"hello world"`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Router tokens consumed to find the command, e.g. `["hello", "world"]`.
    pub fn router(&self) -> &[String] {
        &self.router
    }

    /// Tokens left after routing, e.g. `["-a", "--xyz=1"]`.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The parsed argument object, read back as `T`.
    ///
    /// `None` when the command has no argument factory or the object is not
    /// a `T`.
    pub fn argv<T: 'static>(&self) -> Option<&T> {
        self.argv.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// The parsed argument object as the collaborator trait object.
    pub fn raw_argv(&self) -> Option<&dyn Argv> {
        self.argv.as_deref()
    }

    /// Values given on the command line, keyed by option name.
    pub fn form_values(&self) -> &FormValues {
        &self.values
    }

    /// The resolved command.
    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    /// Usage of the resolved command, styled for this context's sink.
    pub fn usage(&self) -> String {
        self.command.usage(self.style)
    }

    /// Color capability of the sink.
    pub fn style(&self) -> Style {
        self.style
    }

    /// The output sink.
    pub fn writer(&mut self) -> &mut Writer {
        &mut self.writer
    }

    /// Writes formatted text to the sink.
    ///
    /// ```ignore
    /// ctx.string(format_args!("hello, {name}\n"))?;
    /// ```
    pub fn string(&mut self, args: fmt::Arguments<'_>) -> Result<&mut Self, OutputError> {
        self.writer.write_fmt(args)?;
        Ok(self)
    }

    /// Writes `value` as compact JSON.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, OutputError> {
        serde_json::to_writer(&mut self.writer, value)?;
        Ok(self)
    }

    /// Writes `value` as compact JSON followed by a newline.
    pub fn json_ln<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, OutputError> {
        self.json(value)?.string(format_args!("\n"))
    }

    /// Writes `value` as indented JSON.
    pub fn json_pretty<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<&mut Self, OutputError> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        Ok(self)
    }

    /// Writes `value` as indented JSON followed by a newline.
    pub fn json_pretty_ln<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<&mut Self, OutputError> {
        self.json_pretty(value)?.string(format_args!("\n"))
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.path)
            .field("router", &self.router)
            .field("args", &self.args)
            .field("argv", &self.argv)
            .field("values", &self.values)
            .field("command", &self.command.name())
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}
