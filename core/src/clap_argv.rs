//! [`Argv`] adapter for `clap` derive types.
//!
//! [`ClapArgv<T>`] parses the residual tokens with `T`'s generated parser
//! (without a binary name) and exposes the parsed `T` to handlers:
//!
//! ```
//! use clap::Parser;
//! use command_tree_core::{ClapArgv, Command};
//!
//! #[derive(Debug, Parser)]
//! struct Greet {
//!     /// Who to greet
//!     #[arg(short, long, default_value = "world")]
//!     name: String,
//! }
//!
//! let root = Command::builder("app").build();
//! root.register(
//!     Command::builder("greet")
//!         .argv(ClapArgv::<Greet>::new)
//!         .handler(|ctx| {
//!             let name = ctx.argv::<Greet>().map(|g| g.name.clone()).unwrap_or_default();
//!             ctx.string(format_args!("hello {name}\n"))?;
//!             Ok(())
//!         })
//!         .build(),
//! )
//! .unwrap();
//!
//! root.dispatch().writer(std::io::sink()).run(&["greet", "-n", "ada"]).unwrap();
//! ```

use std::any::Any;
use std::fmt;

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, Parser};

use crate::argv::{Argv, ArgvError, FormValues, ParseOutcome, Validator};
use crate::error::BoxError;

type ValidateFn<T> = fn(&T) -> Result<(), BoxError>;

/// Argument object backed by a `clap::Parser` type.
pub struct ClapArgv<T> {
    value: Option<T>,
    validate: Option<ValidateFn<T>>,
}

impl<T> ClapArgv<T>
where
    T: Parser + fmt::Debug + Send + 'static,
{
    /// An empty object; the parsed `T` is not validated.
    pub fn new() -> Self {
        Self {
            value: None,
            validate: None,
        }
    }

    /// An empty object whose parsed `T` is checked with its [`Validator`].
    pub fn validated() -> Self
    where
        T: Validator,
    {
        Self {
            value: None,
            validate: Some(|value: &T| value.validate()),
        }
    }

    /// The parsed value, once [`Argv::parse`] succeeded.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T> Default for ClapArgv<T>
where
    T: Parser + fmt::Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ClapArgv<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClapArgv")
            .field("value", &self.value)
            .field("validated", &self.validate.is_some())
            .finish()
    }
}

impl<T> Argv for ClapArgv<T>
where
    T: Parser + fmt::Debug + Send + 'static,
{
    fn parse(&mut self, args: &[String]) -> Result<ParseOutcome, ArgvError> {
        let mut command = T::command().no_binary_name(true);
        let matches = command
            .try_get_matches_from_mut(args)
            .map_err(convert_error)?;
        let value = T::from_arg_matches(&matches).map_err(convert_error)?;

        let mut values = FormValues::new();
        for arg in command.get_arguments() {
            let id = arg.get_id().as_str();
            if matches.value_source(id) != Some(ValueSource::CommandLine) {
                continue;
            }
            if let Ok(Some(raw)) = matches.try_get_raw(id) {
                for value in raw {
                    values.append(id, value.to_string_lossy());
                }
            }
        }

        self.value = Some(value);
        Ok(ParseOutcome::new(values))
    }

    fn usage(&self) -> String {
        let mut command = T::command();
        command.build();

        let lines: Vec<(String, String)> = command
            .get_arguments()
            .filter(|arg| !arg.is_hide_set())
            .map(|arg| {
                let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
                (flag_spec(arg), help)
            })
            .collect();

        let width = lines.iter().map(|(spec, _)| spec.len()).max().unwrap_or(0);
        lines
            .into_iter()
            .map(|(spec, help)| {
                if help.is_empty() {
                    format!("  {spec}\n")
                } else {
                    format!("  {spec:<width$}   {help}\n")
                }
            })
            .collect()
    }

    fn validator(&self) -> Option<&dyn Validator> {
        match (&self.value, self.validate) {
            (Some(_), Some(_)) => Some(self),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        match &self.value {
            Some(value) => value,
            None => self,
        }
    }
}

impl<T> Validator for ClapArgv<T> {
    fn validate(&self) -> Result<(), BoxError> {
        match (&self.value, self.validate) {
            (Some(value), Some(validate)) => validate(value),
            _ => Ok(()),
        }
    }
}

fn convert_error(err: clap::Error) -> ArgvError {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ArgvError::HelpRequested {
            text: err.render().to_string(),
        },
        _ => {
            let rendered = err.render().to_string();
            let message = rendered.trim_end();
            ArgvError::invalid(message.strip_prefix("error: ").unwrap_or(message))
        }
    }
}

/// `-n, --name <NAME>` style rendering of one argument.
fn flag_spec(arg: &Arg) -> String {
    let value_names: Vec<String> = match arg.get_value_names() {
        Some(names) => names.iter().map(|name| name.as_str().to_string()).collect(),
        None => vec![arg.get_id().as_str().to_uppercase()],
    };

    if arg.is_positional() {
        return value_names
            .iter()
            .map(|name| format!("<{name}>"))
            .collect::<Vec<_>>()
            .join(" ");
    }

    let mut spec = match (arg.get_short(), arg.get_long()) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("    --{long}"),
        (None, None) => String::new(),
    };
    if arg.get_action().takes_values() {
        for name in &value_names {
            spec.push_str(&format!(" <{name}>"));
        }
    }
    spec
}
