//! Command tree registration, routing and dispatch.
//!
//! This crate turns the tokens of a command-line invocation into a call to a
//! handler bound to a node of a command tree:
//!
//! - [`Command`] — a node with metadata, an optional handler and an optional
//!   argument factory; built with [`CommandBuilder`] and attached with
//!   [`Command::register`] / [`Command::register_tree`].
//! - Routing ([`Command::sub_route`], [`split_args`]) — greedy longest-prefix
//!   matching of the tokens before the first flag.
//! - Suggestions ([`rank`], [`edit_distance`]) — near-miss command paths for
//!   tokens that did not route.
//! - Usage ([`Command::usage`]) — help text built once per node and cached.
//! - [`Context`] — what a handler sees: the resolved path, the residual
//!   tokens, the parsed [`Argv`] and an output sink.
//! - [`Dispatch`] — the driver tying the above together, reporting failures
//!   as [`DispatchError`].
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let root = Command::builder("app").build();
//! let hello = root
//!     .register(Command::builder("hello").description("Say hello").build())
//!     .unwrap();
//! hello
//!     .register_fn(
//!         "world",
//!         |ctx| {
//!             assert_eq!(ctx.path(), "hello world");
//!             assert_eq!(ctx.args(), ["-a", "--xyz=1"]);
//!             Ok(())
//!         },
//!         None,
//!     )
//!     .unwrap();
//!
//! root.dispatch()
//!     .writer(std::io::sink())
//!     .run(&["hello", "world", "-a", "--xyz=1"])
//!     .unwrap();
//!
//! let err = root.dispatch().style(Style::plain()).run(&["helo"]).unwrap_err();
//! assert_eq!(err.suggestions(), ["hello".to_string()]);
//! ```

mod argv;
#[cfg(feature = "clap")]
mod clap_argv;
mod command;
mod config;
mod context;
mod dispatch;
mod error;
mod route;
mod style;
mod suggest;
mod usage;

pub use argv::{Argv, ArgvError, ArgvFactory, FormValues, ParseOutcome, Validator};
#[cfg(feature = "clap")]
pub use clap_argv::ClapArgv;
pub use command::{Command, CommandBuilder, CommandTree, HandlerFn, tree};
pub use config::{COLOR_ENV, ColorChoice, DispatchConfig, SUGGESTIONS_ENV};
pub use context::{Context, OutputError, Writer};
pub use dispatch::Dispatch;
pub use error::{BoxError, ConfigError, DispatchError};
pub use route::{SplitArgs, split_args};
pub use style::Style;
pub use suggest::{edit_distance, rank, render_suggestions, score};
