use std::io::{IsTerminal, Write};
use std::sync::Arc;

use clap::Parser;
use command_tree_core::{
    ArgvError, BoxError, ClapArgv, Command, ConfigError, Context, DispatchConfig, DispatchError,
    Style, Validator, tree,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_ENV: &str = "CMDTREE_LOG";

/// Exit code of a failed handler, lost output or a broken command tree.
const EXIT_FAILURE: i32 = 1;
/// Exit code of an invocation that did not reach a handler.
const EXIT_USAGE: i32 = 2;

/// Say hello.
#[derive(Debug, Parser)]
#[command(name = "hello")]
struct HelloArgs {
    /// Who to greet.
    #[arg(short, long, default_value = "world")]
    name: String,
    /// Shout the greeting.
    #[arg(short, long)]
    loud: bool,
}

/// Add a remote.
#[derive(Debug, Parser)]
#[command(name = "remote add")]
struct RemoteAddArgs {
    /// Name of the remote.
    name: String,
    /// URL of the remote.
    url: String,
    /// Fetch from the remote right away.
    #[arg(short, long)]
    fetch: bool,
}

impl Validator for RemoteAddArgs {
    fn validate(&self) -> Result<(), BoxError> {
        if self.url.contains("://") || self.url.contains('@') {
            Ok(())
        } else {
            Err(format!("'{}' does not look like a URL", self.url).into())
        }
    }
}

/// List remotes.
#[derive(Debug, Parser)]
#[command(name = "remote list")]
struct RemoteListArgs {
    /// Print the remotes as JSON.
    #[arg(long)]
    json: bool,
    /// Show URLs.
    #[arg(short, long)]
    verbose: bool,
}

/// Remove a remote.
#[derive(Debug, Parser)]
#[command(name = "remote remove")]
struct RemoteRemoveArgs {
    /// Name of the remote.
    name: String,
}

#[derive(Debug, Serialize)]
struct Remote {
    name: &'static str,
    url: &'static str,
}

const REMOTES: &[Remote] = &[
    Remote {
        name: "origin",
        url: "https://example.com/cmdtree.git",
    },
    Remote {
        name: "upstream",
        url: "https://example.com/upstream/cmdtree.git",
    },
];

fn main() {
    init_logging();

    let root = match build_tree() {
        Ok(root) => root,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_FAILURE);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = DispatchConfig::from_env();
    let style = config.color.resolve(std::io::stdout().is_terminal());

    let result = root.dispatch().config(config).style(style).run(&args);
    if let Err(err) = result {
        let code = report(&root, &err, style);
        let _ = std::io::stdout().flush();
        std::process::exit(code);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_tree() -> Result<Arc<Command>, ConfigError> {
    let root = Command::builder("cmdtree")
        .description("Command tree dispatch demo")
        .handler(show_usage)
        .build();

    root.register_tree(vec![
        tree(
            Command::builder("hello")
                .description("Say hello")
                .argv(ClapArgv::<HelloArgs>::new)
                .handler(hello)
                .build(),
            vec![tree(
                Command::builder("world")
                    .description("Show how the invocation was routed")
                    .handler(hello_world)
                    .build(),
                vec![],
            )],
        ),
        tree(
            Command::builder("remote")
                .description("Manage remotes")
                .text("Add, list and remove the repositories this tree knows about.")
                .build(),
            vec![
                tree(
                    Command::builder("add")
                        .description("Add a remote")
                        .argv(ClapArgv::<RemoteAddArgs>::validated)
                        .sub_route(true)
                        .handler(remote_add)
                        .build(),
                    vec![],
                ),
                tree(
                    Command::builder("list")
                        .description("List remotes")
                        .argv(ClapArgv::<RemoteListArgs>::new)
                        .handler(remote_list)
                        .build(),
                    vec![],
                ),
                tree(
                    Command::builder("remove")
                        .description("Remove a remote")
                        .argv(ClapArgv::<RemoteRemoveArgs>::new)
                        .sub_route(true)
                        .handler(remote_remove)
                        .build(),
                    vec![],
                ),
            ],
        ),
        tree(
            Command::builder("echo")
                .description("Print the remaining arguments")
                .sub_route(true)
                .handler(echo)
                .build(),
            vec![],
        ),
    ])?;
    root.register_fn("version", version, None)?;

    Ok(root)
}

/// Prints the error and returns the exit code.
fn report(root: &Arc<Command>, err: &DispatchError, style: Style) -> i32 {
    match err {
        DispatchError::Argv {
            source: ArgvError::HelpRequested { text },
            ..
        } => {
            print!("{text}");
            0
        }
        DispatchError::MissingHandler { path } => {
            let tokens: Vec<&str> = path.split(' ').collect();
            match root.route(&tokens) {
                Some(command) => {
                    print!("{}", command.usage(style));
                    0
                }
                None => {
                    eprintln!("error: {err}");
                    EXIT_USAGE
                }
            }
        }
        DispatchError::CommandNotFound { path, hint, .. } => {
            eprintln!("error: command {} not found{hint}", style.yellow(path));
            EXIT_USAGE
        }
        DispatchError::Handler(_) | DispatchError::Output(_) => {
            eprintln!("error: {err}");
            EXIT_FAILURE
        }
        _ => {
            eprintln!("error: {err}");
            EXIT_USAGE
        }
    }
}

fn show_usage(ctx: &mut Context) -> Result<(), BoxError> {
    let usage = ctx.usage();
    ctx.string(format_args!("{usage}"))?;
    Ok(())
}

fn hello(ctx: &mut Context) -> Result<(), BoxError> {
    let Some(args) = ctx.argv::<HelloArgs>() else {
        return Err("hello: arguments were not parsed".into());
    };
    let greeting = format!("hello, {}", args.name);
    let greeting = if args.loud {
        format!("{}!", greeting.to_uppercase())
    } else {
        greeting
    };
    ctx.string(format_args!("{greeting}\n"))?;
    Ok(())
}

fn hello_world(ctx: &mut Context) -> Result<(), BoxError> {
    let report = serde_json::json!({
        "path": ctx.path(),
        "router": ctx.router(),
        "args": ctx.args(),
    });
    ctx.json_pretty_ln(&report)?;
    Ok(())
}

fn remote_add(ctx: &mut Context) -> Result<(), BoxError> {
    let Some(args) = ctx.argv::<RemoteAddArgs>() else {
        return Err("remote add: arguments were not parsed".into());
    };
    let line = format!("added remote {} ({})", args.name, args.url);
    let fetch = args.fetch.then(|| format!("fetching {}", args.name));

    ctx.string(format_args!("{line}\n"))?;
    if let Some(fetch) = fetch {
        ctx.string(format_args!("{fetch}\n"))?;
    }
    Ok(())
}

fn remote_list(ctx: &mut Context) -> Result<(), BoxError> {
    let (json, verbose) = match ctx.argv::<RemoteListArgs>() {
        Some(args) => (args.json, args.verbose),
        None => (false, false),
    };

    if json {
        ctx.json_pretty_ln(REMOTES)?;
        return Ok(());
    }
    for remote in REMOTES {
        if verbose {
            ctx.string(format_args!("{}\t{}\n", remote.name, remote.url))?;
        } else {
            ctx.string(format_args!("{}\n", remote.name))?;
        }
    }
    Ok(())
}

fn remote_remove(ctx: &mut Context) -> Result<(), BoxError> {
    let Some(args) = ctx.argv::<RemoteRemoveArgs>() else {
        return Err("remote remove: arguments were not parsed".into());
    };
    let name = args.name.clone();
    if !REMOTES.iter().any(|remote| remote.name == name) {
        return Err(format!("no such remote '{name}'").into());
    }
    ctx.string(format_args!("removed remote {name}\n"))?;
    Ok(())
}

fn echo(ctx: &mut Context) -> Result<(), BoxError> {
    let line = ctx.args().join(" ");
    ctx.string(format_args!("{line}\n"))?;
    Ok(())
}

fn version(ctx: &mut Context) -> Result<(), BoxError> {
    ctx.string(format_args!("cmdtree {PACKAGE_VERSION}\n"))?;
    Ok(())
}
