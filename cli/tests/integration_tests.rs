use std::process::Output;

fn cmdtree(args: &[&str]) -> Output {
    cmdtree_with_env(args, &[])
}

fn cmdtree_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = std::process::Command::new(env!("CARGO_BIN_EXE_cmdtree"));
    command
        .args(args)
        .env("CMDTREE_COLOR", "never")
        .env_remove("CMDTREE_SUGGESTIONS")
        .env_remove("CMDTREE_LOG");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("failed to run cmdtree")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Successful dispatch
// ---------------------------------------------------------------------------

#[test]
fn no_arguments_prints_root_usage() {
    let output = cmdtree(&[]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("Command tree dispatch demo\n\nCommands:\n"), "{out}");
    for name in ["hello", "remote", "echo", "version"] {
        assert!(out.contains(name), "missing {name} in {out}");
    }
}

#[test]
fn hello_parses_flags() {
    let output = cmdtree(&["hello", "-n", "ada"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "hello, ada\n");

    let output = cmdtree(&["hello", "--loud"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "HELLO, WORLD!\n");
}

#[test]
fn hello_world_reports_routing() {
    let output = cmdtree(&["hello", "world", "-a", "--xyz=1"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["path"], "hello world");
    assert_eq!(report["router"], serde_json::json!(["hello", "world"]));
    assert_eq!(report["args"], serde_json::json!(["-a", "--xyz=1"]));
}

#[test]
fn echo_accepts_trailing_tokens() {
    let output = cmdtree(&["echo", "a", "b", "--c"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "a b --c\n");
}

#[test]
fn remote_list_as_json() {
    let output = cmdtree(&["remote", "list", "--json"]);
    assert!(output.status.success());

    let remotes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let remotes = remotes.as_array().unwrap();
    assert_eq!(remotes.len(), 2);
    assert_eq!(remotes[0]["name"], "origin");
}

#[test]
fn remote_add_with_fetch() {
    let output = cmdtree(&["remote", "add", "mirror", "https://example.com/m.git", "-f"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "added remote mirror (https://example.com/m.git)\nfetching mirror\n"
    );
}

#[test]
fn version_prints_package_version() {
    let output = cmdtree(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!("cmdtree {}\n", env!("CARGO_PKG_VERSION"))
    );
}

// ---------------------------------------------------------------------------
// Help and usage
// ---------------------------------------------------------------------------

#[test]
fn group_without_handler_prints_its_usage() {
    let output = cmdtree(&["remote"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("Manage remotes\n\n"), "{out}");
    assert!(out.contains("Commands:\n"));
    assert!(out.contains("add"));
    assert!(out.contains("remove"));
}

#[test]
fn help_flag_prints_argument_help() {
    let output = cmdtree(&["remote", "add", "--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Add a remote"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn typo_suggests_command() {
    let output = cmdtree(&["helo"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert_eq!(
        stderr(&output),
        "error: command helo not found\nDid you mean hello?\n"
    );
}

#[test]
fn suggestions_can_be_disabled() {
    let output = cmdtree_with_env(&["helo"], &[("CMDTREE_SUGGESTIONS", "false")]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr(&output), "error: command helo not found\n");
}

#[test]
fn invalid_url_fails_validation() {
    let output = cmdtree(&["remote", "add", "origin", "nowhere"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert_eq!(
        stderr(&output),
        "error: remote add: 'nowhere' does not look like a URL\n"
    );
}

#[test]
fn missing_argument_is_usage_error() {
    let output = cmdtree(&["remote", "add", "origin"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("error: remote add: "));
}

#[test]
fn handler_error_exits_with_failure() {
    let output = cmdtree(&["remote", "remove", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "error: no such remote 'nope'\n");

    let output = cmdtree(&["remote", "remove", "origin"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "removed remote origin\n");
}
