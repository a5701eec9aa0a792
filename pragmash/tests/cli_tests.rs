/// Command-line tests: run the built `pragmash` binary with scripts on stdin
/// or in temporary files and check its stdout, stderr and exit status.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `pragmash` binary built by this Cargo workspace.
fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pragmash"))
}

/// Run the binary with `args`, feeding `stdin`, with `home` as `$HOME`.
fn run_in(home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(binary())
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn pragmash binary");
    child
        .stdin
        .as_mut()
        .expect("stdin not open")
        .write_all(stdin.as_bytes())
        .expect("write to stdin");
    child.wait_with_output().expect("wait failed")
}

/// Run with an empty home directory so no rc file is picked up.
fn run(args: &[&str], stdin: &str) -> Output {
    let home = tempfile::tempdir().expect("tempdir");
    run_in(home.path(), args, stdin)
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn script_file(dir: &Path, src: &str) -> PathBuf {
    let path = dir.join("script.pm");
    std::fs::write(&path, src).expect("write script");
    path
}

// ── -c ────────────────────────────────────────────────────────────────────────

#[test]
fn command_prints_result() {
    let out = run(&["-f", "-c", "add 1 2"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "3\n");
}

#[test]
fn command_nested_exact_arithmetic() {
    let out = run(&["-c", "* (/ 1 3) 3"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "1\n");
}

#[test]
fn command_failure_exits_nonzero() {
    let out = run(&["-c", "div 1 0"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("pragmash: divide by zero"), "{}", stderr(&out));
}

#[test]
fn command_arity_error() {
    let out = run(&["-c", "sub 1"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("sub: expected 2 argument(s), got 1"), "{}", stderr(&out));
}

#[test]
fn command_condition() {
    let out = run(&["-c", "if (= a a) {"], "");
    assert_eq!(stdout(&out), "true\n");
    let out = run(&["-c", "while not (< 1 2) {"], "");
    assert_eq!(stdout(&out), "\n");
}

#[test]
fn command_block_statement_rejected() {
    let out = run(&["-c", "for x {"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("for: block statements need a script"));
}

#[test]
fn command_syntax_error() {
    let out = run(&["-c", "echo (oops"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("missing close paren"));
}

#[test]
fn command_token_dump() {
    let out = run(&["-t", "-c", "echo (join a b) 'x y'"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "1: echo (join a b) \"x y\"\nab x y\n");
}

// ── Scripts ───────────────────────────────────────────────────────────────────

#[test]
fn balanced_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = script_file(dir.path(), "if a {\n  echo x\n} else {\n  echo y\n}\n");
    let out = run(&["-f", path.to_str().unwrap()], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "");
}

#[test]
fn unclosed_block_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = script_file(dir.path(), "echo ok\nwhile a {\n  echo x\n");
    let out = run(&[path.to_str().unwrap()], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("line 2: block is never closed"), "{}", stderr(&out));
}

#[test]
fn missing_script_file() {
    let out = run(&["/nonexistent/script.pm"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("/nonexistent/script.pm"));
}

#[test]
fn stdin_script_syntax_error() {
    let out = run(&[], "echo fine\n\n# comment\necho 'open\n");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("line 4: missing string terminator"), "{}", stderr(&out));
}

#[test]
fn stdin_eof_after_continuation() {
    let out = run(&[], "echo a \\");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("EOF after line continuation"));
}

#[test]
fn stdin_token_dump() {
    let out = run(&["-t"], "if a \\\n b {\n} else {\n}\n");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "1: if a b {\n3: } else {\n4: }\n");
}

// ── rc file ───────────────────────────────────────────────────────────────────

#[test]
fn explicit_rc_file() {
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join("rc");
    std::fs::write(&rc, "alias plus add\n").unwrap();
    let flag = format!("-f{}", rc.display());
    let out = run(&[&flag, "-c", "plus 2 3"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "5\n");
}

#[test]
fn home_rc_file() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(".pragmashrc"), "alias '%' mod\n").unwrap();
    let out = run_in(home.path(), &["-c", "% 7 4"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "3\n");

    // -f alone skips it.
    let out = run_in(home.path(), &["-f", "-c", "% 7 4"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unknown command: %"));
}

#[test]
fn rc_errors_are_warnings() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(".pragmashrc"), "bogus\nalias plus add\n").unwrap();
    let out = run_in(home.path(), &["-c", "plus 1 1"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "2\n");
    assert!(stderr(&out).contains("unknown directive: bogus"), "{}", stderr(&out));
}

// ── Usage ─────────────────────────────────────────────────────────────────────

#[test]
fn bad_flag_prints_usage() {
    let out = run(&["-z"], "");
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Usage: pragmash"));
}
