use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

/// Binary invocation independent of the caller's logging environment
fn command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_unique-ipv4-counter"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(input: &str, args: &[&str]) -> Output {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(input.as_bytes()).unwrap();
    file.flush().unwrap();

    command().arg(file.path()).args(args).output().unwrap()
}

#[test]
fn test_result_line() {
    let output = run("1.1.1.1\n1.1.1.1\n0.0.0.0\n255.255.255.255\n", &[]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "RESULT: 3 ipv4 found\n");
}

#[test]
fn test_empty_file() {
    let output = run("", &[]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "RESULT: 0 ipv4 found\n");
}

#[test]
fn test_strict_fails() {
    let output = run("10.0.0.1\n999.1.1.1\n", &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}

#[test]
fn test_lenient_warns() {
    let output = run("10.0.0.1\n999.1.1.1\n10.0.0.2\n", &["--policy", "lenient"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "RESULT: 2 ipv4 found\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("skipping line 2"));
}

#[test]
fn test_missing_file() {
    let output = command().arg("/nonexistent/ipv4.txt").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/ipv4.txt"));
}

#[test]
fn test_missing_file_with_logging_off() {
    let output = command()
        .env("RUST_LOG", "off")
        .arg("/nonexistent/ipv4.txt")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "));
    assert!(stderr.contains("/nonexistent/ipv4.txt"));
}

#[test]
fn test_strict_fails_with_logging_off() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"10.0.0.1\n1.2.3\n").unwrap();
    file.flush().unwrap();

    let output = command()
        .env("RUST_LOG", "off")
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}
