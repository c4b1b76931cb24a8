mod common;

use common::{write_document, write_wordlist};
use std::process::{Command, Output};

fn docunlock(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docunlock"))
        .args(args)
        .output()
        .expect("Failed to execute docunlock")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_digest_command() {
    let output = docunlock(&["digest", "abc"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_estimate_command() {
    let output = docunlock(&["estimate", "--numbers", "--min-length", "4", "--max-length", "4"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Keyspace: 10000"));
}

#[test]
fn test_estimate_without_charset_fails() {
    let output = docunlock(&["estimate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("alphabet is empty"));
}

#[test]
fn test_crack_with_wordlist_and_incremental() {
    let document = write_document("42");
    let list = write_wordlist(&["alpha", "beta", "gamma"]);
    let output = docunlock(&[
        "crack",
        document.path().to_str().unwrap(),
        "--wordlist",
        list.path().to_str().unwrap(),
        "--incremental",
        "--numbers",
    ]);

    let stdout = stdout(&output);
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        stdout,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Password found: 42"));
    assert!(stdout.contains("Found by: incremental"));
    assert!(stdout.contains("Search Statistics:"));
    assert!(stdout.contains("Total attempts:"));
}

#[test]
fn test_crack_not_found_exits_nonzero() {
    let document = write_document("not in the list");
    let list = write_wordlist(&["alpha", "beta"]);
    let output = docunlock(&[
        "crack",
        document.path().to_str().unwrap(),
        "--wordlist",
        list.path().to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Password not found."));
}

#[test]
fn test_crack_requires_a_strategy() {
    let document = write_document("x");
    let output = docunlock(&["crack", document.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("select at least one strategy"));
}

#[test]
fn test_crack_random_with_timeout() {
    let document = write_document("this is far too long to guess");
    let output = docunlock(&[
        "crack",
        document.path().to_str().unwrap(),
        "--random",
        "--min-length",
        "3",
        "--max-length",
        "4",
        "--seed",
        "5",
        "--timeout",
        "1",
    ]);

    assert!(!output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("[cancelled]"));
    assert!(stdout.contains("Password not found."));
}

#[test]
fn test_benchmark_command() {
    let document = write_document("unused");
    let output = docunlock(&[
        "benchmark",
        document.path().to_str().unwrap(),
        "--count",
        "500",
    ]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Attempts: 500"));
    assert!(stdout.contains("passwords/second"));
}

#[test]
fn test_benchmark_malformed_document_fails() {
    let list = write_wordlist(&["not a digest"]);
    let output = docunlock(&["benchmark", list.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot be checked"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_stops_search_and_reports() {
    use std::io::{BufRead, BufReader, Read};
    use std::process::Stdio;

    let document = write_document("this is far too long to guess");
    let mut child = Command::new(env!("CARGO_BIN_EXE_docunlock"))
        .args([
            "crack",
            document.path().to_str().unwrap(),
            "--random",
            "--min-length",
            "3",
            "--max-length",
            "4",
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to execute docunlock");

    // The handler is installed before any strategy starts.
    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut seen = String::new();
    loop {
        let mut line = String::new();
        if stdout.read_line(&mut line).unwrap() == 0 {
            panic!("docunlock exited early: {seen}");
        }
        seen.push_str(&line);
        if line.contains("[random] started") {
            break;
        }
    }

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to run kill");
    assert!(status.success());

    stdout.read_to_string(&mut seen).unwrap();
    let exit = child.wait().unwrap();

    assert_eq!(exit.code(), Some(1), "stdout: {seen}");
    assert!(seen.contains("Interrupted"));
    assert!(seen.contains("Password not found."));
    assert!(seen.contains("[cancelled]"));
    assert!(seen.contains("Total attempts:"));
}
