//! End-to-end tests for the `ls8` binary
//!
//! Each test runs the built interpreter against a program from `demos/`
//! and checks stdout and the exit status.

use std::path::PathBuf;
use std::process::{Command, Output};

fn demo(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("demos");
    path.push(name);
    path
}

fn ls8(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ls8"))
        .args(args)
        .env_remove("LS8_TRACE")
        .env_remove("LS8_MAX_INSTRUCTIONS")
        .output()
        .expect("Failed to run ls8")
}

fn run_demo(name: &str) -> Output {
    let path = demo(name);
    ls8(&[path.to_str().unwrap()])
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn print8() {
    let output = run_demo("print8.ls8");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "8\n");
}

#[test]
fn mult() {
    let output = run_demo("mult.ls8");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "72\n");
}

#[test]
fn wrap() {
    let output = run_demo("wrap.ls8");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "44\n");
}

#[test]
fn stack() {
    let output = run_demo("stack.ls8");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "2\n4\n1\n");
}

#[test]
fn call() {
    let output = run_demo("call.ls8");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "20\n30\n36\n60\n");
}

#[test]
fn bad_opcode_stops_with_error() {
    let output = run_demo("bad_opcode.ls8");
    assert_eq!(output.status.code(), Some(4));
    // Only the PRN before the bad byte ran
    assert_eq!(stdout(&output), "1\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Bad input: 255"), "stderr was: {}", stderr);
}

#[test]
fn malformed_program() {
    let output = run_demo("malformed.ls8");
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 4"), "stderr was: {}", stderr);
}

#[test]
fn missing_file() {
    let output = ls8(&["no_such_program.ls8"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no_such_program.ls8: File not found"));
}

#[test]
fn usage_errors() {
    assert_eq!(ls8(&[]).status.code(), Some(1));

    let path = demo("print8.ls8");
    let path = path.to_str().unwrap();
    assert_eq!(ls8(&[path, path]).status.code(), Some(1));
    assert_eq!(ls8(&["--bogus", path]).status.code(), Some(1));
    assert_eq!(ls8(&[path, "--config"]).status.code(), Some(1));
}

#[test]
fn trace_flag() {
    let path = demo("print8.ls8");
    let output = ls8(&["--trace", path.to_str().unwrap()]);
    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 00",
            "TRACE: 03 | 47 00 01 | 08 00 00 00 00 00 00 00",
            "8",
            "TRACE: 05 | 01 00 00 | 08 00 00 00 00 00 00 00",
        ]
    );
}

#[test]
fn disassemble_flag() {
    let path = demo("call.ls8");
    let output = ls8(&["--disassemble", path.to_str().unwrap()]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("00: 82 01 18   LDI R1,24"));
    assert!(out.contains("06: 50 01      CALL R1"));
    assert!(out.contains("17: 01         HLT"));
    assert!(out.contains("18: a0 00 00   ADD R0,R0"));
    assert!(out.contains("1d: 11         RET"));
}

#[test]
fn instruction_limit_from_environment() {
    let path = demo("call.ls8");
    let output = Command::new(env!("CARGO_BIN_EXE_ls8"))
        .arg(path)
        .env("LS8_MAX_INSTRUCTIONS", "5")
        .output()
        .expect("Failed to run ls8");
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Instruction limit of 5"));
}

#[test]
fn config_file_enables_trace() {
    let config = demo("trace.toml");
    let program = demo("print8.ls8");
    let output = ls8(&[
        "--config",
        config.to_str().unwrap(),
        program.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert_eq!(out.lines().filter(|l| l.starts_with("TRACE:")).count(), 3);
    assert!(out.lines().any(|l| l == "8"));
}

#[test]
fn bad_config_file() {
    let config = demo("malformed.ls8");
    let program = demo("print8.ls8");
    let output = ls8(&[
        "--config",
        config.to_str().unwrap(),
        program.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stdout(&output).is_empty());
}
