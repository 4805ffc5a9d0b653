use std::process::Command;

use tempfile::TempDir;

#[test]
fn help_lists_shader_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_shadertrace"))
        .arg("--help")
        .output()
        .expect("failed to run shadertrace --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--vertex",
        "--fragment",
        "--size",
        "--on-missing-source",
        "--on-shader-error",
        "--redraw",
        "--profile",
    ] {
        assert!(stdout.contains(flag), "help output is missing {flag}");
    }
}

#[test]
fn rejects_malformed_size_before_opening_a_window() {
    let workdir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_shadertrace"))
        .current_dir(workdir.path())
        .args(["--size", "600by600"])
        .output()
        .expect("failed to run shadertrace");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WIDTHxHEIGHT"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("GPU initialization successful!"));
}

#[test]
fn rejects_unknown_policy() {
    let output = Command::new(env!("CARGO_BIN_EXE_shadertrace"))
        .args(["--on-shader-error", "ignore"])
        .output()
        .expect("failed to run shadertrace");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fallback or abort"));
}
