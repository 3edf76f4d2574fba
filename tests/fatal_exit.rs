//! `fatal!` terminates the process after logging.

use std::process::Command;

#[test]
fn test_unloadable_config_is_fatal() {
    let output = Command::new(env!("CARGO_BIN_EXE_tracelevel"))
        .args(["--config", "/definitely/not/here.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(tracelevel::logger::FATAL_EXIT_CODE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"));
    assert!(stderr.contains("fatal=true"));
    assert!(stderr.contains("here.toml"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[control]\npath_prefix = \"nope\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tracelevel"))
        .arg("--config")
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("path_prefix"));
}

#[test]
fn test_route_syntax_prefix_is_fatal_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("braces.toml");
    std::fs::write(&path, "[control]\npath_prefix = \"/log{x\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tracelevel"))
        .arg("--config")
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"));
    assert!(!stderr.contains("panicked"));
}
