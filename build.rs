use std::env;
use std::process::Command;

fn output(cmd: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(cmd).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    Some(text.trim().to_string())
}

fn main() {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    if let Some(version) = output(&rustc, &["--version"]) {
        println!("cargo:rustc-env=TRACELEVEL_RUSTC_VERSION={version}");
    }

    if let Some(revision) = output("git", &["rev-parse", "HEAD"]) {
        println!("cargo:rustc-env=TRACELEVEL_VCS_REVISION={revision}");
        if let Some(time) = output("git", &["log", "-1", "--format=%cI"]) {
            println!("cargo:rustc-env=TRACELEVEL_VCS_TIME={time}");
        }
        if let Some(status) = output("git", &["status", "--porcelain"]) {
            println!("cargo:rustc-env=TRACELEVEL_VCS_MODIFIED={}", !status.is_empty());
        }
        println!("cargo:rerun-if-changed=.git/HEAD");
        println!("cargo:rerun-if-changed=.git/index");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
