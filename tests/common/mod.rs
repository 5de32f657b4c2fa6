//! Shared harness for driving the `wsw` binary in integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Captured outcome of one CLI invocation.
pub struct CaseResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn log_dir() -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("wsw-cli-cases");
    fs::create_dir_all(&dir).expect("create case log dir");
    dir
}

/// Run `wsw` with `args` and write a per-case log for failure diagnosis.
pub fn run_cli_case(case: &str, args: &[&str]) -> CaseResult {
    let output = Command::new(env!("CARGO_BIN_EXE_wsw"))
        .args(args)
        .env_remove("WSW_ROOT")
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn wsw");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = log_dir().join(format!("{case}.log"));
    let log = format!(
        "args: {args:?}\nstatus: {}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}\n",
        output.status
    );
    fs::write(&log_path, log).expect("write case log");

    CaseResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// Create `rel` under `root` with `contents`, making parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}
