#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run the binary with `args` from `cwd`, with `$HOME` pointed at `home`.
pub fn run_cli(args: &[&str], cwd: &Path, home: &Path) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_cctranscripts"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn binary");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// A scratch `$HOME` plus a transcript directory to scan with `--dir`.
/// The `TempDir`s must be kept alive for the duration of the test.
pub struct Fixture {
    pub home: tempfile::TempDir,
    pub transcripts: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
            transcripts: tempfile::tempdir().unwrap(),
        }
    }

    pub fn dir(&self) -> &str {
        self.transcripts.path().to_str().unwrap()
    }

    /// Write a transcript file named `<name>.jsonl` from JSONL lines.
    pub fn write(&self, name: &str, lines: &[String]) -> PathBuf {
        write_transcript(self.transcripts.path(), name, lines)
    }

    /// Run with `--dir` pointed at the fixture's transcript directory.
    pub fn run(&self, args: &[&str]) -> (i32, String, String) {
        let mut full = vec!["--dir", self.dir()];
        full.extend_from_slice(args);
        run_cli(&full, self.home.path(), self.home.path())
    }
}

pub fn write_transcript(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(format!("{name}.jsonl"));
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(&path, contents).unwrap();
    path
}

pub fn summary_line(summary: &str) -> String {
    serde_json::json!({
        "type": "summary",
        "summary": summary,
        "leafUuid": uuid::Uuid::new_v4().to_string(),
    })
    .to_string()
}

pub fn user_line(session_id: &str, timestamp: &str, content: &str) -> String {
    serde_json::json!({
        "type": "user",
        "uuid": uuid::Uuid::new_v4().to_string(),
        "parentUuid": null,
        "sessionId": session_id,
        "timestamp": timestamp,
        "message": { "role": "user", "content": content }
    })
    .to_string()
}

pub fn session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create a temp dir containing an empty git repo and return it.
pub fn temp_git_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git2::Repository::init(dir.path()).unwrap();
    dir
}
