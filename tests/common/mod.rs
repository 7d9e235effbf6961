//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Corpus used by most tests: one unscored, one scored, one skipped pair.
pub const SCENARIO: &str = "a\tb\n1\tc\td\n?\te\tf\n";

pub fn write_corpus(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("corpus.txt");
    std::fs::write(&path, contents).expect("write corpus fixture");
    path
}

/// Run the built stsanno binary with the given arguments.
pub fn run_stsanno(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stsanno"))
        .args(args)
        .output()
        .expect("run stsanno")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
