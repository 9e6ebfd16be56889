// src/commands/check.rs

use std::path::Path;
use std::process::ExitCode;

use super::common::{parse_and_analyze, read_source};

/// Check a Shrew source file (parse + semantic analysis, no execution)
pub fn check_file(path: &Path) -> ExitCode {
    let (source, file_path) = match read_source(path) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match parse_and_analyze(&source, &file_path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE, // diagnostics already rendered
    }
}
