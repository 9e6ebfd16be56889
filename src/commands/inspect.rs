// src/commands/inspect.rs

use std::path::Path;
use std::process::ExitCode;

use super::common::{parse, read_source};
use crate::cli::InspectType;
use crate::frontend::printer::print_ast;

/// Print compilation output for a source file (currently the AST dump)
pub fn inspect_file(path: &Path, inspect_type: InspectType) -> ExitCode {
    let (source, file_path) = match read_source(path) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let analyzed = match parse(&source, &file_path) {
        Ok(analyzed) => analyzed,
        Err(()) => return ExitCode::FAILURE,
    };

    match inspect_type {
        InspectType::Ast => {
            print!(
                "{}",
                print_ast(&analyzed.ast, &analyzed.interner, analyzed.root)
            );
        }
    }
    ExitCode::SUCCESS
}
