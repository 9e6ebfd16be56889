// src/commands/common.rs
//! Shared utilities for CLI commands.

use std::io::{IsTerminal, Read};
use std::path::Path;

use crate::errors::render_to_stderr;
use crate::frontend::{Ast, Interner, NodeId, Parser};
use crate::sema::Analyzer;
use miette::NamedSource;

/// Result of parsing and analyzing a source file.
pub struct AnalyzedProgram {
    pub ast: Ast,
    pub interner: Interner,
    pub root: NodeId,
}

/// Read source from a path, or stdin when the path is "-".
pub fn read_source(path: &Path) -> Result<(String, String), String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("could not read stdin: {}", e))?;
        return Ok((source, "<stdin>".to_string()));
    }
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    Ok((source, path.to_string_lossy().to_string()))
}

/// Parse a source file, rendering any diagnostics on error.
pub fn parse(source: &str, file_path: &str) -> Result<AnalyzedProgram, ()> {
    let mut parser = Parser::new(source);
    let result = parser.parse_program();

    let lexer_errors = parser.take_lexer_errors();
    match result {
        Ok(root) => {
            if !lexer_errors.is_empty() {
                for error in lexer_errors {
                    render_with_source(error, source, file_path);
                }
                return Err(());
            }
            let (ast, interner) = parser.into_parts();
            Ok(AnalyzedProgram {
                ast,
                interner,
                root,
            })
        }
        Err(e) => {
            if lexer_errors.is_empty() {
                render_with_source(e.error, source, file_path);
            } else {
                // the parse error is likely a consequence of an error token;
                // show the lexer errors alone
                for error in lexer_errors {
                    render_with_source(error, source, file_path);
                }
            }
            Err(())
        }
    }
}

/// Parse and analyze a source file, rendering any diagnostics on error.
///
/// Returns `Ok(AnalyzedProgram)` on success, or `Err(())` if there were
/// errors (diagnostics are rendered to stderr before returning).
pub fn parse_and_analyze(source: &str, file_path: &str) -> Result<AnalyzedProgram, ()> {
    let analyzed = parse(source, file_path)?;

    let mut analyzer = Analyzer::new(&analyzed.ast, &analyzed.interner);
    if let Err(errors) = analyzer.analyze(analyzed.root) {
        for error in errors {
            render_with_source(error.error, source, file_path);
        }
        return Err(());
    }

    Ok(analyzed)
}

fn render_with_source(
    error: impl miette::Diagnostic + Send + Sync + 'static,
    source: &str,
    file_path: &str,
) {
    let report = miette::Report::new(error)
        .with_source_code(NamedSource::new(file_path, source.to_string()));
    render_to_stderr(report.as_ref());
}

/// Check if stderr supports color output.
pub fn stderr_supports_color() -> bool {
    std::io::stderr().is_terminal()
}
