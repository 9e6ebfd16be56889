// src/cli/args.rs

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Shrew programming language static checker
#[derive(Parser)]
#[command(name = "shrew")]
#[command(version = "0.1.0")]
#[command(about = "Shrew programming language checker", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a Shrew source file for errors
    Check {
        /// Path to the .shrew file, or '-' for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Inspect compilation output (AST)
    Inspect {
        /// What to inspect: ast
        #[arg(value_name = "TYPE")]
        inspect_type: InspectType,

        /// Path to the .shrew file, or '-' for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Clone, Debug, ValueEnum)]
pub enum InspectType {
    Ast,
}
