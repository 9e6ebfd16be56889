// src/bin/shrew.rs

use clap::Parser;
use std::process::ExitCode;

use shrew::cli::{Cli, Commands};
use shrew::commands::check::check_file;
use shrew::commands::inspect::inspect_file;
use shrew::errors::set_color_mode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color mode before any output
    set_color_mode(cli.color);

    match cli.command {
        Commands::Check { file } => check_file(&file),
        Commands::Inspect { inspect_type, file } => inspect_file(&file, inspect_type),
    }
}
