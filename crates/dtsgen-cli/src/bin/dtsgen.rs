#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;

use dtsgen_cli::args::CliArgs;
use dtsgen_cli::{driver, tracing_config};

fn main() -> Result<()> {
    // Initialize tracing if DTSGEN_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let result = driver::run(&args, &cwd)?;
    if !result.report.is_empty() {
        eprintln!("{}", result.report);
    }
    println!("{}", result.output);
    Ok(())
}
