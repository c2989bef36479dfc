use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the dtsgen binary.
#[derive(Parser, Debug)]
#[command(
    name = "dtsgen",
    version,
    about = "Extract structural type descriptions from TypeScript declaration files"
)]
pub struct CliArgs {
    /// Root declaration file.
    pub file: PathBuf,

    /// Exported names to resolve. Without names, the export table is printed.
    pub names: Vec<String>,

    /// Resolve every export of the root file.
    #[arg(long, conflicts_with = "names")]
    pub all: bool,

    /// Output format.
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Directory file paths are shown relative to.
    #[arg(long = "base-dir", alias = "baseDir")]
    pub base_dir: Option<PathBuf>,

    /// JSON config file. Defaults to `dtsgen.json` next to the root file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Tree,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
