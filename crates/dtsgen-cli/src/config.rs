//! `dtsgen.json` config files and their merge with command-line flags.

use crate::args::{CliArgs, OutputFormat};
use anyhow::{Context, Result};
use dtsgen_binder::ResolverOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the config file looked up next to the root declaration file.
pub const CONFIG_FILE_NAME: &str = "dtsgen.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DtsgenConfig {
    pub resolver: ResolverOptions,
    /// Relative to the config file's directory.
    pub base_dir: Option<PathBuf>,
}

pub fn parse_config(source: &str) -> Result<DtsgenConfig> {
    serde_json::from_str(source).context("failed to parse dtsgen config JSON")
}

pub fn load_config(path: &Path) -> Result<DtsgenConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    if let Some(base_dir) = config.base_dir.take() {
        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        config.base_dir = Some(directory.join(base_dir));
    }
    Ok(config)
}

/// Effective settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub resolver: ResolverOptions,
    pub base_dir: PathBuf,
    pub format: OutputFormat,
    pub color: bool,
}

impl Settings {
    /// Merge the config file (explicit or discovered) with `args`; flags win.
    pub fn resolve(args: &CliArgs, cwd: &Path) -> Result<Self> {
        let root = cwd.join(&args.file);
        let config_path = match &args.config {
            Some(path) => Some(cwd.join(path)),
            None => find_config(&root),
        };
        let config = match &config_path {
            Some(path) => load_config(path)?,
            None => DtsgenConfig::default(),
        };

        let base_dir = match (&args.base_dir, config.base_dir) {
            (Some(flag), _) => cwd.join(flag),
            (None, Some(configured)) => configured,
            (None, None) => root
                .parent()
                .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf),
        };

        Ok(Self {
            resolver: config.resolver,
            base_dir: std::fs::canonicalize(&base_dir).unwrap_or(base_dir),
            format: args.format.unwrap_or_default(),
            color: !args.no_color,
        })
    }
}

/// `dtsgen.json` in the root file's directory, if present.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    let candidate = root.parent()?.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
