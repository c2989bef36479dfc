//! One CLI run: load the root file, resolve the requested exports, render.

use crate::args::{CliArgs, OutputFormat};
use crate::config::Settings;
use crate::render::{render_exports_tree, render_json, render_tree};
use crate::reporter::Reporter;
use anyhow::{Context, Result};
use dtsgen_binder::{DeclarationStore, DeclarationUnit};
use dtsgen_common::Diagnostic;
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub struct RunResult {
    /// Rendered exports, for stdout.
    pub output: String,
    /// Diagnostics of every loaded file.
    pub diagnostics: Vec<Diagnostic>,
    /// `diagnostics` formatted for stderr.
    pub report: String,
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let settings = Settings::resolve(args, cwd)?;
    debug!(?settings, "resolved settings");

    let store = DeclarationStore::new(settings.resolver.clone());
    let root = cwd.join(&args.file);
    let unit = store
        .get(&root)
        .with_context(|| format!("failed to load {}", root.display()))?;

    let output = if args.all || !args.names.is_empty() {
        let names = if args.all {
            export_names(&unit, &store)?
        } else {
            args.names.clone()
        };
        let resolved = names
            .iter()
            .map(|name| {
                store
                    .resolve(&root, name)
                    .with_context(|| format!("failed to resolve export `{name}`"))
            })
            .collect::<Result<Vec<_>>>()?;

        match settings.format {
            OutputFormat::Json => render_json(&resolved)?,
            OutputFormat::Tree => render_tree(&resolved, &settings.base_dir),
        }
    } else {
        let exports = unit
            .exports(&store)
            .with_context(|| format!("failed to read exports of {}", root.display()))?;
        match settings.format {
            OutputFormat::Json => render_json(exports)?,
            OutputFormat::Tree => render_exports_tree(exports, &settings.base_dir),
        }
    };

    let reporter = Reporter::new(settings.color);
    let mut diagnostics = Vec::new();
    let mut report = Vec::new();
    for path in store.paths() {
        let unit = store.get(&path)?;
        for diagnostic in unit.diagnostics() {
            report.push(reporter.format_diagnostic(&diagnostic, unit.text()));
            diagnostics.push(diagnostic);
        }
    }

    Ok(RunResult {
        output,
        diagnostics,
        report: report.join("\n"),
    })
}

/// Every export name of `unit`, with `default` last when present.
fn export_names(unit: &DeclarationUnit, store: &DeclarationStore) -> Result<Vec<String>> {
    let exports = unit
        .exports(store)
        .with_context(|| format!("failed to read exports of {}", unit.path().display()))?;
    let mut names: Vec<String> = exports.names.keys().cloned().collect();
    if exports.default.is_some() {
        names.push("default".to_string());
    }
    Ok(names)
}
