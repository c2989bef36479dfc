//! Output formatting: pretty JSON, or an indented tree for reading.

use anyhow::{Context, Result};
use dtsgen_binder::{ExportTable, Resolved};
use dtsgen_parser::Expression;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}

/// One block per resolved export, headed by its identity.
pub fn render_tree(entries: &[Resolved], base: &Path) -> String {
    let mut out = String::new();
    for entry in entries {
        line(&mut out, 0, &entry.identity.display_relative(base));
        write_expression(&mut out, "", &entry.expression, 1, base);
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_exports_tree(table: &ExportTable, base: &Path) -> String {
    let mut out = String::new();
    for (name, identity) in &table.names {
        line(&mut out, 0, &format!("{name} {}", identity.display_relative(base)));
    }
    if let Some(identity) = &table.default {
        line(&mut out, 0, &format!("default {}", identity.display_relative(base)));
    }
    out.truncate(out.trim_end().len());
    out
}

fn write_expression(
    out: &mut String,
    label: &str,
    expression: &Expression,
    depth: usize,
    base: &Path,
) {
    match expression {
        Expression::Reference { identity, argument } => {
            line(out, depth, &format!("{label}reference {}", identity.display_relative(base)));
            if let Some(argument) = argument {
                write_expression(out, "argument: ", argument, depth + 1, base);
            }
        }
        Expression::Literal { value } => line(out, depth, &format!("{label}literal {value}")),
        Expression::Primitive { kind } => {
            line(out, depth, &format!("{label}primitive {}", kind.as_str()));
        }
        Expression::Array { element } => {
            line(out, depth, &format!("{label}array"));
            write_expression(out, "", element, depth + 1, base);
        }
        Expression::Object(object) => {
            line(out, depth, &format!("{label}object"));
            for (name, property) in &object.properties {
                let mark = if property.optional { "?" } else { "" };
                write_expression(out, &format!("{name}{mark}: "), &property.value, depth + 1, base);
            }
            if let Some(dynamic) = &object.dynamic {
                write_expression(out, "[key]: ", dynamic, depth + 1, base);
            }
        }
        Expression::Wrapped { inner, .. } => {
            line(out, depth, &format!("{label}promise"));
            write_expression(out, "", inner, depth + 1, base);
        }
        Expression::Union { members } | Expression::Intersection { members } => {
            let kind = if matches!(expression, Expression::Union { .. }) {
                "union"
            } else {
                "intersection"
            };
            line(out, depth, &format!("{label}{kind}"));
            for member in members {
                write_expression(out, "", member, depth + 1, base);
            }
        }
        Expression::Generic => line(out, depth, &format!("{label}generic")),
        Expression::Unknown => line(out, depth, &format!("{label}unknown")),
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    let _ = writeln!(out, "{:indent$}{text}", "", indent = depth * 2);
}
