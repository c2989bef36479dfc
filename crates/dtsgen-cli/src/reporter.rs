use colored::Colorize;
use dtsgen_common::{Diagnostic, DiagnosticCategory};

/// Formats skipped-construct diagnostics as `file:line:col - category code: message`.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// `source` is the text of the diagnostic's file, used for line/column.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic, source: &str) -> String {
        let (line, column) = line_and_column(source, diagnostic.start as usize);
        let location = format!("{}:{line}:{column}", diagnostic.file);
        let category = match diagnostic.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };
        let code = format!("DTS{}", diagnostic.code);

        if !self.color {
            return format!("{location} - {category} {code}: {}", diagnostic.message_text);
        }

        let category = match diagnostic.category {
            DiagnosticCategory::Warning => category.yellow(),
            DiagnosticCategory::Message => category.cyan(),
        };
        format!(
            "{} - {category} {}: {}",
            location.cyan(),
            code.bright_black(),
            diagnostic.message_text
        )
    }
}

/// 1-based line and column of byte `offset`.
pub fn line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    (line, before[line_start..].chars().count() + 1)
}
