//! Non-fatal diagnostics recorded while scanning declaration files.
//!
//! Some recognizable-but-unsupported constructs (library imports, wildcard
//! renames, value declarations) are skipped instead of failing. Each skip is
//! recorded as a `Diagnostic` on the owning unit so callers can report them.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Message = 3,
}

/// A diagnostic anchored to a statement of a declaration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Build a diagnostic from a message definition and its arguments.
    #[must_use]
    pub fn from_message(
        message: &DiagnosticMessage,
        file: impl Into<String>,
        start: u32,
        length: u32,
        args: &[&str],
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: format_message(message.message, args),
            category: message.category,
            code: message.code,
        }
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const SKIPPING_LIBRARY_IMPORT: u32 = 9001;
    pub const SKIPPING_LIBRARY_REEXPORT: u32 = 9002;
    pub const SKIPPING_WILDCARD_RENAME: u32 = 9003;
    pub const SKIPPING_NAMESPACE_IMPORT: u32 = 9004;
    pub const SKIPPING_SIDE_EFFECT_IMPORT: u32 = 9005;
    pub const SKIPPING_VALUE_DECLARATION: u32 = 9006;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const SKIPPING_LIBRARY_IMPORT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SKIPPING_LIBRARY_IMPORT,
        category: DiagnosticCategory::Message,
        message: "Skipping library import: {0}",
    };
    pub const SKIPPING_LIBRARY_REEXPORT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SKIPPING_LIBRARY_REEXPORT,
        category: DiagnosticCategory::Message,
        message: "Skipping library re-export: {0}",
    };
    pub const SKIPPING_WILDCARD_RENAME: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SKIPPING_WILDCARD_RENAME,
        category: DiagnosticCategory::Warning,
        message: "Skipping wildcard rename export: {0}",
    };
    pub const SKIPPING_NAMESPACE_IMPORT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SKIPPING_NAMESPACE_IMPORT,
        category: DiagnosticCategory::Warning,
        message: "Skipping namespace import '{0}' from '{1}'",
    };
    pub const SKIPPING_SIDE_EFFECT_IMPORT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SKIPPING_SIDE_EFFECT_IMPORT,
        category: DiagnosticCategory::Message,
        message: "Skipping side-effect import: {0}",
    };
    pub const SKIPPING_VALUE_DECLARATION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SKIPPING_VALUE_DECLARATION,
        category: DiagnosticCategory::Message,
        message: "Skipping value declaration '{0}'",
    };
}
