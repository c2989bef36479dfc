//! Resolver options.

use serde::{Deserialize, Serialize};

/// How module specifiers map to declaration files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverOptions {
    /// Suffix of the declaration files the engine reads.
    pub declaration_suffix: String,
    /// Suffix used by relative specifiers in import statements, rewritten to
    /// `declaration_suffix`.
    pub source_suffix: String,
    /// Remove `//` and `/* */` comments before statement chunking.
    pub strip_comments: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            declaration_suffix: ".d.ts".to_string(),
            source_suffix: ".js".to_string(),
            strip_comments: true,
        }
    }
}
