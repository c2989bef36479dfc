//! Module specifier resolution.
//!
//! Only relative specifiers (`./x.js`, `../y`) name sibling declaration files.
//! Anything else is a library import and is left to the caller to skip.

use crate::options::ResolverOptions;
use dtsgen_common::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// True for `./`, `../`, `.` and `..` specifiers.
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Resolve a relative `specifier` written in `importer` to a declaration
/// file path, rewriting the source suffix to the declaration suffix.
pub fn resolve_specifier(importer: &Path, specifier: &str, options: &ResolverOptions) -> PathBuf {
    let directory = importer.parent().unwrap_or_else(|| Path::new(""));
    let joined = normalize_path(&directory.join(specifier));
    with_declaration_suffix(&joined, options)
}

/// `x.js` → `x.d.ts`; `x` → `x.d.ts`; `x.d.ts` unchanged.
pub fn with_declaration_suffix(path: &Path, options: &ResolverOptions) -> PathBuf {
    let text = path.to_string_lossy();
    if text.ends_with(options.declaration_suffix.as_str()) {
        return path.to_path_buf();
    }
    let stem = text
        .strip_suffix(options.source_suffix.as_str())
        .filter(|_| !options.source_suffix.is_empty())
        .unwrap_or(&text);
    PathBuf::from(format!("{stem}{}", options.declaration_suffix))
}

/// Lexically remove `.` and `..` components. Leading `..` components of a
/// relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !path.has_root() {
                    normalized.push("..");
                }
            }
            Component::RootDir | Component::Normal(_) | Component::Prefix(_) => {
                normalized.push(component.as_os_str());
            }
        }
    }

    normalized
}

/// The key a file is cached under: canonical when the file exists.
///
/// Fails with `FileNotFound` when nothing exists at `path`.
pub fn canonical_path(path: &Path) -> Result<PathBuf> {
    let normalized = normalize_path(path);
    match std::fs::canonicalize(&normalized) {
        Ok(canonical) => Ok(canonical),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::FileNotFound { path: normalized })
        }
        Err(source) => Err(Error::Io {
            path: normalized,
            source,
        }),
    }
}

#[cfg(test)]
#[path = "../tests/module_path_tests.rs"]
mod tests;
