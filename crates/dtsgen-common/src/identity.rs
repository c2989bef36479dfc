//! Canonical identity of a declared type.
//!
//! A `TypeIdentity` is the only handle used to deduplicate and cross-reference
//! declarations. It is a plain value: two identities are equal when the file,
//! the name and the default-export flag all match. Path and name storage is
//! reference counted so identities can be cloned into every `Reference` that
//! points at them without copying strings.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// Names a declared type by `(file path, local name, is-default-export)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeIdentity {
    file: Rc<Path>,
    name: Rc<str>,
    #[serde(rename = "default")]
    is_default: bool,
}

impl TypeIdentity {
    pub fn new(file: Rc<Path>, name: impl Into<Rc<str>>, is_default: bool) -> Self {
        Self {
            file,
            name: name.into(),
            is_default,
        }
    }

    /// The declaration file that owns this type.
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// Render as `<path -> Name>`, showing the path relative to `base` when
    /// the file lives below it.
    pub fn display_relative(&self, base: &Path) -> String {
        let shown = match self.file.strip_prefix(base) {
            Ok(relative) => Path::new(".").join(relative),
            Err(_) => self.file.to_path_buf(),
        };
        format_uid(&shown, &self.name, self.is_default)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_uid(&self.file, &self.name, self.is_default))
    }
}

fn format_uid(file: &Path, name: &str, is_default: bool) -> String {
    let arrow = if is_default { "=>" } else { "->" };
    format!("<{} {arrow} {name}>", file.display())
}

#[cfg(test)]
#[path = "../tests/identity_tests.rs"]
mod tests;
