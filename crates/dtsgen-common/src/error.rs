//! Fatal errors raised while scanning or parsing declaration files.
//!
//! Every error is fatal for the file or declaration being processed. Inputs are
//! static text, so a failure is deterministic and reproducible; callers report
//! it and stop rather than retry.

use crate::identity::TypeIdentity;
use crate::limits::MAX_ERROR_EXCERPT;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Flat classification of [`Error`], stable across context wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotFound,
    Io,
    UnresolvedImport,
    UnresolvedAlias,
    UnbalancedDelimiter,
    MalformedDeclaration,
    MalformedProperty,
    UnsupportedGeneric,
    AmbiguousDelimiterMix,
    NestingTooDeep,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file doesn't exist: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't find export \"{name}\" in {}", file.display())]
    UnresolvedImport { name: String, file: PathBuf },

    #[error("alias \"{alias}\" in {} refers to {target}, which is not exported", file.display())]
    UnresolvedAlias {
        alias: String,
        file: PathBuf,
        target: String,
    },

    #[error("could not find a pair of {open}{close} in {text}")]
    UnbalancedDelimiter {
        open: char,
        close: char,
        text: String,
    },

    #[error("invalid content: {text}")]
    MalformedDeclaration { text: String },

    #[error("invalid object property: {text}")]
    MalformedProperty { text: String },

    #[error("`{name}` declares more than one generic parameter: <{parameters}>")]
    UnsupportedGeneric { name: String, parameters: String },

    #[error("cannot use both | and & in the same expression: {text}")]
    AmbiguousDelimiterMix { text: String },

    #[error("expression nesting exceeds {limit} levels")]
    NestingTooDeep { limit: u32 },

    #[error("in {}: {source}", file.display())]
    InFile {
        file: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("in {declaration}: {source}")]
    InDeclaration {
        declaration: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound { .. } => ErrorKind::FileNotFound,
            Error::Io { .. } => ErrorKind::Io,
            Error::UnresolvedImport { .. } => ErrorKind::UnresolvedImport,
            Error::UnresolvedAlias { .. } => ErrorKind::UnresolvedAlias,
            Error::UnbalancedDelimiter { .. } => ErrorKind::UnbalancedDelimiter,
            Error::MalformedDeclaration { .. } => ErrorKind::MalformedDeclaration,
            Error::MalformedProperty { .. } => ErrorKind::MalformedProperty,
            Error::UnsupportedGeneric { .. } => ErrorKind::UnsupportedGeneric,
            Error::AmbiguousDelimiterMix { .. } => ErrorKind::AmbiguousDelimiterMix,
            Error::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            Error::InFile { source, .. } | Error::InDeclaration { source, .. } => source.kind(),
        }
    }

    pub fn malformed_declaration(text: &str) -> Self {
        Error::MalformedDeclaration {
            text: excerpt(text),
        }
    }

    pub fn malformed_property(text: &str) -> Self {
        Error::MalformedProperty {
            text: excerpt(text),
        }
    }

    pub fn ambiguous_delimiters(text: &str) -> Self {
        Error::AmbiguousDelimiterMix {
            text: excerpt(text),
        }
    }

    pub fn unbalanced(open: char, close: char, text: &str) -> Self {
        Error::UnbalancedDelimiter {
            open,
            close,
            text: excerpt(text),
        }
    }

    pub fn unresolved_alias(alias: &str, file: impl Into<PathBuf>, target: &TypeIdentity) -> Self {
        Error::UnresolvedAlias {
            alias: alias.to_string(),
            file: file.into(),
            target: target.to_string(),
        }
    }

    pub fn in_file(self, file: impl Into<PathBuf>) -> Self {
        Error::InFile {
            file: file.into(),
            source: Box::new(self),
        }
    }

    pub fn in_declaration(self, identity: &TypeIdentity) -> Self {
        Error::InDeclaration {
            declaration: identity.to_string(),
            source: Box::new(self),
        }
    }
}

/// Shorten offending source text for error messages.
fn excerpt(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_EXCERPT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
