//! Common types and utilities for the dtsgen declaration extractor.
//!
//! This crate provides foundational types used across all dtsgen crates:
//! - Type identities (`TypeIdentity`) shared between the parser and binder
//! - The error type and its kinds (`Error`, `ErrorKind`, `Result`)
//! - Non-fatal diagnostics recorded while scanning files
//! - Comment stripping for declaration sources
//! - Recursion limits

// Identity of a declared type: (file, name, default flag)
pub mod identity;
pub use identity::TypeIdentity;

// Fatal errors
pub mod error;
pub use error::{Error, ErrorKind, Result};

// Recorded, non-fatal diagnostics (skipped imports and statements)
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Comment parsing utilities
pub mod comments;

// Centralized limits and thresholds
pub mod limits;
