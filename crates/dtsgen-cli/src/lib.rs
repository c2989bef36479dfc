//! Command-line front end for the dtsgen declaration extractor.

pub mod args;
pub mod config;
pub mod driver;
pub mod render;
pub mod reporter;
pub mod tracing_config;
