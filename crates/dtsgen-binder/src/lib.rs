//! Cross-file declaration linkage for the dtsgen declaration extractor.
//!
//! - [`DeclarationStore`]: one [`DeclarationUnit`] per file, loaded on demand
//! - [`DeclarationUnit`]: a file's imports, exports, aliases and declarations
//! - [`Declaration`]: one named type, parsed into an [`Expression`] lazily
//!
//! [`Expression`]: dtsgen_parser::Expression

pub mod options;
pub use options::ResolverOptions;

pub mod module_path;

pub mod statements;
pub use statements::Statement;

pub mod syntax;

pub mod declaration;
pub use declaration::{Declaration, DeclarationKind};

pub mod unit;
pub use unit::{DeclarationUnit, ExportTable, UnitScope};

pub mod store;
pub use store::{DeclarationStore, Resolved};
