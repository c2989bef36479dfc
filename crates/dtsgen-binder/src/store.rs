//! Cache of declaration units, one per file.

use crate::declaration::Declaration;
use crate::module_path::canonical_path;
use crate::options::ResolverOptions;
use crate::unit::DeclarationUnit;
use dtsgen_common::{Error, Result, TypeIdentity};
use dtsgen_parser::Expression;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// An exported name resolved to its declaration and parsed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Resolved {
    pub identity: TypeIdentity,
    pub expression: Expression,
}

/// Owns every loaded [`DeclarationUnit`]. Units live as long as the store and
/// are never evicted; inputs are assumed not to change while it is in use.
#[derive(Default)]
pub struct DeclarationStore {
    options: ResolverOptions,
    units: RefCell<FxHashMap<PathBuf, Rc<DeclarationUnit>>>,
    scans: ScanTracker,
}

impl DeclarationStore {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            units: RefCell::default(),
            scans: ScanTracker::default(),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The unit for `path`, loading it on first access. Every path that
    /// names the same file yields the same instance.
    pub fn get(&self, path: impl AsRef<Path>) -> Result<Rc<DeclarationUnit>> {
        let key = canonical_path(path.as_ref())?;
        if let Some(unit) = self.units.borrow().get(&key) {
            return Ok(Rc::clone(unit));
        }

        let text = std::fs::read_to_string(&key).map_err(|source| Error::Io {
            path: key.clone(),
            source,
        })?;
        debug!(file = %key.display(), bytes = text.len(), "loading declaration file");

        let unit = Rc::new(DeclarationUnit::new(
            Rc::from(key.as_path()),
            text,
            self.options.strip_comments,
        ));
        self.units.borrow_mut().insert(key, Rc::clone(&unit));
        Ok(unit)
    }

    /// The declaration an identity points at.
    pub fn declaration(&self, identity: &TypeIdentity) -> Result<Rc<Declaration>> {
        let unit = self.get(identity.file())?;
        unit.declaration(identity.name(), self)?
            .ok_or_else(|| Error::UnresolvedImport {
                name: identity.name().to_string(),
                file: identity.file().to_path_buf(),
            })
    }

    /// Look up `name` among the exports of `path` and parse its declaration.
    pub fn resolve(&self, path: impl AsRef<Path>, name: &str) -> Result<Resolved> {
        let unit = self.get(path)?;
        let identity = unit.export(name, self)?;
        let owner = self.get(identity.file())?;
        let declaration = self.declaration(&identity)?;
        let expression = declaration.parse(&owner, self)?.clone();
        Ok(Resolved {
            identity,
            expression,
        })
    }

    pub(crate) fn scans(&self) -> &ScanTracker {
        &self.scans
    }

    /// Number of loaded units.
    pub fn len(&self) -> usize {
        self.units.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.borrow().is_empty()
    }

    /// Paths of the loaded units, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.units.borrow().keys().cloned().collect();
        paths.sort();
        paths
    }
}

/// Nesting of in-progress export scans.
///
/// A scan that reads the partial table of a scan further out produces a table
/// that may miss names, so it must not be cached. The outermost scan whose
/// table was read is complete once it finishes.
#[derive(Debug, Default)]
pub(crate) struct ScanTracker {
    depth: Cell<usize>,
    /// Shallowest depth whose partial table has been read.
    partial_floor: Cell<Option<usize>>,
}

impl ScanTracker {
    /// Start a scan, returning its depth.
    pub(crate) fn enter(&self) -> usize {
        let depth = self.depth.get();
        self.depth.set(depth + 1);
        depth
    }

    /// Record a read of the partial table of the scan at `depth`.
    pub(crate) fn partial_read(&self, depth: usize) {
        let floor = self
            .partial_floor
            .get()
            .map_or(depth, |floor| floor.min(depth));
        self.partial_floor.set(Some(floor));
    }

    /// Finish the scan at `depth`. Returns whether its table is complete.
    pub(crate) fn exit(&self, depth: usize) -> bool {
        self.depth.set(depth);
        let complete = self
            .partial_floor
            .get()
            .is_none_or(|floor| floor >= depth);
        if complete {
            self.partial_floor.set(None);
        }
        complete
    }
}
