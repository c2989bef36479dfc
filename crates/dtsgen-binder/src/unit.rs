//! One declaration file: its statements, imports, exports and local types.
//!
//! Imports and exports are computed lazily, once. Resolving them may load
//! sibling units through the [`DeclarationStore`], which may in turn ask this
//! unit for its exports again (mutual imports, `export *` loops). While the
//! export scan of a unit is running, such re-entrant lookups see the entries
//! registered so far; a name that is not registered yet fails with
//! `UnresolvedImport` instead of recursing. A table built on top of such a
//! partial table is handed back to the caller but not cached, and the unit
//! scans again on its next lookup.

use crate::declaration::Declaration;
use crate::module_path::{is_relative, resolve_specifier};
use crate::statements::{Statement, split_statements};
use crate::store::DeclarationStore;
use crate::syntax::{
    NamedBinding, ReexportClause, is_empty_export, parse_declaration_head, parse_default_export,
    parse_import, parse_local_export_list, parse_reexport, parse_value_declaration,
};
use dtsgen_common::diagnostics::{DiagnosticMessage, diagnostic_messages};
use dtsgen_common::{Diagnostic, Error, Result, TypeIdentity};
use dtsgen_parser::NameScope;
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::cell::{Cell, OnceCell, RefCell};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Names a unit makes available to other files.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExportTable {
    /// Named exports in registration order.
    pub names: IndexMap<String, TypeIdentity>,
    /// Target of `import X from` / `export default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeIdentity>,
}

impl ExportTable {
    /// Look up a named export, or the default export for `"default"`.
    pub fn get(&self, name: &str) -> Option<&TypeIdentity> {
        if name == "default" {
            self.default.as_ref()
        } else {
            self.names.get(name)
        }
    }

    pub fn contains_identity(&self, identity: &TypeIdentity) -> bool {
        self.default.as_ref() == Some(identity) || self.names.values().any(|id| id == identity)
    }

    pub fn len(&self) -> usize {
        self.names.len() + usize::from(self.default.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, identity: TypeIdentity) {
        if identity.is_default() {
            self.default = Some(identity.clone());
        }
        self.names.insert(identity.name().to_string(), identity);
    }
}

pub struct DeclarationUnit {
    path: Rc<Path>,
    text: String,
    statements: Vec<Statement>,
    /// Every direct declaration by local name, exported or not.
    locals: RefCell<IndexMap<String, Rc<Declaration>>>,
    /// Renamed bindings (`B as C`, default imports) by their new name.
    aliases: RefCell<IndexMap<String, TypeIdentity>>,
    imports: OnceCell<IndexMap<String, TypeIdentity>>,
    exports: OnceCell<ExportTable>,
    /// Export table under construction while the export scan runs.
    pending: RefCell<Option<ExportTable>>,
    /// Nesting depth of the running export scan.
    scan_depth: Cell<usize>,
    import_diagnostics: RefCell<Vec<Diagnostic>>,
    /// Replaced by every export scan.
    export_diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DeclarationUnit {
    /// Chunk `text` into statements. Nothing is resolved yet.
    pub fn new(path: Rc<Path>, text: String, strip_comments: bool) -> Self {
        let statements = split_statements(&text, strip_comments);
        debug!(file = %path.display(), statements = statements.len(), "created declaration unit");
        Self {
            path,
            text,
            statements,
            locals: RefCell::default(),
            aliases: RefCell::default(),
            imports: OnceCell::new(),
            exports: OnceCell::new(),
            pending: RefCell::new(None),
            scan_depth: Cell::new(0),
            import_diagnostics: RefCell::default(),
            export_diagnostics: RefCell::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file contents as read from disk.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Skipped constructs recorded so far, imports first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.import_diagnostics.borrow().clone();
        diagnostics.extend(self.export_diagnostics.borrow().iter().cloned());
        diagnostics
    }

    /// Snapshot of the renamed bindings.
    pub fn aliases(&self) -> IndexMap<String, TypeIdentity> {
        self.aliases.borrow().clone()
    }

    /// Names this unit pulls in from sibling files, keyed by local name.
    pub fn imports(&self, store: &DeclarationStore) -> Result<&IndexMap<String, TypeIdentity>> {
        if let Some(imports) = self.imports.get() {
            return Ok(imports);
        }
        let imports = self
            .scan_imports(store)
            .map_err(|err| err.in_file(self.path()))?;
        Ok(self.imports.get_or_init(|| imports))
    }

    /// Names this unit makes available, direct or re-exported.
    pub fn exports(&self, store: &DeclarationStore) -> Result<&ExportTable> {
        match self.load_exports(store)? {
            Cow::Borrowed(exports) => Ok(exports),
            // only reachable from inside another unit's export scan
            Cow::Owned(_) => Err(self.unresolved("*")),
        }
    }

    /// Resolve an exported name, honoring aliases. `"default"` names the
    /// default export.
    pub fn export(&self, name: &str, store: &DeclarationStore) -> Result<TypeIdentity> {
        self.with_exports(store, |table| self.lookup_export(table, name))?
    }

    /// A direct declaration of this file by local name.
    pub fn declaration(
        &self,
        name: &str,
        store: &DeclarationStore,
    ) -> Result<Option<Rc<Declaration>>> {
        self.with_exports(store, |_| ())?;
        Ok(self.locals.borrow().get(name).cloned())
    }

    /// All direct declarations in statement order.
    pub fn declarations(&self, store: &DeclarationStore) -> Result<Vec<Rc<Declaration>>> {
        self.with_exports(store, |_| ())?;
        Ok(self.locals.borrow().values().cloned().collect())
    }

    /// The scope declaration bodies of this unit resolve names in.
    pub fn scope<'u>(&'u self, store: &'u DeclarationStore) -> UnitScope<'u> {
        UnitScope { unit: self, store }
    }

    fn with_exports<R>(
        &self,
        store: &DeclarationStore,
        f: impl FnOnce(&ExportTable) -> R,
    ) -> Result<R> {
        if let Some(table) = self.exports.get() {
            return Ok(f(table));
        }
        if let Some(table) = self.pending.borrow().as_ref() {
            trace!(file = %self.path.display(), "lookup in partial export table");
            store.scans().partial_read(self.scan_depth.get());
            return Ok(f(table));
        }
        self.load_exports(store).map(|table| f(&*table))
    }

    /// The cached table, or a fresh scan. The scan is cached unless it saw
    /// the partial table of a scan still running further out.
    fn load_exports(&self, store: &DeclarationStore) -> Result<Cow<'_, ExportTable>> {
        if let Some(exports) = self.exports.get() {
            return Ok(Cow::Borrowed(exports));
        }
        if self.pending.borrow().is_some() {
            return Err(self.unresolved("*"));
        }

        let depth = store.scans().enter();
        self.scan_depth.set(depth);
        let result = self.scan_exports(store);
        let complete = store.scans().exit(depth);
        let exports = result.map_err(|err| err.in_file(self.path()))?;

        if complete {
            Ok(Cow::Borrowed(self.exports.get_or_init(|| exports)))
        } else {
            debug!(
                file = %self.path.display(),
                "export table depends on a running scan; not cached"
            );
            Ok(Cow::Owned(exports))
        }
    }

    fn lookup_export(&self, table: &ExportTable, name: &str) -> Result<TypeIdentity> {
        if let Some(identity) = table.get(name) {
            return Ok(identity.clone());
        }
        if let Some(identity) = self.aliases.borrow().get(name) {
            if table.contains_identity(identity) {
                return Ok(identity.clone());
            }
            return Err(Error::unresolved_alias(name, self.path(), identity));
        }
        Err(self.unresolved(name))
    }

    fn unresolved(&self, name: &str) -> Error {
        Error::UnresolvedImport {
            name: name.to_string(),
            file: self.path().to_path_buf(),
        }
    }

    // =========================================================================
    // Import scan
    // =========================================================================

    fn scan_imports(&self, store: &DeclarationStore) -> Result<IndexMap<String, TypeIdentity>> {
        debug!(file = %self.path.display(), "scanning imports");
        let mut imports = IndexMap::new();
        let mut diagnostics = Vec::new();
        let result = self.scan_import_statements(store, &mut imports, &mut diagnostics);
        *self.import_diagnostics.borrow_mut() = diagnostics;
        result.map(|()| imports)
    }

    fn scan_import_statements(
        &self,
        store: &DeclarationStore,
        imports: &mut IndexMap<String, TypeIdentity>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        for statement in self.statements.iter().filter(|s| s.leading_word() == "import") {
            let import = parse_import(&statement.text)?;

            if import.is_side_effect() {
                diagnostics.push(self.skip(
                    statement,
                    &diagnostic_messages::SKIPPING_SIDE_EFFECT_IMPORT,
                    &[import.specifier],
                ));
                continue;
            }
            if !is_relative(import.specifier) {
                diagnostics.push(self.skip(
                    statement,
                    &diagnostic_messages::SKIPPING_LIBRARY_IMPORT,
                    &[import.specifier],
                ));
                continue;
            }
            if let Some(namespace) = import.namespace {
                diagnostics.push(self.skip(
                    statement,
                    &diagnostic_messages::SKIPPING_NAMESPACE_IMPORT,
                    &[namespace, import.specifier],
                ));
            }
            if import.default.is_none() && import.named.is_empty() {
                continue;
            }

            let specifier = resolve_specifier(&self.path, import.specifier, store.options());
            let target = store.get(specifier)?;

            if let Some(local) = import.default {
                let identity = target.export("default", store)?;
                trace!(local, identity = %identity, "default import");
                self.aliases
                    .borrow_mut()
                    .insert(local.to_string(), identity.clone());
                imports.insert(local.to_string(), identity);
            }
            for binding in &import.named {
                let identity = self.resolve_binding(&target, binding, store)?;
                imports.insert(binding.local().to_string(), identity);
            }
        }

        Ok(())
    }

    /// Resolve `name [as alias]` against `target`, recording the alias here.
    fn resolve_binding(
        &self,
        target: &DeclarationUnit,
        binding: &NamedBinding<'_>,
        store: &DeclarationStore,
    ) -> Result<TypeIdentity> {
        let identity = target.export(binding.name, store)?;
        trace!(
            name = binding.name,
            alias = binding.alias,
            identity = %identity,
            "resolved binding"
        );
        if let Some(alias) = binding.alias {
            self.aliases
                .borrow_mut()
                .insert(alias.to_string(), identity.clone());
        }
        Ok(identity)
    }

    // =========================================================================
    // Export scan
    // =========================================================================

    fn scan_exports(&self, store: &DeclarationStore) -> Result<ExportTable> {
        debug!(file = %self.path.display(), "scanning exports");
        *self.pending.borrow_mut() = Some(ExportTable::default());
        self.locals.borrow_mut().clear();

        let mut diagnostics = Vec::new();
        let result = self
            .statements
            .iter()
            .filter(|s| s.leading_word() != "import")
            .try_for_each(|statement| self.scan_statement(statement, store, &mut diagnostics));

        *self.export_diagnostics.borrow_mut() = diagnostics;
        let table = self.pending.borrow_mut().take().unwrap_or_default();
        result.map(|()| table)
    }

    fn scan_statement(
        &self,
        statement: &Statement,
        store: &DeclarationStore,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let text = statement.text.as_str();

        if let Some(reexport) = parse_reexport(text)? {
            trace!(statement = text, "re-export");
            if !is_relative(reexport.specifier) {
                diagnostics.push(self.skip(
                    statement,
                    &diagnostic_messages::SKIPPING_LIBRARY_REEXPORT,
                    &[reexport.specifier],
                ));
                return Ok(());
            }
            let bindings = match reexport.clause {
                ReexportClause::Namespace(_) => {
                    diagnostics.push(self.skip(
                        statement,
                        &diagnostic_messages::SKIPPING_WILDCARD_RENAME,
                        &[text],
                    ));
                    return Ok(());
                }
                ReexportClause::All => None,
                ReexportClause::Named(bindings) => Some(bindings),
            };

            let target =
                store.get(resolve_specifier(&self.path, reexport.specifier, store.options()))?;
            match bindings {
                None => {
                    let merged = target.with_exports(store, ExportTable::clone)?;
                    self.with_pending(|table| {
                        for (name, identity) in merged.names {
                            table.names.insert(name, identity);
                        }
                        if table.default.is_none() {
                            table.default = merged.default;
                        }
                    });
                }
                Some(bindings) => {
                    for binding in &bindings {
                        let identity = self.resolve_binding(&target, binding, store)?;
                        self.with_pending(|table| {
                            if binding.name == "default" && binding.alias.is_none() {
                                table.default = Some(identity.clone());
                            }
                            table.insert(identity);
                        });
                    }
                }
            }
            return Ok(());
        }

        if let Some(head) = parse_declaration_head(text) {
            trace!(
                kind = head.kind.as_str(),
                name = head.name,
                exported = head.exported,
                "declaration"
            );
            let identity = TypeIdentity::new(self.path.clone(), head.name, head.default);
            let declaration = Rc::new(Declaration::new(
                identity.clone(),
                head.kind,
                head.body,
                head.exported,
                statement.offset,
            ));
            self.locals
                .borrow_mut()
                .insert(head.name.to_string(), declaration);
            if head.exported {
                self.with_pending(|table| table.insert(identity));
            }
            return Ok(());
        }

        if let Some(name) = parse_default_export(text) {
            // only a declaration that is not exported yet can be promoted
            let identity = self
                .locals
                .borrow()
                .get(name)
                .filter(|declaration| !declaration.is_exported())
                .map(|declaration| declaration.identity().clone())
                .ok_or_else(|| Error::malformed_declaration(text))?;
            trace!(name, "default export");
            self.with_pending(|table| table.default = Some(identity));
            return Ok(());
        }

        if is_empty_export(text) {
            return Ok(());
        }

        if let Some(bindings) = parse_local_export_list(text)? {
            for binding in &bindings {
                let identity = self
                    .local_identity(binding.name)
                    .ok_or_else(|| self.unresolved(binding.name))?;
                if let Some(alias) = binding.alias {
                    self.aliases
                        .borrow_mut()
                        .insert(alias.to_string(), identity.clone());
                }
                self.with_pending(|table| table.insert(identity));
            }
            return Ok(());
        }

        if let Some(name) = parse_value_declaration(text) {
            diagnostics.push(self.skip(
                statement,
                &diagnostic_messages::SKIPPING_VALUE_DECLARATION,
                &[name],
            ));
            return Ok(());
        }

        Err(Error::malformed_declaration(text))
    }

    fn local_identity(&self, name: &str) -> Option<TypeIdentity> {
        self.locals
            .borrow()
            .get(name)
            .map(|declaration| declaration.identity().clone())
    }

    fn with_pending(&self, f: impl FnOnce(&mut ExportTable)) {
        if let Some(table) = self.pending.borrow_mut().as_mut() {
            f(table);
        }
    }

    /// Diagnostic for a skipped statement.
    fn skip(
        &self,
        statement: &Statement,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Diagnostic {
        warn!(
            file = %self.path.display(),
            offset = statement.offset,
            statement = %statement.text,
            "skipping statement"
        );
        Diagnostic::from_message(
            message,
            self.path.display().to_string(),
            u32::try_from(statement.offset).unwrap_or(u32::MAX),
            u32::try_from(statement.text.len()).unwrap_or(u32::MAX),
            args,
        )
    }
}

/// Name resolution for declaration bodies: local declarations first, then
/// imports, then exports (which include re-exported names).
pub struct UnitScope<'u> {
    unit: &'u DeclarationUnit,
    store: &'u DeclarationStore,
}

impl NameScope for UnitScope<'_> {
    fn resolve(&self, name: &str) -> Result<Option<TypeIdentity>> {
        if let Some(identity) = self.unit.local_identity(name) {
            return Ok(Some(identity));
        }
        if let Some(identity) = self.unit.imports(self.store)?.get(name) {
            return Ok(Some(identity.clone()));
        }
        self.unit
            .with_exports(self.store, |table| table.names.get(name).cloned())
    }
}
