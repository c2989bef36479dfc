//! Recognizers for the top-level statement shapes of a declaration file.
//!
//! Each recognizer works on one chunked statement (see [`crate::statements`])
//! and borrows its pieces out of the statement text. Recognizers return
//! `None` when the statement is some other production; `Err` is reserved for
//! statements that are clearly of the recognized shape but malformed.

use crate::declaration::DeclarationKind;
use dtsgen_common::{Error, Result};
use dtsgen_parser::Cursor;
use dtsgen_parser::cursor::is_identifier;
use dtsgen_parser::pair::{inner, is_quote, pair, split_arguments};

/// `name` or `name as alias` inside an import/export list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedBinding<'a> {
    pub name: &'a str,
    pub alias: Option<&'a str>,
}

impl<'a> NamedBinding<'a> {
    /// The name the binding is visible under on the importing side.
    pub fn local(&self) -> &'a str {
        self.alias.unwrap_or(self.name)
    }
}

/// `import [type] Default, { A, B as C } from '...'` and its variants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportStatement<'a> {
    pub default: Option<&'a str>,
    /// `* as ns`
    pub namespace: Option<&'a str>,
    pub named: Vec<NamedBinding<'a>>,
    pub specifier: &'a str,
}

impl ImportStatement<'_> {
    /// `import './x.js';`
    pub fn is_side_effect(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReexportClause<'a> {
    /// `export * from '...'`
    All,
    /// `export * as ns from '...'`
    Namespace(&'a str),
    /// `export { A, B as C } from '...'`
    Named(Vec<NamedBinding<'a>>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reexport<'a> {
    pub clause: ReexportClause<'a>,
    pub specifier: &'a str,
}

/// `[export] [declare] [default] [abstract] [const] <kind> Name <body>`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclarationHead<'a> {
    pub exported: bool,
    pub default: bool,
    pub kind: DeclarationKind,
    pub name: &'a str,
    /// Everything after the name.
    pub body: &'a str,
}

pub fn parse_import(text: &str) -> Result<ImportStatement<'_>> {
    let mut cursor = Cursor::new(text);
    if !cursor.eat_keyword("import") {
        return Err(Error::malformed_declaration(text));
    }
    cursor.skip_whitespace();

    if cursor.peek().is_some_and(is_quote) {
        let specifier = take_specifier(&mut cursor, text)?;
        return Ok(ImportStatement {
            specifier,
            ..ImportStatement::default()
        });
    }

    eat_type_modifier(&mut cursor);

    let mut import = ImportStatement::default();
    match cursor.peek() {
        Some(b'{') => import.named = take_bindings(&mut cursor, text)?,
        Some(b'*') => import.namespace = Some(take_namespace(&mut cursor, text)?),
        _ => {
            let Some(name) = cursor.take_word() else {
                return Err(Error::malformed_declaration(text));
            };
            import.default = Some(name);
            cursor.skip_whitespace();
            if cursor.eat(b',') {
                cursor.skip_whitespace();
                match cursor.peek() {
                    Some(b'{') => import.named = take_bindings(&mut cursor, text)?,
                    Some(b'*') => import.namespace = Some(take_namespace(&mut cursor, text)?),
                    _ => return Err(Error::malformed_declaration(text)),
                }
            }
        }
    }

    cursor.skip_whitespace();
    if !cursor.eat_keyword("from") {
        return Err(Error::malformed_declaration(text));
    }
    import.specifier = take_specifier(&mut cursor, text)?;
    Ok(import)
}

/// `export [type] (* | * as ns | { ... }) from '...'`
pub fn parse_reexport(text: &str) -> Result<Option<Reexport<'_>>> {
    let mut cursor = Cursor::new(text);
    if !cursor.eat_keyword("export") {
        return Ok(None);
    }
    cursor.skip_whitespace();
    eat_type_modifier(&mut cursor);

    let clause = match cursor.peek() {
        Some(b'*') => {
            cursor.advance(1);
            cursor.skip_whitespace();
            if cursor.eat_keyword("as") {
                cursor.skip_whitespace();
                match cursor.take_word() {
                    Some(name) => ReexportClause::Namespace(name),
                    None => return Err(Error::malformed_declaration(text)),
                }
            } else {
                ReexportClause::All
            }
        }
        Some(b'{') => ReexportClause::Named(take_bindings(&mut cursor, text)?),
        _ => return Ok(None),
    };

    cursor.skip_whitespace();
    if !cursor.eat_keyword("from") {
        return Ok(None);
    }
    let specifier = take_specifier(&mut cursor, text)?;
    Ok(Some(Reexport { clause, specifier }))
}

pub fn parse_declaration_head(text: &str) -> Option<DeclarationHead<'_>> {
    let mut cursor = Cursor::new(text);
    let exported = cursor.eat_keyword("export");
    let mut default = false;
    let mut constant = false;

    loop {
        cursor.skip_whitespace();
        if cursor.eat_keyword("declare") || cursor.eat_keyword("abstract") {
            continue;
        }
        if cursor.eat_keyword("default") {
            default = true;
            continue;
        }
        if cursor.eat_keyword("const") {
            constant = true;
            continue;
        }
        break;
    }

    let kind = DeclarationKind::from_keyword(cursor.take_word()?)?;
    if constant && kind != DeclarationKind::Enum {
        return None;
    }
    cursor.skip_whitespace();
    let name = cursor.take_word()?;

    Some(DeclarationHead {
        exported,
        default,
        kind,
        name,
        body: cursor.rest(),
    })
}

/// `export default Name;`
pub fn parse_default_export(text: &str) -> Option<&str> {
    let mut cursor = Cursor::new(text);
    if !cursor.eat_keyword("export") {
        return None;
    }
    cursor.skip_whitespace();
    if !cursor.eat_keyword("default") {
        return None;
    }
    cursor.skip_whitespace();
    let name = cursor.take_word()?;
    finish(&mut cursor).then_some(name)
}

/// `export {};`
pub fn is_empty_export(text: &str) -> bool {
    let mut cursor = Cursor::new(text);
    if !cursor.eat_keyword("export") {
        return false;
    }
    cursor.skip_whitespace();
    if !cursor.eat(b'{') {
        return false;
    }
    cursor.skip_whitespace();
    cursor.eat(b'}') && finish(&mut cursor)
}

/// `export [type] { A, B as C };` without a `from` clause.
pub fn parse_local_export_list(text: &str) -> Result<Option<Vec<NamedBinding<'_>>>> {
    let mut cursor = Cursor::new(text);
    if !cursor.eat_keyword("export") {
        return Ok(None);
    }
    cursor.skip_whitespace();
    eat_type_modifier(&mut cursor);
    if cursor.peek() != Some(b'{') {
        return Ok(None);
    }
    let bindings = take_bindings(&mut cursor, text)?;
    if !finish(&mut cursor) {
        return Err(Error::malformed_declaration(text));
    }
    Ok(Some(bindings))
}

/// `[export] [declare] [default] [async] (function|const|let|var) name`,
/// returning the declared name.
pub fn parse_value_declaration(text: &str) -> Option<&str> {
    let mut cursor = Cursor::new(text);
    loop {
        if cursor.eat_keyword("export")
            || cursor.eat_keyword("declare")
            || cursor.eat_keyword("default")
            || cursor.eat_keyword("async")
        {
            cursor.skip_whitespace();
            continue;
        }
        break;
    }

    let keyword = ["function", "const", "let", "var"]
        .into_iter()
        .find(|keyword| cursor.eat_keyword(keyword))?;
    if keyword == "function" {
        cursor.eat(b'*');
    }
    cursor.skip_whitespace();
    cursor.take_word()
}

/// Optional `type` modifier of import/export lists. A `type` that is itself
/// the imported name (`import type from '...'`) is left in place.
fn eat_type_modifier(cursor: &mut Cursor<'_>) {
    let before = *cursor;
    if cursor.eat_keyword("type") {
        cursor.skip_whitespace();
        if cursor.eat_keyword("from") || cursor.peek() == Some(b',') {
            *cursor = before;
        }
    }
}

fn take_namespace<'a>(cursor: &mut Cursor<'a>, text: &str) -> Result<&'a str> {
    cursor.eat(b'*');
    cursor.skip_whitespace();
    if !cursor.eat_keyword("as") {
        return Err(Error::malformed_declaration(text));
    }
    cursor.skip_whitespace();
    cursor
        .take_word()
        .ok_or_else(|| Error::malformed_declaration(text))
}

/// `{ A, type B, C as D }` → bindings.
fn take_bindings<'a>(cursor: &mut Cursor<'a>, text: &str) -> Result<Vec<NamedBinding<'a>>> {
    let Some(span) = pair(cursor.rest())? else {
        return Err(Error::malformed_declaration(text));
    };
    cursor.advance(span.len());

    let mut bindings = Vec::new();
    for entry in split_arguments(inner(span))? {
        if entry.is_empty() {
            continue;
        }
        let words: Vec<&str> = entry.split_whitespace().collect();
        let binding = match *words.as_slice() {
            [name] | ["type", name] => NamedBinding { name, alias: None },
            [name, "as", alias] | ["type", name, "as", alias] => NamedBinding {
                name,
                alias: Some(alias),
            },
            _ => return Err(Error::malformed_declaration(text)),
        };
        if !is_identifier(binding.name) || !binding.alias.is_none_or(is_identifier) {
            return Err(Error::malformed_declaration(text));
        }
        bindings.push(binding);
    }
    Ok(bindings)
}

/// `'./x.js'` followed by an optional `;` and nothing else.
fn take_specifier<'a>(cursor: &mut Cursor<'a>, text: &str) -> Result<&'a str> {
    cursor.skip_whitespace();
    let Some(span) = pair(cursor.rest())?.filter(|span| span.starts_with(['"', '\''])) else {
        return Err(Error::malformed_declaration(text));
    };
    cursor.advance(span.len());
    if !finish(cursor) {
        return Err(Error::malformed_declaration(text));
    }
    Ok(inner(span))
}

/// Consume an optional trailing `;` and report whether the statement ended.
fn finish(cursor: &mut Cursor<'_>) -> bool {
    cursor.skip_whitespace();
    cursor.eat(b';');
    cursor.skip_whitespace();
    cursor.is_at_end()
}

#[cfg(test)]
#[path = "../tests/syntax_tests.rs"]
mod tests;
