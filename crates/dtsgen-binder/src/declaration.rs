//! A single named type declaration and its lazily parsed expression.

use crate::store::DeclarationStore;
use crate::unit::DeclarationUnit;
use dtsgen_common::{Error, Result, TypeIdentity};
use dtsgen_parser::pair::{inner, pair, split_arguments};
use dtsgen_parser::{Cursor, Expression, ExpressionParser};
use serde::Serialize;
use std::cell::OnceCell;
use tracing::{debug, trace};

/// Keyword a declaration was introduced with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Type,
    Interface,
    Class,
    Enum,
}

impl DeclarationKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "type" => DeclarationKind::Type,
            "interface" => DeclarationKind::Interface,
            "class" => DeclarationKind::Class,
            "enum" => DeclarationKind::Enum,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Type => "type",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Class => "class",
            DeclarationKind::Enum => "enum",
        }
    }
}

#[derive(Debug)]
pub struct Declaration {
    identity: TypeIdentity,
    kind: DeclarationKind,
    /// Statement text after the declared name.
    body: String,
    exported: bool,
    offset: usize,
    parsed: OnceCell<Expression>,
}

/// Generic parameter and heritage clause in front of a declaration body.
struct Header<'a> {
    generic: Option<&'a str>,
    extends: Vec<&'a str>,
    rest: &'a str,
}

impl Declaration {
    pub fn new(
        identity: TypeIdentity,
        kind: DeclarationKind,
        body: impl Into<String>,
        exported: bool,
        offset: usize,
    ) -> Self {
        Self {
            identity,
            kind,
            body: body.into(),
            exported,
            offset,
            parsed: OnceCell::new(),
        }
    }

    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub const fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub const fn is_exported(&self) -> bool {
        self.exported
    }

    /// Byte offset of the declaring statement in its file.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The expression, if [`Declaration::parse`] already ran.
    pub fn parsed(&self) -> Option<&Expression> {
        self.parsed.get()
    }

    /// The `extends` target of a class declaration.
    pub fn superclass(&self) -> Result<Option<&str>> {
        if self.kind != DeclarationKind::Class {
            return Ok(None);
        }
        self.header().map(|header| header.extends.first().copied())
    }

    /// Parse the body, resolving names through `unit`. The result is cached.
    pub fn parse(&self, unit: &DeclarationUnit, store: &DeclarationStore) -> Result<&Expression> {
        if let Some(expression) = self.parsed.get() {
            return Ok(expression);
        }

        let expression = self
            .parse_body(unit, store)
            .map_err(|err| err.in_declaration(&self.identity))?;
        debug!(declaration = %self.identity, kind = self.kind.as_str(), "parsed declaration");
        Ok(self.parsed.get_or_init(|| expression))
    }

    fn parse_body(&self, unit: &DeclarationUnit, store: &DeclarationStore) -> Result<Expression> {
        match self.kind {
            DeclarationKind::Type => {
                let header = self.header()?;
                let mut cursor = Cursor::new(header.rest);
                cursor.skip_whitespace();
                if !cursor.eat(b'=') {
                    return Err(Error::malformed_declaration(&self.source_text()));
                }
                let scope = unit.scope(store);
                let parser = ExpressionParser::new(&scope).with_generic(header.generic);
                Ok(parser.parse(cursor.rest())?.expression)
            }
            DeclarationKind::Interface => {
                let header = self.header()?;
                let scope = unit.scope(store);
                let parser = ExpressionParser::new(&scope).with_generic(header.generic);
                let body = parser.parse(header.rest)?.expression;
                if header.extends.is_empty() {
                    return Ok(body);
                }
                let mut members = header
                    .extends
                    .iter()
                    .map(|base| parser.parse_fragment(base))
                    .collect::<Result<Vec<_>>>()?;
                members.push(body);
                Ok(Expression::Intersection { members })
            }
            DeclarationKind::Class => {
                let header = self.header()?;
                trace!(
                    declaration = %self.identity,
                    superclass = header.extends.first().copied(),
                    "class members are not modeled"
                );
                Ok(Expression::Unknown)
            }
            DeclarationKind::Enum => Ok(Expression::Unknown),
        }
    }

    fn header(&self) -> Result<Header<'_>> {
        let mut cursor = Cursor::new(&self.body);
        cursor.skip_whitespace();

        let generic = if cursor.peek() == Some(b'<') {
            let Some(span) = pair(cursor.rest())? else {
                return Err(Error::malformed_declaration(&self.source_text()));
            };
            cursor.advance(span.len());
            self.generic_parameter(inner(span))?
        } else {
            None
        };
        cursor.skip_whitespace();

        let mut extends = Vec::new();
        if matches!(self.kind, DeclarationKind::Interface | DeclarationKind::Class) {
            if cursor.eat_keyword("extends") {
                extends = self.heritage_list(&mut cursor)?;
            }
            if cursor.eat_keyword("implements") {
                self.heritage_list(&mut cursor)?;
            }
        }

        Ok(Header {
            generic,
            extends,
            rest: cursor.rest(),
        })
    }

    /// `A, B<C>` up to the body.
    fn heritage_list<'a>(&self, cursor: &mut Cursor<'a>) -> Result<Vec<&'a str>> {
        let mut names = Vec::new();
        loop {
            cursor.skip_whitespace();
            let start = cursor.pos();
            if cursor.take_name().is_none() {
                return Err(Error::malformed_declaration(&self.source_text()));
            }
            if cursor.peek() == Some(b'<') {
                match pair(cursor.rest())? {
                    Some(span) => cursor.advance(span.len()),
                    None => return Err(Error::malformed_declaration(&self.source_text())),
                }
            }
            names.push(cursor.slice_from(start));
            cursor.skip_whitespace();
            if !cursor.eat(b',') {
                return Ok(names);
            }
        }
    }

    /// `T`, `T extends X` or `T = Y` → `T`. More than one parameter fails for
    /// types and interfaces; a class then has no single generic.
    fn generic_parameter<'a>(&self, parameters: &'a str) -> Result<Option<&'a str>> {
        match *split_arguments(parameters)?.as_slice() {
            [parameter] => {
                let mut cursor = Cursor::new(parameter);
                cursor
                    .take_word()
                    .map(Some)
                    .ok_or_else(|| Error::malformed_declaration(&self.source_text()))
            }
            [] => Err(Error::malformed_declaration(&self.source_text())),
            _ if self.kind == DeclarationKind::Class => Ok(None),
            _ => Err(Error::UnsupportedGeneric {
                name: self.name().to_string(),
                parameters: parameters.trim().to_string(),
            }),
        }
    }

    /// `kind Name<body>` as written, for error messages.
    fn source_text(&self) -> String {
        format!("{} {}{}", self.kind.as_str(), self.name(), self.body)
    }
}
