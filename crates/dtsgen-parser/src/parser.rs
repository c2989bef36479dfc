//! Recursive-descent parser for type expressions.
//!
//! The parser turns a declaration body (or a nested fragment of one) into an
//! [`Expression`]. It never looks at other files itself: bare type names are
//! handed to a [`NameScope`], which the binder implements on top of a unit's
//! local declarations, imports and exports.
//!
//! Classification order for a single token:
//! 1. trailing `[]` → array
//! 2. whole pair → literal, grouping, object, or unknown for `[`/`<`
//! 3. primitive keyword, then boolean/numeric literal
//! 4. the declaration's generic parameter
//! 5. `Name` / `Name<Arg>` in scope → reference; else a built-in generic form
//! 6. anything else → unknown

use crate::cursor::{Cursor, is_word_byte};
use crate::expression::{Expression, ObjectExpression, PrimitiveKind};
use crate::generic_forms::GenericForms;
use crate::pair::{inner, is_quote, pair, split_arguments, unescape};
use crate::split::{Delimiter, split};
use dtsgen_common::limits::MAX_EXPRESSION_DEPTH;
use dtsgen_common::{Error, Result, TypeIdentity};
use std::cell::Cell;
use tracing::trace;

/// Resolves bare type names to declarations.
pub trait NameScope {
    fn resolve(&self, name: &str) -> Result<Option<TypeIdentity>>;
}

/// A scope where no name resolves.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyScope;

impl NameScope for EmptyScope {
    fn resolve(&self, _name: &str) -> Result<Option<TypeIdentity>> {
        Ok(None)
    }
}

/// A parsed expression together with the bytes it consumed.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed {
    pub expression: Expression,
    pub consumed: usize,
}

pub struct ExpressionParser<'a> {
    scope: &'a dyn NameScope,
    forms: &'a GenericForms,
    generic: Option<&'a str>,
    depth: Cell<u32>,
}

impl<'a> ExpressionParser<'a> {
    pub fn new(scope: &'a dyn NameScope) -> Self {
        Self {
            scope,
            forms: GenericForms::shared(),
            generic: None,
            depth: Cell::new(0),
        }
    }

    pub fn with_forms(mut self, forms: &'a GenericForms) -> Self {
        self.forms = forms;
        self
    }

    /// Name of the declaration's type parameter, parsed as `Generic`.
    pub fn with_generic(mut self, generic: Option<&'a str>) -> Self {
        self.generic = generic;
        self
    }

    /// Parse one expression from the start of `text`.
    pub fn parse(&self, text: &str) -> Result<Parsed> {
        let mut cursor = Cursor::new(text);
        let expression = self.parse_at(&mut cursor)?;
        Ok(Parsed {
            expression,
            consumed: cursor.pos(),
        })
    }

    /// Parse a nested fragment, discarding the consumed count.
    pub fn parse_fragment(&self, text: &str) -> Result<Expression> {
        self.parse(text).map(|parsed| parsed.expression)
    }

    /// Parse one expression at `cursor`, leaving it just past the expression
    /// and its terminating `;` or `,`.
    pub fn parse_at(&self, cursor: &mut Cursor<'_>) -> Result<Expression> {
        let _guard = self.enter()?;
        let split = split(cursor)?;

        if let Some(delimiter) = split.delimiter {
            let members = split
                .tokens
                .iter()
                .map(|token| self.parse_fragment(token))
                .collect::<Result<Vec<_>>>()?;
            return Ok(match delimiter {
                Delimiter::Union => Expression::Union { members },
                Delimiter::Intersection => Expression::Intersection { members },
            });
        }

        match split.tokens.as_slice() {
            [token] => self.classify(token),
            tokens => {
                trace!(?tokens, "compound expression");
                Ok(Expression::Unknown)
            }
        }
    }

    /// Parse an object body starting at `{`.
    pub fn parse_object(&self, text: &str) -> Result<(ObjectExpression, usize)> {
        let mut cursor = Cursor::new(text);
        let object = self.parse_object_at(&mut cursor)?;
        Ok((object, cursor.pos()))
    }

    fn parse_object_at(&self, cursor: &mut Cursor<'_>) -> Result<ObjectExpression> {
        let _guard = self.enter()?;
        let start = cursor.pos();
        if !cursor.eat(b'{') {
            return Err(Error::malformed_declaration(cursor.rest()));
        }

        let mut object = ObjectExpression::new();
        loop {
            cursor.skip_whitespace();
            let Some(byte) = cursor.peek() else {
                return Err(Error::unbalanced('{', '}', &cursor.text()[start..]));
            };

            match byte {
                b'}' => {
                    cursor.advance(1);
                    break;
                }
                b';' | b',' => cursor.advance(1),
                b'[' => {
                    let property_start = cursor.pos();
                    self.skip_pair(cursor)?;
                    cursor.eat(b'?');
                    expect_colon(cursor, property_start)?;
                    object.dynamic = Some(Box::new(self.parse_at(cursor)?));
                }
                _ if is_quote(byte) => {
                    let property_start = cursor.pos();
                    let key = match pair(cursor.rest())? {
                        Some(span) => unescape(inner(span)),
                        None => return Err(Error::malformed_property(cursor.rest())),
                    };
                    self.skip_pair(cursor)?;
                    let optional = cursor.eat(b'?');
                    expect_colon(cursor, property_start)?;
                    let value = self.parse_at(cursor)?;
                    object.insert(key, value, optional);
                }
                _ if is_word_byte(byte) => {
                    let (key, value, optional) = self.parse_named_property(cursor)?;
                    object.insert(key, value, optional);
                }
                _ => return Err(Error::malformed_property(cursor.rest())),
            }
        }

        Ok(object)
    }

    /// `[readonly] key[?]: value` or `name[?]<T>(params): Return`.
    fn parse_named_property(&self, cursor: &mut Cursor<'_>) -> Result<(String, Expression, bool)> {
        let property_start = cursor.pos();

        let before = *cursor;
        if cursor.eat_keyword("readonly") {
            cursor.skip_whitespace();
            // a property that is itself called `readonly`
            if matches!(cursor.peek(), Some(b':' | b'?' | b'(' | b'<')) {
                *cursor = before;
            }
        }

        let Some(key) = cursor.take_word() else {
            return Err(Error::malformed_property(&cursor.text()[property_start..]));
        };
        let optional = cursor.eat(b'?');

        if matches!(cursor.peek(), Some(b'<' | b'(')) {
            if cursor.peek() == Some(b'<') {
                self.skip_pair(cursor)?;
            }
            if cursor.peek() != Some(b'(') {
                return Err(Error::malformed_property(&cursor.text()[property_start..]));
            }
            // parameters are not modeled; only the return type is kept
            self.skip_pair(cursor)?;
        }

        expect_colon(cursor, property_start)?;
        let value = self.parse_at(cursor)?;
        Ok((key.to_string(), value, optional))
    }

    fn skip_pair(&self, cursor: &mut Cursor<'_>) -> Result<()> {
        match pair(cursor.rest())? {
            Some(span) => {
                cursor.advance(span.len());
                Ok(())
            }
            None => Err(Error::malformed_property(cursor.rest())),
        }
    }

    fn classify(&self, token: &str) -> Result<Expression> {
        if let Some(element) = token.strip_suffix("[]")
            && !element.is_empty()
        {
            return Ok(Expression::array(self.parse_fragment(element)?));
        }

        if let Some(span) = pair(token)?
            && span.len() == token.len()
        {
            return match token.as_bytes()[0] {
                b'"' | b'\'' => Ok(Expression::literal(unescape(inner(span)))),
                b'(' => self.parse_fragment(inner(span)),
                b'{' => Ok(Expression::Object(self.parse_object(span)?.0)),
                // tuples and bare type-argument lists are not modeled
                _ => Ok(Expression::Unknown),
            };
        }

        if let Some(kind) = PrimitiveKind::from_keyword(token) {
            return Ok(Expression::primitive(kind));
        }
        if let Some(literal) = keyword_literal(token) {
            return Ok(literal);
        }

        if self.generic == Some(token) {
            return Ok(Expression::Generic);
        }

        self.classify_name(token)
    }

    fn classify_name(&self, token: &str) -> Result<Expression> {
        let mut cursor = Cursor::new(token);
        let Some(name) = cursor.take_name() else {
            return Ok(Expression::Unknown);
        };

        let arguments = if cursor.is_at_end() {
            None
        } else {
            let rest = cursor.rest();
            match pair(rest)? {
                Some(span) if span.len() == rest.len() && rest.starts_with('<') => {
                    Some(split_arguments(inner(span))?)
                }
                _ => return Ok(Expression::Unknown),
            }
        };

        if let Some(identity) = self.scope.resolve(name)? {
            let argument = match arguments.as_deref() {
                None => None,
                Some([argument]) => Some(Box::new(self.parse_fragment(argument)?)),
                // several type arguments are not modeled
                Some(_) => Some(Box::new(Expression::Unknown)),
            };
            return Ok(Expression::Reference { identity, argument });
        }

        if let Some(arguments) = &arguments
            && let Some(form) = self.forms.get(name)
        {
            return form.expand(self, arguments);
        }

        trace!(name, "unresolved type name");
        Ok(Expression::Unknown)
    }

    fn enter(&self) -> Result<DepthGuard<'_>> {
        let depth = self.depth.get() + 1;
        if depth > MAX_EXPRESSION_DEPTH {
            return Err(Error::NestingTooDeep {
                limit: MAX_EXPRESSION_DEPTH,
            });
        }
        self.depth.set(depth);
        Ok(DepthGuard { depth: &self.depth })
    }
}

struct DepthGuard<'p> {
    depth: &'p Cell<u32>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

fn expect_colon(cursor: &mut Cursor<'_>, property_start: usize) -> Result<()> {
    cursor.skip_whitespace();
    if cursor.eat(b':') {
        Ok(())
    } else {
        Err(Error::malformed_property(&cursor.text()[property_start..]))
    }
}

/// `true`, `false` and numeric literal types.
fn keyword_literal(token: &str) -> Option<Expression> {
    match token {
        "true" => return Some(Expression::literal(true)),
        "false" => return Some(Expression::literal(false)),
        _ => {}
    }
    let first = token.as_bytes().first()?;
    if !(first.is_ascii_digit() || *first == b'-') {
        return None;
    }
    token.parse::<f64>().ok().map(Expression::literal)
}

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod tests;
