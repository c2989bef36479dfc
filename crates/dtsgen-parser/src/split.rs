//! Top-level tokenization of one type expression.
//!
//! `split` walks forward from the cursor, skipping whitespace, and stops at a
//! top-level `;` or `,` (consumed) or at an unmatched closer `} ) ] >` (left
//! for the caller). Nested constructs are consumed whole as pairs, so the
//! tokens it yields are raw slices the parser classifies afterwards.

use crate::cursor::{Cursor, is_word_byte};
use crate::pair::{is_opener, pair};
use dtsgen_common::{Error, Result};

/// Operator joining the tokens of one split level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// `|`
    Union,
    /// `&`
    Intersection,
}

impl Delimiter {
    const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'|' => Some(Delimiter::Union),
            b'&' => Some(Delimiter::Intersection),
            _ => None,
        }
    }
}

/// Result of splitting one expression level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split<'a> {
    pub tokens: Vec<&'a str>,
    pub delimiter: Option<Delimiter>,
    /// Bytes consumed, including the terminating `;` or `,`.
    pub consumed: usize,
}

/// Split the text at `cursor` into tokens, advancing the cursor past them.
pub fn split<'a>(cursor: &mut Cursor<'a>) -> Result<Split<'a>> {
    let start = cursor.pos();
    let mut tokens = Vec::new();
    let mut delimiter = None;

    loop {
        cursor.skip_whitespace();
        let Some(byte) = cursor.peek() else {
            break;
        };

        match byte {
            b';' | b',' => {
                cursor.advance(1);
                break;
            }
            b'}' | b')' | b']' | b'>' => break,
            b'|' | b'&' => {
                let found = Delimiter::from_byte(byte);
                match delimiter {
                    None => delimiter = found,
                    Some(active) if Some(active) != found => {
                        return Err(Error::ambiguous_delimiters(&cursor.text()[start..]));
                    }
                    Some(_) => {}
                }
                cursor.advance(1);
            }
            b'=' if cursor.peek_at(1) == Some(b'>') => {
                let token_start = cursor.pos();
                cursor.advance(2);
                tokens.push(cursor.slice_from(token_start));
            }
            _ if is_opener(byte) => {
                let token_start = cursor.pos();
                take_adjoining_pairs(cursor)?;
                tokens.push(cursor.slice_from(token_start));
            }
            _ if is_word_byte(byte) || byte == b'-' => {
                let token_start = cursor.pos();
                if cursor.take_name().is_none() {
                    return Err(Error::malformed_declaration(&cursor.text()[start..]));
                }
                take_adjoining_pairs(cursor)?;
                if !cursor.peek().is_none_or(is_separator) {
                    return Err(Error::malformed_declaration(&cursor.text()[start..]));
                }
                tokens.push(cursor.slice_from(token_start));
            }
            _ => return Err(Error::malformed_declaration(&cursor.text()[start..])),
        }
    }

    Ok(Split {
        tokens,
        delimiter,
        consumed: cursor.pos() - start,
    })
}

/// Consume consecutive pairs with nothing between them (`(a)[]`, `<T>(x)`).
fn take_adjoining_pairs(cursor: &mut Cursor<'_>) -> Result<()> {
    while let Some(span) = pair(cursor.rest())? {
        cursor.advance(span.len());
    }
    Ok(())
}

/// Characters allowed to follow a bare word token.
fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace()
        || matches!(byte, b';' | b',' | b'|' | b'&' | b'}' | b')' | b']' | b'>')
}

#[cfg(test)]
#[path = "../tests/split_tests.rs"]
mod tests;
