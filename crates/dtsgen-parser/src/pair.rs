//! Balanced delimiter scanning.
//!
//! A pair is a quoted string or a bracketed group that the tokenizer treats as
//! one indivisible token. Quotes close at the first matching quote that is not
//! preceded by a backslash. Brackets keep a nesting counter for their own
//! opener only, so `(a[)` closes at the `)`.

use dtsgen_common::{Error, Result};

/// The closer matching an opening delimiter byte.
pub const fn closing_delimiter(open: u8) -> Option<u8> {
    match open {
        b'"' => Some(b'"'),
        b'\'' => Some(b'\''),
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        b'<' => Some(b'>'),
        _ => None,
    }
}

pub const fn is_opener(byte: u8) -> bool {
    closing_delimiter(byte).is_some()
}

pub const fn is_quote(byte: u8) -> bool {
    matches!(byte, b'"' | b'\'')
}

/// Return the minimal balanced span at the start of `text`.
///
/// `Ok(None)` when `text` does not start with `' " ( [ { <`;
/// `UnbalancedDelimiter` when the input ends before the span closes.
pub fn pair(text: &str) -> Result<Option<&str>> {
    let bytes = text.as_bytes();
    let Some(&open) = bytes.first() else {
        return Ok(None);
    };
    let Some(close) = closing_delimiter(open) else {
        return Ok(None);
    };

    if is_quote(open) {
        for index in 1..bytes.len() {
            if bytes[index] == close && bytes[index - 1] != b'\\' {
                return Ok(Some(&text[..=index]));
            }
        }
    } else {
        let mut nests = 1usize;
        for (index, &byte) in bytes.iter().enumerate().skip(1) {
            if byte == open {
                nests += 1;
            } else if byte == close {
                nests -= 1;
                if nests == 0 {
                    return Ok(Some(&text[..=index]));
                }
            }
        }
    }

    Err(Error::unbalanced(open as char, close as char, text))
}

/// Inner text of a pair, without its delimiters.
pub fn inner(pair: &str) -> &str {
    if pair.len() < 2 {
        return "";
    }
    &pair[1..pair.len() - 1]
}

/// Undo backslash escapes in the body of a quoted literal.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Split the inside of a generic argument list at top-level commas.
pub fn split_arguments(text: &str) -> Result<Vec<&str>> {
    let mut arguments = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte == b',' {
            arguments.push(text[start..index].trim());
            start = index + 1;
            index += 1;
        } else if is_opener(byte) {
            let span = pair(&text[index..])?.map_or(1, str::len);
            index += span;
        } else {
            index += 1;
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() || !arguments.is_empty() {
        arguments.push(last);
    }
    Ok(arguments)
}

#[cfg(test)]
#[path = "../tests/pair_tests.rs"]
mod tests;
