//! Comment removal for declaration sources.
//!
//! Declaration files carry JSDoc blocks, line comments and `/// <reference>`
//! directives that are not part of any type body. They are located once per
//! file and blanked out before statements are cut, so byte offsets into the
//! stripped text still match the original file.

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset, exclusive)
    pub end: u32,
    /// Whether this is a multi-line comment
    pub is_multi_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.pos as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }
}

/// Extract all comment ranges from source text.
///
/// Single-line comments end before the line break. String literals are skipped
/// so `'https://example.com'` does not open a comment. An unterminated block
/// comment runs to the end of the input.
pub fn get_comment_ranges(source: &str) -> Vec<CommentRange> {
    let mut comments = Vec::new();
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        let ch = bytes[pos];

        if ch == b'"' || ch == b'\'' || ch == b'`' {
            pos = skip_string(bytes, pos);
            continue;
        }

        if ch == b'/' && pos + 1 < len {
            let next = bytes[pos + 1];

            if next == b'/' {
                let start = pos as u32;
                pos += 2;
                while pos < len && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
                comments.push(CommentRange::new(start, pos as u32, false));
                continue;
            } else if next == b'*' {
                let start = pos as u32;
                pos += 2;

                let mut closed = false;
                while pos + 1 < len {
                    if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                        pos += 2;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if !closed {
                    pos = len;
                }

                comments.push(CommentRange::new(start, pos as u32, true));
                continue;
            }
        }

        pos += 1;
    }

    comments
}

/// Return `source` with every comment replaced by spaces.
///
/// Line breaks inside block comments are kept, so line structure and byte
/// offsets are unchanged.
pub fn strip_comments(source: &str) -> String {
    let ranges = get_comment_ranges(source);
    if ranges.is_empty() {
        return source.to_string();
    }

    let mut out = String::with_capacity(source.len());
    let mut last = 0usize;
    for range in &ranges {
        let (start, end) = (range.pos as usize, range.end as usize);
        out.push_str(&source[last..start]);
        for ch in source[start..end].chars() {
            match ch {
                '\n' | '\r' => out.push(ch),
                // keep offsets stable for multi-byte characters
                _ => out.extend(std::iter::repeat_n(' ', ch.len_utf8())),
            }
        }
        last = end;
    }
    out.push_str(&source[last..]);
    out
}

/// Position just past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' if quote != b'`' => return pos,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
#[path = "../tests/comments_tests.rs"]
mod tests;
