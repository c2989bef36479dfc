//! Top-level statement chunking.
//!
//! Declaration files emitted by `tsc` put every top-level statement in column
//! 0 and indent everything nested. A line that starts with a word followed by
//! a space opens a new statement; any other non-blank line continues the
//! current one. Continuations are trimmed and joined with single spaces, so
//! multi-line object bodies arrive as one line.

use dtsgen_common::comments::strip_comments;
use dtsgen_parser::cursor::is_word_byte;

/// One top-level statement with its position in the original file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    /// Byte offset of the statement's first line.
    pub offset: usize,
}

impl Statement {
    /// First word of the statement (`export`, `import`, `type`, ...).
    pub fn leading_word(&self) -> &str {
        let end = self
            .text
            .bytes()
            .position(|b| !is_word_byte(b))
            .unwrap_or(self.text.len());
        &self.text[..end]
    }
}

/// Chunk `source` into statements, optionally removing comments first.
pub fn split_statements(source: &str, strip: bool) -> Vec<Statement> {
    let stripped;
    let source = if strip {
        stripped = strip_comments(source);
        stripped.as_str()
    } else {
        source
    };

    let mut statements = Vec::new();
    let mut current: Option<Statement> = None;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let line_offset = offset;
        offset += line.len();

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if starts_statement(line) {
            statements.extend(current.take());
            current = Some(Statement {
                text: trimmed.to_string(),
                offset: line_offset,
            });
            continue;
        }

        match &mut current {
            Some(statement) => {
                statement.text.push(' ');
                statement.text.push_str(trimmed);
            }
            None => {
                current = Some(Statement {
                    text: trimmed.to_string(),
                    offset: line_offset + (line.len() - line.trim_start().len()),
                });
            }
        }
    }

    statements.extend(current);
    statements
}

/// `^\w+ `: a word in column 0 followed by a space.
fn starts_statement(line: &str) -> bool {
    let bytes = line.as_bytes();
    let word = bytes.iter().take_while(|&&b| is_word_byte(b)).count();
    word > 0 && bytes.get(word) == Some(&b' ')
}

#[cfg(test)]
#[path = "../tests/statements_tests.rs"]
mod tests;
