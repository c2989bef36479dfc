//! Byte cursor threaded through the recursive parse functions.
//!
//! Every delimiter the grammar cares about is ASCII, so positions are byte
//! offsets and slicing at them always lands on a char boundary.

#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// The full text the cursor walks over.
    pub const fn text(&self) -> &'a str {
        self.text
    }

    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Unconsumed remainder.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.text[start..self.pos]
    }

    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    pub fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.text.len());
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume `byte` if it is next.
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `keyword` if it is next and is not the prefix of a longer word.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        if rest.starts_with(keyword)
            && !rest.as_bytes().get(keyword.len()).copied().is_some_and(is_word_byte)
        {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    /// Consume a run of identifier bytes.
    pub fn take_word(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(is_word_byte) {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.slice_from(start))
    }

    /// Consume a possibly qualified name (`a.b.C`), or a signed number (`-1.5`).
    pub fn take_name(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if self.peek() == Some(b'-') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.take_word()?;
        while self.peek() == Some(b'.') && self.peek_at(1).is_some_and(is_word_byte) {
            self.pos += 1;
            self.take_word();
        }
        Some(self.slice_from(start))
    }
}

/// Bytes allowed in identifiers and numeric tokens.
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

/// True when `text` is a single identifier.
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(is_word_byte)
}
