//! Peekable, markable character source over a `&str`.

/// Character cursor with a lexeme mark.
///
/// Positions are byte offsets into the source; peeking is by character.
#[derive(Debug, Clone)]
pub struct CharReader<'a> {
    source: &'a str,
    pos: usize,
    mark: usize,
}

impl<'a> CharReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            mark: 0,
        }
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Everything not yet consumed.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek `n` characters ahead; `peek_n(0)` is `peek()`.
    pub fn peek_n(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    #[inline]
    pub fn starts_with(&self, text: &str) -> bool {
        self.rest().starts_with(text)
    }

    /// Consume one character.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `n` bytes. `n` must land on a character boundary.
    pub fn advance_bytes(&mut self, n: usize) {
        debug_assert!(self.source.is_char_boundary(self.pos + n));
        self.pos = (self.pos + n).min(self.source.len());
    }

    /// Consume `text` if the input starts with it.
    pub fn eat(&mut self, text: &str) -> bool {
        if self.starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds.
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Start a new lexeme at the current position.
    #[inline]
    pub fn mark(&mut self) {
        self.mark = self.pos;
    }

    /// Rewind to the last mark.
    #[inline]
    pub fn reset(&mut self) {
        self.pos = self.mark;
    }

    /// Text consumed since the last mark.
    #[inline]
    pub fn lexeme(&self) -> &'a str {
        &self.source[self.mark..self.pos]
    }
}
