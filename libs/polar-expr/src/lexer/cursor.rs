//! # Character Cursor
//!
//! Peekable character cursor for the tokenizer.
//! Tracks the byte offset as it advances and can rewind to a saved offset,
//! which the recursive-descent driver uses to backtrack.
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::lexer::Cursor;
//!
//! let mut cursor = Cursor::new("theta");
//! assert_eq!(cursor.peek(), Some('t'));
//! cursor.advance();
//! assert_eq!(cursor.peek(), Some('h'));
//! ```

// =============================================================================
// CURSOR
// =============================================================================

/// Character cursor with byte offset tracking.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// Source text.
    source: &'a str,
    /// Current byte offset.
    byte: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor for source text.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::lexer::Cursor;
    ///
    /// let cursor = Cursor::new("cos(theta)");
    /// assert!(!cursor.is_eof());
    /// ```
    pub fn new(source: &'a str) -> Self {
        Self { source, byte: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.byte
    }

    /// Rewind (or skip) to a byte offset previously returned by
    /// [`Cursor::position`].
    #[inline]
    pub fn reset(&mut self, byte: usize) {
        self.byte = byte.min(self.source.len());
    }

    /// Full source text.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Unconsumed remainder of the source.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::lexer::Cursor;
    ///
    /// let mut cursor = Cursor::new("1+2");
    /// cursor.advance();
    /// assert_eq!(cursor.rest(), "+2");
    /// ```
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.source[self.byte..]
    }

    /// Text between a saved offset and the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.byte]
    }

    /// Check if at end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.byte >= self.source.len()
    }

    /// Peek at current character without consuming it.
    ///
    /// ## Returns
    ///
    /// Current character or None if at end of input
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek at the character after the current one.
    #[inline]
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Consume and return the current character.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.byte += c.len_utf8();
        Some(c)
    }

    /// Consume characters while the predicate holds.
    ///
    /// ## Returns
    ///
    /// Number of characters consumed
    pub fn advance_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(char) -> bool,
    {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.byte += c.len_utf8();
            count += 1;
        }
        count
    }

    /// Consume `c` if it is the current character.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.byte += c.len_utf8();
            true
        } else {
            false
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_advance_and_rest() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.rest(), "b");
        assert_eq!(cursor.advance(), Some('b'));
        assert_eq!(cursor.advance(), None);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_peek_next() {
        let cursor = Cursor::new("**");
        assert_eq!(cursor.peek(), Some('*'));
        assert_eq!(cursor.peek_next(), Some('*'));
    }

    #[test]
    fn test_cursor_advance_while_counts_chars() {
        let mut cursor = Cursor::new("   x");
        assert_eq!(cursor.advance_while(char::is_whitespace), 3);
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[test]
    fn test_cursor_reset_and_slice() {
        let mut cursor = Cursor::new("sin(x)");
        let start = cursor.position();
        cursor.advance_while(char::is_alphabetic);
        assert_eq!(cursor.slice_from(start), "sin");
        cursor.reset(start);
        assert_eq!(cursor.rest(), "sin(x)");
    }

    #[test]
    fn test_cursor_multibyte_offsets() {
        let mut cursor = Cursor::new("θ+1");
        cursor.advance();
        assert_eq!(cursor.position(), 'θ'.len_utf8());
        assert!(cursor.eat('+'));
        assert!(!cursor.eat('+'));
    }
}
