//! Character cursor for traversing source code.
//!
//! The cursor walks a `&str` by byte position while exposing a char-oriented
//! API, and tracks the line/column of the character currently under it.
//! Column accounting follows the language rules: a tab advances the column
//! by the configured tab size, a carriage return is ignored, and a newline
//! resets the column and bumps the line.

use crate::{Position, DEFAULT_TAB_SIZE};

/// A cursor over source text tracking the current character's position.
pub struct Cursor<'a> {
    /// The source text being traversed.
    source: &'a str,

    /// Byte offset of the current character.
    position: usize,

    /// Line of the current character (1-based).
    line: u32,

    /// Column of the current character. Starts at 0 and is advanced when a
    /// character becomes current, so the first character of a line sits at
    /// column 1 (or at the tab size, if it is a tab).
    column: u32,

    /// Number of columns a tab advances.
    tab_size: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_tab_size(source, DEFAULT_TAB_SIZE)
    }

    pub fn with_tab_size(source: &'a str, tab_size: u32) -> Self {
        let mut cursor = Self {
            source,
            position: 0,
            line: 1,
            column: 0,
            tab_size,
        };
        cursor.account(cursor.current_char());
        cursor
    }

    /// Returns the character under the cursor, or `'\0'` at end of input.
    #[inline]
    pub fn current_char(&self) -> char {
        self.char_at(self.position)
    }

    /// Returns the character after the current one, or `'\0'`.
    #[inline]
    pub fn peek_char(&self) -> char {
        let current = self.current_char();
        if current == '\0' {
            return '\0';
        }
        self.char_at(self.position + current.len_utf8())
    }

    /// Moves the cursor to the next character, updating line/column state.
    pub fn advance(&mut self) {
        let current = self.current_char();
        if current == '\0' {
            return;
        }
        self.position += current.len_utf8();
        self.account(self.current_char());
    }

    /// True once the cursor has moved past the final character.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Byte offset of the current character.
    pub fn offset(&self) -> usize {
        self.position
    }

    /// Position (line/column) of the current character.
    pub fn pos(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// The source text between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn char_at(&self, pos: usize) -> char {
        if pos >= self.source.len() {
            return '\0';
        }
        // Fast path for ASCII (most common case).
        let b = self.source.as_bytes()[pos];
        if b < 128 {
            return b as char;
        }
        self.source[pos..].chars().next().unwrap_or('\0')
    }

    /// Applies the column/line rules for the character becoming current.
    fn account(&mut self, ch: char) {
        match ch {
            '\n' => {
                self.line += 1;
                self.column = 0;
            }
            '\t' => self.column += self.tab_size,
            '\r' | '\0' => {}
            _ => self.column += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_ascii() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.current_char(), 'a');
        assert_eq!(cursor.peek_char(), 'b');
        cursor.advance();
        assert_eq!(cursor.current_char(), 'b');
        cursor.advance();
        assert_eq!(cursor.current_char(), '\0');
        assert!(cursor.is_at_end());
    }

    #[test]
    fn walks_multibyte() {
        let mut cursor = Cursor::new("π=1");
        assert_eq!(cursor.current_char(), 'π');
        assert_eq!(cursor.peek_char(), '=');
        cursor.advance();
        assert_eq!(cursor.current_char(), '=');
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut cursor = Cursor::new("a\nbc");
        assert_eq!(cursor.pos(), Position { line: 1, column: 1 });
        cursor.advance(); // now at '\n'
        assert_eq!(cursor.pos(), Position { line: 2, column: 0 });
        cursor.advance(); // 'b'
        assert_eq!(cursor.pos(), Position { line: 2, column: 1 });
        cursor.advance(); // 'c'
        assert_eq!(cursor.pos(), Position { line: 2, column: 2 });
    }

    #[test]
    fn tab_advances_by_tab_size() {
        let mut cursor = Cursor::with_tab_size("\tx", 8);
        assert_eq!(cursor.pos().column, 8);
        cursor.advance();
        assert_eq!(cursor.pos().column, 9);
    }

    #[test]
    fn carriage_return_is_ignored() {
        let mut cursor = Cursor::new("a\r\nb");
        cursor.advance(); // '\r' — column unchanged
        assert_eq!(cursor.pos(), Position { line: 1, column: 1 });
        cursor.advance(); // '\n'
        cursor.advance(); // 'b'
        assert_eq!(cursor.pos(), Position { line: 2, column: 1 });
    }
}
