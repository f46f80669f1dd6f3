//! The lexer: source text to token stream.
//!
//! Recognition is direct-coded: `next_token` dispatches on the current
//! character and hands off to a `lex_*` helper for anything longer than one
//! character. Multi-character operators (`==`, `!=`, `<=`, `>=`, `:=`, `??`,
//! `+=`, `-=`, `*=`, `/=`, `%=`) are recognized with a single character of
//! lookahead.

use crate::cursor::Cursor;
use crate::token::{lookup_ident, Token, TokenKind};
use crate::DEFAULT_TAB_SIZE;

/// Lexer for ThingScript source.
///
/// Produces one token per [`Lexer::next_token`] call and an endless stream
/// of `EOF` tokens once the input is exhausted. An unrecognized character
/// produces an `ILLEGAL` token carrying that character and lexing continues.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,

    /// Line of the previously emitted token; 0 before the first token.
    /// A token beginning on a different line is flagged `no_infix`.
    prev_line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_tab_size(source, DEFAULT_TAB_SIZE)
    }

    pub fn with_tab_size(source: &'a str, tab_size: u32) -> Self {
        Self {
            cursor: Cursor::with_tab_size(source, tab_size),
            prev_line: 0,
        }
    }

    /// Returns the next token in the source stream.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let position = self.cursor.pos();
        let mut advance_after = true;

        let mut token = match self.cursor.current_char() {
            '\0' => Token::new(TokenKind::Eof, ""),
            '=' => self.operator('=', TokenKind::Eq, TokenKind::Assign),
            '!' => self.operator('=', TokenKind::NotEq, TokenKind::Bang),
            ':' => self.operator('=', TokenKind::VarAssign, TokenKind::Colon),
            '<' => self.operator('=', TokenKind::Lte, TokenKind::Lt),
            '>' => self.operator('=', TokenKind::Gte, TokenKind::Gt),
            '+' => self.operator('=', TokenKind::AddAssign, TokenKind::Plus),
            '-' => self.operator('=', TokenKind::SubAssign, TokenKind::Minus),
            '*' => self.operator('=', TokenKind::MulAssign, TokenKind::Asterisk),
            '%' => self.operator('=', TokenKind::ModAssign, TokenKind::Percent),
            '?' => {
                if self.cursor.peek_char() == '?' {
                    self.cursor.advance();
                    Token::new(TokenKind::ImmediateIf, "??")
                } else {
                    Token::new(TokenKind::Illegal, "?")
                }
            }
            '/' => self.lex_slash(),
            ';' => Token::new(TokenKind::Semicolon, ";"),
            ',' => Token::new(TokenKind::Comma, ","),
            '.' => Token::new(TokenKind::Dot, "."),
            '(' => Token::new(TokenKind::LParen, "("),
            ')' => Token::new(TokenKind::RParen, ")"),
            '{' => Token::new(TokenKind::LBrace, "{"),
            '}' => Token::new(TokenKind::RBrace, "}"),
            '[' => Token::new(TokenKind::LBracket, "["),
            ']' => Token::new(TokenKind::RBracket, "]"),
            '"' => self.lex_string(),
            ch if is_letter(ch) => {
                advance_after = false;
                self.lex_identifier()
            }
            ch if ch.is_ascii_digit() => {
                advance_after = false;
                self.lex_number()
            }
            ch => Token::new(TokenKind::Illegal, ch.to_string()),
        };

        token.position = position;
        token.no_infix = position.line != self.prev_line;
        self.prev_line = position.line;

        if advance_after {
            self.cursor.advance();
        }
        token
    }

    /// Recognizes `<first><follow>` as `double` or `<first>` alone as
    /// `single`, consuming only the first character of a single.
    fn operator(&mut self, follow: char, double: TokenKind, single: TokenKind) -> Token {
        let first = self.cursor.current_char();
        if self.cursor.peek_char() == follow {
            self.cursor.advance();
            let mut literal = String::with_capacity(2);
            literal.push(first);
            literal.push(follow);
            Token::new(double, literal)
        } else {
            Token::new(single, first.to_string())
        }
    }

    /// `/` begins a division, a `/=`, or one of the two comment forms.
    fn lex_slash(&mut self) -> Token {
        match self.cursor.peek_char() {
            '/' => {
                self.cursor.advance();
                let comment = self.read_line_comment();
                Token::new(TokenKind::Comment, comment)
            }
            '*' => {
                self.cursor.advance();
                let comment = self.read_block_comment();
                Token::new(TokenKind::Comment, comment)
            }
            '=' => {
                self.cursor.advance();
                Token::new(TokenKind::DivAssign, "/=")
            }
            _ => Token::new(TokenKind::Slash, "/"),
        }
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.offset();
        while is_letter(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let literal = self.cursor.slice(start, self.cursor.offset());
        Token::new(lookup_ident(literal), literal)
    }

    /// Lexes an integer or float literal, preserving the source form.
    ///
    /// Radix prefixes (`0x`, `0b`, `0o`, bare leading `0`) stay in the
    /// literal; the parser re-detects the base when converting. A second
    /// `.` inside one number yields `ILLEGAL` and leaves the cursor on the
    /// offending dot.
    fn lex_number(&mut self) -> Token {
        let start = self.cursor.offset();
        let first = self.cursor.current_char();
        let peek = self.cursor.peek_char();

        if first == '0' && (peek == 'x' || peek == 'X') {
            self.cursor.advance();
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_hexdigit() {
                self.cursor.advance();
            }
            return self.raw_token(TokenKind::Int, start);
        }

        if first == '0' && (peek == 'b' || peek == 'B') {
            self.cursor.advance();
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            return self.raw_token(TokenKind::Int, start);
        }

        if first == '0' && (peek == 'o' || peek == 'O' || peek.is_ascii_digit()) {
            self.cursor.advance();
            if matches!(self.cursor.current_char(), 'o' | 'O') {
                self.cursor.advance();
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            return self.raw_token(TokenKind::Int, start);
        }

        let mut kind = TokenKind::Int;
        loop {
            let ch = self.cursor.current_char();
            if ch.is_ascii_digit() {
                self.cursor.advance();
            } else if ch == '.' {
                if kind == TokenKind::Float {
                    return Token::new(TokenKind::Illegal, "");
                }
                kind = TokenKind::Float;
                self.cursor.advance();
            } else {
                break;
            }
        }
        self.raw_token(kind, start)
    }

    /// Reads a string literal body. No escape processing: the content is the
    /// raw characters up to the closing quote or end of input.
    fn lex_string(&mut self) -> Token {
        let start = self.cursor.offset() + 1;
        loop {
            self.cursor.advance();
            let ch = self.cursor.current_char();
            if ch == '"' || ch == '\0' {
                break;
            }
        }
        let literal = self.cursor.slice(start, self.cursor.offset());
        Token::new(TokenKind::Str, literal)
    }

    /// Reads from after `//` to the end of the line. The newline is not part
    /// of the comment.
    fn read_line_comment(&mut self) -> String {
        let start = self.cursor.offset() + 1;
        loop {
            self.cursor.advance();
            let ch = self.cursor.current_char();
            if ch == '\n' || ch == '\0' {
                break;
            }
        }
        let end = self.cursor.offset().max(start);
        self.cursor.slice(start, end).to_string()
    }

    /// Reads from after `/*` up to the matching `*/`. An unterminated block
    /// comment swallows the rest of the input and yields an empty literal.
    fn read_block_comment(&mut self) -> String {
        let start = self.cursor.offset() + 1;
        loop {
            self.cursor.advance();
            let ch = self.cursor.current_char();
            if ch == '\0' {
                return String::new();
            }
            if ch == '*' && self.cursor.peek_char() == '/' {
                let end = self.cursor.offset();
                self.cursor.advance();
                return self.cursor.slice(start, end).to_string();
            }
        }
    }

    fn raw_token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, self.cursor.slice(start, self.cursor.offset()))
    }

    fn skip_whitespace(&mut self) {
        while self.cursor.current_char().is_whitespace() {
            self.cursor.advance();
        }
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}
