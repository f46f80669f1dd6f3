//! things-par - Parser for ThingScript.
//!
//! A Pratt (top-down operator precedence) parser over the token stream from
//! `things-lex`. Statements are dispatched by looking at the current token
//! and, for the compound forms (`x := ...`, `x = ...`, `x += ...`,
//! `func name(...)`), one token of lookahead; everything else is an
//! expression statement.
//!
//! Parsing is best-effort: every error is appended to the parser's error
//! list and parsing continues, so a single pass reports as many problems as
//! possible. Callers must inspect [`Parser::errors`] after
//! [`Parser::parse_program`].
//!
//! Comment tokens are consumed inside the token feed, so the grammar never
//! sees them but their source positions are preserved up to that point.

mod ast;
mod edge_cases;
mod expr;
mod stmt;

pub use ast::*;
pub use expr::Precedence;

use things_lex::{Lexer, Token, TokenKind};

/// Recursive descent parser with Pratt expression parsing.
pub struct Parser<'a> {
    /// Token source.
    lexer: Lexer<'a>,

    /// The token under consideration.
    cur_token: Token,

    /// One token of lookahead.
    peek_token: Token,

    /// Accumulated parse errors, in source order.
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    /// Creates a parser and primes the current/peek token pair.
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut parser = Self {
            lexer,
            cur_token: Token::new(TokenKind::Eof, ""),
            peek_token: Token::new(TokenKind::Eof, ""),
            errors: Vec::new(),
        };
        parser.next_token();
        parser.next_token();
        parser
    }

    /// Parses the whole input. Statements that fail to parse are dropped;
    /// their errors stay in [`Parser::errors`].
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        loop {
            while self.cur_is(TokenKind::Semicolon) {
                self.next_token();
            }
            if self.cur_is(TokenKind::Eof) {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }
        program
    }

    /// The accumulated parse errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Statement dispatch on the current token (peeking one ahead for the
    /// compound forms).
    fn parse_statement(&mut self) -> Option<Statement> {
        match (self.cur_token.kind, self.peek_token.kind) {
            (TokenKind::Var, _) => self.parse_var_statement().map(Statement::Var),
            (TokenKind::Return, _) => self.parse_return_statement().map(Statement::Return),
            (TokenKind::Break, _) => Some(Statement::Break(self.parse_break_statement())),
            (TokenKind::Func, TokenKind::Ident) => {
                self.parse_function_statement().map(Statement::Function)
            }
            (TokenKind::Ident, TokenKind::VarAssign) => {
                self.parse_var_assign_statement().map(Statement::Var)
            }
            (TokenKind::Ident, TokenKind::Assign) => {
                self.parse_assign_statement().map(Statement::Assign)
            }
            (TokenKind::Ident, TokenKind::AddAssign) => {
                self.parse_oper_assign_statement("+").map(Statement::OperAssign)
            }
            (TokenKind::Ident, TokenKind::SubAssign) => {
                self.parse_oper_assign_statement("-").map(Statement::OperAssign)
            }
            (TokenKind::Ident, TokenKind::MulAssign) => {
                self.parse_oper_assign_statement("*").map(Statement::OperAssign)
            }
            (TokenKind::Ident, TokenKind::DivAssign) => {
                self.parse_oper_assign_statement("/").map(Statement::OperAssign)
            }
            (TokenKind::Ident, TokenKind::ModAssign) => {
                self.parse_oper_assign_statement("%").map(Statement::OperAssign)
            }
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    /// Advances the token window, silently skipping comment tokens.
    pub(crate) fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, Token::new(TokenKind::Eof, ""));
        loop {
            self.peek_token = self.lexer.next_token();
            if self.peek_token.kind != TokenKind::Comment {
                break;
            }
        }
    }

    pub(crate) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advances when the peek token matches; records an error otherwise.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    pub(crate) fn peek_error(&mut self, kind: TokenKind) {
        self.errors.push(format!(
            "expected next token to be {}, got {} instead",
            kind, self.peek_token.kind
        ));
    }

    pub(crate) fn no_prefix_error(&mut self) {
        self.errors.push(format!(
            "no prefix parse function for {} found",
            self.cur_token.kind
        ));
    }

    pub(crate) fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Consumes any trailing semicolons following a statement.
    pub(crate) fn skip_trailing_semicolons(&mut self) {
        while self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }
}
