//! Expression parsing using Pratt parsing (top-down operator precedence).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators |
//! |-------|-----------|
//! | EQUALS | `==`, `!=`, `??` |
//! | LESSGREATER | `<`, `<=`, `>`, `>=` |
//! | SUM | `+`, `-` |
//! | PRODUCT | `*`, `/`, `%` |
//! | PREFIX | unary `-`, `!` |
//! | CALL | `f(...)` |
//! | ACCESS | `.` |
//! | INDEX | `[...]` |
//!
//! The core loop parses a prefix expression, then folds infix operators
//! while the peeked operator binds tighter than the caller's precedence.
//! All binary operators are left-associative.

use things_lex::TokenKind;

use crate::ast::*;
use crate::Parser;

/// Binding strength of an operator position. Order matters: the derived
/// `Ord` drives the Pratt loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==`, `!=`, `??`
    Equals,
    /// `<`, `<=`, `>`, `>=`
    LessGreater,
    /// `+`, `-`
    Sum,
    /// `*`, `/`, `%`
    Product,
    /// Unary `-x`, `!x`
    Prefix,
    /// `f(x)`
    Call,
    /// `x.member`
    Access,
    /// `xs[i]`
    Index,
}

/// Maps an infix-capable token to its precedence; everything else is
/// `Lowest` and terminates the fold.
pub(crate) fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq | TokenKind::ImmediateIf => Precedence::Equals,
        TokenKind::Lt | TokenKind::Lte | TokenKind::Gt | TokenKind::Gte => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::Dot => Precedence::Access,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

impl<'a> Parser<'a> {
    /// The Pratt core: prefix dispatch, then an infix fold bounded by
    /// `precedence`.
    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            if !is_infix(self.peek_token_kind()) {
                return Some(left);
            }
            self.next_token();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token_kind() {
            TokenKind::Ident => Some(Expression::Identifier(self.cur_identifier())),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::Str => Some(self.parse_string_literal()),
            TokenKind::True | TokenKind::False => Some(self.parse_boolean_literal()),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::If => self.parse_if_expression().map(Expression::If),
            TokenKind::While => self.parse_while_expression(),
            TokenKind::Do => self.parse_do_while_expression(),
            TokenKind::Func => self.parse_function_literal(),
            _ => {
                self.no_prefix_error();
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.cur_token_kind() {
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            TokenKind::Dot => self.parse_access_expression(left),
            TokenKind::ImmediateIf => self.parse_immediate_if_expression(left),
            _ => self.parse_infix_expression(left),
        }
    }

    // =========================================================================
    // Prefix forms
    // =========================================================================

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        match parse_integer(&token.literal) {
            Some(value) => Some(Expression::Integer(IntegerLiteral { token, value })),
            None => {
                self.error(format!("could not parse {:?} as integer", token.literal));
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Float(FloatLiteral { token, value })),
            Err(_) => {
                self.error(format!("could not parse {:?} as float", token.literal));
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Expression {
        let token = self.cur_token_cloned();
        let value = token.literal.clone();
        Expression::Str(StringLiteral { token, value })
    }

    fn parse_boolean_literal(&mut self) -> Expression {
        let token = self.cur_token_cloned();
        let value = token.kind == TokenKind::True;
        Expression::Boolean(BooleanLiteral { token, value })
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        let operator = token.literal.clone();
        self.next_token();
        let right = Box::new(self.parse_expression(Precedence::Prefix)?);
        Some(Expression::Prefix(PrefixExpression { token, operator, right }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::Array(ArrayLiteral { token, elements }))
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }
        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }
        Some(Expression::Hash(HashLiteral { token, pairs }))
    }

    /// `if cond { ... }` with optional `else { ... }` or `else if ...`.
    /// An `else if` wraps the nested `if` as the sole statement of the
    /// alternative block, keeping the alternative-is-a-block invariant.
    pub(crate) fn parse_if_expression(&mut self) -> Option<IfExpression> {
        let token = self.cur_token_cloned();
        self.next_token();
        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let mut alternative = None;
        if self.peek_is(TokenKind::Else) {
            self.next_token();
            if self.peek_is(TokenKind::If) {
                self.next_token();
                let nested_token = self.cur_token_cloned();
                let nested = self.parse_if_expression()?;
                alternative = Some(BlockStatement {
                    token: nested_token.clone(),
                    statements: vec![Statement::Expression(ExpressionStatement {
                        token: nested_token,
                        expression: Expression::If(nested),
                    })],
                });
            } else {
                if !self.expect_peek(TokenKind::LBrace) {
                    return None;
                }
                alternative = Some(self.parse_block_statement());
            }
        }

        Some(IfExpression {
            token,
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_while_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        self.next_token();
        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        self.skip_trailing_semicolons();
        Some(Expression::While(WhileExpression { token, condition, body }))
    }

    /// `do { ... } while cond` — the condition comes after the body.
    fn parse_do_while_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        if !self.expect_peek(TokenKind::While) {
            return None;
        }
        self.next_token();
        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);
        self.skip_trailing_semicolons();
        Some(Expression::DoWhile(DoWhileExpression { token, condition, body }))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token_cloned();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::Function(FunctionLiteral {
            token,
            parameters,
            body,
            name: String::new(),
        }))
    }

    pub(crate) fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }
        loop {
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            parameters.push(self.cur_identifier());
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(parameters)
    }

    // =========================================================================
    // Infix forms
    // =========================================================================

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token_cloned();
        let operator = token.literal.clone();
        let precedence = self.cur_precedence();
        self.next_token();
        let right = Box::new(self.parse_expression(precedence)?);
        Some(Expression::Infix(InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right,
        }))
    }

    fn parse_immediate_if_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token_cloned();
        let precedence = self.cur_precedence();
        self.next_token();
        let right = Box::new(self.parse_expression(precedence)?);
        Some(Expression::ImmediateIf(ImmediateIfExpression {
            token,
            left: Box::new(left),
            right,
        }))
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur_token_cloned();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token_cloned();
        self.next_token();
        let index = Box::new(self.parse_expression(Precedence::Lowest)?);
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index,
        }))
    }

    /// After `.` the parser requires an identifier; a following `(` turns
    /// the access into a method call.
    fn parse_access_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token_cloned();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let ident = Expression::Identifier(self.cur_identifier());
        let right = if self.peek_is(TokenKind::LParen) {
            self.next_token();
            let call_token = self.cur_token_cloned();
            let arguments = self.parse_expression_list(TokenKind::RParen)?;
            Expression::Call(CallExpression {
                token: call_token,
                function: Box::new(ident),
                arguments,
            })
        } else {
            ident
        };
        Some(Expression::Access(AccessExpression {
            token,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    pub(crate) fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    // =========================================================================
    // Small accessors used across the parser modules
    // =========================================================================

    pub(crate) fn cur_token_kind(&self) -> TokenKind {
        self.cur_token.kind
    }

    pub(crate) fn peek_token_kind(&self) -> TokenKind {
        self.peek_token.kind
    }

    pub(crate) fn cur_token_cloned(&self) -> things_lex::Token {
        self.cur_token.clone()
    }

    pub(crate) fn cur_identifier(&self) -> Identifier {
        Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }
    }

    pub(crate) fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur_token.kind)
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek_token.kind)
    }
}

fn is_infix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Slash
            | TokenKind::Asterisk
            | TokenKind::Percent
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Lte
            | TokenKind::Gt
            | TokenKind::Gte
            | TokenKind::Dot
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::ImmediateIf
    )
}

/// Converts an integer literal with radix auto-detection: `0x`/`0X` hex,
/// `0b`/`0B` binary, `0o`/`0O` or a bare leading zero octal, decimal
/// otherwise.
fn parse_integer(literal: &str) -> Option<i64> {
    let (digits, radix) = if let Some(rest) =
        literal.strip_prefix("0x").or_else(|| literal.strip_prefix("0X"))
    {
        (rest, 16)
    } else if let Some(rest) = literal.strip_prefix("0b").or_else(|| literal.strip_prefix("0B")) {
        (rest, 2)
    } else if let Some(rest) = literal.strip_prefix("0o").or_else(|| literal.strip_prefix("0O")) {
        (rest, 8)
    } else if literal.len() > 1 && literal.starts_with('0') {
        (&literal[1..], 8)
    } else {
        (literal, 10)
    };
    i64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::parse_integer;

    #[test]
    fn radix_detection() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("0xFF"), Some(255));
        assert_eq!(parse_integer("0X0a"), Some(10));
        assert_eq!(parse_integer("0b1010"), Some(10));
        assert_eq!(parse_integer("0o17"), Some(15));
        assert_eq!(parse_integer("017"), Some(15));
        assert_eq!(parse_integer("0x"), None);
        assert_eq!(parse_integer("08"), None);
        assert_eq!(parse_integer("0b2"), None);
    }
}
