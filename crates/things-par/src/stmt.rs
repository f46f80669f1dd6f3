//! Statement parsing.

use things_lex::{Token, TokenKind};

use crate::ast::*;
use crate::expr::Precedence;
use crate::Parser;

impl<'a> Parser<'a> {
    /// `var name = expr`, `var name type = expr`, `var name pkg.Type`.
    /// At least one of the type annotation and the initializer is required.
    pub(crate) fn parse_var_statement(&mut self) -> Option<VarStatement> {
        let token = self.cur_token_cloned();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_identifier();

        let mut decl = None;
        if self.peek_is(TokenKind::Ident) {
            self.next_token();
            let first = self.cur_identifier();
            decl = if self.peek_is(TokenKind::Dot) {
                self.next_token();
                if !self.expect_peek(TokenKind::Ident) {
                    return None;
                }
                Some(TypeDecl {
                    package: Some(first),
                    name: self.cur_identifier(),
                })
            } else {
                Some(TypeDecl {
                    package: None,
                    name: first,
                })
            };
        }

        let mut value = None;
        if self.peek_is(TokenKind::Assign) {
            self.next_token();
            self.next_token();
            value = Some(self.parse_expression(Precedence::Lowest)?);
        } else if decl.is_none() {
            self.peek_error(TokenKind::Assign);
            return None;
        }

        stamp_function_name(&name, &mut value);
        self.skip_trailing_semicolons();
        Some(VarStatement { token, name, decl, value })
    }

    /// Shorthand declaration `name := expr`; carries a synthesized `var`
    /// token so it renders and evaluates like the long form.
    pub(crate) fn parse_var_assign_statement(&mut self) -> Option<VarStatement> {
        let name = self.cur_identifier();
        if !self.expect_peek(TokenKind::VarAssign) {
            return None;
        }
        self.next_token();
        let mut value = Some(self.parse_expression(Precedence::Lowest)?);
        stamp_function_name(&name, &mut value);
        self.skip_trailing_semicolons();
        Some(VarStatement {
            token: Token::new(TokenKind::Var, "var"),
            name,
            decl: None,
            value,
        })
    }

    pub(crate) fn parse_assign_statement(&mut self) -> Option<AssignStatement> {
        let name = self.cur_identifier();
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        let token = self.cur_token_cloned();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_trailing_semicolons();
        Some(AssignStatement { token, name, value })
    }

    pub(crate) fn parse_oper_assign_statement(
        &mut self,
        operator: &str,
    ) -> Option<OperAssignStatement> {
        let name = self.cur_identifier();
        self.next_token();
        let token = self.cur_token_cloned();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_trailing_semicolons();
        Some(OperAssignStatement {
            token,
            name,
            operator: operator.to_string(),
            value,
        })
    }

    /// `return expr;` — the expression is optional so a bare `return`
    /// yields `Null` at evaluation time.
    pub(crate) fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let token = self.cur_token_cloned();
        if self.peek_is(TokenKind::Semicolon)
            || self.peek_is(TokenKind::RBrace)
            || self.peek_is(TokenKind::Eof)
        {
            self.skip_trailing_semicolons();
            return Some(ReturnStatement { token, value: None });
        }
        self.next_token();
        let value = Some(self.parse_expression(Precedence::Lowest)?);
        self.skip_trailing_semicolons();
        Some(ReturnStatement { token, value })
    }

    pub(crate) fn parse_break_statement(&mut self) -> BreakStatement {
        let token = self.cur_token_cloned();
        self.skip_trailing_semicolons();
        BreakStatement { token }
    }

    /// `func name(params) { body }` — the named declaration form.
    pub(crate) fn parse_function_statement(&mut self) -> Option<FunctionStatement> {
        let token = self.cur_token_cloned();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_identifier();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(FunctionStatement {
            token,
            name,
            parameters,
            body,
        })
    }

    /// `{ statements }` — stray semicolons between statements are consumed
    /// silently.
    pub(crate) fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.cur_token_cloned();
        let mut statements = Vec::new();
        self.next_token();
        loop {
            while self.cur_is(TokenKind::Semicolon) {
                self.next_token();
            }
            if self.cur_is(TokenKind::RBrace) || self.cur_is(TokenKind::Eof) {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        BlockStatement { token, statements }
    }

    pub(crate) fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let token = self.cur_token_cloned();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(ExpressionStatement { token, expression })
    }
}

/// Stamps the variable name onto a function-literal initializer for
/// diagnostics (`var f = func(...) {...}` names the literal `f`).
fn stamp_function_name(name: &Identifier, value: &mut Option<Expression>) {
    if let Some(Expression::Function(literal)) = value {
        if literal.name.is_empty() {
            literal.name = name.value.clone();
        }
    }
}
