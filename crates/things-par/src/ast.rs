//! AST node definitions.
//!
//! Two disjoint categories, [`Statement`] and [`Expression`], each a tagged
//! enum with boxed children. Every node keeps the token it originated from
//! for diagnostics. The tree is built once by the parser and only read
//! afterwards; there are no parent back-pointers.
//!
//! `Display` renders nodes back to source text that re-parses to an
//! equivalent tree, which the parser tests rely on.

use std::fmt;

use things_lex::Token;

/// AST root: the ordered statements of a source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Var(VarStatement),
    Assign(AssignStatement),
    OperAssign(OperAssignStatement),
    Return(ReturnStatement),
    Break(BreakStatement),
    Function(FunctionStatement),
    Block(BlockStatement),
    Expression(ExpressionStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Var(s) => s.fmt(f),
            Statement::Assign(s) => s.fmt(f),
            Statement::OperAssign(s) => s.fmt(f),
            Statement::Return(s) => s.fmt(f),
            Statement::Break(s) => s.fmt(f),
            Statement::Function(s) => s.fmt(f),
            Statement::Block(s) => s.fmt(f),
            Statement::Expression(s) => s.fmt(f),
        }
    }
}

/// `var x = expr`, `var x int = expr`, `var t time.Time`, or the shorthand
/// `x := expr` (which carries a synthesized `var` token).
#[derive(Debug, Clone, PartialEq)]
pub struct VarStatement {
    pub token: Token,
    pub name: Identifier,
    pub decl: Option<TypeDecl>,
    pub value: Option<Expression>,
}

/// The optional type annotation of a `var` statement: a bare name (`int`)
/// or a package-qualified one (`time.Time`).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub package: Option<Identifier>,
    pub name: Identifier,
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pkg) = &self.package {
            write!(f, "{pkg}.")?;
        }
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for VarStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var {}", self.name)?;
        if let Some(decl) = &self.decl {
            write!(f, " {decl}")?;
        }
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        write!(f, ";")
    }
}

/// `name = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

impl fmt::Display for AssignStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {};", self.name, self.value)
    }
}

/// `name += expr` and the other compound assignments. `operator` is the
/// bare operator (`+`, `-`, `*`, `/`, `%`).
#[derive(Debug, Clone, PartialEq)]
pub struct OperAssignStatement {
    pub token: Token,
    pub name: Identifier,
    pub operator: String,
    pub value: Expression,
}

impl fmt::Display for OperAssignStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}= {};", self.name, self.operator, self.value)
    }
}

/// `return expr;` or a bare `return;`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Option<Expression>,
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {value};"),
            None => write!(f, "return;"),
        }
    }
}

/// `break;`
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStatement {
    pub token: Token,
}

impl fmt::Display for BreakStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "break;")
    }
}

/// A named function declaration: `func name(params) { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionStatement {
    pub token: Token,
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl fmt::Display for FunctionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        write!(f, "func {}({}) {{ {} }}", self.name, params.join(", "), self.body)
    }
}

/// `{ statements }`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

/// An expression in statement position; its value is the statement's value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expression.fmt(f)
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Float(FloatLiteral),
    Str(StringLiteral),
    Boolean(BooleanLiteral),
    Array(ArrayLiteral),
    Hash(HashLiteral),
    Function(FunctionLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    While(WhileExpression),
    DoWhile(DoWhileExpression),
    ImmediateIf(ImmediateIfExpression),
    Call(CallExpression),
    Index(IndexExpression),
    Access(AccessExpression),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => e.fmt(f),
            Expression::Integer(e) => e.fmt(f),
            Expression::Float(e) => e.fmt(f),
            Expression::Str(e) => e.fmt(f),
            Expression::Boolean(e) => e.fmt(f),
            Expression::Array(e) => e.fmt(f),
            Expression::Hash(e) => e.fmt(f),
            Expression::Function(e) => e.fmt(f),
            Expression::Prefix(e) => e.fmt(f),
            Expression::Infix(e) => e.fmt(f),
            Expression::If(e) => e.fmt(f),
            Expression::While(e) => e.fmt(f),
            Expression::DoWhile(e) => e.fmt(f),
            Expression::ImmediateIf(e) => e.fmt(f),
            Expression::Call(e) => e.fmt(f),
            Expression::Index(e) => e.fmt(f),
            Expression::Access(e) => e.fmt(f),
        }
    }
}

/// A bare name.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// An integer literal. The token keeps the source form (radix prefix and
/// all); `value` is the converted number.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

impl fmt::Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

/// A float literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub token: Token,
    pub value: f64,
}

impl fmt::Display for FloatLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

/// A string literal (content only, no quotes in `value`).
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

/// `true` or `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

impl fmt::Display for BooleanLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

/// `[e1, e2, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub token: Token,
    pub elements: Vec<Expression>,
}

impl fmt::Display for ArrayLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elems: Vec<String> = self.elements.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", elems.join(", "))
    }
}

/// `{k1: v1, k2: v2, ...}` — pairs keep construction order so diagnostics
/// are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct HashLiteral {
    pub token: Token,
    pub pairs: Vec<(Expression, Expression)>,
}

impl fmt::Display for HashLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// `func(params) { body }`. `name` is stamped in when the literal is the
/// right-hand side of a `var` or `:=` and is used for diagnostics only; it
/// is not printed, so the rendered form stays parseable.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub name: String,
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        write!(f, "func({}) {{ {} }}", params.join(", "), self.body)
    }
}

/// `!x` or `-x`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expression>,
}

impl fmt::Display for PrefixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

/// `left <op> right`.
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

impl fmt::Display for InfixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

/// `if cond { cons }` with optional `else { alt }`. An `else if` chain is
/// represented as an alternative block whose only statement is the nested
/// `if` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

impl fmt::Display for IfExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if {} {{ {} }}", self.condition, self.consequence)?;
        if let Some(alt) = &self.alternative {
            write!(f, " else {{ {alt} }}")?;
        }
        Ok(())
    }
}

/// `left ?? right` — null-coalescing.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmediateIfExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl fmt::Display for ImmediateIfExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ?? {})", self.left, self.right)
    }
}

/// `while cond { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub body: BlockStatement,
}

impl fmt::Display for WhileExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "while ({}) {{ {} }}", self.condition, self.body)
    }
}

/// `do { body } while cond`.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub body: BlockStatement,
}

impl fmt::Display for DoWhileExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "do {{ {} }} while ({});", self.body, self.condition)
    }
}

/// `callee(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub token: Token,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.arguments.iter().map(ToString::to_string).collect();
        write!(f, "{}({})", self.function, args.join(", "))
    }
}

/// `left[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

impl fmt::Display for IndexExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}

/// `left.right` — the right side is always an identifier (field read) or a
/// call whose callee is an identifier (method call); the parser guarantees
/// it, the evaluator re-checks when walking.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl fmt::Display for AccessExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use things_lex::{Token, TokenKind};

    fn ident(name: &str) -> Identifier {
        Identifier {
            token: Token::new(TokenKind::Ident, name),
            value: name.to_string(),
        }
    }

    #[test]
    fn var_statement_renders() {
        let stmt = Statement::Var(VarStatement {
            token: Token::new(TokenKind::Var, "var"),
            name: ident("myVar"),
            decl: None,
            value: Some(Expression::Identifier(ident("anotherVar"))),
        });
        assert_eq!(stmt.to_string(), "var myVar = anotherVar;");
    }

    #[test]
    fn typed_var_statement_renders() {
        let stmt = Statement::Var(VarStatement {
            token: Token::new(TokenKind::Var, "var"),
            name: ident("t"),
            decl: Some(TypeDecl {
                package: Some(ident("time")),
                name: ident("Time"),
            }),
            value: None,
        });
        assert_eq!(stmt.to_string(), "var t time.Time;");
    }

    #[test]
    fn infix_renders_parenthesized() {
        let expr = Expression::Infix(InfixExpression {
            token: Token::new(TokenKind::Plus, "+"),
            left: Box::new(Expression::Identifier(ident("a"))),
            operator: "+".to_string(),
            right: Box::new(Expression::Identifier(ident("b"))),
        });
        assert_eq!(expr.to_string(), "(a + b)");
    }
}
