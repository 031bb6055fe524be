//! The typed AST (spec §3 "AST node").
//!
//! An algebraic variant with one case per syntax construct, matching the
//! re-architecture the spec's Design Notes (§9) ask for: a sum type with
//! exhaustive pattern matching rather than the original's tagged-union
//! class hierarchy. Every node carries a begin/end [`SourceRange`];
//! children are owned (`Box`/`Vec`), never shared — there are no cycles.

use crate::base::SourceRange;
use crate::lexer::Token;

use super::type_rep::TypeRepresentation;

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub items: Vec<Item>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Class(ClassDecl),
    Enum(EnumDecl),
    Function(FunctionDecl),
}

impl Item {
    pub fn range(&self) -> SourceRange {
        match self {
            Item::Class(c) => c.range,
            Item::Enum(e) => e.range,
            Item::Function(f) => f.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Token,
    pub members: Vec<Member>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(VariableDecl),
    Method(FunctionDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Token,
    pub enumerators: Vec<Token>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeRepresentation,
    pub name: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub return_type: TypeRepresentation,
    pub name: Token,
    pub params: Vec<Param>,
    pub body: Block,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub ty: TypeRepresentation,
    pub name: Token,
    pub initializer: Option<Expr>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VariableDecl(VariableDecl),
    Expr(Expr),
    Block(Block),
    IfElse(IfElse),
    While(While),
    Return(Return),
}

impl Stmt {
    pub fn range(&self) -> SourceRange {
        match self {
            Stmt::VariableDecl(d) => d.range,
            Stmt::Expr(e) => e.range(),
            Stmt::Block(b) => b.range,
            Stmt::IfElse(i) => i.range,
            Stmt::While(w) => w.range,
            Stmt::Return(r) => r.range,
        }
    }
}

/// A list of `(condition, body)` arms plus an optional trailing `else`
/// body (spec §3: "`if_else` (list of `(condition, body)` plus optional
/// `else` body)"), i.e. `if (c1) {..} else if (c2) {..} else {..}`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    pub arms: Vec<(Expr, Block)>,
    pub else_body: Option<Block>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Expr,
    pub body: Block,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Div,
    DivAssign,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    Assign,
}

/// The one unary operator the grammar admits: prefix `-` (spec §4.1/§9:
/// the lexer emits a plain `Minus` token; the parser reconstructs unary
/// minus at the `unary` precedence layer rather than leaving it as a bug).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(BoolLiteral),
    Int(IntLiteral),
    Double(DoubleLiteral),
    String(StringLiteral),
    Id(IdRef),
    Unary(UnaryOp),
    Binary(BinaryOp),
    MemberAccess(MemberAccess),
    FunctionCall(FunctionCall),
    MemberFunctionCall(MemberFunctionCall),
    InitializerList(InitializerList),
}

impl Expr {
    pub fn range(&self) -> SourceRange {
        match self {
            Expr::Bool(n) => n.range,
            Expr::Int(n) => n.range,
            Expr::Double(n) => n.range,
            Expr::String(n) => n.range,
            Expr::Id(n) => n.range,
            Expr::Unary(n) => n.range,
            Expr::Binary(n) => n.range,
            Expr::MemberAccess(n) => n.range,
            Expr::FunctionCall(n) => n.range,
            Expr::MemberFunctionCall(n) => n.range,
            Expr::InitializerList(n) => n.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolLiteral {
    pub token: Token,
    pub value: bool,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub token: Token,
    pub value: i64,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoubleLiteral {
    pub token: Token,
    pub value: f64,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdRef {
    pub name: Token,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    pub operator: UnaryOperator,
    pub operand: Box<Expr>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub lhs: Box<Expr>,
    pub operator: BinaryOperator,
    pub operator_token: Token,
    pub rhs: Box<Expr>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub lhs: Box<Expr>,
    pub member_name: Token,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Token,
    pub args: Vec<Expr>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberFunctionCall {
    pub lhs: Box<Expr>,
    pub name: Token,
    pub args: Vec<Expr>,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializerList {
    pub values: Vec<Expr>,
    pub range: SourceRange,
}
