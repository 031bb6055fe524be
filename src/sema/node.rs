//! The SEMA tree (spec §4.4): the AST's shape, with every name resolved to
//! a concrete [`SemaType`] / [`SemaFunction`] and every implicit conversion
//! materialized as an explicit [`SemaExpr::ImplicitCast`] (spec §4.5).

use smol_str::SmolStr;
use std::rc::Rc;

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::base::SourceRange;

use super::function::SemaFunction;
use super::types::{ClassType, EnumType, SemaType};

pub struct SemaTranslationUnit {
    pub classes: Vec<Rc<ClassType>>,
    pub functions: Vec<Rc<SemaFunctionDecl>>,
}

pub struct SemaFunctionDecl {
    pub function: Rc<SemaFunction>,
    pub param_names: Vec<SmolStr>,
    pub body: SemaBlock,
}

#[derive(Debug, Default)]
pub struct SemaBlock {
    pub stmts: Vec<SemaStmt>,
}

pub enum SemaStmt {
    VariableDecl(SemaVariableDecl),
    Expr(SemaExpr),
    Block(SemaBlock),
    IfElse(SemaIfElse),
    While(SemaWhile),
    Return(SemaReturn),
}

pub struct SemaVariableDecl {
    pub name: SmolStr,
    pub ty: SemaType,
    pub initializer: Option<SemaExpr>,
}

pub struct SemaIfElse {
    pub arms: Vec<(SemaExpr, SemaBlock)>,
    pub else_body: Option<SemaBlock>,
}

pub struct SemaWhile {
    pub condition: SemaExpr,
    pub body: SemaBlock,
}

pub struct SemaReturn {
    pub value: Option<SemaExpr>,
}

/// An expression node in the SEMA tree. Every variant carries (or can
/// compute) a [`SemaType`] via [`SemaExpr::ty`] — the analyser never
/// leaves a node's type implicit.
pub enum SemaExpr {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    VariableRef {
        name: SmolStr,
        ty: SemaType,
    },
    /// `MyEnum` used as the left side of `MyEnum.Value` (spec §3 `enum_decl`
    /// — an enumerator reference, not a variable read). Never appears
    /// anywhere but as a [`SemaExpr::MemberAccess`]'s `lhs`.
    EnumTypeRef {
        ty: Rc<EnumType>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<SemaExpr>,
        ty: SemaType,
    },
    Binary {
        op: BinaryOperator,
        lhs: Box<SemaExpr>,
        rhs: Box<SemaExpr>,
        ty: SemaType,
        /// Carried only so the evaluator can point a runtime diagnostic
        /// (integer division by zero, spec §7) at the right place.
        range: SourceRange,
    },
    MemberAccess {
        lhs: Box<SemaExpr>,
        member: SmolStr,
        ty: SemaType,
    },
    Call {
        function: Rc<SemaFunction>,
        args: Vec<SemaExpr>,
        range: SourceRange,
    },
    MethodCall {
        receiver: Box<SemaExpr>,
        function: Rc<SemaFunction>,
        args: Vec<SemaExpr>,
        range: SourceRange,
    },
    InitializerList {
        element_ty: SemaType,
        values: Vec<SemaExpr>,
    },
    /// An implicit conversion the analyser inserted (spec §4.5): int<->bool,
    /// int<->double, or a reference materializing/dereferencing.
    ImplicitCast {
        expr: Box<SemaExpr>,
        target: SemaType,
    },
}

impl SemaExpr {
    pub fn ty(&self) -> SemaType {
        match self {
            SemaExpr::Bool(_) => SemaType::bool(),
            SemaExpr::Int(_) => SemaType::int(),
            SemaExpr::Double(_) => SemaType::double(),
            SemaExpr::String(_) => SemaType::string(),
            SemaExpr::VariableRef { ty, .. } => ty.clone(),
            SemaExpr::EnumTypeRef { ty } => SemaType::Enum(Rc::clone(ty)),
            SemaExpr::Unary { ty, .. } => ty.clone(),
            SemaExpr::Binary { ty, .. } => ty.clone(),
            SemaExpr::MemberAccess { ty, .. } => ty.clone(),
            SemaExpr::Call { function, .. } => function.signature.return_type.clone(),
            SemaExpr::MethodCall { function, .. } => function.signature.return_type.clone(),
            SemaExpr::InitializerList { element_ty, .. } => SemaType::list_of(element_ty.clone()),
            SemaExpr::ImplicitCast { target, .. } => target.clone(),
        }
    }

    /// Whether this expression names storage that can be re-assigned to or
    /// bound by reference (spec §4.5 — only lvalues can bind to a
    /// reference parameter).
    pub fn is_lvalue(&self) -> bool {
        matches!(self, SemaExpr::VariableRef { .. } | SemaExpr::MemberAccess { .. })
    }
}
