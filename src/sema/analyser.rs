//! AST -> SEMA lowering (spec §4.4): the one place this crate keeps a
//! visitor contract (spec §9), implemented as [`AstLowering`] for
//! [`Analyser`]. Internally everything is matched on directly — the trait
//! exists only at the phase boundary, per the spec's own re-architecture
//! notes.
//!
//! Two-pass per spec §4.4 "Declarations first": every class and free
//! function is registered in its enclosing context before any body is
//! analysed, so mutual/forward reference resolves (`builtin_sema_context`
//! and the original's own two-phase `sema_context`/`sema_builder` split
//! ground this).

use indexmap::IndexMap;
use smol_str::SmolStr;
use std::rc::Rc;

use crate::ast::{self, AstLowering, BinaryOperator, Expr, Item, Stmt, TranslationUnit};
use crate::base::SourceRange;
use crate::diagnostics::{Diagnostic, ErrorsObserver, Phase, Severity};

use super::builtin;
use super::context::{ContextId, ContextKind, SemaContextArena};
use super::function::{FunctionKind, FunctionSignature, ParamDeclaration, SemaFunction};
use super::node::*;
use super::overload::{Argument, OverloadResolution};
use super::types::{ClassType, EnumType, Fundamental, SemaType};

/// A single call/member-call lowered to a resolved function plus its
/// (already-coerced) argument expressions.
struct ResolvedCall {
    function: Rc<SemaFunction>,
    args: Vec<SemaExpr>,
}

pub struct Analyser<'a> {
    pub arena: SemaContextArena,
    observer: &'a dyn ErrorsObserver,
    root: ContextId,
    /// The current function's return type, for coercing `return` values.
    return_type_stack: Vec<SemaType>,
}

impl<'a> Analyser<'a> {
    pub fn new(observer: &'a dyn ErrorsObserver) -> Self {
        let (mut arena, root) = SemaContextArena::new();
        for function in builtin::free_functions() {
            arena.declare_function(root, function);
        }
        Self {
            arena,
            observer,
            root,
            return_type_stack: Vec::new(),
        }
    }

    pub fn analyse(mut self, unit: &TranslationUnit) -> (SemaTranslationUnit, SemaContextArena) {
        let mut classes = Vec::new();
        let mut deferred: Vec<(Rc<SemaFunction>, &ast::FunctionDecl, ContextId)> = Vec::new();

        for item in &unit.items {
            match item {
                Item::Class(decl) => {
                    let (class_ty, class_ctx) = self.declare_class(decl);
                    for member in &decl.members {
                        if let ast::Member::Method(method_decl) = member {
                            let signature = self.resolve_signature(class_ctx, method_decl);
                            let function = Rc::new(SemaFunction {
                                signature,
                                kind: FunctionKind::UserDefined,
                            });
                            class_ty.methods.borrow_mut().push(Rc::clone(&function));
                            deferred.push((function, method_decl, class_ctx));
                        }
                    }
                    classes.push(class_ty);
                }
                Item::Enum(decl) => self.declare_enum(decl),
                Item::Function(_) => {}
            }
        }

        for item in &unit.items {
            if let Item::Function(decl) = item {
                let signature = self.resolve_signature(self.root, decl);
                let function = Rc::new(SemaFunction {
                    signature,
                    kind: FunctionKind::UserDefined,
                });
                self.arena.declare_function(self.root, Rc::clone(&function));
                deferred.push((function, decl, self.root));
            }
        }

        let mut functions = Vec::new();
        for (function, decl, parent_ctx) in deferred {
            let body_ctx = self.arena.push_child(parent_ctx, ContextKind::Function);
            for param in &function.signature.params {
                self.arena.declare_variable(body_ctx, param.name.clone(), param.ty.clone());
            }
            self.return_type_stack.push(function.signature.return_type.clone());
            let body = self.lower_block_in(body_ctx, &decl.body);
            self.return_type_stack.pop();
            functions.push(Rc::new(SemaFunctionDecl {
                function,
                param_names: decl.params.iter().map(|p| SmolStr::new(p.name.text())).collect(),
                body,
            }));
        }

        (SemaTranslationUnit { classes, functions }, self.arena)
    }

    fn declare_class(&mut self, decl: &ast::ClassDecl) -> (Rc<ClassType>, ContextId) {
        let mut members = IndexMap::new();
        for member in &decl.members {
            if let ast::Member::Field(field) = member {
                let ty = self.resolve_type(self.root, &field.ty);
                members.insert(SmolStr::new(field.name.text()), ty);
            }
        }
        let class_ty = Rc::new(ClassType {
            name: SmolStr::new(decl.name.text()),
            members,
            methods: Default::default(),
        });
        self.arena.declare_type(self.root, class_ty.name.clone(), SemaType::Class(Rc::clone(&class_ty)));

        let class_ctx = self.arena.push_child(self.root, ContextKind::Class);
        for (name, ty) in &class_ty.members {
            self.arena.declare_variable(class_ctx, name.clone(), ty.clone());
        }
        (class_ty, class_ctx)
    }

    fn declare_enum(&mut self, decl: &ast::EnumDecl) {
        let enum_ty = Rc::new(EnumType {
            name: SmolStr::new(decl.name.text()),
            enumerators: decl.enumerators.iter().map(|t| SmolStr::new(t.text())).collect(),
        });
        self.arena.declare_type(self.root, enum_ty.name.clone(), SemaType::Enum(enum_ty));
    }

    fn resolve_signature(&mut self, ctx: ContextId, decl: &ast::FunctionDecl) -> FunctionSignature {
        let return_type = self.resolve_type(ctx, &decl.return_type);
        let params = decl
            .params
            .iter()
            .map(|p| ParamDeclaration {
                ty: self.resolve_type(ctx, &p.ty),
                name: SmolStr::new(p.name.text()),
            })
            .collect();
        FunctionSignature {
            name: SmolStr::new(decl.name.text()),
            params,
            return_type,
        }
    }

    fn resolve_type(&mut self, ctx: ContextId, rep: &ast::TypeRepresentation) -> SemaType {
        let primary = rep.primary_name();
        let base = match primary.kind {
            crate::lexer::TokenKind::Bool => SemaType::bool(),
            crate::lexer::TokenKind::Int => SemaType::int(),
            crate::lexer::TokenKind::Double => SemaType::double(),
            crate::lexer::TokenKind::String => SemaType::string(),
            crate::lexer::TokenKind::Void => SemaType::void(),
            crate::lexer::TokenKind::Version => SemaType::version_bare(),
            crate::lexer::TokenKind::Project => SemaType::project_bare(),
            crate::lexer::TokenKind::Library => SemaType::library_bare(),
            crate::lexer::TokenKind::Executable => SemaType::executable_bare(),
            crate::lexer::TokenKind::List => {
                let element = rep
                    .nested_types()
                    .first()
                    .map(|nested| self.resolve_type(ctx, nested))
                    .unwrap_or_else(|| {
                        self.error(Phase::Resolve, "'list' requires a single element type argument", primary.range);
                        SemaType::void()
                    });
                SemaType::list_of(element)
            }
            _ => match self.arena.find_type(ctx, primary.text()) {
                Some(ty) => ty,
                None => {
                    self.error(Phase::Resolve, format!("unknown type '{}'", primary.text()), primary.range);
                    SemaType::void()
                }
            },
        };
        if rep.is_reference() {
            base.as_reference()
        } else {
            base
        }
    }

    fn lower_block_in(&mut self, ctx: ContextId, block: &ast::Block) -> SemaBlock {
        let mut stmts = Vec::new();
        for stmt in &block.stmts {
            stmts.push(self.lower_stmt_in(ctx, stmt));
        }
        SemaBlock { stmts }
    }

    fn lower_stmt_in(&mut self, ctx: ContextId, stmt: &Stmt) -> SemaStmt {
        match stmt {
            Stmt::VariableDecl(decl) => {
                let ty = self.resolve_type(ctx, &decl.ty);
                let initializer = decl.initializer.as_ref().map(|init| {
                    let lowered = self.lower_expr_in(ctx, init);
                    self.coerce(lowered, &ty, init.range())
                });
                self.arena.declare_variable(ctx, SmolStr::new(decl.name.text()), ty.clone());
                SemaStmt::VariableDecl(SemaVariableDecl {
                    name: SmolStr::new(decl.name.text()),
                    ty,
                    initializer,
                })
            }
            Stmt::Expr(expr) => SemaStmt::Expr(self.lower_expr_in(ctx, expr)),
            Stmt::Block(block) => {
                let inner_ctx = self.arena.push_child(ctx, ContextKind::Block);
                SemaStmt::Block(self.lower_block_in(inner_ctx, block))
            }
            Stmt::IfElse(if_else) => {
                let arms = if_else
                    .arms
                    .iter()
                    .map(|(cond, body)| {
                        let cond_ctx = self.arena.push_child(ctx, ContextKind::Block);
                        let cond_expr = self.lower_expr_in(cond_ctx, cond);
                        let cond_expr = self.coerce(cond_expr, &SemaType::bool(), cond.range());
                        (cond_expr, self.lower_block_in(cond_ctx, body))
                    })
                    .collect();
                let else_body = if_else.else_body.as_ref().map(|body| {
                    let else_ctx = self.arena.push_child(ctx, ContextKind::Block);
                    self.lower_block_in(else_ctx, body)
                });
                SemaStmt::IfElse(SemaIfElse { arms, else_body })
            }
            Stmt::While(while_stmt) => {
                let loop_ctx = self.arena.push_child(ctx, ContextKind::Block);
                let condition = self.lower_expr_in(loop_ctx, &while_stmt.condition);
                let condition = self.coerce(condition, &SemaType::bool(), while_stmt.condition.range());
                let body = self.lower_block_in(loop_ctx, &while_stmt.body);
                SemaStmt::While(SemaWhile { condition, body })
            }
            Stmt::Return(ret) => {
                let expected = self.return_type_stack.last().cloned().unwrap_or_else(SemaType::void);
                let value = ret.value.as_ref().map(|v| {
                    let lowered = self.lower_expr_in(ctx, v);
                    self.coerce(lowered, &expected, v.range())
                });
                SemaStmt::Return(SemaReturn { value })
            }
        }
    }

    fn lower_expr_in(&mut self, ctx: ContextId, expr: &Expr) -> SemaExpr {
        match expr {
            Expr::Bool(b) => SemaExpr::Bool(b.value),
            Expr::Int(i) => SemaExpr::Int(i.value),
            Expr::Double(d) => SemaExpr::Double(d.value),
            Expr::String(s) => SemaExpr::String(s.value.clone()),
            Expr::Id(id_ref) => {
                let name = id_ref.name.text();
                if let Some(ty) = self.arena.find_variable(ctx, name) {
                    SemaExpr::VariableRef { name: SmolStr::new(name), ty }
                } else if let Some(SemaType::Enum(enum_ty)) = self.arena.find_type(ctx, name) {
                    SemaExpr::EnumTypeRef { ty: enum_ty }
                } else {
                    self.error(Phase::Resolve, format!("unknown identifier '{name}'"), id_ref.range);
                    SemaExpr::Int(0)
                }
            }
            Expr::Unary(unary) => {
                let operand = self.lower_expr_in(ctx, &unary.operand);
                let ty = match operand.ty().fundamental() {
                    Some(Fundamental::Int) => SemaType::int(),
                    Some(Fundamental::Double) => SemaType::double(),
                    _ => {
                        self.error(Phase::Type, "unary '-' requires a numeric operand", unary.range);
                        SemaType::int()
                    }
                };
                SemaExpr::Unary {
                    op: unary.operator,
                    operand: Box::new(operand),
                    ty,
                }
            }
            Expr::Binary(binary) => self.lower_binary(ctx, binary),
            Expr::MemberAccess(access) => self.lower_member_access(ctx, access),
            Expr::FunctionCall(call) => {
                let args: Vec<_> = call.args.iter().map(|a| self.lower_expr_in(ctx, a)).collect();
                let name = call.name.text();
                let candidates = self.arena.lookup_functions(ctx, name).map(<[_]>::to_vec);
                let resolved = self.resolve_call(name, call.range, candidates.as_deref(), args);
                match resolved {
                    Some(r) => SemaExpr::Call { function: r.function, args: r.args, range: call.range },
                    None => SemaExpr::Int(0),
                }
            }
            Expr::MemberFunctionCall(call) => {
                let receiver = self.lower_expr_in(ctx, &call.lhs);
                let args: Vec<_> = call.args.iter().map(|a| self.lower_expr_in(ctx, a)).collect();
                let name = call.name.text();
                let methods = self.methods_of(&receiver.ty());
                let resolved = self.resolve_call(name, call.range, methods.as_deref(), args);
                match resolved {
                    Some(r) => SemaExpr::MethodCall {
                        receiver: Box::new(receiver),
                        function: r.function,
                        args: r.args,
                        range: call.range,
                    },
                    None => SemaExpr::Int(0),
                }
            }
            Expr::InitializerList(list) => {
                let values: Vec<_> = list.values.iter().map(|v| self.lower_expr_in(ctx, v)).collect();
                let element_ty = values.first().map(|v| v.ty()).unwrap_or_else(SemaType::void);
                let values = values
                    .into_iter()
                    .zip(&list.values)
                    .map(|(v, original)| self.coerce(v, &element_ty, original.range()))
                    .collect();
                SemaExpr::InitializerList { element_ty, values }
            }
        }
    }

    fn lower_binary(&mut self, ctx: ContextId, binary: &ast::BinaryOp) -> SemaExpr {
        let lhs = self.lower_expr_in(ctx, &binary.lhs);
        let rhs = self.lower_expr_in(ctx, &binary.rhs);
        let range = binary.range;

        match binary.operator {
            BinaryOperator::Assign => {
                if !lhs.is_lvalue() {
                    self.error(Phase::Type, "left side of '=' is not assignable", range);
                }
                let target = lhs.ty();
                let rhs = self.coerce(rhs, &target, range);
                SemaExpr::Binary {
                    op: BinaryOperator::Assign,
                    ty: target,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    range,
                }
            }
            BinaryOperator::AddAssign | BinaryOperator::SubAssign | BinaryOperator::MulAssign | BinaryOperator::DivAssign => {
                if !lhs.is_lvalue() {
                    self.error(Phase::Type, "left side of a compound assignment is not assignable", range);
                }
                let target = lhs.ty();
                let rhs = self.coerce(rhs, &target, range);
                SemaExpr::Binary {
                    op: binary.operator,
                    ty: target.as_reference(),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    range,
                }
            }
            BinaryOperator::Add => {
                if lhs.ty().fundamental() == Some(Fundamental::String) && rhs.ty().fundamental() == Some(Fundamental::String) {
                    SemaExpr::Binary {
                        op: BinaryOperator::Add,
                        ty: SemaType::string(),
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        range,
                    }
                } else {
                    self.lower_arithmetic(binary.operator, lhs, rhs, range)
                }
            }
            BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div => self.lower_arithmetic(binary.operator, lhs, rhs, range),
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::Less
            | BinaryOperator::LessEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEqual => self.lower_comparison(binary.operator, lhs, rhs, range),
            BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => {
                let lhs = self.coerce(lhs, &SemaType::bool(), range);
                let rhs = self.coerce(rhs, &SemaType::bool(), range);
                SemaExpr::Binary {
                    op: binary.operator,
                    ty: SemaType::bool(),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    range,
                }
            }
        }
    }

    fn lower_arithmetic(&mut self, op: BinaryOperator, lhs: SemaExpr, rhs: SemaExpr, range: SourceRange) -> SemaExpr {
        let result_ty = match (lhs.ty().fundamental(), rhs.ty().fundamental()) {
            (Some(Fundamental::Double), Some(Fundamental::Double | Fundamental::Int)) | (Some(Fundamental::Int), Some(Fundamental::Double)) => {
                SemaType::double()
            }
            (Some(Fundamental::Int), Some(Fundamental::Int)) => SemaType::int(),
            _ => {
                self.error(Phase::Type, format!("operator requires numeric operands, found {} and {}", lhs.ty().name(), rhs.ty().name()), range);
                SemaType::int()
            }
        };
        let lhs = self.coerce(lhs, &result_ty, range);
        let rhs = self.coerce(rhs, &result_ty, range);
        SemaExpr::Binary {
            op,
            ty: result_ty,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            range,
        }
    }

    fn lower_comparison(&mut self, op: BinaryOperator, lhs: SemaExpr, rhs: SemaExpr, range: SourceRange) -> SemaExpr {
        let lhs_ty = lhs.ty();
        let rhs_ty = rhs.ty();
        // Only scalar fundamentals are comparable (spec §4.3's catalog
        // never registers comparison operators for `class`/`list<T>`
        // instances); same-name same-type check alone would let e.g. two
        // `Foo` instances through and panic in the evaluator.
        let comparable = (is_comparable_scalar(lhs_ty.dereferenced()) && lhs_ty.dereferenced() == rhs_ty.dereferenced())
            || (lhs_ty.is_numeric() && rhs_ty.is_numeric());
        if !comparable {
            self.error(Phase::Type, format!("cannot compare {} with {}", lhs_ty.name(), rhs_ty.name()), range);
        }
        let (lhs, rhs) = if lhs_ty.is_numeric() && rhs_ty.is_numeric() && lhs_ty.dereferenced() != rhs_ty.dereferenced() {
            (self.coerce(lhs, &SemaType::double(), range), self.coerce(rhs, &SemaType::double(), range))
        } else {
            (lhs, rhs)
        };
        SemaExpr::Binary {
            op,
            ty: SemaType::bool(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            range,
        }
    }

    fn lower_member_access(&mut self, ctx: ContextId, access: &ast::MemberAccess) -> SemaExpr {
        let lhs = self.lower_expr_in(ctx, &access.lhs);
        let member = access.member_name.text();

        if let SemaExpr::EnumTypeRef { ty } = &lhs {
            return match ty.ordinal_of(member) {
                Some(ordinal) => SemaExpr::Int(ordinal),
                None => {
                    self.error(Phase::Resolve, format!("'{}' has no enumerator '{member}'", ty.name), access.range);
                    SemaExpr::Int(0)
                }
            };
        }

        let ty = match lhs.ty().dereferenced().class() {
            Some(class) => class.members.get(member).cloned(),
            None => None,
        };
        match ty {
            Some(ty) => SemaExpr::MemberAccess {
                lhs: Box::new(lhs),
                member: SmolStr::new(member),
                ty,
            },
            None => {
                self.error(Phase::Resolve, format!("'{}' has no member '{member}'", lhs.ty().name()), access.range);
                SemaExpr::MemberAccess {
                    lhs: Box::new(lhs),
                    member: SmolStr::new(member),
                    ty: SemaType::void(),
                }
            }
        }
    }

    fn methods_of(&self, ty: &SemaType) -> Option<Vec<Rc<SemaFunction>>> {
        match ty.dereferenced() {
            SemaType::Class(class) => Some(class.methods()),
            SemaType::List(elem) => Some(builtin::list_methods(elem)),
            SemaType::Fundamental(Fundamental::String) => Some(builtin::string_methods()),
            SemaType::Fundamental(Fundamental::Version) => Some(builtin::version_methods()),
            SemaType::Fundamental(Fundamental::Project) => Some(builtin::project_methods()),
            SemaType::Fundamental(Fundamental::Library) => Some(builtin::library_methods()),
            SemaType::Fundamental(Fundamental::Executable) => Some(builtin::executable_methods()),
            _ => None,
        }
    }

    fn resolve_call(&mut self, name: &str, range: SourceRange, candidates: Option<&[Rc<SemaFunction>]>, args: Vec<SemaExpr>) -> Option<ResolvedCall> {
        let arg_types: Vec<SemaType> = args.iter().map(|a| a.ty()).collect();
        let is_lvalue: Vec<bool> = args.iter().map(|a| a.is_lvalue()).collect();
        let arguments: Vec<Argument<'_>> = arg_types
            .iter()
            .zip(&is_lvalue)
            .map(|(ty, lvalue)| Argument { ty, is_lvalue: *lvalue })
            .collect();

        let resolution = OverloadResolution::new(self.observer, name, range);
        let function = resolution.choose(candidates, &arguments)?;

        let coerced = args
            .into_iter()
            .zip(&function.signature.params)
            .map(|(arg, param)| self.coerce(arg, &param.ty, range))
            .collect();

        Some(ResolvedCall { function, args: coerced })
    }

    /// Inserts a [`SemaExpr::ImplicitCast`] when `expr`'s type differs from
    /// `target` but spec §4.5 allows the conversion; otherwise reports a
    /// type diagnostic and returns `expr` unchanged so analysis can keep
    /// going.
    fn coerce(&mut self, expr: SemaExpr, target: &SemaType, range: SourceRange) -> SemaExpr {
        let source = expr.ty();
        if &source == target {
            return expr;
        }
        if source.dereferenced() == target {
            return SemaExpr::ImplicitCast { expr: Box::new(expr), target: target.clone() };
        }
        let convertible = matches!(
            (target.fundamental(), source.dereferenced().fundamental()),
            (Some(Fundamental::Bool), Some(Fundamental::Int))
                | (Some(Fundamental::Int), Some(Fundamental::Bool))
                | (Some(Fundamental::Int), Some(Fundamental::Double))
                | (Some(Fundamental::Double), Some(Fundamental::Int))
        );
        if convertible {
            return SemaExpr::ImplicitCast { expr: Box::new(expr), target: target.clone() };
        }
        if let SemaType::Reference(inner) = target {
            if expr.is_lvalue() && inner.as_ref() == source.dereferenced() {
                return SemaExpr::ImplicitCast { expr: Box::new(expr), target: target.clone() };
            }
            if !expr.is_lvalue() {
                self.error(Phase::Type, "cannot bind a reference to a temporary value", range);
                return expr;
            }
        }
        self.error(Phase::Type, format!("cannot convert {} to {}", source.name(), target.name()), range);
        expr
    }

    fn error(&self, phase: Phase, message: impl Into<String>, range: SourceRange) {
        self.observer.notify_error(Diagnostic::new(phase, Severity::Error, message, range));
    }
}

/// Thin trait wrapper satisfying [`AstLowering`] (spec §9's one sanctioned
/// visitor boundary); real recursion happens through the typed inherent
/// methods above.
pub enum SemaNode {
    Expr(SemaExpr),
    Stmt(SemaStmt),
    Block(SemaBlock),
    Function(SemaFunctionDecl),
}

impl<'a> AstLowering for Analyser<'a> {
    type Node = SemaNode;

    fn lower_expr(&mut self, expr: &Expr) -> SemaNode {
        SemaNode::Expr(self.lower_expr_in(self.root, expr))
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> SemaNode {
        SemaNode::Stmt(self.lower_stmt_in(self.root, stmt))
    }

    fn lower_block(&mut self, block: &ast::Block) -> SemaNode {
        SemaNode::Block(self.lower_block_in(self.root, block))
    }

    fn lower_function(&mut self, function: &ast::FunctionDecl) -> SemaNode {
        let signature = self.resolve_signature(self.root, function);
        let ctx = self.arena.push_child(self.root, ContextKind::Function);
        for param in &signature.params {
            self.arena.declare_variable(ctx, param.name.clone(), param.ty.clone());
        }
        self.return_type_stack.push(signature.return_type.clone());
        let body = self.lower_block_in(ctx, &function.body);
        self.return_type_stack.pop();
        SemaNode::Function(SemaFunctionDecl {
            function: Rc::new(SemaFunction { signature, kind: FunctionKind::UserDefined }),
            param_names: function.params.iter().map(|p| SmolStr::new(p.name.text())).collect(),
            body,
        })
    }
}

/// Scalar fundamentals the evaluator's `apply_comparison` actually knows
/// how to order/equate (spec §4.3): `class`/`list<T>` are deliberately
/// excluded since the catalog never gives them a comparison operator.
fn is_comparable_scalar(ty: &SemaType) -> bool {
    matches!(
        ty.fundamental(),
        Some(Fundamental::Bool | Fundamental::Int | Fundamental::Double | Fundamental::String | Fundamental::Version)
    )
}
