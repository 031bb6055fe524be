//! C8: the tree-walking evaluator (spec §4.7).
//!
//! Grounded on the original's `execution_context`/`identifiers_context`
//! split (`source/exec/identifiers_context.hpp`), re-architected per
//! spec §9: identifiers live in per-block `FxHashMap`s pushed on a stack
//! rather than in a parent-pointer tree of heap-allocated contexts, and
//! every storage location lives in one [`crate::value::Arena`] instead of
//! being reached through virtual `instance`/`instance_reference` calls.

mod builtin;
mod frame;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::base::SourceRange;
use crate::diagnostics::{Diagnostic, ErrorsObserver, Phase, Severity};
use crate::facade::CmakeFacade;
use crate::sema::builtin::BuiltinFunctionKind;
use crate::sema::function::FunctionKind;
use crate::sema::node::*;
use crate::sema::types::{Fundamental, SemaType};
use crate::sema::{SemaFunction, SemaTranslationUnit};
use crate::value::{Arena, CellId, InstanceValue, Value};

use frame::Frame;

/// Negative sentinel `execute()` returns on a fatal diagnostic (spec §6).
pub const FATAL_SENTINEL: i32 = -1;

/// Unwinding signal threaded back up through statement evaluation: either
/// a plain fall-through, a `return`, or a fatal abort (spec §4.7 "main",
/// §5 "the only way to stop evaluation is a fatal diagnostic").
enum Flow {
    Normal,
    Return,
    Fatal,
}

pub struct Evaluator<'a> {
    arena: Arena,
    observer: &'a dyn ErrorsObserver,
    facade: &'a dyn CmakeFacade,
    /// `Rc<SemaFunction>` pointer identity -> its body, so a resolved call
    /// (which only carries the signature) can find what to run (spec §4.4
    /// "declarations first" means the body may live anywhere in the unit).
    bodies: FxHashMap<usize, Rc<SemaFunctionDecl>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(observer: &'a dyn ErrorsObserver, facade: &'a dyn CmakeFacade) -> Self {
        Self {
            arena: Arena::new(),
            observer,
            facade,
            bodies: FxHashMap::default(),
        }
    }

    /// Locates `main`, evaluates it, and returns its integer result (spec
    /// §4.7 "main", §6 "Library entry"). Missing `main` is a fatal
    /// diagnostic producing [`FATAL_SENTINEL`].
    pub fn run(mut self, unit: &SemaTranslationUnit) -> i32 {
        for decl in &unit.functions {
            self.bodies.insert(Rc::as_ptr(&decl.function) as usize, Rc::clone(decl));
        }

        let main = unit.functions.iter().find(|f| {
            f.function.signature.name == "main"
                && f.function.signature.params.is_empty()
                && f.function.signature.return_type.fundamental() == Some(Fundamental::Int)
        });

        let Some(main) = main else {
            self.fatal("no 'main' function returning int was found", SourceRange::empty(crate::base::Position::start()));
            return FATAL_SENTINEL;
        };

        let mut frame = Frame::new();
        match self.eval_block(&mut frame, &main.body) {
            Flow::Fatal => FATAL_SENTINEL,
            _ => frame.return_value.map(|v| v.read(&self.arena).as_int() as i32).unwrap_or(0),
        }
    }

    fn fatal(&self, message: impl Into<String>, range: SourceRange) {
        self.observer.notify_error(Diagnostic::new(Phase::Runtime, Severity::Fatal, message, range));
    }

    fn warn(&self, message: impl Into<String>, range: SourceRange) {
        self.observer.notify_error(Diagnostic::new(Phase::Runtime, Severity::Warning, message, range));
    }

    fn should_abort(&self) -> bool {
        self.observer.did_fatal_error_occur() || self.facade.did_fatal_error_occur()
    }

    fn eval_block(&mut self, frame: &mut Frame, block: &SemaBlock) -> Flow {
        frame.push_scope();
        let flow = self.eval_stmts(frame, &block.stmts);
        frame.pop_scope();
        flow
    }

    fn eval_stmts(&mut self, frame: &mut Frame, stmts: &[SemaStmt]) -> Flow {
        for stmt in stmts {
            if self.should_abort() {
                return Flow::Fatal;
            }
            match self.eval_stmt(frame, stmt) {
                Flow::Normal => {}
                other => return other,
            }
        }
        Flow::Normal
    }

    fn eval_stmt(&mut self, frame: &mut Frame, stmt: &SemaStmt) -> Flow {
        match stmt {
            SemaStmt::VariableDecl(decl) => {
                let value = match &decl.initializer {
                    Some(init) => self.eval_expr(frame, init).read(&self.arena),
                    None => self.default_instance(&decl.ty),
                };
                let cell = self.arena.alloc(value, decl.ty.clone());
                frame.declare(decl.name.clone(), cell);
                Flow::Normal
            }
            SemaStmt::Expr(expr) => {
                self.eval_expr(frame, expr);
                Flow::Normal
            }
            SemaStmt::Block(block) => self.eval_block(frame, block),
            SemaStmt::IfElse(if_else) => self.eval_if_else(frame, if_else),
            SemaStmt::While(while_stmt) => self.eval_while(frame, while_stmt),
            SemaStmt::Return(ret) => {
                frame.return_value = ret.value.as_ref().map(|v| self.eval_expr(frame, v));
                Flow::Return
            }
        }
    }

    fn eval_if_else(&mut self, frame: &mut Frame, if_else: &SemaIfElse) -> Flow {
        for (condition, body) in &if_else.arms {
            let cond_value = self.eval_expr(frame, condition);
            if cond_value.read(&self.arena).as_bool() {
                return self.eval_block(frame, body);
            }
        }
        if let Some(else_body) = &if_else.else_body {
            return self.eval_block(frame, else_body);
        }
        Flow::Normal
    }

    fn eval_while(&mut self, frame: &mut Frame, while_stmt: &SemaWhile) -> Flow {
        loop {
            if self.should_abort() {
                return Flow::Fatal;
            }
            let cond_value = self.eval_expr(frame, &while_stmt.condition);
            if !cond_value.read(&self.arena).as_bool() {
                return Flow::Normal;
            }
            match self.eval_block(frame, &while_stmt.body) {
                Flow::Normal => {}
                other => return other,
            }
        }
    }

    fn eval_expr(&mut self, frame: &mut Frame, expr: &SemaExpr) -> Value {
        match expr {
            SemaExpr::Bool(b) => Value::Owned(InstanceValue::Bool(*b), SemaType::bool()),
            SemaExpr::Int(i) => Value::Owned(InstanceValue::Int(*i), SemaType::int()),
            SemaExpr::Double(d) => Value::Owned(InstanceValue::Double(*d), SemaType::double()),
            SemaExpr::String(s) => Value::Owned(InstanceValue::String(s.clone()), SemaType::string()),
            SemaExpr::EnumTypeRef { .. } => {
                // Only ever appears as the LHS of a member access the
                // analyser already folded into a plain `Int` constant
                // (spec §4.4 "enum_decl"); reachable only if a future
                // lowering pass stops doing that.
                Value::Owned(InstanceValue::Int(0), SemaType::int())
            }
            SemaExpr::VariableRef { name, .. } => {
                let cell = frame.lookup(name).unwrap_or_else(|| panic!("unresolved identifier '{name}' reached the evaluator"));
                Value::Ref(cell)
            }
            SemaExpr::Unary { op, operand, .. } => {
                let value = self.eval_expr(frame, operand).read(&self.arena);
                match op {
                    UnaryOperator::Negate => match value {
                        InstanceValue::Int(i) => Value::Owned(InstanceValue::Int(-i), SemaType::int()),
                        InstanceValue::Double(d) => Value::Owned(InstanceValue::Double(-d), SemaType::double()),
                        other => panic!("unary '-' reached the evaluator with a non-numeric operand: {other:?}"),
                    },
                }
            }
            SemaExpr::Binary { op, lhs, rhs, ty, range } => self.eval_binary(frame, *op, lhs, rhs, ty, *range),
            SemaExpr::MemberAccess { lhs, member, .. } => self.eval_member_access(frame, lhs, member),
            SemaExpr::Call { function, args, range } => self.eval_call(frame, function, args, None, *range),
            SemaExpr::MethodCall { receiver, function, args, range } => {
                let receiver_value = self.eval_expr(frame, receiver);
                self.eval_call(frame, function, args, Some(receiver_value), *range)
            }
            SemaExpr::InitializerList { element_ty, values } => {
                let elements: Vec<CellId> = values
                    .iter()
                    .map(|v| {
                        let value = self.eval_expr(frame, v).read(&self.arena);
                        self.arena.alloc(value, element_ty.clone())
                    })
                    .collect();
                Value::Owned(
                    InstanceValue::List { element_ty: element_ty.clone(), elements },
                    SemaType::list_of(element_ty.clone()),
                )
            }
            SemaExpr::ImplicitCast { expr, target } => self.eval_cast(frame, expr, target),
        }
    }

    fn eval_cast(&mut self, frame: &mut Frame, expr: &SemaExpr, target: &SemaType) -> Value {
        let source_ty = expr.ty();
        let value = self.eval_expr(frame, expr);

        // Reference materialization: taking `T&` from an lvalue `T` just
        // keeps the same cell (spec §4.5 "Taking a reference ... produces
        // T&"); no conversion of the stored value happens.
        if matches!(target, SemaType::Reference(_)) {
            if let Some(cell) = value.as_cell() {
                return Value::Ref(cell);
            }
        }

        let raw = value.read(&self.arena);
        let converted = match (target.fundamental(), source_ty.dereferenced().fundamental()) {
            (Some(Fundamental::Bool), Some(Fundamental::Int)) => InstanceValue::Bool(raw.as_int() != 0),
            (Some(Fundamental::Int), Some(Fundamental::Bool)) => InstanceValue::Int(i64::from(raw.as_bool())),
            (Some(Fundamental::Int), Some(Fundamental::Double)) => InstanceValue::Int(raw.as_double() as i64),
            (Some(Fundamental::Double), Some(Fundamental::Int)) => InstanceValue::Double(raw.as_int() as f64),
            _ => raw,
        };
        Value::Owned(converted, target.dereferenced().clone())
    }

    fn eval_binary(&mut self, frame: &mut Frame, op: BinaryOperator, lhs: &SemaExpr, rhs: &SemaExpr, ty: &SemaType, range: SourceRange) -> Value {
        match op {
            BinaryOperator::Assign => {
                let target = self.eval_expr(frame, lhs);
                let cell = target.as_cell().expect("analyser guarantees assignment LHS is an lvalue");
                let new_value = self.eval_expr(frame, rhs).read(&self.arena);
                self.arena.set(cell, new_value);
                Value::Ref(cell)
            }
            BinaryOperator::AddAssign | BinaryOperator::SubAssign | BinaryOperator::MulAssign | BinaryOperator::DivAssign => {
                let target = self.eval_expr(frame, lhs);
                let cell = target.as_cell().expect("analyser guarantees compound-assignment LHS is an lvalue");
                let current = self.arena.get(cell).clone();
                let operand = self.eval_expr(frame, rhs).read(&self.arena);
                let combined = self.apply_compound(op, &current, &operand, range);
                self.arena.set(cell, combined);
                Value::Ref(cell)
            }
            BinaryOperator::LogicalAnd => {
                let left = self.eval_expr(frame, lhs).read(&self.arena).as_bool();
                if !left {
                    return Value::Owned(InstanceValue::Bool(false), SemaType::bool());
                }
                let right = self.eval_expr(frame, rhs).read(&self.arena).as_bool();
                Value::Owned(InstanceValue::Bool(right), SemaType::bool())
            }
            BinaryOperator::LogicalOr => {
                let left = self.eval_expr(frame, lhs).read(&self.arena).as_bool();
                if left {
                    return Value::Owned(InstanceValue::Bool(true), SemaType::bool());
                }
                let right = self.eval_expr(frame, rhs).read(&self.arena).as_bool();
                Value::Owned(InstanceValue::Bool(right), SemaType::bool())
            }
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div => {
                let left = self.eval_expr(frame, lhs).read(&self.arena);
                let right = self.eval_expr(frame, rhs).read(&self.arena);
                self.apply_arithmetic(op, &left, &right, ty, range)
            }
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::Less
            | BinaryOperator::LessEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEqual => {
                let left = self.eval_expr(frame, lhs).read(&self.arena);
                let right = self.eval_expr(frame, rhs).read(&self.arena);
                Value::Owned(InstanceValue::Bool(self.apply_comparison(op, &left, &right)), SemaType::bool())
            }
        }
    }

    fn apply_arithmetic(&self, op: BinaryOperator, lhs: &InstanceValue, rhs: &InstanceValue, ty: &SemaType, range: SourceRange) -> Value {
        if ty.fundamental() == Some(Fundamental::String) {
            let mut s = lhs.as_string().to_string();
            s.push_str(rhs.as_string());
            return Value::Owned(InstanceValue::String(s), SemaType::string());
        }
        if ty.fundamental() == Some(Fundamental::Double) {
            let (a, b) = (lhs.as_double(), rhs.as_double());
            let result = match op {
                BinaryOperator::Add => a + b,
                BinaryOperator::Sub => a - b,
                BinaryOperator::Mul => a * b,
                BinaryOperator::Div => a / b,
                _ => unreachable!(),
            };
            return Value::Owned(InstanceValue::Double(result), SemaType::double());
        }
        let (a, b) = (lhs.as_int(), rhs.as_int());
        let result = match op {
            BinaryOperator::Add => a.wrapping_add(b),
            BinaryOperator::Sub => a.wrapping_sub(b),
            BinaryOperator::Mul => a.wrapping_mul(b),
            BinaryOperator::Div => {
                if b == 0 {
                    // spec §7 "Runtime": integer division by zero returns
                    // 0 and emits a warning; it is not fatal.
                    self.warn("integer division by zero", range);
                    0
                } else {
                    a.wrapping_div(b)
                }
            }
            _ => unreachable!(),
        };
        Value::Owned(InstanceValue::Int(result), SemaType::int())
    }

    fn apply_compound(&self, op: BinaryOperator, current: &InstanceValue, operand: &InstanceValue, range: SourceRange) -> InstanceValue {
        let arith_op = match op {
            BinaryOperator::AddAssign => BinaryOperator::Add,
            BinaryOperator::SubAssign => BinaryOperator::Sub,
            BinaryOperator::MulAssign => BinaryOperator::Mul,
            BinaryOperator::DivAssign => BinaryOperator::Div,
            _ => unreachable!(),
        };
        let ty = match current {
            InstanceValue::String(_) => SemaType::string(),
            InstanceValue::Double(_) => SemaType::double(),
            _ => SemaType::int(),
        };
        self.apply_arithmetic(arith_op, current, operand, &ty, range).read(&self.arena)
    }

    fn apply_comparison(&self, op: BinaryOperator, lhs: &InstanceValue, rhs: &InstanceValue) -> bool {
        use std::cmp::Ordering;
        let ordering = match (lhs, rhs) {
            (InstanceValue::String(a), InstanceValue::String(b)) => a.cmp(b),
            (InstanceValue::Bool(a), InstanceValue::Bool(b)) => a.cmp(b),
            (InstanceValue::Version(a), InstanceValue::Version(b)) => {
                (a.major, a.minor, a.patch, a.tweak).cmp(&(b.major, b.minor, b.patch, b.tweak))
            }
            _ if matches!(lhs, InstanceValue::Double(_)) || matches!(rhs, InstanceValue::Double(_)) => {
                lhs.as_double().partial_cmp(&rhs.as_double()).unwrap_or(Ordering::Equal)
            }
            (InstanceValue::Int(a), InstanceValue::Int(b)) => a.cmp(b),
            // The analyser only ever lowers a comparison between two
            // scalar fundamentals (spec §4.3); anything else reaching
            // here would be an analyser bug, not user input.
            _ => unreachable!("comparison reached the evaluator with incomparable operands: {lhs:?}, {rhs:?}"),
        };
        match op {
            BinaryOperator::Equal => ordering == Ordering::Equal,
            BinaryOperator::NotEqual => ordering != Ordering::Equal,
            BinaryOperator::Less => ordering == Ordering::Less,
            BinaryOperator::LessEqual => ordering != Ordering::Greater,
            BinaryOperator::Greater => ordering == Ordering::Greater,
            BinaryOperator::GreaterEqual => ordering != Ordering::Less,
            _ => unreachable!(),
        }
    }

    fn eval_member_access(&mut self, frame: &mut Frame, lhs: &SemaExpr, member: &str) -> Value {
        let receiver = self.eval_expr(frame, lhs);
        let cell = receiver.as_cell().unwrap_or_else(|| {
            // A temporary class rvalue (e.g. a fresh constructor result):
            // materialize it into a throwaway cell so field access still
            // has somewhere to point.
            let value = receiver.read(&self.arena);
            let ty = lhs.ty();
            self.arena.alloc(value, ty)
        });
        match self.arena.get(cell) {
            InstanceValue::Class { fields, .. } => {
                let field_cell = *fields
                    .get(member)
                    .unwrap_or_else(|| panic!("class instance has no field '{member}' at runtime"));
                Value::Ref(field_cell)
            }
            other => panic!("member access on a non-class value at runtime: {other:?}"),
        }
    }

    fn eval_call(&mut self, frame: &mut Frame, function: &Rc<SemaFunction>, args: &[SemaExpr], receiver: Option<Value>, range: SourceRange) -> Value {
        let arg_values: Vec<Value> = args.iter().map(|a| self.eval_expr(frame, a)).collect();
        match &function.kind {
            FunctionKind::Builtin(kind) => self.call_builtin(*kind, receiver, arg_values, range),
            FunctionKind::UserDefined => self.call_user_function(function, receiver, arg_values),
        }
    }

    fn call_user_function(&mut self, function: &Rc<SemaFunction>, receiver: Option<Value>, args: Vec<Value>) -> Value {
        let decl = self
            .bodies
            .get(&(Rc::as_ptr(function) as usize))
            .cloned()
            .unwrap_or_else(|| panic!("user function '{}' resolved with no body registered", function.signature.name));

        let mut call_frame = Frame::new();
        call_frame.push_scope();

        // A method body sees its receiver's fields directly in scope
        // (spec §4.7 "the class-member scope when evaluating a method
        // body") by aliasing each field's cell under its own name.
        if let Some(receiver) = receiver {
            if let Some(receiver_cell) = receiver.as_cell() {
                if let InstanceValue::Class { fields, .. } = self.arena.get(receiver_cell) {
                    for (name, cell) in fields.clone() {
                        call_frame.declare(name, cell);
                    }
                }
            }
        }

        for (param, arg) in decl.param_names.iter().zip(args) {
            let declared_ty = decl.function.signature.params.iter().find(|p| &p.name == param).map(|p| p.ty.clone());

            // A `T&` parameter binds directly to the caller's cell (spec
            // §4.5 "reference parameters alias the argument's storage");
            // overload resolution already rejected binding one to a
            // temporary, so `arg` is always a `Value::Ref` here.
            let cell = if matches!(declared_ty, Some(SemaType::Reference(_))) {
                arg.as_cell().expect("reference parameter bound to a non-lvalue argument")
            } else {
                let value = arg.read(&self.arena);
                let ty = declared_ty.unwrap_or_else(|| arg.ty(&self.arena));
                self.arena.alloc(value, ty)
            };
            call_frame.declare(param.clone(), cell);
        }

        self.eval_stmts(&mut call_frame, &decl.body.stmts);
        call_frame
            .return_value
            .unwrap_or_else(|| Value::Owned(InstanceValue::Void, SemaType::void()))
    }

    /// Default-constructs a value of `ty`, recursively allocating a cell
    /// per class field so `Foo f; f.bar = 1;` has somewhere for `bar` to
    /// point without a prior explicit initializer (spec §4.3 "default
    /// constructor").
    fn default_instance(&mut self, ty: &SemaType) -> InstanceValue {
        match ty.dereferenced() {
            SemaType::Class(class) => {
                let mut fields = IndexMap::new();
                for (name, field_ty) in &class.members {
                    let value = self.default_instance(field_ty);
                    let cell = self.arena.alloc(value, field_ty.clone());
                    fields.insert(name.clone(), cell);
                }
                InstanceValue::Class { ty: Rc::clone(class), fields }
            }
            _ => InstanceValue::default_for(ty),
        }
    }
}
