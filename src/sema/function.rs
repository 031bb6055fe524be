//! Function signatures (spec §4.4 "sema_function").

use smol_str::SmolStr;

use super::builtin::BuiltinFunctionKind;
use super::types::SemaType;

#[derive(Debug, Clone)]
pub struct ParamDeclaration {
    pub ty: SemaType,
    pub name: SmolStr,
}

#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: SmolStr,
    pub params: Vec<ParamDeclaration>,
    pub return_type: SemaType,
}

impl FunctionSignature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Either a user-defined function/method (its body lives on the owning
/// [`super::node::SemaFunctionDecl`]) or a builtin dispatched by
/// [`crate::eval`] through its [`BuiltinFunctionKind`] tag (spec §4.3).
#[derive(Debug, Clone)]
pub enum FunctionKind {
    UserDefined,
    Builtin(BuiltinFunctionKind),
}

#[derive(Debug, Clone)]
pub struct SemaFunction {
    pub signature: FunctionSignature,
    pub kind: FunctionKind,
}

impl SemaFunction {
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, FunctionKind::Builtin(_))
    }
}
