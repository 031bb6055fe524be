//! C5/C6: the semantic analyser — resolves the AST into a typed SEMA tree
//! (spec §4.4, §4.5, §4.6).

mod analyser;
pub mod builtin;
mod context;
mod function;
mod node;
mod overload;
mod types;

pub use analyser::{Analyser, SemaNode};
pub use context::{ContextId, ContextKind, SemaContextArena};
pub use function::{FunctionKind, FunctionSignature, ParamDeclaration, SemaFunction};
pub use node::*;
pub use overload::{Argument, OverloadResolution};
pub use types::{ClassType, EnumType, Fundamental, SemaType};

use crate::ast::TranslationUnit;
use crate::diagnostics::ErrorsObserver;

/// Lowers a parsed translation unit into its SEMA tree (spec §4.4).
pub fn analyse(unit: &TranslationUnit, observer: &dyn ErrorsObserver) -> (SemaTranslationUnit, SemaContextArena) {
    Analyser::new(observer).analyse(unit)
}
