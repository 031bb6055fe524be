//! Overload resolution (spec §4.6), grounded on
//! `test/sema/overload_resolution_test.cpp`'s `overload_resolution::choose`:
//! given a call's argument types and the layered candidate set the context
//! tree handed back, pick the one callable whose parameters the arguments
//! convert to, erroring on no match, ambiguity, or binding a reference
//! parameter to a temporary.

use crate::base::SourceRange;
use crate::diagnostics::{Diagnostic, ErrorsObserver, Phase, Severity};
use std::rc::Rc;

use super::function::SemaFunction;
use super::types::{Fundamental, SemaType};

/// One argument being matched against a parameter: its resolved type and
/// whether the underlying expression is addressable (spec §4.5 — only an
/// lvalue can bind to a reference parameter; binding a temporary is a
/// hard error, not just a worse-scored conversion).
#[derive(Debug, Clone, Copy)]
pub struct Argument<'a> {
    pub ty: &'a SemaType,
    pub is_lvalue: bool,
}

pub struct OverloadResolution<'a> {
    observer: &'a dyn ErrorsObserver,
    call_name: &'a str,
    call_range: SourceRange,
}

impl<'a> OverloadResolution<'a> {
    pub fn new(observer: &'a dyn ErrorsObserver, call_name: &'a str, call_range: SourceRange) -> Self {
        Self {
            observer,
            call_name,
            call_range,
        }
    }

    pub fn choose(&self, candidates: Option<&[Rc<SemaFunction>]>, args: &[Argument<'_>]) -> Option<Rc<SemaFunction>> {
        let Some(candidates) = candidates else {
            self.error(format!("no function named '{}' is visible here", self.call_name));
            return None;
        };

        let arity_matched: Vec<_> = candidates.iter().filter(|f| f.signature.arity() == args.len()).collect();
        if arity_matched.is_empty() {
            self.error(format!(
                "no overload of '{}' accepts {} argument(s)",
                self.call_name,
                args.len()
            ));
            return None;
        }

        let mut scored = Vec::new();
        let mut reference_to_temporary = false;
        for function in arity_matched {
            match self.score(function, args) {
                Ok(cost) => scored.push((cost, function)),
                Err(ScoreFailure::ReferenceToTemporary) => reference_to_temporary = true,
                Err(ScoreFailure::TypeMismatch) => {}
            }
        }

        if scored.is_empty() {
            if reference_to_temporary {
                self.error(format!(
                    "cannot bind a reference parameter of '{}' to a temporary value",
                    self.call_name
                ));
            } else {
                self.error(format!("no overload of '{}' matches the argument types", self.call_name));
            }
            return None;
        }

        let best_cost = scored.iter().map(|(cost, _)| *cost).min().unwrap();
        let mut best: Vec<_> = scored.into_iter().filter(|(cost, _)| *cost == best_cost).collect();
        if best.len() > 1 {
            self.error(format!("call to '{}' is ambiguous", self.call_name));
            return None;
        }

        Some(Rc::clone(best.remove(0).1))
    }

    fn score(&self, function: &SemaFunction, args: &[Argument<'_>]) -> Result<u32, ScoreFailure> {
        let mut total = 0u32;
        for (param, arg) in function.signature.params.iter().zip(args) {
            total += conversion_cost(&param.ty, arg)?;
        }
        Ok(total)
    }

    fn error(&self, message: impl Into<String>) {
        self.observer.notify_error(Diagnostic::new(Phase::Overload, Severity::Error, message, self.call_range));
    }
}

enum ScoreFailure {
    TypeMismatch,
    ReferenceToTemporary,
}

fn conversion_cost(param: &SemaType, arg: &Argument<'_>) -> Result<u32, ScoreFailure> {
    if param == arg.ty {
        return Ok(0);
    }

    if let SemaType::Reference(inner) = param {
        if !arg.is_lvalue {
            return Err(ScoreFailure::ReferenceToTemporary);
        }
        return if inner.as_ref() == arg.ty.dereferenced() {
            Ok(0)
        } else {
            Err(ScoreFailure::TypeMismatch)
        };
    }

    if param.dereferenced() == arg.ty.dereferenced() {
        // same underlying type, arg carries a reference the param doesn't
        // ask for: implicit dereference-and-copy (spec §4.5).
        return Ok(1);
    }

    match (param.fundamental(), arg.ty.dereferenced().fundamental()) {
        (Some(Fundamental::Bool), Some(Fundamental::Int))
        | (Some(Fundamental::Int), Some(Fundamental::Bool))
        | (Some(Fundamental::Int), Some(Fundamental::Double))
        | (Some(Fundamental::Double), Some(Fundamental::Int)) => Ok(2),
        _ => Err(ScoreFailure::TypeMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;
    use crate::diagnostics::CollectingObserver;
    use crate::sema::function::{FunctionKind, FunctionSignature, ParamDeclaration};
    use crate::sema::builtin::BuiltinFunctionKind;

    fn range() -> SourceRange {
        SourceRange::empty(Position::start())
    }

    fn overload(name: &str, param_tys: Vec<SemaType>) -> Rc<SemaFunction> {
        Rc::new(SemaFunction {
            signature: FunctionSignature {
                name: name.into(),
                params: param_tys
                    .into_iter()
                    .enumerate()
                    .map(|(i, ty)| ParamDeclaration { ty, name: format!("p{i}").into() })
                    .collect(),
                return_type: SemaType::void(),
            },
            kind: FunctionKind::Builtin(BuiltinFunctionKind::CmakeMinimumRequired),
        })
    }

    #[test]
    fn picks_exact_arity_and_type_match() {
        let observer = CollectingObserver::new();
        let candidates = vec![overload("f", vec![SemaType::int()]), overload("f", vec![SemaType::string()])];
        let resolution = OverloadResolution::new(&observer, "f", range());
        let arg = Argument { ty: &SemaType::int(), is_lvalue: false };
        let chosen = resolution.choose(Some(&candidates), &[arg]).unwrap();
        assert_eq!(chosen.signature.params[0].ty, SemaType::int());
        assert!(observer.diagnostics().is_empty());
    }

    #[test]
    fn no_candidates_at_all_is_an_error() {
        let observer = CollectingObserver::new();
        let resolution = OverloadResolution::new(&observer, "f", range());
        assert!(resolution.choose(None, &[]).is_none());
        assert_eq!(observer.diagnostics().len(), 1);
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        let observer = CollectingObserver::new();
        let candidates = vec![overload("f", vec![SemaType::int()])];
        let resolution = OverloadResolution::new(&observer, "f", range());
        assert!(resolution.choose(Some(&candidates), &[]).is_none());
        assert_eq!(observer.diagnostics().len(), 1);
    }

    #[test]
    fn reference_parameter_rejects_a_temporary() {
        let observer = CollectingObserver::new();
        let candidates = vec![overload("f", vec![SemaType::int().as_reference()])];
        let resolution = OverloadResolution::new(&observer, "f", range());
        let arg = Argument { ty: &SemaType::int(), is_lvalue: false };
        assert!(resolution.choose(Some(&candidates), &[arg]).is_none());
        assert_eq!(observer.diagnostics().len(), 1);
    }

    #[test]
    fn reference_parameter_accepts_an_lvalue() {
        let observer = CollectingObserver::new();
        let candidates = vec![overload("f", vec![SemaType::int().as_reference()])];
        let resolution = OverloadResolution::new(&observer, "f", range());
        let arg = Argument { ty: &SemaType::int(), is_lvalue: true };
        assert!(resolution.choose(Some(&candidates), &[arg]).is_some());
    }

    #[test]
    fn ambiguous_equal_cost_candidates_error_out() {
        let observer = CollectingObserver::new();
        let candidates = vec![overload("f", vec![SemaType::bool()]), overload("f", vec![SemaType::double()])];
        let resolution = OverloadResolution::new(&observer, "f", range());
        // int -> bool and int -> double both cost 2: genuinely ambiguous.
        let arg = Argument { ty: &SemaType::int(), is_lvalue: false };
        assert!(resolution.choose(Some(&candidates), &[arg]).is_none());
        assert_eq!(observer.diagnostics().len(), 1);
    }
}
