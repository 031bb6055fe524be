//! CMSL: lexer, parser, semantic analyser and tree-walking evaluator for
//! the CMake Script Language.
//!
//! The pipeline mirrors the spec's module boundaries one-to-one: source
//! bytes flow through [`lexer`] -> [`parser`] (producing an [`ast`] tree)
//! -> [`sema`] (producing a typed SEMA tree) -> [`eval`], a tree-walking
//! evaluator over [`value`]s, with every build-domain side effect
//! forwarded to a [`facade::CmakeFacade`] and every diagnostic reported
//! through a single [`diagnostics::ErrorsObserver`] sink.

pub mod ast;
pub mod base;
pub mod diagnostics;
pub mod eval;
pub mod facade;
pub mod index;
pub mod lexer;
pub mod parser;
pub mod sema;
pub mod value;

use diagnostics::{CollectingObserver, Diagnostic};
use facade::CmakeFacade;

/// `execute(source_text) -> int32` (spec §6 "Library entry"): compiles
/// and evaluates `source`, driving `facade` as a side effect, and returns
/// `main`'s return value or [`eval::FATAL_SENTINEL`] on a fatal
/// diagnostic. Every diagnostic produced along the way is returned
/// alongside the result rather than only delivered through the observer,
/// so a caller with no observer of its own still sees what went wrong.
pub fn execute(source_text: &str, facade: &dyn CmakeFacade) -> (i32, Vec<Diagnostic>) {
    let observer = CollectingObserver::new();
    let result = execute_with_observer(source_text, facade, &observer);
    (result, observer.into_diagnostics())
}

/// Same as [`execute`], but reports through a caller-supplied observer
/// (spec §4.8 "errors_observer") instead of an internal one-shot
/// collector — used by hosts that want diagnostics as they are produced.
pub fn execute_with_observer(source_text: &str, facade: &dyn CmakeFacade, observer: &dyn diagnostics::ErrorsObserver) -> i32 {
    tracing::debug!(target: "cmsl::execute", bytes = source_text.len(), "starting compilation");

    let file = base::SourceFile::new(source_text);
    let tokens = lexer::lex(&file, observer);
    tracing::trace!(target: "cmsl::execute", tokens = tokens.len(), "lexed");

    let unit = parser::parse(&tokens, observer);
    tracing::trace!(target: "cmsl::execute", items = unit.items.len(), "parsed");

    if observer.did_fatal_error_occur() {
        return eval::FATAL_SENTINEL;
    }

    let (sema_unit, _arena) = sema::analyse(&unit, observer);
    tracing::trace!(target: "cmsl::execute", functions = sema_unit.functions.len(), "analysed");

    if observer.did_fatal_error_occur() {
        return eval::FATAL_SENTINEL;
    }

    let result = eval::Evaluator::new(observer, facade).run(&sema_unit);
    tracing::debug!(target: "cmsl::execute", result, "evaluation finished");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use facade::test_util::TestFacade;

    fn run(src: &str) -> (i32, Vec<Diagnostic>) {
        let facade = TestFacade::new();
        execute(src, &facade)
    }

    // Spec §8 end-to-end scenario 1.
    #[test]
    fn empty_list_has_size_zero() {
        let (result, diags) = run("int main() { list<int> l; return l.size(); }");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, 0);
    }

    // Spec §8 end-to-end scenario 2.
    #[test]
    fn string_compound_append_grows_size() {
        let (result, diags) = run(r#"int main() { string s = "abc"; s += "de"; return s.size(); }"#);
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, 5);
    }

    // Spec §8 end-to-end scenario 3.
    #[test]
    fn class_field_assignment_round_trips() {
        let (result, diags) = run("class Foo { int bar; }; int main() { Foo f; f.bar = 42; return f.bar; }");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, 42);
    }

    // Spec §8 end-to-end scenario 5.
    #[test]
    fn while_loop_counts_to_three() {
        let (result, diags) = run("int main() { int i = 0; while (i < 3) { i += 1; } return i; }");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, 3);
    }

    // Spec §8 end-to-end scenario 6: left-to-right short-circuit evaluation.
    #[test]
    fn logical_operators_short_circuit_left_to_right() {
        let (result, diags) = run("int main() { return 1 && 0 || 1; }");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, 1);
    }

    // Spec §8 end-to-end scenario 4: project/add_executable forwards to the facade.
    #[test]
    fn project_and_executable_forward_to_facade() {
        let facade = TestFacade::new();
        let (result, diags) = execute(
            r#"int main() { project p = project("x"); list<string> s; executable e = p.add_executable("exe", s); string n = e.name(); return int(n == "exe"); }"#,
            &facade,
        );
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, 1);
        let calls = facade.calls();
        assert_eq!(
            calls.iter().filter(|c| matches!(c, facade::test_util::FacadeCall::AddExecutable(name, _) if name == "exe")).count(),
            1
        );
    }

    #[test]
    fn missing_main_is_fatal() {
        let (result, diags) = run("int not_main() { return 0; }");
        assert_eq!(result, eval::FATAL_SENTINEL);
        assert!(diags.iter().any(|d| d.is_fatal()));
    }

    #[test]
    fn integer_division_by_zero_warns_and_returns_zero() {
        let (result, diags) = run("int main() { return 1 / 0; }");
        assert_eq!(result, 0);
        assert!(diags.iter().any(|d| d.phase == diagnostics::Phase::Runtime && !d.is_fatal()));
    }

    #[test]
    fn unary_minus_negates_an_integer() {
        let (result, diags) = run("int main() { int x = 10; return -x + 3; }");
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, -7);
    }

    #[test]
    fn user_functions_and_recursion_work() {
        let (result, diags) = run(
            r#"
            int fib(int n) {
                if (n < 2) { return n; }
                return fib(n - 1) + fib(n - 2);
            }
            int main() { return fib(10); }
            "#,
        );
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(result, 55);
    }
}
