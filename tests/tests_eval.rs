//! End-to-end scenarios driving the whole pipeline through `cmsl::execute`.

use cmsl::facade::test_util::TestFacade;
use rstest::rstest;
use std::sync::Once;

static INIT_TRACING: Once = Once::new();

fn run(src: &str) -> (i32, Vec<cmsl::diagnostics::Diagnostic>) {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
    let facade = TestFacade::new();
    cmsl::execute(src, &facade)
}

#[rstest]
#[case("int main() { return 2 + 3 * 4; }", 14)]
#[case("int main() { return (2 + 3) * 4; }", 20)]
#[case("int main() { return -5 + -5; }", -10)]
#[case("int main() { int x = 2; int y = 3; return x * x + y * y; }", 13)]
fn arithmetic_scenarios(#[case] src: &str, #[case] expected: i32) {
    let (result, diags) = run(src);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(result, expected);
}

#[test]
fn conversion_costs_prefer_the_cheapest_overload() {
    let (result, diags) = run(
        r#"
        int choose(int x) { return 1; }
        int choose(double x) { return 2; }
        int main() { return choose(3); }
        "#,
    );
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(result, 1);
}

#[test]
fn reference_parameter_mutates_the_caller_cell() {
    let (result, diags) = run(
        r#"
        void bump(int& x) { x += 1; }
        int main() {
            int n = 41;
            bump(n);
            return n;
        }
        "#,
    );
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(result, 42);
}

#[test]
fn nested_class_methods_share_the_field_scope() {
    let (result, diags) = run(
        r#"
        class Counter {
            int value;
            void increment() { value += 1; }
            int get() { return value; }
        };
        int main() {
            Counter c;
            c.increment();
            c.increment();
            c.increment();
            return c.get();
        }
        "#,
    );
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(result, 3);
}

#[test]
fn binding_a_reference_to_a_temporary_is_rejected() {
    // Overload/type errors are recoverable (spec §7 "every phase continues
    // past recoverable errors"): the call degrades to a placeholder and
    // evaluation still completes, but the diagnostic is reported.
    let (result, diags) = run("void bump(int& x) { x += 1; } int main() { bump(1 + 1); return 0; }");
    assert_eq!(result, 0);
    assert!(diags.iter().any(|d| d.phase == cmsl::diagnostics::Phase::Overload && !d.is_fatal()));
}

#[test]
fn list_push_back_and_index_round_trip() {
    let (result, diags) = run(
        r#"
        int main() {
            list<int> xs;
            xs.push_back(10);
            xs.push_back(20);
            xs.push_back(30);
            return xs.at(1);
        }
        "#,
    );
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(result, 20);
}
