//! Integration tests exercising the recording `TestFacade` through a full
//! script execution, not just the evaluator's internal unit tests.

use cmsl::facade::test_util::{FacadeCall, TestFacade};

#[test]
fn project_add_library_and_link_to_are_forwarded_in_order() {
    let facade = TestFacade::new();
    let (result, diags) = cmsl::execute(
        r#"
        int main() {
            project p = project("demo");
            list<string> sources;
            library core = p.add_library("core", sources);
            library utils = p.add_library("utils", sources);
            core.link_to(utils);
            return 0;
        }
        "#,
        &facade,
    );
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(result, 0);

    let calls = facade.calls();
    assert_eq!(
        calls,
        vec![
            FacadeCall::RegisterProject("demo".to_string()),
            FacadeCall::AddLibrary("core".to_string(), vec![]),
            FacadeCall::AddLibrary("utils".to_string(), vec![]),
            FacadeCall::TargetLinkLibrary("core".to_string(), cmsl::facade::Visibility::Public, "utils".to_string()),
        ]
    );
}

#[test]
fn a_fatal_error_call_aborts_evaluation() {
    let facade = TestFacade::new();
    let (result, _diags) = cmsl::execute(r#"int main() { fatal_error("stop"); return 1; }"#, &facade);
    assert_eq!(result, cmsl::eval::FATAL_SENTINEL);
    assert!(facade.did_fatal_error_occur());
}
