//! Integration tests for the secondary indexer (`cmsl::index`).

use cmsl::index::{self, EntryKind};

#[test]
fn a_unary_minus_expression_produces_two_entries() {
    let parsed = index::parse_source("int main() { int foo = -42; return foo; }", None).expect("parses");
    let entries = index::index(&parsed);
    let unary_and_literal_entries = entries.iter().filter(|e| e.kind == EntryKind::OperatorFunction).count();
    assert_eq!(unary_and_literal_entries, 1);

    let identifier_entries: Vec<_> = entries.iter().filter(|e| e.kind == EntryKind::Identifier).collect();
    // one for the declaration of `foo`, one for its use in `return foo;`
    assert_eq!(identifier_entries.len(), 2);
}

#[test]
fn a_class_member_access_resolves_to_its_declaration() {
    let parsed = index::parse_source("class Foo { int bar; }; int main() { Foo f; f.bar = 1; return f.bar; }", None).expect("parses");
    let entries = index::index(&parsed);
    let member_entries: Vec<_> = entries.iter().filter(|e| e.kind == EntryKind::ClassMemberIdentifier).collect();
    assert_eq!(member_entries.len(), 2);
    let declaration_offset = member_entries[0].destination;
    assert!(member_entries.iter().all(|e| e.destination == declaration_offset));
}

#[test]
fn a_function_call_resolves_to_its_declaration() {
    let parsed = index::parse_source("int helper() { return 1; } int main() { return helper(); }", None).expect("parses");
    let entries = index::index(&parsed);
    let call = entries.iter().find(|e| e.kind == EntryKind::FunctionCallName).expect("one call entry");
    assert_ne!(call.destination, call.begin);
}

#[test]
fn a_source_with_a_parse_error_yields_no_parsed_source() {
    assert!(index::parse_source("int main( { return 0; }", None).is_none());
}
