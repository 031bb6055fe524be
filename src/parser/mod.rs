//! C4: token sequence -> [`crate::ast::TranslationUnit`] (spec §4.2).

mod cursor;
mod grammar;

use crate::ast::TranslationUnit;
use crate::diagnostics::ErrorsObserver;
use crate::lexer::Token;

use cursor::Cursor;

/// Parses a whole unit. Recovers from structural errors at the next `;` or
/// `}` (spec §4.2) rather than aborting, so a single compile can surface
/// every syntax error instead of just the first.
pub fn parse(tokens: &[Token], observer: &dyn ErrorsObserver) -> TranslationUnit {
    let mut cursor = Cursor::new(tokens, observer);
    grammar::parse_translation_unit(&mut cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Expr, Item, Stmt};
    use crate::base::SourceFile;
    use crate::diagnostics::CollectingObserver;

    fn parse_str(src: &str) -> (TranslationUnit, CollectingObserver) {
        let observer = CollectingObserver::new();
        let file = SourceFile::new(src);
        let tokens = crate::lexer::lex(&file, &observer);
        let unit = parse(&tokens, &observer);
        (unit, observer)
    }

    #[test]
    fn parses_empty_main() {
        let (unit, obs) = parse_str("int main() { return 0; }");
        assert!(obs.diagnostics().is_empty());
        assert_eq!(unit.items.len(), 1);
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        assert_eq!(f.name.text(), "main");
        assert_eq!(f.body.stmts.len(), 1);
    }

    #[test]
    fn parses_class_with_field_and_method() {
        let (unit, obs) = parse_str(
            r#"
            class Foo {
                int bar;
                int get_bar() { return bar; }
            };
            int main() { return 0; }
            "#,
        );
        assert!(obs.diagnostics().is_empty());
        assert_eq!(unit.items.len(), 2);
        let Item::Class(class) = &unit.items[0] else { panic!("expected a class") };
        assert_eq!(class.name.text(), "Foo");
        assert_eq!(class.members.len(), 2);
    }

    #[test]
    fn variable_decl_of_a_declared_class_type_is_not_mistaken_for_a_call() {
        let (unit, obs) = parse_str(
            r#"
            class Foo { int bar; };
            int main() { Foo f; return 0; }
            "#,
        );
        assert!(obs.diagnostics().is_empty());
        let Item::Function(main_fn) = &unit.items[1] else { panic!("expected a function") };
        assert!(matches!(main_fn.body.stmts[0], Stmt::VariableDecl(_)));
    }

    #[test]
    fn unary_minus_parses_as_a_real_operator() {
        let (unit, obs) = parse_str("int main() { int x = -1; return x; }");
        assert!(obs.diagnostics().is_empty());
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        let Stmt::VariableDecl(decl) = &f.body.stmts[0] else { panic!("expected a variable decl") };
        assert!(matches!(decl.initializer, Some(Expr::Unary(_))));
    }

    #[test]
    fn assignment_is_right_associative_and_weakest() {
        let (unit, obs) = parse_str("int main() { int a = 0; int b = 0; a = b = 1; return a; }");
        assert!(obs.diagnostics().is_empty());
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        let Stmt::Expr(Expr::Binary(outer)) = &f.body.stmts[2] else { panic!("expected an assignment") };
        assert_eq!(outer.operator, BinaryOperator::Assign);
        assert!(matches!(*outer.rhs, Expr::Binary(_)));
    }

    #[test]
    fn short_circuit_operators_share_precedence_layers() {
        let (unit, obs) = parse_str("bool f() { return true && false || true; }");
        assert!(obs.diagnostics().is_empty());
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        let Stmt::Return(ret) = &f.body.stmts[0] else { panic!("expected a return") };
        let Some(Expr::Binary(top)) = &ret.value else { panic!("expected a binary expr") };
        assert_eq!(top.operator, BinaryOperator::LogicalOr);
    }

    #[test]
    fn member_function_call_chain_parses_left_to_right() {
        let (unit, obs) = parse_str("int main() { a.b.c(1, 2); return 0; }");
        assert!(obs.diagnostics().is_empty());
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        let Stmt::Expr(Expr::MemberFunctionCall(call)) = &f.body.stmts[0] else {
            panic!("expected a member function call")
        };
        assert_eq!(call.name.text(), "c");
        assert_eq!(call.args.len(), 2);
        assert!(matches!(*call.lhs, Expr::MemberAccess(_)));
    }

    #[test]
    fn missing_semicolon_recovers_at_next_statement() {
        let (unit, obs) = parse_str("int main() { int a = 1 int b = 2; return b; }");
        assert!(!obs.diagnostics().is_empty());
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        assert_eq!(f.body.stmts.len(), 2);
    }

    #[test]
    fn if_else_chain_collects_all_arms() {
        let (unit, obs) = parse_str(
            r#"
            int main() {
                if (true) { return 1; }
                else if (false) { return 2; }
                else { return 3; }
            }
            "#,
        );
        assert!(obs.diagnostics().is_empty());
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        let Stmt::IfElse(chain) = &f.body.stmts[0] else { panic!("expected an if/else") };
        assert_eq!(chain.arms.len(), 2);
        assert!(chain.else_body.is_some());
    }

    #[test]
    fn generic_list_type_parses_nested_type_argument() {
        let (unit, obs) = parse_str("list<int> main() { list<int> xs; return xs; }");
        assert!(obs.diagnostics().is_empty());
        let Item::Function(f) = &unit.items[0] else { panic!("expected a function") };
        assert!(f.return_type.is_generic());
        assert_eq!(f.return_type.nested_types()[0].to_string_without_reference(), "int");
    }
}
