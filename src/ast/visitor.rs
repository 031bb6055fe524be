//! The one place the AST keeps a visitor contract: the traversal boundary
//! between the parser's AST and the semantic analyser's SEMA tree (spec §9
//! Design Notes — "keep the visitor contract only at the traversal
//! boundary between phases"). Internally, both trees are matched on
//! exhaustively; this trait exists only so the analyser can be written
//! against an interface rather than reaching into `Expr`'s variants by hand
//! from unrelated call sites.

use super::node::{Block, Expr, FunctionDecl, Stmt};

/// Implemented once, by the semantic analyser (spec §4.4), to lower an AST
/// into a SEMA tree. Each method returns the analyser's own node type `N`.
pub trait AstLowering {
    type Node;

    fn lower_expr(&mut self, expr: &Expr) -> Self::Node;
    fn lower_stmt(&mut self, stmt: &Stmt) -> Self::Node;
    fn lower_block(&mut self, block: &Block) -> Self::Node;
    fn lower_function(&mut self, function: &FunctionDecl) -> Self::Node;
}
