//! C3: the typed AST + visitor contract (spec §3 "AST node", §4.4).

mod node;
mod type_rep;
mod visitor;

pub use node::*;
pub use type_rep::TypeRepresentation;
pub use visitor::AstLowering;
