//! Call frame / identifier scope stack (spec §4.7 "Call frame").
//!
//! Grounded on `source/exec/identifiers_context.hpp`'s name->instance
//! map, generalized to a stack of maps (one per nested block) so that a
//! block exit un-shadows outer bindings without touching the arena (spec
//! §5 "Scopes ... acquire their contents on entry and release on exit").

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::value::{CellId, Value};

#[derive(Default)]
pub struct Frame {
    scopes: Vec<FxHashMap<SmolStr, CellId>>,
    pub return_value: Option<Value>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn declare(&mut self, name: SmolStr, cell: CellId) {
        self.scopes.last_mut().expect("a scope must be pushed before declaring").insert(name, cell);
    }

    /// Innermost binding wins (spec §4.7 "the first hit wins").
    pub fn lookup(&self, name: &str) -> Option<CellId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }
}
