//! The cell arena (spec §9 Design Notes: replace "type factories returning
//! long-lived bare pointers" / ownership cycles with "explicit indices into
//! an arena owned by the compilation holder" — applied here to runtime
//! storage rather than to `sema_type`/`sema_context`, which is the same
//! idea one layer down).

use super::instance::InstanceValue;
use crate::sema::types::SemaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(usize);

struct Cell {
    value: InstanceValue,
    ty: SemaType,
}

/// Owns every storage location allocated while evaluating one translation
/// unit: every local variable, class field, and list element lives in one
/// cell here. A [`super::Value::Ref`] is just a [`CellId`] copy, so taking
/// a reference is a pointer-sized copy, never a second allocation.
#[derive(Default)]
pub struct Arena {
    cells: Vec<Cell>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, value: InstanceValue, ty: SemaType) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(Cell { value, ty });
        id
    }

    pub fn get(&self, id: CellId) -> &InstanceValue {
        &self.cells[id.0].value
    }

    pub fn get_mut(&mut self, id: CellId) -> &mut InstanceValue {
        &mut self.cells[id.0].value
    }

    pub fn set(&mut self, id: CellId, value: InstanceValue) {
        self.cells[id.0].value = value;
    }

    pub fn ty(&self, id: CellId) -> SemaType {
        self.cells[id.0].ty.clone()
    }
}
