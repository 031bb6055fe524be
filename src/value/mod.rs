//! C7: the runtime value model (spec §3 "instance_value", §9 Design Notes).
//!
//! Grounded on `instance_value_variant.cpp` and `instance_reference.hpp`,
//! re-architected per the Design Notes: rather than an `instance` base
//! class with `named_instance`/`instance_reference` subclasses forwarding
//! through virtual calls, every storage location is a [`Cell`] in one
//! [`Arena`] owned by the evaluator for the duration of a single
//! `execute()` call. A [`Value`] produced by evaluating an expression is
//! either an owned rvalue or an [`Arena`] index — a reference — so
//! "reference never outlives its target" holds trivially: nothing ever
//! frees a cell mid-run (spec §5 "no garbage collection beyond
//! scope-bounded ownership": unreachable cells just go unused, they are
//! never explicitly reclaimed).

mod arena;
mod instance;

pub use arena::{Arena, CellId};
pub use instance::{InstanceValue, VersionValue};

use crate::sema::types::SemaType;

/// What evaluating a [`crate::sema::node::SemaExpr`] produces. Spec §4.7
/// "Expression evaluation produces an instance that the caller owns (by
/// move)" for the `Owned` case; member access / variable reads produce a
/// `Ref` pointing back into the arena cell that owns the storage.
#[derive(Debug, Clone)]
pub enum Value {
    Owned(InstanceValue, SemaType),
    Ref(CellId),
}

impl Value {
    pub fn ty(&self, arena: &Arena) -> SemaType {
        match self {
            Value::Owned(_, ty) => ty.clone(),
            Value::Ref(id) => arena.ty(*id),
        }
    }

    /// Read-by-value: a [`Value::Ref`] dereferences (deep-copying the
    /// underlying [`InstanceValue`] — `Clone` on a `String`/`Vec` already
    /// performs a deep copy in Rust; spec §4.5's "shallow tag copy for
    /// fundamentals" is likewise just `Clone` on a `Copy` scalar).
    pub fn read(&self, arena: &Arena) -> InstanceValue {
        match self {
            Value::Owned(v, _) => v.clone(),
            Value::Ref(id) => arena.get(*id).clone(),
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Value::Ref(_))
    }

    pub fn as_cell(&self) -> Option<CellId> {
        match self {
            Value::Ref(id) => Some(*id),
            Value::Owned(..) => None,
        }
    }
}
