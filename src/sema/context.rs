//! The SEMA context tree (spec §4.4 "sema_context"): one node per
//! namespace/class/function/block scope, linked to its parent by index.
//!
//! Grounded on `syster-base::semantic::symbol_table::scope::Scope`'s
//! arena-of-scopes-indexed-by-usize layout, generalized from a single flat
//! symbol table to three maps per scope (types, variables, and overload
//! sets of functions) — matching `sema_context::find_type`/`find_function`
//! walking up through `m_parent` in the original (`sema_context.cpp`).

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::rc::Rc;

use super::function::SemaFunction;
use super::types::SemaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Global,
    Class,
    Function,
    Block,
}

#[derive(Debug, Default)]
struct ScopeNode {
    parent: Option<ContextId>,
    types: FxHashMap<SmolStr, SemaType>,
    variables: FxHashMap<SmolStr, SemaType>,
    functions: FxHashMap<SmolStr, Vec<Rc<SemaFunction>>>,
}

/// Owns every scope created while analysing one translation unit. Scopes
/// never outlive the arena, so lookups hand back owned clones rather than
/// references tied to a borrow of a single node.
#[derive(Debug)]
pub struct SemaContextArena {
    nodes: Vec<ScopeNode>,
    kinds: Vec<ContextKind>,
}

impl SemaContextArena {
    pub fn new() -> (Self, ContextId) {
        let mut arena = Self {
            nodes: Vec::new(),
            kinds: Vec::new(),
        };
        let root = arena.push_raw(None, ContextKind::Global);
        (arena, root)
    }

    fn push_raw(&mut self, parent: Option<ContextId>, kind: ContextKind) -> ContextId {
        let id = ContextId(self.nodes.len());
        self.nodes.push(ScopeNode {
            parent,
            ..Default::default()
        });
        self.kinds.push(kind);
        id
    }

    pub fn push_child(&mut self, parent: ContextId, kind: ContextKind) -> ContextId {
        self.push_raw(Some(parent), kind)
    }

    pub fn kind(&self, id: ContextId) -> ContextKind {
        self.kinds[id.0]
    }

    pub fn parent(&self, id: ContextId) -> Option<ContextId> {
        self.nodes[id.0].parent
    }

    pub fn declare_type(&mut self, id: ContextId, name: SmolStr, ty: SemaType) {
        self.nodes[id.0].types.insert(name, ty);
    }

    pub fn declare_variable(&mut self, id: ContextId, name: SmolStr, ty: SemaType) {
        self.nodes[id.0].variables.insert(name, ty);
    }

    pub fn declare_function(&mut self, id: ContextId, function: Rc<SemaFunction>) {
        self.nodes[id.0].functions.entry(function.signature.name.clone()).or_default().push(function);
    }

    pub fn find_type_in_scope(&self, id: ContextId, name: &str) -> Option<&SemaType> {
        self.nodes[id.0].types.get(name)
    }

    pub fn find_type(&self, id: ContextId, name: &str) -> Option<SemaType> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(ty) = self.find_type_in_scope(current, name) {
                return Some(ty.clone());
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Walks up to the nearest enclosing scope that declares `name` at all
    /// (spec §4.6 "variable shadowing" mirrors the function lookup rule:
    /// the innermost binding wins outright, it is never merged with outer
    /// ones).
    pub fn find_variable(&self, id: ContextId, name: &str) -> Option<SemaType> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(ty) = self.nodes[current.0].variables.get(name) {
                return Some(ty.clone());
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Layered candidate-set lookup (spec §4.6): returns the overload set
    /// from the *innermost* scope that declares anything named `name` at
    /// all. An inner scope with one badly-typed overload still hides every
    /// same-named candidate further out — callers never merge across
    /// layers.
    pub fn lookup_functions(&self, id: ContextId, name: &str) -> Option<&[Rc<SemaFunction>]> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(candidates) = self.nodes[current.0].functions.get(name) {
                return Some(candidates);
            }
            cursor = self.parent(current);
        }
        None
    }
}
