//! The secondary indexer API (spec §6 "Token/entry stream for tools"),
//! used by the indexer tool external collaborator (spec §1 "Out of
//! scope"). Grounded on `test/tools/smoke/indexer_test.cpp`'s
//! `cmsl_parse_source`/`cmsl_index`/`cmsl_destroy_*` shape, adapted from a
//! C handle API to ordinary Rust ownership: `ParsedSource` and
//! `Vec<IndexEntry>` are dropped like any other value, so
//! [`destroy_parsed_source`]/[`destroy_index_entries`] exist only to keep
//! the one-to-one correspondence with the spec's named operations (spec
//! §6's "Persisted state: None" already implies there is nothing to leak).
//!
//! Positions are UTF-8 byte offsets in the original source (spec §6).

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::ast::{self, Expr, Item, Stmt, TranslationUnit};
use crate::base::SourceFile;
use crate::diagnostics::CollectingObserver;

/// `entry.type_tag` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Type,
    Identifier,
    ParameterDeclarationIdentifier,
    ClassMemberIdentifier,
    OperatorFunction,
    FunctionCallName,
}

/// One `(begin_pos, end_pos, destination_pos, type_tag, destination_path)`
/// tuple (spec §6). `destination` is a byte offset into the same source
/// unless `destination_path` names another unit (cross-file destinations
/// are out of scope for a single-unit indexer — always `None` here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub begin: u32,
    pub end: u32,
    pub destination: u32,
    pub kind: EntryKind,
    pub destination_path: Option<String>,
}

/// `cmsl_parsed_source*` (spec §6): an opaque, successfully parsed unit.
/// `None` from [`parse_source`] stands in for the original's null handle.
pub struct ParsedSource {
    unit: TranslationUnit,
    path: Option<String>,
}

/// `cmsl_parse_source(text, optional path)` (spec §6). Returns `None`
/// ("null") if lexing or parsing produced any diagnostic — an indexer has
/// no use for a partially-recovered tree it cannot trust the ranges of.
pub fn parse_source(text: &str, path: Option<&str>) -> Option<ParsedSource> {
    let observer = CollectingObserver::new();
    let file = SourceFile::new(text);
    let tokens = crate::lexer::lex(&file, &observer);
    let unit = crate::parser::parse(&tokens, &observer);
    if !observer.diagnostics().is_empty() {
        return None;
    }
    Some(ParsedSource {
        unit,
        path: path.map(str::to_string),
    })
}

/// `cmsl_destroy_parsed_source(handle)` (spec §6): ordinary `Drop` does
/// this in Rust; kept as a named function for parity with the spec'd API.
pub fn destroy_parsed_source(_source: ParsedSource) {}

/// `cmsl_destroy_index_entries(handle)` (spec §6): see
/// [`destroy_parsed_source`].
pub fn destroy_index_entries(_entries: Vec<IndexEntry>) {}

#[derive(Default)]
struct Declarations {
    functions: FxHashMap<SmolStr, u32>,
    classes: FxHashMap<SmolStr, u32>,
    enums: FxHashMap<SmolStr, u32>,
    /// class name -> (member name -> declaration offset), covering both
    /// fields and methods (spec §3 "class_decl").
    members: FxHashMap<SmolStr, FxHashMap<SmolStr, u32>>,
}

struct Indexer {
    path: Option<String>,
    decls: Declarations,
    /// Local scope stack: block/parameter declarations shadow the global
    /// tables the same way name resolution does in the analyser (spec
    /// §4.6 "the innermost binding wins").
    scopes: Vec<FxHashMap<SmolStr, u32>>,
    current_class: Vec<SmolStr>,
    entries: Vec<IndexEntry>,
}

/// `cmsl_index(handle)` (spec §6): walks the parsed AST (name resolution
/// alone — no SEMA pass is needed to index token roles) and emits one
/// entry per type/identifier/operator/call-name occurrence.
pub fn index(source: &ParsedSource) -> Vec<IndexEntry> {
    let mut indexer = Indexer {
        path: source.path.clone(),
        decls: Declarations::default(),
        scopes: vec![FxHashMap::default()],
        current_class: Vec::new(),
        entries: Vec::new(),
    };
    indexer.collect_declarations(&source.unit);
    indexer.walk_unit(&source.unit);
    indexer.entries
}

impl Indexer {
    fn collect_declarations(&mut self, unit: &TranslationUnit) {
        for item in &unit.items {
            match item {
                Item::Class(class) => {
                    self.decls.classes.insert(SmolStr::new(class.name.text()), class.name.range.begin.absolute.into());
                    let mut members = FxHashMap::default();
                    for member in &class.members {
                        match member {
                            ast::Member::Field(field) => {
                                members.insert(SmolStr::new(field.name.text()), field.name.range.begin.absolute.into());
                            }
                            ast::Member::Method(method) => {
                                members.insert(SmolStr::new(method.name.text()), method.name.range.begin.absolute.into());
                            }
                        }
                    }
                    self.decls.members.insert(SmolStr::new(class.name.text()), members);
                }
                Item::Enum(e) => {
                    self.decls.enums.insert(SmolStr::new(e.name.text()), e.name.range.begin.absolute.into());
                }
                Item::Function(f) => {
                    self.decls.functions.insert(SmolStr::new(f.name.text()), f.name.range.begin.absolute.into());
                }
            }
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare_local(&mut self, name: &str, offset: u32) {
        self.scopes.last_mut().expect("a scope is always pushed").insert(SmolStr::new(name), offset);
    }

    fn resolve_local(&self, name: &str) -> Option<u32> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    fn push_entry(&mut self, begin: u32, end: u32, destination: u32, kind: EntryKind) {
        self.entries.push(IndexEntry {
            begin,
            end,
            destination,
            kind,
            destination_path: self.path.clone(),
        });
    }

    fn walk_unit(&mut self, unit: &TranslationUnit) {
        for item in &unit.items {
            match item {
                Item::Class(class) => self.walk_class(class),
                Item::Enum(_) => {}
                Item::Function(function) => self.walk_function(function, None),
            }
        }
    }

    fn walk_class(&mut self, class: &ast::ClassDecl) {
        self.current_class.push(SmolStr::new(class.name.text()));
        for member in &class.members {
            match member {
                ast::Member::Field(field) => self.walk_type_rep(&field.ty),
                ast::Member::Method(method) => self.walk_function(method, Some(SmolStr::new(class.name.text()))),
            }
        }
        self.current_class.pop();
    }

    fn walk_function(&mut self, function: &ast::FunctionDecl, owning_class: Option<SmolStr>) {
        self.walk_type_rep(&function.return_type);
        self.push_scope();
        for param in &function.params {
            self.walk_type_rep(&param.ty);
            let begin: u32 = param.name.range.begin.absolute.into();
            let end: u32 = param.name.range.end.absolute.into();
            self.push_entry(begin, end, begin, EntryKind::ParameterDeclarationIdentifier);
            self.declare_local(param.name.text(), begin);
        }
        let _ = owning_class;
        self.walk_block(&function.body);
        self.pop_scope();
    }

    fn walk_block(&mut self, block: &ast::Block) {
        self.push_scope();
        for stmt in &block.stmts {
            self.walk_stmt(stmt);
        }
        self.pop_scope();
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDecl(decl) => {
                self.walk_type_rep(&decl.ty);
                if let Some(init) = &decl.initializer {
                    self.walk_expr(init);
                }
                let begin: u32 = decl.name.range.begin.absolute.into();
                let end: u32 = decl.name.range.end.absolute.into();
                self.push_entry(begin, end, begin, EntryKind::Identifier);
                self.declare_local(decl.name.text(), begin);
            }
            Stmt::Expr(expr) => self.walk_expr(expr),
            Stmt::Block(block) => self.walk_block(block),
            Stmt::IfElse(if_else) => {
                for (cond, body) in &if_else.arms {
                    self.walk_expr(cond);
                    self.walk_block(body);
                }
                if let Some(else_body) = &if_else.else_body {
                    self.walk_block(else_body);
                }
            }
            Stmt::While(w) => {
                self.walk_expr(&w.condition);
                self.walk_block(&w.body);
            }
            Stmt::Return(r) => {
                if let Some(value) = &r.value {
                    self.walk_expr(value);
                }
            }
        }
    }

    fn walk_type_rep(&mut self, rep: &ast::TypeRepresentation) {
        let primary = rep.primary_name();
        if !primary.kind.is_builtin_type_name() {
            let begin: u32 = primary.range.begin.absolute.into();
            let end: u32 = primary.range.end.absolute.into();
            let destination = self
                .decls
                .classes
                .get(primary.text())
                .or_else(|| self.decls.enums.get(primary.text()))
                .copied()
                .unwrap_or(begin);
            self.push_entry(begin, end, destination, EntryKind::Type);
        }
        for nested in rep.nested_types() {
            self.walk_type_rep(nested);
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Bool(_) | Expr::Int(_) | Expr::Double(_) | Expr::String(_) => {}
            Expr::Id(id_ref) => {
                let begin: u32 = id_ref.range.begin.absolute.into();
                let end: u32 = id_ref.range.end.absolute.into();
                let destination = self.resolve_local(id_ref.name.text()).unwrap_or(begin);
                self.push_entry(begin, end, destination, EntryKind::Identifier);
            }
            Expr::Unary(unary) => {
                let begin: u32 = unary.range.begin.absolute.into();
                // The synthesized unary operator spans just its `-`
                // (spec §4.1/§9): one source byte at the expression's
                // start, before its operand.
                self.push_entry(begin, begin + 1, begin, EntryKind::OperatorFunction);
                self.walk_expr(&unary.operand);
            }
            Expr::Binary(binary) => {
                self.walk_expr(&binary.lhs);
                let begin: u32 = binary.operator_token.range.begin.absolute.into();
                let end: u32 = binary.operator_token.range.end.absolute.into();
                self.push_entry(begin, end, begin, EntryKind::OperatorFunction);
                self.walk_expr(&binary.rhs);
            }
            Expr::MemberAccess(access) => {
                self.walk_expr(&access.lhs);
                let begin: u32 = access.member_name.range.begin.absolute.into();
                let end: u32 = access.member_name.range.end.absolute.into();
                let destination = self.resolve_member(access).unwrap_or(begin);
                self.push_entry(begin, end, destination, EntryKind::ClassMemberIdentifier);
            }
            Expr::FunctionCall(call) => {
                let begin: u32 = call.name.range.begin.absolute.into();
                let end: u32 = call.name.range.end.absolute.into();
                let destination = self.decls.functions.get(call.name.text()).copied().unwrap_or(begin);
                self.push_entry(begin, end, destination, EntryKind::FunctionCallName);
                for arg in &call.args {
                    self.walk_expr(arg);
                }
            }
            Expr::MemberFunctionCall(call) => {
                self.walk_expr(&call.lhs);
                let begin: u32 = call.name.range.begin.absolute.into();
                let end: u32 = call.name.range.end.absolute.into();
                self.push_entry(begin, end, begin, EntryKind::FunctionCallName);
                for arg in &call.args {
                    self.walk_expr(arg);
                }
            }
            Expr::InitializerList(list) => {
                for value in &list.values {
                    self.walk_expr(value);
                }
            }
        }
    }

    /// Best-effort: resolves a member access's destination only when the
    /// receiver is a bare identifier whose declared type we can look up
    /// locally by name (a full resolution would need the SEMA type of an
    /// arbitrary receiver expression, which the indexer intentionally
    /// avoids needing).
    fn resolve_member(&self, access: &ast::MemberAccess) -> Option<u32> {
        let Expr::Id(_) = access.lhs.as_ref() else { return None };
        self.decls.members.values().find_map(|members| members.get(access.member_name.text()).copied())
    }
}
