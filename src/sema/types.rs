//! Resolved types (spec §4.4 "sema_type"), as opposed to the AST's textual
//! [`crate::ast::TypeRepresentation`].
//!
//! Grounded on `builtin_sema_context.cpp`'s type table: a fixed set of
//! fundamental builtin types, user classes (each with a flat member/method
//! table), and one homogeneous generic, `list<T>`, keyed by its element
//! type rather than getting its own class declaration per instantiation.

use indexmap::IndexMap;
use smol_str::SmolStr;
use std::cell::RefCell;
use std::rc::Rc;

use super::function::SemaFunction;

/// The builtin scalar and domain types (spec §3 `instance_value`'s
/// non-list, non-reference cases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fundamental {
    Void,
    Bool,
    Int,
    Double,
    String,
    Version,
    Project,
    Library,
    Executable,
}

impl Fundamental {
    pub fn name(self) -> &'static str {
        match self {
            Fundamental::Void => "void",
            Fundamental::Bool => "bool",
            Fundamental::Int => "int",
            Fundamental::Double => "double",
            Fundamental::String => "string",
            Fundamental::Version => "version",
            Fundamental::Project => "project",
            Fundamental::Library => "library",
            Fundamental::Executable => "executable",
        }
    }
}

/// A user-declared `class` (spec §4.4): a flat, declaration-order member
/// table plus its methods. One [`ClassType`] per `class` statement;
/// equality between [`SemaType::Class`] values is by identity (`Rc::ptr_eq`)
/// so two classes that happen to share a name are still distinct types.
#[derive(Debug)]
pub struct ClassType {
    pub name: SmolStr,
    pub members: IndexMap<SmolStr, SemaType>,
    /// Filled in after every class header in the unit has been seen, so a
    /// method can mention any sibling class declared anywhere in the file
    /// (spec §4.4 "declarations first").
    pub methods: RefCell<Vec<Rc<SemaFunction>>>,
}

/// A user-declared `enum` (spec §3 AST node `enum_decl`): a fixed, ordered
/// set of enumerator names, each evaluating to its declaration-order
/// ordinal as an `int` (spec gives no richer enum value model, so ordinals
/// are the simplest faithful semantics).
#[derive(Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: SmolStr,
    pub enumerators: Vec<SmolStr>,
}

impl EnumType {
    pub fn ordinal_of(&self, name: &str) -> Option<i64> {
        self.enumerators.iter().position(|e| e == name).map(|i| i as i64)
    }
}

/// A resolved type. `Reference` wraps any other variant to mark it as an
/// alias into an existing [`crate::value::Instance`] rather than an owned
/// value (spec §3 `instance`, §4.5 "Reference-taking").
#[derive(Debug, Clone)]
pub enum SemaType {
    Fundamental(Fundamental),
    Class(Rc<ClassType>),
    Enum(Rc<EnumType>),
    List(Box<SemaType>),
    Reference(Box<SemaType>),
}

impl ClassType {
    pub fn find_method(&self, name: &str) -> Option<Rc<SemaFunction>> {
        self.methods.borrow().iter().find(|f| f.signature.name == name).cloned()
    }

    pub fn methods(&self) -> Vec<Rc<SemaFunction>> {
        self.methods.borrow().clone()
    }
}

impl SemaType {
    pub fn void() -> Self {
        SemaType::Fundamental(Fundamental::Void)
    }

    pub fn bool() -> Self {
        SemaType::Fundamental(Fundamental::Bool)
    }

    pub fn int() -> Self {
        SemaType::Fundamental(Fundamental::Int)
    }

    pub fn double() -> Self {
        SemaType::Fundamental(Fundamental::Double)
    }

    pub fn string() -> Self {
        SemaType::Fundamental(Fundamental::String)
    }

    pub fn version_bare() -> Self {
        SemaType::Fundamental(Fundamental::Version)
    }

    pub fn project_bare() -> Self {
        SemaType::Fundamental(Fundamental::Project)
    }

    pub fn library_bare() -> Self {
        SemaType::Fundamental(Fundamental::Library)
    }

    pub fn executable_bare() -> Self {
        SemaType::Fundamental(Fundamental::Executable)
    }

    pub fn list_of(element: SemaType) -> Self {
        SemaType::List(Box::new(element))
    }

    pub fn as_reference(&self) -> Self {
        match self {
            SemaType::Reference(_) => self.clone(),
            other => SemaType::Reference(Box::new(other.clone())),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, SemaType::Reference(_))
    }

    /// Strip one level of `Reference`, if present — the type an expression
    /// of this type can be *used as* once dereferenced.
    pub fn dereferenced(&self) -> &SemaType {
        match self {
            SemaType::Reference(inner) => inner,
            other => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.dereferenced(), SemaType::List(_))
    }

    pub fn list_element(&self) -> Option<&SemaType> {
        match self.dereferenced() {
            SemaType::List(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn class(&self) -> Option<&Rc<ClassType>> {
        match self.dereferenced() {
            SemaType::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn enum_type(&self) -> Option<&Rc<EnumType>> {
        match self.dereferenced() {
            SemaType::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn fundamental(&self) -> Option<Fundamental> {
        match self.dereferenced() {
            SemaType::Fundamental(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.fundamental(), Some(Fundamental::Int | Fundamental::Double))
    }

    pub fn name(&self) -> String {
        match self {
            SemaType::Fundamental(f) => f.name().to_string(),
            SemaType::Class(c) => c.name.to_string(),
            SemaType::Enum(e) => e.name.to_string(),
            SemaType::List(elem) => format!("list<{}>", elem.name()),
            SemaType::Reference(inner) => format!("{}&", inner.name()),
        }
    }
}

impl PartialEq for SemaType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SemaType::Fundamental(a), SemaType::Fundamental(b)) => a == b,
            (SemaType::Class(a), SemaType::Class(b)) => Rc::ptr_eq(a, b),
            (SemaType::Enum(a), SemaType::Enum(b)) => Rc::ptr_eq(a, b),
            (SemaType::List(a), SemaType::List(b)) => a == b,
            (SemaType::Reference(a), SemaType::Reference(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for SemaType {}
