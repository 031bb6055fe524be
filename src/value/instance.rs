//! `instance_value` (spec §3): the tagged union a [`super::Cell`] stores.
//!
//! Grounded on `instance_value_variant.cpp`'s variant-of-fundamentals plus
//! a `generic_instance_value` case for containers; `list`'s elements and a
//! class instance's fields are stored as [`super::CellId`]s rather than
//! nested owned values so that `list.at(i)`/`Foo.field` can hand back a
//! genuine reference into the element/field's own storage (spec §4.7
//! "Member access on an owning instance produces an `instance_reference`
//! into the owner").

use indexmap::IndexMap;
use smol_str::SmolStr;
use std::rc::Rc;

use super::arena::CellId;
use crate::sema::types::{ClassType, SemaType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionValue {
    pub major: i64,
    pub minor: i64,
    pub patch: i64,
    pub tweak: i64,
}

impl VersionValue {
    pub fn to_display_string(&self) -> String {
        if self.tweak != 0 {
            format!("{}.{}.{}.{}", self.major, self.minor, self.patch, self.tweak)
        } else {
            format!("{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

#[derive(Debug, Clone)]
pub enum InstanceValue {
    Void,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Version(VersionValue),
    List {
        element_ty: SemaType,
        elements: Vec<CellId>,
    },
    Class {
        ty: Rc<ClassType>,
        fields: IndexMap<SmolStr, CellId>,
    },
    /// `project`/`library`/`executable` each wrap just a name (spec §3).
    Project {
        name: String,
    },
    Library {
        name: String,
    },
    Executable {
        name: String,
    },
}

impl InstanceValue {
    pub fn as_bool(&self) -> bool {
        match self {
            InstanceValue::Bool(b) => *b,
            InstanceValue::Int(i) => *i != 0,
            other => panic!("as_bool() called on non-boolean-convertible value: {other:?}"),
        }
    }

    pub fn as_int(&self) -> i64 {
        match self {
            InstanceValue::Int(i) => *i,
            InstanceValue::Bool(b) => i64::from(*b),
            InstanceValue::Double(d) => *d as i64,
            other => panic!("as_int() called on non-numeric value: {other:?}"),
        }
    }

    pub fn as_double(&self) -> f64 {
        match self {
            InstanceValue::Double(d) => *d,
            InstanceValue::Int(i) => *i as f64,
            other => panic!("as_double() called on non-numeric value: {other:?}"),
        }
    }

    pub fn as_string(&self) -> &str {
        match self {
            InstanceValue::String(s) => s,
            other => panic!("as_string() called on a non-string value: {other:?}"),
        }
    }

    pub fn as_string_mut(&mut self) -> &mut String {
        match self {
            InstanceValue::String(s) => s,
            other => panic!("as_string_mut() called on a non-string value: {other:?}"),
        }
    }

    pub fn as_version(&self) -> VersionValue {
        match self {
            InstanceValue::Version(v) => *v,
            other => panic!("as_version() called on a non-version value: {other:?}"),
        }
    }

    pub fn as_list_elements(&self) -> &[CellId] {
        match self {
            InstanceValue::List { elements, .. } => elements,
            other => panic!("as_list_elements() called on a non-list value: {other:?}"),
        }
    }

    pub fn as_list_elements_mut(&mut self) -> &mut Vec<CellId> {
        match self {
            InstanceValue::List { elements, .. } => elements,
            other => panic!("as_list_elements_mut() called on a non-list value: {other:?}"),
        }
    }

    pub fn target_name(&self) -> &str {
        match self {
            InstanceValue::Project { name } | InstanceValue::Library { name } | InstanceValue::Executable { name } => name,
            other => panic!("target_name() called on a value with no name: {other:?}"),
        }
    }

    /// Default-constructed value for a resolved type (spec §4.3 default
    /// constructors, and variable declarations with no initializer).
    pub fn default_for(ty: &SemaType) -> InstanceValue {
        use crate::sema::types::Fundamental;
        match ty.dereferenced() {
            SemaType::Fundamental(Fundamental::Void) => InstanceValue::Void,
            SemaType::Fundamental(Fundamental::Bool) => InstanceValue::Bool(false),
            SemaType::Fundamental(Fundamental::Int) => InstanceValue::Int(0),
            SemaType::Fundamental(Fundamental::Double) => InstanceValue::Double(0.0),
            SemaType::Fundamental(Fundamental::String) => InstanceValue::String(String::new()),
            SemaType::Fundamental(Fundamental::Version) => InstanceValue::Version(VersionValue::default()),
            SemaType::Fundamental(Fundamental::Project) => InstanceValue::Project { name: String::new() },
            SemaType::Fundamental(Fundamental::Library) => InstanceValue::Library { name: String::new() },
            SemaType::Fundamental(Fundamental::Executable) => InstanceValue::Executable { name: String::new() },
            SemaType::List(element) => InstanceValue::List {
                element_ty: (**element).clone(),
                elements: Vec::new(),
            },
            SemaType::Class(class) => InstanceValue::Class {
                ty: Rc::clone(class),
                fields: IndexMap::new(),
            },
            SemaType::Enum(_) => InstanceValue::Int(0),
            SemaType::Reference(_) => unreachable!("dereferenced() never yields a Reference"),
        }
    }
}
