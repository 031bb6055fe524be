//! Builtin dispatch (spec §4.3, §4.7 "Built-in dispatch"): one `match` per
//! [`BuiltinFunctionKind`], replacing the original's per-operation visitor
//! structs (`size_visitor`, `empty_visitor`, `push_back_visitor`, ...)
//! with exhaustive arms over [`InstanceValue`] — the "missing default"
//! class of bug those visitors had (spec §9) cannot occur here: every
//! variant not meaningful for a given builtin simply never type-checked
//! past the semantic analyser, and the arms that do run are total over
//! the shapes the catalog actually produces for that type.

use crate::base::SourceRange;
use crate::facade::Visibility;
use crate::sema::builtin::BuiltinFunctionKind;
use crate::sema::types::SemaType;
use crate::value::{CellId, InstanceValue, Value, VersionValue};

use super::Evaluator;

impl<'a> Evaluator<'a> {
    pub(super) fn call_builtin(&mut self, kind: BuiltinFunctionKind, receiver: Option<Value>, args: Vec<Value>, range: SourceRange) -> Value {
        use BuiltinFunctionKind::*;

        let void = || Value::Owned(InstanceValue::Void, SemaType::void());

        match kind {
            CmakeMinimumRequired => {
                let version = args[0].read(&self.arena).as_version();
                self.facade.set_property("CMAKE_MINIMUM_REQUIRED_VERSION", &version.to_display_string());
                void()
            }
            Message => {
                self.facade.message(args[0].read(&self.arena).as_string());
                void()
            }
            Warning => {
                self.facade.warning(args[0].read(&self.arena).as_string());
                void()
            }
            Error => {
                self.facade.error(args[0].read(&self.arena).as_string());
                void()
            }
            FatalError => {
                self.facade.fatal_error(args[0].read(&self.arena).as_string());
                void()
            }

            BoolCtor => Value::Owned(InstanceValue::Bool(false), SemaType::bool()),
            BoolCtorCopy => Value::Owned(InstanceValue::Bool(args[0].read(&self.arena).as_bool()), SemaType::bool()),
            BoolCtorFromInt => Value::Owned(InstanceValue::Bool(args[0].read(&self.arena).as_int() != 0), SemaType::bool()),
            IntCtor => Value::Owned(InstanceValue::Int(0), SemaType::int()),
            IntCtorCopy => Value::Owned(InstanceValue::Int(args[0].read(&self.arena).as_int()), SemaType::int()),
            IntCtorFromBool => Value::Owned(InstanceValue::Int(i64::from(args[0].read(&self.arena).as_bool())), SemaType::int()),
            IntCtorFromDouble => Value::Owned(InstanceValue::Int(args[0].read(&self.arena).as_double() as i64), SemaType::int()),
            DoubleCtor => Value::Owned(InstanceValue::Double(0.0), SemaType::double()),
            DoubleCtorCopy => Value::Owned(InstanceValue::Double(args[0].read(&self.arena).as_double()), SemaType::double()),
            DoubleCtorFromInt => Value::Owned(InstanceValue::Double(args[0].read(&self.arena).as_int() as f64), SemaType::double()),
            StringCtor => Value::Owned(InstanceValue::String(String::new()), SemaType::string()),
            StringCtorCopy => Value::Owned(InstanceValue::String(args[0].read(&self.arena).as_string().to_string()), SemaType::string()),
            VersionCtor3 => Value::Owned(
                InstanceValue::Version(VersionValue {
                    major: args[0].read(&self.arena).as_int(),
                    minor: args[1].read(&self.arena).as_int(),
                    patch: args[2].read(&self.arena).as_int(),
                    tweak: 0,
                }),
                SemaType::version_bare(),
            ),
            VersionCtor4 => Value::Owned(
                InstanceValue::Version(VersionValue {
                    major: args[0].read(&self.arena).as_int(),
                    minor: args[1].read(&self.arena).as_int(),
                    patch: args[2].read(&self.arena).as_int(),
                    tweak: args[3].read(&self.arena).as_int(),
                }),
                SemaType::version_bare(),
            ),
            ProjectCtorName => {
                let name = args[0].read(&self.arena).as_string().to_string();
                self.facade.register_project(&name);
                Value::Owned(InstanceValue::Project { name }, SemaType::project_bare())
            }

            StringSize => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Int(self.arena.get(cell).as_string().len() as i64), SemaType::int())
            }
            StringEmpty => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Bool(self.arena.get(cell).as_string().is_empty()), SemaType::bool())
            }
            StringAt => {
                let cell = self.receiver_cell(receiver);
                let index = args[0].read(&self.arena).as_int();
                let bytes = self.arena.get(cell).as_string().as_bytes();
                match usize::try_from(index).ok().and_then(|i| bytes.get(i)) {
                    Some(b) => Value::Owned(InstanceValue::String((*b as char).to_string()), SemaType::string()),
                    None => {
                        self.fatal(format!("string index {index} out of range"), range);
                        Value::Owned(InstanceValue::String(String::new()), SemaType::string())
                    }
                }
            }
            StringSubstr => {
                let cell = self.receiver_cell(receiver);
                let pos = args[0].read(&self.arena).as_int();
                let count = args[1].read(&self.arena).as_int();
                let s = self.arena.get(cell).as_string().to_string();
                let result = substr(&s, pos, count, self, range);
                Value::Owned(InstanceValue::String(result), SemaType::string())
            }
            StringFind => {
                let cell = self.receiver_cell(receiver);
                let needle = args[0].read(&self.arena).as_string().to_string();
                let haystack = self.arena.get(cell).as_string().to_string();
                let pos = haystack.find(&needle).map(|i| i as i64).unwrap_or(-1);
                Value::Owned(InstanceValue::Int(pos), SemaType::int())
            }
            StringFindNotOf => {
                let cell = self.receiver_cell(receiver);
                let needle = args[0].read(&self.arena).as_string().to_string();
                let haystack = self.arena.get(cell).as_string().to_string();
                let pos = haystack
                    .bytes()
                    .position(|b| !needle.as_bytes().contains(&b))
                    .map(|i| i as i64)
                    .unwrap_or(-1);
                Value::Owned(InstanceValue::Int(pos), SemaType::int())
            }
            StringFindLast => {
                let cell = self.receiver_cell(receiver);
                let needle = args[0].read(&self.arena).as_string().to_string();
                let haystack = self.arena.get(cell).as_string().to_string();
                let pos = haystack.rfind(&needle).map(|i| i as i64).unwrap_or(-1);
                Value::Owned(InstanceValue::Int(pos), SemaType::int())
            }
            StringFindLastNotOf => {
                let cell = self.receiver_cell(receiver);
                let needle = args[0].read(&self.arena).as_string().to_string();
                let haystack = self.arena.get(cell).as_string().to_string();
                let pos = haystack
                    .bytes()
                    .rposition(|b| !needle.as_bytes().contains(&b))
                    .map(|i| i as i64)
                    .unwrap_or(-1);
                Value::Owned(InstanceValue::Int(pos), SemaType::int())
            }
            StringContains => {
                let cell = self.receiver_cell(receiver);
                let needle = args[0].read(&self.arena).as_string().to_string();
                Value::Owned(InstanceValue::Bool(self.arena.get(cell).as_string().contains(&needle)), SemaType::bool())
            }
            StringStartsWith => {
                let cell = self.receiver_cell(receiver);
                let needle = args[0].read(&self.arena).as_string().to_string();
                Value::Owned(InstanceValue::Bool(self.arena.get(cell).as_string().starts_with(&needle)), SemaType::bool())
            }
            StringEndsWith => {
                let cell = self.receiver_cell(receiver);
                let needle = args[0].read(&self.arena).as_string().to_string();
                Value::Owned(InstanceValue::Bool(self.arena.get(cell).as_string().ends_with(&needle)), SemaType::bool())
            }
            StringInsert => {
                let cell = self.receiver_cell(receiver);
                let position = args[0].read(&self.arena).as_int();
                let text = args[1].read(&self.arena).as_string().to_string();
                let s = self.arena.get_mut(cell).as_string_mut();
                match byte_index(s, position) {
                    Some(idx) => s.insert_str(idx, &text),
                    None => self.fatal(format!("string insert position {position} out of range"), range),
                }
                Value::Ref(cell)
            }
            StringErase => {
                let cell = self.receiver_cell(receiver);
                let position = args[0].read(&self.arena).as_int();
                let s = self.arena.get_mut(cell).as_string_mut();
                match byte_index(s, position) {
                    Some(idx) if idx < s.len() => {
                        s.remove(idx);
                    }
                    _ => self.fatal(format!("string erase position {position} out of range"), range),
                }
                Value::Ref(cell)
            }
            StringReplace => {
                let cell = self.receiver_cell(receiver);
                let pos = args[0].read(&self.arena).as_int();
                let count = args[1].read(&self.arena).as_int();
                let text = args[2].read(&self.arena).as_string().to_string();
                let current = self.arena.get(cell).as_string().to_string();
                match replace_range(&current, pos, count, &text) {
                    Some(result) => *self.arena.get_mut(cell).as_string_mut() = result,
                    None => self.fatal(format!("string replace position {pos} out of range"), range),
                }
                Value::Ref(cell)
            }
            StringResize => {
                let cell = self.receiver_cell(receiver);
                let new_size = args[0].read(&self.arena).as_int().max(0) as usize;
                let s = self.arena.get_mut(cell).as_string_mut();
                if new_size <= s.len() {
                    s.truncate(new_size);
                } else {
                    s.extend(std::iter::repeat('\0').take(new_size - s.len()));
                }
                void()
            }
            StringLower => {
                let cell = self.receiver_cell(receiver);
                let s = self.arena.get_mut(cell).as_string_mut();
                *s = s.to_lowercase();
                void()
            }
            StringMakeLower => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::String(self.arena.get(cell).as_string().to_lowercase()), SemaType::string())
            }
            StringUpper => {
                let cell = self.receiver_cell(receiver);
                let s = self.arena.get_mut(cell).as_string_mut();
                *s = s.to_uppercase();
                void()
            }
            StringMakeUpper => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::String(self.arena.get(cell).as_string().to_uppercase()), SemaType::string())
            }
            StringClear => {
                let cell = self.receiver_cell(receiver);
                self.arena.get_mut(cell).as_string_mut().clear();
                void()
            }
            StringAppend => {
                let cell = self.receiver_cell(receiver);
                let other = args[0].read(&self.arena).as_string().to_string();
                self.arena.get_mut(cell).as_string_mut().push_str(&other);
                Value::Ref(cell)
            }

            ListSize => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Int(self.arena.get(cell).as_list_elements().len() as i64), SemaType::int())
            }
            ListEmpty => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Bool(self.arena.get(cell).as_list_elements().is_empty()), SemaType::bool())
            }
            ListAt => {
                let cell = self.receiver_cell(receiver);
                let index = args[0].read(&self.arena).as_int();
                match list_index(self.arena.get(cell).as_list_elements(), index) {
                    Some(element) => Value::Ref(element),
                    None => {
                        self.fatal(format!("list index {index} out of range"), range);
                        void()
                    }
                }
            }
            ListFront => {
                let cell = self.receiver_cell(receiver);
                match self.arena.get(cell).as_list_elements().first().copied() {
                    Some(element) => Value::Ref(element),
                    None => {
                        self.fatal("front() called on an empty list", range);
                        void()
                    }
                }
            }
            ListBack => {
                let cell = self.receiver_cell(receiver);
                match self.arena.get(cell).as_list_elements().last().copied() {
                    Some(element) => Value::Ref(element),
                    None => {
                        self.fatal("back() called on an empty list", range);
                        void()
                    }
                }
            }
            ListPushBack => {
                let cell = self.receiver_cell(receiver);
                let element_ty = self.arena.ty(cell).list_element().cloned().unwrap_or_else(SemaType::void);
                let value = args[0].read(&self.arena);
                let element_cell = self.arena.alloc(value, element_ty);
                self.arena.get_mut(cell).as_list_elements_mut().push(element_cell);
                void()
            }
            ListPopBack => {
                let cell = self.receiver_cell(receiver);
                if self.arena.get_mut(cell).as_list_elements_mut().pop().is_none() {
                    self.fatal("pop_back() called on an empty list", range);
                }
                void()
            }
            ListInsert => {
                let cell = self.receiver_cell(receiver);
                let index = args[0].read(&self.arena).as_int();
                let element_ty = self.arena.ty(cell).list_element().cloned().unwrap_or_else(SemaType::void);
                let value = args[1].read(&self.arena);
                let element_cell = self.arena.alloc(value, element_ty);
                let elements = self.arena.get_mut(cell).as_list_elements_mut();
                match usize::try_from(index).ok().filter(|i| *i <= elements.len()) {
                    Some(i) => elements.insert(i, element_cell),
                    None => self.fatal(format!("list insert index {index} out of range"), range),
                }
                void()
            }
            ListErase => {
                let cell = self.receiver_cell(receiver);
                let index = args[0].read(&self.arena).as_int();
                let elements = self.arena.get_mut(cell).as_list_elements_mut();
                match usize::try_from(index).ok().filter(|i| *i < elements.len()) {
                    Some(i) => {
                        elements.remove(i);
                    }
                    None => self.fatal(format!("list erase index {index} out of range"), range),
                }
                void()
            }
            ListClear => {
                let cell = self.receiver_cell(receiver);
                self.arena.get_mut(cell).as_list_elements_mut().clear();
                void()
            }

            VersionMajor => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Int(self.arena.get(cell).as_version().major), SemaType::int())
            }
            VersionMinor => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Int(self.arena.get(cell).as_version().minor), SemaType::int())
            }
            VersionPatch => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Int(self.arena.get(cell).as_version().patch), SemaType::int())
            }
            VersionTweak => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::Int(self.arena.get(cell).as_version().tweak), SemaType::int())
            }
            VersionToString => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::String(self.arena.get(cell).as_version().to_display_string()), SemaType::string())
            }

            ProjectName => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::String(self.arena.get(cell).target_name().to_string()), SemaType::string())
            }
            ProjectAddExecutable => {
                let name = args[0].read(&self.arena).as_string().to_string();
                let sources = self.string_list(&args[1]);
                self.facade.add_executable(&name, &sources);
                Value::Owned(InstanceValue::Executable { name }, SemaType::executable_bare())
            }
            ProjectAddLibrary => {
                let name = args[0].read(&self.arena).as_string().to_string();
                let sources = self.string_list(&args[1]);
                self.facade.add_library(&name, &sources);
                Value::Owned(InstanceValue::Library { name }, SemaType::library_bare())
            }

            TargetName => {
                let cell = self.receiver_cell(receiver);
                Value::Owned(InstanceValue::String(self.arena.get(cell).target_name().to_string()), SemaType::string())
            }
            TargetLinkLibrary => {
                let cell = self.receiver_cell(receiver);
                let this_name = self.arena.get(cell).target_name().to_string();
                let other_name = args[0].read(&self.arena).target_name().to_string();
                self.facade.target_link_library(&this_name, Visibility::Public, &other_name);
                void()
            }
            TargetIncludeDirectories => {
                let cell = self.receiver_cell(receiver);
                let this_name = self.arena.get(cell).target_name().to_string();
                let dirs = self.string_list(&args[0]);
                self.facade.target_include_directories(&this_name, Visibility::Public, &dirs);
                void()
            }
            TargetCompileDefinitions => {
                let cell = self.receiver_cell(receiver);
                let this_name = self.arena.get(cell).target_name().to_string();
                let defs = self.string_list(&args[0]);
                self.facade.target_compile_definitions(&this_name, &defs, Visibility::Public);
                void()
            }
        }
    }

    /// Materializes a receiver into an arena cell (spec §4.7 "Member
    /// access on an owning instance produces an `instance_reference` into
    /// the owner" — a call on a temporary still needs a cell to dispatch
    /// a mutating/reference-returning builtin against).
    pub(super) fn receiver_cell(&mut self, receiver: Option<Value>) -> CellId {
        let receiver = receiver.expect("a method/operator builtin call always carries a receiver");
        match receiver.as_cell() {
            Some(cell) => cell,
            None => {
                let ty = receiver.ty(&self.arena);
                let value = receiver.read(&self.arena);
                self.arena.alloc(value, ty)
            }
        }
    }

    fn string_list(&self, value: &Value) -> Vec<String> {
        value
            .read(&self.arena)
            .as_list_elements()
            .iter()
            .map(|&cell| self.arena.get(cell).as_string().to_string())
            .collect()
    }
}

fn list_index(elements: &[CellId], index: i64) -> Option<CellId> {
    usize::try_from(index).ok().and_then(|i| elements.get(i)).copied()
}

fn byte_index(s: &str, position: i64) -> Option<usize> {
    usize::try_from(position).ok().filter(|i| *i <= s.len())
}

fn substr(s: &str, pos: i64, count: i64, eval: &mut Evaluator<'_>, range: SourceRange) -> String {
    let Some(start) = byte_index(s, pos) else {
        eval.fatal(format!("substr position {pos} out of range"), range);
        return String::new();
    };
    let end = if count < 0 {
        s.len()
    } else {
        (start + count as usize).min(s.len())
    };
    s[start..end].to_string()
}

fn replace_range(s: &str, pos: i64, count: i64, text: &str) -> Option<String> {
    let start = usize::try_from(pos).ok().filter(|i| *i <= s.len())?;
    let end = if count < 0 { s.len() } else { (start + count as usize).min(s.len()) };
    let mut result = String::with_capacity(s.len() - (end - start) + text.len());
    result.push_str(&s[..start]);
    result.push_str(text);
    result.push_str(&s[end..]);
    Some(result)
}
