//! Tags the evaluator switches on to dispatch a builtin call (spec §4.3).
//!
//! Arithmetic/comparison/logical operators on fundamentals are handled
//! directly by [`crate::eval`] from the operator token rather than routed
//! through this enum — it exists for explicit calls: constructors, dot-call
//! methods (`xs.size()`, `v.push_back(x)`, `lib.link_to(...)`), and the
//! builtin free functions.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunctionKind {
    CmakeMinimumRequired,
    Message,
    Warning,
    Error,
    FatalError,

    BoolCtor,
    BoolCtorCopy,
    BoolCtorFromInt,
    IntCtor,
    IntCtorCopy,
    IntCtorFromBool,
    IntCtorFromDouble,
    DoubleCtor,
    DoubleCtorCopy,
    DoubleCtorFromInt,
    StringCtor,
    StringCtorCopy,
    VersionCtor3,
    VersionCtor4,
    ProjectCtorName,

    StringSize,
    StringEmpty,
    StringAt,
    StringSubstr,
    StringFind,
    StringFindNotOf,
    StringFindLast,
    StringFindLastNotOf,
    StringContains,
    StringStartsWith,
    StringEndsWith,
    StringInsert,
    StringErase,
    StringReplace,
    StringResize,
    StringLower,
    StringMakeLower,
    StringUpper,
    StringMakeUpper,
    StringClear,
    StringAppend,

    ListSize,
    ListEmpty,
    ListAt,
    ListFront,
    ListBack,
    ListPushBack,
    ListPopBack,
    ListInsert,
    ListErase,
    ListClear,

    VersionMajor,
    VersionMinor,
    VersionPatch,
    VersionTweak,
    VersionToString,

    ProjectName,
    ProjectAddExecutable,
    ProjectAddLibrary,

    TargetName,
    TargetLinkLibrary,
    TargetIncludeDirectories,
    TargetCompileDefinitions,
}
