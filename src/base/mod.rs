//! Foundation types shared by every later pipeline stage.
//!
//! Mirrors the teacher's `base` module: small, dependency-free primitives
//! that the lexer, parser and semantic analyser all build on.

mod position;
mod source;

pub use position::{Position, SourceRange};
pub use source::SourceFile;
