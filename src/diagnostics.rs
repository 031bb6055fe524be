//! The error observer and diagnostic taxonomy (spec §4.8, §7).
//!
//! Grounded on `syster-base::parser::errors`: categorized error codes,
//! severity, an optional hint, and a builder — generalized here from
//! parse-only errors to the full Lex/Parse/Resolve/Overload/Type/Runtime
//! taxonomy the spec requires, and routed through a single
//! `notify_error` sink (the diagnostics themselves carry their own phase
//! tag instead of being split across per-phase observer methods).

use crate::base::SourceRange;
use std::cell::RefCell;
use std::fmt;

/// Coarse phase a diagnostic originated from. Lets downstream consumers
/// group/filter without string-matching the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lex,
    Parse,
    Resolve,
    Overload,
    Type,
    Runtime,
}

/// Severity level for a diagnostic. Only [`Severity::Fatal`] aborts
/// evaluation (spec §7 "Propagation").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Fatal => "fatal error",
        }
    }
}

/// A single categorized diagnostic with a source range (spec §7).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{severity}: {message}")]
pub struct Diagnostic {
    pub phase: Phase,
    pub severity: Severity,
    pub message: String,
    pub range: SourceRange,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Lex => "lex",
            Phase::Parse => "parse",
            Phase::Resolve => "resolve",
            Phase::Overload => "overload",
            Phase::Type => "type",
            Phase::Runtime => "runtime",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Diagnostic {
    pub fn new(phase: Phase, severity: Severity, message: impl Into<String>, range: SourceRange) -> Self {
        Self {
            phase,
            severity,
            message: message.into(),
            range,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.severity, Severity::Fatal)
    }
}

/// `errors_observer::notify_error` (spec §4.8): a single sink, never throws.
/// Implementations aggregate, print, or discard. Not thread-safe (spec §5).
pub trait ErrorsObserver {
    fn notify_error(&self, diagnostic: Diagnostic);

    /// Convenience: true once any *fatal* diagnostic has been reported.
    /// The evaluator polls this before each statement (spec §4.7, §5).
    fn did_fatal_error_occur(&self) -> bool;
}

/// The observer used by [`crate::execute`]: collects every diagnostic in
/// order so a single run can surface multiple errors (spec §7
/// "Propagation"), and tracks the sticky fatal flag.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    diagnostics: RefCell<Vec<Diagnostic>>,
    fatal: RefCell<bool>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

impl ErrorsObserver for CollectingObserver {
    fn notify_error(&self, diagnostic: Diagnostic) {
        if diagnostic.is_fatal() {
            *self.fatal.borrow_mut() = true;
        }
        tracing::event!(
            target: "cmsl::diagnostics",
            tracing::Level::WARN,
            phase = %diagnostic.phase,
            severity = %diagnostic.severity,
            message = %diagnostic.message,
        );
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    fn did_fatal_error_occur(&self) -> bool {
        *self.fatal.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;

    fn range() -> SourceRange {
        SourceRange::empty(Position::start())
    }

    #[test]
    fn fatal_diagnostic_sets_sticky_flag() {
        let observer = CollectingObserver::new();
        assert!(!observer.did_fatal_error_occur());
        observer.notify_error(Diagnostic::new(Phase::Runtime, Severity::Fatal, "missing main", range()));
        assert!(observer.did_fatal_error_occur());
    }

    #[test]
    fn non_fatal_diagnostics_accumulate() {
        let observer = CollectingObserver::new();
        observer.notify_error(Diagnostic::new(Phase::Lex, Severity::Error, "bad byte", range()));
        observer.notify_error(Diagnostic::new(Phase::Parse, Severity::Error, "missing ;", range()));
        assert_eq!(observer.diagnostics().len(), 2);
        assert!(!observer.did_fatal_error_occur());
    }
}
