//! Token cursor, expectation helpers, and structural error recovery.
//!
//! Grounded on `syster-base::parser::parser::Parser`'s `current`/`at`/`bump`/
//! `expect`/`error_recover` family, generalized from building a rowan green
//! tree to building the owned [`crate::ast`] nodes directly — there is no
//! CST here, so `bump` just advances the cursor and returns the consumed
//! token instead of feeding a tree builder.

use crate::ast::TypeRepresentation;
use crate::base::SourceRange;
use crate::diagnostics::{Diagnostic, ErrorsObserver, Phase, Severity};
use crate::lexer::{Token, TokenKind};
use rustc_hash::FxHashSet;

pub(super) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    observer: &'a dyn ErrorsObserver,
    /// Names of `class`/`enum` declarations seen anywhere at the top level,
    /// pre-scanned before the real parse so `variable_decl` can be told
    /// apart from a bare expression statement (spec §4.2 "ast_context").
    pub(super) declared_types: FxHashSet<String>,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(tokens: &'a [Token], observer: &'a dyn ErrorsObserver) -> Self {
        let declared_types = prescan_declared_types(tokens);
        Self {
            tokens,
            pos: 0,
            observer,
            declared_types,
        }
    }

    pub(super) fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(super) fn current_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Undef)
    }

    pub(super) fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens.get(self.pos + n).map(|t| t.kind).unwrap_or(TokenKind::Undef)
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(super) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn current_range(&self) -> SourceRange {
        self.current()
            .map(|t| t.range)
            .or_else(|| self.tokens.last().map(|t| t.range))
            .unwrap_or_else(|| SourceRange::empty(crate::base::Position::start()))
    }

    /// Consume and return the current token unconditionally.
    pub(super) fn bump(&mut self) -> Token {
        let token = self
            .current()
            .cloned()
            .unwrap_or_else(|| Token::synthetic(TokenKind::Undef, ""));
        self.pos += 1;
        token
    }

    /// Consume the current token if it matches `kind`.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    /// Consume the current token if it matches `kind`, otherwise report a
    /// parse diagnostic and synthesize a placeholder so callers can keep
    /// building a node rather than unwinding the whole parse.
    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if let Some(tok) = self.eat(kind) {
            return tok;
        }
        let found = self
            .current()
            .map(|t| format!("'{}'", t.text()))
            .unwrap_or_else(|| "end of input".to_string());
        self.error(format!("expected {what}, found {found}"));
        Token::synthetic(kind, "")
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.observer.notify_error(Diagnostic::new(
            Phase::Parse,
            Severity::Error,
            message,
            self.current_range(),
        ));
    }

    /// Resynchronize at the next `;` or `}` (spec §4.2), consuming the
    /// delimiter itself when it's a semicolon so the caller resumes right
    /// after the broken statement.
    pub(super) fn recover_to_statement_boundary(&mut self) {
        while !self.at_eof() && !self.at(TokenKind::Semicolon) && !self.at(TokenKind::RBrace) {
            self.bump();
        }
        if self.at(TokenKind::Semicolon) {
            self.bump();
        }
    }

    pub(super) fn is_type_start(&self) -> bool {
        if self.current_kind().is_builtin_type_name() {
            return true;
        }
        matches!(self.current(), Some(t) if t.kind == TokenKind::Identifier && self.declared_types.contains(t.text()))
    }

    /// `type_representation := id ('<' type_representation (',' type_representation)* '>')?`
    /// (spec §4.2), with the `list<T>` spelling being the only generic form
    /// the builtin catalog actually instantiates (spec §4.3).
    pub(super) fn parse_type(&mut self) -> TypeRepresentation {
        let mut tokens = Vec::new();
        if self.current_kind().is_builtin_type_name() || self.at(TokenKind::Identifier) {
            tokens.push(self.bump());
        } else {
            self.error("expected a type name");
            tokens.push(Token::synthetic(TokenKind::Identifier, "<error>"));
        }

        let mut nested = Vec::new();
        if self.at(TokenKind::Less) {
            self.bump();
            nested.push(self.parse_type());
            while self.eat(TokenKind::Comma).is_some() {
                nested.push(self.parse_type());
            }
            self.expect(TokenKind::Greater, "'>' to close the generic argument list");
        }

        TypeRepresentation::new(tokens, nested, false)
    }
}

fn prescan_declared_types(tokens: &[Token]) -> FxHashSet<String> {
    let mut declared = FxHashSet::default();
    let mut depth = 0i32;
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth -= 1,
            TokenKind::Class | TokenKind::Enum if depth == 0 => {
                if let Some(name) = tokens.get(i + 1) {
                    if name.kind == TokenKind::Identifier {
                        declared.insert(name.text().to_string());
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    declared
}
