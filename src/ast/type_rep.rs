//! Textual type references inside the AST (spec §3 "AST node" — type
//! references are textual `type_representation`s, not yet resolved types).

use crate::lexer::Token;

/// A token list (to spell nested generics such as `list<list<int>>`) plus
/// an ordered list of nested `TypeRepresentation`s and a reference flag.
/// Resolved into a `sema_type` by the semantic analyser (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRepresentation {
    tokens: Vec<Token>,
    nested: Vec<TypeRepresentation>,
    is_reference: bool,
}

impl TypeRepresentation {
    pub fn new(tokens: Vec<Token>, nested: Vec<TypeRepresentation>, is_reference: bool) -> Self {
        assert!(!tokens.is_empty(), "a type representation always spells at least a primary name");
        Self {
            tokens,
            nested,
            is_reference,
        }
    }

    pub fn simple(primary: Token) -> Self {
        Self::new(vec![primary], Vec::new(), false)
    }

    pub fn primary_name(&self) -> &Token {
        &self.tokens[0]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn nested_types(&self) -> &[TypeRepresentation] {
        &self.nested
    }

    pub fn is_generic(&self) -> bool {
        !self.nested.is_empty()
    }

    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    /// As a reference: same spelling, `is_reference` forced true.
    pub fn as_reference(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            nested: self.nested.clone(),
            is_reference: true,
        }
    }

    pub fn to_string_without_reference(&self) -> String {
        self.tokens.iter().map(|t| t.text()).collect()
    }

    pub fn to_canonical_string(&self) -> String {
        let mut s = self.to_string_without_reference();
        if self.is_reference {
            s.push('&');
        }
        s
    }
}

impl std::fmt::Display for TypeRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}
