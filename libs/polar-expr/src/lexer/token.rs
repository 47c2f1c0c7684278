//! # Tokens
//!
//! Token types produced by the tokenizer and the offset-ordered token stream.
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::lexer::{Token, TokenKind};
//!
//! let token = Token::new(TokenKind::Number, 0, "10");
//! assert_eq!(token.kind, TokenKind::Number);
//! ```

use crate::error::{ExprError, ExprResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// TOKEN
// =============================================================================

/// A lexeme with its kind and source offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token type.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Token text.
    pub text: String,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, offset: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            text: text.into(),
        }
    }

    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Check if token is the end-of-input marker.
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    /// Check if token holds unconsumed input.
    pub fn is_unknown(&self) -> bool {
        self.kind == TokenKind::Unknown
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} @{}", self.kind, self.text, self.offset)
    }
}

// =============================================================================
// TOKEN KIND
// =============================================================================

/// Types of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Unsigned numeric literal like `3`, `.5` or `1e-3`
    Number,
    /// Variable, constant or function name
    Identifier,
    /// Prefix `+` or `-`
    UnaryOperator,
    /// Infix `+ - * ** / % ==`
    BinaryOperator,
    /// `(`
    OpenBound,
    /// `)`
    CloseBound,
    /// `,` between call arguments
    Comma,
    /// Run of whitespace
    Space,
    /// Marker after a fully consumed input
    End,
    /// Unconsumed tail after a failed scan
    Unknown,
}

impl TokenKind {
    /// Whitespace carries no meaning for the compiler.
    pub fn is_trivia(self) -> bool {
        self == Self::Space
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::Identifier => "identifier",
            Self::UnaryOperator => "unary operator",
            Self::BinaryOperator => "binary operator",
            Self::OpenBound => "'('",
            Self::CloseBound => "')'",
            Self::Comma => "','",
            Self::Space => "space",
            Self::End => "end",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// =============================================================================
// TOKEN STREAM
// =============================================================================

/// Tokens keyed by their source offset.
///
/// Offsets are unique and increasing. A stream produced by the tokenizer
/// always ends with either an [`TokenKind::End`] token (full success) or an
/// [`TokenKind::Unknown`] token holding the unconsumed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStream {
    tokens: BTreeMap<usize, Token>,
}

impl TokenStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token at its offset, replacing any token already there.
    pub fn insert(&mut self, token: Token) {
        self.tokens.insert(token.offset, token);
    }

    /// Drop every token at or after `offset`.
    pub fn truncate(&mut self, offset: usize) {
        self.tokens.split_off(&offset);
    }

    /// Number of tokens, spaces and terminal included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if no token was recorded.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token starting at `offset`.
    pub fn get(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(&offset)
    }

    /// All tokens in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Tokens in source order with whitespace skipped.
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.iter().filter(|t| !t.kind.is_trivia())
    }

    /// Last token of the stream.
    pub fn terminal(&self) -> Option<&Token> {
        self.tokens.values().next_back()
    }

    /// True if the input was consumed entirely.
    pub fn is_complete(&self) -> bool {
        self.terminal().is_some_and(Token::is_end)
    }

    /// Convert a partial parse into a lexical error.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::lexer::tokenize;
    ///
    /// assert!(tokenize("1 + 2").check().is_ok());
    /// let err = tokenize("1 + 2 )").check().unwrap_err();
    /// assert_eq!(err.offset(), Some(6));
    /// ```
    pub fn check(&self) -> ExprResult<()> {
        match self.terminal() {
            Some(token) if token.is_end() => Ok(()),
            Some(token) => Err(ExprError::lexical(
                token.offset,
                format!("unexpected input {:?}", token.text),
            )),
            None => Err(ExprError::lexical(0, "empty token stream")),
        }
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::collections::btree_map::Values<'a, usize, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.values()
    }
}

// =============================================================================
// TESTS
// =============================================================================
