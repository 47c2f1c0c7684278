//! # Tokenizer
//!
//! Recursive-descent tokenizer for infix formulas.
//!
//! ## Grammar
//!
//! ```text
//! expression    := ws* unary-term (ws* binary-op ws* unary-term)* ws*
//! unary-term    := [+|-]? ws* primary
//! primary       := '(' expression ')' | number | function-call | identifier
//! function-call := identifier ws* '(' ws* (expression (ws* ',' ws* expression)*)? ws* ')'
//! ```
//!
//! Scanning never fails loudly: each step returns a [`ScanResult`], a failed
//! step rewinds the cursor and drops the tokens it recorded, and whatever
//! input is left over becomes a final [`TokenKind::Unknown`] token. A fully
//! consumed input ends with [`TokenKind::End`].
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::lexer::{tokenize, TokenKind};
//!
//! let stream = tokenize("cos(5*theta)");
//! assert!(stream.is_complete());
//! let kinds: Vec<TokenKind> = stream.significant().map(|t| t.kind).collect();
//! assert_eq!(kinds[0], TokenKind::Identifier);
//! assert_eq!(kinds[1], TokenKind::OpenBound);
//! ```

pub mod cursor;
pub mod scanner;
pub mod token;
pub mod trie;

pub use cursor::Cursor;
pub use scanner::{
    scan, BoundScanner, CommaScanner, IdentifierScanner, NumberScanner, OperatorScanner,
    ScanResult, Scanner, SpaceScanner, BINARY_OPERATORS, UNARY_OPERATORS,
};
pub use token::{Token, TokenKind, TokenStream};
pub use trie::{SyntaxTree, TrieMatch};

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;
use tracing::{trace, warn};

/// Tokenize a formula.
///
/// Shorthand for `Tokenizer::new(source).tokenize()`.
pub fn tokenize(source: &str) -> TokenStream {
    Tokenizer::new(source).tokenize()
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// Tokenizer state for one source string.
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    tokens: TokenStream,
    unary: OperatorScanner,
    binary: OperatorScanner,
    bound: BoundScanner,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer for source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: TokenStream::new(),
            unary: OperatorScanner::unary(),
            binary: OperatorScanner::binary(),
            bound: BoundScanner::expecting('('),
        }
    }

    /// Tokenize the whole source.
    ///
    /// ## Returns
    ///
    /// Offset-ordered tokens ending in `End` or `Unknown`
    pub fn tokenize(mut self) -> TokenStream {
        self.eat_expression();

        let offset = self.cursor.position();
        if self.cursor.is_eof() {
            self.tokens.insert(Token::new(TokenKind::End, offset, ""));
        } else {
            let tail = self.cursor.rest();
            self.tokens.truncate(offset);
            self.tokens
                .insert(Token::new(TokenKind::Unknown, offset, tail));
        }

        trace!(
            source = self.cursor.source(),
            count = self.tokens.len(),
            complete = self.tokens.is_complete(),
            "tokenized formula"
        );
        self.tokens
    }

    // =========================================================================
    // PRIMITIVES
    // =========================================================================

    /// Run a scanner at the cursor and record its token on success.
    fn emit(cursor: &mut Cursor<'_>, tokens: &mut TokenStream, scanner: &mut dyn Scanner) -> ScanResult {
        let start = cursor.position();
        let result = scan(scanner, cursor.rest());
        if result.is_success() {
            let lexeme = scanner.lexeme();
            cursor.reset(start + lexeme.len());
            tokens.insert(Token::new(scanner.kind(), start, lexeme));
        }
        result
    }

    /// Rewind to `offset`, forgetting tokens recorded since.
    fn rollback(&mut self, offset: usize) {
        self.cursor.reset(offset);
        self.tokens.truncate(offset);
    }

    fn eat_bound(&mut self, expected: char) -> ScanResult {
        self.bound.expect(expected);
        Self::emit(&mut self.cursor, &mut self.tokens, &mut self.bound)
    }

    fn eat_spaces(&mut self) -> ScanResult {
        Self::emit(&mut self.cursor, &mut self.tokens, &mut SpaceScanner::new())
    }

    fn eat_number(&mut self) -> ScanResult {
        Self::emit(&mut self.cursor, &mut self.tokens, &mut NumberScanner::new())
    }

    fn eat_identifier(&mut self) -> ScanResult {
        Self::emit(&mut self.cursor, &mut self.tokens, &mut IdentifierScanner::new())
    }

    fn eat_comma(&mut self) -> ScanResult {
        Self::emit(&mut self.cursor, &mut self.tokens, &mut CommaScanner::new())
    }

    fn eat_binary_operator(&mut self) -> ScanResult {
        Self::emit(&mut self.cursor, &mut self.tokens, &mut self.binary)
    }

    fn eat_unary_operator(&mut self) -> ScanResult {
        Self::emit(&mut self.cursor, &mut self.tokens, &mut self.unary)
    }

    // =========================================================================
    // GRAMMAR
    // =========================================================================

    /// `'(' expression ')'`
    fn eat_group(&mut self) -> ScanResult {
        if self.cursor.peek() != Some('(') {
            return ScanResult::Empty;
        }
        let start = self.cursor.position();
        if !self.eat_bound('(').is_success() {
            return ScanResult::Empty;
        }
        if !self.eat_nested_expression() {
            self.rollback(start);
            return ScanResult::Reject;
        }
        if !self.eat_bound(')').is_success() {
            self.rollback(start);
            return ScanResult::Reject;
        }
        ScanResult::Accept
    }

    /// `identifier ws* '(' args? ')'`
    fn eat_function_call(&mut self) -> ScanResult {
        let start = self.cursor.position();
        if !self.eat_identifier().is_success() {
            return ScanResult::Empty;
        }
        self.eat_spaces();
        if self.cursor.peek() != Some('(') || !self.eat_bound('(').is_success() {
            self.rollback(start);
            return ScanResult::Empty;
        }
        self.eat_spaces();

        if self.cursor.peek() != Some(')') {
            loop {
                if !self.eat_nested_expression() {
                    self.rollback(start);
                    return ScanResult::Reject;
                }
                self.eat_spaces();
                if !self.eat_comma().is_success() {
                    break;
                }
                self.eat_spaces();
            }
        }

        if !self.eat_bound(')').is_success() {
            self.rollback(start);
            return ScanResult::Reject;
        }
        ScanResult::Accept
    }

    /// `group | number | function-call | identifier`
    fn eat_primary(&mut self) -> ScanResult {
        match self.eat_group() {
            ScanResult::Empty => {}
            other => return other,
        }
        match self.eat_number() {
            ScanResult::Empty => {}
            ScanResult::Reject => return ScanResult::Reject,
            _ => return ScanResult::Accept,
        }
        match self.eat_function_call() {
            ScanResult::Empty => {}
            other => return other,
        }
        if self.eat_identifier().is_success() {
            return ScanResult::Accept;
        }
        ScanResult::Empty
    }

    /// `[+|-]? ws* primary`
    fn eat_unary_expression(&mut self) -> ScanResult {
        let start = self.cursor.position();
        let signed = self.eat_unary_operator().is_success();
        self.eat_spaces();

        match self.eat_primary() {
            ScanResult::Accept => ScanResult::Accept,
            ScanResult::Empty if !signed => {
                self.rollback(start);
                ScanResult::Empty
            }
            _ => {
                self.rollback(start);
                ScanResult::Reject
            }
        }
    }

    /// Expression inside a group or call, on a stack that grows as
    /// parentheses nest.
    fn eat_nested_expression(&mut self) -> bool {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.eat_expression()
        })
    }

    /// `ws* unary-term (ws* binary-op ws* unary-term)* ws*`
    ///
    /// ## Returns
    ///
    /// `false` when no leading term could be read
    fn eat_expression(&mut self) -> bool {
        self.eat_spaces();

        if self.eat_unary_expression() != ScanResult::Accept {
            warn!(
                offset = self.cursor.position(),
                tail = self.cursor.rest(),
                "expected expression"
            );
            return false;
        }
        self.eat_spaces();

        while !self.cursor.is_eof() {
            let before = self.cursor.position();
            if !self.eat_binary_operator().is_success() {
                break;
            }
            let op = self
                .tokens
                .get(before)
                .map(|t| t.text.clone())
                .unwrap_or_default();

            let spaced = self.eat_spaces().is_success();
            if self.cursor.is_eof() {
                warn!(offset = before, op = %op, "dangling operator at end of input");
                self.rollback(before);
                break;
            }

            if !spaced && op != "**" {
                if let Some(next @ ('+' | '-')) = self.cursor.peek() {
                    warn!(
                        offset = self.cursor.position(),
                        op = %op,
                        next = %next,
                        "operators must be separated by space"
                    );
                    self.rollback(before);
                    break;
                }
            }

            if self.eat_unary_expression() != ScanResult::Accept {
                warn!(
                    offset = self.cursor.position(),
                    tail = self.cursor.rest(),
                    "expected expression"
                );
                self.rollback(before);
                break;
            }
            self.eat_spaces();
        }
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
