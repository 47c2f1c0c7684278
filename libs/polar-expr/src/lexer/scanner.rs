//! # Scanners
//!
//! Small restartable state machines, one per token kind. The driver feeds a
//! scanner one character at a time through [`Scanner::check`] until it stops
//! accepting, then calls [`Scanner::validate`], which may reject the lexeme
//! or shorten it to its longest valid prefix.
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::lexer::{scan, NumberScanner, ScanResult};
//!
//! let mut scanner = NumberScanner::new();
//! assert_eq!(scan(&mut scanner, "1.5e-3*x"), ScanResult::Finish);
//! assert_eq!(scanner.lexeme(), "1.5e-3");
//! ```

use super::token::TokenKind;
use super::trie::SyntaxTree;

/// Unary operator lexemes.
pub const UNARY_OPERATORS: [&str; 2] = ["+", "-"];

/// Binary operator lexemes.
pub const BINARY_OPERATORS: [&str; 7] = ["+", "-", "*", "**", "/", "%", "=="];

// =============================================================================
// SCAN RESULT
// =============================================================================

/// Outcome of a scan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    /// Character consumed, scanner wants more.
    Accept,
    /// Lexeme is invalid.
    Reject,
    /// Nothing matched at this position.
    Empty,
    /// Lexeme complete, character not consumed.
    Finish,
    /// Input ended before anything was checked.
    Eos,
}

impl ScanResult {
    /// True when the scan produced a lexeme.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Accept | Self::Finish)
    }
}

// =============================================================================
// SCANNER TRAIT
// =============================================================================

/// A per-kind lexeme recognizer.
pub trait Scanner {
    /// Kind of token this scanner produces.
    fn kind(&self) -> TokenKind;

    /// Clear state so the scanner can be reused.
    fn restart(&mut self);

    /// Offer the next character.
    fn check(&mut self, c: char) -> ScanResult;

    /// Validate (and possibly shorten) the accumulated lexeme.
    fn validate(&mut self) -> ScanResult {
        if self.lexeme().is_empty() {
            ScanResult::Reject
        } else {
            ScanResult::Accept
        }
    }

    /// Accumulated lexeme.
    fn lexeme(&self) -> &str;
}

/// Run `scanner` over the start of `input`.
///
/// On success the recognized lexeme is `scanner.lexeme()`; the caller
/// advances by its byte length. An empty lexeme is reported as
/// [`ScanResult::Empty`].
pub fn scan(scanner: &mut dyn Scanner, input: &str) -> ScanResult {
    scanner.restart();
    let mut result = ScanResult::Eos;

    for (i, c) in input.chars().enumerate() {
        result = scanner.check(c);
        if result != ScanResult::Accept {
            if i == 0 {
                result = ScanResult::Empty;
            }
            break;
        }
    }

    if result == ScanResult::Reject {
        return result;
    }
    if scanner.lexeme().is_empty() {
        return ScanResult::Empty;
    }
    if scanner.validate() == ScanResult::Reject {
        return ScanResult::Reject;
    }
    if scanner.lexeme().is_empty() {
        return ScanResult::Empty;
    }
    result
}

// =============================================================================
// SPACE
// =============================================================================

/// Accepts a run of whitespace.
#[derive(Debug, Default)]
pub struct SpaceScanner {
    lexeme: String,
}

impl SpaceScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scanner for SpaceScanner {
    fn kind(&self) -> TokenKind {
        TokenKind::Space
    }

    fn restart(&mut self) {
        self.lexeme.clear();
    }

    fn check(&mut self, c: char) -> ScanResult {
        if c.is_whitespace() {
            self.lexeme.push(c);
            ScanResult::Accept
        } else if self.lexeme.is_empty() {
            ScanResult::Empty
        } else {
            ScanResult::Finish
        }
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

// =============================================================================
// NUMBER
// =============================================================================

/// Accepts an unsigned decimal literal with optional fraction and exponent.
///
/// - at most one `.`, never after the exponent marker
/// - at most one `e`/`E`, only after a digit
/// - a single sign directly after the exponent marker
/// - a literal ending in `e`, `E`, a sign or `.`, or a lone `.`, is rejected
#[derive(Debug, Default)]
pub struct NumberScanner {
    lexeme: String,
    has_digit: bool,
    has_dot: bool,
    has_exp: bool,
    exp_sign_allowed: bool,
}

impl NumberScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated lexeme.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl Scanner for NumberScanner {
    fn kind(&self) -> TokenKind {
        TokenKind::Number
    }

    fn restart(&mut self) {
        *self = Self::default();
    }

    fn check(&mut self, c: char) -> ScanResult {
        if c.is_ascii_digit() {
            self.has_digit = true;
            self.exp_sign_allowed = false;
        } else if c == '.' && !self.has_dot && !self.has_exp {
            self.has_dot = true;
            self.exp_sign_allowed = false;
        } else if (c == 'e' || c == 'E') && !self.has_exp && self.has_digit {
            self.has_exp = true;
            self.exp_sign_allowed = true;
        } else if (c == '+' || c == '-') && self.exp_sign_allowed {
            self.exp_sign_allowed = false;
        } else if self.lexeme.is_empty() {
            return ScanResult::Empty;
        } else {
            return ScanResult::Finish;
        }
        self.lexeme.push(c);
        ScanResult::Accept
    }

    fn validate(&mut self) -> ScanResult {
        match self.lexeme.chars().next_back() {
            None | Some('e' | 'E' | '+' | '-' | '.') => ScanResult::Reject,
            Some(_) if !self.has_digit => ScanResult::Reject,
            Some(_) => ScanResult::Accept,
        }
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

// =============================================================================
// IDENTIFIER
// =============================================================================

/// Accepts `[A-Za-z_][A-Za-z0-9_]*` (Unicode letters included).
#[derive(Debug, Default)]
pub struct IdentifierScanner {
    lexeme: String,
}

impl IdentifierScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scanner for IdentifierScanner {
    fn kind(&self) -> TokenKind {
        TokenKind::Identifier
    }

    fn restart(&mut self) {
        self.lexeme.clear();
    }

    fn check(&mut self, c: char) -> ScanResult {
        let accepted = if self.lexeme.is_empty() {
            c.is_alphabetic() || c == '_'
        } else {
            c.is_alphanumeric() || c == '_'
        };
        if accepted {
            self.lexeme.push(c);
            ScanResult::Accept
        } else if self.lexeme.is_empty() {
            ScanResult::Empty
        } else {
            ScanResult::Finish
        }
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

// =============================================================================
// OPERATOR
// =============================================================================

/// Trie-driven operator scanner.
///
/// Consumes every character of the operator alphabet, then truncates the
/// lexeme to the longest reserved operator it starts with, so `**` wins
/// over `*` and `+-` yields `+`.
#[derive(Debug)]
pub struct OperatorScanner {
    tree: SyntaxTree,
    kind: TokenKind,
    max_chars: Option<usize>,
    lexeme: String,
}

impl OperatorScanner {
    /// Scanner for infix operators.
    pub fn binary() -> Self {
        Self {
            tree: SyntaxTree::from_lexemes(BINARY_OPERATORS),
            kind: TokenKind::BinaryOperator,
            max_chars: None,
            lexeme: String::new(),
        }
    }

    /// Scanner for a single prefix sign.
    pub fn unary() -> Self {
        Self {
            tree: SyntaxTree::from_lexemes(UNARY_OPERATORS),
            kind: TokenKind::UnaryOperator,
            max_chars: Some(1),
            lexeme: String::new(),
        }
    }
}

impl Scanner for OperatorScanner {
    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn restart(&mut self) {
        self.lexeme.clear();
    }

    fn check(&mut self, c: char) -> ScanResult {
        let full = self
            .max_chars
            .is_some_and(|max| self.lexeme.chars().count() >= max);
        if !full && self.tree.in_alphabet(c) && (!self.lexeme.is_empty() || self.tree.can_start(c)) {
            self.lexeme.push(c);
            ScanResult::Accept
        } else if self.lexeme.is_empty() {
            ScanResult::Empty
        } else {
            ScanResult::Finish
        }
    }

    fn validate(&mut self) -> ScanResult {
        match self.tree.longest_match(&self.lexeme) {
            Some(len) => {
                self.lexeme.truncate(len);
                ScanResult::Accept
            }
            None => ScanResult::Reject,
        }
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

// =============================================================================
// COMMA
// =============================================================================

/// Accepts a single `,`.
#[derive(Debug, Default)]
pub struct CommaScanner {
    lexeme: String,
}

impl CommaScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scanner for CommaScanner {
    fn kind(&self) -> TokenKind {
        TokenKind::Comma
    }

    fn restart(&mut self) {
        self.lexeme.clear();
    }

    fn check(&mut self, c: char) -> ScanResult {
        if c == ',' && self.lexeme.is_empty() {
            self.lexeme.push(c);
            ScanResult::Accept
        } else if self.lexeme.is_empty() {
            ScanResult::Empty
        } else {
            ScanResult::Finish
        }
    }

    fn validate(&mut self) -> ScanResult {
        if self.lexeme == "," {
            ScanResult::Accept
        } else {
            ScanResult::Reject
        }
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

// =============================================================================
// EXPRESSION BOUND
// =============================================================================

/// Accepts `(` or `)` and validates it against the bound the caller expects.
#[derive(Debug)]
pub struct BoundScanner {
    tree: SyntaxTree,
    expected: char,
    lexeme: String,
}

impl BoundScanner {
    /// Scanner that only validates `expected`.
    pub fn expecting(expected: char) -> Self {
        Self {
            tree: SyntaxTree::from_lexemes(["(", ")"]),
            expected,
            lexeme: String::new(),
        }
    }

    /// Change the bound the next scan must produce.
    pub fn expect(&mut self, expected: char) {
        self.expected = expected;
    }
}

impl Scanner for BoundScanner {
    fn kind(&self) -> TokenKind {
        if self.expected == '(' {
            TokenKind::OpenBound
        } else {
            TokenKind::CloseBound
        }
    }

    fn restart(&mut self) {
        self.lexeme.clear();
    }

    fn check(&mut self, c: char) -> ScanResult {
        if self.lexeme.is_empty() && self.tree.can_start(c) {
            self.lexeme.push(c);
            ScanResult::Accept
        } else if self.lexeme.is_empty() {
            ScanResult::Empty
        } else {
            ScanResult::Finish
        }
    }

    fn validate(&mut self) -> ScanResult {
        let mut chars = self.lexeme.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c == self.expected && self.tree.contains(&self.lexeme) => {
                ScanResult::Accept
            }
            _ => ScanResult::Reject,
        }
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scanner: &mut dyn Scanner, input: &str) -> (ScanResult, String) {
        let result = scan(scanner, input);
        (result, scanner.lexeme().to_string())
    }

    #[test]
    fn test_space_scanner() {
        assert_eq!(run(&mut SpaceScanner::new(), "  \tx").1, "  \t");
        assert_eq!(run(&mut SpaceScanner::new(), "x").0, ScanResult::Empty);
        assert_eq!(run(&mut SpaceScanner::new(), "").0, ScanResult::Empty);
    }

    #[test]
    fn test_number_scanner_accepts_forms() {
        for (input, lexeme) in [
            ("42", "42"),
            ("3.25+1", "3.25"),
            (".5)", ".5"),
            ("1e5", "1e5"),
            ("2E-3*x", "2E-3"),
            ("1.2.3", "1.2"),
            ("6e2e1", "6e2"),
        ] {
            let (result, text) = run(&mut NumberScanner::new(), input);
            assert!(result.is_success(), "{input} -> {result:?}");
            assert_eq!(text, lexeme);
        }
    }

    #[test]
    fn test_number_scanner_rejects_bad_endings() {
        for input in ["1e", "1e+", "7.", ".", "2E-"] {
            assert_eq!(
                run(&mut NumberScanner::new(), input).0,
                ScanResult::Reject,
                "{input}"
            );
        }
    }

    #[test]
    fn test_number_scanner_sign_is_not_lexical() {
        assert_eq!(run(&mut NumberScanner::new(), "-3").0, ScanResult::Empty);
        assert_eq!(run(&mut NumberScanner::new(), "e5").0, ScanResult::Empty);
    }

    #[test]
    fn test_identifier_scanner() {
        assert_eq!(run(&mut IdentifierScanner::new(), "_theta2*3").1, "_theta2");
        assert_eq!(run(&mut IdentifierScanner::new(), "2x").0, ScanResult::Empty);
    }

    #[test]
    fn test_binary_operator_longest_match() {
        assert_eq!(run(&mut OperatorScanner::binary(), "** 2").1, "**");
        assert_eq!(run(&mut OperatorScanner::binary(), "*-2").1, "*");
        assert_eq!(run(&mut OperatorScanner::binary(), "== 1").1, "==");
    }

    #[test]
    fn test_binary_operator_rejects_incomplete() {
        assert_eq!(run(&mut OperatorScanner::binary(), "=1").0, ScanResult::Reject);
        assert_eq!(run(&mut OperatorScanner::binary(), "(").0, ScanResult::Empty);
    }

    #[test]
    fn test_unary_operator_single_char() {
        let (result, text) = run(&mut OperatorScanner::unary(), "--1");
        assert_eq!(result, ScanResult::Finish);
        assert_eq!(text, "-");
        assert_eq!(run(&mut OperatorScanner::unary(), "*1").0, ScanResult::Empty);
    }

    #[test]
    fn test_comma_scanner() {
        assert_eq!(run(&mut CommaScanner::new(), ",,").1, ",");
        assert_eq!(run(&mut CommaScanner::new(), "x").0, ScanResult::Empty);
    }

    #[test]
    fn test_bound_scanner_checks_expected() {
        let mut scanner = BoundScanner::expecting('(');
        assert!(scan(&mut scanner, "(x").is_success());
        assert_eq!(scanner.kind(), TokenKind::OpenBound);

        scanner.expect(')');
        assert_eq!(scan(&mut scanner, "(x"), ScanResult::Reject);
        assert!(scan(&mut scanner, ")").is_success());
        assert_eq!(scanner.kind(), TokenKind::CloseBound);
    }
}
