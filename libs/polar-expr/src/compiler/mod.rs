//! # Expression Compiler
//!
//! Precedence-climbing compiler from a token stream to an [`Expr`] tree.
//!
//! ## Pipeline
//!
//! ```text
//! tokenize → TokenStream::check → Compiler::compile → Expr
//! ```
//!
//! The tokenizer has already enforced the grammar's shape; the compiler
//! resolves operator precedence, names (call, constant or variable) and
//! builtin arities. It also bounds nesting at [`MAX_EXPRESSION_DEPTH`], both
//! the parser's own recursion and the height of the tree it builds.
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::{compile, Bindings};
//!
//! let expr = compile("-4**2").unwrap();
//! assert_eq!(expr.eval(&Bindings::new()).unwrap(), -16.0);
//! ```

mod precedence;

pub use precedence::Precedence;

use crate::builtins::{constant, Builtin};
use crate::error::{ExprError, ExprResult};
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::lexer::{tokenize, Token, TokenKind, TokenStream};
use config::constants::MAX_EXPRESSION_DEPTH;
use tracing::debug;

/// Compile formula text.
///
/// ## Errors
///
/// - [`ExprError::Lexical`] when the tokenizer stops before the end
/// - [`ExprError::Syntax`] for an empty formula or one nested deeper than
///   [`MAX_EXPRESSION_DEPTH`]
/// - [`ExprError::UnknownFunction`] and [`ExprError::ArityMismatch`] for
///   bad calls
pub fn compile(source: &str) -> ExprResult<Expr> {
    let stream = tokenize(source);
    let expr = Compiler::compile_tokens(&stream)?;
    debug!(formula = source, expr = %expr, "compiled formula");
    Ok(expr)
}

// =============================================================================
// COMPILER
// =============================================================================

/// Subtree paired with its height.
type Node = (Expr, usize);

/// Compiler over the significant tokens of one stream.
pub struct Compiler {
    /// Tokens with whitespace removed.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    /// Offset reported once the tokens run out.
    end_offset: usize,
    /// Active `parse_precedence` frames.
    depth: usize,
}

impl Compiler {
    /// Create a compiler for a token stream.
    pub fn new(stream: &TokenStream) -> Self {
        Self {
            tokens: stream.significant().cloned().collect(),
            current: 0,
            end_offset: stream.terminal().map_or(0, Token::end),
            depth: 0,
        }
    }

    /// Check a token stream for lexical errors, then compile it.
    pub fn compile_tokens(stream: &TokenStream) -> ExprResult<Expr> {
        stream.check()?;
        Self::new(stream).compile()
    }

    /// Compile the whole stream into one expression.
    pub fn compile(mut self) -> ExprResult<Expr> {
        if self.check(TokenKind::End) {
            return Err(ExprError::syntax(self.peek_offset(), "expected expression"));
        }

        let (expr, _) = self.parse_expression()?;

        if !self.check(TokenKind::End) {
            return Err(self.unexpected("operator or end of formula"));
        }
        Ok(expr)
    }

    // =========================================================================
    // TOKEN ACCESS
    // =========================================================================

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::End, |t| t.kind)
    }

    fn peek_nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.current + n)
            .map_or(TokenKind::End, |t| t.kind)
    }

    fn peek_offset(&self) -> usize {
        self.peek().map_or(self.end_offset, |t| t.offset)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume the current token. Past the end this yields an `End` token.
    fn advance(&mut self) -> Token {
        match self.tokens.get(self.current) {
            Some(token) => {
                self.current += 1;
                token.clone()
            }
            None => Token::new(TokenKind::End, self.end_offset, ""),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ExprResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        match self.peek() {
            Some(token) if !token.is_end() => ExprError::syntax(
                token.offset,
                format!("expected {expected}, found {} {:?}", token.kind, token.text),
            ),
            _ => ExprError::syntax(
                self.peek_offset(),
                format!("expected {expected}, found end of formula"),
            ),
        }
    }

    fn too_deep(offset: usize) -> ExprError {
        ExprError::syntax(
            offset,
            format!("formula nests deeper than {MAX_EXPRESSION_DEPTH} levels"),
        )
    }

    /// Height of a node built over children of height `below`.
    fn grow(offset: usize, below: usize) -> ExprResult<usize> {
        let height = below + 1;
        if height > MAX_EXPRESSION_DEPTH {
            return Err(Self::too_deep(offset));
        }
        Ok(height)
    }

    fn peek_binary(&self) -> Option<BinaryOp> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::BinaryOperator => {
                BinaryOp::from_symbol(&token.text)
            }
            _ => None,
        }
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    fn parse_expression(&mut self) -> ExprResult<Node> {
        self.parse_precedence(Precedence::Equality)
    }

    /// Parse operators binding at least as tightly as `min_prec`.
    fn parse_precedence(&mut self, min_prec: Precedence) -> ExprResult<Node> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(Self::too_deep(self.peek_offset()));
        }
        self.depth += 1;
        let node = self.parse_operators(min_prec);
        self.depth -= 1;
        node
    }

    fn parse_operators(&mut self, min_prec: Precedence) -> ExprResult<Node> {
        let (mut left, mut height) = self.parse_unary()?;

        while let Some(op) = self.peek_binary() {
            let prec = Precedence::of_binary(op);
            if prec < min_prec {
                break;
            }
            let offset = self.advance().offset;

            let next_prec = if op.is_right_associative() {
                prec
            } else {
                prec.next()
            };
            let (right, right_height) = self.parse_precedence(next_prec)?;
            height = Self::grow(offset, height.max(right_height))?;
            left = Expr::binary(op, left, right);
        }

        Ok((left, height))
    }

    /// A sign applies to a whole power chain: `-a**b` is `-(a**b)`.
    fn parse_unary(&mut self) -> ExprResult<Node> {
        if self.check(TokenKind::UnaryOperator) {
            let token = self.advance();
            let op = UnaryOp::from_symbol(&token.text).ok_or_else(|| {
                ExprError::syntax(token.offset, format!("unknown sign {:?}", token.text))
            })?;
            let (operand, height) = self.parse_precedence(Precedence::Power)?;
            return Ok((Expr::unary(op, operand), Self::grow(token.offset, height)?));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ExprResult<Node> {
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance();
                let value = token.text.parse::<f64>().map_err(|_| {
                    ExprError::syntax(token.offset, format!("invalid number {:?}", token.text))
                })?;
                Ok((Expr::num(value), 1))
            }
            TokenKind::Identifier if self.peek_nth_kind(1) == TokenKind::OpenBound => {
                self.parse_call()
            }
            TokenKind::Identifier => {
                let token = self.advance();
                let leaf = match constant(&token.text) {
                    Some(value) => Expr::num(value),
                    None => Expr::var(&token.text),
                };
                Ok((leaf, 1))
            }
            TokenKind::OpenBound => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::CloseBound, "')'")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_call(&mut self) -> ExprResult<Node> {
        let name = self.advance();
        let function = Builtin::lookup(&name.text).ok_or_else(|| ExprError::UnknownFunction {
            name: name.text.clone(),
            offset: name.offset,
        })?;

        self.expect(TokenKind::OpenBound, "'('")?;
        let mut args = Vec::new();
        let mut height = 0;
        if !self.check(TokenKind::CloseBound) {
            loop {
                let (arg, arg_height) = self.parse_expression()?;
                height = height.max(arg_height);
                args.push(arg);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseBound, "')'")?;

        if args.len() != function.arity() {
            return Err(ExprError::ArityMismatch {
                name: function.name().to_string(),
                expected: function.arity(),
                found: args.len(),
                offset: name.offset,
            });
        }
        Ok((Expr::call(function, args), Self::grow(name.offset, height)?))
    }
}

// =============================================================================
// TESTS
// =============================================================================
