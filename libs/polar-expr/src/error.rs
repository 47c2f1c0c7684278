//! # Expression Errors
//!
//! Error types for tokenizing, compiling, evaluating and differentiating
//! formulas.
//!
//! ## Error Policy
//!
//! - Lexical and syntax errors surface immediately with the byte offset
//! - A malformed formula never yields a usable tree
//! - Evaluation never silently substitutes zero for a missing variable
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::{compile, ExprError};
//!
//! match compile("1 +") {
//!     Ok(_) => unreachable!(),
//!     Err(ExprError::Lexical { offset, .. }) => assert_eq!(offset, 2),
//!     Err(other) => panic!("unexpected error: {other}"),
//! }
//! ```

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the expression pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Input that no scanner could classify, or an invalid lexeme.
    #[error("Lexical error at byte {offset}: {message}")]
    Lexical {
        /// Byte offset of the unconsumed input.
        offset: usize,
        /// Description including the offending tail.
        message: String,
    },

    /// Structurally invalid token sequence.
    #[error("Syntax error at byte {offset}: {message}")]
    Syntax {
        /// Byte offset of the offending token.
        offset: usize,
        /// What was expected.
        message: String,
    },

    /// Call of a function that is not a known builtin.
    #[error("Unknown function: {name}")]
    UnknownFunction {
        /// Name as written in the formula.
        name: String,
        /// Byte offset of the call.
        offset: usize,
    },

    /// Builtin called with the wrong number of arguments.
    #[error("Function {name} expects {expected} argument(s), got {found}")]
    ArityMismatch {
        /// Builtin name.
        name: String,
        /// Declared arity.
        expected: usize,
        /// Arguments supplied.
        found: usize,
        /// Byte offset of the call.
        offset: usize,
    },

    /// Variable evaluated without a binding.
    #[error("Unbound variable: {name}")]
    UnboundVariable {
        /// Lowercased variable name.
        name: String,
    },

    /// Operator or function without a symbolic derivative.
    #[error("No derivative defined for {name}")]
    NoDerivative {
        /// Operator symbol or function name.
        name: String,
    },
}

impl ExprError {
    /// Creates a lexical error.
    pub fn lexical(offset: usize, message: impl Into<String>) -> Self {
        Self::Lexical {
            offset,
            message: message.into(),
        }
    }

    /// Creates a syntax error.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Creates an unbound variable error.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self::UnboundVariable { name: name.into() }
    }

    /// Creates a missing derivative error.
    pub fn no_derivative(name: impl Into<String>) -> Self {
        Self::NoDerivative { name: name.into() }
    }

    /// Returns true for errors detected before any evaluation.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::ExprError;
    ///
    /// assert!(ExprError::syntax(0, "expected expression").is_compile_error());
    /// assert!(!ExprError::unbound("x").is_compile_error());
    /// ```
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::Lexical { .. }
                | Self::Syntax { .. }
                | Self::UnknownFunction { .. }
                | Self::ArityMismatch { .. }
        )
    }

    /// Byte offset in the formula, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Lexical { offset, .. }
            | Self::Syntax { offset, .. }
            | Self::UnknownFunction { offset, .. }
            | Self::ArityMismatch { offset, .. } => Some(*offset),
            Self::UnboundVariable { .. } | Self::NoDerivative { .. } => None,
        }
    }
}

/// Result type for expression operations.
pub type ExprResult<T> = Result<T, ExprError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExprError::ArityMismatch {
            name: "pow".to_string(),
            expected: 2,
            found: 1,
            offset: 0,
        };
        assert_eq!(err.to_string(), "Function pow expects 2 argument(s), got 1");
        assert_eq!(ExprError::unbound("x").to_string(), "Unbound variable: x");
    }

    #[test]
    fn test_offsets() {
        assert_eq!(ExprError::lexical(4, "bad").offset(), Some(4));
        assert_eq!(ExprError::no_derivative("floor").offset(), None);
    }
}
