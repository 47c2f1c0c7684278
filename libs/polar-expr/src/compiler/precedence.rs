//! # Operator Precedence
//!
//! | Precedence | Operators | Associativity |
//! |------------|-----------|---------------|
//! | 1 | == | Left |
//! | 2 | + - | Left |
//! | 3 | * / % | Left |
//! | 4 | + - (unary) | Right |
//! | 5 | ** | Right |
//!
//! Unary operators sit below `**`, so `-4**2` negates `16`, while the
//! exponent of `**` may itself carry a sign (`2**-1`).

use crate::expr::BinaryOp;

/// Operator precedence levels.
///
/// Higher values bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// No precedence (sentinel value)
    None = 0,
    /// Equality: `==`
    Equality = 1,
    /// Addition/subtraction: `+ -`
    Term = 2,
    /// Multiplication/division/remainder: `* / %`
    Factor = 3,
    /// Sign: `+ -`
    Unary = 4,
    /// Power: `**`
    Power = 5,
    /// Literals, variables, calls and groups
    Primary = 6,
}

impl Precedence {
    /// Get precedence for binary operator.
    pub fn of_binary(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Eq => Self::Equality,
            BinaryOp::Add | BinaryOp::Sub => Self::Term,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => Self::Factor,
            BinaryOp::Pow => Self::Power,
        }
    }

    /// Get next higher precedence level.
    ///
    /// Used for left-associative operators.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Equality,
            Self::Equality => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Unary,
            Self::Unary => Self::Power,
            Self::Power | Self::Primary => Self::Primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Precedence::of_binary(BinaryOp::Mul) > Precedence::of_binary(BinaryOp::Add));
        assert!(Precedence::of_binary(BinaryOp::Pow) > Precedence::Unary);
        assert!(Precedence::of_binary(BinaryOp::Eq) < Precedence::Term);
    }

    #[test]
    fn test_next_saturates() {
        assert_eq!(Precedence::None.next(), Precedence::Equality);
        assert_eq!(Precedence::Factor.next(), Precedence::Unary);
        assert_eq!(Precedence::Primary.next(), Precedence::Primary);
    }
}
