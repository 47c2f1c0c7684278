//! Algebraic simplification.
//!
//! One bottom-up pass: children are simplified first, then the parent is
//! rebuilt through constructors that apply the identities below. Every
//! constructor returns a node no rule applies to, so the pass is a fixpoint.
//!
//! | Rule | Result |
//! |------|--------|
//! | literal `op` literal, `f(literals)` | folded number |
//! | `+x` | `x` |
//! | `-(-x)`, `-c` | `x`, negated literal |
//! | `x + 0`, `0 + x`, `x - 0` | `x` |
//! | `0 - x` | `-x` |
//! | `x * 0`, `0 * x`, `0 / x` | `0` |
//! | `x * 1`, `1 * x`, `x / 1`, `x ** 1` | `x` |
//! | `x ** 0` | `1` |

use super::{with_stack, BinaryOp, Expr, UnaryOp};

/// Free-function form of [`Expr::simplify`].
pub fn simplify(expr: &Expr) -> Expr {
    expr.simplify()
}

impl Expr {
    /// Simplified copy of the tree.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::compile;
    ///
    /// let expr = compile("(x * 1 + 0) ** 1 + 2 * 3").unwrap();
    /// assert_eq!(expr.simplify().to_string(), "x + 6");
    /// ```
    pub fn simplify(&self) -> Expr {
        with_stack(|| match self {
            Self::Number(_) | Self::Variable(_) => self.clone(),
            Self::Unary { op, operand } => make_unary(*op, operand.simplify()),
            Self::Binary { op, left, right } => {
                make_binary(*op, left.simplify(), right.simplify())
            }
            Self::Call { function, args } => {
                let args: Vec<Expr> = args.iter().map(Expr::simplify).collect();
                let literals: Option<Vec<f64>> = args.iter().map(Expr::as_number).collect();
                match literals {
                    Some(values) => Expr::num(function.apply(&values)),
                    None => Expr::call(*function, args),
                }
            }
        })
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn is_literal(&self, value: f64) -> bool {
        self.as_number() == Some(value)
    }
}

fn make_unary(op: UnaryOp, operand: Expr) -> Expr {
    match (op, operand) {
        (UnaryOp::Plus, operand) => operand,
        (UnaryOp::Minus, Expr::Number(value)) => Expr::num(-value),
        (
            UnaryOp::Minus,
            Expr::Unary {
                op: UnaryOp::Minus,
                operand,
            },
        ) => *operand,
        (UnaryOp::Minus, operand) => Expr::unary(UnaryOp::Minus, operand),
    }
}

fn make_binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return Expr::num(op.apply(a, b));
    }

    match op {
        BinaryOp::Add if right.is_literal(0.0) => left,
        BinaryOp::Add if left.is_literal(0.0) => right,
        BinaryOp::Sub if right.is_literal(0.0) => left,
        BinaryOp::Sub if left.is_literal(0.0) => make_unary(UnaryOp::Minus, right),
        BinaryOp::Mul if left.is_literal(0.0) || right.is_literal(0.0) => Expr::num(0.0),
        BinaryOp::Mul if right.is_literal(1.0) => left,
        BinaryOp::Mul if left.is_literal(1.0) => right,
        BinaryOp::Div if left.is_literal(0.0) => Expr::num(0.0),
        BinaryOp::Div if right.is_literal(1.0) => left,
        BinaryOp::Pow if right.is_literal(0.0) => Expr::num(1.0),
        BinaryOp::Pow if right.is_literal(1.0) => left,
        _ => Expr::binary(op, left, right),
    }
}
