//! Symbolic differentiation.
//!
//! Derivatives are built unsimplified; pipe them through
//! [`Expr::simplify`](super::Expr::simplify) before evaluating in a loop.

use super::{with_stack, BinaryOp, Expr, UnaryOp};
use crate::builtins::{canonical_name, Builtin};
use crate::error::{ExprError, ExprResult};

impl Expr {
    /// Derivative with respect to `variable`.
    ///
    /// Subtrees that do not mention `variable` differentiate to `0` without
    /// inspection, so `floor(2) * x` is differentiable even though `floor`
    /// has no derivative.
    ///
    /// ## Errors
    ///
    /// [`ExprError::NoDerivative`] when the variable flows through `%`, `==`
    /// or a piecewise builtin.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::{compile, Bindings};
    ///
    /// let f = compile("x ** 3").unwrap();
    /// let df = f.derivative("x").unwrap();
    /// let env = Bindings::new().with("x", 2.0);
    /// assert_eq!(df.eval(&env).unwrap(), 12.0);
    /// ```
    pub fn derivative(&self, variable: &str) -> ExprResult<Expr> {
        self.differentiate(&canonical_name(variable))
    }

    fn differentiate(&self, x: &str) -> ExprResult<Expr> {
        if !self.mentions(x) {
            return Ok(Expr::num(0.0));
        }

        with_stack(|| match self {
            Self::Number(_) => Ok(Expr::num(0.0)),
            Self::Variable(name) => Ok(Expr::num(if name == x { 1.0 } else { 0.0 })),
            Self::Unary { op, operand } => {
                let d = operand.differentiate(x)?;
                Ok(match op {
                    UnaryOp::Plus => d,
                    UnaryOp::Minus => -d,
                })
            }
            Self::Binary { op, left, right } => differentiate_binary(*op, left, right, x),
            Self::Call { function, args } => differentiate_call(*function, args, x),
        })
    }
}

fn differentiate_binary(op: BinaryOp, a: &Expr, b: &Expr, x: &str) -> ExprResult<Expr> {
    let one = || Expr::num(1.0);

    match op {
        BinaryOp::Add => Ok(a.differentiate(x)? + b.differentiate(x)?),
        BinaryOp::Sub => Ok(a.differentiate(x)? - b.differentiate(x)?),
        BinaryOp::Mul => {
            let (da, db) = (a.differentiate(x)?, b.differentiate(x)?);
            Ok(da * b.clone() + a.clone() * db)
        }
        BinaryOp::Div => {
            let (da, db) = (a.differentiate(x)?, b.differentiate(x)?);
            Ok((da * b.clone() - a.clone() * db) / b.clone().pow(Expr::num(2.0)))
        }
        BinaryOp::Pow if !b.mentions(x) => {
            // d(a**c) = c * a**(c-1) * da
            let da = a.differentiate(x)?;
            Ok(b.clone() * a.clone().pow(b.clone() - one()) * da)
        }
        BinaryOp::Pow => {
            // d(a**b) = a**b * (db * ln a + b * da / a)
            let (da, db) = (a.differentiate(x)?, b.differentiate(x)?);
            let ln_a = Expr::call(Builtin::Log, vec![a.clone()]);
            Ok(a.clone().pow(b.clone()) * (db * ln_a + b.clone() * da / a.clone()))
        }
        BinaryOp::Rem | BinaryOp::Eq => Err(ExprError::no_derivative(op.symbol())),
    }
}

/// Chain rule: `Σ ∂f/∂argᵢ · d argᵢ` over the arguments that mention `x`.
fn differentiate_call(function: Builtin, args: &[Expr], x: &str) -> ExprResult<Expr> {
    let partials = function.partials(args)?;
    let mut total: Option<Expr> = None;

    for (arg, partial) in args.iter().zip(partials) {
        if !arg.mentions(x) {
            continue;
        }
        let term = partial * arg.differentiate(x)?;
        total = Some(match total {
            Some(sum) => sum + term,
            None => term,
        });
    }

    Ok(total.unwrap_or(Expr::num(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, Bindings};
    use approx::assert_relative_eq;

    fn slope(source: &str, at: f64) -> f64 {
        let f = compile(source).expect("valid formula");
        let df = f.derivative("x").expect("differentiable").simplify();
        df.eval(&Bindings::new().with("x", at)).expect("bound")
    }

    /// Central difference for cross-checking.
    fn numeric_slope(source: &str, at: f64) -> f64 {
        let f = compile(source).expect("valid formula");
        let h = 1e-6;
        let env = Bindings::new();
        let hi = f.eval_at(&env, "x", at + h).expect("bound");
        let lo = f.eval_at(&env, "x", at - h).expect("bound");
        (hi - lo) / (2.0 * h)
    }

    #[test]
    fn test_basic_rules() {
        assert_eq!(slope("7", 1.0), 0.0);
        assert_eq!(slope("x", 5.0), 1.0);
        assert_eq!(slope("y", 5.0), 0.0);
        assert_eq!(slope("3*x + 2", 5.0), 3.0);
        assert_eq!(slope("-x", 5.0), -1.0);
        assert_eq!(slope("x*x", 3.0), 6.0);
    }

    #[test]
    fn test_quotient_and_power_rules() {
        assert_relative_eq!(slope("1/x", 2.0), -0.25);
        assert_relative_eq!(slope("x**3", 2.0), 12.0);
        assert_relative_eq!(slope("2**x", 3.0), 8.0 * 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_variable_exponent() {
        // x**x has derivative x**x * (ln x + 1)
        let expected = 2.0_f64.powf(2.0) * (2.0_f64.ln() + 1.0);
        assert_relative_eq!(slope("x**x", 2.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_chain_rule_matches_finite_difference() {
        for source in [
            "sin(3*x)",
            "cos(x)**2",
            "sqrt(1 + x*x)",
            "exp(-x) * log(x + 2)",
            "atan2(x, 2)",
            "pow(x, 1.5)",
            "tanh(x) + asin(x/2)",
            "1 + cos(5*x)",
        ] {
            assert_relative_eq!(
                slope(source, 0.4),
                numeric_slope(source, 0.4),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_cos_round_trip() {
        let f = compile("cos(theta)").expect("valid formula");
        let df = f.derivative("theta").expect("differentiable").simplify();
        let env = Bindings::new();
        assert_eq!(df.eval_at(&env, "theta", 0.0), Ok(0.0));
        assert_relative_eq!(
            df.eval_at(&env, "theta", std::f64::consts::FRAC_PI_2)
                .expect("bound"),
            -1.0
        );
    }

    #[test]
    fn test_constant_subtrees_skip_missing_rules() {
        assert_eq!(slope("floor(2.5) * x", 1.0), 2.0);
        assert_eq!(slope("x + (3 % 2)", 1.0), 1.0);
    }

    #[test]
    fn test_no_derivative_errors() {
        let f = compile("floor(x)").expect("valid formula");
        assert_eq!(f.derivative("x"), Err(ExprError::no_derivative("floor")));
        let g = compile("x % 2").expect("valid formula");
        assert_eq!(g.derivative("x"), Err(ExprError::no_derivative("%")));
    }

    #[test]
    fn test_derivative_leaves_receiver_untouched() {
        let f = compile("x*x").expect("valid formula");
        let before = f.clone();
        let _ = f.derivative("x");
        assert_eq!(f, before);
    }
}
