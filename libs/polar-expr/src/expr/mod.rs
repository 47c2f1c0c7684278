//! # Expression Tree
//!
//! Compiled formulas as an owned, acyclic tree.
//!
//! Trees are immutable once built. [`Expr::derivative`] and
//! [`Expr::simplify`] return fresh trees; evaluation reads variable values
//! from an explicit [`Bindings`] context.
//!
//! Recursive walks run through [`stacker::maybe_grow`], so a tree assembled
//! by hand deeper than the compiler allows still walks without overflowing.
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::{compile, Bindings};
//!
//! let r = compile("1 + cos(5*theta)").unwrap();
//! let env = Bindings::new().with("theta", 0.0);
//! assert_eq!(r.eval(&env).unwrap(), 2.0);
//!
//! let dr = r.derivative("theta").unwrap().simplify();
//! assert_eq!(dr.eval(&env).unwrap(), 0.0);
//! ```

mod derivative;
mod simplify;

pub use simplify::simplify;

use crate::bindings::Bindings;
use crate::builtins::{canonical_name, Builtin};
use crate::compiler::Precedence;
use crate::error::{ExprError, ExprResult};
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, THETA};
use stacker::maybe_grow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops;

// =============================================================================
// OPERATORS
// =============================================================================

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    /// Parse an operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Plus => value,
            Self::Minus => -value,
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Floating remainder with the sign of the dividend.
    Rem,
    Pow,
    /// `1` when both sides compare equal, `0` otherwise.
    Eq,
}

impl BinaryOp {
    /// Parse an operator symbol.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::BinaryOp;
    ///
    /// assert_eq!(BinaryOp::from_symbol("**"), Some(BinaryOp::Pow));
    /// assert_eq!(BinaryOp::from_symbol("^"), None);
    /// ```
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "%" => Some(Self::Rem),
            "**" => Some(Self::Pow),
            "==" => Some(Self::Eq),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Pow => "**",
            Self::Eq => "==",
        }
    }

    /// Only `**` groups to the right.
    pub fn is_right_associative(self) -> bool {
        self == Self::Pow
    }

    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
            Self::Rem => left % right,
            Self::Pow => left.powf(right),
            Self::Eq => {
                if left == right {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =============================================================================
// EXPRESSION
// =============================================================================

/// Expression tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal or folded constant.
    Number(f64),
    /// Free variable, lowercased.
    Variable(String),
    /// Prefix operation.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Infix operation.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Builtin function call.
    Call { function: Builtin, args: Vec<Expr> },
}

impl Expr {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    pub fn num(value: f64) -> Self {
        Self::Number(value)
    }

    /// Variable reference; the name is lowercased.
    pub fn var(name: &str) -> Self {
        Self::Variable(canonical_name(name))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(function: Builtin, args: Vec<Expr>) -> Self {
        Self::Call { function, args }
    }

    /// `self ** exponent`, unsimplified.
    pub fn pow(self, exponent: Expr) -> Self {
        Self::binary(BinaryOp::Pow, self, exponent)
    }

    // =========================================================================
    // EVALUATION
    // =========================================================================

    /// Evaluate against a binding context.
    ///
    /// Floating point edge cases follow IEEE semantics: `1/0` is infinite,
    /// `sqrt(-1)` is NaN.
    ///
    /// ## Errors
    ///
    /// [`ExprError::UnboundVariable`] for the first variable without a value.
    pub fn eval(&self, bindings: &Bindings) -> ExprResult<f64> {
        self.evaluate(&|name| bindings.lookup(name))
    }

    /// Evaluate with one variable overridden, leaving `bindings` untouched.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::{compile, Bindings};
    ///
    /// let expr = compile("a * t").unwrap();
    /// let env = Bindings::new().with("a", 2.0);
    /// assert_eq!(expr.eval_at(&env, "t", 4.0).unwrap(), 8.0);
    /// ```
    pub fn eval_at(&self, bindings: &Bindings, name: &str, value: f64) -> ExprResult<f64> {
        let name = canonical_name(name);
        self.evaluate(&|candidate| {
            if candidate == name {
                Some(value)
            } else {
                bindings.lookup(candidate)
            }
        })
    }

    fn evaluate(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> ExprResult<f64> {
        with_stack(|| match self {
            Self::Number(value) => Ok(*value),
            Self::Variable(name) => lookup(name).ok_or_else(|| ExprError::unbound(name.as_str())),
            Self::Unary { op, operand } => Ok(op.apply(operand.evaluate(lookup)?)),
            Self::Binary { op, left, right } => {
                Ok(op.apply(left.evaluate(lookup)?, right.evaluate(lookup)?))
            }
            Self::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(lookup))
                    .collect::<ExprResult<Vec<f64>>>()?;
                Ok(function.apply(&values))
            }
        })
    }

    /// Cartesian x of the polar point `(r(theta), theta)`, where the
    /// receiver is the radius and `theta` is bound for this call only.
    pub fn cyl_x(&self, bindings: &Bindings, theta: f64) -> ExprResult<f64> {
        Ok(self.eval_at(bindings, THETA, theta)? * theta.cos())
    }

    /// Cartesian y of the polar point `(r(theta), theta)`.
    pub fn cyl_y(&self, bindings: &Bindings, theta: f64) -> ExprResult<f64> {
        Ok(self.eval_at(bindings, THETA, theta)? * theta.sin())
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// True if `name` occurs anywhere in the tree.
    pub fn depends_on(&self, name: &str) -> bool {
        self.mentions(&canonical_name(name))
    }

    pub(crate) fn mentions(&self, name: &str) -> bool {
        with_stack(|| match self {
            Self::Number(_) => false,
            Self::Variable(candidate) => candidate == name,
            Self::Unary { operand, .. } => operand.mentions(name),
            Self::Binary { left, right, .. } => left.mentions(name) || right.mentions(name),
            Self::Call { args, .. } => args.iter().any(|arg| arg.mentions(name)),
        })
    }

    /// Free variable names in sorted order.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        with_stack(|| match self {
            Self::Number(_) => {}
            Self::Variable(name) => {
                names.insert(name.clone());
            }
            Self::Unary { operand, .. } => operand.collect_variables(names),
            Self::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Self::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
        })
    }

    /// True if the tree has no free variables.
    pub fn is_constant(&self) -> bool {
        self.variables().is_empty()
    }

    /// Binding strength of the root, for printing.
    fn precedence(&self) -> Precedence {
        match self {
            Self::Number(value) if !value.is_finite() => Precedence::Factor,
            Self::Number(value) if value.is_sign_negative() => Precedence::Unary,
            Self::Number(_) | Self::Variable(_) | Self::Call { .. } => Precedence::Primary,
            Self::Unary { .. } => Precedence::Unary,
            Self::Binary { op, .. } => Precedence::of_binary(*op),
        }
    }
}

// =============================================================================
// OPERATOR OVERLOADS
// =============================================================================

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs)
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Sub, self, rhs)
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Mul, self, rhs)
    }
}

impl ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Div, self, rhs)
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::unary(UnaryOp::Minus, self)
    }
}

// =============================================================================
// DISPLAY
// =============================================================================

/// Prints formula syntax that compiles back to an equivalent tree, with
/// parentheses only where precedence requires them.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_stack(|| match self {
            Self::Number(value) => write_number(f, *value),
            Self::Variable(name) => f.write_str(name),
            Self::Unary { op, operand } => {
                f.write_str(op.symbol())?;
                write_operand(f, operand, operand.precedence() < Precedence::Power)
            }
            Self::Binary { op, left, right } => {
                let prec = Precedence::of_binary(*op);
                let right_assoc = op.is_right_associative();
                let left_parens =
                    left.precedence() < prec || (right_assoc && left.precedence() == prec);
                let right_parens =
                    right.precedence() < prec || (!right_assoc && right.precedence() == prec);
                write_operand(f, left, left_parens)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right_parens)
            }
            Self::Call { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        })
    }
}

/// Non-finite values print as the division that produces them.
fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("0 / 0")
    } else if value == f64::INFINITY {
        f.write_str("1 / 0")
    } else if value == f64::NEG_INFINITY {
        f.write_str("-1 / 0")
    } else {
        write!(f, "{value}")
    }
}

/// Run a recursive walk on a stack that grows with the tree.
pub(crate) fn with_stack<R>(walk: impl FnOnce() -> R) -> R {
    maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, walk)
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use approx::assert_relative_eq;

    #[test]
    fn test_eval_reports_unbound_variable() {
        let expr = Expr::var("x") + Expr::num(1.0);
        assert_eq!(expr.eval(&Bindings::new()), Err(ExprError::unbound("x")));
    }

    #[test]
    fn test_eval_follows_ieee() {
        let env = Bindings::new();
        let inf = (Expr::num(1.0) / Expr::num(0.0)).eval(&env).expect("no variables");
        assert!(inf.is_infinite());
        let nan = Expr::call(Builtin::Sqrt, vec![Expr::num(-1.0)])
            .eval(&env)
            .expect("no variables");
        assert!(nan.is_nan());
    }

    #[test]
    fn test_eval_at_overrides_without_mutating() {
        let expr = Expr::var("Theta") * Expr::num(2.0);
        let env = Bindings::new().with("theta", 1.0);
        assert_eq!(expr.eval_at(&env, "THETA", 3.0), Ok(6.0));
        assert_eq!(expr.eval(&env), Ok(2.0));
    }

    #[test]
    fn test_cylindrical_projection() {
        let r = Expr::num(2.0);
        let env = Bindings::new();
        let theta = std::f64::consts::FRAC_PI_3;
        assert_relative_eq!(r.cyl_x(&env, theta).expect("constant"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            r.cyl_y(&env, theta).expect("constant"),
            3.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_variables_and_dependence() {
        let expr = compile("x*y + sin(Z) + PI").expect("valid formula");
        let names: Vec<String> = expr.variables().into_iter().collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert!(expr.depends_on("Z"));
        assert!(!expr.depends_on("pi"));
        assert!(!expr.is_constant());
        assert!(compile("2 * M_PI").expect("valid formula").is_constant());
    }

    #[test]
    fn test_eq_and_rem_operators() {
        assert_eq!(BinaryOp::Eq.apply(2.0, 2.0), 1.0);
        assert_eq!(BinaryOp::Eq.apply(2.0, 3.0), 0.0);
        assert_eq!(BinaryOp::Rem.apply(7.5, 2.0), 1.5);
    }

    #[test]
    fn test_display_minimal_parentheses() {
        let cases = [
            ("1 + 2 * 3", "1 + 2 * 3"),
            ("(1 + 2) * 3", "(1 + 2) * 3"),
            ("10 - (2 - 3)", "10 - (2 - 3)"),
            ("2 ** 3 ** 2", "2 ** 3 ** 2"),
            ("(2 ** 3) ** 2", "(2 ** 3) ** 2"),
            ("-4 ** 2", "-4 ** 2"),
            ("(-4) ** 2", "(-4) ** 2"),
            ("-(x + 1)", "-(x + 1)"),
            ("atan2(y,x)", "atan2(y, x)"),
        ];
        for (source, printed) in cases {
            let expr = compile(source).expect("valid formula");
            assert_eq!(expr.to_string(), printed, "printing {source}");
        }
    }

    #[test]
    fn test_display_compiles_back() {
        let env = Bindings::new().with("x", 0.7).with("y", -1.3);
        for source in [
            "x - -y",
            "2 ** -x",
            "-(x * y) / (1 + x ** 2)",
            "pow(x, 2) % 0.5 == 0",
            "5.5 - 9*3/3/3 + +6 + -4**2",
        ] {
            let expr = compile(source).expect("valid formula");
            let reparsed = compile(&expr.to_string()).expect("printed formula compiles");
            assert_eq!(
                reparsed.eval(&env).expect("bound"),
                expr.eval(&env).expect("bound"),
                "round trip of {source}"
            );
        }
    }

    #[test]
    fn test_display_non_finite_compiles_back() {
        let env = Bindings::new().with("x", 2.0);
        let nan = compile("sqrt(-1) + x").expect("valid formula").simplify();
        assert_eq!(nan.to_string(), "0 / 0 + x");
        let reparsed = compile(&nan.to_string()).expect("printed formula compiles");
        assert!(reparsed.eval(&env).expect("bound").is_nan());
        assert_eq!(reparsed.variables().len(), 1);
        assert!(reparsed.depends_on("x"));

        for (source, printed) in [
            ("x - 1/0", "x - 1 / 0"),
            ("x / (1/0)", "x / (1 / 0)"),
            ("x ** (-1/0)", "x ** (-1 / 0)"),
        ] {
            let expr = compile(source).expect("valid formula").simplify();
            assert_eq!(expr.to_string(), printed, "printing {source}");
            let reparsed = compile(printed).expect("printed formula compiles");
            assert_eq!(reparsed.eval(&env), expr.eval(&env), "round trip of {source}");
        }
    }

    #[test]
    fn test_deep_hand_built_tree_walks_on_small_stack() {
        let depth = 5_000;
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || {
                let mut expr = Expr::var("theta");
                for _ in 0..depth {
                    expr = expr + Expr::num(1.0);
                }
                let env = Bindings::new().with("theta", 0.5);
                let value = expr.eval(&env).expect("bound");
                let slope = expr.derivative("theta").expect("differentiable");
                let slope_value = slope.simplify().eval(&env).expect("bound");
                let printed = expr.to_string();
                // dropping is still recursive
                stacker::grow(32 * 1024 * 1024, move || drop((expr, slope)));
                (value, slope_value, printed.len())
            })
            .expect("spawn walker thread");
        let (value, slope, printed_len) = handle.join().expect("walks without overflow");
        assert_eq!(value, 0.5 + depth as f64);
        assert_eq!(slope, 1.0);
        assert_eq!(printed_len, "theta".len() + " + 1".len() * depth);
    }
}
