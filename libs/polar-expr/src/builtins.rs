//! # Builtins
//!
//! Named constants and the builtin function table.
//!
//! Lookups are case-insensitive: `PI`, `pi` and `Pi` all resolve to the same
//! constant, and `SIN(x)` calls `sin`.
//!
//! ## Functions
//!
//! | Function | Arity | Derivative |
//! |----------|-------|------------|
//! | sin cos tan | 1 | cos, -sin, 1/cos² |
//! | sqrt exp log | 1 | 0.5/sqrt, exp, 1/x |
//! | abs | 1 | sign |
//! | asin acos atan | 1 | ±1/sqrt(1-x²), 1/(1+x²) |
//! | sinh cosh tanh | 1 | cosh, sinh, 1-tanh² |
//! | floor ceil round sign | 1 | none |
//! | pow atan2 | 2 | partials in both arguments |
//! | fmod min max | 2 | none |

use crate::error::{ExprError, ExprResult};
use crate::expr::Expr;
use serde::{Deserialize, Serialize};
use std::f64::consts;
use std::fmt;

/// Canonical (lowercase) spelling of a name.
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
}

// =============================================================================
// CONSTANTS
// =============================================================================

const CONSTANTS: [(&str, f64); 16] = [
    ("m_e", consts::E),
    ("m_log2e", consts::LOG2_E),
    ("m_log10e", consts::LOG10_E),
    ("m_ln2", consts::LN_2),
    ("m_ln10", consts::LN_10),
    ("m_pi", consts::PI),
    ("m_pi_2", consts::FRAC_PI_2),
    ("m_pi_4", consts::FRAC_PI_4),
    ("m_1_pi", consts::FRAC_1_PI),
    ("m_2_pi", consts::FRAC_2_PI),
    ("m_2_sqrtpi", consts::FRAC_2_SQRT_PI),
    ("m_sqrt2", consts::SQRT_2),
    ("m_sqrt1_2", consts::FRAC_1_SQRT_2),
    ("pi", consts::PI),
    ("e", consts::E),
    ("tau", consts::TAU),
];

/// Value of a named constant.
///
/// ## Example
///
/// ```rust
/// use polar_expr::builtins::constant;
///
/// assert_eq!(constant("M_PI_2"), Some(std::f64::consts::FRAC_PI_2));
/// assert_eq!(constant("tau"), Some(std::f64::consts::TAU));
/// assert_eq!(constant("theta"), None);
/// ```
pub fn constant(name: &str) -> Option<f64> {
    let name = canonical_name(name);
    CONSTANTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, value)| *value)
}

// =============================================================================
// FUNCTIONS
// =============================================================================

/// A builtin function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Exp,
    Log,
    Abs,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Floor,
    Ceil,
    Round,
    /// `1` for non-negative input, `-1` otherwise.
    Sign,
    Pow,
    Atan2,
    Fmod,
    Min,
    Max,
}

impl Builtin {
    /// Every builtin, in table order.
    pub const ALL: [Builtin; 22] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Sqrt,
        Self::Exp,
        Self::Log,
        Self::Abs,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Floor,
        Self::Ceil,
        Self::Round,
        Self::Sign,
        Self::Pow,
        Self::Atan2,
        Self::Fmod,
        Self::Min,
        Self::Max,
    ];

    /// Resolve a function name.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::Builtin;
    ///
    /// assert_eq!(Builtin::lookup("COS"), Some(Builtin::Cos));
    /// assert_eq!(Builtin::lookup("cot"), None);
    /// ```
    pub fn lookup(name: &str) -> Option<Self> {
        let name = canonical_name(name);
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Lowercase function name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Abs => "abs",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Sign => "sign",
            Self::Pow => "pow",
            Self::Atan2 => "atan2",
            Self::Fmod => "fmod",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Number of arguments.
    pub fn arity(self) -> usize {
        match self {
            Self::Pow | Self::Atan2 | Self::Fmod | Self::Min | Self::Max => 2,
            _ => 1,
        }
    }

    /// Evaluate on already-evaluated arguments.
    ///
    /// Missing arguments read as NaN; the compiler rejects wrong arities so
    /// this only matters for hand-built trees.
    pub fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        let b = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Tan => a.tan(),
            Self::Sqrt => a.sqrt(),
            Self::Exp => a.exp(),
            Self::Log => a.ln(),
            Self::Abs => a.abs(),
            Self::Asin => a.asin(),
            Self::Acos => a.acos(),
            Self::Atan => a.atan(),
            Self::Sinh => a.sinh(),
            Self::Cosh => a.cosh(),
            Self::Tanh => a.tanh(),
            Self::Floor => a.floor(),
            Self::Ceil => a.ceil(),
            Self::Round => a.round(),
            Self::Sign => {
                if a >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Pow => a.powf(b),
            Self::Atan2 => a.atan2(b),
            Self::Fmod => a % b,
            Self::Min => {
                if a < b {
                    a
                } else {
                    b
                }
            }
            Self::Max => {
                if a > b {
                    a
                } else {
                    b
                }
            }
        }
    }

    /// Partial derivatives with respect to each argument, as expressions in
    /// the arguments.
    pub(crate) fn partials(self, args: &[Expr]) -> ExprResult<Vec<Expr>> {
        let call = |f: Builtin, args: Vec<Expr>| Expr::call(f, args);
        let one = || Expr::num(1.0);

        let u = match args.first() {
            Some(u) => u.clone(),
            None => return Err(ExprError::no_derivative(self.name())),
        };

        let partial = match self {
            Self::Sin => call(Self::Cos, vec![u]),
            Self::Cos => -call(Self::Sin, vec![u]),
            Self::Tan => one() / call(Self::Cos, vec![u]).pow(Expr::num(2.0)),
            Self::Sqrt => Expr::num(0.5) / call(Self::Sqrt, vec![u]),
            Self::Exp => call(Self::Exp, vec![u]),
            Self::Log => one() / u,
            Self::Abs => call(Self::Sign, vec![u]),
            Self::Asin => one() / call(Self::Sqrt, vec![one() - u.clone() * u]),
            Self::Acos => -(one() / call(Self::Sqrt, vec![one() - u.clone() * u])),
            Self::Atan => one() / (one() + u.clone() * u),
            Self::Sinh => call(Self::Cosh, vec![u]),
            Self::Cosh => call(Self::Sinh, vec![u]),
            Self::Tanh => one() - call(Self::Tanh, vec![u]).pow(Expr::num(2.0)),
            Self::Pow => {
                let b = args
                    .get(1)
                    .cloned()
                    .ok_or_else(|| ExprError::no_derivative(self.name()))?;
                let da = b.clone() * call(Self::Pow, vec![u.clone(), b.clone() - one()]);
                let db = call(Self::Pow, vec![u.clone(), b]) * call(Self::Log, vec![u]);
                return Ok(vec![da, db]);
            }
            Self::Atan2 => {
                let x = args
                    .get(1)
                    .cloned()
                    .ok_or_else(|| ExprError::no_derivative(self.name()))?;
                let y = u;
                let norm = x.clone() * x.clone() + y.clone() * y.clone();
                return Ok(vec![x / norm.clone(), -y / norm]);
            }
            Self::Floor
            | Self::Ceil
            | Self::Round
            | Self::Sign
            | Self::Fmod
            | Self::Min
            | Self::Max => return Err(ExprError::no_derivative(self.name())),
        };
        Ok(vec![partial])
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================
