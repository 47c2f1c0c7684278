//! # Polar Expressions
//!
//! Formula language for radius functions such as `1 + cos(5*theta)`.
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Tokenizer → TokenStream → Compiler → Expr
//!                                                    ├─ eval(&Bindings)
//!                                                    ├─ derivative(var)
//!                                                    └─ simplify()
//! ```
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::{compile, Bindings};
//!
//! let r = compile("x*x + y*y + z*z").unwrap();
//! let mut env = Bindings::new();
//! env.bind("x", 3.0).bind("y", 4.0).bind("z", 0.0);
//! assert_eq!(r.eval(&env).unwrap(), 25.0);
//!
//! env.bind("x", 1.0).bind("y", 1.0).bind("z", 1.0);
//! assert_eq!(r.eval(&env).unwrap(), 3.0);
//! ```
//!
//! ## Pipeline Integration
//!
//! ```text
//! polar-expr → polar-mesh
//! ```

pub mod bindings;
pub mod builtins;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod lexer;

// Re-export public API
pub use bindings::Bindings;
pub use builtins::{constant, Builtin};
pub use compiler::{compile, Compiler, Precedence};
pub use error::{ExprError, ExprResult};
pub use expr::{simplify, BinaryOp, Expr, UnaryOp};
pub use lexer::{tokenize, Token, TokenKind, TokenStream};
