//! # Configuration Constants
//!
//! Centralized constants for formula compilation and polar mesh generation.
//!
//! ## Categories
//!
//! - **Precision**: Normal normalization tolerance
//! - **Builder Defaults**: Formula, domain and resolution defaults
//! - **Limits**: Maximum values for safety bounds, including formula nesting
//! - **Colors**: Default coat colors

use std::f64::consts::TAU;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Minimum length below which an analytic normal is left unnormalized.
///
/// Normals that collapse (for example at a radius of zero) keep their raw
/// components instead of being divided by a near-zero length.
///
/// # Example
///
/// ```rust
/// use config::constants::NORMAL_EPSILON;
///
/// let length: f64 = 2.0;
/// let scale = if length > NORMAL_EPSILON { 1.0 / length } else { 1.0 };
/// assert_eq!(scale, 0.5);
/// ```
pub const NORMAL_EPSILON: f64 = 1e-4;

// =============================================================================
// BUILDER DEFAULTS
// =============================================================================

/// Name of the free variable sampled by the polar builder.
///
/// # Example
///
/// ```rust
/// use config::constants::THETA;
///
/// assert_eq!(THETA, "theta");
/// ```
pub const THETA: &str = "theta";

/// Formula used when none is configured (unit radius).
pub const DEFAULT_FORMULA: &str = "1";

/// Default start of the sampled angular domain.
pub const DEFAULT_DOMAIN_START: f64 = 0.0;

/// Default end of the sampled angular domain (one full turn).
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_DOMAIN_END, DEFAULT_DOMAIN_START};
///
/// let range = DEFAULT_DOMAIN_END - DEFAULT_DOMAIN_START;
/// assert!((range - std::f64::consts::TAU).abs() < 1e-12);
/// ```
pub const DEFAULT_DOMAIN_END: f64 = TAU;

/// Default number of angular subdivisions.
pub const DEFAULT_SECTORS: u32 = 5;

/// Default number of height subdivisions.
pub const DEFAULT_SLICES: u32 = 1;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Minimum sector count accepted by the builder.
pub const MIN_SECTORS: u32 = 1;

/// Minimum slice count accepted by the builder.
pub const MIN_SLICES: u32 = 1;

/// Maximum sector count accepted by the builder.
///
/// Together with [`MAX_SLICES`] this keeps a double-coated mesh well inside
/// the `u32` index range.
///
/// # Example
///
/// ```rust
/// use config::constants::{MAX_SECTORS, MAX_SLICES};
///
/// let rings = (MAX_SLICES as u64) + 1;
/// let per_ring = (MAX_SECTORS as u64) + 1;
/// assert!(2 * rings * per_ring + 2 < u32::MAX as u64);
/// ```
pub const MAX_SECTORS: u32 = 16_384;

/// Maximum slice count accepted by the builder.
pub const MAX_SLICES: u32 = 16_384;

/// Maximum nesting depth of a compiled formula.
///
/// Counts parentheses, call arguments, signs and operator chains alike, so
/// both `((((x))))` and `x + x + ... + x` are bounded. Deeper formulas fail
/// to compile with a syntax error.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_EXPRESSION_DEPTH;
///
/// let nesting = 32;
/// assert!(nesting < MAX_EXPRESSION_DEPTH);
/// ```
pub const MAX_EXPRESSION_DEPTH: usize = 256;

/// Remaining stack below which recursive tree walks switch to a fresh
/// segment through the `stacker` crate.
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// Size of each stack segment allocated by the `stacker` crate.
///
/// # Example
///
/// ```rust
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
///
/// assert!(STACKER_STACK_SIZE_BYTES > STACKER_RED_ZONE_BYTES);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 1024 * 1024;

// =============================================================================
// COLOR CONSTANTS
// =============================================================================

/// Default color when none is specified (light gray).
///
/// RGBA values in range [0.0, 1.0]. Used to pad fragments that carry no
/// colors when they are merged with colored ones.
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Default color of the outer (first) coat.
pub const DEFAULT_OUTER_COLOR: [f32; 4] = [1.0, 0.0, 0.501_961, 1.0];

/// Default color of the inner (second) coat.
pub const DEFAULT_INNER_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the angle of sample `index` out of `count` over `[start, end]`.
///
/// Both ends are inclusive: `index == 0` yields `start` and
/// `index == count` yields `end` exactly.
///
/// # Example
///
/// ```rust
/// use config::constants::sample_angle;
///
/// assert_eq!(sample_angle(0.0, 2.0, 0, 4), 0.0);
/// assert_eq!(sample_angle(0.0, 2.0, 2, 4), 1.0);
/// assert_eq!(sample_angle(0.0, 2.0, 4, 4), 2.0);
/// ```
#[inline]
pub fn sample_angle(start: f64, end: f64, index: u32, count: u32) -> f64 {
    if index == count {
        return end;
    }
    start + (end - start) * f64::from(index) / f64::from(count)
}
