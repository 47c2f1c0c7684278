//! # Mesh Errors
//!
//! Error types for polar surface generation.
//!
//! Formula problems and geometry problems are kept apart so a host can
//! point the user at the right input field.

use polar_expr::ExprError;
use thiserror::Error;

/// Errors that can occur while building a polar surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// The radius formula failed to compile, evaluate or differentiate.
    #[error("Formula error: {0}")]
    Formula(#[from] ExprError),

    /// Sector or slice count outside the accepted range.
    #[error("Invalid resolution {sectors}x{slices}: {reason}")]
    InvalidResolution {
        sectors: u32,
        slices: u32,
        reason: String,
    },

    /// Indexed and flat fragments cannot be combined.
    #[error("Cannot append a flat fragment to an indexed one or vice versa")]
    IndexingMismatch,

    /// Buffer lengths disagree or an index is out of range.
    #[error("Invalid buffer: {message}")]
    InvalidBuffer { message: String },
}

impl MeshError {
    /// Creates an invalid resolution error.
    pub fn invalid_resolution(sectors: u32, slices: u32, reason: impl Into<String>) -> Self {
        Self::InvalidResolution {
            sectors,
            slices,
            reason: reason.into(),
        }
    }

    /// Creates an invalid buffer error.
    pub fn invalid_buffer(message: impl Into<String>) -> Self {
        Self::InvalidBuffer {
            message: message.into(),
        }
    }

    /// True when the formula, not the geometry setup, is at fault.
    pub fn is_formula_error(&self) -> bool {
        matches!(self, Self::Formula(_))
    }
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_errors_convert() {
        let err: MeshError = ExprError::unbound("k").into();
        assert!(err.is_formula_error());
        assert_eq!(err.to_string(), "Formula error: Unbound variable: k");
    }

    #[test]
    fn test_resolution_error_is_geometric() {
        let err = MeshError::invalid_resolution(0, 1, "sectors must be at least 1");
        assert!(!err.is_formula_error());
        assert_eq!(
            err.to_string(),
            "Invalid resolution 0x1: sectors must be at least 1"
        );
    }
}
