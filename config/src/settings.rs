//! # Mesh Settings
//!
//! Validated tunables shared by every polar build.

use crate::constants::{MAX_SECTORS, MAX_SLICES, NORMAL_EPSILON};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance and resolution limits applied by the polar builder.
///
/// # Examples
/// ```
/// use config::MeshSettings;
/// let settings = MeshSettings::default();
/// assert!(settings.normal_epsilon() > 0.0);
/// ```
///
/// Fields are only reachable through [`MeshSettings::new`] and
/// deserialization, both of which validate, so a limit can never exceed
/// [`MAX_SECTORS`] or [`MAX_SLICES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings")]
pub struct MeshSettings {
    /// Normals shorter than this are not normalized.
    normal_epsilon: f64,
    /// Largest accepted sector count.
    max_sectors: u32,
    /// Largest accepted slice count.
    max_slices: u32,
}

/// Unvalidated wire form of [`MeshSettings`].
#[derive(Deserialize)]
struct RawSettings {
    normal_epsilon: f64,
    max_sectors: u32,
    max_slices: u32,
}

impl TryFrom<RawSettings> for MeshSettings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, ConfigError> {
        Self::new(raw.normal_epsilon, raw.max_sectors, raw.max_slices)
    }
}

impl MeshSettings {
    /// Builds settings, rejecting non-positive tolerances and limits that
    /// exceed the crate-wide maxima.
    ///
    /// # Examples
    /// ```
    /// use config::MeshSettings;
    /// let settings = MeshSettings::new(1.0e-6, 256, 64).expect("valid settings");
    /// assert_eq!(settings.max_sectors(), 256);
    /// assert!(MeshSettings::new(0.0, 256, 64).is_err());
    /// ```
    pub fn new(normal_epsilon: f64, max_sectors: u32, max_slices: u32) -> Result<Self, ConfigError> {
        if normal_epsilon.is_nan() || normal_epsilon <= 0.0 {
            return Err(ConfigError::InvalidTolerance(normal_epsilon));
        }
        if max_sectors == 0 || max_sectors > MAX_SECTORS {
            return Err(ConfigError::InvalidLimit {
                name: "max_sectors",
                value: max_sectors,
                max: MAX_SECTORS,
            });
        }
        if max_slices == 0 || max_slices > MAX_SLICES {
            return Err(ConfigError::InvalidLimit {
                name: "max_slices",
                value: max_slices,
                max: MAX_SLICES,
            });
        }
        Ok(Self {
            normal_epsilon,
            max_sectors,
            max_slices,
        })
    }

    /// Normals shorter than this are not normalized.
    pub fn normal_epsilon(&self) -> f64 {
        self.normal_epsilon
    }

    /// Largest accepted sector count.
    pub fn max_sectors(&self) -> u32 {
        self.max_sectors
    }

    /// Largest accepted slice count.
    pub fn max_slices(&self) -> u32 {
        self.max_slices
    }
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            normal_epsilon: NORMAL_EPSILON,
            max_sectors: MAX_SECTORS,
            max_slices: MAX_SLICES,
        }
    }
}

/// Error returned when invalid settings are provided.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Raised when the tolerance is zero, negative or NaN.
    #[error("normal_epsilon must be positive: {0}")]
    InvalidTolerance(f64),
    /// Raised when a resolution limit is zero or above the crate maximum.
    #[error("{name} must be in 1..={max}: {value}")]
    InvalidLimit {
        name: &'static str,
        value: u32,
        max: u32,
    },
}
