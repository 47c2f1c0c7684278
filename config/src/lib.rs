//! # Config Crate
//!
//! Centralized configuration constants for the polar formula toolkit.
//! Builder defaults, numeric tolerances and resolution limits are defined
//! here so the expression and mesh crates agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_SECTORS, DEFAULT_SLICES, NORMAL_EPSILON};
//!
//! // Normals shorter than NORMAL_EPSILON are left unnormalized
//! let length: f64 = 0.00001;
//! assert!(length <= NORMAL_EPSILON);
//!
//! // Builder defaults
//! assert_eq!((DEFAULT_SECTORS, DEFAULT_SLICES), (5, 1));
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Validated Settings**: Tunable limits go through [`settings::MeshSettings::new`]
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
pub mod settings;

pub use settings::{ConfigError, MeshSettings};
