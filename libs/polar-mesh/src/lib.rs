//! # Polar Mesh
//!
//! Cone and cylinder surfaces swept from a polar radius formula.
//!
//! ## Architecture
//!
//! ```text
//! PolarConfig → compile r(theta) → d/dtheta → sample rings → MeshFragment
//!                                                           ├─ indexed
//!                                                           ├─ expanded (flat, smooth)
//!                                                           └─ faceted (flat, edged)
//! ```
//!
//! Every build returns a fresh [`MeshFragment`]. Multi-part shapes are made
//! by transforming fragments and joining them with [`MeshFragment::append`].
//!
//! ## Example
//!
//! ```rust
//! use polar_mesh::{geometry::translation_matrix, MeshFragment, PolarBuilder};
//!
//! let mut builder = PolarBuilder::new();
//! builder.formula("0.2").sectors_slices(24, 1);
//! let shaft = builder.build_cylinder_indexed_with(&[translation_matrix(0.0, 0.0, 1.0)])?;
//!
//! builder.formula("0.5");
//! let tip = builder.build_cone_indexed()?;
//!
//! let mut arrow = MeshFragment::indexed();
//! arrow.append(&tip)?;
//! arrow.append(&shaft)?;
//! assert_eq!(arrow.vertex_count(), tip.vertex_count() + shaft.vertex_count());
//! # Ok::<(), polar_mesh::MeshError>(())
//! ```
//!
//! ## Pipeline Integration
//!
//! ```text
//! polar-expr → polar-mesh → host renderer
//! ```

pub mod builder;
pub mod error;
pub mod fragment;
pub mod geometry;

// Re-export public API
pub use builder::{build_cone_polar, build_cone_polar_indexed, PolarBuilder, PolarConfig};
pub use error::{MeshError, MeshResult};
pub use fragment::MeshFragment;
