//! # Polar Builder
//!
//! Samples a radius formula `r(theta)` over an angular domain and sweeps it
//! into a cone or cylinder surface.
//!
//! ## Build Modes
//!
//! | Call                      | Output                                      |
//! |---------------------------|---------------------------------------------|
//! | `build_cone_indexed`      | shared vertices, analytic normals, indices  |
//! | `build_cone` (smooth)     | the indexed cone expanded through indices   |
//! | `build_cone` (edged)      | one face normal per triangle                |
//! | `build_cylinder*`         | same three modes for the cylinder wall      |
//!
//! Smooth normals come from the symbolic derivative of the formula, so a
//! smooth build fails on formulas without one (for example `floor(theta)`);
//! edged builds only evaluate the formula.
//!
//! ## Example
//!
//! ```rust
//! use polar_mesh::PolarBuilder;
//! use std::f64::consts::FRAC_PI_2;
//!
//! let mut builder = PolarBuilder::new();
//! builder.formula("theta / PI").domain(0.0, FRAC_PI_2).sectors(6).slices(4);
//! let cone = builder.build_cone_indexed().unwrap();
//! assert_eq!(cone.vertex_count(), 1 + 7 * 4);
//!
//! // Continue the same surface over the next quarter turn
//! builder.domain_shift(std::f64::consts::PI);
//! let next = builder.build_cone_indexed().unwrap();
//! assert_eq!(next.vertex_count(), cone.vertex_count());
//! ```

mod cone;
mod cylinder;
mod facet;
mod profile;

use crate::error::{MeshError, MeshResult};
use crate::fragment::MeshFragment;
use config::constants::{
    DEFAULT_DOMAIN_END, DEFAULT_DOMAIN_START, DEFAULT_FORMULA, DEFAULT_SECTORS, DEFAULT_SLICES,
    MIN_SECTORS, MIN_SLICES,
};
use config::MeshSettings;
use glam::Mat4;
use polar_expr::Bindings;
use profile::RadiusProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Everything a polar build depends on.
///
/// Plain data: hosts can keep one per shape, serialize it, and hand it to
/// [`PolarBuilder::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarConfig {
    /// Radius formula in the free variable `theta`.
    pub formula: String,
    pub domain_start: f64,
    pub domain_end: f64,
    /// Angular subdivisions.
    pub sectors: u32,
    /// Height subdivisions.
    pub slices: u32,
    /// Reuse the base ring samples for every higher ring.
    pub turbo: bool,
    /// Analytic per-vertex normals instead of per-face normals.
    pub smooth: bool,
    /// Add an inward-facing second coat.
    pub double_coated: bool,
    /// Flip the surface orientation.
    pub reversed: bool,
    /// Outer and inner coat colors. `None` leaves fragments uncolored.
    pub colors: Option<([f32; 4], [f32; 4])>,
    /// Extra formula variables besides `theta`.
    pub parameters: Bindings,
    pub settings: MeshSettings,
}

impl Default for PolarConfig {
    fn default() -> Self {
        Self {
            formula: DEFAULT_FORMULA.to_string(),
            domain_start: DEFAULT_DOMAIN_START,
            domain_end: DEFAULT_DOMAIN_END,
            sectors: DEFAULT_SECTORS,
            slices: DEFAULT_SLICES,
            turbo: true,
            smooth: true,
            double_coated: false,
            reversed: false,
            colors: None,
            parameters: Bindings::new(),
            settings: MeshSettings::default(),
        }
    }
}

impl PolarConfig {
    /// Checks sector and slice counts against the configured limits.
    pub fn validate(&self) -> MeshResult<()> {
        let (sectors, slices) = (self.sectors, self.slices);
        if sectors < MIN_SECTORS {
            return Err(MeshError::invalid_resolution(
                sectors,
                slices,
                format!("sectors must be at least {MIN_SECTORS}"),
            ));
        }
        if slices < MIN_SLICES {
            return Err(MeshError::invalid_resolution(
                sectors,
                slices,
                format!("slices must be at least {MIN_SLICES}"),
            ));
        }
        if sectors > self.settings.max_sectors() {
            return Err(MeshError::invalid_resolution(
                sectors,
                slices,
                format!("sectors must not exceed {}", self.settings.max_sectors()),
            ));
        }
        if slices > self.settings.max_slices() {
            return Err(MeshError::invalid_resolution(
                sectors,
                slices,
                format!("slices must not exceed {}", self.settings.max_slices()),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// BUILDER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Cone,
    Cylinder,
}

impl Shape {
    fn name(self) -> &'static str {
        match self {
            Shape::Cone => "cone",
            Shape::Cylinder => "cylinder",
        }
    }
}

/// Fluent front end over [`PolarConfig`].
///
/// Setters return `&mut Self` for chaining; build calls borrow the builder
/// and return a fresh [`MeshFragment`] each time, so one builder can produce
/// several pieces that the caller joins with [`MeshFragment::append`].
///
/// ## Example
///
/// ```rust
/// use polar_mesh::{geometry::rotation_x_matrix, PolarBuilder};
///
/// let mut builder = PolarBuilder::new();
/// builder
///     .formula("1 + cos(5*theta)/4")
///     .double_coated(true)
///     .turbo(false)
///     .sectors_slices(100, 10);
///
/// let mut shape = builder.build_cone_indexed().unwrap();
/// let tilted = builder
///     .build_cylinder_indexed_with(&[rotation_x_matrix(-std::f32::consts::FRAC_PI_2)])
///     .unwrap();
/// shape.append(&tilted).unwrap();
/// assert!(shape.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolarBuilder {
    config: PolarConfig,
}

impl PolarBuilder {
    /// Builder with default settings: unit radius, full turn, 5 sectors,
    /// 1 slice, turbo and smooth on, single coated, not reversed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: PolarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolarConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    pub fn formula(&mut self, formula: impl Into<String>) -> &mut Self {
        self.config.formula = formula.into();
        self
    }

    pub fn domain(&mut self, start: f64, end: f64) -> &mut Self {
        self.config.domain_start = start;
        self.config.domain_end = end;
        self
    }

    /// Domain `[0, end]`.
    pub fn domain_end(&mut self, end: f64) -> &mut Self {
        self.domain(0.0, end)
    }

    /// Continue from the current domain end up to `new_end`.
    pub fn domain_shift(&mut self, new_end: f64) -> &mut Self {
        self.config.domain_start = self.config.domain_end;
        self.config.domain_end = new_end;
        self
    }

    pub fn sectors(&mut self, sectors: u32) -> &mut Self {
        self.config.sectors = sectors;
        self
    }

    pub fn slices(&mut self, slices: u32) -> &mut Self {
        self.config.slices = slices;
        self
    }

    pub fn slices_sectors(&mut self, slices: u32, sectors: u32) -> &mut Self {
        self.slices(slices).sectors(sectors)
    }

    pub fn sectors_slices(&mut self, sectors: u32, slices: u32) -> &mut Self {
        self.sectors(sectors).slices(slices)
    }

    pub fn turbo(&mut self, enabled: bool) -> &mut Self {
        self.config.turbo = enabled;
        self
    }

    pub fn smooth(&mut self, enabled: bool) -> &mut Self {
        self.config.smooth = enabled;
        self
    }

    pub fn edged(&mut self, enabled: bool) -> &mut Self {
        self.smooth(!enabled)
    }

    pub fn double_coated(&mut self, enabled: bool) -> &mut Self {
        self.config.double_coated = enabled;
        self
    }

    pub fn single_coated(&mut self, enabled: bool) -> &mut Self {
        self.double_coated(!enabled)
    }

    pub fn reversed(&mut self, enabled: bool) -> &mut Self {
        self.config.reversed = enabled;
        self
    }

    pub fn nonreversed(&mut self, enabled: bool) -> &mut Self {
        self.reversed(!enabled)
    }

    /// Paint the first coat `outer` and the second coat `inner`.
    pub fn color(&mut self, outer: [f32; 4], inner: [f32; 4]) -> &mut Self {
        self.config.colors = Some((outer, inner));
        self
    }

    pub fn uncolored(&mut self) -> &mut Self {
        self.config.colors = None;
        self
    }

    /// Bind an extra formula variable.
    pub fn parameter(&mut self, name: &str, value: f64) -> &mut Self {
        self.config.parameters.bind(name, value);
        self
    }

    pub fn settings(&mut self, settings: MeshSettings) -> &mut Self {
        self.config.settings = settings;
        self
    }

    // -------------------------------------------------------------------------
    // Builds
    // -------------------------------------------------------------------------

    /// Smooth cone with shared vertices.
    ///
    /// ## Returns
    ///
    /// An indexed fragment whose vertex 0 is the tip, followed by
    /// `slices` rings of `sectors + 1` vertices from the tip outward.
    pub fn build_cone_indexed(&self) -> MeshResult<MeshFragment> {
        self.build(Shape::Cone, true)
    }

    /// Flat cone: the indexed cone expanded when smooth, faceted when edged.
    pub fn build_cone(&self) -> MeshResult<MeshFragment> {
        self.build(Shape::Cone, false)
    }

    /// Smooth cylinder wall with `slices + 1` rings of `sectors + 1` vertices.
    pub fn build_cylinder_indexed(&self) -> MeshResult<MeshFragment> {
        self.build(Shape::Cylinder, true)
    }

    /// Flat cylinder wall: expanded when smooth, faceted when edged.
    pub fn build_cylinder(&self) -> MeshResult<MeshFragment> {
        self.build(Shape::Cylinder, false)
    }

    /// [`build_cone_indexed`](Self::build_cone_indexed), then apply
    /// `transforms` in order.
    pub fn build_cone_indexed_with(&self, transforms: &[Mat4]) -> MeshResult<MeshFragment> {
        Ok(transformed(self.build_cone_indexed()?, transforms))
    }

    pub fn build_cone_with(&self, transforms: &[Mat4]) -> MeshResult<MeshFragment> {
        Ok(transformed(self.build_cone()?, transforms))
    }

    pub fn build_cylinder_indexed_with(&self, transforms: &[Mat4]) -> MeshResult<MeshFragment> {
        Ok(transformed(self.build_cylinder_indexed()?, transforms))
    }

    pub fn build_cylinder_with(&self, transforms: &[Mat4]) -> MeshResult<MeshFragment> {
        Ok(transformed(self.build_cylinder()?, transforms))
    }

    fn build(&self, shape: Shape, indexed: bool) -> MeshResult<MeshFragment> {
        let config = &self.config;
        config.validate()?;

        debug!(
            shape = shape.name(),
            formula = %config.formula,
            sectors = config.sectors,
            slices = config.slices,
            indexed,
            smooth = config.smooth,
            double_coated = config.double_coated,
            reversed = config.reversed,
            "Building polar surface"
        );

        let smooth = indexed || config.smooth;
        let profile = RadiusProfile::new(config, smooth)?;

        let mut fragment = self.coat(shape, smooth, &profile, false)?;
        if config.double_coated {
            let inner = self.coat(shape, smooth, &profile, true)?;
            fragment.append(&inner)?;
        }

        if !indexed && smooth {
            fragment = fragment.expand();
        }

        debug!(
            vertices = fragment.vertex_count(),
            triangles = fragment.triangle_count(),
            "Polar surface built"
        );
        Ok(fragment)
    }

    fn coat(
        &self,
        shape: Shape,
        smooth: bool,
        profile: &RadiusProfile,
        second: bool,
    ) -> MeshResult<MeshFragment> {
        let config = &self.config;
        let reversed = config.reversed != second;

        let mut fragment = match (shape, smooth) {
            (Shape::Cone, true) => cone::build_indexed(profile, config, second)?,
            (Shape::Cone, false) => cone::build_faceted(profile, config, second)?,
            (Shape::Cylinder, true) => cylinder::build_indexed(profile, config, reversed)?,
            (Shape::Cylinder, false) => cylinder::build_faceted(profile, config, reversed)?,
        };

        if let Some((outer, inner)) = config.colors {
            fragment.paint(if second { inner } else { outer });
        }
        Ok(fragment)
    }
}

fn transformed(mut fragment: MeshFragment, transforms: &[Mat4]) -> MeshFragment {
    for matrix in transforms {
        fragment.transform(matrix);
    }
    fragment
}

// =============================================================================
// ONE-SHOT HELPERS
// =============================================================================

/// Smooth single-coated flat cone over `[domain_start, domain_end]`.
pub fn build_cone_polar(
    formula: &str,
    domain_start: f64,
    domain_end: f64,
    sectors: u32,
    slices: u32,
) -> MeshResult<MeshFragment> {
    one_shot(formula, domain_start, domain_end, sectors, slices).build_cone()
}

/// Smooth single-coated indexed cone over `[domain_start, domain_end]`.
///
/// ## Example
///
/// ```rust
/// use polar_mesh::build_cone_polar_indexed;
///
/// let cone = build_cone_polar_indexed("2", 0.0, std::f64::consts::TAU, 5, 1).unwrap();
/// assert_eq!(cone.vertex_count(), 7);
/// assert_eq!(cone.triangle_count(), 5);
/// ```
pub fn build_cone_polar_indexed(
    formula: &str,
    domain_start: f64,
    domain_end: f64,
    sectors: u32,
    slices: u32,
) -> MeshResult<MeshFragment> {
    one_shot(formula, domain_start, domain_end, sectors, slices).build_cone_indexed()
}

fn one_shot(formula: &str, start: f64, end: f64, sectors: u32, slices: u32) -> PolarBuilder {
    let mut builder = PolarBuilder::new();
    builder
        .formula(formula)
        .domain(start, end)
        .sectors_slices(sectors, slices);
    builder
}

// =============================================================================
// TESTS
// =============================================================================
