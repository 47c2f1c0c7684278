//! Radius profile sampling.
//!
//! A profile is the compiled radius `r(theta)` plus, for smooth builds, its
//! simplified derivative. Each sample yields the Cartesian ring point and
//! the in-plane normal of the curve.

use super::PolarConfig;
use crate::error::MeshResult;
use config::constants::{sample_angle, THETA};
use glam::{DVec2, DVec3};
use polar_expr::{compile, Bindings, Expr};
use tracing::trace;

/// One angular sample of the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sample {
    pub theta: f64,
    pub r: f64,
    pub dr: f64,
    /// `r·cos θ`
    pub x: f64,
    /// `r·sin θ`
    pub y: f64,
}

impl Sample {
    /// Outward curve normal `(dr·sin θ + r·cos θ, r·sin θ − dr·cos θ)`,
    /// unnormalized.
    pub fn curve_normal(&self) -> DVec2 {
        let (sin, cos) = self.theta.sin_cos();
        DVec2::new(self.dr * sin + self.r * cos, -(self.dr * cos - self.r * sin))
    }

    /// Cone side normal with the given z component; `flip` mirrors the
    /// in-plane part. Normalized when longer than `epsilon`.
    pub fn cone_normal(&self, nz: f64, flip: bool, epsilon: f64) -> [f32; 3] {
        let n = self.curve_normal();
        let n = if flip { -n } else { n };
        to_f32(crate::geometry::normalize_or_keep(n.extend(nz), epsilon))
    }

    /// Cylinder side normal: the in-plane curve normal scaled by `sign`.
    pub fn cylinder_normal(&self, sign: f64, epsilon: f64) -> [f32; 3] {
        let n = self.curve_normal();
        let len = n.length();
        let n = if len > epsilon { n / len } else { n };
        to_f32((n * sign).extend(0.0))
    }
}

/// Compiled radius function with its sampling parameters.
pub(crate) struct RadiusProfile {
    r: Expr,
    dr: Option<Expr>,
    bindings: Bindings,
    start: f64,
    end: f64,
    sectors: u32,
}

impl RadiusProfile {
    /// Compile the configured formula. The derivative is only formed when
    /// `with_derivative` is set, so faceted builds accept formulas such as
    /// `floor(theta)` that have none.
    pub fn new(config: &PolarConfig, with_derivative: bool) -> MeshResult<Self> {
        let r = compile(&config.formula)?;
        let dr = if with_derivative {
            let dr = r.derivative(THETA)?.simplify();
            trace!(formula = %config.formula, derivative = %dr, "radius derivative");
            Some(dr)
        } else {
            None
        };

        Ok(Self {
            r,
            dr,
            bindings: config.parameters.clone(),
            start: config.domain_start,
            end: config.domain_end,
            sectors: config.sectors,
        })
    }

    /// Sample at sector boundary `index` in `0..=sectors`.
    pub fn sample(&self, index: u32) -> MeshResult<Sample> {
        let theta = sample_angle(self.start, self.end, index, self.sectors);
        let r = self.r.eval_at(&self.bindings, THETA, theta)?;
        let dr = match &self.dr {
            Some(dr) => dr.eval_at(&self.bindings, THETA, theta)?,
            None => 0.0,
        };
        let (sin, cos) = theta.sin_cos();
        Ok(Sample {
            theta,
            r,
            dr,
            x: r * cos,
            y: r * sin,
        })
    }

    /// All `sectors + 1` samples, both domain ends included.
    pub fn ring(&self) -> MeshResult<Vec<Sample>> {
        (0..=self.sectors).map(|i| self.sample(i)).collect()
    }
}

/// Texture u of sector boundary `index`.
pub(crate) fn sector_u(index: u32, sectors: u32) -> f32 {
    index as f32 / sectors as f32
}

pub(crate) fn to_f32(v: DVec3) -> [f32; 3] {
    v.as_vec3().to_array()
}
