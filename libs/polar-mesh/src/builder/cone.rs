//! # Cone Surfaces
//!
//! The cone hangs from its tip at `z = -1` and opens to the profile curve at
//! `z = 0`. Reversing the builder swaps the two heights, which also reverses
//! the apparent winding.
//!
//! ```text
//!   z = 0   ──●───●───●──  ring `slices`   (full radius)
//!              \  |  /
//!   z = -½      ●─●─●      ring 1         (radius scaled by 1/slices)
//!                \|/
//!   z = -1        ●        tip (index 0)
//! ```

use super::facet::{push_facet, Corner};
use super::profile::{sector_u, RadiusProfile, Sample};
use super::PolarConfig;
use crate::error::MeshResult;
use crate::fragment::MeshFragment;
use glam::DVec3;

/// Tip and base heights for the current orientation.
fn heights(reversed: bool) -> (f64, f64) {
    if reversed {
        (0.0, -1.0)
    } else {
        (-1.0, 0.0)
    }
}

/// Smooth indexed cone for one coat.
///
/// The second coat turns its normals inward and winds every triangle the
/// other way round.
pub(crate) fn build_indexed(
    profile: &RadiusProfile,
    config: &PolarConfig,
    second_coat: bool,
) -> MeshResult<MeshFragment> {
    let sectors = config.sectors;
    let slices = config.slices;
    let epsilon = config.settings.normal_epsilon();
    let (z_tip, _) = heights(config.reversed);
    let nz = if second_coat { 1.0 } else { -1.0 };
    let flip = config.reversed != second_coat;

    let ring_len = sectors as usize + 1;
    let mut fragment = MeshFragment::with_capacity(1 + ring_len * slices as usize, true);

    let tip = fragment.push_vertex([0.0, 0.0, z_tip as f32], [0.0; 3], [0.5, 0.0]);

    let base = profile.ring()?;
    let mut prev = push_ring(&mut fragment, &base, 1, config, |s| {
        s.cone_normal(nz, flip, epsilon)
    });

    for i in 0..sectors as usize {
        if second_coat {
            fragment.push_triangle(tip, prev[i + 1], prev[i]);
        } else {
            fragment.push_triangle(tip, prev[i], prev[i + 1]);
        }
    }

    for h in 1..slices {
        let resampled;
        let samples = if config.turbo {
            &base
        } else {
            resampled = profile.ring()?;
            &resampled
        };
        let curr = push_ring(&mut fragment, samples, h + 1, config, |s| {
            s.cone_normal(nz, flip, epsilon)
        });

        for i in 0..sectors as usize {
            let (v00, v01, v10, v11) = (prev[i], prev[i + 1], curr[i], curr[i + 1]);
            if second_coat {
                fragment.push_triangle(v00, v01, v10);
                fragment.push_triangle(v01, v11, v10);
            } else {
                fragment.push_triangle(v00, v10, v01);
                fragment.push_triangle(v01, v10, v11);
            }
        }
        prev = curr;
    }

    Ok(fragment)
}

/// Push ring `level` (1 is next to the tip, `slices` is the base).
fn push_ring(
    fragment: &mut MeshFragment,
    samples: &[Sample],
    level: u32,
    config: &PolarConfig,
    normal: impl Fn(&Sample) -> [f32; 3],
) -> Vec<u32> {
    let (z_tip, z_base) = heights(config.reversed);
    let fraction = f64::from(level) / f64::from(config.slices);
    let z = z_tip + (z_base - z_tip) * fraction;

    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            fragment.push_vertex(
                [(s.x * fraction) as f32, (s.y * fraction) as f32, z as f32],
                normal(s),
                [sector_u(i as u32, config.sectors), fraction as f32],
            )
        })
        .collect()
}

/// Faceted flat cone for one coat, one normal per triangle.
pub(crate) fn build_faceted(
    profile: &RadiusProfile,
    config: &PolarConfig,
    second_coat: bool,
) -> MeshResult<MeshFragment> {
    let sectors = config.sectors as usize;
    let slices = config.slices;
    let epsilon = config.settings.normal_epsilon();
    let (z_tip, z_base) = heights(config.reversed);

    let base = profile.ring()?;
    // grid[h][i], h = 0 collapses onto the tip
    let grid: Vec<Vec<Corner>> = (0..=slices)
        .map(|h| {
            let fraction = f64::from(h) / f64::from(slices);
            let z = z_tip + (z_base - z_tip) * fraction;
            base.iter()
                .enumerate()
                .map(|(i, s)| Corner {
                    position: DVec3::new(s.x * fraction, s.y * fraction, z),
                    uv: [sector_u(i as u32, config.sectors), fraction as f32],
                })
                .collect()
        })
        .collect();

    let mut fragment = MeshFragment::with_capacity(3 * sectors * (2 * slices as usize - 1), false);
    let tip = Corner {
        position: DVec3::new(0.0, 0.0, z_tip),
        uv: [0.5, 0.0],
    };

    for i in 0..sectors {
        let (a, b) = (grid[1][i], grid[1][i + 1]);
        if second_coat {
            push_facet(&mut fragment, [tip, b, a], epsilon);
        } else {
            push_facet(&mut fragment, [tip, a, b], epsilon);
        }
    }

    for h in 1..slices as usize {
        for i in 0..sectors {
            let (v00, v01) = (grid[h][i], grid[h][i + 1]);
            let (v10, v11) = (grid[h + 1][i], grid[h + 1][i + 1]);
            if second_coat {
                push_facet(&mut fragment, [v00, v01, v10], epsilon);
                push_facet(&mut fragment, [v01, v11, v10], epsilon);
            } else {
                push_facet(&mut fragment, [v00, v10, v01], epsilon);
                push_facet(&mut fragment, [v01, v10, v11], epsilon);
            }
        }
    }

    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn config(formula: &str, sectors: u32, slices: u32) -> PolarConfig {
        PolarConfig {
            formula: formula.to_string(),
            sectors,
            slices,
            ..PolarConfig::default()
        }
    }

    fn indexed(config: &PolarConfig, second: bool) -> MeshFragment {
        let profile = RadiusProfile::new(config, true).unwrap();
        build_indexed(&profile, config, second).unwrap()
    }

    fn faceted(config: &PolarConfig, second: bool) -> MeshFragment {
        let profile = RadiusProfile::new(config, false).unwrap();
        build_faceted(&profile, config, second).unwrap()
    }

    #[test]
    fn test_indexed_counts() {
        let cone = indexed(&config("1", 6, 4), false);
        assert_eq!(cone.vertex_count(), 1 + 7 * 4);
        assert_eq!(cone.triangle_count(), 6 + 2 * 6 * 3);
        cone.validate().unwrap();
    }

    #[test]
    fn test_tip_is_first_with_zero_normal() {
        let cone = indexed(&config("1", 5, 2), false);
        assert_eq!(cone.position(0), [0.0, 0.0, -1.0]);
        assert_eq!(cone.normal(0), [0.0, 0.0, 0.0]);
        assert_eq!(cone.tex_coord(0), [0.5, 0.0]);
        let tips = cone.triangles().iter().flatten().filter(|&&v| v == 0).count();
        assert_eq!(tips, 5);
    }

    #[test]
    fn test_rings_scale_toward_tip() {
        let cone = indexed(&config("2", 4, 2), false);
        // ring 1 at half height and half radius
        let p = cone.position(1);
        assert_abs_diff_eq!(p[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[2], -0.5, epsilon = 1e-6);
        // base ring at full radius
        let q = cone.position(6);
        assert_abs_diff_eq!(q[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q[2], 0.0, epsilon = 1e-6);
        assert_eq!(cone.tex_coord(6), [0.0, 1.0]);
    }

    #[test]
    fn test_second_coat_points_inward() {
        let cfg = config("1", 4, 1);
        let outer = indexed(&cfg, false);
        let inner = indexed(&cfg, true);
        assert!(outer.normal(1)[0] > 0.0 && outer.normal(1)[2] < 0.0);
        assert!(inner.normal(1)[0] < 0.0 && inner.normal(1)[2] > 0.0);
        assert_eq!(outer.triangles()[0], [0, 1, 2]);
        assert_eq!(inner.triangles()[0], [0, 2, 1]);
    }

    #[test]
    fn test_reversed_moves_tip_up() {
        let mut cfg = config("1", 4, 1);
        cfg.reversed = true;
        let cone = indexed(&cfg, false);
        assert_eq!(cone.position(0)[2], 0.0);
        assert_abs_diff_eq!(cone.position(1)[2], -1.0, epsilon = 1e-6);
        assert!(cone.normal(1)[0] < 0.0);
    }

    #[test]
    fn test_turbo_matches_resampling() {
        let mut cfg = config("1 + cos(3*theta)/4", 12, 5);
        let fast = indexed(&cfg, false);
        cfg.turbo = false;
        let slow = indexed(&cfg, false);
        assert_eq!(fast, slow);
    }

    #[test]
    fn test_faceted_counts_and_outward_normals() {
        let cone = faceted(&config("1", 8, 3), false);
        assert!(!cone.is_indexed());
        assert_eq!(cone.triangle_count(), 8 + 2 * 8 * 2);
        assert_eq!(cone.vertex_count(), 3 * cone.triangle_count());
        // first tip facet leans outward and downward
        let n = cone.normal(0);
        assert!(n[0] > 0.0 && n[2] < 0.0);
        assert_eq!(cone.normal(0), cone.normal(2));
    }

    #[test]
    fn test_faceted_accepts_step_profiles() {
        let cone = faceted(&config("1 + floor(theta)", 6, 1), false);
        assert_eq!(cone.triangle_count(), 6);
    }
}
