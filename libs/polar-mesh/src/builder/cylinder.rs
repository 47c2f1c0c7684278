//! # Cylinder Surfaces
//!
//! The profile curve is swept straight up from `z = 0` to `z = 1` without
//! scaling. The second coat of a cylinder is simply the same surface built
//! with the opposite orientation.

use super::facet::{push_facet, Corner};
use super::profile::{sector_u, RadiusProfile, Sample};
use super::PolarConfig;
use crate::error::MeshResult;
use crate::fragment::MeshFragment;
use glam::DVec3;

/// Smooth indexed cylinder wall with `slices + 1` rings.
///
/// `reversed` turns the normals inward and flips the winding.
pub(crate) fn build_indexed(
    profile: &RadiusProfile,
    config: &PolarConfig,
    reversed: bool,
) -> MeshResult<MeshFragment> {
    let sectors = config.sectors;
    let slices = config.slices;
    let epsilon = config.settings.normal_epsilon();
    let sign = if reversed { -1.0 } else { 1.0 };

    let ring_len = sectors as usize + 1;
    let mut fragment = MeshFragment::with_capacity(ring_len * (slices as usize + 1), true);

    let base = profile.ring()?;
    let mut prev = push_ring(&mut fragment, &base, 0, config, sign, epsilon);

    for h in 1..=slices {
        let resampled;
        let samples = if config.turbo {
            &base
        } else {
            resampled = profile.ring()?;
            &resampled
        };
        let curr = push_ring(&mut fragment, samples, h, config, sign, epsilon);

        for i in 0..sectors as usize {
            let (v00, v01, v10, v11) = (prev[i], prev[i + 1], curr[i], curr[i + 1]);
            if reversed {
                fragment.push_triangle(v00, v10, v01);
                fragment.push_triangle(v01, v10, v11);
            } else {
                fragment.push_triangle(v00, v01, v10);
                fragment.push_triangle(v01, v11, v10);
            }
        }
        prev = curr;
    }

    Ok(fragment)
}

fn push_ring(
    fragment: &mut MeshFragment,
    samples: &[Sample],
    level: u32,
    config: &PolarConfig,
    sign: f64,
    epsilon: f64,
) -> Vec<u32> {
    let v = level as f32 / config.slices as f32;
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            fragment.push_vertex(
                [s.x as f32, s.y as f32, v],
                s.cylinder_normal(sign, epsilon),
                [sector_u(i as u32, config.sectors), v],
            )
        })
        .collect()
}

/// Faceted flat cylinder wall.
///
/// Facets are wound so that their left-handed face normal points to the
/// same side as the smooth normal of the same orientation.
pub(crate) fn build_faceted(
    profile: &RadiusProfile,
    config: &PolarConfig,
    reversed: bool,
) -> MeshResult<MeshFragment> {
    let sectors = config.sectors as usize;
    let slices = config.slices;
    let epsilon = config.settings.normal_epsilon();

    let base = profile.ring()?;
    let grid: Vec<Vec<Corner>> = (0..=slices)
        .map(|h| {
            let z = f64::from(h) / f64::from(slices);
            base.iter()
                .enumerate()
                .map(|(i, s)| Corner {
                    position: DVec3::new(s.x, s.y, z),
                    uv: [sector_u(i as u32, config.sectors), z as f32],
                })
                .collect()
        })
        .collect();

    let mut fragment = MeshFragment::with_capacity(6 * sectors * slices as usize, false);
    for h in 0..slices as usize {
        for i in 0..sectors {
            let (v00, v01) = (grid[h][i], grid[h][i + 1]);
            let (v10, v11) = (grid[h + 1][i], grid[h + 1][i + 1]);
            if reversed {
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
