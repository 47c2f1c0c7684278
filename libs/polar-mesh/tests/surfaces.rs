use approx::assert_abs_diff_eq;
use polar_mesh::{build_cone_polar_indexed, MeshError, MeshFragment, PolarBuilder};
use std::f64::consts::TAU;

fn cone(formula: &str, sectors: u32, slices: u32) -> MeshFragment {
    let mut builder = PolarBuilder::new();
    builder.formula(formula).sectors_slices(sectors, slices);
    builder.build_cone_indexed().unwrap()
}

#[test]
fn indices_stay_in_bounds() {
    for (sectors, slices) in [(1, 1), (3, 1), (5, 4), (64, 7)] {
        let mesh = cone("1 + sin(3*theta)/3", sectors, slices);
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.as_ref().unwrap().iter().all(|&i| i < count));
        mesh.validate().unwrap();
    }
}

#[test]
fn apex_is_emitted_once() {
    for sectors in [1, 2, 5, 33] {
        let mesh = cone("2", sectors, 3);
        let apexes = (0..mesh.vertex_count())
            .filter(|&i| mesh.position(i) == [0.0, 0.0, -1.0])
            .count();
        assert_eq!(apexes, 1);
        assert_eq!(mesh.normal(0), [0.0, 0.0, 0.0]);
    }
}

#[test]
fn full_turn_duplicates_seam_vertex() {
    let sectors = 12;
    let mesh = build_cone_polar_indexed("1 + cos(theta)/5", 0.0, TAU, sectors, 1).unwrap();
    let first = mesh.position(1);
    let last = mesh.position(1 + sectors as usize);
    assert_abs_diff_eq!(first[0], last[0], epsilon = 1e-6);
    assert_abs_diff_eq!(first[1], last[1], epsilon = 1e-6);
    assert_eq!(mesh.tex_coord(1)[0], 0.0);
    assert_eq!(mesh.tex_coord(1 + sectors as usize)[0], 1.0);
}

#[test]
fn flat_smooth_build_is_expanded_indexed_build() {
    let mut builder = PolarBuilder::new();
    builder
        .formula("1 + cos(5*theta)/4")
        .sectors_slices(40, 6)
        .double_coated(true);
    assert_eq!(
        builder.build_cone().unwrap(),
        builder.build_cone_indexed().unwrap().expand()
    );
    assert_eq!(
        builder.build_cylinder().unwrap(),
        builder.build_cylinder_indexed().unwrap().expand()
    );
}

#[test]
fn turbo_does_not_change_output() {
    let mut builder = PolarBuilder::new();
    builder.formula("theta / PI").domain(0.0, 3.0).sectors_slices(10, 5);
    let fast = builder.build_cone_indexed().unwrap();
    let slow = builder.turbo(false).build_cone_indexed().unwrap();
    assert_eq!(fast, slow);
}

#[test]
fn double_coat_doubles_geometry() {
    let mut builder = PolarBuilder::new();
    builder.sectors_slices(8, 2);
    let single = builder.build_cylinder_indexed().unwrap();
    let double = builder.double_coated(true).build_cylinder_indexed().unwrap();
    assert_eq!(double.vertex_count(), 2 * single.vertex_count());
    assert_eq!(double.triangle_count(), 2 * single.triangle_count());

    let half = single.vertex_count();
    let outer = double.normal(0);
    let inner = double.normal(half);
    assert_abs_diff_eq!(outer[0], -inner[0], epsilon = 1e-6);
}

#[test]
fn reversed_flips_cylinder_winding() {
    let mut builder = PolarBuilder::new();
    builder.sectors(6);
    let forward = builder.build_cylinder_indexed().unwrap();
    let backward = builder.reversed(true).build_cylinder_indexed().unwrap();
    for (f, b) in forward.triangles().iter().zip(backward.triangles().iter()) {
        assert_eq!(f[0], b[0]);
        assert_eq!((f[1], f[2]), (b[2], b[1]));
    }
}

#[test]
fn edged_build_handles_step_formula() {
    let mut builder = PolarBuilder::new();
    builder.formula("1 + floor(theta)").sectors(12).edged(true);
    let mesh = builder.build_cone().unwrap();
    assert!(!mesh.is_indexed());
    assert_eq!(mesh.triangle_count(), 12);

    let err = builder.build_cone_indexed().err().unwrap();
    assert!(err.is_formula_error());
}

#[test]
fn formula_and_resolution_errors_are_distinct() {
    let mut builder = PolarBuilder::new();
    builder.formula("1 + * theta");
    let err = builder.build_cylinder().err().unwrap();
    assert!(matches!(err, MeshError::Formula(_)));

    builder.formula("1").slices(0);
    let err = builder.build_cylinder().err().unwrap();
    assert!(matches!(err, MeshError::InvalidResolution { slices: 0, .. }));
}

#[test]
fn unbound_parameter_fails_until_bound() {
    let mut builder = PolarBuilder::new();
    builder.formula("k * (1 + cos(theta))");
    assert!(builder.build_cone_indexed().err().unwrap().is_formula_error());

    let small = builder.parameter("k", 1.0).build_cone_indexed().unwrap();
    let large = builder.parameter("k", 2.0).build_cone_indexed().unwrap();
    assert_abs_diff_eq!(large.position(1)[0], 2.0 * small.position(1)[0], epsilon = 1e-6);
}

#[test]
fn empty_domain_collapses_without_error() {
    let mut builder = PolarBuilder::new();
    builder.formula("1").domain(1.0, 1.0).sectors(4);
    let mesh = builder.build_cylinder_indexed().unwrap();
    assert_eq!(mesh.vertex_count(), 5 * 2);
    assert!((1..5).all(|i| mesh.position(i) == mesh.position(0)));
}
