use core::f64::consts::TAU;

use glam::DVec3;

use super::assertions::*;
use crate::{vector::VECTOR_EPSILON, EllipseData, HyperbolaData, VectorExt};

fn textbook_ellipse() -> EllipseData {
    EllipseData::new(
        DVec3::new(3.0, 0.0, 0.0),
        DVec3::new(-3.0, 0.0, 0.0),
        DVec3::new(0.0, 4.0, 0.0),
    )
}

#[test]
fn ellipse_axes() {
    let ellipse = textbook_ellipse();

    assert_almost_eq_vec3(ellipse.get_center(), DVec3::ZERO, "ellipse center");
    assert_almost_eq_vec3(ellipse.get_axis_main(), DVec3::X, "ellipse main axis");
    assert_almost_eq_vec3(ellipse.get_axis_secondary(), DVec3::Y, "ellipse secondary axis");
    assert_almost_eq_vec3(ellipse.normal(), DVec3::Z, "ellipse normal");
}

#[test]
fn ellipse_anomaly_of_sampled_point() {
    let ellipse = textbook_ellipse();

    for i in 0..64 {
        let eccentric_anomaly = i as f64 * TAU / 64.0;
        let point = ellipse.sample_at(eccentric_anomaly);

        assert_almost_eq(
            point.distance(ellipse.get_focus0()) + point.distance(ellipse.get_focus1()),
            2.0 * ellipse.get_semi_major_axis(),
            &format!("focal distance sum at E={eccentric_anomaly}"),
        );
        assert_almost_eq(
            ellipse.anomaly_for_point(point),
            eccentric_anomaly,
            &format!("anomaly of sampled point at E={eccentric_anomaly}"),
        );
    }
}

#[test]
fn ellipse_flip_reverses_anomaly() {
    let mut ellipse = textbook_ellipse();
    let point = DVec3::new(0.0, 4.0, 0.0);

    assert_almost_eq(ellipse.anomaly_for_point(point), TAU * 0.25, "before flip");
    ellipse.flip_secondary_axis();
    assert_almost_eq(ellipse.anomaly_for_point(point), TAU * 0.75, "after flip");
    assert_almost_eq_vec3(ellipse.normal(), -DVec3::Z, "flipped normal");
}

#[test]
fn ellipse_align_to_normal() {
    let mut ellipse = textbook_ellipse();

    ellipse.align_to_normal(-DVec3::Z);
    assert_almost_eq_vec3(ellipse.normal(), -DVec3::Z, "aligned to -Z");

    ellipse.align_to_normal(DVec3::new(0.0, 0.3, 1.0));
    assert_almost_eq_vec3(ellipse.normal(), DVec3::Z, "aligned back to +Z");
}

#[test]
fn ellipse_through_main_axis_gets_plane_from_normal() {
    // The point is on the main axis, so the ellipse has no plane of its own
    let mut ellipse = EllipseData::new(DVec3::ZERO, DVec3::new(-10.0, 0.0, 0.0), DVec3::X * 10.0);

    assert_eq!(ellipse.get_axis_secondary(), DVec3::ZERO);
    assert_almost_eq(ellipse.get_semi_major_axis(), 15.0, "semi-major axis");
    assert_almost_eq(ellipse.get_eccentricity(), 1.0 / 3.0, "eccentricity");

    ellipse.align_to_normal(DVec3::Z);
    assert_almost_eq_vec3(ellipse.get_axis_secondary(), DVec3::Y, "rebuilt secondary axis");
}

fn textbook_hyperbola() -> HyperbolaData {
    HyperbolaData::new(
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(-20.0, 0.0, 0.0),
        DVec3::ZERO,
    )
}

#[test]
fn hyperbola_shape() {
    let hyperbola = textbook_hyperbola();

    assert_almost_eq(hyperbola.get_semi_major_axis(), 5.0, "semi-major axis");
    assert_almost_eq(hyperbola.get_focal_distance(), 15.0, "focal distance");
    assert_almost_eq(hyperbola.get_eccentricity(), 3.0, "eccentricity");
    assert_almost_eq(
        hyperbola.get_semi_minor_axis(),
        200f64.sqrt(),
        "semi-minor axis",
    );
    assert_almost_eq_vec3(hyperbola.get_center(), DVec3::new(-5.0, 0.0, 0.0), "center");
    assert_almost_eq_vec3(hyperbola.get_axis_main(), DVec3::X, "main axis towards the nearer focus");
}

#[test]
fn hyperbola_branches() {
    let mut hyperbola = textbook_hyperbola();
    hyperbola.orient_to(DVec3::Z);

    assert_almost_eq_vec3(hyperbola.normal(), DVec3::Z, "oriented normal");

    let focus0 = hyperbola.get_focus0();
    let focus1 = hyperbola.get_focus1();
    let distance_difference = 2.0 * hyperbola.get_semi_major_axis();

    for i in -20..=20 {
        let coordinate = i as f64 * 0.1;

        let near = hyperbola.sample_on_branch(coordinate, true);
        assert_almost_eq(
            (near.distance(focus1) - near.distance(focus0)) / distance_difference,
            1.0,
            &format!("main branch at {coordinate}"),
        );

        let far = hyperbola.sample_on_branch(coordinate, false);
        assert_almost_eq(
            (far.distance(focus0) - far.distance(focus1)) / distance_difference,
            1.0,
            &format!("far branch at {coordinate}"),
        );
        assert_almost_eq(far.z, 0.0, "far branch stays in plane");
    }
}

#[test]
fn hyperbola_orient_flips_secondary() {
    let mut hyperbola = HyperbolaData::new(
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(-20.0, 0.0, 0.0),
        DVec3::new(1.0, 5.0, 0.0),
    );
    assert_ne!(hyperbola.get_axis_secondary(), DVec3::ZERO);

    let before = hyperbola.normal();
    hyperbola.orient_to(-before);
    assert_almost_eq_vec3(hyperbola.normal(), -before, "flipped normal");
}

/// Any ellipse with a focus on the attractor through `start`, whose other
/// focus sits on the far branch, also passes through `end`.
#[test]
fn far_branch_foci_reach_both_points() {
    let start = DVec3::new(10.0, 0.0, 0.0);
    let end = DVec3::new(-6.0, 14.0, 0.0);

    let mut hyperbola = HyperbolaData::new(start, end, DVec3::ZERO);
    hyperbola.orient_to(DVec3::Z);

    for i in -10..=10 {
        let coordinate = i as f64 * 0.25;
        let empty_focus = hyperbola.sample_on_branch(coordinate, false);
        let ellipse = EllipseData::new(DVec3::ZERO, empty_focus, start);

        assert_almost_eq(
            (end.length() + end.distance(empty_focus)) / (2.0 * ellipse.get_semi_major_axis()),
            1.0,
            &format!("focal distance sum at the end point for {coordinate}"),
        );
    }
}

#[test]
fn vector_helpers() {
    assert_eq!(DVec3::splat(1e-46).normalized_or_zero(), DVec3::ZERO);
    assert_eq!(DVec3::ZERO.normalized_or_zero(), DVec3::ZERO);
    assert!(VECTOR_EPSILON > 0.0);
    assert_almost_eq_vec3(
        DVec3::new(0.0, 3.0, 4.0).normalized_or_zero(),
        DVec3::new(0.0, 0.6, 0.8),
        "normalized",
    );

    assert_almost_eq_vec3(
        DVec3::X.rotate_around(DVec3::Z * 5.0, TAU * 0.25),
        DVec3::Y,
        "quarter turn around Z",
    );
    assert_eq!(DVec3::X.rotate_around(DVec3::ZERO, 1.0), DVec3::X);

    assert_almost_eq(
        DVec3::X.signed_angle_to(DVec3::Y, DVec3::Z),
        TAU * 0.25,
        "positive signed angle",
    );
    assert_almost_eq(
        DVec3::X.signed_angle_to(DVec3::Y, -DVec3::Z),
        -TAU * 0.25,
        "negative signed angle",
    );
    assert_eq!(
        DVec3::new(1.0, 2.0, 3.0).project_on_plane(DVec3::Z),
        DVec3::new(1.0, 2.0, 0.0)
    );
}
