use core::f64::consts::{PI, TAU};

use super::{assertions::*, RANDOM_CASES};
use crate::{
    anomaly::*,
    sinhcosh,
    solvers::{
        barker_mean_anomaly, elliptic_iterations, kepler_solver, kepler_solver_hyperbolic,
        keplers_equation, keplers_equation_hyperbolic, solve_barker,
    },
};

const MEAN_ANOMALIES: [f64; 11] = [-20.0, -7.5, -PI, -1.0, -1e-3, 0.0, 1e-3, 0.5, PI, 6.0, 20.0];

fn eccentricities() -> impl Iterator<Item = f64> {
    // [0, 5] in steps of 0.05, skipping the parabola which is checked separately
    (0..=100)
        .map(|i| i as f64 * 0.05)
        .filter(|&e| (e - 1.0).abs() > 1e-9)
}

#[test]
fn mean_eccentric_round_trip() {
    for e in eccentricities() {
        for m in MEAN_ANOMALIES {
            let eccentric_anomaly = mean_to_eccentric(m, e);
            assert_almost_eq(
                eccentric_to_mean(eccentric_anomaly, e),
                m,
                &format!("M -> E -> M round trip at M={m}, e={e}"),
            );
        }
    }
}

#[test]
fn mean_eccentric_round_trip_random() {
    for _ in 0..RANDOM_CASES * 8 {
        let e = if rand::random_bool(0.5) {
            rand::random_range(0.0..0.99)
        } else {
            rand::random_range(1.01..5.0)
        };
        let m = rand::random_range(-20.0..20.0);

        let eccentric_anomaly = mean_to_eccentric(m, e);
        assert_almost_eq(
            eccentric_to_mean(eccentric_anomaly, e),
            m,
            &format!("random M -> E -> M round trip at M={m}, e={e}"),
        );
    }
}

#[test]
fn parabolic_round_trip() {
    for m in MEAN_ANOMALIES {
        let true_anomaly = mean_to_eccentric(m, 1.0);
        assert_eq!(
            true_anomaly,
            mean_to_true(m, 1.0),
            "parabolic eccentric anomaly is the true anomaly"
        );
        assert!(true_anomaly.abs() < PI, "parabola stays within (-π, π)");
        assert_almost_eq(
            eccentric_to_mean(true_anomaly, 1.0),
            m,
            &format!("parabolic round trip at M={m}"),
        );
    }
}

#[test]
fn elliptic_solver_residual() {
    for e in eccentricities().filter(|&e| e < 1.0) {
        for m in MEAN_ANOMALIES {
            let eccentric_anomaly = kepler_solver(m, e);
            assert_almost_eq(
                keplers_equation(m, eccentric_anomaly, e),
                0.0,
                &format!("Kepler residual at M={m}, e={e}"),
            );
        }
    }
}

#[test]
fn hyperbolic_solver_residual() {
    for e in eccentricities().filter(|&e| e > 1.0) {
        for m in MEAN_ANOMALIES {
            let eccentric_anomaly = kepler_solver_hyperbolic(m, e);
            assert_almost_eq(
                keplers_equation_hyperbolic(m, eccentric_anomaly, e),
                0.0,
                &format!("hyperbolic Kepler residual at M={m}, e={e}"),
            );
        }
    }
}

#[test]
fn hyperbolic_solver_bad_seed() {
    // 2|M| / 0 + 1.8 is infinite
    assert_eq!(kepler_solver_hyperbolic(3.0, 0.0), 3.0);
    assert!(kepler_solver_hyperbolic(f64::NAN, 2.0).is_nan());
}

#[test]
fn elliptic_iteration_count() {
    assert_eq!(elliptic_iterations(0.0), 2);
    assert_eq!(elliptic_iterations(0.5), 4);
    assert_eq!(elliptic_iterations(0.99), 6);
}

#[test]
fn barker_inverse() {
    for m in MEAN_ANOMALIES {
        assert_almost_eq(
            barker_mean_anomaly(solve_barker(m)),
            m,
            &format!("Barker's equation at M={m}"),
        );
    }
}

#[test]
fn apses_are_fixed_points() {
    for e in [0.0, 0.3, 0.9] {
        assert_eq!(eccentric_to_true(0.0, e), 0.0);
        assert_eq!(true_to_eccentric(0.0, e), 0.0);
        assert_almost_eq(eccentric_to_true(PI, e), PI, &format!("apoapsis at e={e}"));
        assert_almost_eq(true_to_eccentric(PI, e), PI, &format!("apoapsis at e={e}"));
    }
}

#[test]
fn circular_anomalies_coincide() {
    for angle in [0.1, 1.0, 2.5, 4.0, 6.0] {
        assert_almost_eq(mean_to_true(angle, 0.0), angle, "M = ν on a circle");
        assert_almost_eq(true_to_mean(angle, 0.0), angle, "ν = M on a circle");
    }
}

#[test]
fn elliptic_revolutions_are_kept() {
    let e = 0.4;
    for angle in [0.3, 2.0, 5.0] {
        let base = eccentric_to_true(angle, e);
        assert_almost_eq(
            eccentric_to_true(angle + TAU, e),
            base + TAU,
            "E -> ν one revolution later",
        );
        assert_almost_eq(
            eccentric_to_true(angle - 2.0 * TAU, e),
            base - 2.0 * TAU,
            "E -> ν two revolutions earlier",
        );
        assert_almost_eq(
            true_to_eccentric(angle + TAU, e),
            true_to_eccentric(angle, e) + TAU,
            "ν -> E one revolution later",
        );
    }
}

#[test]
fn elliptic_true_anomaly_is_monotonic() {
    let e = 0.8;
    let mut last = f64::NEG_INFINITY;
    for i in 0..2000 {
        let mean_anomaly = -TAU + i as f64 * 0.01;
        let true_anomaly = mean_to_true(mean_anomaly, e);
        assert!(
            true_anomaly >= last,
            "true anomaly went backwards at M={mean_anomaly}: {true_anomaly} < {last}"
        );
        last = true_anomaly;
    }
}

#[test]
fn true_eccentric_round_trip() {
    for e in [0.0, 0.2, 0.7, 0.95, 1.0, 1.5, 3.0] {
        for true_anomaly in [-1.5, -0.5, 0.0, 0.7, 1.9] {
            let eccentric_anomaly = true_to_eccentric(true_anomaly, e);
            assert_almost_eq(
                eccentric_to_true(eccentric_anomaly, e),
                true_anomaly,
                &format!("ν -> E -> ν at ν={true_anomaly}, e={e}"),
            );
        }
    }
}

#[test]
fn hyperbolic_true_anomaly_outside_asymptote() {
    // acos(-1/2) = 120°
    assert!(true_to_eccentric(130f64.to_radians(), 2.0).is_nan());
    assert!(true_to_eccentric(110f64.to_radians(), 2.0).is_finite());
}

#[test]
fn non_finite_eccentricity_passes_through() {
    for e in [f64::NAN, f64::INFINITY] {
        assert_eq!(mean_to_eccentric(1.25, e), 1.25);
        assert_eq!(eccentric_to_mean(1.25, e), 1.25);
        assert_eq!(eccentric_to_true(1.25, e), 1.25);
        assert_eq!(true_to_eccentric(1.25, e), 1.25);
    }
}

#[test]
fn sinhcosh_matches_std() {
    for x in [-5.0, -1.0, 0.0, 0.25, 3.0] {
        let (sinh, cosh) = sinhcosh(x);
        assert_almost_eq(sinh, f64::sinh(x), &format!("sinh({x})"));
        assert_almost_eq(cosh, f64::cosh(x), &format!("cosh({x})"));
    }
}
