//! Conversions between the mean, eccentric and true anomaly.
//!
//! Every function takes an angle in radians and the eccentricity of the
//! orbit, picks the formula for the orbit's [`OrbitShape`], and returns an
//! angle in radians. None of them panic: a NaN or infinite eccentricity makes
//! them return the input angle unchanged.
//!
//! For parabolic orbits the eccentric anomaly is the true anomaly, and the
//! mean anomaly follows Barker's equation.
//!
//! Elliptic conversions keep the number of whole revolutions in the input,
//! so `[2π, 4π)` maps onto `[2π, 4π)` and the output grows monotonically with
//! the input. Hyperbolic anomalies are unbounded and never wrapped.

use core::f64::consts::TAU;

use crate::{
    solvers::{barker_mean_anomaly, kepler_solver, kepler_solver_hyperbolic, solve_barker},
    OrbitShape,
};

/// Splits an angle into a whole number of turns and a remainder in `[0, 2π)`.
#[inline]
fn split_revolutions(angle: f64) -> (f64, f64) {
    let turns = (angle / TAU).floor();
    (turns * TAU, angle - turns * TAU)
}

/// Gets the eccentric anomaly from the mean anomaly.
///
/// Elliptic orbits go through the Laguerre solver, hyperbolic orbits through
/// the Newton solver, and parabolic orbits through the closed form solution
/// of Barker's equation.
///
/// # Performance
/// Non-parabolic orbits need an iterative solver, so this is the most expensive
/// conversion in this module. Cache the result if you can.
///
/// # Example
/// ```
/// use kepler_orbits::anomaly::{eccentric_to_mean, mean_to_eccentric};
///
/// let eccentric_anomaly = mean_to_eccentric(2.0, 0.4);
/// assert!((eccentric_to_mean(eccentric_anomaly, 0.4) - 2.0).abs() < 1e-6);
/// ```
pub fn mean_to_eccentric(mean_anomaly: f64, eccentricity: f64) -> f64 {
    if !eccentricity.is_finite() {
        return mean_anomaly;
    }

    match OrbitShape::from_eccentricity(eccentricity) {
        OrbitShape::Elliptic => kepler_solver(mean_anomaly, eccentricity),
        OrbitShape::Hyperbolic => kepler_solver_hyperbolic(mean_anomaly, eccentricity),
        OrbitShape::Parabolic => solve_barker(mean_anomaly),
    }
}

/// Gets the mean anomaly from the eccentric anomaly.
pub fn eccentric_to_mean(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    if !eccentricity.is_finite() {
        return eccentric_anomaly;
    }

    match OrbitShape::from_eccentricity(eccentricity) {
        OrbitShape::Elliptic => eccentric_anomaly - eccentricity * eccentric_anomaly.sin(),
        OrbitShape::Hyperbolic => eccentricity * eccentric_anomaly.sinh() - eccentric_anomaly,
        OrbitShape::Parabolic => barker_mean_anomaly(eccentric_anomaly),
    }
}

/// Gets the true anomaly from the eccentric anomaly.
///
/// # Example
/// ```
/// use core::f64::consts::PI;
/// use kepler_orbits::anomaly::eccentric_to_true;
///
/// // Apses are fixed points for every eccentricity.
/// assert_eq!(eccentric_to_true(0.0, 0.7), 0.0);
/// assert!((eccentric_to_true(PI, 0.7) - PI).abs() < 1e-12);
/// ```
pub fn eccentric_to_true(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    if !eccentricity.is_finite() {
        return eccentric_anomaly;
    }

    match OrbitShape::from_eccentricity(eccentricity) {
        OrbitShape::Elliptic => {
            let (turns, angle) = split_revolutions(eccentric_anomaly);
            let half = angle * 0.5;
            let true_anomaly = 2.0
                * ((1.0 + eccentricity).sqrt() * half.sin())
                    .atan2((1.0 - eccentricity).sqrt() * half.cos());
            turns + true_anomaly
        }
        OrbitShape::Hyperbolic => {
            let ratio = ((eccentricity + 1.0) / (eccentricity - 1.0)).sqrt();
            2.0 * (ratio * (eccentric_anomaly * 0.5).tanh()).atan()
        }
        OrbitShape::Parabolic => eccentric_anomaly,
    }
}

/// Gets the eccentric anomaly from the true anomaly.
///
/// Hyperbolic orbits only reach true anomalies inside `(-acos(-1/e), acos(-1/e))`.
/// Outside of that range the result is NaN.
pub fn true_to_eccentric(true_anomaly: f64, eccentricity: f64) -> f64 {
    if !eccentricity.is_finite() {
        return true_anomaly;
    }

    match OrbitShape::from_eccentricity(eccentricity) {
        OrbitShape::Elliptic => {
            let (turns, angle) = split_revolutions(true_anomaly);
            let half = angle * 0.5;
            let eccentric_anomaly = 2.0
                * ((1.0 - eccentricity).sqrt() * half.sin())
                    .atan2((1.0 + eccentricity).sqrt() * half.cos());
            turns + eccentric_anomaly
        }
        OrbitShape::Hyperbolic => {
            let ratio = ((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt();
            2.0 * (ratio * (true_anomaly * 0.5).tan()).atanh()
        }
        OrbitShape::Parabolic => true_anomaly,
    }
}

/// Gets the true anomaly from the mean anomaly.
#[inline]
pub fn mean_to_true(mean_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_to_true(mean_to_eccentric(mean_anomaly, eccentricity), eccentricity)
}

/// Gets the mean anomaly from the true anomaly.
#[inline]
pub fn true_to_mean(true_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_to_mean(true_to_eccentric(true_anomaly, eccentricity), eccentricity)
}
