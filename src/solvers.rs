//! Root finders for Kepler's equation and its hyperbolic and parabolic
//! counterparts.
//!
//! These functions do not check which regime an eccentricity falls in.
//! Use the dispatching conversions in [`crate::anomaly`] unless you already
//! know the shape of the orbit.

use crate::{sinhcosh, NUMERIC_MAX_ITERS};

/// Convergence threshold for the hyperbolic Newton iteration.
const HYPERBOLIC_TOLERANCE: f64 = 1e-8;

/// Kepler's equation for elliptic orbits, `E - e sin(E) - M`.
///
/// Zero when `eccentric_anomaly` matches `mean_anomaly`.
#[inline]
pub fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin() - mean_anomaly
}

/// The hyperbolic counterpart of Kepler's equation, `e sinh(F) - F - M`.
#[inline]
pub fn keplers_equation_hyperbolic(
    mean_anomaly: f64,
    eccentric_anomaly: f64,
    eccentricity: f64,
) -> f64 {
    eccentricity * eccentric_anomaly.sinh() - eccentric_anomaly - mean_anomaly
}

/// Number of Laguerre steps taken by [`kepler_solver`] for a given eccentricity.
///
/// Grows from 2 for circular orbits to 6 for nearly parabolic ones.
#[inline]
pub(crate) fn elliptic_iterations(eccentricity: f64) -> u32 {
    let half = ((eccentricity + 0.7) * 1.25).ceil().max(1.0) as u32;
    half << 1
}

/// Gets the eccentric anomaly of an elliptic orbit from its mean anomaly.
///
/// The revolution count carried by `mean_anomaly` is kept: a mean anomaly of
/// `2π + x` yields an eccentric anomaly of `2π + E(x)`.
///
/// # Unchecked Operation
/// This function does not check whether or not the orbit is actually elliptic (e < 1).
/// Nonsensical output may be produced if the orbit is not elliptic, but rather
/// hyperbolic or parabolic.
///
/// # Performance
/// The step count is fixed by the eccentricity instead of checking for
/// convergence, which keeps the cost bounded. The Laguerre update converges
/// fast enough below `e = 1` for this to hold the residual well under `1e-6`.
///
/// # Source
/// From the paper
/// "An improved algorithm due to laguerre for the solution of Kepler's equation."
/// by Bruce A. Conway
/// <https://doi.org/10.1007/bf01230852>
///
/// # Example
/// ```
/// use kepler_orbits::solvers::{kepler_solver, keplers_equation};
///
/// let eccentric_anomaly = kepler_solver(1.2, 0.6);
/// assert!(keplers_equation(1.2, eccentric_anomaly, 0.6).abs() < 1e-6);
/// ```
pub fn kepler_solver(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut eccentric_anomaly = mean_anomaly;

    // Laguerre's method with n = 5:
    //   E' = E - 5f / (f' + sign(f') sqrt(|16 f'^2 - 20 f f''|))
    // f = E - e sin(E) - M, f' = 1 - e cos(E), f'' = e sin(E)
    for _ in 0..elliptic_iterations(eccentricity) {
        let (sin, cos) = eccentric_anomaly.sin_cos();
        let delta = eccentric_anomaly - eccentricity * sin - mean_anomaly;
        let derivative = 1.0 - eccentricity * cos;

        let root = (16.0 * derivative * derivative - 20.0 * delta * eccentricity * sin)
            .abs()
            .sqrt();
        let denominator = derivative + root.copysign(derivative);

        if denominator == 0.0 || !denominator.is_finite() {
            break;
        }

        eccentric_anomaly += -5.0 * delta / denominator;
    }

    eccentric_anomaly
}

/// Gets the hyperbolic eccentric anomaly of an orbit from its mean anomaly.
///
/// Newton's method on `e sinh(F) - F - M`, seeded with Danby's guess
/// `F0 = sign(M) ln(2|M| / e + 1.8)`.
///
/// A seed that isn't finite (for example with `e = 0`) makes the function
/// return the mean anomaly unchanged.
///
/// # Unchecked Operation
/// This function does not check whether or not the orbit is actually hyperbolic.
/// Nonsensical output may be produced if the orbit is not hyperbolic, but rather
/// elliptic or parabolic.
///
/// # Performance
/// This function iterates until the Newton step drops below `1e-8`, up to
/// [`NUMERIC_MAX_ITERS`] times. It is recommended to cache this value if you can.
///
/// # Example
/// ```
/// use kepler_orbits::solvers::{kepler_solver_hyperbolic, keplers_equation_hyperbolic};
///
/// let eccentric_anomaly = kepler_solver_hyperbolic(-4.0, 1.8);
/// assert!(keplers_equation_hyperbolic(-4.0, eccentric_anomaly, 1.8).abs() < 1e-6);
/// ```
pub fn kepler_solver_hyperbolic(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let seed = (2.0 * mean_anomaly.abs() / eccentricity + 1.8).ln();
    if !seed.is_finite() {
        return mean_anomaly;
    }

    let mut eccentric_anomaly = seed.copysign(mean_anomaly);

    for _ in 0..NUMERIC_MAX_ITERS {
        let (sinh, cosh) = sinhcosh(eccentric_anomaly);
        let delta = (eccentricity * sinh - eccentric_anomaly - mean_anomaly)
            / (eccentricity * cosh - 1.0);

        if !delta.is_finite() {
            break;
        }

        eccentric_anomaly -= delta;

        if delta.abs() <= HYPERBOLIC_TOLERANCE {
            break;
        }
    }

    eccentric_anomaly
}

/// Solves Barker's equation for a parabolic orbit.
///
/// Returns the true anomaly whose half-angle tangent `t` satisfies
/// `t + t^3 / 3 = M`, using the closed form cubic root:
/// ```text
/// v = 12M + 4 sqrt(4 + 9M^2)
/// t = v^(1/3) / 2 - 2 / v^(1/3)
/// ```
///
/// # Example
/// ```
/// use kepler_orbits::solvers::{barker_mean_anomaly, solve_barker};
///
/// let true_anomaly = solve_barker(0.75);
/// assert!((barker_mean_anomaly(true_anomaly) - 0.75).abs() < 1e-9);
/// ```
pub fn solve_barker(mean_anomaly: f64) -> f64 {
    let v = 12.0 * mean_anomaly + 4.0 * (4.0 + 9.0 * mean_anomaly * mean_anomaly).sqrt();
    let cube_root = v.cbrt();
    let t = 0.5 * cube_root - 2.0 / cube_root;

    2.0 * t.atan()
}

/// Barker's equation: the mean anomaly of a parabolic orbit at the given
/// true anomaly, `tan(ν/2) + tan^3(ν/2) / 3`.
pub fn barker_mean_anomaly(true_anomaly: f64) -> f64 {
    let t = (true_anomaly * 0.5).tan();
    t + t * t * t / 3.0
}
