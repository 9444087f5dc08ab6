#![cfg(test)]

use crate::OrbitState;

const ORBIT_POLL_ANGLES: usize = 4096;
const RANDOM_CASES: usize = 128;

/// Attractor mass used by the hand-checked scenarios.
const MASS: f64 = 1000.0;
/// Gravitational constant used by the hand-checked scenarios.
const G: f64 = 0.1;
/// `MASS * G`
const MU: f64 = MASS * G;

mod polling;
mod seeders;

mod anomaly;
mod conic;
mod elements;

/// A circular, equatorial orbit of the given radius, starting on +X.
fn circular_orbit(radius: f64, mean_anomaly_deg: f64) -> OrbitState {
    OrbitState::from_elements(0.0, radius, mean_anomaly_deg, 0.0, 0.0, 0.0, MASS, G)
}
