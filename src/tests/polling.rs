use core::f64::consts::TAU;

use glam::DVec3;

use crate::{tests::ORBIT_POLL_ANGLES, OrbitState};

/// Positions over one period for closed orbits, or over one radian of mean
/// anomaly on either side of the periapsis for open ones.
pub fn poll_orbit(orbit: &OrbitState) -> Vec<DVec3> {
    (0..ORBIT_POLL_ANGLES)
        .map(|i| {
            let fraction = (i as f64) / (ORBIT_POLL_ANGLES as f64);
            let time = if orbit.get_shape().is_closed() {
                fraction * orbit.get_period()
            } else {
                (2.0 * fraction - 1.0) / orbit.get_mean_motion()
            };
            orbit.get_state_vectors_after(time).position
        })
        .collect()
}

pub fn poll_eccentric_anomaly(orbit: &OrbitState) -> Vec<DVec3> {
    (0..ORBIT_POLL_ANGLES)
        .map(|i| {
            let angle = (i as f64) * TAU / (ORBIT_POLL_ANGLES as f64);
            let eccentric_anomaly = if orbit.get_shape().is_closed() {
                angle
            } else {
                // Keep within the reachable part of the open branch
                (angle - 0.5 * TAU) * 0.4
            };
            orbit.get_point_at_eccentric_anomaly(eccentric_anomaly)
        })
        .collect()
}

/// Advances a copy of the orbit in steps, collecting the position after each.
pub fn poll_advance(orbit: &OrbitState, steps: usize, delta_time: f64) -> Vec<DVec3> {
    let mut orbit = orbit.clone();
    (0..steps)
        .map(|_| {
            orbit.advance_by_time(delta_time);
            orbit.get_position()
        })
        .collect()
}
