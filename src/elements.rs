use core::f64::consts::TAU;

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{OrbitShape, OrbitState, VectorExt};

/// Wraps an angle in degrees into `(-180, 180]`.
pub(crate) fn normalize_degrees(degrees: f64) -> f64 {
    180.0 - (180.0 - degrees).rem_euclid(360.0)
}

/// The six classical Keplerian elements of an orbit.
///
/// Angles are in degrees, matching the way ephemeris tables list them.
/// For parabolic orbits `semi_major_axis` holds the periapsis distance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    /// The eccentricity of the orbit.
    pub eccentricity: f64,

    /// The semi-major axis, or the periapsis distance of a parabola.
    pub semi_major_axis: f64,

    /// The mean anomaly at the epoch, in degrees.
    pub mean_anomaly: f64,

    /// The inclination against the reference plane, in degrees.
    pub inclination: f64,

    /// The argument of periapsis, in degrees.
    pub argument_of_periapsis: f64,

    /// The longitude of the ascending node, in degrees.
    pub ascending_node_longitude: f64,
}

impl OrbitalElements {
    /// Builds the orbit these elements describe around an attractor.
    ///
    /// See [`OrbitState::from_elements`].
    pub fn to_orbit(&self, attractor_mass: f64, gravitational_constant: f64) -> OrbitState {
        OrbitState::from_elements(
            self.eccentricity,
            self.semi_major_axis,
            self.mean_anomaly,
            self.inclination,
            self.argument_of_periapsis,
            self.ascending_node_longitude,
            attractor_mass,
            gravitational_constant,
        )
    }
}

impl OrbitState {
    /// Reads the classical elements back from the orbit.
    ///
    /// Angles come out in degrees within `(-180, 180]`, except the inclination
    /// which lies in `[0, 180]`. The mean anomaly of a closed orbit is in
    /// `[0, 360)`.
    ///
    /// Orbits lying in the reference plane have no line of nodes. Their
    /// longitude of the ascending node is reported as zero and the argument
    /// of periapsis is measured from the ecliptic right vector instead.
    ///
    /// # Example
    /// ```
    /// use kepler_orbits::OrbitState;
    ///
    /// let orbit = OrbitState::from_elements(0.3, 50.0, 40.0, 25.0, 70.0, 110.0, 1000.0, 0.1);
    /// let elements = orbit.to_elements();
    ///
    /// assert!((elements.inclination - 25.0).abs() < 1e-9);
    /// assert!((elements.ascending_node_longitude - 110.0).abs() < 1e-9);
    /// assert!((elements.argument_of_periapsis - 70.0).abs() < 1e-9);
    /// ```
    pub fn to_elements(&self) -> OrbitalElements {
        let ecliptic_normal = self.get_ecliptic_normal();
        let ecliptic_right = self.get_ecliptic_right();
        let orbit_normal = self.get_orbit_normal();

        let inclination = orbit_normal.dot(ecliptic_normal).clamp(-1.0, 1.0).acos();

        let mut node_line = ecliptic_normal.cross(orbit_normal).normalized_or_zero();
        if node_line == DVec3::ZERO {
            node_line = ecliptic_right;
        }

        let ascending_node_longitude = ecliptic_right.signed_angle_to(node_line, ecliptic_normal);
        let argument_of_periapsis =
            node_line.signed_angle_to(self.get_semi_major_axis_basis(), orbit_normal);

        let mean_anomaly = if self.get_shape().is_closed() {
            self.get_mean_anomaly().rem_euclid(TAU)
        } else {
            self.get_mean_anomaly()
        };

        let semi_major_axis = match self.get_shape() {
            OrbitShape::Parabolic => self.get_periapsis_distance(),
            _ => self.get_semi_major_axis(),
        };

        OrbitalElements {
            eccentricity: self.get_eccentricity(),
            semi_major_axis,
            mean_anomaly: mean_anomaly.to_degrees(),
            inclination: inclination.to_degrees(),
            argument_of_periapsis: argument_of_periapsis.to_degrees(),
            ascending_node_longitude: ascending_node_longitude.to_degrees(),
        }
    }
}

