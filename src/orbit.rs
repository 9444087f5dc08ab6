use core::f64::consts::{PI, TAU};

use glam::{DQuat, DVec2, DVec3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    anomaly::{eccentric_to_mean, eccentric_to_true, mean_to_eccentric, true_to_eccentric},
    elements::normalize_degrees,
    OrbitShape, StateVectors, VectorExt,
};

/// Eccentricity vectors shorter than this are rounding noise from a circular
/// orbit and carry no periapsis direction.
const CIRCULAR_ECCENTRICITY: f64 = 1e-12;

/// The state of a body on a Keplerian orbit around a single attractor.
///
/// Every derived element is cached and kept in sync with the position,
/// velocity and anomalies. Exactly one anomaly is set by the caller at a time
/// (directly or by advancing time), the other two and the state vectors are
/// recomputed from it.
///
/// All vectors are relative to the attractor, which sits at the focus of the
/// conic. The attractor itself is not part of this struct.
///
/// An orbit built with [`OrbitState::default`] is empty and invalid until
/// [`OrbitState::derive_from_vectors`] or [`OrbitState::derive_from_elements`]
/// is called on it.
///
/// # Invalid orbits
/// An orbit is valid when its eccentricity is not negative, its period is
/// positive and its attractor has a positive mass. See
/// [`OrbitState::is_valid_orbit`]. Every anomaly or shape setter is a silent
/// no-op on an invalid orbit.
///
/// # Example
/// ```
/// use kepler_orbits::OrbitState;
///
/// let orbit = OrbitState::from_elements(
///     // Eccentricity
///     0.25,
///     // Semi-major axis
///     100.0,
///     // Mean anomaly, in degrees
///     0.0,
///     // Inclination, in degrees
///     10.0,
///     // Argument of periapsis, in degrees
///     45.0,
///     // Longitude of ascending node, in degrees
///     120.0,
///     // Attractor mass
///     5000.0,
///     // Gravitational constant
///     1.0,
/// );
///
/// assert!(orbit.is_valid_orbit());
/// assert!((orbit.get_periapsis_distance() - 75.0).abs() < 1e-9);
/// assert!((orbit.get_apoapsis_distance() - 125.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitState {
    gravitational_constant: f64,
    attractor_mass: f64,
    ecliptic_normal: DVec3,
    ecliptic_up: DVec3,

    position: DVec3,
    velocity: DVec3,

    shape: OrbitShape,
    eccentricity: f64,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    focal_parameter: f64,
    period: f64,
    mean_motion: f64,
    orbit_normal: DVec3,
    semi_major_axis_basis: DVec3,
    semi_minor_axis_basis: DVec3,
    center_point: DVec3,
    periapsis: DVec3,
    apoapsis: DVec3,
    periapsis_distance: f64,
    apoapsis_distance: f64,
    attractor_distance: f64,
    energy_total: f64,
    orbit_normal_dot_ecliptic_normal: f64,

    mean_anomaly: f64,
    eccentric_anomaly: f64,
    true_anomaly: f64,
}

impl Default for OrbitState {
    /// An empty orbit in the default reference frame, with the ecliptic
    /// normal along +Z and the ecliptic up vector along +Y.
    ///
    /// The orbit is invalid until it is derived from vectors or elements.
    fn default() -> Self {
        Self {
            gravitational_constant: 0.0,
            attractor_mass: 0.0,
            ecliptic_normal: DVec3::Z,
            ecliptic_up: DVec3::Y,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            shape: OrbitShape::Elliptic,
            eccentricity: 0.0,
            semi_major_axis: 0.0,
            semi_minor_axis: 0.0,
            focal_parameter: 0.0,
            period: 0.0,
            mean_motion: 0.0,
            orbit_normal: DVec3::ZERO,
            semi_major_axis_basis: DVec3::ZERO,
            semi_minor_axis_basis: DVec3::ZERO,
            center_point: DVec3::ZERO,
            periapsis: DVec3::ZERO,
            apoapsis: DVec3::ZERO,
            periapsis_distance: 0.0,
            apoapsis_distance: 0.0,
            attractor_distance: 0.0,
            energy_total: 0.0,
            orbit_normal_dot_ecliptic_normal: 0.0,
            mean_anomaly: 0.0,
            eccentric_anomaly: 0.0,
            true_anomaly: 0.0,
        }
    }
}

/// Velocity for a circular orbit around an attractor.
///
/// The returned velocity has a magnitude of `sqrt(MG / r)` and points along
/// `orbit_normal × (body_position - attractor_position)`, so an orbit derived
/// from it has `orbit_normal` as its normal.
///
/// Returns the zero vector when the body sits on the attractor.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use kepler_orbits::circular_orbit_velocity;
///
/// let velocity = circular_orbit_velocity(
///     DVec3::ZERO,
///     DVec3::new(10.0, 0.0, 0.0),
///     1000.0,
///     DVec3::Z,
///     0.1,
/// );
///
/// assert!((velocity - DVec3::new(0.0, 10f64.sqrt(), 0.0)).length() < 1e-12);
/// ```
pub fn circular_orbit_velocity(
    attractor_position: DVec3,
    body_position: DVec3,
    attractor_mass: f64,
    orbit_normal: DVec3,
    gravitational_constant: f64,
) -> DVec3 {
    let offset = body_position - attractor_position;
    let distance = offset.length();
    if distance <= 0.0 {
        return DVec3::ZERO;
    }

    let direction = orbit_normal.cross(offset).normalized_or_zero();
    direction * (attractor_mass * gravitational_constant / distance).sqrt()
}

// Construction
impl OrbitState {
    /// Creates an orbit from the position and velocity of a body relative to
    /// its attractor.
    ///
    /// See [`OrbitState::derive_from_vectors`].
    pub fn from_state_vectors(
        position: DVec3,
        velocity: DVec3,
        attractor_mass: f64,
        gravitational_constant: f64,
    ) -> Self {
        let mut orbit = Self::default();
        orbit.derive_from_vectors(position, velocity, attractor_mass, gravitational_constant);
        orbit
    }

    /// Creates an orbit from classical orbital elements. Angles are in degrees.
    ///
    /// See [`OrbitState::derive_from_elements`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_elements(
        eccentricity: f64,
        semi_major_axis: f64,
        mean_anomaly_deg: f64,
        inclination_deg: f64,
        argument_of_periapsis_deg: f64,
        ascending_node_longitude_deg: f64,
        attractor_mass: f64,
        gravitational_constant: f64,
    ) -> Self {
        let mut orbit = Self::default();
        orbit.derive_from_elements(
            eccentricity,
            semi_major_axis,
            mean_anomaly_deg,
            inclination_deg,
            argument_of_periapsis_deg,
            ascending_node_longitude_deg,
            attractor_mass,
            gravitational_constant,
        );
        orbit
    }

    /// Creates an orbit from its eccentricity and the vectors of its semi-axes.
    ///
    /// `semi_major_axis_vector` points from the center towards the periapsis
    /// and its length is the semi-major axis.
    /// `semi_minor_axis_vector` follows the same convention as
    /// [`OrbitState::get_semi_minor_axis_basis`]: it points opposite to the
    /// direction of motion at periapsis. Only its direction is used.
    ///
    /// The mean anomaly is in degrees.
    pub fn from_axis_vectors(
        eccentricity: f64,
        semi_major_axis_vector: DVec3,
        semi_minor_axis_vector: DVec3,
        mean_anomaly_deg: f64,
        attractor_mass: f64,
        gravitational_constant: f64,
    ) -> Self {
        let mut orbit = Self {
            attractor_mass,
            gravitational_constant,
            ..Self::default()
        };

        orbit.semi_major_axis_basis = semi_major_axis_vector.normalized_or_zero();
        orbit.semi_minor_axis_basis = semi_minor_axis_vector.normalized_or_zero();
        orbit.orbit_normal = -orbit
            .semi_major_axis_basis
            .cross(orbit.semi_minor_axis_basis)
            .normalized_or_zero();

        orbit.set_shape_from_axis(eccentricity, semi_major_axis_vector.length());
        orbit.set_anomalies_from_mean(mean_anomaly_deg.to_radians());
        orbit.refresh_state_vectors();
        orbit.refresh_energy();
        orbit
    }

    /// Replaces the reference frame of the orbit.
    ///
    /// `ecliptic_normal` is the "north" of the reference plane and
    /// `ecliptic_up` lies within it. The default frame uses +Z and +Y.
    /// Both vectors are normalised.
    ///
    /// The position and velocity are kept and a valid orbit is re-derived
    /// from them, so only frame dependent values (nodes, elements) change.
    #[must_use]
    pub fn with_reference_frame(mut self, ecliptic_normal: DVec3, ecliptic_up: DVec3) -> Self {
        self.ecliptic_normal = ecliptic_normal.normalized_or_zero();
        self.ecliptic_up = ecliptic_up.normalized_or_zero();
        if self.is_valid_orbit() {
            self.derive_elements_from_vectors();
        }
        self
    }
}

// Derivation
impl OrbitState {
    /// Derives every element of the orbit from the position and velocity of
    /// the body relative to its attractor.
    ///
    /// - `h = position × velocity` is the specific angular momentum and gives
    ///   the orbit normal.
    /// - `ecc = (velocity × h) / MG - position / |position|` is the
    ///   eccentricity vector, pointing towards the periapsis.
    /// - `p = |h|^2 / MG` is the focal parameter.
    ///
    /// A near-zero angular momentum (radial trajectory) falls back to a normal
    /// of `position × ecliptic_up` and a zero eccentricity vector.
    /// A circular orbit has no periapsis direction of its own; its periapsis
    /// is placed at the current position.
    pub fn derive_from_vectors(
        &mut self,
        position: DVec3,
        velocity: DVec3,
        attractor_mass: f64,
        gravitational_constant: f64,
    ) {
        self.position = position;
        self.velocity = velocity;
        self.attractor_mass = attractor_mass;
        self.gravitational_constant = gravitational_constant;

        self.derive_elements_from_vectors();
    }

    /// Derives every element of the orbit from classical orbital elements.
    ///
    /// All angles are in degrees. Inclination, argument of periapsis and
    /// longitude of the ascending node are normalised into `(-180, 180]`
    /// before use.
    ///
    /// The orbital plane is built by rotating the reference frame:
    /// 1. The ecliptic right vector is rotated around the ecliptic normal by
    ///    the longitude of the ascending node, giving the line of nodes.
    /// 2. The ecliptic normal is rotated around the line of nodes by the
    ///    inclination, giving the orbit normal.
    /// 3. The line of nodes is rotated around the orbit normal by the argument
    ///    of periapsis, giving the periapsis direction.
    ///
    /// Hyperbolic orbits use the absolute value of `semi_major_axis`.
    /// Parabolic orbits (`eccentricity == 1`) have no finite semi-major axis,
    /// so `semi_major_axis` is read as the periapsis distance instead.
    #[allow(clippy::too_many_arguments)]
    pub fn derive_from_elements(
        &mut self,
        eccentricity: f64,
        semi_major_axis: f64,
        mean_anomaly_deg: f64,
        inclination_deg: f64,
        argument_of_periapsis_deg: f64,
        ascending_node_longitude_deg: f64,
        attractor_mass: f64,
        gravitational_constant: f64,
    ) {
        self.attractor_mass = attractor_mass;
        self.gravitational_constant = gravitational_constant;

        let inclination = normalize_degrees(inclination_deg).to_radians();
        let argument_of_periapsis = normalize_degrees(argument_of_periapsis_deg).to_radians();
        let ascending_node_longitude = normalize_degrees(ascending_node_longitude_deg).to_radians();

        let node_line = self
            .get_ecliptic_right()
            .rotate_around(self.ecliptic_normal, ascending_node_longitude);
        self.orbit_normal = self.ecliptic_normal.rotate_around(node_line, inclination);
        self.semi_major_axis_basis =
            node_line.rotate_around(self.orbit_normal, argument_of_periapsis);
        self.semi_minor_axis_basis = self.semi_major_axis_basis.cross(self.orbit_normal);

        self.set_shape_from_axis(eccentricity, semi_major_axis.abs());
        self.set_anomalies_from_mean(mean_anomaly_deg.to_radians());
        self.refresh_state_vectors();
        self.refresh_energy();
    }

    /// Re-derives the whole orbit from its current position and velocity.
    pub fn recalculate(&mut self) {
        self.derive_elements_from_vectors();
    }

    fn derive_elements_from_vectors(&mut self) {
        let gravitational_parameter = self.get_gravitational_parameter();
        let position = self.position;
        let velocity = self.velocity;

        self.attractor_distance = position.length();

        let angular_momentum = position.cross(velocity);
        self.orbit_normal = angular_momentum.normalized_or_zero();

        let eccentricity_vector = if self.orbit_normal.length_squared() < 0.99 {
            debug!(
                ?position,
                ?velocity,
                "Degenerate angular momentum, treating trajectory as radial"
            );
            self.orbit_normal = position.cross(self.ecliptic_up).normalized_or_zero();
            DVec3::ZERO
        } else {
            let raw = velocity.cross(angular_momentum) / gravitational_parameter
                - position / self.attractor_distance;
            raw.project_on_plane(self.orbit_normal)
        };
        let eccentricity_vector = if eccentricity_vector.length() < CIRCULAR_ECCENTRICITY {
            DVec3::ZERO
        } else {
            eccentricity_vector
        };

        self.focal_parameter = angular_momentum.length_squared() / gravitational_parameter;
        self.eccentricity = eccentricity_vector.length();
        self.shape = OrbitShape::from_eccentricity(self.eccentricity);

        self.semi_major_axis_basis = eccentricity_vector.normalized_or_zero();
        if self.semi_major_axis_basis == DVec3::ZERO {
            self.semi_major_axis_basis = position.normalized_or_zero();
        }
        self.semi_minor_axis_basis = self
            .semi_major_axis_basis
            .cross(self.orbit_normal)
            .normalized_or_zero();
        self.orbit_normal_dot_ecliptic_normal = self.orbit_normal.dot(self.ecliptic_normal);

        self.apply_shape();

        let motion_direction = -self.semi_minor_axis_basis;
        let true_anomaly = position
            .dot(motion_direction)
            .atan2(position.dot(self.semi_major_axis_basis));
        self.true_anomaly = if self.shape.is_closed() {
            true_anomaly.rem_euclid(TAU)
        } else {
            true_anomaly
        };
        self.eccentric_anomaly = true_to_eccentric(self.true_anomaly, self.eccentricity);
        self.mean_anomaly = eccentric_to_mean(self.eccentric_anomaly, self.eccentricity);

        self.refresh_energy();
    }

    /// Stores the eccentricity and the focal parameter implied by a
    /// semi-major axis, then derives the rest of the shape.
    fn set_shape_from_axis(&mut self, eccentricity: f64, semi_major_axis: f64) {
        self.eccentricity = eccentricity;
        self.shape = OrbitShape::from_eccentricity(eccentricity);
        self.focal_parameter = match self.shape {
            OrbitShape::Parabolic => 2.0 * semi_major_axis,
            shape => semi_major_axis * shape.compression_ratio(eccentricity),
        };
        self.orbit_normal_dot_ecliptic_normal = self.orbit_normal.dot(self.ecliptic_normal);

        self.apply_shape();
    }

    /// Derives the semi-axes, center, apses, period and mean motion from the
    /// eccentricity, focal parameter and periapsis direction.
    fn apply_shape(&mut self) {
        let gravitational_parameter = self.get_gravitational_parameter();
        let eccentricity = self.eccentricity;
        let focal_parameter = self.focal_parameter;
        let periapsis_direction = self.semi_major_axis_basis;

        self.periapsis_distance = focal_parameter / (1.0 + eccentricity);
        self.periapsis = periapsis_direction * self.periapsis_distance;

        match self.shape {
            OrbitShape::Elliptic => {
                let compression = self.shape.compression_ratio(eccentricity);
                let semi_major_axis = focal_parameter / compression;

                self.semi_major_axis = semi_major_axis;
                self.semi_minor_axis = semi_major_axis * compression.sqrt();
                self.center_point = -periapsis_direction * (semi_major_axis * eccentricity);
                self.mean_motion = (gravitational_parameter
                    / (semi_major_axis * semi_major_axis * semi_major_axis))
                    .sqrt();
                self.period = TAU
                    * (semi_major_axis * semi_major_axis * semi_major_axis
                        / gravitational_parameter)
                        .sqrt();
                self.apoapsis_distance = semi_major_axis * (1.0 + eccentricity);
                self.apoapsis = -periapsis_direction * self.apoapsis_distance;
            }
            OrbitShape::Hyperbolic => {
                let compression = self.shape.compression_ratio(eccentricity);
                let semi_major_axis = focal_parameter / compression;

                self.semi_major_axis = semi_major_axis;
                self.semi_minor_axis = semi_major_axis * compression.sqrt();
                self.center_point = periapsis_direction * (semi_major_axis * eccentricity);
                self.mean_motion = (gravitational_parameter
                    / (semi_major_axis * semi_major_axis * semi_major_axis))
                    .sqrt();
                self.period = f64::INFINITY;
                self.apoapsis_distance = f64::INFINITY;
                self.apoapsis = DVec3::ZERO;
            }
            OrbitShape::Parabolic => {
                let periapsis_distance = self.periapsis_distance;

                self.semi_major_axis = f64::INFINITY;
                self.semi_minor_axis = f64::INFINITY;
                self.center_point = self.periapsis;
                self.mean_motion = (gravitational_parameter
                    / (2.0
                        * periapsis_distance
                        * periapsis_distance
                        * periapsis_distance))
                    .sqrt();
                self.period = f64::INFINITY;
                self.apoapsis_distance = f64::INFINITY;
                self.apoapsis = DVec3::ZERO;
            }
        }
    }

    fn refresh_energy(&mut self) {
        self.attractor_distance = self.position.length();
        self.energy_total = self.velocity.length_squared()
            - 2.0 * self.get_gravitational_parameter() / self.attractor_distance;
    }

    fn set_anomalies_from_mean(&mut self, mean_anomaly: f64) {
        self.mean_anomaly = if self.shape.is_closed() {
            mean_anomaly.rem_euclid(TAU)
        } else {
            mean_anomaly
        };
        self.eccentric_anomaly = mean_to_eccentric(self.mean_anomaly, self.eccentricity);
        self.true_anomaly = eccentric_to_true(self.eccentric_anomaly, self.eccentricity);
    }
}

// Time and anomalies
impl OrbitState {
    /// Whether the orbit describes a body moving around a real attractor.
    ///
    /// True when the eccentricity is not negative, the period is positive
    /// (infinite for open orbits), the attractor mass is positive and the
    /// body sits at a finite distance from it. NaN anywhere makes it false.
    pub fn is_valid_orbit(&self) -> bool {
        self.eccentricity >= 0.0
            && self.period > 0.0
            && self.attractor_mass > 0.0
            && self.attractor_distance.is_finite()
    }

    /// Moves the body along its orbit by `delta_time`.
    ///
    /// Equivalent to [`OrbitState::update_anomalies_by_time`] followed by
    /// [`OrbitState::refresh_state_vectors`]. Only the anomalies, position and
    /// velocity change; the shape of the orbit stays the same.
    ///
    /// Does nothing on an invalid orbit.
    pub fn advance_by_time(&mut self, delta_time: f64) {
        if !self.is_valid_orbit() {
            return;
        }

        self.update_anomalies_by_time(delta_time);
        self.refresh_state_vectors();
    }

    /// Advances the mean anomaly by `mean_motion * delta_time` and solves
    /// for the other two anomalies, leaving the state vectors untouched.
    ///
    /// Closed orbits keep the mean anomaly within `[0, 2π)`. A negative
    /// remainder `r` is mapped to `2π - |r|`.
    pub fn update_anomalies_by_time(&mut self, delta_time: f64) {
        let (mean, eccentric, true_anomaly) = self.anomalies_after(delta_time);
        self.mean_anomaly = mean;
        self.eccentric_anomaly = eccentric;
        self.true_anomaly = true_anomaly;
    }

    /// Recomputes the position and velocity from the current anomalies.
    pub fn refresh_state_vectors(&mut self) {
        self.position = self.get_point_at_eccentric_anomaly(self.eccentric_anomaly);
        self.velocity = self.get_velocity_at_true_anomaly(self.true_anomaly);
        self.attractor_distance = self.position.length();
    }

    /// Mean, eccentric and true anomaly `delta_time` from now.
    fn anomalies_after(&self, delta_time: f64) -> (f64, f64, f64) {
        let mut mean_anomaly = self.mean_anomaly + self.mean_motion * delta_time;

        if self.shape.is_closed() {
            mean_anomaly %= TAU;
            if mean_anomaly < 0.0 {
                mean_anomaly = TAU - mean_anomaly.abs();
            }
        }

        let eccentric_anomaly = mean_to_eccentric(mean_anomaly, self.eccentricity);
        let true_anomaly = eccentric_to_true(eccentric_anomaly, self.eccentricity);

        (mean_anomaly, eccentric_anomaly, true_anomaly)
    }

    /// The position and velocity the body will have `delta_time` from now,
    /// without changing this orbit.
    ///
    /// Invalid orbits return their current state vectors.
    pub fn get_state_vectors_after(&self, delta_time: f64) -> StateVectors {
        if !self.is_valid_orbit() {
            return self.state_vectors();
        }

        let (_, eccentric_anomaly, true_anomaly) = self.anomalies_after(delta_time);
        StateVectors {
            position: self.get_point_at_eccentric_anomaly(eccentric_anomaly),
            velocity: self.get_velocity_at_true_anomaly(true_anomaly),
        }
    }

    /// Wraps a caller supplied anomaly the way the setters store it.
    fn wrap_anomaly(&self, anomaly: f64) -> f64 {
        if self.shape.is_closed() {
            anomaly.rem_euclid(TAU)
        } else {
            anomaly % TAU
        }
    }

    /// Sets the mean anomaly, in radians, and moves the body accordingly.
    ///
    /// Closed orbits wrap the value into `[0, 2π)`. Open orbits only take the
    /// remainder by 2π and keep its sign.
    ///
    /// Does nothing on an invalid orbit.
    pub fn set_mean_anomaly(&mut self, mean_anomaly: f64) {
        if !self.is_valid_orbit() {
            return;
        }

        self.mean_anomaly = self.wrap_anomaly(mean_anomaly);
        self.eccentric_anomaly = mean_to_eccentric(self.mean_anomaly, self.eccentricity);
        self.true_anomaly = eccentric_to_true(self.eccentric_anomaly, self.eccentricity);
        self.refresh_state_vectors();
    }

    /// Sets the eccentric anomaly, in radians, and moves the body accordingly.
    ///
    /// Wrapping follows [`OrbitState::set_mean_anomaly`].
    /// Does nothing on an invalid orbit.
    pub fn set_eccentric_anomaly(&mut self, eccentric_anomaly: f64) {
        if !self.is_valid_orbit() {
            return;
        }

        self.eccentric_anomaly = self.wrap_anomaly(eccentric_anomaly);
        self.mean_anomaly = eccentric_to_mean(self.eccentric_anomaly, self.eccentricity);
        self.true_anomaly = eccentric_to_true(self.eccentric_anomaly, self.eccentricity);
        self.refresh_state_vectors();
    }

    /// Sets the true anomaly, in radians, and moves the body accordingly.
    ///
    /// Wrapping follows [`OrbitState::set_mean_anomaly`].
    /// Does nothing on an invalid orbit.
    pub fn set_true_anomaly(&mut self, true_anomaly: f64) {
        if !self.is_valid_orbit() {
            return;
        }

        self.true_anomaly = self.wrap_anomaly(true_anomaly);
        self.eccentric_anomaly = true_to_eccentric(self.true_anomaly, self.eccentricity);
        self.mean_anomaly = eccentric_to_mean(self.eccentric_anomaly, self.eccentricity);
        self.refresh_state_vectors();
    }

    /// Changes the eccentricity while keeping the periapsis distance.
    ///
    /// Negative values are made positive. The mean anomaly is kept and the
    /// body is placed where that mean anomaly falls on the new conic, then
    /// the whole orbit is re-derived from the resulting vectors.
    ///
    /// Does nothing on an invalid orbit or with a non-finite eccentricity.
    ///
    /// # Example
    /// ```
    /// use kepler_orbits::OrbitState;
    ///
    /// let mut orbit = OrbitState::from_elements(0.1, 10.0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.1);
    /// orbit.set_eccentricity(1.5);
    ///
    /// assert!((orbit.get_eccentricity() - 1.5).abs() < 1e-9);
    /// assert!((orbit.get_periapsis_distance() - 9.0).abs() < 1e-9);
    /// ```
    pub fn set_eccentricity(&mut self, eccentricity: f64) {
        if !self.is_valid_orbit() || !eccentricity.is_finite() {
            return;
        }

        let eccentricity = eccentricity.abs();

        // Holding q = p / (1 + e) gives a = |q / (1 - e)| for both non-parabolic shapes.
        self.focal_parameter = self.periapsis_distance * (1.0 + eccentricity);
        self.eccentricity = eccentricity;
        self.shape = OrbitShape::from_eccentricity(eccentricity);
        self.apply_shape();

        self.eccentric_anomaly = mean_to_eccentric(self.mean_anomaly, eccentricity);
        self.true_anomaly = eccentric_to_true(self.eccentric_anomaly, eccentricity);
        self.refresh_state_vectors();

        self.derive_elements_from_vectors();
    }
}

// Sampling
impl OrbitState {
    /// Projects a point in the orbital plane into 3D.
    ///
    /// X runs towards the periapsis and Y along the direction of motion at
    /// periapsis.
    #[inline]
    fn transform_pqw_vector(&self, vector: DVec2) -> DVec3 {
        self.semi_major_axis_basis * vector.x - self.semi_minor_axis_basis * vector.y
    }

    /// The position on the orbit at the given eccentric anomaly, relative to
    /// the attractor.
    ///
    /// For parabolic orbits the eccentric anomaly is the true anomaly.
    pub fn get_point_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> DVec3 {
        let local = self.shape.central_position(
            eccentric_anomaly,
            self.semi_major_axis,
            self.semi_minor_axis,
            self.periapsis_distance,
        );

        self.center_point + self.transform_pqw_vector(local)
    }

    /// The position on the orbit at the given true anomaly, relative to the
    /// attractor.
    pub fn get_point_at_true_anomaly(&self, true_anomaly: f64) -> DVec3 {
        self.get_point_at_eccentric_anomaly(true_to_eccentric(true_anomaly, self.eccentricity))
    }

    /// The velocity on the orbit at the given true anomaly.
    ///
    /// `v = sqrt(MG / p) * (-sin ν, e + cos ν)` in the orbital plane.
    /// Returns the zero vector when the focal parameter isn't positive.
    pub fn get_velocity_at_true_anomaly(&self, true_anomaly: f64) -> DVec3 {
        if self.focal_parameter <= 0.0 {
            return DVec3::ZERO;
        }

        let speed = (self.get_gravitational_parameter() / self.focal_parameter).sqrt();
        let (sin, cos) = true_anomaly.sin_cos();

        self.transform_pqw_vector(DVec2::new(-sin, self.eccentricity + cos) * speed)
    }

    /// The velocity on the orbit at the given eccentric anomaly.
    pub fn get_velocity_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> DVec3 {
        self.get_velocity_at_true_anomaly(eccentric_to_true(eccentric_anomaly, self.eccentricity))
    }

    /// Samples `count` points along the orbit, none farther than
    /// `max_distance` from the attractor.
    ///
    /// See [`OrbitState::sample_orbit_path_into`] for the sampling rules.
    pub fn sample_orbit_path(&self, count: usize, max_distance: f64) -> Vec<DVec3> {
        let mut points = Vec::with_capacity(count);
        self.sample_orbit_path_into(count, max_distance, &mut points);
        points
    }

    /// Samples points along the orbit into a reusable buffer and returns how
    /// many were written.
    ///
    /// The buffer is cleared first. Its capacity is kept between calls.
    ///
    /// - Closed orbits whose apoapsis is within `max_distance` are sampled
    ///   uniformly in eccentric anomaly over the full `[0, 2π]`, so the first
    ///   and last points coincide.
    /// - Every other orbit is sampled uniformly in true anomaly over
    ///   `[-θ, θ]`, where `θ` is the true anomaly at which the distance to
    ///   the attractor equals `max_distance`.
    ///
    /// Nothing is written when `count < 2` or when even the periapsis is
    /// farther than `max_distance`.
    ///
    /// # Example
    /// ```
    /// use kepler_orbits::OrbitState;
    ///
    /// let orbit = OrbitState::from_elements(1.2, 10.0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.1);
    /// let mut buffer = Vec::new();
    ///
    /// let written = orbit.sample_orbit_path_into(64, 50.0, &mut buffer);
    /// assert_eq!(written, 64);
    /// assert!(buffer.iter().all(|point| point.length() <= 50.0 + 1e-6));
    /// ```
    pub fn sample_orbit_path_into(
        &self,
        count: usize,
        max_distance: f64,
        buffer: &mut Vec<DVec3>,
    ) -> usize {
        buffer.clear();

        if count < 2 {
            return 0;
        }

        let last = (count - 1) as f64;

        if self.shape.is_closed() && self.apoapsis_distance <= max_distance {
            buffer.extend((0..count).map(|i| {
                self.get_point_at_eccentric_anomaly(TAU * i as f64 / last)
            }));
            return buffer.len();
        }

        if self.periapsis_distance > max_distance {
            return 0;
        }

        // r = p / (1 + e cos θ)  =>  cos θ = (p / r - 1) / e
        let cos_max = ((self.focal_parameter / max_distance - 1.0) / self.eccentricity)
            .clamp(-1.0, 1.0);
        let max_true_anomaly = cos_max.acos();

        buffer.extend((0..count).map(|i| {
            let true_anomaly = -max_true_anomaly + 2.0 * max_true_anomaly * i as f64 / last;
            self.get_point_at_true_anomaly(true_anomaly)
        }));
        buffer.len()
    }

    /// True anomaly where the orbit crosses the reference plane.
    fn node_true_anomaly(&self, ascending: bool) -> Option<f64> {
        if self.shape == OrbitShape::Parabolic {
            return None;
        }

        let node_line = self
            .ecliptic_normal
            .cross(self.orbit_normal)
            .normalized_or_zero();
        if node_line == DVec3::ZERO {
            return None;
        }

        let motion_direction = -self.semi_minor_axis_basis;
        let ascending_anomaly = node_line
            .dot(motion_direction)
            .atan2(node_line.dot(self.semi_major_axis_basis));
        let true_anomaly = if ascending {
            ascending_anomaly
        } else {
            ascending_anomaly + PI
        };

        match self.shape {
            OrbitShape::Hyperbolic => {
                let wrapped = (true_anomaly + PI).rem_euclid(TAU) - PI;
                let max_true_anomaly = (-1.0 / self.eccentricity).acos();
                (wrapped.abs() < max_true_anomaly).then_some(wrapped)
            }
            _ => Some(true_anomaly),
        }
    }

    /// The point where the body crosses the reference plane going "north",
    /// relative to the attractor.
    ///
    /// `None` for parabolic orbits, for orbits lying in the reference plane,
    /// and for hyperbolic orbits that never reach that node.
    pub fn find_ascending_node(&self) -> Option<DVec3> {
        self.node_true_anomaly(true)
            .map(|true_anomaly| self.get_point_at_true_anomaly(true_anomaly))
    }

    /// The point where the body crosses the reference plane going "south",
    /// relative to the attractor.
    ///
    /// `None` in the same cases as [`OrbitState::find_ascending_node`].
    pub fn find_descending_node(&self) -> Option<DVec3> {
        self.node_true_anomaly(false)
            .map(|true_anomaly| self.get_point_at_true_anomaly(true_anomaly))
    }
}

// Host commands
impl OrbitState {
    /// Replaces the velocity with the circular orbit velocity at the current
    /// position, keeping the orbit normal.
    ///
    /// Does nothing on an invalid orbit.
    pub fn circularize(&mut self) {
        if !self.is_valid_orbit() {
            return;
        }

        self.velocity = circular_orbit_velocity(
            DVec3::ZERO,
            self.position,
            self.attractor_mass,
            self.orbit_normal,
            self.gravitational_constant,
        );
        self.derive_elements_from_vectors();
    }

    /// Reverses the direction of travel.
    pub fn invert_velocity(&mut self) {
        self.velocity = -self.velocity;
        self.derive_elements_from_vectors();
    }

    /// Rotates the position and velocity around the attractor, then
    /// re-derives the orbit.
    pub fn rotate(&mut self, rotation: DQuat) {
        self.position = rotation * self.position;
        self.velocity = rotation * self.velocity;
        self.derive_elements_from_vectors();
    }

    /// Changes the attractor mass and re-derives the orbit from the current
    /// position and velocity.
    pub fn set_attractor_mass(&mut self, attractor_mass: f64) {
        self.attractor_mass = attractor_mass;
        self.derive_elements_from_vectors();
    }

    /// Changes the gravitational constant and re-derives the orbit from the
    /// current position and velocity.
    pub fn set_gravitational_constant(&mut self, gravitational_constant: f64) {
        self.gravitational_constant = gravitational_constant;
        self.derive_elements_from_vectors();
    }
}

// Getters
impl OrbitState {
    /// Gets the position and velocity of the body.
    pub fn state_vectors(&self) -> StateVectors {
        StateVectors {
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Gets the position of the body relative to its attractor.
    pub fn get_position(&self) -> DVec3 {
        self.position
    }

    /// Gets the velocity of the body relative to its attractor.
    pub fn get_velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Gets the gravitational constant the orbit was built with.
    pub fn get_gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    /// Gets the mass of the attractor.
    pub fn get_attractor_mass(&self) -> f64 {
        self.attractor_mass
    }

    /// Gets the standard gravitational parameter, `MG`.
    pub fn get_gravitational_parameter(&self) -> f64 {
        self.attractor_mass * self.gravitational_constant
    }

    /// Gets the normal of the reference plane.
    pub fn get_ecliptic_normal(&self) -> DVec3 {
        self.ecliptic_normal
    }

    /// Gets the "up" vector of the reference plane.
    pub fn get_ecliptic_up(&self) -> DVec3 {
        self.ecliptic_up
    }

    /// Gets the "right" vector of the reference plane,
    /// `normalize(ecliptic_up × ecliptic_normal)`.
    ///
    /// Longitudes of the ascending node are measured from this direction.
    pub fn get_ecliptic_right(&self) -> DVec3 {
        self.ecliptic_up
            .cross(self.ecliptic_normal)
            .normalized_or_zero()
    }

    /// Gets the family of conic this orbit follows.
    pub fn get_shape(&self) -> OrbitShape {
        self.shape
    }

    /// Gets the eccentricity.
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Gets the semi-major axis. Positive for hyperbolas, infinite for parabolas.
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Gets the semi-minor axis. Infinite for parabolas.
    pub fn get_semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    /// Gets the focal parameter (semi-latus rectum).
    pub fn get_focal_parameter(&self) -> f64 {
        self.focal_parameter
    }

    /// Gets the orbital period. Infinite for open orbits.
    pub fn get_period(&self) -> f64 {
        self.period
    }

    /// Gets the mean motion, the rate of change of the mean anomaly.
    pub fn get_mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Gets the unit normal of the orbital plane.
    pub fn get_orbit_normal(&self) -> DVec3 {
        self.orbit_normal
    }

    /// Gets the unit vector pointing from the attractor towards the periapsis.
    pub fn get_semi_major_axis_basis(&self) -> DVec3 {
        self.semi_major_axis_basis
    }

    /// Gets the unit vector along the minor axis, `periapsis direction × orbit normal`.
    ///
    /// This points opposite to the direction of motion at periapsis.
    pub fn get_semi_minor_axis_basis(&self) -> DVec3 {
        self.semi_minor_axis_basis
    }

    /// Gets the offset from the attractor to the geometric center of the conic.
    ///
    /// For parabolas this is the vertex.
    pub fn get_center_point(&self) -> DVec3 {
        self.center_point
    }

    /// Gets the periapsis point, relative to the attractor.
    pub fn get_periapsis(&self) -> DVec3 {
        self.periapsis
    }

    /// Gets the apoapsis point, relative to the attractor.
    ///
    /// `None` for open orbits.
    pub fn get_apoapsis(&self) -> Option<DVec3> {
        self.shape.is_closed().then_some(self.apoapsis)
    }

    /// Gets the distance from the attractor to the periapsis.
    pub fn get_periapsis_distance(&self) -> f64 {
        self.periapsis_distance
    }

    /// Gets the distance from the attractor to the apoapsis. Infinite for open orbits.
    pub fn get_apoapsis_distance(&self) -> f64 {
        self.apoapsis_distance
    }

    /// Gets the current distance from the attractor.
    pub fn get_attractor_distance(&self) -> f64 {
        self.attractor_distance
    }

    /// Gets twice the specific orbital energy, `v^2 - 2 MG / r`.
    ///
    /// Negative for closed orbits, zero for parabolas and positive for hyperbolas.
    pub fn get_energy_total(&self) -> f64 {
        self.energy_total
    }

    /// Gets the cosine of the angle between the orbit normal and the ecliptic normal.
    pub fn get_orbit_normal_dot_ecliptic_normal(&self) -> f64 {
        self.orbit_normal_dot_ecliptic_normal
    }

    /// Gets the mean anomaly, in radians.
    pub fn get_mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// Gets the eccentric anomaly, in radians.
    ///
    /// This is the hyperbolic eccentric anomaly for hyperbolas and the
    /// true anomaly for parabolas.
    pub fn get_eccentric_anomaly(&self) -> f64 {
        self.eccentric_anomaly
    }

    /// Gets the true anomaly, in radians.
    pub fn get_true_anomaly(&self) -> f64 {
        self.true_anomaly
    }
}
