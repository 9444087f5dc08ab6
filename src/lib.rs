//! # Keplerian Orbit State & Transfers
//! This library crate contains logic for Keplerian orbits around a single
//! attractor, and for finding transfer trajectories between two of them.
//!
//! An orbit is described by a two-body configuration: the mass of the
//! attractor, a gravitational constant, and either the position and velocity
//! of the orbiting body or its classical orbital elements.
//! From those inputs the full shape of the conic section (ellipse, parabola
//! or hyperbola) is derived and cached, and the body can then be moved along
//! that conic by advancing time or by setting one of its anomalies directly.
//!
//! ## Getting started
//! This crate provides a handful of main items:
//! - [`OrbitState`]: The central orbit entity. It caches every derived
//!   element of the orbit and keeps its position, velocity and anomalies
//!   in sync.
//! - [`anomaly`]: Pure conversions between mean, eccentric and true anomaly,
//!   backed by the iterative Kepler solvers in [`solvers`].
//! - [`EllipseData`] and [`HyperbolaData`]: Conic sections built from two
//!   foci and a point on the curve.
//! - [`transfer`]: The transfer trajectory solver, which finds an ellipse
//!   between two points that takes a given time to travel.
//! - [`Universe`]: A hierarchy of bodies orbiting each other, able to project
//!   absolute positions through attractor chains and plan transfers between
//!   any two bodies.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//!
//! use kepler_orbits::{circular_orbit_velocity, OrbitState};
//!
//! # fn main() {
//! let position = DVec3::new(10.0, 0.0, 0.0);
//! let velocity = circular_orbit_velocity(DVec3::ZERO, position, 1000.0, DVec3::Z, 0.1);
//!
//! let mut orbit = OrbitState::from_state_vectors(position, velocity, 1000.0, 0.1);
//! assert!(orbit.is_valid_orbit());
//! assert!((orbit.get_semi_major_axis() - 10.0).abs() < 1e-9);
//!
//! // A quarter of a revolution later the body is a quarter turn further along.
//! orbit.advance_by_time(orbit.get_period() * 0.25);
//! assert!((orbit.get_position() - DVec3::new(0.0, 10.0, 0.0)).length() < 1e-6);
//! # }
//! ```

#![warn(missing_docs)]

pub mod anomaly;
mod body;
pub mod conic;
mod elements;
mod orbit;
pub mod solvers;
pub mod transfer;
mod universe;
pub mod vector;

use glam::{DVec2, DVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use body::Body;
pub use conic::{EllipseData, HyperbolaData};
pub use elements::OrbitalElements;
pub use orbit::{circular_orbit_velocity, OrbitState};
pub use transfer::{TransferError, TransferSettings, TransitionResult};
pub use universe::{BodyRelation, ElementRecord, Id, Universe, UniverseError};
pub use vector::VectorExt;

/// The maximum number of iterations for the numerical approach algorithms.
///
/// This is used to prevent infinite loops in case the method fails to converge.
pub const NUMERIC_MAX_ITERS: u32 = 1000;

/// The gravitational constant, in m^3 kg^-1 s^-2.
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// A struct representing a position and velocity at a point in the orbit.
///
/// Both vectors are relative to the attractor the orbit belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The 3D position at a point in the orbit.
    pub position: DVec3,
    /// The 3D velocity at a point in the orbit.
    pub velocity: DVec3,
}

impl StateVectors {
    /// Creates a new pair of state vectors.
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    /// Derives a full [`OrbitState`] from these state vectors, for a body
    /// orbiting an attractor of the given mass.
    ///
    /// See [`OrbitState::derive_from_vectors`] for details.
    #[must_use]
    pub fn to_orbit(self, attractor_mass: f64, gravitational_constant: f64) -> OrbitState {
        OrbitState::from_state_vectors(
            self.position,
            self.velocity,
            attractor_mass,
            gravitational_constant,
        )
    }
}

/// The family of conic section an orbit follows.
///
/// Every formula that depends on the kind of conic goes through this enum,
/// so the parabolic case can't be forgotten at a call site.
///
/// NaN eccentricities land in [`OrbitShape::Parabolic`], as they compare
/// neither below nor above one. Such orbits are rejected by
/// [`OrbitState::is_valid_orbit`] anyway.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbitShape {
    /// Closed orbit, eccentricity below one.
    #[default]
    Elliptic,
    /// Open orbit, eccentricity exactly one.
    Parabolic,
    /// Open orbit, eccentricity above one.
    Hyperbolic,
}

impl OrbitShape {
    /// Classifies an eccentricity value.
    ///
    /// # Example
    /// ```
    /// use kepler_orbits::OrbitShape;
    ///
    /// assert_eq!(OrbitShape::from_eccentricity(0.3), OrbitShape::Elliptic);
    /// assert_eq!(OrbitShape::from_eccentricity(1.0), OrbitShape::Parabolic);
    /// assert_eq!(OrbitShape::from_eccentricity(2.5), OrbitShape::Hyperbolic);
    /// ```
    pub fn from_eccentricity(eccentricity: f64) -> Self {
        if eccentricity < 1.0 {
            OrbitShape::Elliptic
        } else if eccentricity > 1.0 {
            OrbitShape::Hyperbolic
        } else {
            OrbitShape::Parabolic
        }
    }

    /// Whether the orbit is closed and periodic.
    pub fn is_closed(self) -> bool {
        self == OrbitShape::Elliptic
    }

    /// The factor relating the semi-major axis to the focal parameter,
    /// `|1 - e^2|`. Zero for parabolas.
    pub fn compression_ratio(self, eccentricity: f64) -> f64 {
        match self {
            OrbitShape::Elliptic => 1.0 - eccentricity * eccentricity,
            OrbitShape::Hyperbolic => eccentricity * eccentricity - 1.0,
            OrbitShape::Parabolic => 0.0,
        }
    }

    /// Position on the conic at the given eccentric anomaly, relative to the
    /// conic's center point, in the orbital plane.
    ///
    /// The X axis points towards the periapsis and the Y axis points in the
    /// direction of motion at periapsis.
    ///
    /// For parabolas the "center" is the vertex (the periapsis) and the
    /// eccentric anomaly is the true anomaly.
    pub(crate) fn central_position(
        self,
        eccentric_anomaly: f64,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        periapsis_distance: f64,
    ) -> DVec2 {
        match self {
            OrbitShape::Elliptic => {
                let (sin, cos) = eccentric_anomaly.sin_cos();
                DVec2::new(cos * semi_major_axis, sin * semi_minor_axis)
            }
            OrbitShape::Hyperbolic => {
                let (sinh, cosh) = sinhcosh(eccentric_anomaly);
                DVec2::new(-cosh * semi_major_axis, sinh * semi_minor_axis)
            }
            OrbitShape::Parabolic => {
                let (sin, cos) = eccentric_anomaly.sin_cos();
                let radius = 2.0 * periapsis_distance / (1.0 + cos);
                DVec2::new(radius * cos - periapsis_distance, radius * sin)
            }
        }
    }
}

/// Get the hyperbolic sine and cosine of a number.
///
/// Usually faster than calling `x.sinh()` and `x.cosh()` separately.
///
/// Returns a tuple which contains:
/// - 0: The hyperbolic sine of the number.
/// - 1: The hyperbolic cosine of the number.
pub fn sinhcosh(x: f64) -> (f64, f64) {
    let e_x = x.exp();
    let e_neg_x = (-x).exp();

    ((e_x - e_neg_x) * 0.5, (e_x + e_neg_x) * 0.5)
}

#[cfg(test)]
mod tests;
