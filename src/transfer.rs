//! Transfer trajectories between two points around a shared attractor.
//!
//! The problem: a body leaves point `p0` and must reach point `p1` after a
//! given time, on a single revolution of an ellipse with the attractor at one
//! focus. Instead of solving Lambert's problem directly, the search runs over
//! the position of the ellipse's second focus.
//!
//! Every ellipse through `p0` and `p1` with the attractor `f0` as a focus has
//! its empty focus `F2` on one branch of a hyperbola: the one with foci `p0`
//! and `p1` whose other branch passes through `f0`. Sampling that far branch
//! with a single hyperbolic coordinate gives a one-parameter family of
//! candidate transfers, and the solver walks along it until the travel time
//! matches the target.

use core::f64::consts::{PI, TAU};

use glam::DVec3;
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{anomaly::eccentric_to_mean, EllipseData, HyperbolaData, OrbitState, StateVectors};

/// The hard limit on candidates evaluated by a single transfer search.
pub const TRANSFER_MAX_ITERATIONS: u32 = 1000;

/// The first step taken along the hyperbola's far branch.
const INITIAL_STEP: f64 = 0.8;

/// Parameters of a transfer search.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransferSettings {
    /// Time from now until departure.
    pub start_time_offset: f64,

    /// Desired time between departure and arrival.
    ///
    /// A target of zero or less can never be met. The solver then returns the
    /// minimum energy transfer, whose empty focus sits on the line between the
    /// two points. Between circular coplanar orbits with the points on
    /// opposite sides this is the Hohmann ellipse.
    pub target_duration: f64,

    /// Travel the ellipse in the opposite direction to the origin orbit,
    /// passing behind the attractor.
    pub is_reverse_orbit: bool,

    /// A candidate with a larger semi-major axis ends the search with
    /// [`TransferError::SemiMajorAxisLimit`].
    pub max_semi_major_axis: f64,

    /// Largest accepted difference between the achieved and target duration.
    pub precision: f64,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            start_time_offset: 0.0,
            target_duration: 0.0,
            is_reverse_orbit: false,
            max_semi_major_axis: f64::INFINITY,
            precision: 1e-3,
        }
    }
}

/// A transfer trajectory and the impulses needed to fly it.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionResult {
    /// The transfer ellipse, with the body placed at departure.
    pub orbit: OrbitState,

    /// Time from departure to arrival.
    pub duration: f64,

    /// Eccentric anomaly on the transfer orbit at departure, in `(-π, π]`.
    pub eccentric_anomaly_at_departure: f64,

    /// Eccentric anomaly on the transfer orbit at arrival, within one
    /// revolution after departure.
    pub eccentric_anomaly_at_arrival: f64,

    /// Velocity changes at departure and at arrival.
    ///
    /// The departure delta takes the body from its origin orbit onto the
    /// transfer, the arrival delta from the transfer onto the target orbit.
    pub velocity_deltas: [DVec3; 2],

    /// Sum of the magnitudes of both velocity deltas.
    pub total_delta_v: f64,

    /// Departure point, relative to the attractor.
    pub departure_position: DVec3,

    /// Arrival point, relative to the attractor.
    pub arrival_position: DVec3,

    /// Number of candidates evaluated by the search.
    pub iterations: u32,
}

/// Reasons a transfer search finds no solution.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum TransferError {
    /// The search ran out of iterations before meeting the target duration.
    #[error("transfer search did not converge within {iterations} iterations")]
    NotConverged {
        /// Iterations spent.
        iterations: u32,
    },

    /// The search reached a candidate over the semi-major axis limit before
    /// meeting the target duration.
    #[error("transfer orbit semi-major axis {semi_major_axis} exceeds the limit of {limit}")]
    SemiMajorAxisLimit {
        /// Semi-major axis of the rejected candidate.
        semi_major_axis: f64,
        /// The configured limit.
        limit: f64,
    },

    /// The selected transfer takes no time, negative time, or forever.
    #[error("transfer duration {duration} is not positive and finite")]
    InvalidDuration {
        /// The offending duration.
        duration: f64,
    },

    /// Departure and arrival points don't span a usable plane.
    #[error("departure and arrival points do not define a transfer plane")]
    DegenerateGeometry,

    /// An input or resulting orbit failed [`OrbitState::is_valid_orbit`].
    #[error("{0} orbit is not valid")]
    InvalidOrbit(&'static str),
}

/// Finds a transfer from the `origin` body to the `target` body.
///
/// Both orbits must share an attractor. The departure point is where the
/// origin body will be `start_time_offset` from now; the arrival point is
/// where the target body will be `start_time_offset + target_duration` from
/// now. The transfer is oriented like the origin orbit.
///
/// # Example
/// ```
/// use kepler_orbits::{transfer::calculate_transfer, OrbitState, TransferSettings};
///
/// let origin = OrbitState::from_elements(0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.1);
/// let target = OrbitState::from_elements(0.0, 20.0, 180.0, 0.0, 0.0, 0.0, 1000.0, 0.1);
///
/// // A zero target duration asks for the minimum energy transfer
/// let result = calculate_transfer(&origin, &target, &TransferSettings::default()).unwrap();
/// assert!((result.orbit.get_periapsis_distance() - 10.0).abs() < 1e-6);
/// assert!((result.orbit.get_apoapsis_distance() - 20.0).abs() < 1e-6);
/// ```
pub fn calculate_transfer(
    origin: &OrbitState,
    target: &OrbitState,
    settings: &TransferSettings,
) -> Result<TransitionResult, TransferError> {
    if !origin.is_valid_orbit() {
        return Err(TransferError::InvalidOrbit("origin"));
    }
    if !target.is_valid_orbit() {
        return Err(TransferError::InvalidOrbit("target"));
    }

    let departure = origin.get_state_vectors_after(settings.start_time_offset);
    let arrival =
        target.get_state_vectors_after(settings.start_time_offset + settings.target_duration);

    solve_transfer(
        departure,
        arrival,
        origin.get_attractor_mass(),
        origin.get_gravitational_constant(),
        origin.get_orbit_normal(),
        settings,
    )
}

/// Finds a transfer between two sets of state vectors around the same attractor.
///
/// `departure` and `arrival` are relative to the attractor. Only their
/// positions shape the transfer; their velocities are the ones the body has
/// before departing and needs after arriving, and feed the velocity deltas.
///
/// `reference_normal` picks the direction of travel: the transfer plane is
/// oriented to agree with it, unless `settings.is_reverse_orbit` is set.
///
/// # Search
/// A non-positive target duration skips the search and uses the vertex of
/// the far branch, the minimum energy transfer.
///
/// Otherwise, starting at the vertex of the hyperbola's far branch, the solver steps
/// along it in whichever direction reduces the duration error, using the
/// slope observed between the last two candidates. Every second reversal of
/// direction halves the step. The search ends when:
/// - the duration is within `precision` of the target,
/// - the duration stops changing,
/// - a candidate's semi-major axis exceeds `max_semi_major_axis`, which is
///   reported as [`TransferError::SemiMajorAxisLimit`],
/// - or [`TRANSFER_MAX_ITERATIONS`] candidates have been tried.
pub fn solve_transfer(
    departure: StateVectors,
    arrival: StateVectors,
    attractor_mass: f64,
    gravitational_constant: f64,
    reference_normal: DVec3,
    settings: &TransferSettings,
) -> Result<TransitionResult, TransferError> {
    let start = departure.position;
    let end = arrival.position;

    if start == end || start == DVec3::ZERO || end == DVec3::ZERO {
        return Err(TransferError::DegenerateGeometry);
    }

    let mut hyperbola = HyperbolaData::new(start, end, DVec3::ZERO);
    hyperbola.orient_to(reference_normal);

    let plane_normal = hyperbola.normal();
    if plane_normal == DVec3::ZERO {
        return Err(TransferError::DegenerateGeometry);
    }

    let search = Search {
        hyperbola,
        plane_normal,
        start,
        end,
        is_reverse_orbit: settings.is_reverse_orbit,
        gravitational_parameter: attractor_mass * gravitational_constant,
    };

    let (candidate, iterations) = search.run(settings)?;

    build_result(
        candidate,
        iterations,
        departure,
        arrival,
        attractor_mass,
        gravitational_constant,
    )
}

/// One transfer ellipse along the search.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    coordinate: f64,
    ellipse: EllipseData,
    start_anomaly: f64,
    end_anomaly: f64,
    duration: f64,
}

struct Search {
    hyperbola: HyperbolaData,
    plane_normal: DVec3,
    start: DVec3,
    end: DVec3,
    is_reverse_orbit: bool,
    gravitational_parameter: f64,
}

impl Search {
    fn evaluate(&self, coordinate: f64) -> Candidate {
        let empty_focus = self.hyperbola.sample_on_branch(coordinate, false);

        let mut ellipse = EllipseData::new(DVec3::ZERO, empty_focus, self.start);
        ellipse.align_to_normal(self.plane_normal);
        if self.is_reverse_orbit {
            ellipse.flip_secondary_axis();
        }

        let mut start_anomaly = ellipse.anomaly_for_point(self.start);
        if start_anomaly > PI {
            start_anomaly -= TAU;
        }
        let end_anomaly =
            start_anomaly + (ellipse.anomaly_for_point(self.end) - start_anomaly).rem_euclid(TAU);

        let eccentricity = ellipse.get_eccentricity();
        let semi_major_axis = ellipse.get_semi_major_axis();
        let mean_motion = (self.gravitational_parameter
            / (semi_major_axis * semi_major_axis * semi_major_axis))
            .sqrt();

        let duration = if end_anomaly > start_anomaly {
            (eccentric_to_mean(end_anomaly, eccentricity)
                - eccentric_to_mean(start_anomaly, eccentricity))
                / mean_motion
        } else {
            0.0
        };

        Candidate {
            coordinate,
            ellipse,
            start_anomaly,
            end_anomaly,
            duration,
        }
    }

    fn run(&self, settings: &TransferSettings) -> Result<(Candidate, u32), TransferError> {
        if settings.target_duration <= 0.0 {
            let candidate = self.evaluate(0.0);
            check_axis_limit(&candidate, settings, 1)?;
            debug!(
                duration = candidate.duration,
                target = settings.target_duration,
                "Unreachable target duration, using the minimum energy transfer"
            );
            return Ok((candidate, 1));
        }

        let mut coordinate = 0.0;
        let mut step = INITIAL_STEP;
        let mut slope = 1.0;
        let mut last_direction = 0.0;
        let mut reversals = 0u32;
        let mut previous: Option<Candidate> = None;

        for iteration in 1..=TRANSFER_MAX_ITERATIONS {
            let candidate = self.evaluate(coordinate);

            trace!(
                iteration,
                coordinate,
                step,
                duration = candidate.duration,
                semi_major_axis = candidate.ellipse.get_semi_major_axis(),
                "Transfer candidate"
            );

            check_axis_limit(&candidate, settings, iteration)?;

            let error = candidate.duration - settings.target_duration;
            if error.abs() < settings.precision {
                debug!(iteration, duration = candidate.duration, "Transfer search converged");
                return Ok((candidate, iteration));
            }

            if let Some(last) = previous {
                if candidate.duration == last.duration {
                    debug!(iteration, duration = candidate.duration, "Transfer search stalled");
                    return Ok((candidate, iteration));
                }

                let change =
                    (candidate.duration - last.duration) * (candidate.coordinate - last.coordinate);
                if change != 0.0 && change.is_finite() {
                    slope = change.signum();
                }
            }

            let direction = -error.signum() * slope;
            if last_direction != 0.0 && direction != last_direction {
                reversals += 1;
                if reversals % 2 == 0 {
                    step *= 0.5;
                }
            }
            last_direction = direction;

            coordinate += direction * step;
            previous = Some(candidate);
        }

        debug!(
            iterations = TRANSFER_MAX_ITERATIONS,
            "Transfer search gave up"
        );
        Err(TransferError::NotConverged {
            iterations: TRANSFER_MAX_ITERATIONS,
        })
    }
}

/// Fails once a candidate's ellipse grows past the configured semi-major axis.
fn check_axis_limit(
    candidate: &Candidate,
    settings: &TransferSettings,
    iteration: u32,
) -> Result<(), TransferError> {
    let semi_major_axis = candidate.ellipse.get_semi_major_axis();
    if semi_major_axis.is_finite() && semi_major_axis <= settings.max_semi_major_axis {
        return Ok(());
    }

    debug!(
        iteration,
        semi_major_axis,
        limit = settings.max_semi_major_axis,
        "Transfer search hit the semi-major axis limit"
    );
    Err(TransferError::SemiMajorAxisLimit {
        semi_major_axis,
        limit: settings.max_semi_major_axis,
    })
}

fn build_result(
    candidate: Candidate,
    iterations: u32,
    departure: StateVectors,
    arrival: StateVectors,
    attractor_mass: f64,
    gravitational_constant: f64,
) -> Result<TransitionResult, TransferError> {
    let duration = candidate.duration;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(TransferError::InvalidDuration { duration });
    }

    let ellipse = candidate.ellipse;
    let eccentricity = ellipse.get_eccentricity();
    let start_mean_anomaly = eccentric_to_mean(candidate.start_anomaly, eccentricity);

    let orbit = OrbitState::from_axis_vectors(
        eccentricity,
        ellipse.get_axis_main() * ellipse.get_semi_major_axis(),
        -ellipse.get_axis_secondary() * ellipse.get_semi_minor_axis(),
        start_mean_anomaly.to_degrees(),
        attractor_mass,
        gravitational_constant,
    );

    if !orbit.is_valid_orbit() {
        return Err(TransferError::InvalidOrbit("transfer"));
    }

    let departure_velocity = orbit.get_velocity_at_eccentric_anomaly(candidate.start_anomaly);
    let arrival_velocity = orbit.get_velocity_at_eccentric_anomaly(candidate.end_anomaly);

    let velocity_deltas = [
        departure_velocity - departure.velocity,
        arrival.velocity - arrival_velocity,
    ];

    Ok(TransitionResult {
        orbit,
        duration,
        eccentric_anomaly_at_departure: candidate.start_anomaly,
        eccentric_anomaly_at_arrival: candidate.end_anomaly,
        velocity_deltas,
        total_delta_v: velocity_deltas[0].length() + velocity_deltas[1].length(),
        departure_position: departure.position,
        arrival_position: arrival.position,
        iterations,
    })
}
