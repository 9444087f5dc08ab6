use core::fmt;
use std::collections::HashMap;

use glam::DVec3;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    transfer::solve_transfer, OrbitalElements, StateVectors, TransferError, TransferSettings,
    TransitionResult, VectorExt, DEFAULT_GRAVITATIONAL_CONSTANT,
};

use super::Body;

/// Identifier of a body within a [`Universe`].
pub type Id = u64;

/// Struct that represents a hierarchy of bodies orbiting each other.
///
/// Every orbit is relative to the body's parent. Absolute positions are found
/// by walking up the chain of attractors; the root bodies sit at the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    /// The celestial bodies in the universe and their relations.
    bodies: HashMap<Id, BodyWrapper>,

    /// The next ID to assign to a body.
    next_id: Id,

    /// The time elapsed in the universe.
    pub time: f64,

    /// The gravitational constant used for orbits built by the universe.
    pub g: f64,
}

/// Parent and satellites of a body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyRelation {
    /// The body this one orbits, if any.
    pub parent: Option<Id>,
    /// Bodies orbiting this one.
    pub satellites: Vec<Id>,
}

#[derive(Clone, Debug, PartialEq)]
struct BodyWrapper {
    body: Body,
    relations: BodyRelation,
}

/// A row of an element table: a body, what it orbits, and its elements.
///
/// Records without an attractor become root bodies with no orbit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementRecord {
    /// Name of the body.
    pub name: String,
    /// Name of the body it orbits.
    pub attractor: Option<String>,
    /// Mass of the body.
    pub mass: f64,
    /// Orbital elements relative to the attractor, angles in degrees.
    pub elements: OrbitalElements,
}

/// Errors raised by [`Universe`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Error)]
pub enum UniverseError {
    /// There was no body with the given ID.
    #[error("there was no body with id {0}")]
    BodyNotFound(Id),

    /// The two bodies don't orbit a shared attractor.
    #[error("bodies {0} and {1} share no common attractor")]
    NoCommonAttractor(Id, Id),

    /// The transfer solver found no solution.
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl Universe {
    /// Creates an empty universe with the given gravitational constant.
    pub fn new(g: f64) -> Universe {
        Universe {
            bodies: HashMap::new(),
            next_id: 0,
            time: 0.0,
            g,
        }
    }

    /// Places `body` in orbit around the attractor `satellite_of`, or at the
    /// root of a hierarchy when it is `None`.
    ///
    /// The body's orbit is taken as relative to that attractor and should use
    /// its mass and this universe's `g`. Nothing is re-derived here.
    ///
    /// An unknown attractor hands the body back untouched.
    pub fn add_body(
        &mut self,
        body: Body,
        satellite_of: Option<Id>,
    ) -> Result<Id, (UniverseError, Body)> {
        if let Some(parent_id) = satellite_of {
            if !self.bodies.contains_key(&parent_id) {
                return Err((UniverseError::BodyNotFound(parent_id), body));
            }
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        self.bodies.insert(
            id,
            BodyWrapper {
                body,
                relations: BodyRelation {
                    parent: satellite_of,
                    satellites: Vec::new(),
                },
            },
        );
        if let Some(parent_id) = satellite_of {
            if let Some(wrapper) = self.bodies.get_mut(&parent_id) {
                wrapper.relations.satellites.push(id);
            }
        }

        Ok(id)
    }

    /// Takes a body out of its attractor's satellite list and drops its whole
    /// subtree of satellites with it.
    ///
    /// The removed bodies keep their orbits, which are relative to attractors
    /// that may no longer exist. Unknown IDs remove nothing.
    pub fn remove_body(&mut self, id: Id) -> Vec<Body> {
        let Some(BodyWrapper { body, relations }) = self.bodies.remove(&id) else {
            return Vec::new();
        };

        let mut bodies = vec![body];

        if let Some(parent_id) = relations.parent {
            if let Some(parent_wrapper) = self.bodies.get_mut(&parent_id) {
                parent_wrapper
                    .relations
                    .satellites
                    .retain(|&satellite| satellite != id);
            }
        }

        for &satellite_id in &relations.satellites {
            bodies.append(&mut self.remove_body(satellite_id));
        }

        bodies
    }

    /// Every body, in no particular order.
    pub fn get_bodies(&self) -> Vec<&Body> {
        self.bodies.values().map(|wrapper| &wrapper.body).collect()
    }

    /// The attractor and satellites of a body.
    pub fn get_body_relation(&self, id: Id) -> Option<&BodyRelation> {
        self.bodies.get(&id).map(|wrapper| &wrapper.relations)
    }

    /// Mutable access to a body, for changing its mass or orbit in place.
    ///
    /// Satellites are not re-derived when an attractor's mass changes.
    pub fn get_body_mut(&mut self, id: Id) -> Option<&mut Body> {
        self.bodies.get_mut(&id).map(|wrapper| &mut wrapper.body)
    }

    pub fn get_body(&self, id: Id) -> Option<&Body> {
        self.bodies.get(&id).map(|wrapper| &wrapper.body)
    }

    /// Looks a body up by name. With duplicate names, any one of them may be
    /// returned.
    pub fn get_body_index_with_name(&self, name: &str) -> Option<Id> {
        self.bodies
            .iter()
            .find_map(|(&id, wrapper)| (wrapper.body.name == name).then_some(id))
    }

    /// Advances every orbit in the universe by `delta_time`.
    pub fn tick(&mut self, delta_time: f64) {
        for wrapper in self.bodies.values_mut() {
            if let Some(orbit) = wrapper.body.orbit.as_mut() {
                orbit.advance_by_time(delta_time);
            }
        }
        self.time += delta_time;
    }

    /// Gets the absolute state of a body `delta_time` from now.
    ///
    /// The state of each attractor up the chain, projected to the same time,
    /// is added to the body's own. A body without an orbit sits still on its
    /// parent.
    pub fn get_body_state_at(&self, id: Id, delta_time: f64) -> Option<StateVectors> {
        let wrapper = self.bodies.get(&id)?;

        let mut state = match &wrapper.body.orbit {
            Some(orbit) => orbit.get_state_vectors_after(delta_time),
            None => StateVectors::default(),
        };

        if let Some(parent) = wrapper.relations.parent {
            if let Some(parent_state) = self.get_body_state_at(parent, delta_time) {
                state.position += parent_state.position;
                state.velocity += parent_state.velocity;
            }
        }

        Some(state)
    }

    /// Gets the absolute position of a body `delta_time` from now.
    ///
    /// The top ancestor of the body (i.e, the body with no parent) is at the origin.
    pub fn get_body_position_at(&self, id: Id, delta_time: f64) -> Option<DVec3> {
        self.get_body_state_at(id, delta_time)
            .map(|state| state.position)
    }

    /// Gets the absolute velocity of a body `delta_time` from now.
    pub fn get_body_velocity_at(&self, id: Id, delta_time: f64) -> Option<DVec3> {
        self.get_body_state_at(id, delta_time)
            .map(|state| state.velocity)
    }

    /// Iterates over the attractors of a body, nearest first.
    fn ancestors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        core::iter::successors(
            self.bodies.get(&id).and_then(|w| w.relations.parent),
            move |current| self.bodies.get(current).and_then(|w| w.relations.parent),
        )
    }

    /// Finds the nearest attractor that both bodies orbit, directly or
    /// through their own attractors.
    pub fn common_attractor(&self, a: Id, b: Id) -> Option<Id> {
        let ancestors_of_b: Vec<Id> = self.ancestors(b).collect();
        self.ancestors(a)
            .find(|ancestor| ancestors_of_b.contains(ancestor))
    }

    /// Finds a transfer from the `origin` body to the `target` body.
    ///
    /// Both bodies are projected to their departure and arrival times,
    /// relative to their nearest common attractor, and the transfer is
    /// solved around that attractor. The transfer is oriented like the
    /// origin's motion around it.
    pub fn calculate_transfer(
        &self,
        origin: Id,
        target: Id,
        settings: &TransferSettings,
    ) -> Result<TransitionResult, UniverseError> {
        let attractor = self
            .common_attractor(origin, target)
            .ok_or(UniverseError::NoCommonAttractor(origin, target))?;
        let attractor_mass = self
            .get_body(attractor)
            .ok_or(UniverseError::BodyNotFound(attractor))?
            .mass;

        let departure_time = settings.start_time_offset;
        let arrival_time = settings.start_time_offset + settings.target_duration;

        let departure = self.relative_state(origin, attractor, departure_time)?;
        let arrival = self.relative_state(target, attractor, arrival_time)?;

        let mut reference_normal = departure
            .position
            .cross(departure.velocity)
            .normalized_or_zero();
        if reference_normal == DVec3::ZERO {
            reference_normal = DVec3::Z;
        }

        debug!(origin, target, attractor, "Solving transfer between bodies");

        solve_transfer(
            departure,
            arrival,
            attractor_mass,
            self.g,
            reference_normal,
            settings,
        )
        .map_err(UniverseError::from)
    }

    fn relative_state(
        &self,
        id: Id,
        attractor: Id,
        delta_time: f64,
    ) -> Result<StateVectors, UniverseError> {
        let body = self
            .get_body_state_at(id, delta_time)
            .ok_or(UniverseError::BodyNotFound(id))?;
        let attractor_state = self
            .get_body_state_at(attractor, delta_time)
            .ok_or(UniverseError::BodyNotFound(attractor))?;

        Ok(StateVectors {
            position: body.position - attractor_state.position,
            velocity: body.velocity - attractor_state.velocity,
        })
    }

    /// Adds bodies from element records, parents before their satellites.
    ///
    /// Records may come in any order. A record whose attractor isn't in the
    /// universe yet is deferred and retried once other records have been
    /// added. Orbits are built with the attractor's mass and [`Universe::g`].
    ///
    /// Returns the records whose attractor never showed up.
    pub fn load_elements(
        &mut self,
        records: impl IntoIterator<Item = ElementRecord>,
    ) -> Vec<ElementRecord> {
        let mut pending: Vec<ElementRecord> = records.into_iter().collect();

        loop {
            let before = pending.len();
            let mut deferred = Vec::new();

            for record in pending.drain(..) {
                if let Err(record) = self.add_record(record) {
                    deferred.push(record);
                }
            }

            pending = deferred;
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        for record in &pending {
            warn!(
                name = %record.name,
                attractor = ?record.attractor,
                "Attractor not found, leaving element record unresolved"
            );
        }

        pending
    }

    fn add_record(&mut self, record: ElementRecord) -> Result<Id, ElementRecord> {
        let lookup = record
            .attractor
            .as_deref()
            .map(|name| self.get_body_index_with_name(name));
        let parent = match lookup {
            None => None,
            Some(Some(id)) => Some(id),
            Some(None) => {
                debug!(
                    name = %record.name,
                    attractor = ?record.attractor,
                    "Deferring element record"
                );
                return Err(record);
            }
        };

        let orbit = parent
            .and_then(|id| self.get_body(id))
            .map(|attractor| record.elements.to_orbit(attractor.mass, self.g));

        let body = Body::new(record.name.clone(), record.mass, orbit);
        self.add_body(body, parent).map_err(|_| record)
    }
}

impl Default for Universe {
    fn default() -> Self {
        Universe::new(DEFAULT_GRAVITATIONAL_CONSTANT)
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Universe with {} bodies, t={}",
            self.bodies.len(),
            self.time
        )
    }
}
