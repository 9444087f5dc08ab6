use crate::OrbitState;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A struct representing a celestial body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// The name of the celestial body.
    pub name: String,

    /// The mass of the celestial body.
    ///
    /// Bodies orbiting this one use it as their attractor mass.
    pub mass: f64,

    /// The orbit of the celestial body, if it is orbiting one.
    ///
    /// Positions and velocities of the orbit are relative to the parent body.
    pub orbit: Option<OrbitState>,
}

impl Body {
    /// Creates a new `Body` instance.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the celestial body.
    /// * `mass` - The mass of the celestial body.
    /// * `orbit` - An optional orbit for the celestial body.
    pub fn new(name: impl Into<String>, mass: f64, orbit: Option<OrbitState>) -> Self {
        Self {
            name: name.into(),
            mass,
            orbit,
        }
    }

    /// Releases the body from its orbit.
    ///
    /// The body then stays fixed relative to its parent.
    pub fn release_from_orbit(&mut self) {
        self.orbit = None;
    }
}
