use crate::OrbitState;

const GRAVITATIONAL_CONSTANT: f64 = 1.0;

fn random_angle_deg() -> f64 {
    rand::random_range(-360.0..360.0)
}

fn random_mass() -> f64 {
    rand::random_range(1.0..1e6)
}

pub(super) fn random_circular() -> OrbitState {
    OrbitState::from_elements(
        0.0,
        rand::random_range(0.01..1e6),
        random_angle_deg(),
        if rand::random_bool(0.5) {
            random_angle_deg()
        } else {
            0.0
        },
        random_angle_deg(),
        random_angle_deg(),
        random_mass(),
        GRAVITATIONAL_CONSTANT,
    )
}

pub(super) fn random_elliptic() -> OrbitState {
    OrbitState::from_elements(
        rand::random_range(0.01..0.99),
        rand::random_range(0.01..1e6),
        random_angle_deg(),
        if rand::random_bool(0.5) {
            random_angle_deg()
        } else {
            0.0
        },
        random_angle_deg(),
        random_angle_deg(),
        random_mass(),
        GRAVITATIONAL_CONSTANT,
    )
}

pub(super) fn random_hyperbolic() -> OrbitState {
    OrbitState::from_elements(
        rand::random_range(1.1..5.0),
        rand::random_range(0.01..1e6),
        rand::random_range(-180.0..180.0),
        if rand::random_bool(0.5) {
            random_angle_deg()
        } else {
            0.0
        },
        random_angle_deg(),
        random_angle_deg(),
        random_mass(),
        GRAVITATIONAL_CONSTANT,
    )
}

pub(super) fn random_parabolic() -> OrbitState {
    OrbitState::from_elements(
        1.0,
        rand::random_range(0.01..1e6),
        rand::random_range(-180.0..180.0),
        if rand::random_bool(0.5) {
            random_angle_deg()
        } else {
            0.0
        },
        random_angle_deg(),
        random_angle_deg(),
        random_mass(),
        GRAVITATIONAL_CONSTANT,
    )
}

/// One orbit of every shape, closed ones first.
pub(super) fn random_any() -> [(&'static str, OrbitState); 4] {
    [
        ("circular", random_circular()),
        ("elliptic", random_elliptic()),
        ("hyperbolic", random_hyperbolic()),
        ("parabolic", random_parabolic()),
    ]
}
