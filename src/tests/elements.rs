use super::{assertions::*, G, MASS, RANDOM_CASES};
use crate::{elements::normalize_degrees, OrbitState, OrbitalElements};

#[test]
fn degree_normalization() {
    let cases = [
        (0.0, 0.0),
        (180.0, 180.0),
        (-180.0, 180.0),
        (190.0, -170.0),
        (-190.0, 170.0),
        (765.0, 45.0),
    ];

    for (input, expected) in cases {
        assert_almost_eq(normalize_degrees(input), expected, &format!("normalized {input}°"));
    }
}

#[test]
fn elliptic_elements_round_trip() {
    for _ in 0..RANDOM_CASES {
        let elements = OrbitalElements {
            eccentricity: rand::random_range(0.05..0.95),
            semi_major_axis: rand::random_range(1.0..1e4),
            mean_anomaly: rand::random_range(-720.0..720.0),
            inclination: rand::random_range(5.0..175.0),
            argument_of_periapsis: rand::random_range(-360.0..360.0),
            ascending_node_longitude: rand::random_range(-360.0..360.0),
        };
        let read = elements.to_orbit(MASS, G).to_elements();
        let what = format!("{elements:?} read back as {read:?}");

        assert_almost_eq(read.eccentricity, elements.eccentricity, &what);
        assert_almost_eq_rescale(read.semi_major_axis, elements.semi_major_axis, &what);
        assert_almost_eq(read.inclination, elements.inclination, &what);
        assert_almost_eq_degrees(read.mean_anomaly, elements.mean_anomaly, &what);
        assert_almost_eq_degrees(read.argument_of_periapsis, elements.argument_of_periapsis, &what);
        assert_almost_eq_degrees(
            read.ascending_node_longitude,
            elements.ascending_node_longitude,
            &what,
        );

        assert!((0.0..360.0).contains(&read.mean_anomaly), "{what}");
        assert!(read.argument_of_periapsis > -180.0 && read.argument_of_periapsis <= 180.0);
        assert!(read.ascending_node_longitude > -180.0 && read.ascending_node_longitude <= 180.0);
    }
}

#[test]
fn hyperbolic_elements_round_trip() {
    for _ in 0..RANDOM_CASES {
        let elements = OrbitalElements {
            eccentricity: rand::random_range(1.1..3.0),
            semi_major_axis: rand::random_range(1.0..1e4),
            mean_anomaly: rand::random_range(-100.0..100.0),
            inclination: rand::random_range(5.0..175.0),
            argument_of_periapsis: rand::random_range(-180.0..180.0),
            ascending_node_longitude: rand::random_range(-180.0..180.0),
        };
        let read = elements.to_orbit(MASS, G).to_elements();
        let what = format!("{elements:?} read back as {read:?}");

        assert_almost_eq(read.eccentricity, elements.eccentricity, &what);
        assert_almost_eq_rescale(read.semi_major_axis, elements.semi_major_axis, &what);
        // Open orbits keep the sign and size of their mean anomaly
        assert_almost_eq(read.mean_anomaly, elements.mean_anomaly, &what);
        assert_almost_eq_degrees(read.argument_of_periapsis, elements.argument_of_periapsis, &what);
    }
}

#[test]
fn parabolic_elements_report_periapsis() {
    let elements = OrbitalElements {
        eccentricity: 1.0,
        semi_major_axis: 5.0,
        mean_anomaly: 20.0,
        inclination: 30.0,
        argument_of_periapsis: 40.0,
        ascending_node_longitude: 50.0,
    };
    let read = elements.to_orbit(MASS, G).to_elements();

    assert_eq!(read.eccentricity, 1.0);
    assert_almost_eq(read.semi_major_axis, 5.0, "parabolic periapsis distance");
    assert_almost_eq(read.mean_anomaly, 20.0, "parabolic mean anomaly");
    assert_almost_eq(read.inclination, 30.0, "parabolic inclination");
}

#[test]
fn equatorial_elements_measure_from_right() {
    // ω and Ω can't be told apart in the reference plane, only their sum is kept
    let orbit = OrbitState::from_elements(0.4, 30.0, 10.0, 0.0, 25.0, 35.0, MASS, G);
    let read = orbit.to_elements();

    assert_almost_eq(read.inclination, 0.0, "equatorial inclination");
    assert_almost_eq(read.ascending_node_longitude, 0.0, "equatorial node longitude");
    assert_almost_eq(read.argument_of_periapsis, 60.0, "equatorial periapsis longitude");
}

#[test]
fn retrograde_inclination() {
    let orbit = OrbitState::from_elements(0.1, 30.0, 0.0, 150.0, 0.0, 0.0, MASS, G);
    let read = orbit.to_elements();

    assert_almost_eq(read.inclination, 150.0, "retrograde inclination");
    assert!(orbit.get_orbit_normal_dot_ecliptic_normal() < 0.0);
}

#[test]
fn default_elements_build_nothing_useful() {
    let orbit = OrbitalElements::default().to_orbit(MASS, G);
    assert!(!orbit.is_valid_orbit());
}
