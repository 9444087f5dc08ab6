use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{secondary_axis, secondary_from_normal};
use crate::{anomaly::true_to_eccentric, VectorExt};

/// An ellipse defined by its two foci and a point on its perimeter.
///
/// The main axis points from `focus1` to `focus0`, so sampling at an
/// eccentric anomaly of zero gives the vertex closest to `focus0`.
/// Anomalies are measured around `focus0` and grow towards the secondary axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EllipseData {
    focus0: DVec3,
    focus1: DVec3,
    center: DVec3,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    eccentricity: f64,
    axis_main: DVec3,
    axis_secondary: DVec3,
}

impl EllipseData {
    /// Builds the ellipse with foci `focus0` and `focus1` that passes through `point`.
    ///
    /// The semi-major axis comes from the sum of distances definition,
    /// `A = (|p - f0| + |p - f1|) / 2`.
    ///
    /// If `point` lies on the line through both foci the secondary axis is
    /// left as the zero vector. Call [`EllipseData::align_to_normal`] to give it
    /// an orientation.
    ///
    /// # Example
    /// ```
    /// use glam::DVec3;
    /// use kepler_orbits::EllipseData;
    ///
    /// let ellipse = EllipseData::new(
    ///     DVec3::new(3.0, 0.0, 0.0),
    ///     DVec3::new(-3.0, 0.0, 0.0),
    ///     DVec3::new(0.0, 4.0, 0.0),
    /// );
    ///
    /// assert_eq!(ellipse.get_semi_major_axis(), 5.0);
    /// assert!((ellipse.get_semi_minor_axis() - 4.0).abs() < 1e-12);
    /// assert!((ellipse.get_eccentricity() - 0.6).abs() < 1e-12);
    /// ```
    pub fn new(focus0: DVec3, focus1: DVec3, point: DVec3) -> Self {
        let axis_main = (focus0 - focus1).normalized_or_zero();
        let semi_major_axis = 0.5 * (point.distance(focus0) + point.distance(focus1));
        let eccentricity = focus0.distance(focus1) / (2.0 * semi_major_axis);
        let semi_minor_axis = semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt();
        let axis_secondary = secondary_axis(axis_main, point - focus0);
        let center = focus1 + (focus0 - focus1) * 0.5;

        Self {
            focus0,
            focus1,
            center,
            semi_major_axis,
            semi_minor_axis,
            eccentricity,
            axis_main,
            axis_secondary,
        }
    }

    /// The point on the ellipse at the given eccentric anomaly.
    pub fn sample_at(&self, eccentric_anomaly: f64) -> DVec3 {
        let (sin, cos) = eccentric_anomaly.sin_cos();
        self.center
            + self.axis_main * (self.semi_major_axis * cos)
            + self.axis_secondary * (self.semi_minor_axis * sin)
    }

    /// Recovers the eccentric anomaly of a point on the ellipse, in `[0, 2π)`.
    ///
    /// The true anomaly is the angle between `point - focus0` and the main
    /// axis, signed by the side of the secondary axis the point falls on.
    pub fn anomaly_for_point(&self, point: DVec3) -> f64 {
        let offset = point - self.focus0;
        let true_anomaly = offset
            .dot(self.axis_secondary)
            .atan2(offset.dot(self.axis_main))
            .rem_euclid(core::f64::consts::TAU);

        true_to_eccentric(true_anomaly, self.eccentricity)
    }

    /// The normal of the ellipse's plane, `normalize(main × secondary)`.
    pub fn normal(&self) -> DVec3 {
        self.axis_main
            .cross(self.axis_secondary)
            .normalized_or_zero()
    }

    /// Orients the ellipse so its normal agrees with `normal`.
    ///
    /// A missing secondary axis is rebuilt from `normal`. Otherwise the
    /// secondary axis is flipped when the two normals point away from each other.
    pub fn align_to_normal(&mut self, normal: DVec3) {
        if self.axis_secondary == DVec3::ZERO {
            self.axis_secondary = secondary_from_normal(normal, self.axis_main);
        } else if self.normal().dot(normal) < 0.0 {
            self.flip_secondary_axis();
        }
    }

    /// Reverses the secondary axis, which reverses the direction anomalies grow in.
    pub fn flip_secondary_axis(&mut self) {
        self.axis_secondary = -self.axis_secondary;
    }

    /// Returns the focus anomalies are measured from.
    pub fn get_focus0(&self) -> DVec3 {
        self.focus0
    }

    /// Returns the second focus.
    pub fn get_focus1(&self) -> DVec3 {
        self.focus1
    }

    /// Returns the geometric center, halfway between both foci.
    pub fn get_center(&self) -> DVec3 {
        self.center
    }

    /// Returns the semi-major axis length `A`.
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Returns the semi-minor axis length `B`.
    pub fn get_semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    /// Returns the eccentricity.
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Returns the unit vector along the major axis, towards `focus0`.
    pub fn get_axis_main(&self) -> DVec3 {
        self.axis_main
    }

    /// Returns the unit vector along the minor axis.
    pub fn get_axis_secondary(&self) -> DVec3 {
        self.axis_secondary
    }
}
