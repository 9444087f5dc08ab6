use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{secondary_axis, secondary_from_normal};
use crate::{sinhcosh, VectorExt};

/// A hyperbola defined by its two foci and a point on one of its branches.
///
/// The branch holding the construction point is the main branch. The main
/// axis points from the center towards the focus of that branch.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HyperbolaData {
    focus0: DVec3,
    focus1: DVec3,
    center: DVec3,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    focal_distance: f64,
    eccentricity: f64,
    axis_main: DVec3,
    axis_secondary: DVec3,
}

impl HyperbolaData {
    /// Builds the hyperbola with foci `focus0` and `focus1` passing through `point`.
    ///
    /// With `C` the half distance between the foci:
    /// - `A = ||p - f0| - |p - f1|| / 2`
    /// - `e = C / A`
    /// - `B = sqrt(C^2 - A^2)`
    ///
    /// A point on the line through both foci leaves the secondary axis as
    /// the zero vector until [`HyperbolaData::orient_to`] is called.
    ///
    /// # Example
    /// ```
    /// use glam::DVec3;
    /// use kepler_orbits::HyperbolaData;
    ///
    /// let hyperbola = HyperbolaData::new(
    ///     DVec3::new(10.0, 0.0, 0.0),
    ///     DVec3::new(-20.0, 0.0, 0.0),
    ///     DVec3::ZERO,
    /// );
    ///
    /// assert_eq!(hyperbola.get_semi_major_axis(), 5.0);
    /// assert_eq!(hyperbola.get_eccentricity(), 3.0);
    /// // The construction point is the vertex of the main branch.
    /// assert_eq!(hyperbola.sample_on_branch(0.0, true), DVec3::ZERO);
    /// ```
    pub fn new(focus0: DVec3, focus1: DVec3, point: DVec3) -> Self {
        let distance0 = point.distance(focus0);
        let distance1 = point.distance(focus1);

        let focal_distance = 0.5 * focus0.distance(focus1);
        let semi_major_axis = 0.5 * (distance0 - distance1).abs();
        let eccentricity = focal_distance / semi_major_axis;
        let semi_minor_axis =
            (focal_distance * focal_distance - semi_major_axis * semi_major_axis).sqrt();
        let center = focus0 + (focus1 - focus0) * 0.5;

        let axis_main = if distance0 <= distance1 {
            (focus0 - focus1).normalized_or_zero()
        } else {
            (focus1 - focus0).normalized_or_zero()
        };
        let axis_secondary = secondary_axis(axis_main, point - center);

        Self {
            focus0,
            focus1,
            center,
            semi_major_axis,
            semi_minor_axis,
            focal_distance,
            eccentricity,
            axis_main,
            axis_secondary,
        }
    }

    /// Samples a point on one of the two branches.
    ///
    /// `hyperbolic_coordinate` is the hyperbolic angle along the branch, zero
    /// at its vertex. `is_main_branch` selects the branch holding the
    /// construction point.
    pub fn sample_on_branch(&self, hyperbolic_coordinate: f64, is_main_branch: bool) -> DVec3 {
        let (sinh, cosh) = sinhcosh(hyperbolic_coordinate);
        let side = if is_main_branch { 1.0 } else { -1.0 };

        self.center
            + self.axis_main * (side * self.semi_major_axis * cosh)
            + self.axis_secondary * (self.semi_minor_axis * sinh)
    }

    /// The normal of the hyperbola's plane, `normalize(main × secondary)`.
    pub fn normal(&self) -> DVec3 {
        self.axis_main
            .cross(self.axis_secondary)
            .normalized_or_zero()
    }

    /// Orients the hyperbola so its normal agrees with `reference_normal`.
    ///
    /// A missing secondary axis is rebuilt from the reference normal.
    /// Otherwise it is flipped when the normals point away from each other.
    pub fn orient_to(&mut self, reference_normal: DVec3) {
        if self.axis_secondary == DVec3::ZERO {
            self.axis_secondary = secondary_from_normal(reference_normal, self.axis_main);
        } else if self.normal().dot(reference_normal) < 0.0 {
            self.flip_secondary_axis();
        }
    }

    /// Reverses the secondary axis.
    pub fn flip_secondary_axis(&mut self) {
        self.axis_secondary = -self.axis_secondary;
    }

    /// Returns the first focus.
    pub fn get_focus0(&self) -> DVec3 {
        self.focus0
    }

    /// Returns the second focus.
    pub fn get_focus1(&self) -> DVec3 {
        self.focus1
    }

    /// Returns the center, halfway between both foci.
    pub fn get_center(&self) -> DVec3 {
        self.center
    }

    /// Returns the distance from the center to each vertex, `A`.
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Returns `B`.
    pub fn get_semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    /// Returns the distance from the center to each focus, `C`.
    pub fn get_focal_distance(&self) -> f64 {
        self.focal_distance
    }

    /// Returns the eccentricity `C / A`.
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Returns the unit vector from the center towards the main branch.
    pub fn get_axis_main(&self) -> DVec3 {
        self.axis_main
    }

    /// Returns the unit vector along the conjugate axis.
    pub fn get_axis_secondary(&self) -> DVec3 {
        self.axis_secondary
    }
}
