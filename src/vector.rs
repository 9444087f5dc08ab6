//! Small additions on top of glam's [`DVec3`].
//!
//! glam already provides the arithmetic (add, scale, dot, cross, length,
//! angle between). What it lacks is a normalisation that collapses to zero
//! for tiny vectors instead of producing NaNs, which the orbit derivation
//! relies on to detect degenerate geometry.

use glam::{DQuat, DVec3};

/// Vectors shorter than this normalise to the zero vector.
pub const VECTOR_EPSILON: f64 = 1.4e-45;

/// Extension methods for [`DVec3`].
pub trait VectorExt: Sized {
    /// Returns the vector scaled to unit length, or the zero vector when its
    /// magnitude is below [`VECTOR_EPSILON`].
    ///
    /// # Example
    /// ```
    /// use glam::DVec3;
    /// use kepler_orbits::VectorExt;
    ///
    /// assert_eq!(DVec3::new(0.0, 3.0, 0.0).normalized_or_zero(), DVec3::Y);
    /// assert_eq!(DVec3::ZERO.normalized_or_zero(), DVec3::ZERO);
    /// ```
    fn normalized_or_zero(self) -> Self;

    /// Rotates the vector by `angle` radians around `axis`, right-handed.
    ///
    /// A degenerate axis leaves the vector unchanged.
    fn rotate_around(self, axis: Self, angle: f64) -> Self;

    /// Angle from `self` to `other` as seen looking down `axis`, in `(-PI, PI]`.
    ///
    /// Positive angles are counter-clockwise around `axis`.
    fn signed_angle_to(self, other: Self, axis: Self) -> f64;

    /// Removes the component along `normal`. `normal` must be a unit vector.
    fn project_on_plane(self, normal: Self) -> Self;
}

impl VectorExt for DVec3 {
    #[inline]
    fn normalized_or_zero(self) -> Self {
        let length = self.length();
        if length > VECTOR_EPSILON {
            self / length
        } else {
            DVec3::ZERO
        }
    }

    fn rotate_around(self, axis: Self, angle: f64) -> Self {
        let axis = axis.normalized_or_zero();
        if axis == DVec3::ZERO {
            return self;
        }
        DQuat::from_axis_angle(axis, angle) * self
    }

    fn signed_angle_to(self, other: Self, axis: Self) -> f64 {
        let cross = self.cross(other);
        let sin = cross.length().copysign(cross.dot(axis));
        sin.atan2(self.dot(other))
    }

    #[inline]
    fn project_on_plane(self, normal: Self) -> Self {
        self - normal * self.dot(normal)
    }
}
