//! Conic sections built from their two foci and one point on the curve.
//!
//! These are transient helpers for the transfer solver: they're built fresh
//! for every candidate and only ever changed afterwards by flipping their
//! secondary axis to match a reference orientation.

mod ellipse;
mod hyperbola;

pub use ellipse::EllipseData;
pub use hyperbola::HyperbolaData;

use glam::DVec3;

use crate::VectorExt;

/// Builds the secondary axis of a conic: the part of `offset` orthogonal to
/// `axis_main`, cleaned up through the plane normal.
///
/// Zero when `offset` lies on the main axis.
pub(crate) fn secondary_axis(axis_main: DVec3, offset: DVec3) -> DVec3 {
    let orthogonal = offset.project_on_plane(axis_main).normalized_or_zero();
    let normal = axis_main.cross(orthogonal).normalized_or_zero();
    normal.cross(axis_main).normalized_or_zero()
}

/// Picks a secondary axis lying in the plane with the given normal, for
/// conics whose construction point gave no plane of their own.
#[inline]
pub(crate) fn secondary_from_normal(normal: DVec3, axis_main: DVec3) -> DVec3 {
    normal.cross(axis_main).normalized_or_zero()
}
