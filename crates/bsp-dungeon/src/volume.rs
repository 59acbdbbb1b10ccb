//! Axis-aligned volumes and horizontal axes for dungeon partitioning.

use nalgebra::{Point3, Vector3};

/// Default epsilon for volume comparisons.
/// Faces within this distance of each other are considered touching.
pub const VOLUME_EPSILON: f32 = 1e-4;

/// A horizontal axis of the dungeon plane.
///
/// Cells are only ever split along `X` or `Z`; the vertical axis is never
/// partitioned. A node's split axis is the axis along which its cell was
/// halved, i.e. the axis separating its two children. Corridor probes travel
/// along the split axis while room overlap is measured on the perpendicular
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The horizontal X axis (component index 0).
    X,
    /// The horizontal Z axis (component index 2).
    Z,
}

impl Axis {
    /// Returns the component index of this axis in a 3-vector.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Z => 2,
        }
    }

    /// Returns the other horizontal axis.
    #[inline]
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Returns the unit direction vector of this axis.
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::new(1.0, 0.0, 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, 1.0),
        }
    }
}

/// An axis-aligned box, stored as a center point and half-size extents.
///
/// `Volume` is an immutable value type: operations return new volumes, and
/// derived quantities (corners, size, volume, aspect ratio) are computed on
/// demand rather than stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    center: Point3<f32>,
    extents: Vector3<f32>,
}

impl Volume {
    /// Creates a volume from its center and half-size extents.
    ///
    /// # Panics (debug builds only)
    /// Panics if any extent is negative.
    pub fn new(center: Point3<f32>, extents: Vector3<f32>) -> Self {
        debug_assert!(
            extents.x >= 0.0 && extents.y >= 0.0 && extents.z >= 0.0,
            "Volume extents must be non-negative"
        );
        Self { center, extents }
    }

    /// Creates a volume from its minimum and maximum corners.
    ///
    /// # Panics (debug builds only)
    /// Panics if `min` exceeds `max` on any axis.
    pub fn from_corners(min: Point3<f32>, max: Point3<f32>) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "Volume min corner must not exceed max corner"
        );
        let center = Point3::from((min.coords + max.coords) * 0.5);
        let extents = (max - min) * 0.5;
        Self { center, extents }
    }

    /// Returns the center point.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    /// Returns the half-size extents.
    #[inline]
    pub fn extents(&self) -> Vector3<f32> {
        self.extents
    }

    /// Returns the minimum corner.
    #[inline]
    pub fn min(&self) -> Point3<f32> {
        self.center - self.extents
    }

    /// Returns the maximum corner.
    #[inline]
    pub fn max(&self) -> Point3<f32> {
        self.center + self.extents
    }

    /// Returns the full size (twice the extents).
    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.extents * 2.0
    }

    /// Computes the enclosed volume (width x height x depth).
    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Computes the horizontal aspect ratio: footprint width over depth.
    ///
    /// A degenerate depth yields an infinite ratio, which any finite
    /// acceptance band rejects.
    pub fn aspect_ratio(&self) -> f32 {
        let size = self.size();
        size.x / size.z
    }

    /// Returns the center coordinate on a horizontal axis.
    #[inline]
    pub fn center_on(&self, axis: Axis) -> f32 {
        self.center[axis.index()]
    }

    /// Returns the half-size extent on a horizontal axis.
    #[inline]
    pub fn extent_on(&self, axis: Axis) -> f32 {
        self.extents[axis.index()]
    }

    /// Returns the `(min, max)` interval this volume covers on a horizontal
    /// axis.
    pub fn span_on(&self, axis: Axis) -> (f32, f32) {
        let center = self.center[axis.index()];
        let extent = self.extents[axis.index()];
        (center - extent, center + extent)
    }

    /// Returns the minimal enclosing box of this volume and another.
    pub fn union(&self, other: &Volume) -> Volume {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        let min = Point3::new(
            a_min.x.min(b_min.x),
            a_min.y.min(b_min.y),
            a_min.z.min(b_min.z),
        );
        let max = Point3::new(
            a_max.x.max(b_max.x),
            a_max.y.max(b_max.y),
            a_max.z.max(b_max.z),
        );
        Volume::from_corners(min, max)
    }

    /// Checks whether `other` lies entirely inside this volume, allowing
    /// [`VOLUME_EPSILON`] of slack on each face.
    pub fn contains(&self, other: &Volume) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        (0..3).all(|i| {
            b_min[i] >= a_min[i] - VOLUME_EPSILON && b_max[i] <= a_max[i] + VOLUME_EPSILON
        })
    }

    /// Checks whether this volume and another share interior space.
    ///
    /// Volumes that merely touch on a face (within [`VOLUME_EPSILON`]) do not
    /// count as overlapping, so cells produced by a split report disjoint.
    pub fn overlaps(&self, other: &Volume) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        (0..3).all(|i| {
            a_min[i] + VOLUME_EPSILON < b_max[i] && b_min[i] + VOLUME_EPSILON < a_max[i]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn make_volume(center: [f32; 3], extents: [f32; 3]) -> Volume {
        Volume::new(
            Point3::new(center[0], center[1], center[2]),
            Vector3::new(extents[0], extents[1], extents[2]),
        )
    }

    #[test]
    fn corners_and_size() {
        let v = make_volume([1.0, 2.0, 3.0], [0.5, 1.0, 1.5]);

        assert_eq!(v.min(), Point3::new(0.5, 1.0, 1.5));
        assert_eq!(v.max(), Point3::new(1.5, 3.0, 4.5));
        assert_eq!(v.size(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn from_corners_roundtrip() {
        let v = Volume::from_corners(Point3::new(-2.0, 0.0, -4.0), Point3::new(2.0, 2.0, 4.0));

        assert_eq!(v.center(), Point3::new(0.0, 1.0, 0.0));
        assert_eq!(v.extents(), Vector3::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn volume_and_aspect() {
        let v = make_volume([0.0, 0.0, 0.0], [50.0, 5.0, 50.0]);
        assert_approx_eq!(v.volume(), 100.0 * 10.0 * 100.0, 1e-3);
        assert_approx_eq!(v.aspect_ratio(), 1.0, 1e-6);

        let wide = make_volume([0.0, 0.0, 0.0], [10.0, 1.0, 2.0]);
        assert_approx_eq!(wide.aspect_ratio(), 5.0, 1e-6);
    }

    #[test]
    fn union_encloses_both() {
        let a = make_volume([-2.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = make_volume([3.0, 0.5, 0.0], [1.0, 0.5, 2.0]);

        let u = a.union(&b);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        // Minimal on each face: corners come from the inputs.
        assert_eq!(u.min().x, a.min().x);
        assert_eq!(u.max().x, b.max().x);
        assert_eq!(u.min().z, b.min().z);
        assert_eq!(u.max().z, b.max().z);
    }

    #[test]
    fn union_is_commutative() {
        let a = make_volume([-1.0, 0.0, 2.0], [1.5, 1.0, 0.5]);
        let b = make_volume([4.0, 1.0, -3.0], [0.5, 2.0, 1.0]);

        assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn contains_self_and_smaller() {
        let outer = make_volume([0.0, 0.0, 0.0], [5.0, 5.0, 5.0]);
        let inner = make_volume([1.0, -1.0, 2.0], [1.0, 1.0, 1.0]);
        let shifted = make_volume([5.5, 0.0, 0.0], [1.0, 1.0, 1.0]);

        assert!(outer.contains(&outer));
        assert!(outer.contains(&inner));
        assert!(!outer.contains(&shifted));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn touching_faces_do_not_overlap() {
        // Two halves of a split cell share the boundary plane exactly.
        let left = make_volume([-1.0, 0.0, 0.0], [1.0, 1.0, 2.0]);
        let right = make_volume([1.0, 0.0, 0.0], [1.0, 1.0, 2.0]);

        assert!(!left.overlaps(&right));

        let intruding = make_volume([0.5, 0.0, 0.0], [1.0, 1.0, 2.0]);
        assert!(left.overlaps(&intruding));
    }

    #[test]
    fn axis_helpers() {
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Z.index(), 2);
        assert_eq!(Axis::X.perpendicular(), Axis::Z);
        assert_eq!(Axis::Z.perpendicular(), Axis::X);
        assert_eq!(Axis::X.unit(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(Axis::Z.unit(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn span_on_axis() {
        let v = make_volume([2.0, 0.0, -1.0], [3.0, 1.0, 2.0]);

        assert_eq!(v.span_on(Axis::X), (-1.0, 5.0));
        assert_eq!(v.span_on(Axis::Z), (-3.0, 1.0));
    }
}
