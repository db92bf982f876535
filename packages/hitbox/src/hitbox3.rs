//! 3D hitboxes.

use crate::{
    Hitbox,
    HitboxId,
};
use std::sync::Arc;
use vek::*;


/// 3D collision geometry in body-local space.
///
/// Immutable. Extents are computed once at construction.
#[derive(Debug, Clone)]
pub struct Hitbox3 {
    id: HitboxId,
    shape: Shape3,
    min: Vec3<f32>,
    max: Vec3<f32>,
}

/// Shape of a `Hitbox3`.
#[derive(Debug, Clone)]
pub enum Shape3 {
    /// Contains every point. Infinite extents.
    Full,
    /// Contains no point. NaN extents.
    Empty,
    /// Axis-aligned box, half-open: `min <= p < max`.
    Box {
        min: Vec3<f32>,
        max: Vec3<f32>,
    },
    /// Ball, closed: `|p - center|^2 <= radius^2`.
    Sphere {
        center: Vec3<f32>,
        radius: f32,
    },
    /// Box `min..max` rotated about `center`. Stores the inverse rotation.
    Rotated {
        min: Vec3<f32>,
        max: Vec3<f32>,
        center: Vec3<f32>,
        inverse: Quaternion<f32>,
    },
    /// Box `min..max` mapped through an affine transform. Stores the inverse.
    Transformed {
        min: Vec3<f32>,
        max: Vec3<f32>,
        inverse: Mat4<f32>,
    },
    Union(Arc<Hitbox3>, Arc<Hitbox3>),
}

fn box_contains(min: Vec3<f32>, max: Vec3<f32>, p: Vec3<f32>) -> bool {
    (0..3).all(|i| p[i] >= min[i] && p[i] < max[i])
}

fn bounds_of(points: &[Vec3<f32>]) -> (Vec3<f32>, Vec3<f32>) {
    let mut min = Vec3::broadcast(f32::INFINITY);
    let mut max = Vec3::broadcast(f32::NEG_INFINITY);
    for p in points {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    (min, max)
}

fn corners(min: Vec3<f32>, max: Vec3<f32>) -> [Vec3<f32>; 8] {
    let mut out = [Vec3::zero(); 8];
    for (n, corner) in out.iter_mut().enumerate() {
        for i in 0..3 {
            corner[i] = if n & (1 << i) == 0 { min[i] } else { max[i] };
        }
    }
    out
}

/// Rotation from pitch (about X), yaw (about Y) and roll (about Z), in
/// radians. Applied roll first, then pitch, then yaw.
pub fn euler_rotation(rotation: Vec3<f32>) -> Quaternion<f32> {
    Quaternion::rotation_y(rotation.y)
        * Quaternion::rotation_x(rotation.x)
        * Quaternion::rotation_z(rotation.z)
}

impl Hitbox3 {
    fn new(shape: Shape3, min: Vec3<f32>, max: Vec3<f32>) -> Self {
        Hitbox3 {
            id: HitboxId::fresh(),
            shape,
            min,
            max,
        }
    }

    /// Hitbox containing every point.
    pub fn full() -> Self {
        Self::new(
            Shape3::Full,
            Vec3::broadcast(f32::NEG_INFINITY),
            Vec3::broadcast(f32::INFINITY),
        )
    }

    /// Hitbox containing nothing. Never occupies a spatial cell.
    pub fn empty() -> Self {
        Self::new(
            Shape3::Empty,
            Vec3::broadcast(f32::NAN),
            Vec3::broadcast(f32::NAN),
        )
    }

    /// Axis-aligned box from its minimum corner and size.
    pub fn cuboid<V1, V2>(corner: V1, size: V2) -> Self
    where
        V1: Into<Vec3<f32>>,
        V2: Into<Vec3<f32>>,
    {
        let min = corner.into();
        let max = min + size.into();
        Self::from_min_max(min, max)
    }

    /// Axis-aligned box centered on `center`.
    pub fn centered<V1, V2>(center: V1, size: V2) -> Self
    where
        V1: Into<Vec3<f32>>,
        V2: Into<Vec3<f32>>,
    {
        let center = center.into();
        let half = size.into() * 0.5;
        Self::from_min_max(center - half, center + half)
    }

    /// Axis-aligned box from its minimum and maximum corners.
    pub fn from_min_max<V1, V2>(min: V1, max: V2) -> Self
    where
        V1: Into<Vec3<f32>>,
        V2: Into<Vec3<f32>>,
    {
        let min = min.into();
        let max = max.into();
        Self::new(Shape3::Box { min, max }, min, max)
    }

    pub fn sphere<V: Into<Vec3<f32>>>(center: V, radius: f32) -> Self {
        let center = center.into();
        Self::new(
            Shape3::Sphere { center, radius },
            center - Vec3::broadcast(radius),
            center + Vec3::broadcast(radius),
        )
    }

    /// Box from corner and size, rotated about `center` by pitch/yaw/roll
    /// radians (see `euler_rotation`).
    ///
    /// Extents are the axis-aligned bounds of the eight rotated corners.
    pub fn rotated_box<V1, V2, V3, V4>(corner: V1, size: V2, center: V3, rotation: V4) -> Self
    where
        V1: Into<Vec3<f32>>,
        V2: Into<Vec3<f32>>,
        V3: Into<Vec3<f32>>,
        V4: Into<Vec3<f32>>,
    {
        let min = corner.into();
        let max = min + size.into();
        let center = center.into();
        let rot = euler_rotation(rotation.into());
        let rotated = corners(min, max).map(|p| center + rot * (p - center));
        let (ext_min, ext_max) = bounds_of(&rotated);
        Self::new(
            Shape3::Rotated { min, max, center, inverse: rot.conjugate() },
            ext_min,
            ext_max,
        )
    }

    /// Box `min..max` mapped through the affine `transform`.
    ///
    /// Extents are the bounds of the two transformed defining corners. A
    /// singular transform yields `empty()`.
    pub fn transformed_box<V1, V2>(min: V1, max: V2, transform: Mat4<f32>) -> Self
    where
        V1: Into<Vec3<f32>>,
        V2: Into<Vec3<f32>>,
    {
        let min = min.into();
        let max = max.into();
        let det = transform.determinant();
        if !det.is_finite() || det.abs() <= f32::EPSILON {
            warn!(%det, "transformed box with singular transform, using empty hitbox");
            return Self::empty();
        }
        let inverse = transform.inverted();
        let (ext_min, ext_max) = bounds_of(&[
            transform.mul_point(min),
            transform.mul_point(max),
        ]);
        Self::new(
            Shape3::Transformed { min, max, inverse },
            ext_min,
            ext_max,
        )
    }

    /// Hitbox containing the points of either `self` or `other`.
    pub fn union(&self, other: &Hitbox3) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for i in 0..3 {
            min[i] = min[i].min(other.min[i]);
            max[i] = max[i].max(other.max[i]);
        }
        Self::new(
            Shape3::Union(Arc::new(self.clone()), Arc::new(other.clone())),
            min,
            max,
        )
    }

    pub fn shape(&self) -> &Shape3 {
        &self.shape
    }
}

impl Hitbox for Hitbox3 {
    type Point = Vec3<f32>;

    fn id(&self) -> HitboxId {
        self.id
    }

    fn contains(&self, p: Vec3<f32>) -> bool {
        match &self.shape {
            &Shape3::Full => true,
            &Shape3::Empty => false,
            &Shape3::Box { min, max } => box_contains(min, max, p),
            &Shape3::Sphere { center, radius } => {
                radius > 0.0 && (p - center).magnitude_squared() <= radius * radius
            }
            &Shape3::Rotated { min, max, center, inverse } => {
                box_contains(min, max, center + inverse * (p - center))
            }
            &Shape3::Transformed { min, max, inverse } => {
                box_contains(min, max, inverse.mul_point(p))
            }
            &Shape3::Union(ref a, ref b) => a.contains(p) || b.contains(p),
        }
    }

    fn min(&self) -> Vec3<f32> {
        self.min
    }

    fn max(&self) -> Vec3<f32> {
        self.max
    }

    fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i].is_nan() || self.max[i].is_nan())
    }
}

impl PartialEq for Hitbox3 {
    fn eq(&self, rhs: &Hitbox3) -> bool {
        self.id == rhs.id
    }
}

impl Eq for Hitbox3 {}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3<f32>, b: Vec3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn centered_box_membership() {
        let h = Hitbox3::centered([0.0, 0.0, 0.0], [2.0, 4.0, 6.0]);
        assert_eq!(h.min(), Vec3::new(-1.0, -2.0, -3.0));
        assert!(h.contains(Vec3::new(0.9, -1.9, 2.9)));
        assert!(!h.contains(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn sphere_membership() {
        let s = Hitbox3::sphere([1.0, 1.0, 1.0], 2.0);
        assert!(s.contains(Vec3::new(1.0, 3.0, 1.0)));
        assert!(!s.contains(Vec3::new(2.5, 2.5, 1.0)));
        assert_eq!(s.max(), Vec3::new(3.0, 3.0, 3.0));
        assert!(!Hitbox3::sphere([0.0, 0.0, 0.0], 0.0).contains(Vec3::zero()));
    }

    #[test]
    fn rotated_box_swaps_axes() {
        // 4x2x2 box centered on the origin, yawed a quarter turn
        let h = Hitbox3::rotated_box(
            [-2.0, -1.0, -1.0],
            [4.0, 2.0, 2.0],
            [0.0, 0.0, 0.0],
            [0.0, FRAC_PI_2, 0.0],
        );
        assert!(close(h.min(), Vec3::new(-1.0, -1.0, -2.0)));
        assert!(close(h.max(), Vec3::new(1.0, 1.0, 2.0)));
        assert!(h.contains(Vec3::new(0.0, 0.0, 1.5)));
        assert!(!h.contains(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn transformed_box_uses_inverse() {
        let t = Mat4::<f32>::translation_3d(Vec3::new(5.0, 0.0, 0.0))
            * Mat4::scaling_3d(Vec3::new(2.0, 2.0, 2.0));
        let h = Hitbox3::transformed_box([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], t);
        assert!(close(h.min(), Vec3::new(5.0, 0.0, 0.0)));
        assert!(close(h.max(), Vec3::new(7.0, 2.0, 2.0)));
        assert!(h.contains(Vec3::new(6.0, 1.0, 1.0)));
        assert!(!h.contains(Vec3::new(4.5, 1.0, 1.0)));
    }

    #[test]
    fn singular_transform_is_empty() {
        let h = Hitbox3::transformed_box(
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            Mat4::scaling_3d(Vec3::new(1.0, 0.0, 1.0)),
        );
        assert!(h.is_empty());
    }

    #[test]
    fn union_with_self_is_idempotent() {
        let a = Hitbox3::centered([1.0, 2.0, 3.0], [1.0, 1.0, 1.0]);
        let u = a.union(&a);
        assert_eq!(u.extents(), a.extents());
        assert_eq!(u.contains(Vec3::new(1.0, 2.0, 3.0)), a.contains(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(u.contains(Vec3::new(9.0, 2.0, 3.0)), a.contains(Vec3::new(9.0, 2.0, 3.0)));
        assert_ne!(u, a);
    }

    #[test]
    fn union_spans_both() {
        let u = Hitbox3::sphere([0.0, 0.0, 0.0], 1.0)
            .union(&Hitbox3::cuboid([4.0, 4.0, 4.0], [1.0, 1.0, 1.0]));
        assert_eq!(u.min(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(u.max(), Vec3::new(5.0, 5.0, 5.0));
        assert!(u.contains(Vec3::new(4.5, 4.5, 4.5)));
        assert!(!u.contains(Vec3::new(2.0, 2.0, 2.0)));
    }

    #[test]
    fn empty_never_matches() {
        let e = Hitbox3::empty();
        assert!(e.is_empty());
        assert!(!e.contains(Vec3::zero()));
        assert!(Hitbox3::full().contains(Vec3::new(-1e20, 0.0, 1e20)));
    }
}
