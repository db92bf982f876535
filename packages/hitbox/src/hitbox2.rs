//! 2D hitboxes.

use crate::{
    Hitbox,
    HitboxId,
    Affine2,
};
use std::sync::Arc;
use vek::*;


/// Relative tolerance of the triangle area-sum membership test.
const TRIANGLE_AREA_EPSILON: f32 = 1e-4;

/// 2D collision geometry in body-local space.
///
/// Immutable. Extents are computed once at construction.
#[derive(Debug, Clone)]
pub struct Hitbox2 {
    id: HitboxId,
    shape: Shape2,
    min: Vec2<f32>,
    max: Vec2<f32>,
}

/// Shape of a `Hitbox2`.
#[derive(Debug, Clone)]
pub enum Shape2 {
    /// Contains every point. Infinite extents.
    Full,
    /// Contains no point. NaN extents.
    Empty,
    /// Axis-aligned rectangle, half-open: `min <= p < max`.
    Rect {
        min: Vec2<f32>,
        max: Vec2<f32>,
    },
    /// Disk, closed: `|p - center|^2 <= radius^2`.
    Circle {
        center: Vec2<f32>,
        radius: f32,
    },
    Triangle {
        a: Vec2<f32>,
        b: Vec2<f32>,
        c: Vec2<f32>,
    },
    /// Rectangle `min..max` rotated by `degrees` about `center`.
    Rotated {
        min: Vec2<f32>,
        max: Vec2<f32>,
        center: Vec2<f32>,
        degrees: f32,
    },
    /// Rectangle `min..max` mapped through an affine transform. Stores the
    /// inverse, which is what membership tests need.
    Transformed {
        min: Vec2<f32>,
        max: Vec2<f32>,
        inverse: Affine2,
    },
    Union(Arc<Hitbox2>, Arc<Hitbox2>),
}

fn rect_contains(min: Vec2<f32>, max: Vec2<f32>, p: Vec2<f32>) -> bool {
    p.x >= min.x && p.x < max.x
        && p.y >= min.y && p.y < max.y
}

fn rotate_about(p: Vec2<f32>, center: Vec2<f32>, degrees: f32) -> Vec2<f32> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = p - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Twice the unsigned area of a triangle.
fn area2(a: Vec2<f32>, b: Vec2<f32>, c: Vec2<f32>) -> f32 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
}

fn bounds_of(points: &[Vec2<f32>]) -> (Vec2<f32>, Vec2<f32>) {
    let mut min = Vec2::broadcast(f32::INFINITY);
    let mut max = Vec2::broadcast(f32::NEG_INFINITY);
    for p in points {
        min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
        max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
    }
    (min, max)
}

impl Hitbox2 {
    fn new(shape: Shape2, min: Vec2<f32>, max: Vec2<f32>) -> Self {
        Hitbox2 {
            id: HitboxId::fresh(),
            shape,
            min,
            max,
        }
    }

    /// Hitbox containing every point.
    pub fn full() -> Self {
        Self::new(
            Shape2::Full,
            Vec2::broadcast(f32::NEG_INFINITY),
            Vec2::broadcast(f32::INFINITY),
        )
    }

    /// Hitbox containing nothing. Never occupies a spatial cell.
    pub fn empty() -> Self {
        Self::new(
            Shape2::Empty,
            Vec2::broadcast(f32::NAN),
            Vec2::broadcast(f32::NAN),
        )
    }

    /// Axis-aligned rectangle from its minimum corner and size.
    pub fn rect<V1, V2>(corner: V1, size: V2) -> Self
    where
        V1: Into<Vec2<f32>>,
        V2: Into<Vec2<f32>>,
    {
        let min = corner.into();
        let max = min + size.into();
        Self::from_min_max(min, max)
    }

    /// Axis-aligned rectangle from its minimum and maximum corners.
    pub fn from_min_max<V1, V2>(min: V1, max: V2) -> Self
    where
        V1: Into<Vec2<f32>>,
        V2: Into<Vec2<f32>>,
    {
        let min = min.into();
        let max = max.into();
        Self::new(Shape2::Rect { min, max }, min, max)
    }

    pub fn circle<V: Into<Vec2<f32>>>(center: V, radius: f32) -> Self {
        let center = center.into();
        Self::new(
            Shape2::Circle { center, radius },
            center - Vec2::broadcast(radius),
            center + Vec2::broadcast(radius),
        )
    }

    pub fn triangle<V1, V2, V3>(a: V1, b: V2, c: V3) -> Self
    where
        V1: Into<Vec2<f32>>,
        V2: Into<Vec2<f32>>,
        V3: Into<Vec2<f32>>,
    {
        let (a, b, c) = (a.into(), b.into(), c.into());
        let (min, max) = bounds_of(&[a, b, c]);
        Self::new(Shape2::Triangle { a, b, c }, min, max)
    }

    /// Rectangle from corner and size, rotated by `degrees` about `center`.
    ///
    /// Extents are the axis-aligned bounds of the four rotated corners.
    pub fn rotated_rect<V1, V2, V3>(corner: V1, size: V2, center: V3, degrees: f32) -> Self
    where
        V1: Into<Vec2<f32>>,
        V2: Into<Vec2<f32>>,
        V3: Into<Vec2<f32>>,
    {
        let min = corner.into();
        let max = min + size.into();
        let center = center.into();
        let corners = [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(min.x, max.y),
            Vec2::new(max.x, max.y),
        ].map(|p| rotate_about(p, center, degrees));
        let (ext_min, ext_max) = bounds_of(&corners);
        Self::new(
            Shape2::Rotated { min, max, center, degrees },
            ext_min,
            ext_max,
        )
    }

    /// Rectangle `min..max` mapped through `transform`.
    ///
    /// Extents are the bounds of the two transformed defining corners. A
    /// non-invertible transform collapses the rectangle, which yields
    /// `empty()`.
    pub fn transformed_rect<V1, V2>(min: V1, max: V2, transform: Affine2) -> Self
    where
        V1: Into<Vec2<f32>>,
        V2: Into<Vec2<f32>>,
    {
        let min = min.into();
        let max = max.into();
        let inverse = match transform.inverse() {
            Some(inverse) => inverse,
            None => {
                warn!(?transform, "transformed rect with singular transform, using empty hitbox");
                return Self::empty();
            }
        };
        let (ext_min, ext_max) = bounds_of(&[transform.apply(min), transform.apply(max)]);
        Self::new(
            Shape2::Transformed { min, max, inverse },
            ext_min,
            ext_max,
        )
    }

    /// Vertical capsule: a `2 * radius` wide rectangle spanning
    /// `2 * half_height`, capped by a circle at each end.
    pub fn capsule<V: Into<Vec2<f32>>>(center: V, half_height: f32, radius: f32) -> Self {
        let center = center.into();
        let body = Self::from_min_max(
            center - Vec2::new(radius, half_height),
            center + Vec2::new(radius, half_height),
        );
        let top = Self::circle(center - Vec2::new(0.0, half_height), radius);
        let bottom = Self::circle(center + Vec2::new(0.0, half_height), radius);
        body.union(&top).union(&bottom)
    }

    /// Hitbox containing the points of either `self` or `other`.
    pub fn union(&self, other: &Hitbox2) -> Self {
        let min = Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y));
        let max = Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y));
        Self::new(
            Shape2::Union(Arc::new(self.clone()), Arc::new(other.clone())),
            min,
            max,
        )
    }

    pub fn shape(&self) -> &Shape2 {
        &self.shape
    }
}

impl Hitbox for Hitbox2 {
    type Point = Vec2<f32>;

    fn id(&self) -> HitboxId {
        self.id
    }

    fn contains(&self, p: Vec2<f32>) -> bool {
        match &self.shape {
            &Shape2::Full => true,
            &Shape2::Empty => false,
            &Shape2::Rect { min, max } => rect_contains(min, max, p),
            &Shape2::Circle { center, radius } => {
                radius > 0.0 && (p - center).magnitude_squared() <= radius * radius
            }
            &Shape2::Triangle { a, b, c } => {
                let total = area2(a, b, c);
                let sum = area2(p, b, c) + area2(a, p, c) + area2(a, b, p);
                total > 0.0 && (sum - total).abs() <= total * TRIANGLE_AREA_EPSILON
            }
            &Shape2::Rotated { min, max, center, degrees } => {
                rect_contains(min, max, rotate_about(p, center, -degrees))
            }
            &Shape2::Transformed { min, max, inverse } => {
                rect_contains(min, max, inverse.apply(p))
            }
            &Shape2::Union(ref a, ref b) => a.contains(p) || b.contains(p),
        }
    }

    fn min(&self) -> Vec2<f32> {
        self.min
    }

    fn max(&self) -> Vec2<f32> {
        self.max
    }

    fn is_empty(&self) -> bool {
        self.min.x.is_nan() || self.min.y.is_nan()
            || self.max.x.is_nan() || self.max.y.is_nan()
    }
}

impl PartialEq for Hitbox2 {
    fn eq(&self, rhs: &Hitbox2) -> bool {
        self.id == rhs.id
    }
}

impl Eq for Hitbox2 {}
