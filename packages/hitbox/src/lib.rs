//! Immutable collision geometry for physics bodies.
//!
//! A hitbox is a shape expressed in its owning body's local space. It can be
//! asked whether it contains a point, and for its axis-aligned extents. Shapes
//! are a closed set of variants, so membership and extents are computed by
//! plain dispatch and every hitbox can be inspected after construction.
//!
//! Each constructed hitbox receives a fresh `HitboxId`, and equality is
//! identity: two hitboxes built from identical parameters are not equal.

#[macro_use]
extern crate tracing;

pub mod id;
pub mod affine2;
pub mod hitbox2;
pub mod hitbox3;

pub use crate::{
    id::HitboxId,
    affine2::Affine2,
    hitbox2::{
        Hitbox2,
        Shape2,
    },
    hitbox3::{
        Hitbox3,
        Shape3,
    },
};


/// Common interface of 2D and 3D hitboxes.
pub trait Hitbox: Clone + std::fmt::Debug {
    /// Point type, in the owning body's local space.
    type Point: Copy;

    /// Identity of this hitbox.
    fn id(&self) -> HitboxId;

    /// Whether `point` is inside the shape.
    fn contains(&self, point: Self::Point) -> bool;

    /// Minimum corner of the axis-aligned extents.
    fn min(&self) -> Self::Point;

    /// Maximum corner of the axis-aligned extents.
    fn max(&self) -> Self::Point;

    /// Whether this is the empty sentinel, which has NaN extents.
    fn is_empty(&self) -> bool;

    /// Minimum and maximum corners together.
    fn extents(&self) -> (Self::Point, Self::Point) {
        (self.min(), self.max())
    }
}
