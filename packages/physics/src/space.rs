//! Abstraction over the 2D and 3D variants of the engine.
//!
//! The tick, broad-phase, narrow-phase and resolver are written once against
//! `Space`. The two implementations differ in vector and hitbox types, in
//! their rotation model, and in their up-axis convention: 2D works in screen
//! space where position Y grows downward while velocity Y grows upward, 3D
//! works in world space where both grow upward.

use crate::config::EngineConfig;
use hitbox::Hitbox;
use std::{
    fmt::Debug,
    ops::{
        Add,
        Sub,
        Mul,
        Deref,
        DerefMut,
    },
};
use anyhow::Result;


/// Index of the vertical axis, in both spaces.
pub const VERTICAL: usize = 1;

/// Rotation deltas smaller than this many degrees count as settled.
pub const SETTLE_SNAP_DEGREES: f32 = 0.5;

/// Fraction of the remaining rotation delta applied directly per tick to a
/// body at rest on the ground.
pub const STATIONARY_NUDGE: f32 = 0.1;

/// Fraction of the remaining rotation delta added as pending spin per tick
/// to a body moving on the ground.
pub const TORQUE_GAIN: f32 = 0.05;


/// A simulation dimensionality.
pub trait Space: Copy + Debug + 'static {
    /// Number of axes.
    const DIMS: usize;

    /// Axes that ground friction acts along and that world boundaries clamp.
    const HORIZONTAL_AXES: &'static [usize];

    type Vector: Copy
        + Debug
        + Default
        + PartialEq
        + Deref<Target = [f32]>
        + DerefMut
        + Add<Output = Self::Vector>
        + Sub<Output = Self::Vector>
        + Mul<f32, Output = Self::Vector>;

    type Hitbox: Hitbox<Point = Self::Vector>;

    /// Orientation of a body.
    type Rotation: Copy + Debug + Default + PartialEq;

    /// Rotational delta, in degrees per axis.
    type Spin: Copy
        + Debug
        + Default
        + PartialEq
        + Add<Output = Self::Spin>
        + Mul<f32, Output = Self::Spin>;

    /// Resting orientation step(s), in degrees.
    type TargetRotation: Copy + Debug + PartialEq;

    /// Hitbox a body of the given size gets unless given another.
    fn default_hitbox(size: Self::Vector) -> Self::Hitbox;

    fn default_target_rotation() -> Self::TargetRotation;

    /// Check that every step is in `[0, 360]`.
    fn check_target_rotation(target: Self::TargetRotation) -> Result<()>;

    /// Convert between velocity space and position space. Its own inverse.
    fn flip_vertical(v: Self::Vector) -> Self::Vector;

    /// Up direction in velocity space.
    fn up() -> Self::Vector;

    /// Whether the body's lower face is on or just above the ground.
    fn near_ground(config: &EngineConfig, pos: Self::Vector, hitbox: &Self::Hitbox) -> bool;

    /// If the body's lower face has reached the ground, the vertical
    /// position that rests it exactly on the ground.
    fn ground_contact(
        config: &EngineConfig,
        pos: Self::Vector,
        hitbox: &Self::Hitbox,
    ) -> Option<f32>;

    /// Cross product of two velocity-space vectors, as a spin.
    fn cross(a: Self::Vector, b: Self::Vector) -> Self::Spin;

    /// Whether every component of `spin` is below `NORMAL_THRESHOLD`.
    fn spin_settled(spin: Self::Spin) -> bool;

    /// Turn `rotation` by `spin`.
    fn rotate(rotation: &mut Self::Rotation, spin: Self::Spin);

    /// Move `rotation` toward the nearest multiple of `target`.
    ///
    /// A stationary body is nudged directly. Otherwise the correction is
    /// returned, to be added as pending spin.
    fn settle(
        rotation: &mut Self::Rotation,
        target: Self::TargetRotation,
        stationary: bool,
    ) -> Option<Self::Spin>;
}


pub(crate) fn dot<S: Space>(a: S::Vector, b: S::Vector) -> f32 {
    (0..S::DIMS).map(|i| a[i] * b[i]).sum()
}

pub(crate) fn magnitude<S: Space>(v: S::Vector) -> f32 {
    dot::<S>(v, v).sqrt()
}

pub(crate) fn horizontal_speed<S: Space>(v: S::Vector) -> f32 {
    S::HORIZONTAL_AXES.iter().map(|&i| v[i] * v[i]).sum::<f32>().sqrt()
}

/// Wrap an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Outcome of settling one rotation axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Settle {
    /// Close enough, or settling disabled.
    Settled,
    /// Degrees to turn right now.
    Nudge(f32),
    /// Degrees to add as pending spin.
    Torque(f32),
}

/// Settle an orientation of `degrees` toward the nearest multiple of `step`.
///
/// A `step` of zero disables settling.
pub fn settle_axis(degrees: f32, step: f32, stationary: bool) -> Settle {
    if !(step > 0.0) {
        return Settle::Settled;
    }
    let nearest = (degrees / step).round() * step;
    let delta = wrap_degrees(nearest - degrees);
    if delta.abs() < SETTLE_SNAP_DEGREES {
        Settle::Settled
    } else if stationary {
        Settle::Nudge(delta * STATIONARY_NUDGE)
    } else {
        Settle::Torque(delta * TORQUE_GAIN)
    }
}


#[test]
fn vector_helpers_index_by_axis() {
    use crate::{
        space2::Space2,
        space3::Space3,
    };
    use vek::*;

    assert_eq!(dot::<Space2>(Vec2::new(1.0, 2.0), Vec2::new(3.0, -1.0)), 1.0);
    assert_eq!(magnitude::<Space3>(Vec3::new(2.0, 3.0, 6.0)), 7.0);
    assert_eq!(horizontal_speed::<Space3>(Vec3::new(3.0, 100.0, 4.0)), 5.0);
    assert_eq!(horizontal_speed::<Space2>(Vec2::new(-2.0, 9.0)), 2.0);

    let mut v = <Space3 as Space>::Vector::default();
    v[VERTICAL] = 4.0;
    assert_eq!(v, Vec3::new(0.0, 4.0, 0.0));
}

#[test]
fn wrap_degrees_range() {
    assert_eq!(wrap_degrees(190.0), -170.0);
    assert_eq!(wrap_degrees(-190.0), 170.0);
    assert_eq!(wrap_degrees(360.0), 0.0);
    assert_eq!(wrap_degrees(45.0), 45.0);
}

#[test]
fn settle_axis_cases() {
    assert_eq!(settle_axis(90.2, 90.0, false), Settle::Settled);
    assert_eq!(settle_axis(50.0, 0.0, false), Settle::Settled);
    assert_eq!(settle_axis(80.0, 90.0, true), Settle::Nudge(10.0 * STATIONARY_NUDGE));
    assert_eq!(settle_axis(100.0, 90.0, false), Settle::Torque(-10.0 * TORQUE_GAIN));
    // 350 is closest to 360, which is reached by turning forward
    assert_eq!(settle_axis(350.0, 90.0, true), Settle::Nudge(10.0 * STATIONARY_NUDGE));
}
