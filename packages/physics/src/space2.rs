//! 2D screen-space simulation.
//!
//! Position Y grows downward, so a body's lower face is `pos.y + hitbox.max.y`
//! and velocity Y is negated when integrated into position.

use crate::{
    config::{
        EngineConfig,
        NORMAL_THRESHOLD,
    },
    space::{
        Space,
        Settle,
        settle_axis,
    },
};
use hitbox::{
    Hitbox,
    Hitbox2,
};
use anyhow::*;
use vek::*;


/// A body counts as near the ground within this distance above it.
const NEAR_GROUND_EPSILON: f32 = 1.0;


#[derive(Debug, Copy, Clone)]
pub struct Space2;

impl Space for Space2 {
    const DIMS: usize = 2;
    const HORIZONTAL_AXES: &'static [usize] = &[0];

    type Vector = Vec2<f32>;
    type Hitbox = Hitbox2;
    /// Degrees, kept in `[0, 360)`.
    type Rotation = f32;
    type Spin = f32;
    type TargetRotation = f32;

    /// Rectangle from the body's top-left corner.
    fn default_hitbox(size: Vec2<f32>) -> Hitbox2 {
        Hitbox2::rect(Vec2::zero(), size)
    }

    fn default_target_rotation() -> f32 {
        90.0
    }

    fn check_target_rotation(target: f32) -> Result<()> {
        ensure!(
            (0.0..=360.0).contains(&target),
            "target rotation must be in [0, 360] degrees, got {}", target,
        );
        Ok(())
    }

    fn flip_vertical(v: Vec2<f32>) -> Vec2<f32> {
        Vec2::new(v.x, -v.y)
    }

    fn up() -> Vec2<f32> {
        Vec2::unit_y()
    }

    fn near_ground(config: &EngineConfig, pos: Vec2<f32>, hitbox: &Hitbox2) -> bool {
        let lower = pos.y + hitbox.max().y;
        lower.is_finite() && lower >= config.ground_y() - NEAR_GROUND_EPSILON
    }

    fn ground_contact(config: &EngineConfig, pos: Vec2<f32>, hitbox: &Hitbox2) -> Option<f32> {
        let lower = pos.y + hitbox.max().y;
        if lower.is_finite() && lower >= config.ground_y() {
            Some(config.ground_y() - hitbox.max().y)
        } else {
            None
        }
    }

    fn cross(a: Vec2<f32>, b: Vec2<f32>) -> f32 {
        a.x * b.y - a.y * b.x
    }

    fn spin_settled(spin: f32) -> bool {
        spin.abs() < NORMAL_THRESHOLD
    }

    fn rotate(rotation: &mut f32, spin: f32) {
        *rotation = (*rotation + spin).rem_euclid(360.0);
    }

    fn settle(rotation: &mut f32, target: f32, stationary: bool) -> Option<f32> {
        match settle_axis(*rotation, target, stationary) {
            Settle::Settled => None,
            Settle::Nudge(degrees) => {
                Self::rotate(rotation, degrees);
                None
            }
            Settle::Torque(degrees) => Some(degrees),
        }
    }
}
