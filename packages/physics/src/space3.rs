//! 3D world-space simulation.
//!
//! Y is up for both position and velocity. Orientation is stored as pitch,
//! yaw and roll in radians, while targets and pending spin are in degrees.

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
    Hitbox3,
};
use std::f32::consts::TAU;
use anyhow::*;
use vek::*;


/// A body counts as near the ground within this distance above it.
const NEAR_GROUND_EPSILON: f32 = 0.3;


#[derive(Debug, Copy, Clone)]
pub struct Space3;

impl Space for Space3 {
    const DIMS: usize = 3;
    const HORIZONTAL_AXES: &'static [usize] = &[0, 2];

    type Vector = Vec3<f32>;
    type Hitbox = Hitbox3;
    /// Pitch, yaw, roll in radians, each kept in `[0, TAU)`.
    type Rotation = Vec3<f32>;
    type Spin = Vec3<f32>;
    type TargetRotation = Vec3<f32>;

    /// Box centered on the body position.
    fn default_hitbox(size: Vec3<f32>) -> Hitbox3 {
        Hitbox3::centered(Vec3::zero(), size)
    }

    fn default_target_rotation() -> Vec3<f32> {
        Vec3::new(180.0, 360.0, 180.0)
    }

    fn check_target_rotation(target: Vec3<f32>) -> Result<()> {
        for i in 0..3 {
            ensure!(
                (0.0..=360.0).contains(&target[i]),
                "target rotation must be in [0, 360] degrees per axis, got {:?}", target,
            );
        }
        Ok(())
    }

    fn flip_vertical(v: Vec3<f32>) -> Vec3<f32> {
        v
    }

    fn up() -> Vec3<f32> {
        Vec3::unit_y()
    }

    fn near_ground(config: &EngineConfig, pos: Vec3<f32>, hitbox: &Hitbox3) -> bool {
        let lower = pos.y + hitbox.min().y;
        lower.is_finite() && lower <= config.ground_y() + NEAR_GROUND_EPSILON
    }

    fn ground_contact(config: &EngineConfig, pos: Vec3<f32>, hitbox: &Hitbox3) -> Option<f32> {
        let lower = pos.y + hitbox.min().y;
        if lower.is_finite() && lower <= config.ground_y() {
            Some(config.ground_y() - hitbox.min().y)
        } else {
            None
        }
    }

    fn cross(a: Vec3<f32>, b: Vec3<f32>) -> Vec3<f32> {
        a.cross(b)
    }

    fn spin_settled(spin: Vec3<f32>) -> bool {
        (0..3).all(|i| spin[i].abs() < NORMAL_THRESHOLD)
    }

    fn rotate(rotation: &mut Vec3<f32>, spin: Vec3<f32>) {
        for i in 0..3 {
            rotation[i] = (rotation[i] + spin[i].to_radians()).rem_euclid(TAU);
        }
    }

    fn settle(rotation: &mut Vec3<f32>, target: Vec3<f32>, stationary: bool) -> Option<Vec3<f32>> {
        let mut torque = Vec3::zero();
        let mut any_torque = false;
        for i in 0..3 {
            match settle_axis(rotation[i].to_degrees(), target[i], stationary) {
                Settle::Settled => (),
                Settle::Nudge(degrees) => {
                    rotation[i] = (rotation[i] + degrees.to_radians()).rem_euclid(TAU);
                }
                Settle::Torque(degrees) => {
                    torque[i] = degrees;
                    any_torque = true;
                }
            }
        }
        if any_torque {
            Some(torque)
        } else {
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_uses_lower_world_face() {
        let config = EngineConfig::default();
        let hitbox = Hitbox3::centered([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        assert!(Space3::near_ground(&config, Vec3::new(0.0, 0.7, 0.0), &hitbox));
        assert!(!Space3::near_ground(&config, Vec3::new(0.0, 0.9, 0.0), &hitbox));
        assert_eq!(Space3::ground_contact(&config, Vec3::new(0.0, 0.7, 0.0), &hitbox), None);
        assert_eq!(Space3::ground_contact(&config, Vec3::new(0.0, 0.2, 0.0), &hitbox), Some(0.5));
    }

    #[test]
    fn rolling_spin_is_perpendicular_to_motion() {
        let spin = Space3::cross(Space3::up(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(spin, Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn settle_only_disturbed_axes() {
        let mut r = Vec3::new(170.0f32.to_radians(), 0.0, 0.0);
        let torque = Space3::settle(&mut r, Space3::default_target_rotation(), false).unwrap();
        assert!(torque.x > 0.0);
        assert_eq!(torque.y, 0.0);
        assert_eq!(torque.z, 0.0);
    }
}
