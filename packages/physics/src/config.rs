//! Engine tunables.

use serde::{Serialize, Deserialize};
use anyhow::*;


/// Magnitude below which velocity, acceleration and pending spin components
/// are snapped to exactly zero.
pub const NORMAL_THRESHOLD: f32 = 0.05;

/// Upper bound on the time step of a single tick, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.03;


/// Process-wide engine tunables, passed explicitly into each tick.
///
/// Every setter validates its input and leaves the config unchanged on
/// error. Deserialized configs must be checked with `validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    gravity: f32,
    default_friction_coefficient: f32,
    default_restitution_coefficient: f32,
    ground_y: f32,
    min_x: f32,
    max_x: f32,
    min_z: f32,
    max_z: f32,
    terminal_velocity: f32,
    collision_precision: u32,
    cell_size: f32,
    spin_decay_factor: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            gravity: 9.81,
            default_friction_coefficient: 0.5,
            default_restitution_coefficient: 0.1,
            ground_y: 0.0,
            min_x: -10000.0,
            max_x: 10000.0,
            min_z: -10000.0,
            max_z: 10000.0,
            terminal_velocity: 100.0,
            collision_precision: 4,
            cell_size: 64.0,
            spin_decay_factor: 0.97,
        }
    }
}

fn check_non_negative(name: &str, n: f32) -> Result<()> {
    ensure!(n.is_finite() && n >= 0.0, "{} must be finite and non-negative, got {}", name, n);
    Ok(())
}

fn check_bounds(name: &str, min: f32, max: f32) -> Result<()> {
    ensure!(
        min.is_finite() && max.is_finite(),
        "{} bounds must be finite, got {}..{}", name, min, max,
    );
    ensure!(min < max, "{} bounds must satisfy min < max, got {}..{}", name, min, max);
    Ok(())
}

impl EngineConfig {
    /// Re-check every invariant. Needed after deserialization.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("gravity", self.gravity)?;
        check_non_negative("default_friction_coefficient", self.default_friction_coefficient)?;
        check_non_negative("default_restitution_coefficient", self.default_restitution_coefficient)?;
        ensure!(self.ground_y.is_finite(), "ground_y must be finite, got {}", self.ground_y);
        check_bounds("x", self.min_x, self.max_x)?;
        check_bounds("z", self.min_z, self.max_z)?;
        check_non_negative("terminal_velocity", self.terminal_velocity)?;
        ensure!(
            self.collision_precision >= 1,
            "collision_precision must be at least 1, got {}", self.collision_precision,
        );
        ensure!(
            self.cell_size.is_finite() && self.cell_size > 0.0,
            "cell_size must be finite and positive, got {}", self.cell_size,
        );
        ensure!(
            (0.0..=1.0).contains(&self.spin_decay_factor),
            "spin_decay_factor must be in [0, 1], got {}", self.spin_decay_factor,
        );
        Ok(())
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f32) -> Result<()> {
        check_non_negative("gravity", gravity)?;
        self.gravity = gravity;
        Ok(())
    }

    pub fn default_friction_coefficient(&self) -> f32 {
        self.default_friction_coefficient
    }

    pub fn set_default_friction_coefficient(&mut self, n: f32) -> Result<()> {
        check_non_negative("default_friction_coefficient", n)?;
        self.default_friction_coefficient = n;
        Ok(())
    }

    pub fn default_restitution_coefficient(&self) -> f32 {
        self.default_restitution_coefficient
    }

    pub fn set_default_restitution_coefficient(&mut self, n: f32) -> Result<()> {
        check_non_negative("default_restitution_coefficient", n)?;
        self.default_restitution_coefficient = n;
        Ok(())
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn set_ground_y(&mut self, ground_y: f32) -> Result<()> {
        ensure!(ground_y.is_finite(), "ground_y must be finite, got {}", ground_y);
        self.ground_y = ground_y;
        Ok(())
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Set both X boundaries at once.
    pub fn set_x_bounds(&mut self, min_x: f32, max_x: f32) -> Result<()> {
        check_bounds("x", min_x, max_x)?;
        self.min_x = min_x;
        self.max_x = max_x;
        Ok(())
    }

    pub fn min_z(&self) -> f32 {
        self.min_z
    }

    pub fn max_z(&self) -> f32 {
        self.max_z
    }

    /// Set both Z boundaries at once.
    pub fn set_z_bounds(&mut self, min_z: f32, max_z: f32) -> Result<()> {
        check_bounds("z", min_z, max_z)?;
        self.min_z = min_z;
        self.max_z = max_z;
        Ok(())
    }

    /// Boundaries of a horizontal axis: 0 for X, 2 for Z.
    pub fn bounds(&self, axis: usize) -> (f32, f32) {
        match axis {
            0 => (self.min_x, self.max_x),
            2 => (self.min_z, self.max_z),
            _ => (f32::NEG_INFINITY, f32::INFINITY),
        }
    }

    pub fn terminal_velocity(&self) -> f32 {
        self.terminal_velocity
    }

    pub fn set_terminal_velocity(&mut self, n: f32) -> Result<()> {
        check_non_negative("terminal_velocity", n)?;
        self.terminal_velocity = n;
        Ok(())
    }

    pub fn collision_precision(&self) -> u32 {
        self.collision_precision
    }

    /// Samples per axis of the narrow-phase test, minus one.
    ///
    /// Meant to be set before simulation starts.
    pub fn set_collision_precision(&mut self, n: u32) -> Result<()> {
        ensure!(n >= 1, "collision_precision must be at least 1, got {}", n);
        self.collision_precision = n;
        Ok(())
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Edge length of a broad-phase grid cell.
    ///
    /// Meant to be set before simulation starts.
    pub fn set_cell_size(&mut self, n: f32) -> Result<()> {
        ensure!(n.is_finite() && n > 0.0, "cell_size must be finite and positive, got {}", n);
        self.cell_size = n;
        Ok(())
    }

    pub fn spin_decay_factor(&self) -> f32 {
        self.spin_decay_factor
    }

    pub fn set_spin_decay_factor(&mut self, n: f32) -> Result<()> {
        ensure!((0.0..=1.0).contains(&n), "spin_decay_factor must be in [0, 1], got {}", n);
        self.spin_decay_factor = n;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn setters_reject_out_of_range() {
        let mut c = EngineConfig::default();
        assert!(c.set_gravity(-1.0).is_err());
        assert!(c.set_gravity(f32::NAN).is_err());
        assert!(c.set_default_friction_coefficient(-0.1).is_err());
        assert!(c.set_default_restitution_coefficient(-0.1).is_err());
        assert!(c.set_x_bounds(5.0, 5.0).is_err());
        assert!(c.set_z_bounds(10.0, -10.0).is_err());
        assert!(c.set_terminal_velocity(-3.0).is_err());
        assert!(c.set_collision_precision(0).is_err());
        assert!(c.set_cell_size(0.0).is_err());
        assert!(c.set_spin_decay_factor(1.5).is_err());
        assert!(c.set_spin_decay_factor(-0.01).is_err());
        assert_eq!(c, EngineConfig::default());
    }

    #[test]
    fn setters_accept_in_range() {
        let mut c = EngineConfig::default();
        c.set_gravity(0.0).unwrap();
        c.set_x_bounds(-5.0, 5.0).unwrap();
        c.set_spin_decay_factor(1.0).unwrap();
        assert_eq!(c.bounds(0), (-5.0, 5.0));
        assert_eq!(c.gravity(), 0.0);
    }

    #[test]
    fn error_names_the_field() {
        let err = EngineConfig::default().set_cell_size(-2.0).unwrap_err();
        assert!(err.to_string().contains("cell_size"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: EngineConfig = serde_json::from_str(r#"{ "gravity": 1.5 }"#).unwrap();
        assert_eq!(c.gravity(), 1.5);
        assert_eq!(c.cell_size(), 64.0);
        c.validate().unwrap();
    }

    #[test]
    fn invalid_json_fails_validation() {
        let c: EngineConfig = serde_json::from_str(r#"{ "min_x": 3.0, "max_x": 1.0 }"#).unwrap();
        assert!(c.validate().is_err());
    }
}
