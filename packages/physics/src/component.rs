//! Per-body physics state.

use crate::{
    config::EngineConfig,
    space::Space,
    space3::Space3,
};
use anyhow::*;
use vek::*;


/// Physics state of one body, owned by the engine and stored alongside the
/// body in the body arena.
///
/// Created with engine defaults on first access, and lives as long as the
/// body does.
#[derive(Debug, Clone)]
pub struct PhysicsComponent<S: Space> {
    mass: f32,
    friction_coefficient: f32,
    restitution_coefficient: f32,
    spin_factor: f32,
    target_rotation: S::TargetRotation,
    pending_spin: Option<S::Spin>,
    /// Velocity, in velocity space (Y up in both 2D and 3D).
    pub velocity: S::Vector,
    pub acceleration: S::Vector,
    /// Orientation. In 3D this is the stored rotation, which is the source of
    /// truth for the body's orientation.
    pub rotation: S::Rotation,
}

fn check_non_negative(name: &str, n: f32) -> Result<()> {
    ensure!(n.is_finite() && n >= 0.0, "{} must be finite and non-negative, got {}", name, n);
    Ok(())
}

impl<S: Space> PhysicsComponent<S> {
    /// Component with engine defaults and the body at rest.
    pub fn new(config: &EngineConfig) -> Self {
        PhysicsComponent {
            mass: 1.0,
            friction_coefficient: config.default_friction_coefficient(),
            restitution_coefficient: config.default_restitution_coefficient(),
            spin_factor: 0.0,
            target_rotation: S::default_target_rotation(),
            pending_spin: None,
            velocity: S::Vector::default(),
            acceleration: S::Vector::default(),
            rotation: S::Rotation::default(),
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        ensure!(mass.is_finite() && mass > 0.0, "mass must be finite and positive, got {}", mass);
        self.mass = mass;
        Ok(())
    }

    pub fn friction_coefficient(&self) -> f32 {
        self.friction_coefficient
    }

    pub fn set_friction_coefficient(&mut self, n: f32) -> Result<()> {
        check_non_negative("friction_coefficient", n)?;
        self.friction_coefficient = n;
        Ok(())
    }

    pub fn restitution_coefficient(&self) -> f32 {
        self.restitution_coefficient
    }

    pub fn set_restitution_coefficient(&mut self, n: f32) -> Result<()> {
        check_non_negative("restitution_coefficient", n)?;
        self.restitution_coefficient = n;
        Ok(())
    }

    /// How strongly tangential contact velocity turns into spin. Zero
    /// disables spin from contacts entirely.
    pub fn spin_factor(&self) -> f32 {
        self.spin_factor
    }

    pub fn set_spin_factor(&mut self, n: f32) -> Result<()> {
        check_non_negative("spin_factor", n)?;
        self.spin_factor = n;
        Ok(())
    }

    pub fn target_rotation(&self) -> S::TargetRotation {
        self.target_rotation
    }

    pub fn set_target_rotation(&mut self, target: S::TargetRotation) -> Result<()> {
        S::check_target_rotation(target)?;
        self.target_rotation = target;
        Ok(())
    }

    /// Spin still waiting to be applied, if any.
    pub fn pending_spin(&self) -> Option<S::Spin> {
        self.pending_spin
    }

    /// Queue `spin` degrees to be applied gradually over the following ticks.
    pub fn lerp_spin(&mut self, spin: S::Spin) {
        self.pending_spin = Some(self.pending_spin.unwrap_or_default() + spin);
    }

    /// Scale the pending spin, if any, without applying it.
    pub(crate) fn damp_pending_spin(&mut self, factor: f32) {
        if let Some(spin) = self.pending_spin.as_mut() {
            *spin = *spin * factor;
        }
    }

    /// Apply the `1 - decay` share of the pending spin to the rotation and
    /// keep the rest, dropping it once it has settled.
    pub(crate) fn apply_pending_spin(&mut self, decay: f32) {
        if let Some(spin) = self.pending_spin {
            S::rotate(&mut self.rotation, spin * (1.0 - decay));
            let rest = spin * decay;
            self.pending_spin = if S::spin_settled(rest) {
                None
            } else {
                Some(rest)
            };
        }
    }

    /// Inverse mass as seen by the resolver. Static bodies have none.
    pub(crate) fn inverse_mass(&self, is_static: bool) -> f32 {
        if is_static {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}

impl PhysicsComponent<Space3> {
    /// Queue a pitch, yaw and roll change in degrees, applied gradually to
    /// the stored rotation over the following ticks.
    pub fn lerp_rotation(&mut self, degrees: Vec3<f32>) {
        self.lerp_spin(degrees);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::space2::Space2;

    #[test]
    fn defaults_come_from_config() {
        let mut config = EngineConfig::default();
        config.set_default_friction_coefficient(0.8).unwrap();
        let c = PhysicsComponent::<Space2>::new(&config);
        assert_eq!(c.mass(), 1.0);
        assert_eq!(c.friction_coefficient(), 0.8);
        assert_eq!(c.restitution_coefficient(), 0.1);
        assert_eq!(c.spin_factor(), 0.0);
        assert_eq!(c.target_rotation(), 90.0);
        assert_eq!(c.pending_spin(), None);

        let c = PhysicsComponent::<Space3>::new(&config);
        assert_eq!(c.target_rotation(), Vec3::new(180.0, 360.0, 180.0));
        assert_eq!(c.rotation, Vec3::zero());
    }

    #[test]
    fn setters_validate() {
        let mut c = PhysicsComponent::<Space2>::new(&EngineConfig::default());
        assert!(c.set_mass(0.0).is_err());
        assert!(c.set_mass(-1.0).is_err());
        assert!(c.set_friction_coefficient(-0.5).is_err());
        assert!(c.set_restitution_coefficient(-0.5).is_err());
        assert!(c.set_spin_factor(-1.0).is_err());
        assert!(c.set_target_rotation(400.0).is_err());
        assert_eq!(c.mass(), 1.0);
        c.set_mass(2.5).unwrap();
        c.set_target_rotation(0.0).unwrap();
        assert_eq!(c.mass(), 2.5);
    }

    #[test]
    fn pending_spin_accumulates_and_drains() {
        let mut c = PhysicsComponent::<Space2>::new(&EngineConfig::default());
        c.lerp_spin(4.0);
        c.lerp_spin(6.0);
        assert_eq!(c.pending_spin(), Some(10.0));
        c.apply_pending_spin(0.5);
        assert_eq!(c.pending_spin(), Some(5.0));
        assert!((c.rotation - 5.0).abs() < 1e-5);
        c.apply_pending_spin(0.0);
        assert_eq!(c.pending_spin(), None);
        assert!((c.rotation - 10.0).abs() < 1e-5);
    }

    #[test]
    fn lerp_rotation_queues_degrees() {
        let mut c = PhysicsComponent::<Space3>::new(&EngineConfig::default());
        c.lerp_rotation(Vec3::new(0.0, 90.0, 0.0));
        c.apply_pending_spin(0.0);
        assert!((c.rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(c.pending_spin(), None);
    }
}
