//! Canned sets of bodies for the sandbox to simulate.

use crate::settings::Scenario;
use physics::{
    EngineConfig,
    Space2,
    Space3,
    Body,
    Bodies,
};
use hitbox::{
    Hitbox2,
    Hitbox3,
};
use anyhow::*;
use vek::*;


/// Build a 2D scenario. Positions are screen space, so "above the ground" is
/// a smaller Y.
pub fn build_2d(scenario: Scenario, config: &EngineConfig) -> Result<Bodies<Space2>> {
    let mut bodies = Bodies::new();
    let ground = config.ground_y();
    let size = Vec2::broadcast(10.0);
    match scenario {
        Scenario::Drop => {
            let id = bodies.insert(Body::new(Vec2::new(0.0, ground - 100.0), size));
            bodies.physics_mut(id, config)?.set_restitution_coefficient(0.3)?;
        }
        Scenario::HeadOn => {
            let ball = || Hitbox2::circle([5.0, 5.0], 5.0);
            for (x, vx) in [(0.0, 10.0), (40.0, -10.0)] {
                let id = bodies.insert(
                    Body::new(Vec2::new(x, ground - 200.0), size).with_hitbox(ball())
                );
                let phys = bodies.physics_mut(id, config)?;
                phys.set_restitution_coefficient(1.0)?;
                phys.velocity = Vec2::new(vx, 0.0);
            }
        }
        Scenario::WallBounce => {
            let id = bodies.insert(
                Body::new(Vec2::new(config.max_x() - 40.0, ground - 100.0), size)
            );
            let phys = bodies.physics_mut(id, config)?;
            phys.set_restitution_coefficient(0.5)?;
            phys.set_spin_factor(0.5)?;
            phys.velocity = Vec2::new(20.0, 0.0);
        }
        Scenario::Spin => {
            let capsule = Hitbox2::capsule([5.0, 10.0], 5.0, 5.0);
            let id = bodies.insert(
                Body::new(Vec2::new(0.0, ground - 50.0), Vec2::new(10.0, 20.0)).with_hitbox(capsule)
            );
            let phys = bodies.physics_mut(id, config)?;
            phys.set_spin_factor(0.5)?;
            phys.lerp_spin(720.0);
        }
    }
    Ok(bodies)
}

/// Build a 3D scenario.
pub fn build_3d(scenario: Scenario, config: &EngineConfig) -> Result<Bodies<Space3>> {
    let mut bodies = Bodies::new();
    let ground = config.ground_y();
    let size = Vec3::one();
    match scenario {
        Scenario::Drop => {
            let id = bodies.insert(Body::new(Vec3::new(0.0, ground + 20.0, 0.0), size));
            bodies.physics_mut(id, config)?.set_restitution_coefficient(0.3)?;
        }
        Scenario::HeadOn => {
            let ball = || Hitbox3::sphere(Vec3::zero(), 0.5);
            for (x, vx) in [(-3.0, 1.0), (3.0, -1.0)] {
                let id = bodies.insert(
                    Body::new(Vec3::new(x, ground + 10.0, 0.0), size).with_hitbox(ball())
                );
                let phys = bodies.physics_mut(id, config)?;
                phys.set_restitution_coefficient(1.0)?;
                phys.velocity = Vec3::new(vx, 0.0, 0.0);
            }
        }
        Scenario::WallBounce => {
            let id = bodies.insert(
                Body::new(Vec3::new(0.0, ground + 10.0, config.max_z() - 4.0), size)
            );
            let phys = bodies.physics_mut(id, config)?;
            phys.set_restitution_coefficient(0.5)?;
            phys.set_spin_factor(0.5)?;
            phys.velocity = Vec3::new(0.0, 0.0, 2.0);
        }
        Scenario::Spin => {
            let id = bodies.insert(Body::new(Vec3::new(0.0, ground + 5.0, 0.0), size));
            let phys = bodies.physics_mut(id, config)?;
            phys.set_spin_factor(0.5)?;
            phys.lerp_rotation(Vec3::new(90.0, 0.0, 45.0));
        }
    }
    Ok(bodies)
}


#[cfg(test)]
mod tests {
    use super::*;
    use physics::engine_tick;

    const ALL: [Scenario; 4] = [
        Scenario::Drop,
        Scenario::HeadOn,
        Scenario::WallBounce,
        Scenario::Spin,
    ];

    #[test]
    fn every_scenario_builds_and_runs() {
        let config = EngineConfig::default();
        for scenario in ALL {
            let mut bodies = build_2d(scenario, &config).unwrap();
            assert!(!bodies.is_empty());
            for _ in 0..10 {
                engine_tick(&config, &mut bodies, 1.0 / 60.0, 60.0);
            }
            let mut bodies = build_3d(scenario, &config).unwrap();
            assert!(!bodies.is_empty());
            for _ in 0..10 {
                engine_tick(&config, &mut bodies, 1.0 / 60.0, 60.0);
            }
        }
    }

    #[test]
    fn wall_bounce_turns_around() {
        let config = EngineConfig::default();
        let mut bodies = build_2d(Scenario::WallBounce, &config).unwrap();
        for _ in 0..5 {
            engine_tick(&config, &mut bodies, 1.0 / 60.0, 60.0);
        }
        let (_, body) = bodies.iter().next().unwrap();
        assert!(body.physics().unwrap().velocity.x < 0.0);
        assert!(body.pos.x <= config.max_x() - 10.0);
    }
}
