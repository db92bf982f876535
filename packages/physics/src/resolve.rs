//! Collision response between two overlapping bodies.

use crate::{
    body::Body,
    config::EngineConfig,
    detect::world_extents,
    space::{
        Space,
        dot,
        magnitude,
    },
};


/// Below this center distance the collision normal is undefined and the
/// pair is left alone.
const MIN_NORMAL_DISTANCE: f32 = 1e-6;


/// Push two overlapping bodies apart and exchange impulse between them.
///
/// Separation moves the bodies along the center-to-center normal by the
/// penetration depth, shared by inverse mass. The impulse response is skipped
/// if the bodies are already separating. Bodies with a positive spin factor
/// get the tangential part of the relative velocity queued as spin.
///
/// Returns whether an impulse was applied.
pub fn resolve<S: Space>(config: &EngineConfig, a: &mut Body<S>, b: &mut Body<S>) -> bool {
    let (a_static, b_static) = (a.is_static, b.is_static);
    if a_static && b_static {
        return false;
    }

    let (a_min, a_max) = world_extents(a);
    let (b_min, b_max) = world_extents(b);
    let a_half = (a_max - a_min) * 0.5;
    let b_half = (b_max - b_min) * 0.5;
    let delta = (b_min + b_half) - (a_min + a_half);
    let dist = magnitude::<S>(delta);
    if !(dist > MIN_NORMAL_DISTANCE) || !dist.is_finite() {
        trace!("degenerate collision normal, skipping");
        return false;
    }
    let normal = delta * (1.0 / dist);

    let project = |half: S::Vector| -> f32 {
        (0..S::DIMS).map(|i| (half[i] * normal[i]).abs()).sum()
    };
    let penetration = project(a_half) + project(b_half) - dist;

    let a_phys = a.physics_mut(config).clone();
    let b_phys = b.physics_mut(config).clone();
    let inv_a = a_phys.inverse_mass(a_static);
    let inv_b = b_phys.inverse_mass(b_static);
    let inv_sum = inv_a + inv_b;

    if penetration > 0.0 && penetration.is_finite() {
        a.pos = a.pos - normal * (penetration * inv_a / inv_sum);
        b.pos = b.pos + normal * (penetration * inv_b / inv_sum);
    }

    // normals above are in position space
    let normal = S::flip_vertical(normal);
    let rv = b_phys.velocity - a_phys.velocity;
    let vn = dot::<S>(rv, normal);
    if vn > 0.0 {
        return false;
    }

    let restitution = if a_static {
        a_phys.restitution_coefficient()
    } else if b_static {
        b_phys.restitution_coefficient()
    } else {
        (a_phys.restitution_coefficient() + b_phys.restitution_coefficient()) * 0.5
    };
    let j = -(1.0 + restitution) * vn / inv_sum;

    let spin = S::cross(rv, normal);
    let a_phys = a.physics_mut(config);
    a_phys.velocity = a_phys.velocity - normal * (j * inv_a);
    if a_phys.spin_factor() > 0.0 && !a_static {
        a_phys.lerp_spin(spin * a_phys.spin_factor());
    }
    let b_phys = b.physics_mut(config);
    b_phys.velocity = b_phys.velocity + normal * (j * inv_b);
    if b_phys.spin_factor() > 0.0 && !b_static {
        b_phys.lerp_spin(spin * b_phys.spin_factor());
    }
    true
}
