//! The per-frame simulation step.

use crate::{
    body::{
        Bodies,
        BodyId,
    },
    component::PhysicsComponent,
    config::{
        EngineConfig,
        NORMAL_THRESHOLD,
        MAX_FRAME_TIME,
    },
    detect::{
        CollisionPair,
        overlaps,
    },
    grid::SpatialHashGrid,
    resolve::resolve,
    space::{
        Space,
        VERTICAL,
        horizontal_speed,
    },
};
use hitbox::Hitbox;
use std::collections::{
    HashSet,
    BTreeSet,
};


/// Vertical velocity and acceleration below this magnitude are zeroed on the
/// ground, and a downward impact slower than this does not bounce.
const GROUND_STOP: f32 = 5.0 * NORMAL_THRESHOLD;


/// Counters for one tick, logged at debug level.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TickStats {
    pub bodies: usize,
    pub pairs_tested: usize,
    pub collisions: usize,
    pub moved: usize,
}


/// Advance the simulation by one frame.
///
/// `frame_time` is the elapsed time in seconds, capped at `MAX_FRAME_TIME`,
/// and `fps` the target frame rate. Velocities are in units per frame at that
/// rate, so a body moves by `velocity * frame_time * fps` per tick.
///
/// Non-static bodies are processed in ascending id order, which together with
/// the canonical pair order makes the result deterministic. Returns the ids
/// of bodies whose position changed.
pub fn engine_tick<S: Space>(
    config: &EngineConfig,
    bodies: &mut Bodies<S>,
    frame_time: f32,
    fps: f32,
) -> BTreeSet<BodyId> {
    engine_tick_with_stats(config, bodies, frame_time, fps).0
}

/// `engine_tick`, also returning the tick's counters.
pub fn engine_tick_with_stats<S: Space>(
    config: &EngineConfig,
    bodies: &mut Bodies<S>,
    frame_time: f32,
    fps: f32,
) -> (BTreeSet<BodyId>, TickStats) {
    let dt = if frame_time.is_finite() {
        frame_time.clamp(0.0, MAX_FRAME_TIME)
    } else {
        0.0
    };
    let fps = if fps.is_finite() && fps > 0.0 { fps } else { 0.0 };
    let step = dt * fps;

    let mut stats = TickStats {
        bodies: bodies.len(),
        ..Default::default()
    };

    let start: Vec<(BodyId, S::Vector)> = bodies
        .iter_mut()
        .map(|(id, body)| {
            body.physics_mut(config);
            (id, body.pos)
        })
        .collect();

    let mut grid = SpatialHashGrid::new(config.cell_size());
    grid.rebuild(bodies);
    let mut processed = HashSet::new();

    for &(id, _) in &start {
        let body = match bodies.get_mut(id) {
            Some(body) => body,
            None => continue,
        };
        if body.is_static {
            continue;
        }

        let phys = body.physics.get_or_insert_with(|| PhysicsComponent::new(config));
        integrate(config, dt, step, phys, &mut body.pos, &body.hitbox);

        for other in grid.candidates_for(id) {
            let pair = CollisionPair::new(id, other);
            if !processed.insert(pair) {
                continue;
            }
            stats.pairs_tested += 1;
            let (low, high) = match bodies.get2_mut(pair.low(), pair.high()) {
                Some(two) => two,
                None => continue,
            };
            if overlaps(config, low, high) {
                trace!(?pair, "collision");
                if resolve(config, low, high) {
                    stats.collisions += 1;
                }
            }
        }

        let body = match bodies.get_mut(id) {
            Some(body) => body,
            None => continue,
        };
        let phys = body.physics.get_or_insert_with(|| PhysicsComponent::new(config));
        clamp_to_boundaries(config, phys, &mut body.pos, &body.hitbox);
        clamp_to_ground(config, phys, &mut body.pos, &body.hitbox);
        phys.apply_pending_spin(config.spin_decay_factor());
    }

    let changed: BTreeSet<BodyId> = start
        .into_iter()
        .filter(|&(id, pos)| bodies.get(id).map(|body| body.pos != pos).unwrap_or(false))
        .map(|(id, _)| id)
        .collect();
    stats.moved = changed.len();
    debug!(?stats, "tick");
    (changed, stats)
}

/// Gravity, ground friction, rotation settling and the integration of
/// acceleration into velocity and velocity into position.
fn integrate<S: Space>(
    config: &EngineConfig,
    dt: f32,
    step: f32,
    phys: &mut PhysicsComponent<S>,
    pos: &mut S::Vector,
    hitbox: &S::Hitbox,
) {
    phys.acceleration[VERTICAL] -= config.gravity() * dt;

    if S::near_ground(config, *pos, hitbox) {
        apply_friction(config, step, phys);

        let stationary = horizontal_speed::<S>(phys.velocity) < NORMAL_THRESHOLD;
        if stationary {
            phys.damp_pending_spin(config.spin_decay_factor());
        }
        let target = phys.target_rotation();
        if let Some(torque) = S::settle(&mut phys.rotation, target, stationary) {
            phys.lerp_spin(torque);
        }

        if phys.velocity[VERTICAL].abs() < GROUND_STOP {
            phys.velocity[VERTICAL] = 0.0;
        }
        if phys.acceleration[VERTICAL].abs() < GROUND_STOP {
            phys.acceleration[VERTICAL] = 0.0;
        }
    }

    phys.velocity = phys.velocity + phys.acceleration * step;
    for i in 0..S::DIMS {
        if phys.velocity[i].abs() < NORMAL_THRESHOLD {
            phys.velocity[i] = 0.0;
        }
        if phys.acceleration[i].abs() < NORMAL_THRESHOLD {
            phys.acceleration[i] = 0.0;
        }
    }

    let terminal = config.terminal_velocity();
    for i in 0..S::DIMS {
        phys.velocity[i] = phys.velocity[i].clamp(-terminal, terminal);
    }
    phys.acceleration[VERTICAL] = phys.acceleration[VERTICAL].clamp(-terminal, terminal);

    *pos = *pos + S::flip_vertical(phys.velocity) * step;
}

/// Kinetic friction against the horizontal velocity, never reversing it.
fn apply_friction<S: Space>(config: &EngineConfig, step: f32, phys: &mut PhysicsComponent<S>) {
    let speed = horizontal_speed::<S>(phys.velocity);
    if speed <= 0.0 {
        return;
    }
    let mass = phys.mass();
    let decel = phys.friction_coefficient() * mass * config.gravity() / mass * step;
    let scale = (speed - decel).max(0.0) / speed;
    for &i in S::HORIZONTAL_AXES {
        phys.velocity[i] *= scale;
    }
}

/// Keep the hitbox inside the horizontal world boundaries, bouncing off
/// them.
fn clamp_to_boundaries<S: Space>(
    config: &EngineConfig,
    phys: &mut PhysicsComponent<S>,
    pos: &mut S::Vector,
    hitbox: &S::Hitbox,
) {
    let (min, max) = hitbox.extents();
    for &axis in S::HORIZONTAL_AXES {
        let (lo, hi) = config.bounds(axis);
        let wall = if min[axis].is_finite() && pos[axis] + min[axis] < lo {
            pos[axis] = lo - min[axis];
            1.0
        } else if max[axis].is_finite() && pos[axis] + max[axis] > hi {
            pos[axis] = hi - max[axis];
            -1.0
        } else {
            continue;
        };
        trace!(axis, "boundary hit");

        if phys.spin_factor() > 0.0 {
            let mut normal = S::Vector::default();
            normal[axis] = wall;
            let spin = S::cross(normal, phys.velocity) * phys.spin_factor();
            phys.lerp_spin(spin);
        }
        phys.velocity[axis] = -phys.velocity[axis] * phys.restitution_coefficient();
    }
}

/// Rest the body on the ground if it has reached it, bouncing if it came
/// down fast enough.
fn clamp_to_ground<S: Space>(
    config: &EngineConfig,
    phys: &mut PhysicsComponent<S>,
    pos: &mut S::Vector,
    hitbox: &S::Hitbox,
) {
    let y = match S::ground_contact(config, *pos, hitbox) {
        Some(y) => y,
        None => return,
    };
    pos[VERTICAL] = y;

    if phys.spin_factor() > 0.0 {
        let spin = S::cross(S::up(), phys.velocity) * phys.spin_factor();
        phys.lerp_spin(spin);
    }
    phys.velocity[VERTICAL] = if phys.velocity[VERTICAL] < -GROUND_STOP {
        -phys.velocity[VERTICAL] * phys.restitution_coefficient()
    } else {
        0.0
    };
    phys.acceleration[VERTICAL] = 0.0;
}
