//! Fixed-step rigid-body physics for 2D and 3D bodies.
//!
//! A simulation is a `Bodies` arena plus an `EngineConfig`, advanced one
//! frame at a time by `engine_tick`. Each tick integrates gravity, ground
//! friction and acceleration into motion, resolves collisions between bodies
//! found through a spatial hash grid, bounces bodies off the world
//! boundaries and the ground, and settles their rotation toward a resting
//! orientation.
//!
//! The 2D and 3D engines share one implementation, parameterized over
//! `Space2` and `Space3`.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod space;
pub mod space2;
pub mod space3;
pub mod component;
pub mod body;
pub mod grid;
pub mod detect;
pub mod resolve;
pub mod tick;

pub use crate::{
    config::{
        EngineConfig,
        NORMAL_THRESHOLD,
        MAX_FRAME_TIME,
    },
    space::Space,
    space2::Space2,
    space3::Space3,
    component::PhysicsComponent,
    body::{
        Body,
        BodyId,
        Bodies,
    },
    grid::SpatialHashGrid,
    detect::{
        CollisionPair,
        overlaps,
    },
    resolve::resolve,
    tick::{
        engine_tick,
        engine_tick_with_stats,
        TickStats,
    },
};
