//! Bodies and the arena they live in.

use crate::{
    config::EngineConfig,
    component::PhysicsComponent,
    space::Space,
};
use slab::Slab;
use anyhow::*;


/// Handle to a body in a `Bodies` arena. Stable for the body's lifetime, and
/// the ordering key for iteration and pair canonicalization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub usize);


/// A simulated body.
#[derive(Debug, Clone)]
pub struct Body<S: Space> {
    /// Position. In 2D this is the top-left corner in screen space, in 3D
    /// the center in world space.
    pub pos: S::Vector,
    pub size: S::Vector,
    /// Static bodies are never moved or pushed by the engine.
    pub is_static: bool,
    /// Collision shape, in the body's local space.
    pub hitbox: S::Hitbox,
    pub(crate) physics: Option<PhysicsComponent<S>>,
}

impl<S: Space> Body<S> {
    /// Dynamic body with the default hitbox for its size.
    pub fn new(pos: S::Vector, size: S::Vector) -> Self {
        Body {
            pos,
            size,
            is_static: false,
            hitbox: S::default_hitbox(size),
            physics: None,
        }
    }

    pub fn with_hitbox(mut self, hitbox: S::Hitbox) -> Self {
        self.hitbox = hitbox;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Physics state, if it has been created yet.
    pub fn physics(&self) -> Option<&PhysicsComponent<S>> {
        self.physics.as_ref()
    }

    /// Physics state, created with engine defaults on first access.
    pub fn physics_mut(&mut self, config: &EngineConfig) -> &mut PhysicsComponent<S> {
        self.physics.get_or_insert_with(|| PhysicsComponent::new(config))
    }
}


/// Arena of bodies, keyed by `BodyId`.
#[derive(Debug, Clone)]
pub struct Bodies<S: Space> {
    slab: Slab<Body<S>>,
}

impl<S: Space> Default for Bodies<S> {
    fn default() -> Self {
        Bodies { slab: Slab::new() }
    }
}

impl<S: Space> Bodies<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: Body<S>) -> BodyId {
        BodyId(self.slab.insert(body))
    }

    /// Remove a body and its physics state.
    pub fn remove(&mut self, id: BodyId) -> Option<Body<S>> {
        self.slab.try_remove(id.0)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body<S>> {
        self.slab.get(id.0)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body<S>> {
        self.slab.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.slab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> Vec<BodyId> {
        self.slab.iter().map(|(key, _)| BodyId(key)).collect()
    }

    /// Live bodies in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item=(BodyId, &Body<S>)> + '_ {
        self.slab.iter().map(|(key, body)| (BodyId(key), body))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item=(BodyId, &mut Body<S>)> + '_ {
        self.slab.iter_mut().map(|(key, body)| (BodyId(key), body))
    }

    /// Physics state of a body, if the body exists and its state has been
    /// created.
    pub fn physics(&self, id: BodyId) -> Option<&PhysicsComponent<S>> {
        self.get(id).and_then(Body::physics)
    }

    /// Physics state of a body, created with engine defaults on first access.
    pub fn physics_mut(
        &mut self,
        id: BodyId,
        config: &EngineConfig,
    ) -> Result<&mut PhysicsComponent<S>> {
        let body = self.get_mut(id).ok_or_else(|| anyhow!("no body with id {:?}", id))?;
        Ok(body.physics_mut(config))
    }

    /// Two distinct bodies at once.
    pub(crate) fn get2_mut(
        &mut self,
        a: BodyId,
        b: BodyId,
    ) -> Option<(&mut Body<S>, &mut Body<S>)> {
        self.slab.get2_mut(a.0, b.0)
    }
}
