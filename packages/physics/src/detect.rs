//! Narrow-phase collision test.

use crate::{
    body::{
        Body,
        BodyId,
    },
    config::EngineConfig,
    space::Space,
};
use hitbox::Hitbox;


/// Unordered pair of bodies, stored lowest id first so that A-B and B-A are
/// the same pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    low: BodyId,
    high: BodyId,
}

impl CollisionPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            CollisionPair { low: a, high: b }
        } else {
            CollisionPair { low: b, high: a }
        }
    }

    pub fn low(&self) -> BodyId {
        self.low
    }

    pub fn high(&self) -> BodyId {
        self.high
    }
}


/// World-space extents of a body.
pub(crate) fn world_extents<S: Space>(body: &Body<S>) -> (S::Vector, S::Vector) {
    let (min, max) = body.hitbox.extents();
    (body.pos + min, body.pos + max)
}

/// Whether two bodies' hitboxes overlap.
///
/// Rejects on the world-space extents first, then samples a grid of
/// `collision_precision + 1` points per axis across the intersection of the
/// extents and reports a hit on the first point contained by both hitboxes.
/// Empty hitboxes never overlap anything.
pub fn overlaps<S: Space>(config: &EngineConfig, a: &Body<S>, b: &Body<S>) -> bool {
    let (a_min, a_max) = world_extents(a);
    let (b_min, b_max) = world_extents(b);

    let mut lo = S::Vector::default();
    let mut hi = S::Vector::default();
    for i in 0..S::DIMS {
        // written so that NaN extents fail
        if !(a_min[i] <= b_max[i] && b_min[i] <= a_max[i]) {
            return false;
        }
        lo[i] = a_min[i].max(b_min[i]);
        hi[i] = a_max[i].min(b_max[i]);
    }

    let n = config.collision_precision() as usize;
    let per_axis = n + 1;
    let total = (0..S::DIMS).fold(1usize, |acc, _| acc.saturating_mul(per_axis));
    for index in 0..total {
        let mut rest = index;
        let mut point = S::Vector::default();
        for i in 0..S::DIMS {
            let k = rest % per_axis;
            rest /= per_axis;
            let t = k as f32 / n as f32;
            point[i] = if hi[i].is_finite() && lo[i].is_finite() {
                lo[i] + (hi[i] - lo[i]) * t
            } else {
                sample_unbounded(lo[i], hi[i], t)
            };
        }
        if a.hitbox.contains(point - a.pos) && b.hitbox.contains(point - b.pos) {
            return true;
        }
    }
    false
}

/// Sample coordinate along an axis where the intersection is unbounded on at
/// least one side. Only possible when both hitboxes are infinite there, so
/// any finite coordinate is as good as another.
fn sample_unbounded(lo: f32, hi: f32, t: f32) -> f32 {
    match (lo.is_finite(), hi.is_finite()) {
        (true, false) => lo + t,
        (false, true) => hi - t,
        _ => t,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        space2::Space2,
        space3::Space3,
    };
    use hitbox::{
        Hitbox2,
        Hitbox3,
    };
    use vek::*;

    fn rect(x: f32, y: f32, size: f32) -> Body<Space2> {
        Body::new(Vec2::new(x, y), Vec2::broadcast(size))
    }

    #[test]
    fn pair_is_canonical() {
        let p = CollisionPair::new(BodyId(7), BodyId(2));
        assert_eq!(p, CollisionPair::new(BodyId(2), BodyId(7)));
        assert_eq!(p.low(), BodyId(2));
        assert_eq!(p.high(), BodyId(7));
    }

    #[test]
    fn overlapping_rects() {
        let config = EngineConfig::default();
        assert!(overlaps(&config, &rect(0.0, 0.0, 10.0), &rect(5.0, 5.0, 10.0)));
        assert!(!overlaps(&config, &rect(0.0, 0.0, 10.0), &rect(20.0, 0.0, 10.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let config = EngineConfig::default();
        assert!(!overlaps(&config, &rect(0.0, 0.0, 10.0), &rect(10.0, 0.0, 10.0)));
    }

    #[test]
    fn aabb_hit_but_shapes_miss() {
        let config = EngineConfig::default();
        // circles whose boxes overlap only at the corners
        let a = Body::<Space2>::new(Vec2::zero(), Vec2::broadcast(10.0))
            .with_hitbox(Hitbox2::circle([5.0, 5.0], 5.0));
        let b = Body::<Space2>::new(Vec2::new(9.0, 9.0), Vec2::broadcast(10.0))
            .with_hitbox(Hitbox2::circle([5.0, 5.0], 5.0));
        assert!(!overlaps(&config, &a, &b));
    }

    #[test]
    fn empty_never_overlaps() {
        let config = EngineConfig::default();
        let a = rect(0.0, 0.0, 10.0).with_hitbox(Hitbox2::empty());
        assert!(!overlaps(&config, &a, &rect(0.0, 0.0, 10.0)));
        let full = rect(0.0, 0.0, 10.0).with_hitbox(Hitbox2::full());
        assert!(!overlaps(&config, &a, &full));
    }

    #[test]
    fn full_overlaps_finite() {
        let config = EngineConfig::default();
        let full = rect(0.0, 0.0, 10.0).with_hitbox(Hitbox2::full());
        assert!(overlaps(&config, &full, &rect(1000.0, -500.0, 10.0)));
    }

    #[test]
    fn spheres_in_3d() {
        let config = EngineConfig::default();
        let a = Body::<Space3>::new(Vec3::zero(), Vec3::broadcast(2.0))
            .with_hitbox(Hitbox3::sphere(Vec3::zero(), 1.0));
        let b = Body::<Space3>::new(Vec3::new(1.5, 0.0, 0.0), Vec3::broadcast(2.0))
            .with_hitbox(Hitbox3::sphere(Vec3::zero(), 1.0));
        let c = Body::<Space3>::new(Vec3::new(1.6, 1.6, 0.0), Vec3::broadcast(2.0))
            .with_hitbox(Hitbox3::sphere(Vec3::zero(), 1.0));
        assert!(overlaps(&config, &a, &b));
        assert!(!overlaps(&config, &a, &c));
    }
}
