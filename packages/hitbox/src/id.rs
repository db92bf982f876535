//! Hitbox identity.

use std::sync::atomic::{
    AtomicU64,
    Ordering,
};


static NEXT_HITBOX_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identity of a constructed hitbox, distinct from its owning body.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct HitboxId(pub u64);

impl HitboxId {
    /// Allocate an identity never handed out before in this process.
    pub(crate) fn fresh() -> Self {
        HitboxId(NEXT_HITBOX_ID.fetch_add(1, Ordering::Relaxed))
    }
}


#[test]
fn fresh_ids_are_distinct() {
    let a = HitboxId::fresh();
    let b = HitboxId::fresh();
    assert_ne!(a, b);
}
