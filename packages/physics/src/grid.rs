//! Broad-phase spatial hash grid.

use crate::{
    body::{
        Bodies,
        BodyId,
    },
    space::Space,
};
use hitbox::Hitbox;
use std::collections::{
    HashMap,
    BTreeSet,
};
use vek::*;


/// Bodies that would span more cells than this are kept in a separate list
/// and treated as candidates for everything.
pub const MAX_CELLS_PER_BODY: u64 = 4096;


/// Uniform grid bucketing bodies by the cells their world-space extents
/// touch. Rebuilt from scratch each tick.
///
/// 2D cells use a zero Z coordinate.
#[derive(Debug, Default)]
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<Vec3<i64>, Vec<BodyId>>,
    body_cells: HashMap<BodyId, Vec<Vec3<i64>>>,
    unbounded: BTreeSet<BodyId>,
    all: BTreeSet<BodyId>,
}

/// Inclusive range of cell coordinates along each axis and the number of
/// cells in it, or `None` if the extents cannot be bucketed: non-finite, or
/// spanning more than `MAX_CELLS_PER_BODY` cells.
///
/// The span is measured in floating point, since cell coordinates of huge
/// but finite extents saturate when cast to integers.
fn cell_range<S: Space>(
    cell_size: f32,
    min: S::Vector,
    max: S::Vector,
) -> Option<(Vec3<i64>, Vec3<i64>, u64)> {
    let mut lo = Vec3::zero();
    let mut hi = Vec3::zero();
    let mut count = 1.0f64;
    for i in 0..S::DIMS {
        let lo_cell = (min[i] / cell_size).floor();
        let hi_cell = (max[i] / cell_size).floor();
        if !lo_cell.is_finite() || !hi_cell.is_finite() {
            return None;
        }
        count *= hi_cell as f64 - lo_cell as f64 + 1.0;
        if count > MAX_CELLS_PER_BODY as f64 {
            return None;
        }
        lo[i] = lo_cell as i64;
        hi[i] = hi_cell as i64;
    }
    Some((lo, hi, count as u64))
}

impl SpatialHashGrid {
    pub fn new(cell_size: f32) -> Self {
        SpatialHashGrid {
            cell_size,
            ..Default::default()
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Discard the contents and re-bucket every body at its current
    /// position.
    ///
    /// Bodies with empty or inverted extents are left out, so they have no
    /// candidates and are no one's candidate.
    pub fn rebuild<S: Space>(&mut self, bodies: &Bodies<S>) {
        self.cells.clear();
        self.body_cells.clear();
        self.unbounded.clear();
        self.all.clear();

        for (id, body) in bodies.iter() {
            let (min, max) = body.hitbox.extents();
            let min = body.pos + min;
            let max = body.pos + max;

            if (0..S::DIMS).any(|i| !(min[i] <= max[i])) {
                trace!(?id, "body has empty extents, not bucketed");
                continue;
            }
            self.all.insert(id);

            let (lo, hi, count) = match cell_range::<S>(self.cell_size, min, max) {
                Some(range) => range,
                None => {
                    debug!(?id, "body extents too large to bucket, treated as unbounded");
                    self.unbounded.insert(id);
                    continue;
                }
            };

            let mut touched = Vec::with_capacity(count as usize);
            for z in lo.z..=hi.z {
                for y in lo.y..=hi.y {
                    for x in lo.x..=hi.x {
                        let cell = Vec3::new(x, y, z);
                        self.cells.entry(cell).or_default().push(id);
                        touched.push(cell);
                    }
                }
            }
            self.body_cells.insert(id, touched);
        }
    }

    /// Bodies sharing at least one cell with `id`, excluding `id` itself, in
    /// ascending id order. Unbounded bodies are candidates of every bucketed
    /// body and see every bucketed body as a candidate.
    pub fn candidates_for(&self, id: BodyId) -> BTreeSet<BodyId> {
        let mut found = BTreeSet::new();
        if self.unbounded.contains(&id) {
            found.extend(self.all.iter().copied());
        } else if let Some(cells) = self.body_cells.get(&id) {
            for cell in cells {
                if let Some(ids) = self.cells.get(cell) {
                    found.extend(ids.iter().copied());
                }
            }
            found.extend(self.unbounded.iter().copied());
        }
        found.remove(&id);
        found
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        body::Body,
        space2::Space2,
        space3::Space3,
    };
    use hitbox::{
        Hitbox2,
        Hitbox3,
    };

    fn ids(v: &[usize]) -> BTreeSet<BodyId> {
        v.iter().map(|&i| BodyId(i)).collect()
    }

    #[test]
    fn neighbours_share_cells() {
        let mut bodies = Bodies::<Space2>::new();
        let a = bodies.insert(Body::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)));
        let b = bodies.insert(Body::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0)));
        let c = bodies.insert(Body::new(Vec2::new(500.0, 500.0), Vec2::new(10.0, 10.0)));
        let mut grid = SpatialHashGrid::new(64.0);
        grid.rebuild(&bodies);
        assert_eq!(grid.candidates_for(a), ids(&[b.0]));
        assert_eq!(grid.candidates_for(b), ids(&[a.0]));
        assert!(grid.candidates_for(c).is_empty());
    }

    #[test]
    fn body_on_cell_border_lands_in_both() {
        let mut bodies = Bodies::<Space2>::new();
        let a = bodies.insert(Body::new(Vec2::new(60.0, 0.0), Vec2::new(10.0, 10.0)));
        let b = bodies.insert(Body::new(Vec2::new(66.0, 0.0), Vec2::new(10.0, 10.0)));
        let mut grid = SpatialHashGrid::new(64.0);
        grid.rebuild(&bodies);
        assert_eq!(grid.candidates_for(a), ids(&[b.0]));
        assert_eq!(grid.occupied_cells(), 2);
    }

    #[test]
    fn negative_coordinates_floor() {
        let mut bodies = Bodies::<Space3>::new();
        let a = bodies.insert(Body::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::one()));
        let b = bodies.insert(Body::new(Vec3::new(1.0, 1.0, 1.0), Vec3::one()));
        let mut grid = SpatialHashGrid::new(64.0);
        grid.rebuild(&bodies);
        assert!(grid.candidates_for(a).is_empty());
        assert!(grid.candidates_for(b).is_empty());
    }

    #[test]
    fn full_hitbox_sees_everyone() {
        let mut bodies = Bodies::<Space3>::new();
        let a = bodies.insert(Body::new(Vec3::zero(), Vec3::one()).with_hitbox(Hitbox3::full()));
        let b = bodies.insert(Body::new(Vec3::new(1e6, 0.0, 0.0), Vec3::one()));
        let c = bodies.insert(Body::new(Vec3::new(-1e6, 0.0, 0.0), Vec3::one()));
        let mut grid = SpatialHashGrid::new(64.0);
        grid.rebuild(&bodies);
        assert_eq!(grid.candidates_for(a), ids(&[b.0, c.0]));
        assert_eq!(grid.candidates_for(b), ids(&[a.0]));
    }

    #[test]
    fn huge_finite_extents_are_unbounded() {
        let mut bodies = Bodies::<Space2>::new();
        let floor = bodies.insert(
            Body::new(Vec2::zero(), Vec2::one())
                .with_hitbox(Hitbox2::from_min_max([-f32::MAX, 0.0], [f32::MAX, 10.0]))
        );
        let wide = bodies.insert(
            Body::new(Vec2::zero(), Vec2::one())
                .with_hitbox(Hitbox2::from_min_max([0.0, 0.0], [64.0 * 5000.0, 1.0]))
        );
        let a = bodies.insert(Body::new(Vec2::new(1e5, 3.0), Vec2::one()));
        let mut grid = SpatialHashGrid::new(64.0);
        grid.rebuild(&bodies);
        assert_eq!(grid.candidates_for(a), ids(&[floor.0, wide.0]));
        assert_eq!(grid.candidates_for(floor), ids(&[wide.0, a.0]));
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn empty_hitbox_is_skipped() {
        let mut bodies = Bodies::<Space2>::new();
        let a = bodies.insert(Body::new(Vec2::zero(), Vec2::one()).with_hitbox(Hitbox2::empty()));
        let b = bodies.insert(Body::new(Vec2::zero(), Vec2::one()));
        let mut grid = SpatialHashGrid::new(64.0);
        grid.rebuild(&bodies);
        assert!(grid.candidates_for(a).is_empty());
        assert!(grid.candidates_for(b).is_empty());
    }
}
