//! Nearest-target and neighbour-count queries.
//!
//! [`find_nearest`] is the reference linear scan. [`SpatialGrid`] buckets
//! candidate positions into square cells and must return exactly what the
//! scan returns, including the tie-break: at equal distance the candidate
//! that comes first in input order wins.

use glam::Vec2;
use smallvec::SmallVec;

use crate::organisms::Entity;

/// Closest candidate strictly within `max_radius` of `seeker`.
///
/// Ties go to the earliest candidate, so the result depends only on the
/// candidate order and positions.
pub fn find_nearest<'a, I>(seeker: Vec2, candidates: I, max_radius: f32) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let limit = max_radius * max_radius;
    let mut best: Option<(&'a Entity, f32)> = None;
    for candidate in candidates {
        let d2 = seeker.distance_squared(candidate.position());
        if d2 >= limit {
            continue;
        }
        match best {
            Some((_, best_d2)) if d2 >= best_d2 => {}
            _ => best = Some((candidate, d2)),
        }
    }
    best.map(|(entity, _)| entity)
}

/// Uniform bucket grid over a fixed set of points.
///
/// Points are addressed by their ordinal in the slice the grid was built
/// from; callers keep that slice around and pass an `accept` filter to skip
/// ordinals that stopped being eligible (eaten, starved) mid-tick.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<SmallVec<[u32; 8]>>,
}

impl SpatialGrid {
    pub fn build(points: &[Vec2], extent: Vec2, cell_size: f32) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = ((extent.x / cell_size).ceil() as usize).max(1);
        let rows = ((extent.y / cell_size).ceil() as usize).max(1);
        let mut grid = Self {
            cell_size,
            cols,
            rows,
            buckets: vec![SmallVec::new(); cols * rows],
        };
        for (ordinal, point) in points.iter().enumerate() {
            let (cx, cy) = grid.cell_of(*point);
            grid.buckets[cy * cols + cx].push(ordinal as u32);
        }
        grid
    }

    /// Ordinal of the accepted point nearest to `seeker`, strictly within
    /// `max_radius`. Matches [`find_nearest`] over the same points in order.
    pub fn nearest(
        &self,
        points: &[Vec2],
        seeker: Vec2,
        max_radius: f32,
        mut accept: impl FnMut(usize) -> bool,
    ) -> Option<usize> {
        let limit = max_radius * max_radius;
        let mut best: Option<(usize, f32)> = None;
        self.visit(seeker, max_radius, |ordinal| {
            let d2 = seeker.distance_squared(points[ordinal]);
            if d2 >= limit || !accept(ordinal) {
                return;
            }
            let better = match best {
                None => true,
                Some((best_ordinal, best_d2)) => {
                    d2 < best_d2 || (d2 == best_d2 && ordinal < best_ordinal)
                }
            };
            if better {
                best = Some((ordinal, d2));
            }
        });
        best.map(|(ordinal, _)| ordinal)
    }

    /// Accepted points strictly within `radius` of `center`.
    pub fn count_within(
        &self,
        points: &[Vec2],
        center: Vec2,
        radius: f32,
        mut accept: impl FnMut(usize) -> bool,
    ) -> usize {
        let limit = radius * radius;
        let mut count = 0;
        self.visit(center, radius, |ordinal| {
            if center.distance_squared(points[ordinal]) < limit && accept(ordinal) {
                count += 1;
            }
        });
        count
    }

    fn visit(&self, center: Vec2, radius: f32, mut f: impl FnMut(usize)) {
        let (min_cx, min_cy) = self.cell_of(center - Vec2::splat(radius));
        let (max_cx, max_cy) = self.cell_of(center + Vec2::splat(radius));
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                for &ordinal in &self.buckets[cy * self.cols + cx] {
                    f(ordinal as usize);
                }
            }
        }
    }

    fn cell_of(&self, point: Vec2) -> (usize, usize) {
        let cx = (point.x / self.cell_size).floor().max(0.0) as usize;
        let cy = (point.y / self.cell_size).floor().max(0.0) as usize;
        (cx.min(self.cols - 1), cy.min(self.rows - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organisms::{Energy, EntityId, Species};

    fn entity(id: u64, x: f32, y: f32) -> Entity {
        Entity {
            id: EntityId(id),
            species: Species::Producer,
            position: Vec2::new(x, y),
            heading: Vec2::ZERO,
            energy: Energy::new(10.0),
            age: 0,
            reproduction_cooldown: 0,
            wander_ticks: 0,
        }
    }

    #[test]
    fn nearest_respects_the_strict_radius() {
        let candidates = [entity(1, 10.0, 0.0), entity(2, 20.0, 0.0)];
        assert!(find_nearest(Vec2::ZERO, &candidates, 10.0).is_none());
        let hit = find_nearest(Vec2::ZERO, &candidates, 10.5).unwrap();
        assert_eq!(hit.id(), EntityId(1));
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let candidates = [entity(7, 0.0, 5.0), entity(3, 5.0, 0.0), entity(9, -5.0, 0.0)];
        for _ in 0..10 {
            let hit = find_nearest(Vec2::ZERO, &candidates, 50.0).unwrap();
            assert_eq!(hit.id(), EntityId(7));
        }
    }

    #[test]
    fn grid_agrees_with_linear_scan() {
        let mut rng = fastrand::Rng::with_seed(42);
        let entities: Vec<Entity> = (0..300)
            .map(|i| entity(i, rng.f32() * 400.0, rng.f32() * 300.0))
            .collect();
        let points: Vec<Vec2> = entities.iter().map(|e| e.position()).collect();
        let grid = SpatialGrid::build(&points, Vec2::new(400.0, 300.0), 25.0);

        for _ in 0..500 {
            let seeker = Vec2::new(rng.f32() * 400.0, rng.f32() * 300.0);
            let radius = rng.f32() * 120.0;
            let expected = find_nearest(seeker, &entities, radius).map(|e| e.id());
            let got = grid
                .nearest(&points, seeker, radius, |_| true)
                .map(|ordinal| entities[ordinal].id());
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn grid_tie_break_matches_input_order() {
        let points = [Vec2::new(50.0, 55.0), Vec2::new(55.0, 50.0), Vec2::new(45.0, 50.0)];
        let grid = SpatialGrid::build(&points, Vec2::new(100.0, 100.0), 4.0);
        assert_eq!(grid.nearest(&points, Vec2::new(50.0, 50.0), 20.0, |_| true), Some(0));
        assert_eq!(grid.nearest(&points, Vec2::new(50.0, 50.0), 20.0, |o| o != 0), Some(1));
    }

    #[test]
    fn count_within_excludes_rejected_points() {
        let points = [
            Vec2::new(10.0, 10.0),
            Vec2::new(12.0, 10.0),
            Vec2::new(10.0, 13.0),
            Vec2::new(40.0, 40.0),
        ];
        let grid = SpatialGrid::build(&points, Vec2::new(50.0, 50.0), 8.0);
        assert_eq!(grid.count_within(&points, points[0], 5.0, |_| true), 3);
        assert_eq!(grid.count_within(&points, points[0], 5.0, |o| o != 0), 2);
    }
}
