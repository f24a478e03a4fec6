//! World bounds, the water exclusion zone, and boundary containment.

use glam::Vec2;
use tracing::warn;

use crate::config::{BoundaryPolicy, WorldConfig};

/// Placement attempts before a candidate is pushed out of the water.
const MAX_PLACEMENT_ATTEMPTS: usize = 16;

/// Distance kept between a pushed-out point and the water's edge.
const WATER_CLEARANCE: f32 = 0.01;

/// Immutable world shape derived from [`WorldConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    min: Vec2,
    max: Vec2,
    size: Vec2,
    water_center: Vec2,
    water_radius: f32,
    policy: BoundaryPolicy,
    reflect_jitter: f32,
}

impl Geometry {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            min: Vec2::splat(config.margin),
            max: Vec2::new(config.width - config.margin, config.height - config.margin),
            size: Vec2::new(config.width, config.height),
            water_center: Vec2::new(config.water.center_x, config.water.center_y),
            water_radius: config.water.radius,
            policy: config.boundary,
            reflect_jitter: config.reflect_jitter,
        }
    }

    /// Lower corner of the playable area.
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Upper corner of the playable area.
    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Full world size, margins included.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn water_center(&self) -> Vec2 {
        self.water_center
    }

    pub fn water_radius(&self) -> f32 {
        self.water_radius
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    pub fn in_water(&self, pos: Vec2) -> bool {
        pos.distance_squared(self.water_center) < self.water_radius * self.water_radius
    }

    /// Inside the bounds and outside the water.
    pub fn is_valid(&self, pos: Vec2) -> bool {
        self.in_bounds(pos) && !self.in_water(pos)
    }

    /// Bring a moving entity back inside the bounds using the configured
    /// policy. In-bounds input is returned unchanged.
    pub fn contain(&self, pos: Vec2, heading: Vec2, rng: &mut fastrand::Rng) -> (Vec2, Vec2) {
        match self.policy {
            BoundaryPolicy::Clamp => (pos.clamp(self.min, self.max), heading),
            BoundaryPolicy::Reflect => {
                let (pos, mut heading, reflected) = self.reflect(pos, heading);
                if reflected && self.reflect_jitter > 0.0 {
                    let angle = (rng.f32() * 2.0 - 1.0) * self.reflect_jitter;
                    heading = Vec2::from_angle(angle).rotate(heading);
                }
                (pos, heading)
            }
        }
    }

    /// Apply the boundary policy to a bare point (no heading to bend).
    pub fn confine_point(&self, pos: Vec2) -> Vec2 {
        match self.policy {
            BoundaryPolicy::Clamp => pos.clamp(self.min, self.max),
            BoundaryPolicy::Reflect => self.reflect(pos, Vec2::ZERO).0,
        }
    }

    /// Move from a valid position towards `to`. The result is always valid:
    /// bounds are handled by [`contain`](Self::contain), and a step that would
    /// end in the water is refused, bouncing the heading off the shore.
    pub fn step(&self, from: Vec2, to: Vec2, heading: Vec2, rng: &mut fastrand::Rng) -> (Vec2, Vec2) {
        let (pos, heading) = self.contain(to, heading, rng);
        if !self.in_water(pos) {
            return (pos, heading);
        }
        (from, self.bounce_off_shore(from, heading))
    }

    /// Like [`step`](Self::step), but a step into the water is redirected
    /// along the shore tangent instead of refused, so a chase towards a
    /// target on the far bank works its way around the water.
    pub fn step_around_water(
        &self,
        from: Vec2,
        to: Vec2,
        heading: Vec2,
        rng: &mut fastrand::Rng,
    ) -> (Vec2, Vec2) {
        let (pos, contained) = self.contain(to, heading, rng);
        if !self.in_water(pos) {
            return (pos, contained);
        }
        self.slide_along_shore(from, to - from, rng)
            .unwrap_or_else(|| (from, self.bounce_off_shore(from, contained)))
    }

    /// Move `from` by `offset` projected onto the shore tangent, keeping the
    /// step length. A step aimed straight at the centre turns a quarter
    /// circle. `None` if the result would still be invalid.
    pub fn slide_along_shore(
        &self,
        from: Vec2,
        offset: Vec2,
        rng: &mut fastrand::Rng,
    ) -> Option<(Vec2, Vec2)> {
        let normal = (from - self.water_center).try_normalize()?;
        let length = offset.length();
        if length <= 0.0 {
            return None;
        }
        let tangent = offset - offset.dot(normal) * normal;
        let direction = tangent.try_normalize().unwrap_or_else(|| normal.perp());
        let (pos, heading) = self.contain(from + direction * length, direction, rng);
        self.is_valid(pos).then_some((pos, heading))
    }

    fn bounce_off_shore(&self, from: Vec2, heading: Vec2) -> Vec2 {
        let normal = (from - self.water_center).normalize_or_zero();
        if heading.dot(normal) < 0.0 {
            heading - 2.0 * heading.dot(normal) * normal
        } else {
            heading
        }
    }

    /// Uniformly random valid position.
    pub fn random_position(&self, rng: &mut fastrand::Rng) -> Vec2 {
        let mut candidate = self.min;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = Vec2::new(
                self.min.x + rng.f32() * (self.max.x - self.min.x),
                self.min.y + rng.f32() * (self.max.y - self.min.y),
            );
            if !self.in_water(candidate) {
                return candidate;
            }
        }
        self.push_out_of_water(candidate)
    }

    /// Random valid position within `radius` of `origin`.
    pub fn random_position_near(&self, origin: Vec2, radius: f32, rng: &mut fastrand::Rng) -> Vec2 {
        let mut candidate = origin;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let angle = rng.f32() * std::f32::consts::TAU;
            let distance = radius * rng.f32().sqrt();
            candidate = self.confine_point(origin + Vec2::from_angle(angle) * distance);
            if !self.in_water(candidate) {
                return candidate;
            }
        }
        warn!(
            "placement near ({:.1}, {:.1}) kept landing in water, pushing to shore",
            origin.x, origin.y
        );
        self.push_out_of_water(candidate)
    }

    /// Project a point inside the water radially onto the shore. Points
    /// already outside are returned unchanged.
    pub fn push_out_of_water(&self, pos: Vec2) -> Vec2 {
        if !self.in_water(pos) {
            return pos;
        }
        let direction = (pos - self.water_center).try_normalize().unwrap_or(Vec2::X);
        self.water_center + direction * (self.water_radius + WATER_CLEARANCE)
    }

    fn reflect(&self, pos: Vec2, heading: Vec2) -> (Vec2, Vec2, bool) {
        let mut pos = pos;
        let mut heading = heading;
        let mut reflected = false;

        if pos.x < self.min.x {
            pos.x = 2.0 * self.min.x - pos.x;
            heading.x = -heading.x;
            reflected = true;
        } else if pos.x > self.max.x {
            pos.x = 2.0 * self.max.x - pos.x;
            heading.x = -heading.x;
            reflected = true;
        }
        if pos.y < self.min.y {
            pos.y = 2.0 * self.min.y - pos.y;
            heading.y = -heading.y;
            reflected = true;
        } else if pos.y > self.max.y {
            pos.y = 2.0 * self.max.y - pos.y;
            heading.y = -heading.y;
            reflected = true;
        }

        // A step longer than the playable width can overshoot the mirror.
        (pos.clamp(self.min, self.max), heading, reflected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn geometry(policy: BoundaryPolicy) -> Geometry {
        let mut config = SimConfig::default().world;
        config.boundary = policy;
        Geometry::new(&config)
    }

    #[test]
    fn containment_is_idempotent_in_bounds() {
        let mut rng = fastrand::Rng::with_seed(1);
        for policy in [BoundaryPolicy::Clamp, BoundaryPolicy::Reflect] {
            let geo = geometry(policy);
            let pos = Vec2::new(100.0, 100.0);
            let heading = Vec2::new(0.6, 0.8);
            assert_eq!(geo.contain(pos, heading, &mut rng), (pos, heading));
            assert_eq!(geo.confine_point(pos), pos);
        }
    }

    #[test]
    fn clamp_stops_at_the_margin() {
        let mut rng = fastrand::Rng::with_seed(2);
        let geo = geometry(BoundaryPolicy::Clamp);
        let (pos, heading) = geo.contain(Vec2::new(-20.0, 700.0), Vec2::X, &mut rng);
        assert_eq!(pos, Vec2::new(5.0, 595.0));
        assert_eq!(heading, Vec2::X);
    }

    #[test]
    fn reflect_mirrors_position_and_heading() {
        let mut config = SimConfig::default().world;
        config.boundary = BoundaryPolicy::Reflect;
        config.reflect_jitter = 0.0;
        let geo = Geometry::new(&config);
        let mut rng = fastrand::Rng::with_seed(3);

        let (pos, heading) = geo.contain(Vec2::new(3.0, 50.0), Vec2::new(-1.0, 0.0), &mut rng);
        assert_eq!(pos, Vec2::new(7.0, 50.0));
        assert_eq!(heading, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn reflect_jitter_keeps_the_heading_unit_length() {
        let geo = geometry(BoundaryPolicy::Reflect);
        let mut rng = fastrand::Rng::with_seed(4);
        let (pos, heading) = geo.contain(Vec2::new(799.0, 300.0), Vec2::X, &mut rng);
        assert!(geo.in_bounds(pos));
        assert!((heading.length() - 1.0).abs() < 1e-5);
        assert!(heading.x < 0.0);
    }

    #[test]
    fn huge_overshoot_is_still_contained() {
        let geo = geometry(BoundaryPolicy::Reflect);
        let mut rng = fastrand::Rng::with_seed(5);
        let (pos, _) = geo.contain(Vec2::new(-5000.0, 9000.0), Vec2::X, &mut rng);
        assert!(geo.in_bounds(pos));
    }

    #[test]
    fn steps_into_water_are_refused() {
        let geo = geometry(BoundaryPolicy::Clamp);
        let mut rng = fastrand::Rng::with_seed(6);
        let from = Vec2::new(300.0, 300.0);
        let (pos, heading) = geo.step(from, Vec2::new(330.0, 300.0), Vec2::X, &mut rng);
        assert_eq!(pos, from);
        assert_eq!(heading, -Vec2::X);
    }

    #[test]
    fn chase_steps_slide_around_the_water() {
        let geo = geometry(BoundaryPolicy::Clamp);
        let mut rng = fastrand::Rng::with_seed(8);
        let center = geo.water_center();
        let from = center + Vec2::from_angle(2.6) * 80.5;
        let target = center + Vec2::from_angle(1.55) * 80.5;
        let to = from + (target - from).normalize() * 1.6;
        assert!(geo.in_water(to));

        let (pos, heading) = geo.step_around_water(from, to, (to - from).normalize(), &mut rng);
        assert!(geo.is_valid(pos));
        assert!((pos.distance(from) - 1.6).abs() < 1e-3);
        assert!(pos.distance(target) < from.distance(target));
        assert!((heading.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn head_on_step_turns_along_the_shore() {
        let geo = geometry(BoundaryPolicy::Clamp);
        let mut rng = fastrand::Rng::with_seed(9);
        let from = Vec2::new(319.5, 300.0);
        let (pos, _) = geo.step_around_water(from, from + Vec2::X * 2.0, Vec2::X, &mut rng);
        assert!(geo.is_valid(pos));
        assert_ne!(pos, from);
    }

    #[test]
    fn random_positions_are_valid() {
        let geo = geometry(BoundaryPolicy::Reflect);
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            assert!(geo.is_valid(geo.random_position(&mut rng)));
            let near = geo.random_position_near(Vec2::new(330.0, 300.0), 40.0, &mut rng);
            assert!(geo.is_valid(near));
        }
    }

    #[test]
    fn push_out_lands_on_the_shore() {
        let geo = geometry(BoundaryPolicy::Clamp);
        let center = geo.water_center();
        for pos in [center, center + Vec2::new(10.0, -3.0)] {
            let pushed = geo.push_out_of_water(pos);
            assert!(geo.is_valid(pushed));
        }
    }
}
