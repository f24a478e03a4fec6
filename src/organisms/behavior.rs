use glam::Vec2;

use crate::organisms::components::{Energy, Entity};
use crate::organisms::tuning::{ConsumptionPolicy, ForagingConfig};
use crate::world::geometry::Geometry;

/// Random unit heading.
pub(crate) fn random_heading(rng: &mut fastrand::Rng) -> Vec2 {
    Vec2::from_angle(rng.f32() * std::f32::consts::TAU)
}

/// Move a forager for one tick. With a target it heads straight for it,
/// never stepping past it and sliding along the shore when the water is in
/// the way, and stays put once within eating range. Without
/// one it wanders. Returns whether the target is within eating range after
/// the move.
pub(crate) fn forage(
    me: &mut Entity,
    foraging: &ForagingConfig,
    target: Option<Vec2>,
    geometry: &Geometry,
    rng: &mut fastrand::Rng,
) -> bool {
    let Some(target) = target else {
        wander(me, foraging, geometry, rng);
        return false;
    };

    let offset = target - me.position;
    let distance = offset.length();
    if distance > foraging.eating_radius {
        let heading = offset / distance;
        let step = foraging.speed.min(distance);
        let (position, heading) =
            geometry.step_around_water(me.position, me.position + heading * step, heading, rng);
        me.position = position;
        me.heading = heading;
    }
    me.position.distance(target) <= foraging.eating_radius
}

/// Drift along the current heading, re-rolling it every
/// `wander_interval_ticks`.
fn wander(me: &mut Entity, foraging: &ForagingConfig, geometry: &Geometry, rng: &mut fastrand::Rng) {
    if me.wander_ticks == 0 || me.heading == Vec2::ZERO {
        me.heading = random_heading(rng);
        me.wander_ticks = foraging.wander_interval_ticks;
    }
    me.wander_ticks = me.wander_ticks.saturating_sub(1);

    let (position, heading) = geometry.step(
        me.position,
        me.position + me.heading * foraging.speed,
        me.heading,
        rng,
    );
    me.position = position;
    me.heading = heading;
}

/// Transfer energy from `food` to `eater` under the forager's policy.
/// Returns the energy credited before the eater's max clamp.
pub(crate) fn consume(eater: &mut Energy, food: &mut Energy, foraging: &ForagingConfig) -> f32 {
    let gained = match foraging.consumption {
        ConsumptionPolicy::Partial => food.take(foraging.eating_gain),
        ConsumptionPolicy::Full => {
            food.deplete();
            foraging.eating_gain
        }
    };
    eater.gain(gained);
    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::organisms::{EntityId, Species};
    use crate::organisms::tuning::SpeciesConfig;

    fn grazer_at(position: Vec2) -> Entity {
        Entity {
            id: EntityId(0),
            species: Species::Grazer,
            position,
            heading: Vec2::X,
            energy: Energy::with_energy(100.0, 50.0),
            age: 0,
            reproduction_cooldown: 0,
            wander_ticks: 10,
        }
    }

    fn foraging() -> ForagingConfig {
        SpeciesConfig::grazer().foraging.unwrap()
    }

    fn geometry() -> Geometry {
        Geometry::new(&SimConfig::default().world)
    }

    #[test]
    fn chasing_moves_by_speed_towards_the_target() {
        let mut rng = fastrand::Rng::with_seed(1);
        let foraging = foraging();
        let mut me = grazer_at(Vec2::new(100.0, 100.0));
        let target = Vec2::new(100.0, 150.0);

        let in_range = forage(&mut me, &foraging, Some(target), &geometry(), &mut rng);
        assert!(!in_range);
        assert!((me.position.y - (100.0 + foraging.speed)).abs() < 1e-4);
        assert!((me.heading - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn chasing_never_overshoots() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut foraging = foraging();
        foraging.speed = 50.0;
        foraging.eating_radius = 0.5;
        let mut me = grazer_at(Vec2::new(100.0, 100.0));
        let target = Vec2::new(103.0, 100.0);

        assert!(forage(&mut me, &foraging, Some(target), &geometry(), &mut rng));
        assert!(me.position.distance(target) < 1e-4);
    }

    #[test]
    fn in_range_forager_stays_put() {
        let mut rng = fastrand::Rng::with_seed(3);
        let foraging = foraging();
        let start = Vec2::new(100.0, 100.0);
        let mut me = grazer_at(start);
        assert!(forage(&mut me, &foraging, Some(start + Vec2::new(2.0, 0.0)), &geometry(), &mut rng));
        assert_eq!(me.position, start);
    }

    #[test]
    fn wandering_rerolls_heading_on_schedule() {
        let mut rng = fastrand::Rng::with_seed(4);
        let foraging = foraging();
        let mut me = grazer_at(Vec2::new(150.0, 100.0));
        me.wander_ticks = 0;

        forage(&mut me, &foraging, None, &geometry(), &mut rng);
        assert_eq!(me.wander_ticks, foraging.wander_interval_ticks - 1);
        assert!((me.heading.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn partial_grazing_is_bounded_by_what_is_left() {
        let foraging = foraging();
        let mut eater = Energy::with_energy(100.0, 10.0);
        let mut food = Energy::with_energy(50.0, 0.5);
        let gained = consume(&mut eater, &mut food, &foraging);
        assert_eq!(gained, 0.5);
        assert_eq!(eater.current(), 10.5);
        assert!(food.is_dead());
    }

    #[test]
    fn full_consumption_removes_the_prey() {
        let foraging = SpeciesConfig::predator().foraging.unwrap();
        let mut eater = Energy::with_energy(150.0, 20.0);
        let mut prey = Energy::with_energy(100.0, 80.0);
        consume(&mut eater, &mut prey, &foraging);
        assert!(prey.is_dead());
        assert_eq!(eater.current(), 20.0 + foraging.eating_gain);
    }
}
