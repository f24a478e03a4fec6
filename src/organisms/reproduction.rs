use glam::Vec2;
use tracing::trace;

use crate::organisms::behavior::random_heading;
use crate::organisms::components::{Energy, Entity, Species};
use crate::organisms::tuning::SpeciesConfig;
use crate::world::geometry::Geometry;

/// A birth waiting for admission at the end of the tick.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Newborn {
    pub species: Species,
    pub position: Vec2,
    pub heading: Vec2,
    pub energy: Energy,
    pub reproduction_cooldown: u32,
}

/// Energy, cooldown and the per-tick roll all allow a birth this tick.
/// Population gates are checked separately by the caller.
pub(crate) fn is_ready(parent: &Entity, params: &SpeciesConfig, rng: &mut fastrand::Rng) -> bool {
    let repro = &params.reproduction;
    parent.energy.current() >= repro.threshold
        && parent.reproduction_cooldown == 0
        && rng.f32() < repro.probability
}

/// Debit the parent and produce its offspring near it.
pub(crate) fn give_birth(
    parent: &mut Entity,
    params: &SpeciesConfig,
    geometry: &Geometry,
    rng: &mut fastrand::Rng,
) -> Newborn {
    let repro = &params.reproduction;
    parent.energy.drain(repro.cost);
    parent.reproduction_cooldown = repro.cooldown_ticks;

    let position = geometry.random_position_near(parent.position, repro.spawn_radius, rng);
    let heading = if parent.species.is_motile() {
        random_heading(rng)
    } else {
        Vec2::ZERO
    };

    trace!(
        parent = %parent.id,
        species = %parent.species,
        "birth at ({:.1}, {:.1})",
        position.x,
        position.y
    );

    Newborn {
        species: parent.species,
        position,
        heading,
        energy: Energy::with_energy(params.energy.max, repro.offspring_energy()),
        reproduction_cooldown: repro.cooldown_ticks,
    }
}
