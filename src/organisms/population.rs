//! Seeding, newborn admission under global caps, and extinction recovery.
//!
//! Extinction recovery is not ecologically realistic: a species that hits
//! zero is reseeded with a small batch at the end of the same tick, so none
//! of the three can vanish for good.

use glam::Vec2;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::organisms::behavior::random_heading;
use crate::organisms::components::{Energy, Entity, Species};
use crate::organisms::reproduction::Newborn;
use crate::world::geometry::Geometry;
use crate::world::store::{EntityStore, Spawn};

/// Create one fresh entity. Position defaults to a random valid spot,
/// energy to the species' initial fraction of max.
pub(crate) fn spawn_fresh(
    store: &mut EntityStore,
    species: Species,
    config: &SimConfig,
    geometry: &Geometry,
    rng: &mut fastrand::Rng,
    position: Option<Vec2>,
    energy: Option<f32>,
) -> Entity {
    let params = config.species(species);
    let position = position.unwrap_or_else(|| geometry.random_position(rng));
    let energy = energy.unwrap_or_else(|| params.initial_energy());
    let (heading, wander_ticks) = match &params.foraging {
        Some(foraging) => (random_heading(rng), rng.u32(1..=foraging.wander_interval_ticks)),
        None => (Vec2::ZERO, 0),
    };

    store.insert(Spawn {
        species,
        position,
        heading,
        energy: Energy::with_energy(params.energy.max, energy),
        wander_ticks,
        reproduction_cooldown: 0,
    })
}

/// Place every species' seed population. Returns the number placed.
pub(crate) fn seed_population(
    store: &mut EntityStore,
    config: &SimConfig,
    geometry: &Geometry,
    rng: &mut fastrand::Rng,
) -> usize {
    let mut placed = 0;
    for species in Species::ALL {
        for _ in 0..config.species(species).population.seed_count {
            spawn_fresh(store, species, config, geometry, rng, None, None);
            placed += 1;
        }
    }
    placed
}

/// Admit newborns in birth order while their species is under its global
/// cap; the rest are discarded. Returns `(admitted, discarded)`.
pub(crate) fn admit_newborns(
    store: &mut EntityStore,
    newborns: Vec<Newborn>,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
) -> (usize, usize) {
    let mut counts = store.population_counts();
    let mut admitted = 0;
    let mut discarded = 0;

    for newborn in newborns {
        let params = config.species(newborn.species);
        if counts.get(newborn.species) >= params.population.global_cap {
            discarded += 1;
            continue;
        }
        let wander_ticks = params
            .foraging
            .as_ref()
            .map_or(0, |foraging| rng.u32(1..=foraging.wander_interval_ticks));
        store.insert(Spawn {
            species: newborn.species,
            position: newborn.position,
            heading: newborn.heading,
            energy: newborn.energy,
            wander_ticks,
            reproduction_cooldown: newborn.reproduction_cooldown,
        });
        counts.increment(newborn.species);
        admitted += 1;
    }

    if discarded > 0 {
        debug!("discarded {discarded} newborns at population cap");
    }
    (admitted, discarded)
}

/// Reseed any species with no live members. Returns the number injected.
pub(crate) fn recover_extinct(
    store: &mut EntityStore,
    config: &SimConfig,
    geometry: &Geometry,
    rng: &mut fastrand::Rng,
    tick: u64,
) -> usize {
    let counts = store.population_counts();
    let mut recovered = 0;
    for species in Species::ALL {
        if counts.get(species) > 0 {
            continue;
        }
        let batch = config.species(species).population.recovery_batch;
        for _ in 0..batch {
            spawn_fresh(store, species, config, geometry, rng, None, None);
        }
        info!("[ECOSYSTEM] Tick {tick} | {species} population went extinct, reseeding {batch}");
        recovered += batch;
    }
    recovered
}
