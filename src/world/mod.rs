pub mod geometry;
pub mod spatial;
pub mod store;

use glam::Vec2;
use tracing::{info, warn};

use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::organisms::ecosystem_stats::{EcosystemStats, TickSummary};
use crate::organisms::systems::{run_species_updates, TickContext};
use crate::organisms::{population, Entity, EntityId, PopulationCounts, Species};

pub use geometry::Geometry;
pub use spatial::{find_nearest, SpatialGrid};
pub use store::{EntityStore, IdAllocator};

/// Owns every piece of simulation state: the entity store and its id
/// allocator, the tick counter, the random stream and the running stats.
///
/// [`advance_tick`](World::advance_tick) is the only way the population
/// changes over time; everything else is read access or explicit setup.
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    geometry: Geometry,
    store: EntityStore,
    rng: fastrand::Rng,
    tick: u64,
    stats: EcosystemStats,
}

impl World {
    /// Validate `config` and seed the initial populations.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let mut world = Self {
            geometry: Geometry::new(&config.world),
            config,
            store: EntityStore::new(),
            rng,
            tick: 0,
            stats: EcosystemStats::default(),
        };
        world.seed();
        Ok(world)
    }

    /// Throw away every entity and reseed from the config. The tick counter
    /// and stats restart; ids keep counting and the random stream continues.
    pub fn reinitialize(&mut self) {
        self.store.clear();
        self.tick = 0;
        self.stats.reset();
        self.seed();
    }

    fn seed(&mut self) {
        let placed =
            population::seed_population(&mut self.store, &self.config, &self.geometry, &mut self.rng);
        let counts = self.store.population_counts();
        info!(
            "Seeded world with {} entities ({} producers, {} grazers, {} predators)",
            placed, counts.producer, counts.grazer, counts.predator
        );
    }

    /// Run one simulation step:
    /// species updates in fixed order, purge of the dead, newborn admission
    /// under the global caps, then extinction recovery.
    pub fn advance_tick(&mut self) -> TickSummary {
        self.tick += 1;
        let counts_at_start = self.store.population_counts();

        let outcome = {
            let mut ctx = TickContext {
                config: &self.config,
                geometry: &self.geometry,
                rng: &mut self.rng,
            };
            run_species_updates(self.store.as_mut_slice(), &mut ctx, counts_at_start)
        };

        self.store.purge_dead();

        let (births, discarded) =
            population::admit_newborns(&mut self.store, outcome.newborns, &self.config, &mut self.rng);
        let recovered = population::recover_extinct(
            &mut self.store,
            &self.config,
            &self.geometry,
            &mut self.rng,
            self.tick,
        );

        let summary = TickSummary {
            tick: self.tick,
            births,
            discarded,
            starved: outcome.starved,
            eaten: outcome.eaten,
            recovered,
            counts: self.store.population_counts(),
        };
        self.stats.record(
            &summary,
            self.store.as_slice(),
            self.config.stats_log_interval_ticks,
        );

        if cfg!(debug_assertions) {
            self.check_invariants();
        }
        summary
    }

    /// Insert one entity outside the tick loop. Missing position or energy
    /// fall back to a random valid spot and the species' initial energy; an
    /// invalid position is moved to the nearest valid one. Non-finite values
    /// are treated as missing.
    pub fn allocate(&mut self, species: Species, position: Option<Vec2>, energy: Option<f32>) -> Entity {
        let position = position.filter(|requested| {
            let finite = requested.is_finite();
            if !finite {
                warn!("{species} requested at non-finite position {requested:?}, placing randomly");
            }
            finite
        });
        let energy = energy.filter(|requested| {
            let finite = requested.is_finite();
            if !finite {
                warn!("{species} requested with energy {requested}, using the initial energy");
            }
            finite
        });
        let position = position.map(|requested| {
            if self.geometry.is_valid(requested) {
                return requested;
            }
            let corrected = self
                .geometry
                .push_out_of_water(self.geometry.confine_point(requested));
            warn!(
                "{species} requested at ({:.1}, {:.1}) is not a valid position, placing at ({:.1}, {:.1})",
                requested.x, requested.y, corrected.x, corrected.y
            );
            corrected
        });
        population::spawn_fresh(
            &mut self.store,
            species,
            &self.config,
            &self.geometry,
            &mut self.rng,
            position,
            energy,
        )
    }

    /// Owned copy of every entity, in store order.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.store.snapshot()
    }

    pub fn population_counts(&self) -> PopulationCounts {
        self.store.population_counts()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(id)
    }

    pub fn entities(&self) -> &[Entity] {
        self.store.as_slice()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Ticks completed since the last (re)initialization.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn stats(&self) -> &EcosystemStats {
        &self.stats
    }

    /// Assert the end-of-tick invariants. Compiled to nothing in release builds.
    pub fn check_invariants(&self) {
        let mut previous: Option<EntityId> = None;
        for entity in self.store.iter() {
            debug_assert!(
                entity.energy() >= 0.0 && entity.energy() <= entity.max_energy(),
                "{} energy {} outside [0, {}]",
                entity.id(),
                entity.energy(),
                entity.max_energy()
            );
            debug_assert!(
                self.geometry.is_valid(entity.position()),
                "{} at invalid position {:?}",
                entity.id(),
                entity.position()
            );
            debug_assert!(
                previous.map_or(true, |id| id < entity.id()),
                "ids out of order at {}",
                entity.id()
            );
            previous = Some(entity.id());
        }
    }
}
