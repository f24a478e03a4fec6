//! Per-species update pass for one tick.
//!
//! Every entity runs the same routine, parameterized by its species table:
//! regen/drain, death check, forage (motile species only), reproduction.
//! Species are processed in [`Species::UPDATE_ORDER`]. The traversal list and
//! candidate positions for each species are captured before any entity is
//! touched, and births are buffered, so nothing is visited twice and a
//! hunter sees its prey either untouched or already gone.

use glam::Vec2;
use tracing::trace;

use crate::config::SimConfig;
use crate::organisms::behavior::{consume, forage};
use crate::organisms::components::{Entity, PopulationCounts, Species};
use crate::organisms::reproduction::{give_birth, is_ready, Newborn};
use crate::world::geometry::Geometry;
use crate::world::spatial::SpatialGrid;

/// Bucket size for the per-tick candidate grids.
const ROSTER_CELL_SIZE: f32 = 32.0;

pub(crate) struct TickContext<'a> {
    pub config: &'a SimConfig,
    pub geometry: &'a Geometry,
    pub rng: &'a mut fastrand::Rng,
}

#[derive(Debug, Default)]
pub(crate) struct TickOutcome {
    pub newborns: Vec<Newborn>,
    pub starved: usize,
    pub eaten: usize,
}

/// One species' members as they stood at tick start.
struct Roster {
    /// Store indices, in store order.
    indices: Vec<usize>,
    /// Positions parallel to `indices`.
    points: Vec<Vec2>,
    grid: SpatialGrid,
}

impl Roster {
    fn capture(entities: &[Entity], species: Species, extent: Vec2) -> Self {
        let indices: Vec<usize> = entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.species == species)
            .map(|(index, _)| index)
            .collect();
        let points: Vec<Vec2> = indices.iter().map(|&i| entities[i].position).collect();
        let grid = SpatialGrid::build(&points, extent, ROSTER_CELL_SIZE);
        Self {
            indices,
            points,
            grid,
        }
    }
}

/// Run every live entity once. Dead entities stay in the slice with zero
/// energy; the caller purges them before the tick ends.
pub(crate) fn run_species_updates(
    entities: &mut [Entity],
    ctx: &mut TickContext<'_>,
    counts_at_start: PopulationCounts,
) -> TickOutcome {
    let extent = ctx.geometry.size();
    let rosters = {
        let view: &[Entity] = entities;
        Species::ALL.map(|species| Roster::capture(view, species, extent))
    };

    let mut outcome = TickOutcome::default();
    let mut pending = PopulationCounts::default();

    for species in Species::UPDATE_ORDER {
        let own = &rosters[species.index()];
        let prey = species.prey().map(|prey| &rosters[prey.index()]);
        for &index in &own.indices {
            // Eaten earlier this tick.
            if entities[index].is_dead() {
                continue;
            }
            update_entity(
                entities,
                index,
                own,
                prey,
                ctx,
                counts_at_start,
                &mut pending,
                &mut outcome,
            );
        }
    }
    outcome
}

#[allow(clippy::too_many_arguments)]
fn update_entity(
    entities: &mut [Entity],
    index: usize,
    own: &Roster,
    prey: Option<&Roster>,
    ctx: &mut TickContext<'_>,
    counts_at_start: PopulationCounts,
    pending: &mut PopulationCounts,
    outcome: &mut TickOutcome,
) {
    let mut me = entities[index];
    let params = ctx.config.species(me.species);

    me.age = me.age.saturating_add(1);
    me.reproduction_cooldown = me.reproduction_cooldown.saturating_sub(1);
    me.energy
        .adjust(params.energy.regen_per_tick - params.energy.drain_per_tick);

    if me.is_dead() {
        trace!(id = %me.id, species = %me.species, "starved");
        entities[index] = me;
        outcome.starved += 1;
        return;
    }

    if let (Some(foraging), Some(prey)) = (&params.foraging, prey) {
        let target = prey
            .grid
            .nearest(&prey.points, me.position, foraging.sense_radius, |ordinal| {
                !entities[prey.indices[ordinal]].is_dead()
            })
            .map(|ordinal| prey.indices[ordinal]);

        let target_position = target.map(|t| entities[t].position);
        let in_range = forage(&mut me, foraging, target_position, ctx.geometry, ctx.rng);

        if let (true, Some(target)) = (in_range, target) {
            let food = &mut entities[target];
            let gained = consume(&mut me.energy, &mut food.energy, foraging);
            trace!(id = %me.id, target = %food.id, gained, "fed");
            if food.is_dead() {
                outcome.eaten += 1;
            }
        }
    }

    if is_ready(&me, params, ctx.rng) {
        let cap = params.population.global_cap;
        let under_cap = counts_at_start.get(me.species) + pending.get(me.species) < cap;
        let uncrowded = match &params.reproduction.density {
            Some(density) => {
                let neighbours =
                    own.grid
                        .count_within(&own.points, me.position, density.radius, |ordinal| {
                            let other = own.indices[ordinal];
                            other != index && !entities[other].is_dead()
                        });
                neighbours < density.max_neighbors
            }
            None => true,
        };

        if under_cap && uncrowded {
            outcome
                .newborns
                .push(give_birth(&mut me, params, ctx.geometry, ctx.rng));
            pending.increment(me.species);
        }
    }

    entities[index] = me;
}
