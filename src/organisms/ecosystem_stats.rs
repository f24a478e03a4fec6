use tracing::{debug, info};

use crate::organisms::components::*;

/// What happened during one call to [`World::advance_tick`](crate::World::advance_tick).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: u64,
    /// Newborns admitted to the store.
    pub births: usize,
    /// Newborns dropped because their species was at its global cap.
    pub discarded: usize,
    /// Entities that ran out of energy on their own.
    pub starved: usize,
    /// Entities grazed to zero or taken by a predator.
    pub eaten: usize,
    /// Entities injected by extinction recovery.
    pub recovered: usize,
    /// Live counts at the end of the tick.
    pub counts: PopulationCounts,
}

impl TickSummary {
    pub fn deaths(&self) -> usize {
        self.starved + self.eaten
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeciesSummary {
    pub count: usize,
    pub avg_energy: f32,
    pub avg_age: f32,
}

impl SpeciesSummary {
    pub fn collect(entities: &[Entity], species: Species) -> Self {
        let mut energy_sum = 0.0;
        let mut age_sum = 0.0;
        let mut count = 0;
        for entity in entities.iter().filter(|e| e.species == species) {
            energy_sum += entity.energy();
            age_sum += entity.age as f32;
            count += 1;
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            count,
            avg_energy: energy_sum / count as f32,
            avg_age: age_sum / count as f32,
        }
    }
}

/// Running totals since the world was last (re)initialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EcosystemStats {
    pub ticks: u64,
    pub total_births: u64,
    pub total_discarded: u64,
    pub total_starved: u64,
    pub total_eaten: u64,
    pub total_recovered: u64,
    /// Peak live count seen per species.
    pub peak_counts: PopulationCounts,
}

impl EcosystemStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold one tick into the totals and emit the periodic summary.
    pub fn record(&mut self, summary: &TickSummary, entities: &[Entity], log_interval: u64) {
        self.ticks += 1;
        self.total_births += summary.births as u64;
        self.total_discarded += summary.discarded as u64;
        self.total_starved += summary.starved as u64;
        self.total_eaten += summary.eaten as u64;
        self.total_recovered += summary.recovered as u64;
        self.peak_counts.producer = self.peak_counts.producer.max(summary.counts.producer);
        self.peak_counts.grazer = self.peak_counts.grazer.max(summary.counts.grazer);
        self.peak_counts.predator = self.peak_counts.predator.max(summary.counts.predator);

        debug!(
            tick = summary.tick,
            births = summary.births,
            deaths = summary.deaths(),
            discarded = summary.discarded,
            recovered = summary.recovered,
            "tick complete"
        );

        if log_interval == 0 || summary.tick % log_interval != 0 {
            return;
        }

        let producers = SpeciesSummary::collect(entities, Species::Producer);
        let grazers = SpeciesSummary::collect(entities, Species::Grazer);
        let predators = SpeciesSummary::collect(entities, Species::Predator);
        info!(
            "[ECOSYSTEM] Tick {} | Population: {} | Producers: {} (avg energy {:.1}) | Grazers: {} (avg energy {:.1}, avg age {:.0}) | Predators: {} (avg energy {:.1}, avg age {:.0}) | Births: {} | Eaten: {} | Starved: {} | Recovered: {}",
            summary.tick,
            summary.counts.total(),
            producers.count,
            producers.avg_energy,
            grazers.count,
            grazers.avg_energy,
            grazers.avg_age,
            predators.count,
            predators.avg_energy,
            predators.avg_age,
            self.total_births,
            self.total_eaten,
            self.total_starved,
            self.total_recovered,
        );
    }
}
