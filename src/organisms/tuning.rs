use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::organisms::components::Species;

/// How a forager takes energy from the entity it reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionPolicy {
    /// Take `min(eating_gain, target_remaining)`; the target survives if anything is left.
    Partial,
    /// Remove the target outright and gain `eating_gain`.
    Full,
}

/// Energy budget for one species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyConfig {
    /// Upper clamp for energy.
    pub max: f32,
    /// Starting energy for seeded and recovered entities, as a fraction of `max`.
    pub initial_fraction: f32,
    /// Energy gained every tick (producers photosynthesize, foragers use 0).
    pub regen_per_tick: f32,
    /// Energy lost every tick.
    pub drain_per_tick: f32,
}

/// Movement and feeding parameters for motile species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForagingConfig {
    /// Distance covered per tick.
    pub speed: f32,
    /// Targets strictly closer than this are detected.
    pub sense_radius: f32,
    /// Targets at or within this distance are eaten.
    pub eating_radius: f32,
    /// Energy gained per successful bite.
    pub eating_gain: f32,
    pub consumption: ConsumptionPolicy,
    /// Ticks between heading re-randomizations while wandering.
    pub wander_interval_ticks: u32,
}

/// Local crowding gate for reproduction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DensityConfig {
    pub radius: f32,
    /// Reproduction is allowed only while strictly fewer neighbours are in `radius`.
    pub max_neighbors: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReproductionConfig {
    /// Minimum energy before a birth is attempted.
    pub threshold: f32,
    /// Energy debited from the parent per birth.
    pub cost: f32,
    /// Newborn energy as a fraction of `cost`; never above 1.
    pub offspring_energy_fraction: f32,
    /// Per-tick chance of a birth once every other condition holds.
    pub probability: f32,
    /// Ticks a parent waits after giving birth.
    pub cooldown_ticks: u32,
    /// Newborns land within this distance of the parent.
    pub spawn_radius: f32,
    /// Optional local crowding gate (required for producers).
    pub density: Option<DensityConfig>,
}

impl ReproductionConfig {
    pub fn offspring_energy(&self) -> f32 {
        self.cost * self.offspring_energy_fraction
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PopulationConfig {
    /// Entities placed at (re)initialization.
    pub seed_count: usize,
    /// Hard ceiling on live entities of this species.
    pub global_cap: usize,
    /// Entities injected when the species hits zero.
    pub recovery_batch: usize,
}

/// Full parameter table for one species. The same update routine consumes
/// every table; the species' role decides who it hunts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesConfig {
    pub energy: EnergyConfig,
    /// Present for grazers and predators, absent for producers.
    pub foraging: Option<ForagingConfig>,
    pub reproduction: ReproductionConfig,
    pub population: PopulationConfig,
}

impl SpeciesConfig {
    /// Balanced producer table: slow renewable growth, crowding-limited spread.
    pub fn producer() -> Self {
        Self {
            energy: EnergyConfig {
                max: 50.0,
                initial_fraction: 0.5,
                regen_per_tick: 0.3,
                drain_per_tick: 0.1,
            },
            foraging: None,
            reproduction: ReproductionConfig {
                threshold: 30.0,
                cost: 15.0,
                offspring_energy_fraction: 0.5,
                probability: 0.02,
                cooldown_ticks: 0,
                spawn_radius: 25.0,
                density: Some(DensityConfig {
                    radius: 20.0,
                    max_neighbors: 4,
                }),
            },
            population: PopulationConfig {
                seed_count: 80,
                global_cap: 300,
                recovery_batch: 6,
            },
        }
    }

    /// Balanced grazer table: partial grazing damps boom-bust cycles.
    pub fn grazer() -> Self {
        Self {
            energy: EnergyConfig {
                max: 100.0,
                initial_fraction: 0.6,
                regen_per_tick: 0.0,
                drain_per_tick: 0.25,
            },
            foraging: Some(ForagingConfig {
                speed: 1.6,
                sense_radius: 90.0,
                eating_radius: 6.0,
                eating_gain: 2.0,
                consumption: ConsumptionPolicy::Partial,
                wander_interval_ticks: 45,
            }),
            reproduction: ReproductionConfig {
                threshold: 70.0,
                cost: 35.0,
                offspring_energy_fraction: 0.6,
                probability: 0.05,
                cooldown_ticks: 90,
                spawn_radius: 12.0,
                density: None,
            },
            population: PopulationConfig {
                seed_count: 25,
                global_cap: 120,
                recovery_batch: 4,
            },
        }
    }

    /// Balanced predator table: fast, hungry, removes prey on contact.
    pub fn predator() -> Self {
        Self {
            energy: EnergyConfig {
                max: 150.0,
                initial_fraction: 0.6,
                regen_per_tick: 0.0,
                drain_per_tick: 0.35,
            },
            foraging: Some(ForagingConfig {
                speed: 2.2,
                sense_radius: 130.0,
                eating_radius: 7.0,
                eating_gain: 45.0,
                consumption: ConsumptionPolicy::Full,
                wander_interval_ticks: 60,
            }),
            reproduction: ReproductionConfig {
                threshold: 110.0,
                cost: 55.0,
                offspring_energy_fraction: 0.6,
                probability: 0.03,
                cooldown_ticks: 150,
                spawn_radius: 15.0,
                density: None,
            },
            population: PopulationConfig {
                seed_count: 6,
                global_cap: 30,
                recovery_batch: 2,
            },
        }
    }

    pub fn initial_energy(&self) -> f32 {
        self.energy.max * self.energy.initial_fraction
    }

    /// Reject values that would make the rules ill-defined.
    pub fn validate(&self, species: Species) -> Result<(), ConfigError> {
        let energy = &self.energy;
        check(species, "energy.max", energy.max, energy.max > 0.0, "positive")?;
        check(
            species,
            "energy.initial_fraction",
            energy.initial_fraction,
            energy.initial_fraction > 0.0 && energy.initial_fraction <= 1.0,
            "in (0, 1]",
        )?;
        check(
            species,
            "energy.regen_per_tick",
            energy.regen_per_tick,
            energy.regen_per_tick >= 0.0,
            "non-negative",
        )?;
        check(
            species,
            "energy.drain_per_tick",
            energy.drain_per_tick,
            energy.drain_per_tick >= 0.0,
            "non-negative",
        )?;

        match (species.is_motile(), &self.foraging) {
            (true, None) => return Err(ConfigError::MissingForaging { species }),
            (false, Some(_)) => return Err(ConfigError::UnexpectedForaging { species }),
            (true, Some(foraging)) => foraging.validate(species)?,
            (false, None) => {
                if energy.regen_per_tick <= energy.drain_per_tick {
                    return Err(ConfigError::NonRenewableProducer {
                        species,
                        regen: energy.regen_per_tick,
                        drain: energy.drain_per_tick,
                    });
                }
            }
        }

        self.validate_reproduction(species)?;
        self.validate_population(species)
    }

    fn validate_reproduction(&self, species: Species) -> Result<(), ConfigError> {
        let repro = &self.reproduction;
        check(
            species,
            "reproduction.threshold",
            repro.threshold,
            repro.threshold > 0.0 && repro.threshold <= self.energy.max,
            "in (0, energy.max]",
        )?;
        check(species, "reproduction.cost", repro.cost, repro.cost > 0.0, "positive")?;
        // A parent at the threshold must survive paying the cost.
        if repro.cost >= repro.threshold {
            return Err(ConfigError::CostAboveThreshold {
                species,
                cost: repro.cost,
                threshold: repro.threshold,
            });
        }
        check(
            species,
            "reproduction.offspring_energy_fraction",
            repro.offspring_energy_fraction,
            repro.offspring_energy_fraction > 0.0 && repro.offspring_energy_fraction <= 1.0,
            "in (0, 1]",
        )?;
        check(
            species,
            "reproduction.probability",
            repro.probability,
            (0.0..=1.0).contains(&repro.probability),
            "in [0, 1]",
        )?;
        check(
            species,
            "reproduction.spawn_radius",
            repro.spawn_radius,
            repro.spawn_radius >= 0.0,
            "non-negative",
        )?;

        match &repro.density {
            Some(density) => check(
                species,
                "reproduction.density.radius",
                density.radius,
                density.radius > 0.0,
                "positive",
            ),
            None if !species.is_motile() => Err(ConfigError::MissingDensityGate { species }),
            None => Ok(()),
        }
    }

    fn validate_population(&self, species: Species) -> Result<(), ConfigError> {
        let population = &self.population;
        if population.global_cap == 0 {
            return Err(ConfigError::OutOfRange {
                species,
                field: "population.global_cap",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        if population.seed_count > population.global_cap {
            return Err(ConfigError::SeedAboveCap {
                species,
                seed: population.seed_count,
                cap: population.global_cap,
            });
        }
        if population.recovery_batch == 0 || population.recovery_batch > population.global_cap {
            return Err(ConfigError::InvalidRecoveryBatch {
                species,
                batch: population.recovery_batch,
                cap: population.global_cap,
            });
        }
        Ok(())
    }
}

impl ForagingConfig {
    fn validate(&self, species: Species) -> Result<(), ConfigError> {
        check(species, "foraging.speed", self.speed, self.speed > 0.0, "positive")?;
        check(
            species,
            "foraging.sense_radius",
            self.sense_radius,
            self.sense_radius > 0.0,
            "positive",
        )?;
        check(
            species,
            "foraging.eating_radius",
            self.eating_radius,
            self.eating_radius > 0.0 && self.eating_radius <= self.sense_radius,
            "positive and no larger than sense_radius",
        )?;
        check(
            species,
            "foraging.eating_gain",
            self.eating_gain,
            self.eating_gain > 0.0,
            "positive",
        )?;
        if self.wander_interval_ticks == 0 {
            return Err(ConfigError::OutOfRange {
                species,
                field: "foraging.wander_interval_ticks",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}

fn check(
    species: Species,
    field: &'static str,
    value: f32,
    ok: bool,
    requirement: &'static str,
) -> Result<(), ConfigError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            species,
            field,
            requirement,
            value: f64::from(value),
        })
    }
}
