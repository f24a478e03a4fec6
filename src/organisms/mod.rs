pub mod components;
pub mod ecosystem_stats;
pub mod tuning;

pub(crate) mod behavior;
pub(crate) mod population;
pub(crate) mod reproduction;
pub(crate) mod systems;

pub use components::*;
pub use ecosystem_stats::{EcosystemStats, SpeciesSummary, TickSummary};
pub use tuning::{
    ConsumptionPolicy, DensityConfig, EnergyConfig, ForagingConfig, PopulationConfig,
    ReproductionConfig, SpeciesConfig,
};
