// ecosystem_sim: bounded producer/grazer/predator ecosystem simulation.
//
// The crate is split into a pure simulation core and a thin bevy host that
// lives in the binary (`main.rs` + `render.rs`). Nothing in the library
// touches bevy, frame timing, or a window.
//
// Module overview:
// - `config.rs`:     SimConfig: world geometry, scheduling, per-species tables, JSON loading.
// - `error.rs`:      ConfigError / LoadError.
// - `scheduler.rs`:  Fixed-timestep accumulator with bounded catch-up.
// - `world/`:        World (owner of all state), geometry, entity store, spatial queries.
// - `organisms/`:    Entity components, species tuning, foraging, reproduction,
//                    population control and ecosystem statistics.
//
// Every tunable number reaches the rules through `SimConfig`. Randomness comes
// from a per-world `fastrand::Rng`; set `SimConfig::seed` for reproducible runs.

pub mod config;
pub mod error;
pub mod organisms;
pub mod scheduler;
pub mod world;

pub use config::SimConfig;
pub use error::{ConfigError, LoadError};
pub use organisms::{Entity, EntityId, PopulationCounts, Species, TickSummary};
pub use scheduler::TickScheduler;
pub use world::World;
