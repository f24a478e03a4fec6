//! Error types for configuration and world construction.

use std::path::PathBuf;

use thiserror::Error;

use crate::organisms::Species;

/// A configuration bundle that cannot drive a simulation.
///
/// Returned by [`SimConfig::validate`](crate::SimConfig::validate) and
/// [`World::new`](crate::World::new). Values are never clamped into range.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("world dimensions must be positive and finite (got {width} x {height})")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("margin {margin} leaves no playable area in a {width} x {height} world")]
    InvalidMargin { margin: f32, width: f32, height: f32 },

    #[error("water radius must be positive and finite (got {radius})")]
    InvalidWaterRadius { radius: f32 },

    #[error("water feature must lie strictly inside the playable area")]
    WaterOutOfBounds,

    #[error("reflect jitter must lie in [0, pi] radians (got {jitter})")]
    InvalidReflectJitter { jitter: f32 },

    #[error("tick rate must be positive and finite (got {rate})")]
    InvalidTickRate { rate: f64 },

    #[error("catch-up cap must allow at least one tick per frame")]
    InvalidCatchUpCap,

    #[error("{species}: {field} must be {requirement} (got {value})")]
    OutOfRange {
        species: Species,
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("{species}: regeneration {regen} must exceed drain {drain} so producers stay renewable")]
    NonRenewableProducer { species: Species, regen: f32, drain: f32 },

    #[error("{species}: foraging parameters are required for motile species")]
    MissingForaging { species: Species },

    #[error("{species}: producers do not forage, remove the foraging block")]
    UnexpectedForaging { species: Species },

    #[error("{species}: a local density gate is required for producers")]
    MissingDensityGate { species: Species },

    #[error("{species}: reproduction cost {cost} exceeds reproduction threshold {threshold}")]
    CostAboveThreshold {
        species: Species,
        cost: f32,
        threshold: f32,
    },

    #[error("{species}: seed population {seed} exceeds global cap {cap}")]
    SeedAboveCap {
        species: Species,
        seed: usize,
        cap: usize,
    },

    #[error("{species}: recovery batch {batch} must be between 1 and the global cap {cap}")]
    InvalidRecoveryBatch {
        species: Species,
        batch: usize,
        cap: usize,
    },
}

/// Failure to load a configuration bundle from disk or text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
