//! Simulation configuration bundle.
//!
//! Every constant the rules use lives here. Loading from JSON is strict: a
//! missing or unknown field is a parse error, never a silent default.
//! [`SimConfig::default`] is the documented balanced bundle and
//! `config/ecosystem.json` mirrors it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LoadError};
use crate::organisms::tuning::SpeciesConfig;
use crate::organisms::Species;

/// What happens to a motile entity that steps past the world margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Hard stop at the margin.
    Clamp,
    /// Mirror the crossing component of position and heading, plus jitter.
    Reflect,
}

/// Circular water feature. Nothing may stand or spawn inside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaterConfig {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Entities stay within `[margin, size - margin]` on each axis.
    pub margin: f32,
    pub boundary: BoundaryPolicy,
    /// Maximum heading rotation (radians) added after a reflection.
    pub reflect_jitter: f32,
    pub water: WaterConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Simulation ticks per second of real time.
    pub tick_rate_hz: f64,
    /// Upper bound on ticks executed in a single scheduler call.
    pub max_catch_up_ticks: u32,
}

impl ScheduleConfig {
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Seed for the world RNG. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub world: WorldConfig,
    pub schedule: ScheduleConfig,
    pub producer: SpeciesConfig,
    pub grazer: SpeciesConfig,
    pub predator: SpeciesConfig,
    /// Ticks between ecosystem summary log lines (0 disables).
    pub stats_log_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            world: WorldConfig {
                width: 800.0,
                height: 600.0,
                margin: 5.0,
                boundary: BoundaryPolicy::Reflect,
                reflect_jitter: 0.35,
                water: WaterConfig {
                    center_x: 400.0,
                    center_y: 300.0,
                    radius: 80.0,
                },
            },
            schedule: ScheduleConfig {
                tick_rate_hz: 30.0,
                max_catch_up_ticks: 5,
            },
            producer: SpeciesConfig::producer(),
            grazer: SpeciesConfig::grazer(),
            predator: SpeciesConfig::predator(),
            stats_log_interval_ticks: 500,
        }
    }
}

impl SimConfig {
    /// The default bundle; named for symmetry with the other presets.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Fewer, hungrier foragers on a larger map.
    pub fn sparse() -> Self {
        let mut config = Self::default();
        config.world.width = 1200.0;
        config.world.height = 900.0;
        config.world.water.center_x = 600.0;
        config.world.water.center_y = 450.0;
        config.grazer.population.seed_count = 15;
        config.predator.population.seed_count = 4;
        config.producer.reproduction.probability = 0.03;
        config
    }

    /// Dense producers and high caps; expect sharper predator cycles.
    pub fn crowded() -> Self {
        let mut config = Self::default();
        config.producer.population.seed_count = 160;
        config.producer.population.global_cap = 500;
        if let Some(density) = config.producer.reproduction.density.as_mut() {
            density.max_neighbors = 7;
        }
        config.grazer.population.global_cap = 200;
        config.predator.population.global_cap = 50;
        config.predator.reproduction.probability = 0.05;
        config
    }

    pub fn species(&self, species: Species) -> &SpeciesConfig {
        match species {
            Species::Producer => &self.producer,
            Species::Grazer => &self.grazer,
            Species::Predator => &self.predator,
        }
    }

    pub fn species_mut(&mut self, species: Species) -> &mut SpeciesConfig {
        match species {
            Species::Producer => &mut self.producer,
            Species::Grazer => &mut self.grazer,
            Species::Predator => &mut self.predator,
        }
    }

    /// Parse and validate a JSON bundle.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON bundle from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_world()?;

        let schedule = &self.schedule;
        if !(schedule.tick_rate_hz.is_finite() && schedule.tick_rate_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate {
                rate: schedule.tick_rate_hz,
            });
        }
        if schedule.max_catch_up_ticks == 0 {
            return Err(ConfigError::InvalidCatchUpCap);
        }

        for species in Species::ALL {
            self.species(species).validate(species)?;
        }
        Ok(())
    }

    fn validate_world(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        let sizes_ok = world.width.is_finite()
            && world.height.is_finite()
            && world.width > 0.0
            && world.height > 0.0;
        if !sizes_ok {
            return Err(ConfigError::InvalidWorldSize {
                width: world.width,
                height: world.height,
            });
        }

        let margin_ok = world.margin.is_finite()
            && world.margin >= 0.0
            && world.margin * 2.0 < world.width
            && world.margin * 2.0 < world.height;
        if !margin_ok {
            return Err(ConfigError::InvalidMargin {
                margin: world.margin,
                width: world.width,
                height: world.height,
            });
        }

        if !(world.reflect_jitter.is_finite()
            && (0.0..=std::f32::consts::PI).contains(&world.reflect_jitter))
        {
            return Err(ConfigError::InvalidReflectJitter {
                jitter: world.reflect_jitter,
            });
        }

        let water = &world.water;
        if !(water.radius.is_finite() && water.radius > 0.0) {
            return Err(ConfigError::InvalidWaterRadius {
                radius: water.radius,
            });
        }
        // Keeping the water clear of the margins guarantees that pushing a
        // point out of the water always lands it back inside the bounds.
        let inside = water.center_x - water.radius > world.margin
            && water.center_x + water.radius < world.width - world.margin
            && water.center_y - water.radius > world.margin
            && water.center_y + water.radius < world.height - world.margin;
        if !inside {
            return Err(ConfigError::WaterOutOfBounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        SimConfig::balanced().validate().unwrap();
        SimConfig::sparse().validate().unwrap();
        SimConfig::crowded().validate().unwrap();
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let mut config = SimConfig::default();
        config.schedule.tick_rate_hz = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTickRate { rate: 0.0 })
        );
    }

    #[test]
    fn zero_catch_up_cap_is_rejected() {
        let mut config = SimConfig::default();
        config.schedule.max_catch_up_ticks = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidCatchUpCap));
    }

    #[test]
    fn water_touching_the_margin_is_rejected() {
        let mut config = SimConfig::default();
        config.world.water.center_x = 60.0;
        assert_eq!(config.validate(), Err(ConfigError::WaterOutOfBounds));
    }

    #[test]
    fn margin_must_leave_room() {
        let mut config = SimConfig::default();
        config.world.margin = 300.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMargin { .. })
        ));
    }

    #[test]
    fn json_round_trip_preserves_the_bundle() {
        let config = SimConfig::default();
        let text = config.to_json_pretty().unwrap();
        let parsed = SimConfig::from_json_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let mut value = serde_json::to_value(SimConfig::default()).unwrap();
        value["grazer"]["energy"]
            .as_object_mut()
            .unwrap()
            .remove("drain_per_tick");
        let text = value.to_string();
        assert!(matches!(
            SimConfig::from_json_str(&text),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let mut value = serde_json::to_value(SimConfig::default()).unwrap();
        value["schedule"]["ticks_per_frame"] = serde_json::json!(3);
        assert!(matches!(
            SimConfig::from_json_str(&value.to_string()),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_surface_as_config_errors() {
        let mut config = SimConfig::default();
        config.predator.population.global_cap = 1;
        let text = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            SimConfig::from_json_str(&text),
            Err(LoadError::Invalid(ConfigError::SeedAboveCap { .. }))
        ));
    }

    #[test]
    fn shipped_config_matches_the_default_bundle() {
        let text = include_str!("../config/ecosystem.json");
        let config = SimConfig::from_json_str(text).unwrap();
        assert_eq!(config, SimConfig::default());
    }
}
