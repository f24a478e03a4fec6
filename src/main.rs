mod render;

use std::env;
use std::process;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use ecosystem_sim::{SimConfig, TickScheduler, World};
use render::{EcosystemPlugin, SimulationState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment variable naming a JSON config file.
const CONFIG_ENV: &str = "ECOSYSTEM_CONFIG";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };
    let world = match World::new(config) {
        Ok(world) => world,
        Err(err) => {
            error!("invalid configuration: {err}");
            process::exit(1);
        }
    };
    let scheduler = TickScheduler::new(&world.config().schedule);
    let size = world.geometry().size();

    info!(
        "Ecosystem simulator initialized: {}x{} world at {} ticks/s",
        size.x,
        size.y,
        world.config().schedule.tick_rate_hz
    );

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Ecosystem Simulator".into(),
                        resolution: (size.x, size.y).into(),
                        ..default()
                    }),
                    ..default()
                })
                // tracing-subscriber is already installed above.
                .disable::<LogPlugin>(),
        )
        .insert_resource(ClearColor(Color::rgb(0.36, 0.55, 0.28)))
        .insert_resource(SimulationState::new(world, scheduler))
        .add_plugins(EcosystemPlugin)
        .run();
}

/// First CLI argument, then `ECOSYSTEM_CONFIG`, then the built-in defaults.
fn load_config() -> Result<SimConfig, ecosystem_sim::LoadError> {
    let path = env::args().nth(1).or_else(|| env::var(CONFIG_ENV).ok());
    match path {
        Some(path) => {
            info!("Loading configuration from {path}");
            SimConfig::load(path)
        }
        None => Ok(SimConfig::default()),
    }
}
