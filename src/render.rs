//! Bevy host: drives the scheduler once per frame and draws the latest
//! snapshot with gizmos. Nothing here writes entity state.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use ecosystem_sim::{PopulationCounts, Species, TickScheduler, World};
use tracing::info;

const WATER_COLOR: Color = Color::rgb(0.2, 0.45, 0.85);
const BORDER_COLOR: Color = Color::rgb(0.1, 0.1, 0.1);

#[derive(Resource)]
pub struct SimulationState {
    world: World,
    scheduler: TickScheduler,
    paused: bool,
}

impl SimulationState {
    pub fn new(world: World, scheduler: TickScheduler) -> Self {
        Self {
            world,
            scheduler,
            paused: false,
        }
    }
}

pub struct EcosystemPlugin;

impl Plugin for EcosystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (handle_keys, drive_simulation, draw_world, update_title).chain(),
        );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

fn handle_keys(keys: Res<Input<KeyCode>>, mut state: ResMut<SimulationState>) {
    if keys.just_pressed(KeyCode::Space) {
        state.paused = !state.paused;
        // Don't replay the time spent paused.
        state.scheduler.reset();
        info!("Simulation {}", if state.paused { "paused" } else { "resumed" });
    }
    if keys.just_pressed(KeyCode::R) {
        info!("Reinitializing world");
        state.world.reinitialize();
        state.scheduler.reset();
    }
}

fn drive_simulation(time: Res<Time>, mut state: ResMut<SimulationState>) {
    if state.paused {
        return;
    }
    let state = &mut *state;
    state.scheduler.advance(time.delta_seconds_f64(), &mut state.world);
}

fn draw_world(mut gizmos: Gizmos, state: Res<SimulationState>) {
    let geometry = state.world.geometry();
    // World origin is the bottom-left corner; the camera is centred on 0,0.
    let offset = geometry.size() * 0.5;

    gizmos.circle_2d(
        geometry.water_center() - offset,
        geometry.water_radius(),
        WATER_COLOR,
    );
    let playable = geometry.max() - geometry.min();
    gizmos.rect_2d(
        (geometry.min() + geometry.max()) * 0.5 - offset,
        0.0,
        playable,
        BORDER_COLOR,
    );

    for entity in state.world.snapshot() {
        let (radius, base) = species_style(entity.species());
        // Fade towards black as energy runs out.
        let shade = 0.35 + 0.65 * entity.energy_ratio();
        let color = Color::rgb(base[0] * shade, base[1] * shade, base[2] * shade);
        gizmos.circle_2d(entity.position() - offset, radius, color);
    }
}

fn species_style(species: Species) -> (f32, [f32; 3]) {
    match species {
        Species::Producer => (2.5, [0.1, 0.9, 0.2]),
        Species::Grazer => (4.0, [0.95, 0.85, 0.2]),
        Species::Predator => (5.5, [0.9, 0.15, 0.1]),
    }
}

fn update_title(state: Res<SimulationState>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let Ok(mut window) = windows.get_single_mut() else {
        return;
    };
    let title = window_title(
        state.world.tick(),
        state.world.population_counts(),
        state.paused,
    );
    if window.title != title {
        window.title = title;
    }
}

fn window_title(tick: u64, counts: PopulationCounts, paused: bool) -> String {
    format!(
        "Ecosystem Simulator | tick {} | producers {} | grazers {} | predators {}{}",
        tick,
        counts.producer,
        counts.grazer,
        counts.predator,
        if paused { " | paused" } else { "" }
    )
}
