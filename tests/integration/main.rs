//! Headless end-to-end tests. The game runs without physics or navigation plugins:
//! sensors are filled in by hand and enemies path in straight lines.

mod combat_flow;
mod state_flow;
mod wave_flow;

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use tower_defense::screens::GameState;

pub const FRAME: Duration = Duration::from_millis(100);

pub fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, bevy::transform::TransformPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    // Driven by hand instead of `InputPlugin`, which clears presses before `Update` sees them.
    app.init_resource::<ButtonInput<KeyCode>>();
    app.add_plugins(tower_defense::game_plugin);
    app
}

/// Loading hands over on the first frame; the second frame enters the game.
pub fn enter_game(app: &mut App) {
    app.update();
    app.update();
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::InGame
    );
}

/// Press `key` for exactly one frame.
pub fn press(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();
    let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    input.release(key);
    input.clear();
}

pub fn tick_for_secs(app: &mut App, secs: f32) {
    let frames = (secs / FRAME.as_secs_f32()).ceil();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    for _ in 0..frames as usize {
        app.update();
    }
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), F>()
        .iter(app.world())
        .count()
}
