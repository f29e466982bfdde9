//! Top-level game states and the global camera.

mod loading;

use bevy::prelude::*;

/// World units visible per screen pixel.
const CAMERA_SCALE: f32 = 0.05;

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[states(scoped_entities)]
pub enum GameState {
    /// Initial loading state.
    #[default]
    Loading,
    /// Active gameplay: waves run, towers fire.
    InGame,
}

/// Spawns the global 2D camera. Persists across all states (do NOT add `DespawnOnExit`).
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        }),
    ));
}

pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();
    app.register_type::<GameState>();
    app.add_systems(Startup, setup_camera);
    app.add_plugins(loading::plugin);
}
