//! Testing utilities for Bevy systems.

#![cfg(test)]

use std::time::Duration;

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use crate::screens::GameState;

/// Fixed frame length for test apps. Below `Time<Virtual>`'s max delta so nothing is clamped.
pub const TEST_FRAME: Duration = Duration::from_millis(100);

/// Creates a minimal app whose clock advances by exactly [`TEST_FRAME`] per update.
/// The first update initializes time (delta 0). Transforms propagate in `PostUpdate`.
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, bevy::transform::TransformPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TEST_FRAME));
    app
}

/// Creates a test app with `GameState` registered (starts in `Loading`).
pub fn create_base_test_app() -> App {
    let mut app = create_test_app();
    app.add_plugins(StatesPlugin);
    app.init_state::<GameState>();
    app
}

/// Moves the app into `GameState::InGame` and runs the `OnEnter` schedule.
pub fn transition_to_ingame(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
}

/// Helper to advance the app by one frame.
pub fn tick(app: &mut App) {
    app.update();
}

/// Helper to advance the app by multiple frames.
pub fn tick_multiple(app: &mut App, count: usize) {
    for _ in 0..count {
        app.update();
    }
}

/// Advance the app until at least `secs` seconds of game time have passed.
pub fn tick_for_secs(app: &mut App, secs: f32) {
    let frames = (secs / TEST_FRAME.as_secs_f32()).ceil();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    tick_multiple(app, frames as usize);
}

/// Assert the number of entities matching filter `F`.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let count = app
        .world_mut()
        .query_filtered::<(), F>()
        .iter(app.world())
        .count();
    assert_eq!(
        count,
        expected,
        "expected {expected} entities matching {}, found {count}",
        std::any::type_name::<F>()
    );
}

/// Set a timer's elapsed to one nanosecond before its duration.
pub fn nearly_expire_timer(timer: &mut Timer) {
    let duration = timer.duration();
    timer.set_elapsed(duration.saturating_sub(Duration::from_nanos(1)));
}

/// Spawn a bare positioned entity (no gameplay components).
pub fn spawn_at(world: &mut World, position: Vec2) -> Entity {
    let transform = Transform::from_xyz(position.x, position.y, 0.0);
    world
        .spawn((transform, GlobalTransform::from(transform)))
        .id()
}
