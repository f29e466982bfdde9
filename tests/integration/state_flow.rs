use bevy::prelude::*;
use pretty_assertions::assert_eq;
use tower_defense::gameplay::enemies::{Enemy, Objective};
use tower_defense::gameplay::towers::Tower;
use tower_defense::gameplay::waves::{EnemyRoster, EnemySpawner, SpawnPoint, WavePhase};
use tower_defense::screens::GameState;

use crate::{count, create_game_app, enter_game, tick_for_secs};

#[test]
fn game_initializes_in_loading_state() {
    let app = create_game_app();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Loading);
}

#[test]
fn entering_game_builds_level_and_starts_wave_one() {
    let mut app = create_game_app();
    enter_game(&mut app);
    app.update();

    assert_eq!(count::<With<Objective>>(&mut app), 1);
    assert_eq!(count::<With<SpawnPoint>>(&mut app), 3);
    assert!(count::<With<Tower>>(&mut app) > 0);
    assert_eq!(app.world().resource::<EnemySpawner>().current_wave(), 1);
}

#[test]
fn leaving_game_clears_enemies_and_stops_waves() {
    let mut app = create_game_app();
    enter_game(&mut app);
    tick_for_secs(&mut app, 1.5);
    assert!(count::<With<Enemy>>(&mut app) > 0);

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Loading);
    app.update();

    assert_eq!(count::<With<Enemy>>(&mut app), 0);
    assert_eq!(count::<With<Tower>>(&mut app), 0);
    assert!(app.world().resource::<EnemyRoster>().is_empty());
    assert_eq!(
        app.world().resource::<EnemySpawner>().phase(),
        WavePhase::Idle
    );
}
