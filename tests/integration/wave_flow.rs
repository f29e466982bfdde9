use bevy::prelude::*;
use pretty_assertions::assert_eq;
use tower_defense::gameplay::enemies::Enemy;
use tower_defense::gameplay::health::DealDamage;
use tower_defense::gameplay::waves::{EnemyRoster, EnemySpawner, WaveConfig, WavePhase};

use crate::{count, create_game_app, enter_game, tick_for_secs};

fn quick_waves() -> WaveConfig {
    WaveConfig {
        enemies_per_wave: 2,
        time_between_spawns: 0.2,
        time_between_waves: 0.5,
        ..default()
    }
}

fn kill_all_enemies(app: &mut App) {
    let enemies: Vec<Entity> = app.world().resource::<EnemyRoster>().iter().collect();
    for target in enemies {
        app.world_mut().write_message(DealDamage {
            target,
            amount: 10_000.0,
        });
    }
    app.update();
}

#[test]
fn first_wave_spawns_configured_count_then_waits() {
    let mut app = create_game_app();
    app.insert_resource(quick_waves());
    enter_game(&mut app);
    tick_for_secs(&mut app, 1.0);

    assert_eq!(count::<With<Enemy>>(&mut app), 2);
    assert_eq!(app.world().resource::<EnemyRoster>().len(), 2);
    let spawner = app.world().resource::<EnemySpawner>();
    assert_eq!(spawner.current_wave(), 1);
    assert_eq!(spawner.phase(), WavePhase::WaitingForClear);
}

#[test]
fn wave_stays_open_while_enemies_live() {
    let mut app = create_game_app();
    app.insert_resource(quick_waves());
    enter_game(&mut app);
    tick_for_secs(&mut app, 4.0);

    assert_eq!(app.world().resource::<EnemySpawner>().current_wave(), 1);
}

#[test]
fn clearing_a_wave_starts_the_next_one_larger() {
    let mut app = create_game_app();
    app.insert_resource(quick_waves());
    enter_game(&mut app);
    tick_for_secs(&mut app, 1.0);

    kill_all_enemies(&mut app);
    assert_eq!(count::<With<Enemy>>(&mut app), 0);
    assert!(app.world().resource::<EnemyRoster>().is_empty());

    // One clear poll, the wave gap, then four spawns 0.2 s apart
    tick_for_secs(&mut app, 3.0);

    assert_eq!(app.world().resource::<EnemySpawner>().current_wave(), 2);
    assert_eq!(count::<With<Enemy>>(&mut app), 4);
}
