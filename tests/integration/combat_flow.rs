use avian2d::prelude::CollidingEntities;
use bevy::prelude::*;
use pretty_assertions::assert_eq;
use tower_defense::gameplay::enemies::{EnemyArchetype, spawn_enemy};
use tower_defense::gameplay::health::{DealDamage, Health};
use tower_defense::gameplay::towers::Tower;
use tower_defense::gameplay::towers::firing::{FiringDisabled, ProjectileMode, TowerFiring};
use tower_defense::gameplay::towers::targeting::{CurrentTarget, RangeSensor};
use tower_defense::gameplay::waves::WaveConfig;

use crate::{create_game_app, enter_game, press, tick_for_secs};

/// A running game with no wave enemies, so only hand-placed enemies exist.
fn create_quiet_game() -> App {
    let mut app = create_game_app();
    app.insert_resource(WaveConfig {
        enemies_per_wave: 0,
        ..default()
    });
    enter_game(&mut app);
    app.update();
    app
}

fn find_tower(app: &mut App, matches: impl Fn(&TowerFiring) -> bool) -> Entity {
    let mut towers = app
        .world_mut()
        .query_filtered::<(Entity, &TowerFiring), With<Tower>>();
    let found: Vec<Entity> = towers
        .iter(app.world())
        .filter(|(_, firing)| matches(firing))
        .map(|(entity, _)| entity)
        .collect();
    assert_eq!(found.len(), 1, "expected exactly one matching tower");
    found[0]
}

fn tower_position(app: &App, tower: Entity) -> Vec2 {
    app.world().get::<Transform>(tower).unwrap().translation.xy()
}

fn place_enemy(app: &mut App, position: Vec2, max_health: f32) -> Entity {
    let enemy = spawn_enemy(
        &mut app.world_mut().commands(),
        &EnemyArchetype::default(),
        position,
        max_health,
        None,
    );
    app.world_mut().flush();
    enemy
}

/// Stand-in for the physics step: report `enemy` inside `tower`'s range sensor.
fn enter_range(app: &mut App, tower: Entity, enemy: Entity) {
    let mut sensors = app
        .world_mut()
        .query_filtered::<(Entity, &ChildOf), With<RangeSensor>>();
    let sensor = sensors
        .iter(app.world())
        .find(|(_, child_of)| child_of.parent() == tower)
        .map(|(entity, _)| entity)
        .unwrap();
    app.world_mut()
        .get_mut::<CollidingEntities>(sensor)
        .unwrap()
        .0
        .insert(enemy);
    app.update();
}

#[test]
fn homing_tower_damages_enemy_in_range_on_key_press() {
    let mut app = create_quiet_game();
    let tower = find_tower(&mut app, |firing| {
        matches!(firing.projectile, ProjectileMode::Homing { .. })
            && firing.fire_key == KeyCode::Space
    });
    let position = tower_position(&app, tower) + Vec2::new(0.0, -4.0);
    let enemy = place_enemy(&mut app, position, 100.0);
    enter_range(&mut app, tower, enemy);
    assert_eq!(
        *app.world().get::<CurrentTarget>(tower).unwrap(),
        CurrentTarget(Some(enemy))
    );

    press(&mut app, KeyCode::Space);
    tick_for_secs(&mut app, 1.0);

    assert_eq!(app.world().get::<Health>(enemy).unwrap().current(), 75.0);
}

#[test]
fn instant_tower_kills_weak_enemy_same_frame() {
    let mut app = create_quiet_game();
    let tower = find_tower(&mut app, |firing| {
        firing.projectile == ProjectileMode::Instant
    });
    let damage = app.world().get::<TowerFiring>(tower).unwrap().damage;
    let position = tower_position(&app, tower) + Vec2::X;
    let enemy = place_enemy(&mut app, position, damage);
    enter_range(&mut app, tower, enemy);

    press(&mut app, KeyCode::Space);

    assert!(app.world().get_entity(enemy).is_err());
}

#[test]
fn tower_without_target_does_not_fire() {
    let mut app = create_quiet_game();
    let tower = find_tower(&mut app, |firing| {
        firing.projectile == ProjectileMode::Instant
    });
    // Close by, but never reported inside the range sensor
    let position = tower_position(&app, tower) + Vec2::X;
    let enemy = place_enemy(&mut app, position, 100.0);

    press(&mut app, KeyCode::Space);
    tick_for_secs(&mut app, 0.5);

    assert_eq!(app.world().get::<Health>(enemy).unwrap().current(), 100.0);
}

#[test]
fn destroyed_tower_stops_firing_and_despawns() {
    let mut app = create_quiet_game();
    let tower = find_tower(&mut app, |firing| {
        firing.projectile == ProjectileMode::Instant
    });
    app.world_mut().write_message(DealDamage {
        target: tower,
        amount: 10_000.0,
    });
    app.update();
    assert!(app.world().get::<FiringDisabled>(tower).is_some());

    tick_for_secs(&mut app, 1.5);

    assert!(app.world().get_entity(tower).is_err());
}
