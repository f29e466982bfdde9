//! Enemy archetypes, spawning, and death handling.

pub mod ai;
pub mod pathfinding;

use avian2d::prelude::*;
use bevy::prelude::*;

use self::ai::{ChaseTarget, NavAgent};
use self::pathfinding::{NavPath, PathRefreshTimer};
use crate::gameplay::combat::HealthBarConfig;
use crate::gameplay::effects::{CosmeticEffect, DeathEffect};
use crate::gameplay::health::{Died, Health};
use crate::gameplay::waves::EnemyRoster;
use crate::screens::GameState;
use crate::third_party::CollisionLayer;
use crate::{GameSet, Z_ENEMY, gameplay_running};

// === Constants ===

pub const DEFAULT_ENEMY_MAX_HEALTH: f32 = 100.0;

/// World units per second.
pub const DEFAULT_ENEMY_SPEED: f32 = 3.5;

pub const DEFAULT_ENEMY_RADIUS: f32 = 0.5;

/// Seconds the death effect lingers.
pub const DEATH_EFFECT_SECS: f32 = 2.0;

const ENEMY_HEALTH_BAR_WIDTH: f32 = 1.2;
const ENEMY_HEALTH_BAR_HEIGHT: f32 = 0.15;

// === Components ===

/// Marker for enemy units.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// What enemies walk toward when spawned (the player's keep).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Objective;

/// One kind of enemy the spawner can pick.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct EnemyArchetype {
    pub name: String,
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub color: Color,
}

impl Default for EnemyArchetype {
    fn default() -> Self {
        Self {
            name: "Grunt".into(),
            max_health: DEFAULT_ENEMY_MAX_HEALTH,
            speed: DEFAULT_ENEMY_SPEED,
            radius: DEFAULT_ENEMY_RADIUS,
            color: Color::srgb(0.8, 0.2, 0.2),
        }
    }
}

// === Resources ===

/// Enemy kinds available to the wave spawner. Empty means spawns are skipped.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct EnemyArchetypes(pub Vec<EnemyArchetype>);

impl Default for EnemyArchetypes {
    fn default() -> Self {
        Self(vec![
            EnemyArchetype::default(),
            EnemyArchetype {
                name: "Runner".into(),
                max_health: 60.0,
                speed: 5.5,
                radius: 0.35,
                color: Color::srgb(0.95, 0.55, 0.15),
            },
            EnemyArchetype {
                name: "Brute".into(),
                max_health: 250.0,
                speed: 2.0,
                radius: 0.8,
                color: Color::srgb(0.5, 0.15, 0.6),
            },
        ])
    }
}

/// Spawn an enemy of `archetype` at `position`, chasing `chase` if given.
/// Single source of truth for the enemy bundle.
pub fn spawn_enemy(
    commands: &mut Commands,
    archetype: &EnemyArchetype,
    position: Vec2,
    max_health: f32,
    chase: Option<Entity>,
) -> Entity {
    let size = archetype.radius * 2.0;
    commands
        .spawn((
            Name::new(archetype.name.clone()),
            Enemy,
            Health::new(max_health),
            HealthBarConfig {
                width: ENEMY_HEALTH_BAR_WIDTH,
                height: ENEMY_HEALTH_BAR_HEIGHT,
                y_offset: archetype.radius + 0.3,
            },
            DeathEffect(CosmeticEffect {
                color: archetype.color.with_alpha(0.6),
                size: size * 1.5,
                duration_secs: DEATH_EFFECT_SECS,
            }),
            ChaseTarget(chase),
            NavAgent::new(archetype.speed),
            NavPath::default(),
            Sprite::from_color(archetype.color, Vec2::splat(size)),
            Transform::from_xyz(position.x, position.y, Z_ENEMY),
            DespawnOnExit(GameState::InGame),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::circle(archetype.radius),
            CollisionLayers::new(
                [CollisionLayer::Body, CollisionLayer::Enemy],
                [
                    CollisionLayer::Body,
                    CollisionLayer::Detector,
                    CollisionLayer::Hitbox,
                ],
            ),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::ZERO,
        ))
        .id()
}

// === Observers ===

/// A dead enemy leaves the roster and the world immediately.
fn despawn_dead_enemy(
    died: On<Died>,
    enemies: Query<(), With<Enemy>>,
    mut roster: ResMut<EnemyRoster>,
    mut commands: Commands,
) {
    if !enemies.contains(died.entity) {
        return;
    }
    roster.remove(died.entity);
    commands.entity(died.entity).despawn();
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>()
        .register_type::<Objective>()
        .register_type::<EnemyArchetypes>()
        .register_type::<ChaseTarget>()
        .register_type::<NavAgent>()
        .register_type::<NavPath>()
        .register_type::<PathRefreshTimer>()
        .init_resource::<EnemyArchetypes>()
        .init_resource::<PathRefreshTimer>();

    app.add_observer(despawn_dead_enemy);

    app.add_systems(
        Update,
        (
            ai::chase_target.in_set(GameSet::Ai),
            pathfinding::compute_paths
                .in_set(GameSet::Movement)
                .before(pathfinding::follow_path),
            pathfinding::follow_path.in_set(GameSet::Movement),
        )
            .run_if(gameplay_running),
    );
}
