//! Level layout: ground, objective, spawn points, starting towers, and the navmesh.

use bevy::prelude::*;

use crate::gameplay::combat::Shooter;
use crate::gameplay::enemies::Objective;
use crate::gameplay::towers::firing::{ProjectileMode, TowerFiring};
use crate::gameplay::towers::spawn_tower;
use crate::gameplay::towers::targeting::TargetingMode;
use crate::gameplay::waves::SpawnPoint;
use crate::screens::GameState;
use crate::third_party::spawn_navmesh;
use crate::{Z_GROUND, Z_MARKER};

// === Constants ===

/// Half the playfield's width and height in world units.
pub const PLAYFIELD_HALF_EXTENTS: Vec2 = Vec2::new(32.0, 16.0);

pub const OBJECTIVE_POSITION: Vec2 = Vec2::new(-26.0, 0.0);

pub const SPAWN_POINTS: [Vec2; 3] = [
    Vec2::new(28.0, -10.0),
    Vec2::new(28.0, 0.0),
    Vec2::new(28.0, 10.0),
];

const GROUND_COLOR: Color = Color::srgb(0.18, 0.24, 0.16);
const OBJECTIVE_COLOR: Color = Color::srgb(0.2, 0.5, 0.9);
const SPAWN_POINT_COLOR: Color = Color::srgba(0.8, 0.2, 0.2, 0.5);
const MARKER_SIZE: f32 = 1.5;

/// Starting tower placement: position, firing setup, and whether it can be destroyed.
#[derive(Debug, Clone, Copy)]
struct TowerPlacement {
    position: Vec2,
    firing: TowerFiring,
    destructible: bool,
}

fn starting_towers() -> [TowerPlacement; 4] {
    [
        TowerPlacement {
            position: Vec2::new(6.0, 6.0),
            firing: TowerFiring::default(),
            destructible: true,
        },
        TowerPlacement {
            position: Vec2::new(6.0, -6.0),
            firing: TowerFiring {
                projectile: ProjectileMode::Lerp { speed: 12.0 },
                targeting: TargetingMode::Furthest,
                ..default()
            },
            destructible: true,
        },
        TowerPlacement {
            position: Vec2::new(-8.0, 3.0),
            firing: TowerFiring {
                fire_rate: 2.0,
                damage: 10.0,
                projectile: ProjectileMode::Instant,
                targeting: TargetingMode::Weakest,
                ..default()
            },
            destructible: true,
        },
        TowerPlacement {
            position: Vec2::new(-16.0, -4.0),
            firing: TowerFiring {
                range: 14.0,
                damage: 50.0,
                fire_rate: 0.5,
                targeting: TargetingMode::Strongest,
                fire_key: KeyCode::KeyF,
                ..default()
            },
            destructible: false,
        },
    ]
}

// === Systems ===

fn spawn_level(mut commands: Commands) {
    commands.spawn((
        Name::new("Ground"),
        Sprite::from_color(GROUND_COLOR, PLAYFIELD_HALF_EXTENTS * 2.0),
        Transform::from_xyz(0.0, 0.0, Z_GROUND),
        DespawnOnExit(GameState::InGame),
    ));

    commands.spawn((
        Name::new("Objective"),
        Objective,
        Shooter::default(),
        Sprite::from_color(OBJECTIVE_COLOR, Vec2::splat(MARKER_SIZE * 1.5)),
        Transform::from_xyz(OBJECTIVE_POSITION.x, OBJECTIVE_POSITION.y, Z_MARKER),
        DespawnOnExit(GameState::InGame),
    ));

    for position in SPAWN_POINTS {
        commands.spawn((
            Name::new("Spawn Point"),
            SpawnPoint,
            Sprite::from_color(SPAWN_POINT_COLOR, Vec2::splat(MARKER_SIZE)),
            Transform::from_xyz(position.x, position.y, Z_MARKER),
            DespawnOnExit(GameState::InGame),
        ));
    }

    for placement in starting_towers() {
        spawn_tower(
            &mut commands,
            placement.position,
            placement.firing,
            placement.destructible,
        );
    }

    spawn_navmesh(&mut commands, PLAYFIELD_HALF_EXTENTS);
    info!("Level ready: {} spawn points", SPAWN_POINTS.len());
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_level);
}
