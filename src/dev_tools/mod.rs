//! Development tools, only included with `cargo run --features dev`.
//!
//! World inspector, range overlays, and debug spawn/damage keys.
//! This module is stripped from release builds.

use bevy::color::palettes::css::{ORANGE_RED, SKY_BLUE};
use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use crate::gameplay::enemies::{EnemyArchetype, Objective, spawn_enemy};
use crate::gameplay::health::DealDamage;
use crate::gameplay::towers::firing::{FiringDisabled, TowerFiring};
use crate::gameplay::towers::{RepairTower, Tower};
use crate::gameplay::waves::{EnemyRoster, SpawnPoint};
use crate::{GameSet, gameplay_running};

const SPAWN_ENEMIES_KEY: KeyCode = KeyCode::KeyE;
const DAMAGE_TOWERS_KEY: KeyCode = KeyCode::KeyH;
const REPAIR_TOWERS_KEY: KeyCode = KeyCode::KeyR;
const TOGGLE_RANGES_KEY: KeyCode = KeyCode::F3;

/// Health removed from / restored to every tower per debug key press.
const DEBUG_TOWER_HEALTH_STEP: f32 = 50.0;

/// Whether tower range circles are drawn.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
struct RangeOverlay {
    enabled: bool,
}

impl Default for RangeOverlay {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// One default enemy per spawn point.
fn debug_spawn_enemies(
    keyboard: Res<ButtonInput<KeyCode>>,
    spawn_points: Query<&Transform, With<SpawnPoint>>,
    objective: Query<Entity, With<Objective>>,
    mut roster: ResMut<EnemyRoster>,
    mut commands: Commands,
) {
    if !keyboard.just_pressed(SPAWN_ENEMIES_KEY) {
        return;
    }
    let archetype = EnemyArchetype::default();
    let chase = objective.iter().next();
    for transform in &spawn_points {
        let enemy = spawn_enemy(
            &mut commands,
            &archetype,
            transform.translation.xy(),
            archetype.max_health,
            chase,
        );
        roster.add(enemy);
    }
}

fn debug_damage_and_repair_towers(
    keyboard: Res<ButtonInput<KeyCode>>,
    towers: Query<Entity, With<Tower>>,
    mut damage: MessageWriter<DealDamage>,
    mut repairs: MessageWriter<RepairTower>,
) {
    if keyboard.just_pressed(DAMAGE_TOWERS_KEY) {
        for tower in &towers {
            damage.write(DealDamage {
                target: tower,
                amount: DEBUG_TOWER_HEALTH_STEP,
            });
        }
    }
    if keyboard.just_pressed(REPAIR_TOWERS_KEY) {
        for tower in &towers {
            repairs.write(RepairTower {
                tower,
                amount: DEBUG_TOWER_HEALTH_STEP,
            });
        }
    }
}

fn toggle_range_overlay(keyboard: Res<ButtonInput<KeyCode>>, mut overlay: ResMut<RangeOverlay>) {
    if keyboard.just_pressed(TOGGLE_RANGES_KEY) {
        overlay.enabled = !overlay.enabled;
        info!(
            "Range overlay: {}",
            if overlay.enabled { "ON" } else { "OFF" }
        );
    }
}

fn draw_tower_ranges(
    mut gizmos: Gizmos,
    overlay: Res<RangeOverlay>,
    towers: Query<(&GlobalTransform, &TowerFiring, Has<FiringDisabled>), With<Tower>>,
) {
    if !overlay.enabled {
        return;
    }
    for (transform, firing, disabled) in &towers {
        let color = if disabled { ORANGE_RED } else { SKY_BLUE };
        gizmos.circle_2d(transform.translation().xy(), firing.range, color);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((EguiPlugin::default(), WorldInspectorPlugin::new()));
    app.init_resource::<RangeOverlay>();

    app.add_systems(
        Update,
        (
            (
                debug_spawn_enemies,
                debug_damage_and_repair_towers,
                toggle_range_overlay,
            )
                .in_set(GameSet::Input),
            draw_tower_ranges.in_set(GameSet::Ui),
        )
            .run_if(gameplay_running),
    );
}
