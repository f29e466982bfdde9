//! Keyboard bindings: key presses become gameplay messages.

use bevy::prelude::*;

use crate::gameplay::combat::{FireBullet, Shooter};
use crate::gameplay::towers::Tower;
use crate::gameplay::towers::firing::{FireTower, FiringDisabled, TowerFiring};
use crate::gameplay::waves::StartNextWave;
use crate::{GameSet, gameplay_running};

/// Starts the next wave once the current one is done spawning.
pub const NEXT_WAVE_KEY: KeyCode = KeyCode::KeyN;

fn fire_towers_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    towers: Query<(Entity, &TowerFiring), (With<Tower>, Without<FiringDisabled>)>,
    mut requests: MessageWriter<FireTower>,
) {
    for (tower, firing) in &towers {
        if keyboard.just_pressed(firing.fire_key) {
            requests.write(FireTower { tower });
        }
    }
}

fn shoot_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    shooters: Query<(Entity, &Shooter)>,
    mut requests: MessageWriter<FireBullet>,
) {
    for (shooter, config) in &shooters {
        if keyboard.just_pressed(config.key) {
            requests.write(FireBullet { shooter });
        }
    }
}

fn next_wave_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: MessageWriter<StartNextWave>,
) {
    if keyboard.just_pressed(NEXT_WAVE_KEY) {
        requests.write(StartNextWave);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (fire_towers_on_key, shoot_on_key, next_wave_on_key)
            .in_set(GameSet::Input)
            .run_if(gameplay_running),
    );
}
