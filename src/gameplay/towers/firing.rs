//! Manual tower firing: cooldown gate and projectile launch.

use bevy::prelude::*;

use super::Tower;
use super::targeting::{CurrentTarget, TargetingMode};
use crate::gameplay::combat::{spawn_lerp_projectile, spawn_projectile};
use crate::gameplay::health::DealDamage;

// === Constants ===

pub const DEFAULT_FIRE_RATE: f32 = 1.0;
pub const DEFAULT_RANGE: f32 = 10.0;
pub const DEFAULT_DAMAGE: f32 = 25.0;
pub const DEFAULT_PROJECTILE_SPEED: f32 = 15.0;

/// Degrees per second.
pub const DEFAULT_ROTATION_SPEED: f32 = 90.0;

// === Components ===

/// How a shot reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ProjectileMode {
    /// Steers toward the target every frame.
    Homing { speed: f32 },
    /// Interpolates from the launch point to the target over `distance / speed` seconds.
    Lerp { speed: f32 },
    /// Damage lands immediately, nothing is spawned.
    Instant,
}

/// Firing parameters for a tower.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TowerFiring {
    /// Shots per second.
    pub fire_rate: f32,
    /// Detection radius in world units.
    pub range: f32,
    pub damage: f32,
    pub projectile: ProjectileMode,
    pub targeting: TargetingMode,
    /// Head rotation in degrees per second.
    pub rotation_speed: f32,
    pub fire_key: KeyCode,
}

impl Default for TowerFiring {
    fn default() -> Self {
        Self {
            fire_rate: DEFAULT_FIRE_RATE,
            range: DEFAULT_RANGE,
            damage: DEFAULT_DAMAGE,
            projectile: ProjectileMode::Homing {
                speed: DEFAULT_PROJECTILE_SPEED,
            },
            targeting: TargetingMode::Closest,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            fire_key: KeyCode::Space,
        }
    }
}

/// Time of the last shot, in seconds since startup.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FireCooldown {
    last_fired: Option<f64>,
}

impl FireCooldown {
    /// True if the tower never fired, or `1 / fire_rate` seconds passed since the last shot.
    #[must_use]
    pub fn ready(&self, now: f64, fire_rate: f32) -> bool {
        self.last_fired
            .is_none_or(|last| now >= last + 1.0 / f64::from(fire_rate))
    }

    pub const fn record(&mut self, now: f64) {
        self.last_fired = Some(now);
    }

    #[must_use]
    pub const fn last_fired(&self) -> Option<f64> {
        self.last_fired
    }
}

/// Tower no longer targets, rotates, or fires.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FiringDisabled;

// === Messages ===

/// Manual fire request for one tower.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireTower {
    pub tower: Entity,
}

// === Systems ===

/// Handles fire requests: needs a target and an elapsed cooldown.
/// Runs in `GameSet::Combat`.
pub(super) fn fire_towers(
    time: Res<Time>,
    mut requests: MessageReader<FireTower>,
    mut towers: Query<
        (&TowerFiring, &CurrentTarget, &mut FireCooldown, &GlobalTransform),
        (With<Tower>, Without<FiringDisabled>),
    >,
    targets: Query<&GlobalTransform>,
    mut damage: MessageWriter<DealDamage>,
    mut commands: Commands,
) {
    let now = time.elapsed_secs_f64();
    for request in requests.read() {
        let Ok((firing, current, mut cooldown, transform)) = towers.get_mut(request.tower) else {
            continue;
        };
        let Some(target) = current.0 else {
            info!("No enemies in range to fire at!");
            continue;
        };
        if !cooldown.ready(now, firing.fire_rate) {
            continue;
        }
        cooldown.record(now);

        let origin = transform.translation().xy();
        match firing.projectile {
            ProjectileMode::Homing { speed } => {
                spawn_projectile(&mut commands, origin, target, firing.damage, speed);
            }
            ProjectileMode::Lerp { speed } => {
                let Ok(target_transform) = targets.get(target) else {
                    continue;
                };
                spawn_lerp_projectile(
                    &mut commands,
                    origin,
                    target_transform.translation().xy(),
                    target,
                    firing.damage,
                    speed,
                );
            }
            ProjectileMode::Instant => {
                damage.write(DealDamage {
                    target,
                    amount: firing.damage,
                });
            }
        }
    }
}
