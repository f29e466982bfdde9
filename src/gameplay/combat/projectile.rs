//! Tower projectiles: homing shots and interpolated shots.

use bevy::prelude::*;

use crate::gameplay::effects::Lifetime;
use crate::gameplay::health::DealDamage;
use crate::screens::GameState;
use crate::Z_PROJECTILE;

// === Constants ===

/// A homing projectile closer than this to its target hits.
pub const HIT_DISTANCE: f32 = 0.5;

/// Upper bound on any projectile's flight time.
pub const PROJECTILE_LIFETIME_SECS: f32 = 5.0;

const PROJECTILE_SIZE: f32 = 0.3;
const PROJECTILE_COLOR: Color = Color::srgb(1.0, 1.0, 0.3);

// === Components ===

/// Steers toward `target` every frame; damages it on arrival.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub target: Entity,
    pub damage: f32,
    pub speed: f32,
}

/// Interpolates from the launch point to the target's current position.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LerpProjectile {
    pub target: Entity,
    pub damage: f32,
    start: Vec2,
    elapsed: f32,
    journey_time: f32,
}

impl LerpProjectile {
    /// Journey time is fixed at launch: `distance(start, target_position) / speed`.
    #[must_use]
    pub fn new(start: Vec2, target_position: Vec2, target: Entity, damage: f32, speed: f32) -> Self {
        let journey_time = if speed > 0.0 {
            start.distance(target_position) / speed
        } else {
            0.0
        };
        Self {
            target,
            damage,
            start,
            elapsed: 0.0,
            journey_time,
        }
    }

    #[must_use]
    pub const fn journey_time(&self) -> f32 {
        self.journey_time
    }

    /// Advance by `delta` seconds and return the journey fraction in `[0, 1]`.
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.elapsed += delta;
        if self.journey_time <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.journey_time).min(1.0)
    }
}

// === Pure Functions ===

/// Move `position` toward `target` by `speed * delta`, snapping on overshoot.
/// Returns the new position and whether it is within [`HIT_DISTANCE`].
#[must_use]
pub fn step_homing(position: Vec2, target: Vec2, speed: f32, delta: f32) -> (Vec2, bool) {
    let to_target = target - position;
    let distance = to_target.length();
    let move_amount = speed * delta;

    let next = if move_amount >= distance {
        target
    } else {
        position + to_target / distance * move_amount
    };
    (next, next.distance(target) < HIT_DISTANCE)
}

/// Spawn a homing projectile at `origin`.
pub fn spawn_projectile(
    commands: &mut Commands,
    origin: Vec2,
    target: Entity,
    damage: f32,
    speed: f32,
) -> Entity {
    commands
        .spawn((
            Name::new("Projectile"),
            Projectile {
                target,
                damage,
                speed,
            },
            projectile_sprite(),
            Transform::from_xyz(origin.x, origin.y, Z_PROJECTILE),
            Lifetime::from_secs(PROJECTILE_LIFETIME_SECS),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

/// Spawn an interpolated projectile at `origin` aimed at `target` (now at `target_position`).
pub fn spawn_lerp_projectile(
    commands: &mut Commands,
    origin: Vec2,
    target_position: Vec2,
    target: Entity,
    damage: f32,
    speed: f32,
) -> Entity {
    commands
        .spawn((
            Name::new("Lerp Projectile"),
            LerpProjectile::new(origin, target_position, target, damage, speed),
            projectile_sprite(),
            Transform::from_xyz(origin.x, origin.y, Z_PROJECTILE),
            Lifetime::from_secs(PROJECTILE_LIFETIME_SECS),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

fn projectile_sprite() -> Sprite {
    Sprite::from_color(PROJECTILE_COLOR, Vec2::splat(PROJECTILE_SIZE))
}

// === Systems ===

/// Moves homing projectiles and applies damage on contact. A projectile whose
/// target no longer exists is despawned harmlessly.
pub(super) fn move_projectiles(
    time: Res<Time>,
    mut projectiles: Query<(Entity, &Projectile, &mut Transform)>,
    targets: Query<&GlobalTransform>,
    mut damage: MessageWriter<DealDamage>,
    mut commands: Commands,
) {
    for (entity, projectile, mut transform) in &mut projectiles {
        let Ok(target_transform) = targets.get(projectile.target) else {
            commands.entity(entity).despawn();
            continue;
        };
        let target = target_transform.translation().xy();
        let position = transform.translation.xy();

        let (next, hit) = step_homing(position, target, projectile.speed, time.delta_secs());
        transform.translation.x = next.x;
        transform.translation.y = next.y;
        let facing = target - next;
        if facing.length_squared() > f32::EPSILON {
            transform.rotation = Quat::from_rotation_z(facing.to_angle());
        }

        if hit {
            damage.write(DealDamage {
                target: projectile.target,
                amount: projectile.damage,
            });
            commands.entity(entity).despawn();
        }
    }
}

/// Moves interpolated projectiles; damage lands when the journey completes.
pub(super) fn move_lerp_projectiles(
    time: Res<Time>,
    mut projectiles: Query<(Entity, &mut LerpProjectile, &mut Transform)>,
    targets: Query<&GlobalTransform>,
    mut damage: MessageWriter<DealDamage>,
    mut commands: Commands,
) {
    for (entity, mut projectile, mut transform) in &mut projectiles {
        let Ok(target_transform) = targets.get(projectile.target) else {
            commands.entity(entity).despawn();
            continue;
        };
        let fraction = projectile.advance(time.delta_secs());
        let position = projectile
            .start
            .lerp(target_transform.translation().xy(), fraction);
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        if fraction >= 1.0 {
            damage.write(DealDamage {
                target: projectile.target,
                amount: projectile.damage,
            });
            commands.entity(entity).despawn();
        }
    }
}
