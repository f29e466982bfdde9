//! Timed entities: cosmetic hit/death effects and lifetime-based despawning.

use bevy::prelude::*;

use crate::screens::GameState;
use crate::{GameSet, Z_EFFECT, gameplay_running};

/// Despawns its entity once the timer finishes.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Lifetime(pub Timer);

impl Lifetime {
    #[must_use]
    pub fn from_secs(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }
}

/// A short-lived sprite spawned at a position, e.g. an explosion puff.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CosmeticEffect {
    pub color: Color,
    pub size: f32,
    pub duration_secs: f32,
}

impl CosmeticEffect {
    /// Spawn the effect at `position`. It despawns itself after `duration_secs`.
    pub fn spawn(&self, commands: &mut Commands, position: Vec2) -> Entity {
        commands
            .spawn((
                Name::new("Effect"),
                Effect,
                Sprite::from_color(self.color, Vec2::splat(self.size)),
                Transform::from_xyz(position.x, position.y, Z_EFFECT),
                Lifetime::from_secs(self.duration_secs),
                DespawnOnExit(GameState::InGame),
            ))
            .id()
    }
}

/// Marker for spawned cosmetic effect entities.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Effect;

/// Effect spawned every time the entity accepts damage.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DamageEffect(pub CosmeticEffect);

/// Effect spawned once when the entity dies.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DeathEffect(pub CosmeticEffect);

pub(super) fn despawn_expired(
    time: Res<Time>,
    mut commands: Commands,
    mut lifetimes: Query<(Entity, &mut Lifetime)>,
) {
    for (entity, mut lifetime) in &mut lifetimes {
        if lifetime.0.tick(time.delta()).just_finished() {
            commands.entity(entity).despawn();
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Lifetime>()
        .register_type::<Effect>()
        .register_type::<DamageEffect>()
        .register_type::<DeathEffect>();

    app.add_systems(
        Update,
        despawn_expired
            .in_set(GameSet::Effects)
            .run_if(gameplay_running),
    );
}
