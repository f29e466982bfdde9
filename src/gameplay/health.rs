//! Damage model shared by enemies and towers.
//!
//! Damage arrives as [`DealDamage`] messages and is applied in `GameSet::Damage`.
//! Every accepted hit fires [`HealthChanged`]; the hit that empties the pool fires
//! [`Died`] exactly once. What dying *means* (roster removal, disabling a tower)
//! is decided by observers in the enemy and tower modules.

use bevy::prelude::*;

use super::effects::{DamageEffect, DeathEffect};
use crate::{GameSet, gameplay_running};

// === Components ===

/// Hit points clamped to `[0, max]`, plus a one-way dead flag.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

/// Result of a damage call that was not ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    /// `current / max` after the hit.
    pub fraction: f32,
    /// Health is now zero.
    pub depleted: bool,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    /// Partially damaged health. `current` is clamped into `[0, max]`.
    #[must_use]
    pub fn with_current(max: f32, current: f32) -> Self {
        Self {
            current: current.min(max).max(0.0),
            max,
            dead: false,
        }
    }

    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Normalized health in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Subtract `amount`. Returns `None` (and changes nothing) once dead.
    pub fn take_damage(&mut self, amount: f32) -> Option<DamageOutcome> {
        if self.dead {
            return None;
        }
        self.current = (self.current - amount).min(self.max).max(0.0);
        Some(DamageOutcome {
            fraction: self.fraction(),
            depleted: self.current <= 0.0,
        })
    }

    /// Add `amount`, capped at max. Returns the new fraction, or `None` once dead.
    pub fn repair(&mut self, amount: f32) -> Option<f32> {
        if self.dead {
            return None;
        }
        self.current = (self.current + amount).min(self.max).max(0.0);
        Some(self.fraction())
    }

    /// Mark dead. Returns `true` only for the call that made the transition.
    pub const fn kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        true
    }
}

/// Health can reach zero but the entity never dies (towers with destruction turned off).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Indestructible;

// === Messages & Events ===

/// Request to damage `target`. Ignored if the target has no `Health` or is already dead.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DealDamage {
    pub target: Entity,
    pub amount: f32,
}

/// Fired on the entity whenever its health changes. Carries the new normalized fraction.
#[derive(EntityEvent, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub fraction: f32,
}

/// Fired once when an entity's health is depleted (enemy death, tower destruction).
#[derive(EntityEvent, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Died {
    pub entity: Entity,
}

// === Systems ===

/// Applies queued damage in arrival order.
pub(super) fn apply_damage(
    mut requests: MessageReader<DealDamage>,
    mut targets: Query<(
        &mut Health,
        Option<&GlobalTransform>,
        Has<Indestructible>,
        Option<&DamageEffect>,
        Option<&DeathEffect>,
    )>,
    mut commands: Commands,
) {
    for request in requests.read() {
        let Ok((mut health, transform, indestructible, damage_effect, death_effect)) =
            targets.get_mut(request.target)
        else {
            continue;
        };
        let Some(outcome) = health.take_damage(request.amount) else {
            continue;
        };
        let position = transform.map_or(Vec2::ZERO, |t| t.translation().xy());

        if let Some(DamageEffect(effect)) = damage_effect {
            effect.spawn(&mut commands, position);
        }
        commands.trigger(HealthChanged {
            entity: request.target,
            fraction: outcome.fraction,
        });

        if outcome.depleted && !indestructible && health.kill() {
            if let Some(DeathEffect(effect)) = death_effect {
                effect.spawn(&mut commands, position);
            }
            debug!("{} died", request.target);
            commands.trigger(Died {
                entity: request.target,
            });
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Health>()
        .register_type::<Indestructible>()
        .add_message::<DealDamage>();

    app.add_systems(
        Update,
        apply_damage
            .in_set(GameSet::Damage)
            .run_if(gameplay_running),
    );
}
