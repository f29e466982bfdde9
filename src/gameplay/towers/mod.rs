//! Towers: spawning, damage tint, repair, and destruction.

pub mod firing;
pub mod targeting;

use avian2d::prelude::*;
use bevy::prelude::*;

use self::firing::{FireCooldown, FireTower, FiringDisabled, TowerFiring};
use self::targeting::{CurrentTarget, InRange, RangeSensor, TowerHead};
use crate::gameplay::combat::HealthBarConfig;
use crate::gameplay::effects::{CosmeticEffect, DamageEffect, DeathEffect, Lifetime};
use crate::gameplay::health::{Died, Health, HealthChanged, Indestructible};
use crate::screens::GameState;
use crate::third_party::{CollisionLayer, NavObstacle};
use crate::{GameSet, Z_TOWER, gameplay_running};

// === Constants ===

pub const DEFAULT_TOWER_MAX_HEALTH: f32 = 200.0;

/// Side length of the tower base.
pub const TOWER_SIZE: f32 = 1.6;

/// Below this health fraction the tower sprite shifts toward its damaged color.
pub const HEAVY_DAMAGE_THRESHOLD: f32 = 0.3;

/// A destroyed tower lingers this long before despawning.
pub const DESTROYED_TOWER_LINGER_SECS: f32 = 1.0;

const DAMAGE_EFFECT_SECS: f32 = 2.0;
const DESTROY_EFFECT_SECS: f32 = 3.0;

const TOWER_COLOR: Color = Color::srgb(0.55, 0.55, 0.6);
const TOWER_HEAD_COLOR: Color = Color::srgb(0.3, 0.3, 0.35);
const TOWER_DAMAGED_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

// === Components ===

/// Marker for tower entities.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Tower;

/// Sprite colors blended as the tower loses health.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TowerTint {
    pub original: Color,
    pub damaged: Color,
}

impl TowerTint {
    /// Sprite color at health `fraction`.
    #[must_use]
    pub fn tint_for(&self, fraction: f32) -> Color {
        if fraction >= HEAVY_DAMAGE_THRESHOLD {
            return self.original;
        }
        let t = (fraction / HEAVY_DAMAGE_THRESHOLD).max(0.0);
        Srgba::from(self.damaged)
            .mix(&Srgba::from(self.original), t)
            .into()
    }
}

// === Messages ===

/// Restore `amount` health to a tower. Ignored once the tower is destroyed.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct RepairTower {
    pub tower: Entity,
    pub amount: f32,
}

/// Spawn a tower at `position`. `destructible: false` keeps it alive at zero health.
pub fn spawn_tower(
    commands: &mut Commands,
    position: Vec2,
    firing: TowerFiring,
    destructible: bool,
) -> Entity {
    let range = firing.range;
    let mut tower = commands.spawn((
        Name::new("Tower"),
        Tower,
        Health::new(DEFAULT_TOWER_MAX_HEALTH),
        HealthBarConfig {
            width: TOWER_SIZE,
            height: 0.2,
            y_offset: TOWER_SIZE * 0.5 + 0.4,
        },
        TowerTint {
            original: TOWER_COLOR,
            damaged: TOWER_DAMAGED_COLOR,
        },
        DamageEffect(CosmeticEffect {
            color: Color::srgba(1.0, 0.8, 0.2, 0.7),
            size: TOWER_SIZE * 0.5,
            duration_secs: DAMAGE_EFFECT_SECS,
        }),
        DeathEffect(CosmeticEffect {
            color: Color::srgba(0.3, 0.3, 0.3, 0.8),
            size: TOWER_SIZE * 2.0,
            duration_secs: DESTROY_EFFECT_SECS,
        }),
        firing,
        FireCooldown::default(),
        InRange::default(),
        CurrentTarget::default(),
        Sprite::from_color(TOWER_COLOR, Vec2::splat(TOWER_SIZE)),
        Transform::from_xyz(position.x, position.y, Z_TOWER),
        DespawnOnExit(GameState::InGame),
    ));
    tower.insert((
        RigidBody::Static,
        Collider::rectangle(TOWER_SIZE, TOWER_SIZE),
        CollisionLayers::new(CollisionLayer::Body, CollisionLayer::Body),
        NavObstacle,
    ));
    if !destructible {
        tower.insert(Indestructible);
    }
    tower.with_children(|parent| {
        parent.spawn((
            Name::new("Tower Head"),
            TowerHead,
            Sprite::from_color(TOWER_HEAD_COLOR, Vec2::new(TOWER_SIZE * 0.8, 0.3)),
            Transform::from_xyz(0.0, 0.0, 0.5),
        ));
        parent.spawn((
            Name::new("Tower Range"),
            RangeSensor,
            Sensor,
            Collider::circle(range),
            CollisionLayers::new(CollisionLayer::Detector, CollisionLayer::Enemy),
            CollidingEntities::default(),
            Transform::default(),
        ));
    });
    tower.id()
}

// === Systems & Observers ===

fn tint_damaged_tower(
    changed: On<HealthChanged>,
    mut towers: Query<(&TowerTint, &mut Sprite), With<Tower>>,
) {
    let Ok((tint, mut sprite)) = towers.get_mut(changed.entity) else {
        return;
    };
    sprite.color = tint.tint_for(changed.fraction);
}

/// A destroyed tower stops firing and despawns shortly after.
fn disable_destroyed_tower(
    died: On<Died>,
    towers: Query<(), With<Tower>>,
    mut commands: Commands,
) {
    if !towers.contains(died.entity) {
        return;
    }
    info!("Tower {} destroyed", died.entity);
    commands.entity(died.entity).insert((
        FiringDisabled,
        Lifetime::from_secs(DESTROYED_TOWER_LINGER_SECS),
    ));
}

/// Runs in `GameSet::Damage`.
fn apply_repairs(
    mut requests: MessageReader<RepairTower>,
    mut towers: Query<&mut Health, With<Tower>>,
    mut commands: Commands,
) {
    for request in requests.read() {
        let Ok(mut health) = towers.get_mut(request.tower) else {
            continue;
        };
        let Some(fraction) = health.repair(request.amount) else {
            continue;
        };
        commands.trigger(HealthChanged {
            entity: request.tower,
            fraction,
        });
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Tower>()
        .register_type::<TowerTint>()
        .register_type::<TowerFiring>()
        .register_type::<FireCooldown>()
        .register_type::<FiringDisabled>()
        .register_type::<InRange>()
        .register_type::<CurrentTarget>()
        .register_type::<RangeSensor>()
        .register_type::<TowerHead>()
        .add_message::<FireTower>()
        .add_message::<RepairTower>();

    app.add_observer(tint_damaged_tower)
        .add_observer(disable_destroyed_tower);

    app.add_systems(
        Update,
        (
            (
                targeting::sync_in_range,
                targeting::update_targeting,
                targeting::rotate_heads,
            )
                .chain()
                .in_set(GameSet::Ai),
            firing::fire_towers.in_set(GameSet::Combat),
            apply_repairs.in_set(GameSet::Damage),
        )
            .run_if(gameplay_running),
    );
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::effects::despawn_expired;
    use crate::gameplay::health::{DealDamage, apply_damage};
    use crate::testing::{create_test_app, tick, tick_for_secs};
    use pretty_assertions::assert_eq;

    fn create_tower_test_app() -> App {
        let mut app = create_test_app();
        app.add_message::<DealDamage>().add_message::<RepairTower>();
        app.add_observer(tint_damaged_tower)
            .add_observer(disable_destroyed_tower);
        app.add_systems(
            Update,
            (apply_damage, apply_repairs, despawn_expired).chain(),
        );
        app
    }

    fn spawn_default_tower(app: &mut App, destructible: bool) -> Entity {
        app.world_mut()
            .run_system_cached_with(
                |In(destructible): In<bool>, mut commands: Commands| {
                    spawn_tower(
                        &mut commands,
                        Vec2::ZERO,
                        TowerFiring::default(),
                        destructible,
                    )
                },
                destructible,
            )
            .unwrap()
    }

    fn deal(app: &mut App, tower: Entity, amount: f32) {
        app.world_mut().write_message(DealDamage {
            target: tower,
            amount,
        });
        tick(app);
    }

    fn repair(app: &mut App, tower: Entity, amount: f32) {
        app.world_mut().write_message(RepairTower { tower, amount });
        tick(app);
    }

    fn health(app: &App, tower: Entity) -> f32 {
        app.world().get::<Health>(tower).unwrap().current()
    }

    #[test]
    fn spawned_tower_has_head_and_range_sensor() {
        let mut app = create_tower_test_app();
        let tower = spawn_default_tower(&mut app, true);

        let children = app.world().get::<Children>(tower).unwrap();
        assert_eq!(children.len(), 2);
        crate::testing::assert_entity_count::<With<TowerHead>>(&mut app, 1);
        crate::testing::assert_entity_count::<With<RangeSensor>>(&mut app, 1);
    }

    #[test]
    fn heavy_damage_tints_sprite() {
        let mut app = create_tower_test_app();
        let tower = spawn_default_tower(&mut app, true);

        deal(&mut app, tower, 50.0);
        assert_eq!(app.world().get::<Sprite>(tower).unwrap().color, TOWER_COLOR);

        deal(&mut app, tower, 130.0);
        assert_ne!(app.world().get::<Sprite>(tower).unwrap().color, TOWER_COLOR);
    }

    #[test]
    fn repair_caps_at_max() {
        let mut app = create_tower_test_app();
        let tower = spawn_default_tower(&mut app, true);

        deal(&mut app, tower, 50.0);
        repair(&mut app, tower, 500.0);

        assert_eq!(health(&app, tower), DEFAULT_TOWER_MAX_HEALTH);
    }

    #[test]
    fn destroyed_tower_is_disabled_then_despawned() {
        let mut app = create_tower_test_app();
        let tower = spawn_default_tower(&mut app, true);

        deal(&mut app, tower, 500.0);
        assert!(app.world().get::<FiringDisabled>(tower).is_some());

        // Repair after destruction is ignored
        repair(&mut app, tower, 100.0);
        assert_eq!(health(&app, tower), 0.0);

        tick_for_secs(&mut app, 1.2);
        assert!(app.world().get_entity(tower).is_err());
    }

    #[test]
    fn indestructible_tower_survives_and_can_be_repaired() {
        let mut app = create_tower_test_app();
        let tower = spawn_default_tower(&mut app, false);

        deal(&mut app, tower, 500.0);
        assert!(app.world().get::<FiringDisabled>(tower).is_none());
        assert_eq!(health(&app, tower), 0.0);

        repair(&mut app, tower, 50.0);
        assert_eq!(health(&app, tower), 50.0);
    }
}
