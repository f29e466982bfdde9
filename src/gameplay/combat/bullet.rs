//! Manually fired bullets: aimed at the closest enemy, moved by physics.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::effects::Lifetime;
use crate::gameplay::enemies::Enemy;
use crate::gameplay::health::{DealDamage, Health};
use crate::gameplay::towers::targeting::{TargetingMode, select_target};
use crate::screens::GameState;
use crate::third_party::CollisionLayer;
use crate::Z_PROJECTILE;

// === Constants ===

/// Bullets despawn this long after firing.
pub const BULLET_LIFETIME_SECS: f32 = 2.0;

pub const DEFAULT_BULLET_SPEED: f32 = 20.0;
pub const DEFAULT_BULLET_DAMAGE: f32 = 10.0;

const BULLET_RADIUS: f32 = 0.15;
const BULLET_COLOR: Color = Color::srgb(1.0, 0.6, 0.1);

// === Components ===

/// Fires a bullet at the closest enemy when `key` is pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Shooter {
    pub key: KeyCode,
    /// Launch speed in world units per second.
    pub speed: f32,
    pub damage: f32,
}

impl Default for Shooter {
    fn default() -> Self {
        Self {
            key: KeyCode::Space,
            speed: DEFAULT_BULLET_SPEED,
            damage: DEFAULT_BULLET_DAMAGE,
        }
    }
}

/// Bullet in flight. Damages the first enemy it overlaps.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Bullet {
    pub damage: f32,
}

// === Messages ===

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireBullet {
    pub shooter: Entity,
}

// === Systems ===

/// Spawns a bullet toward the closest live enemy for each request. No enemies, no bullet.
/// Runs in `GameSet::Combat`.
pub(super) fn fire_bullets(
    mut requests: MessageReader<FireBullet>,
    shooters: Query<(&Shooter, &GlobalTransform)>,
    enemies: Query<(Entity, &GlobalTransform, &Health), With<Enemy>>,
    mut commands: Commands,
) {
    for request in requests.read() {
        let Ok((shooter, transform)) = shooters.get(request.shooter) else {
            continue;
        };
        let origin = transform.translation().xy();
        let Some(target) = select_target(
            TargetingMode::Closest,
            origin,
            enemies
                .iter()
                .filter(|(_, _, health)| !health.is_dead())
                .map(|(entity, position, _)| (entity, position.translation().xy(), None)),
        ) else {
            continue;
        };
        let Ok((_, target_transform, _)) = enemies.get(target) else {
            continue;
        };

        let direction = (target_transform.translation().xy() - origin).normalize_or_zero();
        commands.spawn((
            Name::new("Bullet"),
            Bullet {
                damage: shooter.damage,
            },
            Sprite::from_color(BULLET_COLOR, Vec2::splat(BULLET_RADIUS * 2.0)),
            Transform::from_xyz(origin.x, origin.y, Z_PROJECTILE),
            Lifetime::from_secs(BULLET_LIFETIME_SECS),
            DespawnOnExit(GameState::InGame),
            RigidBody::Kinematic,
            Collider::circle(BULLET_RADIUS),
            Sensor,
            CollisionLayers::new(CollisionLayer::Hitbox, CollisionLayer::Enemy),
            CollisionEventsEnabled,
            CollidingEntities::default(),
            LinearVelocity(direction * shooter.speed),
        ));
    }
}

/// Damages the first live enemy each bullet overlaps, then removes the bullet.
pub(super) fn handle_bullet_hits(
    bullets: Query<(Entity, &Bullet, &CollidingEntities)>,
    enemies: Query<&Health, With<Enemy>>,
    mut damage: MessageWriter<DealDamage>,
    mut commands: Commands,
) {
    for (entity, bullet, colliding) in &bullets {
        for &hit in &colliding.0 {
            let Ok(health) = enemies.get(hit) else {
                continue;
            };
            if health.is_dead() {
                continue;
            }
            damage.write(DealDamage {
                target: hit,
                amount: bullet.damage,
            });
            commands.entity(entity).despawn();
            break;
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::testing::{assert_entity_count, create_test_app, spawn_at, tick};
    use bevy::ecs::entity::EntityHashSet;
    use pretty_assertions::assert_eq;

    #[derive(Resource, Default)]
    struct DamageLog(Vec<DealDamage>);

    fn record_damage(mut requests: MessageReader<DealDamage>, mut log: ResMut<DamageLog>) {
        log.0.extend(requests.read().copied());
    }

    fn create_bullet_test_app() -> App {
        let mut app = create_test_app();
        app.add_message::<FireBullet>()
            .add_message::<DealDamage>()
            .init_resource::<DamageLog>();
        app.add_systems(
            Update,
            (fire_bullets, handle_bullet_hits, record_damage).chain(),
        );
        app
    }

    fn spawn_enemy(app: &mut App, position: Vec2) -> Entity {
        let enemy = spawn_at(app.world_mut(), position);
        app.world_mut()
            .entity_mut(enemy)
            .insert((Enemy, Health::new(100.0)));
        enemy
    }

    fn spawn_shooter(app: &mut App) -> Entity {
        let shooter = spawn_at(app.world_mut(), Vec2::ZERO);
        app.world_mut()
            .entity_mut(shooter)
            .insert(Shooter::default());
        shooter
    }

    #[test]
    fn bullet_aims_at_closest_enemy() {
        let mut app = create_bullet_test_app();
        let shooter = spawn_shooter(&mut app);
        spawn_enemy(&mut app, Vec2::new(10.0, 0.0));
        spawn_enemy(&mut app, Vec2::new(0.0, -4.0));

        app.world_mut().write_message(FireBullet { shooter });
        tick(&mut app);

        let mut query = app
            .world_mut()
            .query_filtered::<&LinearVelocity, With<Bullet>>();
        let velocity = query.single(app.world()).unwrap();
        assert_eq!(velocity.0, Vec2::new(0.0, -DEFAULT_BULLET_SPEED));
    }

    #[test]
    fn no_enemies_no_bullet() {
        let mut app = create_bullet_test_app();
        let shooter = spawn_shooter(&mut app);

        app.world_mut().write_message(FireBullet { shooter });
        tick(&mut app);

        assert_entity_count::<With<Bullet>>(&mut app, 0);
    }

    #[test]
    fn dead_enemies_are_not_aimed_at() {
        let mut app = create_bullet_test_app();
        let shooter = spawn_shooter(&mut app);
        let dead = spawn_enemy(&mut app, Vec2::new(1.0, 0.0));
        app.world_mut().get_mut::<Health>(dead).unwrap().kill();

        app.world_mut().write_message(FireBullet { shooter });
        tick(&mut app);

        assert_entity_count::<With<Bullet>>(&mut app, 0);
    }

    #[test]
    fn bullet_overlap_damages_enemy_once() {
        let mut app = create_bullet_test_app();
        let enemy = spawn_enemy(&mut app, Vec2::new(1.0, 0.0));
        let bullet = app
            .world_mut()
            .spawn((
                Bullet { damage: 10.0 },
                CollidingEntities([enemy].into_iter().collect::<EntityHashSet>()),
            ))
            .id();

        tick(&mut app);
        tick(&mut app);

        assert_eq!(
            app.world().resource::<DamageLog>().0,
            vec![DealDamage {
                target: enemy,
                amount: 10.0
            }]
        );
        assert!(app.world().get_entity(bullet).is_err());
    }
}
