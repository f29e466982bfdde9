//! Combat: tower projectiles, manual bullets, and health bars.

mod bullet;
mod health_bar;
mod projectile;

use bevy::prelude::*;

pub use bullet::{BULLET_LIFETIME_SECS, Bullet, FireBullet, Shooter};
pub use health_bar::{HealthBarBackground, HealthBarConfig, HealthBarFill};
pub use projectile::{
    HIT_DISTANCE, LerpProjectile, PROJECTILE_LIFETIME_SECS, Projectile, spawn_lerp_projectile,
    spawn_projectile, step_homing,
};

use crate::{GameSet, gameplay_running};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Projectile>()
        .register_type::<LerpProjectile>()
        .register_type::<Shooter>()
        .register_type::<Bullet>()
        .add_message::<FireBullet>();

    health_bar::plugin(app);

    // Fire, then move, then resolve bullet overlaps from the last physics step.
    app.add_systems(
        Update,
        (
            bullet::fire_bullets,
            projectile::move_projectiles,
            projectile::move_lerp_projectiles,
            bullet::handle_bullet_hits,
        )
            .chain()
            .in_set(GameSet::Combat)
            .run_if(gameplay_running),
    );
}
