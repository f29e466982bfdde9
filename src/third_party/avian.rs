//! Avian2d physics configuration for the top-down playfield.

use avian2d::prelude::*;
use bevy::prelude::*;

/// One world unit is one meter.
pub const PHYSICS_LENGTH_UNIT: f32 = 1.0;

// === Collision Layers ===

/// Physics collision layers.
///
/// - **Body**: Solid presence. Enemies and towers block each other.
/// - **Enemy**: Tag on enemy bodies so sensors can filter for them.
/// - **Detector**: Tower range sensors.
/// - **Hitbox**: Bullets.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum CollisionLayer {
    #[default]
    Body,
    Enemy,
    Detector,
    Hitbox,
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default().with_length_unit(PHYSICS_LENGTH_UNIT));
    app.insert_resource(Gravity::ZERO);
}
