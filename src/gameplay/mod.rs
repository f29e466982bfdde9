//! Gameplay domain plugins: level, waves, enemies, towers, combat, and damage.

pub mod combat;
pub mod effects;
pub mod enemies;
pub mod health;
pub mod input;
pub mod level;
pub mod towers;
pub mod waves;

use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.add_plugins((
        effects::plugin,
        health::plugin,
        combat::plugin,
        enemies::plugin,
        towers::plugin,
        waves::plugin,
        input::plugin,
        level::plugin,
    ));
}
