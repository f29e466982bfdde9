//! Tower defense game library.

#[cfg(feature = "dev")]
mod dev_tools;
pub mod gameplay;
pub mod screens;
#[cfg(test)]
pub mod testing;
pub mod third_party;

use bevy::prelude::*;

use crate::screens::GameState;

// === Z Layers ===

/// Ground plane, drawn behind everything.
pub const Z_GROUND: f32 = 0.0;

/// Spawn point and objective markers.
pub const Z_MARKER: f32 = 1.0;

/// Towers and their rotating heads.
pub const Z_TOWER: f32 = 2.0;

/// Enemy units.
pub const Z_ENEMY: f32 = 3.0;

/// Projectiles and bullets in flight.
pub const Z_PROJECTILE: f32 = 4.0;

/// Cosmetic hit/death effects.
pub const Z_EFFECT: f32 = 5.0;

// === System Ordering ===

/// Frame-order buckets for gameplay systems. Configured as a chain in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Key events become gameplay requests.
    Input,
    /// Wave scheduler advances and instantiates enemies.
    Spawning,
    /// Enemy destinations and tower targeting.
    Ai,
    /// Pathing and steering.
    Movement,
    /// Firing, projectile flight, bullet hits.
    Combat,
    /// Damage and repair requests are applied to `Health`.
    Damage,
    /// Timed lifetimes expire.
    Effects,
    /// Debug overlays and other visual feedback.
    Ui,
}

/// Run condition: true while the game is in `GameState::InGame`.
#[must_use]
pub fn gameplay_running(state: Option<Res<State<GameState>>>) -> bool {
    state.is_some_and(|state| *state.get() == GameState::InGame)
}

/// Root plugin: all gameplay plus physics and navigation.
pub fn plugin(app: &mut App) {
    app.add_plugins((game_plugin, third_party::plugin));

    #[cfg(feature = "dev")]
    app.add_plugins(dev_tools::plugin);
}

/// States, frame ordering, and gameplay, without physics or navigation plugins.
/// Headless tests drive the game through this.
pub fn game_plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameSet::Input,
            GameSet::Spawning,
            GameSet::Ai,
            GameSet::Movement,
            GameSet::Combat,
            GameSet::Damage,
            GameSet::Effects,
            GameSet::Ui,
        )
            .chain(),
    );

    app.add_plugins((screens::plugin, gameplay::plugin));
}
