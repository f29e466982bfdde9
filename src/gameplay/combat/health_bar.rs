//! Health bars: spawned with `Health`, refreshed by `HealthChanged`.

use bevy::prelude::*;

use crate::gameplay::health::{Health, HealthChanged};

// === Constants ===

const HEALTH_BAR_BG_COLOR: Color = Color::srgb(0.8, 0.1, 0.1);
const HEALTH_BAR_FILL_COLOR: Color = Color::srgb(0.1, 0.9, 0.1);

// === Components ===

/// Marker: red background bar (full width, shows "missing" HP).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarBackground;

/// Marker: green foreground bar (scales with the health fraction).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarFill;

/// Sizing of the bar drawn above an entity with `Health`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarConfig {
    pub width: f32,
    pub height: f32,
    pub y_offset: f32,
}

// === Pure Functions ===

/// Fill scale and x offset that keep the bar left-aligned at `fraction`.
#[must_use]
pub fn fill_layout(width: f32, fraction: f32) -> (f32, f32) {
    let ratio = fraction.clamp(0.0, 1.0);
    (ratio, -width * (1.0 - ratio) / 2.0)
}

// === Observers ===

/// Spawns health bar children when `Health` is added to an entity with `HealthBarConfig`.
fn spawn_health_bars(
    add: On<Add, Health>,
    configs: Query<(&HealthBarConfig, &Health)>,
    mut commands: Commands,
) {
    let Ok((config, health)) = configs.get(add.entity) else {
        return;
    };
    let (scale, offset) = fill_layout(config.width, health.fraction());
    commands.entity(add.entity).with_children(|parent| {
        parent.spawn((
            Name::new("Health Bar BG"),
            Sprite::from_color(HEALTH_BAR_BG_COLOR, Vec2::new(config.width, config.height)),
            Transform::from_xyz(0.0, config.y_offset, 1.0),
            HealthBarBackground,
        ));
        parent.spawn((
            Name::new("Health Bar Fill"),
            Sprite::from_color(
                HEALTH_BAR_FILL_COLOR,
                Vec2::new(config.width, config.height),
            ),
            Transform::from_xyz(offset, config.y_offset, 1.1)
                .with_scale(Vec3::new(scale, 1.0, 1.0)),
            HealthBarFill,
        ));
    });
}

fn update_health_bar(
    changed: On<HealthChanged>,
    owners: Query<(&Children, &HealthBarConfig)>,
    mut fills: Query<&mut Transform, With<HealthBarFill>>,
) {
    let Ok((children, config)) = owners.get(changed.entity) else {
        return;
    };
    let (scale, offset) = fill_layout(config.width, changed.fraction);
    for child in children.iter() {
        if let Ok(mut transform) = fills.get_mut(child) {
            transform.scale.x = scale;
            transform.translation.x = offset;
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<HealthBarBackground>()
        .register_type::<HealthBarFill>()
        .register_type::<HealthBarConfig>();

    app.add_observer(spawn_health_bars)
        .add_observer(update_health_bar);
}
