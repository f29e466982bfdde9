//! `vleue_navigator` navmesh setup: a fixed outer boundary with tower colliders cut out.

use avian2d::prelude::*;
use bevy::prelude::*;
use vleue_navigator::prelude::*;

use crate::screens::GameState;

/// Clearance kept between enemy paths and obstacle edges.
pub const NAV_AGENT_RADIUS: f32 = 0.6;

/// Marker: this entity's `Collider` is a navmesh obstacle.
/// Add to towers. Do NOT add to enemies (dynamic) or bullets (kinematic).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NavObstacle;

/// Corners of an axis-aligned rectangle centered on the origin, counter-clockwise.
#[must_use]
pub fn playfield_outline(half_extents: Vec2) -> [Vec2; 4] {
    [
        Vec2::new(-half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, half_extents.y),
        Vec2::new(-half_extents.x, half_extents.y),
    ]
}

/// Spawn the navmesh covering the playfield. Rebuilt whenever a `NavObstacle` changes.
pub fn spawn_navmesh(commands: &mut Commands, half_extents: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Navmesh"),
            NavMeshSettings {
                fixed: Triangulation::from_outer_edges(&playfield_outline(half_extents)),
                agent_radius: NAV_AGENT_RADIUS,
                ..default()
            },
            NavMeshUpdateMode::Direct,
            Transform::default(),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

/// Strip `NavObstacle` markers before `DespawnOnExit` batch-despawns towers, so
/// the updater does not queue a rebuild for a navmesh that is about to vanish.
fn strip_nav_obstacles_before_despawn(
    mut commands: Commands,
    obstacles: Query<Entity, With<NavObstacle>>,
) {
    for entity in &obstacles {
        commands.entity(entity).remove::<NavObstacle>();
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<NavObstacle>();
    app.add_plugins((
        VleueNavigatorPlugin,
        NavmeshUpdaterPlugin::<Collider, NavObstacle>::default(),
    ));

    app.add_systems(
        OnExit(GameState::InGame),
        strip_nav_obstacles_before_despawn,
    );
}
