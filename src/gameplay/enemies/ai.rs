//! Enemy AI: keep walking toward the assigned target.

use bevy::prelude::*;

/// Distance to the destination at which an agent stops by default.
pub const DEFAULT_STOPPING_DISTANCE: f32 = 0.6;

/// Entity this enemy walks toward. May refer to an entity that no longer exists.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ChaseTarget(pub Option<Entity>);

/// Navigation agent: the destination the path follower heads for.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// World units per second.
    pub speed: f32,
    /// Stop once this close to the final waypoint.
    pub stopping_distance: f32,
    destination: Option<Vec2>,
}

impl NavAgent {
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self {
            speed,
            stopping_distance: DEFAULT_STOPPING_DISTANCE,
            destination: None,
        }
    }

    #[must_use]
    pub const fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub const fn set_destination(&mut self, destination: Vec2) {
        self.destination = Some(destination);
    }

    pub const fn clear_destination(&mut self) {
        self.destination = None;
    }
}

/// Point every agent with a live chase target at that target's current position.
/// A missing or despawned target leaves the last destination in place.
/// Runs in `GameSet::Ai`.
pub(super) fn chase_target(
    mut agents: Query<(&ChaseTarget, &mut NavAgent)>,
    targets: Query<&GlobalTransform>,
) {
    for (chase, mut agent) in &mut agents {
        let Some(target) = chase.0 else {
            continue;
        };
        let Ok(target_transform) = targets.get(target) else {
            continue;
        };
        let position = target_transform.translation().xy();
        if agent.destination() != Some(position) {
            agent.set_destination(position);
        }
    }
}
