//! Tower targeting: in-range candidate set, best-target selection, head rotation.

use avian2d::prelude::CollidingEntities;
use bevy::prelude::*;

use super::Tower;
use super::firing::{FiringDisabled, TowerFiring};
use crate::gameplay::enemies::Enemy;
use crate::gameplay::health::Health;

// === Components ===

/// Comparator used to pick one candidate out of the in-range set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum TargetingMode {
    #[default]
    Closest,
    Furthest,
    /// Highest health fraction.
    Strongest,
    /// Lowest health fraction.
    Weakest,
}

impl TargetingMode {
    /// Whether candidates are scored by distance (otherwise by health fraction).
    #[must_use]
    pub const fn scores_distance(self) -> bool {
        matches!(self, Self::Closest | Self::Furthest)
    }

    /// Strict comparison: a candidate only replaces the best on a real improvement.
    #[must_use]
    pub fn prefers(self, candidate: f32, best: f32) -> bool {
        match self {
            Self::Closest | Self::Weakest => candidate < best,
            Self::Furthest | Self::Strongest => candidate > best,
        }
    }
}

/// Enemies inside a tower's detection radius, in the order they entered.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct InRange(Vec<Entity>);

impl InRange {
    /// Record an entering candidate. Returns false if it was already present.
    pub fn enter(&mut self, entity: Entity) -> bool {
        if self.0.contains(&entity) {
            return false;
        }
        self.0.push(entity);
        true
    }

    /// Forget an exiting candidate. Returns false if it was not present.
    pub fn exit(&mut self, entity: Entity) -> bool {
        let Some(index) = self.0.iter().position(|&e| e == entity) else {
            return false;
        };
        self.0.remove(index);
        true
    }

    pub fn retain(&mut self, keep: impl FnMut(&Entity) -> bool) {
        self.0.retain(keep);
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }
}

/// The candidate a tower is aiming at. Always a member of its `InRange` set.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CurrentTarget(pub Option<Entity>);

/// Child sensor whose contacts feed the parent tower's `InRange`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct RangeSensor;

/// Rotating part of a tower. Faces +X at zero rotation.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TowerHead;

// === Pure Functions ===

/// Pick the best candidate for `mode`. Candidates are `(entity, position, health_fraction)`;
/// a missing health fraction scores 0. Ties keep the earliest candidate.
#[must_use]
pub fn select_target(
    mode: TargetingMode,
    origin: Vec2,
    candidates: impl IntoIterator<Item = (Entity, Vec2, Option<f32>)>,
) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, position, health_fraction) in candidates {
        let value = if mode.scores_distance() {
            origin.distance(position)
        } else {
            health_fraction.unwrap_or(0.0)
        };
        if best.is_none_or(|(_, best_value)| mode.prefers(value, best_value)) {
            best = Some((entity, value));
        }
    }
    best.map(|(entity, _)| entity)
}

/// Rotate `current` about Z toward `direction`, by at most `max_radians`.
/// `None` when the direction is zero.
#[must_use]
pub fn yaw_towards(current: Quat, direction: Vec2, max_radians: f32) -> Option<Quat> {
    if direction.length_squared() <= f32::EPSILON {
        return None;
    }
    let desired = Quat::from_rotation_z(direction.to_angle());
    Some(current.rotate_towards(desired, max_radians))
}

// === Systems ===

/// Diff each range sensor's contacts into enter/exit calls on its tower.
/// An exiting candidate that was the current target clears it.
pub(super) fn sync_in_range(
    sensors: Query<(&ChildOf, &CollidingEntities), With<RangeSensor>>,
    mut towers: Query<(&mut InRange, &mut CurrentTarget), With<Tower>>,
    enemies: Query<(), With<Enemy>>,
) {
    for (child_of, colliding) in &sensors {
        let Ok((mut in_range, mut current)) = towers.get_mut(child_of.parent()) else {
            continue;
        };

        let exited: Vec<Entity> = in_range
            .iter()
            .filter(|entity| !colliding.0.contains(entity))
            .collect();
        for entity in exited {
            in_range.exit(entity);
            if current.0 == Some(entity) {
                current.0 = None;
            }
        }

        for &entity in &colliding.0 {
            if enemies.contains(entity) && !in_range.contains(entity) {
                in_range.enter(entity);
            }
        }
    }
}

/// Drop despawned or dead candidates, then pick the best remaining one.
pub(super) fn update_targeting(
    mut towers: Query<
        (&GlobalTransform, &TowerFiring, &mut InRange, &mut CurrentTarget),
        (With<Tower>, Without<FiringDisabled>),
    >,
    candidates: Query<(&GlobalTransform, Option<&Health>)>,
) {
    for (transform, firing, mut in_range, mut current) in &mut towers {
        if in_range
            .iter()
            .any(|entity| !is_live_candidate(&candidates, entity))
        {
            in_range.retain(|&entity| is_live_candidate(&candidates, entity));
        }

        let origin = transform.translation().xy();
        let best = select_target(
            firing.targeting,
            origin,
            in_range.iter().filter_map(|entity| {
                let (position, health) = candidates.get(entity).ok()?;
                Some((
                    entity,
                    position.translation().xy(),
                    health.map(Health::fraction),
                ))
            }),
        );
        current.set_if_neq(CurrentTarget(best));
    }
}

fn is_live_candidate(
    candidates: &Query<(&GlobalTransform, Option<&Health>)>,
    entity: Entity,
) -> bool {
    candidates
        .get(entity)
        .is_ok_and(|(_, health)| !health.is_some_and(Health::is_dead))
}

/// Turn each tower head toward its tower's target at the configured rotation speed.
pub(super) fn rotate_heads(
    time: Res<Time>,
    mut heads: Query<(&ChildOf, &GlobalTransform, &mut Transform), With<TowerHead>>,
    towers: Query<(&CurrentTarget, &TowerFiring), (With<Tower>, Without<FiringDisabled>)>,
    targets: Query<&GlobalTransform, Without<TowerHead>>,
) {
    for (child_of, head_global, mut head) in &mut heads {
        let Ok((current, firing)) = towers.get(child_of.parent()) else {
            continue;
        };
        let Some(target) = current.0 else {
            continue;
        };
        let Ok(target_transform) = targets.get(target) else {
            continue;
        };

        let direction = target_transform.translation().xy() - head_global.translation().xy();
        let max_radians = firing.rotation_speed.to_radians() * time.delta_secs();
        if let Some(rotation) = yaw_towards(head.rotation, direction, max_radians) {
            head.rotation = rotation;
        }
    }
}
