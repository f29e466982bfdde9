//! `NavMesh` pathfinding for enemies: waypoint paths around tower obstacles.

use avian2d::prelude::LinearVelocity;
use bevy::prelude::*;
use vleue_navigator::prelude::*;

use super::ai::NavAgent;

/// Seconds between periodic path recomputations. Picks up navmesh changes
/// from towers being built or destroyed.
const PATH_REFRESH_INTERVAL_SECS: f32 = 0.5;

/// A destination that moved further than this invalidates the current path.
const REPATH_DISTANCE: f32 = 0.5;

/// Distance threshold for reaching an intermediate waypoint.
const WAYPOINT_REACHED_DISTANCE: f32 = 0.2;

/// Timer controlling periodic path refresh for all agents.
/// Exposed as a resource so tests can manipulate it.
#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct PathRefreshTimer(pub Timer);

impl Default for PathRefreshTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(
            PATH_REFRESH_INTERVAL_SECS,
            TimerMode::Repeating,
        ))
    }
}

/// Waypoint path for an agent. Computed from the `NavMesh` when one is built,
/// otherwise a single waypoint at the destination.
#[derive(Component, Debug, Clone, Reflect, Default)]
#[reflect(Component)]
pub struct NavPath {
    /// World-space waypoints.
    pub waypoints: Vec<Vec2>,
    /// Index of the next waypoint to steer toward.
    pub current_index: usize,
    /// Destination this path was computed for.
    destination: Option<Vec2>,
}

impl NavPath {
    /// Replace the path with new waypoints toward `destination`.
    pub fn set(&mut self, waypoints: Vec<Vec2>, destination: Vec2) {
        self.waypoints = waypoints;
        self.current_index = 0;
        self.destination = Some(destination);
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.current_index = 0;
        self.destination = None;
    }

    #[must_use]
    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.current_index).copied()
    }

    /// The current waypoint is the destination end of the path.
    #[must_use]
    pub const fn on_last_waypoint(&self) -> bool {
        self.current_index + 1 >= self.waypoints.len()
    }

    /// Advance to the next waypoint. Returns true if there are more waypoints.
    pub fn advance(&mut self) -> bool {
        self.current_index += 1;
        self.current_index < self.waypoints.len()
    }

    /// Whether this path was computed for a different destination.
    #[must_use]
    pub fn needs_recompute(&self, destination: Vec2) -> bool {
        self.destination
            .is_none_or(|current| current.distance(destination) > REPATH_DISTANCE)
    }
}

/// Computes paths for agents whose destination changed, and for everyone on refresh.
/// Falls back to a straight line when no navmesh is built or no path exists.
/// Runs in `GameSet::Movement` before `follow_path`.
pub(super) fn compute_paths(
    time: Res<Time>,
    mut refresh_timer: ResMut<PathRefreshTimer>,
    mut agents: Query<(&NavAgent, &GlobalTransform, &mut NavPath)>,
    navmeshes: Option<Res<Assets<NavMesh>>>,
    navmesh_query: Option<Single<(&ManagedNavMesh, &NavMeshStatus)>>,
) {
    refresh_timer.0.tick(time.delta());
    let refresh_due = refresh_timer.0.just_finished();

    let navmesh = match (&navmeshes, &navmesh_query) {
        (Some(assets), Some(inner)) => {
            let (managed, status) = **inner;
            if *status == NavMeshStatus::Built {
                assets.get(managed)
            } else {
                None
            }
        }
        _ => None,
    };

    for (agent, transform, mut nav_path) in &mut agents {
        let Some(destination) = agent.destination() else {
            if !nav_path.waypoints.is_empty() {
                nav_path.clear();
            }
            continue;
        };
        if !nav_path.needs_recompute(destination) && !refresh_due {
            continue;
        }

        let from = transform.translation().xy();
        let waypoints = navmesh
            .and_then(|mesh| mesh.path(from, destination))
            .map_or_else(|| vec![destination], |path| path.path);
        nav_path.set(waypoints, destination);
    }
}

/// Steers each agent's `LinearVelocity` along its waypoints at the agent's speed.
/// Stops within `stopping_distance` of the final waypoint.
/// Runs in `GameSet::Movement`.
pub(super) fn follow_path(
    mut agents: Query<(&NavAgent, &GlobalTransform, &mut NavPath, &mut LinearVelocity)>,
) {
    for (agent, transform, mut nav_path, mut velocity) in &mut agents {
        let position = transform.translation().xy();

        let mut steer_toward = None;
        while let Some(waypoint) = nav_path.current_waypoint() {
            let reached = if nav_path.on_last_waypoint() {
                agent.stopping_distance.max(WAYPOINT_REACHED_DISTANCE)
            } else {
                WAYPOINT_REACHED_DISTANCE
            };
            if position.distance(waypoint) > reached {
                steer_toward = Some(waypoint);
                break;
            }
            if !nav_path.advance() {
                break;
            }
        }

        velocity.0 = steer_toward.map_or(Vec2::ZERO, |waypoint| {
            (waypoint - position).normalize_or_zero() * agent.speed
        });
    }
}
