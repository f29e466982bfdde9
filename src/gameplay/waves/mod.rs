//! Wave spawning: fixed-size batches of enemies on a timed schedule.

mod spawner;

use bevy::prelude::*;
use rand::Rng;

pub use spawner::{CLEAR_POLL_INTERVAL_SECS, EnemyRoster, EnemySpawner, SpawnerAction, WavePhase};

use crate::gameplay::enemies::{Enemy, EnemyArchetypes, Objective, spawn_enemy};
use crate::screens::GameState;
use crate::{GameSet, gameplay_running};

// === Constants ===

pub const DEFAULT_ENEMIES_PER_WAVE: u32 = 10;
pub const DEFAULT_TIME_BETWEEN_SPAWNS: f32 = 1.0;
pub const DEFAULT_TIME_BETWEEN_WAVES: f32 = 5.0;
pub const DEFAULT_WAVE_HEALTH_MULTIPLIER: f32 = 1.2;

/// Extra enemies added per wave after the first.
pub const ENEMIES_ADDED_PER_WAVE: u32 = 2;

// === Config ===

/// Tunables for the wave schedule. Copied into the `EnemySpawner` on entering gameplay.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct WaveConfig {
    pub enemies_per_wave: u32,
    pub time_between_spawns: f32,
    pub time_between_waves: f32,
    pub wave_health_multiplier: f32,
    /// Multiply spawned enemies' max health by the wave multiplier.
    pub apply_wave_health_scaling: bool,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            enemies_per_wave: DEFAULT_ENEMIES_PER_WAVE,
            time_between_spawns: DEFAULT_TIME_BETWEEN_SPAWNS,
            time_between_waves: DEFAULT_TIME_BETWEEN_WAVES,
            wave_health_multiplier: DEFAULT_WAVE_HEALTH_MULTIPLIER,
            apply_wave_health_scaling: false,
        }
    }
}

// === Pure Functions ===

/// Enemies in wave `wave` (1-based): `base + 2 * (wave - 1)`.
#[must_use]
pub const fn enemies_in_wave(base: u32, wave: u32) -> u32 {
    base.saturating_add(ENEMIES_ADDED_PER_WAVE.saturating_mul(wave.saturating_sub(1)))
}

/// Health multiplier for wave `wave` (1-based): `multiplier ^ (wave - 1)`.
#[must_use]
pub fn wave_health_multiplier(multiplier: f32, wave: u32) -> f32 {
    let exponent = i32::try_from(wave.saturating_sub(1)).unwrap_or(i32::MAX);
    multiplier.powi(exponent)
}

// === Components & Messages ===

/// Top-level location enemies may appear at. One is picked at random per spawn.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint;

/// Request the next wave now. Ignored while a wave is still spawning.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct StartNextWave;

// === Systems ===

/// Fresh scheduler and roster each time gameplay starts, then request wave 1.
fn start_waves(
    config: Res<WaveConfig>,
    mut commands: Commands,
    mut next_wave: MessageWriter<StartNextWave>,
) {
    commands.insert_resource(EnemySpawner::new(*config));
    commands.insert_resource(EnemyRoster::default());
    next_wave.write(StartNextWave);
}

fn stop_waves(mut spawner: ResMut<EnemySpawner>, mut roster: ResMut<EnemyRoster>) {
    spawner.stop();
    roster.clear();
}

/// Advance the scheduler one frame and carry out what it asks for.
fn run_spawner(
    time: Res<Time>,
    mut requests: MessageReader<StartNextWave>,
    mut spawner: ResMut<EnemySpawner>,
    mut roster: ResMut<EnemyRoster>,
    enemies: Query<(), With<Enemy>>,
    archetypes: Res<EnemyArchetypes>,
    spawn_points: Query<&Transform, With<SpawnPoint>>,
    objective: Query<Entity, With<Objective>>,
    mut commands: Commands,
) {
    let mut actions = spawner.tick(time.delta(), &mut roster, |e| enemies.contains(e));
    // Requests come after the tick so a wave started here waits a full delay for its second spawn
    for _ in requests.read() {
        actions.extend(spawner.start_next_wave());
    }

    let scaling = spawner.config.apply_wave_health_scaling;
    let points: Vec<Vec2> = spawn_points
        .iter()
        .map(|transform| transform.translation.xy())
        .collect();
    let chase = objective.iter().next();

    for action in actions {
        match action {
            SpawnerAction::WaveStarted { wave, enemy_count } => {
                info!("Wave {wave} started with {enemy_count} enemies");
            }
            SpawnerAction::WaveCleared { wave } => {
                info!("Wave {wave} cleared");
            }
            SpawnerAction::SpawnEnemy {
                wave,
                health_multiplier,
            } => {
                if archetypes.0.is_empty() || points.is_empty() {
                    debug!("Skipping wave {wave} spawn: no archetypes or spawn points");
                    continue;
                }
                let mut rng = rand::rng();
                let archetype = &archetypes.0[rng.random_range(0..archetypes.0.len())];
                let position = points[rng.random_range(0..points.len())];

                let max_health = if scaling {
                    archetype.max_health * health_multiplier
                } else {
                    archetype.max_health
                };
                debug!(
                    "Spawning {} for wave {wave} (health multiplier {health_multiplier:.2})",
                    archetype.name
                );
                let enemy = spawn_enemy(&mut commands, archetype, position, max_health, chase);
                roster.add(enemy);
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<WaveConfig>()
        .register_type::<EnemySpawner>()
        .register_type::<EnemyRoster>()
        .register_type::<SpawnPoint>()
        .init_resource::<WaveConfig>()
        .init_resource::<EnemySpawner>()
        .init_resource::<EnemyRoster>()
        .add_message::<StartNextWave>();

    app.add_systems(OnEnter(GameState::InGame), start_waves);
    app.add_systems(OnExit(GameState::InGame), stop_waves);

    app.add_systems(
        Update,
        run_spawner
            .in_set(GameSet::Spawning)
            .run_if(gameplay_running),
    );
}
