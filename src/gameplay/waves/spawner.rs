//! Wave scheduler state machine and the live-enemy roster.
//!
//! The scheduler owns at most one spawning sequence and at most one clear
//! watcher. Each pending wait advances once per [`EnemySpawner::tick`]; a wait
//! that completes resumes its sequence in the same frame, and a wait created
//! during a frame starts counting on the next one.

use std::time::Duration;

use bevy::prelude::*;

use super::{WaveConfig, enemies_in_wave, wave_health_multiplier};

/// Seconds between roster checks while waiting for a wave to be cleared.
pub const CLEAR_POLL_INTERVAL_SECS: f32 = 1.0;

/// Coarse view of the scheduler, for HUDs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum WavePhase {
    Idle,
    Spawning,
    WaitingForClear,
    WaitingForWaveGap,
}

/// Work the caller must carry out after a scheduler call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnerAction {
    WaveStarted { wave: u32, enemy_count: u32 },
    /// Instantiate one enemy. The multiplier is informational unless scaling is enabled.
    SpawnEnemy { wave: u32, health_multiplier: f32 },
    WaveCleared { wave: u32 },
}

#[derive(Debug, Clone, Reflect)]
struct SpawnSequence {
    wave: u32,
    remaining: u32,
    delay: Timer,
}

#[derive(Debug, Clone, Reflect)]
enum WaveWatcher {
    /// Roster check due this frame.
    Check { wave: u32 },
    /// Enemies were alive at the last check; look again when `poll` finishes.
    AwaitingClear { wave: u32, poll: Timer },
    /// Wave cleared; the next one starts when the gap finishes.
    WaveGap(Timer),
}

/// Fixed-schedule wave generator.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct EnemySpawner {
    pub config: WaveConfig,
    current_wave: u32,
    sequence: Option<SpawnSequence>,
    watcher: Option<WaveWatcher>,
}

impl Default for EnemySpawner {
    fn default() -> Self {
        Self::new(WaveConfig::default())
    }
}

impl EnemySpawner {
    #[must_use]
    pub const fn new(config: WaveConfig) -> Self {
        Self {
            config,
            current_wave: 0,
            sequence: None,
            watcher: None,
        }
    }

    /// The most recently started wave (0 before the first).
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    #[must_use]
    pub const fn is_spawning(&self) -> bool {
        self.sequence.is_some()
    }

    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        if self.sequence.is_some() {
            return WavePhase::Spawning;
        }
        match self.watcher {
            Some(WaveWatcher::Check { .. } | WaveWatcher::AwaitingClear { .. }) => {
                WavePhase::WaitingForClear
            }
            Some(WaveWatcher::WaveGap(_)) => WavePhase::WaitingForWaveGap,
            None => WavePhase::Idle,
        }
    }

    /// Start the next wave now. No-op (empty result) while a wave is still spawning.
    /// The first enemy of the wave is due immediately.
    pub fn start_next_wave(&mut self) -> Vec<SpawnerAction> {
        let mut actions = Vec::new();
        self.start_wave(&mut actions);
        actions
    }

    /// Cancel the spawning sequence and the clear watcher. The wave counter is kept.
    pub fn stop(&mut self) {
        self.sequence = None;
        self.watcher = None;
    }

    /// Advance every pending wait by `delta` and resume whatever finished.
    ///
    /// Clear checks prune `roster` entries for which `is_alive` is false.
    pub fn tick(
        &mut self,
        delta: Duration,
        roster: &mut EnemyRoster,
        is_alive: impl Fn(Entity) -> bool,
    ) -> Vec<SpawnerAction> {
        let mut actions = Vec::new();

        let sequence_due = self
            .sequence
            .as_mut()
            .is_some_and(|sequence| sequence.delay.tick(delta).just_finished());
        let watcher_due = match &mut self.watcher {
            Some(WaveWatcher::Check { .. }) => true,
            Some(WaveWatcher::AwaitingClear { poll, .. }) => poll.tick(delta).just_finished(),
            Some(WaveWatcher::WaveGap(gap)) => gap.tick(delta).just_finished(),
            None => false,
        };

        if watcher_due {
            self.resume_watcher(roster, &is_alive, &mut actions);
        }
        if sequence_due {
            self.resume_sequence(&mut actions);
        }
        // A sequence that finished this frame checks the roster right away.
        if matches!(self.watcher, Some(WaveWatcher::Check { .. })) {
            self.resume_watcher(roster, &is_alive, &mut actions);
        }

        actions
    }

    fn start_wave(&mut self, actions: &mut Vec<SpawnerAction>) -> bool {
        if self.sequence.is_some() {
            return false;
        }
        self.current_wave += 1;
        let wave = self.current_wave;
        let enemy_count = enemies_in_wave(self.config.enemies_per_wave, wave);
        actions.push(SpawnerAction::WaveStarted { wave, enemy_count });

        self.sequence = Some(SpawnSequence {
            wave,
            remaining: enemy_count,
            delay: Timer::from_seconds(self.config.time_between_spawns, TimerMode::Once),
        });
        self.resume_sequence(actions);
        true
    }

    fn resume_sequence(&mut self, actions: &mut Vec<SpawnerAction>) {
        let Some(sequence) = self.sequence.as_mut() else {
            return;
        };
        if sequence.remaining == 0 {
            let wave = sequence.wave;
            self.sequence = None;
            self.watcher = Some(WaveWatcher::Check { wave });
            return;
        }

        sequence.remaining -= 1;
        actions.push(SpawnerAction::SpawnEnemy {
            wave: sequence.wave,
            health_multiplier: wave_health_multiplier(
                self.config.wave_health_multiplier,
                sequence.wave,
            ),
        });
        sequence.delay = Timer::from_seconds(self.config.time_between_spawns, TimerMode::Once);
    }

    fn resume_watcher(
        &mut self,
        roster: &mut EnemyRoster,
        is_alive: &impl Fn(Entity) -> bool,
        actions: &mut Vec<SpawnerAction>,
    ) {
        match self.watcher.take() {
            Some(WaveWatcher::Check { wave } | WaveWatcher::AwaitingClear { wave, .. }) => {
                if roster.is_empty() {
                    actions.push(SpawnerAction::WaveCleared { wave });
                    self.watcher = Some(WaveWatcher::WaveGap(Timer::from_seconds(
                        self.config.time_between_waves,
                        TimerMode::Once,
                    )));
                } else {
                    roster.prune(is_alive);
                    self.watcher = Some(WaveWatcher::AwaitingClear {
                        wave,
                        poll: Timer::from_seconds(CLEAR_POLL_INTERVAL_SECS, TimerMode::Once),
                    });
                }
            }
            Some(WaveWatcher::WaveGap(_)) => {
                self.start_wave(actions);
            }
            None => {}
        }
    }
}

/// Enemies spawned by the scheduler that have not been removed yet.
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct EnemyRoster {
    enemies: Vec<Entity>,
}

impl EnemyRoster {
    pub fn add(&mut self, enemy: Entity) {
        self.enemies.push(enemy);
    }

    /// Remove the first occurrence of `enemy`. Returns whether it was present.
    pub fn remove(&mut self, enemy: Entity) -> bool {
        let Some(index) = self.enemies.iter().position(|&e| e == enemy) else {
            return false;
        };
        self.enemies.remove(index);
        true
    }

    /// Drop entries for which `is_alive` is false.
    pub fn prune(&mut self, is_alive: impl Fn(Entity) -> bool) {
        self.enemies.retain(|&enemy| is_alive(enemy));
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    #[must_use]
    pub fn contains(&self, enemy: Entity) -> bool {
        self.enemies.contains(&enemy)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.enemies.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.enemies.iter().copied()
    }
}
