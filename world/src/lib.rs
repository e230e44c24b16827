#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lumina.

use std::time::Duration;

use lumina_core::{
    tuning::AvatarTuning, Avatar, Bounds, Collectible, CollectibleId, Command, DefeatCause, Enemy,
    EnemyId, Event, LevelIndex, Phase, Pickup, Wall,
};
use tracing::{debug, info};

/// Running totals for the level in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    score: u32,
    runes: u32,
    orbs: u32,
}

impl Progress {
    /// Score accumulated on the current level.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Runes picked up on the current level.
    #[must_use]
    pub const fn runes(&self) -> u32 {
        self.runes
    }

    /// Orbs picked up on the current level.
    #[must_use]
    pub const fn orbs(&self) -> u32 {
        self.orbs
    }
}

/// Represents the authoritative Lumina world state.
#[derive(Clone, Debug)]
pub struct World {
    phase: Phase,
    level_index: LevelIndex,
    bounds: Bounds,
    walls: Vec<Wall>,
    enemies: Vec<Enemy>,
    collectibles: Vec<Collectible>,
    avatar: Avatar,
    progress: Progress,
    defeat_cause: Option<DefeatCause>,
    tick_index: u64,
    elapsed: Duration,
}

impl World {
    /// Creates an empty world waiting for the cold start.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Init,
            level_index: LevelIndex::FIRST,
            bounds: Bounds::default(),
            walls: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            avatar: Avatar::spawn(&AvatarTuning::default()),
            progress: Progress::default(),
            defeat_cause: None,
            tick_index: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }

    fn collectible_mut(&mut self, collectible: CollectibleId) -> Option<&mut Collectible> {
        self.collectibles
            .iter_mut()
            .find(|candidate| candidate.id == collectible)
    }

    fn enter(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        let from = self.phase;
        self.phase = phase;
        if phase == Phase::Playing {
            self.defeat_cause = None;
        }
        debug!(?from, to = ?phase, "phase changed");
        out_events.push(Event::PhaseChanged { from, to: phase });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Simulation commands are ignored outside of [`Phase::Playing`], so the first
/// terminal command applied during a tick settles its outcome.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel {
            index,
            level,
            avatar,
        } => {
            world.level_index = index;
            world.bounds = level.bounds;
            world.walls = level.walls;
            world.enemies = level.enemies;
            world.collectibles = level.collectibles;
            world.avatar = avatar;
            world.progress = Progress::default();
            world.defeat_cause = None;
            world.tick_index = 0;
            world.elapsed = Duration::ZERO;
            info!(
                level = index.get(),
                walls = world.walls.len(),
                enemies = world.enemies.len(),
                collectibles = world.collectibles.len(),
                "level loaded"
            );
            out_events.push(Event::LevelLoaded {
                index,
                enemies: world.enemies.len(),
                collectibles: world.collectibles.len(),
            });
        }
        Command::SetPhase { phase } => {
            if world.phase.can_transition_to(phase) {
                world.enter(phase, out_events);
            } else {
                debug!(from = ?world.phase, requested = ?phase, "phase transition rejected");
                out_events.push(Event::PhaseTransitionRejected {
                    from: world.phase,
                    requested: phase,
                });
            }
        }
        _ if !world.phase.is_simulating() => {}
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                tick: world.tick_index,
            });
        }
        Command::DriveAvatar {
            position,
            velocity,
            dash,
        } => {
            let from = world.avatar.bounds.center();
            world.avatar.bounds = world.avatar.bounds.with_position(position);
            world.avatar.velocity = velocity;
            world.avatar.dash = dash;
            out_events.push(Event::AvatarMoved {
                from,
                to: world.avatar.bounds.center(),
                dashing: dash.is_dashing(),
            });
            if dash.is_dashing() {
                out_events.push(Event::DashStarted { center: from });
            }
        }
        Command::BurnLight { flicker, decay } => {
            world.avatar.light.burn(flicker, decay);
        }
        Command::MoveEnemy {
            enemy,
            position,
            heading,
            pursuing,
        } => {
            if let Some(shadow) = world.enemy_mut(enemy) {
                if !shadow.active {
                    return;
                }
                shadow.velocity = position - shadow.bounds.position();
                shadow.bounds = shadow.bounds.with_position(position);
                shadow.heading = heading;
                out_events.push(Event::EnemyMoved {
                    enemy,
                    center: shadow.bounds.center(),
                    pursuing,
                });
            }
        }
        Command::Collect {
            collectible,
            reward,
        } => {
            let Some(item) = world.collectible_mut(collectible) else {
                return;
            };
            let Some(pickup) = item.kind.mark_collected() else {
                return;
            };
            let origin = item.bounds.position();
            let center = item.bounds.center();

            match pickup {
                Pickup::Orb => {
                    world.avatar.light.replenish(reward.light);
                    world.progress.orbs = world.progress.orbs.saturating_add(1);
                }
                Pickup::Rune => {
                    world.progress.runes = world.progress.runes.saturating_add(1);
                }
            }
            world.progress.score = world.progress.score.saturating_add(reward.score);
            debug!(
                collectible = collectible.get(),
                ?pickup,
                score = world.progress.score,
                "collectible picked up"
            );
            out_events.push(Event::Collected {
                collectible,
                pickup,
                origin,
                center,
            });
        }
        Command::Defeat { cause } => {
            world.defeat_cause = Some(cause);
            info!(
                ?cause,
                level = world.level_index.get(),
                score = world.progress.score,
                "avatar defeated"
            );
            out_events.push(Event::AvatarDefeated { cause });
            world.enter(Phase::Defeat, out_events);
        }
        Command::Escape => {
            info!(
                level = world.level_index.get(),
                score = world.progress.score,
                "level completed"
            );
            out_events.push(Event::LevelCompleted {
                index: world.level_index,
            });
            world.enter(Phase::Victory, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Progress, World};
    use lumina_core::{
        runes_collected as count_runes, Avatar, Bounds, Collectible, DefeatCause, Enemy,
        LevelIndex, Phase, Wall,
    };

    /// Top-level phase currently active.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Index of the loaded level.
    #[must_use]
    pub fn level_index(world: &World) -> LevelIndex {
        world.level_index
    }

    /// Extent of the loaded level.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.bounds
    }

    /// Provides read-only access to the avatar.
    #[must_use]
    pub fn avatar(world: &World) -> &Avatar {
        &world.avatar
    }

    /// Static obstacles of the loaded level, border included.
    #[must_use]
    pub fn walls(world: &World) -> &[Wall] {
        &world.walls
    }

    /// Shadows of the loaded level.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Orbs, runes and the portal of the loaded level.
    #[must_use]
    pub fn collectibles(world: &World) -> &[Collectible] {
        &world.collectibles
    }

    /// Running totals for the level in progress.
    #[must_use]
    pub fn progress(world: &World) -> Progress {
        world.progress
    }

    /// Reason the last level ended in defeat, while the world remains defeated.
    #[must_use]
    pub fn defeat_cause(world: &World) -> Option<DefeatCause> {
        world.defeat_cause
    }

    /// Number of ticks simulated on the loaded level.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Simulated time accumulated on the loaded level.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Counts collected runes across the collectibles, recomputed on every call.
    #[must_use]
    pub fn runes_collected(world: &World) -> usize {
        count_runes(&world.collectibles)
    }
}
