#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lumina engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that the effects
//! pools and the audio sink react to. Nothing outside the world mutates
//! simulation state.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod audio;
mod entities;
mod geometry;
mod input;
pub mod tuning;

pub use audio::{AudioError, AudioSink, SilentAudio};
pub use entities::{
    runes_collected, Avatar, Collectible, CollectibleId, CollectibleKind, DashPhase, DashState,
    Enemy, EnemyId, LevelError, LevelIndex, LevelSnapshot, Light, Pickup, Rgba, Wall,
};
pub use geometry::{Bounds, Rect};
pub use input::{InputState, Key};

/// Title shown by the menu and the window caption.
pub const GAME_TITLE: &str = "LUMINA";

/// Top-level state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the user-initiated cold start.
    #[default]
    Init,
    /// Narrative intro is being revealed.
    Lore,
    /// Title menu; the simulation is idle.
    Menu,
    /// The tick pipeline runs.
    Playing,
    /// The avatar was defeated.
    Defeat,
    /// The avatar escaped through the portal.
    Victory,
}

impl Phase {
    /// Reports whether the state machine allows moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Init, Phase::Lore)
                | (Phase::Lore, Phase::Menu)
                | (Phase::Menu, Phase::Playing)
                | (Phase::Playing, Phase::Defeat)
                | (Phase::Playing, Phase::Victory)
                | (Phase::Defeat, Phase::Playing)
                | (Phase::Victory, Phase::Playing)
        )
    }

    /// Whether the phase ends a level.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Defeat | Phase::Victory)
    }

    /// Whether the tick pipeline executes in this phase.
    #[must_use]
    pub const fn is_simulating(self) -> bool {
        matches!(self, Phase::Playing)
    }
}

/// Reason a level ended in defeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefeatCause {
    /// The base light radius fell below the survival threshold.
    LightExhausted,
    /// A shadow touched the avatar outside of a dash.
    CaughtByShadow,
}

/// Reward granted by a pickup.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reward {
    /// Base light radius restored.
    pub light: f32,
    /// Score awarded.
    pub score: u32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the level snapshot and avatar wholesale and resets progress.
    LoadLevel {
        /// Index of the level being loaded.
        index: LevelIndex,
        /// Entity set produced by the level generator.
        level: LevelSnapshot,
        /// Avatar in its start-of-level state.
        avatar: Avatar,
    },
    /// Requests a top-level phase transition.
    SetPhase {
        /// Phase the world should enter.
        phase: Phase,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Commits the avatar controller's resolved motion for the tick.
    DriveAvatar {
        /// New upper-left position of the avatar.
        position: Vec2,
        /// Velocity applied this tick.
        velocity: Vec2,
        /// Dash state after advancing the ability.
        dash: DashState,
    },
    /// Derives the displayed light radius, then decays the base radius.
    BurnLight {
        /// Signed oscillation added to the base radius for display.
        flicker: f32,
        /// Amount removed from the base radius.
        decay: f32,
    },
    /// Commits one shadow's motion for the tick.
    MoveEnemy {
        /// Identifier of the shadow being moved.
        enemy: EnemyId,
        /// New upper-left position of the shadow.
        position: Vec2,
        /// Facing angle in radians.
        heading: f32,
        /// Whether the shadow is chasing the avatar.
        pursuing: bool,
    },
    /// Picks up an orb or rune and applies its reward.
    Collect {
        /// Identifier of the collectible being picked up.
        collectible: CollectibleId,
        /// Reward granted on the first pickup.
        reward: Reward,
    },
    /// Ends the level in defeat.
    Defeat {
        /// Reason the avatar was defeated.
        cause: DefeatCause,
    },
    /// Ends the level in victory through the open portal.
    Escape,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Number of ticks simulated on the current level, this one included.
        tick: u64,
    },
    /// Announces that a fresh level replaced the previous one.
    LevelLoaded {
        /// Index of the loaded level.
        index: LevelIndex,
        /// Number of shadows in the level.
        enemies: usize,
        /// Number of collectibles in the level, portal included.
        collectibles: usize,
    },
    /// Announces that the top-level phase changed.
    PhaseChanged {
        /// Phase active before the transition.
        from: Phase,
        /// Phase active after the transition.
        to: Phase,
    },
    /// Reports that a phase transition request was illegal.
    PhaseTransitionRejected {
        /// Phase that remained active.
        from: Phase,
        /// Phase that was requested.
        requested: Phase,
    },
    /// Confirms that the avatar moved.
    AvatarMoved {
        /// Avatar center before the move.
        from: Vec2,
        /// Avatar center after the move.
        to: Vec2,
        /// Whether a dash fired this tick.
        dashing: bool,
    },
    /// Announces that the dash fired.
    DashStarted {
        /// Avatar center when the dash fired.
        center: Vec2,
    },
    /// Confirms that a shadow moved.
    EnemyMoved {
        /// Identifier of the shadow that moved.
        enemy: EnemyId,
        /// Shadow center after the move.
        center: Vec2,
        /// Whether the shadow is chasing the avatar.
        pursuing: bool,
    },
    /// Confirms that a collectible was picked up.
    Collected {
        /// Identifier of the collectible.
        collectible: CollectibleId,
        /// Kind of pickup.
        pickup: Pickup,
        /// Upper-left corner of the collectible.
        origin: Vec2,
        /// Center of the collectible.
        center: Vec2,
    },
    /// Announces that the avatar was defeated.
    AvatarDefeated {
        /// Reason the avatar was defeated.
        cause: DefeatCause,
    },
    /// Announces that the avatar escaped the level.
    LevelCompleted {
        /// Index of the completed level.
        index: LevelIndex,
    },
}
