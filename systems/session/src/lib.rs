#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestrator for a Lumina session.
//!
//! The session owns the world, every system and the audio sink. It exposes the
//! externally triggerable actions of the phase machine and runs the fixed-order
//! tick pipeline while the phase is [`Phase::Playing`]:
//!
//! 1. advance the clock,
//! 2. avatar motion, dash and light decay,
//! 3. shadow pursuit and contact,
//! 4. collectible pickup and the portal check,
//! 5. effect pools,
//! 6. audio dispatch.
//!
//! Every stage's commands are applied before the next stage reads the world.
//! A stage that ends the level short-circuits the remaining simulation stages,
//! so defeat always wins over a same-tick escape.

mod lore;

use std::time::Duration;

use lumina_core::{
    tuning::Tuning, AudioSink, Avatar, Command, DefeatCause, Event, InputState, LevelIndex,
    LevelSnapshot, Phase,
};
use lumina_system_avatar::AvatarController;
use lumina_system_effects::Effects;
use lumina_system_interaction::Interaction;
use lumina_system_level_generation::{derive_labeled_seed, LevelGenerator};
use lumina_system_pursuit::Pursuit;
use lumina_world::{self as world, query, World};
use tracing::{debug, info, warn};

use self::lore::LoreSequence;
pub use self::lore::LORE_LINES;

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 0x4c55_4d49_4e41;

/// Construction input of a [`Session`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Tuning tables for every subsystem.
    pub tuning: Tuning,
    /// Root of every random stream in the session.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// One running game: world state, systems and the injected audio sink.
#[derive(Debug)]
pub struct Session<A: AudioSink> {
    tuning: Tuning,
    world: World,
    avatar: AvatarController,
    pursuit: Pursuit,
    interaction: Interaction,
    effects: Effects,
    generator: LevelGenerator,
    lore: LoreSequence,
    audio: A,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl<A: AudioSink> Session<A> {
    /// Creates a session in [`Phase::Init`].
    #[must_use]
    pub fn new(config: SessionConfig, audio: A) -> Self {
        let SessionConfig { tuning, seed } = config;
        let spawn = Avatar::spawn(&tuning.avatar).bounds;
        let runes_required = usize::try_from(tuning.pickups.runes_required).unwrap_or(usize::MAX);

        Self {
            world: World::new(),
            avatar: AvatarController::new(
                tuning.avatar.clone(),
                derive_labeled_seed(seed, "avatar"),
            ),
            pursuit: Pursuit::new(tuning.pursuit.clone()),
            interaction: Interaction::new(tuning.pickups.clone()),
            effects: Effects::new(tuning.effects.clone(), derive_labeled_seed(seed, "effects")),
            generator: LevelGenerator::new(tuning.level.clone(), spawn, runes_required, seed),
            lore: LoreSequence::new(&tuning.lore),
            tuning,
            audio,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Cold start: brings the audio sink up and begins the intro.
    ///
    /// Audio failures are logged and otherwise ignored. Does nothing outside
    /// [`Phase::Init`].
    pub fn init(&mut self) {
        if self.phase() != Phase::Init {
            return;
        }
        if let Err(error) = self.audio.start() {
            warn!(%error, "audio unavailable, continuing without sound");
        }
        self.lore.rewind();
        self.begin_batch();
        self.commands.push(Command::SetPhase { phase: Phase::Lore });
        self.flush();
        info!("session initialised");
    }

    /// Advances the intro clock, leaving for the menu once the last line has
    /// been held.
    pub fn advance_lore(&mut self, dt: Duration) {
        if self.phase() != Phase::Lore {
            return;
        }
        self.lore.advance(dt);
        if self.lore.finished() {
            self.skip_lore();
        }
    }

    /// Leaves the intro immediately and prepares the level-1 backdrop.
    pub fn skip_lore(&mut self) {
        if self.phase() != Phase::Lore {
            return;
        }
        self.begin_batch();
        self.commands.push(Command::SetPhase { phase: Phase::Menu });
        if let Some(level) = self.generate(LevelIndex::FIRST) {
            let load = self.load(LevelIndex::FIRST, level);
            self.commands.push(load);
        }
        self.flush();
        self.settle_effects();
    }

    /// Starts level 1 from the menu.
    pub fn start(&mut self) {
        self.start_at(LevelIndex::FIRST);
    }

    /// Starts the provided level from the menu.
    pub fn start_at(&mut self, index: LevelIndex) {
        if self.phase() == Phase::Menu {
            self.begin(index);
        }
    }

    /// Returns to level 1 after a defeat or a victory.
    pub fn restart(&mut self) {
        if self.phase().is_terminal() {
            self.begin(LevelIndex::FIRST);
        }
    }

    /// Continues to the next, harder level after a victory.
    pub fn descend(&mut self) {
        if self.phase() == Phase::Victory {
            self.begin(query::level_index(&self.world).next());
        }
    }

    /// Starts playing a prepared level with a freshly spawned avatar.
    ///
    /// Counters, the clock and the effect pools reset. Does nothing unless
    /// the current phase may move to [`Phase::Playing`].
    pub fn play(&mut self, index: LevelIndex, level: LevelSnapshot) {
        if !self.phase().can_transition_to(Phase::Playing) {
            debug!(phase = ?self.phase(), "play ignored");
            return;
        }
        let load = self.load(index, level);
        self.begin_batch();
        self.commands.push(load);
        self.commands.push(Command::SetPhase {
            phase: Phase::Playing,
        });
        self.flush();
        self.settle_effects();
        info!(level = index.get(), "level started");
    }

    /// Per-frame entry point: runs the intro clock or one simulation tick
    /// depending on the phase.
    pub fn update(&mut self, input: &InputState, dt: Duration) {
        match self.phase() {
            Phase::Lore => self.advance_lore(dt),
            Phase::Playing => self.tick(input, dt),
            Phase::Init | Phase::Menu | Phase::Defeat | Phase::Victory => {}
        }
    }

    /// Runs one tick of the simulation pipeline.
    ///
    /// Does nothing outside [`Phase::Playing`].
    pub fn tick(&mut self, input: &InputState, dt: Duration) {
        if !self.phase().is_simulating() {
            return;
        }
        self.begin_batch();
        self.commands.push(Command::Tick { dt });
        self.flush();
        let clock = query::elapsed(&self.world);

        self.avatar.handle(
            clock,
            input,
            query::avatar(&self.world),
            query::walls(&self.world),
            query::bounds(&self.world),
            &mut self.commands,
        );
        self.flush();

        if self.phase().is_simulating() {
            self.pursuit.handle(
                clock,
                query::avatar(&self.world),
                query::enemies(&self.world),
                &mut self.commands,
            );
            self.flush();
        }

        if self.phase().is_simulating() {
            self.interaction.handle(
                query::avatar(&self.world),
                query::collectibles(&self.world),
                &mut self.commands,
            );
            self.flush();
        }

        self.effects.absorb(&self.events);
        if self.phase().is_simulating() {
            self.effects.advance();
        }
        self.dispatch_audio();
    }

    /// Current top-level phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Index of the loaded level.
    #[must_use]
    pub fn level(&self) -> LevelIndex {
        query::level_index(&self.world)
    }

    /// Score accumulated on the current level.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::progress(&self.world).score()
    }

    /// Runes collected on the current level.
    #[must_use]
    pub fn runes(&self) -> u32 {
        query::progress(&self.world).runes()
    }

    /// Runes needed to open the portal.
    #[must_use]
    pub fn runes_required(&self) -> u32 {
        self.interaction.runes_required()
    }

    /// Orbs collected on the current level.
    #[must_use]
    pub fn orbs(&self) -> u32 {
        query::progress(&self.world).orbs()
    }

    /// Base light as a percentage of the maximum.
    #[must_use]
    pub fn light_percent(&self) -> f32 {
        query::avatar(&self.world).light.percent()
    }

    /// Why the last level ended in defeat, if it did.
    #[must_use]
    pub fn defeat_cause(&self) -> Option<DefeatCause> {
        query::defeat_cause(&self.world)
    }

    /// Intro lines revealed so far; empty outside the intro.
    #[must_use]
    pub fn lore_lines(&self) -> &[&'static str] {
        let lines: &'static [&'static str] = &LORE_LINES;
        if self.phase() == Phase::Lore {
            &lines[..self.lore.revealed()]
        } else {
            &[]
        }
    }

    /// Events produced by the most recent action or tick.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Particle, text and shake pools.
    #[must_use]
    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Injected audio sink.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    fn begin(&mut self, index: LevelIndex) {
        if let Some(level) = self.generate(index) {
            self.play(index, level);
        }
    }

    fn generate(&self, index: LevelIndex) -> Option<LevelSnapshot> {
        match self.generator.generate(index) {
            Ok(level) => Some(level),
            Err(error) => {
                warn!(level = index.get(), %error, "level generation failed");
                None
            }
        }
    }

    fn load(&self, index: LevelIndex, level: LevelSnapshot) -> Command {
        Command::LoadLevel {
            index,
            level,
            avatar: Avatar::spawn(&self.tuning.avatar),
        }
    }

    fn begin_batch(&mut self) {
        self.commands.clear();
        self.events.clear();
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn settle_effects(&mut self) {
        self.effects.absorb(&self.events);
    }

    fn dispatch_audio(&mut self) {
        for event in &self.events {
            match event {
                Event::DashStarted { .. } => self.audio.play_dash(),
                Event::Collected { pickup, .. } => self.audio.play_pickup(*pickup),
                _ => {}
            }
        }
    }
}
