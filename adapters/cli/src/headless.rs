//! Windowless runs driven by a scripted pilot.

use std::time::Duration;

use lumina_core::{AudioSink, InputState, Key, LevelIndex, Phase};
use lumina_system_session::Session;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Label of the pilot's random stream within the session seed.
pub(crate) const PILOT_STREAM: &str = "pilot";

const TICK: Duration = Duration::from_nanos(16_666_667);
const MIN_HOLD: u32 = 20;
const MAX_HOLD: u32 = 60;
const DASH_CHANCE: f64 = 0.02;

/// Pseudo-random input source that holds each heading for a while.
#[derive(Debug)]
pub(crate) struct Pilot {
    rng: ChaCha8Rng,
    keys: InputState,
    remaining: u32,
}

impl Pilot {
    /// Creates a pilot whose choices are derived from `seed`.
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            keys: InputState::default(),
            remaining: 0,
        }
    }

    /// Input held during the next tick.
    pub(crate) fn next_input(&mut self) -> InputState {
        if self.remaining == 0 {
            self.steer();
        }
        self.remaining -= 1;
        let mut input = self.keys;
        input.set(Key::Dash, self.rng.gen_bool(DASH_CHANCE));
        input
    }

    fn steer(&mut self) {
        self.keys.clear();
        match self.rng.gen_range(0..3) {
            0 => self.keys.press(Key::Left),
            1 => self.keys.press(Key::Right),
            _ => {}
        }
        match self.rng.gen_range(0..3) {
            0 => self.keys.press(Key::Up),
            1 => self.keys.press(Key::Down),
            _ => {}
        }
        self.remaining = self.rng.gen_range(MIN_HOLD..=MAX_HOLD);
    }
}

/// Outcome of a headless run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) phase: Phase,
    pub(crate) level: LevelIndex,
    pub(crate) score: u32,
    pub(crate) orbs: u32,
    pub(crate) light_percent: f32,
    pub(crate) ticks: u64,
}

/// Boots the session straight into `level` and plays up to `ticks` ticks.
///
/// The run stops early once the level is won or lost.
pub(crate) fn run<A: AudioSink>(
    session: &mut Session<A>,
    level: LevelIndex,
    ticks: u64,
    pilot: &mut Pilot,
) -> Summary {
    session.init();
    session.skip_lore();
    session.start_at(level);

    let mut played = 0;
    while played < ticks && session.phase() == Phase::Playing {
        let input = pilot.next_input();
        session.tick(&input, TICK);
        played += 1;
    }

    Summary {
        phase: session.phase(),
        level: session.level(),
        score: session.score(),
        orbs: session.orbs(),
        light_percent: session.light_percent(),
        ticks: played,
    }
}
