//! Timed reveal of the narrative intro.

use std::time::Duration;

use lumina_core::tuning::LoreTuning;

/// Narrative lines revealed one by one before the menu.
pub const LORE_LINES: [&str; 5] = [
    "The Void consumes all.",
    "Your spark is fading.",
    "Shadows hunger for the last light.",
    "Collect the Runes.",
    "Escape the Abyss.",
];

/// Clock driving the intro: one more line per interval, then a final hold.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LoreSequence {
    elapsed: Duration,
    interval: Duration,
    hold: Duration,
}

impl LoreSequence {
    pub(crate) fn new(tuning: &LoreTuning) -> Self {
        Self {
            elapsed: Duration::ZERO,
            interval: Duration::from_millis(tuning.line_interval_ms),
            hold: Duration::from_millis(tuning.final_hold_ms),
        }
    }

    pub(crate) fn rewind(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Number of lines currently on screen, never zero.
    pub(crate) fn revealed(&self) -> usize {
        let interval = self.interval.as_millis();
        if interval == 0 {
            return LORE_LINES.len();
        }
        let steps = self.elapsed.as_millis() / interval;
        usize::try_from(steps)
            .unwrap_or(usize::MAX)
            .saturating_add(1)
            .min(LORE_LINES.len())
    }

    /// Whether the last line has been held long enough to leave the intro.
    pub(crate) fn finished(&self) -> bool {
        let last = u32::try_from(LORE_LINES.len() - 1).unwrap_or(u32::MAX);
        let done_at = self.interval.saturating_mul(last).saturating_add(self.hold);
        self.elapsed >= done_at
    }
}
