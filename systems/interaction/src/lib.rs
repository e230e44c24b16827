#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interaction resolver for avatar and collectible overlap.

use lumina_core::{
    runes_collected, tuning::PickupTuning, Avatar, Collectible, CollectibleKind, Command, Reward,
};
use tracing::debug;

/// Pure system that turns collectible overlap into pickup and exit commands.
#[derive(Debug, Default)]
pub struct Interaction {
    tuning: PickupTuning,
}

impl Interaction {
    /// Creates a resolver with the provided rewards.
    #[must_use]
    pub fn new(tuning: PickupTuning) -> Self {
        Self { tuning }
    }

    /// Number of runes that open the portal.
    #[must_use]
    pub fn runes_required(&self) -> u32 {
        self.tuning.runes_required
    }

    fn orb_reward(&self) -> Reward {
        Reward {
            light: self.tuning.orb_light,
            score: self.tuning.orb_score,
        }
    }

    fn rune_reward(&self) -> Reward {
        Reward {
            light: 0.0,
            score: self.tuning.rune_score,
        }
    }

    /// Emits a `Collect` command for every uncollected item the avatar
    /// overlaps, in level order.
    ///
    /// Touching the portal emits `Escape` and stops processing once the rune
    /// objective is met, runes picked up earlier in the same pass included.
    /// A closed portal is inert.
    pub fn handle(&self, avatar: &Avatar, collectibles: &[Collectible], out: &mut Vec<Command>) {
        let required = usize::try_from(self.tuning.runes_required).unwrap_or(usize::MAX);
        let mut runes = runes_collected(collectibles);

        for item in collectibles {
            if item.kind.is_collected() || !item.bounds.overlaps(&avatar.bounds) {
                continue;
            }

            match item.kind {
                CollectibleKind::Orb { .. } => out.push(Command::Collect {
                    collectible: item.id,
                    reward: self.orb_reward(),
                }),
                CollectibleKind::Rune { .. } => {
                    runes += 1;
                    out.push(Command::Collect {
                        collectible: item.id,
                        reward: self.rune_reward(),
                    });
                }
                CollectibleKind::Portal => {
                    if runes >= required {
                        debug!(runes, "portal open, escaping");
                        out.push(Command::Escape);
                        return;
                    }
                }
            }
        }
    }
}
