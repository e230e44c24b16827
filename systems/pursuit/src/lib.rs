#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shadow pursuit system that moves active shadows and detects lethal contact.
//!
//! Shadows notice the avatar when the distance between centers is shorter
//! than the avatar's current light radius plus a fixed margin, so a dimming
//! light also shrinks the detection range. Noticing shadows head straight for
//! the avatar, ignoring walls; the rest drift in a slow time-driven wobble.

use std::time::Duration;

use glam::Vec2;
use lumina_core::{tuning::PursuitTuning, Avatar, Command, DefeatCause, Enemy};
use tracing::debug;

/// Pure system that emits shadow movement and contact commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    tuning: PursuitTuning,
}

impl Pursuit {
    /// Creates a pursuit system with the provided tuning.
    #[must_use]
    pub fn new(tuning: PursuitTuning) -> Self {
        Self { tuning }
    }

    /// Moves every active shadow and reports the first lethal contact.
    ///
    /// `avatar` must reflect the motion resolved earlier in the same tick.
    /// Processing stops at the first shadow that touches a non-dashing avatar.
    pub fn handle(
        &self,
        clock: Duration,
        avatar: &Avatar,
        enemies: &[Enemy],
        out: &mut Vec<Command>,
    ) {
        let target = avatar.bounds.center();
        let detection = avatar.light.radius() + self.tuning.detection_margin;
        let wobble = self.wobble(clock);

        for enemy in enemies.iter().filter(|enemy| enemy.active) {
            let delta = target - enemy.bounds.center();
            let pursuing = delta.length() < detection;
            let (position, heading) = if pursuing {
                let heading = delta.y.atan2(delta.x);
                let step = Vec2::new(heading.cos(), heading.sin()) * enemy.speed;
                (enemy.bounds.position() + step, heading)
            } else {
                (enemy.bounds.position() + wobble, enemy.heading)
            };

            out.push(Command::MoveEnemy {
                enemy: enemy.id,
                position,
                heading,
                pursuing,
            });

            let moved = enemy.bounds.with_position(position);
            if moved.overlaps(&avatar.bounds) && !avatar.dash.is_dashing() {
                debug!(enemy = enemy.id.get(), "shadow caught the avatar");
                out.push(Command::Defeat {
                    cause: DefeatCause::CaughtByShadow,
                });
                return;
            }
        }
    }

    fn wobble(&self, clock: Duration) -> Vec2 {
        if self.tuning.wobble_period_ms <= 0.0 {
            return Vec2::ZERO;
        }
        let phase = clock.as_secs_f32() * 1_000.0 / self.tuning.wobble_period_ms;
        Vec2::new(phase.sin(), phase.cos()) * self.tuning.wobble_amplitude
    }
}
