#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Avatar controller that resolves movement, the dash ability and light decay.

use std::{f32::consts::FRAC_1_SQRT_2, time::Duration};

use glam::Vec2;
use lumina_core::{
    tuning::AvatarTuning, Avatar, Bounds, Command, DashPhase, DefeatCause, InputState, Key, Rect,
    Wall,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Pure system that turns held keys into avatar commands once per tick.
#[derive(Debug)]
pub struct AvatarController {
    tuning: AvatarTuning,
    rng: ChaCha8Rng,
}

impl AvatarController {
    /// Creates a controller drawing flicker jitter from the provided seed.
    #[must_use]
    pub fn new(tuning: AvatarTuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Resolves one tick of avatar motion, dash and light decay.
    ///
    /// Emits `DriveAvatar` followed by `BurnLight`, then `Defeat` when the
    /// decayed base radius falls below the survival threshold.
    pub fn handle(
        &mut self,
        clock: Duration,
        input: &InputState,
        avatar: &Avatar,
        walls: &[Wall],
        bounds: Bounds,
        out: &mut Vec<Command>,
    ) {
        let mut dash = avatar.dash;
        let fired = dash.advance(input.is_held(Key::Dash), self.tuning.dash_cooldown_ticks);
        let speed = match dash.phase(self.tuning.dash_trail_ticks) {
            DashPhase::Burst => self.tuning.dash_burst_speed,
            DashPhase::Trail => self.tuning.dash_trail_speed,
            DashPhase::Cooling | DashPhase::Ready => avatar.speed,
        };
        if fired {
            debug!(cooldown = dash.cooldown(), "dash fired");
        }

        let velocity = steer(input, speed);
        let position = slide(avatar.bounds, velocity, walls, bounds);
        out.push(Command::DriveAvatar {
            position,
            velocity,
            dash,
        });

        let flicker = self.flicker(clock);
        let decay = self.tuning.light_decay;
        out.push(Command::BurnLight { flicker, decay });

        let remaining = (avatar.light.base_radius() - decay.max(0.0)).max(0.0);
        if remaining < self.tuning.min_light_radius {
            out.push(Command::Defeat {
                cause: DefeatCause::LightExhausted,
            });
        }
    }

    fn flicker(&mut self, clock: Duration) -> f32 {
        let millis = clock.as_secs_f32() * 1_000.0;
        let phase = if self.tuning.flicker_period_ms > 0.0 {
            millis / self.tuning.flicker_period_ms
        } else {
            0.0
        };
        let jitter = (self.rng.gen::<f32>() - 0.5) * self.tuning.flicker_jitter;
        phase.sin() * self.tuning.flicker_amplitude + jitter
    }
}

/// Maps held movement keys to a velocity of the provided speed.
///
/// Down overrides up and right overrides left. Diagonal motion is scaled by
/// `1/sqrt(2)` on both axes, dash speeds included.
#[must_use]
pub fn steer(input: &InputState, speed: f32) -> Vec2 {
    let mut velocity = Vec2::ZERO;
    if input.is_held(Key::Up) {
        velocity.y = -speed;
    }
    if input.is_held(Key::Down) {
        velocity.y = speed;
    }
    if input.is_held(Key::Left) {
        velocity.x = -speed;
    }
    if input.is_held(Key::Right) {
        velocity.x = speed;
    }
    if velocity.x != 0.0 && velocity.y != 0.0 {
        velocity *= FRAC_1_SQRT_2;
    }
    velocity
}

/// Moves a rectangle by `velocity`, resolving the horizontal axis before the
/// vertical one.
///
/// An axis whose candidate position leaves the world or overlaps a wall stays
/// frozen, which lets the rectangle slide along obstacles.
#[must_use]
pub fn slide(rect: Rect, velocity: Vec2, walls: &[Wall], bounds: Bounds) -> Vec2 {
    let is_free = |candidate: &Rect| {
        bounds.contains(candidate) && !walls.iter().any(|wall| wall.bounds.overlaps(candidate))
    };

    let mut resolved = rect;
    let horizontal = resolved.with_x(resolved.x + velocity.x);
    if is_free(&horizontal) {
        resolved = horizontal;
    }
    let vertical = resolved.with_y(resolved.y + velocity.y);
    if is_free(&vertical) {
        resolved = vertical;
    }
    resolved.position()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_core::Rgba;

    fn wall(x: f32, y: f32, width: f32, height: f32) -> Wall {
        Wall {
            bounds: Rect::new(x, y, width, height),
            color: Rgba::from_rgb(0x33, 0x41, 0x55),
        }
    }

    #[test]
    fn opposing_keys_resolve_to_the_later_direction() {
        let input = InputState::with_keys([Key::Up, Key::Down]);
        assert_eq!(steer(&input, 4.0), Vec2::new(0.0, 4.0));

        let input = InputState::with_keys([Key::Left, Key::Right]);
        assert_eq!(steer(&input, 4.0), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn diagonal_speed_matches_axial_speed() {
        let input = InputState::with_keys([Key::Up, Key::Right]);
        let velocity = steer(&input, 4.0);
        assert!((velocity.length() - 4.0).abs() < 1e-5);
        assert!(velocity.x > 0.0 && velocity.y < 0.0);
    }

    #[test]
    fn slide_freezes_only_the_blocked_axis() {
        let walls = [wall(125.0, 0.0, 20.0, 400.0)];
        let rect = Rect::new(100.0, 100.0, 20.0, 20.0);
        let position = slide(rect, Vec2::new(8.0, 8.0), &walls, Bounds::new(400.0, 400.0));
        assert_eq!(position, Vec2::new(100.0, 108.0));
    }

    #[test]
    fn slide_keeps_the_rectangle_inside_the_world() {
        let rect = Rect::new(2.0, 2.0, 20.0, 20.0);
        let position = slide(rect, Vec2::new(-4.0, 4.0), &[], Bounds::new(100.0, 100.0));
        assert_eq!(position, Vec2::new(2.0, 6.0));
    }

    #[test]
    fn touching_a_wall_is_not_blocked() {
        let walls = [wall(124.0, 0.0, 20.0, 400.0)];
        let rect = Rect::new(100.0, 100.0, 20.0, 20.0);
        let position = slide(rect, Vec2::new(4.0, 0.0), &walls, Bounds::new(400.0, 400.0));
        assert_eq!(position, Vec2::new(104.0, 100.0));
    }

    #[test]
    fn flicker_stays_within_its_envelope() {
        let mut controller = AvatarController::new(AvatarTuning::default(), 7);
        for millis in (0..5_000).step_by(16) {
            let flicker = controller.flicker(Duration::from_millis(millis));
            assert!(flicker.abs() <= 2.0 + 2.5 + 1e-4);
        }
    }
}
