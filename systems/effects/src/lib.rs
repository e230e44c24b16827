#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cosmetic effect pools driven by world events.
//!
//! Particles, floating texts and the screen shake magnitude never feed back
//! into the simulation. The pools are filled from the events a tick produced
//! and aged once per simulated tick.

use std::f32::consts::TAU;

use glam::Vec2;
use lumina_core::{tuning::EffectsTuning, DefeatCause, Event, Pickup, Rgba};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Share of one tick's decay below which remaining life counts as spent.
const SPENT_FRACTION: f32 = 1e-3;

const GOLD: Rgba = Rgba::from_rgb(0xfc, 0xd3, 0x4d);
const CYAN: Rgba = Rgba::from_rgb(0x22, 0xd3, 0xee);
const TRAIL: Rgba = Rgba::from_rgba(0x22, 0xd3, 0xee, 0x80);
const SMOKE: Rgba = Rgba::from_rgba(0xef, 0x44, 0x44, 0x4d);

/// Short-lived point sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Current position in world units.
    pub position: Vec2,
    /// Displacement applied every tick.
    pub velocity: Vec2,
    /// Remaining life; the particle is removed once it reaches zero.
    pub life: f32,
    /// Life the particle was spawned with.
    pub max_life: f32,
    /// Display color.
    pub color: Rgba,
    /// Display radius.
    pub size: f32,
    /// Life removed every tick.
    pub decay: f32,
}

impl Particle {
    /// Creates a stationary particle with full life.
    #[must_use]
    pub const fn at(position: Vec2, color: Rgba, size: f32, decay: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            life: 1.0,
            max_life: 1.0,
            color,
            size,
            decay,
        }
    }

    /// Remaining life as a fraction of the initial life.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Label that floats upwards and fades.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingText {
    /// Current position in world units.
    pub position: Vec2,
    /// Label content.
    pub text: String,
    /// Display color.
    pub color: Rgba,
    /// Remaining life; the text is removed once it reaches zero.
    pub life: f32,
    /// Vertical displacement applied every tick.
    pub drift: f32,
}

/// Particle and floating-text pools plus the screen shake magnitude.
#[derive(Debug)]
pub struct Effects {
    tuning: EffectsTuning,
    rng: ChaCha8Rng,
    particles: Vec<Particle>,
    texts: Vec<FloatingText>,
    shake: f32,
}

impl Effects {
    /// Creates empty pools drawing their randomness from the provided seed.
    #[must_use]
    pub fn new(tuning: EffectsTuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            particles: Vec::new(),
            texts: Vec::new(),
            shake: 0.0,
        }
    }

    /// Live particles in spawn order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Live floating texts in spawn order.
    #[must_use]
    pub fn texts(&self) -> &[FloatingText] {
        &self.texts
    }

    /// Current screen shake magnitude.
    #[must_use]
    pub fn shake(&self) -> f32 {
        self.shake
    }

    /// Empties every pool and stops the shake.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.texts.clear();
        self.shake = 0.0;
    }

    /// Adds a particle to the pool.
    pub fn spawn_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Adds a floating label at `position` with full life.
    pub fn spawn_text(&mut self, position: Vec2, text: &str, color: Rgba) {
        self.texts.push(FloatingText {
            position,
            text: text.to_owned(),
            color,
            life: 1.0,
            drift: self.tuning.text_drift,
        });
    }

    /// Sets the shake magnitude. Pulses replace the current value.
    pub fn pulse(&mut self, magnitude: f32) {
        self.shake = magnitude.max(0.0);
    }

    /// Scatters `count` particles from `origin` in uniformly random directions.
    pub fn burst(&mut self, origin: Vec2, color: Rgba, count: u32) {
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..TAU);
            let speed: f32 = self.rng.gen_range(1.0..4.0);
            self.particles.push(Particle {
                position: origin,
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                max_life: 1.0,
                color,
                size: self.rng.gen_range(1.0..4.0),
                decay: self.rng.gen_range(0.01..0.04),
            });
        }
    }

    /// Spawns the effects triggered by the events of one tick.
    pub fn absorb(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::LevelLoaded { .. } => self.clear(),
                Event::AvatarMoved { from, dashing, .. } => {
                    if *dashing || self.rng.gen::<f32>() < self.tuning.trail_chance {
                        let offset = self.jitter(5.0);
                        let size = self.rng.gen_range(1.0..3.0);
                        self.spawn_particle(Particle::at(
                            *from + offset,
                            TRAIL,
                            size,
                            self.tuning.trail_decay,
                        ));
                    }
                }
                Event::DashStarted { center } => {
                    self.pulse(self.tuning.dash_shake);
                    self.burst(*center, CYAN, self.tuning.dash_burst);
                }
                Event::EnemyMoved {
                    center,
                    pursuing: true,
                    ..
                } => {
                    if self.rng.gen::<f32>() < self.tuning.smoke_chance {
                        let mut smoke = Particle::at(
                            *center,
                            SMOKE,
                            self.rng.gen_range(2.0..6.0),
                            self.tuning.smoke_decay,
                        );
                        smoke.velocity = self.jitter(0.5);
                        self.spawn_particle(smoke);
                    }
                }
                Event::Collected {
                    pickup,
                    origin,
                    center,
                    ..
                } => match pickup {
                    Pickup::Orb => {
                        self.burst(*center, GOLD, self.tuning.orb_burst);
                        self.spawn_text(*origin, "+LIGHT", GOLD);
                        self.pulse(self.tuning.orb_shake);
                    }
                    Pickup::Rune => {
                        self.burst(*center, CYAN, self.tuning.rune_burst);
                        self.spawn_text(*origin, "+RUNE", CYAN);
                        self.pulse(self.tuning.rune_shake);
                    }
                },
                Event::AvatarDefeated {
                    cause: DefeatCause::CaughtByShadow,
                } => self.pulse(self.tuning.caught_shake),
                _ => {}
            }
        }
    }

    /// Ages every pool by one tick.
    ///
    /// Entries are removed once less than a thousandth of one tick's decay
    /// is left, so an entry spawned with life `L` and decay `D` lasts exactly
    /// `ceil(L / D)` ticks. The shake decays
    /// geometrically and snaps to zero once it drops below the floor.
    pub fn advance(&mut self) {
        for particle in &mut self.particles {
            particle.position += particle.velocity;
            particle.life -= particle.decay;
        }
        self.particles
            .retain(|particle| particle.life > particle.decay * SPENT_FRACTION);

        let text_decay = self.tuning.text_decay;
        for text in &mut self.texts {
            text.position.y += text.drift;
            text.life -= text_decay;
        }
        self.texts
            .retain(|text| text.life > text_decay * SPENT_FRACTION);

        if self.shake > 0.0 {
            self.shake *= self.tuning.shake_decay;
            if self.shake < self.tuning.shake_floor {
                self.shake = 0.0;
            }
        }
    }

    fn jitter(&mut self, reach: f32) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(-reach..=reach),
            self.rng.gen_range(-reach..=reach),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_core::{CollectibleId, LevelIndex};

    fn effects() -> Effects {
        Effects::new(EffectsTuning::default(), 42)
    }

    #[test]
    fn particles_expire_after_life_over_decay_ticks() {
        let mut effects = effects();
        effects.spawn_particle(Particle::at(Vec2::ZERO, CYAN, 1.0, 0.25));
        effects.spawn_particle(Particle::at(Vec2::ZERO, CYAN, 1.0, 0.375));

        for _ in 0..2 {
            effects.advance();
        }
        assert_eq!(effects.particles().len(), 2);

        effects.advance();
        assert_eq!(effects.particles().len(), 1);
        assert_eq!(effects.particles()[0].decay, 0.25);

        effects.advance();
        assert!(effects.particles().is_empty());
    }

    #[test]
    fn particles_integrate_velocity() {
        let mut effects = effects();
        let mut particle = Particle::at(Vec2::new(10.0, 10.0), GOLD, 2.0, 0.125);
        particle.velocity = Vec2::new(1.5, -0.5);
        effects.spawn_particle(particle);

        effects.advance();
        effects.advance();

        let particle = effects.particles()[0];
        assert_eq!(particle.position, Vec2::new(13.0, 9.0));
        assert_eq!(particle.opacity(), 0.75);
    }

    #[test]
    fn texts_drift_up_and_fade() {
        let mut tuning = EffectsTuning::default();
        tuning.text_decay = 0.25;
        let mut effects = Effects::new(tuning, 1);
        effects.spawn_text(Vec2::new(50.0, 50.0), "+RUNE", CYAN);

        effects.advance();
        assert_eq!(effects.texts()[0].position, Vec2::new(50.0, 48.5));
        for _ in 0..2 {
            effects.advance();
        }
        assert_eq!(effects.texts().len(), 1);
        effects.advance();
        assert!(effects.texts().is_empty());
    }

    #[test]
    fn shake_reaches_exactly_zero() {
        let mut effects = effects();
        effects.pulse(20.0);
        let mut ticks = 0;
        while effects.shake() > 0.0 {
            effects.advance();
            ticks += 1;
            assert!(ticks <= 40, "shake never settled");
        }
        assert_eq!(effects.shake(), 0.0);
        assert_eq!(ticks, 36);
    }

    #[test]
    fn pulses_replace_the_current_magnitude() {
        let mut effects = effects();
        effects.pulse(20.0);
        effects.pulse(2.0);
        assert_eq!(effects.shake(), 2.0);
    }

    #[test]
    fn orb_pickup_spawns_burst_text_and_shake() {
        let mut effects = effects();
        effects.absorb(&[Event::Collected {
            collectible: CollectibleId::new(0),
            pickup: Pickup::Orb,
            origin: Vec2::new(200.0, 200.0),
            center: Vec2::new(207.5, 207.5),
        }]);

        assert_eq!(effects.particles().len(), 15);
        let center = Vec2::new(207.5, 207.5);
        assert!(effects
            .particles()
            .iter()
            .all(|particle| particle.color == GOLD && particle.position == center));
        assert_eq!(effects.texts().len(), 1);
        assert_eq!(effects.texts()[0].text, "+LIGHT");
        assert_eq!(effects.texts()[0].position, Vec2::new(200.0, 200.0));
        assert_eq!(effects.shake(), 2.0);
    }

    #[test]
    fn dashing_always_leaves_a_trail() {
        let mut effects = effects();
        for _ in 0..10 {
            effects.absorb(&[Event::AvatarMoved {
                from: Vec2::new(110.0, 110.0),
                to: Vec2::new(122.0, 110.0),
                dashing: true,
            }]);
        }
        assert_eq!(effects.particles().len(), 10);
        let origin = Vec2::new(110.0, 110.0);
        assert!(effects
            .particles()
            .iter()
            .all(|particle| (particle.position - origin).abs().max_element() <= 5.0));
    }

    #[test]
    fn caught_avatar_shakes_hard() {
        let mut effects = effects();
        effects.absorb(&[Event::AvatarDefeated {
            cause: DefeatCause::CaughtByShadow,
        }]);
        assert_eq!(effects.shake(), 20.0);

        let mut effects = self::effects();
        effects.absorb(&[Event::AvatarDefeated {
            cause: DefeatCause::LightExhausted,
        }]);
        assert_eq!(effects.shake(), 0.0);
    }

    #[test]
    fn loading_a_level_clears_the_pools() {
        let mut effects = effects();
        effects.burst(Vec2::ZERO, CYAN, 5);
        effects.spawn_text(Vec2::ZERO, "+RUNE", CYAN);
        effects.pulse(5.0);

        effects.absorb(&[Event::LevelLoaded {
            index: LevelIndex::FIRST,
            enemies: 0,
            collectibles: 0,
        }]);

        assert!(effects.particles().is_empty());
        assert!(effects.texts().is_empty());
        assert_eq!(effects.shake(), 0.0);
    }
}
