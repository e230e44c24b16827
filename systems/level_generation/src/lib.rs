#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded procedural level generation.
//!
//! Every level is a pure function of the session seed, the level index and
//! the tuning tables. Seeds are derived by hashing those inputs with SHA-256,
//! so neighbouring levels draw from unrelated random streams.

use glam::Vec2;
use lumina_core::{
    tuning::LevelTuning, Bounds, Collectible, CollectibleId, Enemy, EnemyId, LevelError,
    LevelIndex, LevelSnapshot, Rect, Rgba, Wall,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Stream label used for level layout randomness.
pub const RNG_STREAM_LAYOUT: &str = "layout";

const BORDER_COLOR: Rgba = Rgba::from_rgb(0x33, 0x41, 0x55);
const OBSTACLE_COLOR: Rgba = Rgba::from_rgb(0x1e, 0x29, 0x3b);
const PULSE_RANGE: f32 = 100.0;
const PLACEMENT_ATTEMPTS: usize = 24;

/// Generates validated level snapshots for a session.
#[derive(Clone, Debug)]
pub struct LevelGenerator {
    tuning: LevelTuning,
    spawn: Rect,
    runes_required: usize,
    seed: u64,
}

impl LevelGenerator {
    /// Creates a generator.
    ///
    /// `spawn` is the avatar's start rectangle; obstacles and shadows keep
    /// clear of it. Every generated level carries exactly `runes_required` runes.
    #[must_use]
    pub fn new(tuning: LevelTuning, spawn: Rect, runes_required: usize, seed: u64) -> Self {
        Self {
            tuning,
            spawn,
            runes_required,
            seed,
        }
    }

    /// Produces the snapshot for the provided level.
    ///
    /// Obstacle and shadow counts and shadow speed grow linearly with the
    /// index. Fails only when the tuning cannot satisfy the level contract.
    pub fn generate(&self, index: LevelIndex) -> Result<LevelSnapshot, LevelError> {
        let level_seed = derive_level_seed(self.seed, index);
        let mut rng =
            ChaCha8Rng::seed_from_u64(derive_labeled_seed(level_seed, RNG_STREAM_LAYOUT));
        let tuning = &self.tuning;
        let n = index.get();
        let bounds = Bounds::new(tuning.width, tuning.height);

        let portal = Rect::new(
            tuning.width - tuning.portal_inset,
            tuning.height - tuning.portal_inset,
            tuning.portal_size,
            tuning.portal_size,
        );
        let keep_out = [
            pad(self.spawn, tuning.clearance),
            pad(portal, tuning.clearance),
        ];

        let mut walls = border(tuning);
        let obstacle_count = tuning
            .obstacles_base
            .saturating_add(tuning.obstacles_per_level.saturating_mul(n));
        for _ in 0..obstacle_count {
            if let Some(bounds) = self.place_obstacle(&mut rng, &keep_out) {
                walls.push(Wall {
                    bounds,
                    color: OBSTACLE_COLOR,
                });
            }
        }

        let shadow_count = tuning
            .shadows_base
            .saturating_add(tuning.shadows_per_level.saturating_mul(n));
        let speed = tuning.shadow_speed + tuning.shadow_speed_per_level * n as f32;
        let enemies = (0..shadow_count)
            .map(|id| Enemy {
                id: EnemyId::new(id),
                bounds: self.place(
                    &mut rng,
                    tuning.shadow_inset,
                    tuning.shadow_size,
                    |candidate| !candidate.overlaps(&keep_out[0]),
                ),
                velocity: Vec2::ZERO,
                speed,
                active: true,
                heading: 0.0,
            })
            .collect();

        let mut collectibles = Vec::new();
        let mut next_id = 0;
        for _ in 0..tuning.orbs {
            let bounds = self.place_item(&mut rng, tuning.orb_size, &walls, portal);
            let pulse = rng.gen_range(0.0..PULSE_RANGE);
            collectibles.push(Collectible::orb(CollectibleId::new(next_id), bounds, pulse));
            next_id += 1;
        }
        for _ in 0..self.runes_required {
            let bounds = self.place_item(&mut rng, tuning.rune_size, &walls, portal);
            let pulse = rng.gen_range(0.0..PULSE_RANGE);
            collectibles.push(Collectible::rune(CollectibleId::new(next_id), bounds, pulse));
            next_id += 1;
        }
        collectibles.push(Collectible::portal(CollectibleId::new(next_id), portal));

        let level = LevelSnapshot {
            bounds,
            walls,
            enemies,
            collectibles,
        };
        level.validate(self.runes_required)?;
        debug!(
            level = n,
            walls = level.walls.len(),
            enemies = level.enemies.len(),
            "generated level"
        );
        Ok(level)
    }

    fn place_obstacle(&self, rng: &mut ChaCha8Rng, keep_out: &[Rect]) -> Option<Rect> {
        let tuning = &self.tuning;
        let inner_right = tuning.width - tuning.border;
        let inner_bottom = tuning.height - tuning.border;

        for _ in 0..PLACEMENT_ATTEMPTS {
            let x = sample(rng, tuning.scatter_inset, tuning.width - tuning.scatter_inset);
            let y = sample(rng, tuning.scatter_inset, tuning.height - tuning.scatter_inset);
            let width = sample(rng, tuning.obstacle_min_size, tuning.obstacle_max_size);
            let height = sample(rng, tuning.obstacle_min_size, tuning.obstacle_max_size);
            let candidate = Rect::new(
                x,
                y,
                width.min(inner_right - x).max(0.0),
                height.min(inner_bottom - y).max(0.0),
            );
            if candidate.width > 0.0
                && candidate.height > 0.0
                && !keep_out.iter().any(|zone| zone.overlaps(&candidate))
            {
                return Some(candidate);
            }
        }
        None
    }

    fn place_item(&self, rng: &mut ChaCha8Rng, size: f32, walls: &[Wall], portal: Rect) -> Rect {
        self.place(rng, self.tuning.scatter_inset, size, |candidate| {
            !candidate.overlaps(&portal)
                && !walls.iter().any(|wall| wall.bounds.overlaps(candidate))
        })
    }

    /// Rolls a square of side `size` inside `inset`, preferring positions that
    /// satisfy `accept`. The last roll is kept when no attempt is accepted.
    fn place<F>(&self, rng: &mut ChaCha8Rng, inset: f32, size: f32, accept: F) -> Rect
    where
        F: Fn(&Rect) -> bool,
    {
        let max_x = (self.tuning.width - inset - size).max(inset);
        let max_y = (self.tuning.height - inset - size).max(inset);
        let mut candidate = Rect::new(inset, inset, size, size);
        for _ in 0..PLACEMENT_ATTEMPTS {
            candidate = Rect::new(
                sample(rng, inset, max_x),
                sample(rng, inset, max_y),
                size,
                size,
            );
            if accept(&candidate) {
                break;
            }
        }
        candidate
    }
}

/// Derives the seed of one level from the session seed.
#[must_use]
pub fn derive_level_seed(seed: u64, index: LevelIndex) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(index.get().to_le_bytes());
    finalize_seed(hasher)
}

/// Derives an independent random stream seed from a base seed and a label.
#[must_use]
pub fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn sample(rng: &mut ChaCha8Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

fn border(tuning: &LevelTuning) -> Vec<Wall> {
    let LevelTuning {
        width,
        height,
        border,
        ..
    } = *tuning;
    [
        Rect::new(0.0, 0.0, width, border),
        Rect::new(0.0, height - border, width, border),
        Rect::new(0.0, 0.0, border, height),
        Rect::new(width - border, 0.0, border, height),
    ]
    .into_iter()
    .map(|bounds| Wall {
        bounds,
        color: BORDER_COLOR,
    })
    .collect()
}

fn pad(rect: Rect, padding: f32) -> Rect {
    Rect::new(
        rect.x - padding,
        rect.y - padding,
        rect.width + padding * 2.0,
        rect.height + padding * 2.0,
    )
}
