//! Entity data model owned by the authoritative world.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{Bounds, Rect},
    tuning::AvatarTuning,
};

/// RGBA color with byte channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Rgba {
    /// Creates an opaque color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(red, green, blue, 255)
    }

    /// Creates a color from byte RGBA components.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the color.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }
}

/// Light carried by the avatar; doubles as its health.
///
/// `base_radius` is the slowly decaying resource and stays within
/// `0..=max_radius`. `radius` is derived from the base each tick and never
/// drops below zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    radius: f32,
    base_radius: f32,
    max_radius: f32,
}

impl Light {
    /// Creates a light with the provided base radius clamped into `0..=max_radius`.
    #[must_use]
    pub fn new(base_radius: f32, max_radius: f32) -> Self {
        let max_radius = max_radius.max(0.0);
        let base_radius = base_radius.clamp(0.0, max_radius);
        Self {
            radius: base_radius,
            base_radius,
            max_radius,
        }
    }

    /// Radius currently revealed around the avatar, flicker included.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Underlying decaying resource value.
    #[must_use]
    pub const fn base_radius(&self) -> f32 {
        self.base_radius
    }

    /// Cap applied when the light is replenished.
    #[must_use]
    pub const fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Derives the displayed radius from the current base, then decays the base.
    pub fn burn(&mut self, flicker: f32, decay: f32) {
        self.radius = (self.base_radius + flicker).max(0.0);
        self.base_radius = (self.base_radius - decay.max(0.0)).max(0.0);
    }

    /// Adds to the base radius without exceeding the cap.
    pub fn replenish(&mut self, amount: f32) {
        self.base_radius = (self.base_radius + amount).clamp(0.0, self.max_radius);
    }

    /// Base radius expressed as a percentage of the cap.
    #[must_use]
    pub fn percent(&self) -> f32 {
        if self.max_radius <= 0.0 {
            return 0.0;
        }
        self.base_radius / self.max_radius * 100.0
    }
}

/// Phase of the dash ability derived from its cooldown and active flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DashPhase {
    /// The dash may be triggered.
    Ready,
    /// The dash fired on the current tick; contact with shadows is harmless.
    Burst,
    /// Upper portion of the cooldown, the avatar still carries boosted speed.
    Trail,
    /// Lower portion of the cooldown at normal speed.
    Cooling,
}

/// Cooldown-gated dash ability state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DashState {
    cooldown: u32,
    dashing: bool,
}

impl DashState {
    /// Creates a dash state with explicit cooldown and active flag.
    #[must_use]
    pub const fn new(cooldown: u32, dashing: bool) -> Self {
        Self { cooldown, dashing }
    }

    /// Ticks remaining until the dash may fire again.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Whether the dash fired on the most recent tick.
    #[must_use]
    pub const fn is_dashing(&self) -> bool {
        self.dashing
    }

    /// Advances the ability by one tick, returning `true` when a dash fires.
    ///
    /// The cooldown ticks down before the request is considered, so a request
    /// made on the final cooling tick fires immediately.
    pub fn advance(&mut self, requested: bool, cooldown_ticks: u32) -> bool {
        self.cooldown = self.cooldown.saturating_sub(1);
        if requested && self.cooldown == 0 {
            self.cooldown = cooldown_ticks;
            self.dashing = true;
            true
        } else {
            self.dashing = false;
            false
        }
    }

    /// Classifies the state given the number of trailing cooldown ticks.
    #[must_use]
    pub const fn phase(&self, trail_threshold: u32) -> DashPhase {
        if self.dashing {
            DashPhase::Burst
        } else if self.cooldown > trail_threshold {
            DashPhase::Trail
        } else if self.cooldown > 0 {
            DashPhase::Cooling
        } else {
            DashPhase::Ready
        }
    }
}

/// Player-controlled light bearer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Avatar {
    /// Bounding box of the avatar.
    pub bounds: Rect,
    /// Velocity applied on the most recent tick.
    pub velocity: Vec2,
    /// Movement speed while no dash boost applies.
    pub speed: f32,
    /// Light resource and visibility radius.
    pub light: Light,
    /// Dash ability state.
    pub dash: DashState,
}

impl Avatar {
    /// Creates an avatar with the default state for the start of a level.
    #[must_use]
    pub fn spawn(tuning: &AvatarTuning) -> Self {
        Self {
            bounds: Rect::new(tuning.spawn_x, tuning.spawn_y, tuning.size, tuning.size),
            velocity: Vec2::ZERO,
            speed: tuning.speed,
            light: Light::new(tuning.light_radius, tuning.max_light_radius),
            dash: DashState::default(),
        }
    }
}

/// Static obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    /// Bounding box of the wall.
    pub bounds: Rect,
    /// Display color.
    pub color: Rgba,
}

/// Unique identifier assigned to a shadow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Shadow that chases the avatar once it notices the light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    /// Identifier allocated by the level generator.
    pub id: EnemyId,
    /// Bounding box of the shadow.
    pub bounds: Rect,
    /// Displacement applied on the most recent tick.
    pub velocity: Vec2,
    /// Chase speed in world units per tick.
    pub speed: f32,
    /// Inactive shadows are skipped by the pursuit system and never collide.
    pub active: bool,
    /// Facing angle in radians.
    pub heading: f32,
}

/// Unique identifier assigned to a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectibleId(u32);

impl CollectibleId {
    /// Creates a new collectible identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of pickups that can be collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pickup {
    /// Resource orb that replenishes light.
    Orb,
    /// Objective rune required to open the exit.
    Rune,
}

/// Behavior attached to a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectibleKind {
    /// Resource orb.
    Orb {
        /// Set once the avatar picks the orb up.
        collected: bool,
    },
    /// Objective rune.
    Rune {
        /// Set once the avatar picks the rune up.
        collected: bool,
    },
    /// Level exit; never collected.
    Portal,
}

impl CollectibleKind {
    /// Whether the collectible has already been picked up.
    #[must_use]
    pub const fn is_collected(&self) -> bool {
        match self {
            Self::Orb { collected } | Self::Rune { collected } => *collected,
            Self::Portal => false,
        }
    }

    /// Pickup associated with the kind, if it can be collected at all.
    #[must_use]
    pub const fn pickup(&self) -> Option<Pickup> {
        match self {
            Self::Orb { .. } => Some(Pickup::Orb),
            Self::Rune { .. } => Some(Pickup::Rune),
            Self::Portal => None,
        }
    }

    /// Marks the collectible as picked up.
    ///
    /// Returns the pickup only on the false-to-true transition.
    pub fn mark_collected(&mut self) -> Option<Pickup> {
        match self {
            Self::Orb { collected } if !*collected => {
                *collected = true;
                Some(Pickup::Orb)
            }
            Self::Rune { collected } if !*collected => {
                *collected = true;
                Some(Pickup::Rune)
            }
            _ => None,
        }
    }
}

/// Item placed in the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collectible {
    /// Identifier allocated by the level generator.
    pub id: CollectibleId,
    /// Bounding box of the collectible.
    pub bounds: Rect,
    /// Animation phase offset.
    pub pulse_offset: f32,
    /// Behavior attached to the collectible.
    pub kind: CollectibleKind,
}

impl Collectible {
    /// Creates an uncollected orb.
    #[must_use]
    pub const fn orb(id: CollectibleId, bounds: Rect, pulse_offset: f32) -> Self {
        Self {
            id,
            bounds,
            pulse_offset,
            kind: CollectibleKind::Orb { collected: false },
        }
    }

    /// Creates an uncollected rune.
    #[must_use]
    pub const fn rune(id: CollectibleId, bounds: Rect, pulse_offset: f32) -> Self {
        Self {
            id,
            bounds,
            pulse_offset,
            kind: CollectibleKind::Rune { collected: false },
        }
    }

    /// Creates the level exit.
    #[must_use]
    pub const fn portal(id: CollectibleId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            pulse_offset: 0.0,
            kind: CollectibleKind::Portal,
        }
    }
}

/// Counts the runes picked up across the provided collectibles.
#[must_use]
pub fn runes_collected(collectibles: &[Collectible]) -> usize {
    collectibles
        .iter()
        .filter(|item| matches!(item.kind, CollectibleKind::Rune { collected: true }))
        .count()
}

/// One-based index of a generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelIndex(u32);

impl LevelIndex {
    /// First level of a run.
    pub const FIRST: Self = Self(1);

    /// Creates a level index, raising zero to the first level.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 {
            Self::FIRST
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of the following level.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Complete entity set for a single level instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelSnapshot {
    /// Extent of the world.
    pub bounds: Bounds,
    /// Static obstacles, border included.
    pub walls: Vec<Wall>,
    /// Shadows inhabiting the level.
    pub enemies: Vec<Enemy>,
    /// Orbs, runes and the portal.
    pub collectibles: Vec<Collectible>,
}

impl LevelSnapshot {
    /// Checks the guarantees every generated level must uphold.
    pub fn validate(&self, runes_required: usize) -> Result<(), LevelError> {
        if !self.is_enclosed() {
            return Err(LevelError::MissingBorder);
        }

        for wall in &self.walls {
            self.ensure_inside(wall.bounds)?;
        }
        for enemy in &self.enemies {
            self.ensure_inside(enemy.bounds)?;
        }
        for item in &self.collectibles {
            self.ensure_inside(item.bounds)?;
        }

        let portals = self
            .collectibles
            .iter()
            .filter(|item| item.kind == CollectibleKind::Portal)
            .count();
        if portals != 1 {
            return Err(LevelError::PortalCount { found: portals });
        }

        let runes = self
            .collectibles
            .iter()
            .filter(|item| matches!(item.kind, CollectibleKind::Rune { .. }))
            .count();
        if runes != runes_required {
            return Err(LevelError::RuneCount {
                found: runes,
                expected: runes_required,
            });
        }

        if !self
            .collectibles
            .iter()
            .any(|item| matches!(item.kind, CollectibleKind::Orb { .. }))
        {
            return Err(LevelError::NoOrbs);
        }

        Ok(())
    }

    fn ensure_inside(&self, rect: Rect) -> Result<(), LevelError> {
        if self.bounds.contains(&rect) {
            Ok(())
        } else {
            Err(LevelError::OutOfBounds { rect })
        }
    }

    fn is_enclosed(&self) -> bool {
        let Bounds { width, height } = self.bounds;
        let top = self.any_wall(|r| r.y <= 0.0 && r.x <= 0.0 && r.right() >= width);
        let bottom = self.any_wall(|r| r.bottom() >= height && r.x <= 0.0 && r.right() >= width);
        let left = self.any_wall(|r| r.x <= 0.0 && r.y <= 0.0 && r.bottom() >= height);
        let right = self.any_wall(|r| r.right() >= width && r.y <= 0.0 && r.bottom() >= height);
        top && bottom && left && right
    }

    fn any_wall(&self, predicate: impl Fn(&Rect) -> bool) -> bool {
        self.walls.iter().any(|wall| predicate(&wall.bounds))
    }
}

/// Violations of the level generator contract.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LevelError {
    /// The border walls do not fully enclose the play area.
    #[error("border walls do not enclose the play area")]
    MissingBorder,
    /// A shape extends beyond the world bounds.
    #[error("shape {rect:?} lies outside the world bounds")]
    OutOfBounds {
        /// Offending rectangle.
        rect: Rect,
    },
    /// The level does not contain exactly one portal.
    #[error("expected exactly one portal, found {found}")]
    PortalCount {
        /// Number of portals present.
        found: usize,
    },
    /// The level does not contain the required number of runes.
    #[error("expected {expected} runes, found {found}")]
    RuneCount {
        /// Number of runes present.
        found: usize,
        /// Number of runes required to open the exit.
        expected: usize,
    },
    /// The level contains no orbs.
    #[error("level contains no orbs")]
    NoOrbs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_burn_floors_radius_and_base() {
        let mut light = Light::new(1.0, 280.0);
        light.burn(-5.0, 3.0);
        assert_eq!(light.radius(), 0.0);
        assert_eq!(light.base_radius(), 0.0);
    }

    #[test]
    fn light_replenish_clamps_to_cap() {
        let mut light = Light::new(250.0, 280.0);
        light.replenish(60.0);
        assert_eq!(light.base_radius(), 280.0);
        assert!((light.percent() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn light_new_clamps_base_into_range() {
        assert_eq!(Light::new(500.0, 280.0).base_radius(), 280.0);
        assert_eq!(Light::new(-3.0, 280.0).base_radius(), 0.0);
    }

    #[test]
    fn dash_fires_only_when_ready() {
        let mut dash = DashState::default();
        assert!(dash.advance(true, 40));
        assert_eq!(dash.cooldown(), 40);
        assert!(dash.is_dashing());

        assert!(!dash.advance(true, 40));
        assert_eq!(dash.cooldown(), 39);
        assert!(!dash.is_dashing());
    }

    #[test]
    fn dash_fires_on_final_cooling_tick() {
        let mut dash = DashState::new(1, false);
        assert!(dash.advance(true, 40));
        assert_eq!(dash.cooldown(), 40);
    }

    #[test]
    fn dash_phase_follows_cooldown() {
        assert_eq!(DashState::new(0, false).phase(30), DashPhase::Ready);
        assert_eq!(DashState::new(40, true).phase(30), DashPhase::Burst);
        assert_eq!(DashState::new(35, false).phase(30), DashPhase::Trail);
        assert_eq!(DashState::new(30, false).phase(30), DashPhase::Cooling);
    }

    #[test]
    fn collectible_marks_collected_once() {
        let mut kind = CollectibleKind::Rune { collected: false };
        assert_eq!(kind.mark_collected(), Some(Pickup::Rune));
        assert_eq!(kind.mark_collected(), None);
        assert!(kind.is_collected());

        let mut portal = CollectibleKind::Portal;
        assert_eq!(portal.mark_collected(), None);
        assert!(!portal.is_collected());
    }

    #[test]
    fn level_index_never_zero() {
        assert_eq!(LevelIndex::new(0), LevelIndex::FIRST);
        assert_eq!(LevelIndex::new(3).next().get(), 4);
    }

    fn enclosed_level() -> LevelSnapshot {
        let color = Rgba::from_rgb(0x33, 0x41, 0x55);
        let wall = |x, y, width, height| Wall {
            bounds: Rect::new(x, y, width, height),
            color,
        };
        LevelSnapshot {
            bounds: Bounds::new(200.0, 100.0),
            walls: vec![
                wall(0.0, 0.0, 200.0, 10.0),
                wall(0.0, 90.0, 200.0, 10.0),
                wall(0.0, 0.0, 10.0, 100.0),
                wall(190.0, 0.0, 10.0, 100.0),
            ],
            enemies: Vec::new(),
            collectibles: vec![
                Collectible::orb(CollectibleId::new(0), Rect::new(20.0, 20.0, 5.0, 5.0), 0.0),
                Collectible::rune(CollectibleId::new(1), Rect::new(30.0, 20.0, 5.0, 5.0), 0.0),
                Collectible::portal(CollectibleId::new(2), Rect::new(150.0, 50.0, 20.0, 20.0)),
            ],
        }
    }

    #[test]
    fn validate_accepts_complete_level() {
        assert_eq!(enclosed_level().validate(1), Ok(()));
    }

    #[test]
    fn validate_reports_missing_border() {
        let mut level = enclosed_level();
        let _ = level.walls.pop();
        assert_eq!(level.validate(1), Err(LevelError::MissingBorder));
    }

    #[test]
    fn validate_reports_rune_shortfall() {
        assert_eq!(
            enclosed_level().validate(3),
            Err(LevelError::RuneCount {
                found: 1,
                expected: 3
            })
        );
    }

    #[test]
    fn validate_reports_out_of_bounds_shapes() {
        let mut level = enclosed_level();
        level.collectibles[0].bounds = Rect::new(195.0, 20.0, 15.0, 15.0);
        assert!(matches!(
            level.validate(1),
            Err(LevelError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn runes_collected_counts_only_collected_runes() {
        let mut level = enclosed_level();
        assert_eq!(runes_collected(&level.collectibles), 0);
        let _ = level.collectibles[1].kind.mark_collected();
        let _ = level.collectibles[0].kind.mark_collected();
        assert_eq!(runes_collected(&level.collectibles), 1);
    }
}
