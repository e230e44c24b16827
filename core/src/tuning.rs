//! Tuning knobs for every adjustable aspect of the simulation.
//!
//! Each table implements [`Default`] with the shipped values and deserializes
//! with `#[serde(default)]`, so a partial configuration file only overrides the
//! fields it names.

use serde::Deserialize;

/// Aggregated tuning tables.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Avatar movement, dash and light decay.
    pub avatar: AvatarTuning,
    /// Shadow detection and idle drift.
    pub pursuit: PursuitTuning,
    /// Collectible rewards and exit gating.
    pub pickups: PickupTuning,
    /// Particle, floating text and screen shake recipes.
    pub effects: EffectsTuning,
    /// Level layout and difficulty scaling.
    pub level: LevelTuning,
    /// Narrative intro pacing.
    pub lore: LoreTuning,
}

/// Avatar controller parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvatarTuning {
    /// Horizontal spawn coordinate of the avatar's upper-left corner.
    pub spawn_x: f32,
    /// Vertical spawn coordinate of the avatar's upper-left corner.
    pub spawn_y: f32,
    /// Side length of the square avatar.
    pub size: f32,
    /// Normal movement speed per tick.
    pub speed: f32,
    /// Base light radius at level start.
    pub light_radius: f32,
    /// Cap applied when replenishing light.
    pub max_light_radius: f32,
    /// The avatar is defeated once the base radius drops below this value.
    pub min_light_radius: f32,
    /// Base radius lost every tick.
    pub light_decay: f32,
    /// Amplitude of the smooth flicker oscillation.
    pub flicker_amplitude: f32,
    /// Milliseconds of simulated time per radian of flicker phase.
    pub flicker_period_ms: f32,
    /// Width of the uniform random jitter added to the flicker.
    pub flicker_jitter: f32,
    /// Ticks the dash stays unavailable after firing.
    pub dash_cooldown_ticks: u32,
    /// Remaining cooldown above which the boosted trail speed applies.
    pub dash_trail_ticks: u32,
    /// Speed applied on the tick the dash fires.
    pub dash_burst_speed: f32,
    /// Speed applied while the dash trail lasts.
    pub dash_trail_speed: f32,
}

impl Default for AvatarTuning {
    fn default() -> Self {
        Self {
            spawn_x: 100.0,
            spawn_y: 100.0,
            size: 20.0,
            speed: 4.0,
            light_radius: 150.0,
            max_light_radius: 280.0,
            min_light_radius: 20.0,
            light_decay: 0.08,
            flicker_amplitude: 2.0,
            flicker_period_ms: 100.0,
            flicker_jitter: 5.0,
            dash_cooldown_ticks: 40,
            dash_trail_ticks: 30,
            dash_burst_speed: 12.0,
            dash_trail_speed: 10.0,
        }
    }
}

/// Shadow behaviour parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PursuitTuning {
    /// Distance added to the avatar's light radius to form the detection range.
    pub detection_margin: f32,
    /// Milliseconds of simulated time per radian of idle wobble phase.
    pub wobble_period_ms: f32,
    /// Per-tick displacement amplitude of the idle wobble.
    pub wobble_amplitude: f32,
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            detection_margin: 150.0,
            wobble_period_ms: 500.0,
            wobble_amplitude: 0.5,
        }
    }
}

/// Collectible rewards.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Base light radius restored by an orb.
    pub orb_light: f32,
    /// Score awarded for an orb.
    pub orb_score: u32,
    /// Score awarded for a rune.
    pub rune_score: u32,
    /// Runes placed on every level and needed before the portal opens.
    pub runes_required: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            orb_light: 60.0,
            orb_score: 100,
            rune_score: 500,
            runes_required: 3,
        }
    }
}

/// Cosmetic effect recipes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    /// Life removed from floating text every tick.
    pub text_decay: f32,
    /// Vertical drift of floating text per tick.
    pub text_drift: f32,
    /// Multiplier applied to the shake magnitude every tick.
    pub shake_decay: f32,
    /// Shake magnitudes below this value snap to zero.
    pub shake_floor: f32,
    /// Shake pulse emitted when the dash fires.
    pub dash_shake: f32,
    /// Shake pulse emitted when an orb is collected.
    pub orb_shake: f32,
    /// Shake pulse emitted when a rune is collected.
    pub rune_shake: f32,
    /// Shake pulse emitted when a shadow catches the avatar.
    pub caught_shake: f32,
    /// Particles in the dash burst.
    pub dash_burst: u32,
    /// Particles in the orb pickup burst.
    pub orb_burst: u32,
    /// Particles in the rune pickup burst.
    pub rune_burst: u32,
    /// Probability of dropping a trail particle on a non-dashing tick.
    pub trail_chance: f32,
    /// Life removed from trail particles every tick.
    pub trail_decay: f32,
    /// Probability of a chasing shadow leaving smoke on a tick.
    pub smoke_chance: f32,
    /// Life removed from smoke particles every tick.
    pub smoke_decay: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            text_decay: 0.02,
            text_drift: -1.5,
            shake_decay: 0.9,
            shake_floor: 0.5,
            dash_shake: 3.0,
            orb_shake: 2.0,
            rune_shake: 5.0,
            caught_shake: 20.0,
            dash_burst: 5,
            orb_burst: 15,
            rune_burst: 20,
            trail_chance: 0.3,
            trail_decay: 0.05,
            smoke_chance: 0.2,
            smoke_decay: 0.02,
        }
    }
}

/// Level layout parameters. Counts and speeds grow linearly with the level index.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// World width.
    pub width: f32,
    /// World height.
    pub height: f32,
    /// Thickness of the border walls.
    pub border: f32,
    /// Distance from the world edge kept free when scattering obstacles and items.
    pub scatter_inset: f32,
    /// Distance from the world edge kept free when placing shadows.
    pub shadow_inset: f32,
    /// Obstacles on a hypothetical level zero.
    pub obstacles_base: u32,
    /// Obstacles added per level.
    pub obstacles_per_level: u32,
    /// Smallest obstacle side.
    pub obstacle_min_size: f32,
    /// Largest obstacle side.
    pub obstacle_max_size: f32,
    /// Shadows on a hypothetical level zero.
    pub shadows_base: u32,
    /// Shadows added per level.
    pub shadows_per_level: u32,
    /// Side length of a shadow.
    pub shadow_size: f32,
    /// Shadow speed on a hypothetical level zero.
    pub shadow_speed: f32,
    /// Shadow speed added per level.
    pub shadow_speed_per_level: f32,
    /// Orbs placed per level.
    pub orbs: u32,
    /// Side length of an orb.
    pub orb_size: f32,
    /// Side length of a rune.
    pub rune_size: f32,
    /// Side length of the portal.
    pub portal_size: f32,
    /// Distance of the portal's upper-left corner from the bottom-right world corner.
    pub portal_inset: f32,
    /// Padding kept free of obstacles around the avatar spawn and the portal.
    pub clearance: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            width: 1_200.0,
            height: 800.0,
            border: 20.0,
            scatter_inset: 50.0,
            shadow_inset: 100.0,
            obstacles_base: 10,
            obstacles_per_level: 3,
            obstacle_min_size: 40.0,
            obstacle_max_size: 140.0,
            shadows_base: 3,
            shadows_per_level: 1,
            shadow_size: 30.0,
            shadow_speed: 1.5,
            shadow_speed_per_level: 0.2,
            orbs: 5,
            orb_size: 15.0,
            rune_size: 20.0,
            portal_size: 60.0,
            portal_inset: 100.0,
            clearance: 40.0,
        }
    }
}

/// Intro sequence pacing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoreTuning {
    /// Milliseconds between two revealed lines.
    pub line_interval_ms: u64,
    /// Milliseconds the final line stays up before the menu opens.
    pub final_hold_ms: u64,
}

impl Default for LoreTuning {
    fn default() -> Self {
        Self {
            line_interval_ms: 2_500,
            final_hold_ms: 2_000,
        }
    }
}
