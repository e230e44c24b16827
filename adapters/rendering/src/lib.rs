#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lumina adapters.
//!
//! Backends read a [`Scene`] once per frame and never mutate simulation
//! state. Adapters refresh the scene from the session inside the update
//! closure passed to [`RenderingBackend::run`].

pub mod visuals;

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use lumina_core::{
    runes_collected, Avatar, Bounds, Collectible, DefeatCause, Enemy, InputState, Phase, Rgba,
    Wall,
};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha scaled by `opacity`.
    #[must_use]
    pub fn fade(self, opacity: f32) -> Self {
        Self {
            alpha: self.alpha * opacity.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Self {
            red: f32::from(color.red()) / 255.0,
            green: f32::from(color.green()) / 255.0,
            blue: f32::from(color.blue()) / 255.0,
            alpha: f32::from(color.alpha()) / 255.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Movement and dash keys held during this frame.
    pub held: InputState,
    /// Whether the confirm key (init, skip, start, restart) was pressed this frame.
    pub confirm: bool,
    /// Whether the descend key was pressed this frame.
    pub descend: bool,
}

/// Particle as drawn by a backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneParticle {
    /// Center in world units.
    pub position: Vec2,
    /// Radius in world units.
    pub size: f32,
    /// Display color with the life fraction applied to its alpha.
    pub color: Color,
}

/// Floating label as drawn by a backend.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneText {
    /// Anchor in world units; text is centered horizontally on it.
    pub position: Vec2,
    /// Label content.
    pub text: String,
    /// Display color with the life fraction applied to its alpha.
    pub color: Color,
}

/// Counters shown by the heads-up display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hud {
    /// Score on the current level.
    pub score: u32,
    /// Runes collected on the current level.
    pub runes: u32,
    /// Runes needed to open the portal.
    pub runes_required: u32,
    /// Orbs collected on the current level.
    pub orbs: u32,
    /// Base light as a percentage of its cap.
    pub light_percent: f32,
    /// One-based index of the current level.
    pub level: u32,
    /// Whether the dash may fire.
    pub dash_ready: bool,
}

/// Everything a backend draws for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the world in world units.
    pub bounds: Bounds,
    /// Border and obstacle walls.
    pub walls: Vec<Wall>,
    /// Shadows; inactive ones are not drawn.
    pub enemies: Vec<Enemy>,
    /// Orbs, runes and the portal; collected ones are not drawn.
    pub collectibles: Vec<Collectible>,
    /// The light bearer.
    pub avatar: Avatar,
    /// Live particles.
    pub particles: Vec<SceneParticle>,
    /// Live floating labels.
    pub texts: Vec<SceneText>,
    /// Screen shake magnitude.
    pub shake: f32,
    /// Animation clock for glow pulses and spins.
    pub time: Duration,
    /// Top-level phase deciding which overlay is drawn.
    pub phase: Phase,
    /// Heads-up display counters.
    pub hud: Hud,
    /// Intro lines revealed so far.
    pub lore: Vec<&'static str>,
    /// Reason the last level was lost.
    pub defeat_cause: Option<DefeatCause>,
}

impl Scene {
    /// Creates an empty scene of the provided size around an avatar.
    #[must_use]
    pub fn new(bounds: Bounds, avatar: Avatar) -> Self {
        Self {
            bounds,
            walls: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            avatar,
            particles: Vec::new(),
            texts: Vec::new(),
            shake: 0.0,
            time: Duration::ZERO,
            phase: Phase::default(),
            hud: Hud::default(),
            lore: Vec::new(),
            defeat_cause: None,
        }
    }

    /// Whether enough runes have been collected for the portal to open.
    #[must_use]
    pub fn portal_open(&self) -> bool {
        let collected = u32::try_from(runes_collected(&self.collectibles)).unwrap_or(u32::MAX);
        collected >= self.hud.runes_required
    }

    /// Checks that the world has a drawable size.
    pub fn validate(&self) -> Result<(), RenderingError> {
        let Bounds { width, height } = self.bounds;
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(RenderingError::DegenerateWorld { width, height })
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lumina scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that prevent a scene from being drawn.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The world has no drawable area.
    #[error("world of {width}x{height} cannot be drawn")]
    DegenerateWorld {
        /// Reported world width.
        width: f32,
        /// Reported world height.
        height: f32,
    },
    /// The output surface has no drawable area.
    #[error("surface of {width}x{height} cannot be drawn")]
    DegenerateSurface {
        /// Reported surface width.
        width: f32,
        /// Reported surface height.
        height: f32,
    },
}
