#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Lumina.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the crate depends on macroquad without its default `audio` feature.
//!
//! The backend samples held keys and edge-triggered shortcuts, hands them to
//! the update closure, and draws the refreshed scene followed by the
//! fog-of-war mask and the screen-space overlays from the local `ui` module.

mod ui;

use std::{f32::consts::TAU, time::Duration};

use anyhow::Result;
use glam::Vec2;
use lumina_core::{CollectibleKind, InputState, Key, Phase};
use lumina_rendering::{
    visuals, Color, FrameInput, Presentation, RenderingBackend, RenderingError, Scene,
};
use macroquad::{
    input::{is_key_down, is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
};
use tracing::{debug, info};

const WINDOW_WIDTH: i32 = 1_200;
const WINDOW_HEIGHT: i32 = 800;
const GRID_SIZE: f32 = 40.0;
const BEVEL: f32 = 4.0;
const FOG_STEPS: usize = 12;
const RING_SEGMENTS: usize = 72;

const GRID: Color = Color::from_rgb_u8(0x1e, 0x29, 0x3b);
const WALL_HIGHLIGHT: Color = Color::from_rgb_u8(0x33, 0x41, 0x55);
const WALL_SHADE: Color = Color::from_rgb_u8(0x0f, 0x17, 0x2a);
const ORB: Color = Color::from_rgb_u8(0xfc, 0xd3, 0x4d);
const RUNE: Color = Color::from_rgb_u8(0x22, 0xd3, 0xee);
const PORTAL_OPEN: Color = Color::from_rgb_u8(0xa8, 0x55, 0xf7);
const PORTAL_GLOW: Color = Color::from_rgb_u8(0xd8, 0xb4, 0xfe);
const PORTAL_CLOSED: Color = Color::from_rgb_u8(0x33, 0x41, 0x55);
const PORTAL_FRAME: Color = Color::from_rgb_u8(0x47, 0x55, 0x69);
const SHADOW: Color = Color::new(0.0, 0.0, 0.0, 1.0);
const EYES: Color = Color::from_rgb_u8(0xef, 0x44, 0x44);
const AVATAR: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const AVATAR_CORE: Color = Color::from_rgb_u8(0xcc, 0xfb, 0xf1);

/// Physical keys feeding the held-key snapshot.
const KEY_BINDINGS: [(KeyCode, Key); 9] = [
    (KeyCode::W, Key::Up),
    (KeyCode::Up, Key::Up),
    (KeyCode::S, Key::Down),
    (KeyCode::Down, Key::Down),
    (KeyCode::A, Key::Left),
    (KeyCode::Left, Key::Left),
    (KeyCode::D, Key::Right),
    (KeyCode::Right, Key::Right),
    (KeyCode::Space, Key::Dash),
];

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` stops the loop.
    quit_requested: bool,
    /// `Enter` advances the phase machine.
    confirm: bool,
    /// `N` descends after a victory.
    descend: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            confirm: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
            descend: is_key_pressed(KeyCode::N),
        }
    }
}

fn held_keys() -> InputState {
    let mut held = InputState::default();
    for (code, key) in KEY_BINDINGS {
        if is_key_down(code) {
            held.press(key);
        }
    }
    held
}

/// Counts frames and reports the rate once per second.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }
        let rate = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(rate)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let shortcuts = KeyboardShortcuts::poll();
                if shortcuts.quit_requested {
                    info!("quit requested");
                    break;
                }

                let frame_dt =
                    Duration::try_from_secs_f32(macroquad::time::get_frame_time().max(0.0))
                        .unwrap_or_default();
                let input = FrameInput {
                    held: held_keys(),
                    confirm: shortcuts.confirm,
                    descend: shortcuts.descend,
                };
                update_scene(frame_dt, input, &mut scene);

                macroquad::window::clear_background(background);
                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                match SceneMetrics::from_scene(&scene, screen) {
                    Ok(metrics) => {
                        let metrics = metrics.shaken(shake_jitter(scene.shake));
                        draw_scene(&scene, &metrics);
                        if scene.phase == Phase::Playing {
                            ui::draw_hud(&scene.hud, screen);
                        }
                        ui::draw_overlay(&scene, screen);
                    }
                    Err(error) => debug!(%error, "frame skipped"),
                }

                if show_fps {
                    if let Some(rate) = fps_counter.record_frame(frame_dt) {
                        info!(fps = rate, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping from world units to screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    /// Fits the world into the screen, centered and aspect preserving.
    fn from_scene(scene: &Scene, screen: Vec2) -> Result<Self, RenderingError> {
        scene.validate()?;
        if !(screen.x.is_finite() && screen.y.is_finite() && screen.x > 0.0 && screen.y > 0.0) {
            return Err(RenderingError::DegenerateSurface {
                width: screen.x,
                height: screen.y,
            });
        }
        let world = Vec2::new(scene.bounds.width, scene.bounds.height);
        let scale = (screen.x / world.x).min(screen.y / world.y);
        let offset = (screen - world * scale) * 0.5;
        Ok(Self { scale, offset })
    }

    /// Offsets the camera by a jitter expressed in world units.
    fn shaken(self, jitter: Vec2) -> Self {
        Self {
            offset: self.offset + jitter * self.scale,
            ..self
        }
    }

    fn project(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

fn shake_jitter(magnitude: f32) -> Vec2 {
    if magnitude <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        macroquad::rand::gen_range(-0.5, 0.5),
        macroquad::rand::gen_range(-0.5, 0.5),
    ) * magnitude
}

fn draw_scene(scene: &Scene, metrics: &SceneMetrics) {
    let phase = visuals::animation_phase(scene.time);
    draw_grid(scene, metrics);
    draw_walls(scene, metrics);
    draw_particles(scene, metrics);
    draw_collectibles(scene, metrics, phase);
    draw_shadows(scene, metrics);
    draw_avatar(scene, metrics);
    draw_texts(scene, metrics);
    draw_fog(scene, metrics);
}

fn draw_grid(scene: &Scene, metrics: &SceneMetrics) {
    let color = to_macroquad_color(GRID);
    let top_left = metrics.project(Vec2::ZERO);
    let bottom_right = metrics.project(Vec2::new(scene.bounds.width, scene.bounds.height));

    let mut x = 0.0;
    while x < scene.bounds.width {
        let screen_x = metrics.project(Vec2::new(x, 0.0)).x;
        macroquad::shapes::draw_line(screen_x, top_left.y, screen_x, bottom_right.y, 1.0, color);
        x += GRID_SIZE;
    }
    let mut y = 0.0;
    while y < scene.bounds.height {
        let screen_y = metrics.project(Vec2::new(0.0, y)).y;
        macroquad::shapes::draw_line(top_left.x, screen_y, bottom_right.x, screen_y, 1.0, color);
        y += GRID_SIZE;
    }
}

fn draw_walls(scene: &Scene, metrics: &SceneMetrics) {
    let highlight = to_macroquad_color(WALL_HIGHLIGHT);
    let shade = to_macroquad_color(WALL_SHADE);
    let bevel = metrics.length(BEVEL);

    for wall in &scene.walls {
        let origin = metrics.project(wall.bounds.position());
        let width = metrics.length(wall.bounds.width);
        let height = metrics.length(wall.bounds.height);
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            width,
            height,
            to_macroquad_color(wall.color.into()),
        );
        macroquad::shapes::draw_rectangle(origin.x, origin.y, width, bevel, highlight);
        macroquad::shapes::draw_rectangle(origin.x, origin.y, bevel, height, highlight);
        macroquad::shapes::draw_rectangle(origin.x, origin.y + height - bevel, width, bevel, shade);
        macroquad::shapes::draw_rectangle(origin.x + width - bevel, origin.y, bevel, height, shade);
    }
}

fn draw_particles(scene: &Scene, metrics: &SceneMetrics) {
    for particle in &scene.particles {
        let center = metrics.project(particle.position);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            metrics.length(particle.size),
            to_macroquad_color(particle.color),
        );
    }
}

fn draw_collectibles(scene: &Scene, metrics: &SceneMetrics, phase: f32) {
    let portal_open = scene.portal_open();
    for item in scene.collectibles.iter().filter(|item| !item.kind.is_collected()) {
        let center = metrics.project(item.bounds.center());
        let pulse = visuals::glow_pulse(phase, item.pulse_offset);
        match item.kind {
            CollectibleKind::Orb { .. } => {
                draw_glow(center, metrics.length(10.0 + pulse * 0.5), ORB);
                macroquad::shapes::draw_circle(
                    center.x,
                    center.y,
                    metrics.length(5.0),
                    to_macroquad_color(ORB),
                );
            }
            CollectibleKind::Rune { .. } => {
                draw_glow(center, metrics.length(16.0 + pulse * 0.5), RUNE);
                let vertices = visuals::rune_vertices(center, metrics.length(12.0), phase);
                draw_fan(center, &vertices, RUNE);
            }
            CollectibleKind::Portal => {
                if portal_open {
                    draw_glow(center, metrics.length(40.0), PORTAL_GLOW);
                    let corners = square_corners(
                        center,
                        metrics.length(25.0),
                        visuals::portal_rotation(phase),
                    );
                    draw_fan(center, &corners, PORTAL_OPEN);
                } else {
                    let half = metrics.length(20.0);
                    macroquad::shapes::draw_rectangle(
                        center.x - half,
                        center.y - half,
                        half * 2.0,
                        half * 2.0,
                        to_macroquad_color(PORTAL_CLOSED),
                    );
                    macroquad::shapes::draw_rectangle_lines(
                        center.x - half,
                        center.y - half,
                        half * 2.0,
                        half * 2.0,
                        1.0,
                        to_macroquad_color(PORTAL_FRAME),
                    );
                }
            }
        }
    }
}

fn draw_shadows(scene: &Scene, metrics: &SceneMetrics) {
    let body = to_macroquad_color(SHADOW);
    let eyes = to_macroquad_color(EYES);
    for enemy in scene.enemies.iter().filter(|enemy| enemy.active) {
        let center = metrics.project(enemy.bounds.center());
        macroquad::shapes::draw_circle(center.x, center.y, metrics.length(14.0), body);
        let look = center + visuals::eye_offset(enemy.heading) * metrics.scale;
        for side in [-4.0, 4.0] {
            macroquad::shapes::draw_circle(
                look.x + metrics.length(side),
                look.y - metrics.length(2.0),
                metrics.length(3.0),
                eyes,
            );
        }
    }
}

fn draw_avatar(scene: &Scene, metrics: &SceneMetrics) {
    let center = metrics.project(scene.avatar.bounds.center());
    draw_glow(center, metrics.length(15.0), AVATAR);
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        metrics.length(8.0),
        to_macroquad_color(AVATAR),
    );
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        metrics.length(4.0),
        to_macroquad_color(AVATAR_CORE),
    );
}

fn draw_texts(scene: &Scene, metrics: &SceneMetrics) {
    for label in &scene.texts {
        let anchor = metrics.project(label.position);
        draw_text_centered(
            &label.text,
            anchor.x,
            anchor.y,
            metrics.length(14.0).max(8.0),
            label.color,
        );
    }
}

/// Darkens everything outside the current visibility radius.
fn draw_fog(scene: &Scene, metrics: &SceneMetrics) {
    let center = metrics.project(scene.avatar.bounds.center());
    let radius = scene.avatar.light.radius();
    let far = (scene.bounds.width + scene.bounds.height) * 2.0;

    for band in fog_bands(radius, FOG_STEPS) {
        let color = Color::new(0.0, 0.0, 0.0, band.alpha);
        draw_ring(
            center,
            metrics.length(band.inner),
            metrics.length(band.outer),
            color,
        );
    }
    let solid = Color::new(0.0, 0.0, 0.0, visuals::FOG_OPACITY);
    draw_ring(
        center,
        metrics.length(radius.max(0.0)),
        metrics.length(far),
        solid,
    );
}

/// One ring of the fog's soft edge.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FogBand {
    inner: f32,
    outer: f32,
    alpha: f32,
}

/// Splits the soft edge between `FOG_SOFT_EDGE * radius` and `radius` into
/// `steps` rings, each shaded at its midpoint.
fn fog_bands(radius: f32, steps: usize) -> Vec<FogBand> {
    if radius <= 0.0 || steps == 0 {
        return Vec::new();
    }
    let inner = radius * visuals::FOG_SOFT_EDGE;
    let width = (radius - inner) / steps as f32;
    (0..steps)
        .map(|step| {
            let start = inner + width * step as f32;
            let end = start + width;
            FogBand {
                inner: start,
                outer: end,
                alpha: visuals::fog_alpha((start + end) * 0.5, radius),
            }
        })
        .collect()
}

fn draw_ring(center: Vec2, inner: f32, outer: f32, color: Color) {
    if outer <= inner || color.alpha <= 0.0 {
        return;
    }
    let color = to_macroquad_color(color);
    for segment in 0..RING_SEGMENTS {
        let start = segment as f32 / RING_SEGMENTS as f32 * TAU;
        let end = (segment + 1) as f32 / RING_SEGMENTS as f32 * TAU;
        let (start_dir, end_dir) = (
            Vec2::new(start.cos(), start.sin()),
            Vec2::new(end.cos(), end.sin()),
        );
        let inner_start = to_macroquad_vec(center + start_dir * inner);
        let inner_end = to_macroquad_vec(center + end_dir * inner);
        let outer_start = to_macroquad_vec(center + start_dir * outer);
        let outer_end = to_macroquad_vec(center + end_dir * outer);
        macroquad::shapes::draw_triangle(inner_start, outer_start, outer_end, color);
        macroquad::shapes::draw_triangle(inner_start, outer_end, inner_end, color);
    }
}

fn draw_glow(center: Vec2, radius: f32, color: Color) {
    if radius <= 0.0 {
        return;
    }
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        radius,
        to_macroquad_color(color.fade(0.25)),
    );
}

fn draw_fan(center: Vec2, vertices: &[Vec2], color: Color) {
    let color = to_macroquad_color(color);
    let hub = to_macroquad_vec(center);
    for (index, vertex) in vertices.iter().enumerate() {
        let next = vertices[(index + 1) % vertices.len()];
        macroquad::shapes::draw_triangle(
            hub,
            to_macroquad_vec(*vertex),
            to_macroquad_vec(next),
            color,
        );
    }
}

fn square_corners(center: Vec2, half: f32, rotation: f32) -> [Vec2; 4] {
    let axis = Vec2::from_angle(rotation);
    [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .map(|corner| center + axis.rotate(corner))
}

pub(crate) fn draw_text_centered(text: &str, center_x: f32, baseline: f32, size: f32, color: Color) {
    let font_size = size.clamp(1.0, f32::from(u16::MAX)) as u16;
    let dimensions = macroquad::text::measure_text(text, None, font_size, 1.0);
    let _ = macroquad::text::draw_text(
        text,
        center_x - dimensions.width * 0.5,
        baseline,
        f32::from(font_size),
        to_macroquad_color(color),
    );
}

fn to_macroquad_vec(vector: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(vector.x, vector.y)
}

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
