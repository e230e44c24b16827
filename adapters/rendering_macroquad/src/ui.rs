//! Screen-space HUD and phase overlays.
//!
//! Overlay content is resolved by [`overlay_lines`] without touching the
//! window, so the copy for every phase can be checked in tests.

use glam::Vec2;
use lumina_core::{DefeatCause, Phase, GAME_TITLE};
use lumina_rendering::{Color, Hud, Scene};

use super::{draw_text_centered, to_macroquad_color};

const VOID: Color = Color::new(0.008, 0.024, 0.09, 0.9);
const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
const PANEL: Color = Color::new(0.06, 0.09, 0.16, 0.8);
const PANEL_EDGE: Color = Color::from_rgb_u8(0x33, 0x41, 0x55);
const TITLE: Color = Color::from_rgb_u8(0xf8, 0xfa, 0xfc);
const MUTED: Color = Color::from_rgb_u8(0x64, 0x74, 0x8b);
const BODY: Color = Color::from_rgb_u8(0xcb, 0xd5, 0xe1);
const LOSS: Color = Color::from_rgb_u8(0xf8, 0x71, 0x71);
const WIN: Color = Color::from_rgb_u8(0x4a, 0xde, 0x80);
const GOLD: Color = Color::from_rgb_u8(0xfa, 0xcc, 0x15);
const AMBER: Color = Color::from_rgb_u8(0xf5, 0x9e, 0x0b);
const CYAN: Color = Color::from_rgb_u8(0x22, 0xd3, 0xee);

const LIGHT_BAR_WIDTH: f32 = 288.0;
const LIGHT_BAR_HEIGHT: f32 = 24.0;
const HUD_MARGIN: f32 = 24.0;

/// Single centered line of overlay copy.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OverlayLine {
    pub(crate) text: String,
    pub(crate) size: f32,
    pub(crate) color: Color,
}

impl OverlayLine {
    fn new(text: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            size,
            color,
        }
    }
}

/// Copy shown over the scene for the current phase, top to bottom.
pub(crate) fn overlay_lines(scene: &Scene) -> Vec<OverlayLine> {
    match scene.phase {
        Phase::Init => vec![
            OverlayLine::new(GAME_TITLE, 40.0, TITLE),
            OverlayLine::new("PRESS ENTER TO INITIALIZE SYSTEM", 18.0, MUTED),
        ],
        Phase::Lore => {
            let mut lines = Vec::new();
            if let Some(line) = scene.lore.last() {
                lines.push(OverlayLine::new(format!("\"{line}\""), 32.0, BODY));
            }
            lines.push(OverlayLine::new("[ ENTER TO SKIP SEQUENCE ]", 14.0, MUTED));
            lines
        }
        Phase::Menu => vec![
            OverlayLine::new(GAME_TITLE, 72.0, TITLE),
            OverlayLine::new("WASD / ARROWS to move", 18.0, BODY),
            OverlayLine::new("SPACE to dash", 18.0, BODY),
            OverlayLine::new("Collect Orbs to survive", 18.0, GOLD),
            OverlayLine::new(
                format!("Find {} Runes to exit", scene.hud.runes_required),
                18.0,
                CYAN,
            ),
            OverlayLine::new("PRESS ENTER TO ENTER THE ABYSS", 22.0, TITLE),
        ],
        Phase::Defeat => {
            let cause = match scene.defeat_cause {
                Some(DefeatCause::CaughtByShadow) => "A shadow consumed your light",
                Some(DefeatCause::LightExhausted) | None => "Your light burned out",
            };
            vec![
                OverlayLine::new(GAME_TITLE, 72.0, TITLE),
                OverlayLine::new("SIGNAL LOST", 28.0, LOSS),
                OverlayLine::new(cause, 16.0, MUTED),
                OverlayLine::new(format!("FINAL SCORE: {}", scene.hud.score), 18.0, MUTED),
                OverlayLine::new(format!("ORBS COLLECTED: {}", scene.hud.orbs), 14.0, MUTED),
                OverlayLine::new("PRESS ENTER TO RETRY", 22.0, TITLE),
            ]
        }
        Phase::Victory => vec![
            OverlayLine::new(GAME_TITLE, 72.0, TITLE),
            OverlayLine::new("ESCAPE SUCCESSFUL", 28.0, WIN),
            OverlayLine::new(format!("FINAL SCORE: {}", scene.hud.score), 18.0, MUTED),
            OverlayLine::new("PRESS ENTER TO RETRY", 22.0, TITLE),
            OverlayLine::new(
                format!("PRESS N TO DESCEND TO LEVEL {}", scene.hud.level.saturating_add(1)),
                18.0,
                CYAN,
            ),
        ],
        Phase::Playing => Vec::new(),
    }
}

/// Draws the phase overlay, if any, over the whole screen.
pub(crate) fn draw_overlay(scene: &Scene, screen: Vec2) {
    let backdrop = match scene.phase {
        Phase::Playing => return,
        Phase::Init | Phase::Lore => BLACK,
        Phase::Menu | Phase::Defeat | Phase::Victory => VOID,
    };
    macroquad::shapes::draw_rectangle(0.0, 0.0, screen.x, screen.y, to_macroquad_color(backdrop));

    let lines = overlay_lines(scene);
    let spacing = 1.6;
    let total: f32 = lines.iter().map(|line| line.size * spacing).sum();
    let center_x = screen.x * 0.5;

    if matches!(scene.phase, Phase::Menu | Phase::Defeat | Phase::Victory) {
        let width = (screen.x * 0.8).min(520.0);
        let height = total + 64.0;
        let x = center_x - width * 0.5;
        let y = (screen.y - height) * 0.5;
        macroquad::shapes::draw_rectangle(x, y, width, height, to_macroquad_color(PANEL));
        macroquad::shapes::draw_rectangle_lines(
            x,
            y,
            width,
            height,
            2.0,
            to_macroquad_color(PANEL_EDGE),
        );
    }

    let mut baseline = (screen.y - total) * 0.5;
    for line in &lines {
        baseline += line.size * spacing;
        draw_text_centered(&line.text, center_x, baseline, line.size, line.color);
    }
}

/// Draws the counters and the light bar while playing.
pub(crate) fn draw_hud(hud: &Hud, screen: Vec2) {
    let panel = to_macroquad_color(PANEL);
    macroquad::shapes::draw_rectangle(HUD_MARGIN, HUD_MARGIN, 200.0, 92.0, panel);
    let left = HUD_MARGIN + 100.0;
    draw_text_centered(
        &format!("RUNES {} / {}", hud.runes, hud.runes_required),
        left,
        HUD_MARGIN + 24.0,
        18.0,
        CYAN,
    );
    draw_text_centered(
        &format!("ORBS {}", hud.orbs),
        left,
        HUD_MARGIN + 46.0,
        18.0,
        GOLD,
    );
    draw_text_centered(
        &format!("SCORE: {:05}", hud.score),
        left,
        HUD_MARGIN + 66.0,
        14.0,
        MUTED,
    );
    draw_text_centered(
        &format!("LEVEL {}", hud.level),
        left,
        HUD_MARGIN + 84.0,
        14.0,
        MUTED,
    );

    let bar_x = screen.x - HUD_MARGIN - LIGHT_BAR_WIDTH;
    let bar_y = HUD_MARGIN;
    macroquad::shapes::draw_rectangle(bar_x, bar_y, LIGHT_BAR_WIDTH, LIGHT_BAR_HEIGHT, panel);
    let fill = light_bar_fill(hud.light_percent);
    let color = if hud.light_percent < 30.0 { AMBER } else { GOLD };
    macroquad::shapes::draw_rectangle(
        bar_x + 2.0,
        bar_y + 2.0,
        (LIGHT_BAR_WIDTH - 4.0) * fill,
        LIGHT_BAR_HEIGHT - 4.0,
        to_macroquad_color(color),
    );
    macroquad::shapes::draw_rectangle_lines(
        bar_x,
        bar_y,
        LIGHT_BAR_WIDTH,
        LIGHT_BAR_HEIGHT,
        1.0,
        to_macroquad_color(PANEL_EDGE),
    );
    let center = bar_x + LIGHT_BAR_WIDTH * 0.5;
    draw_text_centered("LIGHT INTEGRITY", center, bar_y + 17.0, 14.0, TITLE);
    let dash = if hud.dash_ready {
        "SPACE TO DASH"
    } else {
        "DASH RECHARGING"
    };
    draw_text_centered(dash, center, bar_y + LIGHT_BAR_HEIGHT + 18.0, 12.0, MUTED);
}

/// Fraction of the light bar that is filled.
pub(crate) fn light_bar_fill(percent: f32) -> f32 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
