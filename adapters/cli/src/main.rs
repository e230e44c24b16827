#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that launches Lumina in a window or headless.

mod headless;
mod scene;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use lumina_core::{tuning::Tuning, LevelIndex, SilentAudio, GAME_TITLE};
use lumina_rendering::{Color, Presentation, RenderingBackend, Scene};
use lumina_rendering_macroquad::MacroquadBackend;
use lumina_system_level_generation::derive_labeled_seed;
use lumina_system_session::{Session, SessionConfig, DEFAULT_SEED};
use lumina_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CLEAR_COLOR: Color = Color::from_rgb_u8(0x02, 0x06, 0x17);

/// Survive the dark, gather runes and escape through the portal.
#[derive(Debug, Parser)]
#[command(name = "lumina", version)]
struct CliArgs {
    /// TOML file overriding the default tuning tables.
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,

    /// Seed for level layouts and effect randomness.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Level entered when leaving the menu.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,

    /// Plays the given number of ticks with a scripted pilot and no window.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Synchronizes presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,

    /// Presents frames as fast as possible.
    #[arg(long, overrides_with = "vsync")]
    no_vsync: bool,

    /// Draws a frames-per-second counter.
    #[arg(long)]
    show_fps: bool,

    /// Logs at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl CliArgs {
    fn vsync(&self) -> bool {
        self.vsync || !self.no_vsync
    }
}

/// Entry point for the Lumina command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let tuning = load_tuning(args.tuning.as_deref())?;
    let config = SessionConfig {
        tuning,
        seed: args.seed,
    };
    let mut session = Session::new(config, SilentAudio);
    let start_level = LevelIndex::new(args.level);

    if let Some(ticks) = args.headless {
        let pilot_seed = derive_labeled_seed(args.seed, headless::PILOT_STREAM);
        let mut pilot = headless::Pilot::new(pilot_seed);
        let summary = headless::run(&mut session, start_level, ticks, &mut pilot);
        info!(
            phase = ?summary.phase,
            level = summary.level.get(),
            score = summary.score,
            orbs = summary.orbs,
            light_percent = summary.light_percent,
            ticks = summary.ticks,
            "headless run finished"
        );
        return Ok(());
    }

    let world = session.world();
    let scene = Scene::new(query::bounds(world), *query::avatar(world));
    let presentation = Presentation::new(GAME_TITLE, CLEAR_COLOR, scene);
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync())
        .with_show_fps(args.show_fps);

    let mut clock = Duration::ZERO;
    backend
        .run(presentation, move |dt, input, scene| {
            clock += dt;
            scene::dispatch(&mut session, &input, start_level);
            session.update(&input.held, dt);
            scene::populate(&session, scene, clock);
        })
        .context("failed to run the macroquad window")
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    let tuning = toml::from_str(&contents)
        .with_context(|| format!("failed to parse tuning file {}", path.display()))?;
    info!(path = %path.display(), "loaded tuning overrides");
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn defaults_enable_vsync_on_level_one() {
        let args = CliArgs::try_parse_from(["lumina"]).expect("defaults parse");
        assert!(args.vsync());
        assert_eq!(args.level, 1);
        assert_eq!(args.seed, DEFAULT_SEED);
        assert!(args.headless.is_none());
    }

    #[test]
    fn last_vsync_flag_wins() {
        let off = CliArgs::try_parse_from(["lumina", "--vsync", "--no-vsync"]).expect("parse");
        assert!(!off.vsync());
        let on = CliArgs::try_parse_from(["lumina", "--no-vsync", "--vsync"]).expect("parse");
        assert!(on.vsync());
    }

    #[test]
    fn level_zero_is_rejected() {
        assert!(CliArgs::try_parse_from(["lumina", "--level", "0"]).is_err());
    }

    #[test]
    fn missing_tuning_path_uses_defaults() {
        assert_eq!(load_tuning(None).expect("defaults"), Tuning::default());
    }

    #[test]
    fn unreadable_tuning_file_is_reported() {
        let error = load_tuning(Some(Path::new("/nonexistent/lumina.toml")))
            .expect_err("missing file must fail");
        assert!(error.to_string().contains("failed to read tuning file"));
    }
}
