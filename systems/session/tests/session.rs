use std::time::Duration;

use glam::Vec2;
use lumina_core::{
    tuning::Tuning, AudioError, AudioSink, Bounds, Collectible, CollectibleId, CollectibleKind,
    DefeatCause, Enemy, EnemyId, Event, InputState, Key, LevelIndex, LevelSnapshot, Phase, Pickup,
    Rect,
};
use lumina_system_session::{Session, SessionConfig, LORE_LINES};
use lumina_world::query;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Default)]
struct RecordingAudio {
    fail_start: bool,
    starts: u32,
    pickups: Vec<Pickup>,
    dashes: u32,
}

impl AudioSink for RecordingAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        self.starts += 1;
        if self.fail_start {
            return Err(AudioError::DeviceUnavailable("no device".to_owned()));
        }
        Ok(())
    }

    fn play_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    fn play_dash(&mut self) {
        self.dashes += 1;
    }
}

fn session_with(tuning: Tuning) -> Session<RecordingAudio> {
    Session::new(
        SessionConfig {
            tuning,
            seed: 11,
        },
        RecordingAudio::default(),
    )
}

fn menu_session(tuning: Tuning) -> Session<RecordingAudio> {
    let mut session = session_with(tuning);
    session.init();
    session.skip_lore();
    assert_eq!(session.phase(), Phase::Menu);
    session
}

fn open_level(enemies: Vec<Enemy>, collectibles: Vec<Collectible>) -> LevelSnapshot {
    LevelSnapshot {
        bounds: Bounds::new(1_200.0, 800.0),
        walls: Vec::new(),
        enemies,
        collectibles,
    }
}

fn shadow(id: u32, x: f32, y: f32) -> Enemy {
    Enemy {
        id: EnemyId::new(id),
        bounds: Rect::new(x, y, 30.0, 30.0),
        velocity: Vec2::ZERO,
        speed: 2.0,
        active: true,
        heading: 0.0,
    }
}

fn orb_at_spawn() -> Collectible {
    Collectible::orb(CollectibleId::new(0), Rect::new(100.0, 100.0, 15.0, 15.0), 0.0)
}

fn escape_level() -> LevelSnapshot {
    let runes = (0..3).map(|id| {
        Collectible::rune(CollectibleId::new(id), Rect::new(100.0, 100.0, 20.0, 20.0), 0.0)
    });
    let portal = Collectible::portal(CollectibleId::new(3), Rect::new(90.0, 90.0, 60.0, 60.0));
    open_level(Vec::new(), runes.chain(std::iter::once(portal)).collect())
}

fn idle() -> InputState {
    InputState::default()
}

#[test]
fn orb_under_the_avatar_is_collected_on_the_first_tick() {
    let mut session = menu_session(Tuning::default());
    session.play(LevelIndex::FIRST, open_level(Vec::new(), vec![orb_at_spawn()]));
    assert_eq!(session.phase(), Phase::Playing);

    session.tick(&idle(), FRAME);

    assert!(query::collectibles(session.world())[0].kind.is_collected());
    assert_eq!(session.score(), 100);
    assert_eq!(session.orbs(), 1);
    let base = query::avatar(session.world()).light.base_radius();
    assert!((base - 209.92).abs() < 1e-3, "base radius was {base}");
    assert_eq!(session.audio().pickups, vec![Pickup::Orb]);
    assert_eq!(session.effects().shake(), 2.0 * 0.9);
}

#[test]
fn exhausted_light_ends_the_tick_before_shadows_and_pickups() {
    let mut tuning = Tuning::default();
    tuning.avatar.light_radius = 19.9;
    let mut session = menu_session(tuning);
    let far_shadow = shadow(0, 600.0, 600.0);
    session.play(
        LevelIndex::FIRST,
        open_level(vec![far_shadow], vec![orb_at_spawn()]),
    );

    session.tick(&idle(), FRAME);

    assert_eq!(session.phase(), Phase::Defeat);
    assert_eq!(session.defeat_cause(), Some(DefeatCause::LightExhausted));
    assert_eq!(query::enemies(session.world())[0], far_shadow);
    assert!(!query::collectibles(session.world())[0].kind.is_collected());
    assert_eq!(session.score(), 0);
    assert!(session.audio().pickups.is_empty());
    assert!(!session
        .last_events()
        .iter()
        .any(|event| matches!(event, Event::EnemyMoved { .. } | Event::Collected { .. })));
}

#[test]
fn three_runes_and_the_portal_win_the_level() {
    let mut session = menu_session(Tuning::default());
    session.play(LevelIndex::FIRST, escape_level());

    session.tick(&idle(), FRAME);

    assert_eq!(session.phase(), Phase::Victory);
    assert_eq!(session.runes(), 3);
    assert_eq!(session.score(), 1_500);
    assert_eq!(session.audio().pickups, vec![Pickup::Rune; 3]);
    assert!(session.last_events().contains(&Event::LevelCompleted {
        index: LevelIndex::FIRST
    }));
}

#[test]
fn shadow_contact_defeats_and_shakes_the_screen() {
    let mut session = menu_session(Tuning::default());
    session.play(
        LevelIndex::FIRST,
        open_level(vec![shadow(0, 95.0, 95.0)], vec![orb_at_spawn()]),
    );

    session.tick(&idle(), FRAME);

    assert_eq!(session.phase(), Phase::Defeat);
    assert_eq!(session.defeat_cause(), Some(DefeatCause::CaughtByShadow));
    assert_eq!(session.effects().shake(), 20.0);
    assert!(!query::collectibles(session.world())[0].kind.is_collected());
}

#[test]
fn dash_fires_once_per_cooldown_and_plays_its_sound() {
    let mut session = menu_session(Tuning::default());
    session.play(LevelIndex::FIRST, open_level(Vec::new(), Vec::new()));
    let dashing = InputState::with_keys([Key::Dash, Key::Right]);

    session.tick(&dashing, FRAME);
    session.tick(&dashing, FRAME);

    assert_eq!(session.audio().dashes, 1);
    assert_eq!(query::avatar(session.world()).dash.cooldown(), 39);
    assert!(!session.effects().particles().is_empty());
}

#[test]
fn lore_reveals_lines_then_opens_the_menu() {
    let mut session = session_with(Tuning::default());
    session.init();
    assert_eq!(session.phase(), Phase::Lore);
    assert_eq!(session.audio().starts, 1);
    assert_eq!(session.lore_lines(), &LORE_LINES[..1]);

    session.update(&idle(), Duration::from_millis(2_500));
    assert_eq!(session.lore_lines().len(), 2);

    session.update(&idle(), Duration::from_millis(7_500));
    assert_eq!(session.lore_lines(), &LORE_LINES[..]);

    session.update(&idle(), Duration::from_millis(1_999));
    assert_eq!(session.phase(), Phase::Lore);

    session.update(&idle(), Duration::from_millis(1));
    assert_eq!(session.phase(), Phase::Menu);
    assert!(session.lore_lines().is_empty());
    assert_eq!(session.level(), LevelIndex::FIRST);
    assert!(!query::collectibles(session.world()).is_empty());
}

#[test]
fn audio_failure_does_not_block_the_intro() {
    let mut session = Session::new(
        SessionConfig::default(),
        RecordingAudio {
            fail_start: true,
            ..RecordingAudio::default()
        },
    );
    session.init();
    session.init();

    assert_eq!(session.phase(), Phase::Lore);
    assert_eq!(session.audio().starts, 1);
}

#[test]
fn start_generates_the_first_level() {
    let mut session = menu_session(Tuning::default());
    session.start();

    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.level(), LevelIndex::FIRST);
    assert_eq!(query::enemies(session.world()).len(), 4);
    assert_eq!(session.runes_required(), 3);
    assert!((session.light_percent() - 150.0 / 280.0 * 100.0).abs() < 1e-4);
}

#[test]
fn rune_requirement_shapes_generated_levels() {
    let mut tuning = Tuning::default();
    tuning.pickups.runes_required = 2;
    let mut session = menu_session(tuning);
    assert!(!query::collectibles(session.world()).is_empty());

    session.start();

    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.runes_required(), 2);
    let runes = query::collectibles(session.world())
        .iter()
        .filter(|item| matches!(item.kind, CollectibleKind::Rune { .. }))
        .count();
    assert_eq!(runes, 2);
}

#[test]
fn start_at_skips_ahead() {
    let mut session = menu_session(Tuning::default());
    session.start_at(LevelIndex::new(3));

    assert_eq!(session.level(), LevelIndex::new(3));
    assert_eq!(query::enemies(session.world()).len(), 6);
}

#[test]
fn actions_outside_their_phase_are_ignored() {
    let mut session = session_with(Tuning::default());
    session.start();
    session.skip_lore();
    session.restart();
    session.descend();
    session.tick(&idle(), FRAME);
    assert_eq!(session.phase(), Phase::Init);

    session.init();
    session.skip_lore();
    session.restart();
    session.descend();
    session.update(&idle(), FRAME);
    assert_eq!(session.phase(), Phase::Menu);
    assert_eq!(query::tick_index(session.world()), 0);
}

#[test]
fn restart_returns_to_a_fresh_first_level() {
    let mut session = menu_session(Tuning::default());
    session.play(
        LevelIndex::new(4),
        open_level(vec![shadow(0, 95.0, 95.0)], Vec::new()),
    );
    session.tick(&idle(), FRAME);
    assert_eq!(session.phase(), Phase::Defeat);

    session.descend();
    assert_eq!(session.phase(), Phase::Defeat);

    session.restart();
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.level(), LevelIndex::FIRST);
    assert_eq!(session.defeat_cause(), None);
    assert_eq!(session.score(), 0);
    assert_eq!(session.effects().shake(), 0.0);
    assert_eq!(query::tick_index(session.world()), 0);
}

#[test]
fn descend_continues_to_a_harder_level() {
    let mut session = menu_session(Tuning::default());
    session.play(LevelIndex::FIRST, escape_level());
    session.tick(&idle(), FRAME);
    assert_eq!(session.phase(), Phase::Victory);

    session.descend();

    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.level(), LevelIndex::new(2));
    assert_eq!(query::enemies(session.world()).len(), 5);
    assert_eq!(session.runes(), 0);
}
