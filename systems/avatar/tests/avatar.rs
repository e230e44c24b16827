use std::time::Duration;

use glam::Vec2;
use lumina_core::{
    tuning::AvatarTuning, Avatar, Bounds, Command, DefeatCause, Event, InputState, Key,
    LevelIndex, LevelSnapshot, Light, Phase,
};
use lumina_system_avatar::AvatarController;
use lumina_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

fn playing_world(avatar: Avatar) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            index: LevelIndex::FIRST,
            level: LevelSnapshot {
                bounds: Bounds::new(1_200.0, 800.0),
                ..LevelSnapshot::default()
            },
            avatar,
        },
        &mut events,
    );
    for phase in [Phase::Lore, Phase::Menu, Phase::Playing] {
        world::apply(&mut world, Command::SetPhase { phase }, &mut events);
    }
    world
}

fn step(world: &mut World, controller: &mut AvatarController, input: &InputState) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);

    let mut commands = Vec::new();
    controller.handle(
        query::elapsed(world),
        input,
        query::avatar(world),
        query::walls(world),
        query::bounds(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn base_light_decays_by_fixed_amount_every_tick() {
    let tuning = AvatarTuning::default();
    let mut world = playing_world(Avatar::spawn(&tuning));
    let mut controller = AvatarController::new(tuning, 11);
    let idle = InputState::default();

    let mut previous = query::avatar(&world).light.base_radius();
    for _ in 0..200 {
        let _ = step(&mut world, &mut controller, &idle);
        let current = query::avatar(&world).light.base_radius();
        assert!((previous - current - 0.08).abs() < 1e-3);
        assert!(query::avatar(&world).light.radius() >= 0.0);
        previous = current;
    }
    assert_eq!(query::phase(&world), Phase::Playing);
}

#[test]
fn defeat_fires_on_the_tick_light_crosses_the_threshold() {
    let tuning = AvatarTuning::default();
    let mut avatar = Avatar::spawn(&tuning);
    avatar.light = Light::new(20.1, tuning.max_light_radius);
    let mut world = playing_world(avatar);
    let mut controller = AvatarController::new(tuning, 3);
    let idle = InputState::default();

    let _ = step(&mut world, &mut controller, &idle);
    assert_eq!(query::phase(&world), Phase::Playing);

    let events = step(&mut world, &mut controller, &idle);
    assert_eq!(query::phase(&world), Phase::Defeat);
    assert_eq!(
        query::defeat_cause(&world),
        Some(DefeatCause::LightExhausted)
    );
    assert!(events.contains(&Event::AvatarDefeated {
        cause: DefeatCause::LightExhausted
    }));
}

#[test]
fn dash_sets_cooldown_and_boosts_speed() {
    let tuning = AvatarTuning::default();
    let mut world = playing_world(Avatar::spawn(&tuning));
    let mut controller = AvatarController::new(tuning, 5);
    let dash_right = InputState::with_keys([Key::Right, Key::Dash]);

    let events = step(&mut world, &mut controller, &dash_right);
    let avatar = query::avatar(&world);
    assert_eq!(avatar.dash.cooldown(), 40);
    assert!(avatar.dash.is_dashing());
    assert_eq!(avatar.bounds.position(), Vec2::new(112.0, 100.0));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::DashStarted { .. })));

    let _ = step(&mut world, &mut controller, &dash_right);
    let avatar = query::avatar(&world);
    assert_eq!(avatar.dash.cooldown(), 39);
    assert!(!avatar.dash.is_dashing());
    assert_eq!(avatar.velocity, Vec2::new(10.0, 0.0));

    for _ in 0..9 {
        let _ = step(&mut world, &mut controller, &dash_right);
    }
    let avatar = query::avatar(&world);
    assert_eq!(avatar.dash.cooldown(), 30);
    assert_eq!(avatar.velocity, Vec2::new(4.0, 0.0));
}

#[test]
fn dash_while_cooling_changes_nothing() {
    let tuning = AvatarTuning::default();
    let mut held = Avatar::spawn(&tuning);
    held.dash = lumina_core::DashState::new(20, false);
    let mut released = held;

    let mut first = playing_world(held);
    let mut second = playing_world(released);
    let mut first_controller = AvatarController::new(tuning.clone(), 9);
    let mut second_controller = AvatarController::new(tuning, 9);

    let _ = step(
        &mut first,
        &mut first_controller,
        &InputState::with_keys([Key::Down, Key::Dash]),
    );
    let _ = step(
        &mut second,
        &mut second_controller,
        &InputState::with_keys([Key::Down]),
    );

    held = *query::avatar(&first);
    released = *query::avatar(&second);
    assert_eq!(held.dash, released.dash);
    assert_eq!(held.dash.cooldown(), 19);
    assert_eq!(held.velocity, released.velocity);
    assert_eq!(held.velocity, Vec2::new(0.0, 4.0));
}

#[test]
fn diagonal_dash_is_normalized() {
    let tuning = AvatarTuning::default();
    let mut world = playing_world(Avatar::spawn(&tuning));
    let mut controller = AvatarController::new(tuning, 1);

    let _ = step(
        &mut world,
        &mut controller,
        &InputState::with_keys([Key::Down, Key::Right, Key::Dash]),
    );
    let velocity = query::avatar(&world).velocity;
    assert!((velocity.length() - 12.0).abs() < 1e-4);
    assert!((velocity.x - velocity.y).abs() < f32::EPSILON);
}
