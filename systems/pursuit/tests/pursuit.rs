use glam::Vec2;
use lumina_core::{
    tuning::AvatarTuning, Avatar, Bounds, Command, DashState, DefeatCause, Enemy, EnemyId, Event,
    LevelIndex, LevelSnapshot, Phase, Rect,
};
use lumina_system_pursuit::Pursuit;
use lumina_world::{self as world, query, World};

fn world_with_shadow(avatar: Avatar, shadow: Rect) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            index: LevelIndex::FIRST,
            level: LevelSnapshot {
                bounds: Bounds::new(1_200.0, 800.0),
                enemies: vec![Enemy {
                    id: EnemyId::new(0),
                    bounds: shadow,
                    velocity: Vec2::ZERO,
                    speed: 1.7,
                    active: true,
                    heading: 0.0,
                }],
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

fn run(world: &mut World, pursuit: &Pursuit) -> Vec<Event> {
    let mut commands = Vec::new();
    pursuit.handle(
        query::elapsed(world),
        query::avatar(world),
        query::enemies(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn touching_shadow_ends_the_level() {
    let avatar = Avatar::spawn(&AvatarTuning::default());
    let mut world = world_with_shadow(avatar, Rect::new(110.0, 110.0, 30.0, 30.0));

    let events = run(&mut world, &Pursuit::default());

    assert_eq!(query::phase(&world), Phase::Defeat);
    assert_eq!(
        query::defeat_cause(&world),
        Some(DefeatCause::CaughtByShadow)
    );
    assert!(events.contains(&Event::PhaseChanged {
        from: Phase::Playing,
        to: Phase::Defeat,
    }));
}

#[test]
fn dashing_avatar_passes_through_shadows() {
    let mut avatar = Avatar::spawn(&AvatarTuning::default());
    avatar.dash = DashState::new(40, true);
    let mut world = world_with_shadow(avatar, Rect::new(110.0, 110.0, 30.0, 30.0));

    let events = run(&mut world, &Pursuit::default());

    assert_eq!(query::phase(&world), Phase::Playing);
    assert!(matches!(
        events.as_slice(),
        [Event::EnemyMoved {
            pursuing: true,
            ..
        }]
    ));
    let shadow = query::enemies(&world)[0];
    assert!(shadow.velocity.length() > 0.0);
}

#[test]
fn shadows_close_in_over_time() {
    let avatar = Avatar::spawn(&AvatarTuning::default());
    let mut world = world_with_shadow(avatar, Rect::new(300.0, 300.0, 30.0, 30.0));
    let pursuit = Pursuit::default();
    let target = query::avatar(&world).bounds.center();

    let start = (query::enemies(&world)[0].bounds.center() - target).length();
    for _ in 0..10 {
        let _ = run(&mut world, &pursuit);
    }
    let end = (query::enemies(&world)[0].bounds.center() - target).length();
    assert!((start - end - 17.0).abs() < 1e-2);
}
