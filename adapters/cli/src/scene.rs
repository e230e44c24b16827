//! Bridges the session to the backend-facing scene and frame input.

use std::time::Duration;

use lumina_core::{AudioSink, LevelIndex, Phase};
use lumina_rendering::{Color, FrameInput, Hud, Scene, SceneParticle, SceneText};
use lumina_system_session::Session;
use lumina_world::query;

/// Routes the confirm and descend keys to the action valid in the current phase.
pub(crate) fn dispatch<A: AudioSink>(
    session: &mut Session<A>,
    input: &FrameInput,
    start_level: LevelIndex,
) {
    if input.confirm {
        match session.phase() {
            Phase::Init => session.init(),
            Phase::Lore => session.skip_lore(),
            Phase::Menu => session.start_at(start_level),
            Phase::Defeat | Phase::Victory => session.restart(),
            Phase::Playing => {}
        }
    } else if input.descend {
        session.descend();
    }
}

/// Copies the session state the backend draws into `scene`.
pub(crate) fn populate<A: AudioSink>(session: &Session<A>, scene: &mut Scene, time: Duration) {
    let world = session.world();
    scene.bounds = query::bounds(world);
    scene.walls.clear();
    scene.walls.extend_from_slice(query::walls(world));
    scene.enemies.clear();
    scene.enemies.extend_from_slice(query::enemies(world));
    scene.collectibles.clear();
    scene
        .collectibles
        .extend_from_slice(query::collectibles(world));
    scene.avatar = *query::avatar(world);

    let effects = session.effects();
    scene.particles.clear();
    scene
        .particles
        .extend(effects.particles().iter().map(|particle| SceneParticle {
            position: particle.position,
            size: particle.size,
            color: Color::from(particle.color).fade(particle.opacity()),
        }));
    scene.texts.clear();
    scene.texts.extend(effects.texts().iter().map(|text| SceneText {
        position: text.position,
        text: text.text.clone(),
        color: Color::from(text.color).fade(text.life),
    }));
    scene.shake = effects.shake();

    scene.time = time;
    scene.phase = session.phase();
    scene.hud = Hud {
        score: session.score(),
        runes: session.runes(),
        runes_required: session.runes_required(),
        orbs: session.orbs(),
        light_percent: session.light_percent(),
        level: session.level().get(),
        dash_ready: scene.avatar.dash.cooldown() == 0,
    };
    scene.lore.clear();
    scene.lore.extend_from_slice(session.lore_lines());
    scene.defeat_cause = session.defeat_cause();
}
