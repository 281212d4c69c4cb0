//! Rink behaviour end to end: movement, hits, scoring and respawn

use approx::assert_relative_eq;
use arcade_engine::ecs::components::place;
use arcade_engine::ecs::{AttrKey, EntityId};
use arcade_engine::foundation::math::{Rect, Vec2};
use arcade_engine::input::InputState;
use arcade_engine::Engine;
use std::rc::Rc;
use zamboni::assets::bundled;
use zamboni::components::{EXPLOSION, ICE, PLAYER};
use zamboni::config::{GameConfig, PlayerConfig};
use zamboni::host::ScriptedFrames;
use zamboni::scenes::MAIN;
use zamboni::{build_engine, scores, ZamboniGame};

fn rink(config: GameConfig) -> Engine {
    let loader = Rc::new(bundled(&config.assets));
    let (mut engine, _) = build_engine(config, loader).unwrap();
    engine.tick(0.5, &InputState::new()).unwrap();
    assert_eq!(engine.current_scene(), Some(MAIN));
    engine
}

fn only(engine: &Engine, component: &str) -> EntityId {
    let found: Vec<_> = engine.world().with_component(component).collect();
    assert_eq!(found.len(), 1, "expected one {component}");
    found[0]
}

fn single_player_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.players.truncate(1);
    config.arena.ice_count = 1;
    config
}

#[test]
fn test_player_stays_inside_bounds() {
    let mut config = single_player_config();
    config.arena.ice_count = 0;
    let mut engine = rink(config);
    let player = only(&engine, PLAYER);

    let left = InputState::new().holding("p1.left");
    engine.tick(0.05, &left).unwrap();
    assert_relative_eq!(engine.world().position(player).unwrap().x, 95.0, epsilon = 1e-3);

    // 95 - 15 leaves the bounds at x = 90, so the step is reverted
    engine.tick(0.05, &left).unwrap();
    assert_relative_eq!(engine.world().position(player).unwrap().x, 95.0, epsilon = 1e-3);

    let up = InputState::new().holding("p1.up");
    for _ in 0..200 {
        engine.tick(0.05, &up).unwrap();
        let bounds = engine.world().bounds(player).unwrap();
        assert!(Rect::new(90.0, 65.0, 800.0, 490.0).contains_rect(&bounds));
    }
}

#[test]
fn test_driving_over_ice_scores_and_respawns() {
    let config = single_player_config();
    let spawn = config.arena.ice_spawn;
    let mut engine = rink(config);
    let player = only(&engine, PLAYER);
    let ice = only(&engine, ICE);
    assert_eq!(engine.world().position(player).unwrap(), Vec2::new(110.0, 300.0));

    engine.world_mut().set_position(ice, Vec2::new(120.0, 310.0)).unwrap();
    let report = engine.tick(1.0 / 60.0, &InputState::new()).unwrap();
    assert_eq!(report.hits, 1);
    assert_eq!(scores(engine.world()), vec![1]);
    assert_eq!(engine.world().get_f32(ice, AttrKey::X).unwrap(), -2000.0);

    let explosion = only(&engine, EXPLOSION);
    assert_eq!(engine.world().position(explosion).unwrap(), Vec2::new(120.0, 310.0));
    assert_eq!(engine.world().bounds(explosion).unwrap().w, 32.0);

    // Out of the way of wherever the crack comes back
    place(engine.world_mut(), player, Rect::new(820.0, 300.0, 64.0, 64.0)).unwrap();
    for _ in 0..11 {
        engine.tick(0.1, &InputState::new()).unwrap();
    }
    let bounds = engine.world().bounds(ice).unwrap();
    assert!(bounds.x >= spawn.x && bounds.x < spawn.right());
    assert!(bounds.y >= spawn.y && bounds.y < spawn.bottom() - bounds.h);
    assert!(!engine.world().contains(explosion), "explosion should have faded");
    assert_eq!(scores(engine.world()), vec![1]);
}

#[test]
fn test_each_player_scores_on_own_board() {
    let mut config = GameConfig::default();
    config.arena.ice_count = 2;
    config.players = PlayerConfig::defaults();
    let mut engine = rink(config);

    let players: Vec<_> = engine.world().with_component(PLAYER).collect();
    let ice: Vec<_> = engine.world().with_component(ICE).collect();
    // Second player only
    let target = engine.world().position(players[1]).unwrap() + Vec2::new(10.0, 10.0);
    engine.world_mut().set_position(ice[0], target).unwrap();
    engine.world_mut().set_position(ice[1], Vec2::new(-500.0, 0.0)).unwrap();

    engine.tick(1.0 / 60.0, &InputState::new()).unwrap();
    assert_eq!(scores(engine.world()), vec![0, 1]);
}

#[test]
fn test_scripted_session_runs_to_the_end() {
    let mut config = GameConfig::default();
    config.demo.frames = 120;
    let mut frames = ScriptedFrames::from_config(&config.demo);
    let engine_config = config.engine.clone();
    let loader = Rc::new(bundled(&config.assets));
    let mut game = ZamboniGame::new(config, loader);

    Engine::run(engine_config, &mut game, &mut frames).unwrap();
    assert_eq!(frames.frame(), 120);
    assert_eq!(game.final_scores().len(), 2);
}
