//! Scenes: a loading screen, then the rink
//!
//! The loading scene pushes every configured image through the asset loader
//! and reports progress on a text label. Once everything loaded it waits a
//! moment and requests the main scene.

use crate::components::keys::{BOUNDS, SCOREBOARD};
use crate::components::{ICE, PLAYER, SCORE};
use crate::GameContext;
use arcade_engine::assets::{AssetError, AssetLoader, LoadObserver, LoadProgress, LoadedAsset};
use arcade_engine::ecs::components::{configure_multiway, place, set_text, TEXT};
use arcade_engine::ecs::{EntityId, World};
use arcade_engine::{Engine, EngineResult};
use std::rc::Rc;

/// Loading scene name
pub const LOADING: &str = "loading";

/// Main scene name
pub const MAIN: &str = "main";

/// Label shown before the first progress report
pub const LOADING_TEXT: &str = "loading...";

/// Label shown once any asset failed
pub const ERROR_TEXT: &str = "could not load assets";

/// Register both scenes
pub fn register(engine: &mut Engine, context: &Rc<GameContext>, loader: Rc<dyn AssetLoader>) -> EngineResult<()> {
    let loading_context = Rc::clone(context);
    engine.register_scene(LOADING, move |world| loading(world, &loading_context, loader.as_ref()))?;

    let main_context = Rc::clone(context);
    engine.register_scene(MAIN, move |world| rink(world, &main_context))
}

/// Progress reports go straight to the label
struct LoadingScreen<'a> {
    world: &'a mut World,
    label: EntityId,
    failed: bool,
    result: EngineResult<()>,
}

impl LoadingScreen<'_> {
    fn show(&mut self, text: String) {
        if self.result.is_ok() {
            self.result = set_text(self.world, self.label, text);
        }
    }
}

impl LoadObserver for LoadingScreen<'_> {
    fn on_progress(&mut self, progress: LoadProgress) {
        if !self.failed {
            self.show(format!("{LOADING_TEXT} {}% complete", progress.percent()));
        }
    }

    fn on_error(&mut self, error: &AssetError) {
        log::error!("Asset failed: {error}");
        self.failed = true;
        self.show(ERROR_TEXT.to_string());
    }

    fn on_complete(&mut self, assets: &[LoadedAsset]) {
        log::info!("All {} assets loaded", assets.len());
    }
}

fn loading(world: &mut World, context: &GameContext, loader: &dyn AssetLoader) -> EngineResult<()> {
    let label = world.spawn(&[TEXT])?;
    place(world, label, context.config.loading.label)?;
    set_text(world, label, LOADING_TEXT)?;

    let loaded = {
        let mut screen = LoadingScreen {
            world: &mut *world,
            label,
            failed: false,
            result: Ok(()),
        };
        let loaded = loader.load_assets(&context.config.images(), &mut screen);
        screen.result.map(|()| loaded)
    }?;

    if loaded {
        world.delay(label, context.config.loading.switch_delay, |world, _| {
            world.request_scene(MAIN);
            Ok(())
        })?;
    }
    Ok(())
}

fn rink(world: &mut World, context: &GameContext) -> EngineResult<()> {
    let config = &context.config;
    for player_config in &config.players {
        let scoreboard = world.spawn(&[SCORE])?;
        place(world, scoreboard, player_config.scoreboard)?;

        let player = world.spawn(&[PLAYER])?;
        context.atlas.show(world, player, &player_config.sprite)?;
        configure_multiway(world, player, config.gameplay.player_speed, player_config.controls.clone())?;
        world.set_attr(player, BOUNDS, config.arena.player_bounds)?;
        world.set_attr(player, SCOREBOARD, scoreboard)?;
        world.set_position(player, player_config.spawn)?;
    }
    for _ in 0..config.arena.ice_count {
        world.spawn(&[ICE])?;
    }
    log::info!(
        "Rink ready: {} players, {} ice cracks",
        config.players.len(),
        config.arena.ice_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use arcade_engine::ecs::AttrKey;

    #[test]
    fn test_main_scene_population() {
        let context = Rc::new(GameContext::new(GameConfig::default()));
        let mut world = World::with_builtins(3).unwrap();
        crate::components::register(&mut world, &context).unwrap();
        rink(&mut world, &context).unwrap();

        assert_eq!(world.with_component(SCORE).count(), 2);
        assert_eq!(world.with_component(ICE).count(), 5);
        let players: Vec<_> = world.with_component(PLAYER).collect();
        assert_eq!(players.len(), 2);
        for (player, player_config) in players.iter().zip(&context.config.players) {
            assert_eq!(world.position(*player).unwrap(), player_config.spawn);
            assert_eq!(world.get_text(*player, AttrKey::Sprite).unwrap(), player_config.sprite);
            let scoreboard = world.get_entity(*player, SCOREBOARD).unwrap();
            assert!(world.has_component(scoreboard, SCORE).unwrap());
        }
    }
}
