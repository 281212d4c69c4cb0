//! Headless zamboni session
//!
//! Reads `zamboni.toml` from the working directory (defaults when missing),
//! plays the scripted demo input and prints the final scores.

use arcade_engine::config::Config;
use arcade_engine::foundation::{logging, time::Stopwatch};
use arcade_engine::Engine;
use zamboni::assets::loader_for;
use zamboni::config::GameConfig;
use zamboni::host::ScriptedFrames;
use zamboni::ZamboniGame;

const CONFIG_PATH: &str = "zamboni.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let config = GameConfig::load_or_default(CONFIG_PATH)?;
    config.validate()?;
    log::info!("Loaded configuration ({} players, {} frames)", config.players.len(), config.demo.frames);

    let loader = loader_for(&config.assets);
    let mut frames = ScriptedFrames::from_config(&config.demo);
    let engine_config = config.engine.clone();
    let mut game = ZamboniGame::new(config, loader);

    let stopwatch = Stopwatch::start_new();
    Engine::run(engine_config, &mut game, &mut frames)?;

    for (index, score) in game.final_scores().iter().enumerate() {
        println!("Player {}: {score}", index + 1);
    }
    log::info!("Session finished in {:.1} ms", stopwatch.elapsed_millis());
    Ok(())
}
