//! Barrel Climb entry point
//!
//! Loads a level description and drives the simulation headlessly with the
//! bundled collaborator stand-in, logging what happens. Rendering and
//! input devices are out of scope here; a scripted input feed stands in
//! for a player.

use std::path::Path;

use glam::Vec2;

use barrel_climb::consts::{GRAVITY_Y, TICK_RATE};
use barrel_climb::engine::headless::{HeadlessRenderer, HeadlessWorld};
use barrel_climb::level::{AGENT_KEY, HAZARD_KEY, LevelDescription, LevelError};
use barrel_climb::sim::{Scene, SimEvent, TickInput};

/// Bundled fallback when no level file is present on disk.
const DEFAULT_LEVEL: &str = include_str!("../assets/levels/level1.json");
const LEVEL_PATH: &str = "assets/levels/level1.json";

fn load_description() -> Result<LevelDescription, LevelError> {
    let path = Path::new(LEVEL_PATH);
    if path.exists() {
        log::info!("loading level from {LEVEL_PATH}");
        LevelDescription::from_file(path)
    } else {
        log::info!("using bundled level");
        LevelDescription::from_json(DEFAULT_LEVEL)
    }
}

fn main() {
    env_logger::init();

    let desc = match load_description() {
        Ok(desc) => desc,
        Err(err) => {
            log::error!("level load failed: {err}");
            std::process::exit(1);
        }
    };

    let mut physics = HeadlessWorld::new(GRAVITY_Y);
    let mut renderer = HeadlessRenderer::new();
    renderer.set_tile_size(AGENT_KEY, Vec2::new(28.0, 30.0));
    renderer.set_tile_size(HAZARD_KEY, Vec2::new(20.0, 21.0));
    // The ground texture is a single full-width slab
    renderer.set_tile_size("ground", Vec2::new(360.0, 32.0));

    let mut scene = Scene::new(desc, &mut physics, &mut renderer);

    // Scripted demo: hold right and hop every second and a half, for
    // twenty seconds of simulated time.
    let total_ticks = 20 * TICK_RATE as u64;
    for tick in 0..total_ticks {
        let input = TickInput {
            right: true,
            jump: tick % 90 == 0,
            ..Default::default()
        };
        scene.update(&input, &mut physics, &mut renderer);
        for event in scene.events() {
            match event {
                SimEvent::ProjectileSpawned(key) => {
                    log::info!("[{tick:>5}] projectile up (slot {})", key.index);
                }
                SimEvent::ProjectileExpired(key) => {
                    log::info!("[{tick:>5}] projectile gone (slot {})", key.index);
                }
                SimEvent::OutcomeDecided(outcome) => {
                    log::info!("[{tick:>5}] outcome: {outcome:?}");
                }
                SimEvent::Restarted => {
                    log::info!("[{tick:>5}] scene restarted");
                }
            }
        }
    }

    let state = scene.state();
    log::info!(
        "demo finished: tick {}, generation {}, {} projectiles live",
        state.tick,
        state.generation,
        state.spawner.live_count()
    );
}
