//! Level description parsing and entity placement.
//!
//! A [`LevelDescription`] is immutable once loaded; the scene keeps the
//! pristine copy and re-places everything from it on every restart.

use std::path::Path;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::engine::anim::ANIM_BURNING;
use crate::engine::{BodyDef, BodyHandle, BodyKind, PhysicsWorld, Renderer, SpriteId};
use crate::sim::agent::IDLE_FRAME;

/// Visual key for the agent spritesheet.
pub const AGENT_KEY: &str = "player";
/// Visual key for hazard sprites.
pub const HAZARD_KEY: &str = "fire";
/// Visual key for the goal sprite.
pub const GOAL_KEY: &str = "goal";

/// Load-time failures. A level that fails to load is unusable; there is no
/// partial construction and no recovery path.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level description: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level description: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    /// Visual key; also decides the single-tile dimensions.
    pub key: String,
    /// Horizontal tile count. Out-of-range values (zero, negative before
    /// deserialization) are not validated and produce undefined layout.
    pub num_tiles: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HazardSpec {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpawnerConfig {
    /// Milliseconds between projectile emissions.
    pub interval: u64,
    /// Horizontal launch speed; the sign fixes the direction.
    pub speed: f32,
    /// Milliseconds a projectile stays live.
    pub lifespan: u64,
}

/// Structured level data. All placement flows from this.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDescription {
    pub world: WorldBounds,
    pub platforms: Vec<PlatformSpec>,
    pub fires: Vec<HazardSpec>,
    pub player: SpawnPoint,
    pub goal: SpawnPoint,
    pub spawner: SpawnerConfig,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LevelError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// A placed entity: collaborator handles plus the spec position.
#[derive(Debug, Clone, Copy)]
pub struct Placed {
    pub body: BodyHandle,
    pub sprite: SpriteId,
    pub position: Vec2,
}

/// Everything [`load_level`] placed, in description order.
#[derive(Debug)]
pub struct PlacedLevel {
    pub bounds: Vec2,
    pub platforms: Vec<Placed>,
    pub hazards: Vec<Placed>,
    pub agent: Placed,
    pub goal: Placed,
}

/// Instantiate a level with the collaborators: world bounds first, then
/// platforms, hazards, agent and goal, then camera framing bound to the
/// agent.
pub fn load_level(
    desc: &LevelDescription,
    physics: &mut dyn PhysicsWorld,
    renderer: &mut dyn Renderer,
) -> PlacedLevel {
    let bounds = Vec2::new(desc.world.width, desc.world.height);
    physics.set_world_bounds(bounds);

    let platforms = desc
        .platforms
        .iter()
        .map(|spec| place_platform(spec, physics, renderer))
        .collect();

    let hazards = desc
        .fires
        .iter()
        .map(|spec| {
            let position = Vec2::new(spec.x, spec.y);
            let sprite = renderer.place_sprite(HAZARD_KEY, position);
            renderer.play_animation(sprite, ANIM_BURNING);
            let body = physics.create_body(BodyDef::new(
                BodyKind::Kinematic,
                position,
                renderer.tile_size(HAZARD_KEY),
            ));
            Placed {
                body,
                sprite,
                position,
            }
        })
        .collect();

    let agent_position = Vec2::new(desc.player.x, desc.player.y);
    let agent_sprite = renderer.place_sprite(AGENT_KEY, agent_position);
    renderer.set_frame(agent_sprite, IDLE_FRAME);
    let mut agent_def = BodyDef::new(
        BodyKind::Dynamic,
        agent_position,
        renderer.tile_size(AGENT_KEY),
    );
    agent_def.collide_world_bounds = true;
    let agent = Placed {
        body: physics.create_body(agent_def),
        sprite: agent_sprite,
        position: agent_position,
    };

    let goal_position = Vec2::new(desc.goal.x, desc.goal.y);
    let goal_sprite = renderer.place_sprite(GOAL_KEY, goal_position);
    let goal = Placed {
        body: physics.create_body(BodyDef::new(
            BodyKind::Dynamic,
            goal_position,
            renderer.tile_size(GOAL_KEY),
        )),
        sprite: goal_sprite,
        position: goal_position,
    };

    renderer.set_camera_bounds(bounds);
    renderer.camera_follow(agent.sprite);

    PlacedLevel {
        bounds,
        platforms,
        hazards,
        agent,
        goal,
    }
}

/// One static visual for a single tile, a composed strip for more.
fn place_platform(
    spec: &PlatformSpec,
    physics: &mut dyn PhysicsWorld,
    renderer: &mut dyn Renderer,
) -> Placed {
    let position = Vec2::new(spec.x, spec.y);
    let tile = renderer.tile_size(&spec.key);
    let sprite = if spec.num_tiles == 1 {
        renderer.place_sprite(&spec.key, position)
    } else {
        renderer.place_tiled(&spec.key, position, spec.num_tiles)
    };
    let size = Vec2::new(tile.x * spec.num_tiles as f32, tile.y);
    let body = physics.create_body(BodyDef::new(BodyKind::Static, position, size));
    Placed {
        body,
        sprite,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::headless::{HeadlessRenderer, HeadlessWorld};

    const LEVEL_JSON: &str = r#"{
        "world": { "width": 360, "height": 700 },
        "platforms": [
            { "x": 0, "y": 560, "key": "ground", "numTiles": 1 },
            { "x": 40, "y": 450, "key": "platform", "numTiles": 6 }
        ],
        "fires": [ { "x": 160, "y": 424 }, { "x": 224, "y": 424 } ],
        "player": { "x": 50, "y": 520 },
        "goal": { "x": 150, "y": 40 },
        "spawner": { "interval": 3000, "speed": -100, "lifespan": 7000 }
    }"#;

    fn load(json: &str) -> (LevelDescription, PlacedLevel, HeadlessWorld, HeadlessRenderer) {
        let desc = LevelDescription::from_json(json).unwrap();
        let mut physics = HeadlessWorld::new(1000.0);
        let mut renderer = HeadlessRenderer::new();
        let placed = load_level(&desc, &mut physics, &mut renderer);
        (desc, placed, physics, renderer)
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let err = LevelDescription::from_json(r#"{ "world": { "width": 1, "height": 1 } }"#)
            .unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_one_entity_per_spec_entry() {
        let (desc, placed, _, _) = load(LEVEL_JSON);
        assert_eq!(placed.platforms.len(), desc.platforms.len());
        assert_eq!(placed.hazards.len(), desc.fires.len());
    }

    #[test]
    fn test_single_tile_platform_at_exact_position() {
        let (_, placed, _, renderer) = load(LEVEL_JSON);
        let single = &placed.platforms[0];
        assert_eq!(single.position, Vec2::new(0.0, 560.0));
        assert_eq!(renderer.sprite_position(single.sprite), Some(single.position));
        assert_eq!(renderer.sprite_size(single.sprite), Some(Vec2::new(32.0, 32.0)));
    }

    #[test]
    fn test_tiled_platform_width() {
        let (_, placed, _, renderer) = load(LEVEL_JSON);
        let strip = &placed.platforms[1];
        // 6 tiles × 32px, same height as a single tile
        assert_eq!(renderer.sprite_size(strip.sprite), Some(Vec2::new(192.0, 32.0)));
        assert_eq!(renderer.sprite_position(strip.sprite), Some(Vec2::new(40.0, 450.0)));
    }

    #[test]
    fn test_hazards_burn() {
        let (_, placed, _, renderer) = load(LEVEL_JSON);
        for hazard in &placed.hazards {
            assert_eq!(renderer.playing(hazard.sprite), Some(ANIM_BURNING));
        }
    }

    #[test]
    fn test_camera_bound_to_world_and_agent() {
        let (_, placed, _, renderer) = load(LEVEL_JSON);
        assert_eq!(renderer.camera_bounds(), Vec2::new(360.0, 700.0));
        assert_eq!(renderer.camera_target(), Some(placed.agent.sprite));
    }

    #[test]
    fn test_agent_starts_idle() {
        let (_, placed, _, renderer) = load(LEVEL_JSON);
        assert_eq!(renderer.frame(placed.agent.sprite), Some(IDLE_FRAME));
        assert_eq!(renderer.playing(placed.agent.sprite), None);
    }
}
