//! Headless stand-in for the physics/render collaborators.
//!
//! Just enough axis-aligned integration, separation and overlap detection
//! to drive the simulation from tests and the terminal binary. Not a
//! physics engine: no broad phase, no substeps, one separation pass per
//! registered pair per tick. Operations on stale handles are ignored.

use std::collections::HashMap;

use glam::Vec2;

use super::anim::AnimationDef;
use super::{BodyDef, BodyHandle, BodyKind, OverlapEvent, PhysicsWorld, Renderer, SpriteId};

/// Residual vertical speed below this settles to rest on contact.
const REST_EPSILON: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
struct Body {
    kind: BodyKind,
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    bounce: Vec2,
    collide_world_bounds: bool,
    enabled: bool,
    grounded: bool,
}

fn intersects(a: &Body, b: &Body) -> bool {
    a.position.x < b.position.x + b.size.x
        && a.position.x + a.size.x > b.position.x
        && a.position.y < b.position.y + b.size.y
        && a.position.y + a.size.y > b.position.y
}

/// Minimal axis-aligned physics collaborator.
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    gravity_y: f32,
    bounds: Vec2,
    bodies: Vec<Body>,
    colliders: Vec<(BodyHandle, BodyHandle)>,
    overlaps: Vec<(BodyHandle, BodyHandle)>,
}

impl HeadlessWorld {
    pub fn new(gravity_y: f32) -> Self {
        Self {
            gravity_y,
            ..Self::default()
        }
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize)
    }

    /// Separate dynamic `a` out of static `b` along the shallower axis.
    fn resolve_pair(&mut self, a: BodyHandle, b: BodyHandle) {
        let (Some(moving), Some(terrain)) = (self.body(a).copied(), self.body(b).copied()) else {
            return;
        };
        if !moving.enabled || !terrain.enabled || !intersects(&moving, &terrain) {
            return;
        }
        let overlap_x = (moving.position.x + moving.size.x).min(terrain.position.x + terrain.size.x)
            - moving.position.x.max(terrain.position.x);
        let overlap_y = (moving.position.y + moving.size.y).min(terrain.position.y + terrain.size.y)
            - moving.position.y.max(terrain.position.y);
        let a_center = moving.position + moving.size * 0.5;
        let b_center = terrain.position + terrain.size * 0.5;
        let Some(body) = self.body_mut(a) else { return };
        if overlap_y <= overlap_x {
            if a_center.y < b_center.y {
                // Landing on top
                body.position.y = terrain.position.y - body.size.y;
                if body.velocity.y > 0.0 {
                    body.velocity.y = -body.velocity.y * body.bounce.y;
                    if body.velocity.y.abs() < REST_EPSILON {
                        body.velocity.y = 0.0;
                    }
                }
                body.grounded = true;
            } else {
                // Bumping from below
                body.position.y = terrain.position.y + terrain.size.y;
                if body.velocity.y < 0.0 {
                    body.velocity.y = -body.velocity.y * body.bounce.y;
                }
            }
        } else {
            if a_center.x < b_center.x {
                body.position.x = terrain.position.x - body.size.x;
            } else {
                body.position.x = terrain.position.x + terrain.size.x;
            }
            body.velocity.x = -body.velocity.x * body.bounce.x;
        }
    }

    fn clamp_to_bounds(&mut self, handle: BodyHandle) {
        let bounds = self.bounds;
        let Some(body) = self.body_mut(handle) else {
            return;
        };
        if !body.collide_world_bounds {
            return;
        }
        if body.position.x < 0.0 {
            body.position.x = 0.0;
            body.velocity.x = -body.velocity.x * body.bounce.x;
        } else if body.position.x + body.size.x > bounds.x {
            body.position.x = bounds.x - body.size.x;
            body.velocity.x = -body.velocity.x * body.bounce.x;
        }
        if body.position.y < 0.0 {
            body.position.y = 0.0;
            if body.velocity.y < 0.0 {
                body.velocity.y = -body.velocity.y * body.bounce.y;
            }
        } else if body.position.y + body.size.y > bounds.y {
            body.position.y = bounds.y - body.size.y;
            if body.velocity.y > 0.0 {
                body.velocity.y = -body.velocity.y * body.bounce.y;
                if body.velocity.y.abs() < REST_EPSILON {
                    body.velocity.y = 0.0;
                }
            }
            body.grounded = true;
        }
    }
}

impl PhysicsWorld for HeadlessWorld {
    fn set_world_bounds(&mut self, size: Vec2) {
        self.bounds = size;
    }

    fn create_body(&mut self, def: BodyDef) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Body {
            kind: def.kind,
            position: def.position,
            size: def.size,
            velocity: Vec2::ZERO,
            bounce: def.bounce,
            collide_world_bounds: def.collide_world_bounds,
            enabled: true,
            grounded: false,
        });
        handle
    }

    fn remove_all(&mut self) {
        self.bodies.clear();
        self.colliders.clear();
        self.overlaps.clear();
    }

    fn set_enabled(&mut self, body: BodyHandle, enabled: bool) {
        if let Some(body) = self.body_mut(body) {
            body.enabled = enabled;
        }
    }

    fn position(&self, body: BodyHandle) -> Vec2 {
        self.body(body).map(|b| b.position).unwrap_or_default()
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            body.position = position;
        }
    }

    fn velocity(&self, body: BodyHandle) -> Vec2 {
        self.body(body).map(|b| b.velocity).unwrap_or_default()
    }

    fn set_velocity_x(&mut self, handle: BodyHandle, vx: f32) {
        if let Some(body) = self.body_mut(handle) {
            body.velocity.x = vx;
        }
    }

    fn set_velocity_y(&mut self, handle: BodyHandle, vy: f32) {
        if let Some(body) = self.body_mut(handle) {
            body.velocity.y = vy;
        }
    }

    fn grounded(&self, body: BodyHandle) -> bool {
        self.body(body).is_some_and(|b| b.grounded)
    }

    fn add_collider(&mut self, body: BodyHandle, terrain: &[BodyHandle]) {
        for &t in terrain {
            self.colliders.push((body, t));
        }
    }

    fn add_overlap(&mut self, a: BodyHandle, b: BodyHandle) {
        self.overlaps.push((a, b));
    }

    fn step(&mut self, dt: f32) -> Vec<OverlapEvent> {
        let gravity = self.gravity_y;
        for body in &mut self.bodies {
            body.grounded = false;
            if body.kind != BodyKind::Dynamic || !body.enabled {
                continue;
            }
            body.velocity.y += gravity * dt;
            body.position += body.velocity * dt;
        }
        for index in 0..self.colliders.len() {
            let (a, b) = self.colliders[index];
            self.resolve_pair(a, b);
        }
        for index in 0..self.bodies.len() {
            self.clamp_to_bounds(BodyHandle(index as u32));
        }
        let mut events = Vec::new();
        for &(a, b) in &self.overlaps {
            let (Some(first), Some(second)) = (self.body(a), self.body(b)) else {
                continue;
            };
            if first.enabled && second.enabled && intersects(first, second) {
                events.push(OverlapEvent { a, b });
            }
        }
        events
    }
}

#[derive(Debug, Clone)]
struct Sprite {
    key: String,
    position: Vec2,
    size: Vec2,
    visible: bool,
    flip_x: bool,
    frame: Option<u32>,
    playing: Option<String>,
}

/// Minimal render collaborator recording what the simulation asked of it.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    tile_sizes: HashMap<String, Vec2>,
    sprites: Vec<Sprite>,
    animations: Vec<AnimationDef>,
    camera_bounds: Vec2,
    camera_target: Option<SpriteId>,
    flashes: Vec<u64>,
    fades: Vec<u64>,
    texts: Vec<String>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the single-tile dimensions for a visual key (default 32×32).
    pub fn set_tile_size(&mut self, key: &str, size: Vec2) {
        self.tile_sizes.insert(key.to_owned(), size);
    }

    fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.0 as usize)
    }

    fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id.0 as usize)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn sprite_key(&self, id: SpriteId) -> Option<&str> {
        self.sprite(id).map(|s| s.key.as_str())
    }

    pub fn sprite_position(&self, id: SpriteId) -> Option<Vec2> {
        self.sprite(id).map(|s| s.position)
    }

    pub fn sprite_size(&self, id: SpriteId) -> Option<Vec2> {
        self.sprite(id).map(|s| s.size)
    }

    pub fn is_visible(&self, id: SpriteId) -> bool {
        self.sprite(id).is_some_and(|s| s.visible)
    }

    pub fn is_flipped(&self, id: SpriteId) -> bool {
        self.sprite(id).is_some_and(|s| s.flip_x)
    }

    pub fn playing(&self, id: SpriteId) -> Option<&str> {
        self.sprite(id).and_then(|s| s.playing.as_deref())
    }

    pub fn frame(&self, id: SpriteId) -> Option<u32> {
        self.sprite(id).and_then(|s| s.frame)
    }

    pub fn camera_bounds(&self) -> Vec2 {
        self.camera_bounds
    }

    pub fn camera_target(&self) -> Option<SpriteId> {
        self.camera_target
    }

    pub fn flash_count(&self) -> usize {
        self.flashes.len()
    }

    pub fn fade_count(&self) -> usize {
        self.fades.len()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}

impl Renderer for HeadlessRenderer {
    fn register_animation(&mut self, def: &AnimationDef) {
        if !self.animations.iter().any(|a| a.name == def.name) {
            self.animations.push(def.clone());
        }
    }

    fn place_sprite(&mut self, key: &str, position: Vec2) -> SpriteId {
        let size = self.tile_size(key);
        let id = SpriteId(self.sprites.len() as u32);
        self.sprites.push(Sprite {
            key: key.to_owned(),
            position,
            size,
            visible: true,
            flip_x: false,
            frame: None,
            playing: None,
        });
        id
    }

    fn place_tiled(&mut self, key: &str, position: Vec2, num_tiles: u32) -> SpriteId {
        let tile = self.tile_size(key);
        let id = self.place_sprite(key, position);
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.size = Vec2::new(tile.x * num_tiles as f32, tile.y);
        }
        id
    }

    fn tile_size(&self, key: &str) -> Vec2 {
        self.tile_sizes
            .get(key)
            .copied()
            .unwrap_or(Vec2::new(32.0, 32.0))
    }

    fn remove_all(&mut self) {
        self.sprites.clear();
        self.camera_target = None;
        self.texts.clear();
    }

    fn set_visible(&mut self, id: SpriteId, visible: bool) {
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.visible = visible;
        }
    }

    fn set_flip_x(&mut self, id: SpriteId, flip: bool) {
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.flip_x = flip;
        }
    }

    fn play_animation(&mut self, id: SpriteId, name: &str) {
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.playing = Some(name.to_owned());
            sprite.frame = None;
        }
    }

    fn stop_animation(&mut self, id: SpriteId) {
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.playing = None;
        }
    }

    fn set_frame(&mut self, id: SpriteId, frame: u32) {
        if let Some(sprite) = self.sprite_mut(id) {
            sprite.frame = Some(frame);
        }
    }

    fn set_camera_bounds(&mut self, size: Vec2) {
        self.camera_bounds = size;
    }

    fn camera_follow(&mut self, id: SpriteId) {
        self.camera_target = Some(id);
    }

    fn flash(&mut self, duration_ms: u64) {
        self.flashes.push(duration_ms);
    }

    fn fade(&mut self, duration_ms: u64) {
        self.fades.push(duration_ms);
    }

    fn show_text(&mut self, text: &str, _position: Vec2) {
        self.texts.push(text.to_owned());
    }
}
