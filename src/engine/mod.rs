//! Capability traits for the external physics/render collaborators.
//!
//! The simulation never talks to a real engine directly; everything it
//! needs (integrate a body, detect overlaps, place a visual entity, play a
//! named animation) is expressed here and injected at scene construction.
//! `headless` provides a minimal stand-in implementing both traits.

pub mod anim;
pub mod headless;

use glam::Vec2;

use anim::AnimationDef;

/// Opaque handle to a physics body owned by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u32);

/// Opaque handle to a placed visual entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// How the collaborator integrates a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Immovable, no gravity, blocks dynamic bodies.
    Static,
    /// Immovable, no gravity, overlap detection only.
    Kinematic,
    /// Gravity-affected, collides and overlaps.
    Dynamic,
}

/// Everything the collaborator needs to create a body. Positions are
/// top-left anchored.
#[derive(Debug, Clone, Copy)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub size: Vec2,
    /// Restitution per axis on terrain/bounds contact.
    pub bounce: Vec2,
    /// Keep the body inside the world bounds.
    pub collide_world_bounds: bool,
}

impl BodyDef {
    pub fn new(kind: BodyKind, position: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            position,
            size,
            bounce: Vec2::ZERO,
            collide_world_bounds: false,
        }
    }
}

/// An overlap reported by [`PhysicsWorld::step`] for a registered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapEvent {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

/// Physics capability the simulation calls into. Integration stepping and
/// broad/narrow-phase mathematics live behind this boundary.
pub trait PhysicsWorld {
    /// Set the world extent. Must happen before any body is placed.
    fn set_world_bounds(&mut self, size: Vec2);
    fn create_body(&mut self, def: BodyDef) -> BodyHandle;
    /// Discard every body and every registered pair. Outstanding handles
    /// become invalid.
    fn remove_all(&mut self);
    /// A disabled body is not integrated and reports no overlaps.
    fn set_enabled(&mut self, body: BodyHandle, enabled: bool);
    fn position(&self, body: BodyHandle) -> Vec2;
    fn set_position(&mut self, body: BodyHandle, position: Vec2);
    fn velocity(&self, body: BodyHandle) -> Vec2;
    fn set_velocity_x(&mut self, body: BodyHandle, vx: f32);
    fn set_velocity_y(&mut self, body: BodyHandle, vy: f32);
    /// Whether the body currently rests on or touches a static surface
    /// from below.
    fn grounded(&self, body: BodyHandle) -> bool;
    /// Register blocking collision between `body` and each terrain body.
    fn add_collider(&mut self, body: BodyHandle, terrain: &[BodyHandle]);
    /// Register overlap detection (no physical response) between `a` and `b`.
    fn add_overlap(&mut self, a: BodyHandle, b: BodyHandle);
    /// Advance integration by `dt` seconds and report overlaps among the
    /// registered pairs, in registration order.
    fn step(&mut self, dt: f32) -> Vec<OverlapEvent>;
}

/// Render capability the simulation calls into. Registered animations
/// survive [`Renderer::remove_all`]; placed entities do not.
pub trait Renderer {
    /// Make a named animation definition available to `play_animation`.
    fn register_animation(&mut self, def: &AnimationDef);
    /// Place a single sprite anchored at its top-left corner.
    fn place_sprite(&mut self, key: &str, position: Vec2) -> SpriteId;
    /// Place a horizontally tiled strip: `num_tiles` copies of `key`, total
    /// width `num_tiles × tile width`, same height.
    fn place_tiled(&mut self, key: &str, position: Vec2, num_tiles: u32) -> SpriteId;
    /// Single-tile dimensions registered for a visual key.
    fn tile_size(&self, key: &str) -> Vec2;
    /// Discard every placed entity and overlay. Outstanding ids become
    /// invalid; animation definitions persist.
    fn remove_all(&mut self);
    fn set_visible(&mut self, sprite: SpriteId, visible: bool);
    fn set_flip_x(&mut self, sprite: SpriteId, flip: bool);
    /// Start a named animation. Restarting resets its phase, so callers
    /// gate on their own state.
    fn play_animation(&mut self, sprite: SpriteId, name: &str);
    fn stop_animation(&mut self, sprite: SpriteId);
    /// Show a fixed spritesheet frame (stops nothing by itself).
    fn set_frame(&mut self, sprite: SpriteId, frame: u32);
    fn set_camera_bounds(&mut self, size: Vec2);
    /// Keep the camera centered on the sprite, clamped to the bounds.
    fn camera_follow(&mut self, sprite: SpriteId);
    /// Full-screen flash transition (win).
    fn flash(&mut self, duration_ms: u64);
    /// Fade-to-black transition (loss).
    fn fade(&mut self, duration_ms: u64);
    /// Fixed text overlay at a screen position.
    fn show_text(&mut self, text: &str, position: Vec2);
}
