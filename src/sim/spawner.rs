//! Timed pooled projectile emission.

use glam::Vec2;

use crate::consts::{PROJECTILE_BOUNCE_X, PROJECTILE_BOUNCE_Y};
use crate::engine::{BodyDef, BodyHandle, BodyKind, PhysicsWorld, Renderer, SpriteId};
use crate::level::SpawnerConfig;

use super::pool::{EntityPool, SlotKey};

/// Visual key for projectile sprites.
pub const PROJECTILE_KEY: &str = "barrel";

/// A pooled projectile slot. Handles stay allocated for the life of the
/// scene; activation toggles them.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub body: BodyHandle,
    pub sprite: SpriteId,
}

/// Result of one emission.
#[derive(Debug, Clone, Copy)]
pub struct Spawned {
    pub key: SlotKey,
    pub projectile: Projectile,
    /// The pool had no free slot and grew by one; the new body still needs
    /// its collision/overlap registrations.
    pub grew: bool,
}

/// Periodic emitter owning the projectile pool. The firing cadence itself
/// lives in the scheduler; the spawner knows how to activate and retire
/// slots.
#[derive(Debug)]
pub struct ProjectileSpawner {
    config: SpawnerConfig,
    origin: Vec2,
    pool: EntityPool<Projectile>,
}

impl ProjectileSpawner {
    /// `origin` is where projectiles appear: the goal position.
    pub fn new(config: SpawnerConfig, origin: Vec2) -> Self {
        Self {
            config,
            origin,
            pool: EntityPool::new(),
        }
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn live_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (SlotKey, &Projectile)> {
        self.pool.iter_active()
    }

    /// Emit one projectile from the origin: reuse the first inactive slot,
    /// or grow the pool by one. The returned key is what the lifespan task
    /// must capture.
    pub fn spawn(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        renderer: &mut dyn Renderer,
    ) -> Spawned {
        let origin = self.origin;
        let before = self.pool.len();
        let (key, slot) = self.pool.acquire(|| {
            let sprite = renderer.place_sprite(PROJECTILE_KEY, origin);
            let mut def = BodyDef::new(
                BodyKind::Dynamic,
                origin,
                renderer.tile_size(PROJECTILE_KEY),
            );
            def.bounce = Vec2::new(PROJECTILE_BOUNCE_X, PROJECTILE_BOUNCE_Y);
            def.collide_world_bounds = true;
            Projectile {
                body: physics.create_body(def),
                sprite,
            }
        });
        let projectile = *slot;
        let grew = self.pool.len() > before;

        physics.set_enabled(projectile.body, true);
        physics.set_position(projectile.body, origin);
        physics.set_velocity_x(projectile.body, self.config.speed);
        physics.set_velocity_y(projectile.body, 0.0);
        renderer.set_visible(projectile.sprite, true);

        Spawned {
            key,
            projectile,
            grew,
        }
    }

    /// Retire the slot a lifespan task captured at activation: hide it and
    /// disable its body, returning it to the pool. Stale keys (the slot was
    /// recycled in the interim) are no-ops.
    pub fn expire(
        &mut self,
        key: SlotKey,
        physics: &mut dyn PhysicsWorld,
        renderer: &mut dyn Renderer,
    ) -> bool {
        match self.pool.release(key) {
            Some(projectile) => {
                physics.set_enabled(projectile.body, false);
                renderer.set_visible(projectile.sprite, false);
                true
            }
            None => false,
        }
    }
}
