//! Overlap-to-outcome resolution.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::{LOSE_FADE_MS, WIN_FLASH_MS};
use crate::engine::{BodyHandle, OverlapEvent, PhysicsWorld, Renderer};

/// What a body is, for outcome routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Terrain,
    Hazard,
    Goal,
    Projectile,
    Agent,
}

/// Life-cycle outcome decided by the first qualifying overlap after a
/// restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

/// Owns the collision/overlap registrations with the physics collaborator
/// and routes reported overlaps to an outcome. The one-outcome-per-life
/// guard lives in the scene phase, not here: overlap pairs stay registered
/// because the transition is asynchronous relative to ticks.
#[derive(Debug)]
pub struct CollisionResolver {
    categories: HashMap<BodyHandle, Category>,
    agent: BodyHandle,
    terrain: Vec<BodyHandle>,
}

impl CollisionResolver {
    /// Registers blocking collision between the agent and all terrain.
    pub fn new(
        physics: &mut dyn PhysicsWorld,
        agent: BodyHandle,
        terrain: Vec<BodyHandle>,
    ) -> Self {
        physics.add_collider(agent, &terrain);
        let mut categories = HashMap::new();
        categories.insert(agent, Category::Agent);
        for &body in &terrain {
            categories.insert(body, Category::Terrain);
        }
        Self {
            categories,
            agent,
            terrain,
        }
    }

    /// Overlap-only entity that loses the life cycle on agent contact.
    pub fn register_hazard(&mut self, physics: &mut dyn PhysicsWorld, body: BodyHandle) {
        self.categories.insert(body, Category::Hazard);
        physics.add_overlap(self.agent, body);
    }

    /// The goal collides with terrain so it can rest on it, but only
    /// overlaps the agent.
    pub fn register_goal(&mut self, physics: &mut dyn PhysicsWorld, body: BodyHandle) {
        self.categories.insert(body, Category::Goal);
        physics.add_collider(body, &self.terrain);
        physics.add_overlap(self.agent, body);
    }

    /// Projectiles collide with terrain and overlap the agent. Called once
    /// per pool slot, when it is first created.
    pub fn register_projectile(&mut self, physics: &mut dyn PhysicsWorld, body: BodyHandle) {
        self.categories.insert(body, Category::Projectile);
        physics.add_collider(body, &self.terrain);
        physics.add_overlap(self.agent, body);
    }

    pub fn category(&self, body: BodyHandle) -> Option<Category> {
        self.categories.get(&body).copied()
    }

    /// Decide the outcome for the first qualifying overlap in this tick's
    /// batch, if any. Goal contact always wins; hazard or projectile
    /// contact always loses.
    pub fn resolve(&self, events: &[OverlapEvent]) -> Option<Outcome> {
        for event in events {
            let other = if event.a == self.agent {
                event.b
            } else if event.b == self.agent {
                event.a
            } else {
                continue;
            };
            match self.categories.get(&other) {
                Some(Category::Goal) => return Some(Outcome::Win),
                Some(Category::Hazard) | Some(Category::Projectile) => {
                    return Some(Outcome::Lose);
                }
                _ => {}
            }
        }
        None
    }

    /// Kick off the outcome's visual transition and return its duration in
    /// milliseconds; the scene schedules the restart on completion.
    pub fn begin_transition(outcome: Outcome, renderer: &mut dyn Renderer) -> u64 {
        match outcome {
            Outcome::Win => {
                renderer.flash(WIN_FLASH_MS);
                renderer.show_text("You Win!", Vec2::new(125.0, 35.0));
                WIN_FLASH_MS
            }
            Outcome::Lose => {
                renderer.fade(LOSE_FADE_MS);
                LOSE_FADE_MS
            }
        }
    }
}
