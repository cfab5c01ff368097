//! Agent motion/animation state machine.

use crate::consts::{AGENT_JUMP_SPEED, AGENT_SPEED};
use crate::engine::anim::ANIM_WALKING;
use crate::engine::{BodyHandle, PhysicsWorld, Renderer, SpriteId};

/// Spritesheet frame shown when standing still.
pub const IDLE_FRAME: u32 = 3;
/// Spritesheet frame shown while airborne.
pub const JUMP_FRAME: u32 = 2;

/// Input snapshot for a single tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Pointer press position. Diagnostic only; logged and otherwise
    /// ignored.
    pub pointer: Option<(f32, f32)>,
}

/// Current motion/animation state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    Walking,
    Airborne,
}

/// Reactive controller for the player-driven entity. Sees only the current
/// tick's input and the collaborator's grounded flag; holds no timers.
#[derive(Debug)]
pub struct AgentController {
    pub body: BodyHandle,
    pub sprite: SpriteId,
    state: MotionState,
    facing_right: bool,
}

impl AgentController {
    pub fn new(body: BodyHandle, sprite: SpriteId) -> Self {
        Self {
            body,
            sprite,
            state: MotionState::Idle,
            facing_right: false,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Advance one tick. Horizontal and vertical control are evaluated
    /// independently, so jumping keeps whatever horizontal velocity this
    /// tick's input produced.
    pub fn update(
        &mut self,
        input: &TickInput,
        physics: &mut dyn PhysicsWorld,
        renderer: &mut dyn Renderer,
    ) {
        let grounded = physics.grounded(self.body);

        let left = input.left && !input.right;
        let right = input.right && !input.left;

        if left || right {
            let direction = if right { 1.0 } else { -1.0 };
            physics.set_velocity_x(self.body, direction * AGENT_SPEED);
            if self.facing_right != right {
                self.facing_right = right;
                renderer.set_flip_x(self.sprite, right);
            }
            // Starting the walk cycle is gated on state: restarting an
            // already-playing animation would reset its phase every tick.
            if grounded && self.state != MotionState::Walking {
                self.state = MotionState::Walking;
                renderer.play_animation(self.sprite, ANIM_WALKING);
            }
        } else {
            // Neither or both pressed
            physics.set_velocity_x(self.body, 0.0);
            if self.state == MotionState::Walking {
                renderer.stop_animation(self.sprite);
                self.state = MotionState::Airborne;
            }
            if grounded {
                self.state = MotionState::Idle;
                renderer.set_frame(self.sprite, IDLE_FRAME);
            }
        }

        if grounded && input.jump {
            physics.set_velocity_y(self.body, -AGENT_JUMP_SPEED);
            if self.state == MotionState::Walking {
                renderer.stop_animation(self.sprite);
            }
            self.state = MotionState::Airborne;
            renderer.set_frame(self.sprite, JUMP_FRAME);
        }
    }
}
