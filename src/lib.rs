//! Barrel Climb - a single-level platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scene lifecycle, agent state machine,
//!   pooled projectile spawning, overlap outcomes)
//! - `level`: Level description parsing and entity placement
//! - `engine`: Capability traits for the physics/render collaborators,
//!   plus a minimal headless stand-in

pub mod engine;
pub mod level;
pub mod sim;

pub use level::{LevelDescription, LevelError};
pub use sim::{Scene, SimEvent, TickInput};

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Window dimensions (pixels)
    pub const WINDOW_WIDTH: f32 = 360.0;
    pub const WINDOW_HEIGHT: f32 = 640.0;

    /// Ambient downward acceleration (px/s²)
    pub const GRAVITY_Y: f32 = 1000.0;

    /// Agent horizontal speed (px/s)
    pub const AGENT_SPEED: f32 = 150.0;
    /// Agent jump impulse magnitude (px/s, applied upward)
    pub const AGENT_JUMP_SPEED: f32 = 550.0;

    /// Projectile restitution against lateral bounds
    pub const PROJECTILE_BOUNCE_X: f32 = 1.0;
    /// Projectile restitution on ground contact
    pub const PROJECTILE_BOUNCE_Y: f32 = 0.1;

    /// Camera flash duration on a win (ms)
    pub const WIN_FLASH_MS: u64 = 800;
    /// Camera fade duration on a loss (ms)
    pub const LOSE_FADE_MS: u64 = 400;
}

/// Convert a duration in milliseconds to whole simulation ticks, rounding
/// up so a timer never fires early.
#[inline]
pub fn ms_to_ticks(ms: u64) -> u64 {
    (ms * consts::TICK_RATE as u64).div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks_exact() {
        assert_eq!(ms_to_ticks(3000), 180);
        assert_eq!(ms_to_ticks(6000), 360);
        assert_eq!(ms_to_ticks(800), 48);
        assert_eq!(ms_to_ticks(400), 24);
    }

    #[test]
    fn test_ms_to_ticks_rounds_up() {
        // 10ms is 0.6 ticks; firing at tick 0 would be early
        assert_eq!(ms_to_ticks(10), 1);
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(1), 1);
    }
}
