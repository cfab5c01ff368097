//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Timers are tick counters, drained in a stable order
//! - No rendering or platform dependencies beyond the capability traits
//!   in [`crate::engine`]

pub mod agent;
pub mod pool;
pub mod resolver;
pub mod schedule;
pub mod scene;
pub mod spawner;
pub mod state;

pub use agent::{AgentController, MotionState, TickInput};
pub use pool::{EntityPool, SlotKey};
pub use resolver::{Category, CollisionResolver, Outcome};
pub use scene::Scene;
pub use schedule::{Scheduler, TaskKind};
pub use spawner::{Projectile, ProjectileSpawner};
pub use state::{ScenePhase, SimEvent, SimulationState};
