//! Scene-owned simulation state.

use crate::level::PlacedLevel;

use super::agent::AgentController;
use super::pool::SlotKey;
use super::resolver::{CollisionResolver, Outcome};
use super::schedule::Scheduler;
use super::spawner::ProjectileSpawner;

/// Where the scene is in its endless load → play → transition → restart
/// cycle. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePhase {
    #[default]
    Loading,
    Active,
    /// An outcome's visual transition is running; further overlaps are
    /// ignored until the restart lands.
    Transitioning,
    Restarting,
}

/// Observable per-tick happenings, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    ProjectileSpawned(SlotKey),
    ProjectileExpired(SlotKey),
    OutcomeDecided(Outcome),
    Restarted,
}

/// All mutable simulation state, owned by the scene and threaded through
/// create/update/restart. No implicit shared context anywhere.
#[derive(Debug)]
pub struct SimulationState {
    pub phase: ScenePhase,
    /// Bumped on every restart. Scheduled tasks carry the generation that
    /// created them; a task from an older generation never fires.
    pub generation: u64,
    /// Monotonic tick counter, carried across restarts.
    pub tick: u64,
    pub scheduler: Scheduler,
    pub level: PlacedLevel,
    pub agent: AgentController,
    pub spawner: ProjectileSpawner,
    pub resolver: CollisionResolver,
    /// Events of the most recent tick.
    pub events: Vec<SimEvent>,
}
