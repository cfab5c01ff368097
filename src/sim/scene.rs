//! Scene lifecycle: load → simulate → resolve → restart.
//!
//! The sequence follows the classic scene contract: Init (the tunable
//! constants in [`crate::consts`]) → Preload (asset acquisition, a
//! collaborator concern) → Create (level placement, idempotent across
//! restarts) → per-tick Update → outcome transition → Restart, which
//! re-enters Create with a fresh copy of the level description. There is
//! no terminal state; the level loops indefinitely on win or loss.

use log::{debug, info};

use crate::consts::SIM_DT;
use crate::engine::anim::AnimationRegistry;
use crate::engine::{PhysicsWorld, Renderer};
use crate::level::{self, LevelDescription};
use crate::ms_to_ticks;

use super::agent::{AgentController, TickInput};
use super::resolver::CollisionResolver;
use super::schedule::{Scheduler, TaskKind};
use super::spawner::ProjectileSpawner;
use super::state::{ScenePhase, SimEvent, SimulationState};

/// The running scene. Owns the pristine level description and the
/// [`SimulationState`] built from it.
pub struct Scene {
    desc: LevelDescription,
    state: SimulationState,
}

impl Scene {
    /// Build the scene: registers the animation set once, then runs the
    /// first Create pass against the collaborators.
    pub fn new(
        desc: LevelDescription,
        physics: &mut dyn PhysicsWorld,
        renderer: &mut dyn Renderer,
    ) -> Self {
        let registry = AnimationRegistry::standard();
        for def in registry.iter() {
            renderer.register_animation(def);
        }
        let mut state = create_world(&desc, 0, 0, Scheduler::new(), physics, renderer);
        state.phase = ScenePhase::Active;
        info!(
            "scene created: {} platforms, {} hazards, spawner every {}ms",
            state.level.platforms.len(),
            state.level.hazards.len(),
            desc.spawner.interval
        );
        Self { desc, state }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn description(&self) -> &LevelDescription {
        &self.desc
    }

    /// Events emitted by the most recent tick.
    pub fn events(&self) -> &[SimEvent] {
        &self.state.events
    }

    /// Advance one fixed-timestep tick: drain due scheduled tasks, run the
    /// agent controller, step the physics collaborator, resolve overlaps.
    pub fn update(
        &mut self,
        input: &TickInput,
        physics: &mut dyn PhysicsWorld,
        renderer: &mut dyn Renderer,
    ) {
        if let Some((x, y)) = input.pointer {
            debug!("pointer down at ({x:.0}, {y:.0})");
        }

        let now = self.state.tick;
        self.state.events.clear();

        let tasks = self
            .state
            .scheduler
            .drain_due(now, self.state.generation);
        for task in tasks {
            match task {
                TaskKind::SpawnProjectile => {
                    let spawned = self.state.spawner.spawn(physics, renderer);
                    if spawned.grew {
                        self.state
                            .resolver
                            .register_projectile(physics, spawned.projectile.body);
                    }
                    let lifespan = ms_to_ticks(self.state.spawner.config().lifespan);
                    self.state.scheduler.once(
                        now,
                        lifespan,
                        self.state.generation,
                        TaskKind::ExpireProjectile(spawned.key),
                    );
                    self.state.events.push(SimEvent::ProjectileSpawned(spawned.key));
                    debug!("projectile spawned in slot {}", spawned.key.index);
                }
                TaskKind::ExpireProjectile(key) => {
                    if self.state.spawner.expire(key, physics, renderer) {
                        self.state.events.push(SimEvent::ProjectileExpired(key));
                        debug!("projectile expired in slot {}", key.index);
                    }
                }
                TaskKind::CompleteTransition => {
                    self.restart(physics, renderer);
                    // Anything else drained this tick belongs to the
                    // superseded life cycle.
                    break;
                }
            }
        }

        self.state.agent.update(input, physics, renderer);

        let overlaps = physics.step(SIM_DT);
        if self.state.phase == ScenePhase::Active {
            if let Some(outcome) = self.state.resolver.resolve(&overlaps) {
                self.state.phase = ScenePhase::Transitioning;
                let duration_ms = CollisionResolver::begin_transition(outcome, renderer);
                self.state.scheduler.once(
                    now,
                    ms_to_ticks(duration_ms),
                    self.state.generation,
                    TaskKind::CompleteTransition,
                );
                self.state.events.push(SimEvent::OutcomeDecided(outcome));
                info!("outcome decided: {outcome:?}, restarting in {duration_ms}ms");
            }
        }

        self.state.tick += 1;
    }

    /// Tear down every placed entity and re-enter Create with a fresh copy
    /// of the level description. The scheduler and tick counter carry
    /// over; the generation bump orphans every outstanding task.
    fn restart(&mut self, physics: &mut dyn PhysicsWorld, renderer: &mut dyn Renderer) {
        self.state.phase = ScenePhase::Restarting;
        physics.remove_all();
        renderer.remove_all();

        let generation = self.state.generation + 1;
        let tick = self.state.tick;
        let scheduler = std::mem::take(&mut self.state.scheduler);
        let mut events = std::mem::take(&mut self.state.events);
        events.push(SimEvent::Restarted);

        let mut state = create_world(&self.desc, generation, tick, scheduler, physics, renderer);
        state.phase = ScenePhase::Active;
        state.events = events;
        self.state = state;
        info!("scene restarted (generation {generation})");
    }
}

/// The Create pass: place the level, wire collision/overlap interest, and
/// arm the spawner. Animation registration is not here on purpose; the
/// registry is applied once at scene construction and survives restarts.
fn create_world(
    desc: &LevelDescription,
    generation: u64,
    tick: u64,
    mut scheduler: Scheduler,
    physics: &mut dyn PhysicsWorld,
    renderer: &mut dyn Renderer,
) -> SimulationState {
    let placed = level::load_level(desc, physics, renderer);

    let terrain = placed.platforms.iter().map(|p| p.body).collect();
    let mut resolver = CollisionResolver::new(physics, placed.agent.body, terrain);
    for hazard in &placed.hazards {
        resolver.register_hazard(physics, hazard.body);
    }
    resolver.register_goal(physics, placed.goal.body);

    let agent = AgentController::new(placed.agent.body, placed.agent.sprite);
    let spawner = ProjectileSpawner::new(desc.spawner, placed.goal.position);
    scheduler.repeating(
        tick,
        ms_to_ticks(desc.spawner.interval),
        generation,
        TaskKind::SpawnProjectile,
    );

    SimulationState {
        phase: ScenePhase::Loading,
        generation,
        tick,
        scheduler,
        level: placed,
        agent,
        spawner,
        resolver,
        events: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::consts::{LOSE_FADE_MS, WIN_FLASH_MS};
    use crate::engine::headless::{HeadlessRenderer, HeadlessWorld};
    use crate::level::{
        HazardSpec, PlatformSpec, SpawnPoint, SpawnerConfig, WorldBounds,
    };
    use crate::sim::resolver::Outcome;

    fn test_level(interval: u64, lifespan: u64) -> LevelDescription {
        LevelDescription {
            world: WorldBounds {
                width: 360.0,
                height: 640.0,
            },
            platforms: vec![PlatformSpec {
                x: 0.0,
                y: 600.0,
                key: "ground".to_owned(),
                num_tiles: 12,
            }],
            fires: vec![HazardSpec { x: 200.0, y: 568.0 }],
            player: SpawnPoint { x: 40.0, y: 560.0 },
            goal: SpawnPoint { x: 300.0, y: 560.0 },
            spawner: SpawnerConfig {
                interval,
                speed: 0.0,
                lifespan,
            },
        }
    }

    fn scene(interval: u64, lifespan: u64) -> (Scene, HeadlessWorld, HeadlessRenderer) {
        let mut physics = HeadlessWorld::new(1000.0);
        let mut renderer = HeadlessRenderer::new();
        let scene = Scene::new(test_level(interval, lifespan), &mut physics, &mut renderer);
        (scene, physics, renderer)
    }

    fn run(
        scene: &mut Scene,
        ticks: u64,
        physics: &mut HeadlessWorld,
        renderer: &mut HeadlessRenderer,
    ) {
        let input = TickInput::default();
        for _ in 0..ticks {
            scene.update(&input, physics, renderer);
        }
    }

    #[test]
    fn test_projectile_expires_at_lifespan_never_before() {
        // One spawn at tick 0, lifespan 1000ms = 60 ticks
        let (mut scene, mut physics, mut renderer) = scene(600_000, 1000);
        run(&mut scene, 1, &mut physics, &mut renderer);
        assert_eq!(scene.state().spawner.live_count(), 1);

        // Alive through tick 59
        run(&mut scene, 59, &mut physics, &mut renderer);
        assert_eq!(scene.state().spawner.live_count(), 1);

        // The tick-60 update retires it
        run(&mut scene, 1, &mut physics, &mut renderer);
        assert_eq!(scene.state().spawner.live_count(), 0);
        assert!(matches!(
            scene.events(),
            [SimEvent::ProjectileExpired(_)]
        ));
    }

    #[test]
    fn test_spawn_interval_timeline_with_overlapping_lifespans() {
        // interval 3000ms = 180 ticks, lifespan 6000ms = 360 ticks.
        // Spawns at ticks 0/180/360/540; expiries at 360/540/720.
        let (mut scene, mut physics, mut renderer) = scene(3000, 6000);

        // Through tick 359: the tick-0 and tick-180 instances coexist
        run(&mut scene, 360, &mut physics, &mut renderer);
        assert_eq!(scene.state().spawner.live_count(), 2);

        // Tick 360: third spawn fires before the first expiry, so the pool
        // peaks at three slots
        run(&mut scene, 1, &mut physics, &mut renderer);
        assert_eq!(
            scene.events().len(),
            2,
            "spawn and expiry share the boundary tick"
        );
        assert!(matches!(scene.events()[0], SimEvent::ProjectileSpawned(_)));
        assert!(matches!(scene.events()[1], SimEvent::ProjectileExpired(_)));
        assert_eq!(scene.state().spawner.live_count(), 2);
        assert_eq!(scene.state().spawner.pool_size(), 3);

        // Tick 540: same dance, reusing the slot freed at 360
        run(&mut scene, 180, &mut physics, &mut renderer);
        assert_eq!(scene.state().spawner.live_count(), 2);
        assert_eq!(scene.state().spawner.pool_size(), 3);
    }

    #[test]
    fn test_goal_overlap_wins_and_restarts() {
        let (mut scene, mut physics, mut renderer) = scene(3000, 6000);
        // Let the goal settle onto the ground
        run(&mut scene, 30, &mut physics, &mut renderer);

        let goal = scene.state().level.goal.body;
        let agent = scene.state().agent.body;
        physics.set_position(agent, physics.position(goal));
        run(&mut scene, 1, &mut physics, &mut renderer);

        assert_eq!(scene.state().phase, ScenePhase::Transitioning);
        assert!(scene
            .events()
            .contains(&SimEvent::OutcomeDecided(Outcome::Win)));
        assert_eq!(renderer.flash_count(), 1);
        assert_eq!(renderer.texts(), ["You Win!"]);

        // Still overlapping during the transition, but only one outcome is
        // ever processed per life cycle
        let transition_ticks = crate::ms_to_ticks(WIN_FLASH_MS);
        let mut outcomes = 0;
        let mut restarted = false;
        for _ in 0..transition_ticks {
            run(&mut scene, 1, &mut physics, &mut renderer);
            outcomes += scene
                .events()
                .iter()
                .filter(|e| matches!(e, SimEvent::OutcomeDecided(_)))
                .count();
            restarted |= scene.events().contains(&SimEvent::Restarted);
        }
        assert_eq!(outcomes, 0);
        assert!(restarted);
        assert_eq!(scene.state().phase, ScenePhase::Active);
        assert_eq!(scene.state().generation, 1);

        // The agent is back at its spawn point with no velocity carried over
        let agent = scene.state().agent.body;
        let spawn = scene.state().level.agent.position;
        let position = physics.position(agent);
        assert_eq!(position.x, spawn.x);
        assert!((position.y - spawn.y).abs() < 1.0);
        assert_eq!(physics.velocity(agent).x, 0.0);
    }

    #[test]
    fn test_hazard_overlap_loses_even_with_both_directions_pressed() {
        let (mut scene, mut physics, mut renderer) = scene(600_000, 1000);
        run(&mut scene, 30, &mut physics, &mut renderer);

        let agent = scene.state().agent.body;
        let hazard = scene.state().level.hazards[0].body;
        physics.set_position(agent, physics.position(hazard));

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        scene.update(&both, &mut physics, &mut renderer);

        // Mutually exclusive press branch: no horizontal motion
        assert_eq!(physics.velocity(agent).x, 0.0);
        assert!(scene
            .events()
            .contains(&SimEvent::OutcomeDecided(Outcome::Lose)));
        assert_eq!(renderer.fade_count(), 1);
        assert!(renderer.texts().is_empty());

        run(
            &mut scene,
            crate::ms_to_ticks(LOSE_FADE_MS),
            &mut physics,
            &mut renderer,
        );
        assert_eq!(scene.state().phase, ScenePhase::Active);
        assert_eq!(scene.state().generation, 1);
    }

    #[test]
    fn test_projectile_overlap_loses() {
        // A moving projectile, so it clears the goal before the agent is
        // dropped onto it
        let mut desc = test_level(3000, 600_000);
        desc.spawner.speed = -100.0;
        let mut physics = HeadlessWorld::new(1000.0);
        let mut renderer = HeadlessRenderer::new();
        let mut scene = Scene::new(desc, &mut physics, &mut renderer);
        run(&mut scene, 30, &mut physics, &mut renderer);

        let agent = scene.state().agent.body;
        let (_, projectile) = scene
            .state()
            .spawner
            .iter_live()
            .next()
            .expect("one projectile live");
        physics.set_position(agent, physics.position(projectile.body));
        run(&mut scene, 1, &mut physics, &mut renderer);

        assert!(scene
            .events()
            .contains(&SimEvent::OutcomeDecided(Outcome::Lose)));
    }

    #[test]
    fn test_stale_lifespan_timer_cannot_touch_next_life() {
        // Single spawn at tick 0 with a 2000ms lifespan (120 ticks); the
        // win restart lands around tick 78, well before the old expiry.
        let (mut scene, mut physics, mut renderer) = scene(600_000, 2000);
        run(&mut scene, 30, &mut physics, &mut renderer);

        let goal = scene.state().level.goal.body;
        let agent = scene.state().agent.body;
        physics.set_position(agent, physics.position(goal));
        let flash = crate::ms_to_ticks(WIN_FLASH_MS);
        run(&mut scene, 1 + flash, &mut physics, &mut renderer);
        assert_eq!(scene.state().generation, 1);

        // The new life spawned its own projectile into slot 0, generation
        // 0: the same key the orphaned timer captured. Run past the old
        // deadline; the projectile must survive it.
        run(&mut scene, 120, &mut physics, &mut renderer);
        assert_eq!(scene.state().spawner.live_count(), 1);
    }

    #[test]
    fn test_restart_rebuilds_level_from_description() {
        let (mut scene, mut physics, mut renderer) = scene(600_000, 1000);
        let desc = scene.description().clone();
        run(&mut scene, 30, &mut physics, &mut renderer);

        let agent = scene.state().agent.body;
        let goal = scene.state().level.goal.body;
        physics.set_position(agent, physics.position(goal));
        run(
            &mut scene,
            1 + crate::ms_to_ticks(WIN_FLASH_MS),
            &mut physics,
            &mut renderer,
        );

        let level = &scene.state().level;
        assert_eq!(level.platforms.len(), desc.platforms.len());
        assert_eq!(level.hazards.len(), desc.fires.len());
        assert_eq!(
            level.agent.position,
            Vec2::new(desc.player.x, desc.player.y)
        );
        // The win text does not leak into the new life
        assert!(renderer.texts().is_empty());
    }
}
