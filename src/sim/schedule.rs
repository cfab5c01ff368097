//! Tick-based scheduled tasks.
//!
//! Every timer in the simulation (spawner interval, projectile lifespans,
//! transition completion) is an entry here, drained between ticks on the
//! single simulation thread. Tasks are plain data, not closures: each
//! captures the identity of its target when scheduled, plus the scene
//! generation, so a task outliving its life cycle is dropped instead of
//! firing against a rebuilt entity.

use super::pool::SlotKey;

/// What a due task does. Captured state lives in the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Recurring projectile emission.
    SpawnProjectile,
    /// One-shot lifespan expiry for the slot captured at activation.
    ExpireProjectile(SlotKey),
    /// The outcome's visual transition finished; restart the scene.
    CompleteTransition,
}

#[derive(Debug, Clone, Copy)]
struct Task {
    fire_at: u64,
    /// Fire again this many ticks later, forever.
    repeat_every: Option<u64>,
    generation: u64,
    seq: u64,
    kind: TaskKind,
}

/// Single-threaded task queue over the simulation tick counter.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` once, `delay` ticks from `now`.
    pub fn once(&mut self, now: u64, delay: u64, generation: u64, kind: TaskKind) {
        self.push(now + delay, None, generation, kind);
    }

    /// Schedule `kind` at `now` and every `interval` ticks after, forever.
    pub fn repeating(&mut self, now: u64, interval: u64, generation: u64, kind: TaskKind) {
        self.push(now, Some(interval), generation, kind);
    }

    fn push(&mut self, fire_at: u64, repeat_every: Option<u64>, generation: u64, kind: TaskKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Task {
            fire_at,
            repeat_every,
            generation,
            seq,
            kind,
        });
    }

    /// Remove and return every task due at `now`, ordered by fire tick then
    /// scheduling order. Tasks from a stale generation are silently
    /// discarded; repeating tasks re-arm with their original sequence
    /// number.
    pub fn drain_due(&mut self, now: u64, generation: u64) -> Vec<TaskKind> {
        let mut due = Vec::new();
        self.tasks.retain(|task| {
            if task.fire_at <= now {
                due.push(*task);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|task| (task.fire_at, task.seq));

        let mut fired = Vec::new();
        for task in due {
            if task.generation != generation {
                continue;
            }
            fired.push(task.kind);
            if let Some(interval) = task.repeat_every {
                self.tasks.push(Task {
                    fire_at: task.fire_at + interval,
                    ..task
                });
            }
        }
        fired
    }

    /// Pending (not yet due) task count.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
