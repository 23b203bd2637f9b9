#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Task queue, task factory and level progression rules.
//!
//! The queue keeps a short look-ahead buffer of generated tasks and hands them
//! out one at a time. Task generation reads the active level and the current
//! difficulty, so escalation happens purely through the inputs passed in.

use std::{collections::VecDeque, time::Duration};

use ee_dash_core::{
    Difficulty, LevelConfig, LevelId, MeterPayload, Task, TaskId, TaskKind, TaskPayload, TaskPhase,
    LEVEL_COUNT, METER_NODE_COUNT,
};
use ee_dash_system_content::{coding_payload, meter_sequence, wiring_payload};
use rand::Rng;

/// Number of tasks generated whenever the queue runs dry.
pub const QUEUE_REFILL: usize = 3;

const BASE_TIME_BUDGET_SECS: f32 = 16.0;
const TIME_BUDGET_PER_DIFFICULTY: f32 = 0.8;
const MIN_TIME_BUDGET_SECS: f32 = 8.0;
const MAX_TIME_BUDGET_SECS: f32 = 18.0;

const CODING_THRESHOLD: f32 = 0.34;
const WIRING_THRESHOLD: f32 = 0.68;

const DEV_TITLE_SUFFIX: &str = " (DEV)";

/// Patience in seconds granted for a task at the provided difficulty.
#[must_use]
pub fn time_budget_secs(difficulty: Difficulty) -> f32 {
    let raw = BASE_TIME_BUDGET_SECS - difficulty.get() as f32 * TIME_BUDGET_PER_DIFFICULTY;
    raw.clamp(MIN_TIME_BUDGET_SECS, MAX_TIME_BUDGET_SECS)
}

/// Patience granted for a task at the provided difficulty.
#[must_use]
pub fn time_budget(difficulty: Difficulty) -> Duration {
    Duration::from_secs_f32(time_budget_secs(difficulty))
}

/// Maps a uniform draw in `[0, 1)` onto the weighted task kinds.
#[must_use]
pub fn task_kind_for_roll(roll: f32) -> TaskKind {
    if roll < CODING_THRESHOLD {
        TaskKind::Coding
    } else if roll < WIRING_THRESHOLD {
        TaskKind::Wiring
    } else {
        TaskKind::Multimeter
    }
}

/// Draws the kind of the next generated task.
pub fn next_task_kind<R: Rng + ?Sized>(rng: &mut R) -> TaskKind {
    task_kind_for_roll(rng.gen::<f32>())
}

/// Inputs that shape a generated task.
#[derive(Clone, Copy, Debug)]
pub struct TaskContext<'a> {
    /// Level the session is played on.
    pub level: &'a LevelConfig,
    /// Difficulty at generation time.
    pub difficulty: Difficulty,
    /// Probe points placed on multimeter boards. Zero means the default board.
    pub meter_node_count: u32,
}

/// Builds a fresh task of the provided kind.
pub fn make_task<R: Rng + ?Sized>(
    id: TaskId,
    kind: TaskKind,
    context: &TaskContext<'_>,
    rng: &mut R,
) -> Task {
    let payload = match kind {
        TaskKind::Coding => TaskPayload::Coding(coding_payload(context.level.id, rng)),
        TaskKind::Wiring => TaskPayload::Wiring(wiring_payload(context.level, context.difficulty)),
        TaskKind::Multimeter => {
            let node_count = match context.meter_node_count {
                0 => METER_NODE_COUNT,
                count => count,
            };
            let length = context.level.meter_sequence.min(node_count);
            TaskPayload::Multimeter(MeterPayload {
                node_count,
                sequence: meter_sequence(node_count, length, rng),
                current_step: 0,
            })
        }
    };

    Task {
        id,
        title: kind.title().to_owned(),
        time_budget: time_budget(context.difficulty),
        phase: TaskPhase::Working,
        payload,
        is_dev_task: false,
    }
}

/// Ordered buffer of pending tasks.
///
/// The active task is handed out by value and never remains in the buffer.
#[derive(Debug, Default)]
pub struct TaskQueue {
    pending: VecDeque<Task>,
    next_id: u32,
}

impl TaskQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the next task, generating [`QUEUE_REFILL`] new tasks first if the buffer is empty.
    pub fn next_task<R: Rng + ?Sized>(&mut self, context: &TaskContext<'_>, rng: &mut R) -> Task {
        if self.pending.is_empty() {
            for _ in 0..QUEUE_REFILL {
                let kind = next_task_kind(rng);
                let task = self.generate(kind, context, rng);
                self.pending.push_back(task);
            }
            tracing::debug!(count = QUEUE_REFILL, "task queue refilled");
        }

        let mut task = match self.pending.pop_front() {
            Some(task) => task,
            None => {
                let kind = next_task_kind(rng);
                self.generate(kind, context, rng)
            }
        };
        task.phase = TaskPhase::Working;
        task
    }

    /// Builds a developer task that never enters the buffer.
    pub fn dev_task<R: Rng + ?Sized>(
        &mut self,
        kind: TaskKind,
        context: &TaskContext<'_>,
        rng: &mut R,
    ) -> Task {
        let mut task = self.generate(kind, context, rng);
        task.title.push_str(DEV_TITLE_SUFFIX);
        task.is_dev_task = true;
        task
    }

    /// Iterator over the buffered tasks in assignment order.
    pub fn upcoming(&self) -> impl Iterator<Item = &Task> {
        self.pending.iter()
    }

    /// Number of buffered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn generate<R: Rng + ?Sized>(
        &mut self,
        kind: TaskKind,
        context: &TaskContext<'_>,
        rng: &mut R,
    ) -> Task {
        let id = TaskId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        make_task(id, kind, context, rng)
    }
}

/// Selected and unlocked levels.
///
/// `unlocked` only ever grows; `selected` never exceeds it unless developer
/// mode bypasses the lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelProgress {
    unlocked: usize,
    selected: usize,
}

impl LevelProgress {
    /// Restores progress from a persisted unlock index, clamping it to the level table.
    #[must_use]
    pub fn from_stored(unlocked: usize) -> Self {
        Self {
            unlocked: unlocked.min(LEVEL_COUNT - 1),
            selected: 0,
        }
    }

    /// Highest unlocked level index.
    #[must_use]
    pub const fn unlocked_index(&self) -> usize {
        self.unlocked
    }

    /// Currently selected level.
    #[must_use]
    pub fn selected(&self) -> LevelId {
        LevelId::from_index(self.selected).unwrap_or(LevelId::Easy)
    }

    /// Reports whether the provided level may be selected without developer mode.
    #[must_use]
    pub const fn is_unlocked(&self, level: LevelId) -> bool {
        level.index() <= self.unlocked
    }

    /// Selects a level, wrapping the index and clamping it to the unlocked range.
    pub fn select(&mut self, index: usize, dev_mode: bool) -> LevelId {
        let mut normalized = index % LEVEL_COUNT;
        if !dev_mode {
            normalized = normalized.min(self.unlocked);
        }
        self.selected = normalized;
        self.selected()
    }

    /// Moves the selection to the next selectable level, wrapping around.
    ///
    /// Returns `None` when no other level is available.
    pub fn cycle(&mut self, dev_mode: bool) -> Option<LevelId> {
        if dev_mode {
            return Some(self.select(self.selected + 1, true));
        }

        let previous = self.selected;
        for step in 1..=LEVEL_COUNT {
            let candidate = (previous + step) % LEVEL_COUNT;
            if candidate <= self.unlocked {
                if candidate == previous {
                    break;
                }
                return Some(self.select(candidate, false));
            }
        }
        None
    }

    /// Unlocks the level after `current` once `score` reaches `unlock_target`.
    ///
    /// Returns the newly unlocked level. Developer mode never unlocks anything.
    pub fn try_unlock_next(
        &mut self,
        current: LevelId,
        score: u32,
        unlock_target: u32,
        dev_mode: bool,
    ) -> Option<LevelId> {
        if dev_mode || score < unlock_target {
            return None;
        }
        let next_index = current.index() + 1;
        let next = LevelId::from_index(next_index)?;
        if self.unlocked >= next_index {
            return None;
        }
        self.unlocked = next_index;
        tracing::debug!(level = next.label(), "level unlocked");
        Some(next)
    }
}
