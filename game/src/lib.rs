#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state machine for EE Dash.
//!
//! [`Game`] owns the menu selection, the persisted progress and one explicit
//! session object. Every mutation flows through [`apply`], which reports the
//! resulting transitions as [`Event`] values; presentation layers read state
//! through [`query`].

mod cheat;
mod deferred;
mod minigame;
mod patience;

use std::time::Duration;

use ee_dash_core::{
    CodingFeedback, Command, Difficulty, EndReason, Entity, Event, GameState, GameTuning,
    InteractTarget, InteractionRejection, LevelId, MeterFeedback, MinigameFeedback, NodeIndex,
    PlayMode, ProgressStore, Proximity, SessionOutcome, Spatial, Task, TaskKind, TaskPayload,
    TaskPhase, WiringFeedback,
};
use ee_dash_system_content::derive_seed;
use ee_dash_system_progression::{LevelProgress, TaskContext, TaskQueue};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    cheat::CheatBuffer,
    deferred::{Deferred, DeferredStatus},
    patience::PatienceClock,
};

pub use minigame::ActiveMinigame;

/// Seed used when no explicit seed is configured.
pub const DEFAULT_SEED: u64 = 0x45e4_da54_0d1c_e5ed;

const SESSION_STREAM: &str = "session";
const STATION_PULSE: f32 = 0.06;
const MANAGER_PULSE: f32 = 0.09;
const PULSE_RATE: f32 = 6.0;

/// Construction parameters for a [`Game`].
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Base seed from which every session stream is derived.
    pub seed: u64,
    /// Designer-facing knobs.
    pub tuning: GameTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tuning: GameTuning::default(),
        }
    }
}

/// Entity pulsing to guide the player, with its current scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    /// Entity to draw enlarged.
    pub entity: Entity,
    /// Multiplier applied to the entity's base scale.
    pub scale: f32,
}

#[derive(Debug)]
struct Session {
    level: LevelId,
    score: u32,
    difficulty: Difficulty,
    queue: TaskQueue,
    current: Option<Task>,
    patience: PatienceClock,
    minigame: Option<ActiveMinigame>,
    dev_return: Option<Task>,
    pending_assignment: Option<Deferred>,
    elapsed: Duration,
    rng: ChaCha8Rng,
}

impl Session {
    fn new(level: LevelId, seed: u64) -> Self {
        Self {
            level,
            score: 0,
            difficulty: Difficulty::INITIAL,
            queue: TaskQueue::new(),
            current: None,
            patience: PatienceClock::full(),
            minigame: None,
            dev_return: None,
            pending_assignment: None,
            elapsed: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

/// Authoritative game state.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    store: Box<dyn ProgressStore>,
    state: GameState,
    mode: PlayMode,
    dev_mode: bool,
    cheat: CheatBuffer,
    levels: LevelProgress,
    high_score: u32,
    session: Session,
    outcome: Option<SessionOutcome>,
    epoch: u64,
    sessions_started: u64,
}

impl Game {
    /// Creates a game sitting on the menu, restoring progress from `store`.
    #[must_use]
    pub fn new(config: GameConfig, store: Box<dyn ProgressStore>) -> Self {
        let stored = store.load();
        let levels = LevelProgress::from_stored(stored.unlocked_level);
        let session = Session::new(levels.selected(), derive_seed(config.seed, SESSION_STREAM, 0));
        Self {
            config,
            store,
            state: GameState::Menu,
            mode: PlayMode::default(),
            dev_mode: false,
            cheat: CheatBuffer::default(),
            levels,
            high_score: stored.high_score,
            session,
            outcome: None,
            epoch: 0,
            sessions_started: 0,
        }
    }

    fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let dt = dt.min(self.config.tuning.max_frame_step());
        out.push(Event::TimeAdvanced { dt });

        if !matches!(self.state, GameState::Playing | GameState::Minigame) {
            return;
        }
        self.session.elapsed = self.session.elapsed.saturating_add(dt);

        if self.session.current.is_some() && self.session.patience.tick(dt, self.dev_mode) {
            self.end_session(EndReason::PatienceExhausted, out);
            return;
        }

        if self.state == GameState::Minigame {
            if let Some(ActiveMinigame::Wiring(wiring)) = self.session.minigame.as_mut() {
                wiring.advance(dt);
            }
        }

        self.advance_pending_assignment(dt, out);
    }

    fn advance_pending_assignment(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let status = match self.session.pending_assignment.as_mut() {
            Some(deferred) => deferred.advance(dt, self.epoch),
            None => return,
        };
        match status {
            DeferredStatus::Pending => {}
            DeferredStatus::Stale => self.session.pending_assignment = None,
            DeferredStatus::Ready => {
                // A nested developer minigame holds the assignment until it closes.
                if self.state != GameState::Playing {
                    return;
                }
                self.session.pending_assignment = None;
                if self.session.current.is_none() {
                    self.assign_next_task(out);
                }
            }
        }
    }

    fn menu_key(&mut self, key: char, out: &mut Vec<Event>) {
        if self.state != GameState::Menu {
            self.cheat.clear();
            return;
        }
        if self.cheat.push(key) && !self.dev_mode {
            self.dev_mode = true;
            self.cheat.clear();
            tracing::info!("developer mode enabled");
            out.push(Event::DevModeActivated);
        }
    }

    fn select_level(&mut self, index: usize, out: &mut Vec<Event>) {
        if self.state != GameState::Menu {
            return;
        }
        let level = self.levels.select(index, self.dev_mode);
        out.push(Event::LevelSelected { level });
    }

    fn cycle_level(&mut self, out: &mut Vec<Event>) {
        if self.state != GameState::Menu {
            return;
        }
        match self.levels.cycle(self.dev_mode) {
            Some(level) => out.push(Event::LevelSelected { level }),
            None => out.push(Event::LevelLocked {
                unlock_target: self.config.tuning.unlock_target,
            }),
        }
    }

    fn start_session(&mut self, mode: PlayMode, out: &mut Vec<Event>) {
        self.epoch = self.epoch.wrapping_add(1);
        self.sessions_started = self.sessions_started.wrapping_add(1);
        self.mode = mode;

        let level = self
            .levels
            .select(self.levels.selected().index(), self.dev_mode);
        let seed = derive_seed(self.config.seed, SESSION_STREAM, self.sessions_started);
        self.session = Session::new(level, seed);
        self.outcome = None;
        self.cheat.clear();
        self.state = GameState::Playing;

        tracing::debug!(level = level.label(), ?mode, "session started");
        out.push(Event::SessionStarted { mode, level });
        self.assign_next_task(out);
    }

    fn return_to_menu(&mut self, out: &mut Vec<Event>) {
        self.epoch = self.epoch.wrapping_add(1);
        self.session = Session::new(
            self.levels.selected(),
            derive_seed(self.config.seed, SESSION_STREAM, 0),
        );
        self.outcome = None;
        self.state = GameState::Menu;
        out.push(Event::ReturnedToMenu);
    }

    fn end_session(&mut self, reason: EndReason, out: &mut Vec<Event>) {
        self.epoch = self.epoch.wrapping_add(1);
        self.state = GameState::Ended;

        let score = self.session.score;
        if score > self.high_score {
            self.high_score = score;
            self.store.save_high_score(score);
            out.push(Event::HighScoreRecorded { high_score: score });
        }

        let session = &mut self.session;
        session.current = None;
        session.dev_return = None;
        session.pending_assignment = None;
        if session.minigame.take().is_some() {
            out.push(Event::MinigameClosed { solved: false });
        }

        let outcome = SessionOutcome::new(reason, score, self.config.tuning.unlock_target);
        tracing::debug!(score, ?reason, "session ended");
        out.push(Event::SessionEnded {
            outcome: outcome.clone(),
        });
        self.outcome = Some(outcome);
    }

    fn assign_next_task(&mut self, out: &mut Vec<Event>) {
        let context = TaskContext {
            level: self.config.tuning.level(self.session.level),
            difficulty: self.session.difficulty,
            meter_node_count: self.config.tuning.meter_node_count,
        };
        let session = &mut self.session;
        let task = session.queue.next_task(&context, &mut session.rng);
        session.patience.arm(task.time_budget);

        tracing::debug!(task = task.id.get(), kind = ?task.kind(), "task assigned");
        out.push(Event::TaskAssigned {
            task: task.id,
            kind: task.kind(),
            title: task.title.clone(),
            time_budget: task.time_budget,
        });
        session.current = Some(task);
    }

    fn interact(&mut self, target: InteractTarget, proximity: Proximity, out: &mut Vec<Event>) {
        if self.state != GameState::Playing {
            return;
        }
        let manager_in_range = proximity.within_range(Entity::Manager);
        let current = self
            .session
            .current
            .as_ref()
            .map(|task| (task.kind(), task.phase));

        let rejection = match target {
            InteractTarget::Use => {
                let Some((kind, phase)) = current else {
                    return;
                };
                let station = proximity.station(kind);
                if phase == TaskPhase::ReadyToDeliver {
                    if manager_in_range {
                        self.deliver(out);
                        return;
                    }
                    InteractionRejection::DeliverToManager
                } else if station.in_range {
                    if station.in_front {
                        self.open_minigame(out);
                        return;
                    }
                    InteractionRejection::NotInFrontOfStation
                } else if manager_in_range {
                    InteractionRejection::FinishAssignmentFirst
                } else {
                    InteractionRejection::MoveCloserToStation
                }
            }
            InteractTarget::Station(clicked) => {
                let station = proximity.station(clicked);
                match current {
                    _ if !station.in_range => InteractionRejection::StationOutOfRange,
                    Some((_, TaskPhase::ReadyToDeliver)) => {
                        InteractionRejection::DeliverBeforeStarting
                    }
                    Some((kind, TaskPhase::Working)) if kind == clicked => {
                        if station.in_front {
                            self.open_minigame(out);
                            return;
                        }
                        InteractionRejection::MoveToFrontOfStation
                    }
                    _ => InteractionRejection::WrongStation,
                }
            }
            InteractTarget::Manager => match current {
                Some((_, TaskPhase::ReadyToDeliver)) if manager_in_range => {
                    self.deliver(out);
                    return;
                }
                _ if manager_in_range => InteractionRejection::ManagerHurry,
                _ => InteractionRejection::ManagerOutOfRange,
            },
        };
        out.push(Event::InteractionRejected { reason: rejection });
    }

    fn open_minigame(&mut self, out: &mut Vec<Event>) {
        let session = &mut self.session;
        let Some(task) = session.current.as_ref() else {
            return;
        };
        if task.phase != TaskPhase::Working {
            return;
        }
        let kind = task.kind();
        let dev_task = task.is_dev_task;
        let minigame = ActiveMinigame::open(task, &self.config.tuning.board, &mut session.rng);
        let feedback = minigame.feedback();
        session.minigame = Some(minigame);
        self.state = GameState::Minigame;

        out.push(Event::MinigameOpened { kind, dev_task });
        if kind != TaskKind::Coding {
            out.push(Event::MinigameFeedback { feedback });
        }
    }

    /// Closes the open minigame and reports whether it belonged to a developer task.
    fn close_minigame(&mut self, solved: bool, out: &mut Vec<Event>) -> bool {
        let session = &mut self.session;
        let was_dev = session
            .current
            .as_ref()
            .map_or(false, |task| task.is_dev_task);
        session.minigame = None;
        if was_dev {
            session.current = session.dev_return.take();
        }
        session.dev_return = None;
        self.state = GameState::Playing;
        out.push(Event::MinigameClosed { solved });
        was_dev
    }

    fn finish_minigame(&mut self, out: &mut Vec<Event>) {
        if !self.close_minigame(true, out) {
            self.mark_ready_for_delivery(out);
        }
    }

    fn mark_ready_for_delivery(&mut self, out: &mut Vec<Event>) {
        let Some(task) = self.session.current.as_mut() else {
            return;
        };
        task.phase = TaskPhase::ReadyToDeliver;
        let id = task.id;
        self.session
            .patience
            .ensure_at_least(self.config.tuning.min_delivery_patience());
        out.push(Event::TaskReadyForDelivery { task: id });
    }

    fn deliver(&mut self, out: &mut Vec<Event>) {
        let Some(task) = self.session.current.take() else {
            return;
        };
        let session = &mut self.session;
        session.score += 1;
        session.difficulty = Difficulty::from_score(session.score);
        let score = session.score;
        out.push(Event::TaskDelivered {
            task: task.id,
            score,
            difficulty: session.difficulty,
        });

        let unlock_target = self.config.tuning.unlock_target;
        if let Some(level) =
            self.levels
                .try_unlock_next(session.level, score, unlock_target, self.dev_mode)
        {
            self.store.save_unlocked_level(self.levels.unlocked_index());
            out.push(Event::LevelUnlocked { level });
        }

        if self.session.level == LevelId::Hard && score >= unlock_target {
            self.end_session(EndReason::Promotion, out);
            return;
        }
        self.session.pending_assignment =
            Some(Deferred::new(self.epoch, self.config.tuning.delivery_grace()));
    }

    fn code_input_changed(&mut self, text: &str, out: &mut Vec<Event>) {
        if self.state != GameState::Minigame {
            return;
        }
        let Some(ActiveMinigame::Coding(coding)) = self.session.minigame.as_mut() else {
            return;
        };
        let feedback = coding.input_changed(text);
        out.push(Event::MinigameFeedback {
            feedback: MinigameFeedback::Coding(feedback),
        });
        if feedback == CodingFeedback::Correct {
            self.finish_minigame(out);
        }
    }

    fn strike(&mut self, out: &mut Vec<Event>) {
        if self.state != GameState::Minigame {
            return;
        }
        let Some(ActiveMinigame::Wiring(wiring)) = self.session.minigame.as_mut() else {
            return;
        };
        let feedback = wiring.strike();
        out.push(Event::MinigameFeedback {
            feedback: MinigameFeedback::Wiring(feedback),
        });
        if feedback == WiringFeedback::Complete {
            self.finish_minigame(out);
        }
    }

    fn probe(&mut self, node: NodeIndex, out: &mut Vec<Event>) {
        if self.state != GameState::Minigame {
            return;
        }
        let session = &mut self.session;
        let Some(ActiveMinigame::Multimeter(board)) = session.minigame.as_mut() else {
            return;
        };
        let Some(Task {
            payload: TaskPayload::Multimeter(payload),
            ..
        }) = session.current.as_mut()
        else {
            return;
        };
        let Some(feedback) = board.probe(payload, node, &mut session.rng) else {
            return;
        };
        out.push(Event::MinigameFeedback {
            feedback: MinigameFeedback::Multimeter(feedback),
        });
        if matches!(feedback, MeterFeedback::Complete { .. }) {
            self.finish_minigame(out);
        }
    }

    fn launch_dev_minigame(&mut self, kind: TaskKind, out: &mut Vec<Event>) {
        if !self.dev_mode {
            return;
        }
        match self.state {
            GameState::Playing => {}
            GameState::Minigame => {
                let _ = self.close_minigame(false, out);
            }
            GameState::Menu | GameState::Ended => return,
        }

        let context = TaskContext {
            level: self.config.tuning.level(self.session.level),
            difficulty: self.session.difficulty,
            meter_node_count: self.config.tuning.meter_node_count,
        };
        let session = &mut self.session;
        let task = session.queue.dev_task(kind, &context, &mut session.rng);
        session.dev_return = session.current.take();
        session.current = Some(task);
        self.open_minigame(out);
    }

    fn close_minigame_on_request(&mut self, out: &mut Vec<Event>) {
        if !self.dev_mode || self.state != GameState::Minigame {
            return;
        }
        let _ = self.close_minigame(false, out);
    }
}

/// Applies the provided command to the game, mutating state deterministically.
///
/// Commands that are not valid in the current state are ignored.
pub fn apply(game: &mut Game, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => game.tick(dt, out_events),
        Command::MenuKey { key } => game.menu_key(key, out_events),
        Command::SelectLevel { index } => game.select_level(index, out_events),
        Command::CycleLevel => game.cycle_level(out_events),
        Command::StartSession { mode } => {
            if game.state == GameState::Menu {
                game.start_session(mode, out_events);
            }
        }
        Command::Restart => {
            if game.state == GameState::Ended {
                let mode = game.mode;
                game.start_session(mode, out_events);
            }
        }
        Command::ReturnToMenu => {
            if game.state == GameState::Ended {
                game.return_to_menu(out_events);
            }
        }
        Command::StopSession => {
            if game.state == GameState::Playing {
                let reason = EndReason::Stopped {
                    dev_mode: game.dev_mode,
                };
                game.end_session(reason, out_events);
            }
        }
        Command::Interact { target, proximity } => game.interact(target, proximity, out_events),
        Command::CodeInputChanged { text } => game.code_input_changed(&text, out_events),
        Command::Strike => game.strike(out_events),
        Command::Probe { node } => game.probe(node, out_events),
        Command::LaunchDevMinigame { kind } => game.launch_dev_minigame(kind, out_events),
        Command::CloseMinigame => game.close_minigame_on_request(out_events),
    }
}

/// Read-only accessors over the game state.
pub mod query {
    use std::time::Duration;

    use ee_dash_core::{
        Difficulty, Entity, GameState, GameTuning, LevelId, MeterPayload, MinigameFeedback, NodeIndex,
        PlayMode, SessionOutcome, Task, TaskKind, TaskPayload, TaskPhase,
    };
    use ee_dash_system_coding::CodingGame;
    use ee_dash_system_multimeter::MultimeterGame;
    use ee_dash_system_wiring::WiringGame;

    use crate::{ActiveMinigame, Game, Highlight, MANAGER_PULSE, PULSE_RATE, STATION_PULSE};

    /// Current top-level state.
    #[must_use]
    pub fn state(game: &Game) -> GameState {
        game.state
    }

    /// Rendering mode of the latest session.
    #[must_use]
    pub fn mode(game: &Game) -> PlayMode {
        game.mode
    }

    /// Whether developer mode is active.
    #[must_use]
    pub fn dev_mode(game: &Game) -> bool {
        game.dev_mode
    }

    /// Tuning the game was created with.
    #[must_use]
    pub fn tuning(game: &Game) -> &GameTuning {
        &game.config.tuning
    }

    /// Score of the running or last session.
    #[must_use]
    pub fn score(game: &Game) -> u32 {
        game.session.score
    }

    /// Best score recorded across sessions.
    #[must_use]
    pub fn high_score(game: &Game) -> u32 {
        game.high_score
    }

    /// Difficulty of the running session.
    #[must_use]
    pub fn difficulty(game: &Game) -> Difficulty {
        game.session.difficulty
    }

    /// Level highlighted on the menu.
    #[must_use]
    pub fn selected_level(game: &Game) -> LevelId {
        game.levels.selected()
    }

    /// Level the running session is played on.
    #[must_use]
    pub fn session_level(game: &Game) -> LevelId {
        game.session.level
    }

    /// Highest permanently unlocked level.
    #[must_use]
    pub fn unlocked_level(game: &Game) -> LevelId {
        LevelId::from_index(game.levels.unlocked_index()).unwrap_or(LevelId::Easy)
    }

    /// Whether the level can currently be selected.
    #[must_use]
    pub fn is_level_selectable(game: &Game, level: LevelId) -> bool {
        game.dev_mode || game.levels.is_unlocked(level)
    }

    /// Task the player is working on, if any.
    #[must_use]
    pub fn current_task(game: &Game) -> Option<&Task> {
        game.session.current.as_ref()
    }

    /// Tasks waiting in the queue, in assignment order.
    pub fn upcoming_tasks(game: &Game) -> impl Iterator<Item = &Task> {
        game.session.queue.upcoming()
    }

    /// Whether a delivery is waiting for the next assignment.
    #[must_use]
    pub fn awaiting_assignment(game: &Game) -> bool {
        game.session.pending_assignment.is_some()
    }

    /// Remaining patience as a fraction in `[0, 1]`; full when no task is active.
    #[must_use]
    pub fn patience_fraction(game: &Game) -> f32 {
        if game.session.current.is_none() {
            return 1.0;
        }
        game.session.patience.fraction()
    }

    /// Remaining patience for the active task.
    #[must_use]
    pub fn patience_remaining(game: &Game) -> Duration {
        game.session.patience.remaining()
    }

    /// Status line shown on the HUD while a session is running.
    #[must_use]
    pub fn hud_line(game: &Game) -> Option<String> {
        if !matches!(game.state, GameState::Playing | GameState::Minigame) {
            return None;
        }
        let line = match game.session.current.as_ref() {
            Some(task) if task.phase == TaskPhase::Working => {
                format!("{} - go to station", task.title)
            }
            Some(_) => "Deliver to manager".to_owned(),
            None => "Awaiting next task".to_owned(),
        };
        Some(line)
    }

    /// Open minigame, if any.
    #[must_use]
    pub fn minigame(game: &Game) -> Option<&ActiveMinigame> {
        game.session.minigame.as_ref()
    }

    /// Feedback shown by the open minigame.
    #[must_use]
    pub fn minigame_feedback(game: &Game) -> Option<MinigameFeedback> {
        game.session.minigame.as_ref().map(ActiveMinigame::feedback)
    }

    /// Open coding editor.
    #[must_use]
    pub fn coding(game: &Game) -> Option<&CodingGame> {
        match game.session.minigame.as_ref() {
            Some(ActiveMinigame::Coding(coding)) => Some(coding),
            _ => None,
        }
    }

    /// Open wiring gauge.
    #[must_use]
    pub fn wiring(game: &Game) -> Option<&WiringGame> {
        match game.session.minigame.as_ref() {
            Some(ActiveMinigame::Wiring(wiring)) => Some(wiring),
            _ => None,
        }
    }

    /// Open multimeter board.
    #[must_use]
    pub fn multimeter(game: &Game) -> Option<&MultimeterGame> {
        match game.session.minigame.as_ref() {
            Some(ActiveMinigame::Multimeter(board)) => Some(board),
            _ => None,
        }
    }

    /// Probe sequence of the active multimeter task.
    #[must_use]
    pub fn meter_payload(game: &Game) -> Option<&MeterPayload> {
        match game.session.current.as_ref().map(|task| &task.payload) {
            Some(TaskPayload::Multimeter(payload)) => Some(payload),
            _ => None,
        }
    }

    /// Node currently highlighted on the multimeter board.
    #[must_use]
    pub fn hot_node(game: &Game) -> Option<NodeIndex> {
        if multimeter(game).is_none() {
            return None;
        }
        meter_payload(game).and_then(ee_dash_system_multimeter::hot_node)
    }

    /// Entity to pulse while the player walks the office.
    #[must_use]
    pub fn highlight(game: &Game) -> Option<Highlight> {
        if game.state != GameState::Playing {
            return None;
        }
        let task = game.session.current.as_ref()?;
        let (entity, amplitude) = match task.phase {
            TaskPhase::Working => (Entity::Station(task.kind()), STATION_PULSE),
            TaskPhase::ReadyToDeliver => (Entity::Manager, MANAGER_PULSE),
        };
        let t = game.session.elapsed.as_secs_f32();
        Some(Highlight {
            entity,
            scale: 1.0 + amplitude * (t * PULSE_RATE).sin(),
        })
    }

    /// Kinds of the queued tasks, in assignment order.
    #[must_use]
    pub fn upcoming_kinds(game: &Game) -> Vec<TaskKind> {
        upcoming_tasks(game).map(Task::kind).collect()
    }

    /// End-screen summary of the last session.
    #[must_use]
    pub fn outcome(game: &Game) -> Option<&SessionOutcome> {
        game.outcome.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ee_dash_core::StoredProgress;

    #[derive(Debug, Default)]
    struct NullStore;

    impl ProgressStore for NullStore {
        fn load(&self) -> StoredProgress {
            StoredProgress::default()
        }

        fn save_high_score(&mut self, _high_score: u32) {}

        fn save_unlocked_level(&mut self, _index: usize) {}
    }

    fn playing_game() -> (Game, Vec<Event>) {
        let mut game = Game::new(GameConfig::default(), Box::new(NullStore));
        let mut events = Vec::new();
        apply(
            &mut game,
            Command::StartSession {
                mode: PlayMode::Prototype,
            },
            &mut events,
        );
        (game, events)
    }

    #[test]
    fn frame_step_is_capped() {
        let (mut game, _) = playing_game();
        let mut events = Vec::new();
        apply(
            &mut game,
            Command::Tick {
                dt: Duration::from_secs(3),
            },
            &mut events,
        );
        assert_eq!(
            events[0],
            Event::TimeAdvanced {
                dt: Duration::from_millis(50)
            }
        );
    }

    #[test]
    fn stale_assignment_is_dropped_after_epoch_change() {
        let (mut game, _) = playing_game();
        game.session.current = None;
        game.session.pending_assignment = Some(Deferred::new(game.epoch, Duration::from_millis(600)));
        game.epoch += 1;

        let mut events = Vec::new();
        for _ in 0..20 {
            apply(
                &mut game,
                Command::Tick {
                    dt: Duration::from_millis(50),
                },
                &mut events,
            );
        }
        assert!(game.session.pending_assignment.is_none());
        assert!(game.session.current.is_none());
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::TaskAssigned { .. })));
    }

    #[test]
    fn session_streams_differ_between_sessions() {
        let first = derive_seed(DEFAULT_SEED, SESSION_STREAM, 1);
        let second = derive_seed(DEFAULT_SEED, SESSION_STREAM, 2);
        assert_ne!(first, second);
    }
}
