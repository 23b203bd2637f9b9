#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the EE Dash engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game state, and pure minigame systems. Adapters submit
//! [`Command`] values describing player intent, the game executes those
//! commands through its `apply` entry point, and then reports [`Event`] values
//! describing every transition that took place. Presentation layers read the
//! resulting state through the game's query module and never mutate it.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Probe points placed on a multimeter board unless tuning says otherwise.
pub const METER_NODE_COUNT: u32 = 18;

/// Distance in world units below which the player may interact with an entity.
pub const INTERACTION_RANGE: f32 = 2.4;

/// Depth the player must stand beyond a station's front edge to operate it.
pub const STATION_FRONT_SLACK: f32 = 0.35;

/// Number of difficulty tiers shipped with the game.
pub const LEVEL_COUNT: usize = 3;

/// Top-level states of the game session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Idle main menu that accepts level and mode selection.
    Menu,
    /// Player walks around the office carrying out the active task.
    Playing,
    /// A minigame overlay is open for the active task.
    Minigame,
    /// The session finished; only restart or return to menu remain.
    Ended,
}

/// Cosmetic rendering mode chosen when a session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Primitive-shape rendering without loaded models.
    Prototype,
    /// Fully modelled office scene.
    #[default]
    Full,
}

/// Closed set of work types the manager hands out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskKind {
    /// Retype a highlighted line of code exactly.
    Coding,
    /// Strike an oscillating gauge inside its green zone.
    Wiring,
    /// Probe board nodes in the requested order.
    Multimeter,
}

impl TaskKind {
    /// Every task kind in canonical order.
    pub const ALL: [TaskKind; 3] = [TaskKind::Coding, TaskKind::Wiring, TaskKind::Multimeter];

    /// Display label shown on the HUD and in the manager's bubble.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Coding => "Coding Task",
            Self::Wiring => "Wiring Task",
            Self::Multimeter => "Multimeter Task",
        }
    }

    /// Parses the short names used by developer tooling and adapters.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "coding" => Some(Self::Coding),
            "wiring" => Some(Self::Wiring),
            "meter" | "multimeter" => Some(Self::Multimeter),
            _ => None,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Coding => 0,
            Self::Wiring => 1,
            Self::Multimeter => 2,
        }
    }
}

/// Progress of a task through its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPhase {
    /// The minigame has not been solved yet.
    Working,
    /// The minigame was solved and the result must be brought to the manager.
    ReadyToDeliver,
}

/// Unique identifier assigned to a task within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u32);

impl TaskId {
    /// Creates a new task identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a probe point on the multimeter board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// Creates a node index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One unit of work assigned by the manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier allocated by the task queue.
    pub id: TaskId,
    /// Display label.
    pub title: String,
    /// Patience granted when the task is assigned.
    pub time_budget: Duration,
    /// Whether the minigame was solved already.
    pub phase: TaskPhase,
    /// Work-type specific data consumed by the matching minigame.
    pub payload: TaskPayload,
    /// Marks tasks spawned through developer tooling.
    pub is_dev_task: bool,
}

impl Task {
    /// Kind of work, derived from the payload variant.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.payload.kind()
    }
}

/// Type-specific task payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TaskPayload {
    /// Payload of a coding task.
    Coding(CodingPayload),
    /// Payload of a wiring task.
    Wiring(WiringPayload),
    /// Payload of a multimeter task.
    Multimeter(MeterPayload),
}

impl TaskPayload {
    /// Kind of work described by the payload.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Coding(_) => TaskKind::Coding,
            Self::Wiring(_) => TaskKind::Wiring,
            Self::Multimeter(_) => TaskKind::Multimeter,
        }
    }
}

/// Line the player must retype together with its surrounding context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingPayload {
    /// Exact text the player has to reproduce.
    pub target_line: String,
    /// Editor window shown around the target line.
    pub snippet: CodeSnippet,
}

/// Fixed window of source lines rendered in the coding editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    /// File name shown in the editor status bar.
    pub file_name: String,
    /// Line number of the first line in the window.
    pub start_line_number: u32,
    /// Lines in display order.
    pub ordered_lines: Vec<SnippetLine>,
}

/// Single editor line within a [`CodeSnippet`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetLine {
    /// Source text of the line.
    pub text: String,
    /// Whether this is the line the player must retype.
    pub is_target: bool,
}

/// Gauge parameters for a wiring task.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WiringPayload {
    /// Green-zone strikes needed to finish.
    pub required_hits: u32,
    /// Oscillator speed in gauge widths per second.
    pub oscillator_speed: f32,
}

/// Probe sequence for a multimeter task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeterPayload {
    /// Number of probe points placed on the board.
    pub node_count: u32,
    /// Ordered readings the player must capture.
    pub sequence: Vec<MeterStep>,
    /// Cursor into `sequence`.
    pub current_step: usize,
}

impl MeterPayload {
    /// Returns the step the player is currently looking for, if any remain.
    #[must_use]
    pub fn target(&self) -> Option<&MeterStep> {
        self.sequence.get(self.current_step)
    }
}

/// Expected reading at one board node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeterStep {
    /// Node that carries the expected voltage.
    pub node: NodeIndex,
    /// Voltage revealed when the node is probed.
    pub voltage: f32,
}

/// Escalating difficulty derived from the session score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Difficulty(u32);

impl Difficulty {
    /// Difficulty at the start of every session.
    pub const INITIAL: Difficulty = Difficulty(1);

    /// Computes `1 + floor(score / 4)`.
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        Self(1 + score / 4)
    }

    /// Creates a difficulty wrapper, saturating at one.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 {
            Self(1)
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric difficulty.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Named difficulty tiers in unlock order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelId {
    /// Entry tier, unlocked from the start.
    Easy,
    /// Middle tier.
    Standard,
    /// Final tier; reaching the unlock target here wins the game.
    Hard,
}

impl LevelId {
    /// Every level in unlock order.
    pub const ALL: [LevelId; LEVEL_COUNT] = [LevelId::Easy, LevelId::Standard, LevelId::Hard];

    /// Position of the level in unlock order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Standard => 1,
            Self::Hard => 2,
        }
    }

    /// Resolves a level from its position in unlock order.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Easy),
            1 => Some(Self::Standard),
            2 => Some(Self::Hard),
            _ => None,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Standard => "Standard",
            Self::Hard => "Hard",
        }
    }
}

/// Tunable minigame parameters attached to a level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level described by this entry.
    pub id: LevelId,
    /// Base oscillator speed for wiring tasks.
    pub wiring_speed: f32,
    /// Base number of wiring strikes.
    pub wiring_hits: u32,
    /// Length of the multimeter probe sequence.
    pub meter_sequence: u32,
}

impl LevelConfig {
    /// Canonical parameters for the provided level.
    #[must_use]
    pub const fn canonical(id: LevelId) -> Self {
        match id {
            LevelId::Easy => Self {
                id,
                wiring_speed: 0.6,
                wiring_hits: 3,
                meter_sequence: 4,
            },
            LevelId::Standard => Self {
                id,
                wiring_speed: 0.8,
                wiring_hits: 4,
                meter_sequence: 6,
            },
            LevelId::Hard => Self {
                id,
                wiring_speed: 1.05,
                wiring_hits: 5,
                meter_sequence: 10,
            },
        }
    }
}

/// Dimensions of the multimeter board in presentation units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSize {
    /// Total board width.
    pub width: f32,
    /// Total board height.
    pub height: f32,
    /// Horizontal margin kept free of nodes on each side.
    pub padding_x: f32,
    /// Vertical margin kept free of nodes on each side.
    pub padding_y: f32,
}

impl BoardSize {
    /// Width available for node placement.
    #[must_use]
    pub fn usable_width(&self) -> f32 {
        (self.width - self.padding_x * 2.0).max(0.0)
    }

    /// Height available for node placement.
    #[must_use]
    pub fn usable_height(&self) -> f32 {
        (self.height - self.padding_y * 2.0).max(0.0)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            padding_x: 120.0,
            padding_y: 90.0,
        }
    }
}

/// Designer-facing knobs that shape a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Per-level minigame parameters in unlock order.
    pub levels: [LevelConfig; LEVEL_COUNT],
    /// Deliveries needed to unlock the next level, and to win on Hard.
    pub unlock_target: u32,
    /// Probe points placed on every multimeter board.
    pub meter_node_count: u32,
    /// Multimeter board dimensions handed to the layout generator.
    pub board: BoardSize,
    /// Delay between a delivery and the next assignment.
    pub delivery_grace_ms: u64,
    /// Patience floor granted when a task becomes deliverable.
    pub min_delivery_patience_ms: u64,
    /// Upper bound applied to every simulation step.
    pub max_frame_step_ms: u64,
}

impl GameTuning {
    /// Parameters configured for the provided level.
    #[must_use]
    pub fn level(&self, id: LevelId) -> &LevelConfig {
        &self.levels[id.index()]
    }

    /// Delay between a delivery and the next assignment.
    #[must_use]
    pub const fn delivery_grace(&self) -> Duration {
        Duration::from_millis(self.delivery_grace_ms)
    }

    /// Patience floor granted when a task becomes deliverable.
    #[must_use]
    pub const fn min_delivery_patience(&self) -> Duration {
        Duration::from_millis(self.min_delivery_patience_ms)
    }

    /// Upper bound applied to every simulation step.
    #[must_use]
    pub const fn max_frame_step(&self) -> Duration {
        Duration::from_millis(self.max_frame_step_ms)
    }
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            levels: LevelId::ALL.map(LevelConfig::canonical),
            unlock_target: 10,
            meter_node_count: METER_NODE_COUNT,
            board: BoardSize::default(),
            delivery_grace_ms: 600,
            min_delivery_patience_ms: 5_000,
            max_frame_step_ms: 50,
        }
    }
}

/// Commands that express every permissible game mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the elapsed frame time.
    Tick {
        /// Time elapsed since the previous frame; capped by the game.
        dt: Duration,
    },
    /// Reports a key press while the menu is visible.
    MenuKey {
        /// Character produced by the key.
        key: char,
    },
    /// Selects a level by index from the menu.
    SelectLevel {
        /// Requested position in the level list; wrapped and clamped.
        index: usize,
    },
    /// Advances the menu selection to the next selectable level.
    CycleLevel,
    /// Starts a fresh session from the menu.
    StartSession {
        /// Rendering mode requested by the player.
        mode: PlayMode,
    },
    /// Starts a fresh session with the previous mode after the session ended.
    Restart,
    /// Discards the ended session and shows the menu again.
    ReturnToMenu,
    /// Ends the running session on request.
    StopSession,
    /// Requests an action at the player's current location.
    Interact {
        /// Entity the player aimed at.
        target: InteractTarget,
        /// Spatial predicates captured by the world layer for this frame.
        proximity: Proximity,
    },
    /// Reports the current contents of the coding input.
    CodeInputChanged {
        /// Raw input text.
        text: String,
    },
    /// Strikes the wiring gauge.
    Strike,
    /// Probes a multimeter node.
    Probe {
        /// Node touched by the probe.
        node: NodeIndex,
    },
    /// Opens a throwaway minigame of the provided kind (developer mode only).
    LaunchDevMinigame {
        /// Minigame to open.
        kind: TaskKind,
    },
    /// Closes the open minigame without solving it (developer mode only).
    CloseMinigame,
}

/// Entity addressed by an interaction request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractTarget {
    /// Generic "use" action resolved against the active task.
    Use,
    /// The player pointed at a specific station.
    Station(TaskKind),
    /// The player pointed at the manager.
    Manager,
}

/// Entities the spatial layer can measure the player against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    /// The manager NPC who hands out and collects tasks.
    Manager,
    /// The workstation used for a task kind.
    Station(TaskKind),
}

/// Predicates the game cannot compute itself and receives from the world layer.
pub trait Spatial {
    /// Reports whether the player is within interaction range of the entity.
    fn within_range(&self, entity: Entity) -> bool;

    /// Reports whether the player stands in front of the station.
    fn in_front_of(&self, station: TaskKind) -> bool;
}

/// Frame snapshot of every spatial predicate, captured when an interaction is issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Proximity {
    manager_in_range: bool,
    stations: [StationProximity; 3],
}

/// Spatial predicates measured against a single station.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StationProximity {
    /// Whether the station is within interaction range.
    pub in_range: bool,
    /// Whether the player stands in front of the station.
    pub in_front: bool,
}

impl Proximity {
    /// Captures all predicates from the provided spatial oracle.
    #[must_use]
    pub fn capture<S: Spatial + ?Sized>(spatial: &S) -> Self {
        let mut proximity = Self {
            manager_in_range: spatial.within_range(Entity::Manager),
            stations: [StationProximity::default(); 3],
        };
        for kind in TaskKind::ALL {
            proximity.stations[kind.slot()] = StationProximity {
                in_range: spatial.within_range(Entity::Station(kind)),
                in_front: spatial.in_front_of(kind),
            };
        }
        proximity
    }

    /// Returns a copy that reports the manager as reachable.
    #[must_use]
    pub fn with_manager_in_range(mut self) -> Self {
        self.manager_in_range = true;
        self
    }

    /// Returns a copy with explicit predicates for one station.
    #[must_use]
    pub fn with_station(mut self, kind: TaskKind, in_range: bool, in_front: bool) -> Self {
        self.stations[kind.slot()] = StationProximity { in_range, in_front };
        self
    }

    /// Predicates captured for the provided station.
    #[must_use]
    pub const fn station(&self, kind: TaskKind) -> StationProximity {
        self.stations[kind.slot()]
    }
}

impl Spatial for Proximity {
    fn within_range(&self, entity: Entity) -> bool {
        match entity {
            Entity::Manager => self.manager_in_range,
            Entity::Station(kind) => self.station(kind).in_range,
        }
    }

    fn in_front_of(&self, station: TaskKind) -> bool {
        self.station(station).in_front
    }
}

/// Reasons an interaction request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionRejection {
    /// The task is solved but the manager is out of reach.
    DeliverToManager,
    /// The active station is in range but the player is beside or behind it.
    NotInFrontOfStation,
    /// The player talked to the manager before finishing the task.
    FinishAssignmentFirst,
    /// Neither the active station nor the manager is within reach.
    MoveCloserToStation,
    /// A station was used while a solved task awaits delivery.
    DeliverBeforeStarting,
    /// The clicked station does not belong to the active task.
    WrongStation,
    /// The clicked station is correct but the player is not in front of it.
    MoveToFrontOfStation,
    /// The clicked station is out of interaction range.
    StationOutOfRange,
    /// The manager was clicked mid-task.
    ManagerHurry,
    /// The manager was clicked from too far away.
    ManagerOutOfRange,
}

impl InteractionRejection {
    /// Advisory message surfaced to the player.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DeliverToManager => "Bring the finished task to the manager.",
            Self::NotInFrontOfStation => "Stand in front of the station to start.",
            Self::FinishAssignmentFirst => "Manager: Finish the current assignment.",
            Self::MoveCloserToStation => "Move closer to the active station.",
            Self::DeliverBeforeStarting => "Deliver the task before starting another.",
            Self::WrongStation => "That station is not the active task.",
            Self::MoveToFrontOfStation => "Move to the front of the station.",
            Self::StationOutOfRange => "Get closer to use the station.",
            Self::ManagerHurry => "Manager: Hurry up.",
            Self::ManagerOutOfRange => "Get closer to talk to the manager.",
        }
    }
}

/// Status reported by the coding minigame after every input change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodingFeedback {
    /// The input is empty.
    Cleared,
    /// The input is a strict prefix of the target.
    OnTrack,
    /// The input diverges from the target.
    Mismatch,
    /// The input equals the target.
    Correct,
}

impl CodingFeedback {
    /// Feedback text shown below the editor.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Cleared => "",
            Self::OnTrack => "So far so good...",
            Self::Mismatch => "Mismatch - fix the highlighted text.",
            Self::Correct => "Correct!",
        }
    }

    /// Whether the editor should display its error indicator.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Mismatch)
    }
}

/// Status reported by the wiring minigame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WiringFeedback {
    /// Opening instructions.
    Instructions {
        /// Strikes needed to finish.
        required_hits: u32,
    },
    /// A strike landed in the green zone.
    Hit {
        /// Strikes still needed.
        remaining: u32,
    },
    /// A strike missed the green zone.
    Miss,
    /// The final strike landed.
    Complete,
}

impl WiringFeedback {
    /// Feedback text shown below the gauge.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::Instructions { required_hits } => {
                format!("Hit space in the green zone {required_hits} times.")
            }
            Self::Hit { remaining } => format!("Nice timing - {remaining} more to go."),
            Self::Miss => "Miss! Hit space only in the green zone.".to_owned(),
            Self::Complete => "Perfect timing!".to_owned(),
        }
    }
}

/// Status reported by the multimeter minigame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeterFeedback {
    /// The payload carries no probe targets.
    NoTargets,
    /// Instructions for the current probe target.
    Prompt {
        /// One-based position of the target in the sequence.
        step: usize,
        /// Sequence length.
        total: usize,
        /// Voltage the player is looking for.
        voltage: f32,
    },
    /// The probed node matched and more targets remain.
    Locked {
        /// Voltage revealed at the node.
        voltage: f32,
    },
    /// The probed node matched the last target.
    Complete {
        /// Voltage revealed at the node.
        voltage: f32,
    },
    /// A node outside the sequence cursor was probed.
    WrongNode {
        /// Noisy red-herring reading.
        reading: f32,
    },
}

impl MeterFeedback {
    /// Feedback text shown below the board.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::NoTargets => "No targets configured.".to_owned(),
            Self::Prompt {
                step,
                total,
                voltage,
            } => format!("Probe {step}/{total}: Find node at {voltage:.1}V"),
            Self::Locked { voltage } => {
                format!("Reading: {voltage:.1}V - locked. Next target ready.")
            }
            Self::Complete { voltage } => format!("Reading: {voltage:.1}V - sequence complete!"),
            Self::WrongNode { reading } => format!("Reading: {reading:.2}V - wrong node."),
        }
    }
}

/// Feedback emitted by whichever minigame is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MinigameFeedback {
    /// Feedback from the coding editor.
    Coding(CodingFeedback),
    /// Feedback from the wiring gauge.
    Wiring(WiringFeedback),
    /// Feedback from the multimeter board.
    Multimeter(MeterFeedback),
}

impl MinigameFeedback {
    /// Feedback text shown to the player.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::Coding(feedback) => feedback.message().to_owned(),
            Self::Wiring(feedback) => feedback.message(),
            Self::Multimeter(feedback) => feedback.message(),
        }
    }
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// Patience reached zero while a task was active.
    PatienceExhausted,
    /// The player stopped the session explicitly.
    Stopped {
        /// Whether developer mode was active when the session stopped.
        dev_mode: bool,
    },
    /// The unlock target was reached on the final level.
    Promotion,
}

/// Summary presented on the end screen.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionOutcome {
    /// Why the session ended.
    pub reason: EndReason,
    /// Headline shown on the end screen.
    pub title: String,
    /// Explanation shown below the headline.
    pub detail: String,
    /// Final session score.
    pub score: u32,
}

impl SessionOutcome {
    /// Builds the end-screen summary for a finished session.
    #[must_use]
    pub fn new(reason: EndReason, score: u32, unlock_target: u32) -> Self {
        let game_over_title = if score >= unlock_target {
            "Congrats on your promotion!"
        } else {
            "You're FIRED!"
        };
        let (title, detail) = match reason {
            EndReason::PatienceExhausted => {
                (game_over_title.to_owned(), "Manager lost patience.".to_owned())
            }
            EndReason::Stopped { dev_mode: true } => (
                game_over_title.to_owned(),
                "Stopped via dev controls.".to_owned(),
            ),
            EndReason::Stopped { dev_mode: false } => {
                (game_over_title.to_owned(), "Stopped manually.".to_owned())
            }
            EndReason::Promotion => (
                "Promotion Secured".to_owned(),
                format!("Cleared {unlock_target} tasks on Hard difficulty."),
            ),
        };
        Self {
            reason,
            title,
            detail,
            score,
        }
    }
}

/// Events reported by the game after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Simulated time that elapsed, after capping.
        dt: Duration,
    },
    /// The hidden developer mode was switched on.
    DevModeActivated,
    /// The menu selection moved to a level.
    LevelSelected {
        /// Level that is now selected.
        level: LevelId,
    },
    /// Level cycling found no other unlocked level.
    LevelLocked {
        /// Deliveries needed to unlock the next level.
        unlock_target: u32,
    },
    /// A fresh session entered the playing state.
    SessionStarted {
        /// Rendering mode of the session.
        mode: PlayMode,
        /// Level the session is played on.
        level: LevelId,
    },
    /// A task became the active task.
    TaskAssigned {
        /// Identifier of the assigned task.
        task: TaskId,
        /// Kind of work requested.
        kind: TaskKind,
        /// Display label.
        title: String,
        /// Patience granted for the task.
        time_budget: Duration,
    },
    /// A minigame overlay opened.
    MinigameOpened {
        /// Minigame that opened.
        kind: TaskKind,
        /// Whether the minigame belongs to a developer task.
        dev_task: bool,
    },
    /// The active minigame reported progress.
    MinigameFeedback {
        /// Structured feedback.
        feedback: MinigameFeedback,
    },
    /// The minigame overlay closed.
    MinigameClosed {
        /// Whether the minigame was solved.
        solved: bool,
    },
    /// The active task was solved and must be delivered.
    TaskReadyForDelivery {
        /// Identifier of the solved task.
        task: TaskId,
    },
    /// A solved task was handed to the manager.
    TaskDelivered {
        /// Identifier of the delivered task.
        task: TaskId,
        /// Score after the delivery.
        score: u32,
        /// Difficulty after the delivery.
        difficulty: Difficulty,
    },
    /// A level was permanently unlocked.
    LevelUnlocked {
        /// Level that became available.
        level: LevelId,
    },
    /// An interaction request was refused.
    InteractionRejected {
        /// Reason for the refusal.
        reason: InteractionRejection,
    },
    /// The session ended.
    SessionEnded {
        /// End-screen summary.
        outcome: SessionOutcome,
    },
    /// A new high score was stored.
    HighScoreRecorded {
        /// Stored high score.
        high_score: u32,
    },
    /// The menu became visible again.
    ReturnedToMenu,
}

/// Progress persisted across process restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StoredProgress {
    /// Best session score ever recorded.
    pub high_score: u32,
    /// Highest level index the player unlocked.
    pub unlocked_level: usize,
}

/// Best-effort persistence for the process-wide progress values.
///
/// Implementations never fail: loads fall back to defaults and writes swallow
/// errors after logging them.
pub trait ProgressStore: fmt::Debug {
    /// Reads the stored progress, substituting defaults for anything unreadable.
    fn load(&self) -> StoredProgress;

    /// Stores a new high score.
    fn save_high_score(&mut self, high_score: u32);

    /// Stores a new unlocked level index.
    fn save_unlocked_level(&mut self, index: usize);
}
