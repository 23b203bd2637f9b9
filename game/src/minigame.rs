use ee_dash_core::{BoardSize, MinigameFeedback, Task, TaskKind, TaskPayload};
use ee_dash_system_coding::CodingGame;
use ee_dash_system_multimeter::MultimeterGame;
use ee_dash_system_wiring::WiringGame;
use rand::Rng;

/// Minigame overlay currently open for the active task.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveMinigame {
    /// Coding editor.
    Coding(CodingGame),
    /// Wiring gauge.
    Wiring(WiringGame),
    /// Multimeter board.
    Multimeter(MultimeterGame),
}

impl ActiveMinigame {
    /// Builds the minigame matching the task payload.
    pub(crate) fn open<R: Rng + ?Sized>(task: &Task, board: &BoardSize, rng: &mut R) -> Self {
        match &task.payload {
            TaskPayload::Coding(payload) => Self::Coding(CodingGame::new(&payload.target_line)),
            TaskPayload::Wiring(payload) => Self::Wiring(WiringGame::new(*payload)),
            TaskPayload::Multimeter(payload) => {
                Self::Multimeter(MultimeterGame::new(payload, board, rng))
            }
        }
    }

    /// Kind of minigame.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Coding(_) => TaskKind::Coding,
            Self::Wiring(_) => TaskKind::Wiring,
            Self::Multimeter(_) => TaskKind::Multimeter,
        }
    }

    /// Feedback currently shown by the minigame.
    #[must_use]
    pub fn feedback(&self) -> MinigameFeedback {
        match self {
            Self::Coding(game) => MinigameFeedback::Coding(game.feedback()),
            Self::Wiring(game) => MinigameFeedback::Wiring(game.feedback()),
            Self::Multimeter(game) => MinigameFeedback::Multimeter(game.feedback()),
        }
    }
}
