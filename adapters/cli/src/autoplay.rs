//! Scripted player that walks the office and solves every minigame.

use std::time::Duration;

use ee_dash_core::{Command, Entity, GameState, InteractTarget, Proximity, TaskPhase};
use ee_dash_game::{query, Game};
use ee_dash_system_wiring::GREEN_ZONE;

use crate::room::Room;

/// Bot state carried between frames.
#[derive(Clone, Debug)]
pub(crate) struct Autoplay {
    room: Room,
}

impl Autoplay {
    pub(crate) fn new() -> Self {
        Self { room: Room::new() }
    }

    /// Commands to submit before the next tick. Walking happens as a side effect.
    pub(crate) fn plan(&mut self, game: &Game, dt: Duration) -> Vec<Command> {
        match query::state(game) {
            GameState::Playing => self.walk(game, dt).into_iter().collect(),
            GameState::Minigame => solve_step(game).into_iter().collect(),
            GameState::Menu | GameState::Ended => Vec::new(),
        }
    }

    fn walk(&mut self, game: &Game, dt: Duration) -> Option<Command> {
        let Some(task) = query::current_task(game) else {
            let _ = self.room.walk_towards(Room::idle_point(), dt);
            return None;
        };
        let entity = match task.phase {
            TaskPhase::Working => Entity::Station(task.kind()),
            TaskPhase::ReadyToDeliver => Entity::Manager,
        };
        if !self.room.walk_towards(Room::approach_point(entity), dt) {
            return None;
        }

        // Alternate between the keyboard and pointer paths.
        let target = if task.id.get() % 2 == 0 {
            InteractTarget::Use
        } else {
            match entity {
                Entity::Manager => InteractTarget::Manager,
                Entity::Station(kind) => InteractTarget::Station(kind),
            }
        };
        Some(Command::Interact {
            target,
            proximity: Proximity::capture(&self.room),
        })
    }
}

/// Next input for the open minigame: one more typed character, a strike
/// inside the green zone, or a probe on the highlighted node.
fn solve_step(game: &Game) -> Option<Command> {
    if let Some(coding) = query::coding(game) {
        let typed = coding.input().chars().count();
        let text: String = coding.target().chars().take(typed + 1).collect();
        return Some(Command::CodeInputChanged { text });
    }
    if let Some(wiring) = query::wiring(game) {
        return GREEN_ZONE
            .contains(&wiring.position())
            .then_some(Command::Strike);
    }
    query::hot_node(game).map(|node| Command::Probe { node })
}
