//! Headless office floor standing in for the rendered scene.
//!
//! Positions live on the ground plane: `x` runs left to right and `y` holds
//! the scene's depth axis, growing towards the entrance.

use std::time::Duration;

use ee_dash_core::{Entity, Spatial, TaskKind, INTERACTION_RANGE, STATION_FRONT_SLACK};
use glam::Vec2;

const PLAYER_START: Vec2 = Vec2::new(0.0, 6.5);
const MANAGER_POSITION: Vec2 = Vec2::new(0.0, -5.5);
const PLAYER_SPEED: f32 = 5.0;
const APPROACH_DISTANCE: f32 = 1.2;

/// Avatar position plus the fixed office furniture.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Room {
    player: Vec2,
}

impl Room {
    pub(crate) fn new() -> Self {
        Self {
            player: PLAYER_START,
        }
    }

    /// Moves the avatar towards `goal` and reports whether it has arrived.
    pub(crate) fn walk_towards(&mut self, goal: Vec2, dt: Duration) -> bool {
        let offset = goal - self.player;
        let step = PLAYER_SPEED * dt.as_secs_f32();
        if offset.length() <= step {
            self.player = goal;
            return true;
        }
        self.player += offset.normalize_or_zero() * step;
        false
    }

    /// Spot from which the player can use the entity.
    pub(crate) fn approach_point(entity: Entity) -> Vec2 {
        position(entity) + Vec2::new(0.0, APPROACH_DISTANCE)
    }

    /// Where the avatar idles between tasks.
    pub(crate) fn idle_point() -> Vec2 {
        PLAYER_START
    }
}

const fn station_position(kind: TaskKind) -> Vec2 {
    match kind {
        TaskKind::Coding => Vec2::new(-5.0, 1.5),
        TaskKind::Wiring => Vec2::new(0.0, 1.5),
        TaskKind::Multimeter => Vec2::new(5.0, 1.5),
    }
}

const fn position(entity: Entity) -> Vec2 {
    match entity {
        Entity::Manager => MANAGER_POSITION,
        Entity::Station(kind) => station_position(kind),
    }
}

impl Spatial for Room {
    fn within_range(&self, entity: Entity) -> bool {
        self.player.distance(position(entity)) < INTERACTION_RANGE
    }

    fn in_front_of(&self, station: TaskKind) -> bool {
        self.player.y > station_position(station).y + STATION_FRONT_SLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_to(room: &mut Room, goal: Vec2) {
        for _ in 0..1_000 {
            if room.walk_towards(goal, Duration::from_millis(16)) {
                return;
            }
        }
        panic!("never reached {goal:?}");
    }

    #[test]
    fn start_is_out_of_reach_of_everything() {
        let room = Room::new();
        assert!(!room.within_range(Entity::Manager));
        for kind in TaskKind::ALL {
            assert!(!room.within_range(Entity::Station(kind)));
        }
    }

    #[test]
    fn approach_points_face_their_station() {
        for kind in TaskKind::ALL {
            let mut room = Room::new();
            walk_to(&mut room, Room::approach_point(Entity::Station(kind)));
            assert!(room.within_range(Entity::Station(kind)));
            assert!(room.in_front_of(kind));
        }
    }

    #[test]
    fn standing_behind_a_station_is_not_in_front() {
        let mut room = Room::new();
        let behind = station_position(TaskKind::Wiring) - Vec2::new(0.0, 1.0);
        walk_to(&mut room, behind);
        assert!(room.within_range(Entity::Station(TaskKind::Wiring)));
        assert!(!room.in_front_of(TaskKind::Wiring));
    }

    #[test]
    fn range_boundary_is_exclusive() {
        let mut room = Room::new();
        room.player = MANAGER_POSITION + Vec2::new(INTERACTION_RANGE, 0.0);
        assert!(!room.within_range(Entity::Manager));

        room.player = MANAGER_POSITION + Vec2::new(INTERACTION_RANGE - 0.01, 0.0);
        assert!(room.within_range(Entity::Manager));
    }

    #[test]
    fn manager_is_reachable_from_its_approach_point() {
        let mut room = Room::new();
        walk_to(&mut room, Room::approach_point(Entity::Manager));
        assert!(room.within_range(Entity::Manager));
        assert!(!room.within_range(Entity::Station(TaskKind::Wiring)));
    }
}
