#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc, time::Duration};

use ee_dash_core::{
    Command, Event, InteractTarget, NodeIndex, PlayMode, ProgressStore, Proximity, StoredProgress,
    TaskKind, TaskPayload, TaskPhase,
};
use ee_dash_game::{apply, query, Game, GameConfig};
use ee_dash_system_wiring::GREEN_ZONE;

pub const FRAME: Duration = Duration::from_millis(50);

/// Progress store that stays observable after the game takes ownership.
#[derive(Clone, Debug, Default)]
pub struct SharedStore(pub Rc<RefCell<StoredProgress>>);

impl SharedStore {
    pub fn with(progress: StoredProgress) -> Self {
        Self(Rc::new(RefCell::new(progress)))
    }

    pub fn snapshot(&self) -> StoredProgress {
        *self.0.borrow()
    }
}

impl ProgressStore for SharedStore {
    fn load(&self) -> StoredProgress {
        *self.0.borrow()
    }

    fn save_high_score(&mut self, high_score: u32) {
        self.0.borrow_mut().high_score = high_score;
    }

    fn save_unlocked_level(&mut self, index: usize) {
        self.0.borrow_mut().unlocked_level = index;
    }
}

pub struct Harness {
    pub game: Game,
    pub store: SharedStore,
    pub log: Vec<Event>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_progress(StoredProgress::default())
    }

    pub fn with_progress(progress: StoredProgress) -> Self {
        Self::with_config(GameConfig::default(), progress)
    }

    pub fn with_config(config: GameConfig, progress: StoredProgress) -> Self {
        let store = SharedStore::with(progress);
        let game = Game::new(config, Box::new(store.clone()));
        Self {
            game,
            store,
            log: Vec::new(),
        }
    }

    pub fn send(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.game, command, &mut events);
        self.log.extend(events.iter().cloned());
        events
    }

    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        self.send(Command::Tick { dt })
    }

    pub fn ticks(&mut self, count: usize) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..count {
            events.extend(self.tick(FRAME));
        }
        events
    }

    pub fn type_keys(&mut self, keys: &str) -> Vec<Event> {
        let mut events = Vec::new();
        for key in keys.chars() {
            events.extend(self.send(Command::MenuKey { key }));
        }
        events
    }

    pub fn enable_dev_mode(&mut self) {
        let events = self.type_keys("dev");
        assert!(events.contains(&Event::DevModeActivated));
    }

    pub fn start(&mut self) -> Vec<Event> {
        self.send(Command::StartSession {
            mode: PlayMode::Prototype,
        })
    }

    pub fn current_kind(&self) -> TaskKind {
        query::current_task(&self.game)
            .expect("an active task")
            .kind()
    }

    pub fn use_at(&mut self, proximity: Proximity) -> Vec<Event> {
        self.send(Command::Interact {
            target: InteractTarget::Use,
            proximity,
        })
    }

    pub fn click(&mut self, target: InteractTarget, proximity: Proximity) -> Vec<Event> {
        self.send(Command::Interact { target, proximity })
    }

    /// Opens the active task's minigame from in front of its station.
    pub fn open_current(&mut self) -> Vec<Event> {
        let kind = self.current_kind();
        self.use_at(in_front_of(kind))
    }

    /// Solves whichever minigame is open.
    pub fn solve_open_minigame(&mut self) -> Vec<Event> {
        let task = query::current_task(&self.game)
            .expect("an active task")
            .clone();
        let mut events = Vec::new();
        match task.payload {
            TaskPayload::Coding(payload) => {
                events.extend(self.send(Command::CodeInputChanged {
                    text: payload.target_line,
                }));
            }
            TaskPayload::Wiring(_) => {
                for _ in 0..10_000 {
                    let Some(wiring) = query::wiring(&self.game) else {
                        break;
                    };
                    if GREEN_ZONE.contains(&wiring.position()) {
                        events.extend(self.send(Command::Strike));
                    } else {
                        events.extend(self.tick(Duration::from_millis(10)));
                    }
                }
            }
            TaskPayload::Multimeter(payload) => {
                let nodes: Vec<NodeIndex> =
                    payload.sequence.iter().map(|step| step.node).collect();
                for node in nodes.into_iter().skip(payload.current_step) {
                    events.extend(self.send(Command::Probe { node }));
                }
            }
        }
        events
    }

    /// Opens and solves the active task so that it awaits delivery.
    pub fn solve_current(&mut self) -> Vec<Event> {
        let mut events = self.open_current();
        events.extend(self.solve_open_minigame());
        assert_eq!(
            query::current_task(&self.game).map(|task| task.phase),
            Some(TaskPhase::ReadyToDeliver)
        );
        events
    }

    pub fn deliver(&mut self) -> Vec<Event> {
        self.use_at(near_manager())
    }

    /// Solves and delivers tasks, waiting out the grace delay between them.
    pub fn complete_tasks(&mut self, count: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..count {
            events.extend(self.solve_current());
            events.extend(self.deliver());
            if query::awaiting_assignment(&self.game) {
                events.extend(self.ticks(13));
            }
        }
        events
    }
}

/// Finds a seed whose first session opens with a task of the given kind.
pub fn harness_opening_with(kind: TaskKind) -> Harness {
    for seed in 0..256 {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        let mut harness = Harness::with_config(config, StoredProgress::default());
        let _ = harness.start();
        if harness.current_kind() == kind {
            harness.log.clear();
            return harness;
        }
    }
    panic!("no seed opens with a {kind:?} task");
}

pub fn in_front_of(kind: TaskKind) -> Proximity {
    Proximity::default().with_station(kind, true, true)
}

pub fn near_manager() -> Proximity {
    Proximity::default().with_manager_in_range()
}

pub fn far_away() -> Proximity {
    Proximity::default()
}

pub fn other_station(kind: TaskKind) -> TaskKind {
    match kind {
        TaskKind::Coding => TaskKind::Wiring,
        TaskKind::Wiring => TaskKind::Multimeter,
        TaskKind::Multimeter => TaskKind::Coding,
    }
}
