#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays EE Dash sessions headlessly.

mod autoplay;
mod config;
mod room;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ee_dash_core::{Command, Event, GameState, LevelId, PlayMode, ProgressStore, TaskKind};
use ee_dash_game::{apply, query, Game, GameConfig};
use ee_dash_storage::{JsonFileStore, MemoryStore, Persistence};
use tracing_subscriber::EnvFilter;

use crate::{
    autoplay::Autoplay,
    config::{Overrides, Settings, DEFAULT_CONFIG_PATH},
};

#[derive(Debug, Parser)]
#[command(name = "ee-dash")]
#[command(version)]
#[command(about = "Plays an EE Dash session with a scripted player", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Base seed for every session stream
    #[arg(long)]
    seed: Option<u64>,

    /// Level to select on the menu: easy, standard or hard
    #[arg(long, value_parser = parse_level)]
    level: Option<LevelId>,

    /// Rendering mode: prototype or full
    #[arg(long, value_parser = parse_mode)]
    mode: Option<PlayMode>,

    /// Simulated frames per second
    #[arg(long)]
    frame_rate: Option<f32>,

    /// Frames to simulate before stopping the session
    #[arg(long)]
    max_frames: Option<u32>,

    /// JSON file holding high score and unlocked level
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Type the developer code on the menu before starting
    #[arg(long)]
    dev: bool,

    /// Open a developer minigame right after the session starts
    #[arg(long, value_name = "KIND", value_parser = parse_kind, requires = "dev")]
    dev_minigame: Option<TaskKind>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            frame_rate: self.frame_rate,
            max_frames: self.max_frames,
            store_path: self.store.clone(),
            level: self.level,
            mode: self.mode,
        }
    }
}

/// Entry point for the EE Dash command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(&cli.config, cli.overrides())
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    tracing::debug!(?settings, "settings resolved");

    let store: Box<dyn ProgressStore> = match &settings.store_path {
        Some(path) => Box::new(Persistence::new(JsonFileStore::new(path))),
        None => Box::new(Persistence::new(MemoryStore::new())),
    };
    let mut game = Game::new(
        GameConfig {
            seed: settings.seed,
            tuning: settings.tuning.clone(),
        },
        store,
    );
    println!("Welcome to EE Dash.");
    println!(
        "High score: {} | Unlocked: {}",
        query::high_score(&game),
        query::unlocked_level(&game).label()
    );

    let mut events = Vec::new();
    if cli.dev {
        for key in "dev".chars() {
            apply(&mut game, Command::MenuKey { key }, &mut events);
        }
    }
    apply(
        &mut game,
        Command::SelectLevel {
            index: settings.level.index(),
        },
        &mut events,
    );
    if query::selected_level(&game) != settings.level {
        tracing::warn!(
            requested = settings.level.label(),
            "level is locked, starting on {}",
            query::selected_level(&game).label()
        );
    }
    apply(
        &mut game,
        Command::StartSession {
            mode: settings.mode,
        },
        &mut events,
    );
    if let Some(kind) = cli.dev_minigame {
        apply(&mut game, Command::LaunchDevMinigame { kind }, &mut events);
    }
    report(&mut events);

    let dt = settings.frame_step();
    let mut bot = Autoplay::new();
    for _ in 0..settings.max_frames {
        if query::state(&game) == GameState::Ended {
            break;
        }
        for command in bot.plan(&game, dt) {
            apply(&mut game, command, &mut events);
        }
        apply(&mut game, Command::Tick { dt }, &mut events);
        report(&mut events);
    }

    if query::state(&game) == GameState::Minigame {
        apply(&mut game, Command::CloseMinigame, &mut events);
    }
    apply(&mut game, Command::StopSession, &mut events);
    report(&mut events);

    match query::outcome(&game) {
        Some(outcome) => println!(
            "{} {} Score: {} | High score: {}",
            outcome.title,
            outcome.detail,
            outcome.score,
            query::high_score(&game)
        ),
        None => tracing::warn!("frame limit reached with a minigame open"),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Prints the narrative for every event and empties the buffer.
fn report(events: &mut Vec<Event>) {
    for event in events.drain(..) {
        if let Some(line) = describe(&event) {
            println!("{line}");
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::TimeAdvanced { .. } => return None,
        Event::DevModeActivated => "Developer mode enabled".to_owned(),
        Event::LevelSelected { level } => format!("Level: {}", level.label()),
        Event::LevelLocked { unlock_target } => {
            format!("Locked: clear {unlock_target} tasks on the previous level")
        }
        Event::SessionStarted { mode, level } => {
            format!("Session started on {} ({mode:?})", level.label())
        }
        Event::TaskAssigned {
            title, time_budget, ..
        } => format!("New task: {title} ({:.1}s)", time_budget.as_secs_f32()),
        Event::MinigameOpened { kind, dev_task } => {
            let suffix = if *dev_task { " [dev]" } else { "" };
            format!("Opened {}{suffix}", kind.title())
        }
        Event::MinigameFeedback { feedback } => {
            let message = feedback.message();
            if message.is_empty() {
                return None;
            }
            message
        }
        Event::MinigameClosed { solved: true } => "Minigame solved".to_owned(),
        Event::MinigameClosed { solved: false } => "Minigame closed".to_owned(),
        Event::TaskReadyForDelivery { .. } => "Task complete, deliver it to the manager".to_owned(),
        Event::TaskDelivered {
            score, difficulty, ..
        } => format!("Delivered! Score {score}, difficulty {}", difficulty.get()),
        Event::LevelUnlocked { level } => format!("Unlocked {}", level.label()),
        Event::InteractionRejected { reason } => reason.message().to_owned(),
        Event::SessionEnded { outcome } => format!("Session over: {}", outcome.title),
        Event::HighScoreRecorded { high_score } => format!("New high score: {high_score}"),
        Event::ReturnedToMenu => "Back to the menu".to_owned(),
    };
    Some(line)
}

fn parse_level(raw: &str) -> Result<LevelId, String> {
    LevelId::ALL
        .into_iter()
        .find(|level| level.label().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| format!("unknown level `{raw}`, expected easy, standard or hard"))
}

fn parse_mode(raw: &str) -> Result<PlayMode, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "prototype" => Ok(PlayMode::Prototype),
        "full" => Ok(PlayMode::Full),
        _ => Err(format!("unknown mode `{raw}`, expected prototype or full")),
    }
}

fn parse_kind(raw: &str) -> Result<TaskKind, String> {
    TaskKind::from_name(raw)
        .ok_or_else(|| format!("unknown minigame `{raw}`, expected coding, wiring or multimeter"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(parse_level("Standard"), Ok(LevelId::Standard));
        assert!(parse_level("impossible").is_err());
        assert_eq!(parse_mode("PROTOTYPE"), Ok(PlayMode::Prototype));
        assert!(parse_mode("wireframe").is_err());
        assert_eq!(parse_kind("meter"), Ok(TaskKind::Multimeter));
        assert!(parse_kind("soldering").is_err());
    }

    #[test]
    fn dev_minigame_requires_dev_flag() {
        assert!(Cli::try_parse_from(["ee-dash", "--dev-minigame", "wiring"]).is_err());
        let cli = Cli::try_parse_from(["ee-dash", "--dev", "--dev-minigame", "wiring"])
            .expect("valid arguments");
        assert_eq!(cli.dev_minigame, Some(TaskKind::Wiring));
    }

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::try_parse_from(["ee-dash", "--seed", "5", "--level", "hard"])
            .expect("valid arguments");
        let overrides = cli.overrides();
        assert_eq!(overrides.seed, Some(5));
        assert_eq!(overrides.level, Some(LevelId::Hard));
        assert_eq!(overrides.mode, None);
    }

    #[test]
    fn time_events_are_silent() {
        assert_eq!(
            describe(&Event::TimeAdvanced {
                dt: std::time::Duration::from_millis(16)
            }),
            None
        );
        assert_eq!(
            describe(&Event::HighScoreRecorded { high_score: 3 }).as_deref(),
            Some("New high score: 3")
        );
    }
}
