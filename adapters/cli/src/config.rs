//! Run settings for the headless driver.
//!
//! Resolution order: command-line flags, then the TOML file, then defaults.
//! A missing file is not an error.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use ee_dash_core::{GameTuning, LevelId, PlayMode};
use ee_dash_game::DEFAULT_SEED;
use serde::{Deserialize, Serialize};

/// File consulted when no `--config` flag is given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "ee-dash.toml";

/// Everything the driver needs to run a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Base seed for every session stream.
    pub(crate) seed: u64,
    /// Simulated frames per second.
    pub(crate) frame_rate: f32,
    /// Frames to simulate before the session is stopped.
    pub(crate) max_frames: u32,
    /// JSON file holding the persisted progress. In-memory when absent.
    pub(crate) store_path: Option<PathBuf>,
    /// Level requested on the menu.
    pub(crate) level: LevelId,
    /// Rendering mode the session starts in.
    pub(crate) mode: PlayMode,
    /// Designer knobs forwarded to the game.
    pub(crate) tuning: GameTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            frame_rate: 60.0,
            max_frames: 36_000,
            store_path: None,
            level: LevelId::Easy,
            mode: PlayMode::Full,
            tuning: GameTuning::default(),
        }
    }
}

/// Values supplied on the command line that win over the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) frame_rate: Option<f32>,
    pub(crate) max_frames: Option<u32>,
    pub(crate) store_path: Option<PathBuf>,
    pub(crate) level: Option<LevelId>,
    pub(crate) mode: Option<PlayMode>,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("frame rate must be a positive number, got {0}")]
    InvalidFrameRate(f32),
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

impl Settings {
    /// Loads the file at `path`, applies `overrides` and validates the result.
    pub(crate) fn load(path: &Path, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut settings = if path.exists() {
            let text = fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))?
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Settings::default()
        };
        settings.apply(overrides);
        settings.validate()?;
        Ok(settings)
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(frame_rate) = overrides.frame_rate {
            self.frame_rate = frame_rate;
        }
        if let Some(max_frames) = overrides.max_frames {
            self.max_frames = max_frames;
        }
        if let Some(path) = overrides.store_path {
            self.store_path = Some(path);
        }
        if let Some(level) = overrides.level {
            self.level = level;
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        let tuning = &self.tuning;
        if tuning.meter_node_count == 0 {
            return Err(ConfigError::InvalidTuning(
                "meter_node_count must be at least 1".to_owned(),
            ));
        }
        if tuning.max_frame_step_ms == 0 {
            return Err(ConfigError::InvalidTuning(
                "max_frame_step_ms must be at least 1".to_owned(),
            ));
        }
        for (slot, (config, expected)) in tuning.levels.iter().zip(LevelId::ALL).enumerate() {
            if config.id != expected {
                return Err(ConfigError::InvalidTuning(format!(
                    "levels[{slot}] must describe {}, found {}",
                    expected.label(),
                    config.id.label()
                )));
            }
        }
        Ok(())
    }

    /// Simulated time covered by one frame.
    pub(crate) fn frame_step(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.frame_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings =
            Settings::load(&dir.path().join("absent.toml"), Overrides::default()).expect("load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tuning.unlock_target, 10);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ee-dash.toml");
        fs::write(
            &path,
            "seed = 7\nlevel = \"standard\"\nmode = \"prototype\"\n\n[tuning]\nunlock_target = 4\n",
        )
        .expect("write settings");

        let settings = Settings::load(&path, Overrides::default()).expect("load");
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.level, LevelId::Standard);
        assert_eq!(settings.mode, PlayMode::Prototype);
        assert_eq!(settings.tuning.unlock_target, 4);
        assert_eq!(settings.tuning.meter_node_count, 18);
        assert_eq!(settings.frame_rate, 60.0);
    }

    #[test]
    fn command_line_wins_over_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ee-dash.toml");
        fs::write(&path, "seed = 7\nmax_frames = 10\n").expect("write settings");

        let overrides = Overrides {
            seed: Some(99),
            level: Some(LevelId::Hard),
            ..Overrides::default()
        };
        let settings = Settings::load(&path, overrides).expect("load");
        assert_eq!(settings.seed, 99);
        assert_eq!(settings.max_frames, 10);
        assert_eq!(settings.level, LevelId::Hard);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ee-dash.toml");
        fs::write(&path, "seed = \"many\"\n").expect("write settings");

        let error = Settings::load(&path, Overrides::default()).expect_err("parse failure");
        assert!(matches!(error, ConfigError::ParseFailed(ref failed, _) if *failed == path));
    }

    #[test]
    fn frame_rate_must_be_positive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let overrides = Overrides {
            frame_rate: Some(0.0),
            ..Overrides::default()
        };
        let error =
            Settings::load(&dir.path().join("absent.toml"), overrides).expect_err("invalid rate");
        assert!(matches!(error, ConfigError::InvalidFrameRate(rate) if rate == 0.0));
    }

    fn tuning_error(toml: &str) -> String {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ee-dash.toml");
        fs::write(&path, toml).expect("write settings");
        match Settings::load(&path, Overrides::default()).expect_err("invalid tuning") {
            ConfigError::InvalidTuning(message) => message,
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn empty_meter_board_is_rejected() {
        let message = tuning_error("[tuning]\nmeter_node_count = 0\n");
        assert!(message.contains("meter_node_count"), "{message}");
    }

    #[test]
    fn zero_frame_step_cap_is_rejected() {
        let message = tuning_error("[tuning]\nmax_frame_step_ms = 0\n");
        assert!(message.contains("max_frame_step_ms"), "{message}");
    }

    #[test]
    fn levels_must_stay_in_unlock_order() {
        let mut tuning = GameTuning::default();
        tuning.levels.swap(0, 2);
        let settings = Settings {
            tuning,
            ..Settings::default()
        };
        let error = settings.validate().expect_err("reordered levels");
        assert!(matches!(error, ConfigError::InvalidTuning(ref m) if m.contains("levels[0]")));
    }

    #[test]
    fn frame_step_follows_rate() {
        let settings = Settings {
            frame_rate: 4.0,
            ..Settings::default()
        };
        assert_eq!(settings.frame_step(), Duration::from_millis(250));
    }
}
