#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system simulating the wiring gauge and grading strikes.
//!
//! The gauge position is advanced by [`WiringGame::advance`] every frame while
//! the minigame is open; strikes sample the position at the moment they occur.

use std::{ops::RangeInclusive, time::Duration};

use ee_dash_core::{WiringFeedback, WiringPayload};

/// Portion of the gauge that counts as a hit.
pub const GREEN_ZONE: RangeInclusive<f32> = 0.47..=0.53;

/// Oscillator speed used when a payload carries a non-positive speed.
pub const FALLBACK_SPEED: f32 = 0.65;

/// Strike count used when a payload requests zero strikes.
pub const FALLBACK_REQUIRED_HITS: u32 = 3;

/// Travel direction of the gauge indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Moving towards `1.0`.
    Forward,
    /// Moving towards `0.0`.
    Backward,
}

impl Direction {
    const fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Wiring minigame state.
#[derive(Clone, Debug, PartialEq)]
pub struct WiringGame {
    position: f32,
    direction: Direction,
    speed: f32,
    hits: u32,
    required_hits: u32,
    feedback: WiringFeedback,
}

impl WiringGame {
    /// Opens a gauge at position zero travelling forward.
    #[must_use]
    pub fn new(payload: WiringPayload) -> Self {
        let speed = if payload.oscillator_speed.is_finite() && payload.oscillator_speed > 0.0 {
            payload.oscillator_speed
        } else {
            FALLBACK_SPEED
        };
        let required_hits = if payload.required_hits == 0 {
            FALLBACK_REQUIRED_HITS
        } else {
            payload.required_hits
        };
        Self {
            position: 0.0,
            direction: Direction::Forward,
            speed,
            hits: 0,
            required_hits,
            feedback: WiringFeedback::Instructions { required_hits },
        }
    }

    /// Moves the indicator, reflecting off both ends of the gauge.
    pub fn advance(&mut self, dt: Duration) {
        self.position += self.direction.sign() * self.speed * dt.as_secs_f32();
        if self.position >= 1.0 {
            self.position = 1.0;
            self.direction = Direction::Backward;
        } else if self.position <= 0.0 {
            self.position = 0.0;
            self.direction = Direction::Forward;
        }
    }

    /// Grades a strike at the current indicator position.
    pub fn strike(&mut self) -> WiringFeedback {
        self.feedback = if GREEN_ZONE.contains(&self.position) {
            self.hits += 1;
            let remaining = self.required_hits.saturating_sub(self.hits);
            if remaining == 0 {
                WiringFeedback::Complete
            } else {
                WiringFeedback::Hit { remaining }
            }
        } else {
            WiringFeedback::Miss
        };
        self.feedback
    }

    /// Current indicator position in `[0, 1]`.
    #[must_use]
    pub const fn position(&self) -> f32 {
        self.position
    }

    /// Current travel direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Oscillator speed in gauge widths per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Strikes landed so far.
    #[must_use]
    pub const fn hits(&self) -> u32 {
        self.hits
    }

    /// Strikes needed to finish.
    #[must_use]
    pub const fn required_hits(&self) -> u32 {
        self.required_hits
    }

    /// Most recent feedback.
    #[must_use]
    pub const fn feedback(&self) -> WiringFeedback {
        self.feedback
    }

    /// Whether every required strike landed.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.hits >= self.required_hits
    }
}
