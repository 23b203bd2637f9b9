#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that grades retyped code lines against their target.

use ee_dash_core::CodingFeedback;

/// Coding minigame state for a single target line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodingGame {
    target: String,
    input: String,
    feedback: CodingFeedback,
}

impl CodingGame {
    /// Opens the editor for the provided target line with an empty input.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            input: String::new(),
            feedback: CodingFeedback::Cleared,
        }
    }

    /// Grades the latest input contents.
    ///
    /// Line breaks are collapsed to single spaces before comparison, so pasted
    /// multi-line text is graded as one line.
    pub fn input_changed(&mut self, raw: &str) -> CodingFeedback {
        self.input = collapse_line_breaks(raw);
        self.feedback = grade(&self.target, &self.input);
        self.feedback
    }

    /// Line the player has to reproduce.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Normalised input that was graded last.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Most recent grading result.
    #[must_use]
    pub const fn feedback(&self) -> CodingFeedback {
        self.feedback
    }

    /// Number of leading characters of the input that match the target.
    #[must_use]
    pub fn matched_prefix(&self) -> usize {
        common_prefix_len(&self.target, &self.input)
    }

    /// Whether the editor should display its error indicator.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.feedback.is_error()
    }

    /// Whether the input matches the target exactly.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self.feedback, CodingFeedback::Correct)
    }
}

/// Grades `input` against `target`.
#[must_use]
pub fn grade(target: &str, input: &str) -> CodingFeedback {
    if input.is_empty() {
        return CodingFeedback::Cleared;
    }
    if input == target {
        return CodingFeedback::Correct;
    }
    if common_prefix_len(target, input) == input.chars().count() {
        CodingFeedback::OnTrack
    } else {
        CodingFeedback::Mismatch
    }
}

/// Replaces every run of `\r` and `\n` characters with a single space.
#[must_use]
pub fn collapse_line_breaks(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut in_break = false;
    for character in raw.chars() {
        if character == '\r' || character == '\n' {
            if !in_break {
                collapsed.push(' ');
            }
            in_break = true;
        } else {
            collapsed.push(character);
            in_break = false;
        }
    }
    collapsed
}

fn common_prefix_len(target: &str, input: &str) -> usize {
    target
        .chars()
        .zip(input.chars())
        .take_while(|(expected, typed)| expected == typed)
        .count()
}
