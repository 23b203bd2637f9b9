#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system for the multimeter probing minigame.
//!
//! The board owns the generated node positions while the probe cursor lives in
//! the task's [`MeterPayload`], so progress survives the board being rebuilt.

use ee_dash_core::{BoardSize, MeterFeedback, MeterPayload, NodeIndex};
use ee_dash_system_content::layout_nodes;
use glam::Vec2;
use rand::Rng;

/// Half-width of the uniform noise added to wrong-node readings.
pub const WRONG_NODE_NOISE: f32 = 0.5;

/// Multimeter board with placed probe points.
#[derive(Clone, Debug, PartialEq)]
pub struct MultimeterGame {
    nodes: Vec<Vec2>,
    feedback: MeterFeedback,
}

impl MultimeterGame {
    /// Lays out a board for the payload and prepares the first prompt.
    pub fn new<R: Rng + ?Sized>(payload: &MeterPayload, board: &BoardSize, rng: &mut R) -> Self {
        let nodes = layout_nodes(payload.node_count, board, rng);
        Self {
            nodes,
            feedback: prompt(payload),
        }
    }

    /// Probes a node and advances the payload cursor on a match.
    ///
    /// Returns `None` when the probe is ignored: the board has no targets,
    /// the sequence is already complete, or the node is not on the board.
    pub fn probe<R: Rng + ?Sized>(
        &mut self,
        payload: &mut MeterPayload,
        node: NodeIndex,
        rng: &mut R,
    ) -> Option<MeterFeedback> {
        if node.get() as usize >= self.nodes.len() {
            return None;
        }
        let target = *payload.target()?;

        if node == target.node {
            payload.current_step += 1;
            if payload.target().is_none() {
                self.feedback = MeterFeedback::Complete {
                    voltage: target.voltage,
                };
                return Some(self.feedback);
            }
            self.feedback = prompt(payload);
            return Some(MeterFeedback::Locked {
                voltage: target.voltage,
            });
        }

        let noise = rng.gen_range(-WRONG_NODE_NOISE..=WRONG_NODE_NOISE);
        self.feedback = MeterFeedback::WrongNode {
            reading: target.voltage + noise,
        };
        Some(self.feedback)
    }

    /// Positions of every probe point in board coordinates.
    #[must_use]
    pub fn nodes(&self) -> &[Vec2] {
        &self.nodes
    }

    /// Most recent feedback shown below the board.
    #[must_use]
    pub const fn feedback(&self) -> MeterFeedback {
        self.feedback
    }
}

/// Node the player is currently looking for, highlighted on the board.
#[must_use]
pub fn hot_node(payload: &MeterPayload) -> Option<NodeIndex> {
    payload.target().map(|step| step.node)
}

/// Whether every reading in the sequence was captured.
#[must_use]
pub fn is_solved(payload: &MeterPayload) -> bool {
    !payload.sequence.is_empty() && payload.current_step >= payload.sequence.len()
}

fn prompt(payload: &MeterPayload) -> MeterFeedback {
    match payload.target() {
        Some(step) => MeterFeedback::Prompt {
            step: payload.current_step + 1,
            total: payload.sequence.len(),
            voltage: step.voltage,
        },
        None if payload.sequence.is_empty() => MeterFeedback::NoTargets,
        None => MeterFeedback::Complete {
            voltage: payload.sequence.last().map_or(0.0, |step| step.voltage),
        },
    }
}
