#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised content generators for the three minigames.
//!
//! Every generator is a pure function of its inputs and the supplied random
//! number generator, so seeding the generator reproduces the exact same code
//! snippets, probe sequences, and board layouts.

use std::f32::consts::TAU;

use ee_dash_core::{
    BoardSize, CodeSnippet, CodingPayload, Difficulty, LevelConfig, LevelId, MeterStep, NodeIndex,
    SnippetLine, WiringPayload,
};
use glam::Vec2;
use rand::{seq::SliceRandom, Rng};
use sha2::{Digest, Sha256};

/// Context lines rendered above the target line.
pub const CONTEXT_LINES_ABOVE: usize = 2;
/// Context lines rendered below the target line.
pub const CONTEXT_LINES_BELOW: usize = 2;
/// File name shown when the file name pool is empty.
pub const FALLBACK_FILE_NAME: &str = "main.c";
/// Placement attempts granted per node before falling back to a circle.
pub const LAYOUT_ATTEMPTS_PER_NODE: usize = 40;

/// Readings the multimeter sequence draws its expected voltages from.
pub const METER_VOLTAGES: [f32; 12] = [
    0.9, 1.2, 1.8, 2.5, 3.3, 5.0, 6.0, 7.4, 9.0, 12.0, 15.0, 24.0,
];

const WIRING_SPEED_PER_DIFFICULTY: f32 = 0.08;
const TARGET_LINE_NUMBERS: std::ops::Range<u32> = 10..60;
const LAYOUT_SPACING_DIVISOR: f32 = 1.6;
const FALLBACK_RADIUS_FRACTION: f32 = 0.4;

const EASY_LINES: [&str; 20] = [
    "if (voltage > 5) ledOn();",
    "const amps = watts / volts;",
    "let checksum = (a + b + c) & 0xff;",
    "pulsePin(13, 200);",
    "status = readPin(7);",
    "counter++;",
    "flag = !flag;",
    "delay(10);",
    "tempC = (tempF - 32) * 5 / 9;",
    "output = input & mask;",
    "enableMotor();",
    "disableInterrupts();",
    "value = adcRead(0);",
    "setPWM(128);",
    "error = false;",
    "timeout = 1000;",
    "buffer.clear();",
    "pinMode(LED, OUTPUT);",
    "writeByte(addr, data);",
    "sync();",
];

const STANDARD_LINES: [&str; 20] = [
    "const avg = readings.reduce((s,v)=>s+v,0)/readings.length;",
    "for (let i = 0; i < wires.length; i++) wires[i] ^= mask;",
    "if (Math.abs(target - probe) < 0.05) calibrate();",
    "while (queue.length > 0) process(queue.shift());",
    "const filtered = samples.filter(v => v > threshold);",
    "state = (state + 1) % STATES;",
    "crc = updateCRC(crc, byte);",
    "for (const key in map) total += map[key];",
    "if (!device.online) reconnect();",
    "buffer[index++] = value;",
    "const slope = (y2 - y1) / (x2 - x1);",
    "retryCount = Math.min(retryCount + 1, MAX_RETRIES);",
    "data = data.map(v => v * scale + offset);",
    "if ((flags & READY) !== 0) start();",
    "for (let t = 0; t < 1; t += step) integrate(t);",
    "payload = serialize(packet);",
    "watchdog.kick();",
    "errorCount += response.ok ? 0 : 1;",
    "if (index >= limit) index = 0;",
    "sort(samples, compareFn);",
];

const HARD_LINES: [&str; 20] = [
    "const gain = (r1 + r2) / Math.max(r1 * r2, 1e-6) * Math.sin(theta);",
    "matrix = matrix.map((row,i)=>row.map((v,j)=>v + kernel[j] * input[i]));",
    "while (time < 1.0) { buffer.push(Math.sin(time * freq) * decay); time += step; }",
    "jacobian[i][j] = partial(f, i, j, epsilon);",
    "state = transition[state][event] ?? ERROR;",
    "fft(real, imag, log2N);",
    "cov = multiply(transpose(A), A);",
    "solution = gaussianElimination(system);",
    "accumulator += error * dt;",
    "phase = (phase + omega * dt) % TAU;",
    "for (let k = 0; k < iterations; k++) refine(estimate);",
    "const eigen = powerIteration(matrix, tol);",
    "output[n] = b0*x[n] + b1*x[n-1] - a1*y[n-1];",
    "if (det(matrix) === 0) throw new SingularMatrix();",
    "simulate(system, t0, t1, h);",
    "prob = Math.exp(-energy / temperature);",
    "cache[line] = fetch(address & ~MASK);",
    "loss += gradient * learningRate;",
    "signal = convolve(input, impulseResponse);",
    "while (!converged) update();",
];

const CONTEXT_ABOVE: [&str; 21] = [
    "function updateVoltage(node) {",
    "const gain = computeGain(node);",
    "let index = 0;",
    "if (!sensor.ready) return;",
    "for (const pin of pins) {",
    "while (index < buffer.length) {",
    "switch(mode) {",
    "void process() {",
    "async function loop() {",
    "if (errorCount > 3) throw new Error(\"panic\");",
    "try {",
    "if (initialized) {",
    "for (let i = 0; i < N; i++) {",
    "while (running) {",
    "if (state === IDLE) {",
    "lock(mutex);",
    "with (context) {",
    "onInterrupt(() => {",
    "def handler(event):",
    "template<typename T>",
    "fn execute() {",
];

const CONTEXT_BELOW: [&str; 21] = [
    "index++;",
    "logReading(node, value);",
    "return value;",
    "setTimeout(loop, 16);",
    "}",
    "break;",
    "renderFrame();",
    "await tick();",
    "printf(\"done\");",
    "shutdown();",
    "} catch (e) {",
    "unlock(mutex);",
    "continue;",
    "return;",
    "emit(event);",
    "yield;",
    "pass;",
    "});",
    "});",
    "end;",
    "}",
];

const FILE_NAMES: [&str; 15] = [
    "main.c",
    "drivers.js",
    "control.lua",
    "system.py",
    "kernel.rs",
    "adc.c",
    "scheduler.cpp",
    "dsp.c",
    "hal.h",
    "bus_driver.asm",
    "interrupts.c",
    "firmware.bin",
    "signal_processing.py",
    "math_utils.rs",
    "io_map.json",
];

/// Pools of lines and file names used to assemble a code snippet.
#[derive(Clone, Copy, Debug)]
pub struct SnippetPools<'a> {
    /// Candidate target lines.
    pub targets: &'a [&'a str],
    /// Candidate lines rendered above the target.
    pub above: &'a [&'a str],
    /// Candidate lines rendered below the target.
    pub below: &'a [&'a str],
    /// Candidate file names.
    pub file_names: &'a [&'a str],
}

impl SnippetPools<'static> {
    /// Built-in pools for the provided level.
    #[must_use]
    pub fn for_level(level: LevelId) -> Self {
        Self {
            targets: target_lines(level),
            above: &CONTEXT_ABOVE,
            below: &CONTEXT_BELOW,
            file_names: &FILE_NAMES,
        }
    }
}

/// Target lines the coding minigame draws from on the provided level.
#[must_use]
pub fn target_lines(level: LevelId) -> &'static [&'static str] {
    match level {
        LevelId::Easy => &EASY_LINES,
        LevelId::Standard => &STANDARD_LINES,
        LevelId::Hard => &HARD_LINES,
    }
}

/// Generates the coding payload for a task on the provided level.
pub fn coding_payload<R: Rng + ?Sized>(level: LevelId, rng: &mut R) -> CodingPayload {
    snippet_from_pools(SnippetPools::for_level(level), rng)
}

/// Assembles a snippet from arbitrary pools.
///
/// Empty pools never fail: a missing target becomes an empty line, missing
/// context lines are skipped, and a missing file name becomes
/// [`FALLBACK_FILE_NAME`].
pub fn snippet_from_pools<R: Rng + ?Sized>(pools: SnippetPools<'_>, rng: &mut R) -> CodingPayload {
    let target_line = pick(pools.targets, rng).unwrap_or_default().to_owned();

    let mut ordered_lines = Vec::with_capacity(CONTEXT_LINES_ABOVE + 1 + CONTEXT_LINES_BELOW);
    for _ in 0..CONTEXT_LINES_ABOVE {
        if let Some(text) = pick(pools.above, rng) {
            ordered_lines.push(context_line(text));
        }
    }
    let above_count = ordered_lines.len() as u32;
    ordered_lines.push(SnippetLine {
        text: target_line.clone(),
        is_target: true,
    });
    for _ in 0..CONTEXT_LINES_BELOW {
        if let Some(text) = pick(pools.below, rng) {
            ordered_lines.push(context_line(text));
        }
    }

    let target_number = rng.gen_range(TARGET_LINE_NUMBERS);
    let start_line_number = target_number.saturating_sub(above_count).max(1);
    let file_name = pick(pools.file_names, rng)
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_owned();

    CodingPayload {
        target_line,
        snippet: CodeSnippet {
            file_name,
            start_line_number,
            ordered_lines,
        },
    }
}

fn context_line(text: &str) -> SnippetLine {
    SnippetLine {
        text: text.to_owned(),
        is_target: false,
    }
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> Option<&'a str> {
    pool.choose(rng).copied()
}

/// Derives wiring gauge parameters from the level and current difficulty.
///
/// Every second difficulty step adds a strike, and every step past the first
/// adds `0.08` gauge widths per second to the oscillator.
#[must_use]
pub fn wiring_payload(level: &LevelConfig, difficulty: Difficulty) -> WiringPayload {
    let steps = difficulty.get();
    let extra_speed = (steps.saturating_sub(1)) as f32 * WIRING_SPEED_PER_DIFFICULTY;
    WiringPayload {
        required_hits: level.wiring_hits + steps / 2,
        oscillator_speed: level.wiring_speed + extra_speed.max(0.0),
    }
}

/// Builds an ordered probe sequence over distinct nodes.
///
/// The sequence length is capped at `node_count`.
pub fn meter_sequence<R: Rng + ?Sized>(
    node_count: u32,
    sequence_length: u32,
    rng: &mut R,
) -> Vec<MeterStep> {
    let mut indices: Vec<u32> = (0..node_count).collect();
    indices.shuffle(rng);

    let length = sequence_length.min(node_count) as usize;
    indices
        .into_iter()
        .take(length)
        .map(|node| MeterStep {
            node: NodeIndex::new(node),
            voltage: METER_VOLTAGES[rng.gen_range(0..METER_VOLTAGES.len())],
        })
        .collect()
}

/// Places `node_count` probe points on the board with a minimum pairwise spacing.
pub fn layout_nodes<R: Rng + ?Sized>(node_count: u32, board: &BoardSize, rng: &mut R) -> Vec<Vec2> {
    let attempts = node_count as usize * LAYOUT_ATTEMPTS_PER_NODE;
    layout_nodes_with_budget(node_count, board, attempts, rng)
}

/// Rejection-samples node positions within `attempts` draws.
///
/// Nodes that could not be placed in time are laid out on a circle centred in
/// the usable area, continuing from the angle slot of the first missing node.
pub fn layout_nodes_with_budget<R: Rng + ?Sized>(
    node_count: u32,
    board: &BoardSize,
    attempts: usize,
    rng: &mut R,
) -> Vec<Vec2> {
    let count = node_count as usize;
    let usable_width = board.usable_width();
    let usable_height = board.usable_height();
    let shorter_side = usable_width.min(usable_height);
    let min_spacing = shorter_side / ((count as f32).sqrt() * LAYOUT_SPACING_DIVISOR).max(1.0);
    let origin = Vec2::new(board.padding_x, board.padding_y);

    let mut nodes: Vec<Vec2> = Vec::with_capacity(count);
    let mut used = 0;
    while nodes.len() < count && used < attempts {
        used += 1;
        let offset = Vec2::new(
            rng.gen::<f32>() * usable_width,
            rng.gen::<f32>() * usable_height,
        );
        let candidate = origin + offset;
        if nodes.iter().all(|node| node.distance(candidate) >= min_spacing) {
            nodes.push(candidate);
        }
    }

    let centre = origin + Vec2::new(usable_width, usable_height) * 0.5;
    let radius = shorter_side * FALLBACK_RADIUS_FRACTION;
    while nodes.len() < count {
        let angle = nodes.len() as f32 / count as f32 * TAU;
        nodes.push(centre + Vec2::new(angle.cos(), angle.sin()) * radius);
    }

    nodes
}

/// Derives an independent seed from a base seed, a stream label and an index.
#[must_use]
pub fn derive_seed(base: u64, label: &str, index: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    hasher.update(index.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn every_level_has_a_full_target_pool() {
        for level in LevelId::ALL {
            assert_eq!(target_lines(level).len(), 20);
        }
    }

    #[test]
    fn wiring_scaling_adds_hits_every_second_difficulty() {
        let easy = LevelConfig::canonical(LevelId::Easy);
        assert_eq!(wiring_payload(&easy, Difficulty::new(1)).required_hits, 3);
        assert_eq!(wiring_payload(&easy, Difficulty::new(2)).required_hits, 4);
        assert_eq!(wiring_payload(&easy, Difficulty::new(5)).required_hits, 5);

        let speed = wiring_payload(&easy, Difficulty::new(3)).oscillator_speed;
        assert!((speed - 0.76).abs() < 1e-5);
    }

    #[test]
    fn derived_seeds_depend_on_every_input() {
        let seed = derive_seed(7, "session", 1);
        assert_eq!(seed, derive_seed(7, "session", 1));
        assert_ne!(seed, derive_seed(8, "session", 1));
        assert_ne!(seed, derive_seed(7, "noise", 1));
        assert_ne!(seed, derive_seed(7, "session", 2));
    }

    #[test]
    fn empty_pools_fall_back_to_defaults() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pools = SnippetPools {
            targets: &[],
            above: &[],
            below: &[],
            file_names: &[],
        };
        let payload = snippet_from_pools(pools, &mut rng);
        assert_eq!(payload.target_line, "");
        assert_eq!(payload.snippet.file_name, FALLBACK_FILE_NAME);
        assert_eq!(payload.snippet.ordered_lines.len(), 1);
        assert!(payload.snippet.ordered_lines[0].is_target);
    }
}
