use ee_dash_core::{BoardSize, MeterFeedback, MeterPayload, MeterStep, NodeIndex};
use ee_dash_system_multimeter::{hot_node, is_solved, MultimeterGame};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn payload(steps: &[(u32, f32)]) -> MeterPayload {
    MeterPayload {
        node_count: 18,
        sequence: steps
            .iter()
            .map(|&(node, voltage)| MeterStep {
                node: NodeIndex::new(node),
                voltage,
            })
            .collect(),
        current_step: 0,
    }
}

#[test]
fn board_opens_with_first_prompt() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let payload = payload(&[(4, 3.3), (9, 12.0)]);
    let game = MultimeterGame::new(&payload, &BoardSize::default(), &mut rng);

    assert_eq!(game.nodes().len(), 18);
    assert_eq!(game.feedback().message(), "Probe 1/2: Find node at 3.3V");
    assert_eq!(hot_node(&payload), Some(NodeIndex::new(4)));
}

#[test]
fn empty_sequence_reports_no_targets_and_ignores_probes() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut payload = payload(&[]);
    let mut game = MultimeterGame::new(&payload, &BoardSize::default(), &mut rng);

    assert_eq!(game.feedback(), MeterFeedback::NoTargets);
    assert_eq!(game.probe(&mut payload, NodeIndex::new(0), &mut rng), None);
    assert!(!is_solved(&payload));
}

#[test]
fn wrong_node_reading_stays_within_noise_band() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut payload = payload(&[(4, 5.0)]);
    let mut game = MultimeterGame::new(&payload, &BoardSize::default(), &mut rng);

    for _ in 0..200 {
        match game.probe(&mut payload, NodeIndex::new(5), &mut rng) {
            Some(MeterFeedback::WrongNode { reading }) => {
                assert!((4.5..=5.5).contains(&reading), "reading {reading}");
            }
            other => panic!("unexpected feedback {other:?}"),
        }
    }
    assert_eq!(payload.current_step, 0);
}

#[test]
fn matching_probes_advance_until_complete() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut payload = payload(&[(4, 3.3), (9, 12.0)]);
    let mut game = MultimeterGame::new(&payload, &BoardSize::default(), &mut rng);

    assert_eq!(
        game.probe(&mut payload, NodeIndex::new(4), &mut rng),
        Some(MeterFeedback::Locked { voltage: 3.3 })
    );
    assert_eq!(payload.current_step, 1);
    assert_eq!(game.feedback().message(), "Probe 2/2: Find node at 12.0V");
    assert_eq!(hot_node(&payload), Some(NodeIndex::new(9)));

    assert_eq!(
        game.probe(&mut payload, NodeIndex::new(9), &mut rng),
        Some(MeterFeedback::Complete { voltage: 12.0 })
    );
    assert!(is_solved(&payload));
    assert_eq!(hot_node(&payload), None);
    assert_eq!(game.probe(&mut payload, NodeIndex::new(9), &mut rng), None);
}

#[test]
fn probes_off_the_board_are_ignored() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut payload = payload(&[(4, 3.3)]);
    let mut game = MultimeterGame::new(&payload, &BoardSize::default(), &mut rng);

    assert_eq!(game.probe(&mut payload, NodeIndex::new(18), &mut rng), None);
    assert_eq!(payload.current_step, 0);
}
