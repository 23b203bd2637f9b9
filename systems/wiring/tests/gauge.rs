use std::time::Duration;

use ee_dash_core::{WiringFeedback, WiringPayload};
use ee_dash_system_wiring::{Direction, WiringGame};

fn game(required_hits: u32, speed: f32) -> WiringGame {
    WiringGame::new(WiringPayload {
        required_hits,
        oscillator_speed: speed,
    })
}

/// Advances a fresh gauge until the indicator reaches the middle.
fn park_in_green(game: &mut WiringGame) {
    while game.position() < 0.5 {
        game.advance(Duration::from_millis(10));
    }
}

#[test]
fn opens_with_instructions() {
    let game = game(4, 1.0);
    assert_eq!(game.position(), 0.0);
    assert_eq!(game.direction(), Direction::Forward);
    assert_eq!(
        game.feedback().message(),
        "Hit space in the green zone 4 times."
    );
}

#[test]
fn indicator_reflects_off_both_ends() {
    let mut game = game(3, 1.0);

    game.advance(Duration::from_millis(1_200));
    assert_eq!(game.position(), 1.0);
    assert_eq!(game.direction(), Direction::Backward);

    game.advance(Duration::from_millis(400));
    assert!((game.position() - 0.6).abs() < 1e-5);

    game.advance(Duration::from_millis(900));
    assert_eq!(game.position(), 0.0);
    assert_eq!(game.direction(), Direction::Forward);
}

#[test]
fn position_never_leaves_unit_interval() {
    let mut game = game(3, 2.3);
    for frame in 0..1_000 {
        game.advance(Duration::from_millis(7 + frame % 40));
        assert!((0.0..=1.0).contains(&game.position()));
    }
}

#[test]
fn strike_outside_zone_misses_without_losing_hits() {
    let mut game = game(3, 1.0);
    game.advance(Duration::from_millis(500));
    assert_eq!(game.strike(), WiringFeedback::Hit { remaining: 2 });

    game.advance(Duration::from_millis(300));
    assert_eq!(game.strike(), WiringFeedback::Miss);
    assert_eq!(game.hits(), 1);
    assert_eq!(
        game.feedback().message(),
        "Miss! Hit space only in the green zone."
    );
}

#[test]
fn final_strike_completes() {
    let mut game = game(2, 1.0);
    park_in_green(&mut game);
    assert_eq!(game.strike(), WiringFeedback::Hit { remaining: 1 });
    assert!(!game.is_solved());
    assert_eq!(game.strike(), WiringFeedback::Complete);
    assert!(game.is_solved());
}
