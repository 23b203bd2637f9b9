use ee_dash_core::CodingFeedback;
use ee_dash_system_coding::CodingGame;

#[test]
fn empty_input_clears_feedback_without_error() {
    let mut game = CodingGame::new("counter++;");
    assert_eq!(game.input_changed("coun"), CodingFeedback::OnTrack);
    assert_eq!(game.input_changed(""), CodingFeedback::Cleared);
    assert!(!game.has_error());
    assert_eq!(game.feedback().message(), "");
}

#[test]
fn strict_prefix_is_on_track() {
    let mut game = CodingGame::new("delay(10);");
    for end in 1..game.target().len() {
        let prefix = "delay(10);"[..end].to_owned();
        assert_eq!(game.input_changed(&prefix), CodingFeedback::OnTrack);
        assert!(!game.has_error());
        assert!(!game.is_solved());
    }
}

#[test]
fn divergent_input_flags_error_and_recovers() {
    let mut game = CodingGame::new("flag = !flag;");
    assert_eq!(game.input_changed("flag = ?"), CodingFeedback::Mismatch);
    assert!(game.has_error());
    assert_eq!(game.matched_prefix(), 7);

    assert_eq!(game.input_changed("flag = !"), CodingFeedback::OnTrack);
    assert!(!game.has_error());
}

#[test]
fn overlong_input_is_a_mismatch() {
    let mut game = CodingGame::new("sync();");
    assert_eq!(game.input_changed("sync();;"), CodingFeedback::Mismatch);
}

#[test]
fn exact_match_solves() {
    let mut game = CodingGame::new("error = false;");
    assert_eq!(game.input_changed("error = false;"), CodingFeedback::Correct);
    assert!(game.is_solved());
    assert_eq!(game.feedback().message(), "Correct!");
}

#[test]
fn pasted_newlines_are_graded_as_spaces() {
    let mut game = CodingGame::new("if (voltage > 5) ledOn();");
    assert_eq!(
        game.input_changed("if (voltage > 5)\r\nledOn();"),
        CodingFeedback::Correct
    );
    assert_eq!(game.input(), "if (voltage > 5) ledOn();");
}
