//! Engine runtime tests - serialized command/expiry handling
//!
//! Time is paused so the countdown is deterministic: the runtime's
//! sleep-based timers fire under auto-advance without real waiting.

use std::time::Duration;

use quintris::core::Game;
use quintris::engine::GameRuntime;
use tokio::sync::mpsc;
use tokio_test::assert_ok;

#[tokio::test(start_paused = true)]
async fn placement_rearms_the_countdown() {
    let mut game = Game::single_player_seeded(5, 5, 42);
    let (delay_tx, mut delay_rx) = mpsc::unbounded_channel();
    game.set_on_turn_delay(move |delay| {
        let _ = delay_tx.send(delay);
    });

    let (runtime, handle) = GameRuntime::new(game);
    let task = tokio::spawn(runtime.run());

    // Arm at match start.
    assert_eq!(delay_rx.recv().await.unwrap(), Duration::from_millis(12_000));

    // A successful center placement cancels and re-arms.
    handle.place(2, 2);
    assert_eq!(delay_rx.recv().await.unwrap(), Duration::from_millis(12_000));

    handle.end();
    let game = tokio_test::assert_ok!(task.await);
    assert_eq!(game.lives(), 3);
    assert!(!game.is_over());
}

#[tokio::test(start_paused = true)]
async fn an_expired_turn_costs_a_life_and_rearms() {
    let mut game = Game::single_player_seeded(5, 5, 7);
    let (delay_tx, mut delay_rx) = mpsc::unbounded_channel();
    game.set_on_turn_delay(move |delay| {
        let _ = delay_tx.send(delay);
    });

    let (runtime, handle) = GameRuntime::new(game);
    let task = tokio::spawn(runtime.run());

    // Initial arm, then the re-arm after the first expiry.
    delay_rx.recv().await.unwrap();
    delay_rx.recv().await.unwrap();

    handle.end();
    let game = tokio_test::assert_ok!(task.await);
    assert_eq!(game.lives(), 2);
    assert_eq!(game.multiplier(), 1);
}

#[tokio::test(start_paused = true)]
async fn four_misses_end_the_match() {
    let mut game = Game::single_player_seeded(5, 5, 99);
    let (end_tx, mut end_rx) = mpsc::unbounded_channel();
    game.set_on_match_ended(move |summary| {
        let _ = end_tx.send(summary);
    });

    let (runtime, _handle) = GameRuntime::new(game);
    let task = tokio::spawn(runtime.run());

    let summary = end_rx.recv().await.unwrap();
    assert_eq!(summary.lives, 0);

    let game = tokio_test::assert_ok!(task.await);
    assert!(game.is_over());
}

#[tokio::test(start_paused = true)]
async fn commands_mutate_between_timer_events() {
    let mut game = Game::single_player_seeded(5, 5, 5);
    let (piece_tx, mut piece_rx) = mpsc::unbounded_channel();
    game.set_on_next_piece(move |current, following| {
        let _ = piece_tx.send((current.type_id(), following.type_id()));
    });

    let (runtime, handle) = GameRuntime::new(game);
    let task = tokio::spawn(runtime.run());

    // Event from match start.
    let first = piece_rx.recv().await.unwrap();

    handle.swap(); // following/current exchanged
    handle.place(2, 2); // one advance, one more event

    let second = piece_rx.recv().await.unwrap();
    // The placed piece was the pre-swap following piece.
    assert_eq!(second.0, first.0);

    handle.end();
    let game = tokio_test::assert_ok!(task.await);
    // Exactly one piece landed; nothing can clear from a single placement.
    assert!(game.grid().cells().iter().any(|&v| v != 0));
    assert_eq!(game.score(), 0);
}
