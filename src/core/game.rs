//! Game module - placement, line clearing, scoring and the piece pipeline
//!
//! A `Game` owns the grid plus the current/following piece pair and the
//! score/level/lives/multiplier state. Where the pieces come from and
//! where board/score updates go is pluggable: a `PieceSource` supplies
//! pieces (local random draw, or a queue fed by a remote peer) and a
//! `SyncSink` receives state snapshots (discarded, or encoded onto the
//! wire). Both are chosen at construction, so single-player and
//! multiplayer share one engine.
//!
//! All methods must be called from a single context; the async runtime
//! in `crate::engine` provides that serialization.

use std::collections::HashSet;
use std::time::Duration;

use crate::core::grid::Grid;
use crate::core::pieces::GamePiece;
use crate::core::rng::SimpleRng;
use crate::core::scoring::{level_for_score, score_delta, turn_delay};
use crate::types::{
    AdvanceOutcome, BlockCoordinate, GameSummary, TurnExpiry, EMPTY_CELL, INITIAL_LIVES,
    INITIAL_MULTIPLIER, PIECE_KINDS,
};

/// Where pieces come from
pub trait PieceSource: Send {
    /// Called once at match start (a remote source pre-fills its
    /// request pipeline here)
    fn begin_match(&mut self) {}

    /// Take the next piece if one is available right now
    fn draw(&mut self) -> Option<GamePiece>;

    /// Called once per piece consumed from the supply, to keep supply
    /// and demand balanced
    fn note_consumed(&mut self) {}

    /// Hand a piece delivered by the peer to the source's queue
    fn store(&mut self, _piece: GamePiece) {}

    /// Pieces currently queued and not yet drawn
    fn queued(&self) -> usize {
        0
    }
}

/// Where board and score updates go
pub trait SyncSink: Send {
    fn board_changed(&mut self, _grid: &Grid) {}
    fn score_changed(&mut self, _score: u32) {}
}

/// Sink for single-player games: updates stay local
pub struct NoSync;

impl SyncSink for NoSync {}

/// Uniform random draw over the 15 catalog types, rotation 0
pub struct LocalPieceSource {
    rng: SimpleRng,
}

impl LocalPieceSource {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn from_time() -> Self {
        Self {
            rng: SimpleRng::from_time(),
        }
    }
}

impl PieceSource for LocalPieceSource {
    fn draw(&mut self) -> Option<GamePiece> {
        let type_id = self.rng.next_range(PIECE_KINDS as u32) as u8;
        Some(GamePiece::from_type(type_id).expect("draw stays inside the catalog"))
    }
}

pub type NextPieceCallback = Box<dyn FnMut(GamePiece, GamePiece) + Send>;
pub type LineClearedCallback = Box<dyn FnMut(&HashSet<BlockCoordinate>) + Send>;
pub type LevelChangedCallback = Box<dyn FnMut(u32) + Send>;
pub type TurnDelayCallback = Box<dyn FnMut(Duration) + Send>;
pub type MatchEndedCallback = Box<dyn FnMut(GameSummary) + Send>;

/// The game engine
pub struct Game {
    grid: Grid,
    current_piece: Option<GamePiece>,
    following_piece: Option<GamePiece>,
    score: u32,
    level: u32,
    lives: u32,
    multiplier: u32,
    over: bool,
    /// Set when an advance found the supply queue empty; the next
    /// delivered piece completes that advance
    advance_stalled: bool,
    piece_source: Box<dyn PieceSource>,
    sync: Box<dyn SyncSink>,
    on_next_piece: Option<NextPieceCallback>,
    on_line_cleared: Option<LineClearedCallback>,
    on_level_changed: Option<LevelChangedCallback>,
    on_turn_delay: Option<TurnDelayCallback>,
    on_match_ended: Option<MatchEndedCallback>,
}

impl Game {
    /// Create a game with explicit piece-source and sync-sink capabilities
    pub fn new(
        cols: usize,
        rows: usize,
        piece_source: Box<dyn PieceSource>,
        sync: Box<dyn SyncSink>,
    ) -> Self {
        Self {
            grid: Grid::new(cols, rows),
            current_piece: None,
            following_piece: None,
            score: 0,
            level: 0,
            lives: INITIAL_LIVES,
            multiplier: INITIAL_MULTIPLIER,
            over: false,
            advance_stalled: false,
            piece_source,
            sync,
            on_next_piece: None,
            on_line_cleared: None,
            on_level_changed: None,
            on_turn_delay: None,
            on_match_ended: None,
        }
    }

    /// Single-player game with a wall-clock-seeded piece stream
    pub fn single_player(cols: usize, rows: usize) -> Self {
        Self::new(cols, rows, Box::new(LocalPieceSource::from_time()), Box::new(NoSync))
    }

    /// Single-player game with a reproducible piece stream
    pub fn single_player_seeded(cols: usize, rows: usize, seed: u32) -> Self {
        Self::new(cols, rows, Box::new(LocalPieceSource::new(seed)), Box::new(NoSync))
    }

    pub fn set_on_next_piece(&mut self, cb: impl FnMut(GamePiece, GamePiece) + Send + 'static) {
        self.on_next_piece = Some(Box::new(cb));
    }

    pub fn set_on_line_cleared(
        &mut self,
        cb: impl FnMut(&HashSet<BlockCoordinate>) + Send + 'static,
    ) {
        self.on_line_cleared = Some(Box::new(cb));
    }

    pub fn set_on_level_changed(&mut self, cb: impl FnMut(u32) + Send + 'static) {
        self.on_level_changed = Some(Box::new(cb));
    }

    pub fn set_on_turn_delay(&mut self, cb: impl FnMut(Duration) + Send + 'static) {
        self.on_turn_delay = Some(Box::new(cb));
    }

    pub fn set_on_match_ended(&mut self, cb: impl FnMut(GameSummary) + Send + 'static) {
        self.on_match_ended = Some(Box::new(cb));
    }

    /// Start the match: let the source pre-fill its pipeline and, when a
    /// piece is immediately available, bring up the current/following
    /// pair. A remote source has nothing to draw yet; its pieces arrive
    /// through `deliver_piece`.
    pub fn start(&mut self) {
        self.piece_source.begin_match();
        if let Some(piece) = self.piece_source.draw() {
            self.following_piece = Some(piece);
            let _ = self.advance();
        }
    }

    /// Try to place the current piece with its pattern center at (x, y).
    /// On success the piece is played, the pipeline advances, and the
    /// line-clear pass runs. On failure nothing changes.
    pub fn attempt_placement(&mut self, x: i32, y: i32) -> bool {
        if self.over {
            return false;
        }
        let Some(current) = self.current_piece else {
            return false;
        };
        if !self.grid.can_place_piece(&current, x, y) {
            return false;
        }
        self.grid.play_piece(&current, x, y);
        let _ = self.advance();
        self.after_piece();
        true
    }

    /// Promote the following piece and draw a replacement
    pub fn advance(&mut self) -> AdvanceOutcome {
        self.current_piece = self.following_piece.take();
        match self.piece_source.draw() {
            Some(piece) => {
                self.following_piece = Some(piece);
                self.piece_source.note_consumed();
                self.emit_next_piece();
                AdvanceOutcome::Advanced
            }
            None => {
                self.advance_stalled = true;
                AdvanceOutcome::Stalled
            }
        }
    }

    /// Accept a piece delivered by the peer. The first two pieces of a
    /// multiplayer match bring up the current/following pair; later
    /// pieces refill the queue. A piece that completes a stalled advance
    /// counts as consumed and triggers a replacement request.
    pub fn deliver_piece(&mut self, piece: GamePiece) {
        if self.current_piece.is_none() {
            self.current_piece = Some(piece);
            self.settle_stall();
        } else if self.following_piece.is_none() {
            self.following_piece = Some(piece);
            self.settle_stall();
            self.emit_next_piece();
        } else {
            self.piece_source.store(piece);
        }
    }

    fn settle_stall(&mut self) {
        if !self.advance_stalled {
            return;
        }
        self.piece_source.note_consumed();
        if self.current_piece.is_some() && self.following_piece.is_some() {
            self.advance_stalled = false;
        }
    }

    /// Line-clear pass, run once after every successful placement
    fn after_piece(&mut self) {
        let cols = self.grid.cols() as i32;
        let rows = self.grid.rows() as i32;

        let mut lines = 0u32;
        let mut to_clear: HashSet<BlockCoordinate> = HashSet::new();

        for x in 0..cols {
            if self.grid.is_column_full(x) {
                lines += 1;
                for y in 0..rows {
                    to_clear.insert(BlockCoordinate::new(x, y));
                }
            }
        }
        for y in 0..rows {
            if self.grid.is_row_full(y) {
                lines += 1;
                for x in 0..cols {
                    to_clear.insert(BlockCoordinate::new(x, y));
                }
            }
        }

        if !to_clear.is_empty() {
            for block in &to_clear {
                self.grid.set(block.x, block.y, EMPTY_CELL);
            }
            self.apply_score(lines, to_clear.len() as u32);
            self.multiplier += 1;
            if let Some(cb) = self.on_line_cleared.as_mut() {
                cb(&to_clear);
            }
        } else {
            self.multiplier = INITIAL_MULTIPLIER;
        }

        self.sync.board_changed(&self.grid);
    }

    fn apply_score(&mut self, lines: u32, blocks: u32) {
        self.score += score_delta(lines, blocks, self.multiplier);
        self.sync.score_changed(self.score);
        let level = level_for_score(self.score);
        if level != self.level {
            self.level = level;
            if let Some(cb) = self.on_level_changed.as_mut() {
                cb(level);
            }
        }
    }

    /// The turn countdown ran out: the current piece is forfeited.
    /// The game-over check runs before the decrement, so a match
    /// survives three misses and ends on the fourth.
    pub fn on_turn_expired(&mut self) -> TurnExpiry {
        let _ = self.advance();
        if self.lives == 0 {
            self.over = true;
            let summary = self.summary();
            if let Some(cb) = self.on_match_ended.as_mut() {
                cb(summary);
            }
            TurnExpiry::GameOver
        } else {
            self.lives -= 1;
            self.multiplier = INITIAL_MULTIPLIER;
            TurnExpiry::LifeLost
        }
    }

    /// Rotate the current piece a quarter turn clockwise
    pub fn rotate_current(&mut self) {
        if let Some(piece) = self.current_piece {
            self.current_piece = Some(piece.rotated());
        }
    }

    /// Exchange the current and following pieces
    pub fn swap_pieces(&mut self) {
        std::mem::swap(&mut self.current_piece, &mut self.following_piece);
    }

    /// Countdown duration for the next turn at the current level
    pub fn turn_delay(&self) -> Duration {
        turn_delay(self.level)
    }

    /// Announce the delay for a freshly armed turn
    pub fn notify_turn_delay(&mut self, delay: Duration) {
        if let Some(cb) = self.on_turn_delay.as_mut() {
            cb(delay);
        }
    }

    fn emit_next_piece(&mut self) {
        if let (Some(current), Some(following)) = (self.current_piece, self.following_piece) {
            if let Some(cb) = self.on_next_piece.as_mut() {
                cb(current, following);
            }
        }
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            level: self.level,
            lives: self.lives,
            multiplier: self.multiplier,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> Option<GamePiece> {
        self.current_piece
    }

    pub fn following_piece(&self) -> Option<GamePiece> {
        self.following_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_advance_stalled(&self) -> bool {
        self.advance_stalled
    }

    /// Pieces queued in the source and not yet drawn
    pub fn queued_pieces(&self) -> usize {
        self.piece_source.queued()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_brings_up_both_pieces() {
        let mut game = Game::single_player_seeded(5, 5, 1);
        game.start();
        assert!(game.current_piece().is_some());
        assert!(game.following_piece().is_some());
    }

    #[test]
    fn center_placement_always_fits_on_empty_board() {
        let mut game = Game::single_player_seeded(5, 5, 1);
        game.start();
        assert!(game.attempt_placement(2, 2));
    }

    #[test]
    fn failed_placement_changes_nothing() {
        let mut game = Game::single_player_seeded(5, 5, 1);
        game.start();
        let before = game.current_piece();
        assert!(!game.attempt_placement(-5, -5));
        assert_eq!(game.current_piece(), before);
        assert_eq!(game.score(), 0);
        assert!(game.grid().cells().iter().all(|&v| v == 0));
    }

    #[test]
    fn swap_exchanges_the_pair() {
        let mut game = Game::single_player_seeded(5, 5, 9);
        game.start();
        let (a, b) = (game.current_piece(), game.following_piece());
        game.swap_pieces();
        assert_eq!(game.current_piece(), b);
        assert_eq!(game.following_piece(), a);
    }

    #[test]
    fn rotate_current_is_order_four() {
        let mut game = Game::single_player_seeded(5, 5, 3);
        game.start();
        let before = game.current_piece();
        for _ in 0..4 {
            game.rotate_current();
        }
        assert_eq!(game.current_piece(), before);
    }

    #[test]
    fn crossing_column_and_row_clear_nine_cells_as_two_lines() {
        let mut game = Game::single_player_seeded(5, 5, 1);
        game.start();

        // Column 2 and row 2 filled except their shared cell (2, 2).
        for y in 0..5 {
            if y != 2 {
                game.grid.set(2, y, 1);
            }
        }
        for x in 0..5 {
            if x != 2 {
                game.grid.set(x, 2, 1);
            }
        }

        let (tx, rx) = std::sync::mpsc::channel();
        game.set_on_line_cleared(move |blocks| {
            let _ = tx.send(blocks.len());
        });

        // Complete both lines with a single dot.
        game.current_piece = Some(GamePiece::from_type(0).expect("dot exists"));
        assert!(game.attempt_placement(2, 2));

        // 5 + 5 - 1 distinct cells over two lines: 2 x 9 x 10 x 1.
        assert_eq!(rx.try_recv().unwrap(), 9);
        assert_eq!(game.score(), 180);
        assert_eq!(game.multiplier(), 2);
        assert!(game.grid.cells().iter().all(|&v| v == 0));
    }

    #[test]
    fn crossing_the_thousand_mark_signals_a_level_change() {
        let mut game = Game::single_player_seeded(5, 5, 1);
        game.start();
        for x in 0..5 {
            game.grid.set(x, 2, 1);
        }
        game.grid.set(2, 2, 0);
        // 1 line x 5 cells x 10 x 25 = 1250 points.
        game.multiplier = 25;

        let (tx, rx) = std::sync::mpsc::channel();
        game.set_on_level_changed(move |level| {
            let _ = tx.send(level);
        });

        game.current_piece = Some(GamePiece::from_type(0).expect("dot exists"));
        assert!(game.attempt_placement(2, 2));

        assert_eq!(game.score(), 1250);
        assert_eq!(game.level(), 1);
        assert_eq!(rx.try_recv().unwrap(), 1);
        assert_eq!(game.turn_delay().as_millis(), 11_500);
    }
}
