//! Sync module - the multiplayer piece-source and sync-sink capabilities
//!
//! `RemoteQueueSource` replaces local random generation with a FIFO fed
//! by the peer: five requests are issued eagerly at match start, and one
//! request goes out for every piece consumed, so supply and demand stay
//! balanced over the whole match. `ProtocolSink` encodes board and score
//! updates onto the same outbound line channel.

use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::core::grid::Grid;
use crate::core::pieces::GamePiece;
use crate::core::{Game, PieceSource, SyncSink};
use crate::net::protocol::{encode_board, encode_piece_request, encode_score};
use crate::types::PIPELINE_PREFILL;

/// Piece supply fed by a remote peer
pub struct RemoteQueueSource {
    queue: VecDeque<GamePiece>,
    out_tx: mpsc::UnboundedSender<String>,
}

impl RemoteQueueSource {
    pub fn new(out_tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            queue: VecDeque::new(),
            out_tx,
        }
    }

    fn request_piece(&self) {
        let _ = self.out_tx.send(encode_piece_request());
    }
}

impl PieceSource for RemoteQueueSource {
    fn begin_match(&mut self) {
        for _ in 0..PIPELINE_PREFILL {
            self.request_piece();
        }
    }

    fn draw(&mut self) -> Option<GamePiece> {
        self.queue.pop_front()
    }

    fn note_consumed(&mut self) {
        self.request_piece();
    }

    fn store(&mut self, piece: GamePiece) {
        self.queue.push_back(piece);
    }

    fn queued(&self) -> usize {
        self.queue.len()
    }
}

/// Board and score updates encoded onto the wire
pub struct ProtocolSink {
    out_tx: mpsc::UnboundedSender<String>,
}

impl ProtocolSink {
    pub fn new(out_tx: mpsc::UnboundedSender<String>) -> Self {
        Self { out_tx }
    }
}

impl SyncSink for ProtocolSink {
    fn board_changed(&mut self, grid: &Grid) {
        let _ = self.out_tx.send(encode_board(grid));
    }

    fn score_changed(&mut self, score: u32) {
        let _ = self.out_tx.send(encode_score(score));
    }
}

/// A game wired for multiplayer: remote piece supply plus protocol sync,
/// both emitting on the given outbound line channel
pub fn multiplayer_game(cols: usize, rows: usize, out_tx: mpsc::UnboundedSender<String>) -> Game {
    Game::new(
        cols,
        rows,
        Box::new(RemoteQueueSource::new(out_tx.clone())),
        Box::new(ProtocolSink::new(out_tx)),
    )
}
