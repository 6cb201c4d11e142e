//! Protocol module - the newline-delimited text commands
//!
//! Four commands travel over a persistent peer connection:
//!
//! | direction | line                        | meaning                    |
//! |-----------|-----------------------------|----------------------------|
//! | out       | `PIECE`                     | request the next piece     |
//! | out       | `BOARD <v0> ... <v(n-1)>`   | full grid, column-major    |
//! | out       | `SCORE <int>`               | running score              |
//! | in        | `PIECE <int>`               | type id of the next piece  |
//!
//! Dispatch is on the first whitespace-delimited token only, so a line
//! that merely contains a command word somewhere in its payload is never
//! misrouted. Malformed or unrecognized lines parse to `None` and are
//! ignored by every consumer.

use crate::core::grid::Grid;
use crate::types::{MAX_CELL_VALUE, PIECE_KINDS};

pub const PIECE_TAG: &str = "PIECE";
pub const BOARD_TAG: &str = "BOARD";
pub const SCORE_TAG: &str = "SCORE";

/// One decoded wire line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireCommand {
    /// `PIECE` with no payload: the peer asks for a piece
    PieceRequest,
    /// `PIECE <n>`: a piece assignment to enqueue
    PieceAssign(u8),
    /// `BOARD <v0> ...`: a full board snapshot, column-major
    Board(Vec<u8>),
    /// `SCORE <n>`: a running score update
    Score(u32),
}

impl WireCommand {
    /// Decode one line. Returns None for anything that is not a
    /// well-formed command.
    pub fn parse(line: &str) -> Option<WireCommand> {
        let mut tokens = line.split_whitespace();
        match tokens.next()? {
            PIECE_TAG => match tokens.next() {
                None => Some(WireCommand::PieceRequest),
                Some(value) => {
                    if tokens.next().is_some() {
                        return None;
                    }
                    let type_id: u8 = value.parse().ok()?;
                    (type_id < PIECE_KINDS).then_some(WireCommand::PieceAssign(type_id))
                }
            },
            BOARD_TAG => {
                let mut values = Vec::new();
                for token in tokens {
                    let value: u8 = token.parse().ok()?;
                    if value > MAX_CELL_VALUE {
                        return None;
                    }
                    values.push(value);
                }
                if values.is_empty() {
                    return None;
                }
                Some(WireCommand::Board(values))
            }
            SCORE_TAG => {
                let value: u32 = tokens.next()?.parse().ok()?;
                if tokens.next().is_some() {
                    return None;
                }
                Some(WireCommand::Score(value))
            }
            _ => None,
        }
    }

    /// Encode back to one wire line (without the trailing newline)
    pub fn encode(&self) -> String {
        match self {
            WireCommand::PieceRequest => PIECE_TAG.to_string(),
            WireCommand::PieceAssign(type_id) => format!("{} {}", PIECE_TAG, type_id),
            WireCommand::Board(values) => {
                let mut line = String::from(BOARD_TAG);
                for value in values {
                    line.push(' ');
                    line.push_str(&value.to_string());
                }
                line
            }
            WireCommand::Score(score) => format!("{} {}", SCORE_TAG, score),
        }
    }
}

/// Serialize a grid as a board-snapshot line, column-major
pub fn encode_board(grid: &Grid) -> String {
    let mut values = Vec::with_capacity(grid.cols() * grid.rows());
    for x in 0..grid.cols() as i32 {
        for y in 0..grid.rows() as i32 {
            values.push(grid.get(x, y).unwrap_or_default());
        }
    }
    WireCommand::Board(values).encode()
}

pub fn encode_score(score: u32) -> String {
    WireCommand::Score(score).encode()
}

pub fn encode_piece_request() -> String {
    WireCommand::PieceRequest.encode()
}

pub fn encode_piece_assign(type_id: u8) -> String {
    WireCommand::PieceAssign(type_id).encode()
}
