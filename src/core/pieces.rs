//! Pieces module - the 15-piece catalog and pattern rotation
//!
//! Every piece renders as a 3x3 occupancy pattern with a single colour
//! index (`type_id + 1`) applied to each filled cell. Rotation is a pure
//! function of `(type_id, rotation)`; four quarter turns return the
//! original pattern.

use arrayvec::ArrayVec;

use crate::types::{PATTERN_SIZE, PIECE_KINDS};

/// 3x3 occupancy pattern, row-major (`pattern[y][x]`)
pub type PiecePattern = [[bool; PATTERN_SIZE]; PATTERN_SIZE];

/// An immutable piece identity: catalog type plus quarter-turn rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GamePiece {
    type_id: u8,
    rotation: u8,
}

impl GamePiece {
    /// Create a piece with rotation 0.
    /// Returns None when `type_id` is outside the catalog.
    pub fn from_type(type_id: u8) -> Option<Self> {
        if type_id < PIECE_KINDS {
            Some(Self { type_id, rotation: 0 })
        } else {
            None
        }
    }

    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    /// Quarter turns clockwise applied on top of the base pattern
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Colour index written into every grid cell this piece covers
    pub fn colour_index(&self) -> u8 {
        self.type_id + 1
    }

    pub fn name(&self) -> &'static str {
        piece_name(self.type_id)
    }

    /// The same piece turned one quarter clockwise
    pub fn rotated(&self) -> Self {
        Self {
            type_id: self.type_id,
            rotation: (self.rotation + 1) % 4,
        }
    }

    /// Occupancy pattern for this piece's current rotation
    pub fn pattern(&self) -> PiecePattern {
        let mut pattern = base_pattern(self.type_id);
        for _ in 0..self.rotation {
            pattern = rotate_cw(pattern);
        }
        pattern
    }

    /// Offsets of the filled cells relative to the pattern center
    pub fn blocks(&self) -> ArrayVec<(i32, i32), 9> {
        let pattern = self.pattern();
        let mut blocks = ArrayVec::new();
        for (y, row) in pattern.iter().enumerate() {
            for (x, filled) in row.iter().enumerate() {
                if *filled {
                    blocks.push((x as i32 - 1, y as i32 - 1));
                }
            }
        }
        blocks
    }
}

/// Rotate a pattern one quarter turn clockwise
pub fn rotate_cw(pattern: PiecePattern) -> PiecePattern {
    let n = PATTERN_SIZE;
    let mut out = [[false; PATTERN_SIZE]; PATTERN_SIZE];
    for y in 0..n {
        for x in 0..n {
            out[y][x] = pattern[n - 1 - x][y];
        }
    }
    out
}

fn rows(r: [[u8; PATTERN_SIZE]; PATTERN_SIZE]) -> PiecePattern {
    let mut out = [[false; PATTERN_SIZE]; PATTERN_SIZE];
    for y in 0..PATTERN_SIZE {
        for x in 0..PATTERN_SIZE {
            out[y][x] = r[y][x] != 0;
        }
    }
    out
}

/// Base (rotation 0) pattern for each catalog type
fn base_pattern(type_id: u8) -> PiecePattern {
    match type_id {
        0 => rows([[0, 0, 0], [0, 1, 0], [0, 0, 0]]), // Dot
        1 => rows([[0, 0, 0], [0, 1, 1], [0, 0, 0]]), // Domino
        2 => rows([[0, 0, 0], [1, 1, 1], [0, 0, 0]]), // Line
        3 => rows([[0, 0, 0], [0, 1, 1], [0, 1, 0]]), // Corner
        4 => rows([[0, 0, 0], [0, 1, 1], [0, 1, 1]]), // Square
        5 => rows([[0, 1, 0], [0, 1, 0], [0, 1, 1]]), // L
        6 => rows([[0, 1, 0], [0, 1, 0], [1, 1, 0]]), // J
        7 => rows([[0, 0, 0], [0, 1, 1], [1, 1, 0]]), // S
        8 => rows([[0, 0, 0], [1, 1, 0], [0, 1, 1]]), // Z
        9 => rows([[0, 0, 0], [1, 1, 1], [0, 1, 0]]), // T
        10 => rows([[0, 0, 0], [1, 0, 1], [1, 1, 1]]), // U
        11 => rows([[0, 1, 0], [1, 1, 1], [0, 1, 0]]), // Plus
        12 => rows([[1, 0, 1], [0, 1, 0], [1, 0, 1]]), // X
        13 => rows([[1, 0, 0], [0, 1, 0], [0, 0, 1]]), // Diagonal
        14 => rows([[0, 0, 1], [0, 1, 1], [1, 1, 0]]), // Stairs
        _ => unreachable!("type_id validated at construction"),
    }
}

fn piece_name(type_id: u8) -> &'static str {
    match type_id {
        0 => "Dot",
        1 => "Domino",
        2 => "Line",
        3 => "Corner",
        4 => "Square",
        5 => "L",
        6 => "J",
        7 => "S",
        8 => "Z",
        9 => "T",
        10 => "U",
        11 => "Plus",
        12 => "X",
        13 => "Diagonal",
        14 => "Stairs",
        _ => unreachable!("type_id validated at construction"),
    }
}
