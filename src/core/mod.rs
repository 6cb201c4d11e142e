//! Core module - pure game logic
//!
//! Grid, piece catalog, scoring and the game engine. No UI, networking
//! or async dependencies; the serialized runtime lives in `crate::engine`
//! and the wire layer in `crate::net`.

pub mod game;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use game::{Game, LocalPieceSource, NoSync, PieceSource, SyncSink};
pub use grid::Grid;
pub use pieces::GamePiece;
pub use rng::SimpleRng;
