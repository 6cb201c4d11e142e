//! Quintris - a grid placement puzzle engine
//!
//! Pieces from a 15-type catalog are placed (not dropped) onto a small
//! board; full rows and columns clear together and feed a score
//! multiplier, while a per-level countdown limits each turn. The engine
//! runs single-player against a local random piece stream, or
//! multiplayer against a peer-fed piece queue synchronized over a
//! newline-delimited text protocol.
//!
//! Rendering, input and audio are not part of this crate; the engine
//! exposes its state read-only and announces changes through the
//! callbacks on [`crate::core::Game`].

pub mod core;
pub mod engine;
pub mod net;
pub mod scores;
pub mod types;
