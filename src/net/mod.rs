//! Net module - the multiplayer synchronizer
//!
//! Wire codec, peer connection plumbing, the remote piece-supply and
//! board/score sync capabilities, and the headless match server.

pub mod communicator;
pub mod protocol;
pub mod server;
pub mod sync;

pub use communicator::Communicator;
pub use protocol::WireCommand;
pub use sync::{multiplayer_game, ProtocolSink, RemoteQueueSource};
