//! Runtime module - the single serialized mutation context
//!
//! One task owns the `Game` and is the only place it is ever mutated.
//! Player commands, countdown expiries and inbound wire lines all arrive
//! on channels and are processed strictly one at a time, so a placement
//! can never interleave with a timeout or a peer message.

use tokio::sync::mpsc;

use crate::core::{Game, GamePiece};
use crate::engine::scheduler::{Expiry, TurnScheduler};
use crate::net::protocol::WireCommand;
use crate::types::TurnExpiry;

/// A player action delivered to the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place the current piece with its pattern center at (x, y)
    Place { x: i32, y: i32 },
    /// Rotate the current piece a quarter turn clockwise
    Rotate,
    /// Exchange the current and following pieces
    Swap,
    /// Stop the match
    End,
}

/// Cheap cloneable handle for feeding commands into a running game
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    pub fn place(&self, x: i32, y: i32) {
        let _ = self.tx.send(Command::Place { x, y });
    }

    pub fn rotate(&self) {
        let _ = self.tx.send(Command::Rotate);
    }

    pub fn swap(&self) {
        let _ = self.tx.send(Command::Swap);
    }

    pub fn end(&self) {
        let _ = self.tx.send(Command::End);
    }
}

/// Drives one match to completion
pub struct GameRuntime {
    game: Game,
    scheduler: TurnScheduler,
    expiry_rx: mpsc::UnboundedReceiver<Expiry>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    wire_rx: mpsc::UnboundedReceiver<String>,
    has_peer: bool,
}

impl GameRuntime {
    pub fn new(game: Game) -> (Self, EngineHandle) {
        let (scheduler, expiry_rx) = TurnScheduler::new();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        // Placeholder channel; replaced by with_inbound for multiplayer.
        let (_wire_tx, wire_rx) = mpsc::unbounded_channel();
        (
            Self {
                game,
                scheduler,
                expiry_rx,
                cmd_rx,
                wire_rx,
                has_peer: false,
            },
            EngineHandle { tx: cmd_tx },
        )
    }

    /// Attach the inbound line stream of a peer connection
    pub fn with_inbound(mut self, wire_rx: mpsc::UnboundedReceiver<String>) -> Self {
        self.wire_rx = wire_rx;
        self.has_peer = true;
        self
    }

    /// Run the match until it ends, then hand back the final game state
    pub async fn run(self) -> Game {
        let GameRuntime {
            mut game,
            mut scheduler,
            mut expiry_rx,
            mut cmd_rx,
            mut wire_rx,
            has_peer,
        } = self;

        game.start();
        arm_turn(&mut game, &mut scheduler);

        let mut wire_open = has_peer;
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Place { x, y }) => {
                        if game.attempt_placement(x, y) {
                            arm_turn(&mut game, &mut scheduler);
                        }
                    }
                    Some(Command::Rotate) => game.rotate_current(),
                    Some(Command::Swap) => game.swap_pieces(),
                    Some(Command::End) | None => {
                        scheduler.end();
                        break;
                    }
                },
                Some(expiry) = expiry_rx.recv() => {
                    if scheduler.acknowledge(&expiry) {
                        match game.on_turn_expired() {
                            TurnExpiry::LifeLost => arm_turn(&mut game, &mut scheduler),
                            TurnExpiry::GameOver => {
                                scheduler.end();
                                break;
                            }
                        }
                    }
                }
                line = wire_rx.recv(), if wire_open => match line {
                    Some(line) => handle_wire_line(&mut game, &line),
                    None => wire_open = false,
                },
            }
        }

        game
    }
}

fn arm_turn(game: &mut Game, scheduler: &mut TurnScheduler) {
    let delay = game.turn_delay();
    scheduler.arm(delay);
    game.notify_turn_delay(delay);
}

/// Apply one inbound line. Only piece assignments mutate the engine;
/// peer board/score mirrors are presentation data, and anything
/// unrecognized is ignored.
fn handle_wire_line(game: &mut Game, line: &str) {
    if let Some(WireCommand::PieceAssign(type_id)) = WireCommand::parse(line) {
        if let Some(piece) = GamePiece::from_type(type_id) {
            game.deliver_piece(piece);
        }
    }
}
