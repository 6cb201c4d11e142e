//! Server module - the headless match server
//!
//! Players connect over TCP and speak the line protocol. The server
//! keeps one shared piece sequence per process and a per-player cursor
//! into it, so every player receives the identical piece order; a
//! `PIECE` request is answered with the requester's next assignment,
//! while `BOARD` and `SCORE` lines are relayed verbatim to every other
//! player. Anything else is ignored.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};

use crate::core::SimpleRng;
use crate::net::protocol::{encode_piece_assign, WireCommand};
use crate::types::PIECE_KINDS;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7515,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("QUINTRIS_HOST").unwrap_or(defaults.host);
        let port = std::env::var("QUINTRIS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        Self { host, port }
    }
}

/// The piece order shared by every player in the match
struct PieceSequence {
    rng: SimpleRng,
    generated: Vec<u8>,
}

impl PieceSequence {
    fn new(rng: SimpleRng) -> Self {
        Self {
            rng,
            generated: Vec::new(),
        }
    }

    /// Piece at the given position, generating up to it on demand
    fn get(&mut self, index: usize) -> u8 {
        while self.generated.len() <= index {
            let type_id = self.rng.next_range(PIECE_KINDS as u32) as u8;
            self.generated.push(type_id);
        }
        self.generated[index]
    }
}

struct PeerHandle {
    id: usize,
    tx: mpsc::UnboundedSender<String>,
}

/// Run the match server until the listener fails. `ready_tx`, when
/// given, receives the bound address once accepting starts (ports may
/// be configured as 0 for tests).
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    println!("[server] listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let sequence = Arc::new(Mutex::new(PieceSequence::new(SimpleRng::from_time())));
    let peers: Arc<RwLock<Vec<PeerHandle>>> = Arc::new(RwLock::new(Vec::new()));
    let mut peer_id_counter = 0usize;

    loop {
        let (socket, addr) = listener.accept().await?;
        peer_id_counter += 1;
        let id = peer_id_counter;
        println!("[server] player {} connected from {}", id, addr);

        let sequence = Arc::clone(&sequence);
        let peers = Arc::clone(&peers);
        tokio::spawn(async move {
            if let Err(e) = handle_peer(socket, id, sequence, Arc::clone(&peers)).await {
                eprintln!("[server] player {} error: {}", id, e);
            }
            peers.write().await.retain(|p| p.id != id);
            println!("[server] player {} disconnected", id);
        });
    }
}

async fn handle_peer(
    socket: TcpStream,
    id: usize,
    sequence: Arc<Mutex<PieceSequence>>,
    peers: Arc<RwLock<Vec<PeerHandle>>>,
) -> Result<()> {
    socket.set_nodelay(true)?;
    let (reader, mut writer) = tokio::io::split(socket);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    peers.write().await.push(PeerHandle { id, tx });

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    // This player's position in the shared piece sequence.
    let mut cursor = 0usize;

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match WireCommand::parse(trimmed) {
            Some(WireCommand::PieceRequest) => {
                let type_id = sequence.lock().await.get(cursor);
                cursor += 1;
                let peers_guard = peers.read().await;
                if let Some(me) = peers_guard.iter().find(|p| p.id == id) {
                    let _ = me.tx.send(encode_piece_assign(type_id));
                }
            }
            Some(WireCommand::Board(_)) | Some(WireCommand::Score(_)) => {
                let peers_guard = peers.read().await;
                for peer in peers_guard.iter().filter(|p| p.id != id) {
                    let _ = peer.tx.send(trimmed.to_string());
                }
            }
            Some(WireCommand::PieceAssign(_)) | None => {}
        }
    }

    write_task.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_stable_across_cursors() {
        let mut sequence = PieceSequence::new(SimpleRng::new(11));
        let first: Vec<u8> = (0..10).map(|i| sequence.get(i)).collect();
        let replay: Vec<u8> = (0..10).map(|i| sequence.get(i)).collect();
        assert_eq!(first, replay);
        assert!(first.iter().all(|&id| id < PIECE_KINDS));
    }

    #[test]
    fn config_defaults_are_loopback() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_ne!(config.port, 0);
    }
}
