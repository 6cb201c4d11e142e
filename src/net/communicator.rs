//! Communicator module - the persistent peer connection
//!
//! Wraps one TCP stream in a read task and a write task. Inbound lines
//! arrive on a channel (the runtime funnels them into the game's
//! serialized context); outbound lines are queued fire-and-forget, with
//! no retry on loss. When `QUINTRIS_WIRE_LOG` names a file, every line
//! in both directions is appended to it as a JSON record by a dedicated
//! writer task.

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Environment variable naming the wire-log file
pub const WIRE_LOG_ENV: &str = "QUINTRIS_WIRE_LOG";

#[derive(Debug, Clone, Serialize)]
struct WireRecord {
    dir: &'static str,
    ts: u64,
    line: String,
}

/// Handle for sending lines to the peer
pub struct Communicator {
    out_tx: mpsc::UnboundedSender<String>,
}

impl Communicator {
    /// Connect to a peer. Returns the communicator and the inbound line
    /// stream.
    pub async fn connect(addr: &str) -> Result<(Self, mpsc::UnboundedReceiver<String>)> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::from_stream(stream))
    }

    /// Bind and wait for a single peer to connect
    pub async fn listen(addr: &str) -> Result<(Self, mpsc::UnboundedReceiver<String>, SocketAddr)> {
        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?;
        println!("[net] waiting for a peer on {}", bound);
        let (stream, peer) = listener.accept().await?;
        println!("[net] peer connected from {}", peer);
        stream.set_nodelay(true)?;
        let (communicator, inbound) = Self::from_stream(stream);
        Ok((communicator, inbound, bound))
    }

    /// Split an established stream into read/write tasks
    pub fn from_stream(stream: TcpStream) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (reader, mut writer) = tokio::io::split(stream);
        let (in_tx, in_rx) = mpsc::unbounded_channel::<String>();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let log_tx = spawn_wire_log();

        let read_log = log_tx.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        let received = line.trim_end_matches(['\n', '\r']).to_string();
                        if received.is_empty() {
                            continue;
                        }
                        if let Some(tx) = read_log.as_ref() {
                            let _ = tx.send(WireRecord {
                                dir: "in",
                                ts: now_ms(),
                                line: received.clone(),
                            });
                        }
                        if in_tx.send(received).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        tokio::spawn(async move {
            while let Some(line) = out_rx.recv().await {
                if writer.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
                if writer.write_all(b"\n").await.is_err() {
                    break;
                }
                if writer.flush().await.is_err() {
                    break;
                }
                if let Some(tx) = log_tx.as_ref() {
                    let _ = tx.send(WireRecord {
                        dir: "out",
                        ts: now_ms(),
                        line,
                    });
                }
            }
        });

        (Self { out_tx }, in_rx)
    }

    /// Queue one line for sending. Fire-and-forget: a closed connection
    /// drops the line.
    pub fn send(&self, line: impl Into<String>) {
        let _ = self.out_tx.send(line.into());
    }

    /// Clone of the outbound channel, for sinks that emit lines directly
    pub fn sender(&self) -> mpsc::UnboundedSender<String> {
        self.out_tx.clone()
    }
}

fn spawn_wire_log() -> Option<mpsc::UnboundedSender<WireRecord>> {
    let path = std::env::var(WIRE_LOG_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;
    let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[net] wire log {} unavailable: {}", path, e);
                return;
            }
        };
        let mut buf: Vec<u8> = Vec::with_capacity(256);
        while let Some(record) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &record).is_err() {
                continue;
            }
            buf.push(b'\n');
            if file.write_all(&buf).await.is_err() {
                break;
            }
        }
        let _ = file.flush().await;
    });
    Some(tx)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
