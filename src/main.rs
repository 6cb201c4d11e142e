//! Headless match server (default binary).
//!
//! Hands every connected player the same piece sequence and relays
//! board/score snapshots between them. Configure with `QUINTRIS_HOST`
//! and `QUINTRIS_PORT`.

use anyhow::Result;

use quintris::net::server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    run_server(ServerConfig::from_env(), None).await
}
