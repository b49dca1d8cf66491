//! presence-relay: reference WebSocket server for page presence.
//!
//! Accepts sockets on `/ws/presence/{pageId}`, keeps one room per page and
//! broadcasts `user_joined`, `user_left` and `presence_update` frames as
//! viewers come and go.

mod connection;
mod room;
mod server;

use clap::Parser;
use tokio::net::TcpListener;

use crate::room::RoomStore;

#[derive(Parser)]
#[command(name = "presence-relay", about = "Reference server for page presence")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8099)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presence_relay=info".into()),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.bind, args.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("presence-relay listening on {}", addr);
    server::serve(listener, RoomStore::new()).await;
    Ok(())
}
