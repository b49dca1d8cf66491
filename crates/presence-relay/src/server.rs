//! Accept loop: upgrade presence paths and hand them to the connection handler.

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;

use crate::connection::{handle_connection, page_from_path};
use crate::room::RoomStore;

/// Serve presence sockets on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, store: RoomStore) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut path = String::new();
                    let callback = |req: &Request, resp: Response| {
                        path = req.uri().path().to_string();
                        Ok(resp)
                    };
                    let mut ws = match accept_hdr_async(stream, callback).await {
                        Ok(ws) => ws,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                            return;
                        }
                    };

                    match page_from_path(&path) {
                        Some(page) => handle_connection(ws, addr, page, store).await,
                        None => {
                            tracing::warn!(peer = %addr, path = %path, "Not a presence path");
                            let _ = ws.send(Message::Close(None)).await;
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
