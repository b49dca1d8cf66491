//! Per-connection handler: register in the page's room, then relay.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use presence_client::protocol::{decode_client_frame, ClientMessage};
use presence_common::new_id;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::room::{Broadcast, RoomStore};

/// Path prefix every presence socket is opened on.
pub const PATH_PREFIX: &str = "/ws/presence/";

/// Page id addressed by an upgrade request path, if it is a presence path.
pub fn page_from_path(path: &str) -> Option<String> {
    let encoded = path.strip_prefix(PATH_PREFIX)?;
    if encoded.is_empty() || encoded.contains('/') {
        return None;
    }
    percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|page| page.into_owned())
}

/// Handle a single WebSocket connection for `page`.
pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    page: String,
    store: RoomStore,
) {
    let (mut sink, mut stream) = ws.split();
    let conn_id = new_id();

    let (tx, mut rx) = mpsc::channel::<String>(256);
    store.register(&page, &conn_id, tx).await;
    tracing::info!(peer = %addr, page = %page, conn = %conn_id, "Client connected");

    loop {
        tokio::select! {
            // Room traffic for this client
            Some(frame) = rx.recv() => {
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        for b in handle_client_frame(&text, &page, &conn_id, &store, addr).await {
                            b.deliver();
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    for b in store.unregister(&page, &conn_id).await {
        b.deliver();
    }
    let rooms = store.room_count().await;
    tracing::info!(
        peer = %addr,
        page = %page,
        conn = %conn_id,
        rooms = rooms,
        "Client disconnected"
    );
}

async fn handle_client_frame(
    text: &str,
    page: &str,
    conn_id: &str,
    store: &RoomStore,
    addr: SocketAddr,
) -> Vec<Broadcast> {
    match decode_client_frame(text) {
        Ok(ClientMessage::Join { user }) => {
            tracing::info!(page = %page, user = %user.user_id, session = %user.session_id, "Join");
            let session_id = user.session_id.clone();
            store
                .join(page, conn_id, user.into_participant(), session_id)
                .await
        }
        Ok(ClientMessage::Leave {
            user_id,
            session_id,
        }) => {
            tracing::info!(page = %page, user = %user_id, session = %session_id, "Leave");
            store.leave(page, conn_id, &user_id, &session_id).await
        }
        Ok(ClientMessage::Unknown) => {
            tracing::debug!(peer = %addr, "Ignoring unknown message type");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(peer = %addr, error = %e, "Invalid client message");
            Vec::new()
        }
    }
}
