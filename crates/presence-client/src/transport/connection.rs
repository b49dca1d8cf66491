//! Background WebSocket connection loop with reconnect.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{Sink, SinkExt, StreamExt};
use presence_common::{PresenceError, ProtocolError, SessionId};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::backoff::Backoff;
use super::handler::handle_frame;
use super::link::SessionLink;
use crate::identity::CurrentUser;
use crate::presence::helpers::iso_now;
use crate::presence::{ConnectionStatus, PresenceEvent, SessionOptions};
use crate::protocol::{ClientMessage, JoinUser};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// Upper bound on the leave + close handshake during teardown.
const LEAVE_TIMEOUT: Duration = Duration::from_secs(2);

/// What a connection task needs to know about its subscription.
pub(crate) struct ConnectionParams {
    pub(crate) page_id: String,
    pub(crate) url: String,
    pub(crate) user: CurrentUser,
    pub(crate) options: SessionOptions,
}

/// How an open connection ended.
enum OpenOutcome {
    /// The session was closed by its owner; `leave` has been sent.
    Cancelled,
    /// The socket went away on its own.
    Dropped,
}

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task managing one session's socket, with reconnect.
pub(crate) async fn connection_loop(params: ConnectionParams, link: SessionLink) {
    let page = params.page_id.as_str();
    let mut backoff = Backoff::new(&params.options.reconnect);

    loop {
        link.set_status(ConnectionStatus::Connecting);
        info!(page = %page, url = %params.url, "Connecting to presence server");

        let connect = tokio::time::timeout(
            params.options.connect_timeout,
            tokio_tungstenite::connect_async(params.url.as_str()),
        );
        let result = tokio::select! {
            biased;
            _ = link.cancel.cancelled() => break,
            result = connect => result,
        };

        match result {
            Ok(Ok((ws_stream, _))) => {
                backoff.reset();
                match run_connection(ws_stream, &params, &link).await {
                    OpenOutcome::Cancelled => break,
                    OpenOutcome::Dropped => link.emit(PresenceEvent::Disconnected),
                }
            }
            Ok(Err(e)) => {
                let err = PresenceError::Connect(e.to_string());
                error!(page = %page, error = %err, "Failed to connect to presence server");
                link.emit(PresenceEvent::Error(err.to_string()));
            }
            Err(_elapsed) => {
                let secs = params.options.connect_timeout.as_secs();
                let err = PresenceError::Connect(format!("timed out after {secs}s"));
                error!(page = %page, error = %err, "Presence connection timed out");
                link.emit(PresenceEvent::Error(err.to_string()));
            }
        }

        if !params.options.reconnect.enabled {
            break;
        }

        let Some(delay) = backoff.next_delay() else {
            let attempts = backoff.attempts();
            warn!(page = %page, attempts, "Giving up on presence server");
            link.set_status(ConnectionStatus::GaveUp { attempts });
            link.emit(PresenceEvent::GaveUp { attempts });
            return;
        };

        let attempt = backoff.attempts();
        link.set_status(ConnectionStatus::Reconnecting { attempt });
        info!(
            page = %page,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting to presence server"
        );
        tokio::select! {
            biased;
            _ = link.cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    link.set_status(ConnectionStatus::Closed);
}

// ---------------------------------------------------------------------------
// Open Connection
// ---------------------------------------------------------------------------

/// Drive one open socket until it drops or the session is closed.
async fn run_connection(
    ws_stream: WsStream,
    params: &ConnectionParams,
    link: &SessionLink,
) -> OpenOutcome {
    let page = params.page_id.as_str();
    let session_id = SessionId::now(&params.user.user_id);
    let (ws_write, mut ws_read) = ws_stream.split();
    let ws_write: Arc<Mutex<WsSink>> = Arc::new(Mutex::new(ws_write));

    link.set_status(ConnectionStatus::Open);
    info!(page = %page, session = %session_id, "Presence connection open");

    let join = join_message(&params.user, &session_id);
    if let Err(e) = send_message(&ws_write, &join).await {
        warn!(page = %page, error = %e, "Failed to send join");
        link.emit(PresenceEvent::Error(e.to_string()));
        return OpenOutcome::Dropped;
    }
    link.emit(PresenceEvent::Connected {
        session_id: session_id.clone(),
    });

    let keepalive = params
        .options
        .keepalive_interval
        .map(|interval| tokio::spawn(keepalive_task(Arc::clone(&ws_write), interval)));

    let outcome = loop {
        tokio::select! {
            biased;
            _ = link.cancel.cancelled() => {
                send_leave(&ws_write, &params.user, &session_id, page).await;
                break OpenOutcome::Cancelled;
            }
            frame = ws_read.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    handle_frame(&text, params.options.join_policy, link, page);
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    let err = ProtocolError::BinaryFrame(data.len());
                    warn!(page = %page, error = %err, "Discarding presence frame");
                    link.emit(PresenceEvent::Error(err.to_string()));
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!(page = %page, session = %session_id, "Presence server closed connection");
                    break OpenOutcome::Dropped;
                }
                Some(Err(e)) => {
                    let err = PresenceError::Transport(e.to_string());
                    warn!(page = %page, error = %err, "Presence socket error");
                    link.emit(PresenceEvent::Error(err.to_string()));
                    break OpenOutcome::Dropped;
                }
                Some(Ok(_)) => {}
            }
        }
    };

    if let Some(handle) = keepalive {
        handle.abort();
    }
    outcome
}

fn join_message(user: &CurrentUser, session_id: &SessionId) -> ClientMessage {
    let now = iso_now();
    ClientMessage::Join {
        user: JoinUser {
            user_id: user.user_id.clone(),
            nickname: user.nickname.clone(),
            joined_at: now.clone(),
            last_activity: now,
            session_id: session_id.clone(),
        },
    }
}

/// Say goodbye on a socket that is still up: `leave`, then a close frame.
async fn send_leave(
    ws_write: &Arc<Mutex<WsSink>>,
    user: &CurrentUser,
    session_id: &SessionId,
    page: &str,
) {
    let leave = ClientMessage::Leave {
        user_id: user.user_id.clone(),
        session_id: session_id.clone(),
    };
    let goodbye = async {
        send_message(ws_write, &leave).await?;
        let mut writer = ws_write.lock().await;
        writer
            .send(WsMessage::Close(None))
            .await
            .map_err(|e| PresenceError::Transport(e.to_string()))
    };

    match tokio::time::timeout(LEAVE_TIMEOUT, goodbye).await {
        Ok(Ok(())) => debug!(page = %page, session = %session_id, "Sent leave"),
        Ok(Err(e)) => warn!(page = %page, error = %e, "Failed to send leave"),
        Err(_) => warn!(page = %page, "Timed out sending leave"),
    }
}

async fn send_message<S>(ws_write: &Arc<Mutex<S>>, msg: &ClientMessage) -> Result<(), PresenceError>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(msg)
        .map_err(|e| PresenceError::Other(format!("failed to encode message: {e}")))?;
    let mut writer = ws_write.lock().await;
    writer
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| PresenceError::Transport(e.to_string()))
}

// ---------------------------------------------------------------------------
// Keepalive
// ---------------------------------------------------------------------------

async fn keepalive_task<S>(ws_write: Arc<Mutex<S>>, interval: Duration)
where
    S: Sink<WsMessage> + Unpin,
{
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; the socket was just opened.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let mut writer = ws_write.lock().await;
        if writer.send(WsMessage::Ping(Default::default())).await.is_err() {
            break;
        }
    }
}
