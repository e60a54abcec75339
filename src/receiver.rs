//! Inbound loop: handshake replies and surfacing text.
//!
//! The Receiver accepts datagrams from **any** source address, not just the
//! configured peer. A `PING` is answered with `PONG` sent back to the actual
//! sender address, so a peer behind a NAT that rewrites its source port still
//! gets its reply. The first `PING` or `PONG` from anyone flips the shared
//! [`ConnectionState`]; this is the only place the flag is ever written.
//!
//! Display is not this module's concern: inbound text and the one-time
//! established notice are surfaced as [`ChatEvent`]s on a channel and the
//! caller decides how to render them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use crate::message::Message;
use crate::socket::Socket;
use crate::state::ConnectionState;

/// Pause after a failed receive, so a dead socket cannot spin the loop hot.
const RECV_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// What the Receiver surfaces to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// First valid `PING` or `PONG` observed; emitted at most once.
    Established {
        /// Source address of the datagram that completed the handshake.
        peer: SocketAddr,
    },
    /// An inbound text message.
    Message {
        /// Observed sender address.
        from: SocketAddr,
        /// Decoded message body, verbatim.
        body: String,
        /// Wall-clock time of receipt.
        received_at: SystemTime,
    },
}

/// Run the inbound loop until `shutdown` fires.
///
/// Every steady-state error is absorbed here: logged, backed off, retried.
/// Nothing that happens on the wire terminates this loop.
pub async fn run(
    socket: Arc<Socket>,
    state: Arc<ConnectionState>,
    events: mpsc::Sender<ChatEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    log::debug!("[recv] listening on {}", socket.local_addr);

    loop {
        let result = tokio::select! {
            _ = shutdown.changed() => break,
            result = socket.recv() => result,
        };

        let (message, from) = match result {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("[recv] receive error: {e}; retrying in {RECV_ERROR_BACKOFF:?}");
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = sleep(RECV_ERROR_BACKOFF) => {}
                }
                continue;
            }
        };

        match message {
            Message::Ping => {
                log::debug!("[recv] ← PING from {from}; → PONG");
                // Reply to the observed source, not the configured peer.
                if let Err(e) = socket.send(&Message::Pong, from).await {
                    log::warn!("[recv] failed to answer PING from {from}: {e}");
                }
                announce_established(&state, &events, from).await;
            }
            Message::Pong => {
                log::debug!("[recv] ← PONG from {from}");
                announce_established(&state, &events, from).await;
            }
            Message::Text(body) => {
                log::debug!("[recv] ← {} byte(s) of text from {from}", body.len());
                let event = ChatEvent::Message {
                    from,
                    body,
                    received_at: SystemTime::now(),
                };
                if events.send(event).await.is_err() {
                    // Consumer is gone; keep draining the socket anyway so
                    // the peer's PINGs still get answered.
                    log::debug!("[recv] event consumer dropped; text discarded");
                }
            }
        }
    }

    log::debug!("[recv] loop stopped");
}

/// Flip the connected flag and emit the one-time notice if this datagram won.
async fn announce_established(
    state: &ConnectionState,
    events: &mpsc::Sender<ChatEvent>,
    peer: SocketAddr,
) {
    if state.establish() {
        log::info!("connection established (first liveness reply from {peer})");
        let _ = events.send(ChatEvent::Established { peer }).await;
    }
}
