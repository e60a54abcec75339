//! Foreground loop: forward operator text to the peer.
//!
//! Unlike the Receiver's PONG replies, text always goes to the *configured*
//! peer endpoint, never to an observed source address. Sending is attempted
//! whether or not the session is connected; when it is not, the operator
//! gets an advisory that the message may not have reached anyone yet.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use crate::input::InputSource;
use crate::message::Message;
use crate::socket::Socket;
use crate::state::ConnectionState;

/// Pause after end-of-input before polling the source again. EOF is not a
/// shutdown signal: a script feeding stdin may refill it at any time.
const EOF_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Run the interactive sender until `shutdown` fires.
///
/// Whitespace-only lines are discarded without sending. Input and send
/// errors are logged and the loop continues; the only graceful exit is the
/// process-level interrupt handled by the caller.
pub async fn run<I: InputSource>(
    socket: Arc<Socket>,
    peer: SocketAddr,
    state: Arc<ConnectionState>,
    mut input: I,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let line = tokio::select! {
            _ = shutdown.changed() => break,
            line = input.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match socket.send(&Message::Text(line), peer).await {
                    Ok(()) => {
                        if !state.is_connected() {
                            log::info!(
                                "message sent, but {peer} has not answered a probe yet; \
                                 it may not have arrived"
                            );
                        }
                    }
                    Err(e) => log::warn!("[send] failed to send message to {peer}: {e}"),
                }
            }
            Ok(None) => {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = sleep(EOF_RETRY_DELAY) => {}
                }
            }
            Err(e) => log::warn!("[send] input error: {e}"),
        }
    }

    log::debug!("[send] loop stopped");
}
