//! Per-process session: the shared context for the three loops.
//!
//! A [`Session`] owns everything the loops share: the bound socket, the
//! immutable peer endpoint, the [`ConnectionState`] flag, and a watch-channel
//! shutdown signal. Binding spawns the Receiver and Keepalive loops as
//! background tasks; the Interactive Sender runs in the foreground via
//! [`Session::run_sender`]. [`Session::shutdown`] signals both background
//! tasks and joins them, so nothing is abandoned mid-write at exit.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::input::InputSource;
use crate::keepalive::{self, KeepaliveConfig};
use crate::receiver::{self, ChatEvent};
use crate::sender;
use crate::socket::{Socket, SocketError};
use crate::state::ConnectionState;

/// Backlog of undelivered [`ChatEvent`]s before the Receiver waits.
const EVENT_QUEUE_LEN: usize = 64;

/// Startup configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Local UDP port to bind on the IPv6 wildcard address (0 = OS-assigned).
    pub local_port: u16,
    /// The fixed peer endpoint all outbound traffic targets.
    pub peer: SocketAddr,
    /// Probe timing; defaults are the production cadence.
    pub keepalive: KeepaliveConfig,
}

impl SessionConfig {
    pub fn new(local_port: u16, peer: SocketAddr) -> Self {
        Self {
            local_port,
            peer,
            keepalive: KeepaliveConfig::default(),
        }
    }
}

/// A live session: socket bound, background loops running.
pub struct Session {
    socket: Arc<Socket>,
    peer: SocketAddr,
    state: Arc<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
    receiver_task: JoinHandle<()>,
    keepalive_task: JoinHandle<()>,
}

impl Session {
    /// Bind the socket and spawn the Receiver and Keepalive loops.
    ///
    /// Returns the session handle plus the receiving end of the event
    /// channel on which inbound text and the established notice arrive.
    /// A bind failure (e.g. port already in use) is fatal to startup and
    /// surfaces here before any loop exists.
    pub async fn bind(
        config: SessionConfig,
    ) -> Result<(Self, mpsc::Receiver<ChatEvent>), SocketError> {
        let socket = Arc::new(Socket::bind(config.local_port).await?);
        let state = Arc::new(ConnectionState::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_LEN);

        let receiver_task = tokio::spawn(receiver::run(
            Arc::clone(&socket),
            Arc::clone(&state),
            event_tx,
            shutdown_rx.clone(),
        ));
        let keepalive_task = tokio::spawn(keepalive::run(
            Arc::clone(&socket),
            config.peer,
            Arc::clone(&state),
            config.keepalive,
            shutdown_rx,
        ));

        let session = Self {
            socket,
            peer: config.peer,
            state,
            shutdown_tx,
            receiver_task,
            keepalive_task,
        };
        Ok((session, event_rx))
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.socket.local_addr
    }

    /// The configured peer endpoint.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Non-blocking read of the connection flag.
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Run the Interactive Sender loop in the foreground.
    ///
    /// Completes only when [`Session::shutdown`] is signalled from elsewhere;
    /// callers normally race it against Ctrl-C in a `select!`.
    pub async fn run_sender<I: InputSource>(&self, input: I) {
        sender::run(
            Arc::clone(&self.socket),
            self.peer,
            Arc::clone(&self.state),
            input,
            self.shutdown_tx.subscribe(),
        )
        .await
    }

    /// Signal both background loops to stop and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.receiver_task.await;
        let _ = self.keepalive_task.await;
    }
}
