//! Outbound liveness probes.
//!
//! The Keepalive loop sends `PING` to the configured peer endpoint forever.
//! While the session is unconnected it probes aggressively to punch and hold
//! a path through NAT/firewall state tables; once connected it drops to a
//! low-frequency keepalive. The cadence is re-decided on every iteration, so
//! a `false -> true` transition takes effect on the next send rather than
//! retroactively shortening a wait already in progress.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use crate::message::Message;
use crate::socket::Socket;
use crate::state::ConnectionState;

/// Adjustable keepalive timing.
///
/// Integration tests shrink these to milliseconds; the defaults are the
/// production cadence.
#[derive(Debug, Clone)]
pub struct KeepaliveConfig {
    /// Delay before the first probe, giving the Receiver time to start
    /// listening. Shrinks the race where the peer's earliest probe is missed.
    pub start_delay: Duration,
    /// Interval between probes while unconnected.
    pub probe_interval: Duration,
    /// Interval between probes once connected.
    pub keepalive_interval: Duration,
    /// Pause after a failed send before retrying.
    pub error_backoff: Duration,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_secs(2),
            probe_interval: Duration::from_secs(5),
            keepalive_interval: Duration::from_secs(30),
            error_backoff: Duration::from_secs(10),
        }
    }
}

impl KeepaliveConfig {
    /// Cadence for the next probe given the current connection flag.
    pub fn interval_for(&self, connected: bool) -> Duration {
        if connected {
            self.keepalive_interval
        } else {
            self.probe_interval
        }
    }
}

/// Run the keepalive loop until `shutdown` fires.
///
/// Send failures are logged and followed by a longer backoff; they never
/// terminate the loop.
pub async fn run(
    socket: Arc<Socket>,
    peer: SocketAddr,
    state: Arc<ConnectionState>,
    config: KeepaliveConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    log::debug!(
        "[keepalive] probing {peer} every {:?} until the peer answers",
        config.probe_interval
    );

    let mut delay = config.start_delay;
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = sleep(delay) => {}
        }

        match socket.send(&Message::Ping, peer).await {
            Ok(()) => {
                log::debug!("[keepalive] → PING to {peer}");
                delay = config.interval_for(state.is_connected());
            }
            Err(e) => {
                log::warn!(
                    "[keepalive] failed to send PING to {peer}: {e}; retrying in {:?}",
                    config.error_backoff
                );
                delay = config.error_backoff;
            }
        }
    }

    log::debug!("[keepalive] loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_follows_the_connection_flag() {
        let config = KeepaliveConfig::default();
        assert_eq!(config.interval_for(false), config.probe_interval);
        assert_eq!(config.interval_for(true), config.keepalive_interval);
    }

    #[test]
    fn default_probe_is_more_aggressive_than_keepalive() {
        let config = KeepaliveConfig::default();
        assert!(config.probe_interval < config.keepalive_interval);
    }
}
