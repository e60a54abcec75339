//! Async UDP socket abstraction.
//!
//! [`Socket`] is a thin wrapper around `tokio::net::UdpSocket` that speaks
//! [`crate::message::Message`] instead of raw bytes. All protocol logic lives
//! elsewhere; this module owns only byte I/O and socket setup.
//!
//! The socket binds the IPv6 wildcard address with `SO_REUSEADDR` so the
//! process can rebind its port immediately after a restart. `socket2` builds
//! the socket because tokio's plain `bind` cannot set options pre-bind.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::str::Utf8Error;

use socket2::{Domain, Protocol, Type};
use tokio::net::UdpSocket;

use crate::message::{Message, MAX_DATAGRAM};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can arise from socket operations.
#[derive(Debug)]
pub enum SocketError {
    /// Underlying I/O error from the OS.
    Io(std::io::Error),
    /// The received datagram was neither a control token nor valid UTF-8.
    Decode(Utf8Error),
}

impl std::fmt::Display for SocketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "socket I/O error: {e}"),
            Self::Decode(e) => write!(f, "payload decode error: {e}"),
        }
    }
}

impl std::error::Error for SocketError {}

impl From<std::io::Error> for SocketError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Socket
// ---------------------------------------------------------------------------

/// An async, message-oriented UDP socket.
///
/// All methods are `&self` so one socket can be shared across the three
/// loops through an `Arc`: UDP handles concurrent writers and a single
/// reader without extra locking.
#[derive(Debug)]
pub struct Socket {
    /// Address this socket is bound to (filled in after the OS assigns a port).
    pub local_addr: SocketAddr,
    inner: UdpSocket,
}

impl Socket {
    /// Bind to the IPv6 wildcard address on `port` with address reuse.
    ///
    /// Passing port 0 lets the OS choose an ephemeral port.
    pub async fn bind(port: u16) -> Result<Self, SocketError> {
        let raw = socket2::Socket::new(Domain::IPV6, Type::DGRAM, Some(Protocol::UDP))?;
        raw.set_reuse_address(true)?;
        raw.set_nonblocking(true)?;
        let bind_addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
        raw.bind(&bind_addr.into())?;

        let inner = UdpSocket::from_std(raw.into())?;
        let local_addr = inner.local_addr()?;
        Ok(Self { local_addr, inner })
    }

    /// Send `message` as a single UDP datagram to `dest`.
    pub async fn send(&self, message: &Message, dest: SocketAddr) -> Result<(), SocketError> {
        self.inner.send_to(message.as_bytes(), dest).await?;
        Ok(())
    }

    /// Receive the next datagram and classify it into a [`Message`].
    ///
    /// Returns `(message, sender_address)`. Datagrams longer than
    /// [`MAX_DATAGRAM`] are truncated to the buffer; datagrams that fail to
    /// decode are returned as `Err` and the caller decides whether to retry.
    pub async fn recv(&self) -> Result<(Message, SocketAddr), SocketError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (n, addr) = self.inner.recv_from(&mut buf).await?;
        let message = Message::classify(&buf[..n]).map_err(SocketError::Decode)?;
        Ok((message, addr))
    }
}
