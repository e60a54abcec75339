//! Datagram classification.
//!
//! The wire format is deliberately bare: every datagram is either one of the
//! two control tokens (`PING`, `PONG`) or UTF-8 application text. There is no
//! header, no framing, no sequence numbers — the UDP datagram boundary is the
//! message boundary.
//!
//! # Known protocol limitation
//!
//! Classification is an exact whole-payload comparison, so a text message
//! whose content is literally `PING` or `PONG` is indistinguishable from a
//! control token and will be treated as one. Resolving this would need a
//! framing byte on the wire, which is an intentional non-feature for now.

use std::str::Utf8Error;

/// Liveness-probe control token.
pub const PING: &[u8] = b"PING";

/// Probe-reply control token.
pub const PONG: &[u8] = b"PONG";

/// Receive buffer size. Larger datagrams are silently truncated by the OS,
/// a documented limitation of the protocol.
pub const MAX_DATAGRAM: usize = 1024;

/// One received or outbound datagram payload, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Liveness probe; the receiver answers with [`Message::Pong`].
    Ping,
    /// Reply to a probe; never answered.
    Pong,
    /// Free-form application text.
    Text(String),
}

impl Message {
    /// Classify a raw payload.
    ///
    /// The control tokens are matched against the *whole* payload; anything
    /// else must decode as UTF-8 text or the datagram is a decode error
    /// (non-fatal for the caller, see [`crate::receiver`]).
    pub fn classify(payload: &[u8]) -> Result<Self, Utf8Error> {
        if payload == PING {
            Ok(Self::Ping)
        } else if payload == PONG {
            Ok(Self::Pong)
        } else {
            Ok(Self::Text(std::str::from_utf8(payload)?.to_owned()))
        }
    }

    /// The bytes this message puts on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ping => PING,
            Self::Pong => PONG,
            Self::Text(text) => text.as_bytes(),
        }
    }
}
