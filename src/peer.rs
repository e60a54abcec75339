//! Peer-address parsing.
//!
//! The peer endpoint is configured as a bracketed IPv6 literal plus port,
//! e.g. `[2001:db8::1]:5000`. Each malformed shape is rejected with its own
//! error variant so startup diagnostics can say exactly what is wrong, and
//! parsing always happens before any socket is created.

use std::net::{AddrParseError, IpAddr, Ipv6Addr, SocketAddr};

/// Correct-format example shown in startup diagnostics.
pub const EXAMPLE: &str = "[2001:db8::1]:5000";

/// Errors that can arise when parsing a peer address string.
#[derive(Debug, PartialEq, Eq)]
pub enum PeerAddrError {
    /// The string does not start with `[` (non-bracketed literal).
    MissingOpeningBracket,
    /// No `]` terminates the IPv6 literal.
    MissingClosingBracket,
    /// No `:` between the closing bracket and the port.
    MissingPortSeparator,
    /// The bracketed part is not a valid IPv6 literal.
    InvalidAddress(AddrParseError),
    /// The port is not a number in 1..=65535.
    InvalidPort,
}

impl std::fmt::Display for PeerAddrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOpeningBracket => {
                write!(f, "IPv6 literal must be bracketed, starting with '['")
            }
            Self::MissingClosingBracket => {
                write!(f, "missing closing bracket ']' after the IPv6 literal")
            }
            Self::MissingPortSeparator => {
                write!(f, "missing ':' between the closing bracket and the port")
            }
            Self::InvalidAddress(e) => write!(f, "invalid IPv6 literal: {e}"),
            Self::InvalidPort => write!(f, "port must be a number in 1..=65535"),
        }
    }
}

impl std::error::Error for PeerAddrError {}

/// Parse a `[ipv6]:port` string into a socket address.
///
/// Port 0 is rejected: it can never name a reachable peer.
pub fn parse(input: &str) -> Result<SocketAddr, PeerAddrError> {
    let rest = input
        .strip_prefix('[')
        .ok_or(PeerAddrError::MissingOpeningBracket)?;
    let (literal, tail) = rest
        .split_once(']')
        .ok_or(PeerAddrError::MissingClosingBracket)?;
    let port_str = tail
        .strip_prefix(':')
        .ok_or(PeerAddrError::MissingPortSeparator)?;

    let ip: Ipv6Addr = literal.parse().map_err(PeerAddrError::InvalidAddress)?;
    let port: u16 = port_str.parse().map_err(|_| PeerAddrError::InvalidPort)?;
    if port == 0 {
        return Err(PeerAddrError::InvalidPort);
    }

    Ok(SocketAddr::new(IpAddr::V6(ip), port))
}
