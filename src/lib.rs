//! `p2p-chat` — a minimal peer-to-peer chat over UDP/IPv6.
//!
//! Two endpoints exchange raw datagrams directly. A `PING`/`PONG` handshake
//! detects peer liveness (and, as a side effect, punches a hole through
//! NAT/firewall state tables); once either token has been observed the
//! session is "connected" and free-form text flows in both directions.
//!
//! # Architecture
//!
//! Three concurrent loops share one UDP socket and one connection flag:
//!
//! ```text
//!  stdin / InputSource                 peer datagrams
//!        │                                   │
//!  ┌─────▼─────┐                       ┌─────▼──────┐
//!  │  Sender   │ (foreground)          │  Receiver  │ (background task)
//!  └─────┬─────┘                       └─────┬──────┘
//!        │        ┌──────────────┐           │  PONG replies go to the
//!        │        │  Keepalive   │           │  observed source address
//!        │        │ (background) │           │
//!        │        └──────┬───────┘           │
//!        │   text        │ PING              │
//!  ┌─────▼───────────────▼───────────────────▼──────┐
//!  │                    Socket                      │
//!  │      (shared Arc, one bind per process)        │
//!  └────────────────────────────────────────────────┘
//!                         │
//!              ConnectionState (atomic bool,
//!              set once by the Receiver only)
//! ```
//!
//! Each module has a single responsibility:
//! - [`message`]   — datagram classification: `PING` / `PONG` / text
//! - [`peer`]      — `[ipv6]:port` peer-address parsing
//! - [`socket`]    — async UDP socket abstraction (IPv6 wildcard, SO_REUSEADDR)
//! - [`state`]     — the monotonic connected flag
//! - [`receiver`]  — inbound loop: handshake replies + surfacing text
//! - [`keepalive`] — outbound liveness probes at a state-dependent cadence
//! - [`input`]     — pluggable "read next line" source (stdin or scripted)
//! - [`sender`]    — foreground loop forwarding operator text to the peer
//! - [`session`]   — shared context; spawns and joins the background loops

pub mod input;
pub mod keepalive;
pub mod message;
pub mod peer;
pub mod receiver;
pub mod sender;
pub mod session;
pub mod socket;
pub mod state;
