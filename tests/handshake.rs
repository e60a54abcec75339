//! Integration tests for the PING/PONG liveness handshake.
//!
//! Each test binds real UDP sockets on the IPv6 loopback. Sessions use an
//! OS-assigned port and a shrunk keepalive cadence so the handshake settles
//! in milliseconds; every await is guarded by `tokio::time::timeout`.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::timeout;

use p2p_chat::keepalive::KeepaliveConfig;
use p2p_chat::receiver::ChatEvent;
use p2p_chat::session::{Session, SessionConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A peer address nothing listens on (discard port); sends there just vanish.
fn blackhole() -> SocketAddr {
    "[::1]:9".parse().unwrap()
}

fn fast_keepalive() -> KeepaliveConfig {
    KeepaliveConfig {
        start_delay: Duration::from_millis(20),
        probe_interval: Duration::from_millis(50),
        keepalive_interval: Duration::from_millis(500),
        error_backoff: Duration::from_millis(50),
    }
}

/// Bind a session on an OS-assigned port targeting `peer`.
async fn bind_session(peer: SocketAddr) -> (Session, mpsc::Receiver<ChatEvent>) {
    let config = SessionConfig {
        local_port: 0,
        peer,
        keepalive: fast_keepalive(),
    };
    Session::bind(config).await.expect("bind session")
}

/// Loopback address that reaches `session` (its socket is wildcard-bound).
fn reach(session: &Session) -> SocketAddr {
    SocketAddr::new(
        IpAddr::V6(Ipv6Addr::LOCALHOST),
        session.local_addr().port(),
    )
}

/// Drain events until the established notice arrives; panics on timeout.
async fn wait_established(events: &mut mpsc::Receiver<ChatEvent>) -> SocketAddr {
    timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await.expect("event channel closed") {
                ChatEvent::Established { peer } => break peer,
                ChatEvent::Message { .. } => continue,
            }
        }
    })
    .await
    .expect("established notice timed out")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// A PING must be answered with PONG sent to the literal source address of
/// the PING, regardless of the configured peer endpoint.
#[tokio::test]
async fn ping_is_answered_with_pong_to_actual_source() {
    let (session, mut events) = bind_session(blackhole()).await;

    let probe = UdpSocket::bind("[::1]:0").await.expect("bind probe");
    probe
        .send_to(b"PING", reach(&session))
        .await
        .expect("send PING");

    let mut buf = [0u8; 64];
    let (n, from) = timeout(Duration::from_secs(5), probe.recv_from(&mut buf))
        .await
        .expect("PONG timed out")
        .expect("recv PONG");
    assert_eq!(&buf[..n], b"PONG");
    assert_eq!(from.port(), session.local_addr().port());

    // Receiving a PING also completes the handshake on this side.
    let peer = wait_established(&mut events).await;
    assert_eq!(peer, probe.local_addr().unwrap());
    assert!(session.is_connected());

    session.shutdown().await;
}

/// Two sessions pointed at each other both observe `connected = true` with
/// no manual input, driven purely by the keepalive probes.
#[tokio::test]
async fn two_sessions_become_connected_without_input() {
    // B comes up first (its probes go nowhere useful); A targets B.
    let (session_b, mut events_b) = bind_session(blackhole()).await;
    let (session_a, mut events_a) = bind_session(reach(&session_b)).await;

    // A's PING establishes B; B's PONG back establishes A.
    wait_established(&mut events_b).await;
    wait_established(&mut events_a).await;

    assert!(session_a.is_connected());
    assert!(session_b.is_connected());

    session_a.shutdown().await;
    session_b.shutdown().await;
}

/// Duplicate PINGs each earn a PONG but the established notice fires once.
#[tokio::test]
async fn duplicate_ping_does_not_reemit_established() {
    let (session, mut events) = bind_session(blackhole()).await;

    let probe = UdpSocket::bind("[::1]:0").await.expect("bind probe");
    let mut buf = [0u8; 64];
    for _ in 0..2 {
        probe
            .send_to(b"PING", reach(&session))
            .await
            .expect("send PING");
        let (n, _) = timeout(Duration::from_secs(5), probe.recv_from(&mut buf))
            .await
            .expect("PONG timed out")
            .expect("recv PONG");
        assert_eq!(&buf[..n], b"PONG");
    }

    // Exactly one established notice across both probes.
    wait_established(&mut events).await;
    let extra = timeout(Duration::from_millis(300), events.recv()).await;
    assert!(
        extra.is_err(),
        "no further event expected, got: {extra:?}"
    );

    session.shutdown().await;
}

/// A bare PONG (no PING from us) still flips the flag: either token proves
/// the peer is alive.
#[tokio::test]
async fn unsolicited_pong_establishes() {
    let (session, mut events) = bind_session(blackhole()).await;

    let probe = UdpSocket::bind("[::1]:0").await.expect("bind probe");
    probe
        .send_to(b"PONG", reach(&session))
        .await
        .expect("send PONG");

    let peer = wait_established(&mut events).await;
    assert_eq!(peer, probe.local_addr().unwrap());
    assert!(session.is_connected());

    session.shutdown().await;
}
