//! Entry point for `p2p-chat`.
//!
//! Owns only process setup and console rendering: logging, argument parsing,
//! Ctrl-C handling, and printing [`ChatEvent`]s. All protocol work lives in
//! the library modules.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use p2p_chat::input::StdinInput;
use p2p_chat::peer;
use p2p_chat::receiver::ChatEvent;
use p2p_chat::session::{Session, SessionConfig};

/// Peer-to-peer UDP/IPv6 chat with a PING/PONG liveness handshake.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Local UDP port to bind on all IPv6 interfaces.
    local_port: u16,

    /// Peer endpoint: bracketed IPv6 literal plus port, e.g. [2001:db8::1]:5000.
    peer: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise env_logger; set RUST_LOG to control verbosity.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let peer = peer::parse(&cli.peer).with_context(|| {
        format!(
            "invalid peer address '{}': expected a bracketed IPv6 literal plus port, e.g. {}",
            cli.peer,
            peer::EXAMPLE
        )
    })?;

    let (session, mut events) = Session::bind(SessionConfig::new(cli.local_port, peer))
        .await
        .with_context(|| {
            format!(
                "failed to bind UDP port {} (is it already in use?)",
                cli.local_port
            )
        })?;

    log::info!("listening on {}", session.local_addr());
    log::info!("target peer {}", session.peer_addr());
    println!("Type messages to send (Ctrl-C to exit)");
    prompt();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!();
            log::info!("interrupt received; shutting down");
        }
        _ = session.run_sender(StdinInput::new()) => {}
        _ = render_events(&mut events, &session) => {}
    }

    session.shutdown().await;
    Ok(())
}

/// Print chat events as they arrive, re-rendering the input prompt cue
/// after each one once the session is connected.
async fn render_events(events: &mut mpsc::Receiver<ChatEvent>, session: &Session) {
    while let Some(event) = events.recv().await {
        match event {
            ChatEvent::Established { peer } => {
                println!("\n=== Connection established with {peer}! Start chatting ===\n");
                prompt();
            }
            ChatEvent::Message {
                from,
                body,
                received_at,
            } => {
                println!("\n[{}] {from}: {body}", clock_time(received_at));
                if session.is_connected() {
                    prompt();
                }
            }
        }
    }
}

fn prompt() {
    print!("Your message: ");
    let _ = std::io::stdout().flush();
}

/// HH:MM:SS (UTC) for display next to a received message.
fn clock_time(at: SystemTime) -> String {
    let secs = at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}
