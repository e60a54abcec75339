//! The shared connection flag.
//!
//! [`ConnectionState`] is the only mutable state shared between the three
//! loops. It holds a single boolean that transitions `false -> true` exactly
//! once per process lifetime and is never reset. The Receiver is the only
//! writer; every loop may read it at any time without blocking.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-writer-many-reader "peer is alive" flag.
#[derive(Debug, Default)]
pub struct ConnectionState {
    connected: AtomicBool,
}

impl ConnectionState {
    /// A fresh, unconnected state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking read of the flag.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Mark the session connected.
    ///
    /// Returns `true` only for the call that performed the transition, so the
    /// one-time "connection established" notice cannot be emitted twice even
    /// under duplicated control messages.
    pub fn establish(&self) -> bool {
        self.connected
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_unconnected() {
        assert!(!ConnectionState::new().is_connected());
    }

    #[test]
    fn establish_transitions_exactly_once() {
        let state = ConnectionState::new();
        assert!(state.establish());
        assert!(state.is_connected());
        // Duplicate probes find the flag already set.
        assert!(!state.establish());
        assert!(state.is_connected());
    }

    #[test]
    fn concurrent_establish_has_a_single_winner() {
        let state = Arc::new(ConnectionState::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || state.establish())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().expect("establish thread panicked"))
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1, "exactly one caller must win the transition");
        assert!(state.is_connected());
    }
}
