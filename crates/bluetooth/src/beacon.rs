//! Periodic ping notifier for the beacon firmware.
//!
//! While a peer is connected the beacon notifies `"ping <n>"` every two
//! seconds, fire-and-forget. The counter is monotonically increasing and
//! wraps at the width of `u32`; there is no reset.

use core::fmt::Write as _;

/// Notification interval.
pub const PING_PERIOD_MS: u64 = 2000;

/// Longest ping payload: `"ping "` + ten digits of `u32::MAX`.
pub const PING_MAX_LEN: usize = 15;

/// A single formatted ping payload.
pub type PingMessage = heapless::String<PING_MAX_LEN>;

/// Fixed-period counter notifier.
///
/// Pure timer arithmetic: the caller supplies a monotonic millisecond
/// timestamp and sends whatever comes back. Late polls (a busy loop
/// iteration, a long render) produce one ping and re-phase from the
/// scheduled deadline, not from the observed time, so the long-run rate
/// stays one ping per period.
pub struct PingBeacon {
    counter: u32,
    next_due_ms: Option<u64>,
}

impl PingBeacon {
    /// Create a beacon with nothing scheduled.
    pub fn new() -> Self {
        Self {
            counter: 0,
            next_due_ms: None,
        }
    }

    /// Start (or restart) the period from `now_ms`.
    ///
    /// Called on connect; the first ping fires one full period later.
    pub fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms.saturating_add(PING_PERIOD_MS));
    }

    /// Stop emitting until the next [`arm`](Self::arm).
    ///
    /// Called on disconnect. The counter is deliberately not reset.
    pub fn disarm(&mut self) {
        self.next_due_ms = None;
    }

    /// Produce the next ping if its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Option<PingMessage> {
        let due = self.next_due_ms?;
        if now_ms < due {
            return None;
        }

        self.counter = self.counter.wrapping_add(1);
        self.next_due_ms = Some(due.saturating_add(PING_PERIOD_MS));

        let mut msg: PingMessage = heapless::String::new();
        // 15 bytes always fit; a format error here is impossible.
        let _ = write!(msg, "ping {}", self.counter);
        Some(msg)
    }

    /// Value embedded in the most recent ping.
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }
}

impl Default for PingBeacon {
    fn default() -> Self {
        Self::new()
    }
}
