//! Inbox write handler — the payload side of the characteristic.
//!
//! Stores the most recent write and a running count. No payload structure
//! is validated and no length is enforced beyond the buffer capacity; the
//! remote peer owns the framing.

use crate::service::{MAX_MESSAGE_LEN, WRITE_ACK};

/// Outcome of an accepted (non-empty) write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    /// Acknowledgment string to write back and notify.
    pub ack: &'static str,
}

/// The most recently written payload plus a write counter.
///
/// Overwritten on each write, never cleared individually; lives for the
/// whole process like the rest of the link state.
pub struct MessageLog {
    last: heapless::Vec<u8, MAX_MESSAGE_LEN>,
    count: u32,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            last: heapless::Vec::new(),
            count: 0,
        }
    }

    /// Record one characteristic write.
    ///
    /// Empty payloads are a logged no-op: `None` is returned, nothing is
    /// stored and the counter is untouched. Non-empty payloads replace the
    /// stored message (truncated only at the unreachable-in-practice buffer
    /// capacity), bump the counter by exactly one, and yield the fixed ack.
    pub fn record(&mut self, payload: &[u8]) -> Option<Accepted> {
        if payload.is_empty() {
            return None;
        }

        self.last.clear();
        let take = payload.len().min(MAX_MESSAGE_LEN);
        if let Some(head) = payload.get(..take) {
            // Capacity == take, cannot fail; ignore the impossible error.
            let _ = self.last.extend_from_slice(head);
        }
        self.count = self.count.wrapping_add(1);

        Some(Accepted { ack: WRITE_ACK })
    }

    /// Number of accepted writes so far.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Raw bytes of the most recent message.
    #[must_use]
    pub fn last_bytes(&self) -> &[u8] {
        &self.last
    }

    /// The most recent message as text, if it is valid UTF-8.
    #[must_use]
    pub fn last_text(&self) -> Option<&str> {
        core::str::from_utf8(&self.last).ok()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // readable assertions
mod tests {
    use super::MessageLog;
    use crate::service::MAX_MESSAGE_LEN;

    #[test]
    fn test_log_starts_empty() {
        let log = MessageLog::new();
        assert_eq!(log.count(), 0);
        assert_eq!(log.last_bytes(), b"");
    }

    #[test]
    fn test_write_stores_payload_and_acks() {
        let mut log = MessageLog::new();
        let accepted = log.record(b"hello panel").unwrap();
        assert_eq!(accepted.ack, "Received!");
        assert_eq!(log.count(), 1);
        assert_eq!(log.last_text(), Some("hello panel"));
    }

    #[test]
    fn test_each_write_counts_exactly_once() {
        let mut log = MessageLog::new();
        for i in 0..5u32 {
            assert_eq!(log.count(), i);
            log.record(b"x").unwrap();
        }
        assert_eq!(log.count(), 5);
    }

    #[test]
    fn test_empty_write_is_a_no_op() {
        let mut log = MessageLog::new();
        log.record(b"first").unwrap();
        assert!(log.record(b"").is_none());
        assert_eq!(log.count(), 1);
        assert_eq!(log.last_text(), Some("first"));
    }

    #[test]
    fn test_later_write_overwrites_earlier() {
        let mut log = MessageLog::new();
        log.record(b"one").unwrap();
        log.record(b"two").unwrap();
        assert_eq!(log.last_text(), Some("two"));
        assert_eq!(log.count(), 2);
    }

    #[test]
    fn test_binary_payload_is_kept_but_not_text() {
        let mut log = MessageLog::new();
        log.record(&[0xFF, 0x00, 0xAB]).unwrap();
        assert_eq!(log.last_text(), None);
        assert_eq!(log.last_bytes(), &[0xFF, 0x00, 0xAB]);
    }

    #[test]
    fn test_oversized_payload_truncates_at_capacity() {
        let mut log = MessageLog::new();
        let big = [b'a'; MAX_MESSAGE_LEN + 32];
        log.record(&big).unwrap();
        assert_eq!(log.last_bytes().len(), MAX_MESSAGE_LEN);
        assert_eq!(log.count(), 1);
    }
}
