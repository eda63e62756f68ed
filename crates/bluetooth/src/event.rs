//! Events crossing from the link task to the application controller.

use crate::service::MAX_MESSAGE_LEN;

/// One observation made by the BLE link task, delivered over an Embassy
/// channel to the controller's scheduler tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A central connected.
    Connected {
        /// Peer Bluetooth address as reported by the stack.
        peer: [u8; 6],
    },
    /// The central went away (any reason; none are distinguished).
    Disconnected,
    /// The inbox characteristic was written. May be empty.
    InboxWrite(heapless::Vec<u8, MAX_MESSAGE_LEN>),
}

impl LinkEvent {
    /// Build an [`LinkEvent::InboxWrite`] from raw characteristic data,
    /// truncating at the message capacity.
    pub fn inbox_write(data: &[u8]) -> Self {
        let mut payload: heapless::Vec<u8, MAX_MESSAGE_LEN> = heapless::Vec::new();
        let take = data.len().min(MAX_MESSAGE_LEN);
        if let Some(head) = data.get(..take) {
            let _ = payload.extend_from_slice(head);
        }
        LinkEvent::InboxWrite(payload)
    }
}

#[cfg(test)]
#[allow(clippy::panic)] // match-arm assertions
mod tests {
    use super::LinkEvent;
    use crate::service::MAX_MESSAGE_LEN;

    #[test]
    fn test_inbox_write_preserves_payload() {
        let ev = LinkEvent::inbox_write(b"abc");
        match ev {
            LinkEvent::InboxWrite(payload) => assert_eq!(payload.as_slice(), b"abc"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_inbox_write_truncates_at_capacity() {
        let big = [0u8; MAX_MESSAGE_LEN + 1];
        let ev = LinkEvent::inbox_write(&big);
        match ev {
            LinkEvent::InboxWrite(payload) => assert_eq!(payload.len(), MAX_MESSAGE_LEN),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
