//! GATT service identifiers and fixed protocol strings.
//!
//! One service, one characteristic with read + write + notify. The UUIDs
//! and strings here are the wire contract companion apps are built against;
//! changing any of them strands deployed clients.

/// 128-bit UUID of the message panel service.
pub const SERVICE_UUID: &str = "4fafc201-1fb5-459e-8fcc-c5c9c331914b";

/// 128-bit UUID of the inbox characteristic (read | write | notify).
pub const INBOX_UUID: &str = "beb5483e-36e1-4688-b7f5-ea07361b26a8";

/// Fixed acknowledgment written back and notified after every accepted write.
pub const WRITE_ACK: &str = "Received!";

/// Initial characteristic value when the RSA key loaded successfully.
pub const READY_SECURE: &str = "Ready for encrypted data";

/// Initial characteristic value when running without a key.
pub const READY_PLAIN: &str = "RSA not available - plain text only";

/// Upper bound on a stored inbox message.
///
/// Above anything a single ATT write can carry at our MTU; exists so the
/// buffer can live in a `heapless::Vec`.
pub const MAX_MESSAGE_LEN: usize = 512;

/// Width of the characteristic value as exposed over GATT.
///
/// One full ATT payload at the configured L2CAP MTU; acks and pings are
/// written zero-padded into this window.
pub const CHARACTERISTIC_LEN: usize = 247;

/// Parse a canonical hyphenated UUID string into its 16 big-endian bytes.
///
/// Used by tests to cross-check the literals embedded in the GATT macro
/// attributes against the constants above; returns `None` on any formatting
/// problem rather than panicking.
#[must_use]
pub fn parse_uuid(s: &str) -> Option<[u8; 16]> {
    let mut out = [0u8; 16];
    let mut idx = 0usize;
    let mut hi: Option<u8> = None;

    for ch in s.chars() {
        if ch == '-' {
            continue;
        }
        let nibble = ch.to_digit(16)? as u8;
        match hi.take() {
            None => hi = Some(nibble),
            Some(h) => {
                *out.get_mut(idx)? = h.wrapping_shl(4) | nibble;
                idx = idx.checked_add(1)?;
            }
        }
    }

    (idx == 16 && hi.is_none()).then_some(out)
}
