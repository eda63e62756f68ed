//! Application configuration and constants
//!
//! Central naming and identity values used across the workspace. Branding
//! and advertised identifiers reference these constants rather than
//! hardcoding strings at the call site.

/// The application name
pub const APP_NAME: &str = "BLE Message Panel";

/// Name the peripheral advertises itself under.
///
/// This string is part of the wire contract: companion apps scan for it.
pub const DEVICE_NAME: &str = "M5Stack-BLE";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path of the PEM-encoded RSA private key on the SD card.
pub const KEY_FILE_PATH: &str = "private.pem";

/// Full application title
pub const fn app_title() -> &'static str {
    APP_NAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_fits_scan_response() {
        // Complete Local Name AD structure: 2 bytes overhead in a 31-byte PDU.
        assert!(DEVICE_NAME.len() <= 29);
    }

    #[test]
    fn test_key_path_is_bare_filename() {
        // embedded-sdmmc opens files relative to the root directory handle;
        // a leading slash would be treated as part of the name.
        assert!(!KEY_FILE_PATH.starts_with('/'));
    }
}
