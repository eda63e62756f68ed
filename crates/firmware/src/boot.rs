//! Boot sequence: staged status display and key loading.
//!
//! Boot walks a fixed set of steps, painting each label to the boot screen
//! and logging it. Every storage or key failure is non-fatal: the firmware
//! downgrades to plain-text mode, shows `RSA: Disabled`, and keeps going.
//! Only a radio init failure is terminal (red screen, no recovery path).

use crypto::RsaVault;
use platform::storage::{read_to_vec, Storage, StorageError};
use ui::RsaBadge;

/// Upper bound on the key file. A 4096-bit PKCS#8 PEM is under 4 KiB;
/// anything bigger is not our key.
pub const KEY_FILE_MAX: usize = 4096;

/// The ordered boot steps, each with the label painted on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStep {
    /// Power-on banner.
    Starting,
    /// Mounting the SD card.
    Filesystem,
    /// Loading and parsing the private key.
    Rsa,
    /// Bringing up the radio and GATT server.
    Radio,
    /// Advertising started.
    Advertising,
    /// Fully up.
    Ready,
}

impl BootStep {
    /// Label painted on the boot screen for this step.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BootStep::Starting => "Starting...",
            BootStep::Filesystem => "Init FS...",
            BootStep::Rsa => "Init RSA...",
            BootStep::Radio => "Init BLE...",
            BootStep::Advertising => "Advertising...",
            BootStep::Ready => "BLE Ready!",
        }
    }
}

/// How the key load went. Everything except `Loaded` leaves the vault
/// disabled and the firmware in plain-text mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLoadOutcome {
    /// Key parsed; decrypt available.
    Loaded,
    /// The card never mounted (reported by the binary, not this module).
    MountFailed,
    /// No key file on the card.
    Missing,
    /// The file exists but could not be read in full.
    Unreadable,
    /// The bytes are not a parseable PEM private key.
    ParseFailed,
}

impl KeyLoadOutcome {
    /// Badge shown on every subsequent screen.
    #[must_use]
    pub fn badge(self) -> RsaBadge {
        match self {
            KeyLoadOutcome::Loaded => RsaBadge::Enabled,
            _ => RsaBadge::Disabled,
        }
    }

    /// One-line summary for the boot log.
    #[must_use]
    pub fn log_line(self) -> &'static str {
        match self {
            KeyLoadOutcome::Loaded => "RSA private key loaded successfully",
            KeyLoadOutcome::MountFailed => "filesystem mount failed - RSA disabled",
            KeyLoadOutcome::Missing => "private.pem not found - RSA disabled",
            KeyLoadOutcome::Unreadable => "failed to read private.pem - RSA disabled",
            KeyLoadOutcome::ParseFailed => "failed to parse private key - RSA disabled",
        }
    }
}

/// Load the RSA vault from `private.pem` on the given storage.
///
/// Never fails: every problem maps to a disabled vault plus the outcome
/// that says why, so the caller can log and badge accordingly.
pub async fn load_vault<S: Storage>(storage: &mut S) -> (RsaVault, KeyLoadOutcome) {
    let path = platform::config::KEY_FILE_PATH;

    match storage.exists(path).await {
        Ok(true) => {}
        Ok(false) => return (RsaVault::disabled(), KeyLoadOutcome::Missing),
        Err(_) => return (RsaVault::disabled(), KeyLoadOutcome::Unreadable),
    }

    let mut file = match storage.open_file(path).await {
        Ok(file) => file,
        Err(_) => return (RsaVault::disabled(), KeyLoadOutcome::Unreadable),
    };

    let bytes: heapless::Vec<u8, KEY_FILE_MAX> = match read_to_vec(&mut file).await {
        Ok(bytes) => bytes,
        Err(StorageError::TooLarge | StorageError::Io) => {
            return (RsaVault::disabled(), KeyLoadOutcome::Unreadable)
        }
    };

    let pem = match core::str::from_utf8(&bytes) {
        Ok(pem) => pem,
        Err(_) => return (RsaVault::disabled(), KeyLoadOutcome::ParseFailed),
    };

    match RsaVault::from_pem(pem) {
        Ok(vault) => (vault, KeyLoadOutcome::Loaded),
        Err(_) => (RsaVault::disabled(), KeyLoadOutcome::ParseFailed),
    }
}

/// Log the root-directory listing, mirroring the boot diagnostic of the
/// shipped device. Failures are swallowed; this is best-effort telemetry.
pub async fn log_file_listing<S: Storage>(storage: &mut S) {
    log::info!("Files in filesystem:");
    let result = storage
        .list_root(&mut |name, size| log::info!("  - {name} ({size} bytes)"))
        .await;
    if result.is_err() {
        log::warn!("directory listing failed");
    }
}

#[cfg(test)]
mod tests {
    use super::{BootStep, KeyLoadOutcome};
    use ui::RsaBadge;

    #[test]
    fn test_boot_step_labels() {
        assert_eq!(BootStep::Starting.label(), "Starting...");
        assert_eq!(BootStep::Filesystem.label(), "Init FS...");
        assert_eq!(BootStep::Rsa.label(), "Init RSA...");
        assert_eq!(BootStep::Radio.label(), "Init BLE...");
        assert_eq!(BootStep::Advertising.label(), "Advertising...");
        assert_eq!(BootStep::Ready.label(), "BLE Ready!");
    }

    #[test]
    fn test_only_loaded_outcome_enables_the_badge() {
        assert_eq!(KeyLoadOutcome::Loaded.badge(), RsaBadge::Enabled);
        for outcome in [
            KeyLoadOutcome::MountFailed,
            KeyLoadOutcome::Missing,
            KeyLoadOutcome::Unreadable,
            KeyLoadOutcome::ParseFailed,
        ] {
            assert_eq!(outcome.badge(), RsaBadge::Disabled);
        }
    }
}
