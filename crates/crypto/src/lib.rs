//! RSA decrypt boundary for the message panel.
//!
//! The panel's only cryptographic job is: load one PEM-encoded private key
//! at boot, then turn key-sized ciphertext blocks back into plaintext on
//! request. Everything else — padding internals, key mathematics — stays
//! inside the `rsa` crate. Callers see a single [`RsaVault`] handle and a
//! single error enum; no failure cause is distinguished beyond the variant's
//! diagnostic text, and none of it reaches the remote peer.
//!
//! The vault is immutable after construction and is expected to live for
//! the whole process. A vault without a key ([`RsaVault::disabled`]) is the
//! degraded mode the firmware runs in when the key file is missing or
//! unparseable: every decrypt attempt fails with
//! [`CryptoError::KeyUnavailable`] while the rest of the device carries on.
//!
//! This crate is `no_std` + `alloc` (RSA arithmetic allocates).

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

extern crate alloc;

pub mod vault;

pub use vault::{CryptoError, RsaVault, DECRYPT_BLOCK_LEN};
