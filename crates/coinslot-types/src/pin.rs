//! PIN hashing.
//!
//! PINs are stored as unsalted SHA-256 hex digests. The PIN space is tiny,
//! so this is tamper evidence for the ledger files rather than real
//! cryptographic protection; the kiosk enforces access at the operation
//! layer.

use sha2::{Digest, Sha256};

/// Hash a PIN for storage.
pub fn hash_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a candidate PIN against a stored hash.
///
/// An empty stored hash means no PIN has been set; nothing verifies
/// against it.
pub fn verify_pin_hash(stored_hash: &str, pin: &str) -> bool {
    !stored_hash.is_empty() && stored_hash == hash_pin(pin)
}
