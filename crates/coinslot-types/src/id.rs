//! Identifier and PIN generation.
//!
//! Session ids, card/wallet ids, and PINs are drawn from disjoint-enough
//! shapes that they cannot be confused at the kiosk: sessions are
//! `S`-prefixed hex, card and PIN wallet ids are 6 keypad characters, PINs
//! are 6 decimal digits. Uniqueness is only enforced per collection, by the
//! store.

use rand::Rng;

use crate::constants::{
    PIN_MAX, PIN_MIN, SESSION_ID_HEX_LENGTH, SESSION_ID_PREFIX, WALLET_ID_ALPHABET,
    WALLET_ID_LENGTH,
};

const HEX_UPPER: &[u8] = b"0123456789ABCDEF";

/// Generate a fresh session id, e.g. `S3F09A1CC`.
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(1 + SESSION_ID_HEX_LENGTH);
    id.push(SESSION_ID_PREFIX);
    for _ in 0..SESSION_ID_HEX_LENGTH {
        id.push(HEX_UPPER[rng.gen_range(0..HEX_UPPER.len())] as char);
    }
    id
}

/// Generate a card/PIN-wallet id from the keypad alphabet, e.g. `A1B2C3`.
///
/// Collisions are possible; callers that require uniqueness check against
/// the owning collection and redraw.
pub fn generate_wallet_id() -> String {
    let mut rng = rand::thread_rng();
    (0..WALLET_ID_LENGTH)
        .map(|_| WALLET_ID_ALPHABET[rng.gen_range(0..WALLET_ID_ALPHABET.len())] as char)
        .collect()
}

/// Generate a 6-digit numeric PIN.
pub fn generate_pin() -> String {
    let mut rng = rand::thread_rng();
    rng.gen_range(PIN_MIN..PIN_MAX).to_string()
}
