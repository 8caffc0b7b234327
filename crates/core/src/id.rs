//! Identifier generation.
//!
//! Every stored row gets two server-generated identifiers:
//! - `id`: a UUIDv7, so ordering by id follows insertion time
//! - `sid`: a short URL-safe display id, e.g. `k3Xa_9Qz-`

use uuid::Uuid;

const SID_ALPHABET: &[u8; 64] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

/// Length of generated short ids.
pub const SID_LEN: usize = 9;

/// Generate a new primary key.
pub fn generate() -> Uuid {
    Uuid::now_v7()
}

/// Generate a short display id from fresh random bytes.
pub fn short_id() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    bytes
        .iter()
        .take(SID_LEN)
        .map(|b| SID_ALPHABET[(b & 0x3f) as usize] as char)
        .collect()
}

/// Parse a path or query identifier. Anything that is not a UUID cannot
/// name a stored row.
pub fn parse(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
