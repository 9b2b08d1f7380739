//! Digest types.
//!
//! - [`Fingerprint`] - 32-byte accumulator root over a file's chunks
//! - [`FileKey`] - 32-byte identifier derived from a fingerprint and its metadata

mod file_key;
mod fingerprint;

pub use file_key::FileKey;
pub use fingerprint::Fingerprint;

/// Encodes bytes as lowercase hex.
fn encode_hex(bytes: &[u8; 32]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut result = String::with_capacity(64);
    for byte in bytes {
        result.push(HEX[(byte >> 4) as usize] as char);
        result.push(HEX[(byte & 0xf) as usize] as char);
    }
    result
}

/// Decodes exactly 64 hex characters.
fn decode_hex(hex_str: &str) -> Option<[u8; 32]> {
    if hex_str.len() != 64 || !hex_str.is_ascii() {
        return None;
    }
    let mut bytes = [0u8; 32];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex_str[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(bytes)
}
