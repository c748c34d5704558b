// ── WireGuard key helpers ─────────────────────────────────────────────────────
//
// Keys travel as 44-character standard base64 strings in wg-quick files.
// No Win32 imports; pure Rust.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};

/// Length of a raw Curve25519 key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of a key in its base64 text form, including the `=` padding.
pub const KEY_BASE64_LEN: usize = 44;

/// A raw 32-byte WireGuard key (private, public or preshared).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

// Keys are secrets; never print the bytes.
impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key(..)")
    }
}

impl Key {
    /// Parse the base64 text form.  Anything that is not exactly 44
    /// characters of padded standard base64 decoding to 32 bytes is rejected.
    pub fn from_base64(text: &str) -> Option<Self> {
        if text.len() != KEY_BASE64_LEN || !text.ends_with('=') {
            return None;
        }
        let bytes = STANDARD.decode(text).ok()?;
        let raw: [u8; KEY_LEN] = bytes.try_into().ok()?;
        Some(Self(raw))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Derive the public key for this private key (X25519 scalar base
    /// multiplication; clamping happens inside `x25519`).
    pub fn public_key(&self) -> Key {
        Key(x25519(self.0, X25519_BASEPOINT_BYTES))
    }
}

impl From<[u8; KEY_LEN]> for Key {
    fn from(raw: [u8; KEY_LEN]) -> Self {
        Self(raw)
    }
}

/// Base64 public key for a base64 private key, or `None` if the private key
/// is malformed.  Used for the "Public key:" label next to the editor.
pub fn public_key_from_base64(private: &str) -> Option<String> {
    Key::from_base64(private).map(|k| k.public_key().to_base64())
}
