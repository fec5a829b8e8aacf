//! Payload encoding: image bytes → base64 [`CanonicalPayload`].
//!
//! VLM APIs accept images as base64 strings embedded in the JSON request
//! body. The payload carries pure base64 — no `data:` URI scheme prefix —
//! since the provider layer adds whatever framing its wire format needs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// The normalized unit handed to the analysis client.
///
/// Created once per upload, immutable after creation, never persisted.
#[derive(Debug, Clone)]
pub struct CanonicalPayload {
    /// Base64 of the image bytes. Always pure payload, never a data URI.
    pub encoded_data: String,
    /// Output media type. Always starts with `image/`.
    pub mime_type: String,
    /// Display name of the originating file, carried through unmodified.
    pub name: String,
}

/// Base64-encode image bytes into a [`CanonicalPayload`].
pub fn encode_payload(
    bytes: &[u8],
    mime_type: impl Into<String>,
    name: impl Into<String>,
) -> CanonicalPayload {
    let encoded_data = STANDARD.encode(bytes);
    debug!("Encoded payload → {} bytes base64", encoded_data.len());

    CanonicalPayload {
        encoded_data,
        mime_type: mime_type.into(),
        name: name.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_pure_base64() {
        let payload = encode_payload(b"\x89PNG\r\n", "image/png", "post.png");
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.name, "post.png");

        // Valid base64, decodes back to the original bytes.
        let decoded = STANDARD.decode(&payload.encoded_data).expect("valid base64");
        assert_eq!(decoded, b"\x89PNG\r\n");

        // Never a data URI.
        assert!(!payload.encoded_data.starts_with("data:"));
        assert!(!payload.encoded_data.contains(','));
    }
}
