//! Transport Framing
//!
//! Wraps codec bytes in a printable envelope so they survive a string-only
//! store.
//!
//! ## Envelope
//! ```text
//! ┌──────────────────────┬──────────────────────────────────┐
//! │ Tag  "▒v1▒"          │ Base64 (standard, padded) bytes  │
//! └──────────────────────┴──────────────────────────────────┘
//! ```
//!
//! The tag is `▒v<version>▒`. U+2592 rarely begins strings written by
//! unrelated code, which keeps plain values from being mistaken for framed
//! ones. Only [`FORMAT_VERSION`] is decodable; any other version is refused.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CodecError, Result};

/// Delimiter around the version marker
pub const TAG_MARK: char = '\u{2592}';

/// Current envelope version
pub const FORMAT_VERSION: u32 = 1;

/// Prefix of every payload written in the current format
pub const VARIANT_PREFIX: &str = "\u{2592}v1\u{2592}";

/// Longest version number accepted in a tag
const MAX_VERSION_DIGITS: usize = 9;

/// Tag + base64 of `bytes`
pub fn frame(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(VARIANT_PREFIX.len() + bytes.len().div_ceil(3) * 4);
    text.push_str(VARIANT_PREFIX);
    STANDARD.encode_string(bytes, &mut text);
    text
}

/// Strip and check the tag, then decode the base64 body
pub fn unframe(text: &str) -> Result<Vec<u8>> {
    let (version, body) = parse_tag(text)
        .ok_or_else(|| CodecError::Framing("missing format tag".to_string()))?;

    if version != FORMAT_VERSION {
        return Err(CodecError::Framing(format!(
            "unsupported format version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }

    STANDARD
        .decode(body)
        .map_err(|e| CodecError::Framing(format!("invalid base64 payload: {}", e)))
}

/// True if `text` carries a format tag of any version
pub fn is_framed(text: &str) -> bool {
    parse_tag(text).is_some()
}

/// Version number of the tag at the start of `text`, if any
pub fn tag_version(text: &str) -> Option<u32> {
    parse_tag(text).map(|(version, _)| version)
}

/// Split `▒v<digits>▒<body>` into (version, body); `<digits>` is canonical decimal
fn parse_tag(text: &str) -> Option<(u32, &str)> {
    let rest = text.strip_prefix(TAG_MARK)?.strip_prefix('v')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > MAX_VERSION_DIGITS {
        return None;
    }
    // Versions are written without leading zeros
    if digits > 1 && rest.starts_with('0') {
        return None;
    }
    let version = rest[..digits].parse().ok()?;
    let body = rest[digits..].strip_prefix(TAG_MARK)?;
    Some((version, body))
}
