//! Framing Tests
//!
//! Tests for the printable envelope around codec bytes.

use variantkv::framing::{frame, is_framed, tag_version, unframe, FORMAT_VERSION, VARIANT_PREFIX};
use variantkv::CodecError;

fn assert_framing_error(text: &str) -> String {
    match unframe(text) {
        Err(CodecError::Framing(message)) => message,
        other => panic!("Expected framing failure for {:?}, got {:?}", text, other),
    }
}

// =============================================================================
// Frame / Unframe Tests
// =============================================================================

#[test]
fn test_frame_prefix_and_base64() {
    assert_eq!(VARIANT_PREFIX, "\u{2592}v1\u{2592}");
    assert_eq!(frame(b"foo"), "\u{2592}v1\u{2592}Zm9v");
    assert_eq!(frame(b"fo"), "\u{2592}v1\u{2592}Zm8=");
    assert_eq!(frame(&[]), VARIANT_PREFIX);
}

#[test]
fn test_unframe_inverts_frame() {
    let payloads: Vec<Vec<u8>> = vec![
        vec![],
        vec![0x00],
        b"hello".to_vec(),
        (0..=255).collect(),
    ];

    for payload in payloads {
        assert_eq!(unframe(&frame(&payload)).unwrap(), payload);
    }
}

#[test]
fn test_frame_output_is_printable() {
    let text = frame(&(0..=255).collect::<Vec<u8>>());
    let body = text.strip_prefix(VARIANT_PREFIX).unwrap();
    assert!(body
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_unframe_missing_tag() {
    assert_framing_error("Zm9v");
    assert_framing_error("");
    assert_framing_error("\u{2592}v1");
    assert_framing_error("\u{2592}vx\u{2592}Zm9v");
    assert_framing_error("v1\u{2592}Zm9v");
}

#[test]
fn test_unframe_unknown_version() {
    let message = assert_framing_error("\u{2592}v2\u{2592}Zm9v");
    assert!(message.contains("version 2"), "{}", message);

    assert_framing_error("\u{2592}v0\u{2592}");
    assert_framing_error("\u{2592}v10\u{2592}Zm9v");
}

#[test]
fn test_unframe_invalid_base64() {
    assert_framing_error("\u{2592}v1\u{2592}C/");
    assert_framing_error("\u{2592}v1\u{2592}Zm9v!");
    assert_framing_error("\u{2592}v1\u{2592}Zm8");
}

// =============================================================================
// Tag Detection Tests
// =============================================================================

#[test]
fn test_is_framed() {
    assert!(is_framed(&frame(b"foo")));
    assert!(is_framed("\u{2592}v1\u{2592}"));
    assert!(is_framed("\u{2592}v99\u{2592}anything"));

    assert!(!is_framed("bar"));
    assert!(!is_framed("Zm9v"));
    assert!(!is_framed(""));
    assert!(!is_framed("\u{2592}"));
    assert!(!is_framed("\u{2592}v\u{2592}"));
    assert!(!is_framed("\u{2592}v1"));
    assert!(!is_framed(" \u{2592}v1\u{2592}"));
}

#[test]
fn test_tag_version() {
    assert_eq!(tag_version(&frame(b"")), Some(FORMAT_VERSION));
    assert_eq!(tag_version("\u{2592}v42\u{2592}x"), Some(42));
    assert_eq!(tag_version("plain"), None);
}

#[test]
fn test_version_with_leading_zero_is_not_a_tag() {
    assert!(!is_framed("\u{2592}v01\u{2592}Zm9v"));
    assert!(!is_framed("\u{2592}v001\u{2592}"));
    assert_eq!(tag_version("\u{2592}v01\u{2592}Zm9v"), None);
    assert_framing_error("\u{2592}v01\u{2592}Zm9v");

    // A lone zero is still a well-formed (unsupported) version
    assert_eq!(tag_version("\u{2592}v0\u{2592}"), Some(0));
}
