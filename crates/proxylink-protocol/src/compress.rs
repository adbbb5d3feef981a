//! Compressed-text fields.
//!
//! A compressed-text field is written as ordinary text, but its content
//! is `base64(deflate(escape(text)))`. The platform's color-escape
//! character `§` is replaced by a placeholder before compression:
//!
//! ```text
//! '%' → "%%"
//! '§' → "%S"
//! ```
//!
//! Doubling `%` keeps the substitution reversible for any input, even
//! text that already contains `%S`.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::ProtocolError;

/// The platform's color-escape character.
pub const COLOR_CHAR: char = '\u{00A7}';

const ESCAPE: char = '%';
const COLOR_PLACEHOLDER: char = 'S';

/// Compresses `text` into its Base64-armored wire form.
///
/// # Errors
/// Returns [`ProtocolError::Compression`] if the deflater fails.
pub fn compress(text: &str) -> Result<String, ProtocolError> {
    let escaped = escape(text);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(escaped.as_bytes())
        .map_err(ProtocolError::Compression)?;
    let deflated = encoder.finish().map_err(ProtocolError::Compression)?;

    Ok(BASE64.encode(deflated))
}

/// Reverses [`compress`].
///
/// # Errors
/// - [`ProtocolError::Base64`] if `armored` isn't Base64.
/// - [`ProtocolError::Compression`] if the bytes don't inflate.
/// - [`ProtocolError::InvalidUtf8`] if the inflated bytes aren't UTF-8.
pub fn decompress(armored: &str) -> Result<String, ProtocolError> {
    let deflated = BASE64.decode(armored)?;

    let mut inflated = Vec::new();
    ZlibDecoder::new(deflated.as_slice())
        .read_to_end(&mut inflated)
        .map_err(ProtocolError::Compression)?;

    Ok(unescape(&String::from_utf8(inflated)?))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ESCAPE => {
                out.push(ESCAPE);
                out.push(ESCAPE);
            }
            COLOR_CHAR => {
                out.push(ESCAPE);
                out.push(COLOR_PLACEHOLDER);
            }
            other => out.push(other),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(ESCAPE) => out.push(ESCAPE),
            Some(COLOR_PLACEHOLDER) => out.push(COLOR_CHAR),
            // Not produced by `escape`; keep the bytes as they came.
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) -> String {
        decompress(&compress(text).unwrap()).unwrap()
    }

    #[test]
    fn test_round_trip_empty() {
        assert_eq!(round_trip(""), "");
    }

    #[test]
    fn test_round_trip_single_char() {
        assert_eq!(round_trip("a"), "a");
        assert_eq!(round_trip("§"), "§");
    }

    #[test]
    fn test_round_trip_ten_thousand_chars() {
        let text: String = "§aHello, wörld! 100% ✓ "
            .chars()
            .cycle()
            .take(10_000)
            .collect();
        assert_eq!(text.chars().count(), 10_000);
        assert_eq!(round_trip(&text), text);
    }

    #[test]
    fn test_round_trip_text_containing_placeholder_literally() {
        let text = "%S is not §, and %% is not %";
        assert_eq!(round_trip(text), text);
    }

    #[test]
    fn test_compress_output_has_no_color_char() {
        let armored = compress("§c§lWARNING").unwrap();
        assert!(!armored.contains(COLOR_CHAR));
        assert!(armored.is_ascii());
    }

    #[test]
    fn test_compress_is_deterministic() {
        assert_eq!(compress("§ahello").unwrap(), compress("§ahello").unwrap());
    }

    #[test]
    fn test_compress_shrinks_repetitive_text() {
        let text = "spam ".repeat(2000);
        assert!(compress(&text).unwrap().len() < text.len() / 10);
    }

    #[test]
    fn test_escape_maps_color_char_and_percent() {
        assert_eq!(escape("§a50%"), "%Sa50%%");
        assert_eq!(unescape("%Sa50%%"), "§a50%");
    }

    #[test]
    fn test_decompress_invalid_base64_returns_error() {
        assert!(matches!(
            decompress("not base64!!"),
            Err(ProtocolError::Base64(_))
        ));
    }

    #[test]
    fn test_decompress_non_zlib_bytes_returns_error() {
        let armored = BASE64.encode(b"plain bytes, not deflated");
        assert!(matches!(
            decompress(&armored),
            Err(ProtocolError::Compression(_))
        ));
    }
}
