//! Internal utility functions and helpers.
//!
//! Shared by the accumulator and the mapped scanner so both apply the same
//! separator and decoding rules. Not part of the public API.

use crate::config::DecodePolicy;
use crate::error::LineError;
use crate::line::Line;

/// Line feed, the only separator byte.
pub(crate) const LF: u8 = b'\n';

/// Carriage return, stripped only when it ends a line.
pub(crate) const CR: u8 = b'\r';

/// Drops one trailing carriage return, if present.
pub(crate) fn trim_cr(bytes: &[u8]) -> &[u8] {
    match bytes.split_last() {
        Some((&CR, rest)) => rest,
        _ => bytes,
    }
}

/// Decodes the bytes of one line (separator already removed).
pub(crate) fn decode_line(
    bytes: &[u8],
    policy: DecodePolicy,
    number: u64,
    offset: u64,
) -> Result<Line, LineError> {
    let bytes = trim_cr(bytes);
    let text = match policy {
        DecodePolicy::Strict => std::str::from_utf8(bytes)
            .map_err(|source| LineError::Decode {
                line: number,
                offset,
                source,
            })?
            .to_owned(),
        DecodePolicy::Lossy => String::from_utf8_lossy(bytes).into_owned(),
    };

    Ok(Line::at(text, number, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_cr() {
        assert_eq!(trim_cr(b"a\r"), b"a");
        assert_eq!(trim_cr(b"a\r\r"), b"a\r");
        assert_eq!(trim_cr(b"\ra"), b"\ra");
        assert_eq!(trim_cr(b""), b"");
        assert_eq!(trim_cr(b"\r"), b"");
    }

    #[test]
    fn test_decode_strict_rejects_invalid() {
        let err = decode_line(b"ok\xffno", DecodePolicy::Strict, 4, 12).unwrap_err();
        assert!(matches!(err, LineError::Decode { line: 4, offset: 12, .. }));
    }

    #[test]
    fn test_decode_lossy_replaces_invalid() {
        let line = decode_line(b"ok\xff\r", DecodePolicy::Lossy, 1, 0).unwrap();
        assert_eq!(line.as_str(), "ok\u{fffd}");
    }
}
