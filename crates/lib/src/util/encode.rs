//! Percent-encoding of list keys in resource paths.
//!
//! Key values are encoded so that any byte outside the URI unreserved set
//! (`ALPHA / DIGIT / "-" / "." / "_" / "~"`) becomes `%XX`. This keeps `/`,
//! `=` and `,` inside an identity from being read as path structure.

use std::fmt::Write;

fn is_unreserved(byte: u8) -> bool {
  byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Encode a key value for use as a path segment.
pub fn encode_key(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for &byte in value.as_bytes() {
    if is_unreserved(byte) {
      out.push(byte as char);
    } else {
      let _ = write!(out, "%{:02X}", byte);
    }
  }
  out
}

/// Decode a percent-encoded key value.
///
/// Returns `None` for malformed escapes or if the result is not UTF-8.
pub fn decode_key(value: &str) -> Option<String> {
  let bytes = value.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%' {
      let hex = value.get(i + 1..i + 3)?;
      out.push(u8::from_str_radix(hex, 16).ok()?);
      i += 3;
    } else {
      out.push(bytes[i]);
      i += 1;
    }
  }
  String::from_utf8(out).ok()
}
