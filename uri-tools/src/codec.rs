//! Percent-encoding transforms.
//!
//! `encode` follows the "encode URI component" rule. `decode` tries an ordered
//! list of [`Strategy`] values and reports which one accepted the input.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::CodecError;

/// Every ASCII character except the unreserved set `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// URI-structural characters the full-URI strategy leaves escaped.
pub const RESERVED: &[u8] = b";,/?:@&=+$#";

/// Percent-encode `text`, leaving unreserved characters in place.
///
/// # Example
/// ```
/// use uri_tools::encode;
/// assert_eq!(encode("a b/ü"), "a%20b%2F%C3%BC");
/// assert_eq!(encode("(ok)!"), "(ok)!");
/// ```
pub fn encode(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Percent-encode UTF-16 code units as handed over by editor hosts.
///
/// # Returns
/// * `Err(CodecError::Encoding)` if `units` contains an unpaired surrogate
pub fn encode_utf16(units: &[u16]) -> Result<String, CodecError> {
    let text = char::decode_utf16(units.iter().copied())
        .collect::<Result<String, _>>()
        .map_err(|e| {
            CodecError::Encoding(format!(
                "URI malformed: unpaired surrogate 0x{:04X}",
                e.unpaired_surrogate()
            ))
        })?;
    Ok(encode(&text))
}

/// A way of decoding percent-escaped text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Every `%` must start a well-formed escape; all escapes are decoded
    Component,
    /// Reserved-character escapes and malformed `%` are kept as written
    FullUri,
}

impl Strategy {
    /// Strategies in the order `decode` tries them
    pub const ORDER: [Strategy; 2] = [Strategy::Component, Strategy::FullUri];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Component => "component",
            Strategy::FullUri => "full-uri",
        }
    }

    /// Decode `text` with this strategy alone
    pub fn decode(&self, text: &str) -> Result<String, CodecError> {
        match self {
            Strategy::Component => decode_component(text),
            Strategy::FullUri => decode_full_uri(text),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded text together with the strategy that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub strategy: Strategy,
}

/// Decode `text`, trying each strategy in [`Strategy::ORDER`].
///
/// The error of the first (strict) strategy is reported when all reject.
///
/// # Example
/// ```
/// use uri_tools::{decode_detailed, Strategy};
/// let decoded = decode_detailed("100% done").unwrap();
/// assert_eq!(decoded.text, "100% done");
/// assert_eq!(decoded.strategy, Strategy::FullUri);
/// ```
pub fn decode_detailed(text: &str) -> Result<Decoded, CodecError> {
    let mut first_error = None;
    for strategy in Strategy::ORDER {
        match strategy.decode(text) {
            Ok(decoded) => {
                return Ok(Decoded {
                    text: decoded,
                    strategy,
                });
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error
        .unwrap_or_else(|| CodecError::Decoding("no decoding strategy available".to_string())))
}

/// Decode percent-escaped `text`, strict first, then as a full URI.
///
/// # Example
/// ```
/// use uri_tools::decode;
/// assert_eq!(decode("a%20b%2F%C3%BC").unwrap(), "a b/ü");
/// assert!(decode("%FF").is_err());
/// ```
pub fn decode(text: &str) -> Result<String, CodecError> {
    decode_detailed(text).map(|d| d.text)
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// Value of the escape starting at `bytes[i]`, if it is a well-formed `%XX`
fn escape_at(bytes: &[u8], i: usize) -> Option<u8> {
    if bytes.get(i) != Some(&b'%') {
        return None;
    }
    let high = hex_value(*bytes.get(i + 1)?)?;
    let low = hex_value(*bytes.get(i + 2)?)?;
    Some((high << 4) | low)
}

fn decode_component(text: &str) -> Result<String, CodecError> {
    let bytes = text.as_bytes();
    if let Some(offset) = bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b'%' && escape_at(bytes, i).is_none())
        .map(|(i, _)| i)
    {
        return Err(CodecError::Decoding(format!(
            "URI malformed: invalid escape sequence at byte {}",
            offset
        )));
    }

    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| {
            CodecError::Decoding(format!(
                "URI malformed: escaped bytes are not valid UTF-8 (at decoded byte {})",
                e.valid_up_to()
            ))
        })
}

fn decode_full_uri(text: &str) -> Result<String, CodecError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match escape_at(bytes, i) {
            Some(value) if RESERVED.contains(&value) => {
                out.extend_from_slice(&bytes[i..i + 3]);
                i += 3;
            }
            Some(value) => {
                out.push(value);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|e| {
        CodecError::Decoding(format!(
            "URI malformed: escaped bytes are not valid UTF-8 (at decoded byte {})",
            e.utf8_error().valid_up_to()
        ))
    })
}

/// A named percent-encoding transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Encode,
    Decode,
}

impl Codec {
    /// Run this transform over `text`
    pub fn apply(&self, text: &str) -> Result<String, CodecError> {
        match self {
            Codec::Encode => Ok(encode(text)),
            Codec::Decode => decode(text),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Codec::Encode => "encode",
            Codec::Decode => "decode",
        }
    }
}
