//! Encoder and decoder for the `key=value` line format.
//!
//! A message is a sequence of lines, each `key=value\n`. Empty lines are
//! ignored, the first `=` splits key from value, and a key repeated later in
//! the body overrides the earlier value.

use crate::error::ProtocolError;
use crate::message::{Field, Message};
use crate::{KEY_VALUE_SEPARATOR, LINE_TERMINATOR};
use std::collections::BTreeMap;

/// Splits a request body into raw key/value pairs without interpreting keys.
pub fn decode_raw(src: &str) -> Result<BTreeMap<&str, &str>, ProtocolError> {
    let mut pairs = BTreeMap::new();

    for line in src.split(LINE_TERMINATOR) {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(KEY_VALUE_SEPARATOR)
            .ok_or_else(|| ProtocolError::MissingSeparator(line.to_string()))?;
        pairs.insert(key, value);
    }

    Ok(pairs)
}

/// Decodes a request body held in a string.
pub fn decode_str(src: &str) -> Result<Message, ProtocolError> {
    let mut message = Message::new();
    for (key, value) in decode_raw(src)? {
        let field: Field = key.parse()?;
        message.set(field, value);
    }
    Ok(message)
}

/// Decodes a complete request body.
pub fn decode(src: &[u8]) -> Result<Message, ProtocolError> {
    let text = std::str::from_utf8(src).map_err(|_| ProtocolError::InvalidUtf8)?;
    decode_str(text)
}

/// Encodes a message. Absent fields are omitted; present fields always appear
/// in [`Field::ALL`] order.
pub fn encode(message: &Message) -> String {
    let mut out = String::new();
    for (field, value) in message.present_fields() {
        out.push_str(field.as_str());
        out.push(KEY_VALUE_SEPARATOR);
        out.push_str(value);
        out.push(LINE_TERMINATOR);
    }
    out
}
