//! # credential-protocol
//!
//! Wire protocol used between git and a credential helper.
//!
//! This crate provides:
//! - The six-field credential [`Message`] and its closed [`Field`] vocabulary
//! - Decoding of newline-separated `key=value` request bodies
//! - Deterministic encoding of responses
//! - Protocol error types

pub mod codec;
pub mod error;
pub mod message;

pub use codec::{decode, decode_raw, decode_str, encode};
pub use error::ProtocolError;
pub use message::{Field, Message};

/// Separator between a key and its value on a single line.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Terminator of every line in a message.
pub const LINE_TERMINATOR: char = '\n';
