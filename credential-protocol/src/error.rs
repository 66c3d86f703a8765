//! Protocol error types.

use thiserror::Error;

/// Errors raised while decoding a credential message.
///
/// Decoding is all-or-nothing: any of these aborts the request before a
/// backend is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid credential line: {0}")]
    MissingSeparator(String),

    #[error("invalid credential key: {0}")]
    UnknownKey(String),

    #[error("invalid UTF-8 in credential message")]
    InvalidUtf8,
}
