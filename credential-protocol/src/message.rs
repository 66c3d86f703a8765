//! Credential message model.

use crate::error::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// Keys understood by the credential protocol.
///
/// The set is closed: decoding rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Protocol,
    Host,
    Path,
    Username,
    Password,
    Url,
}

impl Field {
    /// Every field, in wire order.
    pub const ALL: [Field; 6] = [
        Field::Protocol,
        Field::Host,
        Field::Path,
        Field::Username,
        Field::Password,
        Field::Url,
    ];

    /// Returns the key used for this field on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Protocol => "protocol",
            Field::Host => "host",
            Field::Path => "path",
            Field::Username => "username",
            Field::Password => "password",
            Field::Url => "url",
        }
    }
}

impl FromStr for Field {
    type Err = ProtocolError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "protocol" => Ok(Field::Protocol),
            "host" => Ok(Field::Host),
            "path" => Ok(Field::Path),
            "username" => Ok(Field::Username),
            "password" => Ok(Field::Password),
            "url" => Ok(Field::Url),
            other => Err(ProtocolError::UnknownKey(other.to_string())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single credential request or response.
///
/// An empty string means the field is absent; there is no way to carry an
/// explicitly empty value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Scheme, e.g. `https`.
    pub protocol: String,
    pub host: String,
    pub path: String,
    pub username: String,
    pub password: String,
    /// Full URL, as an alternative to protocol/host/path.
    pub url: String,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the value of a field (empty if absent).
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Protocol => &self.protocol,
            Field::Host => &self.host,
            Field::Path => &self.path,
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::Url => &self.url,
        }
    }

    /// Sets the value of a field. An empty value clears it.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Protocol => &mut self.protocol,
            Field::Host => &mut self.host,
            Field::Path => &mut self.path,
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::Url => &mut self.url,
        };
        *slot = value.into();
    }

    /// Returns whether a field carries a value.
    pub fn has(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    /// Returns whether no field carries a value.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| !self.has(*field))
    }

    /// Iterates over the present fields in wire order.
    pub fn present_fields(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
            .filter(|(_, value)| !value.is_empty())
    }
}

// Hand-written so a password never ends up in logs.
impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() {
            ""
        } else {
            "[REDACTED]"
        };
        f.debug_struct("Message")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("path", &self.path)
            .field("username", &self.username)
            .field("password", &password)
            .field("url", &self.url)
            .finish()
    }
}
