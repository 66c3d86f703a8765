//! Helper commands.

use crate::error::HelperError;
use std::fmt;
use std::str::FromStr;

/// Operation requested by git, given as the helper's single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Retrieve,
    Store,
    Erase,
}

impl Command {
    /// Returns the command-line name of this command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Retrieve => "retrieve",
            Command::Store => "store",
            Command::Erase => "erase",
        }
    }
}

impl FromStr for Command {
    type Err = HelperError;

    /// Matches exactly; `Retrieve` or `get` are not accepted.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "retrieve" => Ok(Command::Retrieve),
            "store" => Ok(Command::Store),
            "erase" => Ok(Command::Erase),
            other => Err(HelperError::UnsupportedCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
