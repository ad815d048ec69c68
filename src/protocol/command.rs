//! Command definitions
//!
//! Represents requests from clients.

use crate::store::Record;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Search = 0x01,
    Add = 0x02,
    Update = 0x03,
    Delete = 0x04,
    Relocate = 0x05,
    Len = 0x06,
    Ping = 0x07,
}

impl CommandType {
    /// Parse a wire tag
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(CommandType::Search),
            0x02 => Some(CommandType::Add),
            0x03 => Some(CommandType::Update),
            0x04 => Some(CommandType::Delete),
            0x05 => Some(CommandType::Relocate),
            0x06 => Some(CommandType::Len),
            0x07 => Some(CommandType::Ping),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Find every record whose value equals `target`
    Search { target: i32 },

    /// Append values in order
    Add { values: Vec<i32> },

    /// Overwrite values at the given positions, in order
    Update { records: Vec<Record> },

    /// Remove values at the given positions
    Delete { indexes: Vec<i64> },

    /// Move values at the given positions to the end
    Relocate { indexes: Vec<i64> },

    /// Current number of values
    Len,

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Search { .. } => CommandType::Search,
            Command::Add { .. } => CommandType::Add,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
            Command::Relocate { .. } => CommandType::Relocate,
            Command::Len => CommandType::Len,
            Command::Ping => CommandType::Ping,
        }
    }

    /// Whether the command needs the exclusive write hold
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Update { .. }
                | Command::Delete { .. }
                | Command::Relocate { .. }
        )
    }
}
