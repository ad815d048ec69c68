//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::store::Record;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    OutOfRange = 0x01,
    Error = 0x02,
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    /// Write applied, nothing to return
    Ack,

    /// Search matches, index-ascending
    Records(Vec<Record>),

    /// Sequence length
    Len(u64),

    /// Answer to ping
    Pong,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok(Reply),

    /// A batch referenced a position outside the sequence
    OutOfRange(String),

    Error(String),
}

impl Response {
    /// Map a command result onto a response
    pub fn from_result(result: Result<Reply>) -> Self {
        match result {
            Ok(reply) => Response::Ok(reply),
            Err(e @ StoreError::OutOfRange { .. }) => Response::OutOfRange(e.to_string()),
            Err(e) => Response::Error(e.to_string()),
        }
    }

    /// Get the status code
    pub fn status(&self) -> Status {
        match self {
            Response::Ok(_) => Status::Ok,
            Response::OutOfRange(_) => Status::OutOfRange,
            Response::Error(_) => Status::Error,
        }
    }

    /// Turn an error status back into an error on the client side
    pub fn into_reply(self) -> Result<Reply> {
        match self {
            Response::Ok(reply) => Ok(reply),
            Response::OutOfRange(message) | Response::Error(message) => {
                Err(StoreError::Remote(message))
            }
        }
    }
}
