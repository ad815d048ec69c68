//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Framed Binary)
//!
//! ### Frame Format
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────────────┐
//! │ Tag (1)  │ Len (4)  │ CRC (4)  │         Payload             │
//! └──────────┴──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: SEARCH   - Payload: target value
//! - 0x02: ADD      - Payload: values
//! - 0x03: UPDATE   - Payload: (index, value) records
//! - 0x04: DELETE   - Payload: indexes
//! - 0x05: RELOCATE - Payload: indexes
//! - 0x06: LEN      - Payload: empty
//! - 0x07: PING     - Payload: empty
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: OUT_OF_RANGE
//! - 0x02: ERROR

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Reply, Response, Status};
pub use codec::{encode_command, decode_command, encode_response, decode_response};
pub use codec::{read_command, write_command, read_response, write_response};
pub use codec::{HEADER_SIZE, MAX_PAYLOAD_SIZE};
