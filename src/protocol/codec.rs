//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! Requests and responses share one frame layout:
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────────────┐
//! │ Tag (1)  │ Len (4)  │ CRC (4)  │      Payload (bincode)      │
//! └──────────┴──────────┴──────────┴─────────────────────────────┘
//! ```
//! The tag is a command type for requests and a status for responses.
//! The CRC32 covers the payload only.
//!
//! ### Payload by Command Type
//! - SEARCH:   i32
//! - ADD:      Vec<i32>
//! - UPDATE:   Vec<Record>
//! - DELETE:   Vec<i64>
//! - RELOCATE: Vec<i64>
//! - LEN:      empty
//! - PING:     empty
//!
//! ### Payload by Status
//! - OK:           Reply
//! - OUT_OF_RANGE: UTF-8 message
//! - ERROR:        UTF-8 message

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::store::Record;
use super::{Command, CommandType, Reply, Response, Status};

/// Header size: 1 byte tag + 4 bytes length + 4 bytes checksum
pub const HEADER_SIZE: usize = 9;

/// Maximum payload size (64 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

// =============================================================================
// Framing
// =============================================================================

/// Build a frame around an already encoded payload
fn encode_frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    frame.put_u8(tag);
    frame.put_u32(payload.len() as u32);
    frame.put_u32(crc32fast::hash(payload));
    frame.put_slice(payload);
    frame.to_vec()
}

/// Split the header off a complete frame and verify its payload
fn decode_frame(bytes: &[u8]) -> Result<(u8, &[u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(StoreError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let tag = header.get_u8();
    let payload_len = header.get_u32();
    let checksum = header.get_u32();

    check_payload_len(payload_len)?;

    let total_len = HEADER_SIZE + payload_len as usize;
    if bytes.len() < total_len {
        return Err(StoreError::Protocol(format!(
            "Incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let payload = &bytes[HEADER_SIZE..total_len];
    verify_checksum(payload, checksum)?;

    Ok((tag, payload))
}

/// Read one complete frame from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<(u8, Vec<u8>)> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let mut cursor = &header[..];
    let tag = cursor.get_u8();
    let payload_len = cursor.get_u32();
    let checksum = cursor.get_u32();

    check_payload_len(payload_len)?;

    let mut payload = vec![0u8; payload_len as usize];
    if payload_len > 0 {
        reader.read_exact(&mut payload)?;
    }
    verify_checksum(&payload, checksum)?;

    Ok((tag, payload))
}

fn check_payload_len(payload_len: u32) -> Result<()> {
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(StoreError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

fn verify_checksum(payload: &[u8], expected: u32) -> Result<()> {
    let actual = crc32fast::hash(payload);
    if actual != expected {
        return Err(StoreError::Protocol(format!(
            "Checksum mismatch: expected 0x{:08x}, got 0x{:08x}",
            expected, actual
        )));
    }
    Ok(())
}

fn encode_payload<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

fn decode_payload<T: DeserializeOwned>(payload: &[u8], what: &str) -> Result<T> {
    bincode::deserialize(payload)
        .map_err(|e| StoreError::Protocol(format!("{}: malformed payload: {}", what, e)))
}

fn expect_empty(payload: &[u8], what: &str) -> Result<()> {
    if !payload.is_empty() {
        return Err(StoreError::Protocol(format!(
            "{}: unexpected payload of {} bytes",
            what,
            payload.len()
        )));
    }
    Ok(())
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let payload = match command {
        Command::Search { target } => encode_payload(target)?,
        Command::Add { values } => encode_payload(values)?,
        Command::Update { records } => encode_payload(records)?,
        Command::Delete { indexes } | Command::Relocate { indexes } => encode_payload(indexes)?,
        Command::Len | Command::Ping => Vec::new(),
    };

    Ok(encode_frame(command.command_type() as u8, &payload))
}

/// Decode a command from a complete frame
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (tag, payload) = decode_frame(bytes)?;
    decode_command_payload(tag, payload)
}

fn decode_command_payload(tag: u8, payload: &[u8]) -> Result<Command> {
    let command_type = CommandType::from_u8(tag).ok_or_else(|| {
        StoreError::Protocol(format!("Unknown command type: 0x{:02x}", tag))
    })?;

    match command_type {
        CommandType::Search => Ok(Command::Search {
            target: decode_payload::<i32>(payload, "SEARCH command")?,
        }),
        CommandType::Add => Ok(Command::Add {
            values: decode_payload::<Vec<i32>>(payload, "ADD command")?,
        }),
        CommandType::Update => Ok(Command::Update {
            records: decode_payload::<Vec<Record>>(payload, "UPDATE command")?,
        }),
        CommandType::Delete => Ok(Command::Delete {
            indexes: decode_payload::<Vec<i64>>(payload, "DELETE command")?,
        }),
        CommandType::Relocate => Ok(Command::Relocate {
            indexes: decode_payload::<Vec<i64>>(payload, "RELOCATE command")?,
        }),
        CommandType::Len => {
            expect_empty(payload, "LEN command")?;
            Ok(Command::Len)
        }
        CommandType::Ping => {
            expect_empty(payload, "PING command")?;
            Ok(Command::Ping)
        }
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    let payload = match response {
        Response::Ok(reply) => encode_payload(reply)?,
        Response::OutOfRange(message) | Response::Error(message) => message.as_bytes().to_vec(),
    };

    Ok(encode_frame(response.status() as u8, &payload))
}

/// Decode a response from a complete frame
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (tag, payload) = decode_frame(bytes)?;
    decode_response_payload(tag, payload)
}

fn decode_response_payload(tag: u8, payload: &[u8]) -> Result<Response> {
    let message = || String::from_utf8_lossy(payload).into_owned();

    match tag {
        t if t == Status::Ok as u8 => Ok(Response::Ok(decode_payload::<Reply>(
            payload,
            "OK response",
        )?)),
        t if t == Status::OutOfRange as u8 => Ok(Response::OutOfRange(message())),
        t if t == Status::Error as u8 => Ok(Response::Error(message())),
        _ => Err(StoreError::Protocol(format!(
            "Unknown response status: 0x{:02x}",
            tag
        ))),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let (tag, payload) = read_frame(reader)?;
    decode_command_payload(tag, &payload)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let (tag, payload) = read_frame(reader)?;
    decode_response_payload(tag, &payload)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
