//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use recstore::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, CommandType, Reply, Response, Status,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
use recstore::{Record, StoreError};

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_commands() {
    let commands = vec![
        Command::Search { target: -17 },
        Command::Add {
            values: vec![1, 2, 3],
        },
        Command::Update {
            records: vec![Record::new(0, 9), Record::new(41, -2)],
        },
        Command::Delete {
            indexes: vec![3, 1],
        },
        Command::Relocate { indexes: vec![7] },
        Command::Len,
        Command::Ping,
    ];

    for command in commands {
        let encoded = encode_command(&command).unwrap();
        assert_eq!(decode_command(&encoded).unwrap(), command);
    }
}

#[test]
fn test_command_header_layout() {
    let encoded = encode_command(&Command::Ping).unwrap();

    assert_eq!(encoded.len(), HEADER_SIZE);
    assert_eq!(encoded[0], CommandType::Ping as u8);
    assert_eq!(&encoded[1..5], &0u32.to_be_bytes());
    assert_eq!(&encoded[5..9], &crc32fast::hash(&[]).to_be_bytes());
}

#[test]
fn test_command_payload_length_in_header() {
    let encoded = encode_command(&Command::Add {
        values: vec![5; 10],
    })
    .unwrap();

    let payload_len = u32::from_be_bytes([encoded[1], encoded[2], encoded[3], encoded[4]]);
    assert_eq!(payload_len as usize, encoded.len() - HEADER_SIZE);
}

#[test]
fn test_empty_batches() {
    for command in [
        Command::Add { values: vec![] },
        Command::Update { records: vec![] },
        Command::Delete { indexes: vec![] },
    ] {
        let encoded = encode_command(&command).unwrap();
        assert_eq!(decode_command(&encoded).unwrap(), command);
    }
}

#[test]
fn test_command_write_classification() {
    let writes = [
        Command::Add { values: vec![1] },
        Command::Update { records: vec![] },
        Command::Delete { indexes: vec![0] },
        Command::Relocate { indexes: vec![0] },
    ];
    let reads = [Command::Search { target: 1 }, Command::Len, Command::Ping];

    assert!(writes.iter().all(Command::is_write));
    assert!(!reads.iter().any(Command::is_write));
}

// =============================================================================
// Malformed Command Tests
// =============================================================================

#[test]
fn test_decode_incomplete_header() {
    let result = decode_command(&[0x01, 0x00]);
    assert!(matches!(result, Err(StoreError::Protocol(_))));
}

#[test]
fn test_decode_incomplete_payload() {
    let encoded = encode_command(&Command::Add {
        values: vec![1, 2, 3],
    })
    .unwrap();

    let result = decode_command(&encoded[..encoded.len() - 1]);
    assert!(matches!(result, Err(StoreError::Protocol(_))));
}

#[test]
fn test_decode_unknown_command_type() {
    let mut encoded = encode_command(&Command::Ping).unwrap();
    encoded[0] = 0x7f;

    let err = decode_command(&encoded).unwrap_err();
    assert!(err.to_string().contains("Unknown command type: 0x7f"));
}

#[test]
fn test_decode_checksum_mismatch() {
    let mut encoded = encode_command(&Command::Search { target: 5 }).unwrap();
    let last = encoded.len() - 1;
    encoded[last] ^= 0xff;

    let err = decode_command(&encoded).unwrap_err();
    assert!(err.to_string().contains("Checksum mismatch"));
}

#[test]
fn test_decode_payload_too_large() {
    let mut frame = vec![CommandType::Add as u8];
    frame.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());
    frame.extend_from_slice(&0u32.to_be_bytes());

    let err = decode_command(&frame).unwrap_err();
    assert!(err.to_string().contains("Payload too large"));
}

#[test]
fn test_decode_ping_with_payload_rejected() {
    let mut frame = encode_command(&Command::Search { target: 1 }).unwrap();
    frame[0] = CommandType::Ping as u8;

    let err = decode_command(&frame).unwrap_err();
    assert!(err.to_string().contains("PING command"));
}

#[test]
fn test_decode_truncated_search_payload() {
    // A valid frame whose payload is too short for an i32
    let payload = [0x01u8, 0x02];
    let mut frame = vec![CommandType::Search as u8];
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&crc32fast::hash(&payload).to_be_bytes());
    frame.extend_from_slice(&payload);

    let err = decode_command(&frame).unwrap_err();
    assert!(err.to_string().contains("SEARCH command"));
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_responses() {
    let responses = vec![
        Response::Ok(Reply::Ack),
        Response::Ok(Reply::Records(vec![Record::new(2, 5), Record::new(9, 5)])),
        Response::Ok(Reply::Records(vec![])),
        Response::Ok(Reply::Len(1_000_000)),
        Response::Ok(Reply::Pong),
        Response::OutOfRange("Index 9 out of range for sequence of length 3".to_string()),
        Response::Error("Lock poisoned: boom".to_string()),
    ];

    for response in responses {
        let encoded = encode_response(&response).unwrap();
        assert_eq!(encoded[0], response.status() as u8);
        assert_eq!(decode_response(&encoded).unwrap(), response);
    }
}

#[test]
fn test_decode_unknown_status() {
    let mut encoded = encode_response(&Response::Ok(Reply::Ack)).unwrap();
    encoded[0] = 0x09;

    let err = decode_response(&encoded).unwrap_err();
    assert!(err.to_string().contains("Unknown response status"));
}

#[test]
fn test_response_from_result() {
    let ok = Response::from_result(Ok(Reply::Pong));
    assert_eq!(ok.status(), Status::Ok);

    let range = Response::from_result(Err(StoreError::OutOfRange { index: 4, len: 2 }));
    assert_eq!(range.status(), Status::OutOfRange);

    let other = Response::from_result(Err(StoreError::LockPoisoned("x".to_string())));
    assert_eq!(other.status(), Status::Error);
}

#[test]
fn test_response_into_reply() {
    assert_eq!(Response::Ok(Reply::Len(3)).into_reply().unwrap(), Reply::Len(3));

    let err = Response::OutOfRange("Index 4 out of range".to_string())
        .into_reply()
        .unwrap_err();
    assert!(matches!(err, StoreError::Remote(ref m) if m.contains("Index 4")));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_write_read_command_stream() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, &Command::Search { target: 3 }).unwrap();
    write_command(&mut buffer, &Command::Delete { indexes: vec![2, 0] }).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(
        read_command(&mut cursor).unwrap(),
        Command::Search { target: 3 }
    );
    assert_eq!(
        read_command(&mut cursor).unwrap(),
        Command::Delete { indexes: vec![2, 0] }
    );
}

#[test]
fn test_read_command_eof() {
    let mut cursor = Cursor::new(Vec::<u8>::new());

    match read_command(&mut cursor) {
        Err(StoreError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

#[test]
fn test_write_read_response_stream() {
    let mut buffer = Vec::new();
    let response = Response::Ok(Reply::Records(vec![Record::new(0, 1)]));
    write_response(&mut buffer, &response).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_response(&mut cursor).unwrap(), response);
}
