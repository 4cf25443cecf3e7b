//! Codec Tests
//!
//! Tests for command and response framing on the wire.

use std::io::Cursor;

use driftkv::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, Response, Status, MAX_PAYLOAD_SIZE,
};
use driftkv::DriftError;

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_wire_format_get() {
    let encoded = encode_command(&Command::Get { key: b"abc".to_vec() });

    assert_eq!(encoded, vec![0x01, 0, 0, 0, 7, 0, 0, 0, 3, b'a', b'b', b'c']);
}

#[test]
fn test_wire_format_put() {
    let encoded = encode_command(&Command::Put {
        key: b"k".to_vec(),
        value: b"vv".to_vec(),
    });

    assert_eq!(encoded, vec![0x02, 0, 0, 0, 7, 0, 0, 0, 1, b'k', b'v', b'v']);
}

#[test]
fn test_decode_put_with_empty_value() {
    let cmd = Command::Put {
        key: b"key".to_vec(),
        value: Vec::new(),
    };
    assert_eq!(decode_command(&encode_command(&cmd)).unwrap(), cmd);
}

#[test]
fn test_decode_ping() {
    assert_eq!(decode_command(&[0x04, 0, 0, 0, 0]).unwrap(), Command::Ping);
}

#[test]
fn test_delete_byte_is_unknown() {
    let err = decode_command(&[0x03, 0, 0, 0, 4, 0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, DriftError::Protocol(_)));
}

#[test]
fn test_get_with_trailing_bytes_rejected() {
    let bytes = [0x01, 0, 0, 0, 6, 0, 0, 0, 1, b'k', b'x'];
    assert!(matches!(decode_command(&bytes), Err(DriftError::Protocol(_))));
}

#[test]
fn test_key_length_past_payload_rejected() {
    let bytes = [0x02, 0, 0, 0, 5, 0, 0, 0, 9, b'k'];
    assert!(matches!(decode_command(&bytes), Err(DriftError::Protocol(_))));
}

#[test]
fn test_incomplete_header() {
    assert!(matches!(decode_command(&[0x01, 0]), Err(DriftError::Protocol(_))));
}

#[test]
fn test_incomplete_payload() {
    assert!(matches!(
        decode_command(&[0x01, 0, 0, 0, 10, 0, 0]),
        Err(DriftError::Protocol(_))
    ));
}

#[test]
fn test_ping_with_unexpected_payload() {
    assert!(matches!(
        decode_command(&[0x04, 0, 0, 0, 1, 0xff]),
        Err(DriftError::Protocol(_))
    ));
}

#[test]
fn test_oversized_frame_rejected_before_reading_payload() {
    let mut header = vec![0x02];
    header.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());
    let mut cursor = Cursor::new(header);

    assert!(matches!(read_command(&mut cursor), Err(DriftError::Protocol(_))));
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_wire_format_response_ok() {
    let encoded = encode_response(&Response::ok(Some(b"hi".to_vec())));
    assert_eq!(encoded, vec![0x00, 0, 0, 0, 2, b'h', b'i']);
}

#[test]
fn test_response_not_found() {
    let decoded = decode_response(&encode_response(&Response::not_found())).unwrap();
    assert_eq!(decoded.status, Status::NotFound);
    assert_eq!(decoded.payload, None);
}

#[test]
fn test_empty_payload_decodes_as_none() {
    let decoded = decode_response(&encode_response(&Response::ok(Some(Vec::new())))).unwrap();
    assert_eq!(decoded, Response::ok(None));
}

#[test]
fn test_unknown_response_status() {
    assert!(matches!(
        decode_response(&[0x09, 0, 0, 0, 0]),
        Err(DriftError::Protocol(_))
    ));
}

#[test]
fn test_from_result_maps_not_found() {
    assert_eq!(
        Response::from_result(Err(DriftError::KeyNotFound)).status,
        Status::NotFound
    );
    assert_eq!(
        Response::from_result(Ok(Some(b"v".to_vec()))),
        Response::ok(Some(b"v".to_vec()))
    );

    let err = Response::from_result(Err(DriftError::Config("bad".to_string())));
    assert_eq!(err.status, Status::Error);
}

#[test]
fn test_into_result() {
    assert!(Response::not_found().into_result().unwrap_err().is_not_found());
    match Response::error("disk full").into_result() {
        Err(DriftError::Network(message)) => assert_eq!(message, "disk full"),
        other => panic!("expected network error, got {:?}", other),
    }
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_stream_multiple_commands() {
    let commands = vec![
        Command::Put {
            key: b"a".to_vec(),
            value: b"1".to_vec(),
        },
        Command::Get { key: b"a".to_vec() },
        Command::Ping,
    ];

    let mut buffer = Vec::new();
    for cmd in &commands {
        write_command(&mut buffer, cmd).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &commands {
        assert_eq!(&read_command(&mut cursor).unwrap(), expected);
    }

    // Clean end of stream surfaces as an I/O error the server treats as disconnect
    match read_command(&mut cursor) {
        Err(DriftError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected EOF, got {:?}", other),
    }
}

#[test]
fn test_stream_response() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::error("oops")).unwrap();

    let decoded = read_response(&mut Cursor::new(buffer)).unwrap();
    assert_eq!(decoded, Response::error("oops"));
}

#[test]
fn test_command_key_accessor() {
    let put = Command::Put {
        key: b"k".to_vec(),
        value: b"v".to_vec(),
    };
    assert_eq!(put.key(), Some(&b"k"[..]));
    assert_eq!(Command::Ping.key(), None);
}
