use base64ct::{Base64, Encoding};
use bbs::models::{CellPresence, Task};
use bbs::{Cryptor, ErrorKind, FixedEntropy, Key, KeyManager, Serializer, Versioner};
use bbs_format::{parse_frame, peek_key_label, ENVELOPE_OFFSET};

use crate::support::{cell, serializer_from_config, serializer_with, task};

fn decode_frame(stored: &[u8]) -> Vec<u8> {
    Base64::decode_vec(std::str::from_utf8(stored).unwrap()).unwrap()
}

fn encode_frame(frame: &[u8]) -> Vec<u8> {
    Base64::encode_string(frame).into_bytes()
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn cell_presence_round_trip() {
    let serializer = serializer_with("key-1", &[]);
    let original = cell("cell-z1-0");

    let stored = serializer.marshal(&original).unwrap();
    let mut decoded = CellPresence::default();
    serializer.unmarshal(&stored, &mut decoded).unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn task_round_trip() {
    let serializer = serializer_with("key-1", &[]);
    let guid = uuid::Uuid::new_v4().to_string();
    let original = task(&guid);

    let stored = serializer.marshal(&original).unwrap();
    let decoded: Task = serializer.unmarshal_validated(&stored).unwrap();

    assert_eq!(decoded, original);
    assert!(decoded.validate().is_ok());
}

#[test]
fn default_model_round_trip() {
    let serializer = serializer_with("key-1", &[]);
    let stored = serializer.marshal(&Task::default()).unwrap();
    let mut decoded = task("will-be-replaced");
    serializer.unmarshal(&stored, &mut decoded).unwrap();
    assert_eq!(decoded, Task::default());
}

#[test]
fn stored_value_is_base64_of_labelled_frame() {
    let serializer = serializer_with("key-1", &[]);
    let stored = serializer.marshal(&cell("cell-z1-0")).unwrap();

    let frame = decode_frame(&stored);
    assert_eq!(frame[0] as usize, "key-1".len());
    assert_eq!(&frame[1..6], b"key-1");
    assert_eq!(peek_key_label(&stored).unwrap(), "key-1");
}

#[test]
fn decrypted_payload_is_envelope() {
    let serializer = serializer_with("key-1", &[]);
    let model = cell("cell-z1-0");
    let stored = serializer.marshal(&model).unwrap();

    let payload = serializer.encoder().decode(&stored).unwrap();
    assert_eq!(payload[0], 2);
    assert_eq!(payload[1], 0);
    assert_eq!(
        &payload[ENVELOPE_OFFSET..],
        prost::Message::encode_to_vec(&model).as_slice()
    );
}

#[test]
fn independently_configured_processes_interoperate() {
    // Two API servers built from the same configuration derive the same keys.
    let writer = serializer_from_config("key-2", &["key-1", "key-2"]);
    let reader = serializer_from_config("key-2", &["key-1", "key-2"]);

    let stored = writer.marshal(&task("shared-task")).unwrap();
    let decoded: Task = reader.unmarshal_validated(&stored).unwrap();
    assert_eq!(decoded, task("shared-task"));
}

#[test]
fn empty_passphrase_key_round_trips() {
    let key = Key::new("label", "").unwrap();
    let serializer = Serializer::new(Cryptor::with_os_entropy(
        KeyManager::new(Some(key), vec![]).unwrap(),
    ));
    let stored = serializer.marshal(&cell("cell-1")).unwrap();
    let decoded: CellPresence = serializer.unmarshal_validated(&stored).unwrap();
    assert_eq!(decoded, cell("cell-1"));
}

#[test]
fn fixed_nonce_makes_output_reproducible() {
    let build = || {
        let key = Key::new("fixture", "fixture passphrase").unwrap();
        Serializer::new(Cryptor::new(
            KeyManager::new(Some(key), vec![]).unwrap(),
            FixedEntropy::new(vec![0x42; 12]),
        ))
    };
    let a = build().marshal(&cell("cell-1")).unwrap();
    let b = build().marshal(&cell("cell-1")).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Fail-closed behaviour
// ============================================================================

#[test]
fn flipped_ciphertext_bit_fails_authentication() {
    let serializer = serializer_with("key-1", &[]);
    let stored = serializer.marshal(&cell("cell-1")).unwrap();

    let mut frame = decode_frame(&stored);
    let last = frame.len() - 1;
    frame[last] ^= 0x01;

    let mut model = cell("untouched");
    let err = serializer.unmarshal(&encode_frame(&frame), &mut model).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(model, cell("untouched"));
}

#[test]
fn replaced_nonce_fails_authentication() {
    let serializer = serializer_with("key-1", &[]);
    let stored = serializer.marshal(&cell("cell-1")).unwrap();

    let mut encrypted = parse_frame(&decode_frame(&stored)).unwrap();
    encrypted.nonce = *b"123456789012";
    let tampered = encode_frame(&bbs_format::frame(&encrypted).unwrap());

    let err = serializer
        .unmarshal_validated::<CellPresence>(&tampered)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
}

#[test]
fn relabelled_value_fails() {
    // Claiming a different (registered) key does not let a value decrypt.
    let serializer = serializer_with("key-1", &["key-2"]);
    let stored = serializer.marshal(&cell("cell-1")).unwrap();

    let mut encrypted = parse_frame(&decode_frame(&stored)).unwrap();
    encrypted.key_label = "key-2".to_string();
    let relabelled = encode_frame(&bbs_format::frame(&encrypted).unwrap());

    let err = serializer
        .unmarshal_validated::<CellPresence>(&relabelled)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
}

#[test]
fn truncated_value_is_format_incompatible() {
    let serializer = serializer_with("key-1", &[]);
    let stored = serializer.marshal(&cell("cell-1")).unwrap();
    let frame = decode_frame(&stored);

    // Cut inside the nonce.
    let truncated = encode_frame(&frame[..1 + "key-1".len() + 4]);
    let err = serializer
        .unmarshal_validated::<CellPresence>(&truncated)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatIncompatible);
}

#[test]
fn value_from_unknown_key_is_key_not_found() {
    let writer = serializer_with("doesnt-exist", &[]);
    let reader = serializer_with("key-1", &[]);
    let stored = writer.marshal(&cell("cell-1")).unwrap();

    let err = reader.unmarshal_validated::<CellPresence>(&stored).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    assert!(err.to_string().contains("doesnt-exist"));
}

#[test]
fn invalid_record_is_rejected_after_decode() {
    let serializer = serializer_with("key-1", &[]);
    let stored = serializer.marshal(&CellPresence::default()).unwrap();

    // Plain unmarshal leaves validation to the caller.
    let mut model = CellPresence::default();
    serializer.unmarshal(&stored, &mut model).unwrap();

    let err = serializer
        .unmarshal_validated::<CellPresence>(&stored)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
}
