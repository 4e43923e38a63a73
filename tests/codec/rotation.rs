use bbs::models::{CellPresence, Task};
use bbs::{EncryptionConfig, ErrorKind};
use bbs_format::peek_key_label;

use crate::support::{cell, retire, rotate_to, serializer_from_config, serializer_with, task};

#[test]
fn old_records_stay_readable_after_rotation() {
    let serializer = serializer_with("old", &[]);
    let before = serializer.marshal(&cell("cell-before")).unwrap();

    rotate_to(&serializer, "new");
    let after = serializer.marshal(&cell("cell-after")).unwrap();

    assert_eq!(peek_key_label(&before).unwrap(), "old");
    assert_eq!(peek_key_label(&after).unwrap(), "new");

    let decoded: CellPresence = serializer.unmarshal_validated(&before).unwrap();
    assert_eq!(decoded, cell("cell-before"));
    let decoded: CellPresence = serializer.unmarshal_validated(&after).unwrap();
    assert_eq!(decoded, cell("cell-after"));
}

#[test]
fn retired_key_no_longer_decrypts() {
    let serializer = serializer_with("old", &[]);
    let stored = serializer.marshal(&cell("cell-1")).unwrap();

    rotate_to(&serializer, "new");
    retire(&serializer, "old");

    let err = serializer
        .unmarshal_validated::<CellPresence>(&stored)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
}

#[test]
fn reencrypt_all_then_retire() {
    let serializer = serializer_with("old", &[]);
    let records: Vec<(String, Vec<u8>)> = (0..5)
        .map(|i| {
            let guid = format!("task-{i}");
            let stored = serializer.marshal(&task(&guid)).unwrap();
            (guid, stored)
        })
        .collect();

    rotate_to(&serializer, "new");
    let mut current = records.clone();
    current.push((
        "task-new".to_string(),
        serializer.marshal(&task("task-new")).unwrap(),
    ));

    let report = serializer.reencrypt_all(&current);
    assert!(report.is_complete());
    assert_eq!(report.rewritten.len(), 5);
    assert_eq!(report.unchanged, 1);

    retire(&serializer, "old");
    for (guid, stored) in &report.rewritten {
        assert!(!serializer.needs_reencryption(stored).unwrap());
        let decoded: Task = serializer.unmarshal_validated(stored).unwrap();
        assert_eq!(decoded, task(guid));
    }
    // The originals are gone with the retired key.
    for (_, stored) in &records {
        assert!(serializer.unmarshal_validated::<Task>(stored).is_err());
    }
}

#[test]
fn reencrypt_all_reports_unreadable_records() {
    let serializer = serializer_with("key-1", &[]);
    let stranger = serializer_with("stranger", &[]);
    let records = vec![
        ("ok".to_string(), serializer.marshal(&cell("ok")).unwrap()),
        ("foreign".to_string(), stranger.marshal(&cell("foreign")).unwrap()),
        ("garbage".to_string(), b"%%%".to_vec()),
    ];

    rotate_to(&serializer, "key-2");
    let report = serializer.reencrypt_all(&records);

    assert!(!report.is_complete());
    assert_eq!(report.rewritten.len(), 1);
    assert_eq!(report.rewritten[0].0, "ok");
    let failed: Vec<(&str, ErrorKind)> = report
        .failed
        .iter()
        .map(|(id, e)| (id.as_str(), e.kind()))
        .collect();
    assert_eq!(
        failed,
        vec![
            ("foreign", ErrorKind::KeyNotFound),
            ("garbage", ErrorKind::FormatIncompatible),
        ]
    );
}

#[test]
fn rolling_config_change_across_processes() {
    // Stage 1: every process knows key-1.
    let stage_one = serializer_from_config("key-1", &["key-1"]);
    let written_early = stage_one.marshal(&cell("cell-early")).unwrap();

    // Stage 2: processes learn key-2 but keep writing key-1.
    let stage_two = serializer_from_config("key-1", &["key-1", "key-2"]);
    let written_mid = stage_two.marshal(&cell("cell-mid")).unwrap();

    // Stage 3: key-2 becomes active.
    let stage_three = serializer_from_config("key-2", &["key-1", "key-2"]);
    let written_late = stage_three.marshal(&cell("cell-late")).unwrap();

    assert_eq!(peek_key_label(&written_mid).unwrap(), "key-1");
    assert_eq!(peek_key_label(&written_late).unwrap(), "key-2");

    // A stage-two reader can already decrypt what stage three writes.
    let decoded: CellPresence = stage_two.unmarshal_validated(&written_late).unwrap();
    assert_eq!(decoded, cell("cell-late"));

    for (stored, id) in [(&written_early, "cell-early"), (&written_mid, "cell-mid")] {
        let decoded: CellPresence = stage_three.unmarshal_validated(stored).unwrap();
        assert_eq!(decoded, cell(id));
    }

    // Stage 4: key-1 is dropped once everything was rewritten.
    let rewritten = stage_three.reencrypt(&written_early).unwrap();
    let stage_four = EncryptionConfig::from_flags(&["key-2:key-2 passphrase"], "key-2")
        .unwrap()
        .serializer()
        .unwrap();
    let decoded: CellPresence = stage_four.unmarshal_validated(&rewritten).unwrap();
    assert_eq!(decoded, cell("cell-early"));
    assert_eq!(
        stage_four
            .unmarshal_validated::<CellPresence>(&written_early)
            .unwrap_err()
            .kind(),
        ErrorKind::KeyNotFound
    );
}

#[test]
fn rotation_is_shared_by_clones() {
    let serializer = serializer_with("old", &[]);
    let clone = serializer.clone();

    rotate_to(&serializer, "new");
    let stored = clone.marshal(&cell("cell-1")).unwrap();
    assert_eq!(peek_key_label(&stored).unwrap(), "new");
}
