use narctext::archive::TextArchive;
use narctext::narc::{self, Narc};
use narctext::text;
use narctext::transfer::{self, textdir};
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_narctext").to_string()
}

fn sample_narc() -> Vec<u8> {
    narc::rebuild(&[
        text::encode(&["Welcome to the world of Pokémon!", "\\xf000\\xfffeBag"]).unwrap(),
        vec![0x52, 0x4C, 0x43, 0x4E, 0x00, 0x01],
        text::encode::<&str>(&[]).unwrap(),
        text::encode(&["Yes", "No"]).unwrap(),
    ])
    .unwrap()
}

#[test]
fn test_export_import_unchanged_json() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("a003.narc");
    let json = dir.path().join("texts.json");
    let rebuilt = dir.path().join("new_a003.narc");
    fs::write(&original, sample_narc()).unwrap();

    let ar = TextArchive::open(&original).unwrap();
    transfer::write_json(&ar.text_sets(), &json).unwrap();

    let mut ar = TextArchive::open(&original).unwrap();
    let translations = transfer::load_translations(&json, ar.len()).unwrap();
    let report = ar.apply_translations(&translations).unwrap();
    assert_eq!(report.updated, 2);
    ar.write(&rebuilt).unwrap();

    // Re-encoding is deterministic, so an untouched export rebuilds
    // byte-for-byte.
    assert_eq!(fs::read(&rebuilt).unwrap(), fs::read(&original).unwrap());
}

#[test]
fn test_translated_directory_import() {
    let dir = tempdir().unwrap();
    let export = dir.path().join("texts");
    let ar = TextArchive::from_bytes(&sample_narc()).unwrap();
    assert_eq!(textdir::write_dir(&ar.text_sets(), &export).unwrap(), 2);

    let entry = textdir::lang_dir(&export).join("0003.txt");
    fs::write(&entry, "# Entry 0003\n\n[0000]\nJa\n\n[0001]\nNein\n\n").unwrap();

    let mut ar = TextArchive::from_bytes(&sample_narc()).unwrap();
    let translations = transfer::load_translations(&export, ar.len()).unwrap();
    ar.apply_translations(&translations).unwrap();

    let reopened = TextArchive::from_bytes(&ar.to_bytes().unwrap()).unwrap();
    let sets = reopened.text_sets();
    assert_eq!(sets[0][0], "Welcome to the world of Pokémon!");
    assert_eq!(sets[0][1], "\\xf000\\xfffeBag");
    assert_eq!(sets[3], vec!["Ja".to_string(), "Nein".to_string()]);
    // Opaque entry passes through untouched.
    assert_eq!(reopened.narc().entries[1], vec![0x52, 0x4C, 0x43, 0x4E, 0x00, 0x01]);
}

#[test]
fn test_mismatched_translation_count() {
    let mut ar = TextArchive::from_bytes(&sample_narc()).unwrap();
    let before = ar.narc().clone();
    let report = ar.apply_translations(&[vec!["Only one".to_string()]]).unwrap();
    assert!(report.is_mismatched());
    assert_eq!(report.archive_entries, 4);
    assert_eq!(report.translation_entries, 1);
    assert_eq!(&ar.narc().entries[1..], &before.entries[1..]);
}

#[test]
fn test_parse_foreign_section_order() {
    // GMIF placed before BTAF; the tag scan still finds both.
    let payload = b"abcdefgh";
    let mut raw = Vec::new();
    raw.extend_from_slice(b"NARC");
    raw.extend_from_slice(&[0xFE, 0xFF, 0x00, 0x01, 0, 0, 0, 0, 0x10, 0x00, 0x02, 0x00]);
    raw.extend_from_slice(b"GMIF");
    raw.extend_from_slice(&16u32.to_le_bytes());
    raw.extend_from_slice(payload);
    raw.extend_from_slice(b"BTAF");
    raw.extend_from_slice(&28u32.to_le_bytes());
    raw.extend_from_slice(&2u32.to_le_bytes());
    for v in [0u32, 3, 3, 8] {
        raw.extend_from_slice(&v.to_le_bytes());
    }

    let narc = Narc::parse(&raw).unwrap();
    assert_eq!(narc.entries, vec![b"abc".to_vec(), b"defgh".to_vec()]);
}

#[test]
fn test_cli_export_import_roundtrip() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("a003.narc");
    let json = dir.path().join("texts.json");
    let out_dir = dir.path().join("texts");
    let rebuilt = dir.path().join("new.narc");
    fs::write(&original, sample_narc()).unwrap();

    let st = Command::new(bin())
        .arg("export")
        .arg(&original)
        .arg("-o")
        .arg(&json)
        .arg("-d")
        .arg(&out_dir)
        .status()
        .unwrap();
    assert!(st.success());
    assert!(json.exists());
    assert!(textdir::lang_dir(&out_dir).join("0000.txt").exists());

    let st = Command::new(bin())
        .arg("import")
        .arg(&json)
        .arg(&original)
        .arg(&rebuilt)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(fs::read(&rebuilt).unwrap(), fs::read(&original).unwrap());
}

#[test]
fn test_cli_export_requires_an_output() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("a003.narc");
    fs::write(&original, sample_narc()).unwrap();

    let st = Command::new(bin()).arg("export").arg(&original).status().unwrap();
    assert!(!st.success());
}

#[test]
fn test_cli_rejects_non_narc_without_output() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.bin");
    let json = dir.path().join("texts.json");
    let out = dir.path().join("out.narc");
    fs::write(&bogus, b"not an archive").unwrap();
    fs::write(&json, "{\"entries\": []}").unwrap();

    let st = Command::new(bin())
        .arg("import")
        .arg(&json)
        .arg(&bogus)
        .arg(&out)
        .status()
        .unwrap();
    assert!(!st.success());
    assert!(!out.exists());
}

#[test]
fn test_cli_error_shown_with_logging_off() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.bin");
    fs::write(&bogus, b"not an archive").unwrap();

    let out = Command::new(bin())
        .env("RUST_LOG", "off")
        .arg("list")
        .arg(&bogus)
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("not a valid NARC file"), "stderr: {stderr}");
}

#[test]
fn test_cli_selftest() {
    let st = Command::new(bin()).arg("selftest").status().unwrap();
    assert!(st.success());
}
