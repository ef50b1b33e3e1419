use ehfile::compare::{compare, DifferenceKind};
use ehfile::editor::{edit_dir, edit_file, write_json, EditOptions};
use ehfile::field::{read_u32_be, read_u32_le};
use ehfile::translate::{translate_by_key, translate_by_name};
use ehfile::{decode, encode, Database, Header, HeaderLayout, ItemType, Record, RecordKey, HEADER_SIZE};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn header(tag: u32, marker: u8) -> Header {
    let mut raw = [0u8; HEADER_SIZE];
    raw[8..12].copy_from_slice(&tag.to_le_bytes());
    raw[200] = marker;
    Header::from_array(raw)
}

/// A container laid out the way the game ships it, asset name included.
fn shipped(tag: u32, asset_name: &[u8], json: &str) -> Vec<u8> {
    let mut buf = header(tag, 0).as_bytes().to_vec();
    buf.extend_from_slice(&(asset_name.len() as u32).to_le_bytes());
    buf.extend_from_slice(asset_name);
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
    buf.extend_from_slice(&(json.len() as u32).to_le_bytes());
    buf.extend_from_slice(json.as_bytes());
    buf.extend_from_slice(&[0u8; 4]);
    buf
}

fn put(dir: &Path, name: &str, bytes: &[u8]) {
    fs::write(dir.join(name), bytes).unwrap();
}

#[test]
fn test_edit_file_rewrites_payload_and_lengths() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ship_12");
    put(dir.path(), "ship_12", &shipped(17, b"ship_asset_12", r#"{"ItemType":6,"Id":12,"Name":"Falcon","SizeClass":1.0}"#));

    let edited = edit_file(&path, &EditOptions::default(), |mut obj| {
        obj.insert("Name".into(), Value::from("Heavy Falcon"));
        obj
    })
    .unwrap();
    assert!(edited);

    let bytes = fs::read(&path).unwrap();
    let c = decode(&bytes).unwrap();
    assert_eq!(c.asset_name_length, 0);
    let value: Value = serde_json::from_str(&c.json).unwrap();
    assert_eq!(value["Name"], "Heavy Falcon");
    assert_eq!(value["SizeClass"], Value::from(1));
    // Field order is preserved.
    assert!(c.json.find("\"ItemType\"").unwrap() < c.json.find("\"Name\"").unwrap());

    assert_eq!(read_u32_be(&bytes, 4).unwrap() as usize, bytes.len());
    assert_eq!(read_u32_le(&bytes, 80).unwrap() as usize, bytes.len() - HEADER_SIZE);
    assert_eq!(read_u32_le(&bytes, 4100).unwrap() as usize, c.json.len());
}

#[test]
fn test_edit_skips_non_containers() {
    let dir = tempdir().unwrap();
    put(dir.path(), "readme.txt", b"not game data");
    put(dir.path(), "a", &shipped(15, b"", r#"{"ItemType":2,"Id":1}"#));
    put(dir.path(), "b", &shipped(99, b"", r#"{"ItemType":2,"Id":2}"#));

    assert!(!edit_file(&dir.path().join("readme.txt"), &EditOptions::default(), |o| o).unwrap());
    assert_eq!(fs::read(dir.path().join("readme.txt")).unwrap(), b"not game data");

    let report = edit_dir(dir.path(), &EditOptions::default(), |o| o).unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 1);
    // Version 99 has no object-length offset in the table.
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn test_write_json_keeps_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weapon");
    let original = encode(&header(15, 0xAB), r#"{"ItemType":3,"Id":4}"#, HeaderLayout::VersionTable).unwrap();
    put(dir.path(), "weapon", &original);

    let json = r#"{"ItemType":3,"Id":4,"FireRate":2.5}"#;
    write_json(&path, json, HeaderLayout::VersionTable).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes[200], 0xAB);
    assert_eq!(read_u32_le(&bytes, 76).unwrap() as usize, bytes.len() - HEADER_SIZE);
    assert_eq!(decode(&bytes).unwrap().json, json);
}

#[test]
fn test_database_load_and_build() {
    let src = tempdir().unwrap();
    put(src.path(), "c1", &shipped(17, b"comp", r#"{"ItemType":1,"Id":1,"Name":"Pulse Cannon","WeaponId":2}"#));
    put(src.path(), "w2", &shipped(17, b"weapon", r#"{"ItemType":3,"Id":2}"#));
    put(src.path(), "s3", &shipped(17, b"", r#"{"ItemType":6,"Id":3,"Name":"Falcon"}"#));
    put(src.path(), "notes.txt", b"nothing to see");
    put(src.path(), "broken", br#"{"ItemType":1} but far too short"#);
    put(src.path(), "alien", &shipped(17, b"", r#"{"ItemType":77,"Id":1}"#));

    let (db, report) = Database::load(src.path()).unwrap();
    assert_eq!(report.processed, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(db.len(), 3);
    assert_eq!(db.name_of(RecordKey::new(ItemType::Weapon, 2)), "Pulse Cannon");
    assert!(matches!(db.record(RecordKey::new(ItemType::Ship, 3)), Some(Record::Ship(_))));

    let out = tempdir().unwrap();
    assert_eq!(db.build(out.path()).unwrap(), 3);
    let weapon = fs::read_to_string(out.path().join("Weapon").join("2_Pulse Cannon.json")).unwrap();
    assert_eq!(weapon, r#"{"ItemType":3,"Id":2}"#);
    assert!(out.path().join("Ship").join("3_Falcon.json").is_file());
    assert!(out.path().join("Ship").join("Build").is_dir());
}

#[test]
fn test_compare_versions() {
    let old = tempdir().unwrap();
    let new = tempdir().unwrap();
    put(old.path(), "same", &shipped(17, b"x", r#"{"ItemType":2,"Id":1}"#));
    put(new.path(), "same", &shipped(15, b"longer name", r#"{"ItemType":2,"Id":1}"#));
    put(old.path(), "changed", &shipped(17, b"", r#"{"ItemType":2,"Id":2,"Power":1}"#));
    put(new.path(), "changed", &shipped(17, b"", r#"{"ItemType":2,"Id":2,"Power":2}"#));
    put(old.path(), "gone", &shipped(17, b"", r#"{"ItemType":2,"Id":3}"#));
    put(new.path(), "added", &shipped(17, b"", r#"{"ItemType":2,"Id":4}"#));
    put(new.path(), "notes.txt", b"ignored");

    let diffs = compare(old.path(), new.path()).unwrap();
    let summary: Vec<(&str, DifferenceKind)> = diffs.iter().map(|d| (d.name.as_str(), d.kind)).collect();
    assert_eq!(summary, vec![
        ("added", DifferenceKind::NewFile),
        ("changed", DifferenceKind::ChangedFile),
        ("gone", DifferenceKind::DeletedFile),
    ]);
    assert_eq!(diffs[0].old_len, 0);
    assert_eq!(diffs[2].new_len, 0);
    assert!(diffs[1].to_string().starts_with("changed changed file "));
}

#[test]
fn test_translate_by_name_stamps_new_headers() {
    let old_mod = tempdir().unwrap();
    let new_events = tempdir().unwrap();
    let new_mod = tempdir().unwrap();

    let modded = r#"{"ItemType":6,"Id":5,"Name":"Modded"}"#;
    put(old_mod.path(), "ship5", &shipped(15, b"ship5", modded));
    put(old_mod.path(), "orphan", &shipped(15, b"", r#"{"ItemType":6,"Id":6}"#));
    put(old_mod.path(), "readme.txt", b"skip me");
    let template = encode(&header(17, 0x5A), r#"{"ItemType":6,"Id":5,"Name":"New"}"#, HeaderLayout::VersionTable).unwrap();
    put(new_events.path(), "ship5", &template);

    let out = translate_by_name(old_mod.path(), new_events.path(), new_mod.path(), HeaderLayout::VersionTable).unwrap();
    assert_eq!(out.untranslated, vec![old_mod.path().join("orphan")]);
    assert_eq!(out.report.processed, 1);
    assert_eq!(out.report.skipped, 1);
    assert!(out.report.is_clean());

    let bytes = fs::read(new_mod.path().join("ship5")).unwrap();
    let c = decode(&bytes).unwrap();
    assert_eq!(c.json, modded);
    assert_eq!(c.header.format_version(), 17);
    assert_eq!(bytes[200], 0x5A);
    assert_eq!(read_u32_le(&bytes, 80).unwrap() as usize, bytes.len() - HEADER_SIZE);
}

#[test]
fn test_translate_by_key_follows_renamed_files() {
    let old_mod = tempdir().unwrap();
    let old_events = tempdir().unwrap();
    let new_events = tempdir().unwrap();
    let new_mod = tempdir().unwrap();

    let modded = r#"{"ItemType":1,"Id":40,"Name":"Modded Gun"}"#;
    put(old_mod.path(), "old_name", &shipped(15, b"", modded));
    put(old_events.path(), "old_name", &shipped(15, b"", r#"{"ItemType":1,"Id":40,"Name":"Gun"}"#));
    put(new_events.path(), "new_name", &shipped(17, b"gun", r#"{"ItemType":1,"Id":40,"Name":"Gun"}"#));
    put(new_events.path(), "other", &shipped(17, b"", r#"{"ItemType":1,"Id":41}"#));

    let out = translate_by_key(
        old_mod.path(),
        old_events.path(),
        new_events.path(),
        new_mod.path(),
        HeaderLayout::VersionTable,
    )
    .unwrap();
    assert!(out.untranslated.is_empty());
    assert!(out.report.is_clean());
    assert!(!new_mod.path().join("old_name").exists());
    let c = decode(&fs::read(new_mod.path().join("new_name")).unwrap()).unwrap();
    assert_eq!(c.json, modded);
}

#[test]
fn test_translate_continues_past_broken_files() {
    let old_mod = tempdir().unwrap();
    let new_events = tempdir().unwrap();
    let new_mod = tempdir().unwrap();

    // Sorted first: has the marker but is far too short.
    put(old_mod.path(), "a_broken", br#"{"ItemType":1}"#);
    // Template carries a version tag with no known layout.
    put(old_mod.path(), "b_old_tag", &shipped(15, b"", r#"{"ItemType":2,"Id":7}"#));
    put(new_events.path(), "b_old_tag", &shipped(99, b"", r#"{"ItemType":2,"Id":7}"#));
    let good = r#"{"ItemType":2,"Id":8,"Name":"Kept"}"#;
    put(old_mod.path(), "c_good", &shipped(15, b"", good));
    put(new_events.path(), "c_good", &shipped(17, b"", r#"{"ItemType":2,"Id":8}"#));

    let out = translate_by_name(old_mod.path(), new_events.path(), new_mod.path(), HeaderLayout::VersionTable).unwrap();
    assert_eq!(out.report.processed, 1);
    assert_eq!(out.report.failures.len(), 2);
    assert!(out.untranslated.is_empty());
    assert!(!new_mod.path().join("a_broken").exists());
    assert!(!new_mod.path().join("b_old_tag").exists());
    let c = decode(&fs::read(new_mod.path().join("c_good")).unwrap()).unwrap();
    assert_eq!(c.json, good);
}

#[test]
fn test_translate_by_key_reports_new_version_failures() {
    let old_mod = tempdir().unwrap();
    let old_events = tempdir().unwrap();
    let new_events = tempdir().unwrap();
    let new_mod = tempdir().unwrap();

    put(old_mod.path(), "gun", &shipped(15, b"", r#"{"ItemType":1,"Id":40,"Name":"Modded"}"#));
    put(old_events.path(), "gun", &shipped(15, b"", r#"{"ItemType":1,"Id":40}"#));
    put(new_events.path(), "gun_v2", &shipped(17, b"", r#"{"ItemType":1,"Id":40}"#));
    put(new_events.path(), "unknown_type", &shipped(17, b"", r#"{"ItemType":77,"Id":1}"#));

    let out = translate_by_key(
        old_mod.path(),
        old_events.path(),
        new_events.path(),
        new_mod.path(),
        HeaderLayout::VersionTable,
    )
    .unwrap();
    assert_eq!(out.report.processed, 1);
    assert_eq!(out.report.failures.len(), 1);
    assert!(out.report.failures[0].to_string().contains("unknown_type"));
    assert!(new_mod.path().join("gun_v2").is_file());
}

#[test]
fn test_database_accepts_integral_floats() {
    let src = tempdir().unwrap();
    put(src.path(), "s", &shipped(17, b"", r#"{"ItemType":6,"Id":3,"Name":"Falcon","Faction":1.0}"#));
    put(src.path(), "b", &shipped(17, b"", r#"{"ItemType":8,"Id":4.0,"ShipId":3.0,"DifficultyClass":2}"#));

    let (db, report) = Database::load(src.path()).unwrap();
    assert!(report.is_clean());
    assert_eq!(db.len(), 2);
    assert_eq!(db.name_of(RecordKey::new(ItemType::ShipBuild, 4)), "2 Falcon");
}

#[test]
fn test_name_length_layout_on_disk() {
    let mut raw = [0u8; HEADER_SIZE];
    raw[20..30].copy_from_slice(b"asset_0001");
    let bytes = encode(&Header::from_array(raw), r#"{"ItemType":5,"Id":1}"#, HeaderLayout::NameLength).unwrap();
    // align4(67 + 10) = 80
    assert_eq!(read_u32_le(&bytes, 80).unwrap() as usize, bytes.len() - HEADER_SIZE);
    assert_eq!(decode(&bytes).unwrap().json, r#"{"ItemType":5,"Id":1}"#);
}
