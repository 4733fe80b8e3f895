use std::fs;
use std::path::Path;

use duet_core::{
    domain::{FamilyConfig, IncomeRecord, UserId, Wish},
    storage::{JsonStore, StorageBackend},
};
use tempfile::tempdir;

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn each_key_lives_in_its_own_file() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf())).unwrap();

    let records = vec![IncomeRecord::new(1_200.0, "salary", "work", UserId::Wife)];
    let wishes = vec![Wish::new("Bicycle", 3_000.0, UserId::Husband, "https://example.com/b.jpg")];
    let family = FamilyConfig::paired("fam_123456", "123456", UserId::Wife);

    store.save_records(&records).unwrap();
    store.save_wishes(&wishes).unwrap();
    store.save_goal(150_000.0).unwrap();
    store.save_family(&family).unwrap();

    for name in [
        "income_records.json",
        "wishes.json",
        "yearly_goal.json",
        "family_config.json",
    ] {
        assert!(temp.path().join(name).exists(), "{name} should exist");
    }

    let loaded_records = store.load_records().unwrap().unwrap();
    assert_eq!(loaded_records.len(), 1);
    assert_eq!(loaded_records[0].amount, 1_200.0);

    let loaded_wishes = store.load_wishes().unwrap().unwrap();
    assert_eq!(loaded_wishes[0].title, "Bicycle");

    assert_eq!(store.load_goal().unwrap(), Some(150_000.0));

    let loaded_family = store.load_family().unwrap().unwrap();
    assert_eq!(loaded_family.family_id.as_deref(), Some("fam_123456"));
    assert_eq!(loaded_family.paired_user_id, Some(UserId::Husband));
}

#[test]
fn saving_one_key_leaves_the_others_untouched() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf())).unwrap();

    store.save_goal(80_000.0).unwrap();

    assert!(temp.path().join("yearly_goal.json").exists());
    assert!(!temp.path().join("income_records.json").exists());
    assert!(!temp.path().join("wishes.json").exists());
    assert!(!temp.path().join("family_config.json").exists());
}

#[test]
fn absent_keys_load_as_none() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf())).unwrap();

    assert!(store.load_records().unwrap().is_none());
    assert!(store.load_wishes().unwrap().is_none());
    assert!(store.load_goal().unwrap().is_none());
    assert!(store.load_family().unwrap().is_none());
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf())).unwrap();

    let wishes = vec![Wish::new("Original", 500.0, UserId::Wife, "https://example.com/o.jpg")];
    store.save_wishes(&wishes).unwrap();

    let path = temp.path().join("wishes.json");
    let original = fs::read_to_string(&path).expect("read original file");

    // Create a directory that collides with the temp file name to force File::create to fail.
    let tmp_path = tmp_path_for(&path);
    fs::create_dir_all(&tmp_path).unwrap();

    let updated = vec![Wish::new("Replacement", 900.0, UserId::Husband, "https://example.com/r.jpg")];
    let result = store.save_wishes(&updated);
    assert!(
        result.is_err(),
        "expected save to fail when the temp path is a directory"
    );

    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(
        current, original,
        "atomic save failure must not corrupt the original file"
    );
}

#[test]
fn wishes_saved_without_pin_round_trip_with_pin_default() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf())).unwrap();

    // Simulate a file written before pinning existed.
    let json = r#"[
        {
            "id": "6f9fb2c2-8c53-4f57-9f68-0e2d8f6a1a11",
            "title": "Legacy",
            "target_amount": 1000.0,
            "current_saved_amount": 100.0,
            "status": "ongoing",
            "user_id": "wife",
            "image_url": "https://example.com/l.jpg"
        }
    ]"#;
    fs::write(temp.path().join("wishes.json"), json).unwrap();

    let wishes = store.load_wishes().unwrap().unwrap();
    assert_eq!(wishes.len(), 1);
    assert!(!wishes[0].is_pinned);
}
