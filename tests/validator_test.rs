mod common;

use common::{family, read_families, seed_families, seed_pointer, store_at, write_sample_jpeg};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn corrupt_file_is_preserved_as_bak_and_reset_to_empty() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("dados").join("familias.json");
    fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
    fs::write(&file, "[ invalid").expect("seed");
    let mut store = store_at(tmp.path());

    let outcome = store.validate_families();
    assert!(!outcome.ok);
    assert_eq!(outcome.scanned, 0);

    let bak = tmp.path().join("dados").join("familias.json.bak");
    assert_eq!(fs::read_to_string(&bak).expect("bak"), "[ invalid");
    assert!(read_families(tmp.path()).is_empty());
    assert!(store.load_families(false).is_empty());
}

#[test]
fn records_are_dropped_or_repaired_per_field_policy() {
    let tmp = tempdir().expect("tempdir");
    seed_families(
        tmp.path(),
        &[
            json!({"numero": "abc", "nome": "No number"}),
            json!({"numero": 2, "nome": "   "}),
            json!({"numero": 3, "nome": "Bad photo", "foto": "not/an/image"}),
            json!({"numero": "4", "nome": "String number"}),
            json!({"numero": 5, "nome": "Odd flag", "sorteado": "sim"}),
            json!({
                "numero": 6,
                "nome": "Bad date",
                "sorteado": true,
                "data_sorteio": "2024-12-01"
            }),
            json!({
                "id": 70,
                "numero": 7,
                "nome": "Healthy",
                "foto": "",
                "sorteado": false
            }),
        ],
    );
    let mut store = store_at(tmp.path());

    let outcome = store.validate_families();
    assert!(outcome.ok);
    assert_eq!(outcome.scanned, 7);
    assert_eq!(outcome.dropped, 2);
    assert_eq!(outcome.kept, 5);
    assert_eq!(outcome.repaired, 4);

    let persisted = read_families(tmp.path());
    assert_eq!(persisted.len(), 5);
    assert_eq!(persisted[0]["numero"], json!(3));
    assert_eq!(persisted[0]["foto"], json!(""));
    assert_eq!(persisted[1]["numero"], json!(4));
    assert_eq!(persisted[1]["id"], json!(4));
    assert_eq!(persisted[2]["sorteado"], json!(false));
    assert_eq!(persisted[3]["sorteado"], json!(true));
    assert_eq!(persisted[3].get("data_sorteio"), None);
    assert_eq!(persisted[4]["id"], json!(70));
}

#[test]
fn validation_is_idempotent_on_its_own_output() {
    let tmp = tempdir().expect("tempdir");
    seed_families(
        tmp.path(),
        &[
            json!({"numero": "1", "nome": " Trim me ", "sorteado": "x"}),
            json!({"numero": 2, "nome": "Fine", "foto": "bogus.txt"}),
        ],
    );
    let mut store = store_at(tmp.path());

    let first = store.validate_families();
    assert!(first.ok);
    assert_eq!(first.repaired, 2);
    let bytes = fs::read(tmp.path().join("dados").join("familias.json")).expect("read");

    let second = store.validate_families();
    assert!(second.ok);
    assert_eq!(second.repaired, 0);
    assert_eq!(second.dropped, 0);
    let rewritten = fs::read(tmp.path().join("dados").join("familias.json")).expect("read");
    assert_eq!(bytes, rewritten);
}

#[test]
fn draw_check_clears_a_garbled_pointer() {
    let tmp = tempdir().expect("tempdir");
    seed_families(tmp.path(), &[family(1, "A")]);
    seed_pointer(tmp.path(), json!("x"));
    let mut store = store_at(tmp.path());

    assert!(store.validate_draw());
    assert!(!tmp.path().join("dados").join("sorteio.json").exists());
}

#[test]
fn missing_thumbnails_are_regenerated_once() {
    let tmp = tempdir().expect("tempdir");
    let photo = tmp
        .path()
        .join("imagens")
        .join("familias")
        .join("abcd1234.jpg");
    write_sample_jpeg(&photo, 800, 600);
    let mut record = family(1, "A");
    record["foto"] = json!("imagens/familias/abcd1234.jpg");
    seed_families(tmp.path(), &[record]);
    let mut store = store_at(tmp.path());

    let first = store.validate_families();
    assert!(first.ok);
    assert_eq!(first.thumbnails_created, 1);
    let thumb = tmp
        .path()
        .join("imagens")
        .join("thumbs")
        .join("abcd1234_thumb.jpg");
    let img = image::open(&thumb).expect("thumbnail decodes");
    assert!(img.width() <= 240);
    assert!(img.height() <= 240);

    let second = store.validate_families();
    assert_eq!(second.thumbnails_created, 0);
}

#[test]
fn startup_checks_pass_on_a_fresh_store() {
    let tmp = tempdir().expect("tempdir");
    let mut store = store_at(tmp.path());
    assert!(store.run_startup_checks());
    // a fresh store has nothing to repair and nothing to write
    assert!(!tmp.path().join("dados").join("familias.json").exists());
}
