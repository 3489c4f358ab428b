use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn altar(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("altar").expect("binary");
    cmd.current_dir(root.path())
        .env("ALTAR_DATA_DIR", root.path())
        .env("ALTAR_BUNDLE_DIR", root.path().join("bundle"))
        .env_remove("ALTAR_LEGACY_DIR")
        .env_remove("ALTAR_CONFIG_PATH");
    cmd
}

fn write_sample_jpeg(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    let img = image::RgbImage::from_pixel(320, 240, image::Rgb([200, 60, 60]));
    img.save(path).expect("write sample jpeg");
}

fn count_zips(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| {
                    e.path().extension().and_then(|s| s.to_str()) == Some("zip")
                })
                .count()
        })
        .unwrap_or(0)
}

#[test]
fn status_reports_an_empty_store() {
    let tmp = tempdir().expect("tempdir");
    altar(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("families=0 drawn=0 undrawn=0"))
        .stdout(predicate::str::contains("last_drawn=none"))
        .stdout(predicate::str::contains("status: ok"));
}

#[test]
fn added_family_shows_up_in_the_listing() {
    let tmp = tempdir().expect("tempdir");
    let photo = tmp.path().join("incoming").join("foto.jpg");
    write_sample_jpeg(&photo);

    altar(&tmp)
        .args(["add", "--nome", "Família Silva", "--foto"])
        .arg(&photo)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "added family 'Família Silva' with number 1",
        ));

    altar(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Família Silva"))
        .stdout(predicate::str::contains("total=1 drawn=0"));
}

#[test]
fn validate_flags_a_corrupt_roster_then_recovers() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("dados").join("familias.json");
    fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
    fs::write(&file, "{ not an array").expect("seed");

    altar(&tmp)
        .arg("validate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("corrupt"));

    assert!(tmp.path().join("dados").join("familias.json.bak").exists());

    altar(&tmp)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate: ok"));
}

#[test]
fn first_run_takes_exactly_one_version_backup() {
    let tmp = tempdir().expect("tempdir");
    altar(&tmp).arg("status").assert().success();
    altar(&tmp).arg("status").assert().success();

    assert_eq!(count_zips(&tmp.path().join("backups")), 1);
    let marker = fs::read_to_string(tmp.path().join("version.txt")).expect("marker");
    assert_eq!(marker.trim(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn draw_picks_the_only_family_then_runs_dry() {
    let tmp = tempdir().expect("tempdir");
    let photo = tmp.path().join("incoming").join("foto.jpg");
    write_sample_jpeg(&photo);
    altar(&tmp)
        .args(["add", "--nome", "Única", "--foto"])
        .arg(&photo)
        .assert()
        .success();

    altar(&tmp)
        .arg("draw")
        .assert()
        .success()
        .stdout(predicate::str::contains("drew family 1 ('Única')"));
    assert!(tmp.path().join("dados").join("sorteio.json").exists());

    altar(&tmp)
        .arg("draw")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no undrawn families remain"));
}

#[test]
fn reset_clears_the_draw_state_end_to_end() {
    let tmp = tempdir().expect("tempdir");
    let photo = tmp.path().join("incoming").join("foto.jpg");
    write_sample_jpeg(&photo);
    for nome in ["A", "B"] {
        altar(&tmp)
            .args(["add", "--nome", nome, "--foto"])
            .arg(&photo)
            .assert()
            .success();
    }
    altar(&tmp).arg("draw").assert().success();

    altar(&tmp)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("reset: ok"));

    assert!(!tmp.path().join("dados").join("sorteio.json").exists());
    altar(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("families=2 drawn=0 undrawn=2"));
}
