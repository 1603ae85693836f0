//! Cassette replay integration tests — zero network I/O.
//!
//! All tests set `PARTYBUS_REPLAY` to a cassette file path so that the
//! binary never contacts a live API endpoint.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn cmd(cassette: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("partybus-visuals");
    cmd.env("PARTYBUS_REPLAY", cassette.to_str().unwrap())
        .env("PARTYBUS_CONFIG", "/nonexistent/partybus/config.toml")
        .env_remove("PARTYBUS_REC")
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY");
    cmd
}

/// Absolute path to the `test_fixtures` directory.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures").join(name)
}

/// Write a small JPEG to use as an uploaded photo.
fn write_photo(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    image::DynamicImage::new_rgb8(4, 4).save_with_format(&path, image::ImageFormat::Jpeg).unwrap();
    path
}

#[test]
fn tequila_tour_preview_creates_png() {
    let out = std::env::temp_dir().join("partybus_test_tequila.png");
    let _ = std::fs::remove_file(&out);

    cmd(&fixture("tequila_tour.cassette.yaml"))
        .args(["visualize", "tequila-tour", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    let data = std::fs::read(&out).expect("preview should have been saved");
    assert_eq!(&data[..8], &PNG_MAGIC);
    let _ = std::fs::remove_file(&out);
}

#[test]
fn missing_key_prompts_for_selection_and_proceeds() {
    let out = std::env::temp_dir().join("partybus_test_no_key.png");
    let _ = std::fs::remove_file(&out);

    cmd(&fixture("tequila_tour.cassette.yaml"))
        .args(["visualize", "tequila-tour", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Select a Gemini API key"))
        .stderr(predicate::str::contains("Saved:"));

    assert!(out.exists());
    let _ = std::fs::remove_file(&out);
}

#[test]
fn blank_config_key_counts_as_missing() {
    let dir = std::env::temp_dir().join("partybus_test_blank_key");
    std::fs::create_dir_all(&dir).unwrap();
    let config = dir.join("config.toml");
    std::fs::write(&config, "[keys]\ngemini = \"\"\n").unwrap();
    let out = dir.join("preview.png");

    cmd(&fixture("tequila_tour.cassette.yaml"))
        .env("PARTYBUS_CONFIG", config.to_str().unwrap())
        .args(["visualize", "tequila-tour", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Select a Gemini API key"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn selected_key_skips_selection_prompt() {
    let out = std::env::temp_dir().join("partybus_test_with_key.png");
    let _ = std::fs::remove_file(&out);

    cmd(&fixture("tequila_tour.cassette.yaml"))
        .env("GEMINI_API_KEY", "test-key")
        .args(["visualize", "tequila-tour", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Select a Gemini API key").not());

    let _ = std::fs::remove_file(&out);
}

#[test]
fn format_jpeg_converts_png_preview() {
    let out = std::env::temp_dir().join("partybus_test_tequila.jpg");
    let _ = std::fs::remove_file(&out);

    cmd(&fixture("tequila_tour.cassette.yaml"))
        .args(["visualize", "tequila-tour", "--format", "jpeg", "--output", out.to_str().unwrap()])
        .assert()
        .success();

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..3], &[0xFF, 0xD8, 0xFF], "Output should be a JPEG file");
    let _ = std::fs::remove_file(&out);
}

#[test]
fn auto_filename_uses_service_id_with_timestamp() {
    let work_dir = std::env::temp_dir().join("partybus_test_autofile");
    let _ = std::fs::remove_dir_all(&work_dir);
    std::fs::create_dir_all(&work_dir).unwrap();

    cmd(&fixture("tequila_tour.cassette.yaml"))
        .args(["visualize", "tequila-tour"])
        .current_dir(&work_dir)
        .assert()
        .success();

    let files: Vec<_> = std::fs::read_dir(&work_dir).unwrap().flatten().collect();
    assert_eq!(files.len(), 1, "Exactly one file should be created");
    let name = files[0].file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("tequila-tour-"), "got: {name}");
    assert!(name.ends_with(".png"), "got: {name}");

    let _ = std::fs::remove_dir_all(&work_dir);
}

#[test]
fn permission_denied_asks_for_a_new_key() {
    let out = std::env::temp_dir().join("partybus_test_denied.png");
    let _ = std::fs::remove_file(&out);

    cmd(&fixture("permission_denied.cassette.yaml"))
        .env("GEMINI_API_KEY", "revoked-key")
        .args(["visualize", "tequila-tour", "--output", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Select a Gemini API key"))
        .stderr(predicate::str::contains("was rejected"))
        .stderr(predicate::str::contains("Hubo un problema").not());

    assert!(!out.exists());
}

#[test]
fn recorded_missing_key_replays_as_rejected_key() {
    let out = std::env::temp_dir().join("partybus_test_missing_key_replay.png");
    let _ = std::fs::remove_file(&out);

    cmd(&fixture("missing_key.cassette.yaml"))
        .args(["visualize", "tequila-tour", "--output", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Select a Gemini API key"))
        .stderr(predicate::str::contains("was rejected"))
        .stderr(predicate::str::contains("Hubo un problema").not());

    assert!(!out.exists());
}

#[test]
fn quota_error_shows_failure_notice() {
    let out = std::env::temp_dir().join("partybus_test_quota.png");
    let _ = std::fs::remove_file(&out);

    cmd(&fixture("quota_exhausted.cassette.yaml"))
        .env("GEMINI_API_KEY", "test-key")
        .args(["visualize", "xv-anos", "--output", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Hubo un problema generando tu vista previa de lujo. Intenta de nuevo.",
        ))
        .stderr(predicate::str::contains("Preview for 'xv-anos' failed: request failed"));

    assert!(!out.exists());
}

#[test]
fn analyze_prints_recommendation() {
    let photo = write_photo("partybus_test_crew.jpg");

    cmd(&fixture("group_analysis.cassette.yaml"))
        .args(["analyze", photo.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("¡Veo unas 14 personas listas para el Tour a Tequila!"));

    let _ = std::fs::remove_file(&photo);
}

#[test]
fn analyze_falls_back_on_empty_reply() {
    let photo = write_photo("partybus_test_crew_empty.jpg");

    cmd(&fixture("empty_reply.cassette.yaml"))
        .args(["analyze", photo.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("¡Mejor escríbenos por WhatsApp!"));

    let _ = std::fs::remove_file(&photo);
}

#[test]
fn analyze_falls_back_on_remote_error() {
    let photo = write_photo("partybus_test_crew_error.jpg");

    cmd(&fixture("quota_exhausted.cassette.yaml"))
        .args(["analyze", photo.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("WhatsApp"));

    let _ = std::fs::remove_file(&photo);
}

#[test]
fn validate_accepts_party_photo() {
    let photo = write_photo("partybus_test_gallery_ok.jpg");

    cmd(&fixture("gallery_accepted.cassette.yaml"))
        .args(["validate", photo.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::diff("accepted\n"));

    let _ = std::fs::remove_file(&photo);
}

#[test]
fn validate_rejects_on_remote_error() {
    let photo = write_photo("partybus_test_gallery_err.jpg");

    cmd(&fixture("quota_exhausted.cassette.yaml"))
        .args(["validate", photo.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::diff("rejected\n"));

    let _ = std::fs::remove_file(&photo);
}

#[test]
fn edit_saves_restyled_photo() {
    let photo = write_photo("partybus_test_edit_in.jpg");
    let out = std::env::temp_dir().join("partybus_test_edit_out.png");
    let _ = std::fs::remove_file(&out);

    // The preview cassette's inline image stands in for the edited photo.
    cmd(&fixture("tequila_tour.cassette.yaml"))
        .env("GEMINI_API_KEY", "test-key")
        .args(["edit", photo.to_str().unwrap(), "agrega confeti", "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..8], &PNG_MAGIC);
    let _ = std::fs::remove_file(&photo);
    let _ = std::fs::remove_file(&out);
}

#[test]
fn missing_cassette_exits_with_error() {
    cmd(Path::new("/nonexistent/cassette.yaml"))
        .args(["visualize", "tequila-tour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load cassette"));
}
