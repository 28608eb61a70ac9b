mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::pretty_assertions::assert_eq;
use tessera::config::{OcrConfig, DEFAULT_ENGINE_CONFIG_FILE};
use tessera::ocr::load_engine_settings;

fn ocr_config(home: &Path, engine_config: Option<PathBuf>) -> OcrConfig {
    OcrConfig {
        home: Some(home.to_path_buf()),
        engine_config,
        timeout_secs: 60,
    }
}

#[test]
fn test_bundled_config_loads() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    assert!(manifest_dir.join(DEFAULT_ENGINE_CONFIG_FILE).is_file());

    let settings = load_engine_settings(&ocr_config(manifest_dir, None)).unwrap();

    assert_eq!(settings.global.text_score, 0.5);
    assert_eq!(settings.tesseract.languages, "eng");
    assert_eq!(settings.tesseract.data_path, None);
    assert_eq!(settings.tesseract.source_resolution, Some(300));
    assert_eq!(settings.tesseract.char_whitelist, None);
}

#[test]
fn test_explicit_file_overrides_install_root() {
    let home = tempfile::tempdir().unwrap();
    fs::write(
        home.path().join(DEFAULT_ENGINE_CONFIG_FILE),
        "[tesseract]\nlanguages = \"deu\"\n",
    )
    .unwrap();

    let other = tempfile::tempdir().unwrap();
    let explicit = other.path().join("custom.toml");
    fs::write(
        &explicit,
        "[global]\ntext_score = 0.75\n[tesseract]\nlanguages = \"eng+fra\"\ndata_path = \"models\"\n",
    )
    .unwrap();

    let settings = load_engine_settings(&ocr_config(home.path(), Some(explicit))).unwrap();

    assert_eq!(settings.global.text_score, 0.75);
    assert_eq!(settings.tesseract.languages, "eng+fra");
    assert_eq!(
        settings.tesseract.data_path,
        Some(other.path().join("models"))
    );
}
