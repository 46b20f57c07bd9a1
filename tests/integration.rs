// SPDX-License-Identifier: MPL-2.0
use search_lens::config::{self, Config};
use search_lens::i18n::fluent::I18n;
use search_lens::search::routes::ApiVariant;
use search_lens::search::validation::{validate_image, Rejection, UploadLimits};
use tempfile::tempdir;

#[test]
fn test_language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let temp_config_file_path = dir.path().join("settings.toml");

    // 1. Initial config: en-US
    let mut initial_config = Config::default();
    initial_config.general.language = Some("en-US".to_string());
    config::save_to_path(&initial_config, &temp_config_file_path)
        .expect("Failed to write initial config file");

    let loaded_initial_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load initial config from path");
    let i18n_en = I18n::new(None, &loaded_initial_config);
    assert_eq!(i18n_en.current_locale().to_string(), "en-US");
    assert_eq!(i18n_en.tr("navbar-home"), "Home");

    // 2. Change config to nl
    let mut dutch_config = loaded_initial_config.clone();
    dutch_config.general.language = Some("nl".to_string());
    config::save_to_path(&dutch_config, &temp_config_file_path)
        .expect("Failed to write dutch config file");

    let loaded_dutch_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load dutch config from path");
    let i18n_nl = I18n::new(None, &loaded_dutch_config);
    assert_eq!(i18n_nl.current_locale().to_string(), "nl");
    assert_eq!(i18n_nl.tr("navbar-home"), "Start");

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn test_cli_language_beats_config() {
    let mut config = Config::default();
    config.general.language = Some("nl".to_string());
    let i18n = I18n::new(Some("en-US".to_string()), &config);
    assert_eq!(i18n.current_locale().to_string(), "en-US");
}

#[test]
fn test_upload_limits_from_settings_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[server]
base_url = "https://search.example.org/app/"
api_variant = "groups"

[upload]
max_upload_size = 1000
allowed_extensions = ".png"
"#,
    )
    .expect("Failed to write settings");

    let config = config::load_from_path(&path).expect("Failed to load settings");
    assert_eq!(config.server.api_variant, ApiVariant::Groups);

    let limits = UploadLimits::from_config(&config.upload);
    assert_eq!(validate_image("photo.png", 999, &limits), Ok(()));
    assert_eq!(
        validate_image("photo.png", 1000, &limits),
        Err(Rejection::TooLarge {
            size: 1000,
            limit: 1000
        })
    );
    assert_eq!(
        validate_image("photo.jpg", 10, &limits),
        Err(Rejection::WrongFormat)
    );
}
