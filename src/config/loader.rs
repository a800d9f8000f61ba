//! 設定ファイルの読み書き関数

use std::path::Path;

use super::{
    ConfigError,
    LanguageSettings,
};

/// 設定ファイル名
pub(super) const SETTINGS_FILE_NAME: &str = "ts-catalog.json";

/// 設定ルートから設定を読み込む
///
/// `ts-catalog.json` ファイルを探して読み込む
///
/// # Arguments
/// * `settings_root` - 設定ファイルを置くディレクトリ
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_root(settings_root: &Path) -> Result<Option<LanguageSettings>, ConfigError> {
    let config_path = settings_root.join(SETTINGS_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: LanguageSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// 設定ルートに設定を書き込む
///
/// # Errors
/// - JSON シリアライズエラー
/// - ファイル書き込みエラー
pub(super) fn save_to_root(settings_root: &Path, settings: &LanguageSettings) -> Result<(), ConfigError> {
    let config_path = settings_root.join(SETTINGS_FILE_NAME);
    tracing::debug!("Saving configuration to: {:?}", config_path);

    let mut content = serde_json::to_string_pretty(settings)?;
    content.push('\n');
    std::fs::create_dir_all(settings_root)?;
    std::fs::write(&config_path, content)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_root`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_root_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"language": "ru_RU"}"#;
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), config_content).unwrap();

        let result = load_from_root(temp_dir.path());

        assert!(result.is_ok());
        let settings = result.unwrap();
        assert!(settings.is_some());
        assert_eq!(settings.unwrap().language.as_deref(), Some("ru_RU"));
    }

    /// `load_from_root`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_root_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_root(temp_dir.path());

        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    /// `load_from_root`: JSON パースエラー
    #[rstest]
    fn test_load_from_root_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), "invalid json").unwrap();

        let result = load_from_root(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    /// `save_to_root`: 書き込んだ設定を読み戻せる
    #[rstest]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let settings_root = temp_dir.path().join("nested");
        let settings = LanguageSettings { language: Some("pl_PL".to_string()), ..LanguageSettings::default() };

        save_to_root(&settings_root, &settings).unwrap();
        let loaded = load_from_root(&settings_root).unwrap();

        assert_eq!(loaded, Some(settings));
        let raw = fs::read_to_string(settings_root.join(SETTINGS_FILE_NAME)).unwrap();
        assert!(raw.contains("\"sourceLanguage\": \"en_US\""));
    }
}
