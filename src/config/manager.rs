//! 言語設定の管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    LanguageSettings,
    loader,
};

/// 言語変更の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChange {
    /// 変更前の言語（`None` はソース言語）
    pub previous: Option<String>,
    /// 変更後の言語
    pub current: Option<String>,
    /// 起動時の言語と異なり、反映に再起動が必要かどうか
    pub restart_required: bool,
}

/// 言語設定の管理を行う
///
/// 起動時に読み込んだ言語を記録し、ユーザーが言語を変更したときに
/// 再起動が必要かどうかを判定する。
#[derive(Default, Debug, Clone)]
pub struct SettingsStore {
    /// 現在の設定
    current_settings: LanguageSettings,

    /// 設定ファイルを置くディレクトリ
    settings_root: Option<PathBuf>,

    /// 起動時（`load_settings` 時）の言語
    startup_language: Option<String>,
}

impl SettingsStore {
    /// 新しい設定ストアを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: LanguageSettings::default(), settings_root: None, startup_language: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `settings_root` - 設定ファイルを置くディレクトリ
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, settings_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings from: {:?}", settings_root);

        let settings = if let Some(root) = &settings_root {
            loader::load_from_root(root)?.map_or_else(LanguageSettings::default, |loaded| {
                tracing::debug!("Loaded settings: {:?}", loaded);
                loaded
            })
        } else {
            LanguageSettings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を保存
        self.startup_language.clone_from(&settings.language);
        self.current_settings = settings;
        self.settings_root = settings_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn update_settings(&mut self, new_settings: LanguageSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// ユーザーが選択した言語を記録する
    ///
    /// 表示中のカタログは変更しない。起動時の言語と異なる場合は
    /// `restart_required` が `true` になる。
    ///
    /// # Errors
    /// - バリデーションエラー（空の言語コードなど）
    pub fn set_language(&mut self, language: Option<String>) -> Result<LanguageChange, ConfigError> {
        let mut new_settings = self.current_settings.clone();
        new_settings.language.clone_from(&language);
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        let previous = std::mem::replace(&mut self.current_settings, new_settings).language;
        let restart_required = language != self.startup_language;
        tracing::info!(?previous, current = ?language, restart_required, "Language changed");

        Ok(LanguageChange { previous, current: language, restart_required })
    }

    /// 現在の設定を設定ファイルに保存する
    ///
    /// 設定ルートがない場合は何もしない。
    ///
    /// # Errors
    /// - ファイル書き込みエラー
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(root) = &self.settings_root else {
            tracing::debug!("No settings root, skipping save");
            return Ok(());
        };
        loader::save_to_root(root, &self.current_settings)
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &LanguageSettings {
        &self.current_settings
    }

    /// 設定ルートを取得
    #[must_use]
    pub const fn settings_root(&self) -> Option<&PathBuf> {
        self.settings_root.as_ref()
    }

    /// 起動時の言語を取得
    #[must_use]
    pub fn startup_language(&self) -> Option<&str> {
        self.startup_language.as_deref()
    }

    /// カタログディレクトリの絶対パス
    ///
    /// 相対パスは設定ルート（なければカレントディレクトリ）からの相対とみなす。
    #[must_use]
    pub fn translations_dir(&self) -> PathBuf {
        let dir = PathBuf::from(&self.current_settings.translations_dir);
        match &self.settings_root {
            Some(root) if dir.is_relative() => root.join(dir),
            _ => dir,
        }
    }
}
