//! 翻訳カタログファイルの検出とロケール解決
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;

use crate::catalog::{
    Catalog,
    CatalogError,
    read_header_file,
};
use crate::config::{
    ConfigError,
    LanguageSettings,
    ValidationError,
};
use crate::types::LocaleCode;

/// 検出したカタログファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub locale: LocaleCode,
    pub path: PathBuf,
}

/// ロケールからカタログファイルを引くためのレジストリ
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    /// ロケール順にソート済み
    entries: Vec<CatalogEntry>,
}

impl CatalogRegistry {
    /// 既知のエントリからレジストリを作成
    #[must_use]
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.locale.normalized().cmp(&b.locale.normalized()));
        Self { entries }
    }

    /// 翻訳ディレクトリを走査してカタログを検出
    ///
    /// ロケールはルート要素の `language` 属性から読む。属性がなければ
    /// ファイル名（`translation_ru.ts` → `ru`）から推測する。
    /// 読めないファイルは警告を出してスキップする。
    ///
    /// # Errors
    /// - 無効な glob パターン
    pub fn discover(dir: &Path, settings: &LanguageSettings) -> Result<Self, ConfigError> {
        tracing::debug!(dir = %dir.display(), "Discovering catalogs");

        let files = Self::find_catalog_files(dir, &settings.file_pattern, &settings.exclude_patterns)?;

        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let header = match read_header_file(&path) {
                Ok(header) => header,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable catalog");
                    continue;
                }
            };

            let Some(locale) = header.language.or_else(|| locale_from_file_name(&path)) else {
                tracing::warn!(path = %path.display(), "Cannot determine catalog locale, skipping");
                continue;
            };

            tracing::debug!(path = %path.display(), %locale, "Found catalog");
            entries.push(CatalogEntry { locale, path });
        }

        Ok(Self::new(entries))
    }

    /// カタログファイルを検索
    fn find_catalog_files(
        dir: &Path,
        file_pattern: &str,
        exclude_patterns: &[String],
    ) -> Result<Vec<PathBuf>, ConfigError> {
        let include_set = build_glob_set("filePattern", std::slice::from_ref(&file_pattern.to_string()))?;
        let exclude_set = build_glob_set("excludePatterns", exclude_patterns)?;

        let mut found_files = Vec::new();
        for result in WalkBuilder::new(dir)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            // ファイルのみを対象
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let Ok(relative_path) = path.strip_prefix(dir) else {
                continue;
            };
            if !include_set.is_match(relative_path) || exclude_set.is_match(relative_path) {
                continue;
            }

            found_files.push(path.to_path_buf());
        }

        found_files.sort();
        Ok(found_files)
    }

    /// ロケールに対応するカタログファイルを返す
    ///
    /// 正規化したコードの完全一致を優先し、なければ同じ言語のカタログを使う。
    ///
    /// # Errors
    /// - [`CatalogError::UnknownLocale`]: 対応するカタログがない
    pub fn resolve(&self, locale: &LocaleCode) -> Result<&Path, CatalogError> {
        let exact = self.entries.iter().find(|entry| entry.locale.matches(locale));
        let entry = exact.or_else(|| {
            let language = locale.language();
            self.entries.iter().find(|entry| entry.locale.language() == language)
        });

        entry
            .map(|entry| entry.path.as_path())
            .ok_or_else(|| CatalogError::UnknownLocale(locale.clone()))
    }

    /// ロケールのカタログを読み込む
    ///
    /// ファイルに `language` 属性がない場合も、要求されたロケールの
    /// 複数形規則が使われる。
    ///
    /// # Errors
    /// - [`CatalogError::UnknownLocale`]
    /// - [`CatalogError::Io`] / [`CatalogError::Malformed`]
    pub fn load(&self, locale: &LocaleCode) -> Result<Catalog, CatalogError> {
        let path = self.resolve(locale)?;
        let catalog = Catalog::load_file(path)?;
        if catalog.header().language.is_some() {
            Ok(catalog)
        } else {
            Ok(catalog.with_locale(locale.clone()))
        }
    }

    /// 検出したロケール（ソート済み）
    #[must_use]
    pub fn locales(&self) -> Vec<&LocaleCode> {
        self.entries.iter().map(|entry| &entry.locale).collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// パターン一覧から `GlobSet` をビルド
fn build_glob_set(field: &str, patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for (index, pattern) in patterns.iter().enumerate() {
        let glob = Glob::new(pattern).map_err(|e| {
            ConfigError::ValidationErrors(vec![ValidationError::new(
                format!("{field}[{index}]"),
                format!("Invalid glob pattern '{pattern}': {e}"),
            )])
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| {
        ConfigError::ValidationErrors(vec![ValidationError::new(
            field,
            format!("Failed to build patterns: {e}"),
        )])
    })
}

/// ファイル名からロケールを推測する
///
/// `_` で区切られた最初の 2〜3 文字の小文字部分以降をロケールとみなす
/// （`translation_pl_PL.ts` → `pl_PL`）。
fn locale_from_file_name(path: &Path) -> Option<LocaleCode> {
    let stem = path.file_stem()?.to_str()?;
    let segments: Vec<&str> = stem.split('_').collect();
    let start = segments.iter().position(|segment| {
        (2..=3).contains(&segment.len()) && segment.chars().all(|c| c.is_ascii_lowercase())
    })?;
    Some(LocaleCode::new(segments.get(start..)?.join("_")))
}
