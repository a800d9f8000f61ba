//! 同梱のポーランド語・ロシア語カタログを使ったテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;
use ts_catalog::catalog::{
    Catalog,
    CatalogBuilder,
    CatalogError,
    CatalogHeader,
    Message,
    Translation,
};
use ts_catalog::config::{
    LanguageSettings,
    SettingsStore,
};
use ts_catalog::types::{
    LocaleCode,
    MessageStatus,
};
use ts_catalog::{
    CatalogRegistry,
    Translator,
};

/// 同梱フィクスチャのディレクトリ
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// フィクスチャを読み込む
fn load_fixture(name: &str) -> Catalog {
    Catalog::load_file(&fixtures_dir().join(name)).unwrap()
}

/// `(context, source, comment, translation, status)` of every message
fn message_tuples(catalog: &Catalog) -> Vec<(String, String, String, Option<Translation>, MessageStatus)> {
    catalog
        .messages()
        .map(|(context, message)| {
            (
                context.to_string(),
                message.source.clone(),
                message.comment.clone(),
                message.translation.clone(),
                message.status,
            )
        })
        .collect()
}

#[rstest]
#[case("translation_pl.ts", "main", "Undefined", "niezdefiniowany")]
#[case("translation_ru.ts", "main", "Undefined", "Неопределён")]
#[case("translation_pl.ts", "ConnectionButton", "IP", "IP")]
#[case("translation_ru.ts", "ConnectionButton", "IP", "")]
#[case("translation_pl.ts", "DoesNotExist", "Nonexistent", "Nonexistent")]
#[case("translation_ru.ts", "DoesNotExist", "Nonexistent", "Nonexistent")]
#[case("translation_pl.ts", "DevAddrBox", "Set Device's address", "Ustaw adres urządzenia")]
#[case("translation_ru.ts", "DevAddrBox", "Set Device's address", "Установите адрес устройства")]
fn test_lookup_fixture(
    #[case] file: &str,
    #[case] context: &str,
    #[case] source: &str,
    #[case] expected: &str,
) {
    let catalog = load_fixture(file);

    assert_eq!(catalog.lookup(context, source), expected);
}

#[test]
fn test_vanished_message_falls_back_to_source() {
    let catalog = load_fixture("translation_pl.ts");

    assert_eq!(catalog.lookup("SonarBox", "Echogram"), "Echogram");
    assert!(!catalog.contains("SonarBox", "Echogram"));
    assert_eq!(catalog.lookup("ConnectionViewer", "undefined"), "undefined");
    assert_eq!(catalog.lookup("DisplaySettings", "Echogram Side-Scan"), "Echogram skanu bocznego");
}

#[test]
fn test_trailing_whitespace_variants_are_distinct_keys() {
    let catalog = load_fixture("translation_pl.ts");

    assert_eq!(catalog.lookup("DisplaySettings", "Last data       "), "Ostatnie dane       ");
    assert_eq!(catalog.lookup("DisplaySettings", "Last data         "), "Last data         ");
    assert_eq!(catalog.lookup("DisplaySettings", "Last data"), "Last data");
}

#[rstest]
#[case("translation_pl.ts", "pl_PL", 47, 267, 30)]
#[case("translation_ru.ts", "ru_RU", 43, 259, 0)]
fn test_fixture_stats(
    #[case] file: &str,
    #[case] locale: &str,
    #[case] contexts: usize,
    #[case] finished: usize,
    #[case] vanished: usize,
) {
    let catalog = load_fixture(file);
    let stats = catalog.stats();

    assert_eq!(catalog.locale().as_str(), locale);
    assert_eq!((stats.contexts, stats.finished, stats.unfinished, stats.vanished), (contexts, finished, 0, vanished));
}

#[rstest]
#[case("translation_pl.ts")]
#[case("translation_ru.ts")]
fn test_fixture_round_trip(#[case] file: &str) {
    let catalog = load_fixture(file);

    let written = catalog.to_ts_string().unwrap();
    let reparsed = Catalog::from_ts_str(&written).unwrap();

    assert_eq!(reparsed.header(), catalog.header());
    assert_eq!(message_tuples(&reparsed), message_tuples(&catalog));
    assert_eq!(reparsed.lookup("main", "Undefined"), catalog.lookup("main", "Undefined"));
}

#[test]
fn test_dumped_file_loads_again() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("translation_ru.ts");
    let catalog = load_fixture("translation_ru.ts");

    catalog.write_ts(fs::File::create(&path).unwrap()).unwrap();
    let reloaded = Catalog::load_file(&path).unwrap();

    assert_eq!(reloaded.stats(), catalog.stats());
    assert_eq!(reloaded.lookup("ConnectionButton", "IP"), "");
}

#[test]
fn test_malformed_file_reports_path_and_translator_serves_source() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("translation_de.ts");
    fs::write(
        &path,
        "<?xml version=\"1.0\"?>\n<TS version=\"2.1\" language=\"de_DE\">\n<context>\n<name>main</name>\n<message>\n<source>Undefined</source>\n</context>\n</TS>\n",
    )
    .unwrap();

    let error = Catalog::load_file(&path).unwrap_err();
    match &error {
        CatalogError::Malformed { path: Some(error_path), .. } => assert_eq!(error_path, &path),
        other => panic!("unexpected error: {other:?}"),
    }

    let registry = CatalogRegistry::discover(temp_dir.path(), &LanguageSettings::default()).unwrap();
    let translator = Translator::new(LocaleCode::new("en_US"));
    let result = translator.switch_locale(&registry, &LocaleCode::new("de_DE"));

    assert!(matches!(result, Err(CatalogError::Malformed { .. })));
    assert_eq!(translator.lookup("main", "Undefined"), "Undefined");
    assert_eq!(translator.active_locale().as_str(), "en_US");
}

#[test]
fn test_registry_resolves_fixture_locales() {
    let registry = CatalogRegistry::discover(&fixtures_dir(), &LanguageSettings::default()).unwrap();

    let locales: Vec<&str> = registry.locales().into_iter().map(LocaleCode::as_str).collect();
    assert_eq!(locales, vec!["pl_PL", "ru_RU"]);
    assert_eq!(registry.resolve(&LocaleCode::new("pl")).unwrap(), fixtures_dir().join("translation_pl.ts"));
    assert!(matches!(registry.resolve(&LocaleCode::new("de")), Err(CatalogError::UnknownLocale(_))));
}

#[test]
fn test_switch_locale_between_fixtures() {
    let registry = CatalogRegistry::discover(&fixtures_dir(), &LanguageSettings::default()).unwrap();
    let translator = Translator::new(LocaleCode::new("en_US"));

    translator.switch_locale(&registry, &LocaleCode::new("pl_PL")).unwrap();
    let polish = translator.snapshot();
    translator.switch_locale(&registry, &LocaleCode::new("ru_RU")).unwrap();

    assert_eq!(polish.lookup("main", "Undefined"), "niezdefiniowany");
    assert_eq!(translator.lookup("main", "Undefined"), "Неопределён");
    assert_eq!(translator.active_locale().as_str(), "ru_RU");
}

#[test]
fn test_persisted_language_applies_after_restart() {
    let temp_dir = TempDir::new().unwrap();
    let settings_root = temp_dir.path().to_path_buf();
    let translations_dir = settings_root.join("languages");
    fs::create_dir_all(&translations_dir).unwrap();
    fs::copy(fixtures_dir().join("translation_pl.ts"), translations_dir.join("translation_pl.ts")).unwrap();

    let mut store = SettingsStore::new();
    store.load_settings(Some(settings_root.clone())).unwrap();
    let change = store.set_language(Some("pl_PL".to_string())).unwrap();
    store.save().unwrap();
    assert!(change.restart_required);

    let mut restarted = SettingsStore::new();
    restarted.load_settings(Some(settings_root)).unwrap();
    let registry = CatalogRegistry::discover(&restarted.translations_dir(), restarted.get_settings()).unwrap();
    let translator = Translator::bootstrap(&registry, restarted.get_settings());

    assert_eq!(translator.lookup("main", "Undefined"), "niezdefiniowany");
}

#[test]
fn test_dump_keeps_missing_translation_missing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("translation_pl.ts");
    fs::write(
        &path,
        "<?xml version=\"1.0\"?>\n<TS version=\"2.1\" language=\"pl_PL\">\n<context>\n<name>main</name>\n<message>\n<source>NoTranslationElement</source>\n</message>\n</context>\n</TS>\n",
    )
    .unwrap();
    let catalog = Catalog::load_file(&path).unwrap();

    catalog.write_ts(fs::File::create(&path).unwrap()).unwrap();
    let reloaded = Catalog::load_file(&path).unwrap();

    assert!(!fs::read_to_string(&path).unwrap().contains("<translation"));
    assert_eq!(reloaded.lookup("main", "NoTranslationElement"), "NoTranslationElement");
    assert_eq!(message_tuples(&reloaded), message_tuples(&catalog));
}

#[test]
fn test_numerus_lookup_with_slavic_rule() {
    let mut builder = CatalogBuilder::new(CatalogHeader::new(LocaleCode::new("pl_PL")));
    builder.message(
        "FileList",
        Message::numerus("%n file(s)", vec!["%n plik".to_string(), "%n pliki".to_string(), "%n plików".to_string()]),
    );
    let catalog = builder.build();

    assert_eq!(catalog.lookup_plural("FileList", "%n file(s)", "", 1), "1 plik");
    assert_eq!(catalog.lookup_plural("FileList", "%n file(s)", "", 3), "3 pliki");
    assert_eq!(catalog.lookup_plural("FileList", "%n file(s)", "", 5), "5 plików");
    assert_eq!(catalog.lookup_plural("FileList", "%n file(s)", "", 22), "22 pliki");
    assert_eq!(catalog.lookup_plural("FileList", "%n file(s)", "", 12), "12 plików");
}
