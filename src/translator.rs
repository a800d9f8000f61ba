//! Active-locale holder used by the UI layer.
//!
//! A [`Translator`] owns the catalog currently in effect. Lookups work on an
//! `Arc` snapshot, so a locale switch never blocks or tears a reader.

use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use crate::catalog::{
    Catalog,
    CatalogError,
};
use crate::config::LanguageSettings;
use crate::registry::CatalogRegistry;
use crate::types::LocaleCode;

/// Owns the active catalog and answers lookups against it.
#[derive(Debug)]
pub struct Translator {
    /// Catalog in effect; replaced whole on every switch.
    current: RwLock<Arc<Catalog>>,
    /// Locale the source texts are written in.
    source_locale: LocaleCode,
}

impl Translator {
    /// Starts with an empty catalog, so every lookup returns the source text.
    #[must_use]
    pub fn new(source_locale: LocaleCode) -> Self {
        let fallback = Arc::new(Catalog::empty(source_locale.clone()));
        Self { current: RwLock::new(fallback), source_locale }
    }

    /// Startup wiring: applies the persisted language, or stays on the source
    /// language when none is set or the catalog cannot be loaded.
    #[must_use]
    pub fn bootstrap(registry: &CatalogRegistry, settings: &LanguageSettings) -> Self {
        let translator = Self::new(LocaleCode::new(settings.source_language.as_str()));

        if let Some(language) = &settings.language {
            // Failure is already logged and the fallback is in place.
            let _ = translator.switch_locale(registry, &LocaleCode::new(language.as_str()));
        }
        translator
    }

    /// Current catalog. Callers keep the snapshot they got for as long as they
    /// hold it, even across a switch.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the active catalog and returns the previous one.
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(catalog))
    }

    /// Loads and installs the catalog for `locale`.
    ///
    /// Switching to the source locale needs no catalog. On failure the source
    /// fallback is installed and the error is returned.
    ///
    /// # Errors
    /// - [`CatalogError::UnknownLocale`] if no catalog is registered
    /// - [`CatalogError::Io`] or [`CatalogError::Malformed`] if loading failed
    pub fn switch_locale(&self, registry: &CatalogRegistry, locale: &LocaleCode) -> Result<(), CatalogError> {
        if locale.matches(&self.source_locale) {
            tracing::info!(%locale, "Using source language");
            self.install(Catalog::empty(self.source_locale.clone()));
            return Ok(());
        }

        match registry.load(locale) {
            Ok(catalog) => {
                tracing::info!(%locale, catalog_locale = %catalog.locale(), "Switched locale");
                self.install(catalog);
                Ok(())
            }
            Err(e) => {
                tracing::error!(%locale, error = %e, "Failed to load catalog, falling back to source texts");
                self.install(Catalog::empty(self.source_locale.clone()));
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn active_locale(&self) -> LocaleCode {
        self.snapshot().locale().clone()
    }

    #[must_use]
    pub const fn source_locale(&self) -> &LocaleCode {
        &self.source_locale
    }

    /// Translation of `source` in `context`, or `source` itself.
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str) -> String {
        self.snapshot().lookup(context, source).to_string()
    }

    #[must_use]
    pub fn lookup_disambiguated(&self, context: &str, source: &str, comment: &str) -> String {
        self.snapshot().lookup_disambiguated(context, source, comment).to_string()
    }

    #[must_use]
    pub fn lookup_plural(&self, context: &str, source: &str, comment: &str, count: u64) -> String {
        self.snapshot().lookup_plural(context, source, comment, count)
    }
}
