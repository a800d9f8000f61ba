//! Language settings: persisted locale choice and catalog discovery options.
mod loader;
mod manager;
mod types;

pub use manager::{
    LanguageChange,
    SettingsStore,
};
pub use types::{
    ConfigError,
    LanguageSettings,
    ValidationError,
};
