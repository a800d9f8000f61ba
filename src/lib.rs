//! ts-catalog
//!
//! Qt Linguist (`.ts`) 翻訳カタログの読み込み・検索・書き出し

pub mod catalog;
pub mod config;
pub mod registry;
mod test_utils;
pub mod translator;
pub mod types;

pub use catalog::{
    Catalog,
    CatalogError,
};
pub use registry::CatalogRegistry;
pub use translator::Translator;
pub use types::LocaleCode;
