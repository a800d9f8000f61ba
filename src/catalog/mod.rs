//! Qt Linguist translation catalogs: model, `.ts` codec and numerus forms.

mod error;
mod model;
pub mod plural;
pub mod reader;
mod writer;

pub use error::CatalogError;
pub use model::{
    Catalog,
    CatalogBuilder,
    CatalogHeader,
    CatalogStats,
    Context,
    Message,
    Translation,
};
pub use reader::read_header_file;
