pub mod catalog_entry;
pub mod media_item;
pub mod row_model;
pub mod selection;

pub use catalog_entry::*;
pub use media_item::*;
pub use row_model::*;
pub use selection::*;
