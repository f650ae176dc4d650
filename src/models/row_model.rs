use crate::models::{CatalogEntry, EntryStatus};

/// One rendered catalog row, shared by the hover list and the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowModel {
    pub row_index: u32,
    pub slug: String,
    pub title: String,
    pub status: EntryStatus,
    pub year: i32,
    pub is_active: bool,
}

impl RowModel {
    pub fn new(row_index: u32, entry: &CatalogEntry, is_active: bool) -> Self {
        Self {
            row_index,
            slug: entry.id.clone(),
            title: entry.title.clone(),
            status: entry.status,
            year: entry.year,
            is_active,
        }
    }
}
