use std::fmt;

use serde::Deserialize;

use crate::models::MediaRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum EntryStatus {
    #[serde(alias = "Construido")]
    Built,
    #[serde(alias = "Proyecto")]
    Project,
    #[serde(alias = "En obra", alias = "In progress")]
    InProgress,
}

impl EntryStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Built => "Built",
            Self::Project => "Project",
            Self::InProgress => "In progress",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable catalog item. Owned by the catalog; the navigator only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Unique, stable slug.
    pub id: String,
    pub title: String,
    pub status: EntryStatus,
    pub year: i32,
    pub media: MediaRef,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        status: EntryStatus,
        year: i32,
        media: MediaRef,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            year,
            media,
        }
    }
}
