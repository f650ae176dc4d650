use serde::Deserialize;

use crate::models::{CatalogEntry, EntryStatus, MediaRef};

/// Shown when a project has no exterior images at all.
pub const FALLBACK_COVER_URL: &str =
    "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=1600&q=80";

/// On-disk `projects.json` layout.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub slug: String,
    pub title: String,
    pub status: EntryStatus,
    pub year: i32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub m2: Option<f64>,
    #[serde(default)]
    pub exterior_images: Vec<String>,
    #[serde(default)]
    pub interior_images: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
}

impl ProjectRecord {
    /// Hidden only when explicitly marked `visible: false`.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Cover media URL: the configured cover, else the first exterior image,
    /// else the shared fallback.
    pub fn cover_url(&self) -> String {
        let base = format!("/projects/{}", self.slug);
        if let Some(cover) = self.cover_image.as_deref().filter(|c| !c.is_empty()) {
            return format!("{}/exterior/{}", base, cover);
        }
        match self.exterior_images.first() {
            Some(first) => format!("{}/exterior/{}", base, first),
            None => FALLBACK_COVER_URL.to_string(),
        }
    }

    pub fn to_entry(&self) -> CatalogEntry {
        CatalogEntry::new(
            self.slug.clone(),
            self.title.clone(),
            self.status,
            self.year,
            MediaRef::new(self.cover_url()),
        )
    }
}
