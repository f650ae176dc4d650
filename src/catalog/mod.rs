//! Read-only catalog of entries for the navigator.
//!
//! Loaded once from a `projects.json` manifest: hidden projects are dropped,
//! each project is reduced to a [`CatalogEntry`] with its cover media, and
//! the list is put in display order.

pub mod manifest;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::CatalogError;
use crate::models::CatalogEntry;

pub use manifest::{Manifest, ProjectRecord, FALLBACK_COVER_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrder {
    /// Newest first; ties keep manifest order.
    #[default]
    ByYear,
    /// Stable pseudo-random order derived from the slugs.
    Shuffled,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// `XDG_CONFIG_HOME/catnav/projects.json` or the platform equivalent.
    pub fn default_path() -> Result<PathBuf, CatalogError> {
        let dirs = ProjectDirs::from("", "", "catnav").ok_or(CatalogError::NoConfigDir)?;
        Ok(dirs.config_dir().join("projects.json"))
    }

    pub fn load(path: &Path, order: CatalogOrder) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&contents, order)?;
        info!(path = ?path, entries = catalog.len(), ?order, "Loaded catalog");
        Ok(catalog)
    }

    pub fn from_json(json: &str, order: CatalogOrder) -> Result<Self, CatalogError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        Self::from_manifest(&manifest, order)
    }

    pub fn from_manifest(manifest: &Manifest, order: CatalogOrder) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for project in &manifest.projects {
            if !seen.insert(project.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(project.slug.clone()));
            }
        }

        let visible: Vec<CatalogEntry> = manifest
            .projects
            .iter()
            .filter(|p| p.is_visible())
            .map(ProjectRecord::to_entry)
            .collect();
        debug!(
            total = manifest.projects.len(),
            visible = visible.len(),
            "Filtered hidden projects"
        );

        Ok(Self::from_entries(visible, order))
    }

    pub fn from_entries(mut entries: Vec<CatalogEntry>, order: CatalogOrder) -> Self {
        match order {
            CatalogOrder::ByYear => entries.sort_by(|a, b| b.year.cmp(&a.year)),
            CatalogOrder::Shuffled => shuffle_by_slugs(&mut entries),
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == slug)
    }

    /// Previous and next entries around `slug`, wrapping at both ends.
    pub fn adjacent(&self, slug: &str) -> Option<(&CatalogEntry, &CatalogEntry)> {
        let index = self.entries.iter().position(|e| e.id == slug)?;
        let len = self.entries.len();
        let prev = &self.entries[(index + len - 1) % len];
        let next = &self.entries[(index + 1) % len];
        Some((prev, next))
    }
}

fn shuffle_by_slugs(entries: &mut [CatalogEntry]) {
    let joined: String = entries.iter().map(|e| e.id.as_str()).collect();
    let seed = xxh3_64(joined.as_bytes());
    for i in (1..entries.len()).rev() {
        let j = (seed.wrapping_add(i as u64 * 31) % (i as u64 + 1)) as usize;
        entries.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"{
        "projects": [
            {"slug": "a", "title": "Casa A", "status": "Construido", "year": 1999, "exteriorImages": ["a.jpg"]},
            {"slug": "b", "title": "Casa B", "status": "Proyecto", "year": 2020, "exteriorImages": ["b.jpg"]},
            {"slug": "c", "title": "Casa C", "status": "En obra", "year": 2020, "exteriorImages": ["c.mp4"]},
            {"slug": "hidden", "title": "Hidden", "status": "Built", "year": 2024, "visible": false}
        ]
    }"#;

    fn slugs(catalog: &Catalog) -> Vec<&str> {
        catalog.entries().iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_by_year_drops_hidden() {
        let catalog = Catalog::from_json(MANIFEST, CatalogOrder::ByYear).unwrap();
        assert_eq!(slugs(&catalog), vec!["b", "c", "a"]);
        assert!(catalog.get("hidden").is_none());
        assert_eq!(catalog.get("c").unwrap().media.url, "/projects/c/exterior/c.mp4");
    }

    #[test]
    fn test_shuffle_is_deterministic_permutation() {
        let first = Catalog::from_json(MANIFEST, CatalogOrder::Shuffled).unwrap();
        let second = Catalog::from_json(MANIFEST, CatalogOrder::Shuffled).unwrap();
        assert_eq!(slugs(&first), slugs(&second));

        let mut sorted = slugs(&first);
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_adjacent_wraps() {
        let catalog = Catalog::from_json(MANIFEST, CatalogOrder::ByYear).unwrap();
        let (prev, next) = catalog.adjacent("b").unwrap();
        assert_eq!((prev.id.as_str(), next.id.as_str()), ("a", "c"));
        let (prev, next) = catalog.adjacent("a").unwrap();
        assert_eq!((prev.id.as_str(), next.id.as_str()), ("c", "b"));
        assert!(catalog.adjacent("missing").is_none());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let json = r#"{"projects": [
            {"slug": "a", "title": "A", "status": "Built", "year": 1},
            {"slug": "a", "title": "A again", "status": "Built", "year": 2}
        ]}"#;
        let err = Catalog::from_json(json, CatalogOrder::ByYear).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSlug(slug) if slug == "a"));
    }

    #[test]
    fn test_bad_json() {
        let err = Catalog::from_json("{\"projects\": 3}", CatalogOrder::ByYear).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let catalog = Catalog::load(&path, CatalogOrder::ByYear).unwrap();
        assert_eq!(catalog.len(), 3);

        let err = Catalog::load(&dir.path().join("nope.json"), CatalogOrder::ByYear).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
