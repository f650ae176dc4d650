use std::path::{Component, Path, PathBuf};

use crate::error::MediaError;
use crate::media::image_loader::read_dimensions;
use crate::models::MediaRef;

/// Reads the natural dimensions of a preview image.
///
/// Called from the resolver worker thread, hence `Send + Sync`.
pub trait MediaProbe: Send + Sync {
    fn dimensions(&self, media: &MediaRef) -> Result<(u32, u32), MediaError>;
}

/// Resolves site-relative media URLs against a local media root.
#[derive(Debug, Clone)]
pub struct FileProbe {
    root: PathBuf,
}

impl FileProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Local path for `url`, or `None` for remote URLs and paths that would
    /// leave the media root.
    pub fn local_path(&self, url: &str) -> Option<PathBuf> {
        if url.contains("://") || url.starts_with("//") {
            return None;
        }
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl MediaProbe for FileProbe {
    fn dimensions(&self, media: &MediaRef) -> Result<(u32, u32), MediaError> {
        let path = self
            .local_path(&media.url)
            .ok_or_else(|| MediaError::Unsupported(media.url.clone()))?;
        read_dimensions(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_path_mapping() {
        let probe = FileProbe::new("/srv/site");
        assert_eq!(
            probe.local_path("/projects/casa/exterior/01.jpg"),
            Some(PathBuf::from("/srv/site/projects/casa/exterior/01.jpg"))
        );
        assert_eq!(
            probe.local_path("projects/casa/a.png?v=2"),
            Some(PathBuf::from("/srv/site/projects/casa/a.png"))
        );
        assert_eq!(probe.local_path("https://images.example/photo.jpg"), None);
        assert_eq!(probe.local_path("//cdn.example/photo.jpg"), None);
        assert_eq!(probe.local_path("/projects/../../etc/passwd"), None);
    }

    #[test]
    fn test_probe_reads_local_image() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("projects/casa/exterior");
        std::fs::create_dir_all(&folder).unwrap();
        image::RgbImage::new(64, 48).save(folder.join("01.png")).unwrap();

        let probe = FileProbe::new(dir.path());
        let media = MediaRef::new("/projects/casa/exterior/01.png");
        assert_eq!(probe.dimensions(&media).unwrap(), (64, 48));
    }

    #[test]
    fn test_remote_url_unsupported() {
        let probe = FileProbe::new("/srv/site");
        let err = probe
            .dimensions(&MediaRef::new("https://images.example/photo.jpg"))
            .unwrap_err();
        assert!(matches!(err, MediaError::Unsupported(_)));
    }
}
