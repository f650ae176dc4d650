use crate::models::MediaRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaStatus {
    #[default]
    Ready,
    /// The asset failed to load; it is still shown, framed as landscape.
    Unavailable,
}

/// What the preview pane currently shows.
///
/// Only `SelectionSynchronizer` writes these fields; everything else reads
/// through the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub(crate) active_entry_id: Option<String>,
    pub(crate) active_media: Option<MediaRef>,
    pub(crate) is_vertical: bool,
    pub(crate) is_ready: bool,
    pub(crate) media_status: MediaStatus,
}

impl SelectionState {
    pub fn active_entry_id(&self) -> Option<&str> {
        self.active_entry_id.as_deref()
    }

    pub fn active_media(&self) -> Option<&MediaRef> {
        self.active_media.as_ref()
    }

    pub fn is_vertical(&self) -> bool {
        self.is_vertical
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn media_status(&self) -> MediaStatus {
        self.media_status
    }
}
