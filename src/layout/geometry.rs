use crate::config::{HeaderMetrics, NavigatorConfig};

/// Live viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Vertical slice of the viewport the picker occupies, below the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerZone {
    pub top_px: u32,
    pub height_px: u32,
}

/// Horizontal band in viewport coordinates. Both edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: f32,
    pub bottom: f32,
}

impl Band {
    pub fn centered(center: f32, height: f32) -> Self {
        let half = height.max(0.0) / 2.0;
        Self {
            top: center - half,
            bottom: center + half,
        }
    }

    pub fn contains(&self, y: f32) -> bool {
        y > self.top && y < self.bottom
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Picker geometry for one viewport. Replaced wholesale on every resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryConfig {
    pub row_height_px: u32,
    pub visible_row_count: u32,
    pub is_landscape_viewport: bool,
    pub picker_zone: PickerZone,
}

impl GeometryConfig {
    /// Rendered picker height: never above the zone, short of it by less than one row.
    pub fn picker_height_px(&self) -> u32 {
        self.row_height_px * self.visible_row_count
    }

    /// Tap-to-open band centered in the picker zone. `band_px` overrides the
    /// default height of one row.
    pub fn center_band(&self, band_px: Option<u32>) -> Band {
        let height = band_px.unwrap_or(self.row_height_px) as f32;
        let center = self.picker_zone.top_px as f32 + self.picker_zone.height_px as f32 / 2.0;
        Band::centered(center, height)
    }
}

/// Derives picker geometry from the viewport and the header breakpoint.
#[derive(Debug, Clone)]
pub struct GeometryCalculator {
    header: HeaderMetrics,
    visible_row_count: u32,
}

impl GeometryCalculator {
    pub fn new(header: HeaderMetrics, visible_row_count: u32) -> Self {
        Self {
            header,
            visible_row_count: visible_row_count.max(1),
        }
    }

    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self::new(config.header, config.visible_row_count)
    }

    pub fn header_height(&self, viewport: Viewport) -> u32 {
        self.header.height_for(viewport.width)
    }

    /// Computes geometry for `viewport`.
    ///
    /// In landscape the picker gets the whole area below the header; in
    /// portrait it shares that area with the preview pane and gets half.
    /// Pure function of its inputs, so repeated calls agree.
    pub fn compute(&self, viewport: Viewport) -> GeometryConfig {
        let header_height = self.header_height(viewport);
        let available_height = viewport.height.saturating_sub(header_height);
        let is_landscape = viewport.is_landscape();
        let picker_zone_height = if is_landscape {
            available_height
        } else {
            available_height / 2
        };

        GeometryConfig {
            row_height_px: picker_zone_height / self.visible_row_count,
            visible_row_count: self.visible_row_count,
            is_landscape_viewport: is_landscape,
            picker_zone: PickerZone {
                top_px: header_height,
                height_px: picker_zone_height,
            },
        }
    }
}
