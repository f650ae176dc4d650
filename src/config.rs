// Navigator configuration
// Defaults mirror the public index page; every threshold can be overridden
// through CATNAV_* environment variables for on-device tuning.

use std::time::Duration;

use tracing::warn;

const DEFAULT_VISIBLE_ROWS: u32 = 11;
const DEFAULT_TAP_SLOP_PX: f32 = 10.0;
const DEFAULT_BUSY_WINDOW_MS: u64 = 300;
const DEFAULT_TOUCH_BREAKPOINT_PX: u32 = 1367;
const DEFAULT_PLACEHOLDER_HEIGHT_PX: u32 = 480;
const DEFAULT_ORIENTATION_CACHE: usize = 64;

/// Header height as a function of viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMetrics {
    pub narrow_px: u32,
    pub wide_px: u32,
    /// Viewports at least this wide use `wide_px`.
    pub breakpoint_px: u32,
}

impl Default for HeaderMetrics {
    fn default() -> Self {
        Self {
            narrow_px: 60,
            wide_px: 78,
            breakpoint_px: 768,
        }
    }
}

impl HeaderMetrics {
    pub fn height_for(&self, viewport_width: u32) -> u32 {
        if viewport_width >= self.breakpoint_px {
            self.wide_px
        } else {
            self.narrow_px
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorConfig {
    /// Rows the picker shows at once (default: 11)
    pub visible_row_count: u32,
    pub header: HeaderMetrics,
    /// Maximum touch displacement still counted as a tap (default: 10px)
    pub tap_slop_px: f32,
    /// Time after a picker rotation during which taps are ignored (default: 300ms)
    pub busy_window: Duration,
    /// Height of the tap-to-open band; `None` uses one row height.
    pub tap_band_px: Option<u32>,
    /// Viewports narrower than this use the touch layout even without touch input.
    pub touch_breakpoint_px: Option<u32>,
    /// Height reserved while the interaction mode is still unknown.
    pub placeholder_height_px: u32,
    /// Number of resolved orientations kept per navigator.
    pub orientation_cache_entries: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            visible_row_count: DEFAULT_VISIBLE_ROWS,
            header: HeaderMetrics::default(),
            tap_slop_px: DEFAULT_TAP_SLOP_PX,
            busy_window: Duration::from_millis(DEFAULT_BUSY_WINDOW_MS),
            tap_band_px: None,
            touch_breakpoint_px: Some(DEFAULT_TOUCH_BREAKPOINT_PX),
            placeholder_height_px: DEFAULT_PLACEHOLDER_HEIGHT_PX,
            orientation_cache_entries: DEFAULT_ORIENTATION_CACHE,
        }
    }
}

impl NavigatorConfig {
    /// Defaults overridden by any CATNAV_* variables present in the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rows) = parse_var::<u32, _>(&lookup, "CATNAV_VISIBLE_ROWS").filter(|v| *v > 0) {
            config.visible_row_count = rows;
        }
        if let Some(slop) = parse_var::<f32, _>(&lookup, "CATNAV_TAP_SLOP_PX")
            .filter(|v| v.is_finite() && *v > 0.0)
        {
            config.tap_slop_px = slop;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "CATNAV_BUSY_WINDOW_MS") {
            config.busy_window = Duration::from_millis(ms);
        }
        if let Some(band) = parse_var::<u32, _>(&lookup, "CATNAV_TAP_BAND_PX").filter(|v| *v > 0) {
            config.tap_band_px = Some(band);
        }
        match lookup("CATNAV_TOUCH_BREAKPOINT_PX").map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "off" | "none" | "0") => {
                config.touch_breakpoint_px = None;
            }
            Some(_) => {
                if let Some(px) = parse_var::<u32, _>(&lookup, "CATNAV_TOUCH_BREAKPOINT_PX") {
                    config.touch_breakpoint_px = Some(px);
                }
            }
            None => {}
        }
        if let Some(entries) =
            parse_var::<usize, _>(&lookup, "CATNAV_ORIENTATION_CACHE").filter(|v| *v > 0)
        {
            config.orientation_cache_entries = entries;
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}
