//! Composition root: one selection and one preview pane behind two
//! presentation modes.
//!
//! ```text
//! Loading ──probe──▶ PointerDriven ◀──resize──▶ TouchDriven
//! ```
//!
//! - `Loading`: only a fixed-height placeholder renders.
//! - `PointerDriven`: hovering a row selects it, clicking opens it.
//! - `TouchDriven`: rotating the picker selects, a confirming tap in the
//!   center band opens the selected entry, and page scroll is locked.
//!
//! A mode change observed while a touch sequence is in progress is held back
//! until that sequence resolves. Geometry always follows the viewport at once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::config::NavigatorConfig;
use crate::input::{
    EventChain, GestureDisambiguator, InteractionMode, InteractionModeDetector, Phase, Propagation,
    ScrollLockManager, ScrollSurface, TouchCapabilities, TouchDecision, TouchPoint,
};
use crate::layout::{Band, GeometryCalculator, GeometryConfig, Viewport};
use crate::media::{MediaProbe, OrientationResolver, ResolvedMedia};
use crate::models::{CatalogEntry, MediaRef, MediaStatus, RowModel, SelectionState};
use crate::selection::{CommitOutcome, SelectOutcome, SelectionSynchronizer};

/// Receives detail-view navigation requests.
pub trait NavigationSink {
    fn navigate_to_detail(&mut self, slug: &str);
}

impl<F> NavigationSink for F
where
    F: FnMut(&str),
{
    fn navigate_to_detail(&mut self, slug: &str) {
        self(slug)
    }
}

/// Sink that remembers every navigation, in order.
#[derive(Debug, Default, Clone)]
pub struct NavigationLog {
    pub slugs: Vec<String>,
}

impl NavigationSink for NavigationLog {
    fn navigate_to_detail(&mut self, slug: &str) {
        self.slugs.push(slug.to_string());
    }
}

/// Environment snapshot delivered on mount, resize and orientation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub viewport: Viewport,
    pub touch: TouchCapabilities,
}

impl Environment {
    pub fn new(viewport: Viewport, touch: TouchCapabilities) -> Self {
        Self { viewport, touch }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Start,
    Move,
    End,
    Cancel,
}

/// Raw touch event as seen by the capture-phase observer.
#[derive(Debug)]
pub struct TouchEvent {
    pub kind: TouchKind,
    pub point: TouchPoint,
    pub at: Instant,
    pub cancelable: bool,
    default_prevented: Cell<bool>,
}

impl TouchEvent {
    pub fn new(kind: TouchKind, point: TouchPoint, at: Instant) -> Self {
        Self {
            kind,
            point,
            at,
            cancelable: true,
            default_prevented: Cell::new(false),
        }
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// No-op on events that are not cancelable.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// What the preview pane shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPane {
    pub media: Option<MediaRef>,
    pub is_vertical: bool,
    pub is_ready: bool,
    pub status: MediaStatus,
}

impl PreviewPane {
    fn from_state(state: &SelectionState) -> Self {
        Self {
            media: state.active_media().cloned(),
            is_vertical: state.is_vertical(),
            is_ready: state.is_ready(),
            status: state.media_status(),
        }
    }
}

/// Toolkit-independent render model.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorView {
    Placeholder {
        height_px: u32,
    },
    HoverList {
        rows: Vec<RowModel>,
        preview: PreviewPane,
    },
    Picker {
        rows: Vec<RowModel>,
        geometry: GeometryConfig,
        center_band: Band,
        preview: PreviewPane,
    },
}

pub struct CatalogNavigator<S: NavigationSink> {
    config: NavigatorConfig,
    entries: Vec<CatalogEntry>,
    detector: InteractionModeDetector,
    calculator: GeometryCalculator,
    geometry: Option<GeometryConfig>,
    deferred_env: Option<Environment>,
    selection: SelectionSynchronizer,
    gestures: GestureDisambiguator,
    scroll_lock: ScrollLockManager,
    sink: S,
}

impl<S: NavigationSink> CatalogNavigator<S> {
    pub fn new(
        entries: Vec<CatalogEntry>,
        config: NavigatorConfig,
        probe: Arc<dyn MediaProbe>,
        scroll_surface: Rc<dyn ScrollSurface>,
        sink: S,
    ) -> Self {
        let resolver = OrientationResolver::new(probe, config.orientation_cache_entries);
        Self {
            detector: InteractionModeDetector::new(config.touch_breakpoint_px),
            calculator: GeometryCalculator::from_config(&config),
            gestures: GestureDisambiguator::from_config(&config),
            geometry: None,
            deferred_env: None,
            selection: SelectionSynchronizer::new(resolver),
            scroll_lock: ScrollLockManager::new(scroll_surface),
            entries,
            config,
            sink,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.detector.mode()
    }

    pub fn geometry(&self) -> Option<&GeometryConfig> {
        self.geometry.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    /// Entry the user last asked for: the pending request if there is one,
    /// otherwise the active entry.
    pub fn selected_entry_id(&self) -> Option<&str> {
        self.selection
            .pending()
            .map(|ticket| ticket.entry_id.as_str())
            .or_else(|| self.selection.state().active_entry_id())
    }

    /// First probe: classifies the mode, computes geometry and starts
    /// resolving the first entry. Later calls behave like [`resize`](Self::resize).
    pub fn mount(&mut self, env: Environment) {
        if self.detector.mode().is_resolved() {
            return self.resize(env);
        }
        self.apply_environment(env);
        info!(
            entries = self.entries.len(),
            mode = ?self.mode(),
            width = env.viewport.width,
            height = env.viewport.height,
            "Navigator mounted"
        );
        if let Some(first) = self.entries.first().cloned() {
            self.selection.select(&first);
        }
    }

    /// Resize or orientation change.
    pub fn resize(&mut self, env: Environment) {
        if !self.detector.mode().is_resolved() {
            return self.mount(env);
        }
        self.geometry = Some(self.calculator.compute(env.viewport));
        if self.gestures.is_tracking() {
            trace!("Deferring mode probe until the touch sequence ends");
            self.deferred_env = Some(env);
            return;
        }
        self.apply_environment(env);
    }

    /// Tears the navigator down, releasing the scroll lock.
    pub fn unmount(mut self) -> S {
        self.scroll_lock.release();
        self.gestures.reset();
        info!("Navigator unmounted");
        self.sink
    }

    pub fn pointer_enter(&mut self, slug: &str) -> Option<SelectOutcome> {
        if self.mode() != InteractionMode::PointerDriven {
            return None;
        }
        self.select_slug(slug)
    }

    /// Pointer commit. Returns whether navigation happened.
    pub fn pointer_click(&mut self, slug: &str) -> bool {
        if self.mode() != InteractionMode::PointerDriven {
            return false;
        }
        if !self.entries.iter().any(|e| e.id == slug) {
            debug!(slug, "Click on unknown entry ignored");
            return false;
        }
        info!(slug, "Opening detail view");
        self.sink.navigate_to_detail(slug);
        true
    }

    /// The picker settled on `slug`. Selects it and arms the busy window.
    pub fn picker_rotated(&mut self, slug: &str, at: Instant) -> Option<SelectOutcome> {
        if self.mode() != InteractionMode::TouchDriven {
            return None;
        }
        self.gestures.note_rotation(at);
        self.select_slug(slug)
    }

    /// Capture-phase touch handling. `Stop` means a confirming tap was
    /// consumed and the picker must not see this event.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> Propagation {
        if self.mode() != InteractionMode::TouchDriven {
            return Propagation::Continue;
        }

        match event.kind {
            TouchKind::Start => {
                self.gestures.touch_start(event.point, event.at);
                Propagation::Continue
            }
            TouchKind::Move => {
                if self.scroll_lock.should_prevent_touch_move(event.cancelable) {
                    event.prevent_default();
                }
                Propagation::Continue
            }
            TouchKind::End => {
                let decision = self.classify_touch_end(event);
                let propagation = match decision {
                    TouchDecision::Confirm => self.commit_tap(),
                    _ => Propagation::Continue,
                };
                self.apply_deferred_environment();
                propagation
            }
            TouchKind::Cancel => {
                self.gestures.cancel();
                self.apply_deferred_environment();
                Propagation::Continue
            }
        }
    }

    /// Registers this navigator as the capture-phase touch observer on `chain`.
    pub fn observe_touches(navigator: &Rc<RefCell<Self>>, chain: &mut EventChain<TouchEvent>)
    where
        S: 'static,
    {
        let navigator = Rc::clone(navigator);
        chain.observe(Phase::Capture, move |event| {
            navigator.borrow_mut().handle_touch(event)
        });
    }

    pub fn apply_resolution(&mut self, resolved: ResolvedMedia) -> CommitOutcome {
        self.selection.commit(resolved)
    }

    /// Commits resolutions that have already arrived.
    pub fn pump(&mut self) -> usize {
        self.selection.pump()
    }

    /// Waits for the outstanding resolution, if any.
    pub async fn settle(&mut self) -> bool {
        self.selection.settle().await
    }

    /// No resolution is outstanding.
    pub fn is_settled(&self) -> bool {
        self.selection.pending().is_none()
    }

    /// Resolution stream for hosts that share the navigator behind a
    /// `RefCell` and must not hold a borrow while waiting.
    pub fn resolutions(&self) -> async_channel::Receiver<ResolvedMedia> {
        self.selection.resolver().results()
    }

    pub fn view(&self) -> NavigatorView {
        let Some(geometry) = self.geometry else {
            return NavigatorView::Placeholder {
                height_px: self.config.placeholder_height_px,
            };
        };
        let preview = PreviewPane::from_state(self.selection.state());
        let selected = self.selected_entry_id();
        let rows = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| RowModel::new(index as u32, entry, selected == Some(entry.id.as_str())))
            .collect();

        match self.mode() {
            InteractionMode::Loading => NavigatorView::Placeholder {
                height_px: self.config.placeholder_height_px,
            },
            InteractionMode::PointerDriven => NavigatorView::HoverList { rows, preview },
            InteractionMode::TouchDriven => NavigatorView::Picker {
                rows,
                geometry,
                center_band: geometry.center_band(self.config.tap_band_px),
                preview,
            },
        }
    }

    fn select_slug(&mut self, slug: &str) -> Option<SelectOutcome> {
        let Some(entry) = self.entries.iter().find(|e| e.id == slug) else {
            debug!(slug, "Selection of unknown entry ignored");
            return None;
        };
        Some(self.selection.select(entry))
    }

    fn classify_touch_end(&mut self, event: &TouchEvent) -> TouchDecision {
        let band = match self.geometry {
            Some(geometry) => geometry.center_band(self.config.tap_band_px),
            None => Band::centered(0.0, 0.0),
        };
        self.gestures.touch_end(event.point, event.at, band)
    }

    fn commit_tap(&mut self) -> Propagation {
        let Some(slug) = self.selected_entry_id().map(str::to_owned) else {
            return Propagation::Continue;
        };
        info!(slug = %slug, "Confirming tap, opening detail view");
        self.sink.navigate_to_detail(&slug);
        Propagation::Stop
    }

    fn apply_deferred_environment(&mut self) {
        if let Some(env) = self.deferred_env.take() {
            self.apply_environment(env);
        }
    }

    fn apply_environment(&mut self, env: Environment) {
        self.geometry = Some(self.calculator.compute(env.viewport));
        if let Some(mode) = self.detector.probe(env.touch, env.viewport) {
            info!(?mode, "Presentation mode selected");
            self.scroll_lock.sync(mode);
            if mode != InteractionMode::TouchDriven {
                self.gestures.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PageScroll;
    use crate::media::orientation::tests::FakeProbe;
    use crate::media::{Resolution, ResolveTicket};
    use crate::models::{EntryStatus, Orientation};
    use std::time::Duration;

    const PHONE: Viewport = Viewport {
        width: 390,
        height: 844,
    };
    const DESKTOP: Viewport = Viewport {
        width: 1920,
        height: 1080,
    };

    fn entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("b", "Casa B", EntryStatus::Project, 2020, MediaRef::new("/b.jpg")),
            CatalogEntry::new("a", "Casa A", EntryStatus::Built, 1999, MediaRef::new("/a.jpg")),
            CatalogEntry::new("v", "Video", EntryStatus::InProgress, 2010, MediaRef::new("/v.mp4")),
        ]
    }

    fn navigator_with(
        entries: Vec<CatalogEntry>,
    ) -> (Rc<PageScroll>, CatalogNavigator<NavigationLog>) {
        let page = Rc::new(PageScroll::new());
        let probe = Arc::new(FakeProbe::new(&[("/a.jpg", (600, 900)), ("/b.jpg", (1600, 900))]));
        let navigator = CatalogNavigator::new(
            entries,
            NavigatorConfig::default(),
            probe,
            page.clone(),
            NavigationLog::default(),
        );
        (page, navigator)
    }

    fn navigator() -> (Rc<PageScroll>, CatalogNavigator<NavigationLog>) {
        navigator_with(entries())
    }

    fn touch_env(viewport: Viewport) -> Environment {
        Environment::new(viewport, TouchCapabilities::touch())
    }

    fn pointer_env(viewport: Viewport) -> Environment {
        Environment::new(viewport, TouchCapabilities::pointer())
    }

    fn ms(base: Instant, offset: u64) -> Instant {
        base + Duration::from_millis(offset)
    }

    fn touch(nav: &mut CatalogNavigator<NavigationLog>, kind: TouchKind, x: f32, y: f32, at: Instant) -> Propagation {
        nav.handle_touch(&TouchEvent::new(kind, TouchPoint::new(x, y), at))
    }

    /// Center of the phone picker band: zone 60..452, center 256.
    const BAND_Y: f32 = 256.0;

    #[test]
    fn test_placeholder_until_mounted() {
        let (_page, nav) = navigator();
        assert_eq!(nav.mode(), InteractionMode::Loading);
        assert_eq!(nav.view(), NavigatorView::Placeholder { height_px: 480 });
    }

    #[test]
    fn test_mount_selects_first_entry() {
        let (_page, mut nav) = navigator();
        nav.mount(pointer_env(DESKTOP));

        assert_eq!(nav.mode(), InteractionMode::PointerDriven);
        assert_eq!(nav.selected_entry_id(), Some("b"));
        // Nothing is promoted until the image orientation is known.
        assert_eq!(nav.selection().active_entry_id(), None);
        match nav.view() {
            NavigatorView::HoverList { rows, preview } => {
                assert_eq!(rows.len(), 3);
                assert!(rows[0].is_active);
                assert!(preview.media.is_none());
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_empty_catalog() {
        let (_page, mut nav) = navigator_with(Vec::new());
        nav.mount(touch_env(PHONE));
        assert_eq!(nav.selected_entry_id(), None);

        let t0 = Instant::now();
        touch(&mut nav, TouchKind::Start, 100.0, BAND_Y, t0);
        let propagation = touch(&mut nav, TouchKind::End, 101.0, BAND_Y, ms(t0, 50));
        assert_eq!(propagation, Propagation::Continue);
        assert!(nav.sink().slugs.is_empty());
    }

    #[tokio::test]
    async fn test_hover_updates_preview() {
        let (_page, mut nav) = navigator();
        nav.mount(pointer_env(DESKTOP));
        tokio::time::timeout(Duration::from_secs(5), nav.settle()).await.unwrap();
        assert_eq!(nav.selection().active_entry_id(), Some("b"));

        assert!(matches!(nav.pointer_enter("a"), Some(SelectOutcome::Pending(_))));
        assert_eq!(nav.pointer_enter("a"), Some(SelectOutcome::Unchanged));
        tokio::time::timeout(Duration::from_secs(5), nav.settle()).await.unwrap();

        let state = nav.selection();
        assert_eq!(state.active_entry_id(), Some("a"));
        assert!(state.is_vertical());
        assert!(nav.sink().slugs.is_empty(), "hover never navigates");
    }

    #[test]
    fn test_hover_ignored_in_touch_mode() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        assert_eq!(nav.pointer_enter("a"), None);
        assert!(!nav.pointer_click("a"));
    }

    #[test]
    fn test_pointer_click_navigates() {
        let (_page, mut nav) = navigator();
        nav.mount(pointer_env(DESKTOP));
        assert!(nav.pointer_click("a"));
        assert!(!nav.pointer_click("missing"));
        assert_eq!(nav.sink().slugs, vec!["a"]);
    }

    #[test]
    fn test_tap_inside_band_navigates_once() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        touch(&mut nav, TouchKind::Start, 100.0, BAND_Y, t0);
        let propagation = touch(&mut nav, TouchKind::End, 103.0, BAND_Y + 1.0, ms(t0, 60));

        assert_eq!(propagation, Propagation::Stop);
        assert_eq!(nav.sink().slugs, vec!["b"]);
    }

    #[test]
    fn test_tap_outside_band_does_not_navigate() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        touch(&mut nav, TouchKind::Start, 100.0, 100.0, t0);
        let propagation = touch(&mut nav, TouchKind::End, 103.0, 101.0, ms(t0, 60));

        assert_eq!(propagation, Propagation::Continue);
        assert!(nav.sink().slugs.is_empty());
    }

    #[test]
    fn test_drag_never_navigates() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        touch(&mut nav, TouchKind::Start, 100.0, BAND_Y - 50.0, t0);
        touch(&mut nav, TouchKind::End, 100.0, BAND_Y + 50.0, ms(t0, 60));
        touch(&mut nav, TouchKind::Start, 100.0, 100.0, ms(t0, 100));
        touch(&mut nav, TouchKind::End, 100.0, 200.0, ms(t0, 160));

        assert!(nav.sink().slugs.is_empty());
    }

    #[test]
    fn test_busy_window_after_rotation() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        nav.picker_rotated("a", t0);

        touch(&mut nav, TouchKind::Start, 100.0, BAND_Y, ms(t0, 100));
        let early = touch(&mut nav, TouchKind::End, 101.0, BAND_Y, ms(t0, 150));
        assert_eq!(early, Propagation::Continue);
        assert!(nav.sink().slugs.is_empty());

        touch(&mut nav, TouchKind::Start, 100.0, BAND_Y, ms(t0, 380));
        let late = touch(&mut nav, TouchKind::End, 101.0, BAND_Y, ms(t0, 400));
        assert_eq!(late, Propagation::Stop);
        assert_eq!(nav.sink().slugs, vec!["a"], "tap opens the entry the picker settled on");
    }

    #[test]
    fn test_rotation_to_video_commits_immediately() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        assert_eq!(nav.picker_rotated("v", Instant::now()), Some(SelectOutcome::Committed));
        assert_eq!(nav.selection().active_entry_id(), Some("v"));
        assert_eq!(nav.picker_rotated("missing", Instant::now()), None);
    }

    #[test]
    fn test_stale_resolution_discarded() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        // Mount requested "b"; the picker moves on to "a" before "b" resolves.
        let ticket_a = match nav.picker_rotated("a", t0) {
            Some(SelectOutcome::Pending(ticket)) => ticket,
            other => panic!("expected pending, got {:?}", other),
        };
        let stale_b = ResolvedMedia {
            ticket: ResolveTicket {
                generation: 1,
                entry_id: "b".into(),
            },
            resolution: Resolution {
                media: MediaRef::new("/b.jpg"),
                orientation: Orientation::Landscape,
                status: MediaStatus::Ready,
            },
        };
        let fresh_a = ResolvedMedia {
            ticket: ticket_a,
            resolution: Resolution {
                media: MediaRef::new("/a.jpg"),
                orientation: Orientation::Portrait,
                status: MediaStatus::Ready,
            },
        };

        assert_eq!(nav.apply_resolution(fresh_a), CommitOutcome::Applied);
        assert_eq!(nav.apply_resolution(stale_b), CommitOutcome::Superseded);
        assert_eq!(nav.selection().active_entry_id(), Some("a"));
    }

    #[test]
    fn test_touch_mode_locks_scroll_and_prevents_moves() {
        let (page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        assert!(nav.is_scroll_locked());
        assert!(!page.page_scroll_enabled());

        let t0 = Instant::now();
        let movement = TouchEvent::new(TouchKind::Move, TouchPoint::new(1.0, 1.0), t0);
        nav.handle_touch(&movement);
        assert!(movement.default_prevented());

        let passive = TouchEvent::new(TouchKind::Move, TouchPoint::new(1.0, 1.0), t0).with_cancelable(false);
        nav.handle_touch(&passive);
        assert!(!passive.default_prevented());
    }

    #[test]
    fn test_switch_to_pointer_releases_scroll_lock() {
        let (page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        nav.resize(pointer_env(DESKTOP));

        assert_eq!(nav.mode(), InteractionMode::PointerDriven);
        assert!(!nav.is_scroll_locked());
        assert!(page.page_scroll_enabled());
    }

    #[test]
    fn test_switch_to_pointer_enables_scroll_disabled_by_host() {
        let (page, mut nav) = navigator();
        page.set_page_scroll(false);
        nav.mount(touch_env(PHONE));
        nav.resize(pointer_env(DESKTOP));
        assert!(page.page_scroll_enabled());
    }

    #[test]
    fn test_remount_mid_gesture_defers_mode() {
        let (page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        touch(&mut nav, TouchKind::Start, 100.0, 300.0, t0);
        nav.mount(pointer_env(DESKTOP));
        assert_eq!(nav.mode(), InteractionMode::TouchDriven);
        assert!(nav.is_scroll_locked());
        assert!(nav.geometry().unwrap().is_landscape_viewport);

        touch(&mut nav, TouchKind::End, 100.0, 120.0, ms(t0, 200));
        assert_eq!(nav.mode(), InteractionMode::PointerDriven);
        assert!(page.page_scroll_enabled());
        assert_eq!(nav.selected_entry_id(), Some("b"), "remount keeps the selection");
    }

    #[test]
    fn test_unmount_releases_scroll_lock() {
        let (page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let log = nav.unmount();
        assert!(log.slugs.is_empty());
        assert!(page.page_scroll_enabled());
    }

    #[test]
    fn test_mode_change_deferred_mid_gesture() {
        let (page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        touch(&mut nav, TouchKind::Start, 100.0, 300.0, t0);
        nav.resize(pointer_env(DESKTOP));
        assert_eq!(nav.mode(), InteractionMode::TouchDriven);
        assert!(nav.geometry().unwrap().is_landscape_viewport, "geometry follows at once");

        touch(&mut nav, TouchKind::End, 100.0, 120.0, ms(t0, 200));
        assert_eq!(nav.mode(), InteractionMode::PointerDriven);
        assert!(page.page_scroll_enabled());
    }

    #[test]
    fn test_cancel_applies_deferred_mode() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));
        let t0 = Instant::now();

        touch(&mut nav, TouchKind::Start, 100.0, 300.0, t0);
        nav.resize(pointer_env(DESKTOP));
        touch(&mut nav, TouchKind::Cancel, 100.0, 300.0, ms(t0, 30));
        assert_eq!(nav.mode(), InteractionMode::PointerDriven);
    }

    #[test]
    fn test_picker_view_geometry() {
        let (_page, mut nav) = navigator();
        nav.mount(touch_env(PHONE));

        match nav.view() {
            NavigatorView::Picker {
                rows,
                geometry,
                center_band,
                ..
            } => {
                assert_eq!(rows.len(), 3);
                assert_eq!(geometry.row_height_px, 35);
                assert!(center_band.contains(BAND_Y));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_capture_observer_beats_picker_widget() {
        let (_page, nav) = navigator();
        let nav = Rc::new(RefCell::new(nav));
        nav.borrow_mut().mount(touch_env(PHONE));

        let widget_taps = Rc::new(Cell::new(0u32));
        let mut chain = EventChain::new();
        let taps = widget_taps.clone();
        chain.observe(Phase::Bubble, move |event: &TouchEvent| {
            if event.kind == TouchKind::End {
                taps.set(taps.get() + 1);
            }
            Propagation::Continue
        });
        CatalogNavigator::observe_touches(&nav, &mut chain);

        let t0 = Instant::now();
        chain.dispatch(&TouchEvent::new(TouchKind::Start, TouchPoint::new(100.0, BAND_Y), t0));
        let result = chain.dispatch(&TouchEvent::new(
            TouchKind::End,
            TouchPoint::new(102.0, BAND_Y),
            ms(t0, 40),
        ));

        assert_eq!(result, Propagation::Stop);
        assert_eq!(widget_taps.get(), 0);
        assert_eq!(nav.borrow().sink().slugs, vec!["b"]);

        // A drag still reaches the widget.
        chain.dispatch(&TouchEvent::new(TouchKind::Start, TouchPoint::new(100.0, 100.0), ms(t0, 500)));
        chain.dispatch(&TouchEvent::new(TouchKind::End, TouchPoint::new(100.0, 300.0), ms(t0, 560)));
        assert_eq!(widget_taps.get(), 1);
    }
}
