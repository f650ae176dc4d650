//! Headless session runner.
//!
//! Replays a line-oriented script of environment and input events against a
//! [`CatalogNavigator`] and reports what it rendered and where it navigated.
//!
//! ```text
//! mount 390 844 touch      # viewport, optional "touch"
//! rotate casa-mar 0        # picker settled on an entry at t=0ms
//! touchstart 100 256 400   # x y t_ms
//! touchend 102 256 450
//! wait                     # let the pending preview resolve
//! view
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::NavigatorConfig;
use crate::error::ScriptError;
use crate::input::{EventChain, PageScroll, Phase, Propagation, TouchCapabilities, TouchPoint};
use crate::layout::Viewport;
use crate::media::MediaProbe;
use crate::models::CatalogEntry;
use crate::navigator::{
    CatalogNavigator, Environment, NavigationLog, NavigationSink, NavigatorView, PreviewPane,
    TouchEvent, TouchKind,
};

const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub enum TraceCommand {
    Mount { viewport: Viewport, touch: bool },
    Resize { viewport: Viewport, touch: bool },
    Hover(String),
    Click(String),
    Rotate { slug: String, at_ms: u64 },
    Touch { kind: TouchKind, point: TouchPoint, at_ms: u64 },
    Wait,
    View,
    Unmount,
}

/// Parses a session script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<TraceCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let mut words = text.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();
        commands.push(parse_command(line, command, &args)?);
    }
    Ok(commands)
}

fn parse_command(line: usize, command: &str, args: &[&str]) -> Result<TraceCommand, ScriptError> {
    let parsed = match command {
        "mount" | "resize" => {
            let name = if command == "mount" { "mount" } else { "resize" };
            let [width, height, rest @ ..] = args else {
                return Err(missing(line, name, "WIDTH HEIGHT [touch]"));
            };
            let viewport = Viewport::new(number(line, width)?, number(line, height)?);
            let touch = rest.first().is_some_and(|flag| *flag == "touch");
            if name == "mount" {
                TraceCommand::Mount { viewport, touch }
            } else {
                TraceCommand::Resize { viewport, touch }
            }
        }
        "hover" => TraceCommand::Hover(slug_arg(line, "hover", args)?),
        "click" => TraceCommand::Click(slug_arg(line, "click", args)?),
        "rotate" => {
            let [slug, at_ms, ..] = args else {
                return Err(missing(line, "rotate", "SLUG T_MS"));
            };
            TraceCommand::Rotate {
                slug: slug.to_string(),
                at_ms: number(line, at_ms)?,
            }
        }
        "touchstart" | "touchmove" | "touchend" | "touchcancel" => {
            let (name, kind) = match command {
                "touchstart" => ("touchstart", TouchKind::Start),
                "touchmove" => ("touchmove", TouchKind::Move),
                "touchend" => ("touchend", TouchKind::End),
                _ => ("touchcancel", TouchKind::Cancel),
            };
            let [x, y, at_ms, ..] = args else {
                return Err(missing(line, name, "X Y T_MS"));
            };
            TraceCommand::Touch {
                kind,
                point: TouchPoint::new(number(line, x)?, number(line, y)?),
                at_ms: number(line, at_ms)?,
            }
        }
        "wait" => TraceCommand::Wait,
        "view" => TraceCommand::View,
        "unmount" => TraceCommand::Unmount,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(parsed)
}

fn missing(line: usize, command: &'static str, expected: &'static str) -> ScriptError {
    ScriptError::MissingArgument {
        line,
        command,
        expected,
    }
}

fn slug_arg(line: usize, command: &'static str, args: &[&str]) -> Result<String, ScriptError> {
    args.first()
        .map(|slug| slug.to_string())
        .ok_or_else(|| missing(line, command, "SLUG"))
}

fn number<T: std::str::FromStr>(line: usize, value: &str) -> Result<T, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

/// What a replayed session produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionReport {
    /// Rendered `view` snapshots, one line each.
    pub views: Vec<String>,
    /// Detail-view navigations in order.
    pub navigations: Vec<String>,
    /// Touch ends that reached the picker widget.
    pub picker_taps: usize,
}

pub struct SessionRunner {
    navigator: Option<Rc<RefCell<CatalogNavigator<NavigationLog>>>>,
    chain: EventChain<TouchEvent>,
    picker_taps: Rc<RefCell<usize>>,
    origin: Instant,
    settle_timeout: Duration,
    report: SessionReport,
}

impl SessionRunner {
    pub fn new(entries: Vec<CatalogEntry>, config: NavigatorConfig, probe: Arc<dyn MediaProbe>) -> Self {
        let page = Rc::new(PageScroll::new());
        let navigator = Rc::new(RefCell::new(CatalogNavigator::new(
            entries,
            config,
            probe,
            page,
            NavigationLog::default(),
        )));

        // Stand-in for the picker widget's own tap handling, behind the
        // navigator's capture observer.
        let picker_taps = Rc::new(RefCell::new(0usize));
        let mut chain = EventChain::new();
        CatalogNavigator::observe_touches(&navigator, &mut chain);
        let taps = Rc::clone(&picker_taps);
        chain.observe(Phase::Bubble, move |event: &TouchEvent| {
            if event.kind == TouchKind::End {
                *taps.borrow_mut() += 1;
            }
            Propagation::Continue
        });

        Self {
            navigator: Some(navigator),
            chain,
            picker_taps,
            origin: Instant::now(),
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
            report: SessionReport::default(),
        }
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Replays `commands` in order and returns the report.
    pub async fn replay(mut self, commands: &[TraceCommand]) -> SessionReport {
        for command in commands {
            self.step(command).await;
        }
        if self.navigator.is_some() {
            self.unmount();
        }
        self.report.picker_taps = *self.picker_taps.borrow();
        self.report
    }

    async fn step(&mut self, command: &TraceCommand) {
        let Some(navigator) = self.navigator.clone() else {
            warn!(?command, "Navigator already unmounted, ignoring command");
            return;
        };

        match command {
            TraceCommand::Mount { viewport, touch } => {
                navigator.borrow_mut().mount(environment(*viewport, *touch));
            }
            TraceCommand::Resize { viewport, touch } => {
                navigator.borrow_mut().resize(environment(*viewport, *touch));
            }
            TraceCommand::Hover(slug) => {
                navigator.borrow_mut().pointer_enter(slug);
            }
            TraceCommand::Click(slug) => {
                navigator.borrow_mut().pointer_click(slug);
            }
            TraceCommand::Rotate { slug, at_ms } => {
                let at = self.at(*at_ms);
                navigator.borrow_mut().picker_rotated(slug, at);
            }
            TraceCommand::Touch { kind, point, at_ms } => {
                let event = TouchEvent::new(*kind, *point, self.at(*at_ms));
                let propagation = self.chain.dispatch(&event);
                debug!(?kind, ?propagation, prevented = event.default_prevented(), "Touch replayed");
            }
            TraceCommand::Wait => {
                if tokio::time::timeout(self.settle_timeout, settle_shared(&*navigator))
                    .await
                    .is_err()
                {
                    warn!(timeout_ms = self.settle_timeout.as_millis() as u64, "Preview did not settle");
                }
            }
            TraceCommand::View => {
                let view = navigator.borrow().view();
                self.report.views.push(render_view(&view));
            }
            TraceCommand::Unmount => self.unmount(),
        }
    }

    fn unmount(&mut self) {
        let Some(navigator) = self.navigator.take() else {
            return;
        };
        // The chain holds the other reference through the capture observer.
        self.chain = EventChain::new();
        match Rc::try_unwrap(navigator) {
            Ok(cell) => {
                let log = cell.into_inner().unmount();
                self.report.navigations = log.slugs;
            }
            Err(shared) => {
                warn!("Navigator still shared at unmount");
                self.report.navigations = shared.borrow().sink().slugs.clone();
            }
        }
    }

    fn at(&self, offset_ms: u64) -> Instant {
        self.origin + Duration::from_millis(offset_ms)
    }
}

/// Commits resolutions until nothing is pending. The cell is only borrowed
/// between awaits.
async fn settle_shared<S: NavigationSink>(navigator: &RefCell<CatalogNavigator<S>>) {
    loop {
        let results = {
            let nav = navigator.borrow();
            if nav.is_settled() {
                return;
            }
            nav.resolutions()
        };
        let Ok(resolved) = results.recv().await else {
            return;
        };
        navigator.borrow_mut().apply_resolution(resolved);
    }
}

fn environment(viewport: Viewport, touch: bool) -> Environment {
    let caps = if touch {
        TouchCapabilities::touch()
    } else {
        TouchCapabilities::pointer()
    };
    Environment::new(viewport, caps)
}

/// One-line text rendering of a view.
pub fn render_view(view: &NavigatorView) -> String {
    match view {
        NavigatorView::Placeholder { height_px } => format!("placeholder {}px", height_px),
        NavigatorView::HoverList { rows, preview } => {
            let rows: Vec<String> = rows.iter().map(row_label).collect();
            format!("list [{}] {}", rows.join(" "), render_preview(preview))
        }
        NavigatorView::Picker {
            rows,
            geometry,
            center_band,
            preview,
        } => {
            let rows: Vec<String> = rows.iter().map(row_label).collect();
            format!(
                "picker [{}] row={}px zone={}+{} band={:.1}..{:.1} {}",
                rows.join(" "),
                geometry.row_height_px,
                geometry.picker_zone.top_px,
                geometry.picker_zone.height_px,
                center_band.top,
                center_band.bottom,
                render_preview(preview)
            )
        }
    }
}

fn row_label(row: &crate::models::RowModel) -> String {
    if row.is_active {
        format!("*{}", row.slug)
    } else {
        row.slug.clone()
    }
}

fn render_preview(preview: &PreviewPane) -> String {
    match &preview.media {
        None => "preview=none".to_string(),
        Some(media) => format!(
            "preview={} {} {:?}",
            media.url,
            if preview.is_vertical { "portrait" } else { "landscape" },
            preview.status
        ),
    }
}

/// Logs a finished session.
pub fn log_report(report: &SessionReport) {
    for slug in &report.navigations {
        info!(slug = %slug, "Navigated to detail view");
    }
    info!(
        views = report.views.len(),
        navigations = report.navigations.len(),
        picker_taps = report.picker_taps,
        "Session finished"
    );
}
