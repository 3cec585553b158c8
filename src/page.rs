//! The page host: a full-screen surface that scrolls sideways.
//!
//! A [`Page`] owns the page root, the panel viewport, the scroll engine that
//! listens on it, the progress bar along the top edge and a scroll hint on
//! the bottom line. It plays the part of the surrounding UI:
//!
//! - [`Page::mount`] attaches the engine and publishes the initial progress,
//!   [`Page::unmount`] (also run on drop) detaches it.
//! - [`Page::dispatch_wheel`] delivers a wheel event to every listener
//!   registered on the viewport and, unless a listener suppressed it, applies
//!   the native effect: scrolling the page root vertically.
//! - As a bubbletea model, [`Page`] turns terminal wheel notches into wheel
//!   events, follows window resizes and quits on `q`, `esc` or `ctrl+c`.
//!
//! # Integration with Bubble Tea
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use hscroll_panels::page::{Page, ProgressMsg};
//! use hscroll_panels::viewport::Panel;
//!
//! struct Portfolio {
//!     page: Page,
//! }
//!
//! impl BubbleTeaModel for Portfolio {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut page = Page::default().with_panels(vec![
//!             Panel::cells(80, "Intro"),
//!             Panel::cells(64, "Work"),
//!             Panel::cells(80, "Contact"),
//!         ]);
//!         let cmd = page.mount();
//!         (Self { page }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(progress) = msg.downcast_ref::<ProgressMsg>() {
//!             let _ = progress.progress;
//!         }
//!         self.page.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.page.view()
//!     }
//! }
//! ```

use crate::config::Config;
use crate::engine::ScrollEngine;
use crate::error::Result;
use crate::key::{self, Binding};
use crate::progress;
use crate::viewport::{Panel, Viewport};
use crate::wheel::WheelEvent;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::MouseEvent;
use lipgloss_extras::lipgloss::width as lg_width;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

const DEFAULT_WIDTH: usize = 80;
const DEFAULT_HEIGHT: usize = 24;

/// Published after every processed wheel event and on mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressMsg {
    /// Id of the page that published the value.
    pub id: i64,
    /// Progress in `[0, 100]`.
    pub progress: f64,
}

/// Full-screen host for a horizontally scrolling panel strip.
#[derive(Debug)]
pub struct Page {
    id: i64,
    width: usize,
    height: usize,
    viewport: Viewport,
    engine: ScrollEngine,
    indicator: progress::Model,
    hint: String,
    line_delta: f64,
    root_overflow: usize,
    root_scroll: f64,
    /// Keys that end the program.
    pub quit: Binding,
}

impl Page {
    /// Creates an unmounted page of `width` by `height` cells.
    pub fn new(config: &Config, width: usize, height: usize) -> Result<Self> {
        let engine = ScrollEngine::from_config(&config.engine)?;
        Ok(Self::assemble(config, engine, width, height))
    }

    fn assemble(config: &Config, engine: ScrollEngine, width: usize, height: usize) -> Self {
        let mut page = Self {
            id: next_id(),
            width,
            height,
            viewport: Viewport::new(width, 0),
            engine,
            indicator: progress::Model::from_config(&config.indicator, cells_i32(width)),
            hint: config.hint.clone(),
            line_delta: config.engine.wheel_line_delta,
            root_overflow: 0,
            root_scroll: 0.0,
            quit: key::quit_binding(),
        };
        page.set_size(width, height);
        page
    }

    /// Builder-style variant of [`Page::set_panels`].
    pub fn with_panels(mut self, panels: Vec<Panel>) -> Self {
        self.set_panels(panels);
        self
    }

    /// Gives the page root `rows` of vertical overflow that a native
    /// (unsuppressed) wheel event would scroll through.
    pub fn with_root_overflow(mut self, rows: usize) -> Self {
        self.root_overflow = rows;
        self
    }

    /// Replaces the panel strip.
    pub fn set_panels(&mut self, panels: Vec<Panel>) {
        self.viewport.set_panels(panels);
        self.indicator.set_progress(self.viewport.progress());
    }

    /// Page id carried by [`ProgressMsg`].
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The panel viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The scroll engine.
    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    /// The progress bar.
    pub fn indicator(&self) -> &progress::Model {
        &self.indicator
    }

    /// Current progress, derived from the viewport.
    pub fn progress(&self) -> f64 {
        self.viewport.progress()
    }

    /// Vertical scroll of the page root.
    pub fn root_scroll(&self) -> f64 {
        self.root_scroll
    }

    /// Whether the engine is attached.
    pub fn is_mounted(&self) -> bool {
        self.engine.is_attached()
    }

    /// Attaches the engine and publishes the initial progress.
    pub fn mount(&mut self) -> Cmd {
        self.engine.attach(&mut self.viewport);
        let progress = self.viewport.progress();
        self.indicator.set_progress(progress);
        debug!(page = self.id, progress, "page mounted");
        self.publish(progress)
    }

    /// Detaches the engine. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.engine.detach(&mut self.viewport) {
            debug!(page = self.id, "page unmounted");
        }
    }

    /// Resizes the page. The viewport gets every row except the progress bar
    /// and, when set, the hint.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let chrome = if self.hint.is_empty() { 1 } else { 2 };
        self.viewport.set_size(width, height.saturating_sub(chrome));
        self.indicator.width = cells_i32(width);
        self.indicator.set_progress(self.viewport.progress());
    }

    /// Delivers `event` to the viewport's listeners in registration order,
    /// then applies the native effect unless a listener prevented it.
    ///
    /// Returns the progress published by the engine, if it handled the event.
    pub fn dispatch_wheel(&mut self, mut event: WheelEvent) -> Option<f64> {
        let mut published = None;
        for listener in self.viewport.listeners().to_vec() {
            if listener != self.engine.id() {
                continue;
            }
            if let Some(progress) = self.engine.on_input_event(&mut self.viewport, &mut event) {
                self.indicator.set_progress(progress);
                published = Some(progress);
            }
        }

        if !event.default_prevented() {
            self.scroll_root(&event);
        }
        published
    }

    fn scroll_root(&mut self, event: &WheelEvent) {
        let dy = event.delta_y.filter(|d| d.is_finite()).unwrap_or(0.0);
        self.root_scroll = (self.root_scroll + dy).clamp(0.0, self.root_overflow as f64);
        trace!(root_scroll = self.root_scroll, "native wheel scroll on page root");
    }

    fn publish(&self, progress: f64) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(ProgressMsg { id, progress }) as Msg
        })
    }

    fn wheel(&mut self, event: WheelEvent) -> Option<Cmd> {
        self.dispatch_wheel(event)
            .map(|progress| self.publish(progress))
    }

    /// Handles wheel events, terminal mouse events, resizes and quit keys.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<bubbletea_rs::WindowSizeMsg>() {
            self.set_size(size.width as usize, size.height as usize);
            return None;
        }
        if let Some(event) = msg.downcast_ref::<WheelEvent>() {
            return self.wheel(event.clone());
        }
        if let Some(mouse) = msg.downcast_ref::<MouseEvent>() {
            return WheelEvent::from_mouse(mouse, self.line_delta).and_then(|e| self.wheel(e));
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.quit.matches(key_msg) {
                return Some(bubbletea_rs::quit());
            }
        }
        None
    }

    /// Renders the progress bar, the visible panels and the hint.
    pub fn view(&self) -> String {
        let mut rows = vec![self.indicator.view()];
        rows.extend(self.viewport.visible_lines());
        if !self.hint.is_empty() {
            let pad = self.width.saturating_sub(lg_width(&self.hint)) / 2;
            rows.push(format!("{}{}", " ".repeat(pad), self.hint));
        }
        rows.join("\n")
    }
}

fn cells_i32(cells: usize) -> i32 {
    i32::try_from(cells).unwrap_or(i32::MAX)
}

impl Default for Page {
    fn default() -> Self {
        Self::assemble(
            &Config::default(),
            ScrollEngine::new(),
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
        )
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl BubbleTeaModel for Page {
    fn init() -> (Self, Option<Cmd>) {
        let mut page = Page::default();
        let cmd = page.mount();
        (page, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        Page::update(self, msg)
    }

    fn view(&self) -> String {
        Page::view(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crossterm::event::{KeyCode, KeyModifiers, MouseEventKind};
    use std::io;
    use std::sync::{Arc, Mutex};

    fn plain(s: &str) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    // 20 columns wide, 2000 cells of content in a 20-cell window.
    fn page() -> Page {
        Page::new(&Config::default(), 20, 6)
            .unwrap()
            .with_panels(vec![Panel::cells(2000, "")])
            .with_root_overflow(50)
    }

    fn mounted() -> Page {
        let mut page = page();
        let _ = page.mount();
        page
    }

    #[test]
    fn test_layout_reserves_bar_and_hint_rows() {
        let page = page();
        assert_eq!(page.viewport().height(), 4);
        assert_eq!(page.viewport().visible_extent(), 20);
        assert_eq!(page.indicator().width, 20);
    }

    #[test]
    fn test_empty_hint_frees_a_row() {
        let config = Config {
            hint: String::new(),
            ..Config::default()
        };
        let page = Page::new(&config, 20, 6).unwrap();
        assert_eq!(page.viewport().height(), 5);
        assert_eq!(page.view().lines().count(), 6);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = Config {
            engine: EngineConfig {
                wheel_line_delta: 0.0,
                ..EngineConfig::default()
            },
            ..Config::default()
        };
        assert!(Page::new(&config, 20, 6).is_err());
    }

    #[test]
    fn test_mount_attaches_once() {
        let mut page = mounted();
        assert!(page.is_mounted());
        let _ = page.mount();
        assert_eq!(page.viewport().listeners(), &[page.engine().id()]);
    }

    #[test]
    fn test_wheel_moves_viewport_and_updates_indicator() {
        let mut page = mounted();
        let progress = page.dispatch_wheel(WheelEvent::vertical(198.0));
        assert_eq!(progress, Some(10.0));
        assert_eq!(page.viewport().scroll_offset(), 198.0);
        assert_eq!(page.indicator().progress(), 10.0);
        assert_eq!(page.progress(), 10.0);
    }

    #[test]
    fn test_page_root_never_scrolls_while_mounted() {
        let mut page = mounted();
        for delta in [1.0, 40.0, 1e6, -3.0, f64::MAX] {
            page.dispatch_wheel(WheelEvent::vertical(delta));
            assert_eq!(page.root_scroll(), 0.0, "delta {delta}");
        }
    }

    #[test]
    fn test_unmounted_page_scrolls_root_natively() {
        let mut page = page();
        assert_eq!(page.dispatch_wheel(WheelEvent::vertical(30.0)), None);
        assert_eq!(page.root_scroll(), 30.0);
        assert_eq!(page.viewport().scroll_offset(), 0.0);

        page.dispatch_wheel(WheelEvent::vertical(100.0));
        assert_eq!(page.root_scroll(), 50.0);
    }

    #[test]
    fn test_events_after_unmount_change_nothing() {
        let mut page = mounted();
        page.dispatch_wheel(WheelEvent::vertical(500.0));
        page.unmount();
        page.unmount();

        let offset = page.viewport().scroll_offset();
        let progress = page.progress();
        assert_eq!(page.dispatch_wheel(WheelEvent::vertical(500.0)), None);
        assert_eq!(page.viewport().scroll_offset(), offset);
        assert_eq!(page.progress(), progress);
        assert_eq!(page.indicator().progress(), progress);
    }

    #[test]
    fn test_update_handles_wheel_event_msg() {
        let mut page = mounted();
        let cmd = page.update(Box::new(WheelEvent::new(0.0, 120.0)));
        assert!(cmd.is_some());
        assert_eq!(page.viewport().scroll_offset(), 120.0);
    }

    #[test]
    fn test_update_converts_mouse_wheel_notches() {
        let mut page = mounted();
        let notch = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert!(page.update(Box::new(notch)).is_some());
        assert!(page.update(Box::new(notch)).is_some());
        assert_eq!(page.viewport().scroll_offset(), 6.0);

        let click = MouseEvent {
            kind: MouseEventKind::Moved,
            ..notch
        };
        assert!(page.update(Box::new(click)).is_none());
        assert_eq!(page.viewport().scroll_offset(), 6.0);
    }

    #[test]
    fn test_update_ignores_wheel_while_unmounted() {
        let mut page = page();
        assert!(page.update(Box::new(WheelEvent::vertical(10.0))).is_none());
    }

    #[test]
    fn test_update_resizes() {
        let mut page = mounted();
        let cmd = page.update(Box::new(bubbletea_rs::WindowSizeMsg {
            width: 40,
            height: 10,
        }));
        assert!(cmd.is_none());
        assert_eq!(page.viewport().visible_extent(), 40);
        assert_eq!(page.viewport().height(), 8);
        assert_eq!(page.indicator().width, 40);
    }

    #[test]
    fn test_resize_reclamps_offset_and_progress() {
        let mut page = mounted();
        page.dispatch_wheel(WheelEvent::vertical(5000.0));
        assert_eq!(page.progress(), 100.0);

        page.set_size(1000, 6);
        assert_eq!(page.viewport().scroll_offset(), 1000.0);
        assert_eq!(page.progress(), 100.0);
        assert_eq!(page.indicator().progress(), 100.0);
    }

    #[test]
    fn test_update_quit_keys() {
        let mut page = mounted();
        let q = KeyMsg {
            key: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
        };
        assert!(page.update(Box::new(q)).is_some());

        let other = KeyMsg {
            key: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
        };
        assert!(page.update(Box::new(other)).is_none());
    }

    #[test]
    fn test_view_layout() {
        let mut page = Page::new(&Config::default(), 20, 5)
            .unwrap()
            .with_panels(vec![Panel::cells(20, "one"), Panel::cells(20, "two")]);
        let _ = page.mount();

        let view = plain(&page.view());
        let rows: Vec<&str> = view.lines().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].chars().filter(|&c| c == '─').count(), 20);
        assert!(rows[2].starts_with("one"));
        assert!(rows[4].contains("Scroll to navigate →"));

        page.dispatch_wheel(WheelEvent::vertical(20.0));
        let view = plain(&page.view());
        let rows: Vec<&str> = view.lines().collect();
        assert_eq!(rows[0].chars().filter(|&c| c == '━').count(), 20);
        assert!(rows[2].starts_with("two"));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_drop_detaches() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let page = mounted();
            assert!(page.is_mounted());
            drop(page);
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("page mounted"));
        assert!(output.contains("scroll engine detached"));
        assert!(output.contains("page unmounted"));
    }

    #[test]
    fn test_unmounted_page_drops_quietly() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || drop(page()));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(!output.contains("page unmounted"));
    }

    #[test]
    fn test_oversized_width_saturates_indicator() {
        let page = Page::new(&Config::default(), i32::MAX as usize + 10, 4).unwrap();
        assert_eq!(page.indicator().width, i32::MAX);
        assert_eq!(page.viewport().visible_extent(), i32::MAX as usize + 10);
    }

    #[test]
    fn test_init_mounts() {
        let (page, cmd) = <Page as BubbleTeaModel>::init();
        assert!(page.is_mounted());
        assert!(cmd.is_some());
    }
}
