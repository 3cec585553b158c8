//! The horizontally scrollable viewport and the panel strip it displays.
//!
//! A [`Viewport`] is an explicit record of the three measurements that drive
//! navigation:
//!
//! - `scroll_extent`: total width of the panel strip (never less than the window)
//! - `visible_extent`: width of the visible window
//! - `scroll_offset`: horizontal displacement, kept in `[0, scroll_extent - visible_extent]`
//!
//! Panels are laid out left to right in the order they were added. A panel is
//! either a fixed number of cells wide or a fraction of the visible window,
//! and fractional panels are re-resolved whenever the window is resized.
//!
//! The viewport also carries the listener table of the element: scroll
//! engines register themselves here when they attach, and the host only
//! delivers wheel events to registered listeners. The offset is written only
//! by an attached engine; everything else reads it.
//!
//! # Quick Start
//!
//! ```rust
//! use hscroll_panels::viewport::{Panel, Viewport};
//!
//! let viewport = Viewport::new(40, 3).with_panels(vec![
//!     Panel::fraction(1.0, "intro").unwrap(),
//!     Panel::fraction(0.8, "work").unwrap(),
//!     Panel::cells(20, "contact"),
//! ]);
//!
//! assert_eq!(viewport.scroll_extent(), 40 + 32 + 20);
//! assert_eq!(viewport.max_offset(), 52);
//! assert_eq!(viewport.progress(), 0.0);
//! assert_eq!(viewport.current_panel(), Some(0));
//! ```

use crate::error::{Error, Result};
use crate::progress::compute_progress;
use lipgloss_extras::lipgloss::width as lg_width;
use unicode_width::UnicodeWidthChar;

/// Identifies one registered wheel listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) i64);

/// Width of a panel along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelWidth {
    /// Fixed number of cells.
    Cells(usize),
    /// Fraction of the visible window, re-resolved on resize.
    Fraction(f64),
}

impl PanelWidth {
    fn resolve(self, visible_extent: usize) -> usize {
        match self {
            PanelWidth::Cells(n) => n,
            // Float-to-int `as` saturates, so huge fractions pin at `usize::MAX`.
            PanelWidth::Fraction(f) => (f * visible_extent as f64).round() as usize,
        }
    }
}

/// One section of the strip. The body is opaque text drawn as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// How wide the panel is.
    pub width: PanelWidth,
    /// Text drawn inside the panel, vertically centred.
    pub body: String,
}

impl Panel {
    /// A panel of a fixed number of cells.
    pub fn cells(width: usize, body: impl Into<String>) -> Self {
        Self {
            width: PanelWidth::Cells(width),
            body: body.into(),
        }
    }

    /// A panel sized as a fraction of the visible window.
    ///
    /// Fails unless `fraction` is finite and positive.
    pub fn fraction(fraction: f64, body: impl Into<String>) -> Result<Self> {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Err(Error::InvalidPanelWidth(fraction));
        }
        Ok(Self {
            width: PanelWidth::Fraction(fraction),
            body: body.into(),
        })
    }
}

/// Scrollable window over an ordered strip of panels.
#[derive(Debug)]
pub struct Viewport {
    visible_extent: usize,
    height: usize,
    panels: Vec<Panel>,
    panel_widths: Vec<usize>,
    scroll_offset: f64,
    listeners: Vec<ListenerId>,
}

/// A copy has the same panels and offset but no registered listeners.
impl Clone for Viewport {
    fn clone(&self) -> Self {
        Self {
            visible_extent: self.visible_extent,
            height: self.height,
            panels: self.panels.clone(),
            panel_widths: self.panel_widths.clone(),
            scroll_offset: self.scroll_offset,
            listeners: Vec::new(),
        }
    }
}

impl Viewport {
    /// Creates an empty viewport with a window of `visible_extent` by `height` cells.
    pub fn new(visible_extent: usize, height: usize) -> Self {
        Self {
            visible_extent,
            height,
            panels: Vec::new(),
            panel_widths: Vec::new(),
            scroll_offset: 0.0,
            listeners: Vec::new(),
        }
    }

    /// Builder-style variant of [`Viewport::set_panels`].
    pub fn with_panels(mut self, panels: Vec<Panel>) -> Self {
        self.set_panels(panels);
        self
    }

    /// Replaces the panel strip and re-clamps the offset.
    pub fn set_panels(&mut self, panels: Vec<Panel>) {
        self.panels = panels;
        self.relayout();
    }

    /// Appends a panel to the end of the strip.
    pub fn push_panel(&mut self, panel: Panel) {
        self.panels.push(panel);
        self.relayout();
    }

    /// Resizes the window, re-resolving fractional panels and re-clamping the
    /// offset.
    pub fn set_size(&mut self, visible_extent: usize, height: usize) {
        self.visible_extent = visible_extent;
        self.height = height;
        self.relayout();
    }

    fn relayout(&mut self) {
        let visible = self.visible_extent;
        self.panel_widths = self.panels.iter().map(|p| p.width.resolve(visible)).collect();
        self.set_scroll_offset(self.scroll_offset);
    }

    /// The panels in display order.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Resolved width of each panel in cells.
    pub fn panel_widths(&self) -> &[usize] {
        &self.panel_widths
    }

    /// Total scrollable width. Never smaller than the visible window.
    pub fn scroll_extent(&self) -> usize {
        self.panel_widths
            .iter()
            .fold(0, |total: usize, &w| total.saturating_add(w))
            .max(self.visible_extent)
    }

    /// Width of the visible window.
    pub fn visible_extent(&self) -> usize {
        self.visible_extent
    }

    /// Height of the visible window.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Largest valid offset: `scroll_extent - visible_extent`.
    pub fn max_offset(&self) -> usize {
        self.scroll_extent() - self.visible_extent
    }

    /// Current horizontal displacement.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// First visible column.
    pub fn column_offset(&self) -> usize {
        self.scroll_offset.floor() as usize
    }

    /// Writes the offset, clamped to `[0, max_offset]`. Returns the stored value.
    pub(crate) fn set_scroll_offset(&mut self, offset: f64) -> f64 {
        let max = self.max_offset() as f64;
        self.scroll_offset = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(0.0, max)
        };
        self.scroll_offset
    }

    /// Progress of the current offset in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        compute_progress(
            self.scroll_offset,
            self.scroll_extent() as f64,
            self.visible_extent as f64,
        )
    }

    /// Whether the window shows the start of the strip.
    pub fn at_start(&self) -> bool {
        self.scroll_offset <= 0.0
    }

    /// Whether the window shows the end of the strip.
    pub fn at_end(&self) -> bool {
        self.scroll_offset >= self.max_offset() as f64
    }

    /// Index of the panel under the left edge of the window.
    pub fn current_panel(&self) -> Option<usize> {
        let column = self.column_offset();
        let mut start: usize = 0;
        for (i, &width) in self.panel_widths.iter().enumerate() {
            start = start.saturating_add(width);
            if column < start {
                return Some(i);
            }
        }
        None
    }

    /// Registers a listener. Returns `false` if it was already registered.
    pub(crate) fn add_listener(&mut self, id: ListenerId) -> bool {
        if self.listeners.contains(&id) {
            return false;
        }
        self.listeners.push(id);
        true
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| *l != id);
        self.listeners.len() != before
    }

    /// Registered listeners in registration order.
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Whether `id` is registered on this viewport.
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    /// The rows currently inside the window, each exactly `visible_extent`
    /// cells wide. Only panels overlapping the window are drawn.
    pub fn visible_lines(&self) -> Vec<String> {
        let window_start = self.column_offset();
        let window_end = window_start.saturating_add(self.visible_extent);

        let mut rows = vec![String::new(); self.height];
        let mut panel_start: usize = 0;
        for (panel, &width) in self.panels.iter().zip(&self.panel_widths) {
            let panel_end = panel_start.saturating_add(width);
            let from = panel_start.max(window_start) - panel_start;
            let to = panel_end.min(window_end).saturating_sub(panel_start);
            if from < to {
                for (row, line) in rows.iter_mut().zip(panel_rows(&panel.body, self.height)) {
                    row.push_str(&fit_to_width(&cut_columns(&line, from, to), to - from));
                }
            }
            if panel_end >= window_end {
                break;
            }
            panel_start = panel_end;
        }

        rows.iter()
            .map(|row| fit_to_width(row, self.visible_extent))
            .collect()
    }

    /// Renders the visible window.
    pub fn view(&self) -> String {
        self.visible_lines().join("\n")
    }
}

// Body lines, vertically centred in `height` rows.
fn panel_rows(body: &str, height: usize) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split('\n').take(height).collect()
    };
    let top = (height - lines.len()) / 2;

    (0..height)
        .map(|row| {
            row.checked_sub(top)
                .and_then(|i| lines.get(i))
                .map(|line| line.to_string())
                .unwrap_or_default()
        })
        .collect()
}

fn fit_to_width(line: &str, width: usize) -> String {
    let mut out = cut_columns(line, 0, width);
    let w = lg_width(&out);
    out.push_str(&" ".repeat(width.saturating_sub(w)));
    out
}

// Characters straddling either edge are dropped.
fn cut_columns(s: &str, start: usize, end: usize) -> String {
    let mut out = String::new();
    let mut column = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if column >= end {
            break;
        }
        if column >= start && column + w <= end {
            out.push(ch);
        }
        column += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(width: usize, visible: usize) -> Viewport {
        Viewport::new(visible, 1).with_panels(vec![Panel::cells(width, "")])
    }

    #[test]
    fn test_extents_from_panels() {
        let viewport = Viewport::new(100, 10).with_panels(vec![
            Panel::fraction(1.0, "").unwrap(),
            Panel::fraction(0.8, "").unwrap(),
            Panel::fraction(0.9, "").unwrap(),
        ]);
        assert_eq!(viewport.panel_widths(), &[100, 80, 90]);
        assert_eq!(viewport.scroll_extent(), 270);
        assert_eq!(viewport.visible_extent(), 100);
        assert_eq!(viewport.max_offset(), 170);
    }

    #[test]
    fn test_scroll_extent_never_below_window() {
        let viewport = strip(30, 50);
        assert_eq!(viewport.scroll_extent(), 50);
        assert_eq!(viewport.max_offset(), 0);
        assert_eq!(Viewport::new(50, 1).max_offset(), 0);
    }

    #[test]
    fn test_invalid_fraction_is_rejected() {
        assert!(matches!(
            Panel::fraction(0.0, "x"),
            Err(Error::InvalidPanelWidth(_))
        ));
        assert!(Panel::fraction(f64::NAN, "x").is_err());
        assert!(Panel::fraction(-0.5, "x").is_err());
    }

    #[test]
    fn test_push_panel_extends_strip() {
        let mut viewport = strip(30, 20);
        viewport.set_scroll_offset(10.0);
        assert!(viewport.at_end());

        viewport.push_panel(Panel::fraction(0.5, "tail").unwrap());
        assert_eq!(viewport.panel_widths(), &[30, 10]);
        assert_eq!(viewport.max_offset(), 20);
        assert_eq!(viewport.scroll_offset(), 10.0);
        assert!(!viewport.at_end());
    }

    #[test]
    fn test_huge_panels_saturate_extent() {
        let mut viewport = Viewport::new(100, 1).with_panels(vec![
            Panel::fraction(1e300, "").unwrap(),
            Panel::fraction(1.0, "").unwrap(),
        ]);
        assert_eq!(viewport.panel_widths(), &[usize::MAX, 100]);
        assert_eq!(viewport.scroll_extent(), usize::MAX);
        assert_eq!(viewport.max_offset(), usize::MAX - 100);

        viewport.set_scroll_offset(1e6);
        assert_eq!(viewport.scroll_offset(), 1e6);
        assert_eq!(viewport.current_panel(), Some(0));
        assert_eq!(viewport.visible_lines(), vec![" ".repeat(100)]);

        let cells = Viewport::new(10, 1).with_panels(vec![
            Panel::cells(usize::MAX, ""),
            Panel::cells(10, ""),
        ]);
        assert_eq!(cells.scroll_extent(), usize::MAX);
    }

    #[test]
    fn test_clone_has_no_listeners() {
        let mut viewport = strip(30, 10);
        viewport.add_listener(ListenerId(3));
        viewport.set_scroll_offset(5.0);

        let copy = viewport.clone();
        assert!(copy.listeners().is_empty());
        assert_eq!(copy.scroll_offset(), 5.0);
        assert_eq!(copy.panel_widths(), viewport.panel_widths());
    }

    #[test]
    fn test_offset_is_clamped() {
        let mut viewport = strip(2000, 500);
        assert_eq!(viewport.set_scroll_offset(1800.0), 1500.0);
        assert!(viewport.at_end());
        assert_eq!(viewport.set_scroll_offset(-20.0), 0.0);
        assert!(viewport.at_start());
        assert_eq!(viewport.set_scroll_offset(f64::NAN), 0.0);
    }

    #[test]
    fn test_progress_follows_offset() {
        let mut viewport = strip(2000, 500);
        viewport.set_scroll_offset(750.0);
        assert_eq!(viewport.progress(), 50.0);
    }

    #[test]
    fn test_resize_reresolves_fractions_and_reclamps() {
        let mut viewport = Viewport::new(100, 2).with_panels(vec![
            Panel::fraction(1.0, "").unwrap(),
            Panel::cells(50, ""),
        ]);
        viewport.set_scroll_offset(50.0);

        viewport.set_size(200, 2);
        assert_eq!(viewport.panel_widths(), &[200, 50]);
        assert_eq!(viewport.scroll_offset(), 50.0);

        viewport.set_panels(vec![Panel::fraction(1.0, "").unwrap()]);
        assert_eq!(viewport.scroll_offset(), 0.0);
    }

    #[test]
    fn test_current_panel() {
        let mut viewport = Viewport::new(10, 1).with_panels(vec![
            Panel::cells(10, ""),
            Panel::cells(8, ""),
            Panel::cells(12, ""),
        ]);
        assert_eq!(viewport.current_panel(), Some(0));
        viewport.set_scroll_offset(10.0);
        assert_eq!(viewport.current_panel(), Some(1));
        viewport.set_scroll_offset(19.5);
        assert_eq!(viewport.current_panel(), Some(2));
        assert_eq!(Viewport::new(10, 1).current_panel(), None);
    }

    #[test]
    fn test_listener_table_is_a_set() {
        let mut viewport = Viewport::new(10, 1);
        let id = ListenerId(7);
        assert!(viewport.add_listener(id));
        assert!(!viewport.add_listener(id));
        assert_eq!(viewport.listeners(), &[id]);
        assert!(viewport.remove_listener(id));
        assert!(!viewport.remove_listener(id));
        assert!(!viewport.has_listener(id));
    }

    #[test]
    fn test_visible_lines_slide_across_panels() {
        let mut viewport = Viewport::new(6, 1).with_panels(vec![
            Panel::cells(6, "AAAAAA"),
            Panel::cells(6, "BBBBBB"),
        ]);
        assert_eq!(viewport.visible_lines(), vec!["AAAAAA"]);

        viewport.set_scroll_offset(3.0);
        assert_eq!(viewport.visible_lines(), vec!["AAABBB"]);

        viewport.set_scroll_offset(6.0);
        assert_eq!(viewport.view(), "BBBBBB");
    }

    #[test]
    fn test_window_past_short_strip_is_padded() {
        let viewport = Viewport::new(6, 1).with_panels(vec![Panel::cells(4, "abcd")]);
        assert_eq!(viewport.visible_lines(), vec!["abcd  "]);
    }

    #[test]
    fn test_panel_body_is_centred_and_fitted() {
        let viewport = Viewport::new(5, 3).with_panels(vec![Panel::cells(5, "hello world")]);
        assert_eq!(viewport.visible_lines(), vec!["     ", "hello", "     "]);
    }

    #[test]
    fn test_tall_body_is_truncated() {
        let viewport = Viewport::new(2, 2).with_panels(vec![Panel::cells(2, "a\nb\nc")]);
        assert_eq!(viewport.visible_lines(), vec!["a ", "b "]);
    }

    #[test]
    fn test_wide_characters_are_not_split() {
        assert_eq!(cut_columns("日本語", 1, 5), "本");
        assert_eq!(fit_to_width("日本", 3), "日 ");
    }

    #[test]
    fn test_empty_strip_renders_blank_window() {
        let viewport = Viewport::new(4, 2);
        assert_eq!(viewport.visible_lines(), vec!["    ", "    "]);
    }
}
