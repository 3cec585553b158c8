//! Wheel and trackpad input events.
//!
//! A [`WheelEvent`] carries the raw vertical and horizontal deltas of one
//! wheel tick plus a default-prevented flag, mirroring what a host delivers
//! to a scroll listener. Either delta may be missing; a missing or
//! non-finite component is read as zero so malformed input never faults.
//!
//! Terminal mouse-wheel notches arrive as [`crossterm::event::MouseEvent`]s
//! and are converted with [`WheelEvent::from_mouse`], which turns each notch
//! into a fixed number of cells.

use crossterm::event::{MouseEvent, MouseEventKind};

/// One wheel tick delivered to the viewport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelEvent {
    /// Vertical component. Positive scrolls toward the end.
    pub delta_y: Option<f64>,
    /// Horizontal component. Positive scrolls toward the end.
    pub delta_x: Option<f64>,
    default_prevented: bool,
}

impl WheelEvent {
    /// Creates an event carrying both components.
    pub fn new(delta_y: f64, delta_x: f64) -> Self {
        Self {
            delta_y: Some(delta_y),
            delta_x: Some(delta_x),
            default_prevented: false,
        }
    }

    /// Creates a purely vertical event.
    pub fn vertical(delta_y: f64) -> Self {
        Self {
            delta_y: Some(delta_y),
            ..Self::default()
        }
    }

    /// Creates a purely horizontal event.
    pub fn horizontal(delta_x: f64) -> Self {
        Self {
            delta_x: Some(delta_x),
            ..Self::default()
        }
    }

    /// Converts a terminal mouse event into a wheel event, moving
    /// `line_delta` cells per notch. Returns `None` for clicks, drags and
    /// moves.
    ///
    /// ```rust
    /// use crossterm::event::{KeyModifiers, MouseEvent, MouseEventKind};
    /// use hscroll_panels::wheel::WheelEvent;
    ///
    /// let notch = MouseEvent {
    ///     kind: MouseEventKind::ScrollDown,
    ///     column: 0,
    ///     row: 0,
    ///     modifiers: KeyModifiers::NONE,
    /// };
    /// assert_eq!(WheelEvent::from_mouse(&notch, 3.0), Some(WheelEvent::vertical(3.0)));
    /// ```
    pub fn from_mouse(event: &MouseEvent, line_delta: f64) -> Option<Self> {
        match event.kind {
            MouseEventKind::ScrollDown => Some(Self::vertical(line_delta)),
            MouseEventKind::ScrollUp => Some(Self::vertical(-line_delta)),
            MouseEventKind::ScrollRight => Some(Self::horizontal(line_delta)),
            MouseEventKind::ScrollLeft => Some(Self::horizontal(-line_delta)),
            _ => None,
        }
    }

    /// The single magnitude that drives horizontal displacement: the
    /// vertical delta when it is non-zero, otherwise the horizontal one.
    pub fn effective_delta(&self) -> f64 {
        let dy = sanitize(self.delta_y);
        if dy != 0.0 {
            dy
        } else {
            sanitize(self.delta_x)
        }
    }

    /// Suppresses the host's native handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a listener suppressed the native handling.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

fn sanitize(delta: Option<f64>) -> f64 {
    match delta {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
