//! The scroll engine: vertical wheel input in, horizontal displacement out.
//!
//! A [`ScrollEngine`] is a wheel listener. While attached to a
//! [`Viewport`] it handles every wheel event delivered to that viewport:
//!
//! 1. the event's native effect is suppressed,
//! 2. the effective delta is picked (vertical when non-zero, else horizontal),
//! 3. the delta, times the configured multiplier, is added to the offset,
//! 4. the offset is clamped to the scrollable range,
//! 5. progress is recomputed from the new offset and returned to the caller.
//!
//! There is no smoothing or inertia. With the default multiplier of `1.0`
//! every tick moves the viewport by exactly its delta.
//!
//! The engine has two states, detached and attached. Attaching registers the
//! engine's listener id on the viewport exactly once; attaching again before
//! detaching changes nothing, whichever viewport it is handed. Events handed to a detached engine are ignored.
//! [`ScrollEngine::attach_scoped`] returns an [`Attachment`] guard that
//! detaches when dropped, including during unwinding.
//!
//! ```rust
//! use hscroll_panels::engine::ScrollEngine;
//! use hscroll_panels::viewport::{Panel, Viewport};
//! use hscroll_panels::wheel::WheelEvent;
//!
//! let mut viewport = Viewport::new(500, 1).with_panels(vec![Panel::cells(2000, "")]);
//! let mut engine = ScrollEngine::new();
//!
//! {
//!     let mut attachment = engine.attach_scoped(&mut viewport);
//!     let progress = attachment.dispatch(&mut WheelEvent::vertical(750.0));
//!     assert_eq!(progress, Some(50.0));
//! }
//!
//! // Detached again once the guard is gone.
//! assert!(viewport.listeners().is_empty());
//! assert_eq!(viewport.scroll_offset(), 750.0);
//! ```

use crate::config::EngineConfig;
use crate::error::Result;
use crate::viewport::{ListenerId, Viewport};
use crate::wheel::WheelEvent;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, trace, warn};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Lifecycle of a [`ScrollEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Not registered on any viewport. Events are ignored.
    Detached,
    /// Registered as a wheel listener.
    Attached,
}

/// Maps wheel input on a viewport to horizontal scrolling.
#[derive(Debug)]
pub struct ScrollEngine {
    id: ListenerId,
    state: EngineState,
    multiplier: f64,
}

impl ScrollEngine {
    /// Creates a detached engine with the raw 1:1 mapping.
    pub fn new() -> Self {
        Self {
            id: ListenerId(next_id()),
            state: EngineState::Detached,
            multiplier: 1.0,
        }
    }

    /// Creates a detached engine using the configured multiplier.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            multiplier: config.delta_multiplier,
            ..Self::new()
        })
    }

    /// The id this engine registers on a viewport.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether the engine is attached.
    pub fn is_attached(&self) -> bool {
        self.state == EngineState::Attached
    }

    /// Factor applied to every effective delta.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Registers the engine as a wheel listener on `viewport`.
    ///
    /// Returns `false` if nothing changed: the engine was already registered
    /// there, or it is still attached to another viewport. An engine listens
    /// on at most one viewport at a time.
    pub fn attach(&mut self, viewport: &mut Viewport) -> bool {
        if viewport.has_listener(self.id) {
            self.state = EngineState::Attached;
            debug!(listener = ?self.id, "scroll engine already attached, ignoring");
            return false;
        }
        if self.is_attached() {
            warn!(listener = ?self.id, "scroll engine attached elsewhere, detach it first");
            return false;
        }

        viewport.add_listener(self.id);
        self.state = EngineState::Attached;
        debug!(
            listener = ?self.id,
            scroll_extent = viewport.scroll_extent(),
            visible_extent = viewport.visible_extent(),
            "scroll engine attached"
        );
        true
    }

    /// Removes the engine's listener from `viewport`.
    ///
    /// Returns `false`, leaving the state untouched, if the engine was not
    /// registered on `viewport`.
    pub fn detach(&mut self, viewport: &mut Viewport) -> bool {
        if !viewport.remove_listener(self.id) {
            trace!(listener = ?self.id, "scroll engine not registered here");
            return false;
        }
        self.state = EngineState::Detached;
        debug!(listener = ?self.id, "scroll engine detached");
        true
    }

    /// Attaches to `viewport` for the lifetime of the returned guard.
    pub fn attach_scoped<'a>(&'a mut self, viewport: &'a mut Viewport) -> Attachment<'a> {
        self.attach(viewport);
        Attachment {
            engine: self,
            viewport,
        }
    }

    /// Handles one wheel event delivered to `viewport`.
    ///
    /// Returns the recomputed progress, or `None` when the engine is not
    /// attached to this viewport, in which case the event and the viewport
    /// are left untouched.
    pub fn on_input_event(&self, viewport: &mut Viewport, event: &mut WheelEvent) -> Option<f64> {
        if !self.is_attached() || !viewport.has_listener(self.id) {
            trace!(listener = ?self.id, "wheel event ignored, engine detached");
            return None;
        }

        event.prevent_default();

        let delta = event.effective_delta() * self.multiplier;
        let offset = viewport.set_scroll_offset(viewport.scroll_offset() + delta);
        let progress = viewport.progress();

        trace!(delta, offset, progress, "wheel event applied");
        Some(progress)
    }
}

impl Default for ScrollEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a [`ScrollEngine`] attached to a [`Viewport`] until dropped.
#[derive(Debug)]
pub struct Attachment<'a> {
    engine: &'a mut ScrollEngine,
    viewport: &'a mut Viewport,
}

impl Attachment<'_> {
    /// Delivers a wheel event to the attached engine.
    pub fn dispatch(&mut self, event: &mut WheelEvent) -> Option<f64> {
        self.engine.on_input_event(self.viewport, event)
    }

    /// The attached viewport.
    pub fn viewport(&self) -> &Viewport {
        &*self.viewport
    }

    /// Progress of the attached viewport.
    pub fn progress(&self) -> f64 {
        self.viewport.progress()
    }
}

impl Drop for Attachment<'_> {
    fn drop(&mut self) {
        self.engine.detach(self.viewport);
    }
}
