#![warn(missing_docs)]

//! # hscroll-panels
//!
//! Horizontal panel navigation for [bubbletea-rs](https://github.com/whit3rabbit/bubbletea-rs)
//! applications. A strip of panels sits in a viewport that only scrolls
//! sideways; vertical wheel input is re-applied as horizontal displacement and
//! a progress bar tracks how far along the strip the user is.
//!
//! ## Overview
//!
//! - [`engine::ScrollEngine`] listens for wheel events on a viewport and moves
//!   it 1:1 with the effective delta (vertical when non-zero, otherwise
//!   horizontal), suppressing the event's native effect.
//! - [`viewport::Viewport`] records the scroll extent, visible extent and
//!   offset, lays out the panels and renders the visible window.
//! - [`progress::compute_progress`] normalizes the offset to `[0, 100]`, and
//!   [`progress::Model`] draws it as a bar.
//! - [`page::Page`] hosts everything as a bubbletea model.
//!
//! ## Quick Start
//!
//! ```rust
//! use hscroll_panels::prelude::*;
//!
//! let mut page = Page::default().with_panels(vec![
//!     Panel::fraction(1.0, "Intro").unwrap(),
//!     Panel::fraction(0.8, "Work").unwrap(),
//!     Panel::fraction(0.9, "Projects").unwrap(),
//! ]);
//! let _initial = page.mount();
//!
//! // One wheel tick of 40 cells down moves the strip 40 cells right.
//! page.dispatch_wheel(WheelEvent::vertical(40.0));
//! assert_eq!(page.viewport().scroll_offset(), 40.0);
//! assert!(page.progress() > 0.0);
//! assert_eq!(page.root_scroll(), 0.0);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use hscroll_panels::prelude::*;
//!
//! let config = Config::from_json_str(r#"{ "engine": { "wheel_line_delta": 6.0 } }"#).unwrap();
//! let page = Page::new(&config, 120, 40).unwrap();
//! assert_eq!(page.viewport().visible_extent(), 120);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod page;
pub mod progress;
pub mod viewport;
pub mod wheel;

pub use config::Config;
pub use engine::{Attachment, EngineState, ScrollEngine};
pub use error::{Error, Result};
pub use page::{Page, ProgressMsg};
pub use progress::{compute_progress, Model as ProgressBar};
pub use viewport::{ListenerId, Panel, PanelWidth, Viewport};
pub use wheel::WheelEvent;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hscroll_panels::prelude::*;
///
/// let mut viewport = Viewport::new(10, 1).with_panels(vec![Panel::cells(30, "")]);
/// let mut engine = ScrollEngine::new();
/// engine.attach(&mut viewport);
/// assert_eq!(engine.on_input_event(&mut viewport, &mut WheelEvent::vertical(5.0)), Some(25.0));
/// ```
pub mod prelude {
    pub use crate::config::{Config, EngineConfig, IndicatorConfig};
    pub use crate::engine::{Attachment, EngineState, ScrollEngine};
    pub use crate::page::{Page, ProgressMsg};
    pub use crate::progress::{compute_progress, Model as ProgressBar};
    pub use crate::viewport::{Panel, PanelWidth, Viewport};
    pub use crate::wheel::WheelEvent;
}
