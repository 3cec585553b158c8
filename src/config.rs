//! Configuration for the scroll engine, the progress indicator and the page.
//!
//! Every field has a default, so an empty JSON object is a valid document:
//!
//! ```rust
//! use hscroll_panels::config::Config;
//!
//! let config = Config::from_json_str(r#"{ "engine": { "delta_multiplier": 2.0 } }"#).unwrap();
//! assert_eq!(config.engine.delta_multiplier, 2.0);
//! assert_eq!(config.engine.wheel_line_delta, 3.0);
//! assert_eq!(config.hint, "Scroll to navigate →");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of cells one mouse-wheel notch moves the viewport.
pub const DEFAULT_WHEEL_LINE_DELTA: f64 = 3.0;

/// Default hint rendered under the panel strip.
pub const DEFAULT_HINT: &str = "Scroll to navigate →";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input mapping settings.
    pub engine: EngineConfig,
    /// Progress bar appearance.
    pub indicator: IndicatorConfig,
    /// Text shown centred on the last line of the page. Empty hides it.
    pub hint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            indicator: IndicatorConfig::default(),
            hint: DEFAULT_HINT.to_string(),
        }
    }
}

/// Settings that shape how wheel input becomes horizontal displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Uniform factor applied to every effective delta, in both directions.
    /// `1.0` keeps the raw 1:1 mapping.
    pub delta_multiplier: f64,
    /// Cells contributed by one terminal mouse-wheel notch before the
    /// multiplier is applied.
    pub wheel_line_delta: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delta_multiplier: 1.0,
            wheel_line_delta: DEFAULT_WHEEL_LINE_DELTA,
        }
    }
}

impl EngineConfig {
    /// Checks that both scalars are finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !self.delta_multiplier.is_finite() || self.delta_multiplier <= 0.0 {
            return Err(Error::InvalidMultiplier(self.delta_multiplier));
        }
        if !self.wheel_line_delta.is_finite() || self.wheel_line_delta <= 0.0 {
            return Err(Error::InvalidWheelDelta(self.wheel_line_delta));
        }
        Ok(())
    }
}

/// Appearance of the progress bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Character used for the filled part of the bar.
    pub full_char: char,
    /// Character used for the unfilled part of the bar.
    pub empty_char: char,
    /// Colour of the filled part when no gradient is set.
    pub full_color: String,
    /// Colour of the unfilled part.
    pub empty_color: String,
    /// Optional two-colour gradient for the filled part.
    pub gradient: Option<(String, String)>,
    /// Whether a trailing percentage is printed after the bar.
    pub show_percentage: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            full_char: '━',
            empty_char: '─',
            full_color: "#7571F9".to_string(),
            empty_color: "#3C3C3C".to_string(),
            gradient: None,
            show_percentage: false,
        }
    }
}

impl Config {
    /// Parses and validates a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&source)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()
    }
}
