//! Scroll progress: the pure normalization function and the bar that shows it.
//!
//! Progress is always derived. [`compute_progress`] maps a horizontal offset
//! onto `[0, 100]` against the maximum scrollable offset, and the indicator
//! [`Model`] only renders whatever value the host hands it.
//!
//! # Basic Usage
//!
//! ```rust
//! use hscroll_panels::progress::{compute_progress, new, with_width, without_percentage};
//!
//! assert_eq!(compute_progress(750.0, 2000.0, 500.0), 50.0);
//! assert_eq!(compute_progress(0.0, 500.0, 500.0), 0.0);
//!
//! let mut bar = new(&[with_width(20), without_percentage()]);
//! bar.set_progress(50.0);
//! assert_eq!(bar.progress(), 50.0);
//! ```

use crate::config::IndicatorConfig;
use lipgloss_extras::lipgloss;
use lipgloss_extras::lipgloss::blending::blend_1d;
use lipgloss_extras::lipgloss::{Color, Style};

const DEFAULT_WIDTH: i32 = 40;

/// Normalizes `offset` against the maximum scrollable offset.
///
/// Returns `0` when there is no overflow (`scroll_extent <= visible_extent`),
/// otherwise `offset / (scroll_extent - visible_extent) * 100` clamped to
/// `[0, 100]`. Non-finite offsets report `0`.
pub fn compute_progress(offset: f64, scroll_extent: f64, visible_extent: f64) -> f64 {
    let max_scroll = (scroll_extent - visible_extent).max(0.0);
    if max_scroll == 0.0 || !max_scroll.is_finite() || !offset.is_finite() {
        return 0.0;
    }
    (offset / max_scroll * 100.0).clamp(0.0, 100.0)
}

/// Configuration options for the progress bar, applied by [`new`].
pub enum ProgressOption {
    /// Fill with a gradient between two colours.
    WithGradient(String, String),
    /// Fill with a single colour.
    WithSolidFill(String),
    /// Characters for the filled and empty parts.
    WithFillCharacters(char, char),
    /// Print a trailing percentage.
    WithPercentage,
    /// Hide the trailing percentage.
    WithoutPercentage,
    /// Total width in cells, percentage text included.
    WithWidth(i32),
}

impl ProgressOption {
    fn apply(&self, m: &mut Model) {
        match self {
            ProgressOption::WithGradient(color_a, color_b) => {
                m.use_ramp = true;
                m.ramp_color_a = color_a.clone();
                m.ramp_color_b = color_b.clone();
            }
            ProgressOption::WithSolidFill(color) => {
                m.full_color = color.clone();
                m.use_ramp = false;
            }
            ProgressOption::WithFillCharacters(full, empty) => {
                m.full = *full;
                m.empty = *empty;
            }
            ProgressOption::WithPercentage => {
                m.show_percentage = true;
            }
            ProgressOption::WithoutPercentage => {
                m.show_percentage = false;
            }
            ProgressOption::WithWidth(width) => {
                m.width = (*width).max(0);
            }
        }
    }
}

/// Fills the bar with a gradient from `color_a` to `color_b`.
pub fn with_gradient(color_a: String, color_b: String) -> ProgressOption {
    ProgressOption::WithGradient(color_a, color_b)
}

/// Fills the bar with a single colour.
pub fn with_solid_fill(color: String) -> ProgressOption {
    ProgressOption::WithSolidFill(color)
}

/// Sets the filled and empty characters.
pub fn with_fill_characters(full: char, empty: char) -> ProgressOption {
    ProgressOption::WithFillCharacters(full, empty)
}

/// Shows the trailing percentage.
pub fn with_percentage() -> ProgressOption {
    ProgressOption::WithPercentage
}

/// Hides the trailing percentage.
pub fn without_percentage() -> ProgressOption {
    ProgressOption::WithoutPercentage
}

/// Sets the total width of the bar.
pub fn with_width(w: i32) -> ProgressOption {
    ProgressOption::WithWidth(w)
}

/// Passive progress indicator.
///
/// Holds a display copy of the last published progress and renders it as a
/// proportional-width bar. It never derives progress on its own.
#[derive(Debug, Clone)]
pub struct Model {
    /// Total width in cells, percentage text included.
    pub width: i32,

    /// Character for the filled part.
    pub full: char,
    /// Colour of the filled part when no gradient is used.
    pub full_color: String,

    /// Character for the unfilled part.
    pub empty: char,
    /// Colour of the unfilled part.
    pub empty_color: String,

    /// Whether to print the percentage after the bar.
    pub show_percentage: bool,
    /// Style applied to the percentage text.
    pub percentage_style: Style,

    shown: f64,

    use_ramp: bool,
    ramp_color_a: String,
    ramp_color_b: String,
}

/// Creates a progress bar with the given options applied in order.
pub fn new(opts: &[ProgressOption]) -> Model {
    let mut m = Model {
        width: DEFAULT_WIDTH,
        full: '█',
        full_color: "#7571F9".to_string(),
        empty: '░',
        empty_color: "#606060".to_string(),
        show_percentage: true,
        percentage_style: Style::new(),
        shown: 0.0,
        use_ramp: false,
        ramp_color_a: String::new(),
        ramp_color_b: String::new(),
    };

    for opt in opts {
        opt.apply(&mut m);
    }

    m
}

impl Model {
    /// Builds a bar of `width` cells styled from configuration.
    pub fn from_config(config: &IndicatorConfig, width: i32) -> Self {
        let mut opts = vec![
            with_width(width),
            with_fill_characters(config.full_char, config.empty_char),
            with_solid_fill(config.full_color.clone()),
            if config.show_percentage {
                with_percentage()
            } else {
                without_percentage()
            },
        ];
        if let Some((a, b)) = &config.gradient {
            opts.push(with_gradient(a.clone(), b.clone()));
        }
        let mut m = new(&opts);
        m.empty_color = config.empty_color.clone();
        m
    }

    /// The progress currently displayed, in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        self.shown
    }

    /// Replaces the displayed progress. Values are clamped to `[0, 100]`.
    pub fn set_progress(&mut self, progress: f64) {
        self.shown = if progress.is_finite() {
            progress.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    /// Renders the bar at the displayed progress.
    pub fn view(&self) -> String {
        self.view_as(self.shown)
    }

    /// Renders the bar at an arbitrary progress without storing it.
    pub fn view_as(&self, progress: f64) -> String {
        let fraction = (progress / 100.0).clamp(0.0, 1.0);
        let percent_view = self.percentage_view(fraction);
        let bar_view = self.bar_view(fraction, visible_width(&percent_view));

        format!("{}{}", bar_view, percent_view)
    }

    /// Number of filled cells for `progress` at the current width.
    pub fn filled_width(&self, progress: f64) -> usize {
        let fraction = (progress / 100.0).clamp(0.0, 1.0);
        let text_width = visible_width(&self.percentage_view(fraction));
        filled_cells(self.width - text_width, fraction) as usize
    }

    fn bar_view(&self, fraction: f64, text_width: i32) -> String {
        let tw = std::cmp::max(0, self.width - text_width);
        let fw = filled_cells(tw, fraction);

        let mut result = String::new();

        if self.use_ramp {
            let grad_len = std::cmp::max(2, tw) as usize;
            let start = Color::from(self.ramp_color_a.as_str());
            let end = Color::from(self.ramp_color_b.as_str());
            let gradient_colors = blend_1d(grad_len, vec![start, end]);

            for i in 0..fw as usize {
                let color_idx = std::cmp::min(i, grad_len - 1);
                let styled = Style::new()
                    .foreground(gradient_colors[color_idx].clone())
                    .render(&self.full.to_string());
                result.push_str(&styled);
            }
        } else {
            let styled = Style::new()
                .foreground(Color::from(self.full_color.as_str()))
                .render(&self.full.to_string());
            result.push_str(&styled.repeat(fw as usize));
        }

        let empty_styled = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.empty.to_string());
        let n = std::cmp::max(0, tw - fw);
        result.push_str(&empty_styled.repeat(n as usize));

        result
    }

    fn percentage_view(&self, fraction: f64) -> String {
        if !self.show_percentage {
            return String::new();
        }
        let percentage = format!(" {:3.0}%", fraction * 100.0);
        self.percentage_style.render(&percentage)
    }
}

fn visible_width(s: &str) -> i32 {
    i32::try_from(lipgloss::width_visible(s)).unwrap_or(i32::MAX)
}

fn filled_cells(total: i32, fraction: f64) -> i32 {
    let total = std::cmp::max(0, total);
    std::cmp::max(
        0,
        std::cmp::min(total, ((total as f64) * fraction).round() as i32),
    )
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}
