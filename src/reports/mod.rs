//! Terminal reports.
//!
//! Every report renders to a `String`; the binary prints it. Colour is
//! applied through [`Painter`] so tests can render plain text.

pub mod detail;
pub mod fitness;
pub mod peaks;
pub mod week;

pub use detail::render_detail;
pub use fitness::render_fitness;
pub use peaks::{render_peaks, PeakKind};
pub use week::render_week;

use crate::metrics::analytics::{AerobicDecoupling, DecouplingBand};
use ansi_term::{Colour, Style};
use chrono::NaiveDateTime;

/// Shown when a report has no rows at all.
pub const NO_DATA: &str = "No data to report on";

/// Applies ANSI styles when colour is enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Plain text output.
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    /// Dimmed italic, used for subtotal rows.
    pub fn subtle(&self, text: &str) -> String {
        self.paint(Colour::Fixed(240).italic(), text)
    }

    /// Highlight for the first, second and third best values.
    pub fn rank(&self, rank: usize, text: &str) -> String {
        let style = match rank {
            0 => Colour::White.on(Colour::Red),
            1 => Colour::Black.on(Colour::Yellow),
            2 => Colour::Black.on(Colour::White),
            _ => return text.to_string(),
        };
        self.paint(style, text)
    }
}

/// Elapsed time as `H:MM:SS`.
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

/// Meters as kilometres with two decimals ("15.00km").
pub fn format_distance(meters: f64) -> String {
    format!("{:.2}km", meters / 1000.0)
}

/// Whole meters with thousands separators ("1,250m").
pub fn format_elevation(meters: f64) -> String {
    let whole = meters.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }
    format!("{}m", grouped)
}

/// Report date column ("Tue 12 Mar, 2024").
pub fn format_date(time: &NaiveDateTime) -> String {
    time.format("%a %d %b, %Y").to_string()
}

/// Coupling percentage coloured by band, right-aligned to `width`.
pub fn format_decoupling(
    decoupling: Option<&AerobicDecoupling>,
    width: usize,
    painter: &Painter,
) -> String {
    let Some(decoupling) = decoupling else {
        return " ".repeat(width);
    };

    let text = format!("{:>width$}", format!("{:.1}%", decoupling.coupling), width = width);
    let colour = match decoupling.band() {
        DecouplingBand::Coupled => Colour::Green,
        DecouplingBand::Drifting => Colour::Yellow,
        DecouplingBand::Decoupled => Colour::Red,
    };
    painter.paint(colour.bold(), &text)
}
