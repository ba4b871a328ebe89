//! Power and heart-rate peak reports.
//!
//! One row per activity, grouped into weeks, with each window's three best
//! values across the whole history highlighted and summarised at the end.

use super::{format_date, format_distance, format_duration, format_elevation, Painter, NO_DATA};
use crate::metrics::analytics::{PeakTable, PeakWindow};
use crate::recording::types::Activity;
use chrono::Datelike;
use std::collections::HashMap;
use std::fmt::Write;

const NAME_WIDTH: usize = 40;
const PEAK_WIDTH: usize = 4;

/// Which peak table a report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakKind {
    Power,
    HeartRate,
}

impl PeakKind {
    pub fn table<'a>(&self, activity: &'a Activity) -> &'a PeakTable {
        match self {
            PeakKind::Power => &activity.power_peaks,
            PeakKind::HeartRate => &activity.hr_peaks,
        }
    }
}

/// Every value per window across activities, best first.
pub fn ranked_peaks(activities: &[Activity], kind: PeakKind) -> HashMap<PeakWindow, Vec<u16>> {
    let mut ranked: HashMap<PeakWindow, Vec<u16>> = HashMap::new();

    for activity in activities {
        for (window, value) in kind.table(activity).iter() {
            if let Some(value) = value {
                ranked.entry(window).or_default().push(value);
            }
        }
    }

    for values in ranked.values_mut() {
        values.sort_unstable_by(|a, b| b.cmp(a));
    }

    ranked
}

/// Position of `value` among the top three (0 = best), if it makes the cut.
fn rank_of(value: u16, best: &[u16]) -> Option<usize> {
    best.iter().take(3).position(|&b| value >= b)
}

/// Render the peak report for all activities.
pub fn render_peaks(activities: &[Activity], kind: PeakKind, painter: &Painter) -> String {
    if activities.is_empty() {
        return format!("{}\n", NO_DATA);
    }

    let ranked = ranked_peaks(activities, kind);
    let separator = row_separator();
    let mut out = String::new();
    let mut last_weekday: Option<u32> = None;

    for activity in activities {
        let weekday = activity.start_time.weekday().num_days_from_monday();

        // New week whenever the weekday goes backwards.
        if last_weekday.map_or(true, |last| last > weekday) {
            if last_weekday.is_some() {
                let _ = writeln!(out, "{}", separator);
            }
            out.push('\n');
            out.push_str(&header());
            let _ = writeln!(out, "{}", separator);
        }
        last_weekday = Some(weekday);

        out.push_str(&detail_line(activity, kind, &ranked, painter));
    }
    let _ = writeln!(out, "{}", separator);

    out.push_str(&summary(&ranked, painter));

    out
}

fn header() -> String {
    let mut line = format!(
        "{:<16}   {:<NAME_WIDTH$}   {:>8}   {:>9}   {:<5}   {:>8}",
        "Date", "Activity", "Distance", "Elevation", "Start", "Duration"
    );
    for window in PeakWindow::ALL {
        let _ = write!(line, "   {:>PEAK_WIDTH$}", window.label());
    }
    line.push('\n');
    line
}

fn row_separator() -> String {
    let mut widths = vec![16, NAME_WIDTH, 8, 9, 5, 8];
    widths.extend(std::iter::repeat(PEAK_WIDTH).take(PeakWindow::ALL.len()));
    widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("   ")
}

fn detail_line(
    activity: &Activity,
    kind: PeakKind,
    ranked: &HashMap<PeakWindow, Vec<u16>>,
    painter: &Painter,
) -> String {
    let name: String = activity.display_name().chars().take(NAME_WIDTH).collect();
    let elevation = activity
        .elevation_meters
        .map(format_elevation)
        .unwrap_or_default();

    let mut line = format!(
        "{:<16}   {:<NAME_WIDTH$}   {:>8}   {:>9}   {:<5}   {:>8}",
        format_date(&activity.start_time),
        name,
        format_distance(activity.distance_meters),
        elevation,
        activity.start_time.format("%H:%M").to_string(),
        format_duration(activity.duration_seconds),
    );

    for (window, value) in kind.table(activity).iter() {
        let cell = match value {
            Some(v) => {
                let text = format!("{:>PEAK_WIDTH$}", v);
                match ranked.get(&window).and_then(|best| rank_of(v, best)) {
                    Some(rank) => painter.rank(rank, &text),
                    None => text,
                }
            }
            None => " ".repeat(PEAK_WIDTH),
        };
        let _ = write!(line, "   {}", cell);
    }

    line.push('\n');
    line
}

fn summary(ranked: &HashMap<PeakWindow, Vec<u16>>, painter: &Painter) -> String {
    let label_width = 16 + 3 + NAME_WIDTH + 3 + 8 + 3 + 9 + 3 + 5 + 3 + 8;
    let mut out = String::from("\n");

    let mut heading = " ".repeat(label_width);
    for window in PeakWindow::ALL {
        let _ = write!(heading, "   {:>PEAK_WIDTH$}", window.label());
    }
    let _ = writeln!(out, "{}", heading);

    let rule = {
        let mut rule = "─".repeat(label_width);
        for _ in PeakWindow::ALL {
            let _ = write!(rule, "   {}", "─".repeat(PEAK_WIDTH));
        }
        rule
    };
    let _ = writeln!(out, "{}", rule);

    for (rank, label) in ["First", "Second", "Third"].iter().enumerate() {
        let title = if rank == 0 { "Peak values" } else { "" };
        let padded = format!("{:>width$}", label, width = label_width - title.len());
        let mut line = format!("{}{}", title, painter.rank(rank, &padded));
        for window in PeakWindow::ALL {
            let value = ranked
                .get(&window)
                .and_then(|values| values.get(rank))
                .map(|v| v.to_string())
                .unwrap_or_default();
            let _ = write!(line, "   {:>PEAK_WIDTH$}", value);
        }
        let _ = writeln!(out, "{}", line);
    }

    let _ = writeln!(out, "{}", rule);
    out
}
