//! Week report: recent activities with derived metrics, day and week totals.

use super::{
    format_date, format_decoupling, format_distance, format_duration, format_elevation, Painter,
};
use crate::metrics::analytics::Fitness;
use crate::recording::types::Activity;
use chrono::NaiveDate;
use std::fmt::Write;

const NAME_WIDTH: usize = 40;

/// Summed quantities for a day or week.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub distance_meters: f64,
    pub elevation_meters: f64,
    pub tss: f64,
    pub duration_seconds: u32,
}

impl Totals {
    fn add(&mut self, activity: &Activity) {
        self.distance_meters += activity.distance_meters;
        self.elevation_meters += activity.elevation_meters.unwrap_or(0.0);
        self.tss += activity.metrics.map(|m| m.tss).unwrap_or(0.0);
        self.duration_seconds += activity.duration_seconds;
    }
}

/// Largest single-activity values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Maxima {
    pub distance_meters: f64,
    pub elevation_meters: f64,
    pub tss: f64,
    pub duration_seconds: u32,
    pub speed_kmh: f64,
    pub max_power: u16,
    pub avg_power: u16,
    pub normalized_power: u16,
    pub intensity_factor: f64,
}

impl Maxima {
    fn add(&mut self, activity: &Activity) {
        let metrics = activity.metrics.unwrap_or_default();
        self.distance_meters = self.distance_meters.max(activity.distance_meters);
        self.elevation_meters = self
            .elevation_meters
            .max(activity.elevation_meters.unwrap_or(0.0));
        self.tss = self.tss.max(metrics.tss);
        self.duration_seconds = self.duration_seconds.max(activity.duration_seconds);
        self.speed_kmh = self.speed_kmh.max(metrics.speed_kmh);
        self.max_power = self.max_power.max(activity.max_power);
        self.avg_power = self.avg_power.max(activity.avg_power);
        self.normalized_power = self.normalized_power.max(activity.normalized_power);
        self.intensity_factor = self.intensity_factor.max(metrics.intensity_factor);
    }
}

/// Week-level aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekSummary {
    /// Calendar days with at least one activity
    pub work_days: u32,
    pub totals: Totals,
    pub maxima: Maxima,
}

impl WeekSummary {
    /// Aggregate activities ordered by start time.
    pub fn from_activities(activities: &[&Activity]) -> Self {
        let mut summary = Self::default();
        let mut current_day: Option<NaiveDate> = None;

        for activity in activities {
            if current_day != Some(activity.date()) {
                summary.work_days += 1;
                current_day = Some(activity.date());
            }
            summary.totals.add(activity);
            summary.maxima.add(activity);
        }

        summary
    }

    /// Totals divided by work days; `None` when nothing was ridden.
    pub fn averages(&self) -> Option<Totals> {
        if self.work_days == 0 {
            return None;
        }
        let days = f64::from(self.work_days);
        Some(Totals {
            distance_meters: self.totals.distance_meters / days,
            elevation_meters: self.totals.elevation_meters / days,
            tss: self.totals.tss / days,
            duration_seconds: self.totals.duration_seconds / self.work_days,
        })
    }
}

/// Render activities from `week_start` onward.
///
/// `activities` must already carry metrics and load; earlier history is
/// ignored here but is what the fitness footer was computed from.
pub fn render_week(
    activities: &[Activity],
    week_start: NaiveDate,
    fitness: Option<Fitness>,
    painter: &Painter,
) -> String {
    let week: Vec<&Activity> = activities
        .iter()
        .filter(|a| a.date() >= week_start)
        .collect();

    if week.is_empty() {
        return "No activities this week\n".to_string();
    }

    let mut out = String::new();
    let separator = separator();

    let _ = writeln!(
        out,
        "{:<5}   {:<16}   {:<NAME_WIDTH$}   {:<5}   {:>8}   {:>9}   {:>8}   {:>10}   {:>4}   {:>4}   {:>4}   {:>4}   {:>4}   {:>4}   {:>6}",
        "ID", "Date", "Activity", "Start", "Distance", "Elevation", "Duration", "Speed", "Max", "Avg", "Norm", "VI", "IF", "TSS", "AeroDe"
    );
    let _ = writeln!(out, "{}", separator);

    let mut day = Totals::default();
    let mut current_day: Option<NaiveDate> = None;

    for activity in &week {
        let new_day = current_day != Some(activity.date());
        if new_day {
            if current_day.is_some() {
                out.push_str(&day_line(&day, painter));
                out.push('\n');
            }
            day = Totals::default();
            current_day = Some(activity.date());
        }

        out.push_str(&activity_line(activity, new_day, painter));
        day.add(activity);
    }
    out.push_str(&day_line(&day, painter));

    let summary = WeekSummary::from_activities(&week);
    let _ = writeln!(out, "{}", separator);
    out.push_str(&summary_lines(&summary, painter));

    if let Some(fitness) = fitness {
        out.push('\n');
        out.push_str(&super::fitness::fitness_lines(&fitness, painter));
    }

    out
}

fn separator() -> String {
    [5, 16, NAME_WIDTH, 5, 8, 9, 8, 10, 4, 4, 4, 4, 4, 4, 6]
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("   ")
}

fn activity_line(activity: &Activity, new_day: bool, painter: &Painter) -> String {
    let metrics = activity.metrics.unwrap_or_default();
    let date = if new_day {
        format_date(&activity.start_time)
    } else {
        String::new()
    };
    let name: String = activity.display_name().chars().take(NAME_WIDTH).collect();
    let elevation = activity
        .elevation_meters
        .map(format_elevation)
        .unwrap_or_default();

    format!(
        "{:<5}   {:<16}   {:<NAME_WIDTH$}   {:<5}   {:>8}   {:>9}   {:>8}   {:>10}   {:>4}   {:>4}   {:>4}   {:>4.2}   {:>4.2}   {:>4.0}   {}\n",
        activity.id.map(|id| id.to_string()).unwrap_or_default(),
        date,
        name,
        activity.start_time.format("%H:%M").to_string(),
        format_distance(activity.distance_meters),
        elevation,
        format_duration(activity.duration_seconds),
        format!("{:.2}km/h", metrics.speed_kmh),
        activity.max_power,
        activity.avg_power,
        activity.normalized_power,
        metrics.variability_index,
        metrics.intensity_factor,
        metrics.tss,
        format_decoupling(metrics.decoupling.as_ref(), 6, painter),
    )
}

/// Subtotal row aligned under distance, elevation, duration and TSS.
fn totals_columns(label: &str, totals: &Totals) -> String {
    format!(
        "{:>width$}   {:>8}   {:>9}   {:>8}   {:>10}   {:>4}   {:>4}   {:>4}   {:>4}   {:>4}   {:>4.0}",
        label,
        format_distance(totals.distance_meters),
        format_elevation(totals.elevation_meters),
        format_duration(totals.duration_seconds),
        "",
        "",
        "",
        "",
        "",
        "",
        totals.tss,
        width = 5 + 3 + 16 + 3 + NAME_WIDTH + 3 + 5,
    )
}

fn day_line(day: &Totals, painter: &Painter) -> String {
    format!("{}\n", painter.subtle(&totals_columns("", day)))
}

fn summary_lines(summary: &WeekSummary, painter: &Painter) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", painter.bold(&totals_columns("Totals for week", &summary.totals)));

    match summary.averages() {
        Some(avg) => {
            let _ = writeln!(out, "{}", painter.bold(&totals_columns("Averages per day", &avg)));
        }
        None => {
            let _ = writeln!(out, "{}", painter.bold("Averages per day: unavailable"));
        }
    }

    let max = &summary.maxima;
    let line = format!(
        "{:>width$}   {:>8}   {:>9}   {:>8}   {:>10}   {:>4}   {:>4}   {:>4}   {:>4}   {:>4.2}   {:>4.0}",
        "Maximums from individual activities",
        format_distance(max.distance_meters),
        format_elevation(max.elevation_meters),
        format_duration(max.duration_seconds),
        format!("{:.2}km/h", max.speed_kmh),
        max.max_power,
        max.avg_power,
        max.normalized_power,
        "",
        max.intensity_factor,
        max.tss,
        width = 5 + 3 + 16 + 3 + NAME_WIDTH + 3 + 5,
    );
    let _ = writeln!(out, "{}", painter.bold(&line));

    out
}
