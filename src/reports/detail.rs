//! Single-activity detail report.

use super::{format_date, format_decoupling, format_distance, format_duration, format_elevation, Painter};
use crate::metrics::analytics::PeakWindow;
use crate::recording::types::Activity;
use std::fmt::Write;

/// Render one activity, or a not-found line when `activity` is `None`.
///
/// Peak rows up to ten minutes are always shown; longer windows only when
/// the activity reached them on either series.
pub fn render_detail(id: i64, activity: Option<&Activity>, painter: &Painter) -> String {
    let Some(activity) = activity else {
        return format!("Cannot find activity #{}\n", id);
    };

    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        painter.bold(&format!("Activity #{}: {}", id, activity.display_name()))
    );
    out.push('\n');

    let _ = writeln!(out, "Date ............ {}", format_date(&activity.start_time));
    let _ = writeln!(out, "Start ........... {}", activity.start_time.format("%H:%M:%S"));
    let _ = writeln!(out, "Duration ........ {}", format_duration(activity.duration_seconds));
    let _ = writeln!(out, "End ............. {}", activity.end_time.format("%H:%M:%S"));
    out.push('\n');

    let _ = writeln!(out, "Distance ........ {}", format_distance(activity.distance_meters));
    if let Some(metrics) = &activity.metrics {
        let _ = writeln!(out, "Speed ........... {:.2}km/h", metrics.speed_kmh);
    }
    if let Some(elevation) = activity.elevation_meters {
        let _ = writeln!(out, "Elevation ....... {}", format_elevation(elevation));
    }
    out.push('\n');

    let _ = writeln!(out, "Power (avg/max) . {}W / {}W", activity.avg_power, activity.max_power);
    let _ = writeln!(out, "Normalized power  {}W", activity.normalized_power);
    let _ = writeln!(
        out,
        "HR (avg/max) .... {}bpm / {}bpm",
        activity.avg_heart_rate, activity.max_heart_rate
    );

    if let Some(metrics) = &activity.metrics {
        out.push('\n');
        let _ = writeln!(out, "VI .............. {:.2}", metrics.variability_index);
        match metrics.ftp {
            Some(ftp) => {
                let _ = writeln!(out, "FTP ............. {}W", ftp);
                let _ = writeln!(out, "IF .............. {:.2}", metrics.intensity_factor);
                let _ = writeln!(out, "TSS ............. {:.0}", metrics.tss);
            }
            None => {
                let _ = writeln!(out, "FTP ............. unknown");
            }
        }
        if metrics.decoupling.is_some() {
            let _ = writeln!(
                out,
                "Decoupling ...... {}",
                format_decoupling(metrics.decoupling.as_ref(), 0, painter)
            );
        }
        if let Some(efficiency) = metrics.aerobic_efficiency {
            let _ = writeln!(out, "Efficiency ...... {:.2}", efficiency);
        }
    }

    out.push('\n');
    let _ = writeln!(out, "{}", painter.bold(&format!("{:<8}   {:>9}   {:>8}", "Peak", "Power (W)", "HR (bpm)")));
    let _ = writeln!(out, "{}", ["─".repeat(8), "─".repeat(9), "─".repeat(8)].join("   "));

    for window in PeakWindow::ALL {
        let power = activity.power_peaks.get(window);
        let heart_rate = activity.hr_peaks.get(window);
        if window.seconds() > PeakWindow::Min10.seconds() && power.is_none() && heart_rate.is_none() {
            continue;
        }
        let _ = writeln!(
            out,
            "{:<8}   {:>9}   {:>8}",
            window.description(),
            power.map(|v| v.to_string()).unwrap_or_default(),
            heart_rate.map(|v| v.to_string()).unwrap_or_default(),
        );
    }

    out
}
