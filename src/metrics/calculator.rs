//! Per-activity derived metrics and the batch pass that attaches them.
//!
//! Everything here is a pure function of the persisted activity fields and
//! the athlete profile in effect, so it is recomputed on every load.

use crate::metrics::analytics::{
    AerobicDecoupling, AnalyticsResult, DailyLoad, Fitness, LoadEntry, TrainingLoadCalculator,
    DECOUPLING_MIN_DISTANCE_METERS,
};
use crate::recording::types::Activity;
use crate::storage::profile::{AthleteProfile, AthleteProfileEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derived metrics for one activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// (NP - average) / NP, as a ratio
    pub variability_index: f64,
    /// FTP in effect on the activity date
    pub ftp: Option<u16>,
    /// NP / FTP, 0 when FTP is unknown
    pub intensity_factor: f64,
    /// Training Stress Score, 0 when FTP is unknown
    pub tss: f64,
    /// Distance over moving time in km/h
    pub speed_kmh: f64,
    /// Pw:HR drift, only for rides of at least 10 km
    pub decoupling: Option<AerobicDecoupling>,
    /// NP / average heart rate, alongside decoupling
    pub aerobic_efficiency: Option<f64>,
}

impl ActivityMetrics {
    /// Compute derived metrics given the profile entry in effect (if any).
    pub fn compute(
        activity: &Activity,
        profile: Option<&AthleteProfileEntry>,
    ) -> AnalyticsResult<Self> {
        let np = f64::from(activity.normalized_power);
        let avg_power = f64::from(activity.avg_power);

        let variability_index = if np > 0.0 { (np - avg_power) / np } else { 0.0 };

        let ftp = profile.map(|p| p.ftp).filter(|&f| f > 0);
        let (intensity_factor, tss) = match ftp {
            Some(ftp) => {
                let ftp = f64::from(ftp);
                let intensity_factor = np / ftp;
                let tss = f64::from(activity.duration_seconds) * np * intensity_factor / (ftp * 36.0);
                (intensity_factor, tss)
            }
            None => (0.0, 0.0),
        };

        let speed_kmh = if activity.moving_seconds > 0 {
            activity.distance_meters / f64::from(activity.moving_seconds) * 3.6
        } else {
            0.0
        };

        let decoupling = if activity.distance_meters >= DECOUPLING_MIN_DISTANCE_METERS {
            AerobicDecoupling::calculate(&activity.power, &activity.heart_rate)?
        } else {
            None
        };

        let aerobic_efficiency = decoupling
            .filter(|_| activity.avg_heart_rate > 0)
            .map(|_| np / f64::from(activity.avg_heart_rate));

        Ok(Self {
            variability_index,
            ftp,
            intensity_factor,
            tss,
            speed_kmh,
            decoupling,
            aerobic_efficiency,
        })
    }
}

/// Attaches derived metrics and training load to loaded activities.
pub struct MetricsCalculator<'a> {
    profile: &'a AthleteProfile,
    load: TrainingLoadCalculator,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(profile: &'a AthleteProfile) -> Self {
        Self {
            profile,
            load: TrainingLoadCalculator::new(),
        }
    }

    /// Metrics for a single activity.
    pub fn metrics_for(&self, activity: &Activity) -> AnalyticsResult<ActivityMetrics> {
        ActivityMetrics::compute(activity, self.profile.resolve_at(activity.start_time))
    }

    /// Fill `metrics` and `load` on every activity; returns today's fitness.
    ///
    /// `activities` must be ordered by start time and should reach back at
    /// least 42 days before the first activity that will be reported.
    pub fn process(&self, activities: &mut [Activity]) -> AnalyticsResult<Option<Fitness>> {
        for activity in activities.iter_mut() {
            activity.metrics = Some(self.metrics_for(activity)?);
        }

        let entries: Vec<LoadEntry> = activities
            .iter()
            .map(|a| LoadEntry {
                date: a.date(),
                tss: a.metrics.map(|m| m.tss).unwrap_or(0.0),
            })
            .collect();

        let loads: Vec<DailyLoad> = self.load.calculate(&entries)?;
        for (activity, load) in activities.iter_mut().zip(&loads) {
            activity.load = *load;
        }

        debug!("Computed metrics for {} activities", activities.len());

        Ok(TrainingLoadCalculator::current_fitness(&loads))
    }
}
