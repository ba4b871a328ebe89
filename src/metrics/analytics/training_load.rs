//! Training Load calculations (CTL/ATL/TSB).
//!
//! CTL and ATL are trailing sums of TSS over the previous 42 and 7 calendar
//! days, divided by the nominal window length. Rest days count toward the
//! denominator, so a short history under-reads; that matches how the numbers
//! have always been reported and is left as is.
//!
//! Several activities on one calendar day share the load computed for the
//! first of them: the value describes the day, not the activity.

use super::error::{AnalyticsError, AnalyticsResult};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Chronic Training Load window in days.
pub const CTL_DAYS: i64 = 42;

/// Acute Training Load window in days.
pub const ATL_DAYS: i64 = 7;

/// Fitness snapshot: CTL, ATL and TSB = CTL - ATL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fitness {
    /// Chronic Training Load (42-day TSS average)
    pub ctl: i32,
    /// Acute Training Load (7-day TSS average)
    pub atl: i32,
    /// Training Stress Balance (CTL - ATL)
    pub tsb: i32,
}

impl Fitness {
    pub fn new(ctl: i32, atl: i32) -> Self {
        Self {
            ctl,
            atl,
            tsb: ctl - atl,
        }
    }
}

/// Load attached to one activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLoad {
    /// First activity recorded on its calendar day
    pub first_for_day: bool,
    /// Chronic Training Load
    pub ctl: i32,
    /// Acute Training Load
    pub atl: i32,
}

impl DailyLoad {
    pub fn fitness(&self) -> Fitness {
        Fitness::new(self.ctl, self.atl)
    }
}

/// One activity's contribution: its calendar date and TSS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadEntry {
    pub date: NaiveDate,
    pub tss: f64,
}

/// Training load calculator.
pub struct TrainingLoadCalculator {
    /// ATL window (default: 7 days).
    atl_days: i64,
    /// CTL window (default: 42 days).
    ctl_days: i64,
}

impl TrainingLoadCalculator {
    /// Create with default windows (7/42 day).
    pub fn new() -> Self {
        Self {
            atl_days: ATL_DAYS,
            ctl_days: CTL_DAYS,
        }
    }

    /// Create with custom windows.
    pub fn with_windows(atl_days: i64, ctl_days: i64) -> Self {
        Self { atl_days, ctl_days }
    }

    /// Compute the load for each entry. Entries must be in ascending date order.
    pub fn calculate(&self, entries: &[LoadEntry]) -> AnalyticsResult<Vec<DailyLoad>> {
        if self.atl_days <= 0 || self.ctl_days <= 0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "Load windows must be positive (ATL {}, CTL {})",
                self.atl_days, self.ctl_days
            )));
        }

        if let Some(pos) = entries.windows(2).position(|w| w[1].date < w[0].date) {
            return Err(AnalyticsError::InvalidInput(format!(
                "Activities out of order at position {}: {} after {}",
                pos + 1,
                entries[pos + 1].date,
                entries[pos].date
            )));
        }

        let mut loads: Vec<DailyLoad> = Vec::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            let first_for_day = i == 0 || entries[i - 1].date != entry.date;

            let load = if first_for_day {
                self.trailing_load(&entries[..i], entry.date)
            } else {
                loads[i - 1]
            };

            loads.push(DailyLoad {
                first_for_day,
                ..load
            });
        }

        Ok(loads)
    }

    /// Sum TSS of `earlier` entries that fall inside each window ending before `day`.
    fn trailing_load(&self, earlier: &[LoadEntry], day: NaiveDate) -> DailyLoad {
        let ctl_start = day - Duration::days(self.ctl_days);
        let atl_start = day - Duration::days(self.atl_days);

        let mut ctl_sum = 0.0;
        let mut atl_sum = 0.0;

        for entry in earlier.iter().rev() {
            if entry.date < ctl_start {
                break;
            }
            ctl_sum += entry.tss;
            if entry.date >= atl_start {
                atl_sum += entry.tss;
            }
        }

        DailyLoad {
            first_for_day: true,
            ctl: (ctl_sum / self.ctl_days as f64).floor() as i32,
            atl: (atl_sum / self.atl_days as f64).floor() as i32,
        }
    }

    /// Snapshot for "today": the most recent entry's load.
    pub fn current_fitness(loads: &[DailyLoad]) -> Option<Fitness> {
        loads.last().map(DailyLoad::fitness)
    }
}

impl Default for TrainingLoadCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(day: NaiveDate, tss: f64) -> LoadEntry {
        LoadEntry { date: day, tss }
    }

    #[test]
    fn test_same_day_activities_share_load() {
        let calc = TrainingLoadCalculator::new();
        let d1 = date(2024, 3, 1);
        let d2 = date(2024, 3, 2);

        let loads = calc
            .calculate(&[
                entry(d1, 84.0),
                entry(d2, 50.0),
                entry(d2, 70.0),
                entry(d2, 30.0),
            ])
            .unwrap();

        assert!(loads[0].first_for_day);
        assert!(loads[1].first_for_day);
        assert!(!loads[2].first_for_day);
        assert!(!loads[3].first_for_day);

        // 84 / 42 = 2, 84 / 7 = 12
        assert_eq!((loads[1].ctl, loads[1].atl), (2, 12));
        assert_eq!(loads[2].ctl, loads[1].ctl);
        assert_eq!(loads[3].atl, loads[1].atl);
    }

    #[test]
    fn test_first_activity_has_no_load() {
        let calc = TrainingLoadCalculator::new();
        let loads = calc.calculate(&[entry(date(2024, 1, 1), 100.0)]).unwrap();
        assert_eq!(loads[0], DailyLoad { first_for_day: true, ctl: 0, atl: 0 });
    }

    #[test]
    fn test_window_boundaries() {
        let calc = TrainingLoadCalculator::new();
        let today = date(2024, 6, 30);

        let loads = calc
            .calculate(&[
                entry(today - Duration::days(43), 420.0), // outside both
                entry(today - Duration::days(42), 42.0),  // CTL only
                entry(today - Duration::days(8), 84.0),   // CTL only
                entry(today - Duration::days(7), 70.0),   // CTL and ATL
                entry(today, 10.0),
            ])
            .unwrap();

        let last = loads[4];
        // (42 + 84 + 70) / 42 = 4.67 -> 4 ; 70 / 7 = 10
        assert_eq!(last.ctl, 4);
        assert_eq!(last.atl, 10);
    }

    #[test]
    fn test_rest_days_count_toward_denominator() {
        let calc = TrainingLoadCalculator::new();
        let start = date(2024, 1, 1);

        // One 70 TSS ride every other day for two weeks.
        let mut entries: Vec<LoadEntry> = (0..14)
            .step_by(2)
            .map(|d| entry(start + Duration::days(d), 70.0))
            .collect();
        entries.push(entry(start + Duration::days(14), 0.0));

        let loads = calc.calculate(&entries).unwrap();
        let last = loads.last().unwrap();

        // ATL window holds days 7..13: rides on 8, 10, 12 = 210 / 7 = 30
        assert_eq!(last.atl, 30);
        // CTL window holds all 7 rides = 490 / 42 = 11.67 -> 11
        assert_eq!(last.ctl, 11);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let calc = TrainingLoadCalculator::new();
        let result = calc.calculate(&[entry(date(2024, 1, 2), 10.0), entry(date(2024, 1, 1), 10.0)]);
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_current_fitness_tsb() {
        let loads = [
            DailyLoad { first_for_day: true, ctl: 50, atl: 40 },
            DailyLoad { first_for_day: true, ctl: 55, atl: 70 },
        ];
        let fitness = TrainingLoadCalculator::current_fitness(&loads).unwrap();
        assert_eq!(fitness, Fitness { ctl: 55, atl: 70, tsb: -15 });
        assert!(TrainingLoadCalculator::current_fitness(&[]).is_none());
    }
}
