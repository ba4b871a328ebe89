//! Peak rolling-window values ("best N seconds") for power and heart rate.
//!
//! Each activity carries two fixed-shape tables, one per series, holding the
//! best rolling average for every window in [`PeakWindow::ALL`].

use crate::metrics::smoothing::rolling_average;
use serde::{Deserialize, Serialize};

/// Window durations reported for every activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeakWindow {
    Sec5,
    Sec30,
    Sec60,
    Min5,
    Min10,
    Min20,
    Min30,
    Min60,
    Min90,
    Min120,
}

impl PeakWindow {
    /// Every window, shortest first.
    pub const ALL: [PeakWindow; 10] = [
        PeakWindow::Sec5,
        PeakWindow::Sec30,
        PeakWindow::Sec60,
        PeakWindow::Min5,
        PeakWindow::Min10,
        PeakWindow::Min20,
        PeakWindow::Min30,
        PeakWindow::Min60,
        PeakWindow::Min90,
        PeakWindow::Min120,
    ];

    /// Window length in seconds.
    pub fn seconds(self) -> usize {
        match self {
            PeakWindow::Sec5 => 5,
            PeakWindow::Sec30 => 30,
            PeakWindow::Sec60 => 60,
            PeakWindow::Min5 => 300,
            PeakWindow::Min10 => 600,
            PeakWindow::Min20 => 1200,
            PeakWindow::Min30 => 1800,
            PeakWindow::Min60 => 3600,
            PeakWindow::Min90 => 5400,
            PeakWindow::Min120 => 7200,
        }
    }

    /// Short column heading ("5s", "10m").
    pub fn label(self) -> &'static str {
        match self {
            PeakWindow::Sec5 => "5s",
            PeakWindow::Sec30 => "30s",
            PeakWindow::Sec60 => "60s",
            PeakWindow::Min5 => "5m",
            PeakWindow::Min10 => "10m",
            PeakWindow::Min20 => "20m",
            PeakWindow::Min30 => "30m",
            PeakWindow::Min60 => "60m",
            PeakWindow::Min90 => "90m",
            PeakWindow::Min120 => "120m",
        }
    }

    /// Long row heading ("5 sec", "10 min").
    pub fn description(self) -> &'static str {
        match self {
            PeakWindow::Sec5 => "5 sec",
            PeakWindow::Sec30 => "30 sec",
            PeakWindow::Sec60 => "60 sec",
            PeakWindow::Min5 => "5 min",
            PeakWindow::Min10 => "10 min",
            PeakWindow::Min20 => "20 min",
            PeakWindow::Min30 => "30 min",
            PeakWindow::Min60 => "60 min",
            PeakWindow::Min90 => "90 min",
            PeakWindow::Min120 => "120 min",
        }
    }

    /// Fragment used in storage column names (`peak_<key>_power`).
    pub fn column_key(self) -> &'static str {
        match self {
            PeakWindow::Sec5 => "5sec",
            PeakWindow::Sec30 => "30sec",
            PeakWindow::Sec60 => "60sec",
            PeakWindow::Min5 => "5min",
            PeakWindow::Min10 => "10min",
            PeakWindow::Min20 => "20min",
            PeakWindow::Min30 => "30min",
            PeakWindow::Min60 => "60min",
            PeakWindow::Min90 => "90min",
            PeakWindow::Min120 => "120min",
        }
    }
}

/// Best rolling average per window. `None` means the series was shorter
/// than the window; a stored `Some(0)` is a real (if unlikely) peak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakTable {
    pub peak_5sec: Option<u16>,
    pub peak_30sec: Option<u16>,
    pub peak_60sec: Option<u16>,
    pub peak_5min: Option<u16>,
    pub peak_10min: Option<u16>,
    pub peak_20min: Option<u16>,
    pub peak_30min: Option<u16>,
    pub peak_60min: Option<u16>,
    pub peak_90min: Option<u16>,
    pub peak_120min: Option<u16>,
}

impl PeakTable {
    /// Extract every peak from a one-sample-per-second series.
    pub fn extract(series: &[u16]) -> Self {
        let mut table = Self::default();
        for window in PeakWindow::ALL {
            *table.slot_mut(window) = peak(series, window.seconds());
        }
        table
    }

    /// Peak for one window.
    pub fn get(&self, window: PeakWindow) -> Option<u16> {
        match window {
            PeakWindow::Sec5 => self.peak_5sec,
            PeakWindow::Sec30 => self.peak_30sec,
            PeakWindow::Sec60 => self.peak_60sec,
            PeakWindow::Min5 => self.peak_5min,
            PeakWindow::Min10 => self.peak_10min,
            PeakWindow::Min20 => self.peak_20min,
            PeakWindow::Min30 => self.peak_30min,
            PeakWindow::Min60 => self.peak_60min,
            PeakWindow::Min90 => self.peak_90min,
            PeakWindow::Min120 => self.peak_120min,
        }
    }

    /// Set the peak for one window.
    pub fn set(&mut self, window: PeakWindow, value: Option<u16>) {
        *self.slot_mut(window) = value;
    }

    fn slot_mut(&mut self, window: PeakWindow) -> &mut Option<u16> {
        match window {
            PeakWindow::Sec5 => &mut self.peak_5sec,
            PeakWindow::Sec30 => &mut self.peak_30sec,
            PeakWindow::Sec60 => &mut self.peak_60sec,
            PeakWindow::Min5 => &mut self.peak_5min,
            PeakWindow::Min10 => &mut self.peak_10min,
            PeakWindow::Min20 => &mut self.peak_20min,
            PeakWindow::Min30 => &mut self.peak_30min,
            PeakWindow::Min60 => &mut self.peak_60min,
            PeakWindow::Min90 => &mut self.peak_90min,
            PeakWindow::Min120 => &mut self.peak_120min,
        }
    }

    /// All windows with their values, shortest first.
    pub fn iter(&self) -> impl Iterator<Item = (PeakWindow, Option<u16>)> + '_ {
        PeakWindow::ALL.into_iter().map(move |w| (w, self.get(w)))
    }

    /// True when no window produced a value.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, v)| v.is_none())
    }
}

/// Maximum rolling average for one window, `None` when the series is too short.
pub fn peak(series: &[u16], window_secs: usize) -> Option<u16> {
    rolling_average(series, window_secs).into_iter().max()
}
