use crate::workflow::timer::TimerKind;
use radarcore::prelude::{RangeRcsView, VelocitySample};
use radarcore::processing::TrendSeries;
use radarcore::telemetry::MetricsSnapshot;
use serde::Serialize;

/// Everything a display needs to draw after a tick.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DisplayModel {
    pub range_rcs: RangeRcsView,
    pub trend_series: TrendSeries,
    pub trend: Vec<f64>,
    pub latest_velocity: VelocitySample,
    /// Set while range/RCS fetches fail and the plot shows old data.
    pub range_stale: Option<String>,
    /// Set while velocity fetches fail and the trend is not advancing.
    pub velocity_stale: Option<String>,
    pub metrics: MetricsSnapshot,
}

impl DisplayModel {
    pub fn new(trend_series: TrendSeries) -> Self {
        Self {
            trend_series,
            ..Default::default()
        }
    }

    /// Staleness of the view refreshed by `kind`.
    pub fn stale_for(&self, kind: TimerKind) -> Option<&str> {
        match kind {
            TimerKind::RangeRcs => self.range_stale.as_deref(),
            TimerKind::Velocity => self.velocity_stale.as_deref(),
            TimerKind::Density => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.range_stale.is_some() || self.velocity_stale.is_some()
    }
}
