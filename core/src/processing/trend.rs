use crate::processing::VelocitySample;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TREND_CAPACITY: usize = 50;

/// Which of the two trend series a display is plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSeries {
    #[default]
    MaxVelocity,
    VelocityAtMaxRcs,
}

/// Fixed-capacity rolling window of velocity samples.
///
/// The window starts full of `NoData` slots, so both series always have
/// exactly `capacity` entries. Each push overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct VelocityTrendBuffer {
    slots: Vec<VelocitySample>,
    head: usize,
}

impl VelocityTrendBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![VelocitySample::NoData; capacity.max(1)],
            head: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn push(&mut self, sample: VelocitySample) {
        self.slots[self.head] = sample;
        self.head = (self.head + 1) % self.slots.len();
    }

    /// Samples from oldest to newest.
    pub fn samples(&self) -> impl Iterator<Item = &VelocitySample> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// One series, oldest to newest, with `NoData` plotted as zero.
    pub fn series(&self, series: TrendSeries) -> Vec<f64> {
        self.samples()
            .map(|sample| {
                let (max_velocity, at_max_rcs) = sample.as_pair();
                match series {
                    TrendSeries::MaxVelocity => max_velocity,
                    TrendSeries::VelocityAtMaxRcs => at_max_rcs,
                }
            })
            .collect()
    }
}

impl Default for VelocityTrendBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TREND_CAPACITY)
    }
}
