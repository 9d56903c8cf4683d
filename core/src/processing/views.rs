use crate::math::StatsHelper;
use crate::sensor_interface::DetectionPoint;
use crate::settings::FilterParams;
use serde::{Deserialize, Serialize};

/// Range/RCS scatter data, ascending by range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeRcsView {
    pub ranges: Vec<f64>,
    pub rcs_dbsm: Vec<f64>,
}

impl RangeRcsView {
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Velocity statistics of one tick.
///
/// `NoData` means no point survived the velocity window. It is kept apart
/// from a genuine zero reading; [`VelocitySample::as_pair`] collapses it to
/// `(0, 0)` for plotting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum VelocitySample {
    #[default]
    NoData,
    Reading {
        /// Largest `|velocity|` among kept points.
        max_velocity_mag: f64,
        /// `|velocity|` of the kept point with the highest dBsm.
        velocity_at_max_rcs: f64,
    },
}

impl VelocitySample {
    pub fn as_pair(&self) -> (f64, f64) {
        match *self {
            VelocitySample::NoData => (0.0, 0.0),
            VelocitySample::Reading {
                max_velocity_mag,
                velocity_at_max_rcs,
            } => (max_velocity_mag, velocity_at_max_rcs),
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, VelocitySample::Reading { .. })
    }
}

/// Sorts by range, then keeps points strictly inside the range window.
pub fn range_rcs_view(filtered: &[DetectionPoint], params: &FilterParams) -> RangeRcsView {
    let mut sorted = filtered.to_vec();
    sorted.sort_by(|a, b| a.range.total_cmp(&b.range));

    let (ranges, rcs_dbsm): (Vec<f64>, Vec<f64>) = sorted
        .iter()
        .filter(|point| params.range_contains(point.range))
        .map(|point| (point.range, point.rcs_dbsm))
        .unzip();

    RangeRcsView { ranges, rcs_dbsm }
}

/// Max speed and speed of the strongest reflector among points strictly
/// inside the speed window.
///
/// The two values are independent and need not come from the same point.
/// When several points share the highest dBsm, the last one in input order
/// is taken.
pub fn velocity_trend_sample(filtered: &[DetectionPoint], params: &FilterParams) -> VelocitySample {
    let kept: Vec<&DetectionPoint> = filtered
        .iter()
        .filter(|point| params.speed_contains(point.speed()))
        .collect();

    let Some(max_velocity_mag) = StatsHelper::max_abs(kept.iter().map(|point| point.velocity))
    else {
        return VelocitySample::NoData;
    };
    let strongest = kept
        .iter()
        .max_by(|a, b| a.rcs_dbsm.total_cmp(&b.rcs_dbsm))
        .map(|point| point.speed())
        .unwrap_or_default();

    VelocitySample::Reading {
        max_velocity_mag,
        velocity_at_max_rcs: strongest,
    }
}
