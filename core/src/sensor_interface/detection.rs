use serde::{Deserialize, Serialize};

/// Display-ready metrics derived from one raw point of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionPoint {
    pub x: f64,
    pub y: f64,
    /// Slant range in meters.
    pub range: f64,
    /// Sensor-relative bearing in degrees, mounting offset applied.
    pub bearing_deg: f64,
    pub snr: f64,
    pub rcs_dbsm: f64,
    /// Signed radial velocity in m/s.
    pub velocity: f64,
    pub sensor_index: u32,
}

impl DetectionPoint {
    pub fn speed(&self) -> f64 {
        self.velocity.abs()
    }

    pub fn is_stationary(&self) -> bool {
        self.velocity == 0.0
    }
}
