use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-sensor bearing offset in degrees, keyed by sensor index.
///
/// Sensors missing from `offsets` use `fallback`. Without a fallback they
/// have no bearing and their points are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorMounting {
    pub offsets: BTreeMap<u32, f64>,
    #[serde(default)]
    pub fallback: Option<f64>,
}

impl SensorMounting {
    /// Sensor 0 mounted at +30 degrees, every other sensor at -30 degrees.
    pub fn two_sensor() -> Self {
        Self {
            offsets: BTreeMap::from([(0, 30.0)]),
            fallback: Some(-30.0),
        }
    }

    /// Table of explicitly declared sensors only.
    pub fn declared<I>(offsets: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        Self {
            offsets: offsets.into_iter().collect(),
            fallback: None,
        }
    }

    pub fn offset_for(&self, sensor_index: u32) -> Option<f64> {
        self.offsets.get(&sensor_index).copied().or(self.fallback)
    }
}

impl Default for SensorMounting {
    fn default() -> Self {
        Self::two_sensor()
    }
}
