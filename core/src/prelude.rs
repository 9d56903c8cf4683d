use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use crate::processing::{
    DetectionBatch, EmptyViewPolicy, FilteredFrame, FrameProcessor, RangeRcsView, SensorMounting,
    VelocitySample, VelocityTrendBuffer,
};
pub use crate::sensor_interface::{DetectionPoint, FrameSource, RawFrame};
pub use crate::settings::{FilterField, FilterHandle, FilterLimits, FilterParams, FilterStore};

/// Reason a single detection was dropped from a frame.
///
/// These never abort the frame; the offending point is skipped and the rest
/// of the frame is processed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetectionError {
    #[error("point {index}: bearing undefined for x == 0")]
    DegenerateGeometry { index: usize },
    #[error("point {index}: rcs {rcs} has no dBsm value")]
    InvalidRcs { index: usize, rcs: f64 },
    #[error("point {index}: sensor {sensor} has no declared mounting offset")]
    UnmountedSensor { index: usize, sensor: u32 },
}

impl DetectionError {
    pub fn index(&self) -> usize {
        match self {
            DetectionError::DegenerateGeometry { index }
            | DetectionError::InvalidRcs { index, .. }
            | DetectionError::UnmountedSensor { index, .. } => *index,
        }
    }
}

/// Frame fetch failure. Surfaces to the caller as a failed tick.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SourceUnavailable {
    #[error("no frame within {0:?}")]
    Timeout(Duration),
    #[error("frame source disconnected")]
    Disconnected,
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

/// Rejected configuration change.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfBounds {
        field: crate::settings::FilterField,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{0} is not a finite number")]
    NotFinite(crate::settings::FilterField),
}

pub type SourceResult<T> = Result<T, SourceUnavailable>;
pub type FilterResult<T> = Result<T, FilterError>;
