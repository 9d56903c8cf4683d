pub mod detections;
pub mod filter;
pub mod mounting;
pub mod processor;
pub mod trend;
pub mod views;

pub use detections::{compute_detections, DetectionBatch};
pub use filter::filter_bearing_and_motion;
pub use mounting::SensorMounting;
pub use processor::{EmptyViewPolicy, FilteredFrame, FrameProcessor};
pub use trend::{TrendSeries, VelocityTrendBuffer};
pub use views::{range_rcs_view, velocity_trend_sample, RangeRcsView, VelocitySample};
