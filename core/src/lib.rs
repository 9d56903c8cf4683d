//! Frame-to-metrics core for the radar detection display.
//!
//! Each tick pulls one frame of parallel per-point arrays from a sensor
//! source, derives range, bearing and dBsm per point, applies the bearing and
//! motion filter, and produces the range/RCS scatter view and the velocity
//! trend sample consumed by a renderer.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod sensor_interface;
pub mod settings;
pub mod telemetry;

pub use prelude::{DetectionError, FilterError, SourceUnavailable};
pub use processing::{FrameProcessor, RangeRcsView, VelocitySample};
pub use sensor_interface::{DetectionPoint, FrameSource, RawFrame};
pub use settings::FilterParams;
