pub mod detection;
pub mod frame;
pub mod source;

pub use detection::DetectionPoint;
pub use frame::{RawFrame, RawPoint};
pub use source::{ChannelSource, FrameSource};
