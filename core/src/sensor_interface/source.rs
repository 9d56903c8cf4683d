use crate::prelude::{SourceResult, SourceUnavailable};
use crate::sensor_interface::RawFrame;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Producer of completed radar frames.
///
/// `next_frame` blocks until a frame is available but never longer than
/// `timeout`; a stalled sensor must surface as [`SourceUnavailable::Timeout`].
pub trait FrameSource {
    fn next_frame(&mut self, timeout: Duration) -> SourceResult<RawFrame>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self, timeout: Duration) -> SourceResult<RawFrame> {
        (**self).next_frame(timeout)
    }
}

/// Frame source fed by another thread through a std channel.
pub struct ChannelSource {
    receiver: Receiver<RawFrame>,
}

impl ChannelSource {
    pub fn new(receiver: Receiver<RawFrame>) -> Self {
        Self { receiver }
    }
}

impl FrameSource for ChannelSource {
    fn next_frame(&mut self, timeout: Duration) -> SourceResult<RawFrame> {
        self.receiver
            .recv_timeout(timeout)
            .map_err(|err| match err {
                RecvTimeoutError::Timeout => SourceUnavailable::Timeout(timeout),
                RecvTimeoutError::Disconnected => SourceUnavailable::Disconnected,
            })
    }
}
