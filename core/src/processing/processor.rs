use crate::prelude::{DetectionError, SourceResult};
use crate::processing::{
    compute_detections, filter_bearing_and_motion, range_rcs_view, velocity_trend_sample,
    RangeRcsView, SensorMounting, VelocitySample, VelocityTrendBuffer,
};
use crate::sensor_interface::{DetectionPoint, FrameSource};
use crate::settings::FilterParams;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(500);

/// What the range/RCS display shows when a frame leaves no points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyViewPolicy {
    /// Show an empty plot.
    #[default]
    Clear,
    /// Keep showing the last non-empty view.
    RetainLastGood,
}

/// A frame after detection and bearing/motion filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredFrame {
    pub points: Vec<DetectionPoint>,
    pub skipped: Vec<DetectionError>,
    pub raw_len: usize,
}

/// Pulls frames from a [`FrameSource`] and turns them into display views.
///
/// Every tick method takes its [`FilterParams`] by value. Callers pass a
/// fresh snapshot per tick and the processor never re-reads shared settings.
pub struct FrameProcessor<S> {
    source: S,
    mounting: SensorMounting,
    fetch_timeout: Duration,
    empty_policy: EmptyViewPolicy,
    displayed: RangeRcsView,
    last_good: Option<RangeRcsView>,
    trend: VelocityTrendBuffer,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl<S: FrameSource> FrameProcessor<S> {
    pub fn new(source: S, mounting: SensorMounting) -> Self {
        Self {
            source,
            mounting,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            empty_policy: EmptyViewPolicy::default(),
            displayed: RangeRcsView::default(),
            last_good: None,
            trend: VelocityTrendBuffer::default(),
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_empty_policy(mut self, policy: EmptyViewPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    pub fn with_trend_capacity(mut self, capacity: usize) -> Self {
        self.trend = VelocityTrendBuffer::with_capacity(capacity);
        self
    }

    /// Fetches the next frame and applies detection and bearing/motion
    /// filtering. Malformed points are skipped. A failed fetch fails the
    /// whole call.
    pub fn fetch_and_filter(&mut self, params: FilterParams) -> SourceResult<FilteredFrame> {
        let frame = match self.source.next_frame(self.fetch_timeout) {
            Ok(frame) => frame,
            Err(err) => {
                self.logger.source_failure(&err);
                self.metrics.record_source_failure();
                return Err(err);
            }
        };

        let batch = compute_detections(&frame, &self.mounting);
        for error in &batch.skipped {
            self.logger.skipped(error);
        }
        self.metrics.record_frame(batch.skipped.len());

        let points = filter_bearing_and_motion(&batch.points, &params);
        Ok(FilteredFrame {
            points,
            skipped: batch.skipped,
            raw_len: frame.len(),
        })
    }

    /// Range/RCS refresh. On a fetch failure the displayed view is left as
    /// it was and the error is returned.
    pub fn range_rcs_tick(&mut self, params: FilterParams) -> SourceResult<RangeRcsView> {
        let filtered = self.fetch_and_filter(params)?;
        let view = range_rcs_view(&filtered.points, &params);

        if view.is_empty() {
            self.metrics.record_empty_view();
            self.displayed = match (self.empty_policy, &self.last_good) {
                (EmptyViewPolicy::RetainLastGood, Some(last)) => last.clone(),
                _ => RangeRcsView::default(),
            };
        } else {
            self.last_good = Some(view.clone());
            self.displayed = view;
        }

        self.logger.record(&format!(
            "range/rcs tick: {} raw, {} kept, {} plotted",
            filtered.raw_len,
            filtered.points.len(),
            self.displayed.len()
        ));
        Ok(self.displayed.clone())
    }

    /// Velocity-trend refresh. The sample is appended to the trend window; a
    /// failed fetch leaves the window untouched.
    pub fn velocity_tick(&mut self, params: FilterParams) -> SourceResult<VelocitySample> {
        let filtered = self.fetch_and_filter(params)?;
        let sample = velocity_trend_sample(&filtered.points, &params);
        self.trend.push(sample);
        Ok(sample)
    }

    /// View the display should currently show.
    pub fn displayed_range_view(&self) -> &RangeRcsView {
        &self.displayed
    }

    pub fn last_good_range_view(&self) -> Option<&RangeRcsView> {
        self.last_good.as_ref()
    }

    pub fn trend(&self) -> &VelocityTrendBuffer {
        &self.trend
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::SourceUnavailable;
    use crate::sensor_interface::frame::RawPoint;
    use crate::sensor_interface::RawFrame;
    use crate::settings::{FilterField, FilterStore};
    use std::collections::VecDeque;

    /// Replays queued fetch results, then reports a timeout.
    struct ScriptedSource {
        script: VecDeque<SourceResult<RawFrame>>,
    }

    impl ScriptedSource {
        fn new<I>(script: I) -> Self
        where
            I: IntoIterator<Item = SourceResult<RawFrame>>,
        {
            Self {
                script: script.into_iter().collect(),
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self, timeout: Duration) -> SourceResult<RawFrame> {
            self.script
                .pop_front()
                .unwrap_or(Err(SourceUnavailable::Timeout(timeout)))
        }
    }

    fn raw(x: f64, y: f64, rcs: f64, velocity: f64, sensor_index: u32) -> RawPoint {
        RawPoint {
            x,
            y,
            rcs,
            snr: 10.0,
            velocity,
            sensor_index,
        }
    }

    /// Sensor 1 points that land on 0 degrees once the -30 offset is applied.
    fn frame_at_ranges(ranges: &[f64]) -> RawFrame {
        let angle = 30f64.to_radians();
        RawFrame::from_points(
            ranges
                .iter()
                .map(|&r| raw(r * angle.cos(), r * angle.sin(), 1.0, 2.0, 1)),
        )
    }

    #[test]
    fn fetch_and_filter_skips_bad_points_and_clutter() {
        let frame = RawFrame::from_points([
            raw(3.0, 4.0, 1.0, 2.0, 0),
            raw(0.0, 5.0, 2.0, -3.0, 1),
            raw(4.0, 0.0, 1.0, 0.0, 1),
            raw(4.0, 0.0, -1.0, 1.0, 1),
        ]);
        let wide = FilterParams {
            min_bearing: -90.0,
            max_bearing: 90.0,
            ..Default::default()
        };
        let mut processor =
            FrameProcessor::new(ScriptedSource::new([Ok(frame)]), SensorMounting::two_sensor());

        let filtered = processor.fetch_and_filter(wide).unwrap();
        assert_eq!(filtered.raw_len, 4);
        assert_eq!(filtered.points.len(), 1);
        assert_eq!(filtered.points[0].range, 5.0);
        assert_eq!(filtered.skipped.len(), 2);
        assert_eq!(processor.metrics().points_skipped, 2);
    }

    #[test]
    fn empty_frame_yields_empty_views() {
        let mut processor = FrameProcessor::new(
            ScriptedSource::new([Ok(RawFrame::empty()), Ok(RawFrame::empty())]),
            SensorMounting::two_sensor(),
        );
        let params = FilterParams::default();
        assert!(processor.range_rcs_tick(params).unwrap().is_empty());
        assert_eq!(processor.velocity_tick(params).unwrap(), VelocitySample::NoData);
    }

    #[test]
    fn source_failure_keeps_last_good_view() {
        let mut processor = FrameProcessor::new(
            ScriptedSource::new([
                Ok(frame_at_ranges(&[3.0, 2.0])),
                Err(SourceUnavailable::Disconnected),
            ]),
            SensorMounting::two_sensor(),
        );
        let params = FilterParams::default();

        let good = processor.range_rcs_tick(params).unwrap();
        assert_eq!(good.len(), 2);
        assert!(good.ranges[0] < good.ranges[1]);

        let err = processor.range_rcs_tick(params).unwrap_err();
        assert_eq!(err, SourceUnavailable::Disconnected);
        assert_eq!(processor.displayed_range_view(), &good);
        assert_eq!(processor.last_good_range_view(), Some(&good));
        assert_eq!(processor.metrics().source_failures, 1);

        let timeout = processor.range_rcs_tick(params).unwrap_err();
        assert_eq!(timeout, SourceUnavailable::Timeout(DEFAULT_FETCH_TIMEOUT));
        assert_eq!(processor.displayed_range_view(), &good);
    }

    #[test]
    fn empty_tick_clears_by_default() {
        let mut processor = FrameProcessor::new(
            ScriptedSource::new([Ok(frame_at_ranges(&[3.0])), Ok(frame_at_ranges(&[12.0]))]),
            SensorMounting::two_sensor(),
        );
        let params = FilterParams::default();
        assert_eq!(processor.range_rcs_tick(params).unwrap().len(), 1);
        assert!(processor.range_rcs_tick(params).unwrap().is_empty());
        assert!(processor.displayed_range_view().is_empty());
        assert!(processor.last_good_range_view().is_some());
        assert_eq!(processor.metrics().empty_views, 1);
    }

    #[test]
    fn empty_tick_can_retain_last_good() {
        let mut processor = FrameProcessor::new(
            ScriptedSource::new([Ok(frame_at_ranges(&[3.0])), Ok(frame_at_ranges(&[12.0]))]),
            SensorMounting::two_sensor(),
        )
        .with_empty_policy(EmptyViewPolicy::RetainLastGood);
        let params = FilterParams::default();
        let first = processor.range_rcs_tick(params).unwrap();
        let second = processor.range_rcs_tick(params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn velocity_tick_feeds_trend_window() {
        let frame = RawFrame::from_points([
            raw(2.0, 0.0, 10f64.powf(0.5), 3.0, 1),
            raw(3.0, 0.0, 10f64.powf(0.2), -7.0, 1),
        ]);
        let mut processor = FrameProcessor::new(
            ScriptedSource::new([Ok(frame), Err(SourceUnavailable::Disconnected)]),
            SensorMounting::declared([(1, 0.0)]),
        )
        .with_trend_capacity(3);
        let params = FilterParams::default();

        let sample = processor.velocity_tick(params).unwrap();
        assert_eq!(sample.as_pair(), (7.0, 3.0));
        assert!(processor.velocity_tick(params).is_err());
        assert_eq!(
            processor.trend().series(crate::processing::TrendSeries::MaxVelocity),
            vec![0.0, 0.0, 7.0]
        );
    }

    #[test]
    fn tick_uses_snapshot_taken_at_entry() {
        let store = FilterStore::default();
        let mut processor = FrameProcessor::new(
            ScriptedSource::new([Ok(frame_at_ranges(&[3.0, 6.0]))]),
            SensorMounting::two_sensor(),
        );
        let snapshot = store.snapshot();
        store.set(FilterField::MaxRange, 4.0).unwrap();
        let view = processor.range_rcs_tick(snapshot).unwrap();
        assert_eq!(view.len(), 2);
    }
}
