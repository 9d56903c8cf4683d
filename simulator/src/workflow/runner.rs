use crate::display::model::DisplayModel;
use crate::display::renderer::Renderer;
use crate::workflow::config::{DisplayConfig, TimerConfig};
use crate::workflow::timer::{TickTimer, TimerKind};
use anyhow::Context;
use log::{info, trace, warn};
use radarcore::prelude::{FilterHandle, FilterParams, FilterStore, FrameProcessor, FrameSource};
use radarcore::processing::TrendSeries;
use radarcore::telemetry::MetricsSnapshot;
use tokio::signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: usize,
    pub metrics: MetricsSnapshot,
}

/// Drives the processor from the refresh timers and hands every update to a
/// renderer.
///
/// Fetches run inline on the runtime thread. A source may block, but only
/// for the configured fetch timeout, which bounds how late the other timers
/// and Ctrl+C are served.
pub struct Runner<S, R> {
    processor: FrameProcessor<S>,
    store: FilterStore,
    filter_watch: FilterHandle,
    renderer: R,
    model: DisplayModel,
    timers: TimerConfig,
}

impl<S: FrameSource, R: Renderer> Runner<S, R> {
    pub fn new(config: &DisplayConfig, source: S, renderer: R, trend_series: TrendSeries) -> Self {
        let processor = FrameProcessor::new(source, config.mounting.clone())
            .with_fetch_timeout(config.fetch_timeout())
            .with_empty_policy(config.empty_view)
            .with_trend_capacity(config.trend_capacity);
        let mut model = DisplayModel::new(trend_series);
        model.trend = processor.trend().series(trend_series);

        let store = FilterStore::new(config.filter, config.limits);
        Self {
            processor,
            filter_watch: store.subscribe(),
            store,
            renderer,
            model,
            timers: config.timers.clone(),
        }
    }

    /// Handle for editing the filter while the runner is ticking.
    pub fn filter_store(&self) -> FilterStore {
        self.store.clone()
    }

    pub fn model(&self) -> &DisplayModel {
        &self.model
    }

    /// Copy of the filter settings for one tick. Accepted edits since the
    /// previous tick are logged once.
    fn filter_snapshot(&mut self) -> FilterParams {
        match self.filter_watch.snapshot_if_changed() {
            Some(params) => {
                info!("filter settings changed: {:?}", params);
                params
            }
            None => self.filter_watch.snapshot(),
        }
    }

    /// Runs one refresh. A source failure marks the refreshed view stale and
    /// keeps its previous data; only renderer failures are returned.
    pub fn tick(&mut self, kind: TimerKind) -> anyhow::Result<()> {
        let params = self.filter_snapshot();

        match kind {
            TimerKind::RangeRcs => match self.processor.range_rcs_tick(params) {
                Ok(view) => {
                    self.model.range_rcs = view;
                    self.model.range_stale = None;
                }
                Err(err) => {
                    warn!("range/rcs tick failed, keeping last view: {}", err);
                    self.model.range_rcs = self.processor.displayed_range_view().clone();
                    self.model.range_stale = Some(err.to_string());
                }
            },
            TimerKind::Velocity => {
                match self.processor.velocity_tick(params) {
                    Ok(sample) => {
                        self.model.latest_velocity = sample;
                        self.model.velocity_stale = None;
                    }
                    Err(err) => {
                        warn!("velocity tick failed, keeping trend: {}", err);
                        self.model.velocity_stale = Some(err.to_string());
                    }
                }
                self.model.trend = self.processor.trend().series(self.model.trend_series);
            }
            TimerKind::Density => {
                trace!("density refresh has no view");
                return Ok(());
            }
        }

        self.model.metrics = self.processor.metrics();
        self.renderer
            .render(kind, &self.model)
            .with_context(|| format!("rendering {} update", kind))
    }

    /// Ticks until `max_ticks` refreshes have run or Ctrl+C is received.
    pub async fn run(&mut self, max_ticks: Option<usize>) -> anyhow::Result<RunSummary> {
        let timer = |kind| TickTimer::new(kind, self.timers.spec(kind));
        let mut range_timer = timer(TimerKind::RangeRcs);
        let mut density_timer = timer(TimerKind::Density);
        let mut velocity_timer = timer(TimerKind::Velocity);

        let mut ticks = 0;
        if [&range_timer, &density_timer, &velocity_timer]
            .iter()
            .all(|timer| !timer.is_enabled())
        {
            warn!("all refresh timers are disabled, nothing to do");
            return Ok(self.summary(ticks));
        }

        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            let kind = tokio::select! {
                kind = range_timer.tick() => kind,
                kind = density_timer.tick() => kind,
                kind = velocity_timer.tick() => kind,
                interrupted = signal::ctrl_c() => {
                    interrupted.context("awaiting Ctrl+C")?;
                    info!("interrupted after {} ticks", ticks);
                    break;
                }
            };
            self.tick(kind)?;
            ticks += 1;
        }

        Ok(self.summary(ticks))
    }

    fn summary(&self, ticks: usize) -> RunSummary {
        RunSummary {
            ticks,
            metrics: self.processor.metrics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::renderer::RecordingRenderer;
    use crate::generator::profile::{GeneratorConfig, SyntheticSource};
    use crate::workflow::timer::TimerSpec;
    use radarcore::prelude::{
        EmptyViewPolicy, FilterField, RawFrame, SourceResult, SourceUnavailable,
    };
    use radarcore::sensor_interface::ChannelSource;
    use std::ops::Range;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn config(generator: GeneratorConfig) -> DisplayConfig {
        DisplayConfig {
            generator,
            trend_capacity: 8,
            ..Default::default()
        }
    }

    fn runner(cfg: &DisplayConfig) -> Runner<SyntheticSource, RecordingRenderer> {
        Runner::new(
            cfg,
            SyntheticSource::new(cfg.generator.clone()),
            RecordingRenderer::default(),
            TrendSeries::MaxVelocity,
        )
    }

    #[test]
    fn range_tick_renders_sorted_view() {
        let cfg = config(GeneratorConfig {
            seed: 3,
            points_per_frame: 200,
            ..Default::default()
        });
        let mut runner = runner(&cfg);
        runner.tick(TimerKind::RangeRcs).unwrap();

        let (kind, model) = &runner.renderer.frames[0];
        assert_eq!(*kind, TimerKind::RangeRcs);
        assert!(!model.range_rcs.is_empty());
        assert!(model.range_rcs.ranges.windows(2).all(|w| w[0] <= w[1]));
        assert!(model
            .range_rcs
            .ranges
            .iter()
            .all(|&r| cfg.filter.min_range < r && r < cfg.filter.max_range));
        assert_eq!(model.metrics.frames_processed, 1);
    }

    #[test]
    fn velocity_ticks_fill_trend_window() {
        let cfg = config(GeneratorConfig {
            seed: 5,
            points_per_frame: 100,
            ..Default::default()
        });
        let mut runner = runner(&cfg);
        for _ in 0..3 {
            runner.tick(TimerKind::Velocity).unwrap();
        }
        let model = runner.model();
        assert_eq!(model.trend.len(), 8);
        assert_eq!(&model.trend[..5], &[0.0; 5]);
        assert!(model.latest_velocity.has_data());
        assert!(model
            .trend
            .iter()
            .all(|&v| v < cfg.filter.max_velocity));
    }

    /// Synthetic frames, except that the fetches numbered in `failing`
    /// report a disconnect.
    struct Flaky {
        inner: SyntheticSource,
        failing: Range<usize>,
        fetches: usize,
    }

    impl Flaky {
        fn new(cfg: &DisplayConfig, failing: Range<usize>) -> Self {
            Self {
                inner: SyntheticSource::new(cfg.generator.clone()),
                failing,
                fetches: 0,
            }
        }
    }

    impl FrameSource for Flaky {
        fn next_frame(&mut self, timeout: Duration) -> SourceResult<RawFrame> {
            let fetch = self.fetches;
            self.fetches += 1;
            if self.failing.contains(&fetch) {
                return Err(SourceUnavailable::Disconnected);
            }
            self.inner.next_frame(timeout)
        }
    }

    #[test]
    fn source_failure_marks_display_stale_and_keeps_view() {
        let cfg = config(GeneratorConfig {
            seed: 11,
            points_per_frame: 200,
            ..Default::default()
        });
        let mut runner = Runner::new(
            &cfg,
            Flaky::new(&cfg, 1..usize::MAX),
            RecordingRenderer::default(),
            TrendSeries::MaxVelocity,
        );

        runner.tick(TimerKind::RangeRcs).unwrap();
        let good = runner.model().range_rcs.clone();
        assert!(!good.is_empty());

        runner.tick(TimerKind::RangeRcs).unwrap();
        let (_, stale) = &runner.renderer.frames[1];
        assert!(stale.stale_for(TimerKind::RangeRcs).is_some());
        assert_eq!(stale.range_rcs, good);
        assert_eq!(stale.metrics.source_failures, 1);
    }

    #[test]
    fn velocity_success_does_not_clear_range_staleness() {
        let cfg = config(GeneratorConfig {
            seed: 11,
            points_per_frame: 200,
            ..Default::default()
        });
        let mut runner = Runner::new(
            &cfg,
            Flaky::new(&cfg, 1..2),
            RecordingRenderer::default(),
            TrendSeries::MaxVelocity,
        );

        runner.tick(TimerKind::RangeRcs).unwrap();
        let good = runner.model().range_rcs.clone();
        runner.tick(TimerKind::RangeRcs).unwrap();
        runner.tick(TimerKind::Velocity).unwrap();

        let model = runner.model();
        assert_eq!(model.range_rcs, good);
        assert_eq!(
            model.stale_for(TimerKind::RangeRcs),
            Some(SourceUnavailable::Disconnected.to_string().as_str())
        );
        assert_eq!(model.stale_for(TimerKind::Velocity), None);

        runner.tick(TimerKind::RangeRcs).unwrap();
        assert!(!runner.model().is_stale());
    }

    #[test]
    fn filter_edit_applies_on_next_tick() {
        let cfg = config(GeneratorConfig {
            seed: 9,
            points_per_frame: 300,
            ..Default::default()
        });
        let mut runner = runner(&cfg);
        let store = runner.filter_store();
        store.set(FilterField::MaxRange, 3.0).unwrap();
        assert!(store.set(FilterField::MaxRange, 30.0).is_err());

        runner.tick(TimerKind::RangeRcs).unwrap();
        assert!(runner.model().range_rcs.ranges.iter().all(|&r| r < 3.0));
    }

    #[test]
    fn filter_edits_between_ticks_are_picked_up_once() {
        let cfg = config(GeneratorConfig::default());
        let mut runner = runner(&cfg);
        assert_eq!(runner.filter_snapshot(), cfg.filter);

        runner.filter_store().set(FilterField::MinRange, 2.0).unwrap();
        assert_eq!(runner.filter_snapshot().min_range, 2.0);
        assert_eq!(runner.filter_watch.snapshot_if_changed(), None);
    }

    #[test]
    fn idle_blocking_source_is_bounded_by_fetch_timeout() {
        let cfg = DisplayConfig {
            fetch_timeout_ms: 20,
            ..config(GeneratorConfig::default())
        };
        let (_sender, receiver) = mpsc::channel();
        let mut runner = Runner::new(
            &cfg,
            ChannelSource::new(receiver),
            RecordingRenderer::default(),
            TrendSeries::MaxVelocity,
        );

        let started = Instant::now();
        runner.tick(TimerKind::Velocity).unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(
            runner.model().stale_for(TimerKind::Velocity),
            Some(SourceUnavailable::Timeout(Duration::from_millis(20)).to_string().as_str())
        );
        assert_eq!(runner.model().stale_for(TimerKind::RangeRcs), None);
    }

    #[test]
    fn density_tick_renders_nothing() {
        let cfg = config(GeneratorConfig::default());
        let mut runner = runner(&cfg);
        runner.tick(TimerKind::Density).unwrap();
        assert!(runner.renderer.frames.is_empty());
    }

    #[test]
    fn stationary_scene_has_no_velocity_data() {
        let cfg = DisplayConfig {
            empty_view: EmptyViewPolicy::Clear,
            ..config(GeneratorConfig {
                clutter_ratio: 1.0,
                ..Default::default()
            })
        };
        let mut runner = runner(&cfg);
        runner.tick(TimerKind::Velocity).unwrap();
        runner.tick(TimerKind::RangeRcs).unwrap();
        assert!(!runner.model().latest_velocity.has_data());
        assert!(runner.model().range_rcs.is_empty());
    }

    #[tokio::test]
    async fn run_stops_after_tick_budget() {
        let mut cfg = config(GeneratorConfig::default());
        cfg.timers.range_rcs = TimerSpec::new(2, true);
        cfg.timers.velocity = TimerSpec::new(1, true);
        let mut runner = runner(&cfg);
        let summary = runner.run(Some(6)).await.unwrap();
        assert_eq!(summary.ticks, 6);
        assert_eq!(runner.renderer.frames.len(), 6);
        assert_eq!(summary.metrics.frames_processed, 6);
    }

    #[tokio::test]
    async fn run_with_all_timers_disabled_returns_immediately() {
        let mut cfg = config(GeneratorConfig::default());
        cfg.timers.range_rcs.enabled = false;
        cfg.timers.velocity.enabled = false;
        let mut runner = runner(&cfg);
        let summary = runner.run(None).await.unwrap();
        assert_eq!(summary.ticks, 0);
    }
}
