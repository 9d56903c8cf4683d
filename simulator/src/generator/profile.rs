use radarcore::prelude::{FrameSource, RawFrame, SourceResult, SourceUnavailable};
use anyhow::ensure;
use radarcore::sensor_interface::RawPoint;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for generating synthetic radar frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub points_per_frame: usize,
    /// Sensor indices are drawn from `0..sensors`.
    pub sensors: u32,
    pub max_range: f64,
    /// Half-width of the sensor field of view, degrees.
    pub field_of_view: f64,
    pub max_speed: f64,
    pub min_rcs_db: f64,
    pub max_rcs_db: f64,
    /// Fraction of points emitted with zero velocity.
    pub clutter_ratio: f64,
    /// Fraction of points emitted with `x == 0` or a non-positive RCS.
    pub corrupt_ratio: f64,
    /// Fraction of fetches that time out.
    pub dropout_ratio: f64,
    /// Time the simulated sensor needs per frame. Fetches with a shorter
    /// timeout fail.
    pub frame_interval_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            points_per_frame: 32,
            sensors: 2,
            max_range: 12.0,
            field_of_view: 60.0,
            max_speed: 12.0,
            min_rcs_db: -40.0,
            max_rcs_db: 10.0,
            clutter_ratio: 0.25,
            corrupt_ratio: 0.02,
            dropout_ratio: 0.0,
            frame_interval_ms: 0,
        }
    }
}

impl GeneratorConfig {
    /// Rejects settings the sampler cannot draw from.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.max_range.is_finite() && self.max_range > 0.0,
            "max_range must be a positive finite distance, got {}",
            self.max_range
        );
        ensure!(
            self.field_of_view.is_finite() && self.field_of_view >= 0.0,
            "field_of_view must be a non-negative finite angle, got {}",
            self.field_of_view
        );
        ensure!(
            self.max_speed.is_finite() && self.max_speed >= 0.0,
            "max_speed must be a non-negative finite speed, got {}",
            self.max_speed
        );
        ensure!(
            self.min_rcs_db.is_finite()
                && self.max_rcs_db.is_finite()
                && self.min_rcs_db <= self.max_rcs_db,
            "rcs window {}..{} dB is empty",
            self.min_rcs_db,
            self.max_rcs_db
        );
        for (name, ratio) in [
            ("clutter_ratio", self.clutter_ratio),
            ("corrupt_ratio", self.corrupt_ratio),
            ("dropout_ratio", self.dropout_ratio),
        ] {
            ensure!(
                (0.0..=1.0).contains(&ratio),
                "{} must be within 0..=1, got {}",
                name,
                ratio
            );
        }
        Ok(())
    }

    fn normalized_sensors(&self) -> u32 {
        self.sensors.max(1)
    }
}

/// Seeded stand-in for a live sensor.
///
/// The config is expected to have passed [`GeneratorConfig::validate`].
pub struct SyntheticSource {
    config: GeneratorConfig,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    fn build_point(&mut self) -> RawPoint {
        let config = &self.config;
        let range = self.rng.gen_range(0.2..config.max_range.max(0.3));
        let angle = self
            .rng
            .gen_range(-config.field_of_view..=config.field_of_view)
            .to_radians();
        let rcs_db = self.rng.gen_range(config.min_rcs_db..=config.max_rcs_db);
        let mut point = RawPoint {
            x: range * angle.cos(),
            y: range * angle.sin(),
            rcs: 10f64.powf(rcs_db / 10.0),
            snr: self.rng.gen_range(5.0..30.0),
            velocity: self.rng.gen_range(-config.max_speed..=config.max_speed),
            sensor_index: self.rng.gen_range(0..config.normalized_sensors()),
        };

        if self.rng.gen_bool(config.clutter_ratio) {
            point.velocity = 0.0;
        }
        if self.rng.gen_bool(config.corrupt_ratio) {
            if self.rng.gen_bool(0.5) {
                point.x = 0.0;
            } else {
                point.rcs = 0.0;
            }
        }
        point
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self, timeout: Duration) -> SourceResult<RawFrame> {
        let interval = Duration::from_millis(self.config.frame_interval_ms);
        if interval > timeout || self.rng.gen_bool(self.config.dropout_ratio) {
            return Err(SourceUnavailable::Timeout(timeout));
        }

        let count = self.config.points_per_frame;
        let points: Vec<RawPoint> = (0..count).map(|_| self.build_point()).collect();
        Ok(RawFrame::from_points(points))
    }
}
