use crate::generator::profile::GeneratorConfig;
use crate::workflow::timer::{TimerKind, TimerSpec};
use anyhow::Context;
use radarcore::prelude::{EmptyViewPolicy, FilterLimits, FilterParams, SensorMounting};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Periods of the three display refresh timers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub range_rcs: TimerSpec,
    pub density: TimerSpec,
    pub velocity: TimerSpec,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            range_rcs: TimerSpec::new(600, true),
            density: TimerSpec::new(1000, false),
            velocity: TimerSpec::new(7, true),
        }
    }
}

impl TimerConfig {
    pub fn spec(&self, kind: TimerKind) -> &TimerSpec {
        match kind {
            TimerKind::RangeRcs => &self.range_rcs,
            TimerKind::Density => &self.density,
            TimerKind::Velocity => &self.velocity,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub filter: FilterParams,
    pub limits: FilterLimits,
    pub mounting: SensorMounting,
    pub timers: TimerConfig,
    pub fetch_timeout_ms: u64,
    pub trend_capacity: usize,
    pub empty_view: EmptyViewPolicy,
    pub generator: GeneratorConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            filter: FilterParams::default(),
            limits: FilterLimits::default(),
            mounting: SensorMounting::two_sensor(),
            timers: TimerConfig::default(),
            fetch_timeout_ms: 500,
            trend_capacity: 50,
            empty_view: EmptyViewPolicy::Clear,
            generator: GeneratorConfig::default(),
        }
    }
}

impl DisplayConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading display config {}", path_ref.display()))?;
        let config: DisplayConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing display config {}", path_ref.display()))?;
        config
            .generator
            .validate()
            .with_context(|| format!("invalid generator section in {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms.max(1))
    }
}
