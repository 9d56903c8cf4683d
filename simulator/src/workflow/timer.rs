use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    RangeRcs,
    /// Reserved refresh slot; ticks without producing a view.
    Density,
    Velocity,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimerKind::RangeRcs => "range/rcs",
            TimerKind::Density => "density",
            TimerKind::Velocity => "velocity",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSpec {
    pub period_ms: u64,
    pub enabled: bool,
}

impl TimerSpec {
    pub fn new(period_ms: u64, enabled: bool) -> Self {
        Self { period_ms, enabled }
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms.max(1))
    }
}

impl Default for TimerSpec {
    fn default() -> Self {
        Self::new(1000, true)
    }
}

/// Periodic refresh. A disabled timer never fires.
pub struct TickTimer {
    kind: TimerKind,
    interval: Interval,
    enabled: bool,
}

impl TickTimer {
    /// Must be called inside a tokio runtime.
    pub fn new(kind: TimerKind, spec: &TimerSpec) -> Self {
        let mut interval = time::interval(spec.period());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            kind,
            interval,
            enabled: spec.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn tick(&mut self) -> TimerKind {
        if !self.enabled {
            std::future::pending::<()>().await;
        }
        self.interval.tick().await;
        self.kind
    }
}
