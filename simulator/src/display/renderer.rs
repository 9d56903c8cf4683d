use crate::display::model::DisplayModel;
use crate::workflow::timer::TimerKind;
use log::info;
use radarcore::prelude::VelocitySample;

/// Consumer of display updates, called once per processed tick.
pub trait Renderer {
    fn render(&mut self, kind: TimerKind, model: &DisplayModel) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Log,
    JsonLines,
}

/// Writes each update to the log, or to stdout as JSON lines.
pub struct ConsoleRenderer {
    format: OutputFormat,
}

impl ConsoleRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, kind: TimerKind, model: &DisplayModel) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                let line = serde_json::json!({
                    "timer": kind.to_string(),
                    "model": model,
                });
                println!("{}", serde_json::to_string(&line)?);
            }
            OutputFormat::Log => {
                if let Some(reason) = model.stale_for(kind) {
                    info!("[{}] stale display: {}", kind, reason);
                    return Ok(());
                }
                match kind {
                    TimerKind::RangeRcs => info!(
                        "[{}] {} points, nearest {:?} m",
                        kind,
                        model.range_rcs.len(),
                        model.range_rcs.ranges.first()
                    ),
                    TimerKind::Velocity => match model.latest_velocity {
                        VelocitySample::NoData => info!("[{}] no data", kind),
                        VelocitySample::Reading {
                            max_velocity_mag,
                            velocity_at_max_rcs,
                        } => info!(
                            "[{}] max {:.2} m/s, strongest reflector {:.2} m/s",
                            kind, max_velocity_mag, velocity_at_max_rcs
                        ),
                    },
                    TimerKind::Density => {}
                }
            }
        }
        Ok(())
    }
}

/// Keeps every update in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: Vec<(TimerKind, DisplayModel)>,
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn render(&mut self, kind: TimerKind, model: &DisplayModel) -> anyhow::Result<()> {
        self.frames.push((kind, model.clone()));
        Ok(())
    }
}
