use crate::prelude::{SourceResult, SourceUnavailable};
use serde::Serialize;

/// One frame of detections as delivered by the sensor, stored as parallel
/// per-point sequences of identical length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawFrame {
    x: Vec<f64>,
    y: Vec<f64>,
    rcs: Vec<f64>,
    snr: Vec<f64>,
    velocity: Vec<f64>,
    sensor_index: Vec<u32>,
}

/// Row view of a single raw point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    pub rcs: f64,
    pub snr: f64,
    pub velocity: f64,
    pub sensor_index: u32,
}

impl RawFrame {
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        rcs: Vec<f64>,
        snr: Vec<f64>,
        velocity: Vec<f64>,
        sensor_index: Vec<u32>,
    ) -> SourceResult<Self> {
        let expected = x.len();
        let lengths = [
            ("y", y.len()),
            ("rcs", rcs.len()),
            ("snr", snr.len()),
            ("velocity", velocity.len()),
            ("sensor_index", sensor_index.len()),
        ];
        if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != expected) {
            return Err(SourceUnavailable::MalformedFrame(format!(
                "{} has {} entries, x has {}",
                name, len, expected
            )));
        }

        Ok(Self {
            x,
            y,
            rcs,
            snr,
            velocity,
            sensor_index,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = RawPoint>,
    {
        let mut frame = Self::default();
        for point in points {
            frame.x.push(point.x);
            frame.y.push(point.y);
            frame.rcs.push(point.rcs);
            frame.snr.push(point.snr);
            frame.velocity.push(point.velocity);
            frame.sensor_index.push(point.sensor_index);
        }
        frame
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<RawPoint> {
        if index >= self.len() {
            return None;
        }
        Some(RawPoint {
            x: self.x[index],
            y: self.y[index],
            rcs: self.rcs[index],
            snr: self.snr[index],
            velocity: self.velocity[index],
            sensor_index: self.sensor_index[index],
        })
    }

    pub fn points(&self) -> impl Iterator<Item = RawPoint> + '_ {
        (0..self.len()).filter_map(move |index| self.point(index))
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn rcs(&self) -> &[f64] {
        &self.rcs
    }

    pub fn snr(&self) -> &[f64] {
        &self.snr
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn sensor_index(&self) -> &[u32] {
        &self.sensor_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_lengths() {
        let err = RawFrame::new(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![0, 1],
        )
        .unwrap_err();
        assert!(matches!(err, SourceUnavailable::MalformedFrame(ref msg) if msg.starts_with("rcs")));
    }

    #[test]
    fn from_points_keeps_columns_parallel() {
        let frame = RawFrame::from_points([
            RawPoint {
                x: 3.0,
                y: 4.0,
                rcs: 1.0,
                snr: 12.0,
                velocity: 2.0,
                sensor_index: 0,
            },
            RawPoint {
                x: 1.0,
                y: -1.0,
                rcs: 0.5,
                snr: 8.0,
                velocity: -1.5,
                sensor_index: 1,
            },
        ]);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.velocity(), &[2.0, -1.5]);
        assert_eq!(frame.point(1).unwrap().sensor_index, 1);
        assert!(frame.point(2).is_none());
    }
}
