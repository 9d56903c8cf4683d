use crate::math::GeometryHelper;
use crate::prelude::DetectionError;
use crate::processing::SensorMounting;
use crate::sensor_interface::{DetectionPoint, RawFrame};

/// Derived points of one frame plus the points that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionBatch {
    pub points: Vec<DetectionPoint>,
    pub skipped: Vec<DetectionError>,
}

/// Derives range, bearing and dBsm for every point of `frame`.
///
/// Points with `x == 0`, a non-positive RCS or an unmounted sensor are
/// reported in `skipped` and left out; the remaining points keep frame order.
pub fn compute_detections(frame: &RawFrame, mounting: &SensorMounting) -> DetectionBatch {
    let mut batch = DetectionBatch {
        points: Vec::with_capacity(frame.len()),
        skipped: Vec::new(),
    };

    for (index, raw) in frame.points().enumerate() {
        let Some(bearing) = GeometryHelper::bearing_deg(raw.x, raw.y) else {
            batch
                .skipped
                .push(DetectionError::DegenerateGeometry { index });
            continue;
        };
        let Some(rcs_dbsm) = GeometryHelper::rcs_to_dbsm(raw.rcs) else {
            batch
                .skipped
                .push(DetectionError::InvalidRcs { index, rcs: raw.rcs });
            continue;
        };
        let Some(offset) = mounting.offset_for(raw.sensor_index) else {
            batch.skipped.push(DetectionError::UnmountedSensor {
                index,
                sensor: raw.sensor_index,
            });
            continue;
        };

        batch.points.push(DetectionPoint {
            x: raw.x,
            y: raw.y,
            range: GeometryHelper::slant_range(raw.x, raw.y),
            bearing_deg: bearing + offset,
            snr: raw.snr,
            rcs_dbsm,
            velocity: raw.velocity,
            sensor_index: raw.sensor_index,
        });
    }

    batch
}
