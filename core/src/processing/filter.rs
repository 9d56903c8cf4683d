use crate::sensor_interface::DetectionPoint;
use crate::settings::FilterParams;

/// Keeps moving points strictly inside the bearing window, in input order.
///
/// Zero-velocity points are stationary clutter and never pass, whatever the
/// settings.
pub fn filter_bearing_and_motion(
    detections: &[DetectionPoint],
    params: &FilterParams,
) -> Vec<DetectionPoint> {
    detections
        .iter()
        .filter(|point| params.bearing_contains(point.bearing_deg) && !point.is_stationary())
        .copied()
        .collect()
}
