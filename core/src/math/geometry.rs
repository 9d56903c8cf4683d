/// Conversions from sensor-local Cartesian detections to display units.
pub struct GeometryHelper;

impl GeometryHelper {
    /// Slant range in meters.
    pub fn slant_range(x: f64, y: f64) -> f64 {
        (x * x + y * y).sqrt()
    }

    /// Bearing in degrees relative to boresight, before any mounting offset.
    ///
    /// Returns `None` when `x == 0`, where `atan(y / x)` is undefined.
    pub fn bearing_deg(x: f64, y: f64) -> Option<f64> {
        if x == 0.0 || !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some((y / x).atan().to_degrees())
    }

    /// Linear radar cross-section (m²) to dBsm. `None` for non-positive input.
    pub fn rcs_to_dbsm(sigma: f64) -> Option<f64> {
        if sigma > 0.0 && sigma.is_finite() {
            Some(10.0 * sigma.log10())
        } else {
            None
        }
    }
}
