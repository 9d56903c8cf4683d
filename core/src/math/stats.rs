pub struct StatsHelper;

impl StatsHelper {
    /// Largest absolute value, or `None` for an empty sequence.
    pub fn max_abs<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().map(f64::abs).reduce(f64::max)
    }
}
