//! Filter settings shared between the configuration surface and the
//! per-tick processing.
//!
//! Writers go through [`FilterStore::set`], which validates against
//! [`FilterLimits`]. Processing never holds a reference into the store: each
//! tick takes a [`FilterParams`] copy with [`FilterStore::snapshot`] and works
//! on that copy only.

use crate::prelude::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Range, velocity and bearing windows applied to a frame. All bounds are
/// exclusive. Inverted pairs are not corrected and simply match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub min_range: f64,
    pub max_range: f64,
    /// Applied to `|velocity|`.
    pub min_velocity: f64,
    pub max_velocity: f64,
    pub min_bearing: f64,
    pub max_bearing: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            min_range: 0.5,
            max_range: 8.0,
            min_velocity: 1.0,
            max_velocity: 10.0,
            min_bearing: -15.0,
            max_bearing: 15.0,
        }
    }
}

impl FilterParams {
    pub fn range_contains(&self, range: f64) -> bool {
        self.min_range < range && range < self.max_range
    }

    pub fn speed_contains(&self, speed: f64) -> bool {
        self.min_velocity < speed && speed < self.max_velocity
    }

    pub fn bearing_contains(&self, bearing_deg: f64) -> bool {
        self.min_bearing < bearing_deg && bearing_deg < self.max_bearing
    }

    pub fn get(&self, field: FilterField) -> f64 {
        match field {
            FilterField::MinRange => self.min_range,
            FilterField::MaxRange => self.max_range,
            FilterField::MinVelocity => self.min_velocity,
            FilterField::MaxVelocity => self.max_velocity,
            FilterField::MinBearing => self.min_bearing,
            FilterField::MaxBearing => self.max_bearing,
        }
    }

    fn slot(&mut self, field: FilterField) -> &mut f64 {
        match field {
            FilterField::MinRange => &mut self.min_range,
            FilterField::MaxRange => &mut self.max_range,
            FilterField::MinVelocity => &mut self.min_velocity,
            FilterField::MaxVelocity => &mut self.max_velocity,
            FilterField::MinBearing => &mut self.min_bearing,
            FilterField::MaxBearing => &mut self.max_bearing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    MinRange,
    MaxRange,
    MinVelocity,
    MaxVelocity,
    MinBearing,
    MaxBearing,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::MinRange,
        FilterField::MaxRange,
        FilterField::MinVelocity,
        FilterField::MaxVelocity,
        FilterField::MinBearing,
        FilterField::MaxBearing,
    ];
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "min_range" => Ok(FilterField::MinRange),
            "max_range" => Ok(FilterField::MaxRange),
            "min_velocity" => Ok(FilterField::MinVelocity),
            "max_velocity" => Ok(FilterField::MaxVelocity),
            "min_bearing" => Ok(FilterField::MinBearing),
            "max_bearing" => Ok(FilterField::MaxBearing),
            other => Err(format!("unknown filter field '{}'", other)),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilterField::MinRange => "minimum range",
            FilterField::MaxRange => "maximum range",
            FilterField::MinVelocity => "minimum velocity",
            FilterField::MaxVelocity => "maximum velocity",
            FilterField::MinBearing => "minimum bearing",
            FilterField::MaxBearing => "maximum bearing",
        };
        f.write_str(label)
    }
}

/// Closed interval accepted by the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Inclusive limits for user-entered filter values, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterLimits {
    pub range: Bounds,
    pub velocity: Bounds,
    pub bearing: Bounds,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            range: Bounds::new(1.0, 15.0),
            velocity: Bounds::new(0.0, 10.0),
            bearing: Bounds::new(-15.0, 15.0),
        }
    }
}

impl FilterLimits {
    pub fn bounds_for(&self, field: FilterField) -> Bounds {
        match field {
            FilterField::MinRange | FilterField::MaxRange => self.range,
            FilterField::MinVelocity | FilterField::MaxVelocity => self.velocity,
            FilterField::MinBearing | FilterField::MaxBearing => self.bearing,
        }
    }

    pub fn check(&self, field: FilterField, value: f64) -> FilterResult<()> {
        if !value.is_finite() {
            return Err(FilterError::NotFinite(field));
        }
        let bounds = self.bounds_for(field);
        if bounds.contains(value) {
            Ok(())
        } else {
            Err(FilterError::OutOfBounds {
                field,
                min: bounds.min,
                max: bounds.max,
                value,
            })
        }
    }
}

/// Current filter settings behind a watch channel.
///
/// Cloning the store yields another handle to the same settings.
#[derive(Clone)]
pub struct FilterStore {
    sender: Arc<watch::Sender<FilterParams>>,
    limits: FilterLimits,
}

impl FilterStore {
    /// Initial values are taken as given; only later edits are validated.
    pub fn new(initial: FilterParams, limits: FilterLimits) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            limits,
        }
    }

    pub fn limits(&self) -> FilterLimits {
        self.limits
    }

    /// Copy of the whole parameter set, taken atomically.
    pub fn snapshot(&self) -> FilterParams {
        *self.sender.borrow()
    }

    /// Validates and stores one field. A rejected value leaves the stored
    /// settings untouched.
    pub fn set(&self, field: FilterField, value: f64) -> FilterResult<FilterParams> {
        self.limits.check(field, value)?;
        self.sender.send_modify(|params| *params.slot(field) = value);
        log::debug!("filter {} set to {}", field, value);
        Ok(self.snapshot())
    }

    /// Receiver that observes every accepted edit.
    pub fn subscribe(&self) -> FilterHandle {
        FilterHandle {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterParams::default(), FilterLimits::default())
    }
}

/// Read side of a [`FilterStore`], for consumers that react to edits.
pub struct FilterHandle {
    receiver: watch::Receiver<FilterParams>,
}

impl FilterHandle {
    pub fn snapshot(&self) -> FilterParams {
        *self.receiver.borrow()
    }

    /// Takes a snapshot and reports whether it differs from the last one seen.
    pub fn snapshot_if_changed(&mut self) -> Option<FilterParams> {
        match self.receiver.has_changed() {
            Ok(true) => Some(*self.receiver.borrow_and_update()),
            _ => None,
        }
    }
}
