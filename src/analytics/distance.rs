// Distance lookup from WPC amplitude with piecewise-linear calibration tables

use crate::error::{Error, Result};

/// One calibration measurement: amplitude observed at a known distance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationPoint {
    /// Distance between sensor and cable [mm]
    pub distance_mm: f32,
    /// WPC amplitude at that distance [ADC codes]
    pub strength: f32,
}

impl CalibrationPoint {
    pub const fn new(distance_mm: f32, strength: f32) -> Self {
        Self {
            distance_mm,
            strength,
        }
    }
}

/// Calibration curve for one side and one wiring mode
///
/// Points are ordered by increasing distance; strength falls as distance
/// grows. Readings outside the strength range are clamped to the nearest end
/// of the table.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationTable<'a> {
    points: &'a [CalibrationPoint],
}

impl<'a> CalibrationTable<'a> {
    /// Wrap points without checking them (for constant tables)
    pub const fn new(points: &'a [CalibrationPoint]) -> Self {
        Self { points }
    }

    /// Wrap points after checking them with [`CalibrationTable::validate`]
    pub fn validated(points: &'a [CalibrationPoint]) -> Result<Self> {
        let table = Self::new(points);
        table.validate()?;
        Ok(table)
    }

    /// Check that the table can be interpolated
    ///
    /// Requires at least two points, strictly increasing distance, and
    /// non-increasing strength with the first strength above the last.
    /// Equal neighbouring strengths are tolerated; an exact match then
    /// resolves to the nearer distance.
    pub fn validate(&self) -> Result<()> {
        if self.points.len() < 2 {
            return Err(Error::InvalidTable);
        }
        for pair in self.points.windows(2) {
            let (near, far) = (pair[0], pair[1]);
            if !(far.distance_mm > near.distance_mm) || !(far.strength <= near.strength) {
                return Err(Error::InvalidTable);
            }
        }
        if !(self.max_strength() > self.min_strength()) {
            return Err(Error::InvalidTable);
        }
        Ok(())
    }

    pub fn points(&self) -> &'a [CalibrationPoint] {
        self.points
    }

    /// Strength at zero distance
    pub fn max_strength(&self) -> f32 {
        self.points.first().map_or(0.0, |p| p.strength)
    }

    /// Strength at the largest calibrated distance
    pub fn min_strength(&self) -> f32 {
        self.points.last().map_or(0.0, |p| p.strength)
    }

    /// Largest calibrated distance [mm]
    pub fn max_distance(&self) -> f32 {
        self.points.last().map_or(0.0, |p| p.distance_mm)
    }

    /// Convert an amplitude into a distance
    ///
    /// # Arguments
    /// * `measurement` - WPC amplitude [ADC codes]
    ///
    /// # Returns
    /// Distance [mm], always within the table's distance range
    pub fn distance(&self, measurement: f32) -> f32 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };

        let measurement = if measurement.is_nan() || measurement < last.strength {
            trace!(
                "Amplitude {} below table, clamped to {}",
                measurement,
                last.strength
            );
            last.strength
        } else if measurement > first.strength {
            trace!(
                "Amplitude {} above table, clamped to {}",
                measurement,
                first.strength
            );
            first.strength
        } else {
            measurement
        };

        if let Some(exact) = self.points.iter().find(|p| p.strength == measurement) {
            return exact.distance_mm;
        }

        for pair in self.points.windows(2) {
            let (near, far) = (pair[0], pair[1]);
            if measurement < near.strength && measurement > far.strength {
                let ratio = (measurement - near.strength) / (far.strength - near.strength);
                return near.distance_mm + ratio * (far.distance_mm - near.distance_mm);
            }
        }

        // Only reachable for tables that fail validate()
        last.distance_mm
    }
}
