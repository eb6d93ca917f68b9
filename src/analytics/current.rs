// Electrical current from the Hall sensor amplitude

use crate::config::params::current::{
    HALL_SENSOR_GAIN, MIN_FIELD_TESLA, OPAMP_GAIN, PERMEABILITY_CONSTANT, VOLTS_PER_CODE,
};

/// Current estimator for a straight conductor
pub struct CurrentEstimator {
    /// ADC voltage per code [V]
    volts_per_code: f32,
    /// Amplifier gain between Hall sensor and ADC
    opamp_gain: f32,
    /// Hall sensor sensitivity
    hall_gain: f32,
    /// Field-to-current constant
    permeability_constant: f32,
}

impl Default for CurrentEstimator {
    fn default() -> Self {
        Self::new(
            VOLTS_PER_CODE,
            OPAMP_GAIN,
            HALL_SENSOR_GAIN,
            PERMEABILITY_CONSTANT,
        )
    }
}

impl CurrentEstimator {
    pub fn new(
        volts_per_code: f32,
        opamp_gain: f32,
        hall_gain: f32,
        permeability_constant: f32,
    ) -> Self {
        Self {
            volts_per_code,
            opamp_gain,
            hall_gain,
            permeability_constant,
        }
    }

    /// Magnetic flux density from a Hall amplitude
    ///
    /// # Arguments
    /// * `amplitude` - Hall amplitude [ADC codes]
    ///
    /// # Returns
    /// Flux density [T]
    pub fn flux_density(&self, amplitude: f32) -> f32 {
        amplitude * self.volts_per_code / self.opamp_gain / self.hall_gain
    }

    /// Estimate the current through the cable
    ///
    /// # Arguments
    /// * `amplitude` - Hall amplitude [ADC codes]
    /// * `distance_m` - Distance between sensor and cable [m]
    ///
    /// # Returns
    /// * `Some(current)` in amperes
    /// * `None` if the flux density is too small to divide by
    pub fn estimate(&self, amplitude: f32, distance_m: f32) -> Option<f32> {
        let b = self.flux_density(amplitude);
        if !(b.abs() >= MIN_FIELD_TESLA) {
            return None;
        }

        let current = self.permeability_constant * (distance_m / b);
        current.is_finite().then_some(current)
    }
}
