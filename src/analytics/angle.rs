// Cable orientation from the left/right distance pair

use crate::config::params::analysis::{ANGLE_MARGIN, ROTATED_ANGLE_DEG};

/// Threshold classifier for the cable angle
///
/// Both side distances are normalised by a reference distance. A side that is
/// clearly closer than the reference means the cable is rotated towards it.
/// The result is one of three bands: `-angle`, `0` or `+angle`.
#[derive(Debug, Clone, Copy)]
pub struct AngleEstimator {
    /// Relative deviation that counts as rotated (0.0 - 1.0)
    margin: f32,
    /// Reported magnitude when rotated [deg]
    rotated_angle_deg: f32,
}

impl Default for AngleEstimator {
    fn default() -> Self {
        Self::new(ANGLE_MARGIN, ROTATED_ANGLE_DEG)
    }
}

impl AngleEstimator {
    /// Create an angle estimator
    ///
    /// # Arguments
    /// * `margin` - Relative deviation that counts as rotated, clamped to 0.0-1.0
    /// * `rotated_angle_deg` - Angle reported for a rotated cable [deg]
    pub fn new(margin: f32, rotated_angle_deg: f32) -> Self {
        Self {
            margin: margin.clamp(0.0, 1.0),
            rotated_angle_deg,
        }
    }

    /// Estimate the cable angle
    ///
    /// # Arguments
    /// * `left` - Mean distance of the left sensor [mm]
    /// * `right` - Mean distance of the right sensor [mm]
    /// * `reference` - Reference distance, normally the overall mean [mm]
    ///
    /// # Returns
    /// Angle in degrees; negative when rotated left, positive when rotated
    /// right, `0.0` when centred or when `reference` is not positive
    pub fn estimate(&self, left: f32, right: f32, reference: f32) -> f32 {
        if !(reference > 0.0) || !reference.is_finite() {
            return 0.0;
        }

        let threshold = 1.0 - self.margin;
        if left / reference < threshold {
            -self.rotated_angle_deg
        } else if right / reference < threshold {
            self.rotated_angle_deg
        } else {
            0.0
        }
    }
}
