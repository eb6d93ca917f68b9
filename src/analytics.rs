// Analytics: converts buffered raw amplitudes into calibrated results

pub mod angle;
pub mod current;
pub mod distance;
pub mod engine;
pub mod statistics;

// Re-export main types for easier access
pub use angle::AngleEstimator;
pub use current::CurrentEstimator;
pub use distance::{CalibrationPoint, CalibrationTable};
pub use engine::AnalyticsEngine;

/// Physical quantities of an analysed run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Cable orientation [deg]
    pub angle_deg: f32,
    /// Mean distance of both sides over all cycles [mm]
    pub distance_mm: f32,
    /// Population standard deviation of the distances [mm], 0 for one cycle
    pub std_deviation_mm: f32,
    /// Cable current [A], 0 unless the cable is in close range
    pub current_a: f32,
}

/// Per-channel means of the raw amplitudes [ADC codes]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawMeans {
    pub hall_right: f32,
    pub hall_left: f32,
    pub wpc_right: f32,
    pub wpc_left: f32,
}

/// Output record of a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalysisResult {
    Analysed(Measurement),
    Raw(RawMeans),
}

impl AnalysisResult {
    /// The four result fields in display order
    ///
    /// `[angle, distance, std_deviation, current]` for analysed results,
    /// `[hall_right, hall_left, wpc_right, wpc_left]` for raw results.
    pub fn to_array(&self) -> [f32; 4] {
        match self {
            AnalysisResult::Analysed(m) => {
                [m.angle_deg, m.distance_mm, m.std_deviation_mm, m.current_a]
            }
            AnalysisResult::Raw(r) => [r.hall_right, r.hall_left, r.wpc_right, r.wpc_left],
        }
    }
}
