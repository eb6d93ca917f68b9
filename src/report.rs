// Classification of finished results for the display side

use crate::analytics::{AnalysisResult, Measurement, RawMeans};
use crate::config::params::analysis::DETECTION_LIMIT_MM;

/// What the display shows for one finished run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// Cable found within the detection limit
    CableDetected(Measurement),
    /// Analysed distance at or beyond the detection limit
    CableNotDetected,
    /// Raw means, shown as they are
    Raw(RawMeans),
}

impl Reading {
    /// Classify an analysis result against the default detection limit
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self::with_limit(result, DETECTION_LIMIT_MM)
    }

    /// Classify an analysis result
    ///
    /// # Arguments
    /// * `result` - Output of the analytics engine
    /// * `limit_mm` - Distances at or above this are reported as no cable
    pub fn with_limit(result: &AnalysisResult, limit_mm: f32) -> Self {
        match result {
            AnalysisResult::Analysed(m) if m.distance_mm < limit_mm => Reading::CableDetected(*m),
            AnalysisResult::Analysed(_) => Reading::CableNotDetected,
            AnalysisResult::Raw(raw) => Reading::Raw(*raw),
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Reading::CableDetected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(distance_mm: f32) -> AnalysisResult {
        AnalysisResult::Analysed(Measurement {
            distance_mm,
            ..Measurement::default()
        })
    }

    #[test]
    fn test_detection_limit() {
        assert!(Reading::from_result(&at(12.0)).is_detected());
        assert!(Reading::from_result(&at(299.9)).is_detected());
        assert_eq!(Reading::from_result(&at(300.0)), Reading::CableNotDetected);
    }

    #[test]
    fn test_custom_limit() {
        assert_eq!(Reading::with_limit(&at(150.0), 100.0), Reading::CableNotDetected);
    }

    #[test]
    fn test_raw_passes_through() {
        let raw = RawMeans {
            hall_right: 1.0,
            hall_left: 2.0,
            wpc_right: 3.0,
            wpc_left: 4.0,
        };
        assert_eq!(
            Reading::from_result(&AnalysisResult::Raw(raw)),
            Reading::Raw(raw)
        );
    }
}
