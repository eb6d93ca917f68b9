// Analytics engine: turns the cycle buffers of a finished run into a result

use super::statistics::{mean, population_std_dev};
use super::{AnalysisResult, AngleEstimator, CurrentEstimator, Measurement, RawMeans};
use crate::buffers::CycleBuffers;
use crate::config::calibration::CalibrationSet;
use crate::config::params::{analysis::CLOSE_RANGE_MM, CYCLE_CAPACITY};
use crate::config::{Accuracy, CalibrationMode, ResultMode};

/// Analytics engine
pub struct AnalyticsEngine {
    angle: AngleEstimator,
    current: CurrentEstimator,
    /// Upper distance bound for the current calculation [mm]
    close_range_mm: f32,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(
            AngleEstimator::default(),
            CurrentEstimator::default(),
            CLOSE_RANGE_MM,
        )
    }
}

impl AnalyticsEngine {
    pub fn new(angle: AngleEstimator, current: CurrentEstimator, close_range_mm: f32) -> Self {
        Self {
            angle,
            current,
            close_range_mm,
        }
    }

    /// Analyse a finished run
    ///
    /// # Arguments
    /// * `buffers` - Raw amplitudes, valid for the first `accuracy` cycles
    /// * `accuracy` - Number of cycles in the run
    /// * `result_mode` - Analysed quantities or raw means
    /// * `calibration_mode` - Selects the distance tables
    pub fn analyse(
        &self,
        buffers: &CycleBuffers,
        accuracy: Accuracy,
        result_mode: ResultMode,
        calibration_mode: CalibrationMode,
    ) -> AnalysisResult {
        let cycles = accuracy.cycles();
        match result_mode {
            ResultMode::Analysed => {
                AnalysisResult::Analysed(self.analyse_distances(buffers, cycles, calibration_mode))
            }
            ResultMode::RawPassthrough => AnalysisResult::Raw(RawMeans {
                hall_right: mean(buffers.hall_right(cycles)),
                hall_left: mean(buffers.hall_left(cycles)),
                wpc_right: mean(buffers.wpc_right(cycles)),
                wpc_left: mean(buffers.wpc_left(cycles)),
            }),
        }
    }

    fn analyse_distances(
        &self,
        buffers: &CycleBuffers,
        cycles: usize,
        calibration_mode: CalibrationMode,
    ) -> Measurement {
        let tables = CalibrationSet::for_mode(calibration_mode);

        let mut left = [0.0f32; CYCLE_CAPACITY];
        let mut right = [0.0f32; CYCLE_CAPACITY];
        let left = &mut left[..cycles];
        let right = &mut right[..cycles];
        for (d, &raw) in left.iter_mut().zip(buffers.wpc_left(cycles)) {
            *d = tables.left.distance(raw);
        }
        for (d, &raw) in right.iter_mut().zip(buffers.wpc_right(cycles)) {
            *d = tables.right.distance(raw);
        }

        let mean_left = mean(left.iter());
        let mean_right = mean(right.iter());
        let distance = mean(left.iter().chain(right.iter()));

        let std_deviation = if cycles > 1 {
            population_std_dev(left.iter().chain(right.iter()), distance)
        } else {
            0.0
        };

        let angle = self.angle.estimate(mean_left, mean_right, distance);

        let current = if distance > 0.0 && distance < self.close_range_mm {
            let hall = mean(
                buffers
                    .hall_left(cycles)
                    .iter()
                    .chain(buffers.hall_right(cycles)),
            );
            match self.current.estimate(hall.abs(), distance / 1000.0) {
                Some(current) => current,
                None => {
                    warn!("Hall field too weak for current calculation (amplitude {})", hall);
                    0.0
                }
            }
        } else {
            0.0
        };

        debug!(
            "Analysed: L={}mm R={}mm mean={}mm sd={}mm angle={}deg I={}A",
            mean_left, mean_right, distance, std_deviation, angle, current
        );

        Measurement {
            angle_deg: angle,
            distance_mm: distance,
            std_deviation_mm: std_deviation,
            current_a: current,
        }
    }
}
