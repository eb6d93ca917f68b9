//! Per-cycle raw amplitude buffers
//!
//! Written by the sequencer once per completed acquisition, read by the
//! analytics engine after the last cycle of a run. A new run overwrites the
//! slots from index 0, so no explicit clearing is needed.

use crate::amplitude::ChannelPair;
use crate::config::params::CYCLE_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleBuffers {
    wpc_left: [f32; CYCLE_CAPACITY],
    wpc_right: [f32; CYCLE_CAPACITY],
    hall_left: [f32; CYCLE_CAPACITY],
    hall_right: [f32; CYCLE_CAPACITY],
}

impl Default for CycleBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleBuffers {
    pub const fn new() -> Self {
        Self {
            wpc_left: [0.0; CYCLE_CAPACITY],
            wpc_right: [0.0; CYCLE_CAPACITY],
            hall_left: [0.0; CYCLE_CAPACITY],
            hall_right: [0.0; CYCLE_CAPACITY],
        }
    }

    /// Number of cycles the buffers can hold
    pub const fn capacity(&self) -> usize {
        CYCLE_CAPACITY
    }

    /// Store the WPC amplitudes of a cycle
    ///
    /// Indices beyond the capacity are ignored.
    pub fn record_wpc(&mut self, cycle: usize, amplitudes: ChannelPair) {
        if cycle < CYCLE_CAPACITY {
            self.wpc_left[cycle] = amplitudes.left as f32;
            self.wpc_right[cycle] = amplitudes.right as f32;
        }
    }

    /// Store the Hall amplitudes of a cycle
    ///
    /// Indices beyond the capacity are ignored.
    pub fn record_hall(&mut self, cycle: usize, amplitudes: ChannelPair) {
        if cycle < CYCLE_CAPACITY {
            self.hall_left[cycle] = amplitudes.left as f32;
            self.hall_right[cycle] = amplitudes.right as f32;
        }
    }

    /// WPC left readings of the first `cycles` cycles
    pub fn wpc_left(&self, cycles: usize) -> &[f32] {
        &self.wpc_left[..cycles.min(CYCLE_CAPACITY)]
    }

    /// WPC right readings of the first `cycles` cycles
    pub fn wpc_right(&self, cycles: usize) -> &[f32] {
        &self.wpc_right[..cycles.min(CYCLE_CAPACITY)]
    }

    /// Hall left readings of the first `cycles` cycles
    pub fn hall_left(&self, cycles: usize) -> &[f32] {
        &self.hall_left[..cycles.min(CYCLE_CAPACITY)]
    }

    /// Hall right readings of the first `cycles` cycles
    pub fn hall_right(&self, cycles: usize) -> &[f32] {
        &self.hall_right[..cycles.min(CYCLE_CAPACITY)]
    }
}
