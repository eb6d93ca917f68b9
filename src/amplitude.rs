//! Amplitude extraction from raw ADC sample blocks
//!
//! Each acquisition delivers an interleaved block `[l0, r0, l1, r1, ...]`
//! of a sine-like signal centred on ADC mid-scale. The amplitude of each
//! channel is estimated with a trimmed peak detector: the lowest samples are
//! mirrored onto the high side, averaged together with the highest samples,
//! and the mid-scale offset is removed.

use crate::config::params::{
    ADC_MAX_VALUE, ADC_MID_SCALE, MAX_SAMPLES_PER_CHANNEL, TRIM_COUNT,
};
use crate::error::{Error, Result};

/// Signed value per channel of a left/right sensor pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelPair {
    pub left: i32,
    pub right: i32,
}

impl ChannelPair {
    pub const fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }
}

/// Trimmed peak detector
#[derive(Debug, Clone, Copy)]
pub struct AmplitudeExtractor {
    /// Samples taken from each end of the sorted block
    edge_count: usize,
    /// Largest ADC code, used to mirror troughs onto crests
    max_code: i32,
    /// ADC code of zero signal
    mid_scale: i32,
}

impl Default for AmplitudeExtractor {
    fn default() -> Self {
        Self::new(TRIM_COUNT, ADC_MAX_VALUE, ADC_MID_SCALE)
    }
}

impl AmplitudeExtractor {
    /// Create an extractor
    ///
    /// # Arguments
    /// * `edge_count` - Number of lowest and highest samples averaged (at least 1)
    /// * `max_code` - Maximum ADC output code
    /// * `mid_scale` - ADC code of the signal centre
    pub fn new(edge_count: usize, max_code: i32, mid_scale: i32) -> Self {
        Self {
            edge_count: edge_count.max(1),
            max_code,
            mid_scale,
        }
    }

    /// Minimum samples per channel the extractor accepts
    pub fn min_samples(&self) -> usize {
        2 * self.edge_count
    }

    /// Extract one amplitude per channel from an interleaved block
    ///
    /// # Arguments
    /// * `samples` - Interleaved left/right ADC codes
    ///
    /// # Returns
    /// * `Ok(ChannelPair)` with the signed amplitudes in ADC codes
    /// * `Err(Error)` if the block is unpaired, too short or too long
    pub fn extract(&self, samples: &[u16]) -> Result<ChannelPair> {
        if samples.len() % 2 != 0 {
            return Err(Error::UnpairedSamples { len: samples.len() });
        }

        let per_channel = samples.len() / 2;
        if per_channel < self.min_samples() {
            return Err(Error::InsufficientSamples {
                available: per_channel,
                required: self.min_samples(),
            });
        }
        if per_channel > MAX_SAMPLES_PER_CHANNEL {
            return Err(Error::TooManySamples {
                available: per_channel,
                capacity: MAX_SAMPLES_PER_CHANNEL,
            });
        }

        let mut left = [0u16; MAX_SAMPLES_PER_CHANNEL];
        let mut right = [0u16; MAX_SAMPLES_PER_CHANNEL];
        for (i, pair) in samples.chunks_exact(2).enumerate() {
            left[i] = pair[0];
            right[i] = pair[1];
        }

        let amplitudes = ChannelPair {
            left: self.channel_amplitude(&mut left[..per_channel]),
            right: self.channel_amplitude(&mut right[..per_channel]),
        };

        trace!(
            "Amplitude: left={}, right={} ({} samples/channel)",
            amplitudes.left,
            amplitudes.right,
            per_channel
        );

        Ok(amplitudes)
    }

    /// Amplitude of a single channel, sorts `channel` in place
    fn channel_amplitude(&self, channel: &mut [u16]) -> i32 {
        channel.sort_unstable();

        let n = self.edge_count;
        let len = channel.len();

        // Mirror troughs across mid-scale onto the crest side
        let troughs: i32 = channel[..n]
            .iter()
            .map(|&v| self.max_code - v as i32)
            .sum();
        let crests: i32 = channel[len - n..].iter().map(|&v| v as i32).sum();

        (troughs + crests) / (2 * n) as i32 - self.mid_scale
    }
}
