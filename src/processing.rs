use crate::config::{ChannelRole, FilterConfig, FilterVariant};
use crate::constants::STEREO_CHANNELS;
use crate::fir::{CoefficientSet, FirEngine, build_engine};

/// Per-block stereo router around one FIR engine
///
/// The filtered channel runs through the engine sample by sample in block
/// order. The companion channel is copied through untouched. The engine is
/// chosen at construction and never swapped.
pub struct BlockProcessor {
    engine: Box<dyn FirEngine>,
    filtered_channel: ChannelRole,
}

impl BlockProcessor {
    pub fn new(engine: Box<dyn FirEngine>, filtered_channel: ChannelRole) -> Self {
        Self {
            engine,
            filtered_channel,
        }
    }

    /// Build the configured engine over `coeffs`
    ///
    /// Falls back to a silent engine if the engine state cannot be
    /// allocated; see [`build_engine`].
    pub fn from_config(config: &FilterConfig, coeffs: &CoefficientSet) -> Self {
        Self::with_variant(config.variant, coeffs, config.filtered_channel)
    }

    pub fn with_variant(
        variant: FilterVariant,
        coeffs: &CoefficientSet,
        filtered_channel: ChannelRole,
    ) -> Self {
        Self::new(build_engine(variant, coeffs), filtered_channel)
    }

    /// Filter one channel block: `output[i] = step(input[i])`
    pub fn process_channel(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        let len = input.len().min(output.len());
        output[..len].copy_from_slice(&input[..len]);
        self.engine.process_buffer(&mut output[..len]);
    }

    /// Process one planar stereo block
    pub fn process_planar(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        let (filtered_in, filtered_out, companion_in, companion_out) = match self.filtered_channel
        {
            ChannelRole::Left => (left_in, left_out, right_in, right_out),
            ChannelRole::Right => (right_in, right_out, left_in, left_out),
        };

        self.process_channel(filtered_in, filtered_out);

        debug_assert_eq!(companion_in.len(), companion_out.len());
        let len = companion_in.len().min(companion_out.len());
        companion_out[..len].copy_from_slice(&companion_in[..len]);
    }

    /// Process an interleaved stereo block `[L, R, L, R, ...]` in place
    ///
    /// The companion samples are left exactly as they are.
    pub fn process_interleaved(&mut self, frames: &mut [f32]) {
        let filtered = self.filtered_channel.index();
        for frame in frames.chunks_exact_mut(STEREO_CHANNELS as usize) {
            frame[filtered] = self.engine.step(frame[filtered]);
        }
    }

    pub fn filtered_channel(&self) -> ChannelRole {
        self.filtered_channel
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn num_taps(&self) -> usize {
        self.engine.num_taps()
    }

    /// Clear the engine history, as before the first block
    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fir::SilentFir;
    use crate::test_utils::{impulse, test_signal};

    fn companion_signal(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i as f32 * 0.37).cos() * 0.9 + 1e-7).collect()
    }

    #[test]
    fn test_planar_filters_left_and_copies_right() {
        let coeffs = CoefficientSet::from_taps(vec![0.5, 0.5]);
        let mut processor =
            BlockProcessor::with_variant(FilterVariant::Direct, &coeffs, ChannelRole::Left);

        let left_in = [1.0, 1.0, 0.0, 0.0];
        let right_in = companion_signal(4);
        let mut left_out = [9.0; 4];
        let mut right_out = [9.0; 4];

        processor.process_planar(&left_in, &right_in, &mut left_out, &mut right_out);

        assert_eq!(left_out, [0.5, 1.0, 0.5, 0.0]);
        assert_eq!(right_out.to_vec(), right_in);
    }

    #[test]
    fn test_planar_right_channel_filtered() {
        let coeffs = CoefficientSet::from_taps(vec![2.0]);
        let mut processor =
            BlockProcessor::with_variant(FilterVariant::Transposed, &coeffs, ChannelRole::Right);

        let left_in = companion_signal(3);
        let right_in = [1.0, -1.0, 0.5];
        let mut left_out = [0.0; 3];
        let mut right_out = [0.0; 3];

        processor.process_planar(&left_in, &right_in, &mut left_out, &mut right_out);

        assert_eq!(right_out, [2.0, -2.0, 1.0]);
        assert_eq!(left_out.to_vec(), left_in);
    }

    #[test]
    fn test_state_carries_across_blocks() {
        let coeffs = CoefficientSet::from_taps(vec![0.1, 0.2, 0.3, 0.4]);
        let input = impulse(8);

        for variant in FilterVariant::ALL {
            let mut processor = BlockProcessor::with_variant(variant, &coeffs, ChannelRole::Left);
            let mut output = vec![0.0; 8];
            for (inp, out) in input.chunks(3).zip(output.chunks_mut(3)) {
                processor.process_channel(inp, out);
            }
            // Symmetric form is only defined for mirror-symmetric taps
            if variant != FilterVariant::Symmetric {
                assert_eq!(&output[..4], coeffs.taps(), "{}", variant);
            }
            assert!(output[4..].iter().all(|&y| y == 0.0), "{}", variant);
        }
    }

    #[test]
    fn test_interleaved_companion_bit_exact() {
        let coeffs = CoefficientSet::load();
        let filtered = test_signal(64);
        let companion = companion_signal(64);

        for variant in FilterVariant::ALL {
            for role in [ChannelRole::Left, ChannelRole::Right] {
                let mut processor = BlockProcessor::with_variant(variant, &coeffs, role);
                let mut frames = vec![0.0; 128];
                for i in 0..64 {
                    frames[2 * i + role.index()] = filtered[i];
                    frames[2 * i + role.companion().index()] = companion[i];
                }

                processor.process_interleaved(&mut frames);

                for i in 0..64 {
                    assert_eq!(
                        frames[2 * i + role.companion().index()].to_bits(),
                        companion[i].to_bits()
                    );
                }
            }
        }
    }

    #[test]
    fn test_silent_engine_keeps_companion() {
        let mut processor = BlockProcessor::new(Box::new(SilentFir::new(3)), ChannelRole::Left);
        let mut frames = vec![0.4, 0.6, -0.4, -0.6];
        processor.process_interleaved(&mut frames);
        assert_eq!(frames, vec![0.0, 0.6, 0.0, -0.6]);
        assert_eq!(processor.engine_name(), "silent");
    }

    #[test]
    fn test_from_config() {
        let config = FilterConfig {
            variant: FilterVariant::Symmetric,
            filtered_channel: ChannelRole::Right,
        };
        let processor = BlockProcessor::from_config(&config, &CoefficientSet::load());
        assert_eq!(processor.engine_name(), "symmetric");
        assert_eq!(processor.filtered_channel(), ChannelRole::Right);
        assert_eq!(processor.num_taps(), 51);
    }

    #[test]
    fn test_reset_between_runs() {
        let coeffs = CoefficientSet::from_taps(vec![0.25, 0.5, 0.25]);
        let input = test_signal(40);

        for variant in FilterVariant::ALL {
            let mut processor = BlockProcessor::with_variant(variant, &coeffs, ChannelRole::Left);
            let mut first = vec![0.0; 40];
            processor.process_channel(&input, &mut first);

            processor.reset();
            let mut second = vec![0.0; 40];
            processor.process_channel(&input, &mut second);

            assert_eq!(first, second, "{}", variant);
        }
    }

    #[test]
    fn test_silent_engine_planar_block() {
        let mut processor = BlockProcessor::new(Box::new(SilentFir::new(3)), ChannelRole::Right);
        let left_in = companion_signal(4);
        let mut left_out = [0.0; 4];
        let mut right_out = [9.0; 4];

        processor.process_planar(&left_in, &[1.0; 4], &mut left_out, &mut right_out);

        assert_eq!(right_out, [0.0; 4]);
        assert_eq!(left_out.to_vec(), left_in);
    }
}
