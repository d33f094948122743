use crate::error::Result;
use crate::fir::delay_line::try_zeroed;
use crate::fir::{CoefficientSet, FirEngine};

/// Transposed direct form II FIR engine
///
/// Keeps no sample history. Instead `state[k]` holds the partial sum of
/// taps k+1..N-1 applied to inputs that have not yet reached the output:
///
/// ```text
/// y        = taps[0] * x + state[0]
/// state[k] = taps[k+1] * x + state[k+1]     (previous state values)
/// state[N-2] = taps[N-1] * x
/// ```
pub struct TransposedFir {
    coeffs: CoefficientSet,
    /// N-1 accumulators, empty when N <= 1
    state: Vec<f32>,
}

impl TransposedFir {
    /// Create a transposed engine with zeroed accumulators
    pub fn new(coeffs: CoefficientSet) -> Result<Self> {
        let state = try_zeroed(coeffs.len().saturating_sub(1), coeffs.len())?;
        Ok(Self { coeffs, state })
    }

    pub fn state(&self) -> &[f32] {
        &self.state
    }
}

impl FirEngine for TransposedFir {
    #[inline]
    fn step(&mut self, sample: f32) -> f32 {
        let taps = self.coeffs.taps();
        let Some((&first, rest)) = taps.split_first() else {
            return 0.0;
        };

        let Some(&head) = self.state.first() else {
            return first * sample;
        };
        let y = first * sample + head;

        // Shift the accumulators down one slot, then add this sample's
        // contribution. Every right-hand side reads the previous state.
        self.state.copy_within(1.., 0);
        if let Some(last) = self.state.last_mut() {
            *last = 0.0;
        }
        for (s, &tap) in self.state.iter_mut().zip(rest) {
            *s += tap * sample;
        }

        y
    }

    fn num_taps(&self) -> usize {
        self.coeffs.len()
    }

    fn reset(&mut self) {
        self.state.fill(0.0);
    }

    fn name(&self) -> &'static str {
        "transposed"
    }
}
