use crate::error::Result;
use crate::fir::delay_line::try_zeroed;
use crate::fir::{CoefficientSet, DelayLine, FirEngine};

/// Linear-phase FIR engine with paired taps
///
/// Precondition: the coefficient set is mirror symmetric,
/// `taps[k] == taps[N-1-k]`. The engine does not check this. With it, each
/// pair of samples sharing a coefficient is summed before a single
/// multiply, halving the multiply count of [`DirectFir`](super::DirectFir):
///
/// ```text
/// y[n] = sum_{k < N/2} taps[k] * (x[n-k] + x[n-(N-1-k)])
///        + taps[(N-1)/2] * x[n-(N-1)/2]        (odd N only)
/// ```
///
/// Asymmetric coefficients give output that differs from the direct form.
pub struct SymmetricFir {
    /// First ceil(N/2) taps; the rest are implied by symmetry
    half_taps: Vec<f32>,
    num_taps: usize,
    delay_line: DelayLine,
}

impl SymmetricFir {
    /// Create a paired-tap engine, deriving the half tap table from `coeffs`
    pub fn new(coeffs: &CoefficientSet) -> Result<Self> {
        let n = coeffs.len();
        let half_len = n.div_ceil(2);

        let mut half_taps = try_zeroed(half_len, n)?;
        half_taps.copy_from_slice(&coeffs.taps()[..half_len]);

        Ok(Self {
            half_taps,
            num_taps: n,
            delay_line: DelayLine::new(n)?,
        })
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.delay_line
    }
}

impl FirEngine for SymmetricFir {
    #[inline]
    fn step(&mut self, sample: f32) -> f32 {
        self.delay_line.write(sample);

        let pairs = self.num_taps / 2;
        let mut acc = self
            .half_taps
            .iter()
            .zip(self.delay_line.newest_first().zip(self.delay_line.oldest_first()))
            .take(pairs)
            .fold(0.0f32, |acc, (&tap, (recent, old))| acc + tap * (recent + old));

        // Odd length: unpaired center tap
        if !self.num_taps.is_multiple_of(2) {
            acc += self.half_taps[pairs] * self.delay_line.read_relative(pairs);
        }

        acc
    }

    fn num_taps(&self) -> usize {
        self.num_taps
    }

    fn reset(&mut self) {
        self.delay_line.clear();
    }

    fn name(&self) -> &'static str {
        "symmetric"
    }
}
