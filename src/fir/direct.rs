use crate::error::Result;
use crate::fir::{CoefficientSet, DelayLine, FirEngine};

/// Direct-form FIR engine
///
/// Writes each input into the delay line and computes
/// `y[n] = sum(taps[k] * x[n-k])` by walking the history newest first.
/// N multiply-adds per sample. This is the reference the other engines are
/// checked against.
pub struct DirectFir {
    coeffs: CoefficientSet,
    delay_line: DelayLine,
}

impl DirectFir {
    /// Create a direct-form engine with a zeroed history of `coeffs.len()`
    pub fn new(coeffs: CoefficientSet) -> Result<Self> {
        Ok(Self {
            delay_line: DelayLine::new(coeffs.len())?,
            coeffs,
        })
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.delay_line
    }
}

impl FirEngine for DirectFir {
    #[inline]
    fn step(&mut self, sample: f32) -> f32 {
        self.delay_line.write(sample);
        self.coeffs
            .taps()
            .iter()
            .zip(self.delay_line.newest_first())
            .fold(0.0f32, |acc, (&tap, x)| acc + tap * x)
    }

    fn num_taps(&self) -> usize {
        self.coeffs.len()
    }

    fn reset(&mut self) {
        self.delay_line.clear();
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
