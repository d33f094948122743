use crate::config::FilterVariant;
use crate::error::Result;
use crate::fir::{CoefficientSet, DirectFir, SymmetricFir, TransposedFir};

/// Common interface of the FIR engine variants
///
/// An engine is fully sized by its constructor. `step` never allocates,
/// locks or fails, so it can run inside a real-time audio callback.
pub trait FirEngine: Send {
    /// Consume one input sample and produce one output sample
    fn step(&mut self, sample: f32) -> f32;

    /// Filter a buffer of samples in-place
    fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.step(*sample);
        }
    }

    /// Number of taps the engine convolves with
    fn num_taps(&self) -> usize;

    /// Forget all past input, as if freshly constructed
    fn reset(&mut self);

    /// Short human-readable engine name
    fn name(&self) -> &'static str;
}

/// Construct the engine for `variant`
///
/// # Errors
/// Returns `FirError::Allocation` if the engine state cannot be reserved.
pub fn try_build_engine(
    variant: FilterVariant,
    coeffs: &CoefficientSet,
) -> Result<Box<dyn FirEngine>> {
    Ok(match variant {
        FilterVariant::Direct => Box::new(DirectFir::new(coeffs.clone())?),
        FilterVariant::Symmetric => Box::new(SymmetricFir::new(coeffs)?),
        FilterVariant::Transposed => Box::new(TransposedFir::new(coeffs.clone())?),
    })
}

/// Construct the engine for `variant`, degrading to silence on failure
///
/// When the state cannot be allocated the returned engine is a
/// [`SilentFir`]: the filtered channel carries zeros for the rest of the
/// run instead of taking down the audio thread.
pub fn build_engine(variant: FilterVariant, coeffs: &CoefficientSet) -> Box<dyn FirEngine> {
    engine_or_silence(variant, coeffs.len(), try_build_engine(variant, coeffs))
}

fn engine_or_silence(
    variant: FilterVariant,
    taps: usize,
    built: Result<Box<dyn FirEngine>>,
) -> Box<dyn FirEngine> {
    match built {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("{} engine unavailable, filtered channel muted: {}", variant, e);
            Box::new(SilentFir::new(taps))
        }
    }
}

/// Degraded engine that outputs silence
pub struct SilentFir {
    taps: usize,
}

impl SilentFir {
    pub fn new(taps: usize) -> Self {
        Self { taps }
    }
}

impl FirEngine for SilentFir {
    fn step(&mut self, _sample: f32) -> f32 {
        0.0
    }

    fn process_buffer(&mut self, buffer: &mut [f32]) {
        buffer.fill(0.0);
    }

    fn num_taps(&self) -> usize {
        self.taps
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "silent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FirError;

    #[test]
    fn test_build_each_variant() {
        let coeffs = CoefficientSet::load();
        for variant in FilterVariant::ALL {
            let engine = build_engine(variant, &coeffs);
            assert_eq!(engine.name(), variant.name());
            assert_eq!(engine.num_taps(), coeffs.len());
        }
    }

    #[test]
    fn test_silent_engine_outputs_zeros() {
        let mut engine = SilentFir::new(5);
        let mut buffer = vec![1.0, -0.5, 0.25];
        engine.process_buffer(&mut buffer);
        assert_eq!(buffer, vec![0.0; 3]);
        assert_eq!(engine.step(3.0), 0.0);
        assert_eq!(engine.num_taps(), 5);
    }

    #[test]
    fn test_reset_restores_initial_response() {
        let coeffs = CoefficientSet::from_taps(vec![0.5, 0.25, 0.5]);
        for variant in FilterVariant::ALL {
            let mut engine = build_engine(variant, &coeffs);
            let first: Vec<f32> = [1.0, 0.0, 0.0].iter().map(|&x| engine.step(x)).collect();
            engine.step(3.0);
            engine.reset();
            let again: Vec<f32> = [1.0, 0.0, 0.0].iter().map(|&x| engine.step(x)).collect();
            assert_eq!(first, again, "{} reset", variant);
        }
    }

    #[test]
    fn test_allocation_failure_degrades_to_silence() {
        for variant in FilterVariant::ALL {
            let failed = Err(FirError::Allocation { taps: usize::MAX });
            let mut engine = engine_or_silence(variant, 51, failed);
            assert_eq!(engine.name(), "silent");
            assert_eq!(engine.num_taps(), 51);
            assert!([1.0, -0.5, 0.25].iter().all(|&x| engine.step(x) == 0.0));
        }
    }

    #[test]
    fn test_successful_build_is_kept() {
        let coeffs = CoefficientSet::from_taps(vec![0.5, 0.5]);
        for variant in FilterVariant::ALL {
            let engine = engine_or_silence(variant, 2, try_build_engine(variant, &coeffs));
            assert_eq!(engine.name(), variant.name());
        }
    }
}
