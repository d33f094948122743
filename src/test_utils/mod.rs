use crate::fir::FirEngine;

/// Unit impulse followed by zeros
pub fn impulse(len: usize) -> Vec<f32> {
    let mut samples = vec![0.0; len];
    if let Some(first) = samples.first_mut() {
        *first = 1.0;
    }
    samples
}

/// Deterministic broadband test signal in [-1, 1]
pub fn test_signal(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32;
            0.5 * (0.05 * t).sin() + 0.3 * (1.3 * t).sin() + 0.2 * (2.9 * t + 0.4).cos()
        })
        .collect()
}

/// Feed `input` through `engine` one sample at a time
pub fn run(engine: &mut dyn FirEngine, input: &[f32]) -> Vec<f32> {
    input.iter().map(|&x| engine.step(x)).collect()
}
