use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::PI;

/// Unit impulse followed by zeros
pub fn impulse(len: usize) -> Vec<f32> {
    let mut samples = vec![0.0; len];
    if let Some(first) = samples.first_mut() {
        *first = 1.0;
    }
    samples
}

/// Sine tone of `freq_hz` at `sample_rate`
pub fn tone(len: usize, freq_hz: f32, sample_rate: f32, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
        .collect()
}

/// Uniform noise in [-1, 1), reproducible for a given seed
pub fn noise(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.random::<f32>() * 2.0 - 1.0)
        .collect()
}

/// Random mirror-symmetric taps of length `n`
pub fn symmetric_taps(n: usize, seed: u64) -> Vec<f32> {
    let half = noise(n.div_ceil(2), seed);
    (0..n)
        .map(|k| half[k.min(n - 1 - k)] * 0.5)
        .collect()
}

/// Interleave two equal-length channels as [L, R, L, R, ...]
pub fn interleave(left: &[f32], right: &[f32]) -> Vec<f32> {
    left.iter()
        .zip(right)
        .flat_map(|(&l, &r)| [l, r])
        .collect()
}
