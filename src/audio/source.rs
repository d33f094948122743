use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::WavReader;

use crate::constants::STEREO_CHANNELS;
use crate::error::{FirError, Result};

/// Stereo WAV file delivered in fixed-size interleaved blocks
///
/// Stands in for the live host when filtering a recording offline.
pub struct WavFileSource {
    samples: Vec<f32>,
    position: usize,
    /// Block length in interleaved samples (frames x 2)
    chunk_size: usize,
    sample_rate: u32,
}

impl WavFileSource {
    /// Open a stereo WAV file, yielding blocks of `frames_per_block` frames
    pub fn new<P: AsRef<Path>>(path: P, frames_per_block: usize) -> Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if spec.channels != STEREO_CHANNELS {
            return Err(FirError::Config(format!(
                "Expected stereo WAV file, got {} channels",
                spec.channels
            )));
        }

        let sample_rate = spec.sample_rate;
        let samples = Self::read_samples(reader, &spec)?;

        Ok(Self {
            samples,
            position: 0,
            chunk_size: frames_per_block.max(1) * STEREO_CHANNELS as usize,
            sample_rate,
        })
    }

    fn read_samples(
        mut reader: WavReader<BufReader<File>>,
        spec: &hound::WavSpec,
    ) -> Result<Vec<f32>> {
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<std::result::Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                // i64 so 32-bit files do not overflow the full-scale value
                let max_val = (1_i64 << spec.bits_per_sample.saturating_sub(1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<std::result::Result<_, _>>()?
            }
        };
        Ok(samples)
    }

    /// Next interleaved block, or `None` at end of file
    ///
    /// The last block may be shorter than the others.
    pub fn next_block(&mut self) -> Option<&mut [f32]> {
        if self.position >= self.samples.len() {
            return None;
        }

        let start = self.position;
        let end = (start + self.chunk_size).min(self.samples.len());
        self.position = end;

        Some(&mut self.samples[start..end])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of stereo frames in the file
    pub fn frames(&self) -> usize {
        self.samples.len() / STEREO_CHANNELS as usize
    }

    /// All samples, including any processed in place so far
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
