use std::path::Path;

use super::WavFileSource;
use crate::error::Result;
use crate::processing::BlockProcessor;
use crate::wav::save_wav;

/// Outcome of filtering one file
#[derive(Debug, Clone, Copy)]
pub struct OfflineSummary {
    pub frames: usize,
    pub blocks: usize,
    pub sample_rate: u32,
}

/// Run `processor` over a stereo WAV file block by block
///
/// Blocks are `frames_per_block` frames long, the same framing the live
/// host uses, so the output matches what a live run would have produced.
/// The processor is reset first, so every file is filtered from silence.
pub fn filter_wav_file<P: AsRef<Path>, Q: AsRef<Path>>(
    processor: &mut BlockProcessor,
    input: P,
    output: Q,
    frames_per_block: usize,
) -> Result<OfflineSummary> {
    let mut source = WavFileSource::new(input.as_ref(), frames_per_block)?;
    let sample_rate = source.sample_rate();
    let frames = source.frames();

    log::info!(
        "Filtering {} ({} frames at {} Hz) with the {} engine",
        input.as_ref().display(),
        frames,
        sample_rate,
        processor.engine_name()
    );

    processor.reset();
    let mut blocks = 0;
    while let Some(block) = source.next_block() {
        processor.process_interleaved(block);
        blocks += 1;
    }

    save_wav(output.as_ref(), &source.into_samples(), sample_rate)?;
    log::info!("Wrote {}", output.as_ref().display());

    Ok(OfflineSummary {
        frames,
        blocks,
        sample_rate,
    })
}
