use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, bounded};

use crate::config::AudioConfig;
use crate::constants::STEREO_CHANNELS;
use crate::error::{FirError, Result};
use crate::processing::BlockProcessor;

type Frame = [f32; STEREO_CHANNELS as usize];

/// Scheduling state of the thread running the output callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimePriority {
    /// No output callback has run yet
    Pending,
    Promoted,
    /// The platform refused real-time scheduling
    Unavailable,
}

impl RealtimePriority {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Promoted,
            2 => Self::Unavailable,
            _ => Self::Pending,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Promoted => 1,
            Self::Unavailable => 2,
        }
    }
}

/// Hand-off underrun/overrun counters
///
/// Written by the audio callbacks, read by the control thread. Callbacks
/// never log; these counters are how trouble surfaces.
#[derive(Debug, Default)]
pub struct XrunCounters {
    dropped_frames: AtomicU64,
    starved_frames: AtomicU64,
    realtime: AtomicU8,
}

impl XrunCounters {
    /// Input frames discarded because the output side fell behind
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames.load(Ordering::Relaxed)
    }

    /// Output frames filled with silence because no input was ready
    pub fn starved_frames(&self) -> u64 {
        self.starved_frames.load(Ordering::Relaxed)
    }

    pub fn realtime_priority(&self) -> RealtimePriority {
        RealtimePriority::from_u8(self.realtime.load(Ordering::Relaxed))
    }

    fn set_realtime_priority(&self, state: RealtimePriority) {
        self.realtime.store(state.as_u8(), Ordering::Relaxed);
    }
}

/// Full-duplex stereo stream running a [`BlockProcessor`]
///
/// The input callback forwards frames through a bounded channel sized
/// before the streams start; the output callback pulls them and runs the
/// processor over each host block in place. Neither callback allocates or
/// blocks.
pub struct AudioDuplex {
    input: cpal::Stream,
    output: cpal::Stream,
    sample_rate: u32,
    counters: Arc<XrunCounters>,
}

impl AudioDuplex {
    /// Open the default input and output devices and start streaming
    ///
    /// Stream errors reported by the host are forwarded on `shutdown_tx`;
    /// the owner is expected to stop once one arrives.
    pub fn new(
        config: &AudioConfig,
        processor: BlockProcessor,
        shutdown_tx: Sender<FirError>,
    ) -> Result<Self> {
        let host = cpal::default_host();

        let input_device = host
            .default_input_device()
            .ok_or_else(|| FirError::AudioDevice("No input device found".into()))?;
        let output_device = host
            .default_output_device()
            .ok_or_else(|| FirError::AudioDevice("No output device found".into()))?;

        match input_device.description() {
            Ok(desc) => log::info!("Input device: {:?}", desc),
            Err(_) => log::info!("Input device: Unknown"),
        }
        match output_device.description() {
            Ok(desc) => log::info!("Output device: {:?}", desc),
            Err(_) => log::info!("Output device: Unknown"),
        }

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size as u32),
        };

        let (frame_tx, frame_rx) = bounded::<Frame>(config.buffer_size * config.handoff_blocks);
        let counters = Arc::new(XrunCounters::default());

        let input = input_device
            .build_input_stream(
                &stream_config,
                input_callback(frame_tx, Arc::clone(&counters)),
                error_callback(shutdown_tx.clone()),
                None,
            )
            .map_err(|e| FirError::AudioStream(format!("{}", e)))?;

        let output = output_device
            .build_output_stream(
                &stream_config,
                output_callback(
                    frame_rx,
                    processor,
                    config.buffer_size as u32,
                    config.sample_rate,
                    Arc::clone(&counters),
                ),
                error_callback(shutdown_tx),
                None,
            )
            .map_err(|e| FirError::AudioStream(format!("{}", e)))?;

        output
            .play()
            .map_err(|e| FirError::AudioStream(format!("{}", e)))?;
        input
            .play()
            .map_err(|e| FirError::AudioStream(format!("{}", e)))?;

        Ok(Self {
            input,
            output,
            sample_rate: config.sample_rate,
            counters,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn counters(&self) -> &XrunCounters {
        &self.counters
    }
}

impl Drop for AudioDuplex {
    fn drop(&mut self) {
        let _ = self.input.pause();
        let _ = self.output.pause();
    }
}

fn input_callback(
    tx: Sender<Frame>,
    counters: Arc<XrunCounters>,
) -> impl FnMut(&[f32], &cpal::InputCallbackInfo) + Send + 'static {
    move |data: &[f32], _: &cpal::InputCallbackInfo| {
        let dropped = push_frames(&tx, data);
        if dropped > 0 {
            counters.dropped_frames.fetch_add(dropped, Ordering::Relaxed);
        }
    }
}

/// Queue every whole frame of `data`, returning how many did not fit
fn push_frames(tx: &Sender<Frame>, data: &[f32]) -> u64 {
    let mut dropped = 0;
    for frame in data.chunks_exact(STEREO_CHANNELS as usize) {
        let mut sent: Frame = [0.0; STEREO_CHANNELS as usize];
        sent.copy_from_slice(frame);
        if tx.try_send(sent).is_err() {
            dropped += 1;
        }
    }
    dropped
}

/// Fill `data` with queued frames, returning how many were silence
fn pull_frames(rx: &Receiver<Frame>, data: &mut [f32]) -> u64 {
    let mut starved = 0;
    for frame in data.chunks_exact_mut(STEREO_CHANNELS as usize) {
        let received = rx.try_recv().unwrap_or_else(|_| {
            starved += 1;
            [0.0; STEREO_CHANNELS as usize]
        });
        frame.copy_from_slice(&received);
    }
    starved
}

fn output_callback(
    rx: Receiver<Frame>,
    mut processor: BlockProcessor,
    buffer_frames: u32,
    sample_rate: u32,
    counters: Arc<XrunCounters>,
) -> impl FnMut(&mut [f32], &cpal::OutputCallbackInfo) + Send + 'static {
    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
        // The filter runs on this thread, so promote it on the first block
        if counters.realtime_priority() == RealtimePriority::Pending {
            let state = match audio_thread_priority::promote_current_thread_to_real_time(
                buffer_frames,
                sample_rate,
            ) {
                Ok(_) => RealtimePriority::Promoted,
                Err(_) => RealtimePriority::Unavailable,
            };
            counters.set_realtime_priority(state);
        }

        let starved = pull_frames(&rx, data);
        if starved > 0 {
            counters.starved_frames.fetch_add(starved, Ordering::Relaxed);
        }
        processor.process_interleaved(data);
    }
}

fn error_callback(tx: Sender<FirError>) -> impl FnMut(cpal::StreamError) + Send + 'static {
    move |err| {
        let _ = tx.try_send(FirError::AudioStream(format!("{}", err)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChannelRole, FilterVariant};
    use crate::fir::CoefficientSet;

    #[test]
    fn test_realtime_priority_state_round_trips() {
        let counters = XrunCounters::default();
        assert_eq!(counters.realtime_priority(), RealtimePriority::Pending);
        counters.set_realtime_priority(RealtimePriority::Unavailable);
        assert_eq!(counters.realtime_priority(), RealtimePriority::Unavailable);
    }

    #[test]
    fn test_full_handoff_drops_frames() {
        let (tx, rx) = bounded::<Frame>(2);
        assert_eq!(push_frames(&tx, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]), 1);
        assert_eq!(rx.try_recv().unwrap(), [0.1, 0.2]);
        assert_eq!(rx.try_recv().unwrap(), [0.3, 0.4]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_empty_handoff_starves_with_silence() {
        let (tx, rx) = bounded::<Frame>(4);
        tx.try_send([0.7, -0.7]).unwrap();

        let mut data = [9.0; 6];
        assert_eq!(pull_frames(&rx, &mut data), 2);
        assert_eq!(data, [0.7, -0.7, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_handoff_feeds_processor() {
        let (tx, rx) = bounded::<Frame>(8);
        let coeffs = CoefficientSet::from_taps(vec![0.5]);
        let mut processor =
            BlockProcessor::with_variant(FilterVariant::Direct, &coeffs, ChannelRole::Left);

        push_frames(&tx, &[1.0, 0.3, -1.0, 0.6]);
        let mut data = [0.0; 4];
        assert_eq!(pull_frames(&rx, &mut data), 0);
        processor.process_interleaved(&mut data);

        assert_eq!(data, [0.5, 0.3, -0.5, 0.6]);
    }
}
