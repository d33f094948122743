use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not allocate filter state for {taps} taps")]
    Allocation { taps: usize },

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FirError>;
