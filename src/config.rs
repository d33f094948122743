//! Configuration for the rtfir stereo filter.
//!
//! Defaults live in code. A TOML file can override any of them, and the
//! command line overrides the file:
//!
//! ```toml
//! [audio]
//! sample_rate = 44100
//! buffer_size = 128
//!
//! [filter]
//! filtered_channel = "right"
//! ```
//!
//! The engine variant is never read from the file; it is chosen by the
//! selector argument for each run.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{HANDOFF_BLOCKS, STEREO_CHANNELS};
use crate::error::{FirError, Result};

/// FIR engine formulation
///
/// All three produce the same output for symmetric coefficient sets; they
/// differ in memory access pattern and multiply count.
///
/// # Parsing formats
/// - `0` or `direct`
/// - `1` or `symmetric`
/// - `2` or `transposed`
///
/// # Example
/// ```
/// use rtfir::config::FilterVariant;
///
/// let variant: FilterVariant = "1".parse().unwrap();
/// assert_eq!(variant, FilterVariant::Symmetric);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterVariant {
    /// Convolution sum over the delay line, newest sample first
    #[default]
    Direct,
    /// Paired taps for linear-phase coefficient sets (half the multiplies)
    Symmetric,
    /// Transposed direct form II, running accumulators instead of history
    Transposed,
}

impl FilterVariant {
    pub const ALL: [FilterVariant; 3] = [
        FilterVariant::Direct,
        FilterVariant::Symmetric,
        FilterVariant::Transposed,
    ];

    /// Numeric selector accepted on the command line
    pub fn selector(&self) -> u8 {
        match self {
            FilterVariant::Direct => 0,
            FilterVariant::Symmetric => 1,
            FilterVariant::Transposed => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterVariant::Direct => "direct",
            FilterVariant::Symmetric => "symmetric",
            FilterVariant::Transposed => "transposed",
        }
    }
}

impl fmt::Display for FilterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "direct" => Ok(FilterVariant::Direct),
            "1" | "symmetric" => Ok(FilterVariant::Symmetric),
            "2" | "transposed" => Ok(FilterVariant::Transposed),
            _ => Err(format!(
                "invalid filter variant: {} (expected 0=direct, 1=symmetric, 2=transposed)",
                s
            )),
        }
    }
}

/// Channel assignment for stereo input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelRole {
    /// Left channel (index 0 in interleaved stereo)
    Left,
    /// Right channel (index 1 in interleaved stereo)
    Right,
}

impl ChannelRole {
    /// Position of this channel inside an interleaved stereo frame
    pub fn index(&self) -> usize {
        match self {
            ChannelRole::Left => 0,
            ChannelRole::Right => 1,
        }
    }

    /// The other channel of the stereo pair
    pub fn companion(&self) -> ChannelRole {
        match self {
            ChannelRole::Left => ChannelRole::Right,
            ChannelRole::Right => ChannelRole::Left,
        }
    }
}

/// System-wide configuration
///
/// # Example
/// ```
/// use rtfir::config::{ChannelRole, RtFirConfig};
///
/// let mut config = RtFirConfig::default();
/// config.filter.filtered_channel = ChannelRole::Right;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RtFirConfig {
    /// Audio device configuration
    pub audio: AudioConfig,
    /// Filter routing configuration
    pub filter: FilterConfig,
}

/// Audio device configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Requested sample rate in Hz
    pub sample_rate: u32,
    /// Host block size in frames
    pub buffer_size: usize,
    /// Number of audio channels (must be 2)
    pub channels: u16,
    /// Host blocks buffered between the input and output callbacks
    pub handoff_blocks: usize,
}

/// Filter routing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Engine variant, set from the command line selector
    #[serde(skip)]
    pub variant: FilterVariant,
    /// Channel that runs through the FIR engine; the other is copied through
    pub filtered_channel: ChannelRole,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 256,
            channels: STEREO_CHANNELS,
            handoff_blocks: HANDOFF_BLOCKS,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            variant: FilterVariant::Direct,
            // Left channel is filtered, right channel passes through
            filtered_channel: ChannelRole::Left,
        }
    }
}

impl RtFirConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FirError::Config(format!("{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Reject settings the processing loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.audio.channels != STEREO_CHANNELS {
            return Err(FirError::Config(format!(
                "expected {} channels, got {}",
                STEREO_CHANNELS, self.audio.channels
            )));
        }
        if self.audio.sample_rate == 0 {
            return Err(FirError::Config("sample rate must be positive".into()));
        }
        if self.audio.buffer_size == 0 {
            return Err(FirError::Config("buffer size must be positive".into()));
        }
        if self.audio.handoff_blocks == 0 {
            return Err(FirError::Config("handoff_blocks must be positive".into()));
        }
        Ok(())
    }
}
