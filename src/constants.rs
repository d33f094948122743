//! Numeric constants shared by the filter engines and the audio host.

/// Tolerance used when comparing outputs of two engine variants.
/// Summation order differs between variants, so results agree only to
/// single-precision rounding.
pub const VARIANT_TOLERANCE: f32 = 1e-5;

/// Number of host blocks the input-to-output hand-off channel can hold
/// before the input callback starts dropping samples.
pub const HANDOFF_BLOCKS: usize = 4;

/// Stereo is the only supported layout.
pub const STEREO_CHANNELS: u16 = 2;
