pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod fir;
pub mod processing;
pub mod wav;

#[cfg(test)]
mod test_utils;

pub use config::{FilterVariant, RtFirConfig};
pub use error::{FirError, Result};
pub use fir::{CoefficientSet, FirEngine};
pub use processing::BlockProcessor;
pub use wav::save_wav;
