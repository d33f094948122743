pub mod duplex;
pub mod offline;
pub mod source;

pub use duplex::{AudioDuplex, RealtimePriority, XrunCounters};
pub use offline::{OfflineSummary, filter_wav_file};
pub use source::WavFileSource;
