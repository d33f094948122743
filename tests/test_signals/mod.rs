pub mod generate;

pub use generate::{impulse, interleave, noise, symmetric_taps, tone};
