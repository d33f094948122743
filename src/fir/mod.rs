pub mod coefficients;
pub mod delay_line;
pub mod direct;
pub mod engine;
pub mod symmetric;
pub mod transposed;

pub use coefficients::CoefficientSet;
pub use delay_line::DelayLine;
pub use direct::DirectFir;
pub use engine::{FirEngine, SilentFir, build_engine, try_build_engine};
pub use symmetric::SymmetricFir;
pub use transposed::TransposedFir;
