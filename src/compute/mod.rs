//! Compute module - Numerical computation for Lenia.

mod convolution;
mod direct_convolution;
mod engine;
mod fft;
mod growth;
mod kernel;

pub use convolution::*;
pub use direct_convolution::*;
pub use engine::*;
pub use fft::*;
pub use growth::*;
pub use kernel::*;
