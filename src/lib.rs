//! Lenia - Continuous cellular automata on a toroidal grid.
//!
//! This crate provides the simulation core of Lenia: a square world of
//! real-valued cells in [0, 1], evolved by convolving it with a kernel and
//! feeding the resulting potential through a Gaussian growth function.
//!
//! # Architecture
//!
//! - `schema`: Configuration types and parameter constants
//! - `compute`: Numerical computation (kernels, growth, convolution, engine)
//! - `snapshot`: Binary save/load of the current world
//!
//! The engine does no rendering and no input handling. A frontend calls
//! setters in response to user actions, then `update()` once per frame, then
//! reads `world()` for display.
//!
//! # Example
//!
//! ```rust,no_run
//! use lenia::{
//!     compute::Lenia,
//!     schema::{KernelShape, SimulationConfig},
//! };
//!
//! let config = SimulationConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let mut engine = Lenia::from_config(&config).unwrap();
//!
//! engine.set_kernel_shape(KernelShape::Ring);
//! engine.set_kernel_radius(20);
//! engine.run(100);
//!
//! println!("Total mass after 100 steps: {}", engine.stats().total_mass);
//! ```

pub mod compute;
pub mod schema;
pub mod snapshot;

// Re-export commonly used types
pub use compute::{Lenia, Parameters, SimulationStats};
pub use schema::{ConvolutionBackend, KernelShape, SimulationConfig};
