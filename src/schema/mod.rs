//! Schema module - Configuration types for Lenia simulations.

mod config;

pub use config::*;
