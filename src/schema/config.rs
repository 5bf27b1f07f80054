//! Configuration types for Lenia simulation parameters.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Growth function center used when nothing else is configured.
pub const DEFAULT_MU: f32 = 0.15;
/// Growth function spread used when nothing else is configured.
pub const DEFAULT_SIGMA: f32 = 0.015;
/// Smallest kernel radius the setters accept.
pub const MIN_KERNEL_RADIUS: usize = 1;
/// Largest kernel radius the setters accept. Larger requests are clamped so
/// the (2r+1)² kernel mask stays allocatable.
pub const MAX_KERNEL_RADIUS: usize = 1024;
/// Smallest time step the setters accept.
pub const MIN_TIMESTEP: f32 = 0.01;

/// Slider ranges offered by the reference parameter UI.
///
/// Every default lies inside its range, and each range starts at or above
/// the matching setter floor.
pub const RADIUS_RANGE: RangeInclusive<usize> = 1..=50;
pub const TIMESTEP_RANGE: RangeInclusive<f32> = 0.01..=0.2;
pub const MU_RANGE: RangeInclusive<f32> = 0.05..=0.3;
pub const SIGMA_RANGE: RangeInclusive<f32> = 0.005..=0.05;

/// Kernel shape. The set is closed; every builder matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelShape {
    /// Annulus between 0.38 and 0.62 of the radius.
    Ring,
    /// Bell with standard deviation radius / 3.
    #[default]
    Gaussian,
    /// Full (2r+1) x (2r+1) box.
    Square,
}

impl KernelShape {
    /// All shapes, in the order a UI dropdown lists them.
    pub const ALL: [KernelShape; 3] = [KernelShape::Ring, KernelShape::Gaussian, KernelShape::Square];

    pub fn name(self) -> &'static str {
        match self {
            KernelShape::Ring => "ring",
            KernelShape::Gaussian => "gaussian",
            KernelShape::Square => "square",
        }
    }
}

impl fmt::Display for KernelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized kernel shape name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown kernel shape {0:?} (expected ring, gaussian or square)")]
pub struct ParseShapeError(pub String);

impl FromStr for KernelShape {
    type Err = ParseShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KernelShape::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| ParseShapeError(s.to_string()))
    }
}

/// Which convolution algorithm backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionBackend {
    /// Direct circular convolution, O(N^2 * K^2).
    Spatial,
    /// FFT multiplication with a precomputed kernel spectrum, O(N^2 log N).
    #[default]
    Spectral,
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of the square world in cells.
    pub grid_size: usize,
    /// Kernel radius in cells.
    pub kernel_radius: usize,
    /// Integration time step.
    pub timestep: f32,
    /// Kernel shape.
    pub kernel_shape: KernelShape,
    /// Growth function: optimal potential.
    pub mu: f32,
    /// Growth function: tolerance around `mu`.
    pub sigma: f32,
    /// Convolution algorithm.
    pub backend: ConvolutionBackend,
    /// RNG seed for world initialization. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 256,
            kernel_radius: 13,
            timestep: 0.1,
            kernel_shape: KernelShape::Gaussian,
            mu: DEFAULT_MU,
            sigma: DEFAULT_SIGMA,
            backend: ConvolutionBackend::Spectral,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Total number of cells (grid_size^2).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    ///
    /// Radius and timestep below their floors are not errors: the engine
    /// clamps them the same way the live setters do.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::InvalidGridSize);
        }
        for (name, value) in [
            ("timestep", self.timestep),
            ("mu", self.mu),
            ("sigma", self.sigma),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size must be non-zero")]
    InvalidGridSize,
    #[error("Parameter {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("World has {actual} cells but the grid needs {expected}")]
    WorldSizeMismatch { expected: usize, actual: usize },
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_reference_parameters() {
        let config = SimulationConfig::default();
        assert_eq!(config.grid_size, 256);
        assert_eq!(config.kernel_radius, 13);
        assert_eq!(config.kernel_shape, KernelShape::Gaussian);
        assert_eq!(config.mu, 0.15);
        assert_eq!(config.sigma, 0.015);
        assert!((config.timestep - 0.1).abs() < 1e-9);
        assert_eq!(config.backend, ConvolutionBackend::Spectral);
    }

    #[test]
    fn test_slider_ranges_cover_defaults() {
        let config = SimulationConfig::default();
        assert!(RADIUS_RANGE.contains(&config.kernel_radius));
        assert!(TIMESTEP_RANGE.contains(&config.timestep));
        assert!(MU_RANGE.contains(&config.mu));
        assert!(SIGMA_RANGE.contains(&config.sigma));

        assert_eq!(*RADIUS_RANGE.start(), MIN_KERNEL_RADIUS);
        assert!(*RADIUS_RANGE.end() <= MAX_KERNEL_RADIUS);
        assert_eq!(*TIMESTEP_RANGE.start(), MIN_TIMESTEP);
        assert!(*SIGMA_RANGE.start() > 0.0);
    }

    #[test]
    fn test_shape_parsing() {
        assert_eq!("ring".parse::<KernelShape>(), Ok(KernelShape::Ring));
        assert_eq!("gaussian".parse::<KernelShape>(), Ok(KernelShape::Gaussian));
        assert_eq!("square".parse::<KernelShape>(), Ok(KernelShape::Square));
        assert_eq!(
            "hexagon".parse::<KernelShape>(),
            Err(ParseShapeError("hexagon".to_string()))
        );
        // Names are case-sensitive, like the dropdown values
        assert!("Ring".parse::<KernelShape>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SimulationConfig::from_json(r#"{"grid_size": 64, "kernel_shape": "ring"}"#).unwrap();
        assert_eq!(config.grid_size, 64);
        assert_eq!(config.kernel_shape, KernelShape::Ring);
        assert_eq!(config.kernel_radius, 13);
        assert_eq!(config.backend, ConvolutionBackend::Spectral);
    }

    #[test]
    fn test_json_rejects_unknown_shape() {
        let err = SimulationConfig::from_json(r#"{"kernel_shape": "hexagon"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_zero_grid() {
        let config = SimulationConfig {
            grid_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGridSize)));
    }

    #[test]
    fn test_validate_non_finite() {
        let config = SimulationConfig {
            sigma: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { name: "sigma", .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"grid_size": 32, "kernel_radius": 4, "backend": "spatial", "seed": 7}}"#
        )
        .unwrap();

        let config = SimulationConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_size, 32);
        assert_eq!(config.kernel_radius, 4);
        assert_eq!(config.backend, ConvolutionBackend::Spatial);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimulationConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
