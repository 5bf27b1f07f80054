//! Lenia engine - Main simulation driver.
//!
//! Owns the world grid, the live parameter set and the kernel derived from
//! it. Every step runs convolve -> grow -> integrate -> clamp.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use super::{ConvolutionStrategy, Kernel, growth_grid_inplace, integrate_clamped, strategy_for};
use crate::schema::{
    ConfigError, ConvolutionBackend, KernelShape, MAX_KERNEL_RADIUS, MIN_KERNEL_RADIUS,
    MIN_TIMESTEP, SimulationConfig,
};

/// Live-tunable simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Kernel radius in cells, within `MIN_KERNEL_RADIUS..=MAX_KERNEL_RADIUS`.
    pub kernel_radius: usize,
    /// Integration time step, never below 0.01.
    pub timestep: f32,
    /// Shape the kernel is built with.
    pub kernel_shape: KernelShape,
    /// Growth center.
    pub mu: f32,
    /// Growth spread. Expected positive; not enforced.
    pub sigma: f32,
}

impl Parameters {
    fn from_config(config: &SimulationConfig) -> Self {
        Self {
            kernel_radius: config
                .kernel_radius
                .clamp(MIN_KERNEL_RADIUS, MAX_KERNEL_RADIUS),
            timestep: config.timestep.max(MIN_TIMESTEP),
            kernel_shape: config.kernel_shape,
            mu: config.mu,
            sigma: config.sigma,
        }
    }
}

/// Lenia simulation engine.
///
/// Parameter setters never fail: out-of-range values are clamped and unknown
/// shape names are ignored.
pub struct Lenia {
    grid_size: usize,
    /// Row-major world, every cell in [0, 1].
    world: Vec<f32>,
    params: Parameters,
    kernel: Kernel,
    strategy: Box<dyn ConvolutionStrategy>,
    /// Pre-allocated buffer for potential and growth (reused each step).
    potential: Vec<f32>,
    rng: StdRng,
    step: u64,
}

impl Lenia {
    /// Create an engine with a random world and default growth parameters.
    ///
    /// Uses the spectral backend and an entropy-seeded RNG.
    ///
    /// # Panics
    /// If `grid_size` is zero.
    pub fn new(grid_size: usize, initial_radius: usize, initial_timestep: f32) -> Self {
        let config = SimulationConfig {
            grid_size,
            kernel_radius: initial_radius,
            timestep: initial_timestep,
            ..Default::default()
        };
        Self::from_config(&config).expect("Invalid configuration")
    }

    /// Create an engine from configuration, seeding the world randomly.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let world = random_world(&mut rng, config.cell_count());

        Ok(Self::assemble(config, world, rng))
    }

    /// Create an engine from configuration with an explicit initial world.
    ///
    /// Values are clamped into [0, 1].
    pub fn with_world(config: &SimulationConfig, world: Vec<f32>) -> Result<Self, ConfigError> {
        config.validate()?;
        check_world_len(config.cell_count(), world.len())?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut engine = Self::assemble(config, world, rng);
        clamp_unit(&mut engine.world);
        Ok(engine)
    }

    fn assemble(config: &SimulationConfig, world: Vec<f32>, rng: StdRng) -> Self {
        let params = Parameters::from_config(config);
        let kernel = Kernel::build(params.kernel_radius, params.kernel_shape);
        let strategy = strategy_for(config.backend, config.grid_size, &kernel);

        log::debug!(
            "Lenia engine: {}x{} grid, {:?} backend, {} kernel r={}",
            config.grid_size,
            config.grid_size,
            config.backend,
            params.kernel_shape,
            params.kernel_radius
        );

        Self {
            grid_size: config.grid_size,
            potential: vec![0.0f32; world.len()],
            world,
            params,
            kernel,
            strategy,
            rng,
            step: 0,
        }
    }

    /// Perform one simulation step.
    pub fn update(&mut self) {
        let Parameters {
            timestep, mu, sigma, ..
        } = self.params;

        // 1. Potential field
        self.strategy.potential_into(&self.world, &mut self.potential);
        // 2. Growth, in place over the potential buffer
        growth_grid_inplace(&mut self.potential, mu, sigma);
        // 3. Integrate and clamp
        integrate_clamped(&mut self.world, &self.potential, timestep);

        self.step += 1;
    }

    /// Run simulation for specified number of steps.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.update();
        }
    }

    /// Current world, row-major, `grid_size * grid_size` cells.
    #[inline]
    pub fn world(&self) -> &[f32] {
        &self.world
    }

    /// Value at (x, y), wrapping toroidally.
    #[inline]
    pub fn cell(&self, x: i64, y: i64) -> f32 {
        let n = self.grid_size as i64;
        self.world[(y.rem_euclid(n) * n + x.rem_euclid(n)) as usize]
    }

    /// Replace the world wholesale, clamping values into [0, 1].
    ///
    /// Parameters and kernel are untouched.
    pub fn replace_world(&mut self, world: Vec<f32>) -> Result<(), ConfigError> {
        check_world_len(self.world.len(), world.len())?;
        self.world = world;
        clamp_unit(&mut self.world);
        Ok(())
    }

    /// Refill the world with uniform [0, 1) noise. Parameters are untouched.
    pub fn randomize_world(&mut self) {
        self.world = random_world(&mut self.rng, self.world.len());
    }

    /// Set kernel radius, clamped into `MIN_KERNEL_RADIUS..=MAX_KERNEL_RADIUS`,
    /// and rebuild the kernel.
    pub fn set_kernel_radius(&mut self, radius: i64) {
        let radius = radius.max(MIN_KERNEL_RADIUS as i64);
        self.params.kernel_radius =
            usize::try_from(radius).map_or(MAX_KERNEL_RADIUS, |r| r.min(MAX_KERNEL_RADIUS));
        self.rebuild_kernel();
    }

    /// Set time step, clamped to at least 0.01.
    pub fn set_timestep(&mut self, timestep: f32) {
        self.params.timestep = timestep.max(MIN_TIMESTEP);
    }

    /// Set kernel shape and rebuild the kernel.
    pub fn set_kernel_shape(&mut self, shape: KernelShape) {
        self.params.kernel_shape = shape;
        self.rebuild_kernel();
    }

    /// Set kernel shape by name. Unknown names are ignored.
    ///
    /// Returns whether the name was recognized.
    pub fn set_kernel_shape_named(&mut self, name: &str) -> bool {
        match name.parse::<KernelShape>() {
            Ok(shape) => {
                self.set_kernel_shape(shape);
                true
            }
            Err(err) => {
                log::debug!("{}; keeping {}", err, self.params.kernel_shape);
                false
            }
        }
    }

    /// Set growth center. Any value is accepted.
    pub fn set_mu(&mut self, mu: f32) {
        self.params.mu = mu;
    }

    /// Set growth spread. Not validated; zero makes growth undefined at `mu`.
    pub fn set_sigma(&mut self, sigma: f32) {
        self.params.sigma = sigma;
    }

    /// The only place kernel-derived state changes.
    fn rebuild_kernel(&mut self) {
        self.kernel = Kernel::build(self.params.kernel_radius, self.params.kernel_shape);
        self.strategy.prepare(&self.kernel);
        log::debug!(
            "Rebuilt {} kernel r={} (mass {:.6})",
            self.params.kernel_shape,
            self.params.kernel_radius,
            self.kernel.mass()
        );
    }

    /// Get current parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Get current spatial kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn backend(&self) -> ConvolutionBackend {
        self.strategy.backend()
    }

    /// Number of `update()` calls so far.
    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// Configuration equivalent to the current parameters (seed omitted).
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig {
            grid_size: self.grid_size,
            kernel_radius: self.params.kernel_radius,
            timestep: self.params.timestep,
            kernel_shape: self.params.kernel_shape,
            mu: self.params.mu,
            sigma: self.params.sigma,
            backend: self.backend(),
            seed: None,
        }
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::from_world(&self.world)
    }
}

fn random_world(rng: &mut StdRng, cells: usize) -> Vec<f32> {
    let uniform = Uniform::new(0.0f32, 1.0f32);
    uniform.sample_iter(rng).take(cells).collect()
}

fn check_world_len(expected: usize, actual: usize) -> Result<(), ConfigError> {
    if expected != actual {
        return Err(ConfigError::WorldSizeMismatch { expected, actual });
    }
    Ok(())
}

fn clamp_unit(world: &mut [f32]) {
    for v in world.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }
}

/// Map intensities to flat-gray RGB8, replicating each cell into three channels.
pub fn gray_rgb8(world: &[f32]) -> Vec<u8> {
    world
        .iter()
        .flat_map(|&v| {
            let g = (v * 255.0) as u8;
            [g, g, g]
        })
        .collect()
}

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimulationStats {
    pub total_mass: f32,
    pub max_value: f32,
    pub min_value: f32,
    pub mean_value: f32,
    pub active_cells: usize,
}

impl SimulationStats {
    /// Compute statistics from a world grid.
    pub fn from_world(world: &[f32]) -> Self {
        let mut total_mass = 0.0f64;
        let mut max_value = f32::NEG_INFINITY;
        let mut min_value = f32::INFINITY;
        let mut active_cells = 0usize;

        for &v in world {
            total_mass += v as f64;
            max_value = max_value.max(v);
            min_value = min_value.min(v);
            if v > 1e-6 {
                active_cells += 1;
            }
        }

        Self {
            total_mass: total_mass as f32,
            max_value,
            min_value,
            mean_value: (total_mass / world.len().max(1) as f64) as f32,
            active_cells,
        }
    }
}
