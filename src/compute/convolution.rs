//! Convolution strategies producing the potential field.
//!
//! Both strategies compute the same circular convolution of the world with
//! the kernel; they differ only in cost profile.

use num_complex::Complex;

use super::{FftPlan2d, Kernel, KernelSpectrum, convolve_direct_into};
use crate::schema::ConvolutionBackend;

/// Algorithm that turns the world into a potential field.
pub trait ConvolutionStrategy: Send {
    /// Recompute any kernel-derived state. Called on every kernel rebuild.
    fn prepare(&mut self, kernel: &Kernel);

    /// Write the potential `kernel * world` into `out`.
    fn potential_into(&mut self, world: &[f32], out: &mut [f32]);

    /// Which backend this is.
    fn backend(&self) -> ConvolutionBackend;
}

/// Create the strategy for a backend, prepared for `kernel`.
pub fn strategy_for(
    backend: ConvolutionBackend,
    grid_size: usize,
    kernel: &Kernel,
) -> Box<dyn ConvolutionStrategy> {
    match backend {
        ConvolutionBackend::Spatial => Box::new(SpatialConvolution::new(grid_size, kernel)),
        ConvolutionBackend::Spectral => Box::new(SpectralConvolution::new(grid_size, kernel)),
    }
}

/// Direct circular convolution over the kernel support.
pub struct SpatialConvolution {
    grid_size: usize,
    kernel: Kernel,
}

impl SpatialConvolution {
    pub fn new(grid_size: usize, kernel: &Kernel) -> Self {
        Self {
            grid_size,
            kernel: kernel.clone(),
        }
    }
}

impl ConvolutionStrategy for SpatialConvolution {
    fn prepare(&mut self, kernel: &Kernel) {
        self.kernel = kernel.clone();
    }

    fn potential_into(&mut self, world: &[f32], out: &mut [f32]) {
        convolve_direct_into(world, &self.kernel, self.grid_size, out);
    }

    fn backend(&self) -> ConvolutionBackend {
        ConvolutionBackend::Spatial
    }
}

/// FFT convolution against a cached kernel spectrum.
pub struct SpectralConvolution {
    plan: FftPlan2d,
    spectrum: KernelSpectrum,
    /// Frequency-domain work buffer, reused every step.
    freq: Vec<Complex<f64>>,
}

impl SpectralConvolution {
    pub fn new(grid_size: usize, kernel: &Kernel) -> Self {
        let mut plan = FftPlan2d::new(grid_size);
        let spectrum = KernelSpectrum::from_kernel(kernel, &mut plan);

        Self {
            plan,
            spectrum,
            freq: vec![Complex::new(0.0, 0.0); grid_size * grid_size],
        }
    }

    /// Current kernel spectrum.
    pub fn spectrum(&self) -> &KernelSpectrum {
        &self.spectrum
    }
}

impl ConvolutionStrategy for SpectralConvolution {
    fn prepare(&mut self, kernel: &Kernel) {
        self.spectrum = KernelSpectrum::from_kernel(kernel, &mut self.plan);
    }

    fn potential_into(&mut self, world: &[f32], out: &mut [f32]) {
        self.plan.forward_real(world, &mut self.freq);

        // Pointwise multiplication
        for (f, k) in self.freq.iter_mut().zip(self.spectrum.data.iter()) {
            *f *= *k;
        }

        self.plan.inverse_real(&mut self.freq, out);
    }

    fn backend(&self) -> ConvolutionBackend {
        ConvolutionBackend::Spectral
    }
}
