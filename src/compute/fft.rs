//! FFT-based 2D convolution for efficient kernel application.
//!
//! Uses rustfft for O(N log N) convolution instead of O(N * K^2) direct convolution.
//! Transforms run in f64: the growth function is steep enough that f32 transform
//! noise would be amplified into visible drift between the two convolution paths.

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::Kernel;
use crate::schema::KernelShape;

/// Square 2D FFT with cached plans and scratch buffers.
pub struct FftPlan2d {
    size: usize,
    // Cached FFT plans (expensive to create, reuse across convolutions)
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex<f64>>,
    col_buffer: Vec<Complex<f64>>,
}

impl FftPlan2d {
    /// Plan transforms for a `size` x `size` grid.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());

        Self {
            size,
            fft,
            ifft,
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            col_buffer: vec![Complex::new(0.0, 0.0); size],
        }
    }

    /// Grid side length this plan was built for.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward 2D FFT of real-valued input into `output`.
    pub fn forward_real(&mut self, input: &[f32], output: &mut [Complex<f64>]) {
        assert_eq!(input.len(), self.size * self.size);
        assert_eq!(output.len(), input.len());

        for (o, &x) in output.iter_mut().zip(input.iter()) {
            *o = Complex::new(x as f64, 0.0);
        }
        self.forward(output);
    }

    /// Forward 2D FFT in place.
    pub fn forward(&mut self, data: &mut [Complex<f64>]) {
        assert_eq!(data.len(), self.size * self.size);

        // Row-wise FFT (every chunk of `size` is one row)
        self.fft.process_with_scratch(data, &mut self.scratch);
        // Column-wise FFT
        self.process_columns(data, false);
    }

    /// Inverse 2D FFT, writing the normalized real part into `output`.
    ///
    /// The imaginary residue is discarded; for a real input convolved with a
    /// real kernel it is rounding noise.
    pub fn inverse_real(&mut self, data: &mut [Complex<f64>], output: &mut [f32]) {
        assert_eq!(data.len(), self.size * self.size);
        assert_eq!(output.len(), data.len());

        self.process_columns(data, true);
        self.ifft.process_with_scratch(data, &mut self.scratch);

        // Normalize and extract real part
        let scale = 1.0 / (self.size * self.size) as f64;
        for (o, c) in output.iter_mut().zip(data.iter()) {
            *o = (c.re * scale) as f32;
        }
    }

    fn process_columns(&mut self, data: &mut [Complex<f64>], inverse: bool) {
        let size = self.size;
        let plan = if inverse { &self.ifft } else { &self.fft };

        for x in 0..size {
            // Extract column
            for y in 0..size {
                self.col_buffer[y] = data[y * size + x];
            }

            plan.process_with_scratch(&mut self.col_buffer, &mut self.scratch);

            // Write back
            for y in 0..size {
                data[y * size + x] = self.col_buffer[y];
            }
        }
    }
}

/// Precomputed kernel in frequency domain for efficient repeated convolution.
#[derive(Debug, Clone)]
pub struct KernelSpectrum {
    pub data: Vec<Complex<f64>>,
    pub grid_size: usize,
    /// Radius of the kernel this spectrum was derived from.
    pub radius: usize,
    /// Shape of the kernel this spectrum was derived from.
    pub shape: KernelShape,
}

impl KernelSpectrum {
    /// Pad, center and transform a spatial kernel with an existing plan.
    pub fn from_kernel(kernel: &Kernel, plan: &mut FftPlan2d) -> Self {
        let grid_size = plan.size();
        let mut data: Vec<Complex<f64>> = kernel
            .pad_to_size(grid_size)
            .into_iter()
            .map(|v| Complex::new(v, 0.0))
            .collect();
        plan.forward(&mut data);

        Self {
            data,
            grid_size,
            radius: kernel.radius,
            shape: kernel.shape,
        }
    }

    /// Whether this spectrum is current for the given kernel parameters.
    pub fn matches(&self, radius: usize, shape: KernelShape) -> bool {
        self.radius == radius && self.shape == shape
    }
}
