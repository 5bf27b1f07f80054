//! Direct convolution with periodic boundary conditions.
//!
//! # Complexity
//!
//! Direct convolution has O(N * K^2) complexity where N is grid size and K is kernel diameter.
//! This is slower than FFT's O(N log N) for large kernels, but needs no transform setup
//! and wins for very small kernels.

use rayon::prelude::*;

use super::Kernel;

/// Wrap a possibly negative coordinate onto a torus of the given size.
#[inline]
pub fn wrap_coord(coord: i64, size: usize) -> usize {
    coord.rem_euclid(size as i64) as usize
}

/// Perform direct 2D convolution with periodic boundary conditions.
///
/// Computes `out[y][x] = sum K[ky][kx] * input[y - (ky - r)][x - (kx - r)]`,
/// a true convolution, so it matches FFT multiplication for any kernel.
#[inline]
pub fn convolve_direct(input: &[f32], kernel: &Kernel, grid_size: usize) -> Vec<f32> {
    let mut output = vec![0.0f32; grid_size * grid_size];
    convolve_direct_into(input, kernel, grid_size, &mut output);
    output
}

/// Perform direct convolution into pre-allocated buffer.
///
/// Rows are processed in parallel; every output cell is a sum in a fixed
/// order, so the result does not depend on scheduling.
pub fn convolve_direct_into(input: &[f32], kernel: &Kernel, grid_size: usize, output: &mut [f32]) {
    assert_eq!(input.len(), grid_size * grid_size);
    assert_eq!(output.len(), grid_size * grid_size);

    let k_size = kernel.size;
    let k_half = kernel.radius as i64;

    // Nonzero taps only; ring kernels are mostly empty
    let taps: Vec<(usize, usize, f64)> = (0..k_size)
        .flat_map(|ky| (0..k_size).map(move |kx| (kx, ky)))
        .filter_map(|(kx, ky)| {
            let k_val = kernel.get(kx, ky);
            (k_val != 0.0).then_some((kx, ky, k_val as f64))
        })
        .collect();

    // Wrapped source index for every (kernel offset, output coordinate) pair
    let wrapped: Vec<usize> = (0..k_size)
        .flat_map(|k| {
            (0..grid_size).map(move |c| wrap_coord(c as i64 - (k as i64 - k_half), grid_size))
        })
        .collect();

    output
        .par_chunks_mut(grid_size)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut sum = 0.0f64;

                for &(kx, ky, k_val) in &taps {
                    let sx = wrapped[kx * grid_size + x];
                    let sy = wrapped[ky * grid_size + y];
                    sum += input[sy * grid_size + sx] as f64 * k_val;
                }

                *out = sum as f32;
            }
        });
}
