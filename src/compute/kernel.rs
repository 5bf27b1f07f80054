//! Kernel generation for Lenia.
//!
//! Kernels are square masks of side 2r+1, built from the Euclidean distance
//! of each cell to the center and normalized to unit mass.

use crate::schema::{KernelShape, MAX_KERNEL_RADIUS, MIN_KERNEL_RADIUS};

/// Inner edge of the ring annulus, as a fraction of the radius.
const RING_INNER: f64 = 0.38;
/// Outer edge of the ring annulus, as a fraction of the radius.
const RING_OUTER: f64 = 0.62;

/// Precomputed kernel grid ready for convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// 2D kernel values, row-major.
    pub data: Vec<f32>,
    /// Kernel size (diameter, always odd).
    pub size: usize,
    /// Radius the kernel was built with.
    pub radius: usize,
    /// Shape the kernel was built with.
    pub shape: KernelShape,
}

impl Kernel {
    /// Build a normalized kernel.
    ///
    /// The radius is clamped into `MIN_KERNEL_RADIUS..=MAX_KERNEL_RADIUS`. If
    /// the shape leaves every cell empty (a ring with radius 1), the kernel
    /// stays all zero.
    pub fn build(radius: usize, shape: KernelShape) -> Self {
        let radius = radius.clamp(MIN_KERNEL_RADIUS, MAX_KERNEL_RADIUS);
        let size = radius * 2 + 1;
        let r = radius as f64;

        let mut raw = vec![0.0f64; size * size];
        for y in 0..size {
            for x in 0..size {
                let dx = x as f64 - r;
                let dy = y as f64 - r;
                let dist_sq = dx * dx + dy * dy;

                raw[y * size + x] = match shape {
                    KernelShape::Ring => {
                        let dist = dist_sq.sqrt();
                        if dist > r * RING_INNER && dist <= r * RING_OUTER {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    KernelShape::Gaussian => {
                        let spread = r / 3.0;
                        (-dist_sq / (2.0 * spread * spread)).exp()
                    }
                    KernelShape::Square => 1.0,
                };
            }
        }

        // Normalize so kernel sums to 1
        let sum: f64 = raw.iter().sum();
        if sum > 0.0 {
            for v in &mut raw {
                *v /= sum;
            }
        }

        Self {
            data: raw.into_iter().map(|v| v as f32).collect(),
            size,
            radius,
            shape,
        }
    }

    /// Get kernel value at (x, y) position.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.size + x]
    }

    /// Sum of all kernel entries.
    pub fn mass(&self) -> f32 {
        self.data.iter().map(|&v| v as f64).sum::<f64>() as f32
    }

    /// Pad kernel to a `grid_size` square for FFT, with its center at (0, 0).
    ///
    /// Entry (kx, ky) lands on ((kx - r) mod N, (ky - r) mod N). Entries that
    /// fold onto the same cell (kernel wider than the grid) are summed, which
    /// keeps the padded kernel an exact circular equivalent of the unpadded one.
    pub fn pad_to_size(&self, grid_size: usize) -> Vec<f64> {
        let mut padded = vec![0.0f64; grid_size * grid_size];
        let r = self.radius as i64;
        let n = grid_size as i64;

        for ky in 0..self.size {
            let ty = (ky as i64 - r).rem_euclid(n) as usize;
            for kx in 0..self.size {
                let tx = (kx as i64 - r).rem_euclid(n) as usize;
                padded[ty * grid_size + tx] += self.get(kx, ky) as f64;
            }
        }

        padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalization() {
        for shape in KernelShape::ALL {
            for radius in [1, 2, 5, 13, 30] {
                let kernel = Kernel::build(radius, shape);
                let sum: f64 = kernel.data.iter().map(|&v| v as f64).sum();
                if shape == KernelShape::Ring && radius == 1 {
                    continue;
                }
                assert!(
                    (sum - 1.0).abs() < 1e-6,
                    "{} r={} kernel sum: {}",
                    shape,
                    radius,
                    sum
                );
            }
        }
    }

    #[test]
    fn test_ring_radius_one_is_empty() {
        // Distances are 0, 1 and sqrt(2); none falls in (0.38, 0.62]
        let kernel = Kernel::build(1, KernelShape::Ring);
        assert_eq!(kernel.size, 3);
        assert!(kernel.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_kernel_non_negative() {
        for shape in KernelShape::ALL {
            let kernel = Kernel::build(9, shape);
            assert!(kernel.data.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_kernel_size() {
        let kernel = Kernel::build(13, KernelShape::Gaussian);
        assert_eq!(kernel.size, 27);
        assert_eq!(kernel.data.len(), 27 * 27);
    }

    #[test]
    fn test_zero_radius_clamped() {
        let kernel = Kernel::build(0, KernelShape::Square);
        assert_eq!(kernel.radius, 1);
        assert_eq!(kernel.size, 3);
    }

    #[test]
    fn test_huge_radius_clamped() {
        let kernel = Kernel::build(usize::MAX, KernelShape::Gaussian);
        assert_eq!(kernel.radius, MAX_KERNEL_RADIUS);
        assert_eq!(kernel.size, MAX_KERNEL_RADIUS * 2 + 1);
        assert_eq!(kernel.data.len(), kernel.size * kernel.size);
    }

    #[test]
    fn test_kernel_symmetry() {
        for shape in KernelShape::ALL {
            let kernel = Kernel::build(10, shape);

            let center = kernel.size / 2;
            for d in 1..=center {
                let v1 = kernel.get(center + d, center);
                let v2 = kernel.get(center - d, center);
                let v3 = kernel.get(center, center + d);
                let v4 = kernel.get(center, center - d);

                assert!((v1 - v2).abs() < 1e-6);
                assert!((v1 - v3).abs() < 1e-6);
                assert!((v1 - v4).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_ring_hole_and_edge() {
        let kernel = Kernel::build(10, KernelShape::Ring);
        let c = kernel.radius;
        // Center and the square's corner are outside the annulus
        assert_eq!(kernel.get(c, c), 0.0);
        assert_eq!(kernel.get(0, 0), 0.0);
        // Distance 5 lies in (3.8, 6.2]
        assert!(kernel.get(c + 5, c) > 0.0);
    }

    #[test]
    fn test_square_is_uniform() {
        let kernel = Kernel::build(3, KernelShape::Square);
        let expected = 1.0 / 49.0;
        for &v in &kernel.data {
            assert!((v - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn test_gaussian_peaks_at_center() {
        let kernel = Kernel::build(6, KernelShape::Gaussian);
        let c = kernel.radius;
        let peak = kernel.get(c, c);
        assert!(kernel.data.iter().all(|&v| v <= peak));
    }

    #[test]
    fn test_pad_puts_center_at_origin() {
        let kernel = Kernel::build(2, KernelShape::Gaussian);
        let n = 8;
        let padded = kernel.pad_to_size(n);

        assert_eq!(padded[0], kernel.get(2, 2) as f64);
        // Offset (+1, 0) from center
        assert_eq!(padded[1], kernel.get(3, 2) as f64);
        // Offset (-1, -1) wraps to the far corner
        assert_eq!(padded[(n - 1) * n + (n - 1)], kernel.get(1, 1) as f64);
        // Offset (+3, 0) is outside the support
        assert_eq!(padded[3], 0.0);

        let total: f64 = padded.iter().sum();
        assert!((total - kernel.mass() as f64).abs() < 1e-6);
    }

    #[test]
    fn test_pad_folds_wide_kernel() {
        // 7x7 kernel onto a 4x4 grid keeps all of its mass
        let kernel = Kernel::build(3, KernelShape::Square);
        let padded = kernel.pad_to_size(4);
        let total: f64 = padded.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }
}
