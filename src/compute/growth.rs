//! Growth function for Lenia.
//!
//! The growth function determines how the automaton reacts to local neighborhood density.

/// Compute growth function: G(u; mu, sigma) = 2 * exp(-(u - mu)^2 / (2*sigma^2)) - 1
///
/// Output range: (-1, 1]
/// - Returns 1.0 when u == mu (optimal activation)
/// - Returns -1.0 when u is far from mu
///
/// `sigma` must be positive. Zero is not guarded and yields NaN at `u == mu`.
#[inline]
pub fn growth(u: f32, mu: f32, sigma: f32) -> f32 {
    let diff = u - mu;
    let sigma_sq_2 = 2.0 * sigma * sigma;
    2.0 * (-diff * diff / sigma_sq_2).exp() - 1.0
}

/// Vectorized growth function applied to entire grid.
/// Modifies values in-place.
pub fn growth_grid_inplace(grid: &mut [f32], mu: f32, sigma: f32) {
    for v in grid.iter_mut() {
        *v = growth(*v, mu, sigma);
    }
}

/// Integrate growth into the world: w = clamp(w + dt * g, 0, 1).
pub fn integrate_clamped(world: &mut [f32], growth: &[f32], dt: f32) {
    for (w, &g) in world.iter_mut().zip(growth.iter()) {
        *w = (*w + dt * g).clamp(0.0, 1.0);
    }
}
