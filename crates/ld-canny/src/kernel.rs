use crate::config::{ConfigError, check_kernel_size, check_sigma};

/// Square 2D Gaussian kernel.
///
/// Conventions:
/// - `size` is odd and `>= 3`; even sizes are rejected rather than rounded.
/// - Entry `(i, j)` is proportional to `exp(-((i-c)^2 + (j-c)^2) / (2*sigma^2))`
///   with `c = size / 2`.
/// - Weights are normalized in `f64` before narrowing, so `sum ~= 1` to well
///   under `1e-6`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    size: usize,
    weights: Vec<f32>,
}

impl GaussianKernel {
    pub fn new(sigma: f32, size: usize) -> Result<Self, ConfigError> {
        check_sigma(sigma)?;
        check_kernel_size(size)?;

        let c = (size / 2) as f64;
        let two_sigma2 = 2.0 * f64::from(sigma) * f64::from(sigma);

        let mut raw = vec![0.0f64; size * size];
        for (idx, w) in raw.iter_mut().enumerate() {
            let di = (idx / size) as f64 - c;
            let dj = (idx % size) as f64 - c;
            *w = (-(di * di + dj * dj) / two_sigma2).exp();
        }

        let sum: f64 = raw.iter().sum();
        let weights = raw.iter().map(|&w| (w / sum) as f32).collect();

        Ok(Self {
            sigma,
            size,
            weights,
        })
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Row-major weights, `size * size` entries.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.size || j >= self.size {
            return None;
        }
        Some(self.weights[i * self.size + j])
    }
}
