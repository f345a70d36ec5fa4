use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::SampleError;

/// One-dimensional Gaussian kernel density estimate with Scott's rule bandwidth.
#[derive(Debug, Clone)]
pub struct GaussianKde<'a> {
    data: &'a [f64],
    kernel: Normal<f64>,
}

impl<'a> GaussianKde<'a> {
    pub fn fit(data: &'a [f64]) -> Result<Self, SampleError> {
        if data.is_empty() {
            return Err(SampleError::Empty);
        }

        let bandwidth = scott_factor(data.len()) * sample_std_dev(data);
        // Zero bandwidth degenerates to picking observed points.
        let kernel = Normal::new(0.0, bandwidth).map_err(|_| SampleError::NonFinite(bandwidth))?;

        Ok(GaussianKde { data, kernel })
    }

    pub fn bandwidth(&self) -> f64 {
        self.kernel.std_dev()
    }

    /// Pick an observation uniformly and perturb it with kernel noise.
    pub fn resample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let idx = rng.gen_range(0..self.data.len());
        self.data[idx] + self.kernel.sample(rng)
    }
}

fn scott_factor(n: usize) -> f64 {
    (n as f64).powf(-1.0 / 5.0)
}

/// Standard deviation with one delta degree of freedom, zero for a single point.
fn sample_std_dev(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    let sum_sq: f64 = data.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}
