//! Resampling of empirical distributions recorded in the trace

pub mod kde;

pub use kde::GaussianKde;

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("cannot sample from an empty distribution")]
    Empty,
    #[error("distribution contains a non-finite value: {0}")]
    NonFinite(f64),
}

/// Draw one synthetic value from the distribution estimated from `values`.
///
/// A constant sample set is returned as-is without touching `rng`.
/// Otherwise a Gaussian KDE is fitted and a single value is drawn from it.
/// The draw is not restricted to `[0, 1]`.
pub fn sample<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> Result<f64, SampleError> {
    let first = *values.first().ok_or(SampleError::Empty)?;
    if let Some(bad) = values.iter().copied().find(|v| !v.is_finite()) {
        return Err(SampleError::NonFinite(bad));
    }

    if values.iter().all(|v| *v == first) {
        return Ok(first);
    }

    let kde = GaussianKde::fit(values)?;
    Ok(kde.resample(rng))
}
