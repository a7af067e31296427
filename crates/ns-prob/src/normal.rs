//! Normal distribution utilities.

use ns_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Quantile of the standard normal distribution `N(0, 1)`.
pub fn standard_quantile(p: f64) -> Result<f64> {
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(Error::Validation(format!("p must be in (0,1), got {}", p)));
    }
    let n = Normal::new(0.0, 1.0).map_err(|e| Error::Computation(e.to_string()))?;
    Ok(n.inverse_cdf(p))
}
