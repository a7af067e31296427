//! Beta distribution utilities.
//!
//! Posterior summaries for Bayesian efficiency estimates: with a
//! `Beta(alpha, beta)` prior and `k` of `n` passing, the posterior is
//! `Beta(k + alpha, n - k + beta)`.

use ns_core::{Error, Result};
use statrs::distribution::{Beta, ContinuousCDF};

use crate::math::golden_section_min;

fn check_params(a: f64, b: f64) -> Result<()> {
    if !a.is_finite() || a <= 0.0 {
        return Err(Error::Validation(format!("a must be finite and > 0, got {}", a)));
    }
    if !b.is_finite() || b <= 0.0 {
        return Err(Error::Validation(format!("b must be finite and > 0, got {}", b)));
    }
    Ok(())
}

/// Mean of `Beta(a, b)`.
pub fn mean(a: f64, b: f64) -> Result<f64> {
    check_params(a, b)?;
    Ok(a / (a + b))
}

/// Mode of `Beta(a, b)`.
///
/// For `a <= 1` or `b <= 1` the density is monotone (or flat) and the mode
/// sits on the boundary; a flat density reports `0.5`.
pub fn mode(a: f64, b: f64) -> Result<f64> {
    check_params(a, b)?;
    if a <= 1.0 || b <= 1.0 {
        return Ok(if a < b {
            0.0
        } else if a > b {
            1.0
        } else {
            0.5
        });
    }
    Ok((a - 1.0) / (a + b - 2.0))
}

/// Quantile (inverse CDF) of `Beta(a, b)`.
pub fn quantile(p: f64, a: f64, b: f64) -> Result<f64> {
    check_params(a, b)?;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(Error::Validation(format!("p must be in [0,1], got {}", p)));
    }
    if p == 0.0 {
        return Ok(0.0);
    }
    if p == 1.0 {
        return Ok(1.0);
    }
    let dist = Beta::new(a, b).map_err(|e| Error::Computation(e.to_string()))?;
    Ok(dist.inverse_cdf(p).clamp(0.0, 1.0))
}

/// Central interval of `Beta(a, b)` with probability content `level`.
pub fn central_interval(level: f64, a: f64, b: f64) -> Result<(f64, f64)> {
    let tail = (1.0 - level) / 2.0;
    Ok((quantile(tail, a, b)?, quantile(1.0 - tail, a, b)?))
}

/// Shortest interval of `Beta(a, b)` with probability content `level`.
///
/// Scans the lower-tail probability `t` in `[0, 1 - level]` and minimizes the
/// width `Q(t + level) - Q(t)`.
pub fn shortest_interval(level: f64, a: f64, b: f64) -> Result<(f64, f64)> {
    check_params(a, b)?;
    let slack = 1.0 - level;
    let t = golden_section_min(0.0, slack, 1e-10, 200, |t| {
        Ok(quantile(t + level, a, b)? - quantile(t, a, b)?)
    })?;
    let t = t.clamp(0.0, slack);
    Ok((quantile(t, a, b)?, quantile(t + level, a, b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_quantiles() {
        for p in [0.1, 0.25, 0.5, 0.9] {
            let q = quantile(p, 1.0, 1.0).unwrap();
            assert!((q - p).abs() < 1e-6, "p={}", p);
        }
    }

    #[test]
    fn test_symmetry_when_a_equals_b() {
        let (lo, hi) = central_interval(0.68, 3.0, 3.0).unwrap();
        assert!((lo - (1.0 - hi)).abs() < 1e-6);
    }

    #[test]
    fn test_shortest_is_not_wider_than_central() {
        let (clo, chi) = central_interval(0.68, 2.0, 9.0).unwrap();
        let (slo, shi) = shortest_interval(0.68, 2.0, 9.0).unwrap();
        assert!(shi - slo <= chi - clo + 1e-9);
    }

    #[test]
    fn test_mode_and_mean() {
        assert!((mean(2.0, 6.0).unwrap() - 0.25).abs() < 1e-12);
        assert!((mode(3.0, 5.0).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(mode(0.5, 3.0).unwrap(), 0.0);
        assert_eq!(mode(1.0, 1.0).unwrap(), 0.5);
    }

    #[test]
    fn test_invalid_params() {
        assert!(quantile(0.5, 0.0, 1.0).is_err());
        assert!(quantile(0.5, 1.0, -2.0).is_err());
        assert!(quantile(1.5, 1.0, 1.0).is_err());
    }
}
