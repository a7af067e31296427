//! Binomial distribution utilities.

use ns_core::{Error, Result};
use statrs::function::gamma::ln_gamma;

fn ln_choose(n: u64, k: u64) -> f64 {
    // ln(n choose k) = ln Γ(n+1) - ln Γ(k+1) - ln Γ(n-k+1)
    let n1 = (n as f64) + 1.0;
    let k1 = (k as f64) + 1.0;
    let nk1 = ((n - k) as f64) + 1.0;
    ln_gamma(n1) - ln_gamma(k1) - ln_gamma(nk1)
}

/// Log-PMF of a Binomial distribution `Binom(n, p)` at count `k`.
pub fn logpmf(k: u64, n: u64, p: f64) -> Result<f64> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(Error::Validation(format!("p must be finite and in [0,1], got {}", p)));
    }
    if k > n {
        return Err(Error::Validation(format!("k must be <= n, got k={} n={}", k, n)));
    }

    if p == 0.0 {
        return Ok(if k == 0 { 0.0 } else { f64::NEG_INFINITY });
    }
    if p == 1.0 {
        return Ok(if k == n { 0.0 } else { f64::NEG_INFINITY });
    }
    let kf = k as f64;
    let nf = n as f64;
    Ok(ln_choose(n, k) + kf * p.ln() + (nf - kf) * (1.0 - p).ln())
}

/// PMF of `Binom(n, p)` at `k`.
pub fn pmf(k: u64, n: u64, p: f64) -> Result<f64> {
    Ok(logpmf(k, n, p)?.exp())
}

/// Round a (possibly weighted) count to the nearest non-negative integer.
///
/// Interval constructions that enumerate outcomes need integer counts.
pub fn to_count(x: f64) -> Result<u64> {
    if !x.is_finite() || x < 0.0 {
        return Err(Error::Validation(format!("count must be finite and >= 0, got {}", x)));
    }
    Ok(x.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmf_sums_to_one() {
        let n = 12;
        let total: f64 = (0..=n).map(|k| pmf(k, n, 0.37).unwrap()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        // C(4,2) * 0.5^4 = 6/16
        assert!((pmf(2, 4, 0.5).unwrap() - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_edges_p0_p1() {
        assert_eq!(logpmf(0, 5, 0.0).unwrap(), 0.0);
        assert!(logpmf(1, 5, 0.0).unwrap().is_infinite());
        assert_eq!(logpmf(5, 5, 1.0).unwrap(), 0.0);
        assert!(logpmf(4, 5, 1.0).unwrap().is_infinite());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(logpmf(5, 4, 0.5).is_err());
        assert!(logpmf(2, 4, -0.1).is_err());
        assert!(to_count(-1.0).is_err());
        assert_eq!(to_count(7.6).unwrap(), 8);
    }
}
