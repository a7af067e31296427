//! Chi-square based estimate of an unknown systematic variance.
//!
//! Given measurements `x_i` with known statistical and systematic variances,
//! find the additional common variance `s²` for which the chi-square of the
//! weighted mean equals its expectation `N - 1`.

use ns_core::{Error, Result};

use crate::math::brent;

/// Lower end of the search bracket for `s`.
const S_MIN: f64 = 1e-10;

fn chi2_excess(x: &[f64], x_var: &[f64], s: f64) -> f64 {
    if s < 0.0 {
        return f64::INFINITY;
    }
    let s2 = s * s;
    let (mut sum_wx, mut sum_w) = (0.0, 0.0);
    for (&xi, &vi) in x.iter().zip(x_var) {
        let w = 1.0 / (vi + s2);
        sum_wx += xi * w;
        sum_w += w;
    }
    let x_hat = sum_wx / sum_w;
    let chi2: f64 = x.iter().zip(x_var).map(|(&xi, &vi)| (xi - x_hat).powi(2) / (vi + s2)).sum();
    chi2 - (x.len() as f64 - 1.0)
}

/// Extra variance `s²` such that `χ²(s) = N - 1`.
///
/// Returns `0.0` when the spread is already covered by the quoted
/// variances (no sign change of `χ² - (N-1)` on `[1e-10, 10·σ(x) + 0.01]`).
pub fn systematic_variance_chi2(x: &[f64], stat_vars: &[f64], sys_vars: &[f64]) -> Result<f64> {
    if x.len() != stat_vars.len() || x.len() != sys_vars.len() {
        return Err(Error::Validation(format!(
            "length mismatch: x={} stat_vars={} sys_vars={}",
            x.len(),
            stat_vars.len(),
            sys_vars.len()
        )));
    }
    if x.len() < 2 {
        return Err(Error::Validation(format!("need at least 2 measurements, got {}", x.len())));
    }

    let x_var: Vec<f64> = stat_vars.iter().zip(sys_vars).map(|(a, b)| a + b).collect();
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let std = (x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let s_max = std * 10.0 + 0.01;

    let chi_low = chi2_excess(x, &x_var, S_MIN);
    let chi_high = chi2_excess(x, &x_var, s_max);
    if chi_low * chi_high > 0.0 {
        tracing::debug!(chi_low, chi_high, "no sign change in chi2 bracket, systematic variance is zero");
        return Ok(0.0);
    }

    let s = brent(S_MIN, s_max, 1e-12, 200, |s| chi2_excess(x, &x_var, s))?;
    Ok(s * s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_measurements_need_no_systematic() {
        let x = [1.0, 1.01, 0.99];
        let v = [1.0, 1.0, 1.0];
        let z = [0.0, 0.0, 0.0];
        assert_eq!(systematic_variance_chi2(&x, &v, &z).unwrap(), 0.0);
    }

    #[test]
    fn test_scattered_measurements_restore_chi2() {
        let x = [0.0, 10.0, 0.0, 10.0];
        let v = [0.01; 4];
        let z = [0.0; 4];
        let s2 = systematic_variance_chi2(&x, &v, &z).unwrap();
        assert!(s2 > 0.0);
        let resid = chi2_excess(&x, &[0.01; 4], s2.sqrt());
        assert!(resid.abs() < 1e-8, "residual {}", resid);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(systematic_variance_chi2(&[1.0, 2.0], &[1.0], &[1.0, 1.0]).is_err());
        assert!(systematic_variance_chi2(&[1.0], &[1.0], &[1.0]).is_err());
    }
}
