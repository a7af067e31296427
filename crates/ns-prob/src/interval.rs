//! Binomial-proportion confidence intervals.
//!
//! The estimators follow the conventions of ROOT's `TEfficiency`:
//! frequentist boundaries are evaluated on `(total, passed)` counts and the
//! point estimate is `passed / total` (zero for empty bins), while the
//! Bayesian family works on the `Beta(passed + alpha, total - passed + beta)`
//! posterior and reports its mean (or mode) as the point estimate.

use std::fmt;
use std::str::FromStr;

use ns_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::beta;
use crate::binomial::{pmf, to_count};
use crate::math::bisect_predicate;
use crate::normal::standard_quantile;

/// Probability content of a one-sigma central Gaussian interval.
pub const ONE_SIGMA: f64 = 0.682_689_492_137_085_9;

/// Bracket width at which the Feldman–Cousins bisection stops.
const FC_TOL: f64 = 1e-10;

/// Statistical estimator used for efficiency values and their errors.
///
/// Numeric codes match `TEfficiency::EStatOption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatisticOption {
    /// Clopper–Pearson exact interval (`kFCP`).
    ClopperPearson,
    /// Normal approximation (`kFNormal`).
    Normal,
    /// Wilson score interval (`kFWilson`).
    Wilson,
    /// Agresti–Coull interval (`kFAC`).
    AgrestiCoull,
    /// Feldman–Cousins likelihood-ratio ordering (`kFFC`).
    FeldmanCousins,
    /// Bayesian with Jeffrey prior `Beta(0.5, 0.5)` (`kBJeffrey`).
    Jeffrey,
    /// Bayesian with uniform prior `Beta(1, 1)` (`kBUniform`).
    UniformPrior,
    /// Bayesian with a user prior (`kBBayesian`).
    Bayesian,
    /// Mid-P Lancaster interval (`kMidP`).
    MidP,
}

impl StatisticOption {
    /// All options in code order.
    pub const ALL: [StatisticOption; 9] = [
        StatisticOption::ClopperPearson,
        StatisticOption::Normal,
        StatisticOption::Wilson,
        StatisticOption::AgrestiCoull,
        StatisticOption::FeldmanCousins,
        StatisticOption::Jeffrey,
        StatisticOption::UniformPrior,
        StatisticOption::Bayesian,
        StatisticOption::MidP,
    ];

    /// Numeric code as used by `TEfficiency::SetStatisticOption`.
    pub fn code(self) -> i32 {
        match self {
            StatisticOption::ClopperPearson => 0,
            StatisticOption::Normal => 1,
            StatisticOption::Wilson => 2,
            StatisticOption::AgrestiCoull => 3,
            StatisticOption::FeldmanCousins => 4,
            StatisticOption::Jeffrey => 5,
            StatisticOption::UniformPrior => 6,
            StatisticOption::Bayesian => 7,
            StatisticOption::MidP => 8,
        }
    }

    /// Inverse of [`StatisticOption::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }

    /// Snake-case key, accepted back by [`FromStr`].
    pub fn key(self) -> &'static str {
        match self {
            StatisticOption::ClopperPearson => "clopper_pearson",
            StatisticOption::Normal => "normal",
            StatisticOption::Wilson => "wilson",
            StatisticOption::AgrestiCoull => "agresti_coull",
            StatisticOption::FeldmanCousins => "feldman_cousins",
            StatisticOption::Jeffrey => "jeffrey",
            StatisticOption::UniformPrior => "uniform_prior",
            StatisticOption::Bayesian => "bayesian",
            StatisticOption::MidP => "mid_p_interval",
        }
    }

    /// Display label ("Clopper Pearson", "Mid P Interval", ...).
    pub fn label(self) -> &'static str {
        match self {
            StatisticOption::ClopperPearson => "Clopper Pearson",
            StatisticOption::Normal => "Normal",
            StatisticOption::Wilson => "Wilson",
            StatisticOption::AgrestiCoull => "Agresti Coull",
            StatisticOption::FeldmanCousins => "Feldman Cousins",
            StatisticOption::Jeffrey => "Jeffrey",
            StatisticOption::UniformPrior => "Uniform Prior",
            StatisticOption::Bayesian => "Bayesian",
            StatisticOption::MidP => "Mid P Interval",
        }
    }

    /// Whether the estimator works on a Beta posterior.
    pub fn is_bayesian(self) -> bool {
        matches!(
            self,
            StatisticOption::Jeffrey | StatisticOption::UniformPrior | StatisticOption::Bayesian
        )
    }
}

impl fmt::Display for StatisticOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatisticOption {
    type Err = Error;

    /// Case-insensitive; spaces, dashes, dots and colons are interchangeable
    /// with underscores, and the separator may be dropped entirely
    /// (`"clopper-pearson"`, `"Clopper Pearson"`, `"clopperpearson"`, `"kFCP"`).
    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | ':' | '_'))
            .collect();
        let opt = match compact.as_str() {
            "normal" | "kfnormal" => StatisticOption::Normal,
            "clopperpearson" | "kfcp" => StatisticOption::ClopperPearson,
            "bayesian" | "kbbayesian" => StatisticOption::Bayesian,
            "wilson" | "kfwilson" => StatisticOption::Wilson,
            "feldmancousins" | "feldmancousings" | "kffc" => StatisticOption::FeldmanCousins,
            "agresticoull" | "kfac" => StatisticOption::AgrestiCoull,
            "midpinterval" | "midp" | "kmidp" => StatisticOption::MidP,
            "jeffrey" | "kbjeffrey" => StatisticOption::Jeffrey,
            "uniformprior" | "kbuniform" => StatisticOption::UniformPrior,
            _ => {
                return Err(Error::UnknownOption {
                    option: "statistic option",
                    value: s.to_string(),
                });
            }
        };
        Ok(opt)
    }
}

impl TryFrom<String> for StatisticOption {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<StatisticOption> for String {
    fn from(o: StatisticOption) -> Self {
        o.key().to_string()
    }
}

fn check_counts(total: f64, passed: f64) -> Result<()> {
    if !total.is_finite() || !passed.is_finite() || total < 0.0 || passed < 0.0 {
        return Err(Error::Validation(format!(
            "counts must be finite and >= 0, got passed={} total={}",
            passed, total
        )));
    }
    if passed > total {
        return Err(Error::Validation(format!(
            "passed ({}) must not exceed total ({})",
            passed, total
        )));
    }
    Ok(())
}

fn check_level(level: f64) -> Result<()> {
    if !level.is_finite() || level <= 0.0 || level >= 1.0 {
        return Err(Error::Validation(format!("confidence level must be in (0,1), got {}", level)));
    }
    Ok(())
}

/// Clopper–Pearson boundary.
pub fn clopper_pearson(total: f64, passed: f64, level: f64, upper: bool) -> Result<f64> {
    check_counts(total, passed)?;
    check_level(level)?;
    let alpha = (1.0 - level) / 2.0;
    if upper {
        if passed == total {
            return Ok(1.0);
        }
        beta::quantile(1.0 - alpha, passed + 1.0, total - passed)
    } else {
        if passed == 0.0 {
            return Ok(0.0);
        }
        beta::quantile(alpha, passed, total - passed + 1.0)
    }
}

/// Normal-approximation boundary, clipped to `[0, 1]`.
pub fn normal(total: f64, passed: f64, level: f64, upper: bool) -> Result<f64> {
    check_counts(total, passed)?;
    check_level(level)?;
    if total == 0.0 {
        return Ok(if upper { 1.0 } else { 0.0 });
    }
    let alpha = (1.0 - level) / 2.0;
    let average = passed / total;
    let sigma = (average * (1.0 - average) / total).sqrt();
    let delta = standard_quantile(1.0 - alpha)? * sigma;
    Ok(if upper { (average + delta).min(1.0) } else { (average - delta).max(0.0) })
}

/// Wilson score boundary.
pub fn wilson(total: f64, passed: f64, level: f64, upper: bool) -> Result<f64> {
    check_counts(total, passed)?;
    check_level(level)?;
    if total == 0.0 {
        return Ok(if upper { 1.0 } else { 0.0 });
    }
    let alpha = (1.0 - level) / 2.0;
    let average = passed / total;
    let kappa = standard_quantile(1.0 - alpha)?;
    let k2 = kappa * kappa;
    let mode = (passed + 0.5 * k2) / (total + k2);
    let delta = kappa / (total + k2) * (total * average * (1.0 - average) + k2 / 4.0).sqrt();
    Ok(if upper { (mode + delta).min(1.0) } else { (mode - delta).max(0.0) })
}

/// Agresti–Coull boundary.
pub fn agresti_coull(total: f64, passed: f64, level: f64, upper: bool) -> Result<f64> {
    check_counts(total, passed)?;
    check_level(level)?;
    let alpha = (1.0 - level) / 2.0;
    let kappa = standard_quantile(1.0 - alpha)?;
    let k2 = kappa * kappa;
    let mode = (passed + 0.5 * k2) / (total + k2);
    let delta = kappa * (mode * (1.0 - mode) / (total + k2)).sqrt();
    Ok(if upper { (mode + delta).min(1.0) } else { (mode - delta).max(0.0) })
}

/// Whether outcome `k` lies in the Feldman–Cousins acceptance region of
/// `Binom(n, p)` at probability content `level`.
///
/// Outcomes are ranked by `R(j) = P(j | p) / P(j | j/n)` and added until the
/// accumulated probability reaches `level`. `ln R` is concave in `j` with its
/// peak next to `n * p`, so the ranked outcomes form a contiguous run grown
/// outwards from the mode, taking the larger neighbour first (left on ties).
fn fc_accepts(k: u64, n: u64, p: f64, level: f64) -> Result<bool> {
    let nf = n as f64;
    let outcome = |j: u64| -> Result<(u64, f64, f64)> {
        let prob = pmf(j, n, p)?;
        let best = pmf(j, n, j as f64 / nf)?;
        Ok((j, prob / best, prob))
    };
    let step_left = |j: u64| j.checked_sub(1).map(&outcome).transpose();
    let step_right = |j: u64| (j < n).then(|| outcome(j + 1)).transpose();

    let floor = ((nf * p).floor() as u64).min(n);
    let mut next = outcome(floor)?;
    if let Some(up) = step_right(floor)? {
        if up.1 > next.1 {
            next = up;
        }
    }
    let mut left = step_left(next.0)?;
    let mut right = step_right(next.0)?;

    let mut sum = 0.0;
    loop {
        let (j, _, prob) = next;
        if j == k {
            return Ok(true);
        }
        sum += prob;
        if sum >= level {
            return Ok(false);
        }
        next = match (left, right) {
            (Some(l), Some(r)) if l.1 >= r.1 => {
                left = step_left(l.0)?;
                l
            }
            (_, Some(r)) => {
                right = step_right(r.0)?;
                r
            }
            (Some(l), None) => {
                left = step_left(l.0)?;
                l
            }
            (None, None) => return Ok(false),
        };
    }
}

/// Feldman–Cousins boundary (counts are rounded to integers).
///
/// The observed ratio `k/n` is always accepted and the boundary outcome is
/// not, so each boundary is bisected between `k/n` and 0 or 1.
pub fn feldman_cousins(total: f64, passed: f64, level: f64, upper: bool) -> Result<f64> {
    check_counts(total, passed)?;
    check_level(level)?;
    let n = to_count(total)?;
    let k = to_count(passed)?;
    if n == 0 {
        return Ok(if upper { 1.0 } else { 0.0 });
    }
    if upper && k == n {
        return Ok(1.0);
    }
    if !upper && k == 0 {
        return Ok(0.0);
    }

    let ratio = k as f64 / n as f64;
    let pred = |p: f64| fc_accepts(k, n, p, level);
    if upper {
        bisect_predicate(ratio, 1.0, FC_TOL, 100, pred)
    } else {
        bisect_predicate(0.0, ratio, FC_TOL, 100, pred)
    }
}

/// Mid-P boundary (counts are rounded to integers).
///
/// Solves `P(X < k) + P(X = k)/2 = alpha` for the upper boundary and
/// `P(X > k) + P(X = k)/2 = alpha` for the lower one.
pub fn mid_p(total: f64, passed: f64, level: f64, upper: bool) -> Result<f64> {
    check_counts(total, passed)?;
    check_level(level)?;
    let n = to_count(total)?;
    let k = to_count(passed)?;
    let alpha = (1.0 - level) / 2.0;
    if n == 0 {
        return Ok(if upper { 1.0 } else { 0.0 });
    }
    if upper {
        if k == n {
            return Ok(1.0);
        }
        bisect_predicate(0.0, 1.0, 1e-10, 200, |p| {
            let mut v = 0.5 * pmf(k, n, p)?;
            for i in 0..k {
                v += pmf(i, n, p)?;
            }
            Ok(v > alpha)
        })
    } else {
        if k == 0 {
            return Ok(0.0);
        }
        bisect_predicate(0.0, 1.0, 1e-10, 200, |p| {
            let mut v = 0.5 * pmf(k, n, p)?;
            for i in (k + 1)..=n {
                v += pmf(i, n, p)?;
            }
            Ok(v < alpha)
        })
    }
}

/// Bayesian boundary for a `Beta(alpha, beta)` prior.
pub fn bayesian(
    total: f64,
    passed: f64,
    level: f64,
    prior: (f64, f64),
    upper: bool,
    shortest: bool,
) -> Result<f64> {
    check_counts(total, passed)?;
    check_level(level)?;
    let a = passed + prior.0;
    let b = total - passed + prior.1;
    let (lo, hi) = if shortest {
        beta::shortest_interval(level, a, b)?
    } else {
        beta::central_interval(level, a, b)?
    };
    Ok(if upper { hi } else { lo })
}

/// Efficiency point estimate with asymmetric errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Point estimate.
    pub value: f64,
    /// `value - lower boundary`.
    pub error_low: f64,
    /// `upper boundary - value`.
    pub error_up: f64,
}

/// Estimator settings carried by an efficiency object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Statistical estimator.
    pub statistic: StatisticOption,
    /// Probability content of the interval.
    pub confidence_level: f64,
    /// Prior `alpha` for [`StatisticOption::Bayesian`].
    pub beta_alpha: f64,
    /// Prior `beta` for [`StatisticOption::Bayesian`].
    pub beta_beta: f64,
    /// Report the posterior mode instead of the mean (Bayesian only).
    pub posterior_mode: bool,
    /// Use the shortest instead of the central interval (Bayesian only).
    pub shortest_interval: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            statistic: StatisticOption::ClopperPearson,
            confidence_level: ONE_SIGMA,
            beta_alpha: 1.0,
            beta_beta: 1.0,
            posterior_mode: false,
            shortest_interval: false,
        }
    }
}

impl EstimatorConfig {
    /// Config with the given estimator and default settings otherwise.
    pub fn with_statistic(statistic: StatisticOption) -> Self {
        Self { statistic, ..Self::default() }
    }

    /// Parse a JSON config such as `{"statistic": "wilson", "confidence_level": 0.9}`.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        check_level(cfg.confidence_level)?;
        Ok(cfg)
    }

    /// Prior parameters for the Bayesian family.
    pub fn prior(&self) -> (f64, f64) {
        match self.statistic {
            StatisticOption::Jeffrey => (0.5, 0.5),
            StatisticOption::UniformPrior => (1.0, 1.0),
            _ => (self.beta_alpha, self.beta_beta),
        }
    }

    /// Point estimate for one bin.
    pub fn value(&self, passed: f64, total: f64) -> Result<f64> {
        check_counts(total, passed)?;
        if self.statistic.is_bayesian() {
            let (pa, pb) = self.prior();
            let a = passed + pa;
            let b = total - passed + pb;
            if self.posterior_mode { beta::mode(a, b) } else { beta::mean(a, b) }
        } else if total > 0.0 {
            Ok(passed / total)
        } else {
            Ok(0.0)
        }
    }

    /// Lower or upper interval boundary for one bin.
    pub fn boundary(&self, passed: f64, total: f64, upper: bool) -> Result<f64> {
        let level = self.confidence_level;
        match self.statistic {
            StatisticOption::ClopperPearson => clopper_pearson(total, passed, level, upper),
            StatisticOption::Normal => normal(total, passed, level, upper),
            StatisticOption::Wilson => wilson(total, passed, level, upper),
            StatisticOption::AgrestiCoull => agresti_coull(total, passed, level, upper),
            StatisticOption::FeldmanCousins => feldman_cousins(total, passed, level, upper),
            StatisticOption::MidP => mid_p(total, passed, level, upper),
            StatisticOption::Jeffrey | StatisticOption::UniformPrior | StatisticOption::Bayesian => {
                bayesian(total, passed, level, self.prior(), upper, self.shortest_interval)
            }
        }
    }

    /// Point estimate plus asymmetric errors for one bin.
    pub fn estimate(&self, passed: f64, total: f64) -> Result<Estimate> {
        let value = self.value(passed, total)?;
        let lower = self.boundary(passed, total, false)?;
        let upper = self.boundary(passed, total, true)?;
        Ok(Estimate { value, error_low: value - lower, error_up: upper - value })
    }
}

/// Efficiency with errors for a single `(passed, total)` pair.
///
/// Returns `(efficiency, error_up, error_low)`.
pub fn efficiency_with_error(
    passed: f64,
    total: f64,
    statistic: &str,
    level: f64,
) -> Result<(f64, f64, f64)> {
    check_level(level)?;
    let cfg = EstimatorConfig {
        statistic: statistic.parse()?,
        confidence_level: level,
        ..EstimatorConfig::default()
    };
    let est = cfg.estimate(passed, total)?;
    tracing::trace!(passed, total, statistic = %cfg.statistic, value = est.value, "efficiency estimate");
    Ok((est.value, est.error_up, est.error_low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_aliases() {
        for s in ["clopper_pearson", "kFCP", "Clopper Pearson", "clopper-pearson", "clopper.pearson", "clopper:pearson", "clopperpearson"] {
            assert_eq!(s.parse::<StatisticOption>().unwrap(), StatisticOption::ClopperPearson, "{}", s);
        }
        assert_eq!("mid-p-interval".parse::<StatisticOption>().unwrap(), StatisticOption::MidP);
        assert_eq!("kBUniform".parse::<StatisticOption>().unwrap(), StatisticOption::UniformPrior);
        assert_eq!("agresti.coull".parse::<StatisticOption>().unwrap(), StatisticOption::AgrestiCoull);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = "frequentist-magic".parse::<StatisticOption>().unwrap_err();
        assert!(matches!(err, Error::UnknownOption { .. }));
    }

    #[test]
    fn test_code_and_label_roundtrip() {
        for o in StatisticOption::ALL {
            assert_eq!(StatisticOption::from_code(o.code()), Some(o));
            assert_eq!(o.label().parse::<StatisticOption>().unwrap(), o);
            assert_eq!(o.key().parse::<StatisticOption>().unwrap(), o);
        }
        assert_eq!(StatisticOption::from_code(42), None);
    }

    #[test]
    fn test_clopper_pearson_symmetric_at_half() {
        let lo = clopper_pearson(10.0, 5.0, ONE_SIGMA, false).unwrap();
        let hi = clopper_pearson(10.0, 5.0, ONE_SIGMA, true).unwrap();
        assert!(lo < 0.5 && hi > 0.5);
        assert_abs_diff_eq!(lo, 1.0 - hi, epsilon = 1e-6);
    }

    #[test]
    fn test_clopper_pearson_edges() {
        assert_eq!(clopper_pearson(10.0, 0.0, ONE_SIGMA, false).unwrap(), 0.0);
        assert_eq!(clopper_pearson(10.0, 10.0, ONE_SIGMA, true).unwrap(), 1.0);
        assert_eq!(clopper_pearson(0.0, 0.0, ONE_SIGMA, true).unwrap(), 1.0);
    }

    #[test]
    fn test_normal_matches_closed_form() {
        let hi = normal(10.0, 5.0, ONE_SIGMA, true).unwrap();
        let sigma = (0.25f64 / 10.0).sqrt();
        assert_abs_diff_eq!(hi, 0.5 + sigma, epsilon = 1e-5);
        assert_eq!(normal(10.0, 0.0, ONE_SIGMA, false).unwrap(), 0.0);
    }

    #[test]
    fn test_wilson_and_agresti_contain_estimate() {
        for (k, n) in [(1.0, 10.0), (5.0, 10.0), (9.0, 10.0)] {
            let p = k / n;
            let bounds: [fn(f64, f64, f64, bool) -> Result<f64>; 2] = [wilson, agresti_coull];
            for f in bounds {
                let lo = f(n, k, ONE_SIGMA, false).unwrap();
                let hi = f(n, k, ONE_SIGMA, true).unwrap();
                assert!(lo <= p && p <= hi, "k={} n={} [{}, {}]", k, n, lo, hi);
                assert!((0.0..=1.0).contains(&lo) && (0.0..=1.0).contains(&hi));
            }
        }
    }

    #[test]
    fn test_feldman_cousins_contains_estimate() {
        let lo = feldman_cousins(10.0, 3.0, ONE_SIGMA, false).unwrap();
        let hi = feldman_cousins(10.0, 3.0, ONE_SIGMA, true).unwrap();
        assert!(lo < 0.3 && 0.3 < hi, "[{}, {}]", lo, hi);
        assert_eq!(feldman_cousins(10.0, 0.0, ONE_SIGMA, false).unwrap(), 0.0);
        assert_eq!(feldman_cousins(10.0, 10.0, ONE_SIGMA, true).unwrap(), 1.0);
    }

    /// Acceptance test that ranks every outcome by sorting.
    fn fc_accepts_sorted(k: u64, n: u64, p: f64, level: f64) -> bool {
        let mut ranked: Vec<(f64, u64, f64)> = (0..=n)
            .map(|j| {
                let prob = pmf(j, n, p).unwrap();
                (prob / pmf(j, n, j as f64 / n as f64).unwrap(), j, prob)
            })
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        let mut sum = 0.0;
        for (_, j, prob) in ranked {
            if j == k {
                return true;
            }
            sum += prob;
            if sum >= level {
                break;
            }
        }
        false
    }

    #[test]
    fn test_feldman_cousins_belt_matches_full_ranking() {
        for n in [1u64, 2, 5, 10, 23] {
            for k in 0..=n {
                for p in [0.0, 0.03, 0.17, 0.31, 0.5, 0.66, 0.82, 0.97, 1.0] {
                    for level in [ONE_SIGMA, 0.9, 0.95] {
                        assert_eq!(
                            fc_accepts(k, n, p, level).unwrap(),
                            fc_accepts_sorted(k, n, p, level),
                            "k={} n={} p={} level={}",
                            k,
                            n,
                            p,
                            level
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_feldman_cousins_large_counts() {
        let start = std::time::Instant::now();
        for (n, k) in [(5_000.0_f64, 2_500.0_f64), (100_000.0, 50_000.0), (100_000.0, 1_200.0)] {
            let p = k / n;
            let sigma = (p * (1.0 - p) / n).sqrt();
            let lo = feldman_cousins(n, k, ONE_SIGMA, false).unwrap();
            let hi = feldman_cousins(n, k, ONE_SIGMA, true).unwrap();
            assert!(lo < p && p < hi, "[{}, {}]", lo, hi);
            // Large samples approach the Gaussian one-sigma band.
            assert_abs_diff_eq!(p - lo, sigma, epsilon = 0.1 * sigma);
            assert_abs_diff_eq!(hi - p, sigma, epsilon = 0.1 * sigma);
        }
        assert!(start.elapsed().as_secs_f64() < 2.0, "took {:?}", start.elapsed());
    }

    #[test]
    fn test_mid_p_is_inside_clopper_pearson() {
        let cp_lo = clopper_pearson(20.0, 6.0, ONE_SIGMA, false).unwrap();
        let cp_hi = clopper_pearson(20.0, 6.0, ONE_SIGMA, true).unwrap();
        let lo = mid_p(20.0, 6.0, ONE_SIGMA, false).unwrap();
        let hi = mid_p(20.0, 6.0, ONE_SIGMA, true).unwrap();
        assert!(cp_lo <= lo && lo < 0.3 && 0.3 < hi && hi <= cp_hi);
    }

    #[test]
    fn test_bayesian_uniform_empty_bin() {
        let cfg = EstimatorConfig::with_statistic(StatisticOption::UniformPrior);
        let est = cfg.estimate(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(est.value, 0.5, epsilon = 1e-12);
        let tail = (1.0 - ONE_SIGMA) / 2.0;
        assert_abs_diff_eq!(est.value - est.error_low, tail, epsilon = 1e-6);
        assert_abs_diff_eq!(est.value + est.error_up, 1.0 - tail, epsilon = 1e-6);
    }

    #[test]
    fn test_frequentist_empty_bin() {
        let est = EstimatorConfig::default().estimate(0.0, 0.0).unwrap();
        assert_eq!(est.value, 0.0);
        assert_eq!(est.error_low, 0.0);
        assert_eq!(est.error_up, 1.0);
    }

    #[test]
    fn test_efficiency_with_error() {
        let (eff, up, low) = efficiency_with_error(8.0, 10.0, "Clopper Pearson", ONE_SIGMA).unwrap();
        assert_abs_diff_eq!(eff, 0.8, epsilon = 1e-12);
        assert!(up > 0.0 && low > 0.0);
        assert!(eff + up <= 1.0 && eff - low >= 0.0);
        assert!(efficiency_with_error(8.0, 10.0, "nope", ONE_SIGMA).is_err());
        assert!(efficiency_with_error(11.0, 10.0, "bayesian", ONE_SIGMA).is_err());
    }

    #[test]
    fn test_config_from_json() {
        let cfg = EstimatorConfig::from_json(r#"{"statistic": "kfwilson", "confidence_level": 0.9}"#).unwrap();
        assert_eq!(cfg.statistic, StatisticOption::Wilson);
        assert_abs_diff_eq!(cfg.confidence_level, 0.9);
        assert_abs_diff_eq!(cfg.beta_alpha, 1.0);
        assert!(EstimatorConfig::from_json(r#"{"statistic": "bogus"}"#).is_err());
        assert!(EstimatorConfig::from_json(r#"{"confidence_level": 1.5}"#).is_err());
    }
}
