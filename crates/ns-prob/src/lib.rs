//! Probability building blocks for NextStat.
//!
//! This crate hosts the statistics used by the ROOT conversion layer:
//! - base distributions (binomial pmf, beta and normal quantiles)
//! - binomial-proportion confidence intervals ([`interval`]), mirroring the
//!   estimators of ROOT's `TEfficiency`
//! - the chi-square systematic-variance solver ([`systematics`])
//! - small numeric helpers (bracketed root finding, 1D minimization)

pub mod beta;
pub mod binomial;
pub mod interval;
pub mod math;
pub mod normal;
pub mod systematics;

pub use interval::{EstimatorConfig, Estimate, ONE_SIGMA, StatisticOption, efficiency_with_error};
pub use systematics::systematic_variance_chi2;
