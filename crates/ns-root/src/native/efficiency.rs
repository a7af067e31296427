//! In-memory `TEfficiency`: a passed/total histogram pair plus an estimator.

use ns_core::{Error, Result};
use ns_prob::{Estimate, EstimatorConfig, StatisticOption};

use crate::class::RootClass;
use crate::native::hist::Hist;

/// Efficiency built from two histograms of identical type and binning.
#[derive(Debug, Clone, PartialEq)]
pub struct Efficiency {
    name: String,
    title: String,
    passed: Hist,
    total: Hist,
    config: EstimatorConfig,
}

impl Efficiency {
    /// Pair `passed` with `total` using the default estimator
    /// (Clopper-Pearson at one sigma).
    ///
    /// Fails with [`Error::InconsistentPair`] when the histograms differ in
    /// class or binning, or when any cell has more passed than total entries.
    pub fn new(passed: Hist, total: Hist) -> Result<Self> {
        Self::with_config(passed, total, EstimatorConfig::default())
    }

    /// Like [`Efficiency::new`] with an explicit estimator config.
    pub fn with_config(passed: Hist, total: Hist, config: EstimatorConfig) -> Result<Self> {
        if passed.class() != total.class() {
            return Err(Error::InconsistentPair(format!(
                "passed is {} but total is {}",
                passed.class(),
                total.class()
            )));
        }
        if passed.is_profile() {
            return Err(Error::UnsupportedType(format!(
                "cannot build an efficiency from profile {}",
                passed.class()
            )));
        }
        if !passed.same_binning(&total) {
            return Err(Error::InconsistentPair(format!(
                "'{}' and '{}' have different binning",
                passed.name(),
                total.name()
            )));
        }
        for cell in 0..total.n_cells() {
            let (p, t) = (passed.bin_content(cell)?, total.bin_content(cell)?);
            if p > t {
                return Err(Error::InconsistentPair(format!(
                    "bin {} has {} passed but only {} total entries",
                    cell, p, t
                )));
            }
        }
        check_level(config.confidence_level)?;

        tracing::debug!(
            name = total.name(),
            class = %total.class(),
            dim = total.dimension(),
            statistic = %config.statistic,
            "efficiency constructed"
        );
        Ok(Self {
            name: total.name().to_string(),
            title: total.title().to_string(),
            passed,
            total,
            config,
        })
    }

    /// Efficiency name (defaults to the total histogram's name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Efficiency title (defaults to the total histogram's title).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rename.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Retitle.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Histogram of passed entries.
    pub fn passed(&self) -> &Hist {
        &self.passed
    }

    /// Histogram of all entries.
    pub fn total(&self) -> &Hist {
        &self.total
    }

    /// Class of the underlying histograms.
    pub fn hist_class(&self) -> RootClass {
        self.total.class()
    }

    /// Dimension of the underlying histograms.
    pub fn dimension(&self) -> usize {
        self.total.dimension()
    }

    /// Estimator settings.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Replace the estimator settings.
    pub fn set_config(&mut self, config: EstimatorConfig) -> Result<()> {
        check_level(config.confidence_level)?;
        self.config = config;
        Ok(())
    }

    /// Current estimator.
    pub fn statistic_option(&self) -> StatisticOption {
        self.config.statistic
    }

    /// Select the estimator by any accepted alias (`"wilson"`, `"kFCP"`, ...).
    pub fn set_statistic_option(&mut self, option: &str) -> Result<()> {
        self.config.statistic = option.parse()?;
        Ok(())
    }

    /// Display label of the current estimator, e.g. `"Clopper Pearson"`.
    pub fn statistic_label(&self) -> &'static str {
        self.config.statistic.label()
    }

    /// Confidence level of the error intervals.
    pub fn confidence_level(&self) -> f64 {
        self.config.confidence_level
    }

    /// Set the confidence level; must lie strictly between 0 and 1.
    pub fn set_confidence_level(&mut self, level: f64) -> Result<()> {
        check_level(level)?;
        self.config.confidence_level = level;
        Ok(())
    }

    /// Beta prior used by [`StatisticOption::Bayesian`].
    pub fn set_beta_prior(&mut self, alpha: f64, beta: f64) -> Result<()> {
        if !(alpha > 0.0 && beta > 0.0) {
            return Err(Error::Validation(format!(
                "beta prior parameters must be positive, got ({}, {})",
                alpha, beta
            )));
        }
        self.config.beta_alpha = alpha;
        self.config.beta_beta = beta;
        Ok(())
    }

    /// Estimate with errors for a global cell index of the total histogram.
    pub fn estimate(&self, cell: usize) -> Result<Estimate> {
        let passed = self.passed.bin_content(cell)?;
        let total = self.total.bin_content(cell)?;
        self.config.estimate(passed, total)
    }

    /// Point estimate for a cell.
    pub fn efficiency(&self, cell: usize) -> Result<f64> {
        let passed = self.passed.bin_content(cell)?;
        let total = self.total.bin_content(cell)?;
        self.config.value(passed, total)
    }

    /// Distance from the estimate down to the lower interval boundary.
    pub fn error_low(&self, cell: usize) -> Result<f64> {
        Ok(self.estimate(cell)?.error_low)
    }

    /// Distance from the estimate up to the upper interval boundary.
    pub fn error_up(&self, cell: usize) -> Result<f64> {
        Ok(self.estimate(cell)?.error_up)
    }

    /// Histogram of efficiencies over the regular bins of the total histogram.
    ///
    /// Bin error is the larger of the two asymmetric errors.
    pub fn create_histogram(&self) -> Result<Hist> {
        let axes = [Some(self.total.x_axis()), self.total.y_axis(), self.total.z_axis()];
        let axes: Vec<_> = axes.into_iter().flatten().cloned().collect();
        let class = match axes.len() {
            1 => RootClass::TH1D,
            2 => RootClass::TH2D,
            _ => RootClass::TH3D,
        };
        let mut hist = match axes.len() {
            1 => Hist::new_1d(class, self.name.as_str(), self.title.as_str(), axes[0].clone())?,
            2 => Hist::new_2d(class, self.name.as_str(), self.title.as_str(), axes[0].clone(), axes[1].clone())?,
            _ => Hist::new_3d(
                class,
                self.name.as_str(),
                self.title.as_str(),
                axes[0].clone(),
                axes[1].clone(),
                axes[2].clone(),
            )?,
        };
        for cell in self.total.regular_bins() {
            let est = self.estimate(cell)?;
            hist.set_bin_content(cell, est.value)?;
            hist.set_bin_error(cell, est.error_low.max(est.error_up))?;
        }
        Ok(hist)
    }
}

fn check_level(level: f64) -> Result<()> {
    if !(level > 0.0 && level < 1.0) {
        return Err(Error::Validation(format!(
            "confidence level must be in (0, 1), got {}",
            level
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (Hist, Hist) {
        let mut passed = Hist::th1d("passed", "", 2, 0.0, 2.0).unwrap();
        let mut total = Hist::th1d("total", "Trigger", 2, 0.0, 2.0).unwrap();
        passed.set_bin_content(1, 5.0).unwrap();
        passed.set_bin_content(2, 8.0).unwrap();
        total.set_bin_content(1, 10.0).unwrap();
        total.set_bin_content(2, 10.0).unwrap();
        (passed, total)
    }

    #[test]
    fn test_name_defaults_from_total() {
        let (p, t) = pair();
        let eff = Efficiency::new(p, t).unwrap();
        assert_eq!(eff.name(), "total");
        assert_eq!(eff.title(), "Trigger");
        assert_eq!(eff.statistic_label(), "Clopper Pearson");
        assert!((eff.efficiency(1).unwrap() - 0.5).abs() < 1e-12);
        assert!((eff.efficiency(2).unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_inconsistent_pairs() {
        let (p, _) = pair();
        let other = Hist::th1f("t", "", 2, 0.0, 2.0).unwrap();
        assert!(matches!(Efficiency::new(p.clone(), other), Err(Error::InconsistentPair(_))));

        let rebinned = Hist::th1d("t", "", 4, 0.0, 2.0).unwrap();
        assert!(matches!(Efficiency::new(p.clone(), rebinned), Err(Error::InconsistentPair(_))));

        let small = Hist::th1d("t", "", 2, 0.0, 2.0).unwrap();
        assert!(matches!(Efficiency::new(p, small), Err(Error::InconsistentPair(_))));
    }

    #[test]
    fn test_statistic_option_setter() {
        let (p, t) = pair();
        let mut eff = Efficiency::new(p, t).unwrap();
        eff.set_statistic_option("Wilson").unwrap();
        assert_eq!(eff.statistic_option(), StatisticOption::Wilson);
        assert!(matches!(
            eff.set_statistic_option("nonsense"),
            Err(Error::UnknownOption { .. })
        ));
        assert!(eff.set_confidence_level(1.5).is_err());
    }

    #[test]
    fn test_create_histogram() {
        let (p, t) = pair();
        let eff = Efficiency::new(p, t).unwrap();
        let h = eff.create_histogram().unwrap();
        assert_eq!(h.class(), RootClass::TH1D);
        assert!((h.bin_content(2).unwrap() - 0.8).abs() < 1e-12);
        let est = eff.estimate(2).unwrap();
        assert!((h.bin_error(2).unwrap() - est.error_low.max(est.error_up)).abs() < 1e-12);
    }
}
