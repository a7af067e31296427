//! Profile-histogram bin statistics.
//!
//! A profile cell stores running sums rather than a value:
//! `Σw·y` (the `fArray` slot), `Σw·y²` (the `fSumw2` slot), `Σw`
//! (`fBinEntries`) and optionally `Σw²` (`fBinSumw2`). Both object
//! representations derive bin value and error from these sums here.

/// Running sums of one profile cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileSums {
    /// `Σ w·y`
    pub sum_wy: f64,
    /// `Σ w·y²`
    pub sum_wy2: f64,
    /// `Σ w`
    pub sum_w: f64,
    /// `Σ w²`, absent when only unit weights were filled.
    pub sum_w2: Option<f64>,
}

impl ProfileSums {
    /// Mean of the filled `y` values, zero for an empty cell.
    pub fn mean(&self) -> f64 {
        if self.sum_w == 0.0 { 0.0 } else { self.sum_wy / self.sum_w }
    }

    /// Effective number of entries `(Σw)² / Σw²`.
    pub fn n_effective(&self) -> f64 {
        match self.sum_w2 {
            Some(w2) if w2 > 0.0 => self.sum_w * self.sum_w / w2,
            _ => self.sum_w,
        }
    }

    /// Spread of the filled `y` values.
    pub fn spread(&self) -> f64 {
        if self.sum_w == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_wy2 / self.sum_w - mean * mean).abs().sqrt()
    }

    /// Error on the mean: `spread / sqrt(N_eff)`, zero for an empty cell.
    pub fn error_on_mean(&self) -> f64 {
        let neff = self.n_effective();
        if self.sum_w == 0.0 || neff <= 0.0 { 0.0 } else { self.spread() / neff.sqrt() }
    }
}
