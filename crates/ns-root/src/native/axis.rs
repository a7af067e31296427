//! `TAxis`-style binning with ROOT's 1-based bin numbering.
//!
//! Bin `0` is the underflow and bin `n_bins + 1` the overflow; regular bins
//! are `1..=n_bins`.

use ns_core::{Error, Result};

/// A histogram axis, either uniform or with explicit variable-width edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    n_bins: usize,
    x_min: f64,
    x_max: f64,
    /// Variable-width bin edges (empty for uniform binning).
    bin_edges: Vec<f64>,
    title: String,
}

impl Axis {
    /// Uniform binning of `[x_min, x_max)` into `n_bins` bins.
    pub fn uniform(n_bins: usize, x_min: f64, x_max: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::Validation("axis must have at least one bin".to_string()));
        }
        if !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
            return Err(Error::Validation(format!(
                "invalid axis range [{}, {}]",
                x_min, x_max
            )));
        }
        Ok(Self { n_bins, x_min, x_max, bin_edges: Vec::new(), title: String::new() })
    }

    /// Variable-width binning from explicit edges (length = n_bins + 1).
    pub fn variable(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::Validation(format!(
                "need at least 2 bin edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Validation("bin edges must be finite and strictly increasing".into()));
        }
        Ok(Self {
            n_bins: edges.len() - 1,
            x_min: edges[0],
            x_max: edges[edges.len() - 1],
            bin_edges: edges,
            title: String::new(),
        })
    }

    /// Number of regular bins.
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Lower edge of the first bin.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Upper edge of the last bin.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Whether the axis has explicit variable-width edges.
    pub fn is_variable(&self) -> bool {
        !self.bin_edges.is_empty()
    }

    /// Axis title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the axis title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    fn uniform_width(&self) -> f64 {
        (self.x_max - self.x_min) / self.n_bins as f64
    }

    /// Lower edge of bin `i` (valid for `1..=n_bins + 1`).
    pub fn bin_low_edge(&self, i: usize) -> f64 {
        if self.is_variable() && (1..=self.n_bins + 1).contains(&i) {
            return self.bin_edges[i - 1];
        }
        self.x_min + (i as f64 - 1.0) * self.uniform_width()
    }

    /// Upper edge of bin `i`.
    pub fn bin_up_edge(&self, i: usize) -> f64 {
        self.bin_low_edge(i + 1)
    }

    /// Center of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        0.5 * (self.bin_low_edge(i) + self.bin_up_edge(i))
    }

    /// Width of bin `i`.
    pub fn bin_width(&self, i: usize) -> f64 {
        self.bin_up_edge(i) - self.bin_low_edge(i)
    }

    /// Bin number containing `x`: `0` below range, `n_bins + 1` at or above
    /// `x_max`.
    pub fn find_bin(&self, x: f64) -> usize {
        if x.is_nan() || x < self.x_min {
            return 0;
        }
        if x >= self.x_max {
            return self.n_bins + 1;
        }
        if self.is_variable() {
            // First edge strictly greater than x marks the upper edge of its bin.
            self.bin_edges.partition_point(|&e| e <= x)
        } else {
            let i = ((x - self.x_min) / self.uniform_width()) as usize + 1;
            i.min(self.n_bins)
        }
    }

    /// All `n_bins + 1` edges.
    pub fn edges(&self) -> Vec<f64> {
        if self.is_variable() {
            self.bin_edges.clone()
        } else {
            (1..=self.n_bins + 1).map(|i| self.bin_low_edge(i)).collect()
        }
    }

    /// Same number of bins and same edges.
    pub fn same_binning(&self, other: &Axis) -> bool {
        self.n_bins == other.n_bins
            && self.edges().iter().zip(other.edges()).all(|(a, b)| (a - b).abs() <= 1e-12 * a.abs().max(1.0))
    }
}
