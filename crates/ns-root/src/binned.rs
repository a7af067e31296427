//! Binned extraction: histograms and profiles to parallel arrays.
//!
//! A bin is kept when it lies entirely inside the window on its axis
//! (`low >= min` and `up <= max`, each clause only when the bound is set).
//! Windows on the two axes of a 2D object are independent.

use nalgebra::DMatrix;
use ns_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::kind::{Representation, Source};
use crate::table::Field;
use crate::view::{BinnedObject, binned_view};

/// Optional inclusive range on one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Lower bound, unbounded when `None`.
    pub min: Option<f64>,
    /// Upper bound, unbounded when `None`.
    pub max: Option<f64>,
}

impl Window {
    /// Window with both bounds optional.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Point test used by the graph mask: `min <= v <= max`.
    pub fn contains(&self, v: f64) -> bool {
        self.min.is_none_or(|m| v >= m) && self.max.is_none_or(|m| v <= m)
    }

    fn validate(&self, axis: &str) -> Result<()> {
        if self.min.is_some_and(f64::is_nan) || self.max.is_some_and(f64::is_nan) {
            return Err(Error::Validation(format!("{} window bound is NaN", axis)));
        }
        Ok(())
    }
}

/// Extraction options shared by the binned and graph extractors.
///
/// Loadable from JSON, e.g. `{"xmin": 1.0, "xmax": 4.0}`; missing keys are
/// unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Lower x bound.
    pub xmin: Option<f64>,
    /// Upper x bound.
    pub xmax: Option<f64>,
    /// Lower y bound (2D objects only).
    pub ymin: Option<f64>,
    /// Upper y bound (2D objects only).
    pub ymax: Option<f64>,
}

impl ExtractOptions {
    /// Restrict x to `[min, max]`.
    pub fn x_range(mut self, min: f64, max: f64) -> Self {
        self.xmin = Some(min);
        self.xmax = Some(max);
        self
    }

    /// Restrict y to `[min, max]`.
    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.ymin = Some(min);
        self.ymax = Some(max);
        self
    }

    /// Window on x.
    pub fn x_window(&self) -> Window {
        Window::new(self.xmin, self.xmax)
    }

    /// Window on y.
    pub fn y_window(&self) -> Window {
        Window::new(self.ymin, self.ymax)
    }

    /// Parse options from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject NaN bounds.
    pub fn validate(&self) -> Result<()> {
        self.x_window().validate("x")?;
        self.y_window().validate("y")
    }
}

/// 1D extraction result.
#[derive(Debug, Clone, PartialEq)]
pub struct Binned1D {
    /// Bin centers.
    pub x: Vec<f64>,
    /// Bin values.
    pub y: Vec<f64>,
    /// Kept lower edges plus the last kept upper edge (empty if nothing kept).
    pub x_edges: Vec<f64>,
    /// Half bin widths.
    pub ex: Vec<f64>,
    /// Bin errors.
    pub ey: Vec<f64>,
}

impl Binned1D {
    /// Number of kept bins.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether no bin was kept.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Table columns (`x`, `y`, `ex`, `ey`).
    pub fn columns(&self) -> Vec<(Field, &[f64])> {
        vec![
            (Field::X, self.x.as_slice()),
            (Field::Y, self.y.as_slice()),
            (Field::Ex, self.ex.as_slice()),
            (Field::Ey, self.ey.as_slice()),
        ]
    }
}

/// 2D extraction result. Grids have one row per kept y bin and one column
/// per kept x bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Binned2D {
    /// X bin centers.
    pub x: Vec<f64>,
    /// Y bin centers.
    pub y: Vec<f64>,
    /// Value grid.
    pub values: DMatrix<f64>,
    /// X edges of the kept bins.
    pub x_edges: Vec<f64>,
    /// Y edges of the kept bins.
    pub y_edges: Vec<f64>,
    /// Half widths along x.
    pub ex: Vec<f64>,
    /// Half widths along y.
    pub ey: Vec<f64>,
    /// Error grid.
    pub errors: DMatrix<f64>,
}

/// Output of [`extract_binned`].
#[derive(Debug, Clone, PartialEq)]
pub enum BinnedArrays {
    /// Five arrays of a 1D histogram or profile.
    OneD(Binned1D),
    /// Eight structures of a 2D histogram or profile.
    TwoD(Binned2D),
}

impl BinnedArrays {
    /// The 1D result, if this is one.
    pub fn as_1d(&self) -> Option<&Binned1D> {
        match self {
            BinnedArrays::OneD(b) => Some(b),
            BinnedArrays::TwoD(_) => None,
        }
    }

    /// The 2D result, if this is one.
    pub fn as_2d(&self) -> Option<&Binned2D> {
        match self {
            BinnedArrays::TwoD(b) => Some(b),
            BinnedArrays::OneD(_) => None,
        }
    }
}

fn kept_edges(edges: &[f64], range: &std::ops::Range<usize>) -> Vec<f64> {
    if range.is_empty() { Vec::new() } else { edges[range.start..=range.end].to_vec() }
}

/// Extract arrays from an already injected view.
pub fn extract_binned_view(view: &BinnedObject, opts: &ExtractOptions) -> Result<BinnedArrays> {
    opts.validate()?;
    let xr = view.x.select(&opts.x_window());
    let x: Vec<f64> = xr.clone().map(|i| view.x.center(i)).collect();
    let ex: Vec<f64> = xr.clone().map(|i| view.x.half_width(i)).collect();
    let x_edges = kept_edges(view.x.edges(), &xr);

    let Some(y_axis) = &view.y else {
        tracing::debug!(kind = %view.kind, kept = xr.len(), of = view.x.n_bins(), "binned 1D extraction");
        return Ok(BinnedArrays::OneD(Binned1D {
            x,
            y: xr.clone().map(|i| view.value(i, 0)).collect(),
            x_edges,
            ex,
            ey: xr.map(|i| view.error(i, 0)).collect(),
        }));
    };

    let yr = y_axis.select(&opts.y_window());
    let (rows, cols) = (yr.len(), xr.len());
    let values = DMatrix::from_fn(rows, cols, |r, c| view.value(xr.start + c, yr.start + r));
    let errors = DMatrix::from_fn(rows, cols, |r, c| view.error(xr.start + c, yr.start + r));
    tracing::debug!(kind = %view.kind, kept_x = cols, kept_y = rows, "binned 2D extraction");
    Ok(BinnedArrays::TwoD(Binned2D {
        x,
        y: yr.clone().map(|j| y_axis.center(j)).collect(),
        values,
        x_edges,
        y_edges: kept_edges(y_axis.edges(), &yr),
        ex,
        ey: yr.map(|j| y_axis.half_width(j)).collect(),
        errors,
    }))
}

/// Classify a histogram or profile from either representation and extract
/// its arrays.
pub fn extract_binned<'a>(
    src: impl Into<Source<'a>>,
    opts: &ExtractOptions,
    repr: Representation,
) -> Result<BinnedArrays> {
    let view = binned_view(src.into(), repr)?;
    extract_binned_view(&view, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::Hist;

    fn ramp() -> Hist {
        let mut h = Hist::th1d("h", "", 5, 0.0, 5.0).unwrap();
        for i in 1..=5 {
            h.set_bin_content(i, i as f64).unwrap();
        }
        h
    }

    #[test]
    fn test_window_1_to_4() {
        let opts = ExtractOptions::default().x_range(1.0, 4.0);
        let out = extract_binned(&ramp(), &opts, Representation::Native).unwrap();
        let b = out.as_1d().unwrap();
        assert_eq!(b.x, vec![1.5, 2.5, 3.5]);
        assert_eq!(b.y, vec![2.0, 3.0, 4.0]);
        assert_eq!(b.x_edges, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(b.ex, vec![0.5; 3]);
    }

    #[test]
    fn test_empty_selection() {
        let opts = ExtractOptions { xmin: Some(2.2), xmax: Some(2.8), ..Default::default() };
        let out = extract_binned(&ramp(), &opts, Representation::Native).unwrap();
        let b = out.as_1d().unwrap();
        assert!(b.is_empty());
        assert!(b.x_edges.is_empty());
    }

    #[test]
    fn test_2d_grid_orientation() {
        let mut h = Hist::th2d("h", "", (3, 0.0, 3.0), (2, 0.0, 2.0)).unwrap();
        h.set_bin_content(h.bin2(3, 1), 7.0).unwrap();
        let out = extract_binned(&h, &ExtractOptions::default(), Representation::Native).unwrap();
        let b = out.as_2d().unwrap();
        assert_eq!(b.values.shape(), (2, 3));
        assert_eq!(b.values[(0, 2)], 7.0);
        assert_eq!(b.y_edges, vec![0.0, 1.0, 2.0]);

        let opts = ExtractOptions::default().y_range(1.0, 2.0);
        let out = extract_binned(&h, &opts, Representation::Native).unwrap();
        let b = out.as_2d().unwrap();
        assert_eq!(b.values.shape(), (1, 3));
        assert_eq!(b.y, vec![1.5]);
    }

    #[test]
    fn test_options_from_json() {
        let opts = ExtractOptions::from_json(r#"{"xmin": 1.0}"#).unwrap();
        assert_eq!(opts.xmin, Some(1.0));
        assert_eq!(opts.xmax, None);
        assert!(ExtractOptions::from_json(r#"{"xmin": "a"}"#).is_err());
    }
}
