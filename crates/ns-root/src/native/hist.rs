//! In-memory `TH1`/`TH2`/`TH3`/`TProfile` objects.
//!
//! Cell storage follows ROOT: every axis carries an underflow and an overflow
//! cell, and the global cell index is
//! `ix + (nx + 2) * (iy + (ny + 2) * iz)`.

use ns_core::{Error, Result};

use crate::class::RootClass;
use crate::native::axis::Axis;
use crate::profile::ProfileSums;

/// Per-cell sums that only profiles carry.
#[derive(Debug, Clone, PartialEq)]
struct ProfileCells {
    /// `Σw` per cell (`fBinEntries`).
    bin_entries: Vec<f64>,
    /// `Σw²` per cell (`fBinSumw2`), empty until a non-unit weight is filled.
    bin_sumw2: Vec<f64>,
}

/// A histogram of dimension 1, 2 or 3, optionally a profile.
///
/// For plain histograms `contents` holds bin contents and `sumw2` the sum of
/// squared weights. For profiles `contents` holds `Σw·y` and `sumw2` holds
/// `Σw·y²`, matching ROOT's storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist {
    class: RootClass,
    name: String,
    title: String,
    x_axis: Axis,
    y_axis: Option<Axis>,
    z_axis: Option<Axis>,
    contents: Vec<f64>,
    sumw2: Option<Vec<f64>>,
    profile: Option<ProfileCells>,
    entries: f64,
}

impl Hist {
    fn build(
        class: RootClass,
        name: impl Into<String>,
        title: impl Into<String>,
        axes: Vec<Axis>,
    ) -> Result<Self> {
        let dim = class.hist_dimension().ok_or_else(|| {
            Error::UnsupportedType(format!("{} is not a histogram class", class))
        })?;
        if dim != axes.len() {
            return Err(Error::Dimensionality {
                expected: format!("{} axes for {}", dim, class),
                got: axes.len(),
            });
        }
        if matches!(class, RootClass::TH1 | RootClass::TH2 | RootClass::TH3) {
            return Err(Error::UnsupportedType(format!("{} is abstract", class)));
        }

        let n_cells: usize = axes.iter().map(|a| a.n_bins() + 2).product();
        let mut axes = axes.into_iter();
        let x_axis = axes.next().ok_or_else(|| Error::Validation("missing x axis".into()))?;
        let y_axis = axes.next();
        let z_axis = axes.next();
        let profile = class.is_profile().then(|| ProfileCells {
            bin_entries: vec![0.0; n_cells],
            bin_sumw2: Vec::new(),
        });
        // Profiles always carry Σw·y² in the sumw2 slot.
        let sumw2 = class.is_profile().then(|| vec![0.0; n_cells]);

        Ok(Self {
            class,
            name: name.into(),
            title: title.into(),
            x_axis,
            y_axis,
            z_axis,
            contents: vec![0.0; n_cells],
            sumw2,
            profile,
            entries: 0.0,
        })
    }

    /// One-dimensional histogram of the given class (`TH1F`, `TH1D`, `TProfile`, ...).
    pub fn new_1d(
        class: RootClass,
        name: impl Into<String>,
        title: impl Into<String>,
        x: Axis,
    ) -> Result<Self> {
        Self::build(class, name, title, vec![x])
    }

    /// Two-dimensional histogram of the given class.
    pub fn new_2d(
        class: RootClass,
        name: impl Into<String>,
        title: impl Into<String>,
        x: Axis,
        y: Axis,
    ) -> Result<Self> {
        Self::build(class, name, title, vec![x, y])
    }

    /// Three-dimensional histogram of the given class.
    pub fn new_3d(
        class: RootClass,
        name: impl Into<String>,
        title: impl Into<String>,
        x: Axis,
        y: Axis,
        z: Axis,
    ) -> Result<Self> {
        Self::build(class, name, title, vec![x, y, z])
    }

    /// `TH1D` with uniform binning.
    pub fn th1d(name: &str, title: &str, n_bins: usize, x_min: f64, x_max: f64) -> Result<Self> {
        Self::new_1d(RootClass::TH1D, name, title, Axis::uniform(n_bins, x_min, x_max)?)
    }

    /// `TH1F` with uniform binning.
    pub fn th1f(name: &str, title: &str, n_bins: usize, x_min: f64, x_max: f64) -> Result<Self> {
        Self::new_1d(RootClass::TH1F, name, title, Axis::uniform(n_bins, x_min, x_max)?)
    }

    /// `TH2D` with uniform binning on both axes.
    pub fn th2d(
        name: &str,
        title: &str,
        (nx, x_min, x_max): (usize, f64, f64),
        (ny, y_min, y_max): (usize, f64, f64),
    ) -> Result<Self> {
        Self::new_2d(
            RootClass::TH2D,
            name,
            title,
            Axis::uniform(nx, x_min, x_max)?,
            Axis::uniform(ny, y_min, y_max)?,
        )
    }

    /// `TProfile` with uniform binning.
    pub fn tprofile(name: &str, title: &str, n_bins: usize, x_min: f64, x_max: f64) -> Result<Self> {
        Self::new_1d(RootClass::TProfile, name, title, Axis::uniform(n_bins, x_min, x_max)?)
    }

    /// `TProfile2D` with uniform binning on both axes.
    pub fn tprofile2d(
        name: &str,
        title: &str,
        (nx, x_min, x_max): (usize, f64, f64),
        (ny, y_min, y_max): (usize, f64, f64),
    ) -> Result<Self> {
        Self::new_2d(
            RootClass::TProfile2D,
            name,
            title,
            Axis::uniform(nx, x_min, x_max)?,
            Axis::uniform(ny, y_min, y_max)?,
        )
    }

    /// Concrete class.
    pub fn class(&self) -> RootClass {
        self.class
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rename the histogram.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Retitle the histogram.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        1 + usize::from(self.y_axis.is_some()) + usize::from(self.z_axis.is_some())
    }

    /// Whether this is a profile histogram.
    pub fn is_profile(&self) -> bool {
        self.profile.is_some()
    }

    /// X axis.
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// Y axis, `None` for 1D histograms.
    pub fn y_axis(&self) -> Option<&Axis> {
        self.y_axis.as_ref()
    }

    /// Z axis, `None` below 3D.
    pub fn z_axis(&self) -> Option<&Axis> {
        self.z_axis.as_ref()
    }

    /// Number of regular x bins.
    pub fn nbins_x(&self) -> usize {
        self.x_axis.n_bins()
    }

    /// Number of regular y bins (1 for 1D, as in ROOT).
    pub fn nbins_y(&self) -> usize {
        self.y_axis.as_ref().map_or(1, Axis::n_bins)
    }

    /// Number of regular z bins (1 below 3D).
    pub fn nbins_z(&self) -> usize {
        self.z_axis.as_ref().map_or(1, Axis::n_bins)
    }

    /// Total number of cells including under/overflow.
    pub fn n_cells(&self) -> usize {
        self.contents.len()
    }

    /// Number of fill calls.
    pub fn entries(&self) -> f64 {
        self.entries
    }

    /// Overwrite the entry count (as stored in `fEntries`).
    pub fn set_entries(&mut self, entries: f64) {
        self.entries = entries;
    }

    /// Global cell index of `(ix, iy, iz)`.
    pub fn bin(&self, ix: usize, iy: usize, iz: usize) -> usize {
        let nx = self.nbins_x() + 2;
        let ny = self.y_axis.as_ref().map_or(1, |a| a.n_bins() + 2);
        ix + nx * (iy + ny * iz)
    }

    /// Global cell index of `(ix, iy)`.
    pub fn bin2(&self, ix: usize, iy: usize) -> usize {
        self.bin(ix, iy, 0)
    }

    /// Global indices of all regular (non-flow) cells, x fastest.
    pub fn regular_bins(&self) -> Vec<usize> {
        let span = |axis: Option<&Axis>| match axis {
            Some(a) => 1..=a.n_bins(),
            None => 0..=0,
        };
        let mut out = Vec::with_capacity(self.nbins_x() * self.nbins_y() * self.nbins_z());
        for iz in span(self.z_axis()) {
            for iy in span(self.y_axis()) {
                for ix in 1..=self.nbins_x() {
                    out.push(self.bin(ix, iy, iz));
                }
            }
        }
        out
    }

    fn check_cell(&self, cell: usize) -> Result<()> {
        if cell >= self.contents.len() {
            return Err(Error::Validation(format!(
                "bin {} out of range for {} '{}' ({} cells)",
                cell,
                self.class,
                self.name,
                self.contents.len()
            )));
        }
        Ok(())
    }

    fn profile_sums(&self, cell: usize) -> Option<ProfileSums> {
        let p = self.profile.as_ref()?;
        Some(ProfileSums {
            sum_wy: self.contents[cell],
            sum_wy2: self.sumw2.as_ref().map_or(0.0, |s| s[cell]),
            sum_w: p.bin_entries[cell],
            sum_w2: p.bin_sumw2.get(cell).copied(),
        })
    }

    /// Content of a cell (the mean for profiles).
    pub fn bin_content(&self, cell: usize) -> Result<f64> {
        self.check_cell(cell)?;
        Ok(match self.profile_sums(cell) {
            Some(p) => p.mean(),
            None => self.contents[cell],
        })
    }

    /// Error of a cell: `sqrt(Σw²)` when stored, `sqrt(|content|)` otherwise;
    /// the error on the mean for profiles.
    pub fn bin_error(&self, cell: usize) -> Result<f64> {
        self.check_cell(cell)?;
        if let Some(p) = self.profile_sums(cell) {
            return Ok(p.error_on_mean());
        }
        Ok(match &self.sumw2 {
            Some(s) => s[cell].sqrt(),
            None => self.contents[cell].abs().sqrt(),
        })
    }

    /// Overwrite the content of a cell. Not available for profiles.
    pub fn set_bin_content(&mut self, cell: usize, value: f64) -> Result<()> {
        self.check_cell(cell)?;
        if self.is_profile() {
            return Err(Error::Validation(format!(
                "cannot set bin content of profile '{}', fill it instead",
                self.name
            )));
        }
        self.contents[cell] = value;
        Ok(())
    }

    /// Overwrite the error of a cell (stores `error²` as the sum of weights squared).
    pub fn set_bin_error(&mut self, cell: usize, error: f64) -> Result<()> {
        self.check_cell(cell)?;
        if self.is_profile() {
            return Err(Error::Validation(format!(
                "cannot set bin error of profile '{}'",
                self.name
            )));
        }
        self.ensure_sumw2();
        if let Some(s) = self.sumw2.as_mut() {
            s[cell] = error * error;
        }
        Ok(())
    }

    /// Start tracking Σw² per cell, seeded with the current contents
    /// (i.e. assuming unit weights so far).
    fn ensure_sumw2(&mut self) {
        if self.sumw2.is_none() {
            self.sumw2 = Some(self.contents.iter().map(|c| c.abs()).collect());
        }
    }

    fn fill_cell(&mut self, cell: usize, w: f64) {
        if w != 1.0 {
            self.ensure_sumw2();
        }
        self.contents[cell] += w;
        if let Some(s) = self.sumw2.as_mut() {
            s[cell] += w * w;
        }
        self.entries += 1.0;
    }

    fn fill_profile_cell(&mut self, cell: usize, y: f64, w: f64) {
        let Some(p) = self.profile.as_mut() else {
            return;
        };
        if w != 1.0 && p.bin_sumw2.is_empty() {
            p.bin_sumw2 = p.bin_entries.clone();
        }
        self.contents[cell] += w * y;
        if let Some(s) = self.sumw2.as_mut() {
            s[cell] += w * y * y;
        }
        p.bin_entries[cell] += w;
        if !p.bin_sumw2.is_empty() {
            p.bin_sumw2[cell] += w * w;
        }
        self.entries += 1.0;
    }

    fn require(&self, dim: usize, profile: bool) -> Result<()> {
        if self.dimension() != dim {
            return Err(Error::Dimensionality {
                expected: format!("{}D histogram", dim),
                got: self.dimension(),
            });
        }
        if self.is_profile() != profile {
            return Err(Error::UnsupportedType(format!(
                "{} '{}' does not support this fill signature",
                self.class, self.name
            )));
        }
        Ok(())
    }

    /// Fill a 1D histogram at `x` with weight `w`; returns the cell.
    pub fn fill(&mut self, x: f64, w: f64) -> Result<usize> {
        self.require(1, false)?;
        let cell = self.x_axis.find_bin(x);
        self.fill_cell(cell, w);
        Ok(cell)
    }

    /// Fill a 2D histogram at `(x, y)` with weight `w`; returns the cell.
    pub fn fill_2d(&mut self, x: f64, y: f64, w: f64) -> Result<usize> {
        self.require(2, false)?;
        let iy = self.y_axis.as_ref().map_or(0, |a| a.find_bin(y));
        let cell = self.bin2(self.x_axis.find_bin(x), iy);
        self.fill_cell(cell, w);
        Ok(cell)
    }

    /// Fill a `TProfile` with sample `y` at `x`.
    pub fn fill_profile(&mut self, x: f64, y: f64, w: f64) -> Result<usize> {
        self.require(1, true)?;
        let cell = self.x_axis.find_bin(x);
        self.fill_profile_cell(cell, y, w);
        Ok(cell)
    }

    /// Fill a `TProfile2D` with sample `z` at `(x, y)`.
    pub fn fill_profile_2d(&mut self, x: f64, y: f64, z: f64, w: f64) -> Result<usize> {
        self.require(2, true)?;
        let iy = self.y_axis.as_ref().map_or(0, |a| a.find_bin(y));
        let cell = self.bin2(self.x_axis.find_bin(x), iy);
        self.fill_profile_cell(cell, z, w);
        Ok(cell)
    }

    /// Raw cell array (`Σw·y` for profiles).
    pub fn raw_contents(&self) -> &[f64] {
        &self.contents
    }

    /// Raw sum of squared weights (`Σw·y²` for profiles), if tracked.
    pub fn raw_sumw2(&self) -> Option<&[f64]> {
        self.sumw2.as_deref()
    }

    /// Raw `Σw` per cell for profiles.
    pub fn raw_bin_entries(&self) -> Option<&[f64]> {
        self.profile.as_ref().map(|p| p.bin_entries.as_slice())
    }

    /// Raw `Σw²` per cell for profiles (empty with unit weights).
    pub fn raw_bin_sumw2(&self) -> Option<&[f64]> {
        self.profile.as_ref().map(|p| p.bin_sumw2.as_slice())
    }

    /// Rebuild a histogram from raw cell arrays, as read from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        class: RootClass,
        name: impl Into<String>,
        title: impl Into<String>,
        axes: Vec<Axis>,
        contents: Vec<f64>,
        sumw2: Option<Vec<f64>>,
        bin_entries: Option<Vec<f64>>,
        bin_sumw2: Vec<f64>,
    ) -> Result<Self> {
        let mut h = Self::build(class, name, title, axes)?;
        let n = h.contents.len();
        let check = |what: &str, len: usize| {
            if len != n {
                Err(Error::Validation(format!("{} has {} cells, expected {}", what, len, n)))
            } else {
                Ok(())
            }
        };
        check("contents", contents.len())?;
        if let Some(s) = &sumw2 {
            check("sumw2", s.len())?;
        }
        match (&mut h.profile, bin_entries) {
            (Some(p), Some(entries)) => {
                check("bin entries", entries.len())?;
                if !bin_sumw2.is_empty() {
                    check("bin sumw2", bin_sumw2.len())?;
                }
                p.bin_entries = entries;
                p.bin_sumw2 = bin_sumw2;
            }
            (Some(_), None) => {
                return Err(Error::Validation(format!("profile '{}' needs bin entries", h.name)));
            }
            _ => {}
        }
        if h.is_profile() && sumw2.is_none() {
            return Err(Error::Validation(format!("profile '{}' needs sumw2", h.name)));
        }
        h.entries = if h.is_profile() {
            h.profile.as_ref().map_or(0.0, |p| p.bin_entries.iter().sum())
        } else {
            contents.iter().sum()
        };
        h.contents = contents;
        h.sumw2 = sumw2;
        Ok(h)
    }

    /// Same dimension and identical binning on every axis.
    pub fn same_binning(&self, other: &Hist) -> bool {
        let same = |a: Option<&Axis>, b: Option<&Axis>| match (a, b) {
            (Some(a), Some(b)) => a.same_binning(b),
            (None, None) => true,
            _ => false,
        };
        self.x_axis.same_binning(&other.x_axis)
            && same(self.y_axis(), other.y_axis())
            && same(self.z_axis(), other.z_axis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_errors() {
        let mut h = Hist::th1d("h", "", 5, 0.0, 5.0).unwrap();
        h.fill(0.5, 1.0).unwrap();
        h.fill(0.5, 1.0).unwrap();
        h.fill(-1.0, 1.0).unwrap();
        assert_eq!(h.bin_content(1).unwrap(), 2.0);
        assert_eq!(h.bin_content(0).unwrap(), 1.0);
        assert!((h.bin_error(1).unwrap() - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(h.entries(), 3.0);
    }

    #[test]
    fn test_weighted_fill_tracks_sumw2() {
        let mut h = Hist::th1d("h", "", 2, 0.0, 2.0).unwrap();
        h.fill(0.5, 1.0).unwrap();
        h.fill(0.5, 2.0).unwrap();
        assert_eq!(h.bin_content(1).unwrap(), 3.0);
        // 1² + 2²
        assert!((h.bin_error(1).unwrap() - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_global_bin_2d() {
        let h = Hist::th2d("h", "", (3, 0.0, 3.0), (2, 0.0, 2.0)).unwrap();
        assert_eq!(h.n_cells(), 5 * 4);
        assert_eq!(h.bin2(1, 1), 1 + 5);
        assert_eq!(h.bin2(3, 2), 3 + 5 * 2);
    }

    #[test]
    fn test_profile_mean_and_error() {
        let mut p = Hist::tprofile("p", "", 2, 0.0, 2.0).unwrap();
        for y in [1.0, 2.0, 3.0] {
            p.fill_profile(0.5, y, 1.0).unwrap();
        }
        assert!((p.bin_content(1).unwrap() - 2.0).abs() < 1e-12);
        let spread = (14.0f64 / 3.0 - 4.0).sqrt();
        assert!((p.bin_error(1).unwrap() - spread / 3f64.sqrt()).abs() < 1e-12);
        assert_eq!(p.bin_content(2).unwrap(), 0.0);
        assert!(p.set_bin_content(1, 4.0).is_err());
        assert!(p.fill(0.5, 1.0).is_err());
    }

    #[test]
    fn test_raw_profile_requires_sumw2() {
        let raw = |sumw2: Option<Vec<f64>>| {
            Hist::from_raw(
                RootClass::TProfile,
                "p",
                "",
                vec![Axis::uniform(1, 0.0, 1.0).unwrap()],
                vec![0.0, 6.0, 0.0],
                sumw2,
                Some(vec![0.0, 2.0, 0.0]),
                Vec::new(),
            )
        };
        let p = raw(Some(vec![0.0, 20.0, 0.0])).unwrap();
        assert_eq!(p.bin_content(1).unwrap(), 3.0);
        assert!((p.bin_error(1).unwrap() - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(matches!(raw(None), Err(Error::Validation(_))));
    }

    #[test]
    fn test_abstract_and_mismatched_classes() {
        let ax = Axis::uniform(2, 0.0, 1.0).unwrap();
        assert!(Hist::new_1d(RootClass::TH1, "h", "", ax.clone()).is_err());
        assert!(Hist::new_1d(RootClass::TH2D, "h", "", ax.clone()).is_err());
        assert!(Hist::new_1d(RootClass::TGraph, "h", "", ax).is_err());
    }

    #[test]
    fn test_set_bin_error() {
        let mut h = Hist::th1f("h", "", 3, 0.0, 3.0).unwrap();
        h.set_bin_content(2, 9.0).unwrap();
        assert_eq!(h.bin_error(2).unwrap(), 3.0);
        h.set_bin_error(2, 0.5).unwrap();
        assert_eq!(h.bin_error(2).unwrap(), 0.5);
        assert!(h.set_bin_content(99, 1.0).is_err());
    }
}
