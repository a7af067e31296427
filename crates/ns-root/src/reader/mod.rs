//! Lightweight reader representation.
//!
//! Objects as a streaming reader hands them out: a class name, the flattened
//! list of base class names, and a map of raw streamer members
//! (`fArray`, `fSumw2`, `fXaxis`, `fX`, ...). There are no typed accessors
//! beyond member lookup and the histogram helpers `values()`, `errors()`
//! and [`ReaderModel::axis_edges`].
//!
//! Member layout mirrors the on-disk streamers:
//! ```text
//! TH1x / TH2x / TProfile*
//!   ├─ fName, fTitle
//!   ├─ fXaxis, fYaxis, fZaxis   (TAxis: fNbins, fXmin, fXmax, fXbins)
//!   ├─ fEntries
//!   ├─ fSumw2                   (Σw² per cell incl. flow, may be empty)
//!   ├─ fArray                   (cell contents incl. flow)
//!   └─ fBinEntries, fBinSumw2   (profiles only)
//! TGraph*
//!   ├─ fNpoints, fX, fY [, fZ]
//!   └─ fEX, fEY | fEXlow, fEXhigh, fEYlow, fEYhigh
//! TEfficiency
//!   ├─ fPassedHistogram, fTotalHistogram
//!   └─ fStatisticOption, fConfLevel, fBeta_alpha, fBeta_beta
//! ```

mod convert;

use std::collections::BTreeMap;

use ns_core::{Error, Result};

use crate::profile::ProfileSums;

/// A raw streamer member.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// Integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// String (`TString`).
    Str(String),
    /// Numeric array (`TArrayD` and friends, or a graph coordinate buffer).
    Array(Vec<f64>),
    /// Embedded object (`TAxis`, nested histograms).
    Object(Box<ReaderModel>),
}

/// An object as produced by the streaming reader.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderModel {
    classname: String,
    bases: Vec<String>,
    members: BTreeMap<String, Member>,
}

/// Strip the versioned model decoration (`Model_TH1D_v3` -> `TH1D`).
fn plain_class_name(name: &str) -> &str {
    let Some(rest) = name.strip_prefix("Model_") else {
        return name;
    };
    match rest.rfind("_v") {
        Some(pos) if rest[pos + 2..].chars().all(|c| c.is_ascii_digit()) && pos + 2 < rest.len() => {
            &rest[..pos]
        }
        _ => rest,
    }
}

impl ReaderModel {
    /// Empty model of the given class.
    pub fn new(classname: impl Into<String>) -> Self {
        Self { classname: classname.into(), bases: Vec::new(), members: BTreeMap::new() }
    }

    /// Builder: append base class names.
    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases.extend(bases.into_iter().map(Into::into));
        self
    }

    /// Builder: set a member.
    pub fn with_member(mut self, name: impl Into<String>, value: Member) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    /// Set a member in place.
    pub fn set_member(&mut self, name: impl Into<String>, value: Member) {
        self.members.insert(name.into(), value);
    }

    /// Class name, possibly in versioned model form.
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// Flattened base class names.
    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    /// `true` when the object's class or any of its bases is `class`.
    pub fn is_instance(&self, class: &str) -> bool {
        plain_class_name(&self.classname) == class
            || self.bases.iter().any(|b| plain_class_name(b) == class)
    }

    /// Raw member lookup.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Whether a member is present.
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    fn require(&self, name: &str) -> Result<&Member> {
        self.member(name).ok_or_else(|| {
            Error::Validation(format!("{} has no member '{}'", self.classname, name))
        })
    }

    fn wrong_type(&self, name: &str, expected: &str) -> Error {
        Error::Validation(format!("{} member '{}' is not {}", self.classname, name, expected))
    }

    /// Numeric scalar member (integers widen to `f64`).
    pub fn member_f64(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            Member::Float(v) => Ok(*v),
            Member::Int(v) => Ok(*v as f64),
            _ => Err(self.wrong_type(name, "a number")),
        }
    }

    /// Integer scalar member.
    pub fn member_i64(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            Member::Int(v) => Ok(*v),
            _ => Err(self.wrong_type(name, "an integer")),
        }
    }

    /// String member.
    pub fn member_str(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            Member::Str(s) => Ok(s.as_str()),
            _ => Err(self.wrong_type(name, "a string")),
        }
    }

    /// Array member.
    pub fn member_array(&self, name: &str) -> Result<&[f64]> {
        match self.require(name)? {
            Member::Array(v) => Ok(v.as_slice()),
            _ => Err(self.wrong_type(name, "an array")),
        }
    }

    /// Embedded object member.
    pub fn member_object(&self, name: &str) -> Result<&ReaderModel> {
        match self.require(name)? {
            Member::Object(o) => Ok(o.as_ref()),
            _ => Err(self.wrong_type(name, "an object")),
        }
    }

    /// `fName`, empty when absent.
    pub fn name(&self) -> &str {
        self.member_str("fName").unwrap_or("")
    }

    /// `fTitle`, empty when absent.
    pub fn title(&self) -> &str {
        self.member_str("fTitle").unwrap_or("")
    }

    /// Bin edges of the axis stored under `axis` (`"fXaxis"`, `"fYaxis"`).
    pub fn axis_edges(&self, axis: &str) -> Result<Vec<f64>> {
        let ax = self.member_object(axis)?;
        let xbins = ax.member_array("fXbins").unwrap_or(&[]);
        if !xbins.is_empty() {
            return Ok(xbins.to_vec());
        }
        let n = ax.member_i64("fNbins")?;
        if n <= 0 {
            return Err(Error::Validation(format!("{} has {} bins", axis, n)));
        }
        let (lo, hi) = (ax.member_f64("fXmin")?, ax.member_f64("fXmax")?);
        let width = (hi - lo) / n as f64;
        Ok((0..=n).map(|i| lo + i as f64 * width).collect())
    }

    /// Histogram dimension from the class lineage.
    pub fn hist_dimension(&self) -> Option<usize> {
        if self.is_instance("TH3") {
            Some(3)
        } else if self.is_instance("TH2") {
            Some(2)
        } else if self.is_instance("TH1") {
            Some(1)
        } else {
            None
        }
    }

    fn is_profile(&self) -> bool {
        self.is_instance("TProfile") || self.is_instance("TProfile2D") || self.is_instance("TProfile3D")
    }

    /// Regular-bin counts per axis, up to 2D.
    fn grid_shape(&self) -> Result<(usize, usize)> {
        let nx = self.axis_edges("fXaxis")?.len() - 1;
        let ny = match self.hist_dimension() {
            Some(1) => 1,
            Some(2) => self.axis_edges("fYaxis")?.len() - 1,
            other => {
                return Err(Error::Dimensionality {
                    expected: "1D or 2D histogram".into(),
                    got: other.unwrap_or(0),
                });
            }
        };
        Ok((nx, ny))
    }

    /// Global indices of the regular cells, row-major with x fastest.
    fn regular_cells(&self) -> Result<(Vec<usize>, usize)> {
        let (nx, ny) = self.grid_shape()?;
        let two_d = self.hist_dimension() == Some(2);
        let mut cells = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            for ix in 0..nx {
                let gy = if two_d { iy + 1 } else { 0 };
                cells.push((ix + 1) + (nx + 2) * gy);
            }
        }
        let n_cells = if two_d { (nx + 2) * (ny + 2) } else { nx + 2 };
        Ok((cells, n_cells))
    }

    fn cell_array(&self, name: &str, n_cells: usize) -> Result<Option<&[f64]>> {
        match self.member(name) {
            None => Ok(None),
            Some(Member::Array(a)) if a.is_empty() => Ok(None),
            Some(Member::Array(a)) if a.len() == n_cells => Ok(Some(a.as_slice())),
            Some(Member::Array(a)) => Err(Error::Validation(format!(
                "{} member '{}' has {} cells, expected {}",
                self.classname,
                name,
                a.len(),
                n_cells
            ))),
            Some(_) => Err(self.wrong_type(name, "an array")),
        }
    }

    fn profile_sums(&self, n_cells: usize) -> Result<impl Fn(usize) -> ProfileSums + '_> {
        let sum_wy = self.member_array("fArray")?;
        if sum_wy.len() != n_cells {
            return Err(Error::Validation(format!(
                "{} fArray has {} cells, expected {}",
                self.classname,
                sum_wy.len(),
                n_cells
            )));
        }
        let sum_wy2 = self.cell_array("fSumw2", n_cells)?.ok_or_else(|| {
            Error::Validation(format!("{} profile has no fSumw2", self.classname))
        })?;
        let sum_w = self.cell_array("fBinEntries", n_cells)?.ok_or_else(|| {
            Error::Validation(format!("{} profile has no fBinEntries", self.classname))
        })?;
        let sum_w2 = self.cell_array("fBinSumw2", n_cells)?;
        Ok(move |c: usize| ProfileSums {
            sum_wy: sum_wy[c],
            sum_wy2: sum_wy2[c],
            sum_w: sum_w[c],
            sum_w2: sum_w2.map(|a| a[c]),
        })
    }

    /// Bin values without flow cells, row-major (`iy * nx + ix`) for 2D.
    /// Profiles report the per-bin mean.
    pub fn values(&self) -> Result<Vec<f64>> {
        let (cells, n_cells) = self.regular_cells()?;
        if self.is_profile() {
            let sums = self.profile_sums(n_cells)?;
            return Ok(cells.into_iter().map(|c| sums(c).mean()).collect());
        }
        let arr = self.cell_array("fArray", n_cells)?.ok_or_else(|| {
            Error::Validation(format!("{} has no fArray", self.classname))
        })?;
        Ok(cells.into_iter().map(|c| arr[c]).collect())
    }

    /// Bin errors in the layout of [`ReaderModel::values`]: `sqrt(fSumw2)`
    /// when stored, `sqrt(|value|)` otherwise; error on the mean for profiles.
    pub fn errors(&self) -> Result<Vec<f64>> {
        let (cells, n_cells) = self.regular_cells()?;
        if self.is_profile() {
            let sums = self.profile_sums(n_cells)?;
            return Ok(cells.into_iter().map(|c| sums(c).error_on_mean()).collect());
        }
        let arr = self.cell_array("fArray", n_cells)?.ok_or_else(|| {
            Error::Validation(format!("{} has no fArray", self.classname))
        })?;
        Ok(match self.cell_array("fSumw2", n_cells)? {
            Some(sw2) => cells.into_iter().map(|c| sw2[c].sqrt()).collect(),
            None => cells.into_iter().map(|c| arr[c].abs().sqrt()).collect(),
        })
    }
}
