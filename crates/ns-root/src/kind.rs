//! Object classification.
//!
//! Every kind test is an inheritance test against a base class plus an
//! explicit exclusion list, evaluated the same way on both representations.
//! The exclusion lists make the eight kinds mutually exclusive, so the
//! priority order in [`classify`] only matters for objects matching none.

use std::fmt;
use std::str::FromStr;

use ns_core::{Error, Result};

use crate::class::RootClass;
use crate::native::{Efficiency, Graph, Hist, NativeObject};
use crate::reader::ReaderModel;

/// Closed set of convertible object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `TH1` that is neither 2D/3D nor a profile.
    Hist1D,
    /// `TProfile`.
    Profile1D,
    /// `TH2` that is neither 3D nor a 2D profile.
    Hist2D,
    /// `TProfile2D`.
    Profile2D,
    /// Plain `TGraph`.
    Graph,
    /// `TGraphErrors`.
    GraphErrors,
    /// `TGraphAsymmErrors`.
    GraphAsymmErrors,
    /// Plain `TGraph2D`.
    Graph2D,
}

impl Kind {
    /// All kinds, binned first.
    pub const ALL: [Kind; 8] = [
        Kind::Hist1D,
        Kind::Profile1D,
        Kind::Hist2D,
        Kind::Profile2D,
        Kind::Graph,
        Kind::GraphErrors,
        Kind::GraphAsymmErrors,
        Kind::Graph2D,
    ];

    /// Base class an object must derive from.
    pub fn base(self) -> RootClass {
        match self {
            Kind::Hist1D => RootClass::TH1,
            Kind::Profile1D => RootClass::TProfile,
            Kind::Hist2D => RootClass::TH2,
            Kind::Profile2D => RootClass::TProfile2D,
            Kind::Graph => RootClass::TGraph,
            Kind::GraphErrors => RootClass::TGraphErrors,
            Kind::GraphAsymmErrors => RootClass::TGraphAsymmErrors,
            Kind::Graph2D => RootClass::TGraph2D,
        }
    }

    /// Classes an object must not derive from.
    pub fn excluded(self) -> &'static [RootClass] {
        use RootClass::*;
        match self {
            Kind::Hist1D => &[TH2, TH3, TProfile, TProfile2D, TProfile3D],
            Kind::Profile1D => &[TProfile2D, TProfile3D],
            Kind::Hist2D => &[TH3, TProfile2D, TProfile3D],
            Kind::Profile2D => &[TProfile3D],
            Kind::Graph => &[
                TGraphErrors,
                TGraphAsymmErrors,
                TGraph2D,
                TGraph2DErrors,
                TGraph2DAsymmErrors,
            ],
            Kind::GraphErrors | Kind::GraphAsymmErrors => &[],
            Kind::Graph2D => &[TGraph2DErrors, TGraph2DAsymmErrors],
        }
    }

    /// Whether the kind is extracted by the binned extractor.
    pub fn is_binned(self) -> bool {
        matches!(self, Kind::Hist1D | Kind::Profile1D | Kind::Hist2D | Kind::Profile2D)
    }

    /// Number of binned axes (graphs report 0).
    pub fn binned_dimension(self) -> usize {
        match self {
            Kind::Hist1D | Kind::Profile1D => 1,
            Kind::Hist2D | Kind::Profile2D => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which representation a kind test accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    /// Typed native objects only.
    #[default]
    Native,
    /// Reader models only.
    Bridge,
    /// Either.
    Any,
}

impl FromStr for Representation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "native" | "root" | "r" => Ok(Representation::Native),
            "bridge" | "uproot" | "ur" | "reader" => Ok(Representation::Bridge),
            "any" | "all" | "both" => Ok(Representation::Any),
            _ => Err(Error::UnknownOption { option: "representation", value: s.to_string() }),
        }
    }
}

/// A borrowed object in either representation.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// Native histogram.
    Hist(&'a Hist),
    /// Native graph.
    Graph(&'a Graph),
    /// Native efficiency.
    Efficiency(&'a Efficiency),
    /// Reader model.
    Reader(&'a ReaderModel),
}

impl Source<'_> {
    /// Whether the object is a native one.
    pub fn is_native(&self) -> bool {
        !matches!(self, Source::Reader(_))
    }

    /// Class name as reported by the object.
    pub fn class_name(&self) -> &str {
        match self {
            Source::Hist(h) => h.class().name(),
            Source::Graph(g) => g.class().name(),
            Source::Efficiency(_) => RootClass::TEfficiency.name(),
            Source::Reader(m) => m.classname(),
        }
    }

    fn accepted_by(&self, repr: Representation) -> bool {
        match repr {
            Representation::Native => self.is_native(),
            Representation::Bridge => !self.is_native(),
            Representation::Any => true,
        }
    }

    fn inherits(&self, class: RootClass) -> bool {
        match self {
            Source::Hist(h) => h.class().inherits_from(class),
            Source::Graph(g) => g.class().inherits_from(class),
            Source::Efficiency(_) => RootClass::TEfficiency.inherits_from(class),
            Source::Reader(m) => m.is_instance(class.name()),
        }
    }
}

impl<'a> From<&'a Hist> for Source<'a> {
    fn from(h: &'a Hist) -> Self {
        Source::Hist(h)
    }
}

impl<'a> From<&'a Graph> for Source<'a> {
    fn from(g: &'a Graph) -> Self {
        Source::Graph(g)
    }
}

impl<'a> From<&'a Efficiency> for Source<'a> {
    fn from(e: &'a Efficiency) -> Self {
        Source::Efficiency(e)
    }
}

impl<'a> From<&'a ReaderModel> for Source<'a> {
    fn from(m: &'a ReaderModel) -> Self {
        Source::Reader(m)
    }
}

impl<'a> From<&'a NativeObject> for Source<'a> {
    fn from(obj: &'a NativeObject) -> Self {
        match obj {
            NativeObject::Hist(h) => Source::Hist(h),
            NativeObject::Graph(g) => Source::Graph(g),
            NativeObject::Efficiency(e) => Source::Efficiency(e),
        }
    }
}

/// Kind test: in scope for `repr`, derives from the kind's base, and derives
/// from none of its excluded classes.
pub fn is_kind(src: Source<'_>, kind: Kind, repr: Representation) -> bool {
    src.accepted_by(repr)
        && src.inherits(kind.base())
        && !kind.excluded().iter().any(|&e| src.inherits(e))
}

/// Binned kinds in priority order.
pub fn classify_binned(src: Source<'_>, repr: Representation) -> Option<Kind> {
    [Kind::Profile2D, Kind::Hist2D, Kind::Profile1D, Kind::Hist1D]
        .into_iter()
        .find(|&k| is_kind(src, k, repr))
}

/// Graph kinds in detection order.
pub fn classify_graph(src: Source<'_>, repr: Representation) -> Option<Kind> {
    [Kind::GraphAsymmErrors, Kind::GraphErrors, Kind::Graph, Kind::Graph2D]
        .into_iter()
        .find(|&k| is_kind(src, k, repr))
}

/// Precise kind of an object; objects matching no kind are an
/// [`Error::UnsupportedType`].
pub fn classify(src: Source<'_>, repr: Representation) -> Result<Kind> {
    let kind = classify_binned(src, repr).or_else(|| classify_graph(src, repr));
    tracing::debug!(class = src.class_name(), ?repr, ?kind, "classify");
    kind.ok_or_else(|| {
        Error::UnsupportedType(format!(
            "{} is not a supported histogram or graph ({:?} representation)",
            src.class_name(),
            repr
        ))
    })
}

/// Coarse dispatch family, decided from the class name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Histograms and profiles.
    Binned,
    /// Graphs and 2D scatter surfaces.
    Graph,
    /// Efficiencies.
    Efficiency,
}

/// Category of an object by a case-insensitive substring test on its class
/// name (`th1`, `th2`, `tprofile`, `tgraph`, `tefficiency`).
pub fn category_of(src: Source<'_>) -> Option<Category> {
    let name = src.class_name().to_lowercase();
    if ["th1", "th2", "tprofile"].iter().any(|s| name.contains(s)) {
        Some(Category::Binned)
    } else if name.contains("tgraph") {
        Some(Category::Graph)
    } else if name.contains("tefficiency") {
        Some(Category::Efficiency)
    } else {
        None
    }
}
