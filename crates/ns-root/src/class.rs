//! ROOT class hierarchy for the histogram, graph and efficiency families.
//!
//! Only single inheritance along the data-carrying base is modelled
//! (`TProfile -> TH1D -> TH1 -> TNamed -> TObject`); attribute mix-ins such as
//! `TAttLine` and the `TArray` storage bases play no role in classification.

use std::fmt;
use std::str::FromStr;

use ns_core::{Error, Result};

/// A known ROOT class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum RootClass {
    TObject,
    TNamed,
    TH1,
    TH1C,
    TH1S,
    TH1I,
    TH1F,
    TH1D,
    TH2,
    TH2C,
    TH2S,
    TH2I,
    TH2F,
    TH2D,
    TH3,
    TH3F,
    TH3D,
    TProfile,
    TProfile2D,
    TProfile3D,
    TGraph,
    TGraphErrors,
    TGraphAsymmErrors,
    TGraph2D,
    TGraph2DErrors,
    TGraph2DAsymmErrors,
    TEfficiency,
}

impl RootClass {
    /// Every known class.
    pub const ALL: [RootClass; 27] = [
        RootClass::TObject,
        RootClass::TNamed,
        RootClass::TH1,
        RootClass::TH1C,
        RootClass::TH1S,
        RootClass::TH1I,
        RootClass::TH1F,
        RootClass::TH1D,
        RootClass::TH2,
        RootClass::TH2C,
        RootClass::TH2S,
        RootClass::TH2I,
        RootClass::TH2F,
        RootClass::TH2D,
        RootClass::TH3,
        RootClass::TH3F,
        RootClass::TH3D,
        RootClass::TProfile,
        RootClass::TProfile2D,
        RootClass::TProfile3D,
        RootClass::TGraph,
        RootClass::TGraphErrors,
        RootClass::TGraphAsymmErrors,
        RootClass::TGraph2D,
        RootClass::TGraph2DErrors,
        RootClass::TGraph2DAsymmErrors,
        RootClass::TEfficiency,
    ];

    /// Class name as written in ROOT files.
    pub fn name(self) -> &'static str {
        match self {
            RootClass::TObject => "TObject",
            RootClass::TNamed => "TNamed",
            RootClass::TH1 => "TH1",
            RootClass::TH1C => "TH1C",
            RootClass::TH1S => "TH1S",
            RootClass::TH1I => "TH1I",
            RootClass::TH1F => "TH1F",
            RootClass::TH1D => "TH1D",
            RootClass::TH2 => "TH2",
            RootClass::TH2C => "TH2C",
            RootClass::TH2S => "TH2S",
            RootClass::TH2I => "TH2I",
            RootClass::TH2F => "TH2F",
            RootClass::TH2D => "TH2D",
            RootClass::TH3 => "TH3",
            RootClass::TH3F => "TH3F",
            RootClass::TH3D => "TH3D",
            RootClass::TProfile => "TProfile",
            RootClass::TProfile2D => "TProfile2D",
            RootClass::TProfile3D => "TProfile3D",
            RootClass::TGraph => "TGraph",
            RootClass::TGraphErrors => "TGraphErrors",
            RootClass::TGraphAsymmErrors => "TGraphAsymmErrors",
            RootClass::TGraph2D => "TGraph2D",
            RootClass::TGraph2DErrors => "TGraph2DErrors",
            RootClass::TGraph2DAsymmErrors => "TGraph2DAsymmErrors",
            RootClass::TEfficiency => "TEfficiency",
        }
    }

    /// Direct base class, `None` for `TObject`.
    pub fn parent(self) -> Option<RootClass> {
        let p = match self {
            RootClass::TObject => return None,
            RootClass::TNamed => RootClass::TObject,
            RootClass::TH1 | RootClass::TGraph | RootClass::TGraph2D | RootClass::TEfficiency => {
                RootClass::TNamed
            }
            RootClass::TH1C
            | RootClass::TH1S
            | RootClass::TH1I
            | RootClass::TH1F
            | RootClass::TH1D
            | RootClass::TH2
            | RootClass::TH3 => RootClass::TH1,
            RootClass::TH2C
            | RootClass::TH2S
            | RootClass::TH2I
            | RootClass::TH2F
            | RootClass::TH2D => RootClass::TH2,
            RootClass::TH3F | RootClass::TH3D => RootClass::TH3,
            RootClass::TProfile => RootClass::TH1D,
            RootClass::TProfile2D => RootClass::TH2D,
            RootClass::TProfile3D => RootClass::TH3D,
            RootClass::TGraphErrors | RootClass::TGraphAsymmErrors => RootClass::TGraph,
            RootClass::TGraph2DErrors | RootClass::TGraph2DAsymmErrors => RootClass::TGraph2D,
        };
        Some(p)
    }

    /// The class itself followed by all its bases, most derived first.
    pub fn lineage(self) -> impl Iterator<Item = RootClass> {
        std::iter::successors(Some(self), |c| c.parent())
    }

    /// `isinstance`-style test: `self` is `base` or derives from it.
    pub fn inherits_from(self, base: RootClass) -> bool {
        self.lineage().any(|c| c == base)
    }

    /// Look up a class by its ROOT name.
    pub fn from_name(name: &str) -> Option<RootClass> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Histogram dimension for the `TH1` family, `None` otherwise.
    pub fn hist_dimension(self) -> Option<usize> {
        if self.inherits_from(RootClass::TH3) {
            Some(3)
        } else if self.inherits_from(RootClass::TH2) {
            Some(2)
        } else if self.inherits_from(RootClass::TH1) {
            Some(1)
        } else {
            None
        }
    }

    /// Whether the class is one of the profile histograms.
    pub fn is_profile(self) -> bool {
        matches!(self, RootClass::TProfile | RootClass::TProfile2D | RootClass::TProfile3D)
    }
}

impl fmt::Display for RootClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RootClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RootClass::from_name(s)
            .ok_or_else(|| Error::UnsupportedType(format!("unknown ROOT class '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lineage() {
        let chain: Vec<_> = RootClass::TProfile.lineage().map(RootClass::name).collect();
        assert_eq!(chain, ["TProfile", "TH1D", "TH1", "TNamed", "TObject"]);
    }

    #[test]
    fn test_inherits_from() {
        assert!(RootClass::TProfile2D.inherits_from(RootClass::TH2));
        assert!(RootClass::TProfile2D.inherits_from(RootClass::TH1));
        assert!(!RootClass::TProfile2D.inherits_from(RootClass::TProfile));
        assert!(RootClass::TGraphAsymmErrors.inherits_from(RootClass::TGraph));
        assert!(!RootClass::TGraph2D.inherits_from(RootClass::TGraph));
    }

    #[test]
    fn test_name_roundtrip() {
        for c in RootClass::ALL {
            assert_eq!(c.name().parse::<RootClass>().unwrap(), c);
        }
        assert!("TTree".parse::<RootClass>().is_err());
    }

    #[test]
    fn test_hist_dimension() {
        assert_eq!(RootClass::TH1F.hist_dimension(), Some(1));
        assert_eq!(RootClass::TProfile.hist_dimension(), Some(1));
        assert_eq!(RootClass::TProfile2D.hist_dimension(), Some(2));
        assert_eq!(RootClass::TH3D.hist_dimension(), Some(3));
        assert_eq!(RootClass::TGraph.hist_dimension(), None);
    }
}
