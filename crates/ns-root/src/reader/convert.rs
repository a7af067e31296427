//! Conversion between the native and reader representations.

use ns_core::{Error, Result};
use ns_prob::{EstimatorConfig, StatisticOption};

use crate::class::RootClass;
use crate::native::{Axis, Efficiency, Graph, GraphErrors, Hist, NativeObject};
use crate::reader::{Member, ReaderModel};

fn model_for(class: RootClass) -> ReaderModel {
    ReaderModel::new(class.name()).with_bases(class.lineage().skip(1).map(RootClass::name))
}

fn array(v: &[f64]) -> Member {
    Member::Array(v.to_vec())
}

fn axis_model(axis: &Axis) -> Member {
    let xbins = if axis.is_variable() { axis.edges() } else { Vec::new() };
    Member::Object(Box::new(
        ReaderModel::new("TAxis")
            .with_bases(["TNamed", "TObject", "TAttAxis"])
            .with_member("fTitle", Member::Str(axis.title().to_string()))
            .with_member("fNbins", Member::Int(axis.n_bins() as i64))
            .with_member("fXmin", Member::Float(axis.x_min()))
            .with_member("fXmax", Member::Float(axis.x_max()))
            .with_member("fXbins", Member::Array(xbins)),
    ))
}

fn axis_from_model(hist: &ReaderModel, name: &str) -> Result<Axis> {
    let edges = hist.axis_edges(name)?;
    let ax = hist.member_object(name)?;
    let mut axis = if ax.member_array("fXbins").is_ok_and(|b| !b.is_empty()) {
        Axis::variable(edges)?
    } else {
        Axis::uniform(edges.len() - 1, ax.member_f64("fXmin")?, ax.member_f64("fXmax")?)?
    };
    axis.set_title(ax.title());
    Ok(axis)
}

impl ReaderModel {
    /// Reader view of a native histogram, as if written and read back.
    pub fn from_hist(h: &Hist) -> Self {
        let mut m = model_for(h.class())
            .with_member("fName", Member::Str(h.name().to_string()))
            .with_member("fTitle", Member::Str(h.title().to_string()))
            .with_member("fEntries", Member::Float(h.entries()))
            .with_member("fArray", array(h.raw_contents()))
            .with_member("fSumw2", Member::Array(h.raw_sumw2().map(<[f64]>::to_vec).unwrap_or_default()))
            .with_member("fXaxis", axis_model(h.x_axis()));
        if let Some(y) = h.y_axis() {
            m.set_member("fYaxis", axis_model(y));
        }
        if let Some(z) = h.z_axis() {
            m.set_member("fZaxis", axis_model(z));
        }
        if let Some(entries) = h.raw_bin_entries() {
            m.set_member("fBinEntries", array(entries));
            m.set_member("fBinSumw2", array(h.raw_bin_sumw2().unwrap_or(&[])));
        }
        m
    }

    /// Reader view of a native graph.
    pub fn from_graph(g: &Graph) -> Self {
        let mut m = model_for(g.class())
            .with_member("fName", Member::Str(g.name().to_string()))
            .with_member("fTitle", Member::Str(g.title().to_string()))
            .with_member("fNpoints", Member::Int(g.n_points() as i64))
            .with_member("fX", array(g.x()))
            .with_member("fY", array(g.y()));
        if g.class() == RootClass::TGraph2D {
            m.set_member("fZ", array(g.z()));
        }
        match g.errors() {
            GraphErrors::None => {}
            GraphErrors::Symmetric { ex, ey } => {
                m.set_member("fEX", array(ex));
                m.set_member("fEY", array(ey));
            }
            GraphErrors::Asymmetric { exl, exh, eyl, eyh } => {
                m.set_member("fEXlow", array(exl));
                m.set_member("fEXhigh", array(exh));
                m.set_member("fEYlow", array(eyl));
                m.set_member("fEYhigh", array(eyh));
            }
        }
        m
    }

    /// Reader view of a native efficiency.
    pub fn from_efficiency(e: &Efficiency) -> Self {
        let cfg = e.config();
        model_for(RootClass::TEfficiency)
            .with_member("fName", Member::Str(e.name().to_string()))
            .with_member("fTitle", Member::Str(e.title().to_string()))
            .with_member("fPassedHistogram", Member::Object(Box::new(Self::from_hist(e.passed()))))
            .with_member("fTotalHistogram", Member::Object(Box::new(Self::from_hist(e.total()))))
            .with_member("fStatisticOption", Member::Int(i64::from(cfg.statistic.code())))
            .with_member("fConfLevel", Member::Float(cfg.confidence_level))
            .with_member("fBeta_alpha", Member::Float(cfg.beta_alpha))
            .with_member("fBeta_beta", Member::Float(cfg.beta_beta))
    }

    /// Reader view of any native object.
    pub fn from_native(obj: &NativeObject) -> Self {
        match obj {
            NativeObject::Hist(h) => Self::from_hist(h),
            NativeObject::Graph(g) => Self::from_graph(g),
            NativeObject::Efficiency(e) => Self::from_efficiency(e),
        }
    }

    /// Rebuild a native histogram from its reader members.
    pub fn to_hist(&self) -> Result<Hist> {
        let class = RootClass::from_name(super::plain_class_name(self.classname()))
            .filter(|c| c.hist_dimension().is_some())
            .ok_or_else(|| {
                Error::UnsupportedType(format!("{} is not a histogram", self.classname()))
            })?;
        let mut axes = vec![axis_from_model(self, "fXaxis")?];
        if self.hist_dimension() >= Some(2) {
            axes.push(axis_from_model(self, "fYaxis")?);
        }
        if self.hist_dimension() >= Some(3) {
            axes.push(axis_from_model(self, "fZaxis")?);
        }
        let sumw2 = self.member_array("fSumw2").ok().filter(|s| !s.is_empty()).map(<[f64]>::to_vec);
        let bin_entries = self.member_array("fBinEntries").ok().map(<[f64]>::to_vec);
        let bin_sumw2 = self.member_array("fBinSumw2").map(<[f64]>::to_vec).unwrap_or_default();
        let mut hist = Hist::from_raw(
            class,
            self.name(),
            self.title(),
            axes,
            self.member_array("fArray")?.to_vec(),
            sumw2,
            bin_entries,
            bin_sumw2,
        )?;
        if let Ok(entries) = self.member_f64("fEntries") {
            hist.set_entries(entries);
        }
        Ok(hist)
    }
}

impl Efficiency {
    /// Rebuild an efficiency from a reader `TEfficiency`.
    pub fn from_reader(m: &ReaderModel) -> Result<Self> {
        if !m.is_instance("TEfficiency") {
            return Err(Error::UnsupportedType(format!("{} is not a TEfficiency", m.classname())));
        }
        let passed = m.member_object("fPassedHistogram")?.to_hist()?;
        let total = m.member_object("fTotalHistogram")?.to_hist()?;

        let defaults = EstimatorConfig::default();
        let statistic = match m.member_i64("fStatisticOption") {
            Ok(code) => i32::try_from(code)
                .ok()
                .and_then(StatisticOption::from_code)
                .ok_or_else(|| Error::UnknownOption {
                    option: "statistic option",
                    value: code.to_string(),
                })?,
            Err(_) => defaults.statistic,
        };
        let config = EstimatorConfig {
            statistic,
            confidence_level: m.member_f64("fConfLevel").unwrap_or(defaults.confidence_level),
            beta_alpha: m.member_f64("fBeta_alpha").unwrap_or(defaults.beta_alpha),
            beta_beta: m.member_f64("fBeta_beta").unwrap_or(defaults.beta_beta),
            ..defaults
        };

        let mut eff = Efficiency::with_config(passed, total, config)?;
        if m.has_member("fName") {
            eff.set_name(m.name());
        }
        if m.has_member("fTitle") {
            eff.set_title(m.title());
        }
        Ok(eff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hist_round_trip_through_reader() {
        let mut h = Hist::th1d("h", "title", 4, 0.0, 4.0).unwrap();
        h.fill(1.5, 2.0).unwrap();
        h.fill(3.5, 1.0).unwrap();
        let m = ReaderModel::from_hist(&h);
        assert_eq!(m.classname(), "TH1D");
        assert!(m.is_instance("TH1"));
        assert!(m.is_instance("TNamed"));
        assert_eq!(m.to_hist().unwrap(), h);
    }

    #[test]
    fn test_profile_values_match_native() {
        let mut p = Hist::tprofile("p", "", 3, 0.0, 3.0).unwrap();
        p.fill_profile(0.5, 2.0, 1.0).unwrap();
        p.fill_profile(0.5, 4.0, 1.0).unwrap();
        p.fill_profile(2.5, 1.0, 3.0).unwrap();
        let m = ReaderModel::from_hist(&p);
        assert!(m.is_instance("TH1D"));
        let values = m.values().unwrap();
        let errors = m.errors().unwrap();
        for (i, (v, e)) in values.iter().zip(&errors).enumerate() {
            assert!((v - p.bin_content(i + 1).unwrap()).abs() < 1e-12);
            assert!((e - p.bin_error(i + 1).unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_axis_is_tagged() {
        let h = Hist::th1d("h", "", 2, 0.0, 1.0).unwrap();
        let m = ReaderModel::from_hist(&h);
        let ax = m.member_object("fXaxis").unwrap();
        assert_eq!(ax.classname(), "TAxis");
        assert!(ax.is_instance("TNamed"));
    }

    #[test]
    fn test_graph_members() {
        let g = Graph::with_asymm_errors(
            vec![1.0],
            vec![2.0],
            vec![0.1],
            vec![0.2],
            vec![0.3],
            vec![0.4],
        )
        .unwrap();
        let m = ReaderModel::from_graph(&g);
        assert!(m.is_instance("TGraph"));
        assert_eq!(m.member_array("fEYhigh").unwrap(), &[0.4]);
        assert!(!m.has_member("fEX"));
    }

    #[test]
    fn test_efficiency_round_trip() {
        let mut passed = Hist::th1d("p", "", 2, 0.0, 2.0).unwrap();
        let mut total = Hist::th1d("t", "", 2, 0.0, 2.0).unwrap();
        passed.set_bin_content(1, 3.0).unwrap();
        total.set_bin_content(1, 4.0).unwrap();
        let mut eff = Efficiency::new(passed, total).unwrap();
        eff.set_statistic_option("wilson").unwrap();
        eff.set_name("trig");

        let back = Efficiency::from_reader(&ReaderModel::from_efficiency(&eff)).unwrap();
        assert_eq!(back.name(), "trig");
        assert_eq!(back.statistic_option(), StatisticOption::Wilson);
        assert_eq!(back.passed(), eff.passed());
    }
}
