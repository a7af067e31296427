//! Efficiency conversions: efficiency objects to graphs, arrays, tables and
//! ratio histograms.

use std::borrow::Cow;

use arrow::record_batch::RecordBatch;
use ns_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::binned::ExtractOptions;
use crate::graph::extract_graph;
use crate::kind::{Representation, Source};
use crate::native::{Efficiency, Graph, Hist};
use crate::table::{ColumnNames, graph_to_record_batch};
use crate::view::GraphPoints;

const GRAPH_PREFIX: &str = "gr_";

/// Naming of a converted object. Empty or missing fields fall back to the
/// efficiency's own name and title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphNaming {
    /// Base name.
    pub name: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Appended to the name as `_<suffix>`.
    pub suffix: Option<String>,
}

impl GraphNaming {
    fn base_name(&self, eff: &Efficiency) -> String {
        let name = self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(eff.name());
        match self.suffix.as_deref().filter(|s| !s.is_empty()) {
            Some(suffix) => format!("{}_{}", name, suffix),
            None => name.to_string(),
        }
    }

    fn title(&self, eff: &Efficiency) -> String {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(eff.title()).to_string()
    }
}

/// `name` with the graph prefix, added only when missing.
pub fn graph_name(name: &str) -> String {
    if name.starts_with(GRAPH_PREFIX) { name.to_string() } else { format!("{}{}", GRAPH_PREFIX, name) }
}

fn dimension_error(eff: &Efficiency, expected: &str) -> Error {
    Error::Dimensionality { expected: expected.to_string(), got: eff.dimension() }
}

/// Convert an efficiency to a graph.
///
/// 1D: one asymmetric-error point per bin of the total histogram at the bin
/// center, x errors equal to the half width, y errors from the estimator.
/// 2D: a scatter surface of `(x center, y center, efficiency)`, x-major.
pub fn efficiency_to_graph(eff: &Efficiency, naming: &GraphNaming) -> Result<Graph> {
    let total = eff.total();
    let ax = total.x_axis();
    let graph = match (total.y_axis(), total.z_axis()) {
        (None, _) => {
            let n = ax.n_bins();
            let (mut x, mut y, mut ex) = (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
            let (mut eyl, mut eyh) = (Vec::with_capacity(n), Vec::with_capacity(n));
            for bin in 1..=n {
                let est = eff.estimate(bin)?;
                x.push(ax.bin_center(bin));
                y.push(est.value);
                ex.push(ax.bin_width(bin) / 2.0);
                eyl.push(est.error_low);
                eyh.push(est.error_up);
            }
            Graph::with_asymm_errors(x, y, ex.clone(), ex, eyl, eyh)?
        }
        (Some(ay), None) => {
            let n = ax.n_bins() * ay.n_bins();
            let (mut x, mut y, mut z) = (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
            for ix in 1..=ax.n_bins() {
                for iy in 1..=ay.n_bins() {
                    x.push(ax.bin_center(ix));
                    y.push(ay.bin_center(iy));
                    z.push(eff.efficiency(total.bin2(ix, iy))?);
                }
            }
            Graph::surface(x, y, z)?
        }
        (Some(_), Some(_)) => return Err(dimension_error(eff, "1 or 2")),
    };
    let name = graph_name(&naming.base_name(eff));
    tracing::debug!(name = %name, dim = eff.dimension(), points = graph.n_points(), "efficiency graph");
    Ok(graph.named(name, naming.title(eff)))
}

fn resolve(src: Source<'_>) -> Result<Cow<'_, Efficiency>> {
    match src {
        Source::Efficiency(e) => Ok(Cow::Borrowed(e)),
        Source::Reader(m) => Ok(Cow::Owned(Efficiency::from_reader(m)?)),
        other => Err(Error::UnsupportedType(format!("{} is not a TEfficiency", other.class_name()))),
    }
}

/// Efficiency to masked graph arrays: `(x, y, exl, exh, eyl, eyh)` in 1D,
/// `(x, y, z)` in 2D.
pub fn teff_to_numpy<'a>(src: impl Into<Source<'a>>, opts: &ExtractOptions) -> Result<GraphPoints> {
    let eff = resolve(src.into())?;
    let graph = efficiency_to_graph(&eff, &GraphNaming::default())?;
    Ok(extract_graph(&graph, opts, Representation::Native)?.points)
}

/// Efficiency to a labelled table of its graph arrays.
pub fn teff_to_pandas<'a>(
    src: impl Into<Source<'a>>,
    names: &ColumnNames,
    opts: &ExtractOptions,
) -> Result<RecordBatch> {
    let points = teff_to_numpy(src, opts)?;
    graph_to_record_batch(&points, names)
}

/// 2D efficiency to a `TH2D` of per-bin efficiencies. Naming follows
/// [`efficiency_to_graph`] without the graph prefix.
pub fn teff2d_to_th2(eff: &Efficiency, naming: &GraphNaming) -> Result<Hist> {
    if eff.dimension() != 2 {
        return Err(dimension_error(eff, "2"));
    }
    let mut hist = eff.create_histogram()?;
    hist.set_name(naming.base_name(eff));
    hist.set_title(naming.title(eff));
    Ok(hist)
}

/// Build a `TGraphErrors` from four equal-length arrays with a title and
/// axis titles.
pub fn graph_with_errors(
    x: &[f64],
    y: &[f64],
    ex: &[f64],
    ey: &[f64],
    title: &str,
    x_title: &str,
    y_title: &str,
) -> Result<Graph> {
    let mut g = Graph::with_errors(x.to_vec(), y.to_vec(), ex.to_vec(), ey.to_vec())?;
    g.set_title(title);
    g.set_axis_titles(x_title, y_title);
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::RootClass;

    fn eff_1d() -> Efficiency {
        let mut passed = Hist::th1d("passed", "", 2, 0.0, 2.0).unwrap();
        let mut total = Hist::th1d("eff", "Efficiency", 2, 0.0, 2.0).unwrap();
        passed.set_bin_content(1, 5.0).unwrap();
        passed.set_bin_content(2, 8.0).unwrap();
        total.set_bin_content(1, 10.0).unwrap();
        total.set_bin_content(2, 10.0).unwrap();
        Efficiency::new(passed, total).unwrap()
    }

    #[test]
    fn test_graph_name_idempotent() {
        assert_eq!(graph_name("eff"), "gr_eff");
        assert_eq!(graph_name("gr_eff"), "gr_eff");
        assert_eq!(graph_name(&graph_name("eff")), "gr_eff");
    }

    #[test]
    fn test_naming_with_suffix() {
        let naming = GraphNaming { suffix: Some("pt".into()), ..Default::default() };
        let g = efficiency_to_graph(&eff_1d(), &naming).unwrap();
        assert_eq!(g.name(), "gr_eff_pt");
        assert_eq!(g.title(), "Efficiency");
        assert_eq!(g.class(), RootClass::TGraphAsymmErrors);
    }

    #[test]
    fn test_1d_points() {
        let g = efficiency_to_graph(&eff_1d(), &GraphNaming::default()).unwrap();
        assert_eq!(g.x(), &[0.5, 1.5]);
        assert_eq!(g.ex_low(), &[0.5, 0.5]);
        assert_eq!(g.ex_high(), &[0.5, 0.5]);
        assert!((g.y()[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_2d_surface_x_major() {
        let mut passed = Hist::th2d("p", "", (2, 0.0, 2.0), (2, 0.0, 2.0)).unwrap();
        let mut total = Hist::th2d("t", "", (2, 0.0, 2.0), (2, 0.0, 2.0)).unwrap();
        for ix in 1..=2 {
            for iy in 1..=2 {
                total.set_bin_content(total.bin2(ix, iy), 4.0).unwrap();
                passed.set_bin_content(passed.bin2(ix, iy), ix as f64).unwrap();
            }
        }
        let eff = Efficiency::new(passed, total).unwrap();
        let g = efficiency_to_graph(&eff, &GraphNaming::default()).unwrap();
        assert_eq!(g.x(), &[0.5, 0.5, 1.5, 1.5]);
        assert_eq!(g.y(), &[0.5, 1.5, 0.5, 1.5]);
        assert_eq!(g.z(), &[0.25, 0.25, 0.5, 0.5]);

        let h = teff2d_to_th2(&eff, &GraphNaming::default()).unwrap();
        assert_eq!(h.name(), "t");
        assert_eq!(h.bin_content(h.bin2(2, 1)).unwrap(), 0.5);
        let err = teff2d_to_th2(&eff_1d(), &GraphNaming::default()).unwrap_err();
        assert_eq!(err.to_string(), "Dimensionality error: expected 2, got 1");
    }

    #[test]
    fn test_3d_is_dimensionality_error() {
        let ax = || crate::native::Axis::uniform(1, 0.0, 1.0).unwrap();
        let p = Hist::new_3d(RootClass::TH3D, "p", "", ax(), ax(), ax()).unwrap();
        let t = Hist::new_3d(RootClass::TH3D, "t", "", ax(), ax(), ax()).unwrap();
        let eff = Efficiency::new(p, t).unwrap();
        let err = efficiency_to_graph(&eff, &GraphNaming::default()).unwrap_err();
        assert!(matches!(err, Error::Dimensionality { got: 3, .. }));
        assert_eq!(err.to_string(), "Dimensionality error: expected 1 or 2, got 3");
    }

    #[test]
    fn test_graph_with_errors() {
        let g = graph_with_errors(&[1.0], &[2.0], &[0.1], &[0.2], "t", "x [GeV]", "y").unwrap();
        assert_eq!(g.class(), RootClass::TGraphErrors);
        assert_eq!(g.x_title(), "x [GeV]");
        assert!(graph_with_errors(&[1.0], &[], &[], &[], "", "", "").is_err());
    }
}
