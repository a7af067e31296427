//! Native object model: typed histograms, graphs and efficiencies with
//! ROOT-style 1-based accessors.

pub mod axis;
pub mod efficiency;
pub mod graph;
pub mod hist;

pub use axis::Axis;
pub use efficiency::Efficiency;
pub use graph::{Graph, GraphErrors};
pub use hist::Hist;

/// Any native object.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeObject {
    /// `TH1`/`TH2`/`TH3`/`TProfile*`.
    Hist(Hist),
    /// `TGraph*`.
    Graph(Graph),
    /// `TEfficiency`.
    Efficiency(Efficiency),
}

impl From<Hist> for NativeObject {
    fn from(h: Hist) -> Self {
        NativeObject::Hist(h)
    }
}

impl From<Graph> for NativeObject {
    fn from(g: Graph) -> Self {
        NativeObject::Graph(g)
    }
}

impl From<Efficiency> for NativeObject {
    fn from(e: Efficiency) -> Self {
        NativeObject::Efficiency(e)
    }
}
