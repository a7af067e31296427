//! Uniform views over both representations.
//!
//! The injection functions turn a native object or a reader model into the
//! same [`BinnedObject`] / [`GraphObject`], so extraction never needs to know
//! where the data came from.

use std::ops::Range;

use ns_core::{Error, Result};

use crate::binned::Window;
use crate::kind::{Kind, Representation, Source, classify_binned, classify_graph};
use crate::native::{Graph, Hist};
use crate::reader::ReaderModel;
use crate::table::Field;

/// Strictly increasing bin edges; bin `i` spans `[edges[i], edges[i + 1])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    /// Validate and wrap edges.
    pub fn from_edges(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::Validation(format!("axis needs at least 2 edges, got {}", edges.len())));
        }
        if edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(Error::Validation("axis edges must be strictly increasing".into()));
        }
        Ok(Self { edges })
    }

    /// All edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Lower edge of bin `i` (0-based).
    pub fn low(&self, i: usize) -> f64 {
        self.edges[i]
    }

    /// Upper edge of bin `i`.
    pub fn up(&self, i: usize) -> f64 {
        self.edges[i + 1]
    }

    /// Midpoint of bin `i`.
    pub fn center(&self, i: usize) -> f64 {
        0.5 * (self.edges[i] + self.edges[i + 1])
    }

    /// Half the span of bin `i`.
    pub fn half_width(&self, i: usize) -> f64 {
        0.5 * (self.edges[i + 1] - self.edges[i])
    }

    /// Bins lying entirely inside the window: `low >= min` and `up <= max`.
    /// The result is contiguous because the edges are sorted.
    pub fn select(&self, window: &Window) -> Range<usize> {
        let n = self.n_bins();
        let start = window.min.map_or(0, |min| self.edges.partition_point(|&e| e < min)).min(n);
        let end = window
            .max
            .map_or(n, |max| self.edges.partition_point(|&e| e <= max).saturating_sub(1))
            .min(n);
        start..end.max(start)
    }
}

/// A 1D or 2D histogram or profile, reduced to axes plus per-bin value and
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedObject {
    /// Precise kind.
    pub kind: Kind,
    /// X axis.
    pub x: Axis,
    /// Y axis for 2D kinds.
    pub y: Option<Axis>,
    /// Values, row-major with x fastest (`iy * nx + ix`).
    pub values: Vec<f64>,
    /// Errors in the same layout.
    pub errors: Vec<f64>,
}

impl BinnedObject {
    fn new(kind: Kind, x: Axis, y: Option<Axis>, values: Vec<f64>, errors: Vec<f64>) -> Result<Self> {
        let n = x.n_bins() * y.as_ref().map_or(1, Axis::n_bins);
        if values.len() != n || errors.len() != n {
            return Err(Error::Validation(format!(
                "{} has {} values and {} errors for {} bins",
                kind,
                values.len(),
                errors.len(),
                n
            )));
        }
        Ok(Self { kind, x, y, values, errors })
    }

    /// Value of bin `(ix, iy)`, 0-based.
    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.values[iy * self.x.n_bins() + ix]
    }

    /// Error of bin `(ix, iy)`, 0-based.
    pub fn error(&self, ix: usize, iy: usize) -> f64 {
        self.errors[iy * self.x.n_bins() + ix]
    }
}

/// Parallel point arrays of a graph, one variant per graph family.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum GraphPoints {
    Plain { x: Vec<f64>, y: Vec<f64> },
    Symmetric { x: Vec<f64>, y: Vec<f64>, ex: Vec<f64>, ey: Vec<f64> },
    Asymmetric {
        x: Vec<f64>,
        y: Vec<f64>,
        exl: Vec<f64>,
        exh: Vec<f64>,
        eyl: Vec<f64>,
        eyh: Vec<f64>,
    },
    Surface { x: Vec<f64>, y: Vec<f64>, z: Vec<f64> },
}

impl GraphPoints {
    /// Arrays in canonical output order, labelled by field.
    pub fn columns(&self) -> Vec<(Field, &[f64])> {
        match self {
            GraphPoints::Plain { x, y } => vec![(Field::X, x.as_slice()), (Field::Y, y.as_slice())],
            GraphPoints::Symmetric { x, y, ex, ey } => vec![
                (Field::X, x.as_slice()),
                (Field::Y, y.as_slice()),
                (Field::Ex, ex.as_slice()),
                (Field::Ey, ey.as_slice()),
            ],
            GraphPoints::Asymmetric { x, y, exl, exh, eyl, eyh } => vec![
                (Field::X, x.as_slice()),
                (Field::Y, y.as_slice()),
                (Field::Exl, exl.as_slice()),
                (Field::Exh, exh.as_slice()),
                (Field::Eyl, eyl.as_slice()),
                (Field::Eyh, eyh.as_slice()),
            ],
            GraphPoints::Surface { x, y, z } => {
                vec![(Field::X, x.as_slice()), (Field::Y, y.as_slice()), (Field::Z, z.as_slice())]
            }
        }
    }

    /// Arrays in canonical output order.
    pub fn arrays(&self) -> Vec<&[f64]> {
        self.columns().into_iter().map(|(_, a)| a).collect()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        match self {
            GraphPoints::Plain { x, .. }
            | GraphPoints::Symmetric { x, .. }
            | GraphPoints::Asymmetric { x, .. }
            | GraphPoints::Surface { x, .. } => x.len(),
        }
    }

    /// Whether the graph has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(self) -> Result<Self> {
        let n = self.len();
        if let Some((field, a)) = self.columns().into_iter().find(|(_, a)| a.len() != n) {
            return Err(Error::Validation(format!(
                "graph column '{}' has {} points, expected {}",
                field,
                a.len(),
                n
            )));
        }
        Ok(self)
    }
}

/// A graph reduced to its kind, labels and point arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphObject {
    /// Precise kind.
    pub kind: Kind,
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Point arrays.
    pub points: GraphPoints,
}

fn unsupported(src: Source<'_>, what: &str) -> Error {
    Error::UnsupportedType(format!("{} is not a supported {}", src.class_name(), what))
}

/// Inject a native histogram of a known binned kind.
pub fn binned_from_native(h: &Hist, kind: Kind) -> Result<BinnedObject> {
    let x = Axis::from_edges(h.x_axis().edges())?;
    let y = match kind.binned_dimension() {
        2 => Some(Axis::from_edges(
            h.y_axis()
                .ok_or_else(|| Error::Validation(format!("{} '{}' has no y axis", h.class(), h.name())))?
                .edges(),
        )?),
        _ => None,
    };
    let (nx, ny) = (x.n_bins(), y.as_ref().map_or(1, Axis::n_bins));
    let mut values = Vec::with_capacity(nx * ny);
    let mut errors = Vec::with_capacity(nx * ny);
    for iy in 0..ny {
        for ix in 0..nx {
            let cell = if y.is_some() { h.bin2(ix + 1, iy + 1) } else { ix + 1 };
            values.push(h.bin_content(cell)?);
            errors.push(h.bin_error(cell)?);
        }
    }
    BinnedObject::new(kind, x, y, values, errors)
}

/// Inject a reader histogram of a known binned kind.
pub fn binned_from_reader(m: &ReaderModel, kind: Kind) -> Result<BinnedObject> {
    let x = Axis::from_edges(m.axis_edges("fXaxis")?)?;
    let y = match kind.binned_dimension() {
        2 => Some(Axis::from_edges(m.axis_edges("fYaxis")?)?),
        _ => None,
    };
    BinnedObject::new(kind, x, y, m.values()?, m.errors()?)
}

/// Inject a native graph of a known graph kind.
pub fn graph_from_native(g: &Graph, kind: Kind) -> Result<GraphObject> {
    let (x, y) = (g.x().to_vec(), g.y().to_vec());
    let points = match kind {
        Kind::Graph => GraphPoints::Plain { x, y },
        Kind::GraphErrors => GraphPoints::Symmetric { x, y, ex: g.ex().to_vec(), ey: g.ey().to_vec() },
        Kind::GraphAsymmErrors => GraphPoints::Asymmetric {
            x,
            y,
            exl: g.ex_low().to_vec(),
            exh: g.ex_high().to_vec(),
            eyl: g.ey_low().to_vec(),
            eyh: g.ey_high().to_vec(),
        },
        Kind::Graph2D => GraphPoints::Surface { x, y, z: g.z().to_vec() },
        _ => return Err(unsupported(Source::Graph(g), "graph")),
    };
    Ok(GraphObject {
        kind,
        name: g.name().to_string(),
        title: g.title().to_string(),
        points: points.check()?,
    })
}

/// Inject a reader graph of a known graph kind.
pub fn graph_from_reader(m: &ReaderModel, kind: Kind) -> Result<GraphObject> {
    let get = |name: &str| m.member_array(name).map(<[f64]>::to_vec);
    let (x, y) = (get("fX")?, get("fY")?);
    let points = match kind {
        Kind::Graph => GraphPoints::Plain { x, y },
        Kind::GraphErrors => GraphPoints::Symmetric { x, y, ex: get("fEX")?, ey: get("fEY")? },
        Kind::GraphAsymmErrors => GraphPoints::Asymmetric {
            x,
            y,
            exl: get("fEXlow")?,
            exh: get("fEXhigh")?,
            eyl: get("fEYlow")?,
            eyh: get("fEYhigh")?,
        },
        Kind::Graph2D => GraphPoints::Surface { x, y, z: get("fZ")? },
        _ => return Err(unsupported(Source::Reader(m), "graph")),
    };
    Ok(GraphObject {
        kind,
        name: m.name().to_string(),
        title: m.title().to_string(),
        points: points.check()?,
    })
}

/// Classify and inject any binned source.
pub fn binned_view(src: Source<'_>, repr: Representation) -> Result<BinnedObject> {
    let kind = classify_binned(src, repr).ok_or_else(|| unsupported(src, "histogram or profile"))?;
    match src {
        Source::Hist(h) => binned_from_native(h, kind),
        Source::Reader(m) => binned_from_reader(m, kind),
        _ => Err(unsupported(src, "histogram or profile")),
    }
}

/// Classify and inject any graph source.
pub fn graph_view(src: Source<'_>, repr: Representation) -> Result<GraphObject> {
    let kind = classify_graph(src, repr).ok_or_else(|| unsupported(src, "graph"))?;
    match src {
        Source::Graph(g) => graph_from_native(g, kind),
        Source::Reader(m) => graph_from_reader(m, kind),
        _ => Err(unsupported(src, "graph")),
    }
}
