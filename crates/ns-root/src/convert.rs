//! Canonical converters: any supported object to arrays or a labeled table.
//!
//! Dispatch is on the coarse class-name [`Category`]; the precise kind is
//! decided afterwards by the extractor for that category.

use arrow::record_batch::RecordBatch;
use ns_core::{Error, Result};

use crate::binned::{BinnedArrays, ExtractOptions, extract_binned};
use crate::efficiency::{teff_to_numpy, teff_to_pandas};
use crate::graph::extract_graph;
use crate::kind::{Category, Representation, Source, category_of};
use crate::table::{ColumnNames, binned_to_record_batch, graph_to_record_batch};
use crate::view::GraphPoints;

/// Output of [`to_numpy`].
#[derive(Debug, Clone, PartialEq)]
pub enum Arrays {
    /// Histogram or profile arrays.
    Binned(BinnedArrays),
    /// Graph or efficiency point arrays.
    Graph(GraphPoints),
}

fn category(src: Source<'_>) -> Result<Category> {
    let cat = category_of(src).ok_or_else(|| {
        Error::UnsupportedType(format!("{} cannot be converted to arrays", src.class_name()))
    })?;
    tracing::debug!(class = src.class_name(), ?cat, native = src.is_native(), "dispatch");
    Ok(cat)
}

/// Convert a histogram, profile, graph or efficiency from either
/// representation to arrays, applying the window in `opts`.
pub fn to_numpy<'a>(src: impl Into<Source<'a>>, opts: &ExtractOptions) -> Result<Arrays> {
    let src = src.into();
    match category(src)? {
        Category::Binned => Ok(Arrays::Binned(extract_binned(src, opts, Representation::Any)?)),
        Category::Graph => Ok(Arrays::Graph(extract_graph(src, opts, Representation::Any)?.points)),
        Category::Efficiency => Ok(Arrays::Graph(teff_to_numpy(src, opts)?)),
    }
}

/// Like [`to_numpy`], wrapped in a table with columns renamed by `names`.
///
/// 1D histograms and profiles yield `x, y, ex, ey`; graphs and efficiencies
/// yield their point arrays. 2D histograms have no table form.
pub fn to_pandas<'a>(
    src: impl Into<Source<'a>>,
    names: &ColumnNames,
    opts: &ExtractOptions,
) -> Result<RecordBatch> {
    let src = src.into();
    match category(src)? {
        Category::Binned => match extract_binned(src, opts, Representation::Any)? {
            BinnedArrays::OneD(b) => binned_to_record_batch(&b, names),
            BinnedArrays::TwoD(_) => Err(Error::UnsupportedType(format!(
                "{} is two-dimensional and has no table form",
                src.class_name()
            ))),
        },
        Category::Graph => {
            let graph = extract_graph(src, opts, Representation::Any)?;
            graph_to_record_batch(&graph.points, names)
        }
        Category::Efficiency => teff_to_pandas(src, names, opts),
    }
}
