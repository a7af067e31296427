//! # ns-root
//!
//! Conversion of ROOT histograms, profiles, graphs and efficiencies into
//! arrays and Arrow tables.
//!
//! Objects arrive in one of two representations:
//! - [`native`]: typed objects with ROOT-style 1-based accessors
//!   ([`native::Hist`], [`native::Graph`], [`native::Efficiency`]);
//! - [`reader`]: untyped [`reader::ReaderModel`]s as handed out by a
//!   streaming reader (class name, base names, raw `f*` members).
//!
//! Both are classified ([`kind`]), injected into a uniform [`view`], and only
//! then extracted ([`binned`], [`graph`]), so the two representations give
//! identical arrays for the same data.
//!
//! ## Example
//!
//! ```
//! use ns_root::native::Hist;
//! use ns_root::{Arrays, ColumnNames, ExtractOptions, to_numpy, to_pandas};
//!
//! let mut h = Hist::th1d("h", "", 5, 0.0, 5.0).unwrap();
//! h.fill(2.5, 1.0).unwrap();
//!
//! let opts = ExtractOptions::default().x_range(1.0, 4.0);
//! let Arrays::Binned(out) = to_numpy(&h, &opts).unwrap() else { unreachable!() };
//! assert_eq!(out.as_1d().unwrap().x, vec![1.5, 2.5, 3.5]);
//!
//! let names = ColumnNames::new().with(ns_root::Field::X, "energy");
//! let table = to_pandas(&h, &names, &ExtractOptions::default()).unwrap();
//! assert_eq!(table.schema().field(0).name(), "energy");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binned;
pub mod class;
pub mod convert;
pub mod efficiency;
pub mod graph;
pub mod kind;
pub mod native;
pub mod profile;
pub mod reader;
pub mod table;
pub mod view;

pub use binned::{Binned1D, Binned2D, BinnedArrays, ExtractOptions, Window, extract_binned};
pub use class::RootClass;
pub use convert::{Arrays, to_numpy, to_pandas};
pub use efficiency::{
    GraphNaming, efficiency_to_graph, graph_name, graph_with_errors, teff2d_to_th2, teff_to_numpy,
    teff_to_pandas,
};
pub use graph::extract_graph;
pub use kind::{Category, Kind, Representation, Source, classify};
pub use native::NativeObject;
pub use ns_core::{Error, Result};
pub use reader::{Member, ReaderModel};
pub use table::{ColumnNames, Field, record_batch_to_ipc};
