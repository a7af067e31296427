//! Labeled tables as Arrow `RecordBatch`es.
//!
//! Columns carry caller-chosen names, defaulting to the canonical field
//! names `x, y, z, ex, ey, exl, exh, eyl, eyh`. Only the fields an object
//! actually has become columns; overrides for other fields are ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use ns_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::binned::Binned1D;
use crate::view::GraphPoints;

/// Canonical output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Field {
    X,
    Y,
    Z,
    Ex,
    Ey,
    Exl,
    Exh,
    Eyl,
    Eyh,
}

impl Field {
    /// All fields in canonical order.
    pub const ALL: [Field; 9] = [
        Field::X,
        Field::Y,
        Field::Z,
        Field::Ex,
        Field::Ey,
        Field::Exl,
        Field::Exh,
        Field::Eyl,
        Field::Eyh,
    ];

    /// Canonical (default) column name.
    pub fn name(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::Z => "z",
            Field::Ex => "ex",
            Field::Ey => "ey",
            Field::Exl => "exl",
            Field::Exh => "exh",
            Field::Eyl => "eyl",
            Field::Eyh => "eyh",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::UnknownOption { option: "column field", value: s.to_string() })
    }
}

/// Caller overrides of column names, keyed by canonical field name.
///
/// Deserializes from a flat JSON object such as `{"x": "energy", "y": "rate"}`.
/// Keys that are not canonical fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnNames {
    overrides: BTreeMap<String, String>,
}

impl ColumnNames {
    /// Canonical names only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: rename one field.
    pub fn with(mut self, field: Field, name: impl Into<String>) -> Self {
        self.overrides.insert(field.name().to_string(), name.into());
        self
    }

    /// Build from `(canonical, custom)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { overrides: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Parse from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Column name for a field.
    pub fn get(&self, field: Field) -> &str {
        self.overrides.get(field.name()).map_or(field.name(), String::as_str)
    }
}

/// Build a table from labelled columns.
///
/// Fails with [`Error::Validation`] if two populated columns end up with the
/// same name, or if the columns differ in length.
pub fn columns_to_record_batch(columns: &[(Field, &[f64])], names: &ColumnNames) -> Result<RecordBatch> {
    let mut seen = BTreeSet::new();
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());
    for (field, values) in columns {
        let name = names.get(*field);
        if !seen.insert(name) {
            return Err(Error::Validation(format!("duplicate column name '{}'", name)));
        }
        fields.push(ArrowField::new(name, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values.to_vec())));
    }
    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).map_err(|e| Error::Table(e.to_string()))
}

/// Table of a graph's point arrays.
pub fn graph_to_record_batch(points: &GraphPoints, names: &ColumnNames) -> Result<RecordBatch> {
    columns_to_record_batch(&points.columns(), names)
}

/// Table of a 1D binned extraction (`x`, `y`, `ex`, `ey`).
pub fn binned_to_record_batch(b: &Binned1D, names: &ColumnNames) -> Result<RecordBatch> {
    columns_to_record_batch(&b.columns(), names)
}

/// Serialize a RecordBatch to Arrow IPC stream bytes.
pub fn record_batch_to_ipc(batch: &RecordBatch) -> Result<Vec<u8>> {
    let table_err = |e: arrow::error::ArrowError| Error::Table(e.to_string());
    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, &batch.schema()).map_err(table_err)?;
        writer.write(batch).map_err(table_err)?;
        writer.finish().map_err(table_err)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use arrow::ipc::reader::StreamReader;

    fn plain() -> GraphPoints {
        GraphPoints::Plain { x: vec![1.0, 2.0], y: vec![3.0, 4.0] }
    }

    #[test]
    fn test_renamed_columns() {
        let names = ColumnNames::from_json(r#"{"x": "energy", "y": "rate", "ez": "ignored"}"#).unwrap();
        let batch = graph_to_record_batch(&plain(), &names).unwrap();
        let schema = batch.schema();
        let cols: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(cols, ["energy", "rate"]);
        assert_eq!(batch.num_rows(), 2);
    }

    #[test]
    fn test_unused_overrides_ignored() {
        let names = ColumnNames::new().with(Field::Eyh, "up");
        let batch = graph_to_record_batch(&plain(), &names).unwrap();
        assert_eq!(batch.num_columns(), 2);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let names = ColumnNames::new().with(Field::Y, "x");
        assert!(matches!(graph_to_record_batch(&plain(), &names), Err(Error::Validation(_))));
    }

    #[test]
    fn test_ipc_roundtrip() {
        let batch = graph_to_record_batch(&plain(), &ColumnNames::new()).unwrap();
        let bytes = record_batch_to_ipc(&batch).unwrap();
        let mut reader = StreamReader::try_new(std::io::Cursor::new(bytes), None).unwrap();
        let back = reader.next().unwrap().unwrap();
        assert_eq!(back.num_rows(), 2);
        let y = back.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(y.value(1), 4.0);
        assert_eq!(y.len(), 2);
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("exl".parse::<Field>().unwrap(), Field::Exl);
        assert!("w".parse::<Field>().is_err());
    }
}
