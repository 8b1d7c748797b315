//! Batch artifact reader.
use std::fs::File;
use std::path::Path;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};

use crate::error::Error;
use crate::unit::{Metadata, TextUnit, UnitResult};

/// A unit read back from an artifact, with its global corpus position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRow {
    pub row: u64,
    pub unit: TextUnit,
}

fn string(name: &str, field: &Field) -> Result<Option<String>, Error> {
    match field {
        Field::Null => Ok(None),
        Field::Str(s) => Ok(Some(s.clone())),
        other => Err(Error::Custom(format!(
            "column {name}: expected a string, got {other:?}"
        ))),
    }
}

fn parse_row(row: &Row) -> Result<ArtifactRow, Error> {
    let mut position = None;
    let mut content = None;
    let mut metadata = Metadata::default();
    let mut phrases = Vec::new();
    let mut tag_error = None;

    for (name, field) in row.get_column_iter() {
        match (name.as_str(), field) {
            ("row", Field::Long(r)) => position = Some(*r as u64),
            ("doc_id", f) => metadata.doc_id = string(name, f)?,
            ("date", f) => metadata.date = string(name, f)?,
            ("content", f) => content = string(name, f)?,
            ("category", f) => metadata.category = string(name, f)?,
            ("source", f) => metadata.source = string(name, f)?,
            ("phrases", Field::ListInternal(list)) => {
                for element in list.elements() {
                    if let Some(phrase) = string(name, element)? {
                        phrases.push(phrase);
                    }
                }
            }
            ("tag_error", f) => tag_error = string(name, f)?,
            (other, f) => {
                return Err(Error::Custom(format!(
                    "unexpected column {other}: {f:?}"
                )))
            }
        }
    }

    let row = position.ok_or_else(|| Error::Custom("missing row column".to_string()))?;
    let content = content.ok_or_else(|| Error::Custom(format!("row {row}: missing content")))?;
    let result = match tag_error {
        Some(reason) => UnitResult::Failed(reason),
        None => UnitResult::Phrases(phrases),
    };

    Ok(ArtifactRow {
        row,
        unit: TextUnit::new(content, metadata).with_result(result),
    })
}

/// Read every row of a batch artifact, in stored order.
pub fn read_artifact(path: &Path) -> Result<Vec<ArtifactRow>, Error> {
    let reader = SerializedFileReader::new(File::open(path)?)?;
    let mut rows = Vec::new();
    for row in reader.get_row_iter(None)? {
        rows.push(parse_row(&row?)?);
    }
    Ok(rows)
}
