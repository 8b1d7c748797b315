/*! Corpus reader

Loads an ordered corpus of [TextUnit]s.

Supported formats are CSV with a header row and JSON lines. Only `content` is required,
`doc_id`, `date`, `category` and `source` are optional and other columns are ignored.
Records without content are dropped.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, error, info};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::unit::{Metadata, TextUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Csv,
    JsonLines,
}

impl CorpusFormat {
    /// Guess format from file extension.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(CorpusFormat::Csv),
            Some("jsonl") | Some("ndjson") => Ok(CorpusFormat::JsonLines),
            _ => Err(Error::UnknownFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    doc_id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// Build a unit, or `None` if there's no content to work on.
fn to_unit(content: Option<String>, metadata: Metadata) -> Option<TextUnit> {
    match content {
        Some(c) if !c.trim().is_empty() => Some(TextUnit::new(c, metadata)),
        _ => None,
    }
}

fn log_dropped(kept: usize, seen: usize) {
    if kept < seen {
        info!("dropped {} records without content", seen - kept);
    }
}

/// Read a CSV corpus (with headers).
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<TextUnit>, Error> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut units = Vec::new();
    let mut seen = 0;
    for record in rdr.deserialize() {
        let record: CsvRecord = record?;
        seen += 1;
        let metadata = Metadata {
            doc_id: record.doc_id,
            date: record.date,
            category: record.category,
            source: record.source,
        };
        units.extend(to_unit(record.content, metadata));
    }
    log_dropped(units.len(), seen);
    Ok(units)
}

/// Stringify a scalar JSON field. `null` and missing fields are `None`.
fn field(obj: &serde_json::Map<String, Value>, name: &str) -> Option<String> {
    match obj.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read a JSON lines corpus. Blank lines are skipped.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<TextUnit>, Error> {
    let mut units = Vec::new();
    let mut seen = 0;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        seen += 1;
        let value: Value = serde_json::from_str(&line)?;
        let obj = value.as_object().ok_or_else(|| {
            Error::Custom(format!("line {}: expected a JSON object", lineno + 1))
        })?;
        let metadata = Metadata {
            doc_id: field(obj, "doc_id"),
            date: field(obj, "date"),
            category: field(obj, "category"),
            source: field(obj, "source"),
        };
        units.extend(to_unit(field(obj, "content"), metadata));
    }
    log_dropped(units.len(), seen);
    Ok(units)
}

/// Load a corpus file.
///
/// A missing corpus is fatal and reported before any processing starts.
pub fn read_corpus(path: &Path) -> Result<Vec<TextUnit>, Error> {
    if !path.is_file() {
        error!("corpus file {:?} does not exist", path);
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let format = CorpusFormat::from_path(path)?;
    debug!("reading {:?} corpus from {:?}", format, path);

    let fh = File::open(path)?;
    let units = match format {
        CorpusFormat::Csv => read_csv(fh)?,
        CorpusFormat::JsonLines => read_jsonl(BufReader::new(fh))?,
    };
    info!("loaded {} text units from {:?}", units.len(), path);
    Ok(units)
}
