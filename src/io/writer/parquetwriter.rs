//! Parquet batch artifacts.
//!
//! Each row is a [TextUnit] with its metadata, its global corpus position (`row`)
//! and its extraction result (`phrases`, `tag_error`).
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, warn};
use parquet::basic::Compression;
use parquet::data_type::{ByteArray, ByteArrayType, DataType, Int64Type};
use parquet::file::properties::{WriterProperties, WriterPropertiesPtr};
use parquet::file::writer::{SerializedFileWriter, SerializedRowGroupWriter};
use parquet::schema::parser::parse_message_type;
use parquet::schema::types::TypePtr;

use crate::error::Error;
use crate::unit::{TextUnit, UnitResult};

/// Appended to the artifact file name while it is being written.
pub const TMP_EXTENSION: &str = "tmp";

const MESSAGE_TYPE: &str = "
message batch {
    REQUIRED INT64 row;
    OPTIONAL BYTE_ARRAY doc_id (UTF8);
    OPTIONAL BYTE_ARRAY date (UTF8);
    REQUIRED BYTE_ARRAY content (UTF8);
    OPTIONAL BYTE_ARRAY category (UTF8);
    OPTIONAL BYTE_ARRAY source (UTF8);
    REQUIRED group phrases (LIST) {
        REPEATED group list {
            REQUIRED BYTE_ARRAY element (UTF8);
        }
    }
    OPTIONAL BYTE_ARRAY tag_error (UTF8);
}
";

lazy_static! {
    static ref SCHEMA: TypePtr = Arc::new(parse_message_type(MESSAGE_TYPE).unwrap());
}

/// Values and definition levels of an optional string column.
fn optional_column<'a, I>(values: I) -> (Vec<ByteArray>, Vec<i16>)
where
    I: Iterator<Item = Option<&'a str>>,
{
    let mut present = Vec::new();
    let mut def_levels = Vec::new();
    for value in values {
        match value {
            Some(v) => {
                present.push(ByteArray::from(v));
                def_levels.push(1);
            }
            None => def_levels.push(0),
        }
    }
    (present, def_levels)
}

/// Values, definition and repetition levels of a required list of strings.
///
/// An empty list is a single (def 0, rep 0) entry with no value.
fn list_column(lists: &[&[String]]) -> (Vec<ByteArray>, Vec<i16>, Vec<i16>) {
    let mut values = Vec::new();
    let mut def_levels = Vec::new();
    let mut rep_levels = Vec::new();
    for list in lists {
        if list.is_empty() {
            def_levels.push(0);
            rep_levels.push(0);
            continue;
        }
        for (i, value) in list.iter().enumerate() {
            values.push(ByteArray::from(value.as_str()));
            def_levels.push(1);
            rep_levels.push(if i == 0 { 0 } else { 1 });
        }
    }
    (values, def_levels, rep_levels)
}

fn write_column<T: DataType, W: Write + Send>(
    row_group: &mut SerializedRowGroupWriter<'_, W>,
    values: &[T::T],
    def_levels: Option<&[i16]>,
    rep_levels: Option<&[i16]>,
) -> Result<(), Error> {
    let mut column = row_group
        .next_column()?
        .ok_or_else(|| Error::Custom("artifact schema has no column left".to_string()))?;
    column
        .typed::<T>()
        .write_batch(values, def_levels, rep_levels)?;
    column.close()?;
    Ok(())
}

/// Writes batch artifacts.
pub struct ArtifactWriter {
    props: WriterPropertiesPtr,
}

impl ArtifactWriter {
    pub fn new() -> Self {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        Self {
            props: Arc::new(props),
        }
    }

    /// Temporary location of an artifact while it's being written.
    pub fn tmp_path(dst: &Path) -> PathBuf {
        let mut name = dst.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(TMP_EXTENSION);
        dst.with_file_name(name)
    }

    /// Write `units` (whose first one is at global position `offset`) to `dst`.
    ///
    /// Data goes to [ArtifactWriter::tmp_path] first, is synced to disk, then renamed to `dst`.
    /// On failure, the temporary file is removed and `dst` is left untouched.
    pub fn write(&self, dst: &Path, offset: usize, units: &[TextUnit]) -> Result<(), Error> {
        let tmp = Self::tmp_path(dst);
        if tmp.exists() {
            warn!("removing stale temporary artifact {:?}", tmp);
        }

        let written = File::create(&tmp)
            .map_err(Error::from)
            .and_then(|fh| {
                self.write_units(&fh, offset, units)?;
                fh.sync_all()?;
                Ok(())
            });
        if let Err(e) = written {
            if let Err(rm) = std::fs::remove_file(&tmp) {
                debug!("could not remove {:?}: {}", tmp, rm);
            }
            return Err(e);
        }

        std::fs::rename(&tmp, dst)?;
        Self::sync_parent(dst)?;
        debug!("committed {} rows to {:?}", units.len(), dst);
        Ok(())
    }

    /// Persist the rename itself.
    #[cfg(unix)]
    fn sync_parent(dst: &Path) -> Result<(), Error> {
        if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(_dst: &Path) -> Result<(), Error> {
        Ok(())
    }

    fn write_units<W: Write + Send>(
        &self,
        sink: W,
        offset: usize,
        units: &[TextUnit],
    ) -> Result<(), Error> {
        let results: Vec<&UnitResult> = units
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                unit.result().ok_or_else(|| {
                    Error::Custom(format!("unit at row {} has no result", offset + i))
                })
            })
            .collect::<Result<_, _>>()?;

        let mut writer = SerializedFileWriter::new(sink, SCHEMA.clone(), self.props.clone())?;
        let mut row_group = writer.next_row_group()?;

        let rows: Vec<i64> = (offset..offset + units.len()).map(|r| r as i64).collect();
        write_column::<Int64Type, _>(&mut row_group, &rows, None, None)?;

        let (values, defs) = optional_column(units.iter().map(|u| u.metadata().doc_id.as_deref()));
        write_column::<ByteArrayType, _>(&mut row_group, &values, Some(defs.as_slice()), None)?;

        let (values, defs) = optional_column(units.iter().map(|u| u.metadata().date.as_deref()));
        write_column::<ByteArrayType, _>(&mut row_group, &values, Some(defs.as_slice()), None)?;

        let contents: Vec<ByteArray> = units.iter().map(|u| ByteArray::from(u.content())).collect();
        write_column::<ByteArrayType, _>(&mut row_group, &contents, None, None)?;

        let (values, defs) =
            optional_column(units.iter().map(|u| u.metadata().category.as_deref()));
        write_column::<ByteArrayType, _>(&mut row_group, &values, Some(defs.as_slice()), None)?;

        let (values, defs) = optional_column(units.iter().map(|u| u.metadata().source.as_deref()));
        write_column::<ByteArrayType, _>(&mut row_group, &values, Some(defs.as_slice()), None)?;

        let phrases: Vec<&[String]> = results.iter().map(|r| r.phrases()).collect();
        let (values, defs, reps) = list_column(&phrases);
        write_column::<ByteArrayType, _>(
            &mut row_group,
            &values,
            Some(defs.as_slice()),
            Some(reps.as_slice()),
        )?;

        let (values, defs) = optional_column(results.iter().map(|r| r.error()));
        write_column::<ByteArrayType, _>(&mut row_group, &values, Some(defs.as_slice()), None)?;

        row_group.close()?;
        writer.close()?;
        Ok(())
    }
}

impl Default for ArtifactWriter {
    fn default() -> Self {
        Self::new()
    }
}
