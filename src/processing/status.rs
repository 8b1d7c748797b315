//! Progress report of an output folder.
//!
//! Lists committed batch artifacts and leftover temporary files,
//! and given a corpus size, the batches that are still to be done.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, warn};

use crate::error::Error;
use crate::io::writer::TMP_EXTENSION;
use crate::pipeline::batch::batch_count;
use crate::pipeline::scheduler::{ARTIFACT_EXTENSION, ARTIFACT_PREFIX};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    /// Indices of committed batches.
    pub done: BTreeSet<usize>,
    /// Temporary files left by interrupted writes.
    pub stale: Vec<PathBuf>,
}

/// Extract the batch index from `batch_{i}.parquet`.
fn batch_index(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(ARTIFACT_EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

fn list(dst: &Path, suffix: &str) -> Result<Vec<PathBuf>, Error> {
    let root = dst
        .to_str()
        .ok_or_else(|| Error::Custom(format!("{dst:?} is not valid utf-8")))?;
    let pattern = format!("{}/{}*{}", Pattern::escape(root), ARTIFACT_PREFIX, suffix);
    debug!("listing {}", pattern);
    glob::glob(&pattern)?
        .map(|entry| entry.map_err(Error::from))
        .collect()
}

impl Status {
    pub fn from_dir(dst: &Path) -> Result<Self, Error> {
        if !dst.is_dir() {
            return Err(Error::MissingInput(dst.to_path_buf()));
        }

        let mut done = BTreeSet::new();
        for path in list(dst, &format!(".{ARTIFACT_EXTENSION}"))? {
            match batch_index(&path) {
                Some(index) => {
                    done.insert(index);
                }
                None => warn!("ignoring {:?}: not a batch artifact", path),
            }
        }
        let stale = list(dst, &format!(".{ARTIFACT_EXTENSION}.{TMP_EXTENSION}"))?;

        Ok(Self { done, stale })
    }

    /// Batches not committed yet, for a corpus of `units` cut in batches of `batch_size`.
    pub fn pending(&self, units: usize, batch_size: usize) -> Vec<usize> {
        (0..batch_count(units, batch_size))
            .filter(|i| !self.done.contains(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::error::Error;

    use super::{batch_index, Status};

    #[test]
    fn test_batch_index() {
        assert_eq!(batch_index(Path::new("out/batch_0.parquet")), Some(0));
        assert_eq!(batch_index(Path::new("batch_153.parquet")), Some(153));
        assert_eq!(batch_index(Path::new("batch_x.parquet")), None);
        assert_eq!(batch_index(Path::new("batch_1.parquet.tmp")), None);
        assert_eq!(batch_index(Path::new("other_1.parquet")), None);
    }

    #[test]
    fn test_status() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "batch_0.parquet",
            "batch_2.parquet",
            "batch_3.parquet.tmp",
            "batch_notes.parquet",
            "readme.txt",
        ] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let status = Status::from_dir(dir.path()).unwrap();
        assert_eq!(status.done.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(status.stale, vec![dir.path().join("batch_3.parquet.tmp")]);
        assert_eq!(status.pending(45, 10), vec![1, 3, 4]);
        assert!(status.pending(0, 10).is_empty());
    }

    #[test]
    fn test_status_missing_dir() {
        assert!(matches!(
            Status::from_dir(Path::new("no/such/dir")),
            Err(Error::MissingInput(_))
        ));
    }
}
