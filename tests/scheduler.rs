use std::collections::HashMap;
use std::path::{Path, PathBuf};

use phrasal::extract::PhraseExtractor;
use phrasal::io::reader::read_artifact;
use phrasal::io::writer::ArtifactWriter;
use phrasal::pipeline::{artifact_path, BatchScheduler, WorkerPool};
use phrasal::tagger::{PreTagged, TaggerError};
use phrasal::unit::{Metadata, TextUnit, UnitResult};

/// `len` units of three noun tokens each, the middle one split by a particle.
fn corpus(len: usize) -> Vec<TextUnit> {
    (0..len)
        .map(|i| {
            let content = format!("a{i}/NNG 가/JKS b{i}/NNG c{i}/VV 다/EF");
            let metadata = Metadata {
                doc_id: Some(format!("{}", i / 3)),
                date: Some("2024-01-31".to_string()),
                category: Some("news".to_string()),
                source: None,
            };
            TextUnit::new(content, metadata)
        })
        .collect()
}

fn scheduler(
    dst: &Path,
    batch_size: usize,
    workers: usize,
) -> BatchScheduler<PreTagged, impl Fn() -> Result<PreTagged, TaggerError> + Sync> {
    let pool = WorkerPool::new(workers, || Ok(PreTagged), PhraseExtractor::default()).unwrap();
    BatchScheduler::new(dst.to_path_buf(), batch_size, pool).unwrap()
}

fn snapshot(dst: &Path, batches: usize) -> HashMap<usize, Vec<u8>> {
    (0..batches)
        .map(|i| (i, std::fs::read(artifact_path(dst, i)).unwrap()))
        .collect()
}

fn all_rows(dst: &Path, batches: usize) -> Vec<(u64, TextUnit)> {
    (0..batches)
        .flat_map(|i| read_artifact(&artifact_path(dst, i)).unwrap())
        .map(|row| (row.row, row.unit))
        .collect()
}

#[test_log::test]
fn run_writes_every_batch() {
    let dir = tempfile::tempdir().unwrap();
    let units = corpus(23);

    let summary = scheduler(dir.path(), 5, 3).run(&units).unwrap();
    assert_eq!(summary.batches, 5);
    assert_eq!(summary.written, 5);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.units, 23);
    assert_eq!(summary.failed_units, 0);

    for i in 0..5 {
        assert!(artifact_path(dir.path(), i).exists());
    }
    assert!(!artifact_path(dir.path(), 5).exists());

    let rows = all_rows(dir.path(), 5);
    assert_eq!(rows.len(), 23);
    for (i, (row, unit)) in rows.iter().enumerate() {
        assert_eq!(*row, i as u64);
        assert_eq!(unit.content(), units[i].content());
        assert_eq!(unit.metadata(), units[i].metadata());
        assert_eq!(
            unit.result(),
            Some(&UnitResult::Phrases(vec![format!("a{i};b{i};c{i}")]))
        );
    }
}

#[test_log::test]
fn huge_batch_size_makes_a_single_batch() {
    let dir = tempfile::tempdir().unwrap();
    let units = corpus(3);

    let summary = scheduler(dir.path(), usize::MAX, 2).run(&units).unwrap();
    assert_eq!(summary.batches, 1);
    assert_eq!(summary.written, 1);
    assert_eq!(all_rows(dir.path(), 1).len(), 3);
}

#[test_log::test]
fn order_does_not_depend_on_worker_count() {
    let units = corpus(31);
    let mut reference: Option<Vec<(u64, TextUnit)>> = None;

    for workers in [1, 2, 4, 7, 16] {
        let dir = tempfile::tempdir().unwrap();
        scheduler(dir.path(), 8, workers).run(&units).unwrap();
        let rows = all_rows(dir.path(), 4);

        let contents: Vec<&str> = rows.iter().map(|(_, u)| u.content()).collect();
        let expected: Vec<&str> = units.iter().map(|u| u.content()).collect();
        assert_eq!(contents, expected, "workers={workers}");

        match &reference {
            Some(r) => assert_eq!(r, &rows),
            None => reference = Some(rows),
        }
    }
}

#[test_log::test]
fn resume_only_redoes_missing_batches() {
    let dir = tempfile::tempdir().unwrap();
    let units = corpus(23);

    scheduler(dir.path(), 5, 3).run(&units).unwrap();
    let first = snapshot(dir.path(), 5);

    // batches 1 and 3 are lost, 3 was being written when we crashed.
    std::fs::remove_file(artifact_path(dir.path(), 1)).unwrap();
    std::fs::remove_file(artifact_path(dir.path(), 3)).unwrap();
    let tmp = ArtifactWriter::tmp_path(&artifact_path(dir.path(), 3));
    std::fs::write(&tmp, b"half written").unwrap();

    let kept: Vec<PathBuf> = [0, 2, 4]
        .iter()
        .map(|i| artifact_path(dir.path(), *i))
        .collect();
    let mtimes: Vec<_> = kept
        .iter()
        .map(|p| std::fs::metadata(p).unwrap().modified().unwrap())
        .collect();

    // different worker count: the output must not change.
    let summary = scheduler(dir.path(), 5, 2).run(&units).unwrap();
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.units, 5 + 5);

    for (path, mtime) in kept.iter().zip(mtimes) {
        assert_eq!(std::fs::metadata(path).unwrap().modified().unwrap(), mtime);
    }
    assert!(!tmp.exists());
    assert_eq!(snapshot(dir.path(), 5), first);
}

#[test_log::test]
fn existing_artifact_is_trusted() {
    let dir = tempfile::tempdir().unwrap();
    let units = corpus(10);

    std::fs::write(artifact_path(dir.path(), 0), b"sentinel").unwrap();
    let summary = scheduler(dir.path(), 5, 2).run(&units).unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.written, 1);
    assert_eq!(
        std::fs::read(artifact_path(dir.path(), 0)).unwrap(),
        b"sentinel"
    );
    let rows = read_artifact(&artifact_path(dir.path(), 1)).unwrap();
    assert_eq!(rows.first().map(|r| r.row), Some(5));
}

#[test_log::test]
fn tagging_failures_stay_local() {
    let dir = tempfile::tempdir().unwrap();
    let mut units = corpus(6);
    units[2] = TextUnit::new("a/NNG broken b/NNG".to_string(), Metadata::default());

    let summary = scheduler(dir.path(), 6, 2).run(&units).unwrap();
    assert_eq!(summary.failed_units, 1);

    let rows = read_artifact(&artifact_path(dir.path(), 0)).unwrap();
    assert_eq!(rows.len(), 6);
    for (i, row) in rows.iter().enumerate() {
        let result = row.unit.result().unwrap();
        if i == 2 {
            assert!(result.is_failed());
            assert!(result.error().unwrap().contains("broken"));
            assert!(result.phrases().is_empty());
        } else {
            assert_eq!(result, &UnitResult::Phrases(vec![format!("a{i};b{i};c{i}")]));
        }
    }
}

#[test_log::test]
fn failed_batch_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let units = corpus(10);

    let pool = WorkerPool::new(
        2,
        || -> Result<PreTagged, TaggerError> { Err(TaggerError::Spawn("gone".to_string())) },
        PhraseExtractor::default(),
    )
    .unwrap();
    let broken = BatchScheduler::new(dir.path().to_path_buf(), 5, pool).unwrap();
    assert!(broken.run(&units).is_err());
    assert!(!artifact_path(dir.path(), 0).exists());
    assert!(!ArtifactWriter::tmp_path(&artifact_path(dir.path(), 0)).exists());

    // next run redoes everything
    let summary = scheduler(dir.path(), 5, 2).run(&units).unwrap();
    assert_eq!(summary.written, 2);
}
