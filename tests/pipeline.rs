use std::io::Write;
use std::path::Path;

use phrasal::error::Error;
use phrasal::io::reader::read_artifact;
use phrasal::pipeline::{artifact_path, PhrasePipeline, Pipeline, RunConfig};
use phrasal::processing::Status;
use phrasal::unit::UnitResult;

fn write_csv(path: &Path) {
    let mut f = std::fs::File::create(path).unwrap();
    writeln!(f, "date,content,category,source,doc_id").unwrap();
    writeln!(f, "2023-01-05,금리/NNG 상승/NNG 지속/NNG,news,yonhap,0").unwrap();
    writeln!(f, "2023-01-05,기준/NNG 금리/NNG 가/JKS 동결/NNG 되/VV,news,yonhap,0").unwrap();
    writeln!(f, "2023-01-06,,press,bok,1").unwrap();
    writeln!(f, "2023-01-07,물가/NNG www/NNG 안정/NNG,press,bok,2").unwrap();
    writeln!(f, "2023-01-08,not tagged,minutes,bok,3").unwrap();
}

fn config(dir: &Path) -> RunConfig {
    let corpus = dir.join("corpus.csv");
    write_csv(&corpus);
    let mut config = RunConfig::new(corpus);
    config.dst = dir.join("out");
    config.batch_size = 2;
    config.workers = 2;
    config
}

#[test_log::test]
fn pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let dst = config.dst.clone();

    let summary = PhrasePipeline::new(config.clone()).run().unwrap();
    // empty content is dropped at load time
    assert_eq!(summary.batches, 2);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.failed_units, 1);

    let rows: Vec<_> = (0..2)
        .flat_map(|i| read_artifact(&artifact_path(&dst, i)).unwrap())
        .collect();
    let results: Vec<&UnitResult> = rows.iter().map(|r| r.unit.result().unwrap()).collect();
    assert_eq!(
        results[0],
        &UnitResult::Phrases(vec!["금리;상승;지속".to_string()])
    );
    assert_eq!(
        results[1],
        &UnitResult::Phrases(vec!["기준;금리;동결;되".to_string()])
    );
    assert_eq!(
        results[2],
        &UnitResult::Phrases(vec!["물가;www;안정".to_string()])
    );
    assert!(results[3].is_failed());
    assert_eq!(rows[3].unit.metadata().category.as_deref(), Some("minutes"));

    // second run has nothing left to do
    let summary = PhrasePipeline::new(config).run().unwrap();
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.written, 0);

    let status = Status::from_dir(&dst).unwrap();
    assert!(status.pending(4, 2).is_empty());
    assert!(status.stale.is_empty());
}

#[test_log::test]
fn pipeline_drop_noise() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.drop_noise = true;
    config.batch_size = 10;
    let dst = config.dst.clone();

    PhrasePipeline::new(config).run().unwrap();
    let rows = read_artifact(&artifact_path(&dst, 0)).unwrap();
    assert_eq!(
        rows[2].unit.result(),
        Some(&UnitResult::Phrases(vec!["물가;안정".to_string()]))
    );
}

#[test_log::test]
fn missing_corpus_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = RunConfig::new(dir.path().join("nope.csv"));
    config.dst = dir.path().join("out");

    let res = PhrasePipeline::new(config).run();
    assert!(matches!(res, Err(Error::MissingInput(_))));
    assert!(!dir.path().join("out").exists());
}

#[cfg(unix)]
#[test_log::test]
fn pipeline_with_external_tagger() {
    use phrasal::tagger::TaggerKind;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.tagger = TaggerKind::Command {
        program: "cat".to_string(),
        args: vec![],
    };
    let dst = config.dst.clone();

    let summary = PhrasePipeline::new(config).run().unwrap();
    assert_eq!(summary.written, 2);
    let rows = read_artifact(&artifact_path(&dst, 0)).unwrap();
    assert_eq!(
        rows[0].unit.result(),
        Some(&UnitResult::Phrases(vec!["금리;상승;지속".to_string()]))
    );
}

#[cfg(unix)]
#[test_log::test]
fn pipeline_restarts_exiting_tagger() {
    use phrasal::tagger::TaggerKind;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    // answers a single line, then exits
    config.tagger = TaggerKind::Command {
        program: "head".to_string(),
        args: vec!["-n".to_string(), "1".to_string()],
    };
    config.workers = 1;
    let dst = config.dst.clone();

    let summary = PhrasePipeline::new(config).run().unwrap();
    assert_eq!(summary.written, 2);
    // only the untagged unit fails
    assert_eq!(summary.failed_units, 1);

    let rows: Vec<_> = (0..2)
        .flat_map(|i| read_artifact(&artifact_path(&dst, i)).unwrap())
        .collect();
    assert_eq!(
        rows[1].unit.result(),
        Some(&UnitResult::Phrases(vec!["기준;금리;동결;되".to_string()]))
    );
    assert!(rows[3].unit.result().unwrap().is_failed());
    assert!(!rows[3]
        .unit
        .result()
        .and_then(|r| r.error())
        .unwrap()
        .contains("Broken pipe"));
}

#[cfg(unix)]
#[test_log::test]
fn dead_tagger_commits_nothing() {
    use phrasal::tagger::TaggerKind;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.tagger = TaggerKind::Command {
        program: "true".to_string(),
        args: vec![],
    };
    let dst = config.dst.clone();

    let res = PhrasePipeline::new(config.clone()).run();
    assert!(matches!(res, Err(Error::Tagger(_))));
    assert!(!artifact_path(&dst, 0).exists());
    assert!(!artifact_path(&dst, 1).exists());

    // a working tagger picks the batches up on the next run
    config.tagger = TaggerKind::PreTagged;
    let summary = PhrasePipeline::new(config).run().unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.failed_units, 1);
}
