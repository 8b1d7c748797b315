//! # phrasal
//!
//! Compresses POS-tagged text into salient multi-word phrases, batch by batch.
//!
//! Each batch of the corpus is split across a fixed pool of workers, and written to
//! `batch_{i}.parquet` once every unit is done. Re-running the same command skips committed
//! batches, so an interrupted run picks up where it stopped.
//!
//! ```sh
//! phrasal 0.1.0
//! phrase compression of tagged corpora.
//!
//! USAGE:
//!     phrasal <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     help      Prints this message or the help of the given subcommand(s)
//!     run       Extract phrases from a corpus, resuming where a previous run stopped
//!     status    Report committed and pending batches of an output folder
//! ```
use phrasal::error::Error;
use phrasal::io::reader::read_corpus;
use phrasal::pipeline::{PhrasePipeline, Pipeline};
use phrasal::processing::Status;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Phrasal::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Phrasal::Run(r) => {
            let p = PhrasePipeline::new(r.into_config()?);
            let summary = p.run()?;
            info!(
                "{} units processed ({} tagging failures), {}/{} batches skipped",
                summary.units, summary.failed_units, summary.skipped, summary.batches
            );
        }

        cli::Phrasal::Status(s) => {
            s.validate()?;
            let status = Status::from_dir(&s.dst)?;
            println!("committed batches: {}", status.done.len());
            for stale in &status.stale {
                println!("stale temporary file: {}", stale.display());
            }
            if let Some(corpus) = s.corpus {
                let units = read_corpus(&corpus)?.len();
                let pending = status.pending(units, s.batch_size);
                println!("pending batches: {}", pending.len());
                for index in pending {
                    println!("  batch_{index}");
                }
            }
        }
    };
    Ok(())
}
