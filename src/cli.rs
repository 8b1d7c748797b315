//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use phrasal::error::Error;
use phrasal::pipeline::RunConfig;
use phrasal::tagger::TaggerKind;

#[derive(Debug, StructOpt)]
#[structopt(name = "phrasal", about = "phrase compression of tagged corpora.")]
/// Holds every command that is callable by the `phrasal` command.
pub enum Phrasal {
    #[structopt(about = "Extract phrases from a corpus, resuming where a previous run stopped")]
    Run(Run),
    #[structopt(about = "Report committed and pending batches of an output folder")]
    Status(Status),
}

#[derive(Debug, StructOpt)]
/// Run command and parameters.
///
/// ```sh
/// USAGE:
///     phrasal run [FLAGS] [OPTIONS] <corpus>
///
/// FLAGS:
///         --drop-noise    drop url/number/symbol surfaces before extraction
///
/// OPTIONS:
///     -b, --batch-size <batch-size>    number of units per batch [default: 2000]
///         --max-n <max-n>              maximum phrase length, in tokens [default: 5]
///     -o, --output <dst>               batch artifacts location [default: processed_batches]
///         --tagger-cmd <tagger-cmd>    external tagger command line
///         --tags <tags>...             kept part-of-speech tags [default: NNG,VA,VAX,MAG,VV]
///     -w, --workers <workers>          number of workers [default: 8]
///
/// ARGS:
///     <corpus>    corpus file (.csv or .jsonl)
/// ```
pub struct Run {
    #[structopt(parse(from_os_str), help = "corpus file (.csv or .jsonl)")]
    pub corpus: PathBuf,
    #[structopt(
        parse(from_os_str),
        short = "o",
        long = "output",
        help = "batch artifacts location",
        default_value = "processed_batches"
    )]
    pub dst: PathBuf,
    #[structopt(
        short = "b",
        long = "batch-size",
        help = "number of units per batch",
        default_value = "2000"
    )]
    pub batch_size: usize,
    #[structopt(
        short = "w",
        long = "workers",
        help = "number of workers",
        default_value = "8"
    )]
    pub workers: usize,
    #[structopt(
        long = "max-n",
        help = "maximum phrase length, in tokens",
        default_value = "5"
    )]
    pub max_n: usize,
    #[structopt(
        long = "tags",
        help = "kept part-of-speech tags",
        use_delimiter = true,
        default_value = "NNG,VA,VAX,MAG,VV"
    )]
    pub tags: Vec<String>,
    #[structopt(
        long = "tagger-cmd",
        help = "external tagger command line. Content is read as surface/TAG tokens if absent."
    )]
    pub tagger_cmd: Option<String>,
    #[structopt(
        long = "drop-noise",
        help = "drop url/number/symbol surfaces before extraction"
    )]
    pub drop_noise: bool,
}

impl Run {
    pub fn into_config(self) -> Result<RunConfig, Error> {
        let tagger = match &self.tagger_cmd {
            Some(line) => TaggerKind::from_command_line(line)
                .ok_or_else(|| Error::Config("empty tagger command".to_string()))?,
            None => TaggerKind::PreTagged,
        };
        let mut config = RunConfig::new(self.corpus);
        config.dst = self.dst;
        config.batch_size = self.batch_size;
        config.workers = self.workers;
        config.max_n = self.max_n;
        config.tags = self.tags;
        config.tagger = tagger;
        config.drop_noise = self.drop_noise;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, StructOpt)]
/// Status command and parameters.
pub struct Status {
    #[structopt(
        parse(from_os_str),
        help = "batch artifacts location",
        default_value = "processed_batches"
    )]
    pub dst: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "corpus",
        help = "corpus file, to list pending batches"
    )]
    pub corpus: Option<PathBuf>,
    #[structopt(
        short = "b",
        long = "batch-size",
        help = "number of units per batch",
        default_value = "2000"
    )]
    pub batch_size: usize,
}

impl Status {
    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_string()));
        }
        Ok(())
    }
}
