/*! Part-of-speech taggers

Taggers turn raw text into an ordered sequence of [Token]s (surface/tag pairs).
Tagging itself is treated as an opaque capability: anything implementing [Tagger] can be plugged
into the worker pool.

Two taggers are provided:
- [PreTagged] reads text that is already a stream of `surface/TAG` tokens,
- [CommandTagger] drives a long-lived external tagger process over a line protocol.
!*/
mod command;
mod pretagged;
mod token;

use std::fmt;

pub use command::CommandTagger;
pub use pretagged::PreTagged;
pub use token::{TaggedSequence, Token};

/// Tagging failure.
///
/// [TaggerError::MalformedToken] is local to one text: the worker records it against that unit
/// and goes on. The other variants mean the tagger session itself is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggerError {
    MalformedToken(String),
    Io(String),
    /// The tagger process closed its output.
    Closed,
    Spawn(String),
}

impl fmt::Display for TaggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggerError::MalformedToken(tok) => write!(f, "malformed token: {tok:?}"),
            TaggerError::Io(e) => write!(f, "tagger io error: {e}"),
            TaggerError::Closed => write!(f, "tagger closed its output"),
            TaggerError::Spawn(e) => write!(f, "could not start tagger: {e}"),
        }
    }
}

impl TaggerError {
    /// Whether the tagger is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TaggerError::MalformedToken(_))
    }
}

impl From<std::io::Error> for TaggerError {
    fn from(e: std::io::Error) -> Self {
        TaggerError::Io(e.to_string())
    }
}

/// Tagging trait.
///
/// Takes `&mut self` since most real taggers hold a session (a child process, a model handle...).
pub trait Tagger {
    fn tag(&mut self, text: &str) -> Result<TaggedSequence, TaggerError>;
}

impl<T: Tagger + ?Sized> Tagger for Box<T> {
    fn tag(&mut self, text: &str) -> Result<TaggedSequence, TaggerError> {
        (**self).tag(text)
    }
}

/// Tagger selection, used to build one tagger per worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggerKind {
    PreTagged,
    Command { program: String, args: Vec<String> },
}

impl TaggerKind {
    /// Parse a command line such as `mecab-pos --flat` into a [TaggerKind::Command].
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(TaggerKind::Command {
            program,
            args: parts.collect(),
        })
    }

    pub fn build(&self) -> Result<Box<dyn Tagger + Send>, TaggerError> {
        match self {
            TaggerKind::PreTagged => Ok(Box::<PreTagged>::default()),
            TaggerKind::Command { program, args } => {
                Ok(Box::new(CommandTagger::spawn(program, args)?))
            }
        }
    }
}

impl Default for TaggerKind {
    fn default() -> Self {
        TaggerKind::PreTagged
    }
}

/// Split a `surface/TAG` token on its last `/`.
///
/// Tags are 1 to 5 ASCII uppercase letters, and surfaces must not be empty.
pub(crate) fn split_surface_tag(raw: &str) -> Result<Token, TaggerError> {
    let malformed = || TaggerError::MalformedToken(raw.to_string());
    let (surface, tag) = raw.rsplit_once('/').ok_or_else(malformed)?;
    let tag_ok = (1..=5).contains(&tag.len()) && tag.bytes().all(|b| b.is_ascii_uppercase());
    if surface.is_empty() || !tag_ok {
        return Err(malformed());
    }
    Ok(Token::new(surface, tag))
}

/// Parse a whitespace separated stream of `surface/TAG` tokens.
pub(crate) fn parse_tagged_line(line: &str) -> Result<TaggedSequence, TaggerError> {
    line.split_whitespace().map(split_surface_tag).collect()
}
