//! External tagger process.
//!
//! The process is spawned once and kept alive for as long as the tagger is.
//! Protocol: one text per line on stdin, one line of `surface/TAG` tokens on stdout.
//! Newlines inside a text are replaced by spaces before sending.
//! Long texts are written from a helper thread, so taggers that answer before the end of their
//! input line do not block on a full pipe.
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use log::{debug, error};

use super::{parse_tagged_line, TaggedSequence, Tagger, TaggerError};

/// Texts shorter than this always fit in the child's stdin pipe.
const INLINE_WRITE_LIMIT: usize = 4096;

pub struct CommandTagger {
    program: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    line: String,
}

impl CommandTagger {
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, TaggerError> {
        debug!("spawning tagger {} {:?}", program, args);
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| TaggerError::Spawn(format!("{program}: {e}")))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        match (stdin, stdout) {
            (Some(stdin), Some(stdout)) => Ok(Self {
                program: program.to_string(),
                child,
                stdin,
                stdout: BufReader::new(stdout),
                line: String::new(),
            }),
            _ => {
                let _ = child.kill();
                Err(TaggerError::Spawn(format!("{program}: missing stdio pipes")))
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

fn send(stdin: &mut ChildStdin, text: &str) -> std::io::Result<()> {
    writeln!(stdin, "{}", text)?;
    stdin.flush()
}

impl Tagger for CommandTagger {
    fn tag(&mut self, text: &str) -> Result<TaggedSequence, TaggerError> {
        let text = text.replace(['\r', '\n'], " ");
        let Self {
            stdin,
            stdout,
            line,
            ..
        } = self;
        line.clear();

        let read = if text.len() < INLINE_WRITE_LIMIT {
            send(stdin, &text)?;
            stdout.read_line(line)
        } else {
            // a streaming tagger answers while we are still writing
            std::thread::scope(|s| {
                let writer = s.spawn(|| send(stdin, &text));
                let read = stdout.read_line(line);
                match writer.join() {
                    Ok(sent) => sent.and(read),
                    Err(_) => Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "tagger writer thread panicked",
                    )),
                }
            })
        };

        if read? == 0 {
            return Err(TaggerError::Closed);
        }
        parse_tagged_line(line.as_str())
    }
}

impl Drop for CommandTagger {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!("tagger {} already exited: {}", self.program, e);
        }
        if let Err(e) = self.child.wait() {
            error!("could not reap tagger {}: {}", self.program, e);
        }
    }
}
