//! REPL Module
//!
//! The interactive Pokedex prompt: reads a line, dispatches a command, repeats.

mod commands;

use std::io::{self, BufRead, Write};
use std::thread;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub use commands::{catch_succeeds, is_valid_resource_name, Command, Flow, Session, MAX_CATCH_ROLL};

/// Printed before every line of input
pub const PROMPT: &str = "Pokedex > ";

/// Lowercases `text` and splits it into words.
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

// == Line Sources ==
/// Where the prompt reads its input from, one line at a time.
#[async_trait]
pub trait LineSource: Send {
    /// Returns the next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

#[async_trait]
impl<R> LineSource for Lines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}

#[async_trait]
impl LineSource for mpsc::Receiver<io::Result<String>> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.recv().await.transpose()
    }
}

/// Reads `reader` on a dedicated thread and hands lines over a channel.
///
/// The thread is detached: a read blocked on an idle terminal never holds up
/// runtime shutdown. It stops after end of input, a read error, or once the
/// receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<mpsc::Receiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    thread::Builder::new()
        .name("line-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
            debug!("Line reader finished");
        })?;

    Ok(rx)
}

// == Prompt Loop ==
/// Runs the prompt loop until `exit` or end of input.
///
/// Command failures are reported on `out` and the loop carries on; only I/O
/// errors on `input` or `out` end it early.
pub async fn run<S, W>(session: &mut Session, mut input: S, out: &mut W) -> anyhow::Result<()>
where
    S: LineSource,
    W: Write,
{
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = input.next_line().await? else {
            writeln!(out, "\nExiting...")?;
            return Ok(());
        };

        let words = clean_input(&line);
        let Some((name, args)) = words.split_first() else {
            writeln!(out, "Please enter a command.")?;
            continue;
        };
        let Some(command) = Command::parse(name) else {
            writeln!(out, "Unknown command.")?;
            continue;
        };

        debug!("Running command {:?} with {} args", command, args.len());
        match session.execute(command, args, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(err) => {
                warn!("Command {} failed: {:#}", command.name(), err);
                writeln!(out, "Error executing command: {:#}", err)?;
            }
        }
    }
}
