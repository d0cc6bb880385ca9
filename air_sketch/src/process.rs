//! Line-oriented child processes (pose tracker, drawing classifier).
//!
//! Both helpers are launched from a whitespace-separated command line (no
//! shell: quotes, escapes and variables are passed through literally), print
//! `READY` once their model is loaded, then talk one JSON object per line.

use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use hand_pose::wire;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("empty command line")]
    EmptyCommand,
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source:  io::Error,
    },
    #[error("`{command}` did not signal ready, got {got:?}")]
    Handshake { command: String, got: String },
    #[error("`{0}` closed its output")]
    Closed(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct ChildPipe {
    command: String,
    child:   Child,
    stdin:   ChildStdin,
    stdout:  BufReader<ChildStdout>,
}

impl ChildPipe {
    /// Spawn `command_line` with piped stdin/stdout.  The first
    /// whitespace-separated word is the program, the rest are its arguments
    /// verbatim.  Its stderr is passed through.
    pub fn spawn(command_line: &str) -> Result<Self, ProcessError> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or(ProcessError::EmptyCommand)?;
        let command = command_line.trim().to_string();

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ProcessError::Spawn { command: command.clone(), source })?;

        let stdin  = child.stdin.take().ok_or_else(|| ProcessError::Closed(command.clone()))?;
        let stdout = child.stdout.take().ok_or_else(|| ProcessError::Closed(command.clone()))?;
        info!(command = %command, pid = child.id(), "helper process started");

        Ok(ChildPipe { command, child, stdin, stdout: BufReader::new(stdout) })
    }

    /// Spawn and block until the child prints its `READY` line.
    pub fn spawn_ready(command_line: &str) -> Result<Self, ProcessError> {
        let mut pipe = Self::spawn(command_line)?;
        let line = pipe.read_line()?
            .ok_or_else(|| ProcessError::Closed(pipe.command.clone()))?;
        if !wire::is_ready(&line) {
            return Err(ProcessError::Handshake {
                command: pipe.command.clone(),
                got:     line.trim().to_string(),
            });
        }
        info!(command = %pipe.command, "helper process ready");
        Ok(pipe)
    }

    pub fn command(&self) -> &str { &self.command }

    /// Next line of output, `None` at end of stream.
    pub fn read_line(&mut self) -> Result<Option<String>, ProcessError> {
        let mut line = String::new();
        match self.stdout.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), ProcessError> {
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }

    pub fn reader(&mut self) -> &mut BufReader<ChildStdout> {
        &mut self.stdout
    }
}

impl Drop for ChildPipe {
    fn drop(&mut self) {
        // Already exited is fine.
        let _ = self.child.kill();
        let _ = self.child.wait();
        debug!(command = %self.command, "helper process stopped");
    }
}
