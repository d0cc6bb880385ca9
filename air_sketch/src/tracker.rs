//! Where landmark frames come from.
//!
//! | Source            | Feeds                                             |
//! |-------------------|---------------------------------------------------|
//! | [`ProcessTracker`]| a pose-estimation helper streaming JSON lines     |
//! | [`JsonLinesSource`]| any reader of the same lines (replay files)      |
//! | [`SimHand`]       | the mouse and keyboard, via synthetic poses       |
//!
//! Sources are pulled once per tick.  A line that fails to decode becomes a
//! `NoHand` tick rather than stopping the stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use hand_pose::{synth_frame, wire, FrameEvent, Landmark, Pose};
use thiserror::Error;
use tracing::{debug, warn};

use crate::process::{ChildPipe, ProcessError};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("cannot open replay {path:?}: {source}")]
    Replay {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait FrameSource {
    /// The next tick's frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<FrameEvent>;
}

/// Read lines until one carries a frame.  Handshakes and blank lines are
/// skipped; lines that are not UTF-8 or not a valid detection count as a
/// tick with no hand.  `None` only at end of stream or on a read failure.
fn read_frame<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Option<FrameEvent> {
    loop {
        buf.clear();
        match reader.read_until(b'\n', buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "frame stream read failed");
                return None;
            }
        }
        let line = match std::str::from_utf8(buf) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "frame line is not UTF-8, treating as no hand");
                return Some(FrameEvent::NoHand);
            }
        };
        if line.trim().is_empty() || wire::is_ready(line) {
            continue;
        }
        return Some(match wire::decode_line(line) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "bad frame, treating as no hand");
                FrameEvent::NoHand
            }
        });
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JSON lines
// ════════════════════════════════════════════════════════════════════════════

pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    buf:    Vec<u8>,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        JsonLinesSource { reader, buf: Vec::new() }
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Option<FrameEvent> {
        read_frame(&mut self.reader, &mut self.buf)
    }
}

/// Frames recorded to a file, one JSON detection per line.
pub fn open_replay(path: &Path) -> Result<JsonLinesSource<BufReader<File>>, TrackerError> {
    let file = File::open(path)
        .map_err(|source| TrackerError::Replay { path: path.to_path_buf(), source })?;
    debug!(?path, "replaying frames");
    Ok(JsonLinesSource::new(BufReader::new(file)))
}

// ════════════════════════════════════════════════════════════════════════════
// Live tracker process
// ════════════════════════════════════════════════════════════════════════════

pub struct ProcessTracker {
    pipe: ChildPipe,
    buf:  Vec<u8>,
}

impl ProcessTracker {
    pub fn spawn(command_line: &str) -> Result<Self, TrackerError> {
        Ok(ProcessTracker { pipe: ChildPipe::spawn_ready(command_line)?, buf: Vec::new() })
    }
}

impl FrameSource for ProcessTracker {
    fn next_frame(&mut self) -> Option<FrameEvent> {
        read_frame(self.pipe.reader(), &mut self.buf)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Simulated hand
// ════════════════════════════════════════════════════════════════════════════

/// A hand puppeteered by UI input: a pose held at a fingertip position, or
/// nothing in frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimHand {
    held: Option<(Pose, Landmark)>,
}

impl SimHand {
    pub fn new() -> Self { Self::default() }

    pub fn hold(&mut self, pose: Pose, tip: Landmark) {
        self.held = Some((pose, tip));
    }

    pub fn release(&mut self) {
        self.held = None;
    }

    pub fn set(&mut self, held: Option<(Pose, Landmark)>) {
        self.held = held;
    }

    pub fn frame(&self) -> FrameEvent {
        match self.held {
            Some((pose, tip)) => FrameEvent::Hand(synth_frame(pose, tip)),
            None              => FrameEvent::NoHand,
        }
    }
}

impl FrameSource for SimHand {
    fn next_frame(&mut self) -> Option<FrameEvent> {
        Some(self.frame())
    }
}
