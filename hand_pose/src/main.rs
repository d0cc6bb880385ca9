//! classify_stream — print the gesture for each JSON landmark line on stdin.
//!
//! Handy for checking a tracker's output by hand:
//!
//! ```text
//! python track.py | classify_stream
//! ```

use std::io::{self, BufRead, Write};

use hand_pose::{decode_line, wire};

/// The report for one input line, or `None` for lines that carry no frame.
fn describe(tick: usize, bytes: &[u8]) -> Option<String> {
    let Ok(line) = std::str::from_utf8(bytes) else {
        return Some(format!("{:>6}  ⚠  line is not UTF-8", tick));
    };
    if line.trim().is_empty() || wire::is_ready(line) {
        return None;
    }
    Some(match decode_line(line) {
        Ok(event) => format!("{:>6}  {}", tick, event.gesture()),
        Err(e)    => format!("{:>6}  ⚠  {}", tick, e),
    })
}

fn main() -> io::Result<()> {
    let stdin  = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (tick, bytes) in stdin.lock().split(b'\n').enumerate() {
        if let Some(report) = describe(tick, &bytes?) {
            writeln!(out, "{}", report)?;
        }
    }
    Ok(())
}
