//! JSON-lines protocol spoken by an out-of-process pose-estimation engine.
//!
//! ```text
//! READY
//! {"hands":[{"landmarks":[{"x":0.41,"y":0.62,"z":-0.01}, …21 entries…],"score":0.97}]}
//! {"hands":[]}
//! {"hands":[],"error":"camera frame dropped"}
//! ```
//!
//! The first line is a bare `READY` handshake.  Every following line is one
//! camera tick.  Only the first reported hand is used.

use serde::Deserialize;
use thiserror::Error;

use crate::landmark::{FrameEvent, Landmark};

/// Handshake line the engine prints once it is ready to stream.
pub const READY: &str = "READY";

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed tracker line: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tracker reported: {0}")]
    Tracker(String),
}

#[derive(Deserialize, Debug)]
struct HandJson {
    landmarks: Vec<Landmark>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode one tick.  A hand with the wrong landmark count decodes to
/// [`FrameEvent::NoHand`]; only undecodable JSON or an engine-side error is
/// an `Err`.
pub fn decode_line(line: &str) -> Result<FrameEvent, WireError> {
    let detection: DetectionJson = serde_json::from_str(line.trim())?;
    if let Some(err) = detection.error {
        return Err(WireError::Tracker(err));
    }
    Ok(match detection.hands.first() {
        Some(hand) => FrameEvent::from_points(&hand.landmarks),
        None       => FrameEvent::NoHand,
    })
}

/// True for the engine's handshake line.
pub fn is_ready(line: &str) -> bool {
    line.trim() == READY
}
