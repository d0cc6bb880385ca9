//! Gesture classification: 21 landmarks in, one [`Gesture`] out.
//!
//! The rules are plain screen-space comparisons on the `y` axis (plus one on
//! `x` for the thumb).  They are not mutually exclusive, so they are tried in
//! a fixed priority order and the first match wins:
//!
//! 1. **Fist** — every fingertip below its MCP knuckle.
//! 2. **Open hand** — every fingertip clearly above its PIP joint and the
//!    thumb tip laterally outside the thumb IP joint.
//! 3. **Index finger up** — index tip clearly above its PIP joint, the other
//!    three fingertips below theirs.
//! 4. **None** — anything else.

use std::fmt;

use crate::landmark::*;

/// How far (normalized units) a fingertip must clear its PIP joint before the
/// finger counts as extended.  Keeps a near-straight finger from flickering.
pub const FINGER_MARGIN: f32 = 0.02;

/// The gesture vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    Fist,
    OpenHand,
    IndexFingerUp,
    #[default]
    None,
}

impl Gesture {
    pub fn name(self) -> &'static str {
        match self {
            Gesture::Fist          => "FIST",
            Gesture::OpenHand      => "OPEN_HAND",
            Gesture::IndexFingerUp => "INDEX_FINGER_UP",
            Gesture::None          => "NONE",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// (tip, pip, mcp) for the four long fingers.
const FINGERS: [(usize, usize, usize); 4] = [
    (INDEX_TIP,  INDEX_PIP,  INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP),
    (RING_TIP,   RING_PIP,   RING_MCP),
    (PINKY_TIP,  PINKY_PIP,  PINKY_MCP),
];

fn y(frame: &HandFrame, index: usize) -> f32 { frame.point(index).y }

fn extended(frame: &HandFrame, tip: usize, pip: usize) -> bool {
    y(frame, tip) < y(frame, pip) - FINGER_MARGIN
}

fn curled(frame: &HandFrame, tip: usize, pip: usize) -> bool {
    y(frame, tip) > y(frame, pip)
}

/// All four fingertips sit below their MCP knuckles.
pub fn is_fist(frame: &HandFrame) -> bool {
    FINGERS.iter().all(|&(tip, _, mcp)| y(frame, tip) > y(frame, mcp))
}

/// All four fingers extended past the margin and the thumb spread outward.
pub fn is_open_hand(frame: &HandFrame) -> bool {
    let fingers_out = FINGERS.iter().all(|&(tip, pip, _)| extended(frame, tip, pip));
    let thumb_out   = frame.point(THUMB_TIP).x < frame.point(THUMB_IP).x;
    fingers_out && thumb_out
}

/// Index extended past the margin, middle/ring/pinky curled.
pub fn is_index_finger_up(frame: &HandFrame) -> bool {
    let index_up    = extended(frame, INDEX_TIP, INDEX_PIP);
    let others_down = FINGERS[1..].iter().all(|&(tip, pip, _)| curled(frame, tip, pip));
    index_up && others_down
}

/// Classify one frame.  Pure: the same frame always yields the same gesture.
pub fn classify(frame: &HandFrame) -> Gesture {
    if is_fist(frame) {
        Gesture::Fist
    } else if is_open_hand(frame) {
        Gesture::OpenHand
    } else if is_index_finger_up(frame) {
        Gesture::IndexFingerUp
    } else {
        Gesture::None
    }
}

impl FrameEvent {
    /// The gesture for this tick; an absent hand is [`Gesture::None`].
    pub fn gesture(&self) -> Gesture {
        self.hand().map_or(Gesture::None, classify)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
