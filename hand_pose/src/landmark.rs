//! The 21-point hand landmark schema.
//!
//! Coordinates are normalized to `[0, 1]` on both axes with the origin at the
//! top-left of the camera image and `y` growing downward.  They are exactly
//! what the pose-estimation engine reports: no mirroring has been applied.

use serde::Deserialize;

// ════════════════════════════════════════════════════════════════════════════
// Anatomical indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Number of landmarks in a usable frame.
pub const LANDMARK_COUNT: usize = 21;

/// Skeleton edges drawn between landmarks.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// One normalized landmark.  Any depth component sent by the tracker is
/// dropped during decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }
}

/// A complete single-hand pose.  Construction guarantees all 21 points are
/// present, so the classifier can index without bounds checks failing.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    /// Build a frame from a landmark slice.  Returns `None` unless the slice
    /// holds exactly [`LANDMARK_COUNT`] points.
    pub fn from_points(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(HandFrame { points })
    }

    pub fn from_array(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandFrame { points }
    }

    pub fn point(&self, index: usize) -> Landmark { self.points[index] }
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }

    /// The index fingertip: the pen nib.
    pub fn index_tip(&self) -> Landmark { self.points[INDEX_TIP] }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameEvent — one tick from the pose engine
// ════════════════════════════════════════════════════════════════════════════

/// What the pose engine delivered for one camera tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    Hand(HandFrame),
    NoHand,
}

impl FrameEvent {
    /// A payload with the wrong number of landmarks is indistinguishable from
    /// no hand at all.
    pub fn from_points(points: &[Landmark]) -> Self {
        match HandFrame::from_points(points) {
            Some(frame) => FrameEvent::Hand(frame),
            None        => FrameEvent::NoHand,
        }
    }

    pub fn hand(&self) -> Option<&HandFrame> {
        match self {
            FrameEvent::Hand(frame) => Some(frame),
            FrameEvent::NoHand      => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
