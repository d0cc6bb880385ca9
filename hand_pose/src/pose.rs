//! Synthetic hand frames.
//!
//! Lets the keyboard/mouse simulator (and tests) produce landmark frames
//! without a camera.  Each [`Pose`] is a hand-made 21-point layout that the
//! classifier recognises, translated so the index fingertip lands on the
//! requested point.

use crate::landmark::*;

/// Pose templates the simulator can hold up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    /// Index finger extended, the rest curled.
    Pointing,
    /// All four fingers curled below their knuckles.
    Fist,
    /// All fingers extended, thumb spread.
    Open,
    /// Index and middle extended ("peace"): matches no gesture.
    Relaxed,
}

// Finger columns and MCP heights of the template hand (wrist at 0.5, 0.8).
const COLUMNS: [f32; 4] = [0.45, 0.50, 0.55, 0.60];
const MCP_Y:   [f32; 4] = [0.60, 0.59, 0.60, 0.62];

// PIP / DIP / TIP offsets from the MCP, straight and curled.
const STRAIGHT: [f32; 3] = [-0.08, -0.13, -0.17];
const CURLED:   [f32; 3] = [-0.05, -0.01,  0.03];

fn finger_extended(pose: Pose, finger: usize) -> bool {
    match pose {
        Pose::Pointing => finger == 0,
        Pose::Fist     => false,
        Pose::Open     => true,
        Pose::Relaxed  => finger <= 1,
    }
}

fn template(pose: Pose) -> [Landmark; LANDMARK_COUNT] {
    let mut p = [Landmark::default(); LANDMARK_COUNT];
    p[WRIST] = Landmark::new(0.50, 0.80);

    // Thumb reaches toward smaller x; tucked in across the palm for a fist.
    let thumb: [(f32, f32); 4] = if pose == Pose::Fist {
        [(0.44, 0.76), (0.42, 0.70), (0.44, 0.66), (0.48, 0.65)]
    } else {
        [(0.44, 0.76), (0.40, 0.70), (0.37, 0.65), (0.34, 0.61)]
    };
    for (k, (x, y)) in thumb.into_iter().enumerate() {
        p[THUMB_CMC + k] = Landmark::new(x, y);
    }

    for finger in 0..4 {
        let mcp = INDEX_MCP + finger * 4;
        let x   = COLUMNS[finger];
        let y   = MCP_Y[finger];
        let offsets = if finger_extended(pose, finger) { STRAIGHT } else { CURLED };
        p[mcp] = Landmark::new(x, y);
        for (joint, dy) in offsets.into_iter().enumerate() {
            p[mcp + 1 + joint] = Landmark::new(x, y + dy);
        }
    }
    p
}

/// Build a frame of `pose` whose index fingertip sits at `tip`.
///
/// Points are translated rigidly and not clamped, so a tip near the image
/// edge may push the wrist outside `[0, 1]`, as real trackers also do.
pub fn synth_frame(pose: Pose, tip: Landmark) -> HandFrame {
    let mut points = template(pose);
    let dx = tip.x - points[INDEX_TIP].x;
    let dy = tip.y - points[INDEX_TIP].y;
    for p in points.iter_mut() {
        p.x += dx;
        p.y += dy;
    }
    HandFrame::from_array(points)
}
