//! The pen: a two-state stroke/erase machine.
//!
//! ```text
//!            INDEX_FINGER_UP
//!   IDLE ───────────────────────▶ DRAWING ──┐ INDEX_FINGER_UP:
//!     ▲                              │      │   DRAW  → append tip, preview
//!     │   any other gesture, or      │      │   ERASE → punch hole at tip
//!     └──────── hand lost ───────────┘ ◀────┘
//!         (DRAW and ≥ 2 points → commit)
//! ```
//!
//! The engine never touches a canvas directly; it appends [`CanvasOp`]s for
//! the caller to apply.

use hand_pose::{Gesture, Landmark};
use ink_canvas::{BlendMode, CanvasOp, LayerId, StrokeStyle};
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// Pen constants
// ════════════════════════════════════════════════════════════════════════════

pub const INK_COLOR:     u32 = 0xFF56DFCF;
pub const PREVIEW_COLOR: u32 = 0xFF898AC4;
pub const STROKE_WIDTH:  f32 = 8.0;
/// Eraser radius in canvas pixels.
pub const ERASE_RADIUS:  f32 = 25.0;
const ERASER:            u32 = 0xFF000000;

/// What the index finger does while it is up.  Chosen by the host, read
/// every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Draw,
    Erase,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Draw  => "DRAW",
            Mode::Erase => "ERASE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenState { Idle, Drawing }

// ════════════════════════════════════════════════════════════════════════════
// StrokeEngine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct StrokeEngine {
    drawing: bool,
    /// Fingertips of the current episode, unmirrored.  Only grows in DRAW.
    stroke:  Vec<Landmark>,
}

impl StrokeEngine {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> PenState {
        if self.drawing { PenState::Drawing } else { PenState::Idle }
    }

    pub fn is_drawing(&self) -> bool { self.drawing }
    pub fn stroke(&self) -> &[Landmark] { &self.stroke }

    /// Advance one tick.  `tip` is the index fingertip, `None` when no hand
    /// is in frame.
    pub fn tick(&mut self, mode: Mode, gesture: Gesture, tip: Option<Landmark>, ops: &mut Vec<CanvasOp>) {
        match (gesture, tip) {
            (Gesture::IndexFingerUp, Some(tip)) => {
                if !self.drawing {
                    self.drawing = true;
                    debug!(mode = mode.name(), "pen down");
                }
                match mode {
                    Mode::Draw => {
                        self.stroke.push(tip);
                        if self.stroke.len() >= 2 {
                            ops.push(stroke_op(LayerId::Interaction, &self.stroke, PREVIEW_COLOR));
                        }
                    }
                    Mode::Erase => ops.push(CanvasOp::FillCircle {
                        layer:  LayerId::Persistent,
                        center: tip,
                        radius: ERASE_RADIUS,
                        color:  ERASER,
                        blend:  BlendMode::Erase,
                    }),
                }
            }
            _ => self.lift(mode, ops),
        }
    }

    /// End the episode.  The mode in force *now* decides whether the stroke
    /// is inked.
    fn lift(&mut self, mode: Mode, ops: &mut Vec<CanvasOp>) {
        if !self.drawing {
            return;
        }
        self.drawing = false;
        let stroke = std::mem::take(&mut self.stroke);
        if mode == Mode::Draw && stroke.len() >= 2 {
            debug!(points = stroke.len(), "stroke committed");
            ops.push(stroke_op(LayerId::Persistent, &stroke, INK_COLOR));
        } else {
            debug!(points = stroke.len(), "stroke discarded");
        }
    }

    /// Drop the in-progress stroke without inking it.  Returns the number of
    /// points thrown away.
    pub fn abandon(&mut self) -> usize {
        self.drawing = false;
        std::mem::take(&mut self.stroke).len()
    }
}

fn stroke_op(layer: LayerId, points: &[Landmark], color: u32) -> CanvasOp {
    CanvasOp::Stroke {
        layer,
        points: points.to_vec(),
        style:  StrokeStyle::pen(STROKE_WIDTH, color),
        blend:  BlendMode::Normal,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
