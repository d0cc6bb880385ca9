//! The two-layer drawing target and the op vocabulary that drives it.
//!
//! Callers describe *what* to draw as [`CanvasOp`]s in normalized, unmirrored
//! landmark space.  [`LayeredCanvas`] owns the single [`MirrorTransform`]
//! and applies it to every op, so no call site ever flips coordinates itself.

use hand_pose::{HandFrame, Landmark, HAND_CONNECTIONS};

use crate::layer::{BlendMode, Layer, LineCap, LineJoin, StrokeStyle};
use crate::transform::MirrorTransform;

// ════════════════════════════════════════════════════════════════════════════
// Skeleton style
// ════════════════════════════════════════════════════════════════════════════

pub const SKELETON_COLOR: u32 = 0xFF00FF00;
pub const SKELETON_WIDTH: f32 = 5.0;
pub const JOINT_COLOR:    u32 = 0xFFFF0000;
pub const JOINT_RADIUS:   f32 = 4.0;

// ════════════════════════════════════════════════════════════════════════════
// CanvasOp
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerId {
    /// Committed ink; survives across ticks; target of erasing.
    Persistent,
    /// Skeleton and live preview; wiped every tick.
    Interaction,
}

/// One drawing effect.  Points are normalized landmark coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    Clear(LayerId),
    Stroke {
        layer:  LayerId,
        points: Vec<Landmark>,
        style:  StrokeStyle,
        blend:  BlendMode,
    },
    FillCircle {
        layer:  LayerId,
        center: Landmark,
        /// Radius in canvas pixels.
        radius: f32,
        color:  u32,
        blend:  BlendMode,
    },
    /// Bones plus joint markers for one hand.
    Skeleton {
        layer: LayerId,
        frame: HandFrame,
    },
}

/// Anything that can carry out [`CanvasOp`]s.
pub trait InkSurface {
    fn apply(&mut self, op: &CanvasOp);

    fn apply_all(&mut self, ops: &[CanvasOp]) {
        for op in ops {
            self.apply(op);
        }
    }
}

/// A plain op list records instead of drawing.
impl InkSurface for Vec<CanvasOp> {
    fn apply(&mut self, op: &CanvasOp) {
        self.push(op.clone());
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LayeredCanvas
// ════════════════════════════════════════════════════════════════════════════

/// Persistent + interaction layers of one fixed resolution.
#[derive(Clone, Debug)]
pub struct LayeredCanvas {
    persistent:  Layer,
    interaction: Layer,
    transform:   MirrorTransform,
}

impl LayeredCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        LayeredCanvas {
            persistent:  Layer::new(width, height),
            interaction: Layer::new(width, height),
            transform:   MirrorTransform::new(width, height),
        }
    }

    pub fn width(&self)  -> usize { self.persistent.width() }
    pub fn height(&self) -> usize { self.persistent.height() }

    pub fn persistent(&self)  -> &Layer { &self.persistent }
    pub fn interaction(&self) -> &Layer { &self.interaction }
    pub fn transform(&self)   -> &MirrorTransform { &self.transform }

    fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        match id {
            LayerId::Persistent  => &mut self.persistent,
            LayerId::Interaction => &mut self.interaction,
        }
    }

    fn draw_skeleton(&mut self, id: LayerId, frame: &HandFrame) {
        let t = self.transform;
        let bone = StrokeStyle {
            width: SKELETON_WIDTH,
            color: SKELETON_COLOR,
            cap:   LineCap::Butt,
            join:  LineJoin::Round,
        };
        let layer = self.layer_mut(id);
        for (a, b) in HAND_CONNECTIONS {
            let seg = [t.to_pixel(frame.point(a)), t.to_pixel(frame.point(b))];
            layer.stroke_polyline(&seg, &bone, BlendMode::Normal);
        }
        for &p in frame.points() {
            layer.fill_circle(t.to_pixel(p), JOINT_RADIUS, JOINT_COLOR, BlendMode::Normal);
        }
    }
}

impl InkSurface for LayeredCanvas {
    fn apply(&mut self, op: &CanvasOp) {
        let t = self.transform;
        match op {
            CanvasOp::Clear(id) => self.layer_mut(*id).clear(),
            CanvasOp::Stroke { layer, points, style, blend } => {
                let pixels = t.map_all(points);
                self.layer_mut(*layer).stroke_polyline(&pixels, style, *blend);
            }
            CanvasOp::FillCircle { layer, center, radius, color, blend } => {
                self.layer_mut(*layer).fill_circle(t.to_pixel(*center), *radius, *color, *blend);
            }
            CanvasOp::Skeleton { layer, frame } => self.draw_skeleton(*layer, frame),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
