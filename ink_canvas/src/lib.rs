//! # ink_canvas
//!
//! The raster side of air drawing: two ARGB layers of one fixed resolution,
//! driven by [`CanvasOp`]s expressed in normalized hand-landmark space.
//!
//! * [`transform`] — the mirror flip from camera space to canvas pixels
//! * [`layer`]     — polylines with caps/joins, discs, source-over and erase
//! * [`surface`]   — [`LayeredCanvas`], [`CanvasOp`], the [`InkSurface`] seam
//! * [`thumbnail`] — cropped, centred RGB input for a drawing classifier
//!
//! ```rust
//! use hand_pose::Landmark;
//! use ink_canvas::{BlendMode, CanvasOp, InkSurface, LayerId, LayeredCanvas, StrokeStyle};
//!
//! let mut canvas = LayeredCanvas::new(320, 240);
//! canvas.apply(&CanvasOp::Stroke {
//!     layer:  LayerId::Persistent,
//!     points: vec![Landmark::new(0.2, 0.5), Landmark::new(0.8, 0.5)],
//!     style:  StrokeStyle::pen(8.0, 0xFF56DFCF),
//!     blend:  BlendMode::Normal,
//! });
//! assert!(!canvas.persistent().is_blank());
//! ```

pub mod pixel;
pub mod transform;
pub mod layer;
pub mod surface;
pub mod thumbnail;

pub use transform::{MirrorTransform, PixelPoint};
pub use layer::{BlendMode, Layer, LineCap, LineJoin, StrokeStyle};
pub use surface::{CanvasOp, InkSurface, LayerId, LayeredCanvas};
pub use thumbnail::{Thumbnail, THUMBNAIL_SIZE};
