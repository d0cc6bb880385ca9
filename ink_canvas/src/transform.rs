//! Normalized landmark space → canvas pixel space.
//!
//! The camera preview is shown mirrored, so the canvas is too: a landmark at
//! normalized `x` lands at `width − x·width`.  Every op that touches a layer
//! goes through [`MirrorTransform::to_pixel`]; nothing else derives the flip.

use hand_pose::Landmark;

/// A point in canvas pixels (sub-pixel precision).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub const fn new(x: f32, y: f32) -> Self { PixelPoint { x, y } }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorTransform {
    pub width:  f32,
    pub height: f32,
}

impl MirrorTransform {
    pub fn new(width: usize, height: usize) -> Self {
        MirrorTransform { width: width as f32, height: height as f32 }
    }

    pub fn to_pixel(&self, p: Landmark) -> PixelPoint {
        PixelPoint::new(self.width - p.x * self.width, p.y * self.height)
    }

    /// Inverse mapping, used by the simulator to turn a cursor position back
    /// into camera coordinates.
    pub fn to_landmark(&self, p: PixelPoint) -> Landmark {
        Landmark::new((self.width - p.x) / self.width, p.y / self.height)
    }

    pub fn map_all(&self, points: &[Landmark]) -> Vec<PixelPoint> {
        points.iter().map(|&p| self.to_pixel(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn left_edge_maps_to_right_edge() {
        let t = MirrorTransform::new(1280, 720);
        let p = t.to_pixel(Landmark::new(0.0, 0.0));
        assert_relative_eq!(p.x, 1280.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn interior_point() {
        let t = MirrorTransform::new(1280, 720);
        let p = t.to_pixel(Landmark::new(0.25, 0.5));
        assert_relative_eq!(p.x, 960.0);
        assert_relative_eq!(p.y, 360.0);
    }

    #[test]
    fn inverse_round_trips() {
        let t = MirrorTransform::new(640, 480);
        let l = Landmark::new(0.3, 0.7);
        let back = t.to_landmark(t.to_pixel(l));
        assert_relative_eq!(back.x, l.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, l.y, epsilon = 1e-6);
    }
}
