//! A single ARGB raster layer and its drawing primitives.
//!
//! Shapes are rasterized by sampling pixel centres against an exact
//! geometric coverage test, without anti-aliasing: a pixel is either fully
//! inside a shape or untouched, and a pixel covered by an opaque erase always
//! ends at alpha 0.

use crate::pixel::{self, TRANSPARENT};
use crate::transform::PixelPoint;

// ════════════════════════════════════════════════════════════════════════════
// Stroke styling
// ════════════════════════════════════════════════════════════════════════════

/// How new paint combines with what is already on the layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Destination-out: the shape's alpha is removed from the layer.
    Erase,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: u32,
    pub cap:   LineCap,
    pub join:  LineJoin,
}

impl StrokeStyle {
    /// Round caps and joins: the freehand pen.
    pub fn pen(width: f32, color: u32) -> Self {
        StrokeStyle { width, color, cap: LineCap::Round, join: LineJoin::Round }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Coverage shapes
// ════════════════════════════════════════════════════════════════════════════

// A stroke is the union of these pieces.
enum Piece {
    /// Rectangle around segment `a → b`, optionally extended past either end.
    Band { a: PixelPoint, b: PixelPoint, ext_a: f32, ext_b: f32 },
    Disc { c: PixelPoint },
    Wedge { v: PixelPoint, p: PixelPoint, q: PixelPoint },
}

fn sub(a: PixelPoint, b: PixelPoint) -> (f32, f32) { (a.x - b.x, a.y - b.y) }

fn cross(u: (f32, f32), v: (f32, f32)) -> f32 { u.0 * v.1 - u.1 * v.0 }

impl Piece {
    fn contains(&self, c: PixelPoint, hw: f32) -> bool {
        match *self {
            Piece::Band { a, b, ext_a, ext_b } => {
                let d = sub(b, a);
                let len = (d.0 * d.0 + d.1 * d.1).sqrt();
                if len <= f32::EPSILON { return false; }
                let r = sub(c, a);
                let along = (r.0 * d.0 + r.1 * d.1) / len;
                let across = cross(d, r).abs() / len;
                along >= -ext_a && along <= len + ext_b && across <= hw
            }
            Piece::Disc { c: o } => {
                let r = sub(c, o);
                r.0 * r.0 + r.1 * r.1 <= hw * hw
            }
            Piece::Wedge { v, p, q } => {
                let s1 = cross(sub(p, v), sub(c, v));
                let s2 = cross(sub(q, p), sub(c, p));
                let s3 = cross(sub(v, q), sub(c, q));
                (s1 >= 0.0 && s2 >= 0.0 && s3 >= 0.0) || (s1 <= 0.0 && s2 <= 0.0 && s3 <= 0.0)
            }
        }
    }

    /// Bounding box `(x0, y0, x1, y1)` in pixels, unclamped.
    fn bounds(&self, hw: f32) -> (f32, f32, f32, f32) {
        match *self {
            Piece::Band { a, b, ext_a, ext_b } => {
                let pad = hw * std::f32::consts::SQRT_2 + ext_a.max(ext_b);
                (a.x.min(b.x) - pad, a.y.min(b.y) - pad, a.x.max(b.x) + pad, a.y.max(b.y) + pad)
            }
            Piece::Disc { c } => (c.x - hw, c.y - hw, c.x + hw, c.y + hw),
            Piece::Wedge { v, p, q } => (
                v.x.min(p.x).min(q.x), v.y.min(p.y).min(q.y),
                v.x.max(p.x).max(q.x), v.y.max(p.y).max(q.y),
            ),
        }
    }
}

fn unit_normal(a: PixelPoint, b: PixelPoint) -> Option<(f32, f32)> {
    let (dx, dy) = sub(b, a);
    let len = (dx * dx + dy * dy).sqrt();
    (len > f32::EPSILON).then(|| (-dy / len, dx / len))
}

fn stroke_pieces(points: &[PixelPoint], style: &StrokeStyle) -> Vec<Piece> {
    let hw = style.width / 2.0;
    let last = points.len() - 1;
    let mut pieces = Vec::with_capacity(points.len() * 2);

    for (i, seg) in points.windows(2).enumerate() {
        let square = style.cap == LineCap::Square;
        pieces.push(Piece::Band {
            a: seg[0],
            b: seg[1],
            ext_a: if square && i == 0 { hw } else { 0.0 },
            ext_b: if square && i + 1 == last { hw } else { 0.0 },
        });
    }

    if style.cap == LineCap::Round {
        pieces.push(Piece::Disc { c: points[0] });
        pieces.push(Piece::Disc { c: points[last] });
    }

    for i in 1..last {
        let v = points[i];
        match style.join {
            LineJoin::Round => pieces.push(Piece::Disc { c: v }),
            LineJoin::Bevel => {
                let (Some(n1), Some(n2)) = (unit_normal(points[i - 1], v), unit_normal(v, points[i + 1]))
                else { continue };
                for side in [1.0, -1.0] {
                    let p = PixelPoint::new(v.x + side * n1.0 * hw, v.y + side * n1.1 * hw);
                    let q = PixelPoint::new(v.x + side * n2.0 * hw, v.y + side * n2.1 * hw);
                    pieces.push(Piece::Wedge { v, p, q });
                }
            }
        }
    }
    pieces
}

// ════════════════════════════════════════════════════════════════════════════
// Layer
// ════════════════════════════════════════════════════════════════════════════

/// `width × height` ARGB pixels, row-major, starting fully transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Layer {
    pub fn new(width: usize, height: usize) -> Self {
        Layer { width, height, pixels: vec![TRANSPARENT; width * height] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    /// Pixel at `(x, y)`; out-of-bounds reads are transparent.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            TRANSPARENT
        }
    }

    pub fn alpha_at(&self, x: usize, y: usize) -> u8 {
        pixel::alpha(self.pixel(x, y))
    }

    /// True when no pixel carries any alpha.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&c| pixel::alpha(c) == 0)
    }

    // ── Drawing ───────────────────────────────────────────────────────────

    /// Stroke the polyline through `points`.  The whole path is rasterized
    /// into one coverage mask and blended once, so overlapping segments do
    /// not double-apply translucent color.  Fewer than two points draws
    /// nothing.
    pub fn stroke_polyline(&mut self, points: &[PixelPoint], style: &StrokeStyle, blend: BlendMode) {
        if points.len() < 2 || style.width <= 0.0 || self.pixels.is_empty() {
            return;
        }
        let hw = style.width / 2.0;
        let pieces = stroke_pieces(points, style);

        let Some((x0, y0, x1, y1)) = pieces.iter()
            .map(|p| p.bounds(hw))
            .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
            .and_then(|b| self.clip(b))
        else { return };

        let mw = x1 - x0 + 1;
        let mut mask = vec![false; mw * (y1 - y0 + 1)];

        for piece in &pieces {
            let Some((px0, py0, px1, py1)) = self.clip(piece.bounds(hw)) else { continue };
            for y in py0..=py1 {
                for x in px0..=px1 {
                    let cell = &mut mask[(y - y0) * mw + (x - x0)];
                    if !*cell && piece.contains(centre(x, y), hw) {
                        *cell = true;
                    }
                }
            }
        }

        for (i, &hit) in mask.iter().enumerate() {
            if hit {
                self.blend_pixel(x0 + i % mw, y0 + i / mw, style.color, blend);
            }
        }
    }

    /// Fill the disc of `radius` around `center`.
    pub fn fill_circle(&mut self, center: PixelPoint, radius: f32, color: u32, blend: BlendMode) {
        if radius <= 0.0 || self.pixels.is_empty() {
            return;
        }
        let disc = Piece::Disc { c: center };
        let Some((x0, y0, x1, y1)) = self.clip(disc.bounds(radius)) else { return };
        for y in y0..=y1 {
            for x in x0..=x1 {
                if disc.contains(centre(x, y), radius) {
                    self.blend_pixel(x, y, color, blend);
                }
            }
        }
    }

    fn blend_pixel(&mut self, x: usize, y: usize, color: u32, blend: BlendMode) {
        let dst = &mut self.pixels[y * self.width + x];
        *dst = match blend {
            BlendMode::Normal => pixel::over(*dst, color),
            BlendMode::Erase  => pixel::erase(*dst, color),
        };
    }

    /// Clamp a float bounding box to pixel indices inside the layer.
    fn clip(&self, (x0, y0, x1, y1): (f32, f32, f32, f32)) -> Option<(usize, usize, usize, usize)> {
        let max_x = self.width as f32 - 1.0;
        let max_y = self.height as f32 - 1.0;
        if x1 < 0.0 || y1 < 0.0 || x0 > max_x || y0 > max_y {
            return None;
        }
        Some((
            x0.floor().max(0.0) as usize,
            y0.floor().max(0.0) as usize,
            x1.ceil().min(max_x) as usize,
            y1.ceil().min(max_y) as usize,
        ))
    }
}

fn centre(x: usize, y: usize) -> PixelPoint {
    PixelPoint::new(x as f32 + 0.5, y as f32 + 0.5)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const INK: u32 = 0xFF56DFCF;

    fn horizontal(layer: &mut Layer, style: StrokeStyle) {
        layer.stroke_polyline(
            &[PixelPoint::new(20.0, 50.0), PixelPoint::new(80.0, 50.0)],
            &style,
            BlendMode::Normal,
        );
    }

    // ── Basics ────────────────────────────────────────────────────────────
    #[test]
    fn new_layer_is_blank() {
        let layer = Layer::new(16, 9);
        assert!(layer.is_blank());
        assert_eq!(layer.pixels().len(), 144);
    }

    #[test]
    fn out_of_bounds_read_is_transparent() {
        let layer = Layer::new(4, 4);
        assert_eq!(layer.pixel(4, 0), TRANSPARENT);
        assert_eq!(layer.pixel(0, 99), TRANSPARENT);
    }

    #[test]
    fn clear_wipes_ink() {
        let mut layer = Layer::new(100, 100);
        horizontal(&mut layer, StrokeStyle::pen(8.0, INK));
        assert!(!layer.is_blank());
        layer.clear();
        assert!(layer.is_blank());
    }

    // ── Strokes ───────────────────────────────────────────────────────────
    #[test]
    fn eight_pixel_stroke_is_eight_rows_thick() {
        let mut layer = Layer::new(100, 100);
        horizontal(&mut layer, StrokeStyle::pen(8.0, INK));
        for y in 46..54 {
            assert_eq!(layer.pixel(50, y), INK, "row {y}");
        }
        assert_eq!(layer.alpha_at(50, 45), 0);
        assert_eq!(layer.alpha_at(50, 54), 0);
    }

    #[test]
    fn single_point_draws_nothing() {
        let mut layer = Layer::new(100, 100);
        layer.stroke_polyline(&[PixelPoint::new(50.0, 50.0)], &StrokeStyle::pen(8.0, INK), BlendMode::Normal);
        assert!(layer.is_blank());
    }

    #[test]
    fn round_cap_extends_past_endpoint() {
        let mut layer = Layer::new(100, 100);
        horizontal(&mut layer, StrokeStyle::pen(8.0, INK));
        // Endpoint at x = 80; pixel centre 82.5 is 2.5 px beyond it.
        assert_eq!(layer.pixel(82, 50), INK);
        assert_eq!(layer.alpha_at(85, 50), 0);
    }

    #[test]
    fn butt_cap_stops_at_endpoint() {
        let mut layer = Layer::new(100, 100);
        let style = StrokeStyle { cap: LineCap::Butt, ..StrokeStyle::pen(8.0, INK) };
        horizontal(&mut layer, style);
        assert_eq!(layer.pixel(79, 50), INK);
        assert_eq!(layer.alpha_at(82, 50), 0);
    }

    #[test]
    fn square_cap_extends_half_width() {
        let mut layer = Layer::new(100, 100);
        let style = StrokeStyle { cap: LineCap::Square, ..StrokeStyle::pen(8.0, INK) };
        horizontal(&mut layer, style);
        assert_eq!(layer.pixel(83, 53), INK);
        assert_eq!(layer.alpha_at(85, 50), 0);
    }

    #[test]
    fn bevel_join_fills_outer_corner() {
        let pts = [PixelPoint::new(20.0, 50.0), PixelPoint::new(50.0, 50.0), PixelPoint::new(50.0, 20.0)];
        let mut bevel = Layer::new(100, 100);
        let style = StrokeStyle { cap: LineCap::Butt, join: LineJoin::Bevel, ..StrokeStyle::pen(10.0, INK) };
        bevel.stroke_polyline(&pts, &style, BlendMode::Normal);
        // Inside the outer corner triangle (50,55)-(55,50)-(50,50).
        assert_eq!(bevel.pixel(51, 51), INK);
        // Beyond the bevel diagonal.
        assert_eq!(bevel.alpha_at(54, 54), 0);
    }

    #[test]
    fn translucent_polyline_blends_once() {
        let pts = [
            PixelPoint::new(10.0, 50.0), PixelPoint::new(90.0, 50.0), PixelPoint::new(10.0, 50.5),
        ];
        let mut layer = Layer::new(100, 100);
        layer.stroke_polyline(&pts, &StrokeStyle::pen(8.0, 0x80FF0000), BlendMode::Normal);
        // Overlapping back-and-forth segments still leave a single coat.
        assert_eq!(layer.alpha_at(50, 50), 0x80);
    }

    #[test]
    fn offscreen_stroke_is_ignored() {
        let mut layer = Layer::new(50, 50);
        layer.stroke_polyline(
            &[PixelPoint::new(-100.0, -100.0), PixelPoint::new(-60.0, -100.0)],
            &StrokeStyle::pen(8.0, INK),
            BlendMode::Normal,
        );
        assert!(layer.is_blank());
    }

    // ── Circles / erase ───────────────────────────────────────────────────
    #[test]
    fn circle_radius_respected() {
        let mut layer = Layer::new(100, 100);
        layer.fill_circle(PixelPoint::new(50.0, 50.0), 25.0, INK, BlendMode::Normal);
        assert_eq!(layer.pixel(50, 50), INK);
        assert_eq!(layer.pixel(50, 74), INK);  // centre 74.5 → 24.5 px away
        assert_eq!(layer.alpha_at(50, 76), 0); // 26.5 px away
    }

    #[test]
    fn erase_circle_punches_hole() {
        let mut layer = Layer::new(100, 100);
        horizontal(&mut layer, StrokeStyle::pen(8.0, INK));
        layer.fill_circle(PixelPoint::new(50.0, 50.0), 10.0, 0xFF000000, BlendMode::Erase);
        assert_eq!(layer.alpha_at(50, 50), 0);
        assert_eq!(layer.alpha_at(45, 50), 0);
        assert_eq!(layer.pixel(30, 50), INK);
    }

    #[test]
    fn erase_on_blank_layer_stays_blank() {
        let mut layer = Layer::new(40, 40);
        layer.fill_circle(PixelPoint::new(20.0, 20.0), 25.0, 0xFF000000, BlendMode::Erase);
        assert!(layer.is_blank());
    }

    #[test]
    fn unit_disc_covers_four_centres() {
        let mut layer = Layer::new(10, 10);
        layer.fill_circle(PixelPoint::new(5.0, 5.0), 1.0, INK, BlendMode::Normal);
        // Centres (4.5,4.5) (5.5,4.5) (4.5,5.5) (5.5,5.5) lie within 1 px.
        let painted = layer.pixels().iter().filter(|&&c| pixel::alpha(c) > 0).count();
        assert_eq!(painted, 4);
    }
}
