//! Downscaled, centred RGB copy of a layer: the classifier's input.
//!
//! The drawing is cropped to the bounding box of its visible ink, scaled so
//! the long edge fills the square, and centred on black.  Transparent pixels
//! composite as black, matching what the classifier was trained on.

use crate::layer::Layer;
use crate::pixel;

/// Edge length the classifier expects.
pub const THUMBNAIL_SIZE: usize = 192;

/// Channels darker than this don't count as ink when locating the drawing.
const INK_FLOOR: u8 = 10;

/// `size × size × 3` RGB samples in `[0, 1]`, row-major, channel-last.
#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    pub size: usize,
    pub rgb:  Vec<f32>,
}

impl Thumbnail {
    fn black(size: usize) -> Self {
        Thumbnail { size, rgb: vec![0.0; size * size * 3] }
    }

    pub fn at(&self, x: usize, y: usize) -> [f32; 3] {
        let i = (y * self.size + x) * 3;
        [self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]]
    }
}

impl Layer {
    /// Inclusive `(min_x, min_y, max_x, max_y)` of visible, non-black ink.
    pub fn ink_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let (a, r, g, b) = pixel::unpack(self.pixel(x, y));
                if a == 0 || (r <= INK_FLOOR && g <= INK_FLOOR && b <= INK_FLOOR) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds
    }

    /// RGB of `(x, y)` composited over black, each channel in `[0, 1]`.
    fn over_black(&self, x: usize, y: usize) -> [f32; 3] {
        let (a, r, g, b) = pixel::unpack(self.pixel(x, y));
        let k = a as f32 / (255.0 * 255.0);
        [r as f32 * k, g as f32 * k, b as f32 * k]
    }

    /// Bilinear sample inside the crop rectangle, clamped to its edges.
    fn sample(&self, sx: f32, sy: f32, crop: (usize, usize, usize, usize)) -> [f32; 3] {
        let (x0, y0, x1, y1) = crop;
        let sx = sx.clamp(x0 as f32, x1 as f32);
        let sy = sy.clamp(y0 as f32, y1 as f32);
        let (ix, iy) = (sx.floor() as usize, sy.floor() as usize);
        let (jx, jy) = ((ix + 1).min(x1), (iy + 1).min(y1));
        let (fx, fy) = (sx - ix as f32, sy - iy as f32);

        let (p00, p10) = (self.over_black(ix, iy), self.over_black(jx, iy));
        let (p01, p11) = (self.over_black(ix, jy), self.over_black(jx, jy));
        let mut out = [0.0; 3];
        for c in 0..3 {
            let top    = p00[c] + (p10[c] - p00[c]) * fx;
            let bottom = p01[c] + (p11[c] - p01[c]) * fx;
            out[c] = top + (bottom - top) * fy;
        }
        out
    }

    /// Crop to the ink, fit the long edge to `size`, centre on black.  A
    /// layer without visible ink yields an all-black thumbnail.
    pub fn thumbnail(&self, size: usize) -> Thumbnail {
        let mut thumb = Thumbnail::black(size);
        let Some(crop) = self.ink_bounds() else { return thumb };
        if size == 0 { return thumb; }

        let (x0, y0, x1, y1) = crop;
        let cw = (x1 - x0 + 1) as f32;
        let ch = (y1 - y0 + 1) as f32;
        let (nw, nh) = if cw > ch {
            (size, ((size as f32 * ch / cw).floor() as usize).max(1))
        } else {
            (((size as f32 * cw / ch).floor() as usize).max(1), size)
        };
        let left = (size - nw) / 2;
        let top  = (size - nh) / 2;
        let (kx, ky) = (cw / nw as f32, ch / nh as f32);

        for ty in 0..nh {
            let sy = y0 as f32 + (ty as f32 + 0.5) * ky - 0.5;
            for tx in 0..nw {
                let sx = x0 as f32 + (tx as f32 + 0.5) * kx - 0.5;
                let rgb = self.sample(sx, sy, crop);
                let i = ((top + ty) * size + left + tx) * 3;
                thumb.rgb[i..i + 3].copy_from_slice(&rgb);
            }
        }
        thumb
    }
}
